//! Uniform tabular shape shared by every catalog listing.

use serde::Serialize;

pub const MODEL_COLUMNS: [&str; 2] = ["MODEL_ID", "TITLE"];
pub const SERVICE_COLUMNS: [&str; 5] = ["MODEL_ID", "BENTO_SERVICE", "AGE", "APIS", "ARTIFACTS"];

/// A model found in the registry or the local bundle cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelEntry {
    pub model_id: String,
    pub title: String,
}

/// A model running as a service under the serving daemon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceEntry {
    pub model_id: String,
    pub bento_service: String,
    pub age: String,
    pub apis: String,
    pub artifacts: String,
}

/// Ordered rows under one fixed column schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CatalogTable {
    pub fn from_models(entries: Vec<ModelEntry>) -> Self {
        Self {
            columns: MODEL_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows: entries
                .into_iter()
                .map(|e| vec![e.model_id, e.title])
                .collect(),
        }
    }

    pub fn from_services(entries: Vec<ServiceEntry>) -> Self {
        Self {
            columns: SERVICE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows: entries
                .into_iter()
                .map(|e| vec![e.model_id, e.bento_service, e.age, e.apis, e.artifacts])
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of the `MODEL_ID` column, in row order.
    pub fn model_ids(&self) -> Vec<&str> {
        self.rows
            .iter()
            .filter_map(|row| row.first().map(String::as_str))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Table,
    Text,
}

/// What a listing hands back, depending on the catalog's [`OutputMode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogOutput {
    Table(CatalogTable),
    Text { text: String, rows: usize },
}

impl CatalogOutput {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CatalogOutput::Table(_) => None,
            CatalogOutput::Text { text, .. } => Some(text),
        }
    }

    /// Number of data rows, excluding the header.
    pub fn row_count(&self) -> usize {
        match self {
            CatalogOutput::Table(table) => table.len(),
            CatalogOutput::Text { rows, .. } => *rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }
}

pub trait TableRenderer: Send + Sync {
    fn render(&self, table: &CatalogTable) -> String;
}

/// Left-aligned columns separated by two spaces, with a dash rule under the header.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextRenderer;

impl TableRenderer for PlainTextRenderer {
    fn render(&self, table: &CatalogTable) -> String {
        let mut widths: Vec<usize> = table.columns.iter().map(|c| c.chars().count()).collect();
        for row in &table.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

        let mut lines = Vec::with_capacity(table.rows.len() + 2);
        lines.push(format_line(&table.columns, &widths));
        lines.push(format_line(&rule, &widths));
        for row in &table.rows {
            lines.push(format_line(row, &widths));
        }
        lines.join("\n")
    }
}

fn format_line(cells: &[String], widths: &[usize]) -> String {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join("  ");
    line.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_aligned_columns() {
        let table = CatalogTable::from_models(vec![
            ModelEntry {
                model_id: "eos1ax2".into(),
                title: "Solubility".into(),
            },
            ModelEntry {
                model_id: "eos3b5e".into(),
                title: "Molecular weight".into(),
            },
        ]);

        let text = PlainTextRenderer.render(&table);
        let expected = "\
MODEL_ID  TITLE
--------  ----------------
eos1ax2   Solubility
eos3b5e   Molecular weight";
        assert_eq!(text, expected);
    }

    #[test]
    fn empty_table_renders_header_only() {
        let table = CatalogTable::from_models(Vec::new());
        assert_eq!(PlainTextRenderer.render(&table), "MODEL_ID  TITLE\n--------  -----");
    }

    #[test]
    fn service_rows_follow_schema_order() {
        let table = CatalogTable::from_services(vec![ServiceEntry {
            model_id: "eos1ax2".into(),
            bento_service: "eos1ax2:20210101_abc".into(),
            age: "2 days".into(),
            apis: "predict".into(),
            artifacts: "model".into(),
        }]);
        assert_eq!(table.columns, SERVICE_COLUMNS);
        assert_eq!(table.rows[0][1], "eos1ax2:20210101_abc");
        assert_eq!(table.model_ids(), vec!["eos1ax2"]);
    }
}
