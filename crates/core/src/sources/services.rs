//! Listing of models served by the serving daemon.
//!
//! `bentoml list` prints a fixed-width table. Columns are located by searching
//! the header for each label and every row is cut at those offsets, so any
//! change to the tool's column order or labels breaks parsing. All of that
//! knowledge lives in [`parse_listing`].

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::{HubError, Result};
use crate::table::ServiceEntry;

/// Header labels in the order the tool prints them.
pub const HEADER_LABELS: [&str; 4] = ["BENTO_SERVICE", "AGE", "APIS", "ARTIFACTS"];

/// Source of the raw `list` output.
#[async_trait]
pub trait ServingDaemon: Send + Sync {
    async fn list_output(&self) -> Result<String>;
}

/// Runs `<program> list` as a subprocess.
#[derive(Debug, Clone)]
pub struct ServingTool {
    program: String,
}

impl ServingTool {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl ServingDaemon for ServingTool {
    async fn list_output(&self) -> Result<String> {
        debug!("Running `{} list`", self.program);
        let output = Command::new(&self.program)
            .arg("list")
            .output()
            .await
            .map_err(|source| HubError::ToolUnavailable {
                tool: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(HubError::ToolFailed {
                tool: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|e| {
            HubError::Parse(format!("`{} list` output is not UTF-8: {}", self.program, e))
        })
    }
}

/// Parse `list` output into service rows.
///
/// Returns `None` when there are no data rows (header only, or no output).
pub fn parse_listing(stdout: &str) -> Result<Option<Vec<ServiceEntry>>> {
    let lines: Vec<&str> = stdout.lines().filter(|l| !l.trim().is_empty()).collect();
    let Some((header, rows)) = lines.split_first() else {
        return Ok(None);
    };
    if rows.is_empty() {
        return Ok(None);
    }

    let offsets = column_offsets(header)?;

    let entries = rows
        .iter()
        .map(|row| -> Result<ServiceEntry> {
            let fields: Vec<String> = offsets
                .iter()
                .enumerate()
                .map(|(i, &start)| {
                    let end = offsets.get(i + 1).copied();
                    slice_chars(row, start, end).trim_end().to_string()
                })
                .collect();
            let [bento_service, age, apis, artifacts]: [String; 4] = fields
                .try_into()
                .map_err(|_| HubError::Parse(format!("unexpected column count in {:?}", row)))?;
            let model_id = bento_service
                .split_once(':')
                .map(|(id, _)| id.to_string())
                .unwrap_or_else(|| bento_service.clone());
            Ok(ServiceEntry {
                model_id,
                bento_service,
                age,
                apis,
                artifacts,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Some(entries))
}

/// Character offset of each header label. Labels are searched left to right,
/// each one after the previous label.
fn column_offsets(header: &str) -> Result<Vec<usize>> {
    let mut offsets = Vec::with_capacity(HEADER_LABELS.len());
    let mut from = 0;

    for label in HEADER_LABELS {
        let idx = header[from..]
            .find(label)
            .map(|i| i + from)
            .ok_or_else(|| {
                HubError::Parse(format!("missing column {} in header {:?}", label, header))
            })?;
        offsets.push(header[..idx].chars().count());
        from = idx + label.len();
    }

    Ok(offsets)
}

fn slice_chars(line: &str, start: usize, end: Option<usize>) -> String {
    let chars = line.chars().skip(start);
    match end {
        Some(end) => chars.take(end.saturating_sub(start)).collect(),
        None => chars.collect(),
    }
}
