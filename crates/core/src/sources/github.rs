use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::future::Future;
use tracing::debug;

use super::{AuthClient, HttpFetcher, RepoRef};
use crate::error::{HubError, Result};

const USER_AGENT: &str = concat!("modelhub/", env!("CARGO_PKG_VERSION"));
const PAGE_SIZE: usize = 100;

/// Registry client for the GitHub REST API.
pub struct GitHubClient {
    client: Client,
    api_base: String,
}

#[derive(Debug, Deserialize)]
struct GhRepo {
    name: String,
    owner: GhOwner,
}

#[derive(Debug, Deserialize)]
struct GhOwner {
    login: String,
}

impl GitHubClient {
    pub fn new(api_base: &str) -> Result<Self> {
        let api_base = api_base.trim_end_matches('/').to_string();
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| HubError::Transport {
                url: api_base.clone(),
                source,
            })?;
        Ok(Self { client, api_base })
    }

    async fn fetch<T: DeserializeOwned>(&self, url: &str, request: RequestBuilder) -> Result<T> {
        let response = request
            .header("Accept", "application/vnd.github+json")
            .send()
            .await
            .map_err(|source| HubError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(HubError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.json().await.map_err(|source| HubError::Transport {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl HttpFetcher for GitHubClient {
    async fn get_json(&self, url: &str) -> Result<Value> {
        debug!("GET {}", url);
        self.fetch(url, self.client.get(url)).await
    }
}

#[async_trait]
impl AuthClient for GitHubClient {
    async fn list_repositories(&self, token: &str) -> Result<Vec<RepoRef>> {
        collect_pages(PAGE_SIZE, |page| {
            let url = format!(
                "{}/user/repos?per_page={}&page={}",
                self.api_base, PAGE_SIZE, page
            );
            async move {
                debug!("GET {} (authenticated)", url);
                let batch: Vec<GhRepo> = self
                    .fetch(&url, self.client.get(&url).bearer_auth(token))
                    .await?;
                let repos: Vec<RepoRef> = batch
                    .into_iter()
                    .map(|r| RepoRef {
                        owner: r.owner.login,
                        name: r.name,
                    })
                    .collect();
                Ok::<_, HubError>(repos)
            }
        })
        .await
    }
}

/// Fetch pages starting at 1 until one comes back shorter than `page_size`.
async fn collect_pages<T, F, Fut>(page_size: usize, mut fetch_page: F) -> Result<Vec<T>>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let mut items = Vec::new();
    let mut page = 1;

    loop {
        let batch = fetch_page(page).await?;
        let count = batch.len();
        items.extend(batch);

        if count < page_size {
            break;
        }
        page += 1;
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(sizes: &[usize]) -> Vec<Vec<usize>> {
        sizes.iter().map(|&n| (0..n).collect()).collect()
    }

    #[tokio::test]
    async fn stops_on_short_page() {
        let replies = pages(&[3, 3, 1, 3]);
        let mut requested = Vec::new();

        let items = collect_pages(3, |page| {
            requested.push(page);
            let batch = replies[page - 1].clone();
            async move { Ok::<_, HubError>(batch) }
        })
        .await
        .unwrap();

        assert_eq!(items.len(), 7);
        assert_eq!(requested, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn full_last_page_needs_one_more_request() {
        let replies = pages(&[3, 3, 0]);
        let mut requested = Vec::new();

        let items = collect_pages(3, |page| {
            requested.push(page);
            let batch = replies[page - 1].clone();
            async move { Ok::<_, HubError>(batch) }
        })
        .await
        .unwrap();

        assert_eq!(items.len(), 6);
        assert_eq!(requested, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn page_error_is_returned() {
        let result: Result<Vec<usize>> = collect_pages(3, |page| async move {
            if page == 1 {
                Ok::<_, HubError>(vec![1, 2, 3])
            } else {
                Err(HubError::Status {
                    url: format!("page {}", page),
                    status: 403,
                })
            }
        })
        .await;

        assert!(matches!(result, Err(HubError::Status { status: 403, .. })));
    }
}
