//! HTTP fetcher for the configured list sources.

use std::time::Duration;

use futures::stream::{self, StreamExt};
use log::{info, warn};
use reqwest::Client;

use crate::config::FetchConfig;
use crate::error::AppError;

/// Body of one source that downloaded successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedSource {
    /// Position of the source in the configured list
    pub index: usize,
    pub url: String,
    pub body: Vec<u8>,
}

impl FetchedSource {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

pub struct Fetcher {
    client: Client,
    max_concurrent: usize,
}

impl Fetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(AppError::ClientBuild)?;
        Ok(Self::with_client(client, config.max_concurrent))
    }

    pub fn with_client(client: Client, max_concurrent: usize) -> Self {
        Self {
            client,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Download one source. Non-2xx responses are errors.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, AppError> {
        let fetch_error = |source| AppError::Fetch {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(fetch_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(fetch_error)?;
        Ok(body.to_vec())
    }

    /// Download every source with bounded concurrency.
    ///
    /// Results keep the order of `urls`. Failed sources are logged and left out.
    pub async fn fetch_all(&self, urls: &[String]) -> Vec<FetchedSource> {
        let results: Vec<(usize, &String, Result<Vec<u8>, AppError>)> = stream::iter(urls.iter().enumerate())
            .map(|(index, url)| async move {
                info!("downloading {url}");
                (index, url, self.fetch(url).await)
            })
            .buffered(self.max_concurrent)
            .collect()
            .await;

        let mut fetched = Vec::with_capacity(results.len());
        for (index, url, result) in results {
            match result {
                Ok(body) => {
                    info!("downloaded {url} ({} bytes)", body.len());
                    fetched.push(FetchedSource {
                        index,
                        url: url.clone(),
                        body,
                    });
                }
                Err(e) => warn!("skipping source: {e}"),
            }
        }

        info!("{} of {} sources downloaded", fetched.len(), urls.len());
        fetched
    }
}
