use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::error::{invalid_input_error, upstream_error, Error};

const RETRY_DELAY: Duration = Duration::from_millis(250);

/// Shared JSON-over-HTTP client: every call gets the configured timeout and
/// `retries` extra attempts on transport failures and 5xx answers.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Client,
    retries: u32,
}

impl HttpClient {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            retries: config.http_retries,
        })
    }

    #[tracing::instrument(skip(self, query))]
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, Error> {
        let mut attempt = 0;

        loop {
            match self.try_get_json(url, query).await {
                Ok(data) => return Ok(data),
                Err(err) if err.is_retryable() && attempt < self.retries => {
                    attempt += 1;
                    tracing::warn!("request failed ({}), retrying (attempt {})", err, attempt);
                    tokio::time::sleep(RETRY_DELAY).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn try_get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, Error> {
        let res = self.client.get(url).query(query).send().await?;

        let status_code = res.status().as_u16();

        if (400..500).contains(&status_code) {
            return Err(invalid_input_error());
        } else if status_code != 200 {
            return Err(upstream_error());
        }

        Ok(res.json().await?)
    }
}
