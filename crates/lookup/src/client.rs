use crate::Fetcher;
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use exn::ResultExt;
use std::time::Duration;
use toshokan_extract::{LookupId, Source};
use tracing::{debug, instrument};

/// [`Fetcher`] backed by the public HTTP APIs.
#[derive(Debug, Clone)]
pub struct HttpClient {
    http: reqwest::Client,
}

impl HttpClient {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .or_raise(|| ErrorKind::Client)?;
        Ok(Self { http })
    }
}

#[async_trait]
impl Fetcher for HttpClient {
    #[instrument(skip(self), fields(%source, %id))]
    async fn get(&self, source: Source, id: &LookupId) -> Result<Vec<u8>> {
        let url = source.request_url(id);
        debug!(%url, "sending lookup request");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .or_raise(|| ErrorKind::Request(source.name()))?;
        let status = response.status();
        if !status.is_success() {
            exn::bail!(ErrorKind::Status {
                api: source.name(),
                status: status.as_u16(),
            });
        }
        let body = response.bytes().await.or_raise(|| ErrorKind::Request(source.name()))?;
        debug!(size = body.len(), "received lookup response");
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_with_custom_user_agent() {
        assert!(HttpClient::new(Duration::from_secs(10), "toshokan/0.1 (test)").is_ok());
    }

    #[test]
    fn rejects_invalid_user_agent() {
        let err = HttpClient::new(Duration::from_secs(10), "bad\nagent").unwrap_err();
        assert_eq!(*err, ErrorKind::Client);
    }
}
