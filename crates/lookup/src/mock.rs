//! Canned responses for testing.

use crate::Fetcher;
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use toshokan_extract::{LookupId, Source};

enum Response {
    Body(Vec<u8>),
    Status(u16),
}

/// [`Fetcher`] that answers from memory.
///
/// Bodies still go through the real source adapters, so a mock configured
/// with a captured API response behaves exactly like the live source did. A
/// source without a canned response answers HTTP 404.
#[derive(Default)]
pub struct MockFetcher {
    responses: HashMap<Source, Response>,
    requests: Mutex<Vec<(Source, String)>>,
}

impl MockFetcher {
    pub fn with_body(mut self, source: Source, body: impl Into<Vec<u8>>) -> Self {
        self.responses.insert(source, Response::Body(body.into()));
        self
    }

    pub fn with_status(mut self, source: Source, status: u16) -> Self {
        self.responses.insert(source, Response::Status(status));
        self
    }

    /// Every request made so far, as `(source, "kind:value")`.
    pub fn requests(&self) -> Vec<(Source, String)> {
        self.requests.lock().map(|requests| requests.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn get(&self, source: Source, id: &LookupId) -> Result<Vec<u8>> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push((source, id.to_string()));
        }
        match self.responses.get(&source) {
            Some(Response::Body(body)) => Ok(body.clone()),
            Some(Response::Status(status)) => exn::bail!(ErrorKind::Status {
                api: source.name(),
                status: *status,
            }),
            None => exn::bail!(ErrorKind::Status {
                api: source.name(),
                status: 404,
            }),
        }
    }
}
