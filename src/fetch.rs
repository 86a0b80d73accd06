//! Access to the station and trip dataset sources.
//!
//! A source is either an HTTP(S) URL or a local file path; both datasets are
//! fetched exactly once, before the controller is built.

use anyhow::{Context, Result, ensure};
use async_trait::async_trait;
use reqwest::{Request, Response};

/// Seam for substituting canned responses for real HTTP in tests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}

pub struct DatasetClient(reqwest::Client);

impl DatasetClient {
    pub fn new() -> Self {
        Self(reqwest::Client::new())
    }
}

impl Default for DatasetClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for DatasetClient {
    async fn execute(&self, req: Request) -> reqwest::Result<Response> {
        self.0.execute(req).await
    }
}

/// Fetches a dataset document over HTTP, failing on any non-success status.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = Request::new(
        reqwest::Method::GET,
        url.parse()
            .with_context(|| format!("invalid dataset URL {url}"))?,
    );

    let resp = client.execute(req).await?;
    ensure!(
        resp.status().is_success(),
        "dataset request to {url} returned {}",
        resp.status()
    );

    Ok(resp.bytes().await?.to_vec())
}

/// Loads a dataset source, dispatching between HTTP and the local filesystem.
pub async fn load_source(source: &str) -> Result<Vec<u8>> {
    if source.starts_with("http") {
        let client = DatasetClient::new();
        fetch_bytes(&client, source).await
    } else {
        std::fs::read(source).with_context(|| format!("reading dataset file {source}"))
    }
}
