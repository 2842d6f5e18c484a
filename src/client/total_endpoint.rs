use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::client::connection::HttpConnection;
use crate::models::{selection::SelectionSet, total::TotalResponse};

/// Path of the total endpoint on the cart server.
pub const DEFAULT_TOTAL_PATH: &str = "/calculate_total";

/// Everything that can go wrong between issuing a total request and holding
/// a parsed `total`. The updater treats every variant the same way.
#[derive(Error, Debug)]
pub enum RequestFailure {
    #[error("Invalid request url: {0}")]
    Url(#[from] url::ParseError),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Server responded with status {code}")]
    Status { code: u16 },

    #[error("Failed to read response body: {0}")]
    Body(#[from] std::io::Error),

    #[error("Response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Response has no `total` field")]
    MissingTotal,

    #[error("Request worker failed: {0}")]
    Join(String),
}

/// Source of computed totals for a selection.
#[async_trait]
pub trait TotalEndpoint: Send + Sync {
    async fn fetch_total(&self, selection: &SelectionSet) -> Result<TotalResponse, RequestFailure>;
}

/// `GET <base><path>?selected_ids[]=…` over HTTP.
pub struct HttpTotalEndpoint {
    connection: HttpConnection,
    path: String,
}

impl HttpTotalEndpoint {
    pub fn new(connection: HttpConnection, path: impl Into<String>) -> Self {
        Self {
            connection,
            path: path.into(),
        }
    }

    pub fn with_default_path(connection: HttpConnection) -> Self {
        Self::new(connection, DEFAULT_TOTAL_PATH)
    }

    pub fn request_url(&self, selection: &SelectionSet) -> Result<url::Url, RequestFailure> {
        Ok(selection.request_url(self.connection.base_url(), &self.path)?)
    }
}

#[async_trait]
impl TotalEndpoint for HttpTotalEndpoint {
    async fn fetch_total(&self, selection: &SelectionSet) -> Result<TotalResponse, RequestFailure> {
        let url = self.request_url(selection)?;
        debug!("Requesting total from {}", url);

        let agent = self.connection.agent().clone();
        let body = tokio::task::spawn_blocking(move || -> Result<String, RequestFailure> {
            let response = match agent
                .get(url.as_str())
                .set("Accept", "application/json")
                .call()
            {
                Ok(response) => response,
                Err(ureq::Error::Status(code, _)) => return Err(RequestFailure::Status { code }),
                Err(ureq::Error::Transport(err)) => {
                    return Err(RequestFailure::Transport(err.to_string()))
                }
            };
            Ok(response.into_string()?)
        })
        .await
        .map_err(|e| RequestFailure::Join(e.to_string()))??;

        parse_total_body(&body)
    }
}

/// Parses a response body and pulls out its `total` field.
pub fn parse_total_body(body: &str) -> Result<TotalResponse, RequestFailure> {
    match serde_json::from_str::<Value>(body)? {
        Value::Object(mut fields) => fields
            .remove("total")
            .map(TotalResponse::new)
            .ok_or(RequestFailure::MissingTotal),
        _ => Err(RequestFailure::MissingTotal),
    }
}
