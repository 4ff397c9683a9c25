// SPDX-License-Identifier: PMPL-1.0-or-later

//! Fetch collaborators for data and configuration documents.
//!
//! A location is tried as an `http(s)://` URL or as a file path relative to a
//! base directory. Dashboards publish an ordered candidate list and
//! [`fetch_first`] stops at the first candidate that answers with a success
//! status. There is no retry and no timeout beyond the transport's own.

use crate::types::DataDocument;
use async_trait::async_trait;
use reqwest::{Client, Url};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("document not found in any candidate location ({})", .candidates.join(", "))]
    NotFound { candidates: Vec<String> },

    #[error("{location} answered with status {status}")]
    Status { location: String, status: u16 },

    #[error("transport failure for {location}: {message}")]
    Transport { location: String, message: String },

    #[error("{location} is not a valid document: {message}")]
    Parse { location: String, message: String },
}

impl FetchError {
    /// Candidate locations worth showing to the user, if any.
    pub fn candidates(&self) -> &[String] {
        match self {
            FetchError::NotFound { candidates } => candidates,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: String::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The document that answered, and where it came from.
#[derive(Debug, Clone)]
pub struct Located {
    pub location: String,
    pub body: String,
}

#[async_trait]
pub trait Fetch: Send + Sync {
    /// One GET. Non-success statuses are reported in the response, not as errors.
    async fn get(&self, location: &str) -> Result<FetchResponse, FetchError>;
}

/// Reads documents from disk. A missing file answers 404.
#[derive(Debug, Clone)]
pub struct FileFetcher {
    base: PathBuf,
}

impl FileFetcher {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }
}

#[async_trait]
impl Fetch for FileFetcher {
    async fn get(&self, location: &str) -> Result<FetchResponse, FetchError> {
        let path = self.base.join(location);
        match tokio::fs::read_to_string(&path).await {
            Ok(body) => Ok(FetchResponse::ok(body)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(FetchResponse::status(404)),
            Err(err) if err.kind() == ErrorKind::PermissionDenied => Ok(FetchResponse::status(403)),
            Err(err) => Err(FetchError::Transport {
                location: path.display().to_string(),
                message: err.to_string(),
            }),
        }
    }
}

/// Plain HTTP GET through reqwest. Relative locations resolve against `base`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    base: Option<Url>,
}

impl HttpFetcher {
    pub fn new(base: Option<Url>) -> Self {
        Self {
            client: Client::new(),
            base,
        }
    }

    fn resolve(&self, location: &str) -> Result<Url, FetchError> {
        let parsed = match &self.base {
            Some(base) => base.join(location),
            None => Url::parse(location),
        };
        parsed.map_err(|err| FetchError::Transport {
            location: location.to_string(),
            message: err.to_string(),
        })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn get(&self, location: &str) -> Result<FetchResponse, FetchError> {
        let url = self.resolve(location)?;
        let transport = |err: reqwest::Error| FetchError::Transport {
            location: url.to_string(),
            message: err.to_string(),
        };
        let response = self.client.get(url.clone()).send().await.map_err(transport)?;
        let status = response.status().as_u16();
        if !response.status().is_success() {
            return Ok(FetchResponse::status(status));
        }
        let body = response.text().await.map_err(transport)?;
        Ok(FetchResponse { status, body })
    }
}

/// Dispatches absolute URLs (and everything, when the base is a URL) to HTTP
/// and the rest to the file system.
#[derive(Debug, Clone)]
pub struct AutoFetcher {
    file: FileFetcher,
    http: HttpFetcher,
    remote_base: bool,
}

impl AutoFetcher {
    /// `base` is a directory path or an `http(s)://` URL.
    pub fn new(base: &str) -> Self {
        match Url::parse(base).ok().filter(is_http) {
            Some(url) => Self {
                file: FileFetcher::new("."),
                http: HttpFetcher::new(Some(directory_url(url))),
                remote_base: true,
            },
            None => Self {
                file: FileFetcher::new(base),
                http: HttpFetcher::new(None),
                remote_base: false,
            },
        }
    }
}

#[async_trait]
impl Fetch for AutoFetcher {
    async fn get(&self, location: &str) -> Result<FetchResponse, FetchError> {
        let absolute = Url::parse(location).ok().filter(is_http).is_some();
        if absolute || self.remote_base {
            self.http.get(location).await
        } else {
            self.file.get(location).await
        }
    }
}

/// In-memory documents keyed by location; unknown locations answer 404.
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    responses: HashMap<String, Result<FetchResponse, String>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, location: &str, response: FetchResponse) -> Self {
        self.responses.insert(location.to_string(), Ok(response));
        self
    }

    /// Make `location` fail at the transport level with `message`.
    pub fn with_failure(mut self, location: &str, message: &str) -> Self {
        self.responses
            .insert(location.to_string(), Err(message.to_string()));
        self
    }
}

#[async_trait]
impl Fetch for MemoryFetcher {
    async fn get(&self, location: &str) -> Result<FetchResponse, FetchError> {
        match self.responses.get(location) {
            Some(Ok(response)) => Ok(response.clone()),
            Some(Err(message)) => Err(FetchError::Transport {
                location: location.to_string(),
                message: message.clone(),
            }),
            None => Ok(FetchResponse::status(404)),
        }
    }
}

fn is_http(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

// `https://host/dash` must resolve `./x.json` to `https://host/dash/x.json`.
fn directory_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// The standard candidate list for a data file name.
pub fn default_candidates(file_name: &str) -> Vec<String> {
    vec![
        format!("./{}", file_name),
        format!("../data/{}", file_name),
        format!("./data/{}", file_name),
        file_name.to_string(),
    ]
}

/// Try `candidates` in order and return the first successful answer.
///
/// When every candidate fails, the error reflects the worst failure seen:
/// the first transport failure, else the first non-404 status, else
/// [`FetchError::NotFound`] with the full candidate list.
pub async fn fetch_first<F: Fetch + ?Sized>(
    fetcher: &F,
    candidates: &[String],
) -> Result<Located, FetchError> {
    let mut transport = None;
    let mut rejected = None;
    for candidate in candidates {
        match fetcher.get(candidate).await {
            Ok(response) if response.is_success() => {
                info!(location = %candidate, "document fetched");
                return Ok(Located {
                    location: candidate.clone(),
                    body: response.body,
                });
            }
            Ok(response) => {
                debug!(location = %candidate, status = response.status, "candidate rejected");
                if response.status != 404 && rejected.is_none() {
                    rejected = Some(FetchError::Status {
                        location: candidate.clone(),
                        status: response.status,
                    });
                }
            }
            Err(err) => {
                debug!(location = %candidate, error = %err, "candidate failed");
                if transport.is_none() {
                    transport = Some(err);
                }
            }
        }
    }
    Err(transport.or(rejected).unwrap_or_else(|| FetchError::NotFound {
        candidates: candidates.to_vec(),
    }))
}

/// Fetch and parse a data document from the first answering candidate.
pub async fn load_document<F: Fetch + ?Sized>(
    fetcher: &F,
    candidates: &[String],
) -> Result<(String, DataDocument), FetchError> {
    let located = fetch_first(fetcher, candidates).await?;
    let document = DataDocument::from_json(&located.body).map_err(|err| FetchError::Parse {
        location: located.location.clone(),
        message: format!("{:#}", err),
    })?;
    Ok((located.location, document))
}
