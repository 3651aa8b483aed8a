//! JSON release index over HTTP (PyPI layout)

use super::{ReleaseCatalog, ReleaseSource};
use crate::core::error::{MirrorResult, RegistryError};
use reqwest::blocking::Client;
use tracing::{debug, info, warn};

/// Blocking client for a PyPI-style `/pypi/<package>/json` endpoint
///
/// One request per run, no retry: a failed fetch aborts the run.
pub struct PypiRegistry {
  client: Client,
  url: String,
}

impl PypiRegistry {
  pub fn new(url: impl Into<String>) -> MirrorResult<Self> {
    let url = url.into();
    let client = Client::builder()
      .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| RegistryError::Transport {
        url: url.clone(),
        reason: format!("failed to create HTTP client: {}", e),
      })?;

    Ok(Self { client, url })
  }
}

impl ReleaseSource for PypiRegistry {
  fn fetch(&self) -> MirrorResult<ReleaseCatalog> {
    info!("Fetching release index from {}", self.url);

    let response = self.client.get(&self.url).send().map_err(|e| RegistryError::Transport {
      url: self.url.clone(),
      reason: e.to_string(),
    })?;

    let status = response.status();
    if !status.is_success() {
      return Err(
        RegistryError::Status {
          url: self.url.clone(),
          status: status.as_u16(),
        }
        .into(),
      );
    }

    let body = response.text().map_err(|e| RegistryError::Transport {
      url: self.url.clone(),
      reason: e.to_string(),
    })?;

    let catalog = ReleaseCatalog::from_index_json(&self.url, &body)?;
    if catalog.is_empty() {
      warn!("Release index at {} lists no semantic versions", self.url);
    } else {
      debug!("release index lists {} versions", catalog.len());
    }

    Ok(catalog)
  }
}
