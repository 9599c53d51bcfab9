pub mod config;
pub mod document;
pub mod error;
pub mod extract;
pub mod gateway;
pub mod mapping;
pub mod naming;
pub mod server;
pub mod types;
pub mod useragent;

// --- Library API for embedding ---

/// Convenience re-exports for embedders.
pub mod prelude {
    pub use crate::config::{Config, ProxyConfig};
    pub use crate::error::BridgeError;
    pub use crate::extract::{Action, Mapper};
    pub use crate::gateway::{HttpUpstream, Upstream, UpstreamRequest};
    pub use crate::naming::{TableTransliterator, Transliterator};
    pub use crate::types::{Envelope, Record, VideoBrief, VideoRecord};
    pub use crate::Bridge;
}

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, warn};

use crate::config::{Config, ProxyConfig};
use crate::document::SourceDocument;
use crate::error::BridgeError;
use crate::extract::Mapper;
use crate::gateway::{HttpUpstream, Upstream, UpstreamRequest};
use crate::naming::TableTransliterator;
use crate::types::Envelope;

/// Characters of an unparseable body kept in the log line.
const LOGGED_BODY_CHARS: usize = 500;

/// Async library entry point. Owns the upstream client and the feed mapper.
pub struct Bridge {
    upstream: Arc<dyn Upstream>,
    mapper: Mapper,
    proxy: Option<ProxyConfig>,
}

impl Bridge {
    /// Build from configuration, with the reqwest upstream.
    pub fn new(config: &Config) -> Result<Self> {
        let upstream = HttpUpstream::new(config)?;
        Ok(Self::with_upstream(config, Arc::new(upstream)))
    }

    /// Build around any upstream; the proxy and romanization settings still come from `config`.
    pub fn with_upstream(config: &Config, upstream: Arc<dyn Upstream>) -> Self {
        let naming = TableTransliterator::with_entries(
            config.romanization.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        );
        debug!(entries = naming.len(), "romanization table loaded");
        Self {
            upstream,
            mapper: Mapper::new(Box::new(naming)),
            proxy: config.proxy.clone(),
        }
    }

    /// Serve one inbound query. Failures come back as `code: -1` envelopes.
    pub async fn handle(&self, query: Vec<(String, String)>) -> Envelope {
        match self.try_handle(query).await {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(error = %e, "request failed");
                Envelope::from_error(&e)
            }
        }
    }

    pub async fn try_handle(&self, query: Vec<(String, String)>) -> Result<Envelope, BridgeError> {
        let request = UpstreamRequest::from_query(query)?;
        let url = request.resolve_url(self.proxy.as_ref());
        let body = self.upstream.fetch(&url).await?;
        self.convert(&body, request.action())
    }

    /// Map a raw upstream body for action `ac`.
    pub fn convert(&self, body: &str, ac: &str) -> Result<Envelope, BridgeError> {
        if body.is_empty() {
            return Err(BridgeError::EmptyResponse);
        }
        let doc = SourceDocument::parse(body).map_err(|e| {
            let head: String = body.chars().take(LOGGED_BODY_CHARS).collect();
            warn!(error = %e, body = %head, "upstream body is not well-formed XML");
            e
        })?;
        Ok(self.mapper.map(doc.root(), ac, current_epoch()))
    }
}

fn current_epoch() -> i64 {
    std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH).unwrap_or_default().as_secs() as i64
}
