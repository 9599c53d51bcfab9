//! Inbound query handling and the upstream fetch.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use tracing::{debug, info};

use crate::config::{Config, ProxyConfig};
use crate::error::BridgeError;
use crate::useragent::UserAgentPool;

pub const API_URL_PARAM: &str = "apiurl";
pub const ACTION_PARAM: &str = "ac";

/// `apiurl` plus everything else the caller sent, which is forwarded untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamRequest {
    pub api_url: String,
    pub params: Vec<(String, String)>,
}

impl UpstreamRequest {
    /// Split decoded query pairs into the upstream URL and the passthrough parameters.
    pub fn from_query(query: Vec<(String, String)>) -> Result<Self, BridgeError> {
        let mut api_url = None;
        let mut params = Vec::with_capacity(query.len());
        for (key, value) in query {
            if key == API_URL_PARAM {
                api_url = Some(value);
            } else {
                params.push((key, value));
            }
        }
        // callers frequently double-encode the upstream url
        let api_url = api_url
            .map(|raw| match urlencoding::decode(&raw) {
                Ok(decoded) => decoded.into_owned(),
                Err(_) => raw,
            })
            .filter(|u| !u.trim().is_empty())
            .ok_or(BridgeError::MissingApiUrl)?;
        Ok(Self { api_url, params })
    }

    /// Value of `ac`, or `""` when the caller sent none.
    pub fn action(&self) -> &str {
        self.params
            .iter()
            .rev()
            .find(|(k, _)| k == ACTION_PARAM)
            .map(|(_, v)| v.as_str())
            .unwrap_or_default()
    }

    /// Final upstream URL: optional proxy prefix, then the passthrough query.
    pub fn resolve_url(&self, proxy: Option<&ProxyConfig>) -> String {
        let mut url = match proxy {
            Some(p) if p.encode => format!("{}{}", p.url, urlencoding::encode(&self.api_url)),
            Some(p) => format!("{}{}", p.url, self.api_url),
            None => self.api_url.clone(),
        };
        if !self.params.is_empty() {
            let query = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(self.params.iter())
                .finish();
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(&query);
        }
        url
    }
}

/// Source of raw upstream bodies.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Single GET, no retries. Non-2xx statuses are errors.
    async fn fetch(&self, url: &str) -> Result<String, BridgeError>;
}

/// reqwest-backed upstream with User-Agent rotation.
pub struct HttpUpstream {
    client: reqwest::Client,
    agents: UserAgentPool,
}

impl HttpUpstream {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .context("building upstream http client")?;
        let agents = UserAgentPool::new(&config.user_agents);
        info!(user_agents = agents.len(), timeout_secs = config.timeout_secs, "upstream client ready");
        Ok(Self { client, agents })
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn fetch(&self, url: &str) -> Result<String, BridgeError> {
        let agent = self.agents.pick();
        debug!(%url, user_agent = agent, "fetching upstream");
        let response = self.client.get(url).header(USER_AGENT, agent).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BridgeError::UpstreamStatus(status));
        }
        Ok(response.text().await?)
    }
}
