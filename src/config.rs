use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;

/// Prefix proxy the upstream URL is routed through.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ProxyConfig {
    pub url: String,
    /// Percent-encode the upstream URL after the prefix.
    #[serde(default)]
    pub encode: bool,
}

/// Runtime configuration, read from `config.toml` and the `VODBRIDGE_*` environment.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub timeout_secs: u64,
    pub pretty: bool,
    pub accept_invalid_certs: bool,
    pub proxy: Option<ProxyConfig>,
    pub user_agents: Vec<String>,
    /// Extra first-character romanizations for `vod_en`.
    pub romanization: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            timeout_secs: 30,
            pretty: false,
            accept_invalid_certs: false,
            proxy: None,
            user_agents: Vec::new(),
            romanization: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Load from `path` if given, else from the platform config dir when a file exists there,
    /// else defaults. Environment overrides apply last.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut cfg = match path {
            Some(p) => Self::from_file(p)?,
            None => match default_config_path().filter(|p| p.exists()) {
                Some(p) => Self::from_file(&p)?,
                None => Self::default(),
            },
        };
        cfg.apply_overrides(|key| std::env::var(key).ok());
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        Self::from_toml_str(&raw).with_context(|| format!("parsing config: {}", path.display()))
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(raw)?;
        Ok(cfg)
    }

    /// Apply `VODBRIDGE_*` overrides. Values that fail to parse are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(host) = lookup("VODBRIDGE_HOST").filter(|s| !s.trim().is_empty()) {
            self.host = host;
        }
        if let Some(port) = lookup("VODBRIDGE_PORT").and_then(|s| s.parse().ok()) {
            self.port = port;
        }
        if let Some(secs) = lookup("VODBRIDGE_TIMEOUT_SECS").and_then(|s| s.parse().ok()) {
            self.timeout_secs = secs;
        }
        if let Some(pretty) = lookup("VODBRIDGE_PRETTY").and_then(|s| parse_flag(&s)) {
            self.pretty = pretty;
        }
        if let Some(url) = lookup("VODBRIDGE_PROXY_URL") {
            self.proxy = if url.trim().is_empty() {
                None
            } else {
                let encode = self.proxy.as_ref().map(|p| p.encode).unwrap_or(false);
                Some(ProxyConfig { url, encode })
            };
        }
        if let Some(encode) = lookup("VODBRIDGE_PROXY_ENCODE").and_then(|s| parse_flag(&s)) {
            if let Some(proxy) = self.proxy.as_mut() {
                proxy.encode = encode;
            }
        }
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// `config.toml` inside the user's config directory.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("dev", "vodbridge", "vodbridge").map(|p| p.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = Config::from_toml_str("").unwrap();
        assert_eq!(cfg.port, 8000);
        assert_eq!(cfg.timeout_secs, 30);
        assert!(cfg.proxy.is_none());
        assert!(!cfg.pretty);
    }

    #[test]
    fn parses_full_file() {
        let cfg = Config::from_toml_str(
            r#"
            port = 9090
            pretty = true
            user_agents = ["A/1"]

            [proxy]
            url = "https://relay.example/"
            encode = true

            [romanization]
            "长" = "chang"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.port, 9090);
        assert!(cfg.pretty);
        assert_eq!(cfg.user_agents, vec!["A/1"]);
        assert_eq!(
            cfg.proxy,
            Some(ProxyConfig { url: "https://relay.example/".into(), encode: true })
        );
        assert_eq!(cfg.romanization.get("长").map(String::as_str), Some("chang"));
    }

    #[test]
    fn rejects_wrong_types() {
        assert!(Config::from_toml_str("port = \"eighty\"").is_err());
    }

    #[test]
    fn env_overrides_apply_and_bad_values_are_ignored() {
        let mut cfg = Config::default();
        cfg.apply_overrides(lookup(&[
            ("VODBRIDGE_PORT", "not-a-port"),
            ("VODBRIDGE_TIMEOUT_SECS", "5"),
            ("VODBRIDGE_PROXY_URL", "https://p/"),
            ("VODBRIDGE_PROXY_ENCODE", "yes"),
            ("VODBRIDGE_PRETTY", "maybe"),
        ]));
        assert_eq!(cfg.port, 8000);
        assert_eq!(cfg.timeout_secs, 5);
        assert!(!cfg.pretty);
        assert_eq!(cfg.proxy, Some(ProxyConfig { url: "https://p/".into(), encode: true }));
    }

    #[test]
    fn blank_proxy_env_disables_proxy() {
        let mut cfg = Config::from_toml_str("[proxy]\nurl = \"https://p/\"").unwrap();
        cfg.apply_overrides(lookup(&[("VODBRIDGE_PROXY_URL", "")]));
        assert!(cfg.proxy.is_none());
    }

    #[test]
    fn loads_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bridge.toml");
        std::fs::write(&path, "timeout_secs = 12\n").unwrap();
        let cfg = Config::from_file(&path).unwrap();
        assert_eq!(cfg.timeout_secs, 12);
        assert!(Config::from_file(&dir.path().join("missing.toml")).is_err());
    }
}
