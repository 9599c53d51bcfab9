//! User-Agent rotation for upstream requests.

use rand::Rng;

/// Browser user agents sent upstream when none are configured.
pub const DEFAULT_USER_AGENTS: &[&str] = &[
    // Desktop
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/89.0.4389.82 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.1.1 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:89.0) Gecko/20100101 Firefox/89.0",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/90.0.4430.93 Safari/537.36",
    // Mobile
    "Mozilla/5.0 (iPhone; CPU iPhone OS 14_5 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.1 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (iPad; CPU OS 14_5 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.1 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (Linux; Android 11; SM-G991B) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/89.0.4389.105 Mobile Safari/537.36",
    "Mozilla/5.0 (Linux; Android 10; K) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0.0.0 Mobile Safari/537.36",
];

/// Fixed pool of agents; each request draws one uniformly at random.
#[derive(Debug, Clone)]
pub struct UserAgentPool {
    agents: Vec<String>,
}

impl Default for UserAgentPool {
    fn default() -> Self {
        Self { agents: DEFAULT_USER_AGENTS.iter().map(|s| s.to_string()).collect() }
    }
}

impl UserAgentPool {
    /// Pool from configured agents. Blank entries are dropped and an empty list means the defaults.
    pub fn new(agents: &[String]) -> Self {
        let agents: Vec<String> = agents
            .iter()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect();
        if agents.is_empty() {
            Self::default()
        } else {
            Self { agents }
        }
    }

    pub fn pick(&self) -> &str {
        let idx = rand::rng().random_range(0..self.agents.len());
        &self.agents[idx]
    }

    pub(crate) fn len(&self) -> usize {
        self.agents.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_falls_back_to_defaults() {
        let pool = UserAgentPool::new(&[" ".to_string()]);
        assert_eq!(pool.len(), DEFAULT_USER_AGENTS.len());
        assert!(pool.pick().starts_with("Mozilla/5.0"));
    }

    #[test]
    fn picks_only_from_configured_agents() {
        let configured = vec!["AgentOne/1.0".to_string(), "AgentTwo/2.0".to_string()];
        let pool = UserAgentPool::new(&configured);
        for _ in 0..50 {
            let picked = pool.pick();
            assert!(configured.iter().any(|a| a == picked), "unexpected agent {picked}");
        }
    }

    #[test]
    fn every_default_agent_is_reachable() {
        let pool = UserAgentPool::default();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..2000 {
            seen.insert(pool.pick().to_string());
        }
        assert_eq!(seen.len(), DEFAULT_USER_AGENTS.len());
    }
}
