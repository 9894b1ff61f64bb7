/// Server configuration parsed from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server listen port.
    pub port: u16,
    /// Server bind host.
    pub host: String,
    /// Upper bound on concurrently open sessions.
    pub max_sessions: usize,
}

const DEFAULT_PORT: u16 = 5555;
const DEFAULT_MAX_SESSIONS: usize = 64;

impl AppConfig {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Unset or unparsable
    /// values fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        AppConfig {
            port: lookup("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            max_sessions: lookup("CHESS_MAX_SESSIONS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_SESSIONS),
        }
    }

    /// Socket address string for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            port: DEFAULT_PORT,
            host: "0.0.0.0".to_string(),
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config() {
        let config = AppConfig::default();
        assert_eq!(config.port, 5555);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.max_sessions, 64);
        assert_eq!(config.bind_addr(), "0.0.0.0:5555");
    }

    #[test]
    fn lookup_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("PORT", "9000"),
            ("HOST", "127.0.0.1"),
            ("CHESS_MAX_SESSIONS", "2"),
        ]));
        assert_eq!(config.bind_addr(), "127.0.0.1:9000");
        assert_eq!(config.max_sessions, 2);
    }

    #[test]
    fn unparsable_values_fall_back() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("PORT", "not-a-port"),
            ("CHESS_MAX_SESSIONS", "-1"),
        ]));
        assert_eq!(config.port, 5555);
        assert_eq!(config.max_sessions, 64);
    }

    #[test]
    fn empty_lookup_matches_default() {
        let config = AppConfig::from_lookup(|_| None);
        let default = AppConfig::default();
        assert_eq!(config.bind_addr(), default.bind_addr());
        assert_eq!(config.max_sessions, default.max_sessions);
    }
}
