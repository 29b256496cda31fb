use std::env;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalConfig {
    /// Site root holding `mock/...`; an http(s) URL or a local directory.
    pub fixture_base: String,
    pub http_timeout_ms: u64,
    pub preview_rows: usize,
    pub pie_max_groups: usize,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            fixture_base: "./public".to_string(),
            http_timeout_ms: 10_000,
            preview_rows: 3,
            pie_max_groups: 6,
        }
    }
}

impl PortalConfig {
    const FIXTURE_BASE_VARS: &'static [&'static str] =
        &["DEDGE_FIXTURE_BASE", "PORTAL_FIXTURE_BASE"];
    const TIMEOUT_VARS: &'static [&'static str] =
        &["DEDGE_HTTP_TIMEOUT_MS", "PORTAL_HTTP_TIMEOUT_MS"];
    const PREVIEW_ROWS_VARS: &'static [&'static str] = &["DEDGE_PREVIEW_ROWS"];
    const PIE_MAX_VARS: &'static [&'static str] = &["DEDGE_PIE_MAX_GROUPS"];

    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let read = |candidates: &[&str]| candidates.iter().find_map(|key| lookup(*key));
        let defaults = Self::default();

        let fixture_base = read(Self::FIXTURE_BASE_VARS)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or(defaults.fixture_base);
        let http_timeout_ms = read(Self::TIMEOUT_VARS)
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(defaults.http_timeout_ms);
        let preview_rows = read(Self::PREVIEW_ROWS_VARS)
            .and_then(|value| value.parse::<usize>().ok())
            .filter(|rows| *rows > 0)
            .unwrap_or(defaults.preview_rows);
        let pie_max_groups = read(Self::PIE_MAX_VARS)
            .and_then(|value| value.parse::<usize>().ok())
            .unwrap_or(defaults.pie_max_groups);

        Ok(Self {
            fixture_base,
            http_timeout_ms,
            preview_rows,
            pie_max_groups,
        })
    }

    pub fn with_overrides(mut self, fixture_base: Option<String>, timeout_ms: Option<u64>) -> Self {
        if let Some(base) = fixture_base {
            self.fixture_base = base;
        }
        if let Some(timeout) = timeout_ms {
            self.http_timeout_ms = timeout;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> PortalConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        PortalConfig::from_lookup(|key| vars.get(key).cloned()).expect("config")
    }

    #[test]
    fn defaults_apply_without_env() {
        assert_eq!(config_from(&[]), PortalConfig::default());
    }

    #[test]
    fn first_candidate_wins_and_bad_numbers_fall_back() {
        let config = config_from(&[
            ("DEDGE_FIXTURE_BASE", "http://localhost:5173"),
            ("PORTAL_FIXTURE_BASE", "/srv/portal"),
            ("PORTAL_HTTP_TIMEOUT_MS", "2500"),
            ("DEDGE_PREVIEW_ROWS", "0"),
            ("DEDGE_PIE_MAX_GROUPS", "many"),
        ]);
        assert_eq!(config.fixture_base, "http://localhost:5173");
        assert_eq!(config.http_timeout_ms, 2500);
        assert_eq!(config.preview_rows, 3);
        assert_eq!(config.pie_max_groups, 6);
    }

    #[test]
    fn cli_overrides_replace_env_values() {
        let config = PortalConfig::default().with_overrides(Some("fixtures".into()), Some(50));
        assert_eq!(config.fixture_base, "fixtures");
        assert_eq!(config.http_timeout_ms, 50);
    }
}
