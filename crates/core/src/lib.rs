pub mod client;
pub mod dashboard;
pub mod domain;
pub mod view;

pub mod config {
    use anyhow::Context;
    use std::time::Duration;

    pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/v1";
    pub const DEFAULT_PORT: u16 = 3000;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub api_base_url: String,
        pub api_timeout_secs: Option<u64>,
        pub sentry_dsn: Option<String>,
        pub port: u16,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Self::from_lookup(|key| std::env::var(key).ok())
        }

        pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
            let api_base_url = lookup("PULSE_API_URL")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

            let api_timeout_secs = match lookup("PULSE_API_TIMEOUT_SECS") {
                Some(s) if !s.trim().is_empty() => Some(
                    s.trim()
                        .parse::<u64>()
                        .with_context(|| format!("PULSE_API_TIMEOUT_SECS is not a number: {s}"))?,
                ),
                _ => None,
            };

            let port = match lookup("PORT") {
                Some(s) if !s.trim().is_empty() => s
                    .trim()
                    .parse::<u16>()
                    .with_context(|| format!("PORT is not a valid port: {s}"))?,
                _ => DEFAULT_PORT,
            };

            Ok(Self {
                api_base_url,
                api_timeout_secs,
                sentry_dsn: lookup("SENTRY_DSN").filter(|s| !s.trim().is_empty()),
                port,
            })
        }

        pub fn with_api_base_url(mut self, api_base_url: impl Into<String>) -> Self {
            self.api_base_url = api_base_url.into();
            self
        }

        /// `None` means requests never time out.
        pub fn api_timeout(&self) -> Option<Duration> {
            self.api_timeout_secs.map(Duration::from_secs)
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
        fn defaults_when_unset() {
            let settings = Settings::from_lookup(lookup_from(&[])).unwrap();
            assert_eq!(settings.api_base_url, DEFAULT_API_BASE_URL);
            assert_eq!(settings.api_timeout(), None);
            assert_eq!(settings.port, DEFAULT_PORT);
            assert!(settings.sentry_dsn.is_none());
        }

        #[test]
        fn reads_overrides() {
            let settings = Settings::from_lookup(lookup_from(&[
                ("PULSE_API_URL", "http://backend:9000/api/v1/"),
                ("PULSE_API_TIMEOUT_SECS", "15"),
                ("PORT", "8080"),
                ("SENTRY_DSN", ""),
            ]))
            .unwrap();
            assert_eq!(settings.api_base_url, "http://backend:9000/api/v1/");
            assert_eq!(settings.api_timeout(), Some(Duration::from_secs(15)));
            assert_eq!(settings.port, 8080);
            assert!(settings.sentry_dsn.is_none());
        }

        #[test]
        fn rejects_garbage_timeout() {
            let err = Settings::from_lookup(lookup_from(&[("PULSE_API_TIMEOUT_SECS", "soon")]))
                .unwrap_err();
            assert!(err.to_string().contains("PULSE_API_TIMEOUT_SECS"));
        }
    }
}
