use serde::Deserialize;

pub const DEFAULT_UPSTREAM_BASE: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    /// Server-held Gemini API key. `None` is not fatal at startup: generate
    /// requests are rejected with a 500 until the key is configured.
    pub api_key: Option<String>,
    /// Upstream model id. Set via RELAY_MODEL. Default: gemini-1.5-flash.
    pub model: String,
    /// Base URL of the upstream API. Overridable for tests; production
    /// deployments leave the default.
    pub upstream_base: String,
}

impl Config {
    /// The fixed upstream endpoint, credential not included.
    pub fn upstream_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.upstream_base.trim_end_matches('/'),
            self.model
        )
    }
}

pub fn load() -> anyhow::Result<Config> {
    dotenvy::dotenv().ok();

    let api_key = std::env::var("GEMINI_API_KEY")
        .ok()
        .filter(|k| !k.is_empty());
    if api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY is not set — generate requests will be rejected");
    }

    Ok(Config {
        port: std::env::var("RELAY_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8787),
        api_key,
        model: std::env::var("RELAY_MODEL").unwrap_or_else(|_| "gemini-1.5-flash".into()),
        upstream_base: std::env::var("RELAY_UPSTREAM_BASE")
            .unwrap_or_else(|_| DEFAULT_UPSTREAM_BASE.into()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_base(base: &str) -> Config {
        Config {
            port: 8787,
            api_key: None,
            model: "gemini-1.5-flash".into(),
            upstream_base: base.into(),
        }
    }

    #[test]
    fn upstream_url_targets_generate_content() {
        let cfg = config_with_base(DEFAULT_UPSTREAM_BASE);
        assert_eq!(
            cfg.upstream_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn upstream_url_trims_trailing_slash() {
        let cfg = config_with_base("http://127.0.0.1:9999/");
        assert_eq!(
            cfg.upstream_url(),
            "http://127.0.0.1:9999/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn upstream_url_respects_model_override() {
        let mut cfg = config_with_base(DEFAULT_UPSTREAM_BASE);
        cfg.model = "gemini-1.5-pro".into();
        assert!(cfg.upstream_url().ends_with("gemini-1.5-pro:generateContent"));
    }
}
