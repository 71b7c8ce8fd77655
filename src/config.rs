use std::env;

use crate::model::GenerationParams;

pub const PLACEHOLDER_API_URL: &str = "https://your-ngrok-url.ngrok.url";

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub api_url: String,
    pub params: GenerationParams,
    pub host: String,
    pub port: u16,
}

impl RelayConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolves every setting through `lookup`, falling back to the default
    /// when a key is unset, empty, or fails to parse.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = GenerationParams::default();

        let params = GenerationParams {
            max_new_tokens: get("MAX_NEW_TOKENS")
                .and_then(|v| v.trim().parse::<u32>().ok())
                .unwrap_or(defaults.max_new_tokens),
            temperature: get("TEMPERATURE")
                .and_then(|v| v.trim().parse::<f32>().ok())
                .unwrap_or(defaults.temperature),
            top_p: get("TOP_P")
                .and_then(|v| v.trim().parse::<f32>().ok())
                .unwrap_or(defaults.top_p),
            do_sample: get("DO_SAMPLE")
                .and_then(|v| v.trim().parse::<bool>().ok())
                .unwrap_or(defaults.do_sample),
        };

        Self {
            api_url: get("GENERATION_API_URL").unwrap_or_else(|| PLACEHOLDER_API_URL.to_string()),
            params,
            host: get("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: get("SERVER_PORT")
                .and_then(|v| v.trim().parse::<u16>().ok())
                .unwrap_or(8080),
        }
    }
}
