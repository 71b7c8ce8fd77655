use std::time::Instant;

use log::{debug, info};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{RelayError, RelayResult};

/// Sampling settings sent alongside every prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub max_new_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub do_sample: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_new_tokens: 512,
            temperature: 0.7,
            top_p: 0.9,
            do_sample: true,
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    prompt: &'a str,
    #[serde(flatten)]
    params: &'a GenerationParams,
}

/// Decoded `/generate` reply plus the wall-clock time spent on the call.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationResult {
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    pub total_request_time: f64,
}

impl GenerationResult {
    pub fn generated_text(&self) -> Option<&str> {
        self.fields.get("generated_text").and_then(Value::as_str)
    }
}

// Client for the remote text-generation server
pub struct GenerationClient {
    api_url: String,
    client: Client,
}

impl GenerationClient {
    pub fn new(api_url: &str) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub async fn health_check(&self) -> RelayResult<Value> {
        let url = format!("{}/health", self.api_url);
        debug!("Probing generation server health at {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(RelayError::UpstreamHttp {
                status: status.as_u16(),
                body,
            });
        }

        let health = response.json::<Value>().await?;
        Ok(health)
    }

    /// Issues one POST to `{api_url}/generate`. Any status other than 200 is an
    /// error carrying the status code and raw body; there is no retry.
    pub async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> RelayResult<GenerationResult> {
        let url = format!("{}/generate", self.api_url);
        let payload = GenerationRequest { prompt, params };

        info!(
            "Sending generation request (max_new_tokens: {}, temperature: {}, top_p: {}, do_sample: {})",
            params.max_new_tokens, params.temperature, params.top_p, params.do_sample
        );

        let started = Instant::now();
        let response = self.client.post(&url).json(&payload).send().await?;
        let status = response.status();
        let body = response.text().await?;
        let total_request_time = started.elapsed().as_secs_f64();

        info!(
            "Generation server answered {} in {:.3}s",
            status.as_u16(),
            total_request_time
        );

        if status != StatusCode::OK {
            return Err(RelayError::UpstreamHttp {
                status: status.as_u16(),
                body,
            });
        }

        let mut fields = match serde_json::from_str::<Value>(&body) {
            Ok(Value::Object(fields)) => fields,
            Ok(other) => {
                return Err(RelayError::UpstreamResponseMalformed(format!(
                    "expected a JSON object, got {}",
                    other
                )))
            }
            Err(e) => {
                return Err(RelayError::UpstreamResponseMalformed(format!(
                    "invalid JSON: {}",
                    e
                )))
            }
        };

        // The locally measured time wins over any upstream field of that name.
        fields.remove("total_request_time");

        Ok(GenerationResult {
            fields,
            total_request_time,
        })
    }
}
