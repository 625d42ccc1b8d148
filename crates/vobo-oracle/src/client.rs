use std::time::Duration;

use serde::Deserialize;

use crate::prompts::render;
use crate::{AdvisoryOracle, OracleConfig, OracleError, OracleIssue, OracleRequest, OracleResponse};

/// OpenAI-compatible `/chat/completions` client in JSON mode.
pub struct ChatCompletionsOracle {
    client: reqwest::blocking::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl ChatCompletionsOracle {
    pub fn new(base_url: &str, model: &str, api_key: String, timeout: Duration) -> Result<Self, OracleError> {
        let client = reqwest::blocking::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            model: model.to_string(),
            api_key,
        })
    }

    /// Build the oracle described by `cfg`. `Ok(None)` when the oracle is disabled.
    pub fn from_config(cfg: &OracleConfig) -> Result<Option<Self>, OracleError> {
        if !cfg.enabled {
            return Ok(None);
        }
        let api_key = std::env::var(&cfg.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| OracleError::MissingApiKey(cfg.api_key_env.clone()))?;
        let oracle = Self::new(&cfg.base_url, &cfg.model, api_key, Duration::from_secs(cfg.timeout_secs))?;
        Ok(Some(oracle))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn complete(&self, system: &str, user: &str) -> Result<String, OracleError> {
        let body = serde_json::json!({
            "model": &self.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user}
            ],
            "temperature": 0,
            "response_format": {"type": "json_object"}
        });

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().unwrap_or_default();
            return Err(OracleError::Status { status, body });
        }

        #[derive(Deserialize)]
        struct Message {
            content: Option<String>,
        }
        #[derive(Deserialize)]
        struct Choice {
            message: Message,
        }
        #[derive(Deserialize)]
        struct ApiResponse {
            choices: Vec<Choice>,
        }

        let api: ApiResponse = response.json()?;
        api.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(OracleError::EmptyResponse)
    }
}

impl AdvisoryOracle for ChatCompletionsOracle {
    fn consult(&self, request: &OracleRequest) -> Result<Vec<OracleIssue>, OracleError> {
        if request.is_empty() {
            return Ok(Vec::new());
        }
        let (system, user) = render(request);
        let content = self.complete(system, &user)?;
        let parsed = OracleResponse::parse(&content)?;
        tracing::debug!(model = %self.model, items = request.len(), issues = parsed.issues.len(), "oracle consulted");
        Ok(parsed.issues)
    }

    fn name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_config_builds_nothing() {
        let cfg = OracleConfig::default();
        assert!(ChatCompletionsOracle::from_config(&cfg).unwrap().is_none());
    }

    #[test]
    fn missing_key_is_reported() {
        let cfg = OracleConfig {
            enabled: true,
            api_key_env: "VOBO_TEST_KEY_THAT_IS_NEVER_SET".into(),
            ..OracleConfig::default()
        };
        assert!(matches!(
            ChatCompletionsOracle::from_config(&cfg),
            Err(OracleError::MissingApiKey(_))
        ));
    }

    #[test]
    fn endpoint_joins_base_url() {
        let o = ChatCompletionsOracle::new("http://localhost:8080/v1/", "m", "k".into(), Duration::from_secs(1)).unwrap();
        assert_eq!(o.endpoint(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn empty_request_skips_network() {
        let o = ChatCompletionsOracle::new("http://127.0.0.1:9", "m", "k".into(), Duration::from_millis(50)).unwrap();
        let req = OracleRequest::StatusCodes { items: Vec::new() };
        assert!(o.consult(&req).unwrap().is_empty());
    }

    #[test]
    fn unreachable_endpoint_is_transport_error() {
        let o = ChatCompletionsOracle::new("http://127.0.0.1:9", "m", "k".into(), Duration::from_millis(200)).unwrap();
        let req = OracleRequest::StatusCodes {
            items: vec![crate::StatusItem {
                code: 200,
                alias: "OK".into(),
                description: "Correcto".into(),
            }],
        };
        assert!(matches!(o.consult(&req), Err(OracleError::Transport(_))));
    }
}
