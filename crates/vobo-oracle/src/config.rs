use serde::{Deserialize, Serialize};

/// `[oracle]` section of the configuration file.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OracleConfig {
    pub enabled: bool,
    pub base_url: String,
    pub model: String,
    /// Environment variable holding the bearer token.
    pub api_key_env: String,
    pub timeout_secs: u64,
    /// Candidates sent per request.
    pub batch_size: usize,
    /// Phrases marking a response as "this is fine"; such issues are dropped.
    pub benign_markers: Vec<String>,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 30,
            batch_size: 40,
            benign_markers: [
                "es válido",
                "es valido",
                "es correcto",
                "es coherente",
                "no hay problema",
                "sin problema",
                "no hay contradicción",
                "looks fine",
                "is fine",
                "is valid",
                "no issue",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}
