use serde::{Deserialize, Serialize};

use crate::OracleError;

/// Which sheet a batch of attribute descriptions comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttributeContext {
    Contract,
    Backend,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AttributeItem {
    pub attribute: String,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StatusItem {
    pub code: u16,
    pub alias: String,
    pub description: String,
}

/// One batch sent to the oracle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OracleRequest {
    Attributes {
        context: AttributeContext,
        items: Vec<AttributeItem>,
    },
    StatusCodes {
        items: Vec<StatusItem>,
    },
}

impl OracleRequest {
    pub fn len(&self) -> usize {
        match self {
            OracleRequest::Attributes { items, .. } => items.len(),
            OracleRequest::StatusCodes { items } => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One entry of the `issues` array. Every field is optional: the oracle is
/// untrusted and may omit or rename things.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OracleIssue {
    #[serde(default)]
    pub attribute: Option<String>,
    #[serde(default)]
    pub code: Option<serde_json::Value>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub suggestion: Option<String>,
}

impl OracleIssue {
    /// `reason`, falling back to `message`.
    pub fn text(&self) -> &str {
        self.reason
            .as_deref()
            .or(self.message.as_deref())
            .map(str::trim)
            .unwrap_or("")
    }

    /// `code` given either as a number or a numeric string.
    pub fn code_number(&self) -> Option<u16> {
        match self.code.as_ref()? {
            serde_json::Value::Number(n) => n.as_u64().and_then(|v| u16::try_from(v).ok()),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct OracleResponse {
    #[serde(default)]
    pub issues: Vec<OracleIssue>,
}

impl OracleResponse {
    pub fn parse(content: &str) -> Result<Self, OracleError> {
        Ok(serde_json::from_str(content)?)
    }
}

/// Best-effort advisory source. Implementations must be safe to share and
/// may fail at any time; callers treat failure as "no advice".
pub trait AdvisoryOracle: Send + Sync {
    fn consult(&self, request: &OracleRequest) -> Result<Vec<OracleIssue>, OracleError>;

    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_loose_issue_shapes() {
        let r = OracleResponse::parse(
            r#"{"issues":[{"attribute":"fechaNacimiento","reason":"Describe un saldo","suggestion":"birthDate"},
                          {"code":"200","message":"Describe un error"},
                          {"code":500}]}"#,
        )
        .unwrap();
        assert_eq!(r.issues.len(), 3);
        assert_eq!(r.issues[0].text(), "Describe un saldo");
        assert_eq!(r.issues[1].code_number(), Some(200));
        assert_eq!(r.issues[1].text(), "Describe un error");
        assert_eq!(r.issues[2].code_number(), Some(500));
        assert_eq!(r.issues[2].text(), "");
    }

    #[test]
    fn missing_issues_is_empty() {
        assert!(OracleResponse::parse("{}").unwrap().issues.is_empty());
        assert!(OracleResponse::parse("not json").is_err());
    }
}
