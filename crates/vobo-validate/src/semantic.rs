use std::collections::HashMap;

use vobo_core::{Category, CellRef, Finding};
use vobo_extract::{DescriptionCandidate, StatusSummary};
use vobo_oracle::{
    filter_benign, AdvisoryOracle, AttributeContext, AttributeItem, OracleIssue, OracleRequest, StatusItem,
};

/// Oracle-backed advisory checks. Every finding is a non-blocking
/// `SEMANTIC_BIAN` warning; oracle failures yield no findings.
pub struct SemanticAdvisor<'a> {
    oracle: &'a dyn AdvisoryOracle,
    batch_size: usize,
    benign_markers: &'a [String],
}

impl<'a> SemanticAdvisor<'a> {
    pub fn new(oracle: &'a dyn AdvisoryOracle, batch_size: usize, benign_markers: &'a [String]) -> Self {
        Self {
            oracle,
            batch_size: batch_size.max(1),
            benign_markers,
        }
    }

    /// Attribute/description coherence, `batch_size` candidates per request.
    pub fn attribute_findings(
        &self,
        sheet: &str,
        context: AttributeContext,
        candidates: &[DescriptionCandidate],
    ) -> Vec<Finding> {
        let cells: HashMap<&str, CellRef> = candidates.iter().map(|c| (c.attribute.as_str(), c.cell)).collect();
        let mut out = Vec::new();
        for batch in candidates.chunks(self.batch_size) {
            let request = OracleRequest::Attributes {
                context,
                items: batch
                    .iter()
                    .map(|c| AttributeItem {
                        attribute: c.attribute.clone(),
                        description: c.description.clone(),
                    })
                    .collect(),
            };
            for issue in self.consult(sheet, &request) {
                let attribute = issue.attribute.clone().unwrap_or_else(|| "Desconocido".to_string());
                let cell = cells.get(attribute.as_str()).copied();
                out.push(finding(sheet, attribute, cell, &issue));
            }
        }
        out
    }

    /// Code/alias/description contradictions in the summary table.
    pub fn status_findings(&self, sheet: &str, summary: &StatusSummary) -> Vec<Finding> {
        if summary.entries.is_empty() {
            return vec![];
        }
        let request = OracleRequest::StatusCodes {
            items: summary
                .entries
                .iter()
                .map(|e| StatusItem {
                    code: e.code,
                    alias: e.alias.clone(),
                    description: e.description.clone(),
                })
                .collect(),
        };
        self.consult(sheet, &request)
            .into_iter()
            .map(|issue| {
                let code = issue.code_number();
                let attribute = code
                    .map(|c| format!("StatusCode {c}"))
                    .unwrap_or_else(|| "Http Status Code".to_string());
                let cell = code
                    .and_then(|c| summary.entries.iter().find(|e| e.code == c))
                    .map(|e| e.cell)
                    .or(Some(summary.header));
                finding(sheet, attribute, cell, &issue)
            })
            .collect()
    }

    fn consult(&self, sheet: &str, request: &OracleRequest) -> Vec<OracleIssue> {
        match self.oracle.consult(request) {
            Ok(issues) => filter_benign(issues, self.benign_markers),
            Err(e) => {
                tracing::warn!(sheet = %sheet, oracle = self.oracle.name(), error = %e, "advisory oracle failed; skipping");
                Vec::new()
            }
        }
    }
}

fn finding(sheet: &str, attribute: String, cell: Option<CellRef>, issue: &OracleIssue) -> Finding {
    let mut message = format!("Semántica: {}", issue.text());
    if let Some(s) = issue.suggestion.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        message.push_str(&format!(". Sugerencia: {s}"));
    }
    Finding::warn(Category::SemanticBian, sheet, attribute, message)
        .at(cell)
        .blocking(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vobo_extract::SummaryEntry;
    use vobo_oracle::{OracleConfig, ScriptedOracle};

    fn candidates(n: usize) -> Vec<DescriptionCandidate> {
        (0..n)
            .map(|i| DescriptionCandidate {
                attribute: format!("attr{i}"),
                description: format!("desc {i}"),
                cell: CellRef::new(i + 1, 0),
            })
            .collect()
    }

    fn issue(attr: &str, reason: &str) -> OracleIssue {
        OracleIssue {
            attribute: Some(attr.into()),
            reason: Some(reason.into()),
            suggestion: Some("birthDate".into()),
            ..OracleIssue::default()
        }
    }

    #[test]
    fn batches_and_anchors() {
        let oracle = ScriptedOracle::new()
            .answer(vec![issue("attr1", "Fecha descrita como saldo")])
            .answer(vec![issue("attr2", "Todo es válido")]);
        let markers = OracleConfig::default().benign_markers;
        let advisor = SemanticAdvisor::new(&oracle, 2, &markers);

        let f = advisor.attribute_findings("Hoja2", AttributeContext::Backend, &candidates(3));
        assert_eq!(oracle.requests().len(), 2);
        assert_eq!(f.len(), 1);
        assert_eq!(f[0].category, Category::SemanticBian);
        assert_eq!(f[0].cell, Some(CellRef::new(2, 0)));
        assert_eq!(f[0].message, "Semántica: Fecha descrita como saldo. Sugerencia: birthDate");
        assert!(!f[0].is_blocking());
    }

    #[test]
    fn failures_are_swallowed() {
        let oracle = ScriptedOracle::new().fail("timeout");
        let markers = Vec::new();
        let advisor = SemanticAdvisor::new(&oracle, 40, &markers);
        assert!(advisor
            .attribute_findings("Contrato", AttributeContext::Contract, &candidates(1))
            .is_empty());
    }

    #[test]
    fn status_issue_anchored_at_entry() {
        let summary = StatusSummary {
            header: CellRef::new(10, 0),
            entries: vec![SummaryEntry {
                code: 200,
                alias: "OK".into(),
                description: "Error interno del servidor".into(),
                cell: CellRef::new(11, 0),
            }],
        };
        let oracle = ScriptedOracle::new().answer(vec![OracleIssue {
            code: Some(serde_json::json!("200")),
            message: Some("Un 200 descrito como error".into()),
            ..OracleIssue::default()
        }]);
        let advisor = SemanticAdvisor::new(&oracle, 40, &[]);
        let f = advisor.status_findings("Contrato", &summary);
        assert_eq!(f.len(), 1);
        assert_eq!(f[0].attribute, "StatusCode 200");
        assert_eq!(f[0].cell, Some(CellRef::new(11, 0)));
    }
}
