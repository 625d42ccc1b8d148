use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use vobo_core::{Finding, Verdict};

pub const MSG_APPROVED: &str = "La matriz de transformación ha aprobado el VoBo";
pub const MSG_APPROVED_WITH_NOTES: &str = "La matriz de transformación ha aprobado el VoBo con observaciones";
pub const MSG_REJECTED: &str = "La matriz de transformación no ha aprobado el VoBo";

fn msg_too_many(count: usize, max: usize) -> String {
    format!("La matriz de transformación no ha aprobado el VoBo por exceso de hallazgos ({count} > {max})")
}

/// `[policy]` section: the "too many warnings" escalation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct VerdictPolicy {
    pub max_findings: usize,
    pub enforce_max_findings: bool,
}

impl Default for VerdictPolicy {
    fn default() -> Self {
        Self {
            max_findings: 3,
            enforce_max_findings: true,
        }
    }
}

impl VerdictPolicy {
    pub fn exceeded(&self, count: usize) -> bool {
        self.enforce_max_findings && count > self.max_findings
    }
}

/// Drop repeated findings by (sheet, attribute, category, level, message),
/// keeping the first occurrence and the original order.
pub fn dedupe(findings: Vec<Finding>) -> Vec<Finding> {
    let mut seen = HashSet::new();
    findings.into_iter().filter(|f| seen.insert(f.key())).collect()
}

pub fn aggregate(findings: Vec<Finding>, policy: &VerdictPolicy) -> Verdict {
    let details = dedupe(findings);
    let blocking = details.iter().filter(|f| f.is_blocking()).count();

    let (vobo, message) = if blocking > 0 {
        (false, MSG_REJECTED.to_string())
    } else if policy.exceeded(details.len()) {
        (false, msg_too_many(details.len(), policy.max_findings))
    } else if !details.is_empty() {
        (true, MSG_APPROVED_WITH_NOTES.to_string())
    } else {
        (true, MSG_APPROVED.to_string())
    };

    tracing::info!(vobo, findings = details.len(), blocking, "verdict computed");
    Verdict { vobo, message, details }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vobo_core::Category;

    fn warns(n: usize) -> Vec<Finding> {
        (0..n)
            .map(|i| Finding::warn(Category::Syntax, "Hoja2", format!("a{i}"), "m"))
            .collect()
    }

    #[test]
    fn empty_is_approved() {
        let v = aggregate(vec![], &VerdictPolicy::default());
        assert!(v.vobo);
        assert_eq!(v.message, MSG_APPROVED);
    }

    #[test]
    fn threshold_property() {
        let policy = VerdictPolicy::default();
        for n in 1..=3 {
            let v = aggregate(warns(n), &policy);
            assert!(v.vobo, "{n} warnings must pass");
            assert_eq!(v.message, MSG_APPROVED_WITH_NOTES);
        }
        for n in 4..=8 {
            let v = aggregate(warns(n), &policy);
            assert!(!v.vobo, "{n} warnings must fail");
            assert!(v.message.contains("exceso de hallazgos"));
        }
    }

    #[test]
    fn threshold_can_be_disabled_or_moved() {
        let off = VerdictPolicy {
            enforce_max_findings: false,
            ..VerdictPolicy::default()
        };
        assert!(aggregate(warns(10), &off).vobo);

        let five = VerdictPolicy {
            max_findings: 5,
            ..VerdictPolicy::default()
        };
        assert!(aggregate(warns(5), &five).vobo);
        assert_eq!(aggregate(warns(6), &five).message, msg_too_many(6, 5));
    }

    #[test]
    fn blocking_monotonicity() {
        let policy = VerdictPolicy::default();
        for n in 0..=3 {
            let mut f = warns(n);
            f.push(Finding::error(Category::StatusCode, "Contrato", "StatusCode 400", "x").blocking(false));
            let v = aggregate(f, &policy);
            assert!(!v.vobo);
            assert_eq!(v.message, MSG_REJECTED);
        }
    }

    #[test]
    fn explicit_blocking_warn_blocks() {
        let f = vec![Finding::warn(Category::Headers, "Hoja2", "x", "m").blocking(true)];
        assert!(!aggregate(f, &VerdictPolicy::default()).vobo);
    }

    #[test]
    fn dedupe_keeps_first_and_order() {
        let a = Finding::warn(Category::Syntax, "s", "a", "m").at(Some(vobo_core::CellRef::new(1, 1)));
        let b = Finding::warn(Category::Syntax, "s", "b", "m");
        let a2 = Finding::warn(Category::Syntax, "s", "a", "m").at(Some(vobo_core::CellRef::new(9, 9)));
        let out = dedupe(vec![a.clone(), b.clone(), a2]);
        assert_eq!(out, vec![a, b]);
    }

    #[test]
    fn duplicates_do_not_count_toward_threshold() {
        let mut f = warns(3);
        f.extend(warns(3));
        let v = aggregate(f, &VerdictPolicy::default());
        assert!(v.vobo);
        assert_eq!(v.details.len(), 3);
    }

    #[test]
    fn policy_from_toml() {
        let p: VerdictPolicy = toml::from_str("max_findings = 10").unwrap();
        assert_eq!(p.max_findings, 10);
        assert!(p.enforce_max_findings);
    }
}
