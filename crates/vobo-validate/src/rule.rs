use vobo_core::{Category, Finding};

use crate::input::ValidateInput;
use crate::rules::{
    ArraySyntaxRule, ContractDefinitionRule, DuplicateAttributeRule, HeadersRule, SqlConsistencyRule,
    StatusCodeRule, TypeFamilyRule,
};

pub trait Rule: Send + Sync {
    fn id(&self) -> &str;
    fn category(&self) -> Category;
    fn eval(&self, input: &ValidateInput<'_>) -> Vec<Finding>;
}

/// Deterministic rules in execution order. Rules ignore inputs they do not apply to.
pub fn default_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(HeadersRule),
        Box::new(ContractDefinitionRule),
        Box::new(DuplicateAttributeRule),
        Box::new(ArraySyntaxRule),
        Box::new(TypeFamilyRule),
        Box::new(SqlConsistencyRule),
        Box::new(StatusCodeRule),
    ]
}

/// Run every rule over one input, concatenating findings in rule order.
pub fn run_rules(rules: &[Box<dyn Rule>], input: &ValidateInput<'_>) -> Vec<Finding> {
    rules
        .iter()
        .flat_map(|r| {
            let found = r.eval(input);
            if !found.is_empty() {
                tracing::debug!(rule = r.id(), findings = found.len(), "rule fired");
            }
            found
        })
        .collect()
}
