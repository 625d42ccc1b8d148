use vobo_core::{Category, Finding};
use vobo_extract::AttributeSet;

use crate::input::ValidateInput;
use crate::rule::Rule;

/// Every mandatory contract attribute declares a type. Untyped rows without a
/// mandatory flag are grouping labels ("Request", "Headers", object parents).
pub struct ContractDefinitionRule;

impl Rule for ContractDefinitionRule {
    fn id(&self) -> &str {
        "contract_definition"
    }

    fn category(&self) -> Category {
        Category::Contract
    }

    fn eval(&self, input: &ValidateInput<'_>) -> Vec<Finding> {
        let Some(c) = input.contract_sheet() else {
            return vec![];
        };
        let Some(attrs) = c.attributes.as_ref() else {
            return vec![];
        };
        attrs
            .iter()
            .filter(|a| a.type_raw.is_empty() && a.mandatory)
            .map(|a| {
                Finding::error(
                    self.category(),
                    &c.sheet,
                    &a.name,
                    format!("El atributo '{}' del contrato no declara tipo de dato", a.name),
                )
                .at(Some(a.cell))
                .blocking(true)
            })
            .collect()
    }
}

/// A normalized name declared twice in one section.
pub struct DuplicateAttributeRule;

impl DuplicateAttributeRule {
    fn findings(&self, sheet: &str, set: &AttributeSet) -> Vec<Finding> {
        set.duplicates()
            .iter()
            .map(|dup| {
                let first = set
                    .cell_of(&dup.normalized_name)
                    .map(|c| c.to_string())
                    .unwrap_or_default();
                Finding::warn(
                    self.category(),
                    sheet,
                    &dup.name,
                    format!("El atributo '{}' está declarado más de una vez (primera aparición en {first})", dup.name),
                )
                .at(Some(dup.cell))
            })
            .collect()
    }
}

impl Rule for DuplicateAttributeRule {
    fn id(&self) -> &str {
        "duplicate_attribute"
    }

    fn category(&self) -> Category {
        Category::Duplicate
    }

    fn eval(&self, input: &ValidateInput<'_>) -> Vec<Finding> {
        if let Some(m) = input.mapping {
            return m.all_attributes().flat_map(|s| self.findings(&m.sheet, s)).collect();
        }
        match input.contract_sheet() {
            Some(c) => c
                .attributes
                .as_ref()
                .map(|s| self.findings(&c.sheet, s))
                .unwrap_or_default(),
            None => vec![],
        }
    }
}
