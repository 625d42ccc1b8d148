use vobo_core::{Category, Finding, TypeFamily};

use crate::input::ValidateInput;
use crate::rule::Rule;

/// `[]` in the name and an Array type must go together.
pub struct ArraySyntaxRule;

impl Rule for ArraySyntaxRule {
    fn id(&self) -> &str {
        "array_syntax"
    }

    fn category(&self) -> Category {
        Category::Syntax
    }

    fn eval(&self, input: &ValidateInput<'_>) -> Vec<Finding> {
        let Some(m) = input.mapping else {
            return vec![];
        };
        let mut out = Vec::new();
        for attr in m.all_attributes().flat_map(|s| s.iter()) {
            let is_array = attr.type_family == TypeFamily::Array;
            let message = match (attr.has_array_suffix(), is_array) {
                (true, false) => format!(
                    "El atributo '{}' usa la notación de lista '[]' pero su tipo es '{}'. Tipo recomendado: Array",
                    attr.name,
                    display_type(&attr.type_raw)
                ),
                (false, true) => format!(
                    "El atributo '{}' es de tipo '{}' pero su nombre no termina en '[]'. Nombre recomendado: '{}[]'",
                    attr.name, attr.type_raw, attr.name
                ),
                _ => continue,
            };
            out.push(Finding::warn(self.category(), &m.sheet, &attr.name, message).at(Some(attr.cell)));
        }
        out
    }
}

/// Backend types must belong to the same family as the contract type.
pub struct TypeFamilyRule;

impl TypeFamilyRule {
    fn tolerated(contract: TypeFamily, backend: TypeFamily) -> bool {
        contract == TypeFamily::Object && backend == TypeFamily::Text
    }
}

impl Rule for TypeFamilyRule {
    fn id(&self) -> &str {
        "type_family"
    }

    fn category(&self) -> Category {
        Category::ContractMismatch
    }

    fn eval(&self, input: &ValidateInput<'_>) -> Vec<Finding> {
        let (Some(m), Some(contract)) = (input.mapping, input.contract) else {
            return vec![];
        };
        let mut out = Vec::new();
        for attr in m.all_attributes().flat_map(|s| s.iter()) {
            let Some(declared) = contract.attribute(&attr.normalized_name) else {
                continue;
            };
            let (cf, bf) = (declared.type_family, attr.type_family);
            if !cf.is_known() || !bf.is_known() || cf == bf || Self::tolerated(cf, bf) {
                continue;
            }
            let message = format!(
                "Tipo incompatible con el contrato: backend '{}' ({bf}) vs contrato '{}' ({cf}). Tipo sugerido: {}",
                attr.type_raw,
                declared.type_raw,
                cf.suggested_type()
            );
            out.push(
                Finding::warn(self.category(), &m.sheet, &attr.name, message)
                    .at(Some(attr.cell))
                    .blocking(false),
            );
        }
        out
    }
}

/// Section markers without a locatable header row.
pub struct HeadersRule;

impl Rule for HeadersRule {
    fn id(&self) -> &str {
        "headers"
    }

    fn category(&self) -> Category {
        Category::Headers
    }

    fn eval(&self, input: &ValidateInput<'_>) -> Vec<Finding> {
        match input.mapping {
            Some(m) if m.has_markers && !m.header_found() => vec![Finding::warn(
                self.category(),
                &m.sheet,
                "Encabezados",
                "No se encontró la fila de encabezados (Atributo / Tipo de dato) de las secciones Backend",
            )],
            _ => vec![],
        }
    }
}

fn display_type(raw: &str) -> &str {
    if raw.trim().is_empty() {
        "sin tipo"
    } else {
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{contract, mapping};

    fn body(rows: Vec<Vec<&str>>) -> vobo_extract::MappingFacts {
        let mut all = vec![vec!["Atributo", "Tipo de dato"]];
        all.extend(rows);
        mapping(all)
    }

    #[test]
    fn array_syntax_is_symmetric() {
        let m = body(vec![
            vec!["items[]", "String"],
            vec!["tags", "List<String>"],
            vec!["lines[]", "Array"],
            vec!["name", "String"],
        ]);
        let f = ArraySyntaxRule.eval(&ValidateInput::mapping(&m, None));
        assert_eq!(f.len(), 2);
        assert_eq!(f[0].attribute, "items[]");
        assert!(f[0].message.contains("Tipo recomendado: Array"));
        assert_eq!(f[0].cell.map(|c| c.to_string()).as_deref(), Some("A2"));
        assert_eq!(f[1].attribute, "tags");
        assert!(f.iter().all(|x| x.category == Category::Syntax && !x.is_blocking()));
    }

    #[test]
    fn type_family_mismatch_and_tolerance() {
        let c = contract(vec![
            vec!["Atributo", "Tipo"],
            vec!["accountId", "String"],
            vec!["amount", "Number"],
            vec!["payload", "Object"],
            vec!["openedAt", "Date"],
        ]);
        let m = body(vec![
            vec!["ACCOUNT_ID", "NUMBER(10)"],
            vec!["AMOUNT", "NUMBER(12,2)"],
            vec!["PAYLOAD", "CLOB"],
            vec!["OPENED_AT", "RAW"],
            vec!["EXTRA", "VARCHAR2(2)"],
        ]);
        let f = TypeFamilyRule.eval(&ValidateInput::mapping(&m, Some(&c)));
        assert_eq!(f.len(), 1);
        assert_eq!(f[0].attribute, "ACCOUNT_ID");
        assert_eq!(f[0].blocks_vobo, Some(false));
        assert!(f[0].message.contains("Tipo sugerido: String"));
    }

    #[test]
    fn headers_warn_only_with_markers() {
        let with_markers = mapping(vec![vec!["Backend - Input"], vec!["accountId"]]);
        assert_eq!(HeadersRule.eval(&ValidateInput::mapping(&with_markers, None)).len(), 1);

        let plain = mapping(vec![vec!["Notas"]]);
        assert!(HeadersRule.eval(&ValidateInput::mapping(&plain, None)).is_empty());
    }
}
