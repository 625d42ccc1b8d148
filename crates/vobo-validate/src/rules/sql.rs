use std::collections::BTreeSet;

use vobo_core::{Category, CellRef, Finding, StatementKind};
use vobo_extract::{AttributeSet, MappingFacts};

use crate::input::ValidateInput;
use crate::rule::Rule;

const ATTRIBUTE: &str = "SQL Consistency";

/// Declared Backend sections against the columns the embedded SQL touches.
/// Reads compare Backend-Output; writes compare Backend-Input.
pub struct SqlConsistencyRule;

impl SqlConsistencyRule {
    fn warn(&self, m: &MappingFacts, cell: Option<CellRef>, message: String) -> Finding {
        Finding::warn(self.category(), &m.sheet, ATTRIBUTE, message).at(cell)
    }

    /// Names of `set` absent from the SQL, sorted, and the cell of the first
    /// one in sheet order.
    fn missing(m: &MappingFacts, set: &AttributeSet) -> (BTreeSet<String>, Option<CellRef>) {
        let absent: Vec<_> = set.iter().filter(|a| !m.sql.contains(&a.normalized_name)).collect();
        let anchor = absent.first().map(|a| a.cell);
        (absent.into_iter().map(|a| a.normalized_name.clone()).collect(), anchor)
    }
}

fn join(names: &BTreeSet<String>) -> String {
    names.iter().cloned().collect::<Vec<_>>().join(", ")
}

impl Rule for SqlConsistencyRule {
    fn id(&self) -> &str {
        "sql_consistency"
    }

    fn category(&self) -> Category {
        Category::SqlConsistency
    }

    fn eval(&self, input: &ValidateInput<'_>) -> Vec<Finding> {
        let Some(m) = input.mapping else {
            return vec![];
        };
        let empty = AttributeSet::new();
        let inputs = m.input.as_ref().unwrap_or(&empty);
        let outputs = m.output.as_ref().unwrap_or(&empty);
        let verb = m.sql.verb.map(|v| v.as_str()).unwrap_or("SQL");

        let mut out = Vec::new();
        match m.sql.statement_kind {
            StatementKind::Unknown => {}
            StatementKind::Select => {
                if outputs.is_empty() {
                    out.push(self.warn(
                        m,
                        None,
                        "La consulta SELECT no tiene atributos declarados en Backend - Output".to_string(),
                    ));
                } else {
                    let (missing, anchor) = Self::missing(m, outputs);
                    if !missing.is_empty() {
                        out.push(self.warn(
                            m,
                            anchor,
                            format!(
                                "Atributos de Backend - Output no presentes en la consulta SELECT: {}",
                                join(&missing)
                            ),
                        ));
                    }
                }
            }
            StatementKind::Insert => {
                if !outputs.is_empty() {
                    let declared: BTreeSet<String> = outputs.names();
                    out.push(self.warn(
                        m,
                        outputs.iter().next().map(|a| a.cell),
                        format!(
                            "La sentencia {verb} no devuelve datos pero declara atributos en Backend - Output: {}",
                            join(&declared)
                        ),
                    ));
                }
                let (missing, anchor) = Self::missing(m, inputs);
                if !missing.is_empty() {
                    out.push(self.warn(
                        m,
                        anchor,
                        format!(
                            "Atributos de Backend - Input no referenciados en la sentencia {verb}: {}",
                            join(&missing)
                        ),
                    ));
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::mapping;

    fn sheet(output: Vec<Vec<&'static str>>, sql: &'static str) -> MappingFacts {
        let mut rows = vec![
            vec!["", "", "", "Atributo", "Tipo de dato"],
            vec!["Backend - Input"],
            vec!["", "", "", "accountId", "VARCHAR2(20)"],
            vec!["Backend - Output"],
        ];
        rows.extend(output);
        rows.push(vec!["Servicio"]);
        rows.push(vec![sql]);
        mapping(rows)
    }

    fn eval(m: &MappingFacts) -> Vec<Finding> {
        SqlConsistencyRule.eval(&ValidateInput::mapping(m, None))
    }

    #[test]
    fn insert_covering_inputs_is_clean() {
        let m = sheet(vec![], "INSERT INTO t (accountId, amount) VALUES (?,?)");
        assert!(eval(&m).is_empty());
    }

    #[test]
    fn insert_missing_input_names_it() {
        let m = sheet(vec![], "INSERT INTO t (amount) VALUES (?)");
        let f = eval(&m);
        assert_eq!(f.len(), 1);
        assert_eq!(f[0].category, Category::SqlConsistency);
        assert!(f[0].message.ends_with(": accountid"));
        assert_eq!(f[0].cell.map(|c| c.to_string()).as_deref(), Some("D3"));
    }

    #[test]
    fn update_with_outputs_warns_and_names_verb() {
        let m = sheet(
            vec![vec!["", "", "", "status", "CHAR(1)"]],
            "UPDATE CUENTAS SET accountId = ? WHERE amount > 0",
        );
        let f = eval(&m);
        assert_eq!(f.len(), 1);
        assert!(f[0].message.contains("UPDATE"));
        assert!(f[0].message.contains("status"));
    }

    #[test]
    fn select_without_outputs() {
        let m = sheet(vec![], "SELECT saldo FROM CUENTAS WHERE accountId = ?");
        let f = eval(&m);
        assert_eq!(f.len(), 1);
        assert!(f[0].message.contains("Backend - Output"));
    }

    #[test]
    fn select_missing_outputs_listed_sorted() {
        let m = sheet(
            vec![
                vec!["", "", "", "moneda", "CHAR(3)"],
                vec!["", "", "", "saldo", "NUMBER"],
                vec!["", "", "", "bloqueo", "CHAR(1)"],
            ],
            "SELECT saldo FROM CUENTAS",
        );
        let f = eval(&m);
        assert_eq!(f.len(), 1);
        assert!(f[0].message.ends_with(": bloqueo, moneda"));
        assert_eq!(f[0].cell.map(|c| c.to_string()).as_deref(), Some("D5"));
    }

    #[test]
    fn unknown_statement_is_silent() {
        let m = sheet(vec![], "Consulta vía servicio web");
        assert!(eval(&m).is_empty());
    }
}
