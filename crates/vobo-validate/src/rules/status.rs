use vobo_core::{Category, Finding, TypeFamily};
use vobo_extract::{ContractFacts, StatusBlock};

use crate::input::ValidateInput;
use crate::rule::Rule;

const REQUIRED_FIELDS: [&str; 3] = ["code", "message", "description"];

fn is_error_code(code: u16) -> bool {
    (400..600).contains(&code)
}

/// Summary table against detail blocks, plus fixed-code semantics.
pub struct StatusCodeRule;

impl StatusCodeRule {
    fn error_block(&self, c: &ContractFacts, block: &StatusBlock) -> Vec<Finding> {
        let code = block.code;
        let mut out = Vec::new();

        let missing: Vec<&str> = REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|f| block.attribute(f).is_none())
            .collect();
        if !missing.is_empty() {
            out.push(
                Finding::error(
                    self.category(),
                    &c.sheet,
                    format!("StatusCode {code}"),
                    format!("StatusCode {code}: faltan los campos obligatorios {}", missing.join(", ")),
                )
                .at(Some(block.cell))
                .blocking(true),
            );
        }

        for field in REQUIRED_FIELDS {
            let Some(attr) = block.attribute(field) else {
                continue;
            };
            let mut problems = Vec::new();
            if attr.type_family() != TypeFamily::Text {
                problems.push(format!(
                    "tipo '{}' en lugar de String",
                    attr.type_raw.as_deref().unwrap_or("sin tipo")
                ));
            }
            if attr.mandatory != Some(true) {
                problems.push("no está marcado como obligatorio".to_string());
            }
            if !attr.direction.is_some_and(|d| d.is_output()) {
                problems.push("no está marcado como salida".to_string());
            }
            if problems.is_empty() {
                continue;
            }
            out.push(
                Finding::error(
                    self.category(),
                    &c.sheet,
                    field,
                    format!(
                        "StatusCode {code}: el campo '{field}' debe ser String, obligatorio y de salida ({})",
                        problems.join("; ")
                    ),
                )
                .at(Some(attr.cell))
                .blocking(false),
            );
        }
        out
    }
}

impl Rule for StatusCodeRule {
    fn id(&self) -> &str {
        "status_code"
    }

    fn category(&self) -> Category {
        Category::StatusCode
    }

    fn eval(&self, input: &ValidateInput<'_>) -> Vec<Finding> {
        let Some(c) = input.contract_sheet() else {
            return vec![];
        };
        let status = &c.status;
        let mut out = Vec::new();

        if let Some(summary) = &status.summary {
            for entry in summary.entries.iter().filter(|e| is_error_code(e.code)) {
                if status.block(entry.code).is_none() {
                    out.push(
                        Finding::error(
                            self.category(),
                            &c.sheet,
                            format!("StatusCode {}", entry.code),
                            format!(
                                "StatusCode {} declarado en la tabla Http Status Code pero no definido en la hoja",
                                entry.code
                            ),
                        )
                        .at(Some(entry.cell))
                        .blocking(true),
                    );
                }
            }
        }

        for block in &status.blocks {
            let code = block.code;
            match code {
                204 if !block.attributes.is_empty() => out.push(
                    Finding::error(
                        self.category(),
                        &c.sheet,
                        "StatusCode 204",
                        format!(
                            "StatusCode 204: 204 No Content debe estar vacío ({} atributos definidos)",
                            block.attributes.len()
                        ),
                    )
                    .at(Some(block.cell))
                    .blocking(true),
                ),
                200 if block.attributes.is_empty() => out.push(
                    Finding::error(
                        self.category(),
                        &c.sheet,
                        "StatusCode 200",
                        "StatusCode 200: 200 OK debe definir al menos un atributo de respuesta",
                    )
                    .at(Some(block.cell))
                    .blocking(true),
                ),
                c4xx if is_error_code(c4xx) => {
                    out.extend(self.error_block(c, block));
                    if let Some(summary) = status.summary.as_ref().filter(|s| !s.contains(code)) {
                        out.push(
                            Finding::warn(
                                Category::Consistency,
                                &c.sheet,
                                format!("StatusCode {code}"),
                                format!(
                                    "StatusCode {code} definido en la hoja pero ausente de la tabla Http Status Code ({})",
                                    summary.header
                                ),
                            )
                            .at(Some(block.cell)),
                        );
                    }
                }
                _ => {}
            }
        }

        if status.is_present() && !status.blocks.iter().any(|b| (200..300).contains(&b.code)) {
            out.push(Finding::warn(
                self.category(),
                &c.sheet,
                "StatusCode 2xx",
                "No se encontró ningún bloque StatusCode 2xx que defina la respuesta exitosa",
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::contract;
    use vobo_core::Level;

    fn eval(rows: Vec<Vec<&str>>) -> Vec<Finding> {
        let c = contract(rows);
        StatusCodeRule.eval(&ValidateInput::contract(&c))
    }

    #[test]
    fn non_empty_204_blocks() {
        let f = eval(vec![
            vec!["Http Status Code", "Alias", "Descripción"],
            vec!["204", "No Content", "Sin contenido"],
            vec!["StatusCode = 204"],
            vec!["accountId", "String", "Si", "Salida"],
        ]);
        assert_eq!(f.len(), 1);
        assert_eq!(f[0].level, Level::Error);
        assert!(f[0].is_blocking());
        assert!(f[0].message.contains("204 No Content debe estar vacío"));
    }

    #[test]
    fn column_header_rows_are_not_block_content() {
        let f = eval(vec![
            vec!["StatusCode = 204"],
            vec!["Campo", "Tipo", "Obligatoriedad", "Entrada/Salida"],
        ]);
        assert!(f.iter().all(|x| !x.message.contains("debe estar vacío")), "{f:?}");

        let f = eval(vec![
            vec!["StatusCode = 200"],
            vec!["Nombre", "Tipo", "Obligatoriedad", "Entrada/Salida"],
            vec!["StatusCode = 204"],
        ]);
        assert_eq!(f.len(), 1);
        assert!(f[0].message.contains("200 OK"));
    }

    #[test]
    fn missing_description_is_listed() {
        let f = eval(vec![
            vec!["Http Status Code", "Alias"],
            vec!["200", "OK"],
            vec!["400", "Bad Request"],
            vec!["StatusCode = 200"],
            vec!["accountId", "String", "Si", "Salida"],
            vec!["StatusCode = 400"],
            vec!["code", "String", "Si", "Salida"],
            vec!["message", "String", "Si", "Salida"],
        ]);
        assert_eq!(f.len(), 1);
        assert_eq!(f[0].blocks_vobo, Some(true));
        assert!(f[0].message.ends_with("faltan los campos obligatorios description"));
    }

    #[test]
    fn declared_error_without_block() {
        let f = eval(vec![
            vec!["Http Status Code", "Alias"],
            vec!["200", "OK"],
            vec!["500", "Internal"],
            vec!["StatusCode = 200"],
            vec!["id", "String"],
        ]);
        assert_eq!(f.len(), 1);
        assert_eq!(f[0].attribute, "StatusCode 500");
        assert_eq!(f[0].cell.map(|c| c.to_string()).as_deref(), Some("A3"));
    }

    #[test]
    fn field_shape_errors_do_not_force_block_flag() {
        let f = eval(vec![
            vec!["StatusCode = 200"],
            vec!["id", "String"],
            vec!["StatusCode = 404"],
            vec!["code", "Integer", "Si", "Salida"],
            vec!["message", "String", "No", "Salida"],
            vec!["description", "String", "Si", "Entrada"],
        ]);
        assert_eq!(f.len(), 3);
        assert!(f.iter().all(|x| x.level == Level::Error && x.blocks_vobo == Some(false)));
        assert_eq!(f[0].attribute, "code");
        assert!(f[0].message.contains("tipo 'Integer'"));
    }

    #[test]
    fn empty_200_and_missing_2xx() {
        let f = eval(vec![vec!["StatusCode = 200"], vec![], vec!["StatusCode = 201"]]);
        assert_eq!(f.len(), 1);
        assert!(f[0].message.contains("200 OK"));

        let f = eval(vec![
            vec!["StatusCode = 500"],
            vec!["code", "String", "Si", "Salida"],
            vec!["message", "String", "Si", "Salida"],
            vec!["description", "String", "Si", "Salida"],
        ]);
        assert_eq!(f.len(), 1);
        assert_eq!(f[0].level, Level::Warn);
        assert_eq!(f[0].attribute, "StatusCode 2xx");
    }

    #[test]
    fn block_missing_from_summary() {
        let f = eval(vec![
            vec!["Http Status Code"],
            vec!["200"],
            vec!["StatusCode = 200"],
            vec!["id", "String"],
            vec!["StatusCode = 409"],
            vec!["code", "String", "Si", "Salida"],
            vec!["message", "String", "Si", "Salida"],
            vec!["description", "String", "Si", "Salida"],
        ]);
        assert_eq!(f.len(), 1);
        assert_eq!(f[0].category, Category::Consistency);
    }

    #[test]
    fn no_status_section_is_silent() {
        assert!(eval(vec![vec!["Atributo", "Tipo"], vec!["id", "String"]]).is_empty());
    }
}
