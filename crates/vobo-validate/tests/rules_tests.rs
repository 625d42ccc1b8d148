use vobo_core::{Category, Level};
use vobo_extract::Extractor;
use vobo_sheet::Grid;
use vobo_validate::{aggregate, default_rules, run_rules, ValidateInput, VerdictPolicy};

fn contract() -> Grid {
    Grid::from_rows(vec![
        vec!["Atributo", "Tipo", "Obligatoriedad", "Descripción"],
        vec!["accountId", "String", "Si", "Número de cuenta"],
        vec!["amount", "Number", "Si", "Importe"],
        vec!["Http Status Code", "Alias", "Descripción"],
        vec!["201", "Created", "Alta realizada"],
        vec!["StatusCode = 201"],
        vec!["operationId", "String", "Si", "Salida"],
    ])
}

fn mapping(sql: &str, extra: Vec<Vec<&str>>) -> Grid {
    let mut rows = vec![
        vec!["Mapeo transacción"],
        vec!["Atributo", "Tipo", "", "Atributo", "Tipo de dato"],
        vec!["Backend - Input"],
        vec!["accountId", "String", "", "accountId", "VARCHAR2(20)"],
        vec!["amount", "Number", "", "amount", "NUMBER(12,2)"],
    ];
    rows.extend(extra);
    rows.push(vec!["Servicio"]);
    rows.push(vec![sql]);
    Grid::from_rows(rows)
}

fn run(sheet: &Grid) -> Vec<vobo_core::Finding> {
    let ex = Extractor::default();
    let c = ex.contract_facts("Contrato", &contract());
    let m = ex.mapping_facts("Alta", sheet);
    let rules = default_rules();
    let mut findings = run_rules(&rules, &ValidateInput::contract(&c));
    findings.extend(run_rules(&rules, &ValidateInput::mapping(&m, Some(&c))));
    findings
}

#[test]
fn test_clean_workbook_passes() {
    let f = run(&mapping("INSERT INTO t (accountId, amount) VALUES (?,?)", vec![]));
    assert!(f.is_empty(), "{f:?}");
    let v = aggregate(f, &VerdictPolicy::default());
    assert!(v.vobo);
    assert_eq!(v.message, "La matriz de transformación ha aprobado el VoBo");
}

#[test]
fn test_missing_insert_column_warns_once() {
    let f = run(&mapping("INSERT INTO t (amount) VALUES (?)", vec![]));
    let sql: Vec<_> = f.iter().filter(|x| x.category == Category::SqlConsistency).collect();
    assert_eq!(sql.len(), 1);
    assert!(sql[0].message.contains("accountid"));
    assert_eq!(sql[0].level, Level::Warn);
}

#[test]
fn test_array_name_with_text_type() {
    let f = run(&mapping(
        "INSERT INTO t (accountId, amount, items) VALUES (?,?,?)",
        vec![vec!["items", "Array", "", "items[]", "String"]],
    ));
    let syntax: Vec<_> = f.iter().filter(|x| x.category == Category::Syntax).collect();
    assert_eq!(syntax.len(), 1);
    assert!(syntax[0].message.contains("Array"));
    assert!(aggregate(f, &VerdictPolicy::default()).vobo);
}

#[test]
fn test_type_mismatch_against_contract() {
    let sheet = Grid::from_rows(vec![
        vec!["Atributo", "Tipo de dato"],
        vec!["Backend - Input"],
        vec!["amount", "VARCHAR2(10)"],
        vec!["Servicio"],
        vec!["INSERT INTO t (amount) VALUES (?)"],
    ]);
    let f = run(&sheet);
    assert_eq!(f.len(), 1);
    assert_eq!(f[0].category, Category::ContractMismatch);
    assert_eq!(f[0].blocks_vobo, Some(false));
}
