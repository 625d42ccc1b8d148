//! Lexical extraction of column references from hand-written SQL.
//!
//! Handles the four statement shapes found in mapping sheets: `INSERT INTO t
//! (cols) VALUES`, `UPDATE t SET a = ..`, `DELETE FROM t WHERE ..` and
//! `SELECT cols FROM`. Subqueries, CTEs, CASE expressions, multi-statement
//! batches and joins with ambiguous column ownership are not understood.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use vobo_core::{normalize_name, SqlReferenceSet, SqlVerb};
use vobo_sheet::Grid;

use crate::config::SectionMarkers;

static INSERT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)\binsert\s+into\s+[^()]+?\((.*?)\)\s*values\b").expect("insert regex"));

static UPDATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)\bupdate\s+\S+\s+set\s+(.*)").expect("update regex"));

static DELETE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)\bdelete\s+from\s+\S+\s+where\s+(.*)").expect("delete regex"));

static SELECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)\bselect\s+(.*?)\s+from\b").expect("select regex"));

static STATEMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)\b(?:insert\s+into|update\s+\S+\s+set|delete\s+from|select\s+.+?\s+from)\b")
        .expect("statement regex")
});

static WHERE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)\s+where\s").expect("where regex"));

static ASSIGN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([\w`"\[\].]+)\s*=[^=]"#).expect("assignment regex")
});

static PREDICATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)([\w`"\[\].]+)(?:\s*(?:<>|!=|>=|<=|=|>|<)|\s+(?:not\s+)?(?:like|in|between)\b)"#)
        .expect("predicate regex")
});

static PROJECTION_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:distinct|all|top\s+\d+)\s+").expect("prefix regex"));

static ALIAS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)\s+as\s+.*$").expect("alias regex"));

static CALL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(([^()]*)\)").expect("call regex"));

static IDENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}_][\p{L}\p{N}_]*$").expect("identifier regex"));

const RESERVED: &[&str] = &[
    "select", "from", "where", "and", "or", "not", "null", "is", "in", "like", "between", "exists", "insert",
    "into", "values", "update", "set", "delete", "join", "inner", "left", "right", "outer", "full", "cross",
    "on", "as", "group", "order", "by", "limit", "offset", "distinct", "count", "sum", "avg", "min", "max",
    "top", "all", "union", "having", "asc", "desc", "with", "case", "when", "then", "else", "end", "default",
    "true", "false", "sysdate", "current_date", "current_timestamp", "nvl", "coalesce",
];

/// True when `text` holds one of the supported statement shapes.
pub fn contains_sql_statement(text: &str) -> bool {
    STATEMENT_RE.is_match(text)
}

/// Classify the statement in `text` and collect its normalized column names.
/// INSERT wins over UPDATE, UPDATE over DELETE, DELETE over SELECT.
pub fn extract_sql_references(text: &str) -> SqlReferenceSet {
    if let Some(c) = INSERT_RE.captures(text) {
        let cols = c[1].split(',').filter_map(clean_identifier);
        return SqlReferenceSet::new(SqlVerb::Insert, normalized(cols));
    }
    if let Some(c) = UPDATE_RE.captures(text) {
        let set_clause = until_statement_end(&c[1]);
        let set_clause = match WHERE_RE.find(set_clause) {
            Some(m) => &set_clause[..m.start()],
            None => set_clause,
        };
        let cols = ASSIGN_RE
            .captures_iter(set_clause)
            .filter_map(|c| clean_identifier(&c[1]));
        return SqlReferenceSet::new(SqlVerb::Update, normalized(cols));
    }
    if let Some(c) = DELETE_RE.captures(text) {
        let predicates = until_statement_end(&c[1]);
        let cols = PREDICATE_RE
            .captures_iter(predicates)
            .filter_map(|c| clean_identifier(&c[1]));
        return SqlReferenceSet::new(SqlVerb::Delete, normalized(cols));
    }
    if let Some(c) = SELECT_RE.captures(text) {
        let cols = split_top_level(&c[1]).into_iter().filter_map(projection_column);
        return SqlReferenceSet::new(SqlVerb::Select, normalized(cols));
    }
    SqlReferenceSet::unknown()
}

/// Strip quoting, keep the last dotted segment and drop tokens that cannot be
/// a column name (reserved words, numbers, `foo_` fragments, very short).
pub fn clean_identifier(raw: &str) -> Option<String> {
    let strip = |c: char| c.is_whitespace() || matches!(c, '`' | '"' | '\'' | '[' | ']' | '(' | ')' | ';');
    let trimmed = raw.trim_matches(strip);
    let last = trimmed.rsplit('.').next().unwrap_or("").trim_matches(strip);

    if last.chars().count() < 3
        || last.ends_with('_')
        || last.chars().all(|c| c.is_ascii_digit())
        || !IDENT_RE.is_match(last)
        || RESERVED.contains(&last.to_lowercase().as_str())
    {
        return None;
    }
    Some(last.to_string())
}

fn projection_column(token: &str) -> Option<String> {
    let unprefixed = strip_prefixes(token);
    let unaliased = ALIAS_RE.replace(&unprefixed, "").trim().to_string();
    // innermost call, first argument: `NVL(ROUND(MONTO, 2), 0)` -> `MONTO`
    let expr = match CALL_RE.captures(&unaliased) {
        Some(c) => strip_prefixes(split_top_level(&c[1]).first().copied().unwrap_or("")),
        None => unaliased.clone(),
    };
    // implicit alias: `t.col alias`
    let first = expr.split_whitespace().next().unwrap_or("");
    if first == "*" || first.ends_with(".*") {
        return None;
    }
    clean_identifier(first)
}

/// Comma-separated items outside any parentheses.
fn split_top_level(text: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                items.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    items.push(&text[start..]);
    items
}

fn strip_prefixes(token: &str) -> String {
    let mut t = token.trim().to_string();
    while let Some(end) = PROJECTION_PREFIX_RE.find(&t).map(|m| m.end()) {
        t = t[end..].trim_start().to_string();
    }
    t
}

fn until_statement_end(text: &str) -> &str {
    text.split(';').next().unwrap_or(text)
}

fn normalized(cols: impl Iterator<Item = String>) -> BTreeSet<String> {
    cols.map(|c| normalize_name(&c)).filter(|c| !c.is_empty()).collect()
}

/// SQL text of a mapping sheet: the cell under a column-A service label when
/// it holds a statement, otherwise every non-empty cell joined.
pub fn sql_source(grid: &Grid, markers: &SectionMarkers) -> String {
    let service_row = (0..grid.height()).find(|&r| markers.is_service(grid.cell(r, 0)));
    if let Some(row) = service_row {
        let below = (row + 1..grid.height())
            .map(|r| grid.cell(r, 0).trim())
            .find(|c| !c.is_empty());
        if let Some(sql) = below.filter(|c| contains_sql_statement(c)) {
            return sql.to_string();
        }
    }
    grid.joined_text(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use vobo_core::StatementKind;

    fn cols(set: &SqlReferenceSet) -> Vec<&str> {
        set.columns.iter().map(String::as_str).collect()
    }

    #[test]
    fn insert_columns() {
        let s = extract_sql_references("INSERT INTO t (accountId, amount) VALUES (?,?)");
        assert_eq!(s.statement_kind, StatementKind::Insert);
        assert_eq!(s.verb, Some(SqlVerb::Insert));
        assert_eq!(cols(&s), vec!["accountid", "amount"]);
    }

    #[test]
    fn insert_cleans_quotes_and_schema() {
        let s = extract_sql_references(
            "insert into BANCA.MOVS (\"MOVS\".\"ACCOUNT_ID\", [AMOUNT], `fecha_op`, id, tmp_) values (1,2,3,4,5)",
        );
        assert_eq!(cols(&s), vec!["accountid", "amount", "fechaop"]);
    }

    #[test]
    fn update_takes_set_lhs_only() {
        let s = extract_sql_references("UPDATE CUENTAS SET SALDO = :saldo, FECHA_MOD = SYSDATE WHERE ACCOUNT_ID = :id");
        assert_eq!(s.statement_kind, StatementKind::Insert);
        assert_eq!(s.verb, Some(SqlVerb::Update));
        assert_eq!(cols(&s), vec!["fechamod", "saldo"]);
    }

    #[test]
    fn delete_takes_predicate_lhs() {
        let s = extract_sql_references("DELETE FROM CUENTAS WHERE ACCOUNT_ID = ? AND STATUS <> 'X' AND TIPO IN (1,2);");
        assert_eq!(s.verb, Some(SqlVerb::Delete));
        assert_eq!(cols(&s), vec!["accountid", "status", "tipo"]);
    }

    #[test]
    fn select_projection() {
        let s = extract_sql_references(
            "SELECT DISTINCT c.ACCOUNT_ID AS id, MAX(c.BALANCE) AS saldo, c.STATUS estado, *, 1 FROM CUENTAS c",
        );
        assert_eq!(s.statement_kind, StatementKind::Select);
        assert_eq!(cols(&s), vec!["accountid", "balance", "status"]);
    }

    #[test]
    fn select_multi_argument_calls() {
        let s = extract_sql_references(
            "SELECT NVL(SALDO, 0) AS saldo, ROUND(MONTO, 2) AS monto, NVL(ROUND(TASA, 4), 0) tasa FROM CUENTAS",
        );
        assert_eq!(cols(&s), vec!["monto", "saldo", "tasa"]);
    }

    #[test]
    fn top_level_split_ignores_nested_commas() {
        assert_eq!(split_top_level("a, f(b, c), d"), vec!["a", " f(b, c)", " d"]);
        assert_eq!(split_top_level("x"), vec!["x"]);
    }

    #[test]
    fn select_top() {
        let s = extract_sql_references("select top 10 NAME, CODE from T");
        assert_eq!(cols(&s), vec!["code", "name"]);
    }

    #[test]
    fn insert_wins_over_select() {
        let s = extract_sql_references("SELECT A1B FROM X | INSERT INTO T (COL_A) VALUES (?)");
        assert_eq!(s.verb, Some(SqlVerb::Insert));
    }

    #[test]
    fn unknown_without_statement() {
        let s = extract_sql_references("Consulta de saldo por cuenta");
        assert_eq!(s.statement_kind, StatementKind::Unknown);
        assert!(s.columns.is_empty());
    }

    #[test]
    fn clean_identifier_rules() {
        assert_eq!(clean_identifier(" `schema`.`tabla`.`monto` "), Some("monto".into()));
        assert_eq!(clean_identifier("id"), None);
        assert_eq!(clean_identifier("12345"), None);
        assert_eq!(clean_identifier("partial_"), None);
        assert_eq!(clean_identifier("VALUES"), None);
        assert_eq!(clean_identifier("?"), None);
        assert_eq!(clean_identifier("añ"), None);
        assert_eq!(clean_identifier("año"), Some("año".into()));
    }

    #[test]
    fn statement_detection() {
        assert!(contains_sql_statement("INSERT INTO X (A) VALUES (1)"));
        assert!(contains_sql_statement("select a from b"));
        assert!(contains_sql_statement("Update T set a = 1"));
        assert!(!contains_sql_statement("Selección de cuenta"));
        assert!(!contains_sql_statement("accountId String"));
    }

    #[test]
    fn service_cell_is_preferred() {
        let g = Grid::from_rows(vec![
            vec!["select nombre from clientes"],
            vec!["Servicio"],
            vec![""],
            vec!["INSERT INTO T (COL_A) VALUES (?)"],
        ]);
        assert_eq!(sql_source(&g, &SectionMarkers::default()), "INSERT INTO T (COL_A) VALUES (?)");

        let g = Grid::from_rows(vec![vec!["Servicio"], vec!["ConsultaSaldo"], vec!["", "select abc from t"]]);
        assert_eq!(sql_source(&g, &SectionMarkers::default()), "Servicio | ConsultaSaldo | select abc from t");
    }
}
