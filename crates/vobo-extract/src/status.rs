use std::sync::LazyLock;

use regex::Regex;
use vobo_core::{marker_key, norm_text, normalize_name, CellRef, Direction, TypeFamily};
use vobo_sheet::Grid;

use crate::config::{HeaderTaxonomy, Vocabulary};
use crate::locator::HeaderLocator;

static BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)status\s*code\s*[=:]\s*(\d{3})\b").expect("status block regex"));

const SUMMARY_MARKER: &str = "httpstatuscode";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SummaryEntry {
    pub code: u16,
    pub alias: String,
    pub description: String,
    pub cell: CellRef,
}

/// The "Http Status Code" table of declared codes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusSummary {
    pub header: CellRef,
    pub entries: Vec<SummaryEntry>,
}

impl StatusSummary {
    pub fn contains(&self, code: u16) -> bool {
        self.entries.iter().any(|e| e.code == code)
    }
}

/// One row of a detail block, read positionally.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockAttribute {
    pub name: String,
    pub normalized_name: String,
    pub mandatory: Option<bool>,
    pub direction: Option<Direction>,
    pub type_raw: Option<String>,
    pub cell: CellRef,
}

impl BlockAttribute {
    pub fn type_family(&self) -> TypeFamily {
        self.type_raw.as_deref().map(TypeFamily::classify).unwrap_or(TypeFamily::Unknown)
    }
}

/// A "StatusCode = N" block and the attributes defined under it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusBlock {
    pub code: u16,
    pub cell: CellRef,
    pub attributes: Vec<BlockAttribute>,
}

impl StatusBlock {
    pub fn attribute(&self, normalized: &str) -> Option<&BlockAttribute> {
        self.attributes.iter().find(|a| a.normalized_name == normalized)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusCodeFacts {
    pub summary: Option<StatusSummary>,
    pub blocks: Vec<StatusBlock>,
}

impl StatusCodeFacts {
    /// The first block declared for `code`.
    pub fn block(&self, code: u16) -> Option<&StatusBlock> {
        self.blocks.iter().find(|b| b.code == code)
    }

    /// The sheet has a status-code section at all.
    pub fn is_present(&self) -> bool {
        self.summary.is_some() || !self.blocks.is_empty()
    }

    /// Row where the status-code section starts, if any.
    pub fn first_row(&self) -> Option<usize> {
        let summary = self.summary.as_ref().map(|s| s.header.row);
        let block = self.blocks.iter().map(|b| b.cell.row).min();
        summary.into_iter().chain(block).min()
    }
}

pub fn status_code_facts(grid: &Grid, headers: &HeaderTaxonomy, vocabulary: &Vocabulary) -> StatusCodeFacts {
    let summary = locate_summary(grid, headers);
    let locator = HeaderLocator::new(headers);
    let blocks = locate_blocks(grid, &locator, vocabulary, summary.as_ref().map(|s| s.header.row));
    StatusCodeFacts { summary, blocks }
}

/// Code of a "StatusCode = N" cell in `row`, with its column.
fn block_marker(grid: &Grid, row: usize) -> Option<(u16, usize)> {
    grid.row_cells(row).find_map(|(col, text)| {
        let caps = BLOCK_RE.captures(text)?;
        caps[1].parse::<u16>().ok().map(|code| (code, col))
    })
}

pub fn locate_summary(grid: &Grid, headers: &HeaderTaxonomy) -> Option<StatusSummary> {
    let header = grid.cells().find(|(_, text)| marker_key(text).contains(SUMMARY_MARKER))?.0;

    let descriptions: Vec<String> = headers.description.iter().map(|d| norm_text(d)).collect();
    let mut alias_col = None;
    let mut description_col = None;
    for (col, text) in grid.row_cells(header.row).filter(|(c, _)| *c != header.col) {
        let t = norm_text(text);
        if alias_col.is_none() && t.contains("alias") {
            alias_col = Some(col);
        } else if description_col.is_none() && descriptions.iter().any(|d| t.contains(d.as_str())) {
            description_col = Some(col);
        }
    }

    let mut entries = Vec::new();
    for r in header.row + 1..grid.height() {
        if block_marker(grid, r).is_some() {
            break;
        }
        let raw = grid.cell(r, header.col).trim();
        if raw.is_empty() {
            continue;
        }
        match raw.parse::<u16>() {
            Ok(code) if (100..=599).contains(&code) => entries.push(SummaryEntry {
                code,
                alias: alias_col.map(|c| grid.cell(r, c).trim().to_string()).unwrap_or_default(),
                description: description_col.map(|c| grid.cell(r, c).trim().to_string()).unwrap_or_default(),
                cell: CellRef::new(r, header.col),
            }),
            _ => break,
        }
    }
    tracing::debug!(header = %header, codes = entries.len(), "status summary located");
    Some(StatusSummary { header, entries })
}

/// Blocks run from their marker to the next marker, the summary header below
/// them, or the end of the sheet. Column-header rows inside a block are skipped.
pub fn locate_blocks(
    grid: &Grid,
    locator: &HeaderLocator,
    vocabulary: &Vocabulary,
    summary_row: Option<usize>,
) -> Vec<StatusBlock> {
    let markers: Vec<(usize, u16, usize)> = (0..grid.height())
        .filter_map(|r| block_marker(grid, r).map(|(code, col)| (r, code, col)))
        .collect();

    markers
        .iter()
        .enumerate()
        .map(|(i, &(row, code, col))| {
            let mut end = markers.get(i + 1).map(|m| m.0).unwrap_or(grid.height());
            if let Some(s) = summary_row.filter(|s| *s > row) {
                end = end.min(s);
            }
            let attributes = (row + 1..end)
                .filter(|&r| !locator.is_header_row(grid, r))
                .filter_map(|r| block_attribute(grid, r, vocabulary))
                .collect();
            StatusBlock {
                code,
                cell: CellRef::new(row, col),
                attributes,
            }
        })
        .collect()
}

fn block_attribute(grid: &Grid, row: usize, vocabulary: &Vocabulary) -> Option<BlockAttribute> {
    let mut cells = grid.row_cells(row);
    let (name_col, name) = cells.next()?;
    if vocabulary.is_noise(name) {
        return None;
    }

    let mut attr = BlockAttribute {
        name: name.trim().to_string(),
        normalized_name: normalize_name(name),
        mandatory: None,
        direction: None,
        type_raw: None,
        cell: CellRef::new(row, name_col),
    };
    for (_, text) in cells {
        if attr.mandatory.is_none() {
            if let Some(flag) = vocabulary.parse_flag(text) {
                attr.mandatory = Some(flag);
                continue;
            }
        }
        if attr.direction.is_none() {
            if let Some(dir) = vocabulary.parse_direction(text) {
                attr.direction = Some(dir);
                continue;
            }
        }
        if attr.type_raw.is_none() && TypeFamily::classify(text).is_known() {
            attr.type_raw = Some(text.trim().to_string());
        }
    }
    Some(attr)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contract() -> Grid {
        Grid::from_rows(vec![
            vec!["Atributo", "Tipo", "Obligatoriedad"],
            vec!["accountId", "String", "Si"],
            vec![],
            vec!["Http Status Code", "Alias", "Descripción"],
            vec!["200", "OK", "Consulta exitosa"],
            vec!["", "", ""],
            vec!["400", "Bad Request", "Petición inválida"],
            vec!["Códigos", "", ""],
            vec!["500", "Error", "Error interno"],
            vec!["StatusCode = 200"],
            vec!["Atributo", "Tipo", "Obligatoriedad", "Entrada/Salida"],
            vec!["accountId", "String", "Si", "Salida"],
            vec!["StatusCode : 400"],
            vec!["code", "String", "Si", "Salida", "Código de error"],
            vec!["message", "Si", "Salida"],
            vec!["nota", "Texto libre"],
        ])
    }

    #[test]
    fn summary_stops_at_non_numeric() {
        let s = locate_summary(&contract(), &HeaderTaxonomy::default()).unwrap();
        assert_eq!(s.header.to_string(), "A4");
        let codes: Vec<u16> = s.entries.iter().map(|e| e.code).collect();
        assert_eq!(codes, vec![200, 400]);
        assert_eq!(s.entries[1].alias, "Bad Request");
        assert_eq!(s.entries[1].description, "Petición inválida");
    }

    #[test]
    fn blocks_and_positional_cells() {
        let facts = status_code_facts(&contract(), &HeaderTaxonomy::default(), &Vocabulary::default());
        assert_eq!(facts.blocks.len(), 2);

        let ok = facts.block(200).unwrap();
        assert_eq!(ok.attributes.len(), 1);
        assert_eq!(ok.cell.to_string(), "A10");

        let bad = facts.block(400).unwrap();
        let code = bad.attribute("code").unwrap();
        assert_eq!(code.mandatory, Some(true));
        assert_eq!(code.direction, Some(Direction::Output));
        assert_eq!(code.type_family(), TypeFamily::Text);

        let message = bad.attribute("message").unwrap();
        assert_eq!(message.type_raw, None);
        assert_eq!(message.mandatory, Some(true));

        assert_eq!(bad.attribute("nota").unwrap().type_family(), TypeFamily::Text);
        assert!(bad.attribute("description").is_none());
        assert_eq!(facts.first_row(), Some(3));
    }

    #[test]
    fn summary_below_blocks_closes_the_last_block() {
        let g = Grid::from_rows(vec![
            vec!["StatusCode = 204"],
            vec![],
            vec!["Http Status Code", "Alias"],
            vec!["204", "No Content"],
        ]);
        let facts = status_code_facts(&g, &HeaderTaxonomy::default(), &Vocabulary::default());
        assert!(facts.block(204).unwrap().attributes.is_empty());
        assert!(facts.summary.unwrap().contains(204));
    }

    #[test]
    fn header_only_block_is_empty() {
        let g = Grid::from_rows(vec![
            vec!["StatusCode = 204"],
            vec!["Campo", "Tipo", "Obligatoriedad", "Entrada/Salida"],
            vec!["StatusCode = 200"],
            vec!["Name", "Mandatory"],
        ]);
        let facts = status_code_facts(&g, &HeaderTaxonomy::default(), &Vocabulary::default());
        assert!(facts.block(204).unwrap().attributes.is_empty());
        assert!(facts.block(200).unwrap().attributes.is_empty());
    }

    #[test]
    fn no_section() {
        let g = Grid::from_rows(vec![vec!["Atributo", "Tipo"]]);
        let facts = status_code_facts(&g, &HeaderTaxonomy::default(), &Vocabulary::default());
        assert!(!facts.is_present());
        assert_eq!(facts.first_row(), None);
    }
}
