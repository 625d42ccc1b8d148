use std::collections::HashSet;

use serde::Serialize;
use vobo_core::{norm_text, CellRef};
use vobo_sheet::Grid;

use crate::config::{SectionMarkers, Vocabulary};
use crate::locator::HeaderLocator;
use crate::sql::contains_sql_statement;

/// Contract headers are expected near the top of the sheet.
const CONTRACT_HEADER_ROWS: usize = 21;
const BACKEND_HINT_ROWS: usize = 15;
const NO_DESCRIPTION: &str = "Sin descripción";

/// An attribute name paired with its free-text description.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DescriptionCandidate {
    pub attribute: String,
    pub description: String,
    #[serde(skip)]
    pub cell: CellRef,
}

/// Candidates of the contract sheet, read above row `end`.
pub fn contract_candidates(grid: &Grid, locator: &HeaderLocator, end: usize) -> Vec<DescriptionCandidate> {
    let header = (0..CONTRACT_HEADER_ROWS.min(grid.height())).find_map(|r| {
        let desc = locator.description_column(grid, r)?;
        let attr = locator
            .loose_attribute_columns(grid, r)
            .into_iter()
            .find(|c| *c != desc)?;
        Some((r, attr, desc))
    });
    let Some((header_row, attr_col, desc_col)) = header else {
        return Vec::new();
    };

    let mut out = Vec::new();
    for r in header_row + 1..end.min(grid.height()) {
        let attribute = grid.cell(r, attr_col).trim();
        if attribute.is_empty() || norm_text(attribute).contains("atributo") {
            continue;
        }
        let description = match grid.cell(r, desc_col).trim() {
            "" => NO_DESCRIPTION,
            d => d,
        };
        out.push(DescriptionCandidate {
            attribute: attribute.to_string(),
            description: description.to_string(),
            cell: CellRef::new(r, attr_col),
        });
    }
    out
}

/// A sheet mentions a backend mapping in its first rows.
pub fn looks_like_backend_sheet(grid: &Grid, markers: &SectionMarkers) -> bool {
    let hints: Vec<String> = markers.backend_hints.iter().map(|h| norm_text(h)).collect();
    (0..BACKEND_HINT_ROWS.min(grid.height())).any(|r| {
        let text = norm_text(&grid.row_text(r));
        hints.iter().any(|h| text.contains(h.as_str()))
    })
}

/// Candidates of a mapping sheet. The attribute column is the attribute-like
/// header closest to the left of the description column.
pub fn backend_candidates(
    grid: &Grid,
    locator: &HeaderLocator,
    markers: &SectionMarkers,
    vocabulary: &Vocabulary,
) -> Vec<DescriptionCandidate> {
    let header = (0..grid.height()).find_map(|r| {
        let desc = locator.description_column(grid, r)?;
        let attrs = locator.loose_attribute_columns(grid, r);
        if attrs.is_empty() {
            return None;
        }
        Some((r, attrs, desc))
    });
    let Some((header_row, attrs, desc_col)) = header else {
        return Vec::new();
    };
    let Some(attr_col) = attrs.into_iter().filter(|c| *c < desc_col).max() else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for r in header_row + 1..grid.height() {
        if grid.row_cells(r).any(|(_, c)| markers.is_input(c) || markers.is_output(c)) {
            continue;
        }
        let attribute = grid.cell(r, attr_col).trim();
        if contains_sql_statement(attribute) {
            break;
        }
        if vocabulary.is_noise(attribute) {
            continue;
        }
        let description = grid.cell(r, desc_col).trim();
        if description.is_empty() || !seen.insert(attribute.to_string()) {
            continue;
        }
        out.push(DescriptionCandidate {
            attribute: attribute.to_string(),
            description: description.to_string(),
            cell: CellRef::new(r, attr_col),
        });
    }
    out
}
