use std::collections::{BTreeSet, HashMap};

use vobo_core::{CellRef, DeclaredAttribute};
use vobo_sheet::Grid;

use crate::config::{SectionMarkers, Vocabulary};
use crate::locator::HeaderLocator;
use crate::sql::contains_sql_statement;

/// Half-open row range `[start, end)` of one sheet section.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Section {
    pub start: usize,
    pub end: usize,
}

impl Section {
    pub fn whole(grid: &Grid) -> Self {
        Self { start: 0, end: grid.height() }
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Backend-Input / Backend-Output sections of a mapping sheet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SheetSections {
    pub input: Option<Section>,
    pub output: Option<Section>,
}

impl SheetSections {
    pub fn has_markers(&self) -> bool {
        self.input.is_some() || self.output.is_some()
    }
}

/// First row at or after `from` holding a cell accepted by `is_marker`.
pub fn find_marker_row(grid: &Grid, from: usize, is_marker: impl Fn(&str) -> bool) -> Option<usize> {
    (from..grid.height()).find(|&r| grid.row_cells(r).any(|(_, c)| is_marker(c)))
}

/// Input runs from its marker to the output marker (or end of sheet); output
/// runs from its marker to the input marker when that comes later.
pub fn locate_sections(grid: &Grid, markers: &SectionMarkers) -> SheetSections {
    let input_row = find_marker_row(grid, 0, |c| markers.is_input(c));
    let output_row = find_marker_row(grid, 0, |c| markers.is_output(c));
    let height = grid.height();

    SheetSections {
        input: input_row.map(|i| Section {
            start: i + 1,
            end: output_row.filter(|o| *o > i).unwrap_or(height),
        }),
        output: output_row.map(|o| Section {
            start: o + 1,
            end: input_row.filter(|i| *i > o).unwrap_or(height),
        }),
    }
}

/// Attributes declared in one section, in sheet order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttributeSet {
    attributes: Vec<DeclaredAttribute>,
    index: HashMap<String, usize>,
    duplicates: Vec<DeclaredAttribute>,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps the first occurrence of a normalized name; later ones are
    /// recorded as duplicates.
    pub fn push(&mut self, attr: DeclaredAttribute) {
        if self.index.contains_key(&attr.normalized_name) {
            self.duplicates.push(attr);
        } else {
            self.index.insert(attr.normalized_name.clone(), self.attributes.len());
            self.attributes.push(attr);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &DeclaredAttribute> {
        self.attributes.iter()
    }

    pub fn get(&self, normalized: &str) -> Option<&DeclaredAttribute> {
        self.index.get(normalized).map(|&i| &self.attributes[i])
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn names(&self) -> BTreeSet<String> {
        self.index.keys().cloned().collect()
    }

    pub fn duplicates(&self) -> &[DeclaredAttribute] {
        &self.duplicates
    }

    pub fn cell_of(&self, normalized: &str) -> Option<CellRef> {
        self.get(normalized).map(|a| a.cell)
    }
}

impl<'a> IntoIterator for &'a AttributeSet {
    type Item = &'a DeclaredAttribute;
    type IntoIter = std::slice::Iter<'a, DeclaredAttribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.attributes.iter()
    }
}

pub struct AttributeExtractor<'a> {
    pub locator: &'a HeaderLocator,
    pub markers: &'a SectionMarkers,
    pub vocabulary: &'a Vocabulary,
}

impl AttributeExtractor<'_> {
    /// Attributes of `section`, read under the header found inside it (or the
    /// nearest header above it). `None` when no header can be located.
    pub fn extract(&self, grid: &Grid, section: Section) -> Option<AttributeSet> {
        let header = self
            .locator
            .locate_in(grid, section.start..section.end)
            .or_else(|| self.header_above(grid, section.start))?;

        let attr_col = header.primary_attribute_column();
        let type_col = header.type_column_for(attr_col);
        let mandatory_col = header.mandatory_column_for(attr_col);

        let mut set = AttributeSet::new();
        let first = (header.row + 1).max(section.start);
        for r in first..section.end.min(grid.height()) {
            if contains_sql_statement(&grid.row_text(r)) {
                break;
            }
            let name = grid.cell(r, attr_col);
            if self.vocabulary.is_noise(name) || self.is_marker_row(grid, r) {
                continue;
            }
            let type_raw = type_col.map(|c| grid.cell(r, c)).unwrap_or("");
            let mandatory = mandatory_col
                .and_then(|m| self.vocabulary.parse_flag(grid.cell(r, m.index)).map(|f| f != m.inverted))
                .unwrap_or(false);
            set.push(DeclaredAttribute::new(name, type_raw, mandatory, CellRef::new(r, attr_col)));
        }
        Some(set)
    }

    /// Last header row strictly above `row`.
    fn header_above(&self, grid: &Grid, row: usize) -> Option<crate::locator::HeaderLocation> {
        (0..row.min(grid.height()))
            .rev()
            .find_map(|r| self.locator.locate_in(grid, r..r + 1))
    }

    fn is_marker_row(&self, grid: &Grid, row: usize) -> bool {
        grid.row_cells(row)
            .any(|(_, c)| self.markers.is_input(c) || self.markers.is_output(c))
    }
}
