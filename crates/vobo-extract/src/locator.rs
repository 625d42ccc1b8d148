use std::ops::Range;

use vobo_core::norm_text;
use vobo_sheet::Grid;

use crate::config::HeaderTaxonomy;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MandatoryColumn {
    pub index: usize,
    /// `nullable`-style header: a yes means optional.
    pub inverted: bool,
}

/// A located header row and the columns of each field class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderLocation {
    pub row: usize,
    pub attribute_columns: Vec<usize>,
    pub type_columns: Vec<usize>,
    pub mandatory_columns: Vec<MandatoryColumn>,
    pub description_columns: Vec<usize>,
}

impl HeaderLocation {
    /// Mapping sheets repeat the attribute header per side (origin, destination);
    /// the rightmost one names the backend attribute.
    pub fn primary_attribute_column(&self) -> usize {
        self.attribute_columns.iter().copied().max().unwrap_or(0)
    }

    pub fn type_column_for(&self, attr_col: usize) -> Option<usize> {
        nearest(self.type_columns.iter().copied(), attr_col)
    }

    pub fn mandatory_column_for(&self, attr_col: usize) -> Option<MandatoryColumn> {
        let idx = nearest(self.mandatory_columns.iter().map(|m| m.index), attr_col)?;
        self.mandatory_columns.iter().copied().find(|m| m.index == idx)
    }
}

/// Nearest column to the right of `anchor`, else the closest one on the left.
fn nearest(cols: impl Iterator<Item = usize> + Clone, anchor: usize) -> Option<usize> {
    cols.clone()
        .filter(|c| *c > anchor)
        .min()
        .or_else(|| cols.filter(|c| *c < anchor).max())
}

/// Scans rows for header-like cells using a keyword taxonomy.
#[derive(Clone, Debug)]
pub struct HeaderLocator {
    attribute: Vec<String>,
    data_type: Vec<String>,
    mandatory: Vec<String>,
    inverted: Vec<String>,
    description: Vec<String>,
    exclusions: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum HeaderClass {
    Attribute,
    Type,
    Mandatory { inverted: bool },
    Description,
}

impl HeaderLocator {
    pub fn new(taxonomy: &HeaderTaxonomy) -> Self {
        let norm = |v: &[String]| -> Vec<String> {
            v.iter().map(|s| norm_text(s)).filter(|s| !s.is_empty()).collect()
        };
        Self {
            attribute: norm(&taxonomy.attribute),
            data_type: norm(&taxonomy.data_type),
            mandatory: norm(&taxonomy.mandatory),
            inverted: norm(&taxonomy.inverted),
            description: norm(&taxonomy.description),
            exclusions: norm(&taxonomy.type_exclusions),
        }
    }

    pub fn locate(&self, grid: &Grid) -> Option<HeaderLocation> {
        self.locate_in(grid, 0..grid.height())
    }

    /// First row in `rows` with at least one attribute column and one type column.
    pub fn locate_in(&self, grid: &Grid, rows: Range<usize>) -> Option<HeaderLocation> {
        let end = rows.end.min(grid.height());
        (rows.start..end).find_map(|r| {
            let loc = self.classify_row(grid, r);
            (!loc.attribute_columns.is_empty() && !loc.type_columns.is_empty()).then_some(loc)
        })
    }

    /// An attribute header cell next to a type or mandatory header cell.
    pub fn is_header_row(&self, grid: &Grid, row: usize) -> bool {
        let loc = self.classify_row(grid, row);
        !loc.attribute_columns.is_empty() && (!loc.type_columns.is_empty() || !loc.mandatory_columns.is_empty())
    }

    /// Column of the first cell in `row` that is a description header.
    pub fn description_column(&self, grid: &Grid, row: usize) -> Option<usize> {
        grid.row_cells(row)
            .find(|(_, c)| matches!(self.classify(c), Some(HeaderClass::Description)))
            .map(|(i, _)| i)
    }

    /// Columns in `row` whose text contains an attribute keyword.
    pub fn loose_attribute_columns(&self, grid: &Grid, row: usize) -> Vec<usize> {
        grid.row_cells(row)
            .filter(|(_, c)| {
                let t = norm_text(c);
                self.attribute.iter().any(|k| t.contains(k.as_str()))
            })
            .map(|(i, _)| i)
            .collect()
    }

    fn classify_row(&self, grid: &Grid, row: usize) -> HeaderLocation {
        let mut loc = HeaderLocation {
            row,
            attribute_columns: Vec::new(),
            type_columns: Vec::new(),
            mandatory_columns: Vec::new(),
            description_columns: Vec::new(),
        };
        for (col, text) in grid.row_cells(row) {
            match self.classify(text) {
                Some(HeaderClass::Attribute) => loc.attribute_columns.push(col),
                Some(HeaderClass::Type) => loc.type_columns.push(col),
                Some(HeaderClass::Mandatory { inverted }) => {
                    loc.mandatory_columns.push(MandatoryColumn { index: col, inverted })
                }
                Some(HeaderClass::Description) => loc.description_columns.push(col),
                None => {}
            }
        }
        loc
    }

    fn classify(&self, text: &str) -> Option<HeaderClass> {
        let t = norm_text(text);
        if t.is_empty() {
            return None;
        }
        let contains = |list: &[String]| list.iter().any(|k| t.contains(k.as_str()));

        if self.attribute.iter().any(|k| *k == t) {
            Some(HeaderClass::Attribute)
        } else if contains(&self.description) {
            Some(HeaderClass::Description)
        } else if contains(&self.mandatory) {
            Some(HeaderClass::Mandatory {
                inverted: contains(&self.inverted),
            })
        } else if contains(&self.data_type) && !contains(&self.exclusions) {
            Some(HeaderClass::Type)
        } else {
            None
        }
    }
}
