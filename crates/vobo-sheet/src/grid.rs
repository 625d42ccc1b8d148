use vobo_core::CellRef;

/// Raw two-dimensional cell text of one sheet. Blank cells are empty strings;
/// rows may be ragged.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Vec<String>>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn from_rows<R, S>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|r| r.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|r| r.iter().all(|c| c.trim().is_empty()))
    }

    /// Cell text, or `""` outside the populated area.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn row(&self, row: usize) -> &[String] {
        self.rows.get(row).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Non-empty cells of one row with their column index, left to right.
    pub fn row_cells(&self, row: usize) -> impl Iterator<Item = (usize, &str)> {
        self.row(row)
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.trim().is_empty())
            .map(|(i, c)| (i, c.as_str()))
    }

    /// Non-empty cell texts of a row joined by a single space.
    pub fn row_text(&self, row: usize) -> String {
        self.row_cells(row).map(|(_, c)| c.trim()).collect::<Vec<_>>().join(" ")
    }

    /// Every non-empty cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (CellRef, &str)> {
        self.rows.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, c)| !c.trim().is_empty())
                .map(move |(c, text)| (CellRef::new(r, c), text.as_str()))
        })
    }

    /// All non-empty cell values joined with `sep`, row-major.
    pub fn joined_text(&self, sep: &str) -> String {
        self.cells().map(|(_, t)| t.trim()).collect::<Vec<_>>().join(sep)
    }
}

/// Render a numeric cell the way a person reads it: `400.0` becomes `400`.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
