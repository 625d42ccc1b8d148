use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use vobo_sheet::{format_number, Grid, SheetError, WorkbookSource};

/// Workbook read from disk through calamine (`.xlsx`, `.xlsm`, `.xls`, `.ods`).
pub struct XlsxWorkbook {
    path: String,
    inner: Sheets<BufReader<File>>,
}

impl XlsxWorkbook {
    /// Open a workbook. A missing file or a broken archive is fatal for the run.
    pub fn open(path: &Path) -> Result<Self, SheetError> {
        let inner = open_workbook_auto(path).map_err(|e| SheetError::Open {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        tracing::debug!(path = %path.display(), "workbook opened");
        Ok(Self {
            path: path.display().to_string(),
            inner,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl WorkbookSource for XlsxWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.inner.sheet_names()
    }

    fn read_sheet(&mut self, name: &str) -> Result<Grid, SheetError> {
        let range = self.inner.worksheet_range(name).map_err(|e| SheetError::Read {
            sheet: name.to_string(),
            reason: e.to_string(),
        })?;
        Ok(range_to_grid(&range))
    }
}

/// calamine ranges start at the first used cell; pad so grid indices match
/// the sheet's absolute coordinates.
fn range_to_grid(range: &Range<Data>) -> Grid {
    let (row_offset, col_offset) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let mut rows: Vec<Vec<String>> = vec![Vec::new(); row_offset];
    for row in range.rows() {
        let mut cells = vec![String::new(); col_offset];
        cells.extend(row.iter().map(data_to_text));
        rows.push(cells);
    }
    Grid::new(rows)
}

fn data_to_text(d: &Data) -> String {
    match d {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => format_number(*f),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}
