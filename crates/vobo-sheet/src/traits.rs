use crate::{Grid, SheetError};

/// Read access to a workbook. Sheet order is the workbook order; index 0 is
/// the contract sheet.
pub trait WorkbookSource {
    fn sheet_names(&self) -> Vec<String>;

    fn read_sheet(&mut self, name: &str) -> Result<Grid, SheetError>;
}
