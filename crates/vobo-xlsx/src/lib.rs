pub mod workbook;

pub use workbook::XlsxWorkbook;
