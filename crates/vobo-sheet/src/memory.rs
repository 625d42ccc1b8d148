use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::grid::format_number;
use crate::traits::WorkbookSource;
use crate::{Grid, SheetError};

/// In-memory workbook for tests and YAML fixtures.
#[derive(Clone, Debug, Default)]
pub struct InMemoryWorkbook {
    sheets: Vec<(String, Grid)>,
    unreadable: HashSet<String>,
}

impl InMemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(mut self, name: impl Into<String>, grid: Grid) -> Self {
        self.sheets.push((name.into(), grid));
        self
    }

    /// Keep the sheet listed but make every read of it fail.
    pub fn with_unreadable(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.sheets.iter().any(|(n, _)| *n == name) {
            self.sheets.push((name.clone(), Grid::default()));
        }
        self.unreadable.insert(name);
        self
    }

    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let doc: WorkbookDoc = serde_yaml::from_str(s).with_context(|| "parse workbook yaml")?;
        let mut wb = InMemoryWorkbook::new();
        for sheet in doc.sheets {
            let rows = sheet
                .rows
                .iter()
                .map(|r| r.iter().map(value_to_cell).collect())
                .collect();
            wb = wb.with_sheet(sheet.name.clone(), Grid::new(rows));
            if sheet.unreadable {
                wb = wb.with_unreadable(sheet.name);
            }
        }
        Ok(wb)
    }

    pub fn load_yaml(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        Self::from_yaml_str(&s).with_context(|| format!("load workbook fixture {}", path.display()))
    }
}

impl WorkbookSource for InMemoryWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|(n, _)| n.clone()).collect()
    }

    fn read_sheet(&mut self, name: &str) -> Result<Grid, SheetError> {
        if self.unreadable.contains(name) {
            return Err(SheetError::Read {
                sheet: name.to_string(),
                reason: "marked unreadable".to_string(),
            });
        }
        self.sheets
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, g)| g.clone())
            .ok_or_else(|| SheetError::MissingSheet(name.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct WorkbookDoc {
    sheets: Vec<SheetDoc>,
}

#[derive(Debug, Deserialize)]
struct SheetDoc {
    name: String,
    #[serde(default)]
    rows: Vec<Vec<serde_yaml::Value>>,
    #[serde(default)]
    unreadable: bool,
}

fn value_to_cell(v: &serde_yaml::Value) -> String {
    match v {
        serde_yaml::Value::Null => String::new(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i.to_string(),
            (None, Some(f)) => format_number(f),
            _ => n.to_string(),
        },
        serde_yaml::Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other).unwrap_or_default().trim().to_string(),
    }
}
