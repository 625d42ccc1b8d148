use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{cell::CellRef, model::*};

/// Atomic unit of validation output. Never edited after construction.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Finding {
    pub sheet: String,
    pub attribute: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell: Option<CellRef>,
    pub level: Level,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocks_vobo: Option<bool>,
    pub message: String,
}

/// Fields that identify a finding for deduplication.
pub type FindingKey = (String, String, Category, Level, String);

impl Finding {
    pub fn new(
        level: Level,
        category: Category,
        sheet: impl Into<String>,
        attribute: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            sheet: sheet.into(),
            attribute: attribute.into(),
            cell: None,
            level,
            category,
            blocks_vobo: None,
            message: message.into(),
        }
    }

    pub fn warn(
        category: Category,
        sheet: impl Into<String>,
        attribute: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(Level::Warn, category, sheet, attribute, message)
    }

    pub fn error(
        category: Category,
        sheet: impl Into<String>,
        attribute: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(Level::Error, category, sheet, attribute, message)
    }

    pub fn at(mut self, cell: Option<CellRef>) -> Self {
        self.cell = cell;
        self
    }

    pub fn blocking(mut self, blocks: bool) -> Self {
        self.blocks_vobo = Some(blocks);
        self
    }

    /// An explicit `blocks_vobo = true` or any `ERROR` level blocks the VoBo.
    pub fn is_blocking(&self) -> bool {
        self.blocks_vobo == Some(true) || self.level == Level::Error
    }

    pub fn key(&self) -> FindingKey {
        (
            self.sheet.clone(),
            self.attribute.clone(),
            self.category,
            self.level,
            self.message.clone(),
        )
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Verdict {
    pub vobo: bool,
    pub message: String,
    pub details: Vec<Finding>,
}

impl Verdict {
    pub fn blocking(&self) -> impl Iterator<Item = &Finding> {
        self.details.iter().filter(|f| f.is_blocking())
    }
}

/// Attribute declared in a sheet table. Lives only for one validation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeclaredAttribute {
    pub name: String,
    pub normalized_name: String,
    pub type_raw: String,
    pub type_family: TypeFamily,
    pub mandatory: bool,
    pub cell: CellRef,
}

impl DeclaredAttribute {
    pub fn new(name: &str, type_raw: &str, mandatory: bool, cell: CellRef) -> Self {
        let name = name.trim().to_string();
        let type_raw = type_raw.trim().to_string();
        Self {
            normalized_name: crate::normalize_name(&name),
            type_family: TypeFamily::classify(&type_raw),
            name,
            type_raw,
            mandatory,
            cell,
        }
    }

    /// Name written with array brackets, e.g. `items[]`.
    pub fn has_array_suffix(&self) -> bool {
        self.name.trim_end().ends_with("[]")
    }
}

/// Columns referenced by the embedded SQL of one sheet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SqlReferenceSet {
    pub statement_kind: StatementKind,
    pub verb: Option<SqlVerb>,
    pub columns: BTreeSet<String>,
}

impl SqlReferenceSet {
    pub fn unknown() -> Self {
        Self {
            statement_kind: StatementKind::Unknown,
            verb: None,
            columns: BTreeSet::new(),
        }
    }

    pub fn new(verb: SqlVerb, columns: BTreeSet<String>) -> Self {
        Self {
            statement_kind: verb.kind(),
            verb: Some(verb),
            columns,
        }
    }

    pub fn contains(&self, normalized: &str) -> bool {
        self.columns.contains(normalized)
    }
}
