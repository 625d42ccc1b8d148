use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Level {
    Error,
    Warn,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Error => "ERROR",
            Level::Warn => "WARN",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Contract,
    ContractMismatch,
    Consistency,
    Syntax,
    SqlConsistency,
    SemanticBian,
    #[serde(rename = "STATUSCODE")]
    StatusCode,
    Duplicate,
    UndefinedAttribute,
    Headers,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Contract,
        Category::ContractMismatch,
        Category::Consistency,
        Category::Syntax,
        Category::SqlConsistency,
        Category::SemanticBian,
        Category::StatusCode,
        Category::Duplicate,
        Category::UndefinedAttribute,
        Category::Headers,
    ];

    /// Wire tag, identical to the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Contract => "CONTRACT",
            Category::ContractMismatch => "CONTRACT_MISMATCH",
            Category::Consistency => "CONSISTENCY",
            Category::Syntax => "SYNTAX",
            Category::SqlConsistency => "SQL_CONSISTENCY",
            Category::SemanticBian => "SEMANTIC_BIAN",
            Category::StatusCode => "STATUSCODE",
            Category::Duplicate => "DUPLICATE",
            Category::UndefinedAttribute => "UNDEFINED_ATTRIBUTE",
            Category::Headers => "HEADERS",
        }
    }

    /// Short Spanish label used by text renderers.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Contract => "Contrato",
            Category::ContractMismatch => "Tipo vs contrato",
            Category::Consistency => "Consistencia",
            Category::Syntax => "Sintaxis",
            Category::SqlConsistency => "Consistencia SQL",
            Category::SemanticBian => "Semántica BIAN",
            Category::StatusCode => "StatusCode",
            Category::Duplicate => "Duplicado",
            Category::UndefinedAttribute => "Atributo no definido",
            Category::Headers => "Encabezados",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse classification of concrete type spellings.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeFamily {
    Text,
    Number,
    Date,
    Bool,
    Object,
    Array,
    Unknown,
}

const ARRAY_WORDS: &[&str] = &["array", "list", "lista", "arreglo", "collection", "coleccion", "colección"];
const OBJECT_WORDS: &[&str] = &["object", "objeto", "json", "jsonb", "map", "struct", "record"];
const DATE_WORDS: &[&str] = &[
    "date", "datetime", "timestamp", "timestamptz", "time", "fecha", "hora", "localdate", "localdatetime",
];
const BOOL_WORDS: &[&str] = &["bool", "boolean", "booleano", "bit", "flag"];
const NUMBER_WORDS: &[&str] = &[
    "int", "integer", "number", "numeric", "decimal", "double", "float", "long", "bigint", "smallint",
    "tinyint", "short", "real", "money", "numero", "número", "entero", "bigdecimal", "num",
];
const TEXT_WORDS: &[&str] = &[
    "string", "str", "text", "varchar", "nvarchar", "char", "nchar", "clob", "alfanumerico",
    "alfanumérico", "alphanumeric", "cadena", "texto", "uuid",
];

impl TypeFamily {
    /// Classify a raw declared type such as `VARCHAR2(20)`, `List<String>` or `Fecha`.
    ///
    /// Array spellings win over their element type, so `Array<String>` is `Array`.
    pub fn classify(raw: &str) -> TypeFamily {
        let lower = raw.trim().to_lowercase();
        if lower.is_empty() {
            return TypeFamily::Unknown;
        }
        if lower.contains("[]") {
            return TypeFamily::Array;
        }
        let tokens: Vec<String> = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(|t| t.trim_end_matches(|c: char| c.is_ascii_digit()).to_string())
            .filter(|t| !t.is_empty())
            .collect();
        let has = |words: &[&str]| tokens.iter().any(|t| words.contains(&t.as_str()));

        if has(ARRAY_WORDS) {
            TypeFamily::Array
        } else if has(OBJECT_WORDS) {
            TypeFamily::Object
        } else if has(DATE_WORDS) {
            TypeFamily::Date
        } else if has(BOOL_WORDS) {
            TypeFamily::Bool
        } else if has(NUMBER_WORDS) {
            TypeFamily::Number
        } else if has(TEXT_WORDS) {
            TypeFamily::Text
        } else {
            TypeFamily::Unknown
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, TypeFamily::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TypeFamily::Text => "TEXT",
            TypeFamily::Number => "NUMBER",
            TypeFamily::Date => "DATE",
            TypeFamily::Bool => "BOOL",
            TypeFamily::Object => "OBJECT",
            TypeFamily::Array => "ARRAY",
            TypeFamily::Unknown => "UNKNOWN",
        }
    }

    /// Canonical type spelling recommended in findings.
    pub fn suggested_type(&self) -> &'static str {
        match self {
            TypeFamily::Text => "String",
            TypeFamily::Number => "Number",
            TypeFamily::Date => "Date",
            TypeFamily::Bool => "Boolean",
            TypeFamily::Object => "Object",
            TypeFamily::Array => "Array",
            TypeFamily::Unknown => "-",
        }
    }
}

impl fmt::Display for TypeFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Statement bucket used for column matching. UPDATE and DELETE fall into `Insert`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatementKind {
    Select,
    Insert,
    Unknown,
}

/// The verb actually found in the sheet text.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SqlVerb {
    Select,
    Insert,
    Update,
    Delete,
}

impl SqlVerb {
    pub fn kind(&self) -> StatementKind {
        match self {
            SqlVerb::Select => StatementKind::Select,
            SqlVerb::Insert | SqlVerb::Update | SqlVerb::Delete => StatementKind::Insert,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SqlVerb::Select => "SELECT",
            SqlVerb::Insert => "INSERT",
            SqlVerb::Update => "UPDATE",
            SqlVerb::Delete => "DELETE",
        }
    }
}

/// Data-flow direction declared for an attribute in a status-code block.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
    Both,
}

impl Direction {
    pub fn is_output(&self) -> bool {
        matches!(self, Direction::Output | Direction::Both)
    }
}
