use vobo_core::{DeclaredAttribute, SqlReferenceSet};
use vobo_sheet::Grid;

use crate::attributes::{locate_sections, AttributeExtractor, AttributeSet, Section};
use crate::config::ExtractConfig;
use crate::descriptions::{backend_candidates, contract_candidates, looks_like_backend_sheet, DescriptionCandidate};
use crate::locator::HeaderLocator;
use crate::sql::{extract_sql_references, sql_source};
use crate::status::{status_code_facts, StatusCodeFacts};

/// Everything read from the contract (first) sheet.
#[derive(Clone, Debug)]
pub struct ContractFacts {
    pub sheet: String,
    /// `None` when no attribute/type header was found above the status-code section.
    pub attributes: Option<AttributeSet>,
    pub status: StatusCodeFacts,
    pub candidates: Vec<DescriptionCandidate>,
}

impl ContractFacts {
    pub fn attribute(&self, normalized: &str) -> Option<&DeclaredAttribute> {
        self.attributes.as_ref().and_then(|a| a.get(normalized))
    }
}

/// Everything read from one mapping sheet.
#[derive(Clone, Debug)]
pub struct MappingFacts {
    pub sheet: String,
    pub input: Option<AttributeSet>,
    pub output: Option<AttributeSet>,
    /// Whole-sheet attributes of a sheet without section markers.
    pub body: Option<AttributeSet>,
    pub has_markers: bool,
    pub sql: SqlReferenceSet,
    /// Empty unless the sheet looks like a backend mapping.
    pub candidates: Vec<DescriptionCandidate>,
}

impl MappingFacts {
    pub fn header_found(&self) -> bool {
        self.input.is_some() || self.output.is_some() || self.body.is_some()
    }

    /// Every declared attribute of the sheet, section by section.
    pub fn all_attributes(&self) -> impl Iterator<Item = &AttributeSet> {
        [&self.input, &self.output, &self.body].into_iter().flatten()
    }
}

/// Reads typed facts out of raw sheet grids.
#[derive(Clone, Debug)]
pub struct Extractor {
    config: ExtractConfig,
    locator: HeaderLocator,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(ExtractConfig::default())
    }
}

impl Extractor {
    pub fn new(config: ExtractConfig) -> Self {
        let locator = HeaderLocator::new(&config.headers);
        Self { config, locator }
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    fn attributes(&self) -> AttributeExtractor<'_> {
        AttributeExtractor {
            locator: &self.locator,
            markers: &self.config.sections,
            vocabulary: &self.config.vocabulary,
        }
    }

    pub fn contract_facts(&self, sheet: &str, grid: &Grid) -> ContractFacts {
        let status = status_code_facts(grid, &self.config.headers, &self.config.vocabulary);
        let end = status.first_row().unwrap_or(grid.height());
        let attributes = self.attributes().extract(grid, Section { start: 0, end });
        let candidates = contract_candidates(grid, &self.locator, end);

        tracing::debug!(
            sheet = %sheet,
            attributes = attributes.as_ref().map(AttributeSet::len).unwrap_or(0),
            status_blocks = status.blocks.len(),
            "contract sheet extracted"
        );
        ContractFacts {
            sheet: sheet.to_string(),
            attributes,
            status,
            candidates,
        }
    }

    pub fn mapping_facts(&self, sheet: &str, grid: &Grid) -> MappingFacts {
        let sections = locate_sections(grid, &self.config.sections);
        let extractor = self.attributes();

        let (input, output, body) = if sections.has_markers() {
            (
                sections.input.and_then(|s| extractor.extract(grid, s)),
                sections.output.and_then(|s| extractor.extract(grid, s)),
                None,
            )
        } else {
            (None, None, extractor.extract(grid, Section::whole(grid)))
        };

        let sql = extract_sql_references(&sql_source(grid, &self.config.sections));
        let candidates = if looks_like_backend_sheet(grid, &self.config.sections) {
            backend_candidates(grid, &self.locator, &self.config.sections, &self.config.vocabulary)
        } else {
            Vec::new()
        };

        let facts = MappingFacts {
            sheet: sheet.to_string(),
            input,
            output,
            body,
            has_markers: sections.has_markers(),
            sql,
            candidates,
        };
        tracing::debug!(
            sheet = %sheet,
            markers = facts.has_markers,
            header = facts.header_found(),
            statement = ?facts.sql.statement_kind,
            sql_columns = facts.sql.columns.len(),
            "mapping sheet extracted"
        );
        facts
    }
}
