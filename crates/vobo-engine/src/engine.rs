use std::path::Path;

use anyhow::{Context, Result};
use vobo_core::{Finding, Verdict};
use vobo_extract::{ContractFacts, Extractor, MappingFacts};
use vobo_oracle::{AdvisoryOracle, AttributeContext, ChatCompletionsOracle, OracleError};
use vobo_sheet::WorkbookSource;
use vobo_validate::{aggregate, default_rules, run_rules, Rule, SemanticAdvisor, ValidateInput};
use vobo_xlsx::XlsxWorkbook;

use crate::Config;

/// Sheet names of the workbook at `path`, in workbook order.
pub fn sheet_names(path: &Path) -> Result<Vec<String>> {
    let workbook = XlsxWorkbook::open(path).with_context(|| format!("open workbook {}", path.display()))?;
    Ok(workbook.sheet_names())
}

/// One validation pipeline: extraction, deterministic rules, optional
/// advisory checks, aggregation. Holds no per-run state.
pub struct Engine {
    cfg: Config,
    extractor: Extractor,
    rules: Vec<Box<dyn Rule>>,
    oracle: Option<Box<dyn AdvisoryOracle>>,
}

impl Engine {
    /// Engine without an advisory oracle.
    pub fn new(cfg: Config) -> Self {
        let extractor = Extractor::new(cfg.extract_config());
        Self {
            cfg,
            extractor,
            rules: default_rules(),
            oracle: None,
        }
    }

    /// Engine with the oracle `cfg.oracle` describes. A missing API key
    /// downgrades to no oracle; other construction failures are fatal.
    pub fn from_config(cfg: Config) -> Result<Self> {
        let oracle: Option<Box<dyn AdvisoryOracle>> = match ChatCompletionsOracle::from_config(&cfg.oracle) {
            Ok(Some(o)) => {
                tracing::info!(endpoint = %o.endpoint(), model = %cfg.oracle.model, "advisory oracle enabled");
                Some(Box::new(o))
            }
            Ok(None) => None,
            Err(OracleError::MissingApiKey(var)) => {
                tracing::warn!(env = %var, "advisory oracle enabled but API key missing; continuing without it");
                None
            }
            Err(e) => return Err(e).context("build advisory oracle"),
        };
        let mut engine = Self::new(cfg);
        engine.oracle = oracle;
        Ok(engine)
    }

    pub fn with_oracle(mut self, oracle: Box<dyn AdvisoryOracle>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn validate_path(&self, path: &Path) -> Result<Verdict> {
        let mut workbook = XlsxWorkbook::open(path).with_context(|| format!("open workbook {}", path.display()))?;
        Ok(self.validate_workbook(&mut workbook))
    }

    /// Sheet 0 is the contract; every later sheet is a mapping sheet.
    /// Unreadable sheets contribute no findings.
    pub fn validate_workbook(&self, source: &mut dyn WorkbookSource) -> Verdict {
        let names = source.sheet_names();
        tracing::info!(sheets = names.len(), oracle = self.oracle.is_some(), "validation started");

        let mut sheets = names.iter().map(|name| match source.read_sheet(name) {
            Ok(grid) => Some((name.as_str(), grid)),
            Err(e) => {
                tracing::warn!(sheet = %name, error = %e, "sheet unreadable; skipping its checks");
                None
            }
        });

        let contract: Option<ContractFacts> = sheets
            .next()
            .flatten()
            .map(|(name, grid)| self.extractor.contract_facts(name, &grid));
        let mappings: Vec<MappingFacts> = sheets
            .flatten()
            .map(|(name, grid)| self.extractor.mapping_facts(name, &grid))
            .collect();

        let mut findings = Vec::new();
        if let Some(c) = &contract {
            findings.extend(run_rules(&self.rules, &ValidateInput::contract(c)));
        }
        for m in &mappings {
            findings.extend(run_rules(&self.rules, &ValidateInput::mapping(m, contract.as_ref())));
        }
        if let Some(oracle) = &self.oracle {
            findings.extend(self.semantic_findings(oracle.as_ref(), contract.as_ref(), &mappings));
        }

        aggregate(findings, &self.cfg.policy)
    }

    fn semantic_findings(
        &self,
        oracle: &dyn AdvisoryOracle,
        contract: Option<&ContractFacts>,
        mappings: &[MappingFacts],
    ) -> Vec<Finding> {
        let advisor = SemanticAdvisor::new(oracle, self.cfg.oracle.batch_size, &self.cfg.oracle.benign_markers);
        let mut out = Vec::new();
        if let Some(c) = contract {
            out.extend(advisor.attribute_findings(&c.sheet, AttributeContext::Contract, &c.candidates));
            if let Some(summary) = &c.status.summary {
                out.extend(advisor.status_findings(&c.sheet, summary));
            }
        }
        for m in mappings.iter().filter(|m| !m.candidates.is_empty()) {
            out.extend(advisor.attribute_findings(&m.sheet, AttributeContext::Backend, &m.candidates));
        }
        out
    }
}
