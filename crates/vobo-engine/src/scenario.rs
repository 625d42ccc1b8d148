use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use vobo_core::{Category, Finding, Level, Verdict};
use vobo_sheet::InMemoryWorkbook;

use crate::{Config, Engine};

#[derive(Debug, Deserialize)]
pub struct ScenarioExpected {
    pub scenario_id: String,
    pub vobo: bool,
    #[serde(default)]
    pub message_contains: Option<String>,
    /// Exact number of findings after deduplication.
    #[serde(default)]
    pub finding_count: Option<usize>,
    #[serde(default)]
    pub findings: Vec<ExpectedFinding>,
    #[serde(default)]
    pub absent: ExpectedAbsent,
}

/// Matches at least one finding; omitted fields match anything.
#[derive(Debug, Deserialize)]
pub struct ExpectedFinding {
    pub category: Category,
    pub level: Level,
    #[serde(default)]
    pub blocking: Option<bool>,
    #[serde(default)]
    pub sheet: Option<String>,
    #[serde(default)]
    pub attribute: Option<String>,
    #[serde(default)]
    pub message_contains: Option<String>,
    /// Exact number of findings this entry must match.
    #[serde(default)]
    pub count: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExpectedAbsent {
    #[serde(default)]
    pub categories: Vec<Category>,
    /// Normalized attribute names no finding may mention in its message.
    #[serde(default)]
    pub mentions: Vec<String>,
}

impl ExpectedFinding {
    fn matches(&self, f: &Finding) -> bool {
        f.category == self.category
            && f.level == self.level
            && self.blocking.map_or(true, |b| f.is_blocking() == b)
            && self.sheet.as_deref().map_or(true, |s| f.sheet == s)
            && self.attribute.as_deref().map_or(true, |a| f.attribute == a)
            && self.message_contains.as_deref().map_or(true, |m| f.message.contains(m))
    }
}

impl ScenarioExpected {
    /// Every way `verdict` departs from the expectation; empty when it conforms.
    pub fn mismatches(&self, verdict: &Verdict) -> Vec<String> {
        let mut out = Vec::new();
        if verdict.vobo != self.vobo {
            out.push(format!("vobo: expected {}, got {}", self.vobo, verdict.vobo));
        }
        if let Some(m) = &self.message_contains {
            if !verdict.message.contains(m.as_str()) {
                out.push(format!("message {:?} lacks {m:?}", verdict.message));
            }
        }
        if let Some(n) = self.finding_count {
            if verdict.details.len() != n {
                out.push(format!("finding count: expected {n}, got {}", verdict.details.len()));
            }
        }
        for (i, exp) in self.findings.iter().enumerate() {
            let hits = verdict.details.iter().filter(|f| exp.matches(f)).count();
            match exp.count {
                Some(n) if hits != n => out.push(format!("findings[{i}]: expected {n} matches, got {hits}")),
                None if hits == 0 => out.push(format!("findings[{i}]: no match for {exp:?}")),
                _ => {}
            }
        }
        for cat in &self.absent.categories {
            if verdict.details.iter().any(|f| f.category == *cat) {
                out.push(format!("unexpected {cat} finding"));
            }
        }
        for name in &self.absent.mentions {
            if let Some(f) = verdict.details.iter().find(|f| f.message.contains(name.as_str())) {
                out.push(format!("finding mentions {name}: {}", f.message));
            }
        }
        out
    }
}

#[derive(Debug)]
pub struct ScenarioResult {
    pub expected: ScenarioExpected,
    pub verdict: Verdict,
}

impl ScenarioResult {
    pub fn check(&self) -> Result<()> {
        let mismatches = self.expected.mismatches(&self.verdict);
        if mismatches.is_empty() {
            return Ok(());
        }
        bail!(
            "scenario {} failed:\n  {}\nfindings: {:#?}",
            self.expected.scenario_id,
            mismatches.join("\n  "),
            self.verdict.details
        )
    }
}

pub fn load_expected(dir: &Path) -> Result<ScenarioExpected> {
    let p = dir.join("expected.yaml");
    let s = std::fs::read_to_string(&p).with_context(|| format!("read expected.yaml: {}", p.display()))?;
    let exp: ScenarioExpected = serde_yaml::from_str(&s).with_context(|| "parse expected.yaml")?;
    Ok(exp)
}

/// Run one fixture directory: `workbook.yaml`, `expected.yaml` and an
/// optional `vobo.toml`. The advisory oracle is never consulted.
pub fn simulate(dir: &Path) -> Result<ScenarioResult> {
    let expected = load_expected(dir)?;
    let cfg_path = Config::config_path(dir);
    let cfg = if cfg_path.exists() {
        Config::load_from(&cfg_path)?
    } else {
        Config::default()
    };
    let mut workbook = InMemoryWorkbook::load_yaml(&dir.join("workbook.yaml"))?;
    let verdict = Engine::new(cfg).validate_workbook(&mut workbook);
    tracing::debug!(scenario = %expected.scenario_id, vobo = verdict.vobo, findings = verdict.details.len(), "scenario simulated");
    Ok(ScenarioResult { expected, verdict })
}
