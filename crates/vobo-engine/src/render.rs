use std::fmt::Write;

use vobo_core::{Finding, Level, Verdict};

/// Human-readable verdict, one line per finding grouped by sheet order of appearance.
pub fn render_text(verdict: &Verdict) -> String {
    let mut out = String::new();
    let status = if verdict.vobo { "APROBADO" } else { "RECHAZADO" };
    let _ = writeln!(out, "VoBo: {status}");
    let _ = writeln!(out, "{}", verdict.message);
    if verdict.details.is_empty() {
        return out;
    }

    let blocking = verdict.blocking().count();
    let _ = writeln!(out, "\nHallazgos: {} ({} bloqueantes)", verdict.details.len(), blocking);

    let mut sheets: Vec<&str> = Vec::new();
    for f in &verdict.details {
        if !sheets.contains(&f.sheet.as_str()) {
            sheets.push(&f.sheet);
        }
    }
    for sheet in sheets {
        let _ = writeln!(out, "\n[{sheet}]");
        for f in verdict.details.iter().filter(|f| f.sheet == sheet) {
            let _ = writeln!(out, "  {}", render_finding(f));
        }
    }
    out
}

pub fn render_finding(f: &Finding) -> String {
    let marker = match (f.level, f.is_blocking()) {
        (Level::Error, _) => "✗",
        (Level::Warn, true) => "!",
        (Level::Warn, false) => "·",
    };
    let cell = f.cell.map(|c| format!(" {c}")).unwrap_or_default();
    format!(
        "{marker} {level} {label}{cell} {attribute}: {message}",
        level = f.level,
        label = f.category.label(),
        attribute = f.attribute,
        message = f.message
    )
}
