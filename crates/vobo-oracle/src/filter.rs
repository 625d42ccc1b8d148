use vobo_core::norm_text;

use crate::OracleIssue;

/// True when the text reads as "this is fine" (and not "this is not fine").
pub fn is_benign(text: &str, markers: &[String]) -> bool {
    let t = norm_text(text);
    markers.iter().map(|m| norm_text(m)).any(|m| {
        !m.is_empty() && t.contains(&m) && !t.contains(&format!("no {m}"))
    })
}

/// Drop issues without text and issues whose reason or suggestion is benign.
pub fn filter_benign(issues: Vec<OracleIssue>, markers: &[String]) -> Vec<OracleIssue> {
    issues
        .into_iter()
        .filter(|i| {
            let text = i.text();
            let suggestion = i.suggestion.as_deref().unwrap_or("");
            !text.is_empty() && !is_benign(text, markers) && !is_benign(suggestion, markers)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OracleConfig;

    fn issue(reason: &str) -> OracleIssue {
        OracleIssue {
            attribute: Some("x".into()),
            reason: Some(reason.into()),
            ..OracleIssue::default()
        }
    }

    #[test]
    fn drops_benign_and_empty() {
        let markers = OracleConfig::default().benign_markers;
        let kept = filter_benign(
            vec![
                issue("El atributo es válido para el negocio"),
                issue("Fecha descrita como importe"),
                issue(""),
                issue("Este uso no es válido: fecha vs dinero"),
            ],
            &markers,
        );
        let texts: Vec<_> = kept.iter().map(|i| i.text()).collect();
        assert_eq!(texts, vec!["Fecha descrita como importe", "Este uso no es válido: fecha vs dinero"]);
    }

    #[test]
    fn benign_suggestion_drops_issue() {
        let markers = OracleConfig::default().benign_markers;
        let mut i = issue("Revisar");
        i.suggestion = Some("Looks fine as is".into());
        assert!(filter_benign(vec![i], &markers).is_empty());
    }
}
