use serde::{Deserialize, Serialize};
use vobo_core::{marker_key, norm_text};

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Header keywords per field class. Attribute keywords match a whole cell;
/// the other classes match as substrings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HeaderTaxonomy {
    pub attribute: Vec<String>,
    #[serde(rename = "type")]
    pub data_type: Vec<String>,
    pub mandatory: Vec<String>,
    /// Mandatory-class headers whose yes/no reading is inverted (`nullable`).
    pub inverted: Vec<String>,
    pub description: Vec<String>,
    /// Substrings that disqualify a type-column candidate ("tipo de cambio").
    pub type_exclusions: Vec<String>,
}

impl Default for HeaderTaxonomy {
    fn default() -> Self {
        Self {
            attribute: words(&[
                "atributo", "atributos", "attribute", "campo", "field", "name", "nombre", "column", "columna",
            ]),
            data_type: words(&["tipo", "type", "datatype", "format", "formato"]),
            mandatory: words(&[
                "obligatoriedad", "obligatorio", "mandatory", "required", "requerido", "nullable",
            ]),
            inverted: words(&["nullable"]),
            description: words(&["descripción", "descripcion", "description"]),
            type_exclusions: words(&["tipo de cambio", "type of change"]),
        }
    }
}

/// Marker rows that split a mapping sheet into sections.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SectionMarkers {
    pub input: Vec<String>,
    pub output: Vec<String>,
    /// Column-A label whose next cell holds the embedded SQL.
    pub service: Vec<String>,
    /// First-rows hints that a sheet is a backend mapping.
    pub backend_hints: Vec<String>,
}

impl Default for SectionMarkers {
    fn default() -> Self {
        Self {
            input: words(&["Backend - Input", "Backend Input"]),
            output: words(&["Backend - Output", "Backend Output"]),
            service: words(&["Servicio", "Service"]),
            backend_hints: words(&["mapeo", "backend", "origen"]),
        }
    }
}

impl SectionMarkers {
    pub fn is_input(&self, cell: &str) -> bool {
        matches_marker(&self.input, cell)
    }

    pub fn is_output(&self, cell: &str) -> bool {
        matches_marker(&self.output, cell)
    }

    pub fn is_service(&self, cell: &str) -> bool {
        let key = marker_key(cell);
        !key.is_empty() && self.service.iter().any(|m| marker_key(m) == key)
    }
}

fn matches_marker(markers: &[String], cell: &str) -> bool {
    let key = marker_key(cell);
    !key.is_empty()
        && markers.iter().any(|m| {
            let m = marker_key(m);
            !m.is_empty() && key.contains(&m)
        })
}

/// Cell vocabularies: noise stoplist, yes/no flags and direction words.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Vocabulary {
    pub stoplist: Vec<String>,
    pub yes: Vec<String>,
    pub no: Vec<String>,
    pub input: Vec<String>,
    pub output: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            stoplist: words(&[
                "atributo",
                "attribute",
                "destino",
                "destination",
                "origen",
                "source",
                "tipo de dato",
                "data type",
                "obligatoriedad",
                "mandatory",
                "descripcion",
                "descripción",
                "mapeo transacción",
                "función",
                "backend - input",
                "backend - output",
                "backend",
                "entrada/salida",
                "input/output",
                "servicio",
            ]),
            yes: words(&[
                "si", "sí", "s", "yes", "y", "true", "x", "obligatorio", "mandatory", "required", "requerido", "1",
            ]),
            no: words(&["no", "n", "false", "opcional", "optional", "0"]),
            input: words(&["entrada", "input", "request"]),
            output: words(&["salida", "output", "response"]),
        }
    }
}

impl Vocabulary {
    /// Blank, numeric-only or stoplisted cells never name an attribute.
    pub fn is_noise(&self, cell: &str) -> bool {
        let t = norm_text(cell);
        t.is_empty()
            || t.chars().all(|c| c.is_ascii_digit())
            || self.stoplist.iter().any(|s| norm_text(s) == t)
    }

    /// `Some(true)` for a yes-word, `Some(false)` for a no-word.
    pub fn parse_flag(&self, cell: &str) -> Option<bool> {
        let t = norm_text(cell);
        if t.is_empty() {
            None
        } else if self.yes.iter().any(|w| norm_text(w) == t) {
            Some(true)
        } else if self.no.iter().any(|w| norm_text(w) == t) {
            Some(false)
        } else {
            None
        }
    }

    pub fn parse_direction(&self, cell: &str) -> Option<vobo_core::Direction> {
        let t = norm_text(cell);
        let has = |list: &[String]| list.iter().any(|w| t.contains(&norm_text(w)));
        match (has(&self.input), has(&self.output)) {
            (true, true) => Some(vobo_core::Direction::Both),
            (true, false) => Some(vobo_core::Direction::Input),
            (false, true) => Some(vobo_core::Direction::Output),
            (false, false) => None,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExtractConfig {
    pub headers: HeaderTaxonomy,
    pub sections: SectionMarkers,
    pub vocabulary: Vocabulary,
}
