//! Fixed comparison-record schema, serialized directly via `serde_json`
//! rather than the original's dynamic `nlohmann::json` tree (SPEC_FULL.md
//! §9, "Dynamic JSON assembly").

use serde::Serialize;

/// One pin along a key- or value-side arc/path, annotated with whatever the
/// Db (plus any CSV side-channel merged into it) knows about it.
#[derive(Debug, Clone, Serialize)]
pub struct PinDescriptor {
    pub name: String,
    pub is_input: bool,
    pub incr_delay: f64,
    pub rf: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_delay: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<(f64, f64)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trans: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cap: Option<f64>,
}

/// One side (key or value) of a comparison record.
#[derive(Debug, Clone, Serialize)]
pub struct SideRecord {
    pub pins: Vec<PinDescriptor>,
    pub delay: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slack: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
}

/// One arc's key-vs-value comparison, keyed for output by
/// `matcher::build::record_key`.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonRecord {
    #[serde(rename = "type")]
    pub arc_type: &'static str,
    pub from: String,
    pub to: String,
    pub key: SideRecord,
    pub value: SideRecord,
    pub delta_delay: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta_slack: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta_length: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fanout: Option<u32>,
}

impl ComparisonRecord {
    /// Reads a named scalar attribute off this record for filter evaluation
    /// (SPEC_FULL.md §4.6.1): `(key.A, value.A)`.
    pub fn attribute(&self, name: &str) -> Option<(f64, f64)> {
        match name {
            "delay" => Some((self.key.delay, self.value.delay)),
            "slack" => match (self.key.slack, self.value.slack) {
                (Some(k), Some(v)) => Some((k, v)),
                _ => None,
            },
            "length" => match (self.key.length, self.value.length) {
                (Some(k), Some(v)) => Some((k, v)),
                _ => None,
            },
            _ => None,
        }
    }
}
