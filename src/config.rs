//! Run configuration, loaded from YAML.
//!
//! Mirrors the shape of `forest/src/cli/config.rs`: a `#[serde(default)]`
//! struct with an explicit `Default` impl, loaded with `serde_yaml` and then
//! validated by a plain function rather than leaning on serde alone.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Compare,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportDialect {
    Leda,
    Invs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompareMode {
    Endpoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterTypeFlag {
    Delta,
    Abs,
    Percent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternTarget {
    Path,
    #[serde(rename = "cell arc")]
    CellArc,
    #[serde(rename = "net arc")]
    NetArc,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternFilter {
    pub attribute: String,
    pub filter: String,
    #[serde(default, rename = "type")]
    pub type_flags: Vec<FilterTypeFlag>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysePattern {
    pub name: String,
    pub target: PatternTarget,
    #[serde(default)]
    pub filters: Vec<PatternFilter>,
}

fn default_output_dir() -> String {
    "output".to_string()
}

fn default_num_consumers() -> usize {
    4
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub mode: Mode,
    #[serde(rename = "type")]
    pub types: Vec<ReportDialect>,
    pub rpts: Vec<String>,
    pub compare_mode: Option<CompareMode>,
    pub output_dir: String,
    pub analyse_tuples: Vec<(String, String)>,
    pub analyse_patterns: Vec<AnalysePattern>,
    pub slack_filter: Option<String>,
    pub fanout_filter: Option<String>,
    pub delay_filter: Option<String>,
    pub allow_unplaced_pins: bool,
    pub enable_mbff: bool,
    pub enable_super_arc: bool,
    pub enable_ignore_filter: bool,
    pub enable_rise_fall: bool,
    pub num_consumers: usize,
    pub log_level: Option<String>,

    /// Asset paths for the external collaborators (SPEC_FULL.md §4.12),
    /// consulted only when the matching `enable_*` flag above is set.
    pub ignore_pattern_path: Option<String>,
    pub mbff_pattern_path: Option<String>,
    pub design_period_path: Option<String>,

    /// CSV side-channels (SPEC_FULL.md §4.11), keyed by the `rpts` id they
    /// augment. Not part of the distilled §6.2 key list, since the CSV
    /// side-channel's own config surface was left unspecified there; named
    /// here so C12's loaders have a caller.
    pub pin_attribute_csv: HashMap<String, String>,
    pub cell_arc_csv: HashMap<String, String>,
    pub net_arc_csv: HashMap<String, String>,
    pub net_arc_fanout_csv: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            mode: Mode::Compare,
            types: Vec::new(),
            rpts: Vec::new(),
            compare_mode: None,
            output_dir: default_output_dir(),
            analyse_tuples: Vec::new(),
            analyse_patterns: Vec::new(),
            slack_filter: None,
            fanout_filter: None,
            delay_filter: None,
            allow_unplaced_pins: false,
            enable_mbff: false,
            enable_super_arc: false,
            enable_ignore_filter: false,
            enable_rise_fall: false,
            num_consumers: default_num_consumers(),
            log_level: None,
            ignore_pattern_path: None,
            mbff_pattern_path: None,
            design_period_path: None,
            pin_attribute_csv: HashMap::new(),
            cell_arc_csv: HashMap::new(),
            net_arc_csv: HashMap::new(),
            net_arc_fanout_csv: HashMap::new(),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.rpts.is_empty() {
            return Err(Error::Config("`rpts` must not be empty".into()));
        }
        if self.types.len() != self.rpts.len() {
            return Err(Error::Config(format!(
                "`type` has {} entries but `rpts` has {}; they must match one-for-one",
                self.types.len(),
                self.rpts.len()
            )));
        }
        if self.types.iter().any(|t| *t != ReportDialect::Leda) {
            return Err(Error::Config(
                "only the \"leda\" report dialect is supported in this release".into(),
            ));
        }
        if self.num_consumers == 0 {
            return Err(Error::Config("`num_consumers` must be at least 1".into()));
        }
        for (key, value) in &self.analyse_tuples {
            if !self.rpts.contains(key) {
                return Err(Error::Config(format!(
                    "analyse_tuples references unknown report id {key:?}"
                )));
            }
            if !self.rpts.contains(value) {
                return Err(Error::Config(format!(
                    "analyse_tuples references unknown report id {value:?}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_round_trip() {
        let cfg = Config::default();
        assert_eq!(cfg.output_dir, "output");
        assert_eq!(cfg.num_consumers, 4);
        assert!(!cfg.allow_unplaced_pins);
    }

    #[test]
    fn rejects_mismatched_type_rpts_lengths() {
        let mut cfg = Config::default();
        cfg.rpts = vec!["a.rpt".into(), "b.rpt".into()];
        cfg.types = vec![ReportDialect::Leda];
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_invs_dialect() {
        let mut cfg = Config::default();
        cfg.rpts = vec!["a.rpt".into()];
        cfg.types = vec![ReportDialect::Invs];
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn parses_minimal_yaml() {
        let yaml = r#"
mode: compare
type: [leda, leda]
rpts: [a.rpt, b.rpt]
analyse_tuples:
  - [a.rpt, b.rpt]
"#;
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.rpts.len(), 2);
    }
}
