//! External collaborators (C13): the pieces the distilled spec places out
//! of scope for the core matcher, wired through traits so the matcher
//! never special-cases them, grounded on
//! `examples/original_source/src/utils/{ignore_pattern,super_arc,design_cons}.*`.

use std::collections::HashMap;
use std::path::Path;

use regex::Regex;

use crate::error::{Error, Result};

/// Whether a pin name should be excluded from matching, per the `tool`
/// dialect it came from. Grounded on `ignore_pattern.cpp`'s
/// `check_ignore(tool, line)`.
pub trait IgnorePattern: Send + Sync {
    fn is_ignored(&self, tool: &str, pin_name: &str) -> bool;
}

/// Always includes every pin; the default when `enable_ignore_filter` is
/// off.
pub struct NoIgnorePatterns;

impl IgnorePattern for NoIgnorePatterns {
    fn is_ignored(&self, _tool: &str, _pin_name: &str) -> bool {
        false
    }
}

/// Per-tool regex ignore lists loaded from a YAML asset
/// (`{tool: [pattern, ...]}`), mirroring `ignore_pattern::load_pattern`.
pub struct RegexIgnorePatterns {
    patterns: HashMap<String, Vec<Regex>>,
}

impl RegexIgnorePatterns {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let raw: HashMap<String, Vec<String>> = serde_yaml::from_str(&text)?;
        let mut patterns = HashMap::with_capacity(raw.len());
        for (tool, exprs) in raw {
            let compiled: Vec<Regex> = exprs
                .iter()
                .map(|e| Regex::new(e).map_err(|err| Error::Config(format!("invalid ignore pattern {e:?}: {err}"))))
                .collect::<Result<_>>()?;
            patterns.insert(tool, compiled);
        }
        Ok(RegexIgnorePatterns { patterns })
    }
}

impl IgnorePattern for RegexIgnorePatterns {
    fn is_ignored(&self, tool: &str, pin_name: &str) -> bool {
        match self.patterns.get(tool) {
            Some(patterns) => patterns.iter().any(|re| re.is_match(pin_name)),
            None => false,
        }
    }
}

/// Whether a pin is internal to a super-arc (e.g. a clock-gater's guts)
/// for a given dialect, grounded on `super_arc.cpp`'s pin-sequence
/// collapsing.
pub trait SuperArc: Send + Sync {
    fn is_super_arc_internal(&self, dialect: &str, pin_name: &str) -> bool;
}

pub struct NoSuperArcs;

impl SuperArc for NoSuperArcs {
    fn is_super_arc_internal(&self, _dialect: &str, _pin_name: &str) -> bool {
        false
    }
}

/// Expands one physical endpoint name into the logical flop names it
/// represents (multi-bit flip-flops report one physical cell as many
/// logical endpoints).
pub trait MbffRewriter: Send + Sync {
    fn expand_endpoint(&self, endpoint: &str) -> Vec<String>;
}

pub struct IdentityMbff;

impl MbffRewriter for IdentityMbff {
    fn expand_endpoint(&self, endpoint: &str) -> Vec<String> {
        vec![endpoint.to_string()]
    }
}

/// A pattern-file-driven MBFF rewriter: a YAML map from one physical
/// endpoint name to the several logical flop names it represents. Falls
/// back to the identity expansion for any endpoint not listed.
pub struct PatternMbff {
    expansions: HashMap<String, Vec<String>>,
}

impl PatternMbff {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let expansions: HashMap<String, Vec<String>> = serde_yaml::from_str(&text)?;
        Ok(PatternMbff { expansions })
    }
}

impl MbffRewriter for PatternMbff {
    fn expand_endpoint(&self, endpoint: &str) -> Vec<String> {
        self.expansions
            .get(endpoint)
            .cloned()
            .unwrap_or_else(|| vec![endpoint.to_string()])
    }
}

/// An immutable design-name -> clock-period map, loaded once from a YAML
/// asset at orchestrator start, replacing the original's
/// process-global `design_cons` singleton (SPEC_FULL.md §9).
#[derive(Debug, Clone, Default)]
pub struct DesignConstants {
    periods: HashMap<String, f64>,
}

impl DesignConstants {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let periods: HashMap<String, f64> = serde_yaml::from_str(&text)?;
        Ok(DesignConstants { periods })
    }

    pub fn empty() -> Self {
        DesignConstants::default()
    }

    /// The clock period for `design_name`, or `None` if not listed
    /// (the original logs and returns 0; here the absence is explicit and
    /// callers decide how to treat it).
    pub fn period(&self, design_name: &str) -> Option<f64> {
        self.periods.get(design_name).copied()
    }

    /// The first configured design name that `report_path` contains, in
    /// the style of `design_cons::get_name`'s absolute-path substring
    /// match.
    pub fn design_for_report(&self, report_path: &str) -> Option<&str> {
        self.periods.keys().find(|design| report_path.contains(design.as_str())).map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_ignore_patterns_ignores_nothing() {
        assert!(!NoIgnorePatterns.is_ignored("leda", "FF1/Q"));
    }

    #[test]
    fn regex_ignore_patterns_load_and_match() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ignore.yml");
        std::fs::write(&path, "leda:\n  - \"^TESTPOINT_\"\n").unwrap();
        let patterns = RegexIgnorePatterns::load(&path).unwrap();
        assert!(patterns.is_ignored("leda", "TESTPOINT_CLK"));
        assert!(!patterns.is_ignored("leda", "FF1/Q"));
        assert!(!patterns.is_ignored("invs", "TESTPOINT_CLK"));
    }

    #[test]
    fn identity_mbff_returns_endpoint_unchanged() {
        assert_eq!(IdentityMbff.expand_endpoint("FF1/D"), vec!["FF1/D".to_string()]);
    }

    #[test]
    fn pattern_mbff_expands_listed_endpoints_and_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mbff.yml");
        std::fs::write(&path, "MBFF_INST/Q: [FF0/Q, FF1/Q, FF2/Q, FF3/Q]\n").unwrap();
        let mbff = PatternMbff::load(&path).unwrap();
        assert_eq!(
            mbff.expand_endpoint("MBFF_INST/Q"),
            vec!["FF0/Q".to_string(), "FF1/Q".to_string(), "FF2/Q".to_string(), "FF3/Q".to_string()]
        );
        assert_eq!(mbff.expand_endpoint("FF4/Q"), vec!["FF4/Q".to_string()]);
    }

    #[test]
    fn design_constants_looks_up_period_and_design_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("periods.yml");
        std::fs::write(&path, "chip_top: 2.5\n").unwrap();
        let cons = DesignConstants::load(&path).unwrap();
        assert_eq!(cons.period("chip_top"), Some(2.5));
        assert_eq!(cons.period("missing"), None);
        assert_eq!(cons.design_for_report("/reports/chip_top/run1.rpt"), Some("chip_top"));
    }
}
