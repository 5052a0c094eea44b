//! Pattern-level filter application (SPEC_FULL.md §4.6.1), evaluating each
//! configured `analyse_pattern` against a comparison record and, when a
//! record matches more than one pattern, picking the "dominant" one.

use crate::config::{AnalysePattern, FilterTypeFlag, PatternTarget};
use crate::filter::Filter;

use super::record::ComparisonRecord;

/// A compiled pattern: the raw config plus one compiled filter per
/// configured `{attribute, filter, type}` entry.
pub struct CompiledPattern {
    pub name: String,
    pub target: PatternTarget,
    filters: Vec<(String, Filter, Vec<FilterTypeFlag>)>,
}

impl CompiledPattern {
    pub fn compile(pattern: &AnalysePattern) -> crate::error::Result<Self> {
        let mut filters = Vec::with_capacity(pattern.filters.len());
        for f in &pattern.filters {
            filters.push((f.attribute.clone(), Filter::compile(&f.filter)?, f.type_flags.clone()));
        }
        Ok(CompiledPattern {
            name: pattern.name.clone(),
            target: pattern.target,
            filters,
        })
    }

    fn target_matches(&self, record: &ComparisonRecord) -> bool {
        match self.target {
            PatternTarget::Path => true,
            PatternTarget::CellArc => record.arc_type == "cell arc",
            PatternTarget::NetArc => record.arc_type == "net arc",
        }
    }

    /// True if `record` passes every filter in this pattern. A filter whose
    /// attribute isn't present on the record (e.g. `slack` when no CSV
    /// pin-attribute side-channel supplied slacks) fails closed.
    pub fn matches(&self, record: &ComparisonRecord) -> bool {
        if !self.target_matches(record) {
            return false;
        }
        self.filters.iter().all(|(attribute, filter, flags)| {
            let Some((key_v, value_v)) = record.attribute(attribute) else {
                return false;
            };
            filter.eval(effective_scalar(key_v, value_v, flags))
        })
    }

    /// This pattern's contribution weight for `record`, used to pick the
    /// dominant pattern among several matches: the fraction of the path's
    /// slack delta this arc itself accounts for.
    fn contribution(&self, record: &ComparisonRecord) -> f64 {
        record.delta_slack.map(f64::abs).unwrap_or(0.0)
    }
}

/// Computes the scalar fed to the filter VM for one attribute, per
/// SPEC_FULL.md §4.6.1's `raw[0..1] -> x` pipeline.
fn effective_scalar(key_v: f64, value_v: f64, flags: &[FilterTypeFlag]) -> f64 {
    let mut x = key_v;
    if flags.contains(&FilterTypeFlag::Delta) {
        x = value_v - key_v;
    }
    if flags.contains(&FilterTypeFlag::Abs) {
        x = x.abs();
    }
    if flags.contains(&FilterTypeFlag::Percent) {
        x /= value_v;
    }
    x
}

/// For every record, finds the patterns it matches, and (when more than
/// one matches) the dominant one: the match whose `contribution` is
/// largest. The accumulator starts at zero explicitly (SPEC_FULL.md §9's
/// resolution of the `tns_contribute`-initialization open question).
pub fn dominant_pattern<'a>(
    patterns: &'a [CompiledPattern],
    record: &ComparisonRecord,
) -> Option<&'a str> {
    let mut best_name: Option<&str> = None;
    let mut best_contribution = 0.0f64;
    for pattern in patterns {
        if !pattern.matches(record) {
            continue;
        }
        let contribution = pattern.contribution(record);
        if best_name.is_none() || contribution > best_contribution {
            best_name = Some(pattern.name.as_str());
            best_contribution = contribution;
        }
    }
    best_name
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PatternFilter;
    use crate::matcher::record::SideRecord;

    fn sample_record(delta_slack: Option<f64>) -> ComparisonRecord {
        ComparisonRecord {
            arc_type: "cell arc",
            from: "A (rise)".into(),
            to: "B (rise)".into(),
            key: SideRecord {
                pins: vec![],
                delay: 1.0,
                slack: Some(1.0),
                length: None,
            },
            value: SideRecord {
                pins: vec![],
                delay: 0.5,
                slack: Some(0.4),
                length: None,
            },
            delta_delay: 0.5,
            delta_slack,
            delta_length: None,
            fanout: None,
        }
    }

    #[test]
    fn filter_precedence_scenario_f() {
        // x > 0 && x < 10 || x == 100
        let pattern = AnalysePattern {
            name: "p".into(),
            target: PatternTarget::CellArc,
            filters: vec![PatternFilter {
                attribute: "delay".into(),
                filter: "x > 0 && x < 10 || x == 100".into(),
                type_flags: vec![],
            }],
        };
        let compiled = CompiledPattern::compile(&pattern).unwrap();
        for (delay, expect) in [(100.0, true), (5.0, true), (50.0, false), (-1.0, false), (0.0, false)] {
            let mut record = sample_record(None);
            record.key.delay = delay;
            assert_eq!(compiled.matches(&record), expect, "delay={delay}");
        }
    }

    #[test]
    fn dominant_pattern_picks_largest_contribution() {
        let weak = AnalysePattern {
            name: "weak".into(),
            target: PatternTarget::Path,
            filters: vec![PatternFilter {
                attribute: "delay".into(),
                filter: "x >= 0".into(),
                type_flags: vec![],
            }],
        };
        let strong = AnalysePattern {
            name: "strong".into(),
            target: PatternTarget::Path,
            filters: vec![PatternFilter {
                attribute: "delay".into(),
                filter: "x >= 0".into(),
                type_flags: vec![],
            }],
        };
        let compiled = vec![
            CompiledPattern::compile(&weak).unwrap(),
            CompiledPattern::compile(&strong).unwrap(),
        ];
        let record = sample_record(Some(0.6));
        assert_eq!(dominant_pattern(&compiled, &record), Some("weak"));
    }
}
