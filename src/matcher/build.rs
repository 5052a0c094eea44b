//! The arc matcher (C6): joins every arc in the key report against the
//! value-side shortest-path graph, grounded on
//! `examples/original_source/src/analyser/pair_analyser_graph.cpp`'s
//! `process_arc_segment`, simplified per SPEC_FULL.md §4.6 to walk single
//! arcs directly (rather than pre-paired cell+net tuples) and to query
//! both rise and fall polarities independently.

use indexmap::IndexMap;
use rayon::prelude::*;

use crate::graph::RiseFallGraphs;
use crate::model::{Arc, ArcKind, Db};

use super::record::{ComparisonRecord, PinDescriptor, SideRecord};

fn manhattan_length(points: &[(f64, f64)]) -> f64 {
    points
        .windows(2)
        .map(|w| (w[1].0 - w[0].0).abs() + (w[1].1 - w[0].1).abs())
        .sum()
}

fn rf_idx(rise: bool) -> usize {
    if rise { 0 } else { 1 }
}

/// Builds a pin descriptor for `name` out of whatever `db` knows about it
/// (report-parsed fields, plus any CSV side-channel merged directly into
/// the same Db by `parser::csv_side`). Returns `None` if the pin is
/// unplaced (absent from `db`'s pin table).
fn pin_descriptor(db: &Db, name: &str, incr_delay: f64, rise: bool) -> Option<PinDescriptor> {
    let id = db.pin_id(name)?;
    let pin = db.pin(id);
    let i = rf_idx(rise);
    Some(PinDescriptor {
        name: name.to_string(),
        is_input: pin.is_input,
        incr_delay,
        rf: rise,
        path_delay: Some(pin.path_delays.map(|p| p[i]).unwrap_or(pin.path_delay)),
        location: pin.location,
        trans: Some(pin.transs.map(|p| p[i]).unwrap_or(pin.trans)),
        cap: pin.caps.map(|p| p[i]),
    })
}

/// The output key string for one arc/polarity comparison
/// (SPEC_FULL.md §4.6, "Keying for output sort").
pub fn record_key(from: &str, to: &str, rise: bool) -> String {
    let rf = if rise { "(rise)" } else { "(fall)" };
    format!("{from} {rf}-{to} {rf}")
}

/// Builds one comparison record for a single key-side arc and polarity, or
/// `None` if the value graph reports no path, or if the record must be
/// dropped because an endpoint is unplaced and `allow_unplaced_pins` is
/// false.
fn build_record(
    key_db: &Db,
    value_db: &Db,
    graphs: &RiseFallGraphs,
    arc: &Arc,
    rise: bool,
    allow_unplaced_pins: bool,
) -> Option<(String, ComparisonRecord)> {
    let from_name = &key_db.pin(arc.from).name;
    let to_name = &key_db.pin(arc.to).name;

    let engine = if rise { &graphs.rise } else { &graphs.fall };
    let query = engine.query(from_name, to_name);
    if query.distance < 0.0 {
        tracing::info!(from = %from_name, to = %to_name, rise, "no value-side path, skipping arc");
        return None;
    }

    let key_delay = arc.delay_for(rise);
    let key_from = pin_descriptor(key_db, from_name, 0.0, rise);
    let key_to = pin_descriptor(key_db, to_name, key_delay, rise);

    if !allow_unplaced_pins && (key_from.is_none() || key_to.is_none()) {
        return None;
    }

    let mut value_pins = Vec::with_capacity(query.path.len());
    if let Some(d) = pin_descriptor(value_db, &query.path[0], 0.0, rise) {
        value_pins.push(d);
    } else if !allow_unplaced_pins {
        return None;
    }

    let mut is_cell_arc = matches!(arc.kind, ArcKind::CellArc);
    for window in query.path.windows(2) {
        let (mid_from, mid_to) = (&window[0], &window[1]);
        let mid_delay = if is_cell_arc {
            value_db.cell_arc(mid_from, mid_to).map(|a| a.delay_for(rise))
        } else {
            value_db.net_arc(mid_from, mid_to).map(|a| a.delay_for(rise))
        };
        let mid_delay = mid_delay.unwrap_or_else(|| {
            tracing::warn!(
                from = mid_from.as_str(),
                to = mid_to.as_str(),
                "no matching arc in value report for mid-path segment, using 0.0"
            );
            0.0
        });
        match pin_descriptor(value_db, mid_to, mid_delay, rise) {
            Some(d) => value_pins.push(d),
            None if !allow_unplaced_pins => return None,
            None => {}
        }
        is_cell_arc = !is_cell_arc;
    }

    let key_from_name = key_from.as_ref().map(|p| p.name.clone());
    let key_to_name = key_to.as_ref().map(|p| p.name.clone());
    let key_pins: Vec<PinDescriptor> = [key_from, key_to].into_iter().flatten().collect();

    let key_slack = key_to_name
        .as_deref()
        .and_then(|n| key_db.pin_id(n))
        .and_then(|id| key_db.pin(id).path_slack());
    let value_slack = query
        .path
        .last()
        .and_then(|n| value_db.pin_id(n))
        .and_then(|id| value_db.pin(id).path_slack());
    let (slack_k, slack_v, delta_slack) = match (key_slack, value_slack) {
        (Some(k), Some(v)) => (Some(k), Some(v), Some(k - v)),
        _ => (None, None, None),
    };

    let key_locations: Option<Vec<(f64, f64)>> =
        key_pins.iter().map(|p| p.location).collect::<Option<Vec<_>>>();
    let value_locations: Option<Vec<(f64, f64)>> =
        value_pins.iter().map(|p| p.location).collect::<Option<Vec<_>>>();
    let (len_k, len_v, delta_length) = match (&key_locations, &value_locations) {
        (Some(k), Some(v)) => {
            let lk = manhattan_length(k);
            let lv = manhattan_length(v);
            (Some(lk), Some(lv), Some(lk - lv))
        }
        _ => (None, None, None),
    };

    let from_display = key_from_name.unwrap_or_else(|| from_name.clone());
    let to_display = key_to_name.unwrap_or_else(|| to_name.clone());
    let key_str = record_key(&from_display, &to_display, rise);

    let record = ComparisonRecord {
        arc_type: arc.kind.as_str(),
        from: format!("{from_display} {}", if rise { "(rise)" } else { "(fall)" }),
        to: format!("{to_display} {}", if rise { "(rise)" } else { "(fall)" }),
        key: SideRecord {
            pins: key_pins,
            delay: key_delay,
            slack: slack_k,
            length: len_k,
        },
        value: SideRecord {
            pins: value_pins,
            delay: query.distance,
            slack: slack_v,
            length: len_v,
        },
        delta_delay: key_delay - query.distance,
        delta_slack,
        delta_length,
        fanout: arc.fanout,
    };
    Some((key_str, record))
}

/// Walks every arc in `key.all_arcs()` against both rise and fall polarity
/// value-side graphs, chunking work across a `rayon` parallel iterator
/// (SPEC_FULL.md §4.6, "Parallelism"), then merges and sorts the results
/// lexicographically by key.
pub fn match_arcs(
    key_db: &Db,
    value_db: &Db,
    graphs: &RiseFallGraphs,
    allow_unplaced_pins: bool,
) -> IndexMap<String, ComparisonRecord> {
    let arcs = key_db.all_arcs();
    let chunk_count = std::cmp::min(4, arcs.len().max(1));
    let chunk_size = arcs.len().div_ceil(chunk_count).max(1);

    let mut records: Vec<(String, ComparisonRecord)> = arcs
        .par_chunks(chunk_size)
        .flat_map(|chunk| {
            let mut local = Vec::new();
            for arc in chunk {
                for &rise in &[true, false] {
                    if let Some(rec) =
                        build_record(key_db, value_db, graphs, arc, rise, allow_unplaced_pins)
                    {
                        local.push(rec);
                    }
                }
            }
            local
        })
        .collect();

    records.sort_by(|a, b| a.0.cmp(&b.0));
    records.into_iter().collect()
}
