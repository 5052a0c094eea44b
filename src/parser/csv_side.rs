//! Optional CSV side-channels supplying pin/arc attributes out of band,
//! grounded on `examples/original_source/src/parser/csv_parser.cpp`.

use std::path::Path;

use crate::error::{Error, Result};
use crate::model::{ArcKind, Db, Pin, RiseFall};

/// Which arc-attribute CSV shape is being read; only `NetArcFanout` carries
/// a `fanout` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcCsvType {
    CellArc,
    NetArc,
    NetArcFanout,
}

impl ArcCsvType {
    fn arc_kind(self) -> ArcKind {
        match self {
            ArcCsvType::CellArc => ArcKind::CellArc,
            ArcCsvType::NetArc | ArcCsvType::NetArcFanout => ArcKind::NetArc,
        }
    }
}

/// Loads a pin-attribute CSV (`pin, x, y, max_rise_slack, max_fall_slack,
/// max_rise_cap, max_fall_cap, max_rise_trans, max_fall_trans,
/// max_rise_at, max_fall_at`) into `db`, creating any pin not already
/// present.
pub fn load_pin_attributes(path: impl AsRef<Path>, db: &mut Db) -> Result<()> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let required = ["pin", "x", "y"];
    for col in required {
        if !headers.iter().any(|h| h == col) {
            return Err(Error::Config(format!(
                "pin attribute csv missing required column {col:?}"
            )));
        }
    }

    for record in reader.records() {
        let record = record?;
        let get = |name: &str| -> Option<&str> {
            headers.iter().position(|h| h == name).and_then(|i| record.get(i))
        };
        let Some(pin_name) = get("pin") else { continue };
        let x: f64 = get("x").and_then(|v| v.parse().ok()).unwrap_or(0.0);
        let y: f64 = get("y").and_then(|v| v.parse().ok()).unwrap_or(0.0);
        let rise_slack = get("max_rise_slack").and_then(|v| v.parse().ok());
        let fall_slack = get("max_fall_slack").and_then(|v| v.parse().ok());
        let rise_cap = get("max_rise_cap").and_then(|v| v.parse().ok());
        let fall_cap = get("max_fall_cap").and_then(|v| v.parse().ok());
        let rise_trans = get("max_rise_trans").and_then(|v| v.parse().ok());
        let fall_trans = get("max_fall_trans").and_then(|v| v.parse().ok());
        let rise_at = get("max_rise_at").and_then(|v| v.parse().ok());
        let fall_at = get("max_fall_at").and_then(|v| v.parse().ok());

        let name = pin_name.to_string();
        let id = db.intern_pin(&name, || Pin::new(name.clone(), false, RiseFall::Rise));
        let pin = db.pin_mut(id);
        pin.location = Some((x, y));
        if let (Some(r), Some(f)) = (rise_slack, fall_slack) {
            pin.path_slacks = Some([r, f]);
        }
        if let (Some(r), Some(f)) = (rise_cap, fall_cap) {
            pin.caps = Some([r, f]);
        }
        if let (Some(r), Some(f)) = (rise_trans, fall_trans) {
            pin.transs = Some([r, f]);
        }
        if let (Some(r), Some(f)) = (rise_at, fall_at) {
            pin.path_delays = Some([r, f]);
        }
    }
    Ok(())
}

/// Loads an arc-attribute CSV (`from_pin, to_pin, setup_delay_rise,
/// setup_delay_fall`, plus `fanout` for `NetArcFanout`) directly into
/// `db`'s arc tables, bypassing the report parser.
pub fn load_arc_attributes(path: impl AsRef<Path>, db: &mut Db, csv_type: ArcCsvType) -> Result<()> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let mut required = vec!["from_pin", "to_pin", "setup_delay_rise", "setup_delay_fall"];
    if csv_type == ArcCsvType::NetArcFanout {
        required.push("fanout");
    }
    for col in &required {
        if !headers.iter().any(|h| h == *col) {
            return Err(Error::Config(format!(
                "arc attribute csv missing required column {col:?}"
            )));
        }
    }

    for record in reader.records() {
        let record = record?;
        let get = |name: &str| -> Option<&str> {
            headers.iter().position(|h| h == name).and_then(|i| record.get(i))
        };
        let (Some(from), Some(to)) = (get("from_pin"), get("to_pin")) else {
            continue;
        };
        let rise: f64 = get("setup_delay_rise").and_then(|v| v.parse().ok()).unwrap_or(0.0);
        let fall: f64 = get("setup_delay_fall").and_then(|v| v.parse().ok()).unwrap_or(0.0);
        let fanout: Option<u32> = get("fanout").and_then(|v| v.parse().ok());

        let from_name = from.to_string();
        let to_name = to.to_string();
        let from_id = db.intern_pin(&from_name, || Pin::new(from_name.clone(), false, RiseFall::Rise));
        let to_id = db.intern_pin(&to_name, || Pin::new(to_name.clone(), true, RiseFall::Rise));
        db.upsert_arc(from_id, to_id, csv_type.arc_kind(), [rise, fall], fanout);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_pin_attribute_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pins.csv");
        std::fs::write(
            &path,
            "pin,x,y,max_rise_slack,max_fall_slack,max_rise_cap,max_fall_cap,max_rise_trans,max_fall_trans,max_rise_at,max_fall_at\n\
             FF1/Q,1,2,0.5,0.4,0.1,0.2,0.3,0.35,1.0,1.1\n",
        )
        .unwrap();
        let mut db = Db::new();
        load_pin_attributes(&path, &mut db).unwrap();
        let id = db.pin_id("FF1/Q").unwrap();
        let pin = db.pin(id);
        assert_eq!(pin.location, Some((1.0, 2.0)));
        assert_eq!(pin.path_slack(), Some(0.4));
    }

    #[test]
    fn loads_arc_attribute_csv_with_fanout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("arcs.csv");
        std::fs::write(
            &path,
            "from_pin,to_pin,setup_delay_rise,setup_delay_fall,fanout\nA,B,0.1,0.2,3\n",
        )
        .unwrap();
        let mut db = Db::new();
        load_arc_attributes(&path, &mut db, ArcCsvType::NetArcFanout).unwrap();
        let arc = db.net_arc("A", "B").unwrap();
        assert_eq!(arc.delay, [0.1, 0.2]);
        assert_eq!(arc.fanout, Some(3));
    }
}
