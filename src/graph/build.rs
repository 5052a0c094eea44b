use crate::model::Db;

use super::engine::ShortestPathEngine;

/// Two parallel graph instances, one per transition polarity, built by
/// parameterizing the edge-weight extractor (SPEC_FULL.md §9), matching
/// `sparse_graph_shortest_path_rf.{h,cpp}`.
pub struct RiseFallGraphs {
    pub rise: ShortestPathEngine,
    pub fall: ShortestPathEngine,
}

fn edges_for(db: &Db, rise: bool) -> Vec<(String, String, f64)> {
    db.all_arcs()
        .iter()
        .map(|arc| {
            let from = db.pin(arc.from).name.clone();
            let to = db.pin(arc.to).name.clone();
            (from, to, arc.delay_for(rise))
        })
        .collect()
}

/// Builds both polarity graphs, one per spawned thread, joining both
/// before returning (SPEC_FULL.md §5's "two join points").
pub fn build_rise_fall(db: &Db) -> RiseFallGraphs {
    let (rise, fall) = std::thread::scope(|scope| {
        let rise_handle = scope.spawn(|| ShortestPathEngine::from_edges(&edges_for(db, true)));
        let fall_handle = scope.spawn(|| ShortestPathEngine::from_edges(&edges_for(db, false)));
        (
            rise_handle.join().expect("rise graph builder panicked"),
            fall_handle.join().expect("fall graph builder panicked"),
        )
    });
    RiseFallGraphs { rise, fall }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ArcKind, Net, Path, Pin, RiseFall};

    #[test]
    fn builds_independent_rise_and_fall_graphs() {
        let mut db = Db::new();
        let a = db.intern_pin("a", || Pin::new("a", false, RiseFall::Rise));
        let b = db.intern_pin("b", || {
            let mut p = Pin::new("b", true, RiseFall::Rise);
            p.incr_delay = 1.0;
            p
        });
        db.add_net(Net {
            name: "n1".into(),
            fanout: 1,
            cap: 0.0,
            driver: a,
            sink: b,
        });
        db.add_path(Path {
            startpoint: "s".into(),
            endpoint: "e".into(),
            group: "g".into(),
            path_type: "max".into(),
            clock: None,
            slack: 0.0,
            pins: vec![a, b],
        });
        db.finalize();
        assert_eq!(db.all_arcs()[0].kind, ArcKind::NetArc);

        let graphs = build_rise_fall(&db);
        assert_eq!(graphs.rise.query("a", "b").distance, 1.0);
        // No fall-polarity observation was recorded; the fall graph still
        // has the edge but with weight 0.0 (unseen rows default to 0.0).
        assert_eq!(graphs.fall.query("a", "b").distance, 0.0);
    }
}
