use std::collections::HashMap;

use indexmap::IndexMap;

use super::{Arc, ArcId, ArcKind, Net, NetId, Path, PathId, Pin, PinId, rf_index};

/// The aggregate parsed from one report: an arena owning every Pin, Net,
/// Path and Arc, addressed by stable integer ids (SPEC_FULL.md §9).
#[derive(Debug, Clone, Default)]
pub struct Db {
    pub report_type: String,
    pub tool: String,
    pub design: String,

    pins: Vec<Pin>,
    pin_index: IndexMap<String, PinId>,
    nets: Vec<Net>,
    paths: Vec<Path>,
    all_arcs: Vec<Arc>,
    arc_index: IndexMap<(PinId, PinId, ArcKind), ArcId>,
    cell_arcs_flat: HashMap<(String, String), ArcId>,
    net_arcs_flat: HashMap<(String, String), ArcId>,
}

impl Db {
    pub fn new() -> Self {
        Db::default()
    }

    /// Returns the existing pin id for `name`, or inserts a fresh Pin built
    /// by `make` and returns its new id. First occurrence wins, matching
    /// the dedup-by-name contract of C3.
    pub fn intern_pin(&mut self, name: &str, make: impl FnOnce() -> Pin) -> PinId {
        if let Some(&id) = self.pin_index.get(name) {
            return id;
        }
        let id = PinId(self.pins.len() as u32);
        self.pins.push(make());
        self.pin_index.insert(name.to_string(), id);
        id
    }

    pub fn pin(&self, id: PinId) -> &Pin {
        &self.pins[id.index()]
    }

    pub fn pin_mut(&mut self, id: PinId) -> &mut Pin {
        &mut self.pins[id.index()]
    }

    pub fn pin_id(&self, name: &str) -> Option<PinId> {
        self.pin_index.get(name).copied()
    }

    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    pub fn add_net(&mut self, net: Net) -> NetId {
        let id = NetId(self.nets.len() as u32);
        self.nets.push(net);
        id
    }

    pub fn nets(&self) -> &[Net] {
        &self.nets
    }

    pub fn add_path(&mut self, path: Path) -> PathId {
        let id = PathId(self.paths.len() as u32);
        self.paths.push(path);
        id
    }

    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    pub fn all_arcs(&self) -> &[Arc] {
        &self.all_arcs
    }

    pub fn arc(&self, id: ArcId) -> &Arc {
        &self.all_arcs[id.index()]
    }

    pub fn cell_arc(&self, from: &str, to: &str) -> Option<&Arc> {
        self.cell_arcs_flat
            .get(&(from.to_string(), to.to_string()))
            .map(|&id| self.arc(id))
    }

    pub fn net_arc(&self, from: &str, to: &str) -> Option<&Arc> {
        self.net_arcs_flat
            .get(&(from.to_string(), to.to_string()))
            .map(|&id| self.arc(id))
    }

    /// Inserts (or updates) an arc for a (from, to) pin pair observed while
    /// walking a path, recording the delay for whichever rise/fall polarity
    /// the `to` pin's row carries.
    pub fn record_arc_observation(
        &mut self,
        from: PinId,
        to: PinId,
        kind: ArcKind,
        fanout: Option<u32>,
    ) {
        let to_pin = self.pin(to);
        let rf = to_pin.rise_fall;
        let delay_value = to_pin.incr_delay;

        let key = (from, to, kind);
        let arc_id = *self.arc_index.entry(key).or_insert_with(|| {
            let id = ArcId(self.all_arcs.len() as u32);
            self.all_arcs.push(Arc {
                from,
                to,
                kind,
                delay: [0.0, 0.0],
                fanout,
            });
            id
        });

        let arc = &mut self.all_arcs[arc_id.index()];
        arc.delay[rf_index(rf)] = delay_value;
        if fanout.is_some() {
            arc.fanout = fanout;
        }
    }

    /// Directly inserts or overwrites an arc's delay/fanout, bypassing the
    /// per-rise/fall-occurrence accumulation `record_arc_observation` does.
    /// Used by CSV side-channel loading (SPEC_FULL.md §4.11), which
    /// supplies both polarities' delays in a single row.
    pub fn upsert_arc(
        &mut self,
        from: PinId,
        to: PinId,
        kind: ArcKind,
        delay: super::RiseFallPair,
        fanout: Option<u32>,
    ) -> ArcId {
        let key = (from, to, kind);
        if let Some(&id) = self.arc_index.get(&key) {
            let arc = &mut self.all_arcs[id.index()];
            arc.delay = delay;
            if fanout.is_some() {
                arc.fanout = fanout;
            }
            return id;
        }
        let id = ArcId(self.all_arcs.len() as u32);
        self.all_arcs.push(Arc {
            from,
            to,
            kind,
            delay,
            fanout,
        });
        self.arc_index.insert(key, id);
        let from_name = self.pins[from.index()].name.clone();
        let to_name = self.pins[to.index()].name.clone();
        match kind {
            ArcKind::CellArc => {
                self.cell_arcs_flat.insert((from_name, to_name), id);
            }
            ArcKind::NetArc => {
                self.net_arcs_flat.insert((from_name, to_name), id);
            }
        }
        id
    }

    /// Derives `all_arcs` from every path's pin sequence, builds the flat
    /// lookup tables, and sorts `paths` by slack ascending. Must be called
    /// once after all paths have been added.
    pub fn finalize(&mut self) {
        let path_count = self.paths.len();
        for i in 0..path_count {
            let pins = self.paths[i].pins.clone();
            for window in pins.windows(2) {
                let (from, to) = (window[0], window[1]);
                let kind = if self.pin(from).is_input {
                    ArcKind::CellArc
                } else {
                    ArcKind::NetArc
                };
                let fanout = self
                    .pin(from)
                    .net
                    .map(|net_id| self.nets[net_id.index()].fanout);
                self.record_arc_observation(from, to, kind, fanout);
            }
        }

        self.paths
            .sort_by(|a, b| a.slack.partial_cmp(&b.slack).unwrap_or(std::cmp::Ordering::Equal));

        for (idx, arc) in self.all_arcs.iter().enumerate() {
            let id = ArcId(idx as u32);
            let from_name = self.pins[arc.from.index()].name.clone();
            let to_name = self.pins[arc.to.index()].name.clone();
            match arc.kind {
                ArcKind::CellArc => {
                    self.cell_arcs_flat.insert((from_name, to_name), id);
                }
                ArcKind::NetArc => {
                    self.net_arcs_flat.insert((from_name, to_name), id);
                }
            }
        }
    }
}
