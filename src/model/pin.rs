use super::{NetId, RiseFall, RiseFallPair};

/// A named signal port on a cell instance, or a design-boundary port.
#[derive(Debug, Clone)]
pub struct Pin {
    pub name: String,
    pub cell: Option<String>,
    pub is_input: bool,
    pub rise_fall: RiseFall,
    pub location: Option<(f64, f64)>,
    pub trans: f64,
    pub incr_delay: f64,
    pub path_delay: f64,
    pub net: Option<NetId>,

    /// Populated only when a pin-attribute CSV side-channel is present.
    pub caps: Option<RiseFallPair>,
    pub transs: Option<RiseFallPair>,
    pub path_delays: Option<RiseFallPair>,
    pub path_slacks: Option<RiseFallPair>,
}

impl Pin {
    pub fn new(name: impl Into<String>, is_input: bool, rise_fall: RiseFall) -> Self {
        Pin {
            name: name.into(),
            cell: None,
            is_input,
            rise_fall,
            location: None,
            trans: 0.0,
            incr_delay: 0.0,
            path_delay: 0.0,
            net: None,
            caps: None,
            transs: None,
            path_delays: None,
            path_slacks: None,
        }
    }

    /// The slack attributed to this pin by a CSV side-channel, taken as the
    /// minimum of the rise/fall path slacks, matching the PinAT schema's
    /// `path_slack = min(rise, fall)` derivation.
    pub fn path_slack(&self) -> Option<f64> {
        self.path_slacks.map(|[rise, fall]| rise.min(fall))
    }
}
