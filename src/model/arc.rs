use super::{PinId, RiseFallPair};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArcKind {
    CellArc,
    NetArc,
}

impl ArcKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ArcKind::CellArc => "cell arc",
            ArcKind::NetArc => "net arc",
        }
    }
}

/// A directed timing edge between two pins.
#[derive(Debug, Clone)]
pub struct Arc {
    pub from: PinId,
    pub to: PinId,
    pub kind: ArcKind,
    /// [rise, fall] delay.
    pub delay: RiseFallPair,
    pub fanout: Option<u32>,
}

impl Arc {
    pub fn delay_for(&self, rise: bool) -> f64 {
        if rise { self.delay[0] } else { self.delay[1] }
    }
}
