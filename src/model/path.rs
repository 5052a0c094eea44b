use super::PinId;

/// A register-to-register timing path: an ordered sequence of pins,
/// alternating cell-output -> cell-input (a net arc) and cell-input ->
/// cell-output (a cell arc).
#[derive(Debug, Clone)]
pub struct Path {
    pub startpoint: String,
    pub endpoint: String,
    pub group: String,
    pub path_type: String,
    pub clock: Option<String>,
    pub slack: f64,
    pub pins: Vec<PinId>,
}

impl Path {
    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }
}
