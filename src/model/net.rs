use super::PinId;

/// An electrical net, represented here with exactly one driver/sink pair,
/// since the report format already splits multi-fanout nets into one Net
/// per driver-sink pair at the path level.
#[derive(Debug, Clone)]
pub struct Net {
    pub name: String,
    pub fanout: u32,
    pub cap: f64,
    pub driver: PinId,
    pub sink: PinId,
}
