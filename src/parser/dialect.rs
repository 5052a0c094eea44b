/// One decoded pin row from a path body, before interning into a `Db`.
#[derive(Debug, Clone)]
pub struct ParsedPin {
    pub name: String,
    pub cell: Option<String>,
    pub is_input: bool,
    pub rise: bool,
    pub trans: f64,
    pub incr_delay: f64,
    pub path_delay: f64,
    pub location: Option<(f64, f64)>,
}

/// One decoded net row, binding the pin immediately before it (a driver)
/// to the pin immediately after it (a sink).
#[derive(Debug, Clone)]
pub struct ParsedNet {
    pub name: String,
    pub fanout: u32,
    pub cap: f64,
}

#[derive(Debug, Clone)]
pub enum PathEntry {
    Pin(ParsedPin),
    Net(ParsedNet),
}

/// A fully decoded path block, ready to be ingested into a `Db`.
#[derive(Debug, Clone)]
pub struct ParsedPathRaw {
    pub startpoint: String,
    pub endpoint: String,
    pub group: String,
    pub path_type: String,
    pub clock: Option<String>,
    pub slack: f64,
    pub entries: Vec<PathEntry>,
}

/// Dialect-specific decoding of a report's line grammar. The pipeline
/// shell (producer/consumer, queueing) is shared across dialects; only the
/// block-boundary detection and the state-machine decoding differ.
pub trait Dialect: Send + Sync {
    /// True if `line` begins a new path record.
    fn is_block_start(&self, line: &str) -> bool;

    /// Decodes one accumulated block of lines into a path, or `None` if the
    /// block never reached a terminal state (malformed input; the caller
    /// logs and drops it).
    fn decode_block(&self, lines: &[String]) -> Option<ParsedPathRaw>;
}
