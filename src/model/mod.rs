//! The arena-owned data model parsed from one STA report: pins, nets, arcs
//! and paths, all addressed by stable integer ids rather than shared_ptr
//! handles (SPEC_FULL.md §9).

pub mod arc;
pub mod db;
pub mod net;
pub mod path;
pub mod pin;

pub use arc::{Arc, ArcKind};
pub use db::Db;
pub use net::Net;
pub use path::Path;
pub use pin::Pin;

macro_rules! newtype_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u32);

        impl $name {
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

newtype_id!(PinId);
newtype_id!(NetId);
newtype_id!(PathId);
newtype_id!(ArcId);

/// Rise or fall transition polarity, used throughout the pin/arc/query APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiseFall {
    Rise,
    Fall,
}

impl RiseFall {
    pub fn as_str(self) -> &'static str {
        match self {
            RiseFall::Rise => "rise",
            RiseFall::Fall => "fall",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "r" => Some(RiseFall::Rise),
            "f" => Some(RiseFall::Fall),
            _ => None,
        }
    }
}

/// A rise/fall pair of the same quantity, e.g. delay or slack.
pub type RiseFallPair = [f64; 2];

pub fn rf_index(rf: RiseFall) -> usize {
    match rf {
        RiseFall::Rise => 0,
        RiseFall::Fall => 1,
    }
}
