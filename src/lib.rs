//! `rptdiff`: attributes timing differences between two static-timing-
//! analysis reports to the arcs, paths and fanouts that caused them.
//!
//! See `DESIGN.md` for the grounding ledger behind each module.

pub mod cli;
pub mod collab;
pub mod config;
pub mod error;
pub mod filter;
pub mod graph;
pub mod logging;
pub mod matcher;
pub mod model;
pub mod orchestrator;
pub mod parser;
pub mod writer;

pub use error::{Error, Result};
