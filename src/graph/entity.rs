//! Entity definitions: sensors, modules, and the reserved network node.
//!
//! Entities are immutable after registration — their slot lists (`state_keys`,
//! `params`, `returns`) are the schema every later edge reference is checked
//! against.

use serde::{Deserialize, Serialize};

/// Reserved identifier for the external network endpoint.
///
/// The network node always "exists" for namespace purposes but is never
/// stored in the registry and never owns edges.
pub const NETWORK_NODE_ID: &str = "NET";

/// A data source with internal state.
///
/// `state_keys` are the mutable slots a state edge may write into;
/// `returns` are the values the sensor produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sensor {
    pub id: String,
    pub state_keys: Vec<String>,
    pub returns: Vec<String>,
}

/// A transformation unit.
///
/// `params` are the inputs data edges feed; `returns` are the outputs.
/// `network` marks modules that declare egress via network edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub id: String,
    pub params: Vec<String>,
    pub returns: Vec<String>,
    pub network: bool,
}

/// Namespace membership of an identifier, decided in a single lookup.
///
/// Sensors, modules, and the reserved network id share one disjoint
/// namespace; resolving to a variant here (instead of probing the two
/// containers independently at each use site) rules out inconsistent
/// resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Sensor,
    Module,
    Network,
}
