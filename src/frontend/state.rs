//! Shared frontend types.
//!
//! Panes return `EditorAction`s instead of mutating the graph directly.
//! This keeps UI code testable and funnels every mutation through one
//! handler (which is also where rejection reasons surface in the status
//! bar).

use crate::graph::{DataEdge, Module, NetworkEdge, Sensor, StateEdge};

/// Actions any pane can emit.
#[derive(Debug, Clone)]
pub enum EditorAction {
    /// Register a new sensor.
    RegisterSensor(Sensor),
    /// Register a new module.
    RegisterModule(Module),
    /// Connect a source return value to a module parameter.
    AddDataEdge(DataEdge),
    /// Connect a module return value to a sensor state key.
    AddStateEdge(StateEdge),
    /// Declare a module egress domain.
    AddNetworkEdge(NetworkEdge),
    /// Remove a data edge (the only removable kind).
    RemoveDataEdge(DataEdge),
}
