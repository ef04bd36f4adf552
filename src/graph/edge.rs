//! Edge types connecting entities.
//!
//! All three kinds derive field-wise `PartialEq` — duplicate detection is
//! value equality on the full tuple — and `Serialize`, because rejected
//! requests are emitted in serialized form on the diagnostics stream.

use serde::{Deserialize, Serialize};

/// Data-flow edge: a sensor or module return value feeding a module param.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataEdge {
    /// Stateless edges re-trigger the consumer on every sample; stateful
    /// ones only deliver the latest value. Drawn dashed when stateful.
    pub stateless: bool,
    /// Source entity (sensor or module).
    pub out_id: String,
    /// Return value on the source.
    pub out_ret: String,
    /// Target module.
    pub module_id: String,
    /// Parameter on the target module.
    pub module_param: String,
}

/// State write-back edge. Direction is fixed: module → sensor only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateEdge {
    pub module_id: String,
    pub module_ret: String,
    pub sensor_id: String,
    pub sensor_key: String,
}

/// A module's declared egress target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkEdge {
    pub module_id: String,
    pub domain: String,
}
