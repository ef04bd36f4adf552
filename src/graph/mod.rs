//! The dataflow graph model.
//!
//! Sensors (data sources with internal state) and modules (transformation
//! units) live in one disjoint namespace alongside the reserved network
//! node, and are connected by three edge kinds: data, state, and network.
//!
//! # Architecture
//!
//! ```text
//! register_sensor / register_module        add_*_edge / remove_data_edge
//!                │                                     │
//!                ▼                                     ▼
//!         [entity registry] ◄── validation ──── [edge engine]
//!                │                                     │
//!                └──────────► [GraphRenderer] ◄────────┘
//!                              opaque handles, recorded in
//!                              paired edge/handle ledgers
//! ```
//!
//! # Design
//!
//! - **Ordered precondition chains** — the first failing check decides the
//!   rejection reason; the reason strings are contract (`error.rs`).
//! - **All-or-nothing mutation** — validation produces a complete plan
//!   before any list or the renderer is touched.
//! - **One generic ledger** — `ConnectorLedger` pairs edges and visual
//!   handles by index on the source side and resolves by handle identity on
//!   the target side, where index alignment cannot be assumed.
//! - **Append-only entities** — schemas are frozen at registration; state
//!   and network edges have no removal path by design.

pub mod edge;
pub mod entity;
pub mod error;
#[allow(clippy::module_inception)]
pub mod graph;
pub mod ledger;

pub use edge::{DataEdge, NetworkEdge, StateEdge};
pub use entity::{EntityKind, Module, Sensor, NETWORK_NODE_ID};
pub use error::{GraphError, GraphResult};
pub use graph::{Graph, ModuleEntry, SensorEntry};
pub use ledger::ConnectorLedger;
