//! # FlowVis-RS: Dataflow Graph Editor
//!
//! An interactive node-link editor for dataflow graphs of sensors (data
//! sources with internal state) and modules (transformation units),
//! connected by typed edges: data, state, and network.
//!
//! ## Architecture
//!
//! - **Graph core** (`graph`): entity registry and edge engine. Every
//!   mutation is validated against an ordered precondition chain and either
//!   applied atomically or rejected with a contractual reason string.
//! - **Renderer seam** (`render`): the core drives an opaque-handle
//!   `GraphRenderer` collaborator; paired edge/handle ledgers keep the
//!   logical model and its visual projection in lockstep.
//! - **Frontend** (`frontend`): eframe/egui implementation of the
//!   collaborator plus the editor canvas (drag, two-click connect) and
//!   inspector panel.
//! - **Config** (`config`): toml preferences in the platform data dir.
//!
//! The model is single-threaded and synchronous: visual handles are created
//! and destroyed inside the same call that mutates the logical graph, so
//! the two can never be observed diverging.
//!
//! ## Example
//!
//! ```
//! use flowvis_rs::graph::{DataEdge, Graph, Module, Sensor};
//! use flowvis_rs::render::RecordingRenderer;
//!
//! let mut graph = Graph::new(RecordingRenderer::new());
//! graph.register_sensor(Sensor {
//!     id: "s1".to_string(),
//!     state_keys: vec![],
//!     returns: vec!["temp".to_string()],
//! })?;
//! graph.register_module(Module {
//!     id: "m1".to_string(),
//!     params: vec!["x".to_string()],
//!     returns: vec!["y".to_string()],
//!     network: false,
//! })?;
//! graph.add_data_edge(DataEdge {
//!     stateless: true,
//!     out_id: "s1".to_string(),
//!     out_ret: "temp".to_string(),
//!     module_id: "m1".to_string(),
//!     module_param: "x".to_string(),
//! })?;
//! assert_eq!(graph.data_edge_count(), 1);
//! # Ok::<(), flowvis_rs::graph::GraphError>(())
//! ```

pub mod config;
pub mod error;
pub mod frontend;
pub mod graph;
pub mod render;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{FlowVisError, Result};
pub use frontend::FlowVisApp;
pub use graph::{
    DataEdge, EntityKind, Graph, GraphError, Module, NetworkEdge, Sensor, StateEdge,
    NETWORK_NODE_ID,
};
pub use render::{GraphRenderer, RecordingRenderer};
