//! Rendering collaborator interface.
//!
//! The graph core never draws anything. It asks a [`GraphRenderer`] for
//! opaque node and connector handles when mutations succeed, and hands
//! connector handles back on teardown. All pixel and placement logic —
//! anchor points, stacking, colors — lives behind this trait.
//!
//! Two implementations ship with the crate:
//! - `frontend::GraphScene` — egui visual state for the editor canvas.
//! - [`RecordingRenderer`] — headless, for tests and benches.

pub mod offset;
pub mod recording;

pub use offset::{slot_offset, SLOT_PITCH};
pub use recording::RecordingRenderer;

use std::fmt;

#[cfg(test)]
use mockall::automock;

/// Opaque handle to a node visual issued by the collaborator.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeHandle(pub u64);

impl fmt::Debug for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeHandle({})", self.0)
    }
}

/// Opaque handle to a connector visual.
///
/// Identity (equality) is the only operation the core performs on it — in
/// particular when locating a connector in an incoming ledger whose order
/// mirrors no single outgoing list.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectorHandle(pub u64);

impl fmt::Debug for ConnectorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConnectorHandle({})", self.0)
    }
}

/// Which entity kind a node visual represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Sensor,
    Module,
}

/// Visual treatment of a connector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConnectorStyle {
    /// Data-flow connector. Drawn dashed when the edge is stateful.
    Data { stateless: bool },
    /// Module-to-sensor state write. Currently drawn as nothing.
    State,
    /// Module egress declaration. Currently drawn as nothing.
    Network,
}

/// A request for a connector between two slot anchor points.
///
/// Slot indices select the anchor on each node; offsets fan out connectors
/// that share an anchor (see [`slot_offset`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectorRequest {
    pub source: NodeHandle,
    /// Index into the source node's output slots.
    pub source_slot: usize,
    /// Horizontal fan-out offset from the source anchor, in pixels.
    pub source_offset: f32,
    pub target: NodeHandle,
    /// Index into the target node's input slots.
    pub target_slot: usize,
    pub target_offset: f32,
    pub style: ConnectorStyle,
}

/// Collaborator that realizes graph mutations as visuals.
///
/// `create_node` receives the slot names so the collaborator can expose
/// per-slot anchor points. Handle creation and destruction happen
/// synchronously inside the graph mutation that triggers them, so the
/// logical model and its visual projection are never observably divergent.
#[cfg_attr(test, automock)]
pub trait GraphRenderer {
    /// Create a node visual with named input/output slots.
    fn create_node(
        &mut self,
        id: &str,
        kind: NodeKind,
        inputs: &[String],
        outputs: &[String],
    ) -> NodeHandle;

    /// Create a connector between two slot anchors.
    fn create_connector(&mut self, request: &ConnectorRequest) -> ConnectorHandle;

    /// Tear down a connector previously returned by `create_connector`.
    fn destroy_connector(&mut self, handle: ConnectorHandle);
}
