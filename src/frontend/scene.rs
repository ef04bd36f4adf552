//! Visual scene state — the egui-side realization of graph handles.
//!
//! `GraphScene` is the rendering collaborator the editor draws from. It owns
//! node and connector visuals keyed by the opaque handles it issues; all
//! placement logic (the vertical stacking counter for freshly created
//! nodes) lives here, never in the graph core.

use std::collections::BTreeMap;

use egui::Pos2;

use crate::render::{
    ConnectorHandle, ConnectorRequest, ConnectorStyle, GraphRenderer, NodeHandle, NodeKind,
};

/// Canvas x position for auto-placed sensor nodes.
const SENSOR_COLUMN_X: f32 = 60.0;
/// Canvas x position for auto-placed module nodes.
const MODULE_COLUMN_X: f32 = 380.0;
/// Canvas y position of the first auto-placed node.
const STACK_TOP: f32 = 60.0;
/// Vertical distance between successive auto-placed nodes.
const STACK_SPACING: f32 = 140.0;

/// A node visual: identity, slot names, and canvas position.
#[derive(Debug, Clone)]
pub struct NodeVisual {
    pub id: String,
    pub kind: NodeKind,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub pos: Pos2,
}

/// Scene state backing the editor canvas.
#[derive(Debug)]
pub struct GraphScene {
    nodes: BTreeMap<NodeHandle, NodeVisual>,
    connectors: BTreeMap<ConnectorHandle, ConnectorRequest>,
    next_handle: u64,
    stack_top: f32,
}

impl Default for GraphScene {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphScene {
    pub fn new() -> Self {
        Self {
            nodes: BTreeMap::new(),
            connectors: BTreeMap::new(),
            next_handle: 0,
            stack_top: STACK_TOP,
        }
    }

    pub fn node(&self, handle: NodeHandle) -> Option<&NodeVisual> {
        self.nodes.get(&handle)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeHandle, &NodeVisual)> {
        self.nodes.iter().map(|(h, v)| (*h, v))
    }

    pub fn connectors(&self) -> impl Iterator<Item = (ConnectorHandle, &ConnectorRequest)> {
        self.connectors.iter().map(|(h, r)| (*h, r))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn connector_count(&self) -> usize {
        self.connectors.len()
    }

    /// Move a node (drag repositioning). Connector endpoints are derived
    /// from node positions at paint time, so they follow automatically.
    pub fn set_node_pos(&mut self, handle: NodeHandle, pos: Pos2) {
        if let Some(node) = self.nodes.get_mut(&handle) {
            node.pos = pos;
        }
    }

    fn issue_handle(&mut self) -> u64 {
        let id = self.next_handle;
        self.next_handle += 1;
        id
    }
}

impl GraphRenderer for GraphScene {
    fn create_node(
        &mut self,
        id: &str,
        kind: NodeKind,
        inputs: &[String],
        outputs: &[String],
    ) -> NodeHandle {
        let handle = NodeHandle(self.issue_handle());
        let x = match kind {
            NodeKind::Sensor => SENSOR_COLUMN_X,
            NodeKind::Module => MODULE_COLUMN_X,
        };
        let pos = Pos2::new(x, self.stack_top);
        self.stack_top += STACK_SPACING;
        self.nodes.insert(
            handle,
            NodeVisual {
                id: id.to_string(),
                kind,
                inputs: inputs.to_vec(),
                outputs: outputs.to_vec(),
                pos,
            },
        );
        handle
    }

    fn create_connector(&mut self, request: &ConnectorRequest) -> ConnectorHandle {
        let handle = ConnectorHandle(self.issue_handle());
        match request.style {
            ConnectorStyle::Data { .. } => {
                self.connectors.insert(handle, *request);
            }
            // State and network connectors have no visual yet; hand back a
            // handle without recording anything.
            ConnectorStyle::State | ConnectorStyle::Network => {}
        }
        handle
    }

    fn destroy_connector(&mut self, handle: ConnectorHandle) {
        if self.connectors.remove(&handle).is_none() {
            tracing::debug!("destroy for untracked connector {handle:?}");
        }
    }
}
