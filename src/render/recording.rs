//! Headless collaborator for tests and benches.
//!
//! Records every call and keeps the set of live connectors, so tests can
//! assert exactly-once create/destroy behavior without a UI.

use crate::render::{ConnectorHandle, ConnectorRequest, GraphRenderer, NodeHandle, NodeKind};

/// A node visual as recorded by [`RecordingRenderer`].
#[derive(Debug, Clone)]
pub struct RecordedNode {
    pub handle: NodeHandle,
    pub id: String,
    pub kind: NodeKind,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
}

/// Renderer that records calls instead of drawing.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    next_handle: u64,
    nodes: Vec<RecordedNode>,
    live: Vec<(ConnectorHandle, ConnectorRequest)>,
    destroyed: Vec<ConnectorHandle>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[RecordedNode] {
        &self.nodes
    }

    /// Connectors created and not yet destroyed.
    pub fn live_connectors(&self) -> &[(ConnectorHandle, ConnectorRequest)] {
        &self.live
    }

    /// Every handle passed to `destroy_connector`, in order.
    pub fn destroyed(&self) -> &[ConnectorHandle] {
        &self.destroyed
    }

    /// The most recently created connector request.
    pub fn last_request(&self) -> Option<&ConnectorRequest> {
        self.live.last().map(|(_, request)| request)
    }
}

impl GraphRenderer for RecordingRenderer {
    fn create_node(
        &mut self,
        id: &str,
        kind: NodeKind,
        inputs: &[String],
        outputs: &[String],
    ) -> NodeHandle {
        let handle = NodeHandle(self.next_handle);
        self.next_handle += 1;
        self.nodes.push(RecordedNode {
            handle,
            id: id.to_string(),
            kind,
            inputs: inputs.to_vec(),
            outputs: outputs.to_vec(),
        });
        handle
    }

    fn create_connector(&mut self, request: &ConnectorRequest) -> ConnectorHandle {
        let handle = ConnectorHandle(self.next_handle);
        self.next_handle += 1;
        self.live.push((handle, *request));
        handle
    }

    fn destroy_connector(&mut self, handle: ConnectorHandle) {
        self.live.retain(|(h, _)| *h != handle);
        self.destroyed.push(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::ConnectorStyle;

    fn request(source: NodeHandle, target: NodeHandle) -> ConnectorRequest {
        ConnectorRequest {
            source,
            source_slot: 0,
            source_offset: 0.0,
            target,
            target_slot: 0,
            target_offset: 0.0,
            style: ConnectorStyle::Data { stateless: true },
        }
    }

    #[test]
    fn test_handles_are_unique() {
        let mut renderer = RecordingRenderer::new();
        let a = renderer.create_node("a", NodeKind::Sensor, &[], &["out".into()]);
        let b = renderer.create_node("b", NodeKind::Module, &["in".into()], &[]);
        let c = renderer.create_connector(&request(a, b));
        assert_ne!(a, b);
        assert_ne!(a.0, c.0);
        assert_ne!(b.0, c.0);
    }

    #[test]
    fn test_destroy_removes_from_live_set() {
        let mut renderer = RecordingRenderer::new();
        let a = renderer.create_node("a", NodeKind::Sensor, &[], &["out".into()]);
        let b = renderer.create_node("b", NodeKind::Module, &["in".into()], &[]);
        let conn = renderer.create_connector(&request(a, b));

        assert_eq!(renderer.live_connectors().len(), 1);
        renderer.destroy_connector(conn);
        assert!(renderer.live_connectors().is_empty());
        assert_eq!(renderer.destroyed(), &[conn]);
    }
}
