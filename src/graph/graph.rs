//! The dataflow graph: entity registry + edge engine.
//!
//! Every mutation runs an ordered, short-circuiting precondition chain; the
//! FIRST failing condition determines the rejection reason, which is part of
//! the contract. Validation completes — producing a ready-to-execute plan —
//! before anything is touched, so a rejected call never leaves partial
//! state, and the paired edge/handle ledgers move in lockstep with the
//! rendering collaborator.

use std::collections::HashMap;

use serde::Serialize;

use crate::graph::edge::{DataEdge, NetworkEdge, StateEdge};
use crate::graph::entity::{EntityKind, Module, Sensor, NETWORK_NODE_ID};
use crate::graph::error::{GraphError, GraphResult};
use crate::graph::ledger::ConnectorLedger;
use crate::render::{
    slot_offset, ConnectorHandle, ConnectorRequest, ConnectorStyle, GraphRenderer, NodeHandle,
    NodeKind,
};

/// A registered sensor with its visual node and edge bookkeeping.
#[derive(Debug)]
pub struct SensorEntry {
    value: Sensor,
    node: NodeHandle,
    /// Data edges where this sensor is the source, paired with their
    /// connector handles at matching indices.
    outgoing: ConnectorLedger<DataEdge>,
}

impl SensorEntry {
    pub fn value(&self) -> &Sensor {
        &self.value
    }

    pub fn node(&self) -> NodeHandle {
        self.node
    }

    pub fn outgoing(&self) -> &ConnectorLedger<DataEdge> {
        &self.outgoing
    }
}

/// A registered module with its visual node and edge bookkeeping.
#[derive(Debug)]
pub struct ModuleEntry {
    value: Module,
    node: NodeHandle,
    /// Data edges where this module is the source.
    outgoing: ConnectorLedger<DataEdge>,
    /// Data edges targeting this module. Order here mirrors no single
    /// source's outgoing list — removal looks connectors up by identity.
    incoming: ConnectorLedger<DataEdge>,
    /// State writes this module performs. Append-only.
    state_edges: Vec<StateEdge>,
    /// Egress declarations. Append-only.
    network_edges: Vec<NetworkEdge>,
}

impl ModuleEntry {
    pub fn value(&self) -> &Module {
        &self.value
    }

    pub fn node(&self) -> NodeHandle {
        self.node
    }

    pub fn outgoing(&self) -> &ConnectorLedger<DataEdge> {
        &self.outgoing
    }

    pub fn incoming(&self) -> &ConnectorLedger<DataEdge> {
        &self.incoming
    }

    pub fn state_edges(&self) -> &[StateEdge] {
        &self.state_edges
    }

    pub fn network_edges(&self) -> &[NetworkEdge] {
        &self.network_edges
    }
}

/// Everything a data-edge removal will touch, located up front so the
/// paired-list updates are all-or-nothing.
struct RemovalPlan {
    source_index: usize,
    target_index: usize,
    handle: ConnectorHandle,
}

/// The dataflow graph, generic over its rendering collaborator.
pub struct Graph<R: GraphRenderer> {
    sensors: HashMap<String, SensorEntry>,
    modules: HashMap<String, ModuleEntry>,
    renderer: R,
}

impl<R: GraphRenderer> Graph<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            sensors: HashMap::new(),
            modules: HashMap::new(),
            renderer,
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    // ── Namespace ──

    /// Resolve namespace membership of an identifier in a single lookup.
    pub fn lookup(&self, id: &str) -> Option<EntityKind> {
        if id == NETWORK_NODE_ID {
            Some(EntityKind::Network)
        } else if self.sensors.contains_key(id) {
            Some(EntityKind::Sensor)
        } else if self.modules.contains_key(id) {
            Some(EntityKind::Module)
        } else {
            None
        }
    }

    // ── Registration ──

    /// Register a sensor. Rejects (no mutation) if the id already names a
    /// sensor, a module, or the reserved network node. Safe to retry.
    pub fn register_sensor(&mut self, sensor: Sensor) -> GraphResult<()> {
        if self.lookup(&sensor.id).is_some() {
            return Err(self.reject(GraphError::DuplicateEntityId, &sensor));
        }
        let node = self.renderer.create_node(
            &sensor.id,
            NodeKind::Sensor,
            &sensor.state_keys,
            &sensor.returns,
        );
        self.sensors.insert(
            sensor.id.clone(),
            SensorEntry {
                value: sensor,
                node,
                outgoing: ConnectorLedger::new(),
            },
        );
        Ok(())
    }

    /// Register a module. Same namespace rule as [`Graph::register_sensor`].
    pub fn register_module(&mut self, module: Module) -> GraphResult<()> {
        if self.lookup(&module.id).is_some() {
            return Err(self.reject(GraphError::DuplicateEntityId, &module));
        }
        let node = self.renderer.create_node(
            &module.id,
            NodeKind::Module,
            &module.params,
            &module.returns,
        );
        self.modules.insert(
            module.id.clone(),
            ModuleEntry {
                value: module,
                node,
                outgoing: ConnectorLedger::new(),
                incoming: ConnectorLedger::new(),
                state_edges: Vec::new(),
                network_edges: Vec::new(),
            },
        );
        Ok(())
    }

    // ── State edges ──

    /// Add a module → sensor state write. Append-only: no removal exists,
    /// so no index bookkeeping is kept for these.
    pub fn add_state_edge(&mut self, edge: StateEdge) -> GraphResult<()> {
        let request = match self.check_state_edge(&edge) {
            Ok(request) => request,
            Err(err) => return Err(self.reject(err, &edge)),
        };
        // The state connector has no visual effect today; the handle is
        // deliberately not tracked since these edges are never removed.
        let _ = self.renderer.create_connector(&request);
        if let Some(module) = self.modules.get_mut(&edge.module_id) {
            module.state_edges.push(edge);
        }
        Ok(())
    }

    fn check_state_edge(&self, edge: &StateEdge) -> GraphResult<ConnectorRequest> {
        if self.sensors.contains_key(&edge.module_id) {
            return Err(GraphError::StateEdgeOutputIsSensor);
        }
        if self.modules.contains_key(&edge.sensor_id) {
            return Err(GraphError::StateEdgeInputIsModule);
        }
        let Some(module) = self.modules.get(&edge.module_id) else {
            return Err(GraphError::UnknownOutputModule);
        };
        let Some(sensor) = self.sensors.get(&edge.sensor_id) else {
            return Err(GraphError::UnknownInputSensor);
        };
        let Some(ret_slot) = position(&module.value.returns, &edge.module_ret) else {
            return Err(GraphError::UnknownReturnValue);
        };
        let Some(key_slot) = position(&sensor.value.state_keys, &edge.sensor_key) else {
            return Err(GraphError::UnknownStateKey);
        };
        if module.state_edges.contains(edge) {
            return Err(GraphError::DuplicateStateEdge);
        }
        Ok(ConnectorRequest {
            source: module.node,
            source_slot: ret_slot,
            source_offset: 0.0,
            target: sensor.node,
            target_slot: key_slot,
            target_offset: 0.0,
            style: ConnectorStyle::State,
        })
    }

    // ── Network edges ──

    /// Declare a module's egress target. Append-only.
    pub fn add_network_edge(&mut self, edge: NetworkEdge) -> GraphResult<()> {
        if let Err(err) = self.check_network_edge(&edge) {
            return Err(self.reject(err, &edge));
        }
        // TODO: connect the module to a shared NET endpoint visual once the
        // reserved node gets a rendering.
        if let Some(module) = self.modules.get_mut(&edge.module_id) {
            module.network_edges.push(edge);
        }
        Ok(())
    }

    fn check_network_edge(&self, edge: &NetworkEdge) -> GraphResult<()> {
        if self.sensors.contains_key(&edge.module_id) {
            return Err(GraphError::NetworkEdgeOutputIsSensor);
        }
        let Some(module) = self.modules.get(&edge.module_id) else {
            return Err(GraphError::UnknownOutputModule);
        };
        if module.network_edges.contains(edge) {
            return Err(GraphError::DuplicateNetworkEdge);
        }
        Ok(())
    }

    // ── Data edges ──

    /// Add a data-flow edge. On success the edge and its connector handle
    /// land at the same index of the source's outgoing ledger, and in the
    /// target's incoming ledger.
    pub fn add_data_edge(&mut self, edge: DataEdge) -> GraphResult<()> {
        let request = match self.check_data_edge(&edge) {
            Ok(request) => request,
            Err(err) => return Err(self.reject(err, &edge)),
        };
        let handle = self.renderer.create_connector(&request);
        if let Some(outgoing) = self.outgoing_ledger_mut(&edge.out_id) {
            outgoing.push(edge.clone(), handle);
        }
        if let Some(target) = self.modules.get_mut(&edge.module_id) {
            target.incoming.push(edge, handle);
        }
        Ok(())
    }

    fn check_data_edge(&self, edge: &DataEdge) -> GraphResult<ConnectorRequest> {
        if self.sensors.contains_key(&edge.module_id) {
            return Err(GraphError::DataEdgeInputIsSensor);
        }
        let Some(target) = self.modules.get(&edge.module_id) else {
            return Err(GraphError::UnknownInputModule);
        };
        let Some(param_slot) = position(&target.value.params, &edge.module_param) else {
            return Err(GraphError::UnknownInputParam);
        };
        // Resolve the source: module first, then sensor. The namespace is
        // disjoint, so at most one can match.
        let (source_node, returns, outgoing) = if let Some(module) = self.modules.get(&edge.out_id)
        {
            (module.node, &module.value.returns, &module.outgoing)
        } else if let Some(sensor) = self.sensors.get(&edge.out_id) {
            (sensor.node, &sensor.value.returns, &sensor.outgoing)
        } else {
            return Err(GraphError::UnknownOutputEntity);
        };
        let Some(ret_slot) = position(returns, &edge.out_ret) else {
            return Err(GraphError::UnknownReturnValue);
        };
        if outgoing.contains(edge) {
            return Err(GraphError::DuplicateDataEdge);
        }
        // This edge becomes the (k+1)-th on each shared slot; existing
        // connectors keep their anchors.
        let source_sharing = outgoing
            .edges()
            .iter()
            .filter(|e| e.out_ret == edge.out_ret)
            .count();
        let target_sharing = target
            .incoming
            .edges()
            .iter()
            .filter(|e| e.module_param == edge.module_param)
            .count();
        Ok(ConnectorRequest {
            source: source_node,
            source_slot: ret_slot,
            source_offset: slot_offset(source_sharing, source_sharing + 1),
            target: target.node,
            target_slot: param_slot,
            target_offset: slot_offset(target_sharing, target_sharing + 1),
            style: ConnectorStyle::Data {
                stateless: edge.stateless,
            },
        })
    }

    /// Remove a data edge by value equality on the full tuple.
    ///
    /// The matching connector is removed from the source's outgoing ledger
    /// by index and from the target's incoming ledger by handle identity,
    /// then destroyed — all located before anything is mutated. A handle
    /// missing on either side means the positional-correspondence invariant
    /// was already broken; that is reported as a consistency error, not
    /// swallowed.
    pub fn remove_data_edge(&mut self, edge: &DataEdge) -> GraphResult<()> {
        let plan = match self.plan_data_edge_removal(edge) {
            Ok(plan) => plan,
            Err(err) if err.is_consistency() => {
                return Err(self.report_consistency(err, edge));
            }
            Err(err) => return Err(self.reject(err, edge)),
        };
        if let Some(outgoing) = self.outgoing_ledger_mut(&edge.out_id) {
            outgoing.remove(plan.source_index);
        }
        if let Some(target) = self.modules.get_mut(&edge.module_id) {
            target.incoming.remove(plan.target_index);
        }
        self.renderer.destroy_connector(plan.handle);
        Ok(())
    }

    fn plan_data_edge_removal(&self, edge: &DataEdge) -> GraphResult<RemovalPlan> {
        let Some(target) = self.modules.get(&edge.module_id) else {
            return Err(GraphError::UnknownInputModule);
        };
        let outgoing = if let Some(module) = self.modules.get(&edge.out_id) {
            &module.outgoing
        } else if let Some(sensor) = self.sensors.get(&edge.out_id) {
            &sensor.outgoing
        } else {
            return Err(GraphError::UnknownOutputEntity);
        };
        let Some(source_index) = outgoing.position(edge) else {
            return Err(GraphError::DataEdgeNotFound);
        };
        let Some(handle) = outgoing.handle_at(source_index) else {
            return Err(GraphError::Consistency(format!(
                "no outgoing handle for {} at index {source_index}",
                edge.out_id
            )));
        };
        let Some(target_index) = target.incoming.position_of_handle(handle) else {
            return Err(GraphError::Consistency(format!(
                "{handle:?} missing from incoming ledger of {}",
                edge.module_id
            )));
        };
        Ok(RemovalPlan {
            source_index,
            target_index,
            handle,
        })
    }

    // ── Queries ──

    pub fn sensor(&self, id: &str) -> Option<&SensorEntry> {
        self.sensors.get(id)
    }

    pub fn module(&self, id: &str) -> Option<&ModuleEntry> {
        self.modules.get(id)
    }

    pub fn sensors(&self) -> impl Iterator<Item = &SensorEntry> {
        self.sensors.values()
    }

    pub fn modules(&self) -> impl Iterator<Item = &ModuleEntry> {
        self.modules.values()
    }

    pub fn sensor_count(&self) -> usize {
        self.sensors.len()
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// All data edges, iterated per source.
    pub fn data_edges(&self) -> impl Iterator<Item = &DataEdge> {
        self.sensors
            .values()
            .flat_map(|s| s.outgoing.edges().iter())
            .chain(self.modules.values().flat_map(|m| m.outgoing.edges().iter()))
    }

    pub fn data_edge_count(&self) -> usize {
        self.data_edges().count()
    }

    pub fn state_edges(&self) -> impl Iterator<Item = &StateEdge> {
        self.modules.values().flat_map(|m| m.state_edges.iter())
    }

    pub fn network_edges(&self) -> impl Iterator<Item = &NetworkEdge> {
        self.modules.values().flat_map(|m| m.network_edges.iter())
    }

    /// Logical data edge behind a connector handle, if any.
    pub fn data_edge_for_connector(&self, handle: ConnectorHandle) -> Option<&DataEdge> {
        self.sensors
            .values()
            .map(|s| &s.outgoing)
            .chain(self.modules.values().map(|m| &m.outgoing))
            .find_map(|ledger| {
                ledger
                    .position_of_handle(handle)
                    .and_then(|i| ledger.edges().get(i))
            })
    }

    // ── Internals ──

    fn outgoing_ledger_mut(&mut self, id: &str) -> Option<&mut ConnectorLedger<DataEdge>> {
        if let Some(module) = self.modules.get_mut(id) {
            return Some(&mut module.outgoing);
        }
        self.sensors.get_mut(id).map(|s| &mut s.outgoing)
    }

    /// Diagnostics contract: the human-readable reason, followed by the
    /// serialized form of the rejected request.
    fn reject<T: Serialize + std::fmt::Debug>(&self, err: GraphError, request: &T) -> GraphError {
        match serde_json::to_string(request) {
            Ok(json) => tracing::warn!(request = %json, "{err}"),
            Err(_) => tracing::warn!(request = ?request, "{err}"),
        }
        err
    }

    /// Consistency breaches are prior invariant violations, not bad
    /// requests; they go out at error level.
    fn report_consistency<T: Serialize + std::fmt::Debug>(
        &self,
        err: GraphError,
        request: &T,
    ) -> GraphError {
        match serde_json::to_string(request) {
            Ok(json) => tracing::error!(request = %json, "{err}"),
            Err(_) => tracing::error!(request = ?request, "{err}"),
        }
        err
    }
}

fn position(values: &[String], wanted: &str) -> Option<usize> {
    values.iter().position(|v| v == wanted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{MockGraphRenderer, RecordingRenderer, SLOT_PITCH};
    use mockall::predicate::eq;

    fn sensor(id: &str, state_keys: &[&str], returns: &[&str]) -> Sensor {
        Sensor {
            id: id.to_string(),
            state_keys: state_keys.iter().map(|s| s.to_string()).collect(),
            returns: returns.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn module(id: &str, params: &[&str], returns: &[&str], network: bool) -> Module {
        Module {
            id: id.to_string(),
            params: params.iter().map(|s| s.to_string()).collect(),
            returns: returns.iter().map(|s| s.to_string()).collect(),
            network,
        }
    }

    fn data_edge(out_id: &str, out_ret: &str, module_id: &str, module_param: &str) -> DataEdge {
        DataEdge {
            stateless: true,
            out_id: out_id.to_string(),
            out_ret: out_ret.to_string(),
            module_id: module_id.to_string(),
            module_param: module_param.to_string(),
        }
    }

    /// Sensor s1 → module m1, the smallest useful graph.
    fn small_graph() -> Graph<RecordingRenderer> {
        let mut graph = Graph::new(RecordingRenderer::new());
        graph
            .register_sensor(sensor("s1", &[], &["temp"]))
            .expect("register s1");
        graph
            .register_module(module("m1", &["x"], &["y"], false))
            .expect("register m1");
        graph
    }

    // ── Registration ──

    #[test]
    fn test_register_creates_node_visual() {
        let graph = small_graph();
        assert_eq!(graph.renderer().nodes().len(), 2);
        assert_eq!(graph.renderer().nodes()[0].id, "s1");
        assert_eq!(graph.renderer().nodes()[0].kind, NodeKind::Sensor);
        assert_eq!(graph.renderer().nodes()[1].outputs, vec!["y".to_string()]);

        assert_eq!(graph.lookup("s1"), Some(EntityKind::Sensor));
        assert_eq!(graph.lookup("m1"), Some(EntityKind::Module));
        assert_eq!(graph.lookup(NETWORK_NODE_ID), Some(EntityKind::Network));
        assert_eq!(graph.lookup("nope"), None);
    }

    #[test]
    fn test_register_twice_is_rejected_without_mutation() {
        let mut graph = small_graph();
        let err = graph
            .register_sensor(sensor("s1", &["k"], &["other"]))
            .expect_err("duplicate id");
        assert_eq!(err, GraphError::DuplicateEntityId);

        // Registry unchanged: the original schema survives, no extra visual
        assert_eq!(graph.sensor_count(), 1);
        assert_eq!(
            graph.sensor("s1").map(|e| e.value().returns.clone()),
            Some(vec!["temp".to_string()])
        );
        assert_eq!(graph.renderer().nodes().len(), 2);
    }

    #[test]
    fn test_namespace_is_shared_across_kinds() {
        let mut graph = small_graph();
        assert!(graph.register_module(module("s1", &[], &[], false)).is_err());
        assert!(graph.register_sensor(sensor("m1", &[], &[])).is_err());
        assert!(graph
            .register_sensor(sensor(NETWORK_NODE_ID, &[], &[]))
            .is_err());
        assert_eq!(graph.sensor_count(), 1);
        assert_eq!(graph.module_count(), 1);
    }

    // ── Data edges ──

    #[test]
    fn test_add_data_edge_records_both_sides() {
        let mut graph = small_graph();
        let edge = data_edge("s1", "temp", "m1", "x");
        graph.add_data_edge(edge.clone()).expect("valid edge");

        let source = graph.sensor("s1").expect("s1 registered");
        let target = graph.module("m1").expect("m1 registered");
        assert_eq!(source.outgoing().edges(), &[edge.clone()]);
        assert_eq!(target.incoming().edges(), &[edge]);
        // Same handle on both sides
        assert_eq!(source.outgoing().handles(), target.incoming().handles());
        assert_eq!(graph.renderer().live_connectors().len(), 1);
    }

    #[test]
    fn test_add_data_edge_twice_is_rejected() {
        let mut graph = small_graph();
        let edge = data_edge("s1", "temp", "m1", "x");
        assert!(graph.add_data_edge(edge.clone()).is_ok());
        assert_eq!(
            graph.add_data_edge(edge.clone()),
            Err(GraphError::DuplicateDataEdge)
        );
        assert_eq!(graph.data_edge_count(), 1);
        assert_eq!(graph.renderer().live_connectors().len(), 1);
    }

    #[test]
    fn test_add_data_edge_from_module_source() {
        let mut graph = small_graph();
        graph
            .register_module(module("m2", &["in"], &["out"], false))
            .expect("register m2");
        let edge = data_edge("m1", "y", "m2", "in");
        graph.add_data_edge(edge.clone()).expect("module source");

        assert_eq!(
            graph.module("m1").map(|m| m.outgoing().edges().to_vec()),
            Some(vec![edge])
        );
    }

    #[test]
    fn test_add_data_edge_module_to_itself() {
        let mut graph = Graph::new(RecordingRenderer::new());
        graph
            .register_module(module("loop", &["x"], &["y"], false))
            .expect("register");
        let edge = data_edge("loop", "y", "loop", "x");
        graph.add_data_edge(edge.clone()).expect("self edge");

        let entry = graph.module("loop").expect("registered");
        assert_eq!(entry.outgoing().edges(), &[edge.clone()]);
        assert_eq!(entry.incoming().edges(), &[edge.clone()]);

        graph.remove_data_edge(&edge).expect("remove self edge");
        let entry = graph.module("loop").expect("registered");
        assert!(entry.outgoing().is_empty());
        assert!(entry.incoming().is_empty());
    }

    #[test]
    fn test_add_data_edge_precedence_chain() {
        let mut graph = small_graph();

        // (1) target is a sensor — wins over every later failure
        assert_eq!(
            graph.add_data_edge(data_edge("nope", "nope", "s1", "nope")),
            Err(GraphError::DataEdgeInputIsSensor)
        );
        // (2) unknown target module
        assert_eq!(
            graph.add_data_edge(data_edge("s1", "temp", "ghost", "x")),
            Err(GraphError::UnknownInputModule)
        );
        // (3) unknown param beats unknown source
        assert_eq!(
            graph.add_data_edge(data_edge("ghost", "temp", "m1", "ghost")),
            Err(GraphError::UnknownInputParam)
        );
        // (4) unknown source entity
        assert_eq!(
            graph.add_data_edge(data_edge("ghost", "temp", "m1", "x")),
            Err(GraphError::UnknownOutputEntity)
        );
        // (5) unknown return value on a resolved source
        assert_eq!(
            graph.add_data_edge(data_edge("s1", "humidity", "m1", "x")),
            Err(GraphError::UnknownReturnValue)
        );

        // Rejections were atomic
        assert_eq!(graph.data_edge_count(), 0);
        assert!(graph.renderer().live_connectors().is_empty());
    }

    #[test]
    fn test_connector_request_slots_and_style() {
        let mut graph = Graph::new(RecordingRenderer::new());
        graph
            .register_sensor(sensor("s", &[], &["a", "b"]))
            .expect("register s");
        graph
            .register_module(module("m", &["p", "q"], &[], false))
            .expect("register m");

        let mut edge = data_edge("s", "b", "m", "q");
        edge.stateless = false;
        graph.add_data_edge(edge).expect("valid edge");

        let request = *graph.renderer().last_request().expect("one connector");
        assert_eq!(request.source_slot, 1);
        assert_eq!(request.target_slot, 1);
        assert_eq!(request.style, ConnectorStyle::Data { stateless: false });
    }

    #[test]
    fn test_shared_slot_fans_out() {
        let mut graph = Graph::new(RecordingRenderer::new());
        graph
            .register_sensor(sensor("s", &[], &["temp"]))
            .expect("register s");
        graph
            .register_module(module("m", &["a", "b", "c"], &[], false))
            .expect("register m");

        graph.add_data_edge(data_edge("s", "temp", "m", "a")).expect("first");
        graph.add_data_edge(data_edge("s", "temp", "m", "b")).expect("second");
        graph.add_data_edge(data_edge("s", "temp", "m", "c")).expect("third");

        let offsets: Vec<f32> = graph
            .renderer()
            .live_connectors()
            .iter()
            .map(|(_, request)| request.source_offset)
            .collect();
        // k-th arrival on a slot shared by k+1 edges
        assert_eq!(offsets, vec![0.0, SLOT_PITCH / 2.0, SLOT_PITCH]);
        // Distinct target slots stay on their anchors
        for (_, request) in graph.renderer().live_connectors() {
            assert_eq!(request.target_offset, 0.0);
        }
    }

    #[test]
    fn test_remove_data_edge_round_trip() {
        let mut graph = small_graph();
        let edge = data_edge("s1", "temp", "m1", "x");
        graph.add_data_edge(edge.clone()).expect("add");

        graph.remove_data_edge(&edge).expect("first removal");
        assert_eq!(graph.data_edge_count(), 0);
        assert!(graph.renderer().live_connectors().is_empty());
        assert_eq!(graph.renderer().destroyed().len(), 1);

        // Second removal fails; destroy is not called again
        assert_eq!(
            graph.remove_data_edge(&edge),
            Err(GraphError::DataEdgeNotFound)
        );
        assert_eq!(graph.renderer().destroyed().len(), 1);
    }

    #[test]
    fn test_remove_matches_by_value_not_identity() {
        let mut graph = small_graph();
        graph
            .add_data_edge(data_edge("s1", "temp", "m1", "x"))
            .expect("add");
        // A freshly built, equal-valued tuple removes the stored edge
        let lookalike = data_edge("s1", "temp", "m1", "x");
        graph.remove_data_edge(&lookalike).expect("value match");
        assert_eq!(graph.data_edge_count(), 0);
    }

    #[test]
    fn test_remove_with_fan_in_destroys_only_the_right_connector() {
        let mut graph = Graph::new(RecordingRenderer::new());
        graph
            .register_sensor(sensor("s1", &[], &["temp"]))
            .expect("register s1");
        graph
            .register_sensor(sensor("s2", &[], &["temp"]))
            .expect("register s2");
        graph
            .register_module(module("m", &["x"], &[], false))
            .expect("register m");

        let first = data_edge("s1", "temp", "m", "x");
        let second = data_edge("s2", "temp", "m", "x");
        graph.add_data_edge(first.clone()).expect("add first");
        graph.add_data_edge(second.clone()).expect("add second");

        let first_handle = graph
            .sensor("s1")
            .and_then(|s| s.outgoing().handle_at(0))
            .expect("first handle");

        graph.remove_data_edge(&first).expect("remove first");

        // s2's edge and connector survive untouched
        assert_eq!(graph.renderer().destroyed(), &[first_handle]);
        let target = graph.module("m").expect("registered");
        assert_eq!(target.incoming().edges(), &[second.clone()]);
        assert_eq!(
            target.incoming().handles(),
            graph
                .sensor("s2")
                .map(|s| s.outgoing().handles())
                .expect("s2 registered")
        );
    }

    #[test]
    fn test_remove_preconditions() {
        let mut graph = small_graph();
        assert_eq!(
            graph.remove_data_edge(&data_edge("s1", "temp", "ghost", "x")),
            Err(GraphError::UnknownInputModule)
        );
        assert_eq!(
            graph.remove_data_edge(&data_edge("ghost", "temp", "m1", "x")),
            Err(GraphError::UnknownOutputEntity)
        );
        assert_eq!(
            graph.remove_data_edge(&data_edge("s1", "temp", "m1", "x")),
            Err(GraphError::DataEdgeNotFound)
        );
    }

    #[test]
    fn test_exactly_one_destroy_per_removal() {
        let mut renderer = MockGraphRenderer::new();
        let mut node = 0u64;
        renderer
            .expect_create_node()
            .times(2)
            .returning(move |_, _, _, _| {
                node += 1;
                NodeHandle(node)
            });
        renderer
            .expect_create_connector()
            .times(1)
            .returning(|_| ConnectorHandle(99));
        renderer
            .expect_destroy_connector()
            .with(eq(ConnectorHandle(99)))
            .times(1)
            .return_const(());

        let mut graph = Graph::new(renderer);
        graph
            .register_sensor(sensor("s1", &[], &["temp"]))
            .expect("register s1");
        graph
            .register_module(module("m1", &["x"], &[], false))
            .expect("register m1");

        let edge = data_edge("s1", "temp", "m1", "x");
        graph.add_data_edge(edge.clone()).expect("add");
        graph.remove_data_edge(&edge).expect("remove");
        assert!(graph.remove_data_edge(&edge).is_err());
        // MockGraphRenderer verifies call counts on drop
    }

    #[test]
    fn test_data_edge_for_connector() {
        let mut graph = small_graph();
        let edge = data_edge("s1", "temp", "m1", "x");
        graph.add_data_edge(edge.clone()).expect("add");

        let handle = graph
            .sensor("s1")
            .and_then(|s| s.outgoing().handle_at(0))
            .expect("handle recorded");
        assert_eq!(graph.data_edge_for_connector(handle), Some(&edge));
        assert_eq!(graph.data_edge_for_connector(ConnectorHandle(u64::MAX)), None);
    }

    // ── State edges ──

    fn state_edge(module_id: &str, module_ret: &str, sensor_id: &str, sensor_key: &str) -> StateEdge {
        StateEdge {
            module_id: module_id.to_string(),
            module_ret: module_ret.to_string(),
            sensor_id: sensor_id.to_string(),
            sensor_key: sensor_key.to_string(),
        }
    }

    fn stateful_graph() -> Graph<RecordingRenderer> {
        let mut graph = Graph::new(RecordingRenderer::new());
        graph
            .register_sensor(sensor("light", &["on", "brightness"], &["level"]))
            .expect("register light");
        graph
            .register_module(module("dimmer", &["level"], &["setting"], false))
            .expect("register dimmer");
        graph
    }

    #[test]
    fn test_add_state_edge() {
        let mut graph = stateful_graph();
        let edge = state_edge("dimmer", "setting", "light", "brightness");
        graph.add_state_edge(edge.clone()).expect("valid edge");

        assert_eq!(
            graph.module("dimmer").map(|m| m.state_edges().to_vec()),
            Some(vec![edge])
        );
    }

    #[test]
    fn test_add_state_edge_duplicate_by_value() {
        let mut graph = stateful_graph();
        graph
            .add_state_edge(state_edge("dimmer", "setting", "light", "on"))
            .expect("first");
        // An equal-valued tuple built separately still counts as a duplicate
        assert_eq!(
            graph.add_state_edge(state_edge("dimmer", "setting", "light", "on")),
            Err(GraphError::DuplicateStateEdge)
        );
        assert_eq!(graph.state_edges().count(), 1);
    }

    #[test]
    fn test_state_edge_precedence_first_reason_wins() {
        let mut graph = stateful_graph();
        // module_id names a sensor AND sensor_id names a module: the first
        // condition in the chain decides the reason.
        assert_eq!(
            graph.add_state_edge(state_edge("light", "level", "dimmer", "on")),
            Err(GraphError::StateEdgeOutputIsSensor)
        );
    }

    #[test]
    fn test_state_edge_precedence_chain() {
        let mut graph = stateful_graph();
        assert_eq!(
            graph.add_state_edge(state_edge("ghost", "r", "dimmer", "k")),
            Err(GraphError::StateEdgeInputIsModule)
        );
        assert_eq!(
            graph.add_state_edge(state_edge("ghost", "r", "light", "on")),
            Err(GraphError::UnknownOutputModule)
        );
        assert_eq!(
            graph.add_state_edge(state_edge("dimmer", "setting", "ghost", "on")),
            Err(GraphError::UnknownInputSensor)
        );
        assert_eq!(
            graph.add_state_edge(state_edge("dimmer", "ghost", "light", "on")),
            Err(GraphError::UnknownReturnValue)
        );
        assert_eq!(
            graph.add_state_edge(state_edge("dimmer", "setting", "light", "ghost")),
            Err(GraphError::UnknownStateKey)
        );
        assert!(graph.state_edges().next().is_none());
    }

    // ── Network edges ──

    fn network_edge(module_id: &str, domain: &str) -> NetworkEdge {
        NetworkEdge {
            module_id: module_id.to_string(),
            domain: domain.to_string(),
        }
    }

    #[test]
    fn test_add_network_edge() {
        let mut graph = small_graph();
        graph
            .add_network_edge(network_edge("m1", "api.example.com"))
            .expect("valid edge");
        graph
            .add_network_edge(network_edge("m1", "cdn.example.com"))
            .expect("second domain");
        assert_eq!(graph.network_edges().count(), 2);
        // No connector is requested for network edges today
        assert!(graph.renderer().live_connectors().is_empty());
    }

    #[test]
    fn test_network_edge_precedence_chain() {
        let mut graph = small_graph();
        assert_eq!(
            graph.add_network_edge(network_edge("s1", "api.example.com")),
            Err(GraphError::NetworkEdgeOutputIsSensor)
        );
        assert_eq!(
            graph.add_network_edge(network_edge("ghost", "api.example.com")),
            Err(GraphError::UnknownOutputModule)
        );

        graph
            .add_network_edge(network_edge("m1", "api.example.com"))
            .expect("valid edge");
        assert_eq!(
            graph.add_network_edge(network_edge("m1", "api.example.com")),
            Err(GraphError::DuplicateNetworkEdge)
        );
        assert_eq!(graph.network_edges().count(), 1);
    }
}
