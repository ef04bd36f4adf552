//! Builders for graph test fixtures.

use flowvis_rs::graph::{DataEdge, Module, NetworkEdge, Sensor, StateEdge};

pub fn sensor(id: &str, state_keys: &[&str], returns: &[&str]) -> Sensor {
    Sensor {
        id: id.to_string(),
        state_keys: state_keys.iter().map(|s| s.to_string()).collect(),
        returns: returns.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn module(id: &str, params: &[&str], returns: &[&str], network: bool) -> Module {
    Module {
        id: id.to_string(),
        params: params.iter().map(|s| s.to_string()).collect(),
        returns: returns.iter().map(|s| s.to_string()).collect(),
        network,
    }
}

/// Stateless data edge.
pub fn data_edge(out_id: &str, out_ret: &str, module_id: &str, module_param: &str) -> DataEdge {
    DataEdge {
        stateless: true,
        out_id: out_id.to_string(),
        out_ret: out_ret.to_string(),
        module_id: module_id.to_string(),
        module_param: module_param.to_string(),
    }
}

pub fn state_edge(
    module_id: &str,
    module_ret: &str,
    sensor_id: &str,
    sensor_key: &str,
) -> StateEdge {
    StateEdge {
        module_id: module_id.to_string(),
        module_ret: module_ret.to_string(),
        sensor_id: sensor_id.to_string(),
        sensor_key: sensor_key.to_string(),
    }
}

pub fn network_edge(module_id: &str, domain: &str) -> NetworkEdge {
    NetworkEdge {
        module_id: module_id.to_string(),
        domain: domain.to_string(),
    }
}
