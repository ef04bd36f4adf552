//! Inspector side panel — entity/edge listing and registration forms.
//!
//! The listing mirrors the graph's logical contents in serialized form, the
//! same shape the diagnostics stream uses, which makes it easy to eyeball a
//! rejected request against what is actually registered.

use egui::Ui;

use crate::frontend::scene::GraphScene;
use crate::frontend::state::EditorAction;
use crate::graph::{Graph, Module, NetworkEdge, Sensor};

/// Form state for the inspector panel.
#[derive(Default)]
pub struct InspectorState {
    sensor_id: String,
    sensor_keys: String,
    sensor_returns: String,
    module_id: String,
    module_params: String,
    module_returns: String,
    module_network: bool,
    network_module: String,
    network_domain: String,
}

/// Parse a comma-separated slot list.
fn csv_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn json_line<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "<unserializable>".to_string())
}

/// Render the inspector panel.
pub fn render(
    state: &mut InspectorState,
    graph: &Graph<GraphScene>,
    ui: &mut Ui,
) -> Vec<EditorAction> {
    let mut actions = Vec::new();

    egui::ScrollArea::vertical().show(ui, |ui| {
        ui.heading("Inspector");
        ui.separator();

        ui.collapsing(format!("Sensors ({})", graph.sensor_count()), |ui| {
            let mut sensors: Vec<&Sensor> = graph.sensors().map(|e| e.value()).collect();
            sensors.sort_by(|a, b| a.id.cmp(&b.id));
            for sensor in sensors {
                ui.monospace(json_line(sensor));
            }
        });

        ui.collapsing(format!("Modules ({})", graph.module_count()), |ui| {
            let mut modules: Vec<&Module> = graph.modules().map(|e| e.value()).collect();
            modules.sort_by(|a, b| a.id.cmp(&b.id));
            for module in modules {
                ui.monospace(json_line(module));
            }
        });

        ui.collapsing(format!("Data edges ({})", graph.data_edge_count()), |ui| {
            for edge in graph.data_edges() {
                ui.monospace(json_line(edge));
            }
        });

        ui.collapsing(
            format!("State edges ({})", graph.state_edges().count()),
            |ui| {
                for edge in graph.state_edges() {
                    ui.monospace(json_line(edge));
                }
            },
        );

        ui.collapsing(
            format!("Network edges ({})", graph.network_edges().count()),
            |ui| {
                for edge in graph.network_edges() {
                    ui.monospace(json_line(edge));
                }
            },
        );

        ui.separator();

        ui.collapsing("Add sensor", |ui| {
            ui.horizontal(|ui| {
                ui.label("Id:");
                ui.text_edit_singleline(&mut state.sensor_id);
            });
            ui.horizontal(|ui| {
                ui.label("State keys:");
                ui.text_edit_singleline(&mut state.sensor_keys);
            });
            ui.horizontal(|ui| {
                ui.label("Returns:");
                ui.text_edit_singleline(&mut state.sensor_returns);
            });
            ui.label("(comma-separated slot names)");
            if ui.button("Register sensor").clicked() && !state.sensor_id.trim().is_empty() {
                actions.push(EditorAction::RegisterSensor(Sensor {
                    id: state.sensor_id.trim().to_string(),
                    state_keys: csv_list(&state.sensor_keys),
                    returns: csv_list(&state.sensor_returns),
                }));
                state.sensor_id.clear();
                state.sensor_keys.clear();
                state.sensor_returns.clear();
            }
        });

        ui.collapsing("Add module", |ui| {
            ui.horizontal(|ui| {
                ui.label("Id:");
                ui.text_edit_singleline(&mut state.module_id);
            });
            ui.horizontal(|ui| {
                ui.label("Params:");
                ui.text_edit_singleline(&mut state.module_params);
            });
            ui.horizontal(|ui| {
                ui.label("Returns:");
                ui.text_edit_singleline(&mut state.module_returns);
            });
            ui.checkbox(&mut state.module_network, "Requires network");
            if ui.button("Register module").clicked() && !state.module_id.trim().is_empty() {
                actions.push(EditorAction::RegisterModule(Module {
                    id: state.module_id.trim().to_string(),
                    params: csv_list(&state.module_params),
                    returns: csv_list(&state.module_returns),
                    network: state.module_network,
                }));
                state.module_id.clear();
                state.module_params.clear();
                state.module_returns.clear();
                state.module_network = false;
            }
        });

        ui.collapsing("Add network edge", |ui| {
            let mut module_ids: Vec<String> =
                graph.modules().map(|e| e.value().id.clone()).collect();
            module_ids.sort();

            egui::ComboBox::from_label("Module")
                .selected_text(if state.network_module.is_empty() {
                    "select…"
                } else {
                    state.network_module.as_str()
                })
                .show_ui(ui, |ui| {
                    for id in &module_ids {
                        ui.selectable_value(&mut state.network_module, id.clone(), id);
                    }
                });
            ui.horizontal(|ui| {
                ui.label("Domain:");
                ui.text_edit_singleline(&mut state.network_domain);
            });
            if ui.button("Declare egress").clicked()
                && !state.network_module.is_empty()
                && !state.network_domain.trim().is_empty()
            {
                actions.push(EditorAction::AddNetworkEdge(NetworkEdge {
                    module_id: state.network_module.clone(),
                    domain: state.network_domain.trim().to_string(),
                }));
                state.network_domain.clear();
            }
        });
    });

    actions
}
