//! Top-level eframe application.
//!
//! Owns the one logical graph instance and applies the actions the panes
//! emit. Rejected mutations surface in the status bar (the diagnostics
//! stream carries the serialized request separately).

use egui::Color32;

use crate::config::AppConfig;
use crate::frontend::editor::{self, EditorState};
use crate::frontend::inspector::{self, InspectorState};
use crate::frontend::scene::GraphScene;
use crate::frontend::state::EditorAction;
use crate::graph::{DataEdge, Graph, Module, NetworkEdge, Sensor, StateEdge};

pub struct FlowVisApp {
    graph: Graph<GraphScene>,
    config: AppConfig,
    editor: EditorState,
    inspector: InspectorState,
    last_error: Option<String>,
}

impl FlowVisApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        if config.ui.dark_mode {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
        } else {
            cc.egui_ctx.set_visuals(egui::Visuals::light());
        }

        let mut graph = Graph::new(GraphScene::new());
        if config.seed_demo_graph {
            seed_demo_graph(&mut graph);
        }

        let editor = EditorState {
            stateless: config.ui.default_stateless,
            ..EditorState::default()
        };

        Self {
            graph,
            config,
            editor,
            inspector: InspectorState::default(),
            last_error: None,
        }
    }

    fn apply(&mut self, actions: Vec<EditorAction>) {
        for action in actions {
            let result = match action {
                EditorAction::RegisterSensor(sensor) => self.graph.register_sensor(sensor),
                EditorAction::RegisterModule(module) => self.graph.register_module(module),
                EditorAction::AddDataEdge(edge) => self.graph.add_data_edge(edge),
                EditorAction::AddStateEdge(edge) => self.graph.add_state_edge(edge),
                EditorAction::AddNetworkEdge(edge) => self.graph.add_network_edge(edge),
                EditorAction::RemoveDataEdge(edge) => self.graph.remove_data_edge(&edge),
            };
            match result {
                Ok(()) => self.last_error = None,
                Err(err) => self.last_error = Some(err.to_string()),
            }
        }
    }
}

impl eframe::App for FlowVisApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut actions = Vec::new();

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.strong("FlowVis");
                ui.separator();
                if ui
                    .checkbox(&mut self.config.ui.dark_mode, "Dark mode")
                    .changed()
                {
                    ctx.set_visuals(if self.config.ui.dark_mode {
                        egui::Visuals::dark()
                    } else {
                        egui::Visuals::light()
                    });
                }
                ui.checkbox(&mut self.config.ui.show_inspector, "Inspector");
            });
        });

        let mut clear_error = false;
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(error) = self.last_error.as_deref() {
                    ui.colored_label(Color32::LIGHT_RED, error);
                    if ui.small_button("✕").clicked() {
                        clear_error = true;
                    }
                } else {
                    ui.weak(format!(
                        "{} sensors · {} modules · {} data edges",
                        self.graph.sensor_count(),
                        self.graph.module_count(),
                        self.graph.data_edge_count(),
                    ));
                }
            });
        });
        if clear_error {
            self.last_error = None;
        }

        if self.config.ui.show_inspector {
            egui::SidePanel::right("inspector")
                .default_width(340.0)
                .show(ctx, |ui| {
                    actions.extend(inspector::render(&mut self.inspector, &self.graph, ui));
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            actions.extend(editor::render(&mut self.editor, &mut self.graph, ui));
        });

        self.apply(actions);
    }

    fn save(&mut self, _storage: &mut dyn eframe::Storage) {
        if let Err(e) = self.config.save() {
            tracing::warn!("Failed to save preferences: {}", e);
        }
    }
}

/// Small example graph so a fresh start has something to drag around.
///
/// Failures here only occur if the seed data itself is inconsistent; the
/// engine logs any rejection.
fn seed_demo_graph(graph: &mut Graph<GraphScene>) {
    let _ = graph.register_sensor(Sensor {
        id: "thermostat".to_string(),
        state_keys: vec!["target".to_string()],
        returns: vec!["temp".to_string()],
    });
    let _ = graph.register_sensor(Sensor {
        id: "motion_cam".to_string(),
        state_keys: vec!["livestream".to_string()],
        returns: vec!["motion".to_string()],
    });
    let _ = graph.register_module(Module {
        id: "smoothing".to_string(),
        params: vec!["raw".to_string()],
        returns: vec!["avg".to_string()],
        network: false,
    });
    let _ = graph.register_module(Module {
        id: "uploader".to_string(),
        params: vec!["frames".to_string()],
        returns: vec![],
        network: true,
    });
    let _ = graph.add_data_edge(DataEdge {
        stateless: true,
        out_id: "thermostat".to_string(),
        out_ret: "temp".to_string(),
        module_id: "smoothing".to_string(),
        module_param: "raw".to_string(),
    });
    let _ = graph.add_data_edge(DataEdge {
        stateless: false,
        out_id: "motion_cam".to_string(),
        out_ret: "motion".to_string(),
        module_id: "uploader".to_string(),
        module_param: "frames".to_string(),
    });
    let _ = graph.add_state_edge(StateEdge {
        module_id: "smoothing".to_string(),
        module_ret: "avg".to_string(),
        sensor_id: "thermostat".to_string(),
        sensor_key: "target".to_string(),
    });
    let _ = graph.add_network_edge(NetworkEdge {
        module_id: "uploader".to_string(),
        domain: "storage.example.com".to_string(),
    });
}
