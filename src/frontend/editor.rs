//! Graph editor pane — canvas painting and interaction.
//!
//! Renders the dataflow graph as a node-link diagram using custom egui
//! painting. Supports:
//! - Pan/zoom and drag-to-reposition (connector endpoints follow live)
//! - Two-click connect: output slot, then input slot
//! - Selecting a data connector and removing it with Delete
//!
//! The pane never mutates the graph; it returns [`EditorAction`]s.

use std::collections::HashMap;

use egui::{Color32, Pos2, Rect, Stroke, Ui, Vec2};

use crate::frontend::scene::GraphScene;
use crate::frontend::state::EditorAction;
use crate::graph::{DataEdge, Graph, StateEdge};
use crate::render::{ConnectorHandle, ConnectorStyle, NodeHandle, NodeKind};

const NODE_WIDTH: f32 = 170.0;
const NODE_HEIGHT: f32 = 64.0;
const SLOT_RADIUS: f32 = 5.0;
/// Click-selection distance for connectors, in screen pixels.
const CONNECTOR_HIT_DISTANCE: f32 = 6.0;

// Connector palette: data blue, state red, network green (reserved).
const DATA_COLOR: Color32 = Color32::from_rgb(33, 150, 243);
const SENSOR_FILL: Color32 = Color32::from_rgb(60, 140, 60);
const MODULE_FILL: Color32 = Color32::from_rgb(60, 100, 180);

/// Output slot picked as the pending source of a two-click connect.
#[derive(Debug, Clone)]
pub struct PendingSource {
    pub entity_id: String,
    pub kind: NodeKind,
    pub ret: String,
}

/// Interaction state for the editor pane.
pub struct EditorState {
    /// Pan offset for the canvas.
    pub pan_offset: Vec2,
    /// Zoom level.
    pub zoom: f32,
    /// First click of a two-click connect.
    pub pending_source: Option<PendingSource>,
    /// Node being dragged (handle, offset from mouse to node pos, world coords).
    pub dragging_node: Option<(NodeHandle, Vec2)>,
    /// Data connector selected for removal.
    pub selected_connector: Option<ConnectorHandle>,
    /// New data edges are created stateless.
    pub stateless: bool,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            pan_offset: Vec2::ZERO,
            zoom: 1.0,
            pending_source: None,
            dragging_node: None,
            selected_connector: None,
            stateless: true,
        }
    }
}

/// Snapshot of one node's screen geometry for a single frame.
struct NodeLayout {
    handle: NodeHandle,
    id: String,
    kind: NodeKind,
    inputs: Vec<String>,
    outputs: Vec<String>,
    /// World position (pre-transform), for drag math.
    world_pos: Pos2,
    rect: Rect,
}

impl NodeLayout {
    fn input_anchor(&self, slot: usize) -> Pos2 {
        slot_anchor(self.rect, slot, self.inputs.len(), true)
    }

    fn output_anchor(&self, slot: usize) -> Pos2 {
        slot_anchor(self.rect, slot, self.outputs.len(), false)
    }
}

/// Anchor point of a slot on the top (inputs) or bottom (outputs) edge.
fn slot_anchor(rect: Rect, slot: usize, count: usize, top: bool) -> Pos2 {
    let x = rect.left() + rect.width() * (slot as f32 + 1.0) / (count as f32 + 1.0);
    let y = if top { rect.top() } else { rect.bottom() };
    Pos2::new(x, y)
}

/// Distance from a point to a line segment.
fn segment_distance(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq <= f32::EPSILON {
        return (p - a).length();
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).length()
}

/// Render the editor pane.
pub fn render(
    state: &mut EditorState,
    graph: &mut Graph<GraphScene>,
    ui: &mut Ui,
) -> Vec<EditorAction> {
    let mut actions = Vec::new();

    // Toolbar
    ui.horizontal(|ui| {
        ui.heading("Graph Editor");
        ui.separator();
        ui.checkbox(&mut state.stateless, "Stateless edges")
            .on_hover_text("New data edges deliver every sample (solid) instead of latest-only (dashed)");
        if state.pending_source.is_some() {
            ui.separator();
            if ui.button("Cancel link").clicked() {
                state.pending_source = None;
            }
        }
    });
    ui.separator();

    let available = ui.available_rect_before_wrap();
    let (response, painter) =
        ui.allocate_painter(available.size(), egui::Sense::click_and_drag());
    let canvas_rect = response.rect;

    painter.rect_filled(canvas_rect, 0.0, Color32::from_gray(30));

    // Pan (middle mouse or shift+drag)
    if response.dragged_by(egui::PointerButton::Middle)
        || (response.dragged_by(egui::PointerButton::Primary)
            && ui.input(|i| i.modifiers.shift)
            && state.dragging_node.is_none())
    {
        state.pan_offset += response.drag_delta();
    }

    // Zoom (scroll)
    if response.hovered() {
        let scroll_delta = ui.input(|i| i.smooth_scroll_delta.y);
        if scroll_delta != 0.0 {
            let factor = 1.0 + scroll_delta * 0.002;
            state.zoom = (state.zoom * factor).clamp(0.25, 4.0);
        }
    }

    let origin = canvas_rect.min.to_vec2() + state.pan_offset;
    let zoom = state.zoom;

    // Frame snapshot of node geometry
    let layouts: Vec<NodeLayout> = graph
        .renderer()
        .nodes()
        .map(|(handle, visual)| {
            let screen_pos = Pos2::new(
                visual.pos.x * zoom + origin.x,
                visual.pos.y * zoom + origin.y,
            );
            NodeLayout {
                handle,
                id: visual.id.clone(),
                kind: visual.kind,
                inputs: visual.inputs.clone(),
                outputs: visual.outputs.clone(),
                world_pos: visual.pos,
                rect: Rect::from_min_size(
                    screen_pos,
                    Vec2::new(NODE_WIDTH * zoom, NODE_HEIGHT * zoom),
                ),
            }
        })
        .collect();
    let layout_index: HashMap<NodeHandle, usize> = layouts
        .iter()
        .enumerate()
        .map(|(i, l)| (l.handle, i))
        .collect();

    // ── Connectors (behind nodes) ──

    let pointer_pos = response.interact_pointer_pos();
    let mut clicked_connector: Option<ConnectorHandle> = None;

    for (handle, request) in graph.renderer().connectors() {
        let (Some(&source), Some(&target)) = (
            layout_index.get(&request.source),
            layout_index.get(&request.target),
        ) else {
            continue;
        };
        let from = layouts[source].output_anchor(request.source_slot)
            + Vec2::new(request.source_offset * zoom, 0.0);
        let to = layouts[target].input_anchor(request.target_slot)
            + Vec2::new(request.target_offset * zoom, 0.0);

        let selected = state.selected_connector == Some(handle);
        let dashed = matches!(request.style, ConnectorStyle::Data { stateless: false });
        let color = if selected { Color32::WHITE } else { DATA_COLOR };
        let width = if selected { 3.0 } else { 2.0 };
        let stroke = Stroke::new(width * zoom, color);

        if dashed {
            painter.extend(egui::Shape::dashed_line(&[from, to], stroke, 6.0 * zoom, 4.0 * zoom));
        } else {
            painter.line_segment([from, to], stroke);
        }
        draw_arrow_head(&painter, from, to, color, zoom);

        if response.clicked() {
            if let Some(p) = pointer_pos {
                if segment_distance(p, from, to) < CONNECTOR_HIT_DISTANCE * zoom {
                    clicked_connector = Some(handle);
                }
            }
        }
    }

    // ── Nodes ──

    let slot_radius = SLOT_RADIUS * zoom;
    let mut clicked_output: Option<(usize, usize)> = None; // (layout, slot)
    let mut clicked_input: Option<(usize, usize)> = None;
    let mut clicked_body: Option<usize> = None;
    let mut drag_started_on: Option<(NodeHandle, Vec2)> = None;
    let mut hovered_slot: Option<(String, Pos2)> = None;

    for (i, layout) in layouts.iter().enumerate() {
        let fill = match layout.kind {
            NodeKind::Sensor => SENSOR_FILL,
            NodeKind::Module => MODULE_FILL,
        };
        painter.rect_filled(layout.rect, 6.0 * zoom, fill);
        painter.rect_stroke(
            layout.rect,
            6.0 * zoom,
            Stroke::new(1.0 * zoom, Color32::from_gray(80)),
            egui::StrokeKind::Outside,
        );
        painter.text(
            layout.rect.center(),
            egui::Align2::CENTER_CENTER,
            &layout.id,
            egui::FontId::proportional(13.0 * zoom),
            Color32::WHITE,
        );

        let hover_pos = ui.ctx().pointer_hover_pos();

        // Input slots along the top edge
        for (slot, name) in layout.inputs.iter().enumerate() {
            let anchor = layout.input_anchor(slot);
            let hovered = hover_pos
                .map(|p| (p - anchor).length() < slot_radius * 1.8)
                .unwrap_or(false);
            let color = if hovered {
                Color32::LIGHT_GREEN
            } else {
                Color32::from_gray(200)
            };
            painter.circle_filled(anchor, slot_radius, color);
            if hovered {
                hovered_slot = Some((name.clone(), anchor));
            }
        }

        // Output slots along the bottom edge
        for (slot, name) in layout.outputs.iter().enumerate() {
            let anchor = layout.output_anchor(slot);
            let hovered = hover_pos
                .map(|p| (p - anchor).length() < slot_radius * 1.8)
                .unwrap_or(false);
            let color = if hovered {
                Color32::LIGHT_BLUE
            } else {
                Color32::from_gray(200)
            };
            painter.circle_filled(anchor, slot_radius, color);
            if hovered {
                hovered_slot = Some((name.clone(), anchor));
            }
        }

        if let Some(p) = pointer_pos {
            let on_output = layout
                .outputs
                .iter()
                .enumerate()
                .find(|(slot, _)| (p - layout.output_anchor(*slot)).length() < slot_radius * 2.0)
                .map(|(slot, _)| slot);
            let on_input = layout
                .inputs
                .iter()
                .enumerate()
                .find(|(slot, _)| (p - layout.input_anchor(*slot)).length() < slot_radius * 2.0)
                .map(|(slot, _)| slot);
            let on_body = layout.rect.contains(p) && on_output.is_none() && on_input.is_none();

            if response.clicked() {
                if let Some(slot) = on_output {
                    clicked_output = Some((i, slot));
                } else if let Some(slot) = on_input {
                    clicked_input = Some((i, slot));
                } else if on_body {
                    clicked_body = Some(i);
                }
            }

            if response.drag_started_by(egui::PointerButton::Primary)
                && on_body
                && state.dragging_node.is_none()
                && !ui.input(|i| i.modifiers.shift)
            {
                let world = Pos2::new((p.x - origin.x) / zoom, (p.y - origin.y) / zoom);
                drag_started_on = Some((layout.handle, layout.world_pos - world));
            }
        }
    }

    // Rubber-band line from the pending source to the pointer
    if let Some(pending) = &state.pending_source {
        let anchor = layouts.iter().find(|l| l.id == pending.entity_id).and_then(|l| {
            l.outputs
                .iter()
                .position(|r| *r == pending.ret)
                .map(|slot| l.output_anchor(slot))
        });
        if let (Some(from), Some(to)) = (anchor, ui.ctx().pointer_hover_pos()) {
            painter.line_segment([from, to], Stroke::new(2.0 * zoom, Color32::YELLOW));
        }
    }

    // Slot name tooltip
    if let Some((name, _)) = hovered_slot {
        egui::show_tooltip(ui.ctx(), ui.layer_id(), egui::Id::new("slot_hover"), |ui| {
            ui.label(name);
        });
    }

    // ── Drag repositioning ──

    if let Some((handle, offset)) = drag_started_on {
        state.dragging_node = Some((handle, offset));
    }
    if let Some((handle, offset)) = state.dragging_node {
        if response.dragged_by(egui::PointerButton::Primary) {
            if let Some(p) = pointer_pos {
                let world = Pos2::new(
                    (p.x - origin.x) / zoom + offset.x,
                    (p.y - origin.y) / zoom + offset.y,
                );
                graph.renderer_mut().set_node_pos(handle, world);
            }
        }
        if response.drag_stopped() {
            state.dragging_node = None;
        }
    }

    // ── Click handling ──

    if state.dragging_node.is_none() {
        if let Some((i, slot)) = clicked_output {
            let layout = &layouts[i];
            state.pending_source = Some(PendingSource {
                entity_id: layout.id.clone(),
                kind: layout.kind,
                ret: layout.outputs[slot].clone(),
            });
            state.selected_connector = None;
        } else if let Some((i, slot)) = clicked_input {
            if let Some(pending) = state.pending_source.take() {
                let layout = &layouts[i];
                // The target kind decides the edge kind; validation stays
                // with the graph engine.
                match layout.kind {
                    NodeKind::Module => actions.push(EditorAction::AddDataEdge(DataEdge {
                        stateless: state.stateless,
                        out_id: pending.entity_id,
                        out_ret: pending.ret,
                        module_id: layout.id.clone(),
                        module_param: layout.inputs[slot].clone(),
                    })),
                    NodeKind::Sensor => actions.push(EditorAction::AddStateEdge(StateEdge {
                        module_id: pending.entity_id,
                        module_ret: pending.ret,
                        sensor_id: layout.id.clone(),
                        sensor_key: layout.inputs[slot].clone(),
                    })),
                }
            }
        } else if let Some(handle) = clicked_connector {
            state.selected_connector = Some(handle);
            state.pending_source = None;
        } else if clicked_body.is_some() {
            state.selected_connector = None;
        } else if response.clicked() {
            // Empty canvas: clear selection and any pending link
            state.selected_connector = None;
            state.pending_source = None;
        }
    }

    // Delete removes the selected data connector
    if let Some(handle) = state.selected_connector {
        if ui.input(|i| i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace)) {
            if let Some(edge) = graph.data_edge_for_connector(handle) {
                actions.push(EditorAction::RemoveDataEdge(edge.clone()));
            }
            state.selected_connector = None;
        }
    }
    if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
        state.pending_source = None;
        state.selected_connector = None;
    }

    // Hint line
    let hint = match &state.pending_source {
        Some(pending) => format!(
            "Linking from {} ({}) — click an input slot to connect, Esc to cancel",
            pending.entity_id, pending.ret
        ),
        None => "Click an output slot to start a link. Drag nodes to move, shift+drag to pan, scroll to zoom.".to_string(),
    };
    painter.text(
        canvas_rect.left_bottom() + Vec2::new(8.0, -8.0),
        egui::Align2::LEFT_BOTTOM,
        hint,
        egui::FontId::proportional(12.0),
        Color32::from_gray(150),
    );

    actions
}

/// Filled triangle head at the end of a connector.
fn draw_arrow_head(painter: &egui::Painter, from: Pos2, to: Pos2, color: Color32, zoom: f32) {
    let dir = to - from;
    let len = dir.length();
    if len <= f32::EPSILON {
        return;
    }
    let dir = dir / len;
    let normal = Vec2::new(-dir.y, dir.x);
    let size = 7.0 * zoom;
    let base = to - dir * size;
    painter.add(egui::Shape::convex_polygon(
        vec![to, base + normal * size * 0.5, base - normal * size * 0.5],
        color,
        Stroke::NONE,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_anchor_spacing() {
        let rect = Rect::from_min_size(Pos2::ZERO, Vec2::new(100.0, 50.0));
        // Two slots split the width into thirds
        let a = slot_anchor(rect, 0, 2, true);
        let b = slot_anchor(rect, 1, 2, true);
        assert!((a.x - 100.0 / 3.0).abs() < 1e-4);
        assert!((b.x - 200.0 / 3.0).abs() < 1e-4);
        assert_eq!(a.y, rect.top());
        assert_eq!(slot_anchor(rect, 0, 1, false).y, rect.bottom());
    }

    #[test]
    fn test_segment_distance() {
        let a = Pos2::new(0.0, 0.0);
        let b = Pos2::new(10.0, 0.0);
        assert!((segment_distance(Pos2::new(5.0, 3.0), a, b) - 3.0).abs() < 1e-4);
        // Beyond the endpoints, distance is to the endpoint
        assert!((segment_distance(Pos2::new(13.0, 4.0), a, b) - 5.0).abs() < 1e-4);
        // Degenerate segment
        assert!((segment_distance(Pos2::new(3.0, 4.0), a, a) - 5.0).abs() < 1e-4);
    }
}
