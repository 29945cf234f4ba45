//! Canvas rendering functionality for the background, edges, nodes and controls.
//!
//! Elements are drawn in layers: dotted background, edges, the connection preview,
//! then nodes with their handles. Label editors and the controls overlay are widgets
//! placed on top of the painted canvas.

use super::state::{DiagramApp, Gesture};
use crate::constants;
use crate::edge_path;
use crate::svg::PLACEHOLDER;
use crate::types::*;
use eframe::egui;
use eframe::epaint::StrokeKind;

const DOT_COLOR: egui::Color32 = egui::Color32::from_rgb(0x91, 0x91, 0x9a);
const EDGE_COLOR: egui::Color32 = egui::Color32::from_rgb(0xb1, 0xb1, 0xb7);
const NODE_BORDER_COLOR: egui::Color32 = egui::Color32::from_rgb(0xcc, 0xcc, 0xcc);
const SELECTED_BORDER_COLOR: egui::Color32 = egui::Color32::from_rgb(0x1a, 0x19, 0x2b);
const HANDLE_COLOR: egui::Color32 = egui::Color32::from_rgb(0x1a, 0x19, 0x2b);
/// Segments per curved piece when flattening edges.
const CURVE_STEPS: usize = 8;

impl DiagramApp {
    /// Paints the background, edges, connection preview and nodes.
    ///
    /// `time` drives the dash offset of animated edges.
    pub fn render_diagram(&self, painter: &egui::Painter, canvas_rect: egui::Rect, time: f64) {
        painter.rect_filled(canvas_rect, 0.0, egui::Color32::WHITE);
        self.draw_background_dots(painter, canvas_rect);

        for edge in &self.editor.diagram.edges {
            self.draw_edge(painter, edge, time);
        }

        if let Gesture::Connecting { from, pointer } = &self.interaction.gesture {
            self.draw_connection_preview(painter, from, *pointer);
        }

        for node in &self.editor.diagram.nodes {
            let selected = self.interaction.selected_node.as_deref() == Some(node.id.as_str());
            self.draw_node(painter, node, selected);
        }
    }

    /// Draws the dot pattern, anchored to the world origin so it moves with panning.
    pub fn draw_background_dots(&self, painter: &egui::Painter, canvas_rect: egui::Rect) {
        let zoom = self.canvas.viewport.zoom;
        let gap = constants::DOT_GAP * zoom;
        let radius = constants::DOT_RADIUS * zoom;

        let start_x = canvas_rect.min.x + self.canvas.viewport.offset.0.rem_euclid(gap) + gap / 2.0;
        let start_y = canvas_rect.min.y + self.canvas.viewport.offset.1.rem_euclid(gap) + gap / 2.0;

        let mut y = start_y - gap;
        while y <= canvas_rect.max.y {
            let mut x = start_x - gap;
            while x <= canvas_rect.max.x {
                painter.circle_filled(egui::pos2(x, y), radius, DOT_COLOR);
                x += gap;
            }
            y += gap;
        }
    }

    /// Draws one edge between its nodes' handles; animated edges get a moving dash.
    pub fn draw_edge(&self, painter: &egui::Painter, edge: &Edge, time: f64) {
        let (Some(source), Some(target)) = (
            self.editor.diagram.node(&edge.source),
            self.editor.diagram.node(&edge.target),
        ) else {
            return;
        };

        let points: Vec<egui::Pos2> = edge_path::smooth_step(source.source_handle(), target.target_handle())
            .to_screen(&self.canvas.viewport)
            .flatten(CURVE_STEPS)
            .into_iter()
            .map(|(x, y)| self.canvas.origin + egui::vec2(x, y))
            .collect();

        let stroke = egui::Stroke::new(self.canvas.viewport.zoom.max(1.0), EDGE_COLOR);
        if edge.animated {
            let zoom = self.canvas.viewport.zoom;
            let dash = constants::EDGE_DASH * zoom;
            let period = 2.0 * dash;
            let offset = period - ((time as f32) * constants::EDGE_DASH_SPEED * zoom).rem_euclid(period);
            painter.extend(egui::Shape::dashed_line_with_offset(
                &points,
                stroke,
                &[dash],
                &[dash],
                offset,
            ));
        } else {
            painter.add(egui::Shape::line(points, stroke));
        }
    }

    /// Draws the in-progress connection from a source handle to the pointer.
    pub fn draw_connection_preview(&self, painter: &egui::Painter, from: &str, pointer: egui::Pos2) {
        let Some(node) = self.editor.diagram.node(from) else {
            return;
        };
        let start = self.world_to_screen(node.source_handle());
        let points: Vec<egui::Pos2> = edge_path::smooth_step((start.x, start.y), (pointer.x, pointer.y))
            .flatten(CURVE_STEPS)
            .into_iter()
            .map(|(x, y)| egui::pos2(x, y))
            .collect();
        painter.add(egui::Shape::line(points, egui::Stroke::new(1.0, EDGE_COLOR)));
    }

    /// Draws a node box and its two handles.
    pub fn draw_node(&self, painter: &egui::Painter, node: &DiagramNode, selected: bool) {
        let zoom = self.canvas.viewport.zoom;
        let rect = self.node_screen_rect(node);
        let border = if selected {
            egui::Stroke::new(1.5 * zoom, SELECTED_BORDER_COLOR)
        } else {
            egui::Stroke::new(zoom, NODE_BORDER_COLOR)
        };
        painter.rect(
            rect,
            constants::NODE_CORNER_RADIUS * zoom,
            egui::Color32::WHITE,
            border,
            StrokeKind::Inside,
        );

        let radius = constants::HANDLE_RADIUS * zoom;
        for handle in [node.target_handle(), node.source_handle()] {
            let center = self.world_to_screen(handle);
            painter.circle(
                center,
                radius,
                HANDLE_COLOR,
                egui::Stroke::new(zoom, egui::Color32::WHITE),
            );
        }
    }

    /// Places a multi-line label editor inside every node.
    ///
    /// Each edit is forwarded to the editor as a label update. Pressing an editor selects
    /// its node and dragging it moves the node, unless the canvas is locked.
    pub fn draw_node_editors(&mut self, ui: &mut egui::Ui) {
        let zoom = self.canvas.viewport.zoom;
        let padding = constants::NODE_PADDING * zoom;
        let font = egui::FontId::proportional(constants::NODE_FONT_SIZE * zoom);

        let mut edits = Vec::new();
        let mut pressed = None;
        let mut moves = Vec::new();
        for node in &self.editor.diagram.nodes {
            let inner = self.node_screen_rect(node).shrink(padding);
            if inner.width() <= 0.0 || inner.height() <= 0.0 {
                continue;
            }
            let mut text = node.label.clone();
            let edit = egui::TextEdit::multiline(&mut text)
                .id(egui::Id::new(("node_label", node.id.as_str())))
                .hint_text(PLACEHOLDER)
                .font(font.clone())
                .frame(false)
                .desired_rows(1)
                .desired_width(inner.width());
            let response = ui.put(inner, edit);
            if response.changed() {
                edits.push((node.id.clone(), text));
            }

            // The editor covers the node body
            if response.is_pointer_button_down_on() || response.gained_focus() {
                pressed = Some(node.id.clone());
            }
            if response.dragged() {
                let delta = response.drag_delta() / zoom;
                let (x, y) = node.position;
                moves.push((node.id.clone(), (x + delta.x, y + delta.y)));
            }
        }

        for (id, text) in edits {
            log::debug!("Label of node {} edited", id);
            self.editor.update_node(&id, &text);
        }

        if self.canvas.locked {
            return;
        }
        if let Some(id) = pressed {
            self.interaction.selected_node = Some(id);
        }
        for (id, position) in moves {
            self.editor.diagram.move_node(&id, position);
        }
    }

    /// Draws the zoom/fit/lock controls in the bottom-left corner of the canvas.
    pub fn draw_controls(&mut self, ui: &mut egui::Ui, canvas_rect: egui::Rect) {
        let margin = constants::CONTROLS_MARGIN;
        egui::Area::new(egui::Id::new("canvas_controls"))
            .order(egui::Order::Foreground)
            .pivot(egui::Align2::LEFT_BOTTOM)
            .fixed_pos(canvas_rect.left_bottom() + egui::vec2(margin, -margin))
            .show(ui.ctx(), |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.vertical(|ui| {
                        if ui.button("+").on_hover_text("Zoom in").clicked() {
                            self.zoom_in();
                        }
                        if ui.button("-").on_hover_text("Zoom out").clicked() {
                            self.zoom_out();
                        }
                        if ui.button("Fit").on_hover_text("Fit view").clicked() {
                            self.fit_view();
                        }
                        let lock_label = if self.canvas.locked { "Unlock" } else { "Lock" };
                        if ui
                            .button(lock_label)
                            .on_hover_text("Toggle interactivity")
                            .clicked()
                        {
                            self.canvas.locked = !self.canvas.locked;
                            self.interaction.gesture = Gesture::Idle;
                        }
                    });
                });
            });
    }
}
