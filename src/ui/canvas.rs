//! Canvas interaction and navigation functionality.
//!
//! This module handles canvas panning, zooming, node dragging, drag-to-connect
//! between handles, and coordinate transformations between screen and world space.

use super::state::{DiagramApp, Gesture};
use crate::constants;
use crate::types::*;
use eframe::egui;

impl DiagramApp {
    /// Converts world coordinates to screen coordinates accounting for zoom and pan.
    pub fn world_to_screen(&self, world_pos: (f32, f32)) -> egui::Pos2 {
        let (x, y) = self.canvas.viewport.to_screen(world_pos);
        self.canvas.origin + egui::vec2(x, y)
    }

    /// Converts screen coordinates to world coordinates accounting for zoom and pan.
    pub fn screen_to_world(&self, screen_pos: egui::Pos2) -> (f32, f32) {
        let local = screen_pos - self.canvas.origin;
        self.canvas.viewport.to_canvas((local.x, local.y))
    }

    /// Screen-space rectangle of a node.
    pub fn node_screen_rect(&self, node: &DiagramNode) -> egui::Rect {
        let bounds = node.bounds();
        egui::Rect::from_min_max(self.world_to_screen(bounds.min), self.world_to_screen(bounds.max))
    }

    /// Topmost node whose rectangle contains `world_pos`.
    pub fn find_node_at_position(&self, world_pos: (f32, f32)) -> Option<NodeId> {
        self.editor
            .diagram
            .nodes
            .iter()
            .rev()
            .find(|node| node.bounds().contains(world_pos))
            .map(|node| node.id.clone())
    }

    /// Topmost node with its source handle under `screen_pos`.
    pub fn find_source_handle_at(&self, screen_pos: egui::Pos2) -> Option<NodeId> {
        self.editor
            .diagram
            .nodes
            .iter()
            .rev()
            .find(|node| {
                self.world_to_screen(node.source_handle()).distance(screen_pos) <= constants::HANDLE_HIT_RADIUS
            })
            .map(|node| node.id.clone())
    }

    /// Node whose target handle is closest to `screen_pos`, within the connection radius.
    pub fn find_target_handle_near(&self, screen_pos: egui::Pos2) -> Option<NodeId> {
        self.editor
            .diagram
            .nodes
            .iter()
            .map(|node| (node, self.world_to_screen(node.target_handle()).distance(screen_pos)))
            .filter(|(_, distance)| *distance <= constants::CONNECTION_RADIUS)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(node, _)| node.id.clone())
    }

    /// Handles scroll wheel and pinch zooming around the cursor.
    ///
    /// Only zooms if the cursor is over the canvas.
    pub fn handle_canvas_zoom(&mut self, ui: &egui::Ui, response: &egui::Response) {
        let (scroll_delta, zoom_delta, hover) =
            ui.input(|i| (i.smooth_scroll_delta.y, i.zoom_delta(), i.pointer.hover_pos()));

        let factor = zoom_delta * (scroll_delta / 200.0).exp();
        if (factor - 1.0).abs() <= f32::EPSILON {
            return;
        }
        let Some(mouse_pos) = hover else {
            return;
        };
        if !response.rect.contains(mouse_pos) {
            return;
        }

        let anchor = mouse_pos - self.canvas.origin;
        let zoom = self.canvas.viewport.zoom * factor;
        self.canvas.viewport.zoom_around((anchor.x, anchor.y), zoom);
    }

    /// Drives the primary-button gesture: panning, node dragging or connecting.
    pub fn handle_pointer_gestures(&mut self, ui: &egui::Ui, response: &egui::Response) {
        if ui.input(|i| i.pointer.primary_down()) {
            let Some(current_pos) = response.interact_pointer_pos() else {
                return;
            };
            match self.interaction.gesture.clone() {
                Gesture::Idle => self.start_gesture(current_pos),
                Gesture::Panning { last } => {
                    let delta = current_pos - last;
                    self.canvas.viewport.offset.0 += delta.x;
                    self.canvas.viewport.offset.1 += delta.y;
                    self.interaction.gesture = Gesture::Panning { last: current_pos };
                }
                Gesture::DraggingNode { id, grab } => {
                    let (x, y) = self.screen_to_world(current_pos);
                    self.editor.diagram.move_node(&id, (x - grab.x, y - grab.y));
                }
                Gesture::Connecting { from, .. } => {
                    self.interaction.gesture = Gesture::Connecting {
                        from,
                        pointer: current_pos,
                    };
                }
            }
        } else {
            // Released: a connection completes only over a target handle
            if let Gesture::Connecting { from, pointer } = std::mem::take(&mut self.interaction.gesture) {
                self.finish_connection(from, pointer);
            }
        }
    }

    /// Decides what a fresh press at `screen_pos` starts.
    fn start_gesture(&mut self, screen_pos: egui::Pos2) {
        if !self.canvas.locked {
            if let Some(from) = self.find_source_handle_at(screen_pos) {
                self.interaction.gesture = Gesture::Connecting {
                    from,
                    pointer: screen_pos,
                };
                return;
            }

            let world_pos = self.screen_to_world(screen_pos);
            if let Some(id) = self.find_node_at_position(world_pos) {
                let grab = self
                    .editor
                    .diagram
                    .node(&id)
                    .map(|node| egui::vec2(world_pos.0 - node.position.0, world_pos.1 - node.position.1))
                    .unwrap_or(egui::Vec2::ZERO);
                self.interaction.selected_node = Some(id.clone());
                self.interaction.gesture = Gesture::DraggingNode { id, grab };
                return;
            }
        }

        self.interaction.selected_node = None;
        self.interaction.gesture = Gesture::Panning { last: screen_pos };
    }

    fn finish_connection(&mut self, from: NodeId, pointer: egui::Pos2) {
        match self.find_target_handle_near(pointer) {
            Some(target) => {
                self.editor.on_connect(ConnectParams::between_handles(from, target));
            }
            None => log::debug!("Connection from {} dropped on empty canvas", from),
        }
    }

    /// Zooms in by one step around the canvas centre.
    pub fn zoom_in(&mut self) {
        self.canvas.viewport.zoom_by(constants::ZOOM_STEP);
    }

    /// Zooms out by one step around the canvas centre.
    pub fn zoom_out(&mut self) {
        self.canvas.viewport.zoom_by(1.0 / constants::ZOOM_STEP);
    }

    /// Frames all nodes in the canvas.
    pub fn fit_view(&mut self) {
        if let Some(bounds) = self.editor.diagram.bounds() {
            self.canvas.viewport.fit(bounds, constants::FIT_VIEW_PADDING);
        }
    }
}
