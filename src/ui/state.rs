//! Application state management structures.
//!
//! This module contains the state the page shell and the canvas track between frames:
//! the current route, canvas navigation, and the pointer gesture in progress.

use crate::editor::DiagramEditor;
use crate::types::*;
use eframe::egui;

/// The pages of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    /// `/`: heading and a link to the editor
    #[default]
    Landing,
    /// `/diagram`: the editor
    Diagram,
}

impl Route {
    /// Resolves a location path. Unknown paths fall back to the landing page.
    pub fn from_path(path: &str) -> Self {
        match path.trim_end_matches('/') {
            "/diagram" => Route::Diagram,
            _ => Route::Landing,
        }
    }

    /// The location path of this route.
    pub fn path(&self) -> &'static str {
        match self {
            Route::Landing => "/",
            Route::Diagram => "/diagram",
        }
    }
}

/// State related to canvas navigation and display.
#[derive(Debug, Clone, Default)]
pub struct CanvasState {
    /// Pan, zoom and size of the canvas container
    pub viewport: Viewport,
    /// Screen position of the container's top-left corner
    pub origin: egui::Pos2,
    /// Set once the initial fit view has been applied
    pub initialized: bool,
    /// When locked, nodes cannot be dragged, selected or connected; labels stay editable
    pub locked: bool,
}

/// Pointer gesture in progress on the canvas.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Gesture {
    /// Nothing pressed
    #[default]
    Idle,
    /// Dragging empty canvas
    Panning {
        /// Pointer position on the previous frame
        last: egui::Pos2,
    },
    /// Dragging a node body
    DraggingNode {
        /// Node being moved
        id: NodeId,
        /// Pointer position minus node position, in canvas units
        grab: egui::Vec2,
    },
    /// Dragging from a source handle
    Connecting {
        /// Node the connection starts from
        from: NodeId,
        /// Current pointer position in screen space
        pointer: egui::Pos2,
    },
}

/// State related to user interactions with nodes and canvas.
#[derive(Debug, Clone, Default)]
pub struct InteractionState {
    /// Gesture driven by the primary button
    pub gesture: Gesture,
    /// Currently selected node, if any
    pub selected_node: Option<NodeId>,
}

/// The main application structure: page shell state plus the diagram editor.
///
/// This struct implements the `eframe::App` trait and handles all user interface
/// rendering and interaction logic.
#[derive(Debug, Clone, Default)]
pub struct DiagramApp {
    /// Page currently shown
    pub route: Route,
    /// Nodes, edges, dimension draft and modal flag
    pub editor: DiagramEditor,
    /// Canvas navigation and display state
    pub canvas: CanvasState,
    /// User interaction state
    pub interaction: InteractionState,
}

impl DiagramApp {
    /// Creates the app showing `route`.
    pub fn with_route(route: Route) -> Self {
        Self {
            route,
            ..Default::default()
        }
    }
}
