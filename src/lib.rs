//! # Diagram Builder
//!
//! A small diagram editor: text-filled boxes ("nodes") placed on a pannable, zoomable
//! canvas, connected by animated smooth-step edges, and exported to a single-page PDF.
//!
//! ## Features
//! - Landing page (`/`) and editor page (`/diagram`)
//! - "Add Node" with a dimension dialog; new nodes land at a random spot
//! - Inline label editing inside every node
//! - Drag-to-connect from a node's source handle to another node's target handle
//! - Canvas panning, zooming, fit view and an interactivity lock
//! - "Export to PDF": the canvas as displayed, rasterized at 2x, downloaded as `diagram.pdf`

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod download;
pub mod edge_path;
pub mod editor;
pub mod export;
pub mod pdf;
pub mod svg;
mod types;
mod ui;

// Re-export public types and functions
pub use editor::DiagramEditor;
pub use export::{export_to_pdf, DownloadSink, ExportError, Raster, Rasterize, ResvgRasterizer};
pub use types::*;
pub use ui::{DiagramApp, Route};

/// Runs the diagram builder with default settings.
///
/// This function initializes the egui application window and starts the main event loop.
/// PDF export hands its work to the ambient tokio runtime, so call this from within one.
///
/// # Example
///
/// ```no_run
/// #[tokio::main]
/// async fn main() -> Result<(), eframe::Error> {
///     diagram_builder::run_app()
/// }
/// ```
#[cfg(not(target_arch = "wasm32"))]
pub fn run_app() -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Diagram Builder")
            .with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Diagram Builder",
        options,
        Box::new(|_cc| Ok(Box::new(DiagramApp::default()))),
    )
}

/// Web entry point: mounts the app on the `the_canvas_id` canvas element.
///
/// The initial page is taken from the browser location.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    use wasm_bindgen::JsCast;

    eframe::WebLogger::init(log::LevelFilter::Debug).ok();

    let web_options = eframe::WebOptions::default();
    wasm_bindgen_futures::spawn_local(async move {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document found");
            return;
        };
        let route = document
            .location()
            .and_then(|l| l.pathname().ok())
            .map(|path| Route::from_path(&path))
            .unwrap_or_default();
        let canvas = match document
            .get_element_by_id("the_canvas_id")
            .and_then(|e| e.dyn_into::<web_sys::HtmlCanvasElement>().ok())
        {
            Some(canvas) => canvas,
            None => {
                log::error!("Canvas element `the_canvas_id` not found");
                return;
            }
        };

        let result = eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(move |_cc| Ok(Box::new(DiagramApp::with_route(route)))),
            )
            .await;
        if let Err(e) = result {
            log::error!("Failed to start the app: {:?}", e);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_default() {
        let app = DiagramApp::default();
        assert_eq!(app.route, Route::Landing);
        assert_eq!(app.editor.diagram.nodes.len(), 1);
        assert!(app.editor.diagram.edges.is_empty());
        assert!(!app.editor.modal_open);
    }
}
