//! Export of the canvas container to `diagram.pdf`.
//!
//! The capture is taken synchronously on the UI thread so it reflects the canvas at the
//! moment of the click. Rasterization and delivery then run off the frame:
//! - Native: tokio's blocking pool, then a save dialog.
//! - Web: a local future, then a browser download.

use super::state::DiagramApp;
use crate::export::{self, ResvgRasterizer};
use crate::svg::{self, CapturedScene};
use eframe::egui;

impl DiagramApp {
    /// Captures the canvas container as it is currently displayed.
    pub fn capture_canvas(&self, ctx: &egui::Context) -> CapturedScene {
        let measure = |text: &str, font_size: f32| {
            ctx.fonts_mut(|f| {
                f.layout_no_wrap(
                    text.to_string(),
                    egui::FontId::proportional(font_size),
                    egui::Color32::BLACK,
                )
                .size()
                .x
            })
        };
        svg::capture_scene(&self.editor.diagram, &self.canvas.viewport, &measure)
    }

    /// Captures the canvas and starts the PDF export in the background.
    ///
    /// Failures are logged; the canvas stays usable while the export runs.
    pub fn export_to_pdf(&self, ctx: &egui::Context) {
        let scene = self.capture_canvas(ctx);
        log::info!("Capturing diagram ({}x{}) for PDF", scene.width, scene.height);

        #[cfg(not(target_arch = "wasm32"))]
        {
            match tokio::runtime::Handle::try_current() {
                Ok(runtime) => {
                    runtime.spawn_blocking(move || {
                        let mut sink = crate::download::SaveDialogSink;
                        export::export_to_pdf(&scene, &ResvgRasterizer::default(), &mut sink);
                    });
                }
                Err(e) => log::error!("Error capturing diagram for PDF: {}", e),
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            wasm_bindgen_futures::spawn_local(async move {
                let mut sink = crate::download::BrowserDownload;
                export::export_to_pdf(&scene, &ResvgRasterizer::default(), &mut sink);
            });
        }
    }
}
