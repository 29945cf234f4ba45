//! User interface: page shell, toolbar, dimension dialog and the interactive canvas.
//!
//! The shell has two pages. `/` shows a heading and a link to the editor; `/diagram`
//! shows the toolbar above the canvas. On the web the page follows the browser location.

mod canvas;
mod export;
mod rendering;
mod state;

pub use state::{DiagramApp, Route};

use crate::constants;
use eframe::egui;

impl eframe::App for DiagramApp {
    /// Main update function called by egui for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(egui::Visuals::light());

        #[cfg(target_arch = "wasm32")]
        {
            // Follow back/forward navigation
            if let Some(route) = Self::location_route() {
                self.route = route;
            }
        }

        match self.route {
            Route::Landing => self.draw_landing_page(ctx),
            Route::Diagram => self.draw_diagram_page(ctx),
        }
    }
}

impl DiagramApp {
    /// Switches pages, recording the new location in the browser history on the web.
    pub fn navigate(&mut self, route: Route) {
        log::debug!("Navigating to {}", route.path());
        self.route = route;

        #[cfg(target_arch = "wasm32")]
        {
            if let Err(e) = Self::push_history(route.path()) {
                log::warn!("Failed to update location: {}", e);
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn location_route() -> Option<Route> {
        let path = web_sys::window()?.location().pathname().ok()?;
        Some(Route::from_path(&path))
    }

    #[cfg(target_arch = "wasm32")]
    fn push_history(path: &str) -> Result<(), &'static str> {
        let window = web_sys::window().ok_or("No window found")?;
        let history = window.history().map_err(|_| "No history found")?;
        history
            .push_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(path))
            .map_err(|_| "Failed to push history state")
    }

    fn draw_landing_page(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Diagram Builder");
            if ui.link("Create Diagram").clicked() {
                self.navigate(Route::Diagram);
            }
        });
    }

    fn draw_diagram_page(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("page_header").show(ctx, |ui| {
            ui.heading("Create Diagram");
            self.draw_toolbar(ui);
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.draw_canvas(ui);
            });

        self.draw_dimension_modal(ctx);
    }

    /// "Add Node" and "Export to PDF" buttons.
    fn draw_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let add = egui::Button::new(egui::RichText::new("Add Node").color(egui::Color32::WHITE))
                .fill(constants::ADD_NODE_BUTTON_COLOR);
            if ui.add(add).clicked() {
                self.editor.add_node();
            }

            let export = egui::Button::new(egui::RichText::new("Export to PDF").color(egui::Color32::WHITE))
                .fill(constants::EXPORT_BUTTON_COLOR);
            if ui.add(export).clicked() {
                self.export_to_pdf(ui.ctx());
            }
        });
        ui.add_space(4.0);
    }

    /// Renders the canvas container with nodes and edges and handles user interactions.
    pub fn draw_canvas(&mut self, ui: &mut egui::Ui) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let canvas_rect = response.rect;

        self.canvas.origin = canvas_rect.min;
        self.canvas.viewport.size = (canvas_rect.width(), canvas_rect.height());

        // Frame the nodes the first time the canvas has a size
        if !self.canvas.initialized && canvas_rect.width() > 0.0 && canvas_rect.height() > 0.0 {
            self.fit_view();
            self.canvas.initialized = true;
        }

        self.handle_canvas_zoom(ui, &response);
        self.handle_pointer_gestures(ui, &response);

        let time = ui.input(|i| i.time);
        let painter = painter.with_clip_rect(canvas_rect);
        self.render_diagram(&painter, canvas_rect, time);

        self.draw_node_editors(ui);
        self.draw_controls(ui, canvas_rect);

        if self.editor.diagram.edges.iter().any(|e| e.animated) {
            ui.ctx().request_repaint();
        }
    }

    /// The "Enter Node Dimensions" dialog, shown while the editor's modal flag is set.
    fn draw_dimension_modal(&mut self, ctx: &egui::Context) {
        if !self.editor.modal_open {
            return;
        }

        let mut submit = false;
        let mut cancel = false;
        let modal = egui::Modal::new(egui::Id::new("dimension_modal")).show(ctx, |ui| {
            ui.set_width(280.0);
            ui.heading("Enter Node Dimensions");
            ui.add_space(8.0);

            let draft = &mut self.editor.dimension_draft;
            egui::Grid::new("dimension_fields")
                .num_columns(2)
                .spacing([12.0, 6.0])
                .show(ui, |ui| {
                    ui.label("Width:");
                    ui.add(egui::DragValue::new(&mut draft.width).range(1..=constants::MAX_NODE_DIMENSION));
                    ui.end_row();

                    ui.label("Height:");
                    ui.add(egui::DragValue::new(&mut draft.height).range(1..=constants::MAX_NODE_DIMENSION));
                    ui.end_row();
                });

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button("Add Node").clicked() {
                    submit = true;
                }
                if ui.button("Cancel").clicked() {
                    cancel = true;
                }
            });
        });

        if submit {
            self.editor.submit_dimensions();
        } else if cancel || modal.should_close() {
            self.editor.cancel_dimensions();
        }
    }
}
