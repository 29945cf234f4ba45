//! Shared application-wide constants.
//! Centralizes tweakable values used across the editor, canvas rendering and export.

// Initial diagram
/// Id of the node present when the canvas first opens.
pub const START_NODE_ID: &str = "1";
/// Label of the node present when the canvas first opens.
pub const START_NODE_LABEL: &str = "Start Node";
/// Canvas position (top-left corner) of the start node.
pub const START_NODE_POSITION: (f32, f32) = (250.0, 100.0);

// Node dimensions
/// Default node width in canvas units; also the initial dimension draft width.
pub const NODE_WIDTH: u32 = 250;
/// Default node height in canvas units; also the initial dimension draft height.
pub const NODE_HEIGHT: u32 = 150;
/// Side length of the square box new nodes are randomly placed in.
pub const PLACEMENT_BOX: f32 = 400.0;
/// Upper bound accepted by the dimension inputs.
pub const MAX_NODE_DIMENSION: u32 = 4000;
/// Inner padding between the node border and its label editor (screen pixels at zoom 1).
pub const NODE_PADDING: f32 = 10.0;
/// Corner radius of node rectangles.
pub const NODE_CORNER_RADIUS: f32 = 8.0;
/// Label font size at zoom 1.
pub const NODE_FONT_SIZE: f32 = 14.0;

// Handles and connections
/// Identifier of the incoming handle on the left edge of every node.
pub const TARGET_HANDLE_ID: &str = "target";
/// Identifier of the outgoing handle on the right edge of every node.
pub const SOURCE_HANDLE_ID: &str = "source";
/// Drawn radius of a handle (screen pixels).
pub const HANDLE_RADIUS: f32 = 4.0;
/// Hit radius for starting a connection from a source handle (screen pixels).
pub const HANDLE_HIT_RADIUS: f32 = 8.0;
/// Snap radius around a target handle when releasing a connection (screen pixels).
pub const CONNECTION_RADIUS: f32 = 20.0;
/// Distance the smooth-step route keeps from a handle before turning.
pub const STEP_OFFSET: f32 = 20.0;
/// Corner radius of smooth-step edges.
pub const STEP_BORDER_RADIUS: f32 = 5.0;
/// Dash and gap length of animated edges.
pub const EDGE_DASH: f32 = 5.0;
/// Speed of the animated dash offset, in canvas units per second.
pub const EDGE_DASH_SPEED: f32 = 20.0;

// Viewport
/// Smallest zoom the canvas allows.
pub const MIN_ZOOM: f32 = 0.5;
/// Largest zoom the canvas allows.
pub const MAX_ZOOM: f32 = 2.0;
/// Zoom multiplier used by the zoom controls.
pub const ZOOM_STEP: f32 = 1.2;
/// Fraction of the node bounds added on each side when fitting the view.
pub const FIT_VIEW_PADDING: f32 = 0.1;
/// Spacing between background dots (canvas units).
pub const DOT_GAP: f32 = 20.0;
/// Radius of background dots (canvas units).
pub const DOT_RADIUS: f32 = 1.0;

// Export
/// Scale the canvas container is rasterized at.
pub const CAPTURE_SCALE: f32 = 2.0;
/// File name offered for the exported document.
pub const PDF_FILE_NAME: &str = "diagram.pdf";
/// A4 page size in millimetres.
pub const PDF_PAGE_MM: (f32, f32) = (210.0, 297.0);
/// Top-left corner of the embedded image, in millimetres from the page's top-left.
pub const PDF_IMAGE_ORIGIN_MM: (f32, f32) = (10.0, 10.0);
/// Size of the embedded image in millimetres.
pub const PDF_IMAGE_SIZE_MM: (f32, f32) = (180.0, 160.0);

// Page
/// Background of the "Add Node" button.
pub const ADD_NODE_BUTTON_COLOR: egui::Color32 = egui::Color32::from_rgb(0x00, 0x7b, 0xff);
/// Background of the "Export to PDF" button.
pub const EXPORT_BUTTON_COLOR: egui::Color32 = egui::Color32::from_rgb(0x28, 0xa7, 0x45);
/// Distance of the controls overlay from the bottom-left corner of the canvas.
pub const CONTROLS_MARGIN: f32 = 15.0;
