//! Export of a captured canvas to `diagram.pdf`.
//!
//! The pipeline is: captured SVG scene -> raster at 2x scale -> PNG -> single-page PDF -> download.
//! Rasterization and delivery sit behind the [`Rasterize`] and [`DownloadSink`] traits so the
//! platform pieces (save dialog, browser download) stay out of the pipeline itself.

use std::sync::Arc;

use thiserror::Error;

use crate::constants;
use crate::pdf::{self, Placement};
use crate::svg::CapturedScene;

/// Errors that can end an export before the file is delivered.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("could not capture the diagram: {0}")]
    Capture(String),

    #[error("could not rasterize the diagram: {0}")]
    Raster(String),

    #[error("could not assemble the PDF: {0}")]
    Pdf(String),

    #[error("could not deliver the file: {0}")]
    Download(String),
}

/// A rasterized capture with straight (not premultiplied) RGBA pixels, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Four bytes per pixel
    pub rgba: Vec<u8>,
}

impl Raster {
    /// Drops the alpha channel by compositing every pixel over white.
    pub fn to_rgb_on_white(&self) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.rgba.len() / 4 * 3);
        for px in self.rgba.chunks_exact(4) {
            let alpha = u16::from(px[3]);
            for &channel in &px[..3] {
                let blended = (u16::from(channel) * alpha + 255 * (255 - alpha) + 127) / 255;
                rgb.push(blended as u8);
            }
        }
        rgb
    }

    /// Encodes the raster, composited over white, as an opaque PNG.
    pub fn to_png(&self) -> Result<Vec<u8>, ExportError> {
        let size = tiny_skia::IntSize::from_wh(self.width, self.height)
            .ok_or_else(|| ExportError::Raster(format!("image is {}x{}", self.width, self.height)))?;
        let opaque = self
            .to_rgb_on_white()
            .chunks_exact(3)
            .flat_map(|px| [px[0], px[1], px[2], 255])
            .collect();
        let pixmap = tiny_skia::Pixmap::from_vec(opaque, size)
            .ok_or_else(|| ExportError::Raster("pixel data does not match the image size".to_string()))?;
        pixmap
            .encode_png()
            .map_err(|e| ExportError::Raster(format!("Failed to encode PNG: {}", e)))
    }
}

/// Turns a captured scene into pixels.
pub trait Rasterize {
    /// Rasterizes `scene` with every dimension multiplied by `scale`.
    fn rasterize(&self, scene: &CapturedScene, scale: f32) -> Result<Raster, ExportError>;
}

/// Receives finished export files.
pub trait DownloadSink {
    /// Hands `bytes` to the user under `file_name`.
    fn deliver(&mut self, file_name: &str, bytes: Vec<u8>) -> Result<(), ExportError>;
}

/// Rasterizer backed by `usvg`/`resvg`, using the canvas fonts for labels.
#[derive(Debug, Clone)]
pub struct ResvgRasterizer {
    /// Also make installed fonts available (native only)
    pub load_system_fonts: bool,
}

impl Default for ResvgRasterizer {
    fn default() -> Self {
        Self {
            load_system_fonts: true,
        }
    }
}

impl ResvgRasterizer {
    /// Font database whose `sans-serif` family is the canvas' proportional font.
    fn font_database(&self) -> fontdb::Database {
        let mut db = fontdb::Database::new();

        #[cfg(not(target_arch = "wasm32"))]
        {
            if self.load_system_fonts {
                db.load_system_fonts();
            }
        }

        let defs = egui::FontDefinitions::default();
        let primary = defs
            .families
            .get(&egui::FontFamily::Proportional)
            .and_then(|names| names.first())
            .and_then(|name| defs.font_data.get(name));
        if let Some(data) = primary {
            let ids = db.load_font_source(fontdb::Source::Binary(Arc::new(data.font.to_vec())));
            let family = ids
                .first()
                .and_then(|id| db.face(*id))
                .and_then(|face| face.families.first())
                .map(|(name, _)| name.clone());
            if let Some(family) = family {
                db.set_sans_serif_family(family);
            }
        }
        db
    }
}

impl Rasterize for ResvgRasterizer {
    fn rasterize(&self, scene: &CapturedScene, scale: f32) -> Result<Raster, ExportError> {
        use tiny_skia::Pixmap;

        if scene.width == 0 || scene.height == 0 {
            return Err(ExportError::Capture(format!(
                "container is {}x{}",
                scene.width, scene.height
            )));
        }

        let mut opt = usvg::Options::default();
        opt.fontdb = Arc::new(self.font_database());

        let tree = usvg::Tree::from_data(scene.svg.as_bytes(), &opt)
            .map_err(|e| ExportError::Capture(e.to_string()))?;

        let out_w = ((scene.width as f32) * scale).round().max(1.0) as u32;
        let out_h = ((scene.height as f32) * scale).round().max(1.0) as u32;

        let mut pixmap = Pixmap::new(out_w, out_h)
            .ok_or_else(|| ExportError::Raster(format!("Failed to create pixmap {}x{}", out_w, out_h)))?;
        pixmap.fill(tiny_skia::Color::WHITE);

        let mut pmut = pixmap.as_mut();
        let transform = tiny_skia::Transform::from_scale(scale, scale);
        resvg::render(&tree, transform, &mut pmut);

        let rgba = pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();

        Ok(Raster {
            width: out_w,
            height: out_h,
            rgba,
        })
    }
}

/// Rasterizes `scene` at the capture scale, encodes it as PNG and lays it out on a PDF page.
pub fn render_pdf<R: Rasterize + ?Sized>(scene: &CapturedScene, rasterizer: &R) -> Result<Vec<u8>, ExportError> {
    let raster = rasterizer.rasterize(scene, constants::CAPTURE_SCALE)?;
    let png = raster.to_png()?;
    pdf::single_image_pdf(&png, &Placement::default())
}

/// Renders `scene` and delivers it as `diagram.pdf`, reporting any failure to the caller.
pub fn try_export_to_pdf<R, S>(scene: &CapturedScene, rasterizer: &R, sink: &mut S) -> Result<(), ExportError>
where
    R: Rasterize + ?Sized,
    S: DownloadSink + ?Sized,
{
    let bytes = render_pdf(scene, rasterizer)?;
    sink.deliver(constants::PDF_FILE_NAME, bytes)
}

/// Renders `scene` and delivers it as `diagram.pdf`.
///
/// Failures are logged and swallowed: nothing is delivered and the caller carries on.
pub fn export_to_pdf<R, S>(scene: &CapturedScene, rasterizer: &R, sink: &mut S)
where
    R: Rasterize + ?Sized,
    S: DownloadSink + ?Sized,
{
    match try_export_to_pdf(scene, rasterizer, sink) {
        Ok(()) => log::info!("Exported {}", constants::PDF_FILE_NAME),
        Err(err) => log::error!("Error capturing diagram for PDF: {}", err),
    }
}
