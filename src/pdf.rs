//! Single-page PDF assembly.
//!
//! Builds an A4 portrait document holding one PNG image, placed the way the export expects:
//! 10 mm from the top-left corner, 180 x 160 mm in size. The image keeps PNG's scanline
//! encoding: Flate-compressed rows, each led by its filter type, read back through the
//! `/Predictor 15` decode parameters.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use crate::constants;
use crate::export::{ExportError, Raster};

/// PNG "Up" filter: each byte is stored as the difference from the byte above it.
const PNG_FILTER_UP: u8 = 2;

const POINTS_PER_MM: f32 = 72.0 / 25.4;

/// Where an image goes on the page, in millimetres measured from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Page width and height
    pub page: (f32, f32),
    /// Image top-left corner
    pub origin: (f32, f32),
    /// Image width and height
    pub size: (f32, f32),
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            page: constants::PDF_PAGE_MM,
            origin: constants::PDF_IMAGE_ORIGIN_MM,
            size: constants::PDF_IMAGE_SIZE_MM,
        }
    }
}

impl Placement {
    /// The `cm` matrix operands (in points, PDF's bottom-left origin) mapping the unit square onto the image area.
    fn image_matrix(&self) -> [f32; 6] {
        let w = self.size.0 * POINTS_PER_MM;
        let h = self.size.1 * POINTS_PER_MM;
        let x = self.origin.0 * POINTS_PER_MM;
        let y = (self.page.1 - self.origin.1 - self.size.1) * POINTS_PER_MM;
        [w, 0.0, 0.0, h, x, y]
    }
}

/// Builds a PDF with the PNG image `png` drawn at `placement` and returns the serialized bytes.
pub fn single_image_pdf(png: &[u8], placement: &Placement) -> Result<Vec<u8>, ExportError> {
    let image = png_image_stream(png)?;

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let image_id = doc.add_object(image);

    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                placement.image_matrix().iter().map(|v| Object::Real((*v).into())).collect(),
            ),
            Operation::new("Do", vec!["Im0".into()]),
            Operation::new("Q", vec![]),
        ],
    };
    let encoded = content
        .encode()
        .map_err(|e| ExportError::Pdf(e.to_string()))?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => dictionary! {
            "XObject" => dictionary! {
                "Im0" => image_id,
            },
        },
    });

    let (page_w, page_h) = placement.page;
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "MediaBox" => vec![
            0.into(),
            0.into(),
            Object::Real((page_w * POINTS_PER_MM).into()),
            Object::Real((page_h * POINTS_PER_MM).into()),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;
    Ok(bytes)
}

/// Image XObject for a PNG. Transparency is composited over white.
fn png_image_stream(png: &[u8]) -> Result<Stream, ExportError> {
    let pixmap = tiny_skia::Pixmap::decode_png(png)
        .map_err(|e| ExportError::Pdf(format!("unreadable PNG: {}", e)))?;
    let raster = Raster {
        width: pixmap.width(),
        height: pixmap.height(),
        rgba: pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect(),
    };
    let rgb = raster.to_rgb_on_white();
    let columns = i64::from(raster.width);

    let mut image = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => columns,
            "Height" => i64::from(raster.height),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "DecodeParms" => dictionary! {
                "Predictor" => 15,
                "Colors" => 3,
                "BitsPerComponent" => 8,
                "Columns" => columns,
            },
        },
        png_scanlines(&rgb, raster.width as usize * 3),
    );
    image
        .compress()
        .map_err(|e| ExportError::Pdf(e.to_string()))?;

    // Left uncompressed, the rows must go in without their filter bytes
    if image.dict.get(b"Filter").is_err() {
        image.dict.remove(b"DecodeParms");
        image.set_content(rgb);
    }
    Ok(image)
}

/// Splits `rgb` into rows of `stride` bytes and filters each with PNG's Up filter.
fn png_scanlines(rgb: &[u8], stride: usize) -> Vec<u8> {
    if stride == 0 {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(rgb.len() + rgb.len() / stride);
    let mut above: &[u8] = &[];
    for row in rgb.chunks_exact(stride) {
        out.push(PNG_FILTER_UP);
        for (i, &byte) in row.iter().enumerate() {
            let up = above.get(i).copied().unwrap_or(0);
            out.push(byte.wrapping_sub(up));
        }
        above = row;
    }
    out
}
