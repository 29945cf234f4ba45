//! Capture of the canvas container as an SVG scene.
//!
//! The capture reproduces what the container shows at the moment it is taken: the current
//! pan and zoom, the dotted background, edges, nodes with their labels and handles. It is a
//! plain string so it can be handed to a background task and rasterized later without
//! observing edits made in the meantime.

use std::fmt::Write as _;

use crate::constants;
use crate::edge_path;
use crate::types::*;

const BACKGROUND_COLOR: &str = "#ffffff";
const DOT_COLOR: &str = "#91919a";
const EDGE_COLOR: &str = "#b1b1b7";
const NODE_BORDER_COLOR: &str = "#cccccc";
const HANDLE_COLOR: &str = "#1a192b";
const TEXT_COLOR: &str = "#000000";
const PLACEHOLDER_COLOR: &str = "#757575";
/// Label text shown in empty nodes.
pub const PLACEHOLDER: &str = "Enter node content";
/// Line height as a multiple of the font size.
const LINE_HEIGHT: f32 = 1.2;

/// An SVG snapshot of the canvas container.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedScene {
    /// SVG document
    pub svg: String,
    /// Container width in points
    pub width: u32,
    /// Container height in points
    pub height: u32,
}

/// Rough text width for a proportional font: average glyph width of 0.55 em.
#[cfg(test)]
pub(crate) fn estimate_text_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * 0.55
}

/// Captures `diagram` as displayed through `container`.
///
/// `measure` returns the rendered width of a string at a font size; it drives label wrapping.
pub fn capture_scene(
    diagram: &Diagram,
    container: &Viewport,
    measure: &dyn Fn(&str, f32) -> f32,
) -> CapturedScene {
    let width = container.size.0.ceil().max(0.0) as u32;
    let height = container.size.1.ceil().max(0.0) as u32;
    let zoom = container.zoom;

    let mut out = String::new();

    let _ = writeln!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\">",
        width, height, width, height
    );

    // Background with dots anchored to the canvas origin
    let gap = constants::DOT_GAP * zoom;
    let _ = writeln!(out, "<defs>");
    let _ = writeln!(
        out,
        "  <pattern id=\"dots\" x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" patternUnits=\"userSpaceOnUse\">",
        container.offset.0.rem_euclid(gap),
        container.offset.1.rem_euclid(gap),
        gap,
        gap
    );
    let _ = writeln!(
        out,
        "    <circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"{}\" />",
        gap / 2.0,
        gap / 2.0,
        constants::DOT_RADIUS * zoom,
        DOT_COLOR
    );
    let _ = writeln!(out, "  </pattern>");
    let _ = writeln!(out, "</defs>");
    let _ = writeln!(
        out,
        "<rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"{}\" />",
        width, height, BACKGROUND_COLOR
    );
    let _ = writeln!(
        out,
        "<rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"url(#dots)\" />",
        width, height
    );

    // Edges below nodes
    let _ = writeln!(
        out,
        "<g fill=\"none\" stroke=\"{}\" stroke-width=\"{:.2}\">",
        EDGE_COLOR, zoom
    );
    for edge in &diagram.edges {
        let (Some(source), Some(target)) = (diagram.node(&edge.source), diagram.node(&edge.target)) else {
            continue;
        };
        let path = edge_path::smooth_step(source.source_handle(), target.target_handle())
            .to_screen(container);
        if edge.animated {
            let _ = writeln!(
                out,
                "  <path d=\"{}\" stroke-dasharray=\"{:.2}\" />",
                path.to_svg_data(),
                constants::EDGE_DASH * zoom
            );
        } else {
            let _ = writeln!(out, "  <path d=\"{}\" />", path.to_svg_data());
        }
    }
    let _ = writeln!(out, "</g>");

    for node in &diagram.nodes {
        write_node(&mut out, node, container, measure);
    }

    let _ = writeln!(out, "</svg>");

    CapturedScene {
        svg: out,
        width,
        height,
    }
}

fn write_node(out: &mut String, node: &DiagramNode, container: &Viewport, measure: &dyn Fn(&str, f32) -> f32) {
    let zoom = container.zoom;
    let (x, y) = container.to_screen(node.position);
    let w = node.size.width as f32 * zoom;
    let h = node.size.height as f32 * zoom;

    let _ = writeln!(
        out,
        "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" rx=\"{:.1}\" ry=\"{:.1}\" fill=\"#ffffff\" stroke=\"{}\" stroke-width=\"{:.2}\" />",
        x,
        y,
        w,
        h,
        constants::NODE_CORNER_RADIUS * zoom,
        constants::NODE_CORNER_RADIUS * zoom,
        NODE_BORDER_COLOR,
        zoom
    );

    let padding = constants::NODE_PADDING * zoom;
    let font_size = constants::NODE_FONT_SIZE * zoom;
    let line_height = font_size * LINE_HEIGHT;
    let (text, color) = if node.label.is_empty() {
        (PLACEHOLDER, PLACEHOLDER_COLOR)
    } else {
        (node.label.as_str(), TEXT_COLOR)
    };
    let lines = wrap_label(text, (w - 2.0 * padding).max(1.0), font_size, measure);
    let max_lines = ((h - 2.0 * padding) / line_height).floor().max(0.0) as usize;
    if max_lines > 0 && !lines.is_empty() {
        let _ = writeln!(
            out,
            "<text font-family=\"sans-serif\" font-size=\"{:.2}\" fill=\"{}\">",
            font_size, color
        );
        for (i, line) in lines.iter().take(max_lines).enumerate() {
            let _ = writeln!(
                out,
                "  <tspan x=\"{:.1}\" y=\"{:.1}\">{}</tspan>",
                x + padding,
                y + padding + font_size + i as f32 * line_height,
                escape_xml(line)
            );
        }
        let _ = writeln!(out, "</text>");
    }

    let radius = constants::HANDLE_RADIUS * zoom;
    for (hx, hy) in [node.target_handle(), node.source_handle()].map(|p| container.to_screen(p)) {
        let _ = writeln!(
            out,
            "<circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"{:.2}\" fill=\"{}\" stroke=\"#ffffff\" stroke-width=\"{:.2}\" />",
            hx, hy, radius, HANDLE_COLOR, zoom
        );
    }
}

/// Splits a label into display lines: explicit newlines first, then word wrapping to `max_width`.
pub fn wrap_label(
    text: &str,
    max_width: f32,
    font_size: f32,
    measure: &dyn Fn(&str, f32) -> f32,
) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let words: Vec<&str> = paragraph.split_whitespace().collect();
        if words.is_empty() {
            lines.push(String::new());
            continue;
        }
        let mut current_line = String::new();
        for word in words {
            let test_line = if current_line.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current_line, word)
            };
            if measure(&test_line, font_size) <= max_width {
                current_line = test_line;
            } else if !current_line.is_empty() {
                lines.push(current_line);
                current_line = word.to_string();
            } else {
                // A single word longer than max width – put it as a line by itself
                lines.push(word.to_string());
            }
        }
        if !current_line.is_empty() {
            lines.push(current_line);
        }
    }
    lines
}

fn escape_xml(input: &str) -> String {
    let mut s = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => s.push_str("&amp;"),
            '<' => s.push_str("&lt;"),
            '>' => s.push_str("&gt;"),
            '"' => s.push_str("&quot;"),
            '\'' => s.push_str("&apos;"),
            _ => s.push(ch),
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::DiagramEditor;

    fn container() -> Viewport {
        Viewport {
            offset: (0.0, 0.0),
            zoom: 1.0,
            size: (800.0, 600.0),
        }
    }

    #[test]
    fn capture_contains_nodes_edges_and_labels() {
        let mut editor = DiagramEditor::new();
        editor.diagram.nodes.push(DiagramNode::new("2", (600.0, 100.0), "Second <node>", NodeSize::new(100, 80)));
        editor.on_connect(ConnectParams::between_handles("1", "2"));

        let scene = capture_scene(&editor.diagram, &container(), &estimate_text_width);

        assert_eq!((scene.width, scene.height), (800, 600));
        assert!(scene.svg.starts_with("<svg"));
        assert!(scene.svg.trim_end().ends_with("</svg>"));
        assert!(scene.svg.contains("Start Node"));
        assert!(scene.svg.contains("Second &lt;node&gt;"));
        assert_eq!(scene.svg.matches("stroke-dasharray").count(), 1);
        // Two nodes, each with two handles
        assert_eq!(scene.svg.matches("fill=\"#1a192b\"").count(), 4);
    }

    #[test]
    fn capture_skips_edges_to_missing_nodes() {
        let mut editor = DiagramEditor::new();
        editor.on_connect(ConnectParams::new("1", "404"));

        let scene = capture_scene(&editor.diagram, &container(), &estimate_text_width);

        assert!(!scene.svg.contains("<path"));
    }

    #[test]
    fn empty_label_shows_placeholder() {
        let mut editor = DiagramEditor::new();
        editor.update_node("1", "");

        let scene = capture_scene(&editor.diagram, &container(), &estimate_text_width);

        assert!(scene.svg.contains(PLACEHOLDER));
        assert!(scene.svg.contains(PLACEHOLDER_COLOR));
    }

    #[test]
    fn capture_follows_pan_and_zoom() {
        let diagram = Diagram::with_start_node();
        let viewport = Viewport {
            offset: (-100.0, 20.0),
            zoom: 2.0,
            size: (640.0, 480.0),
        };

        let scene = capture_scene(&diagram, &viewport, &estimate_text_width);

        // (250, 100) * 2 + (-100, 20)
        assert!(scene.svg.contains("<rect x=\"400.0\" y=\"220.0\" width=\"500.0\" height=\"300.0\""));
    }

    #[test]
    fn wrap_label_breaks_on_newlines_and_width() {
        let lines = wrap_label("one two three\nfour", 10.0 * 14.0 * 0.55, 14.0, &estimate_text_width);
        assert_eq!(lines, vec!["one two", "three", "four"]);
    }

    #[test]
    fn wrap_label_keeps_long_words_whole() {
        let lines = wrap_label("supercalifragilistic", 20.0, 14.0, &estimate_text_width);
        assert_eq!(lines, vec!["supercalifragilistic"]);
    }
}
