//! Core data types for the diagram editor.
//!
//! This module defines the nodes, edges and connection parameters that make up a diagram,
//! the [`Diagram`] container that owns them, and the [`Viewport`] mapping between canvas
//! coordinates and the on-screen container.

use crate::constants;

/// Identifier of a diagram node. Ids are decimal strings ("1", "2", ...).
pub type NodeId = String;

/// Width and height of a node, in canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeSize {
    /// Width in canvas units
    pub width: u32,
    /// Height in canvas units
    pub height: u32,
}

impl NodeSize {
    /// Creates a new size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for NodeSize {
    fn default() -> Self {
        Self::new(constants::NODE_WIDTH, constants::NODE_HEIGHT)
    }
}

/// A positioned, labelled box on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramNode {
    /// Unique identifier for this node
    pub id: NodeId,
    /// Top-left corner on the canvas as (x, y)
    pub position: (f32, f32),
    /// Free text shown inside the node
    pub label: String,
    /// Rendered size of the node
    pub size: NodeSize,
}

impl DiagramNode {
    /// Creates a node with the given id, position, label and size.
    pub fn new(id: impl Into<NodeId>, position: (f32, f32), label: impl Into<String>, size: NodeSize) -> Self {
        Self {
            id: id.into(),
            position,
            label: label.into(),
            size,
        }
    }

    /// The canvas-space rectangle covered by this node.
    pub fn bounds(&self) -> Bounds {
        let (x, y) = self.position;
        Bounds {
            min: (x, y),
            max: (x + self.size.width as f32, y + self.size.height as f32),
        }
    }

    /// Centre of the outgoing handle on the right edge.
    pub fn source_handle(&self) -> (f32, f32) {
        let b = self.bounds();
        (b.max.0, (b.min.1 + b.max.1) / 2.0)
    }

    /// Centre of the incoming handle on the left edge.
    pub fn target_handle(&self) -> (f32, f32) {
        let b = self.bounds();
        (b.min.0, (b.min.1 + b.max.1) / 2.0)
    }
}

/// Edge type named by a connection, as the canvas widget knows them.
///
/// Only the smooth-step style is routed; the editor gives every edge that style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeStyle {
    /// Cubic curve leaving and entering the handles horizontally
    #[default]
    Bezier,
    /// Direct line between the handles
    Straight,
    /// Orthogonal segments with sharp corners
    Step,
    /// Orthogonal segments with rounded corners
    SmoothStep,
}

/// A directed connection from one node's source handle to another node's target handle.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Identifier derived from the endpoints
    pub id: String,
    /// Node the edge leaves from
    pub source: NodeId,
    /// Node the edge arrives at
    pub target: NodeId,
    /// Handle on the source node, if the gesture named one
    pub source_handle: Option<String>,
    /// Handle on the target node, if the gesture named one
    pub target_handle: Option<String>,
    /// How the edge is routed
    pub style: EdgeStyle,
    /// Whether the edge is drawn with a moving dash
    pub animated: bool,
}

impl Edge {
    /// Builds the conventional edge id `reactflow__edge-{source}{sourceHandle}-{target}{targetHandle}`.
    pub fn make_id(
        source: &str,
        source_handle: Option<&str>,
        target: &str,
        target_handle: Option<&str>,
    ) -> String {
        format!(
            "reactflow__edge-{}{}-{}{}",
            source,
            source_handle.unwrap_or_default(),
            target,
            target_handle.unwrap_or_default()
        )
    }
}

/// Endpoint pair reported by the canvas when a drag-to-connect gesture completes.
///
/// `style` and `animated` are hints only; the editor decides the final edge appearance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectParams {
    /// Node the gesture started on
    pub source: NodeId,
    /// Node the gesture ended on
    pub target: NodeId,
    /// Handle the gesture started on
    pub source_handle: Option<String>,
    /// Handle the gesture ended on
    pub target_handle: Option<String>,
    /// Style the caller would like, if any
    pub style: Option<EdgeStyle>,
    /// Animation the caller would like, if any
    pub animated: Option<bool>,
}

impl ConnectParams {
    /// Connection between two nodes without handle information.
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            ..Default::default()
        }
    }

    /// Connection from a source handle to a target handle, as produced by the canvas.
    pub fn between_handles(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            source_handle: Some(constants::SOURCE_HANDLE_ID.to_string()),
            target_handle: Some(constants::TARGET_HANDLE_ID.to_string()),
            ..Self::new(source, target)
        }
    }
}

/// Axis-aligned rectangle in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Top-left corner
    pub min: (f32, f32),
    /// Bottom-right corner
    pub max: (f32, f32),
}

impl Bounds {
    /// Horizontal extent.
    pub fn width(&self) -> f32 {
        self.max.0 - self.min.0
    }

    /// Vertical extent.
    pub fn height(&self) -> f32 {
        self.max.1 - self.min.1
    }

    /// Centre point.
    pub fn center(&self) -> (f32, f32) {
        (
            (self.min.0 + self.max.0) / 2.0,
            (self.min.1 + self.max.1) / 2.0,
        )
    }

    /// Whether the point lies inside or on the border.
    pub fn contains(&self, point: (f32, f32)) -> bool {
        point.0 >= self.min.0 && point.0 <= self.max.0 && point.1 >= self.min.1 && point.1 <= self.max.1
    }

    /// Smallest rectangle covering both.
    pub fn union(self, other: Bounds) -> Bounds {
        Bounds {
            min: (self.min.0.min(other.min.0), self.min.1.min(other.min.1)),
            max: (self.max.0.max(other.max.0), self.max.1.max(other.max.1)),
        }
    }
}

/// The node and edge collections of one canvas.
#[derive(Debug, Clone, Default)]
pub struct Diagram {
    /// Nodes in creation order; later nodes draw on top
    pub nodes: Vec<DiagramNode>,
    /// Edges in creation order
    pub edges: Vec<Edge>,
    /// Last numeric id handed out; ids never repeat even if nodes are removed later
    last_node_seq: u64,
}

impl Diagram {
    /// Creates an empty diagram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the diagram a fresh canvas starts with: a single "Start Node".
    pub fn with_start_node() -> Self {
        let mut diagram = Self::new();
        diagram.nodes.push(DiagramNode::new(
            constants::START_NODE_ID,
            constants::START_NODE_POSITION,
            constants::START_NODE_LABEL,
            NodeSize::default(),
        ));
        diagram.last_node_seq = constants::START_NODE_ID.parse().unwrap_or(1);
        diagram
    }

    /// Reserves the next node id.
    fn next_node_id(&mut self) -> NodeId {
        self.last_node_seq += 1;
        self.last_node_seq.to_string()
    }

    /// Appends a new node labelled `Node {id}` and returns its id.
    pub fn add_node(&mut self, position: (f32, f32), size: NodeSize) -> NodeId {
        let id = self.next_node_id();
        let label = format!("Node {}", id);
        self.nodes.push(DiagramNode::new(id.clone(), position, label, size));
        id
    }

    /// Looks up a node by id.
    pub fn node(&self, id: &str) -> Option<&DiagramNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Replaces the label of the node with the given id.
    ///
    /// Returns `false` (and changes nothing) when no such node exists.
    pub fn set_label(&mut self, id: &str, label: &str) -> bool {
        match self.nodes.iter_mut().find(|n| n.id == id) {
            Some(node) => {
                node.label = label.to_string();
                true
            }
            None => false,
        }
    }

    /// Moves the node with the given id so its top-left corner is at `position`.
    pub fn move_node(&mut self, id: &str, position: (f32, f32)) -> bool {
        match self.nodes.iter_mut().find(|n| n.id == id) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }

    /// Appends an edge. Endpoints are not validated.
    pub fn push_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    /// Union of all node rectangles, or `None` for an empty diagram.
    pub fn bounds(&self) -> Option<Bounds> {
        self.nodes
            .iter()
            .map(DiagramNode::bounds)
            .reduce(Bounds::union)
    }
}

/// Mapping between canvas coordinates and the container the canvas is shown in.
///
/// `screen = canvas * zoom + offset`, with screen coordinates relative to the container's
/// top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Translation applied after scaling
    pub offset: (f32, f32),
    /// Scale factor (1.0 = one canvas unit per point)
    pub zoom: f32,
    /// Size of the container in points
    pub size: (f32, f32),
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset: (0.0, 0.0),
            zoom: 1.0,
            size: (0.0, 0.0),
        }
    }
}

impl Viewport {
    /// Converts canvas coordinates to container coordinates.
    pub fn to_screen(&self, point: (f32, f32)) -> (f32, f32) {
        (
            point.0 * self.zoom + self.offset.0,
            point.1 * self.zoom + self.offset.1,
        )
    }

    /// Converts container coordinates to canvas coordinates.
    pub fn to_canvas(&self, point: (f32, f32)) -> (f32, f32) {
        (
            (point.0 - self.offset.0) / self.zoom,
            (point.1 - self.offset.1) / self.zoom,
        )
    }

    /// Changes the zoom while keeping the canvas point under `anchor` (container coordinates) fixed.
    ///
    /// The zoom is clamped to the allowed range.
    pub fn zoom_around(&mut self, anchor: (f32, f32), zoom: f32) {
        let zoom = zoom.clamp(constants::MIN_ZOOM, constants::MAX_ZOOM);
        let fixed = self.to_canvas(anchor);
        self.zoom = zoom;
        self.offset = (anchor.0 - fixed.0 * zoom, anchor.1 - fixed.1 * zoom);
    }

    /// Zooms by `factor` around the centre of the container.
    pub fn zoom_by(&mut self, factor: f32) {
        let center = (self.size.0 / 2.0, self.size.1 / 2.0);
        self.zoom_around(center, self.zoom * factor);
    }

    /// Centres `bounds` in the container, scaled to fit with `padding` (a fraction of the bounds) on each side.
    pub fn fit(&mut self, bounds: Bounds, padding: f32) {
        let (w, h) = self.size;
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        let padded_w = (bounds.width() * (1.0 + 2.0 * padding)).max(1.0);
        let padded_h = (bounds.height() * (1.0 + 2.0 * padding)).max(1.0);
        let zoom = (w / padded_w)
            .min(h / padded_h)
            .clamp(constants::MIN_ZOOM, constants::MAX_ZOOM);
        let (cx, cy) = bounds.center();
        self.zoom = zoom;
        self.offset = (w / 2.0 - cx * zoom, h / 2.0 - cy * zoom);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_node_diagram() {
        let diagram = Diagram::with_start_node();

        assert_eq!(diagram.nodes.len(), 1);
        assert!(diagram.edges.is_empty());
        let node = &diagram.nodes[0];
        assert_eq!(node.id, "1");
        assert_eq!(node.label, "Start Node");
        assert_eq!(node.size, NodeSize::new(250, 150));
        assert_eq!(node.position, (250.0, 100.0));
    }

    #[test]
    fn test_add_node_assigns_sequential_ids_and_labels() {
        let mut diagram = Diagram::with_start_node();

        let second = diagram.add_node((0.0, 0.0), NodeSize::new(100, 50));
        let third = diagram.add_node((10.0, 10.0), NodeSize::new(100, 50));

        assert_eq!(second, "2");
        assert_eq!(third, "3");
        assert_eq!(diagram.node("2").map(|n| n.label.as_str()), Some("Node 2"));
        assert_eq!(diagram.node("3").map(|n| n.size), Some(NodeSize::new(100, 50)));
    }

    #[test]
    fn test_set_label_unknown_id_is_noop() {
        let mut diagram = Diagram::with_start_node();
        let before = diagram.nodes.clone();

        assert!(!diagram.set_label("42", "nope"));
        assert_eq!(diagram.nodes, before);
    }

    #[test]
    fn test_move_node() {
        let mut diagram = Diagram::with_start_node();

        assert!(diagram.move_node("1", (5.0, 6.0)));
        assert_eq!(diagram.nodes[0].position, (5.0, 6.0));
        assert!(!diagram.move_node("9", (0.0, 0.0)));
    }

    #[test]
    fn test_handles_sit_on_vertical_edges() {
        let node = DiagramNode::new("1", (10.0, 20.0), "", NodeSize::new(100, 40));

        assert_eq!(node.target_handle(), (10.0, 40.0));
        assert_eq!(node.source_handle(), (110.0, 40.0));
    }

    #[test]
    fn test_edge_id_convention() {
        let id = Edge::make_id("1", Some("source"), "2", Some("target"));
        assert_eq!(id, "reactflow__edge-1source-2target");
        assert_eq!(Edge::make_id("1", None, "2", None), "reactflow__edge-1-2");
    }

    #[test]
    fn test_diagram_bounds() {
        let mut diagram = Diagram::new();
        assert!(diagram.bounds().is_none());

        diagram.nodes.push(DiagramNode::new("a", (0.0, 0.0), "", NodeSize::new(10, 10)));
        diagram.nodes.push(DiagramNode::new("b", (50.0, -20.0), "", NodeSize::new(10, 10)));

        let bounds = diagram.bounds().unwrap();
        assert_eq!(bounds.min, (0.0, -20.0));
        assert_eq!(bounds.max, (60.0, 10.0));
    }

    #[test]
    fn test_viewport_roundtrip_and_zoom_anchor() {
        let mut viewport = Viewport {
            offset: (30.0, -10.0),
            zoom: 1.5,
            size: (800.0, 600.0),
        };
        let p = (12.0, 34.0);
        let back = viewport.to_canvas(viewport.to_screen(p));
        assert!((back.0 - p.0).abs() < 1e-4 && (back.1 - p.1).abs() < 1e-4);

        let anchor = (200.0, 100.0);
        let under_before = viewport.to_canvas(anchor);
        viewport.zoom_around(anchor, 1.8);
        let under_after = viewport.to_canvas(anchor);
        assert!((under_before.0 - under_after.0).abs() < 1e-3);
        assert!((under_before.1 - under_after.1).abs() < 1e-3);
    }

    #[test]
    fn test_viewport_zoom_is_clamped() {
        let mut viewport = Viewport {
            size: (100.0, 100.0),
            ..Default::default()
        };
        viewport.zoom_by(100.0);
        assert_eq!(viewport.zoom, constants::MAX_ZOOM);
        viewport.zoom_by(0.0001);
        assert_eq!(viewport.zoom, constants::MIN_ZOOM);
    }

    #[test]
    fn test_viewport_fit_centres_bounds() {
        let mut viewport = Viewport {
            size: (1000.0, 800.0),
            ..Default::default()
        };
        let bounds = Bounds {
            min: (250.0, 100.0),
            max: (500.0, 250.0),
        };
        viewport.fit(bounds, 0.1);

        // The start node is small, so fitting hits the zoom ceiling
        assert_eq!(viewport.zoom, constants::MAX_ZOOM);
        let center = viewport.to_screen(bounds.center());
        assert!((center.0 - 500.0).abs() < 1e-3);
        assert!((center.1 - 400.0).abs() < 1e-3);
    }
}
