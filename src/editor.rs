//! State container of the diagram canvas.
//!
//! [`DiagramEditor`] owns the node and edge collections, the pending dimensions for the next
//! node and the modal-open flag. Every user-facing action of the canvas goes through one of
//! its operations; the UI layer only forwards events.

use rand::Rng;

use crate::constants;
use crate::types::*;

/// The canvas state: diagram, dimension draft and dialog flag.
#[derive(Debug, Clone)]
pub struct DiagramEditor {
    /// Nodes and edges shown on the canvas
    pub diagram: Diagram,
    /// Width and height the next created node will get.
    /// Kept across dialog openings so the dialog shows the last entered size.
    pub dimension_draft: NodeSize,
    /// Whether the dimension dialog is open
    pub modal_open: bool,
}

impl Default for DiagramEditor {
    fn default() -> Self {
        Self {
            diagram: Diagram::with_start_node(),
            dimension_draft: NodeSize::default(),
            modal_open: false,
        }
    }
}

impl DiagramEditor {
    /// Creates an editor showing the single start node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the dimension dialog. Nothing is created until the dialog is submitted.
    pub fn add_node(&mut self) {
        self.modal_open = true;
    }

    /// Creates a node sized by the dimension draft at a random spot and closes the dialog.
    pub fn submit_dimensions(&mut self) -> NodeId {
        self.submit_dimensions_with(&mut rand::rng())
    }

    /// Same as [`submit_dimensions`](Self::submit_dimensions) with a caller-provided random source.
    pub fn submit_dimensions_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> NodeId {
        let position = (
            rng.random_range(0.0..constants::PLACEMENT_BOX),
            rng.random_range(0.0..constants::PLACEMENT_BOX),
        );
        let id = self.diagram.add_node(position, self.dimension_draft);
        self.modal_open = false;
        log::info!(
            "Added node {} ({}x{}) at ({:.0}, {:.0})",
            id,
            self.dimension_draft.width,
            self.dimension_draft.height,
            position.0,
            position.1
        );
        id
    }

    /// Closes the dimension dialog without touching the diagram.
    pub fn cancel_dimensions(&mut self) {
        self.modal_open = false;
    }

    /// Appends an edge for a completed connect gesture.
    ///
    /// The edge is always a smooth-step, animated edge whatever the parameters ask for.
    /// Endpoints are not validated, so duplicate and self edges are accepted.
    pub fn on_connect(&mut self, params: ConnectParams) -> &Edge {
        let id = Edge::make_id(
            &params.source,
            params.source_handle.as_deref(),
            &params.target,
            params.target_handle.as_deref(),
        );
        log::debug!("Connecting {} -> {}", params.source, params.target);
        self.diagram.push_edge(Edge {
            id,
            source: params.source,
            target: params.target,
            source_handle: params.source_handle,
            target_handle: params.target_handle,
            style: EdgeStyle::SmoothStep,
            animated: true,
        });
        &self.diagram.edges[self.diagram.edges.len() - 1]
    }

    /// Replaces the label of node `id`. Unknown ids are ignored.
    pub fn update_node(&mut self, id: &str, label: &str) -> bool {
        let updated = self.diagram.set_label(id, label);
        if !updated {
            log::debug!("Ignoring label edit for unknown node {}", id);
        }
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn initial_state_has_start_node_only() {
        let editor = DiagramEditor::new();

        assert_eq!(editor.diagram.nodes.len(), 1);
        assert_eq!(editor.diagram.nodes[0].id, "1");
        assert_eq!(editor.diagram.nodes[0].label, "Start Node");
        assert_eq!(editor.diagram.nodes[0].size, NodeSize::new(250, 150));
        assert!(editor.diagram.edges.is_empty());
        assert!(!editor.modal_open);
        assert_eq!(editor.dimension_draft, NodeSize::new(250, 150));
    }

    #[test]
    fn add_node_only_opens_dialog() {
        let mut editor = DiagramEditor::new();
        editor.add_node();

        assert!(editor.modal_open);
        assert_eq!(editor.diagram.nodes.len(), 1);
    }

    #[test]
    fn submit_appends_one_node_per_call_with_draft_size() {
        let mut editor = DiagramEditor::new();
        let mut rng = StdRng::seed_from_u64(7);
        let sizes = [(300, 200), (10, 10), (4000, 1), (250, 150)];

        for (i, (w, h)) in sizes.into_iter().enumerate() {
            editor.add_node();
            editor.dimension_draft = NodeSize::new(w, h);
            let id = editor.submit_dimensions_with(&mut rng);

            assert_eq!(editor.diagram.nodes.len(), i + 2);
            let node = editor.diagram.nodes.last().unwrap();
            assert_eq!(node.id, id);
            assert_eq!(node.size, NodeSize::new(w, h));
            assert!((0.0..400.0).contains(&node.position.0));
            assert!((0.0..400.0).contains(&node.position.1));
        }
    }

    #[test]
    fn submit_scenario_from_default_state() {
        let mut editor = DiagramEditor::new();

        editor.add_node();
        assert!(editor.modal_open);
        editor.dimension_draft = NodeSize::new(300, 200);
        editor.submit_dimensions();

        assert_eq!(editor.diagram.nodes.len(), 2);
        assert_eq!(editor.diagram.nodes[1].size, NodeSize::new(300, 200));
        assert_eq!(editor.diagram.nodes[1].id, "2");
        assert_eq!(editor.diagram.nodes[1].label, "Node 2");
        assert!(!editor.modal_open);
    }

    #[test]
    fn draft_survives_reopening_the_dialog() {
        let mut editor = DiagramEditor::new();

        editor.add_node();
        editor.dimension_draft = NodeSize::new(120, 80);
        editor.cancel_dimensions();
        editor.add_node();

        assert_eq!(editor.dimension_draft, NodeSize::new(120, 80));
    }

    #[test]
    fn cancel_never_changes_nodes() {
        let mut editor = DiagramEditor::new();
        editor.add_node();
        editor.cancel_dimensions();
        editor.cancel_dimensions();

        assert_eq!(editor.diagram.nodes.len(), 1);
        assert!(!editor.modal_open);
    }

    #[test]
    fn update_node_changes_only_matching_label() {
        let mut editor = DiagramEditor::new();
        editor.submit_dimensions_with(&mut StdRng::seed_from_u64(1));
        let before = editor.diagram.nodes.clone();

        assert!(editor.update_node("2", "hello"));
        assert!(editor.update_node("2", "hello"));

        assert_eq!(editor.diagram.nodes[0], before[0]);
        let changed = &editor.diagram.nodes[1];
        assert_eq!(changed.label, "hello");
        assert_eq!(changed.position, before[1].position);
        assert_eq!(changed.size, before[1].size);
        assert_eq!(changed.id, before[1].id);
    }

    #[test]
    fn update_unknown_node_is_silent_noop() {
        let mut editor = DiagramEditor::new();
        let before = editor.diagram.nodes.clone();

        assert!(!editor.update_node("missing", "text"));
        assert_eq!(editor.diagram.nodes, before);
    }

    #[test]
    fn on_connect_forces_smooth_step_and_animation() {
        let mut editor = DiagramEditor::new();
        editor.submit_dimensions_with(&mut StdRng::seed_from_u64(3));

        let params = ConnectParams {
            style: Some(EdgeStyle::Straight),
            animated: Some(false),
            ..ConnectParams::between_handles("1", "2")
        };
        let edge = editor.on_connect(params).clone();

        assert_eq!(editor.diagram.edges.len(), 1);
        assert_eq!(edge.style, EdgeStyle::SmoothStep);
        assert!(edge.animated);
        assert_eq!(edge.source, "1");
        assert_eq!(edge.target, "2");
        assert_eq!(edge.id, "reactflow__edge-1source-2target");
    }

    #[test]
    fn on_connect_accepts_duplicates_and_self_edges() {
        let mut editor = DiagramEditor::new();

        editor.on_connect(ConnectParams::new("1", "1"));
        editor.on_connect(ConnectParams::new("1", "1"));

        assert_eq!(editor.diagram.edges.len(), 2);
        assert!(editor.diagram.edges.iter().all(|e| e.animated && e.style == EdgeStyle::SmoothStep));
    }
}
