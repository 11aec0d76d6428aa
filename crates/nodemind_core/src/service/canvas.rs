//! Canvas renderer boundary for one mind map.
//!
//! # Responsibility
//! - Project a map's nodes and edges into the read-only shape the canvas
//!   draws.
//! - Translate the renderer's three committed events into store operations.
//!
//! # Invariants
//! - Projections are filtered to one map and never expose mutable state.
//! - Drag-in-progress positions stay in the renderer; only `NodeMoved`
//!   commits a position.

use crate::model::mindmap::{EdgeId, MapId, NewEdge, Node, NodeId, NodePatch, Position};
use crate::store::{Store, StoreResult};
use once_cell::sync::Lazy;
use regex::Regex;

const PREVIEW_MAX_CHARS: usize = 100;

static MARKDOWN_IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[[^\]]*]\(([^)]+)\)").expect("valid image regex"));
static MARKDOWN_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid link regex"));
static MARKDOWN_SYMBOL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[\*_`#>~\-\[\]\(\)!]+"#).expect("valid markdown symbol regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

#[derive(Debug, Clone, PartialEq)]
pub struct CanvasNode {
    pub id: NodeId,
    pub position: Position,
    pub title: String,
    pub emoji: Option<String>,
    /// Short plain-text excerpt of the node body.
    pub preview: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanvasView {
    pub nodes: Vec<CanvasNode>,
    pub edges: Vec<CanvasEdge>,
}

/// Events the renderer reports back after direct manipulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasEvent {
    NodeMoved { id: NodeId, position: Position },
    ConnectionDrawn {
        map_id: MapId,
        source: NodeId,
        target: NodeId,
    },
    NodeRemoved { id: NodeId },
    EdgeRemoved { id: EdgeId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanvasOutcome {
    Applied,
    EdgeCreated(EdgeId),
}

/// Projects `map_id` for the canvas. Unknown maps yield an empty view.
pub fn canvas_view(store: &Store, map_id: MapId) -> CanvasView {
    let nodes = store
        .nodes_in_map(map_id)
        .map(|node| CanvasNode {
            id: node.id,
            position: node.position,
            title: node.title.clone(),
            emoji: node.emoji.clone(),
            preview: node_preview(node),
        })
        .collect();
    let edges = store
        .edges_in_map(map_id)
        .map(|edge| CanvasEdge {
            id: edge.id,
            source: edge.source,
            target: edge.target,
        })
        .collect();
    CanvasView { nodes, edges }
}

/// Applies one renderer event to the store.
///
/// # Errors
/// - Propagates edge validation errors for `ConnectionDrawn`.
pub fn apply_canvas_event(store: &mut Store, event: CanvasEvent) -> StoreResult<CanvasOutcome> {
    match event {
        CanvasEvent::NodeMoved { id, position } => {
            store.update_node(
                id,
                NodePatch {
                    position: Some(position),
                    ..NodePatch::default()
                },
            );
            Ok(CanvasOutcome::Applied)
        }
        CanvasEvent::ConnectionDrawn {
            map_id,
            source,
            target,
        } => store
            .add_edge(NewEdge {
                source,
                target,
                map_id,
            })
            .map(CanvasOutcome::EdgeCreated),
        CanvasEvent::NodeRemoved { id } => {
            store.delete_node(id);
            Ok(CanvasOutcome::Applied)
        }
        CanvasEvent::EdgeRemoved { id } => {
            store.delete_edge(id);
            Ok(CanvasOutcome::Applied)
        }
    }
}

/// Plain-text excerpt of a node body, markdown-stripped when flagged.
pub fn node_preview(node: &Node) -> Option<String> {
    if node.is_markdown {
        markdown_preview_text(&node.content)
    } else {
        collapse_preview(&node.content)
    }
}

/// Strips markdown from `content` for a one-line card excerpt.
///
/// Rules:
/// - every image is dropped, links reduced to their label;
/// - markdown symbols removed, whitespace collapsed;
/// - first 100 chars retained.
pub fn markdown_preview_text(content: &str) -> Option<String> {
    let without_images = MARKDOWN_IMAGE_RE.replace_all(content, " ");
    let without_links = MARKDOWN_LINK_RE.replace_all(&without_images, "$1");
    let without_symbols = MARKDOWN_SYMBOL_RE.replace_all(&without_links, " ");
    collapse_preview(&without_symbols)
}

fn collapse_preview(text: &str) -> Option<String> {
    let normalized = WHITESPACE_RE.replace_all(text, " ");
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.chars().take(PREVIEW_MAX_CHARS).collect())
    }
}
