//! Mind-map graph model: maps, nodes and edges.
//!
//! # Responsibility
//! - Define the records behind the mind-map canvas.
//! - Apply shallow partial updates with `updated_at` refresh.
//!
//! # Invariants
//! - A node belongs to exactly one map (`map_id`), fixed at creation.
//! - An edge connects two nodes of its own `map_id`; the store checks this
//!   on write.
//! - `updated_at` is refreshed on every update of a map or node.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type MapId = Uuid;
pub type NodeId = Uuid;
pub type EdgeId = Uuid;

/// Canvas camera state saved with a map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    #[serde(with = "crate::model::float")]
    pub x: f64,
    #[serde(with = "crate::model::float")]
    pub y: f64,
    #[serde(with = "crate::model::float")]
    pub zoom: f64,
}

/// Node position in canvas coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    #[serde(with = "crate::model::float")]
    pub x: f64,
    #[serde(with = "crate::model::float")]
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MindMap {
    pub id: MapId,
    pub title: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub viewport: Option<Viewport>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapPatch {
    pub title: Option<String>,
    pub viewport: Option<Option<Viewport>>,
}

impl MindMap {
    pub fn create(title: impl Into<String>, now_ms: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            created_at: now_ms,
            updated_at: now_ms,
            viewport: None,
        }
    }

    pub fn apply(&mut self, patch: MapPatch, now_ms: i64) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(viewport) = patch.viewport {
            self.viewport = viewport;
        }
        self.updated_at = now_ms;
    }
}

/// A titled, positioned point on a map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub map_id: MapId,
    pub title: String,
    pub content: String,
    pub emoji: Option<String>,
    pub tags: Vec<String>,
    pub position: Position,
    pub created_at: i64,
    pub updated_at: i64,
    /// Whether `content` should be rendered as markdown.
    pub is_markdown: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewNode {
    pub map_id: MapId,
    pub title: String,
    pub content: String,
    pub emoji: Option<String>,
    pub tags: Vec<String>,
    pub position: Position,
    pub is_markdown: bool,
}

impl NewNode {
    pub fn new(map_id: MapId, title: impl Into<String>, position: Position) -> Self {
        Self {
            map_id,
            title: title.into(),
            position,
            ..Self::default()
        }
    }
}

/// Shallow partial update for a node. `map_id` is not patchable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub emoji: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub position: Option<Position>,
    pub is_markdown: Option<bool>,
}

impl Node {
    pub fn create(input: NewNode, now_ms: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            map_id: input.map_id,
            title: input.title,
            content: input.content,
            emoji: input.emoji,
            tags: input.tags,
            position: input.position,
            created_at: now_ms,
            updated_at: now_ms,
            is_markdown: input.is_markdown,
        }
    }

    pub fn apply(&mut self, patch: NodePatch, now_ms: i64) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(emoji) = patch.emoji {
            self.emoji = emoji;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(position) = patch.position {
            self.position = position;
        }
        if let Some(is_markdown) = patch.is_markdown {
            self.is_markdown = is_markdown;
        }
        self.updated_at = now_ms;
    }
}

/// Directed connection between two nodes of one map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub map_id: MapId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewEdge {
    pub source: NodeId,
    pub target: NodeId,
    pub map_id: MapId,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgePatch {
    pub source: Option<NodeId>,
    pub target: Option<NodeId>,
}

impl Edge {
    pub fn create(input: NewEdge) -> Self {
        Self {
            id: Uuid::new_v4(),
            source: input.source,
            target: input.target,
            map_id: input.map_id,
        }
    }

    /// Returns a copy with the patch applied, leaving `self` untouched.
    pub fn patched(&self, patch: EdgePatch) -> Self {
        Self {
            source: patch.source.unwrap_or(self.source),
            target: patch.target.unwrap_or(self.target),
            ..*self
        }
    }

    /// Whether either endpoint is `node_id`.
    pub fn touches(&self, node_id: NodeId) -> bool {
        self.source == node_id || self.target == node_id
    }
}
