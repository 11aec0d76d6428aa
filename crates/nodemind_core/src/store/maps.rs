use super::observer::{ChangeSet, Slice};
use super::{Store, StoreError, StoreResult};
use crate::model::mindmap::{
    Edge, EdgeId, EdgePatch, MapId, MapPatch, MindMap, NewEdge, NewNode, Node, NodeId, NodePatch,
};
use log::debug;

impl Store {
    pub fn maps(&self) -> &[MindMap] {
        &self.state.maps
    }

    pub fn map(&self, id: MapId) -> Option<&MindMap> {
        self.state.maps.iter().find(|map| map.id == id)
    }

    /// Creates a map and returns its id immediately so callers can navigate
    /// to it before the next render.
    pub fn add_map(&mut self, title: impl Into<String>) -> MapId {
        let map = MindMap::create(title, self.clock.now_ms());
        let id = map.id;
        self.state.maps.push(map);
        debug!("event=map_add module=store status=ok map_id={id}");
        self.commit(ChangeSet::of(Slice::Maps));
        id
    }

    pub fn update_map(&mut self, id: MapId, patch: MapPatch) {
        let now_ms = self.clock.now_ms();
        let Some(map) = self.state.maps.iter_mut().find(|map| map.id == id) else {
            debug!("event=map_update module=store status=noop reason=not_found map_id={id}");
            return;
        };
        map.apply(patch, now_ms);
        debug!("event=map_update module=store status=ok map_id={id}");
        self.commit(ChangeSet::of(Slice::Maps));
    }

    /// Removes a map together with every node and edge carrying its id.
    pub fn delete_map(&mut self, id: MapId) {
        let before = self.state.maps.len();
        self.state.maps.retain(|map| map.id != id);
        if self.state.maps.len() == before {
            debug!("event=map_delete module=store status=noop reason=not_found map_id={id}");
            return;
        }

        let nodes_before = self.state.nodes.len();
        let edges_before = self.state.edges.len();
        self.state.nodes.retain(|node| node.map_id != id);
        self.state.edges.retain(|edge| edge.map_id != id);
        debug!(
            "event=map_delete module=store status=ok map_id={} cascaded_nodes={} cascaded_edges={}",
            id,
            nodes_before - self.state.nodes.len(),
            edges_before - self.state.edges.len()
        );
        self.commit(
            ChangeSet::of(Slice::Maps)
                .with(Slice::Nodes)
                .with(Slice::Edges),
        );
    }

    pub fn nodes(&self) -> &[Node] {
        &self.state.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.state.nodes.iter().find(|node| node.id == id)
    }

    pub fn nodes_in_map(&self, map_id: MapId) -> impl Iterator<Item = &Node> + '_ {
        self.state
            .nodes
            .iter()
            .filter(move |node| node.map_id == map_id)
    }

    /// Creates a node on an existing map.
    ///
    /// # Errors
    /// - `StoreError::MapNotFound` when `input.map_id` names no map.
    pub fn add_node(&mut self, input: NewNode) -> StoreResult<NodeId> {
        if self.map(input.map_id).is_none() {
            debug!(
                "event=node_add module=store status=rejected reason=map_not_found map_id={}",
                input.map_id
            );
            return Err(StoreError::MapNotFound(input.map_id));
        }
        let node = Node::create(input, self.clock.now_ms());
        let id = node.id;
        debug!(
            "event=node_add module=store status=ok node_id={} map_id={}",
            id, node.map_id
        );
        self.state.nodes.push(node);
        self.commit(ChangeSet::of(Slice::Nodes));
        Ok(id)
    }

    pub fn update_node(&mut self, id: NodeId, patch: NodePatch) {
        let now_ms = self.clock.now_ms();
        let Some(node) = self.state.nodes.iter_mut().find(|node| node.id == id) else {
            debug!("event=node_update module=store status=noop reason=not_found node_id={id}");
            return;
        };
        node.apply(patch, now_ms);
        debug!("event=node_update module=store status=ok node_id={id}");
        self.commit(ChangeSet::of(Slice::Nodes));
    }

    /// Removes a node and every edge touching it, in any map.
    pub fn delete_node(&mut self, id: NodeId) {
        let before = self.state.nodes.len();
        self.state.nodes.retain(|node| node.id != id);
        if self.state.nodes.len() == before {
            debug!("event=node_delete module=store status=noop reason=not_found node_id={id}");
            return;
        }

        let edges_before = self.state.edges.len();
        self.state.edges.retain(|edge| !edge.touches(id));
        let cascaded = edges_before - self.state.edges.len();
        debug!("event=node_delete module=store status=ok node_id={id} cascaded_edges={cascaded}");

        let mut changes = ChangeSet::of(Slice::Nodes);
        if cascaded > 0 {
            changes.insert(Slice::Edges);
        }
        self.commit(changes);
    }

    pub fn edges(&self) -> &[Edge] {
        &self.state.edges
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.state.edges.iter().find(|edge| edge.id == id)
    }

    pub fn edges_in_map(&self, map_id: MapId) -> impl Iterator<Item = &Edge> + '_ {
        self.state
            .edges
            .iter()
            .filter(move |edge| edge.map_id == map_id)
    }

    /// Connects two nodes of one map.
    ///
    /// # Errors
    /// - `StoreError::MapNotFound` when the edge's map does not exist.
    /// - `StoreError::NodeNotFound` when an endpoint does not exist.
    /// - `StoreError::EndpointOutsideMap` when an endpoint lives in another map.
    pub fn add_edge(&mut self, input: NewEdge) -> StoreResult<EdgeId> {
        let edge = Edge::create(input);
        if let Err(err) = self.check_edge(&edge) {
            debug!("event=edge_add module=store status=rejected error={err}");
            return Err(err);
        }
        let id = edge.id;
        self.state.edges.push(edge);
        debug!("event=edge_add module=store status=ok edge_id={id}");
        self.commit(ChangeSet::of(Slice::Edges));
        Ok(id)
    }

    /// Re-points an edge. Missing ids are a silent no-op; the patched edge
    /// must still satisfy the same checks as `add_edge`.
    pub fn update_edge(&mut self, id: EdgeId, patch: EdgePatch) -> StoreResult<()> {
        let Some(index) = self.state.edges.iter().position(|edge| edge.id == id) else {
            debug!("event=edge_update module=store status=noop reason=not_found edge_id={id}");
            return Ok(());
        };
        let patched = self.state.edges[index].patched(patch);
        if let Err(err) = self.check_edge(&patched) {
            debug!("event=edge_update module=store status=rejected edge_id={id} error={err}");
            return Err(err);
        }
        self.state.edges[index] = patched;
        debug!("event=edge_update module=store status=ok edge_id={id}");
        self.commit(ChangeSet::of(Slice::Edges));
        Ok(())
    }

    pub fn delete_edge(&mut self, id: EdgeId) {
        let before = self.state.edges.len();
        self.state.edges.retain(|edge| edge.id != id);
        if self.state.edges.len() == before {
            debug!("event=edge_delete module=store status=noop reason=not_found edge_id={id}");
            return;
        }
        debug!("event=edge_delete module=store status=ok edge_id={id}");
        self.commit(ChangeSet::of(Slice::Edges));
    }

    fn check_edge(&self, edge: &Edge) -> StoreResult<()> {
        if self.map(edge.map_id).is_none() {
            return Err(StoreError::MapNotFound(edge.map_id));
        }
        for node_id in [edge.source, edge.target] {
            let node = self.node(node_id).ok_or(StoreError::NodeNotFound(node_id))?;
            if node.map_id != edge.map_id {
                return Err(StoreError::EndpointOutsideMap {
                    node_id,
                    map_id: edge.map_id,
                });
            }
        }
        Ok(())
    }
}
