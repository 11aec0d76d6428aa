use nodemind_core::{
    apply_canvas_event, canvas_view, CanvasEdge, CanvasEvent, CanvasOutcome, ManualClock,
    MemorySlot, NewNode, Position, Store, StoreError, StoreOptions,
};
use std::sync::Arc;

fn setup() -> Store {
    Store::open(
        MemorySlot::new(),
        Arc::new(ManualClock::new(1_717_232_400_000)),
        StoreOptions::default(),
    )
}

#[test]
fn view_contains_only_the_requested_map() {
    let mut store = setup();
    let trip = store.add_map("Trip Plan");
    let other = store.add_map("Other");
    let flights = store
        .add_node(NewNode {
            content: "Book **early**, see [fares](https://example.com)".to_string(),
            is_markdown: true,
            emoji: Some("✈".to_string()),
            ..NewNode::new(trip, "Flights", Position::new(0.0, 0.0))
        })
        .unwrap();
    let hotel = store
        .add_node(NewNode::new(trip, "Hotel", Position::new(0.0, 100.0)))
        .unwrap();
    store
        .add_node(NewNode::new(other, "Elsewhere", Position::default()))
        .unwrap();
    let outcome = apply_canvas_event(
        &mut store,
        CanvasEvent::ConnectionDrawn {
            map_id: trip,
            source: flights,
            target: hotel,
        },
    )
    .unwrap();
    let CanvasOutcome::EdgeCreated(edge_id) = outcome else {
        panic!("expected an edge, got {outcome:?}");
    };

    let view = canvas_view(&store, trip);
    assert_eq!(view.nodes.len(), 2);
    assert_eq!(
        view.edges,
        vec![CanvasEdge {
            id: edge_id,
            source: flights,
            target: hotel
        }]
    );

    let card = view.nodes.iter().find(|node| node.id == flights).unwrap();
    assert_eq!(card.title, "Flights");
    assert_eq!(card.emoji.as_deref(), Some("✈"));
    assert_eq!(card.preview.as_deref(), Some("Book early , see fares"));

    let hotel_card = view.nodes.iter().find(|node| node.id == hotel).unwrap();
    assert_eq!(hotel_card.position, Position::new(0.0, 100.0));
    assert_eq!(hotel_card.preview, None);

    assert!(canvas_view(&store, uuid::Uuid::new_v4()).nodes.is_empty());
}

#[test]
fn drag_commit_moves_node_and_removal_cascades() {
    let mut store = setup();
    let map_id = store.add_map("m");
    let a = store
        .add_node(NewNode::new(map_id, "a", Position::default()))
        .unwrap();
    let b = store
        .add_node(NewNode::new(map_id, "b", Position::default()))
        .unwrap();
    apply_canvas_event(
        &mut store,
        CanvasEvent::ConnectionDrawn {
            map_id,
            source: a,
            target: b,
        },
    )
    .unwrap();

    let moved = apply_canvas_event(
        &mut store,
        CanvasEvent::NodeMoved {
            id: a,
            position: Position::new(42.0, -7.5),
        },
    )
    .unwrap();
    assert_eq!(moved, CanvasOutcome::Applied);
    assert_eq!(store.node(a).unwrap().position, Position::new(42.0, -7.5));

    apply_canvas_event(&mut store, CanvasEvent::NodeRemoved { id: b }).unwrap();
    let view = canvas_view(&store, map_id);
    assert_eq!(view.nodes.len(), 1);
    assert!(view.edges.is_empty());
}

#[test]
fn edge_removed_event_deletes_only_that_edge() {
    let mut store = setup();
    let map_id = store.add_map("m");
    let a = store
        .add_node(NewNode::new(map_id, "a", Position::default()))
        .unwrap();
    let b = store
        .add_node(NewNode::new(map_id, "b", Position::default()))
        .unwrap();
    let draw = CanvasEvent::ConnectionDrawn {
        map_id,
        source: a,
        target: b,
    };
    let first = apply_canvas_event(&mut store, draw).unwrap();
    apply_canvas_event(&mut store, draw).unwrap();
    assert_eq!(store.edges().len(), 2);

    let CanvasOutcome::EdgeCreated(first_id) = first else {
        panic!("expected an edge");
    };
    apply_canvas_event(&mut store, CanvasEvent::EdgeRemoved { id: first_id }).unwrap();
    assert_eq!(store.edges().len(), 1);
    assert_ne!(store.edges()[0].id, first_id);
}

#[test]
fn connection_across_maps_is_rejected() {
    let mut store = setup();
    let left = store.add_map("left");
    let right = store.add_map("right");
    let a = store
        .add_node(NewNode::new(left, "a", Position::default()))
        .unwrap();
    let b = store
        .add_node(NewNode::new(right, "b", Position::default()))
        .unwrap();

    let err = apply_canvas_event(
        &mut store,
        CanvasEvent::ConnectionDrawn {
            map_id: left,
            source: a,
            target: b,
        },
    )
    .unwrap_err();
    assert_eq!(
        err,
        StoreError::EndpointOutsideMap {
            node_id: b,
            map_id: left
        }
    );
}
