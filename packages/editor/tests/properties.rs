//! Property tests: structural invariants hold and undo/redo stay inverse
//! over arbitrary gesture sequences.

use proptest::prelude::*;
use wireframe_editor::{
    check_structure, Command, DragSource, DropRequest, DropZone, EditSession, EditorState, Node,
    NodeId, NodeKind, SessionConfig,
};

#[derive(Debug, Clone)]
enum Gesture {
    Create { parent: usize, kind: NodeKind },
    Remove { node: usize },
    Move { node: usize, parent: usize },
    Drop { source: Option<usize>, target: usize, zone: DropZone, kind: NodeKind },
    Lock { node: usize },
    Unlock { node: usize },
    Style { node: usize, value: u8 },
    Undo,
    Redo,
}

fn kind() -> impl Strategy<Value = NodeKind> {
    prop_oneof![
        4 => Just(NodeKind::Container),
        1 => Just(NodeKind::Text),
        1 => Just(NodeKind::Button),
        1 => Just(NodeKind::Image),
        1 => Just(NodeKind::Link),
    ]
}

fn zone() -> impl Strategy<Value = DropZone> {
    prop_oneof![
        Just(DropZone::Left),
        Just(DropZone::Right),
        Just(DropZone::Top),
        Just(DropZone::Bottom),
        Just(DropZone::TopRight),
        Just(DropZone::BottomLeft),
        Just(DropZone::Center),
    ]
}

fn gesture() -> impl Strategy<Value = Gesture> {
    let idx = 0usize..32;
    prop_oneof![
        4 => (idx.clone(), kind()).prop_map(|(parent, kind)| Gesture::Create { parent, kind }),
        1 => idx.clone().prop_map(|node| Gesture::Remove { node }),
        2 => (idx.clone(), idx.clone()).prop_map(|(node, parent)| Gesture::Move { node, parent }),
        3 => (proptest::option::of(idx.clone()), idx.clone(), zone(), kind()).prop_map(
            |(source, target, zone, kind)| Gesture::Drop { source, target, zone, kind }
        ),
        1 => idx.clone().prop_map(|node| Gesture::Lock { node }),
        1 => idx.clone().prop_map(|node| Gesture::Unlock { node }),
        2 => (idx, any::<u8>()).prop_map(|(node, value)| Gesture::Style { node, value }),
        1 => Just(Gesture::Undo),
        1 => Just(Gesture::Redo),
    ]
}

/// Resolve an index against the current node list (pre-order)
fn pick(state: &EditorState, index: usize) -> NodeId {
    let ids: Vec<NodeId> = state.tree.walk().map(|v| v.node.id.clone()).collect();
    ids[index % ids.len()].clone()
}

fn command_for(state: &EditorState, gesture: &Gesture) -> Option<Command> {
    let command = match *gesture {
        Gesture::Create { parent, kind } => Command::InsertNode {
            parent_id: pick(state, parent),
            index: None,
            node: Node::new(format!("p-{}", state.tree.len() * 7 + parent), kind),
        },
        Gesture::Remove { node } => Command::RemoveNode {
            node_id: pick(state, node),
        },
        Gesture::Move { node, parent } => Command::MoveNode {
            node_id: pick(state, node),
            new_parent_id: pick(state, parent),
        },
        Gesture::Drop {
            source,
            target,
            zone,
            kind,
        } => {
            let source = match source {
                Some(node) => DragSource::Existing {
                    node_id: pick(state, node),
                },
                None => DragSource::Palette { kind },
            };
            Command::Drop(DropRequest::new(source, pick(state, target), zone))
        }
        Gesture::Lock { node } => Command::Lock {
            node_id: pick(state, node),
        },
        Gesture::Unlock { node } => Command::Unlock {
            node_id: pick(state, node),
        },
        Gesture::Style { node, value } => Command::SetStyle {
            node_id: pick(state, node),
            property: "order".to_string(),
            value: value.to_string(),
        },
        Gesture::Undo | Gesture::Redo => return None,
    };
    Some(command)
}

fn session() -> EditSession {
    EditSession::with_config(SessionConfig {
        id_seed: Some("g".to_string()),
        history_depth: 16,
        seed_history: true,
    })
}

proptest! {
    #[test]
    fn tree_stays_well_formed(gestures in proptest::collection::vec(gesture(), 1..60)) {
        let mut session = session();

        for gesture in &gestures {
            match gesture {
                Gesture::Undo => { session.undo(); }
                Gesture::Redo => { session.redo(); }
                other => {
                    if let Some(command) = command_for(session.state(), other) {
                        session.apply(command).unwrap();
                    }
                }
            }

            let tree = &session.state().tree;
            prop_assert!(tree.root().is_root());
            prop_assert_eq!(tree.root().kind, NodeKind::Container);
            prop_assert!(check_structure(tree.root()).is_ok());
            prop_assert!(session.history().undo_levels() <= 16);
        }
    }

    #[test]
    fn undo_redo_are_inverse(gestures in proptest::collection::vec(gesture(), 1..40)) {
        let mut session = session();

        for gesture in &gestures {
            let Some(command) = command_for(session.state(), gesture) else {
                continue;
            };
            let before = session.state().clone();
            let applied = session.apply(command).unwrap();
            let after = session.state().clone();

            if !applied {
                prop_assert_eq!(&before, &after);
                continue;
            }

            prop_assert!(session.undo());
            prop_assert_eq!(session.state(), &before);
            prop_assert!(session.redo());
            prop_assert_eq!(session.state(), &after);
            prop_assert!(!session.history().can_redo());
        }
    }

    #[test]
    fn new_command_discards_future(steps in 1usize..8) {
        let mut session = session();
        for _ in 0..steps {
            session.create_node(&NodeId::root(), NodeKind::Text).unwrap();
        }
        for _ in 0..steps {
            session.undo();
        }
        prop_assert_eq!(session.history().redo_levels(), steps);

        session.create_node(&NodeId::root(), NodeKind::Button).unwrap();
        prop_assert!(!session.history().can_redo());
        prop_assert!(!session.redo());
    }
}
