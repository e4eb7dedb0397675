//! # Wireframe Editor
//!
//! Core editing engine for a visual wireframe layout editor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ view layer: pointer events, forms, render   │
//! └─────────────────────────────────────────────┘
//!                     ↓ Command
//! ┌─────────────────────────────────────────────┐
//! │ session: validate → snapshot → execute      │
//! │  - post-effects in the same undo step       │
//! │  - commit hook drives re-rendering          │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ state: tree + locks + classes + selection   │
//! │  - drop resolver, style cascade             │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Snapshot undo**: every recorded command stores a deep copy of the
//!    state taken just before it; undo and redo swap whole states
//! 2. **Silent guards**: stale ids and locked targets are no-ops, not errors
//! 3. **Loud validation**: bad class names and malformed imports are
//!    reported and change nothing
//! 4. **Side tables**: locks and classes live beside the tree, keyed by id
//!    and name
//!
//! ## Usage
//!
//! ```rust
//! use wireframe_editor::{EditSession, NodeId, NodeKind, Point, Rect};
//!
//! let mut session = EditSession::new();
//! let root = NodeId::root();
//!
//! let row = session.create_node(&root, NodeKind::Container)?.unwrap();
//! let text = session.create_node(&row, NodeKind::Text)?.unwrap();
//!
//! // Drop a button on the right edge of the text
//! let rect = Rect::new(0.0, 0.0, 100.0, 40.0);
//! session.drop_at(&text, rect, Point::new(95.0, 20.0), Some(NodeKind::Button))?;
//!
//! let style = session.effective_style(&row).unwrap();
//! assert_eq!(style.get("flex-direction"), Some("row"));
//!
//! assert!(session.undo());
//! assert_eq!(session.state().tree.find(&row).unwrap().children.len(), 1);
//! # Ok::<(), wireframe_editor::EditorError>(())
//! ```

mod cascade;
mod classes;
mod commands;
mod config;
mod document;
mod drop;
mod errors;
mod history;
mod ids;
mod locks;
mod node;
mod post_effects;
mod session;
mod state;
mod style;
mod tree;

pub use cascade::effective_style;
pub use classes::{display_class_name, normalize_class_name, ClassRegistry, USER_CLASS_PREFIX};
pub use commands::{supports_prop, Command, MIN_RESIZE_HEIGHT, MIN_RESIZE_WIDTH};
pub use config::SessionConfig;
pub use document::{export_document, parse_document, validate_root};
pub use drop::{classify, plan_drop, Axis, DragSource, DropPlan, DropRequest, DropZone, Point, Rect};
pub use errors::{EditorError, MutationError};
pub use history::{History, HistoryEntry, DEFAULT_HISTORY_DEPTH};
pub use ids::IdGenerator;
pub use locks::LockSet;
pub use node::{ClassRefs, Node, NodeId, NodeKind, PropKey, Props, DEFAULT_IMAGE_SRC, ROOT_ID};
pub use post_effects::{PostEffect, PostEffectEngine};
pub use session::{Commit, CommitHook, EditSession, INITIAL_LABEL};
pub use state::EditorState;
pub use style::StyleMap;
pub use tree::{check_structure, walk, walk_node_mut, Tree, Visit, VisitorMut, Walk};
