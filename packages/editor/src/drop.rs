//! # Drop Resolver
//!
//! Turns a pointer position over a target's on-screen rectangle into a
//! tree mutation.
//!
//! ```text
//! ┌────┬──────────────┬────┐
//! │    │     Top      │    │   outer quarter of each axis = edge zone
//! ├────┼──────────────┼────┤
//! │Left│    Center    │Right│  edges insert next to the target and turn
//! ├────┼──────────────┼────┤   the parent into a flex row / column
//! │    │    Bottom    │    │
//! └────┴──────────────┴────┘
//! ```
//!
//! In a corner the vertical edge picks the axis (column) while the side is
//! "after" whenever the pointer is right or bottom. A top-right corner
//! stacks vertically but inserts after the target. After every edge
//! insertion all siblings are resized evenly along the axis.

use crate::errors::MutationError;
use crate::locks::LockSet;
use crate::node::{Node, NodeId, NodeKind};
use crate::tree::Tree;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// On-screen bounds of a node, supplied by the view layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DropZone {
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Center,
}

impl DropZone {
    pub fn is_edge(self) -> bool {
        self != DropZone::Center
    }

    pub fn axis(self) -> Option<Axis> {
        match self {
            DropZone::Left | DropZone::Right => Some(Axis::Row),
            DropZone::Top
            | DropZone::Bottom
            | DropZone::TopLeft
            | DropZone::TopRight
            | DropZone::BottomLeft
            | DropZone::BottomRight => Some(Axis::Column),
            DropZone::Center => None,
        }
    }

    /// Anything touching the right or bottom edge inserts after the target
    pub fn inserts_after(self) -> bool {
        matches!(
            self,
            DropZone::Right
                | DropZone::Bottom
                | DropZone::TopRight
                | DropZone::BottomLeft
                | DropZone::BottomRight
        )
    }
}

/// Flex axis of a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Row,
    Column,
}

impl Axis {
    pub fn flex_direction(self) -> &'static str {
        match self {
            Axis::Row => "row",
            Axis::Column => "column",
        }
    }
}

/// Classify a pointer position against a target's bounds.
///
/// Thresholds are strict, so a pointer exactly on a quarter line lands in
/// the center. Degenerate rectangles are all center.
pub fn classify(rect: Rect, pointer: Point) -> DropZone {
    if rect.width <= 0.0 || rect.height <= 0.0 {
        return DropZone::Center;
    }
    let rel_x = pointer.x - rect.left;
    let rel_y = pointer.y - rect.top;

    let left = rel_x < rect.width / 4.0;
    let right = rel_x > 3.0 * rect.width / 4.0;
    let top = rel_y < rect.height / 4.0;
    let bottom = rel_y > 3.0 * rect.height / 4.0;

    match (top, bottom, left, right) {
        (true, _, true, _) => DropZone::TopLeft,
        (true, _, _, true) => DropZone::TopRight,
        (true, _, _, _) => DropZone::Top,
        (_, true, true, _) => DropZone::BottomLeft,
        (_, true, _, true) => DropZone::BottomRight,
        (_, true, _, _) => DropZone::Bottom,
        (_, _, true, _) => DropZone::Left,
        (_, _, _, true) => DropZone::Right,
        _ => DropZone::Center,
    }
}

/// What is being dropped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum DragSource {
    /// A palette template: instantiate a new node of this kind
    Palette { kind: NodeKind },

    /// An existing node being moved
    Existing { node_id: NodeId },
}

/// A fully classified drop gesture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropRequest {
    #[serde(flatten)]
    pub source: DragSource,
    pub target: NodeId,
    pub zone: DropZone,
}

impl DropRequest {
    pub fn new(source: DragSource, target: impl Into<NodeId>, zone: DropZone) -> Self {
        Self {
            source,
            target: target.into(),
            zone,
        }
    }

    /// Classify `pointer` over `rect` and build the request
    pub fn at(source: DragSource, target: impl Into<NodeId>, rect: Rect, pointer: Point) -> Self {
        Self::new(source, target, classify(rect, pointer))
    }
}

/// Where a validated drop lands
#[derive(Debug, Clone, PartialEq)]
pub enum DropPlan {
    /// Insert next to `target` inside `parent`, switching `parent` to a
    /// flex container along the zone's axis
    Beside {
        parent: NodeId,
        target: NodeId,
        zone: DropZone,
    },

    /// Append as the last child of `parent`
    Append { parent: NodeId },
}

/// Check every guard and decide where the drop lands. Never mutates.
pub fn plan_drop(
    tree: &Tree,
    locks: &LockSet,
    request: &DropRequest,
) -> Result<DropPlan, MutationError> {
    let target = tree
        .find(&request.target)
        .ok_or_else(|| MutationError::NodeNotFound(request.target.clone()))?;

    if locks.is_locked(tree, &target.id) {
        return Err(MutationError::Locked(target.id.clone()));
    }

    if let DragSource::Existing { node_id } = &request.source {
        if node_id == &target.id {
            return Err(MutationError::SelfDrop);
        }
        if node_id.is_root() {
            return Err(MutationError::RootImmutable);
        }
        if !tree.contains(node_id) {
            return Err(MutationError::NodeNotFound(node_id.clone()));
        }
        if locks.is_locked(tree, node_id) {
            return Err(MutationError::Locked(node_id.clone()));
        }
        if tree.is_ancestor_or_self(node_id, &target.id) {
            return Err(MutationError::CycleDetected);
        }
    }

    if request.zone.is_edge() {
        // The root has no parent: fall through to a center drop
        if let Some(parent) = tree.find_parent(&target.id) {
            return Ok(DropPlan::Beside {
                parent: parent.id.clone(),
                target: target.id.clone(),
                zone: request.zone,
            });
        }
    }

    if !target.can_have_children() {
        return Err(MutationError::NotAContainer(target.id.clone()));
    }
    Ok(DropPlan::Append {
        parent: target.id.clone(),
    })
}

/// Make `container` a flex container along `axis`
pub fn apply_axis(container: &mut Node, axis: Axis) {
    let style = &mut container.props.style;
    style.set("display", "flex");
    style.set("flex-direction", axis.flex_direction());
}

/// Give every child an equal share of the axis and clear the cross size
pub fn redistribute(container: &mut Node, axis: Axis) {
    let count = container.children.len();
    if count == 0 {
        return;
    }
    let share = format!("{:.2}%", 100.0 / count as f64);
    let (main, cross) = match axis {
        Axis::Row => ("width", "height"),
        Axis::Column => ("height", "width"),
    };
    for child in &mut container.children {
        child.props.style.set(main, share.clone());
        child.props.style.clear(cross);
    }
}

/// Insert `node` next to `target` inside `parent` and rebalance the row or
/// column. `node` must already be detached from the tree.
pub fn insert_beside(
    tree: &mut Tree,
    parent_id: &NodeId,
    target_id: &NodeId,
    zone: DropZone,
    node: Node,
) -> Result<(), MutationError> {
    let axis = zone
        .axis()
        .ok_or_else(|| MutationError::InvalidStructure("center is not an edge".to_string()))?;
    let parent = tree
        .find_mut(parent_id)
        .ok_or_else(|| MutationError::ParentNotFound(parent_id.clone()))?;
    let index = parent
        .child_index(target_id)
        .ok_or_else(|| MutationError::NodeNotFound(target_id.clone()))?;

    apply_axis(parent, axis);
    let at = if zone.inserts_after() { index + 1 } else { index };
    parent.children.insert(at, node);
    redistribute(parent, axis);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOX: Rect = Rect {
        left: 100.0,
        top: 50.0,
        width: 200.0,
        height: 80.0,
    };

    #[test]
    fn test_classify_edges_and_center() {
        assert_eq!(classify(BOX, Point::new(110.0, 90.0)), DropZone::Left);
        assert_eq!(classify(BOX, Point::new(290.0, 90.0)), DropZone::Right);
        assert_eq!(classify(BOX, Point::new(200.0, 55.0)), DropZone::Top);
        assert_eq!(classify(BOX, Point::new(200.0, 125.0)), DropZone::Bottom);
        assert_eq!(classify(BOX, Point::new(200.0, 90.0)), DropZone::Center);
    }

    #[test]
    fn test_quarter_lines_favor_center() {
        // x = left + width/4, y = top + height/4
        assert_eq!(classify(BOX, Point::new(150.0, 90.0)), DropZone::Center);
        assert_eq!(classify(BOX, Point::new(250.0, 90.0)), DropZone::Center);
        assert_eq!(classify(BOX, Point::new(200.0, 70.0)), DropZone::Center);
        assert_eq!(classify(BOX, Point::new(200.0, 110.0)), DropZone::Center);
    }

    #[test]
    fn test_corners_resolve_vertically() {
        let corners = [
            (Point::new(101.0, 51.0), DropZone::TopLeft, false),
            (Point::new(299.0, 51.0), DropZone::TopRight, true),
            (Point::new(101.0, 129.0), DropZone::BottomLeft, true),
            (Point::new(299.0, 129.0), DropZone::BottomRight, true),
        ];
        for (pointer, zone, after) in corners {
            assert_eq!(classify(BOX, pointer), zone);
            assert_eq!(zone.axis(), Some(Axis::Column));
            assert_eq!(zone.inserts_after(), after);
        }
    }

    #[test]
    fn test_top_right_corner_inserts_after_in_column() {
        let parent = Node::new("p", NodeKind::Container)
            .with_child(Node::new("a", NodeKind::Text))
            .with_child(Node::new("b", NodeKind::Text));
        let mut tree = Tree::from_root(Node::root().with_child(parent));

        let zone = classify(Rect::new(0.0, 0.0, 100.0, 100.0), Point::new(95.0, 5.0));
        let moved = Node::new("m", NodeKind::Button);
        insert_beside(&mut tree, &NodeId::from("p"), &NodeId::from("a"), zone, moved).unwrap();

        let parent = tree.find(&NodeId::from("p")).unwrap();
        let order: Vec<&str> = parent.children.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(order, vec!["a", "m", "b"]);
        assert_eq!(parent.props.style.get("flex-direction"), Some("column"));
    }

    #[test]
    fn test_degenerate_rect_is_center() {
        let flat = Rect::new(0.0, 0.0, 0.0, 10.0);
        assert_eq!(classify(flat, Point::new(0.0, 0.0)), DropZone::Center);
    }

    #[test]
    fn test_redistribute_row_and_column() {
        let mut parent = Node::new("p", NodeKind::Container)
            .with_child(Node::new("a", NodeKind::Text).with_style("height:20px"))
            .with_child(Node::new("b", NodeKind::Text))
            .with_child(Node::new("c", NodeKind::Text));

        redistribute(&mut parent, Axis::Row);
        for child in &parent.children {
            assert_eq!(child.props.style.to_css(), "width:33.33%");
        }

        redistribute(&mut parent, Axis::Column);
        for child in &parent.children {
            assert_eq!(child.props.style.to_css(), "height:33.33%");
        }
    }

    #[test]
    fn test_request_serde_shape() {
        let request = DropRequest::new(
            DragSource::Palette {
                kind: NodeKind::Button,
            },
            "root",
            DropZone::Center,
        );
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["source"], "palette");
        assert_eq!(json["kind"], "button");
        assert_eq!(json["zone"], "center");
    }
}
