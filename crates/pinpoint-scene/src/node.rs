//! Scene nodes
//!
//! Nodes are shared through [`NodeRef`] handles. Group-like nodes (group,
//! transform, overlay, draw style) own their children and forward every child
//! update to their own [`Signal`], so observing a subtree root is enough to
//! learn about any change below it.

use crate::signal::{Signal, Subscription};
use bitflags::bitflags;
use glam::{DAffine3, Vec3};
use pinpoint_core::{Color, NodeId, PinpointError, Result};
use std::cell::{Cell, Ref, RefCell, RefMut};
use std::fmt;
use std::rc::{Rc, Weak};

/// Shared handle to a scene node
pub type NodeRef = Rc<SceneNode>;

/// What happened to a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateAction {
    /// Node contents (vertices, transform, style) changed
    Modified,
    /// A child was attached
    ChildAdded(NodeId),
    /// A child was detached
    ChildRemoved(NodeId),
}

/// Change notification carried by [`SceneNode::sig_updated`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneUpdate {
    /// The node where the change originated
    pub source: NodeId,
    pub action: UpdateAction,
}

bitflags! {
    /// Polygon elements drawn by a [`NodeKind::PolygonDrawStyle`] node
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PolygonElements: u8 {
        const FACE = 1 << 0;
        const EDGE = 1 << 1;
        const VERTEX = 1 << 2;
    }
}

/// Triangle mesh geometry; only the vertex buffer matters for picking
#[derive(Debug, Default)]
pub struct Mesh {
    vertices: RefCell<Vec<Vec3>>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vec3>) -> Self {
        Self {
            vertices: RefCell::new(vertices),
        }
    }

    /// Object-local vertex positions
    pub fn vertices(&self) -> Ref<'_, Vec<Vec3>> {
        self.vertices.borrow()
    }

    pub fn vertices_mut(&self) -> RefMut<'_, Vec<Vec3>> {
        self.vertices.borrow_mut()
    }
}

/// Drawable leaf holding an optional mesh
#[derive(Debug, Default)]
pub struct Shape {
    mesh: RefCell<Option<Rc<Mesh>>>,
}

impl Shape {
    pub fn mesh(&self) -> Option<Rc<Mesh>> {
        self.mesh.borrow().clone()
    }

    pub fn set_mesh(&self, mesh: Option<Rc<Mesh>>) {
        *self.mesh.borrow_mut() = mesh;
    }
}

/// A cloud of rendered points with a uniform size and color
#[derive(Debug)]
pub struct PointSet {
    point_size: Cell<f32>,
    color: Cell<Color>,
    vertices: RefCell<Vec<Vec3>>,
}

impl PointSet {
    pub fn point_size(&self) -> f32 {
        self.point_size.get()
    }

    pub fn set_point_size(&self, size: f32) {
        self.point_size.set(size);
    }

    pub fn color(&self) -> Color {
        self.color.get()
    }

    pub fn set_color(&self, color: Color) {
        self.color.set(color);
    }

    pub fn vertices(&self) -> Ref<'_, Vec<Vec3>> {
        self.vertices.borrow()
    }

    pub fn vertices_mut(&self) -> RefMut<'_, Vec<Vec3>> {
        self.vertices.borrow_mut()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.borrow().is_empty()
    }

    pub fn len(&self) -> usize {
        self.vertices.borrow().len()
    }
}

struct ChildEntry {
    node: NodeRef,
    _forward: Subscription,
}

/// Ordered child list shared by every group-like node kind
#[derive(Default)]
pub struct Group {
    children: RefCell<Vec<ChildEntry>>,
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.children.borrow().iter().map(|c| c.node.id()))
            .finish()
    }
}

/// Node variants
#[derive(Debug)]
pub enum NodeKind {
    Group(Group),
    Transform { transform: Cell<DAffine3>, group: Group },
    Shape(Shape),
    PointSet(PointSet),
    /// Subtree drawn on top of the scene, unaffected by scene transforms
    Overlay(Group),
    /// Style wrapper controlling which polygon elements of its children are drawn
    PolygonDrawStyle {
        elements: Cell<PolygonElements>,
        group: Group,
    },
}

impl NodeKind {
    fn label(&self) -> &'static str {
        match self {
            NodeKind::Group(_) => "group",
            NodeKind::Transform { .. } => "transform",
            NodeKind::Shape(_) => "shape",
            NodeKind::PointSet(_) => "point set",
            NodeKind::Overlay(_) => "overlay",
            NodeKind::PolygonDrawStyle { .. } => "polygon draw style",
        }
    }
}

/// A node in the scene graph
pub struct SceneNode {
    id: NodeId,
    name: String,
    kind: NodeKind,
    sig_updated: Signal<SceneUpdate>,
}

impl fmt::Debug for SceneNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneNode")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

impl SceneNode {
    fn with_kind(name: impl Into<String>, kind: NodeKind) -> NodeRef {
        Rc::new(Self {
            id: NodeId::new(),
            name: name.into(),
            kind,
            sig_updated: Signal::new(),
        })
    }

    pub fn group(name: impl Into<String>) -> NodeRef {
        Self::with_kind(name, NodeKind::Group(Group::default()))
    }

    pub fn transform(name: impl Into<String>, transform: DAffine3) -> NodeRef {
        Self::with_kind(
            name,
            NodeKind::Transform {
                transform: Cell::new(transform),
                group: Group::default(),
            },
        )
    }

    pub fn shape(name: impl Into<String>, mesh: Option<Rc<Mesh>>) -> NodeRef {
        let shape = Shape::default();
        shape.set_mesh(mesh);
        Self::with_kind(name, NodeKind::Shape(shape))
    }

    pub fn point_set(name: impl Into<String>, point_size: f32, color: Color) -> NodeRef {
        Self::with_kind(
            name,
            NodeKind::PointSet(PointSet {
                point_size: Cell::new(point_size),
                color: Cell::new(color),
                vertices: RefCell::new(Vec::new()),
            }),
        )
    }

    pub fn overlay(name: impl Into<String>) -> NodeRef {
        Self::with_kind(name, NodeKind::Overlay(Group::default()))
    }

    pub fn polygon_draw_style(name: impl Into<String>, elements: PolygonElements) -> NodeRef {
        Self::with_kind(
            name,
            NodeKind::PolygonDrawStyle {
                elements: Cell::new(elements),
                group: Group::default(),
            },
        )
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn as_shape(&self) -> Option<&Shape> {
        match &self.kind {
            NodeKind::Shape(shape) => Some(shape),
            _ => None,
        }
    }

    pub fn as_point_set(&self) -> Option<&PointSet> {
        match &self.kind {
            NodeKind::PointSet(points) => Some(points),
            _ => None,
        }
    }

    /// Local transform of a transform node
    pub fn local_transform(&self) -> Option<DAffine3> {
        match &self.kind {
            NodeKind::Transform { transform, .. } => Some(transform.get()),
            _ => None,
        }
    }

    /// Replace the local transform; no-op for other kinds. Notifies on change.
    pub fn set_local_transform(&self, value: DAffine3) {
        if let NodeKind::Transform { transform, .. } = &self.kind {
            transform.set(value);
            self.notify_update();
        }
    }

    pub fn polygon_elements(&self) -> Option<PolygonElements> {
        match &self.kind {
            NodeKind::PolygonDrawStyle { elements, .. } => Some(elements.get()),
            _ => None,
        }
    }

    fn as_group(&self) -> Option<&Group> {
        match &self.kind {
            NodeKind::Group(group)
            | NodeKind::Overlay(group)
            | NodeKind::Transform { group, .. }
            | NodeKind::PolygonDrawStyle { group, .. } => Some(group),
            NodeKind::Shape(_) | NodeKind::PointSet(_) => None,
        }
    }

    fn require_group(&self) -> Result<&Group> {
        self.as_group().ok_or_else(|| PinpointError::NotAGroup {
            node: self.name.clone(),
            kind: self.kind.label().to_string(),
        })
    }

    pub fn num_children(&self) -> usize {
        self.as_group().map_or(0, |g| g.children.borrow().len())
    }

    pub fn contains_child(&self, child: &SceneNode) -> bool {
        self.as_group()
            .is_some_and(|g| g.children.borrow().iter().any(|c| c.node.id == child.id))
    }

    /// Append a child and start forwarding its updates.
    pub fn add_child(self: &Rc<Self>, child: NodeRef) -> Result<()> {
        let group = self.require_group()?;
        let parent: Weak<SceneNode> = Rc::downgrade(self);
        let forward = child.sig_updated.connect(move |update| {
            if let Some(parent) = parent.upgrade() {
                parent.sig_updated.emit(update);
            }
        });
        let child_id = child.id;
        group.children.borrow_mut().push(ChildEntry {
            node: child,
            _forward: forward,
        });
        self.emit(UpdateAction::ChildAdded(child_id));
        Ok(())
    }

    /// Add `child` unless it is already a direct child. Returns whether it was added.
    pub fn add_child_once(self: &Rc<Self>, child: NodeRef) -> Result<bool> {
        if self.require_group()?.children.borrow().iter().any(|c| c.node.id == child.id) {
            return Ok(false);
        }
        self.add_child(child)?;
        Ok(true)
    }

    /// Detach `child`. Returns whether it was a child.
    pub fn remove_child(&self, child: &SceneNode) -> bool {
        let Some(group) = self.as_group() else {
            return false;
        };
        let removed = {
            let mut children = group.children.borrow_mut();
            let before = children.len();
            children.retain(|c| c.node.id != child.id);
            before != children.len()
        };
        if removed {
            self.emit(UpdateAction::ChildRemoved(child.id));
        }
        removed
    }

    /// Replace all children with `child`
    pub fn set_single_child(self: &Rc<Self>, child: NodeRef) -> Result<()> {
        let group = self.require_group()?;
        let old: Vec<NodeId> = group.children.borrow_mut().drain(..).map(|c| c.node.id).collect();
        for id in old {
            self.emit(UpdateAction::ChildRemoved(id));
        }
        self.add_child(child)
    }

    /// Signal fired for changes to this node or anything below it
    pub fn sig_updated(&self) -> &Signal<SceneUpdate> {
        &self.sig_updated
    }

    /// Announce that this node's contents changed
    pub fn notify_update(&self) {
        self.emit(UpdateAction::Modified);
    }

    fn emit(&self, action: UpdateAction) {
        self.sig_updated.emit(&SceneUpdate {
            source: self.id,
            action,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter(node: &SceneNode) -> (Rc<Cell<usize>>, Subscription) {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let sub = node.sig_updated().connect(move |_| c.set(c.get() + 1));
        (count, sub)
    }

    #[test]
    fn test_add_child_once_is_idempotent() {
        let root = SceneNode::group("root");
        let child = SceneNode::group("child");

        assert!(root.add_child_once(child.clone()).unwrap());
        assert!(!root.add_child_once(child.clone()).unwrap());
        assert_eq!(root.num_children(), 1);
        assert!(root.contains_child(&child));
    }

    #[test]
    fn test_leaf_rejects_children() {
        let shape = SceneNode::shape("leaf", None);
        let err = shape.add_child(SceneNode::group("g")).unwrap_err();
        assert!(matches!(err, PinpointError::NotAGroup { .. }));
    }

    #[test]
    fn test_child_updates_forward_to_parent() {
        let root = SceneNode::overlay("overlay");
        let plot = SceneNode::point_set("plot", 10.0, Color::RED);
        root.add_child(plot.clone()).unwrap();

        let (count, _sub) = counter(&root);
        plot.notify_update();
        assert_eq!(count.get(), 1);

        assert!(root.remove_child(&plot));
        assert_eq!(count.get(), 2);

        plot.notify_update();
        assert_eq!(count.get(), 2, "detached child no longer forwards");
    }

    #[test]
    fn test_set_single_child_replaces() {
        let style = SceneNode::polygon_draw_style(
            "style",
            PolygonElements::FACE | PolygonElements::EDGE | PolygonElements::VERTEX,
        );
        let a = SceneNode::shape("a", None);
        let b = SceneNode::shape("b", None);
        style.set_single_child(a.clone()).unwrap();
        style.set_single_child(b.clone()).unwrap();

        assert!(!style.contains_child(&a));
        assert!(style.contains_child(&b));
        assert_eq!(style.polygon_elements(), Some(PolygonElements::all()));
    }

    #[test]
    fn test_point_set_buffer() {
        let plot = SceneNode::point_set("plot", 10.0, Color::YELLOW);
        let points = plot.as_point_set().unwrap();
        assert!(points.is_empty());
        points.vertices_mut().push(Vec3::ONE);
        assert_eq!(points.len(), 1);
        assert_eq!(points.color(), Color::YELLOW);
    }
}
