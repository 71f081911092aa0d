//! Minimal host world for pooled objects
//!
//! Nodes live in a generational slot map, so stale [`NodeHandle`]s can tell
//! that their node is gone even after its slot is reused.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use slotmap::{SlotMap, new_key_type};

use crate::orbit::PositionSource;
use crate::pool::{Activatable, Prototype};

new_key_type! {
    /// Generational key of a scene node
    pub struct NodeKey;
}

/// A positioned object that can be switched on and off
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub position: Vec2,
    pub active: bool,
}

/// Shared handle to a world of nodes. Clones refer to the same world.
#[derive(Debug, Clone)]
pub struct Scene {
    nodes: Rc<RefCell<SlotMap<NodeKey, Node>>>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            nodes: Rc::new(RefCell::new(SlotMap::with_key())),
        }
    }

    /// Create an active node
    pub fn spawn(&self, name: impl Into<String>, position: Vec2) -> NodeHandle {
        let key = self.nodes.borrow_mut().insert(Node {
            name: name.into(),
            position,
            active: true,
        });
        log::trace!("Spawned node {:?}", key);
        NodeHandle {
            scene: self.clone(),
            key,
        }
    }

    /// Remove a node. Returns false if it was already gone.
    pub fn destroy(&self, key: NodeKey) -> bool {
        self.nodes.borrow_mut().remove(key).is_some()
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.borrow().contains_key(key)
    }

    /// Nodes that exist, active or not
    pub fn live_count(&self) -> usize {
        self.nodes.borrow().len()
    }

    pub fn active_count(&self) -> usize {
        self.nodes.borrow().values().filter(|node| node.active).count()
    }

    pub fn position(&self, key: NodeKey) -> Option<Vec2> {
        self.nodes.borrow().get(key).map(|node| node.position)
    }

    pub fn set_position(&self, key: NodeKey, position: Vec2) -> bool {
        match self.nodes.borrow_mut().get_mut(key) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }

    pub fn is_active(&self, key: NodeKey) -> bool {
        self.nodes.borrow().get(key).is_some_and(|node| node.active)
    }

    pub fn set_active(&self, key: NodeKey, active: bool) -> bool {
        match self.nodes.borrow_mut().get_mut(key) {
            Some(node) => {
                node.active = active;
                true
            }
            None => false,
        }
    }

    pub fn name(&self, key: NodeKey) -> Option<String> {
        self.nodes.borrow().get(key).map(|node| node.name.clone())
    }

    fn same_world(&self, other: &Scene) -> bool {
        Rc::ptr_eq(&self.nodes, &other.nodes)
    }
}

/// Reference to one node of a [`Scene`]
#[derive(Debug, Clone)]
pub struct NodeHandle {
    scene: Scene,
    key: NodeKey,
}

impl NodeHandle {
    pub fn key(&self) -> NodeKey {
        self.key
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Current position, `None` once destroyed
    pub fn try_position(&self) -> Option<Vec2> {
        self.scene.position(self.key)
    }

    pub fn set_position(&self, position: Vec2) -> bool {
        self.scene.set_position(self.key, position)
    }

    pub fn name(&self) -> Option<String> {
        self.scene.name(self.key)
    }
}

impl PartialEq for NodeHandle {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.scene.same_world(&other.scene)
    }
}

impl Eq for NodeHandle {}

impl Activatable for NodeHandle {
    fn set_active(&mut self, active: bool) {
        self.scene.set_active(self.key, active);
    }

    fn is_active(&self) -> bool {
        self.scene.is_active(self.key)
    }

    fn destroy(&mut self) {
        if self.scene.destroy(self.key) {
            log::trace!("Destroyed node {:?}", self.key);
        }
    }

    fn is_alive(&self) -> bool {
        self.scene.contains(self.key)
    }
}

/// Destroyed nodes report the origin
impl PositionSource for NodeHandle {
    fn position(&self) -> Vec2 {
        self.try_position().unwrap_or(Vec2::ZERO)
    }
}

/// Prototype that instantiates named nodes into a scene
#[derive(Debug, Clone)]
pub struct NodeTemplate {
    pub scene: Scene,
    pub name: String,
    pub position: Vec2,
}

impl NodeTemplate {
    pub fn new(scene: &Scene, name: impl Into<String>, position: Vec2) -> Self {
        Self {
            scene: scene.clone(),
            name: name.into(),
            position,
        }
    }
}

impl Prototype for NodeTemplate {
    type Instance = NodeHandle;

    fn instantiate(&self) -> NodeHandle {
        self.scene.spawn(self.name.clone(), self.position)
    }
}
