//! A DOM-like tree stored in a single vector.
//!
//! Nodes refer to each other by index. Detaching a node unlinks it from its
//! parent and siblings, but the node stays in the arena, unreachable from the
//! root.
//!
//! Based on <https://github.com/SimonSapin/rust-forest/blob/5783c8be8680b84c0438638bdee07d4e4aca40ac/arena-tree/lib.rs>.
//! MIT license (per Cargo.toml).

use std::fmt;
use std::ops::{Index, IndexMut};

/// Index of a node inside an [`Arena`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// The position of the node in its arena's storage.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Default, Clone, Copy, Debug)]
struct Links {
    parent: Option<NodeId>,
    previous_sibling: Option<NodeId>,
    next_sibling: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
}

/// A node inside a DOM-like tree.
#[derive(Clone)]
pub struct Node<T> {
    links: Links,

    /// The data held by the node.
    pub data: T,
}

/// A simple Debug implementation that prints the data only, without
/// following the links.
impl<T> fmt::Debug for Node<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        f.debug_struct("Node").field("data", &self.data).finish()
    }
}

/// Owner of every node of one tree.
#[derive(Clone, Debug)]
pub struct Arena<T> {
    nodes: Vec<Node<T>>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Arena { nodes: Vec::new() }
    }
}

impl<T> Index<NodeId> for Arena<T> {
    type Output = Node<T>;

    fn index(&self, id: NodeId) -> &Node<T> {
        &self.nodes[id.0]
    }
}

impl<T> IndexMut<NodeId> for Arena<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut Node<T> {
        &mut self.nodes[id.0]
    }
}

impl<T> Arena<T> {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new, detached node holding `data`.
    pub fn alloc(&mut self, data: T) -> NodeId {
        self.nodes.push(Node {
            links: Links::default(),
            data,
        });
        NodeId(self.nodes.len() - 1)
    }

    /// Number of nodes ever allocated, including detached ones.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether nothing was ever allocated.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Return the parent node, unless this node is a root or detached.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self[id].links.parent
    }

    /// Return the first child of this node, unless it has no child.
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self[id].links.first_child
    }

    /// Return the last child of this node, unless it has no child.
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self[id].links.last_child
    }

    /// Return the previous sibling of this node, unless it is a first child.
    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        self[id].links.previous_sibling
    }

    /// Return the next sibling of this node, unless it is a last child.
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self[id].links.next_sibling
    }

    /// Return an iterator of this node and its ancestors.
    ///
    /// Call `.next()` once on the iterator to skip the node itself.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_, T> {
        Ancestors(Some((self, id)))
    }

    /// Return an iterator of this node's children.
    pub fn children(&self, id: NodeId) -> Children<'_, T> {
        Children(self[id].links.first_child.map(|c| (self, c)))
    }

    /// Return an iterator of this node and its descendants, in tree order.
    ///
    /// Parent nodes appear before the descendants.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_, T> {
        Descendants(self.traverse(id))
    }

    /// Return an iterator of [`NodeEdge`]s for this node and its descendants,
    /// in tree order.
    pub fn traverse(&self, id: NodeId) -> Traverse<'_, T> {
        Traverse {
            arena: self,
            root: id,
            next: Some(NodeEdge::Start(id)),
        }
    }

    /// Detach a node from its parent and siblings. Children are not affected.
    pub fn detach(&mut self, id: NodeId) {
        let Links {
            parent,
            previous_sibling,
            next_sibling,
            ..
        } = self[id].links;

        if let Some(next_sibling) = next_sibling {
            self[next_sibling].links.previous_sibling = previous_sibling;
        } else if let Some(parent) = parent {
            self[parent].links.last_child = previous_sibling;
        }

        if let Some(previous_sibling) = previous_sibling {
            self[previous_sibling].links.next_sibling = next_sibling;
        } else if let Some(parent) = parent {
            self[parent].links.first_child = next_sibling;
        }

        let links = &mut self[id].links;
        links.parent = None;
        links.previous_sibling = None;
        links.next_sibling = None;
    }

    /// Detach every child of this node.
    pub fn detach_children(&mut self, id: NodeId) {
        while let Some(child) = self[id].links.first_child {
            self.detach(child);
        }
    }

    /// Append a new child to this node, after existing children.
    pub fn append(&mut self, id: NodeId, new_child: NodeId) {
        self.detach(new_child);

        self[new_child].links.parent = Some(id);
        if let Some(last_child) = self[id].links.last_child {
            debug_assert!(self[last_child].links.next_sibling.is_none());
            self[new_child].links.previous_sibling = Some(last_child);
            self[last_child].links.next_sibling = Some(new_child);
        } else {
            debug_assert!(self[id].links.first_child.is_none());
            self[id].links.first_child = Some(new_child);
        }
        self[id].links.last_child = Some(new_child);
    }

    /// Insert a new sibling before this node.
    pub fn insert_before(&mut self, id: NodeId, new_sibling: NodeId) {
        self.detach(new_sibling);

        let parent = self[id].links.parent;
        self[new_sibling].links.parent = parent;
        self[new_sibling].links.next_sibling = Some(id);
        if let Some(previous_sibling) = self[id].links.previous_sibling {
            debug_assert!(self[previous_sibling].links.next_sibling == Some(id));
            self[new_sibling].links.previous_sibling = Some(previous_sibling);
            self[previous_sibling].links.next_sibling = Some(new_sibling);
        } else if let Some(parent) = parent {
            debug_assert!(self[parent].links.first_child == Some(id));
            self[parent].links.first_child = Some(new_sibling);
        }
        self[id].links.previous_sibling = Some(new_sibling);
    }
}

macro_rules! axis_iterator {
    (#[$attr:meta] $name:ident: $next:ident) => {
        #[$attr]
        #[derive(Debug)]
        pub struct $name<'a, T>(Option<(&'a Arena<T>, NodeId)>);

        impl<'a, T> Iterator for $name<'a, T> {
            type Item = NodeId;

            fn next(&mut self) -> Option<NodeId> {
                let (arena, id) = self.0.take()?;
                self.0 = arena[id].links.$next.map(|r| (arena, r));
                Some(id)
            }
        }
    };
}

axis_iterator! {
    #[doc = "An iterator of the ancestors of a given node."]
    Ancestors: parent
}

axis_iterator! {
    #[doc = "An iterator of the children of a given node."]
    Children: next_sibling
}

/// An iterator of a given node and its descendants, in tree order.
#[derive(Debug)]
pub struct Descendants<'a, T: 'a>(Traverse<'a, T>);

impl<T> Iterator for Descendants<'_, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        loop {
            match self.0.next()? {
                NodeEdge::Start(node) => return Some(node),
                NodeEdge::End(_) => {}
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Indicator if the node is at a start or endpoint of the tree
pub enum NodeEdge<T> {
    /// Yielded before the node's descendants; an opening tag like `<div>`.
    Start(T),

    /// Yielded after the node's descendants; a closing tag like `</div>`.
    End(T),
}

/// An iterator of the start and end edges of a given node and its
/// descendants, in tree order.
#[derive(Debug)]
pub struct Traverse<'a, T: 'a> {
    arena: &'a Arena<T>,
    root: NodeId,
    next: Option<NodeEdge<NodeId>>,
}

impl<T> Iterator for Traverse<'_, T> {
    type Item = NodeEdge<NodeId>;

    fn next(&mut self) -> Option<NodeEdge<NodeId>> {
        let item = self.next.take()?;
        let links = &self.arena[match item {
            NodeEdge::Start(id) | NodeEdge::End(id) => id,
        }]
        .links;
        self.next = match item {
            NodeEdge::Start(id) => match links.first_child {
                Some(child) => Some(NodeEdge::Start(child)),
                None => Some(NodeEdge::End(id)),
            },
            NodeEdge::End(id) if id == self.root => None,
            NodeEdge::End(_) => match (links.next_sibling, links.parent) {
                (Some(sibling), _) => Some(NodeEdge::Start(sibling)),
                (None, Some(parent)) => Some(NodeEdge::End(parent)),
                (None, None) => None,
            },
        };
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Arena<&'static str>, NodeId, [NodeId; 3]) {
        let mut arena = Arena::new();
        let root = arena.alloc("root");
        let a = arena.alloc("a");
        let b = arena.alloc("b");
        let c = arena.alloc("c");
        arena.append(root, a);
        arena.append(root, c);
        arena.insert_before(c, b);
        (arena, root, [a, b, c])
    }

    fn names(arena: &Arena<&'static str>, ids: impl Iterator<Item = NodeId>) -> Vec<&'static str> {
        ids.map(|id| arena[id].data).collect()
    }

    #[test]
    fn insert_and_iterate() {
        let (arena, root, [a, _, c]) = sample();
        assert_eq!(names(&arena, arena.children(root)), ["a", "b", "c"]);
        assert_eq!(names(&arena, arena.descendants(root)), ["root", "a", "b", "c"]);
        assert_eq!(names(&arena, arena.ancestors(c)), ["c", "root"]);
        assert_eq!(arena.first_child(root), Some(a));
        assert_eq!(arena.last_child(root), Some(c));
    }

    #[test]
    fn detach_relinks_siblings() {
        let (mut arena, root, [a, b, c]) = sample();
        arena.detach(b);
        assert_eq!(names(&arena, arena.children(root)), ["a", "c"]);
        assert_eq!(arena.next_sibling(a), Some(c));
        assert_eq!(arena.previous_sibling(c), Some(a));
        assert_eq!(arena.parent(b), None);

        arena.detach_children(root);
        assert_eq!(arena.children(root).count(), 0);
        assert_eq!(arena.len(), 4);
    }

    #[test]
    fn traverse_edges() {
        let (mut arena, root, [a, ..]) = sample();
        let leaf = arena.alloc("leaf");
        arena.append(a, leaf);
        let edges = arena.traverse(a).collect::<Vec<_>>();
        assert_eq!(
            edges,
            [
                NodeEdge::Start(a),
                NodeEdge::Start(leaf),
                NodeEdge::End(leaf),
                NodeEdge::End(a)
            ]
        );
        assert_eq!(arena.traverse(root).count(), 10);
    }
}
