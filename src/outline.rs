use indexmap::IndexMap;
use std::fmt;

/// A single node of the canonical outline tree.
///
/// Every parser produces this shape and every generator consumes it. A node
/// carries nothing but its children; its name lives in the parent [`Branch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A terminal, childless node.
    Leaf,
    /// A node with named, ordered children.
    Branch(Branch),
}

impl Node {
    /// Checks if this node is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf)
    }

    /// Returns the children of this node if it is a branch.
    pub fn as_branch(&self) -> Option<&Branch> {
        match self {
            Node::Leaf => None,
            Node::Branch(branch) => Some(branch),
        }
    }
}

/// An insertion-ordered mapping from child name to child node.
///
/// Leaves and branches share one namespace per branch, so a name maps to
/// exactly one child.
#[derive(Debug, Clone, Default)]
pub struct Branch {
    children: IndexMap<String, Node>,
}

impl Branch {
    /// Creates a new, empty `Branch`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a named child.
    ///
    /// If a child with the same name already exists it is replaced in place
    /// (keeping its original position) and the displaced node is returned.
    ///
    /// # Arguments
    ///
    /// * `name` - The display name of the child.
    /// * `node` - The child node.
    pub fn insert(&mut self, name: impl Into<String>, node: Node) -> Option<Node> {
        self.children.insert(name.into(), node)
    }

    /// Looks up a child by name.
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.children.get(name)
    }

    /// Iterates over `(name, child)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.children.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Counts all descendants of this branch (not including itself).
    pub fn node_count(&self) -> usize {
        self.children
            .values()
            .map(|node| 1 + node.as_branch().map_or(0, Branch::node_count))
            .sum()
    }
}

// IndexMap equality ignores order; outline equality must not.
impl PartialEq for Branch {
    fn eq(&self, other: &Self) -> bool {
        self.children.len() == other.children.len()
            && self.children.iter().eq(other.children.iter())
    }
}

impl Eq for Branch {}

/// The canonical tree produced by one parser run.
///
/// An outline always has exactly one root branch, possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outline {
    /// The root branch. Its own name is never emitted.
    pub root: Branch,
}

impl Outline {
    /// Creates a new, empty `Outline`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing branch as the root of an outline.
    pub fn from_root(root: Branch) -> Self {
        Outline { root }
    }

    /// Counts every node of the tree except the root.
    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    /// Returns every node in pre-order together with its depth (top-level nodes are at depth 1).
    pub fn walk(&self) -> Vec<(usize, &str, &Node)> {
        let mut out = Vec::with_capacity(self.node_count());
        collect_pre_order(&self.root, 1, &mut out);
        out
    }
}

fn collect_pre_order<'a>(branch: &'a Branch, depth: usize, out: &mut Vec<(usize, &'a str, &'a Node)>) {
    for (name, node) in branch.iter() {
        out.push((depth, name, node));
        if let Node::Branch(children) = node {
            collect_pre_order(children, depth + 1, out);
        }
    }
}

/// Renders the textual dump: one line per node, two spaces per level,
/// branch names suffixed with `/`.
impl fmt::Display for Outline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (depth, name, node) in self.walk() {
            let indent = "  ".repeat(depth - 1);
            match node {
                Node::Leaf => writeln!(f, "{indent}{name}")?,
                Node::Branch(_) => writeln!(f, "{indent}{name}/")?,
            }
        }
        Ok(())
    }
}
