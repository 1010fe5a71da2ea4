use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use log::trace;

use crate::config::TerminatorPlacement;
use crate::frequency::FrequencyTable;
use crate::symbol::Symbol;


#[derive(Debug, Clone)]
pub enum Node {

    Internal { weight: u64, left: Box<Node>, right: Box<Node> },
    Leaf { weight: u64, symbol: Symbol },

}

impl Node {

    pub const fn leaf(symbol: Symbol, weight: u64) -> Self {
        Node::Leaf { weight, symbol }
    }


    /// Joins two subtrees under a new node weighing as much as both
    pub fn merge(left: Node, right: Node) -> Self {
        Node::Internal {
            weight: left.weight() + right.weight(),
            left: Box::new(left),
            right: Box::new(right)
        }
    }


    pub const fn weight(&self) -> u64 {
        match self {
            Node::Internal { weight, .. } |
            Node::Leaf { weight, .. }
                => *weight
        }
    }


    pub const fn symbol(&self) -> Option<Symbol> {
        match self {
            Node::Leaf { symbol, .. } => Some(*symbol),
            Node::Internal { .. } => None
        }
    }


    pub const fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }


    fn leaf_count(&self) -> usize {
        match self {
            Node::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
            Node::Leaf { .. } => 1
        }
    }


    fn depth_of(&self, target: Symbol, depth: usize) -> Option<usize> {
        match self {
            Node::Internal { left, right, .. } => {
                left.depth_of(target, depth + 1)
                    .or_else(|| right.depth_of(target, depth + 1))
            },
            Node::Leaf { symbol, .. } => (*symbol == target).then_some(depth)
        }
    }


    /// Structural equality ignoring weights
    pub fn same_shape(&self, other: &Node) -> bool {
        match (self, other) {
            (
                Node::Internal { left: l1, right: r1, .. },
                Node::Internal { left: l2, right: r2, .. }
            ) => l1.same_shape(l2) && r1.same_shape(r2),

            (Node::Leaf { symbol: a, .. }, Node::Leaf { symbol: b, .. }) => a == b,

            _ => false
        }
    }

}


/// Node waiting in the merge queue. Lighter nodes come out first, and
/// among equal weights the one queued first
#[derive(Debug)]
struct Queued {

    weight: u64,
    sequence: usize,
    node: Node

}

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Queued {}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Queued {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.weight, self.sequence).cmp(&(other.weight, other.sequence))
    }
}


#[derive(Debug, Default)]
struct MergeQueue {

    heap: BinaryHeap<Reverse<Queued>>,
    next_sequence: usize

}

impl MergeQueue {

    fn push(&mut self, node: Node) {

        self.heap.push(Reverse(Queued {
            weight: node.weight(),
            sequence: self.next_sequence,
            node
        }));

        self.next_sequence += 1;
    }


    fn pop(&mut self) -> Option<Node> {
        self.heap.pop().map(|Reverse(queued)| queued.node)
    }


    fn len(&self) -> usize {
        self.heap.len()
    }

}


/// Prefix-code tree. Every leaf holds a distinct symbol and every internal
/// node has exactly two children
#[derive(Debug, Clone)]
pub struct HuffmanTree {

    root: Node

}

impl HuffmanTree {

    /// Builds the tree by repeatedly merging the two lightest nodes.
    ///
    /// Leaves are queued terminator first, then bytes in ascending order.
    /// The node popped first becomes the left child.
    /// A table holding the terminator alone is padded with a zero-weight
    /// leaf for byte `0x00`, so the terminator still gets a one-bit code
    pub fn build(table: &FrequencyTable, placement: TerminatorPlacement) -> Self {

        let paired = match placement {
            TerminatorPlacement::Merged => None,
            TerminatorPlacement::BesideMostFrequent => table.most_frequent().map(Symbol::Byte)
        };

        let mut queue = MergeQueue::default();

        for (symbol, weight) in table.iter() {

            if symbol.is_terminator() && paired.is_some() {
                continue;
            }

            if Some(symbol) == paired {
                queue.push(Node::merge(
                    Node::leaf(symbol, weight),
                    Node::leaf(Symbol::Terminator, 0)
                ));
            } else {
                queue.push(Node::leaf(symbol, weight));
            }
        }

        while queue.len() > 1 {

            // The loop condition guarantees both pops succeed
            if let (Some(first), Some(second)) = (queue.pop(), queue.pop()) {
                queue.push(Node::merge(first, second));
            }
        }

        let root = match queue.pop() {

            Some(Node::Leaf { weight, symbol }) => {
                let filler = match symbol {
                    Symbol::Terminator => Symbol::Byte(0),
                    Symbol::Byte(_) => Symbol::Terminator
                };
                Node::merge(Node::leaf(symbol, weight), Node::leaf(filler, 0))
            },

            Some(root) => root,

            // Unreachable with a terminator in every table, kept total anyway
            None => Node::merge(Node::leaf(Symbol::Terminator, 0), Node::leaf(Symbol::Byte(0), 0)),
        };

        let tree = Self { root };

        trace!(
            "Built tree over {} leaves, weight {}, terminator at depth {:?}",
            tree.leaf_count(), tree.root.weight(), tree.depth_of(Symbol::Terminator)
        );

        tree
    }


    /// Wraps an already shaped tree, as read back from a header
    pub(crate) const fn from_root(root: Node) -> Self {
        Self { root }
    }


    pub const fn root(&self) -> &Node {
        &self.root
    }


    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }


    /// Length of the path from the root to the leaf of `symbol`
    pub fn depth_of(&self, symbol: Symbol) -> Option<usize> {
        self.root.depth_of(symbol, 0)
    }


    pub fn same_shape(&self, other: &HuffmanTree) -> bool {
        self.root.same_shape(&other.root)
    }

}
