//! Read-only tree traversal.
//!
//! [`BpTree::walk`](crate::BpTree::walk) hands a [`NodeView`] of the root to
//! a [`TreeVisitor`]; the visitor descends through [`NodeView::child`] at its
//! own pace. Views expose keys in the order they are physically stored and
//! cannot mutate the tree. The built-in text and array dumpers are both
//! ordinary visitors.

use alloc::format;
use alloc::string::String;
use core::fmt::{self, Display, Write};

use crate::raw::{Arena, Handle, Node};

/// A read-only window onto one tree node.
///
/// For a leaf, `key_count` is the record count and every key has a value.
/// For an internal node, `key_count` is the child count minus one: the keys
/// are the separators, and the first child entry carries no separator of its
/// own.
pub struct NodeView<'a, K, V> {
    nodes: &'a Arena<Node<K>>,
    values: &'a Arena<V>,
    node: Handle,
}

impl<'a, K, V> NodeView<'a, K, V> {
    pub(crate) fn root(nodes: &'a Arena<Node<K>>, values: &'a Arena<V>, node: Handle) -> Self {
        Self { nodes, values, node }
    }

    /// Returns true if this node is a leaf.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self.nodes.get(self.node), Node::Leaf(_))
    }

    /// Returns the number of keys stored in this node.
    #[must_use]
    pub fn key_count(&self) -> usize {
        match self.nodes.get(self.node) {
            Node::Leaf(leaf) => leaf.records.len(),
            Node::Internal(internal) => internal.entries.len() - 1,
        }
    }

    /// Returns the number of children of this node; zero for a leaf.
    #[must_use]
    pub fn child_count(&self) -> usize {
        match self.nodes.get(self.node) {
            Node::Leaf(_) => 0,
            Node::Internal(internal) => internal.entries.len(),
        }
    }

    /// Returns the key at `index`, in physical storage order.
    ///
    /// # Panics
    ///
    /// Panics if `index >= key_count()`.
    #[must_use]
    pub fn key(&self, index: usize) -> &'a K {
        match self.nodes.get(self.node) {
            Node::Leaf(leaf) => &leaf.records.get(index).key,
            // Separator keys start one past the dummy entry.
            Node::Internal(internal) => internal
                .entries
                .get(index + 1)
                .key
                .as_ref()
                .expect("`NodeView::key()` - dummy separator at slot >= 1!"),
        }
    }

    /// Returns the value at `index`, or `None` on an internal node.
    ///
    /// # Panics
    ///
    /// Panics if this is a leaf and `index >= key_count()`.
    #[must_use]
    pub fn value(&self, index: usize) -> Option<&'a V> {
        match self.nodes.get(self.node) {
            Node::Leaf(leaf) => Some(self.values.get(leaf.records.get(index).value)),
            Node::Internal(_) => None,
        }
    }

    /// Returns a view of the child at `index`, or `None` on a leaf.
    ///
    /// # Panics
    ///
    /// Panics if this is an internal node and `index >= child_count()`.
    #[must_use]
    pub fn child(&self, index: usize) -> Option<NodeView<'a, K, V>> {
        match self.nodes.get(self.node) {
            Node::Leaf(_) => None,
            Node::Internal(internal) => Some(NodeView {
                nodes: self.nodes,
                values: self.values,
                node: internal.entries.get(index).child,
            }),
        }
    }
}

/// A visitor over tree nodes, driven by [`BpTree::walk`](crate::BpTree::walk).
///
/// The walk calls [`visit`](TreeVisitor::visit) once with the root; the
/// visitor recurses into children itself. Returning an error aborts the
/// traversal and the error reaches the `walk` caller unchanged. The tree
/// must not be mutated while a walk is in progress, which holds by
/// construction since the walk borrows the tree shared.
///
/// ```
/// use bptree::{BpTree, NodeView, TreeVisitor};
///
/// struct LeafCounter(usize);
///
/// impl<K, V> TreeVisitor<K, V> for LeafCounter {
///     type Error = core::convert::Infallible;
///
///     fn visit(&mut self, node: NodeView<'_, K, V>) -> Result<(), Self::Error> {
///         if node.is_leaf() {
///             self.0 += 1;
///         }
///         for index in 0..node.child_count() {
///             self.visit(node.child(index).unwrap())?;
///         }
///         Ok(())
///     }
/// }
///
/// let mut tree: BpTree<u32, u32> = BpTree::new(4)?;
/// for k in 0..32 {
///     tree.add_record(k, k);
/// }
///
/// let mut counter = LeafCounter(0);
/// tree.walk(&mut counter)?;
/// assert!(counter.0 > 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait TreeVisitor<K, V> {
    /// The error the visitor may abort with.
    type Error;

    /// Visits one node.
    ///
    /// # Errors
    ///
    /// Implementation-defined; aborts the traversal.
    fn visit(&mut self, node: NodeView<'_, K, V>) -> Result<(), Self::Error>;
}

/// The plain-text dumper behind `BpTree::write_text`.
pub(crate) struct TextPrinter<'w, W> {
    writer: &'w mut W,
    prefix: String,
    new_line: String,
}

pub(crate) fn text_printer<W: Write>(writer: &mut W) -> TextPrinter<'_, W> {
    TextPrinter {
        writer,
        prefix: String::new(),
        new_line: String::from("\n"),
    }
}

impl<K: Display, V: Display, W: Write> TreeVisitor<K, V> for TextPrinter<'_, W> {
    type Error = fmt::Error;

    fn visit(&mut self, node: NodeView<'_, K, V>) -> fmt::Result {
        if node.is_leaf() {
            let n = node.key_count();

            for i in 0..n {
                let key = node.key(i);
                let value = node.value(i).expect("`TextPrinter::visit()` - leaf record without a value!");

                if i == 0 {
                    if n == 1 {
                        write!(self.writer, "{}──● {key}={value}", self.prefix)?;
                    } else {
                        write!(self.writer, "{}┬─● {key}={value}", self.prefix)?;
                    }
                } else if i == n - 1 {
                    write!(self.writer, "{}└─● {key}={value}", self.new_line)?;
                } else {
                    write!(self.writer, "{}├─● {key}={value}", self.new_line)?;
                }
            }
        } else {
            let prefix = core::mem::take(&mut self.prefix);
            let new_line = core::mem::take(&mut self.new_line);

            self.prefix = format!("{prefix}┬─");
            self.new_line = format!("{new_line}│ ");
            self.visit(node.child(0).expect("`TextPrinter::visit()` - internal node without children!"))?;

            let n = node.key_count();

            for i in 0..n {
                write!(self.writer, "{new_line}├─● {}", node.key(i))?;

                if i == n - 1 {
                    self.prefix = format!("{new_line}└─");
                    self.new_line = format!("{new_line}  ");
                } else {
                    self.prefix = format!("{new_line}├─");
                    self.new_line = format!("{new_line}│ ");
                }

                self.visit(node.child(i + 1).expect("`TextPrinter::visit()` - separator without a child!"))?;
            }

            self.prefix = prefix;
            self.new_line = new_line;
        }

        Ok(())
    }
}

/// The array-literal dumper behind `BpTree::write_array`.
pub(crate) struct ArrayPrinter<'w, W> {
    writer: &'w mut W,
}

pub(crate) fn array_printer<W: Write>(writer: &mut W) -> ArrayPrinter<'_, W> {
    ArrayPrinter { writer }
}

impl<K: Display, V, W: Write> TreeVisitor<K, V> for ArrayPrinter<'_, W> {
    type Error = fmt::Error;

    fn visit(&mut self, node: NodeView<'_, K, V>) -> fmt::Result {
        self.writer.write_char('[')?;

        let n = node.key_count();

        if node.is_leaf() {
            for i in 0..n {
                if i > 0 {
                    self.writer.write_char(',')?;
                }

                write!(self.writer, "{}", node.key(i))?;
            }
        } else {
            self.visit(node.child(0).expect("`ArrayPrinter::visit()` - internal node without children!"))?;

            for i in 0..n {
                write!(self.writer, ",{},", node.key(i))?;
                self.visit(node.child(i + 1).expect("`ArrayPrinter::visit()` - separator without a child!"))?;
            }
        }

        self.writer.write_char(']')
    }
}
