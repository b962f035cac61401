use core::fmt;
use core::iter::FusedIterator;

use crate::comparer::{Key, KeyComparer, NaturalOrder};
use crate::error::{MIN_MAX_DEGREE, TreeError};
use crate::raw::{Handle, RawBpTree};
use crate::walk::{self, NodeView, TreeVisitor};

/// An in-memory B+ tree mapping comparable keys to opaque values.
///
/// Every record lives in a leaf; internal nodes only route lookups through
/// separator keys. The leaves form a doubly-linked sibling chain in key
/// order, which is what lets [`search_forward`](BpTree::search_forward) and
/// [`search_backward`](BpTree::search_backward) step between records in O(1)
/// once the range ends are resolved.
///
/// The maximum degree, chosen at construction, caps the fan-out of every
/// node: a leaf holds at most `max_degree` records and an internal node at
/// most `max_degree` children. Point operations cost O(log n); iterating a
/// range of `k` records costs O(log n + k).
///
/// A tree is owned by one logical holder at a time. Shared references permit
/// lookups and iteration; any mutation requires exclusive access, so a live
/// iterator statically excludes writes to the tree it reads from.
///
/// # Examples
///
/// ```
/// use bptree::{BpTree, Key};
///
/// let mut inventory: BpTree<&str, u32> = BpTree::new(5)?;
///
/// inventory.add_record("hammer", 31);
/// inventory.add_record("anvil", 2);
/// inventory.add_record("tongs", 11);
///
/// let (previous, updated) = inventory.update_record(&"anvil", 3);
/// assert_eq!(previous, Some(2));
/// assert!(updated);
///
/// // Range search over an inclusive interval, in either direction.
/// let in_range: Vec<&str> = inventory
///     .search_forward(Key::Of(&"a"), Key::Of(&"iron"))
///     .map(|(&name, _)| name)
///     .collect();
/// assert_eq!(in_range, ["anvil", "hammer"]);
/// # Ok::<(), bptree::TreeError>(())
/// ```
pub struct BpTree<K, V, C = NaturalOrder> {
    raw: RawBpTree<K, V, C>,
}

impl<K, V, C> BpTree<K, V, C> {
    /// Creates an empty tree with the default comparer.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidMaxDegree`] if `max_degree` is below
    /// [`MIN_MAX_DEGREE`].
    pub fn new(max_degree: usize) -> Result<Self, TreeError>
    where
        C: Default,
    {
        Self::with_comparer(max_degree, C::default())
    }

    /// Creates an empty tree ordering keys through `comparer`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidMaxDegree`] if `max_degree` is below
    /// [`MIN_MAX_DEGREE`].
    pub fn with_comparer(max_degree: usize, comparer: C) -> Result<Self, TreeError> {
        if max_degree < MIN_MAX_DEGREE {
            return Err(TreeError::InvalidMaxDegree(max_degree));
        }

        Ok(Self {
            raw: RawBpTree::new(max_degree, comparer),
        })
    }

    /// Returns true if the tree holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the number of levels in the tree. A height of 1 means the
    /// root is a leaf, the only shape that may be empty.
    #[must_use]
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    /// Returns the maximum degree the tree was constructed with.
    #[must_use]
    pub fn max_degree(&self) -> usize {
        self.raw.max_degree()
    }

    /// Walks the tree read-only, handing the root to `visitor`.
    ///
    /// The visitor recurses through [`NodeView::child`] as it sees fit; its
    /// error aborts the traversal and is propagated verbatim.
    ///
    /// # Errors
    ///
    /// Whatever the visitor returns.
    pub fn walk<W: TreeVisitor<K, V>>(&self, visitor: &mut W) -> Result<(), W::Error> {
        visitor.visit(NodeView::root(self.raw.nodes(), self.raw.values(), self.raw.root()))
    }

    /// Dumps the tree as indented plain text, one record per line, for
    /// debugging. An empty tree produces no output at all.
    ///
    /// # Errors
    ///
    /// Propagates the writer's error.
    pub fn write_text<W: fmt::Write>(&self, writer: &mut W) -> fmt::Result
    where
        K: fmt::Display,
        V: fmt::Display,
    {
        self.walk(&mut walk::text_printer(writer))
    }

    /// Dumps the tree as a nested array literal: internal nodes as
    /// `[child,sep,child,…]`, leaves as `[k1,…,kn]`.
    ///
    /// # Errors
    ///
    /// Propagates the writer's error.
    pub fn write_array<W: fmt::Write>(&self, writer: &mut W) -> fmt::Result
    where
        K: fmt::Display,
    {
        self.walk(&mut walk::array_printer(writer))
    }
}

impl<K: Clone, V, C: KeyComparer<K>> BpTree<K, V, C> {
    /// Adds a record, keeping any existing one.
    ///
    /// Returns `(None, true)` after inserting; if the key is already present
    /// the tree is unchanged and the present value comes back as
    /// `(Some(value), false)`.
    pub fn add_record(&mut self, key: K, value: V) -> (Option<&V>, bool) {
        let (path, found) = self.raw.find_record(Key::Of(&key));

        if found {
            let frame = path.leaf_frame();
            let handle = self.raw.node(frame.node).as_leaf().records.get(frame.slot).value;
            return (Some(self.raw.value(handle)), false);
        }

        let value = self.raw.alloc_value(value);
        self.raw.insert_record(key, value, path);
        (None, true)
    }

    /// Replaces the value of an existing record.
    ///
    /// Returns `(Some(previous), true)` on success; if the key is absent the
    /// tree is unchanged and `(None, false)` comes back.
    pub fn update_record(&mut self, key: &K, value: V) -> (Option<V>, bool) {
        let (path, found) = self.raw.find_record(Key::Of(key));

        if !found {
            return (None, false);
        }

        let frame = path.leaf_frame();
        let handle = self.raw.node(frame.node).as_leaf().records.get(frame.slot).value;
        (Some(core::mem::replace(self.raw.value_mut(handle), value)), true)
    }

    /// Adds a record or replaces the value of the existing one.
    ///
    /// Returns `(None, true)` after inserting, `(Some(previous), false)`
    /// after updating.
    pub fn add_or_update_record(&mut self, key: K, value: V) -> (Option<V>, bool) {
        let (path, found) = self.raw.find_record(Key::Of(&key));

        if found {
            let frame = path.leaf_frame();
            let handle = self.raw.node(frame.node).as_leaf().records.get(frame.slot).value;
            return (Some(core::mem::replace(self.raw.value_mut(handle), value)), false);
        }

        let value = self.raw.alloc_value(value);
        self.raw.insert_record(key, value, path);
        (None, true)
    }

    /// Deletes the record with the given key.
    ///
    /// Returns `(Some(value), true)` with the removed value, or
    /// `(None, false)` if the key was absent.
    pub fn delete_record(&mut self, key: &K) -> (Option<V>, bool) {
        let (path, found) = self.raw.find_record(Key::Of(key));

        if !found {
            return (None, false);
        }

        let handle = self.raw.remove_record(path);
        (Some(self.raw.take_value(handle)), true)
    }

    /// Looks up the record with the given key.
    ///
    /// Returns `(Some(value), true)` if present, `(None, false)` otherwise.
    #[must_use]
    pub fn has_record(&self, key: &K) -> (Option<&V>, bool) {
        let (path, found) = self.raw.find_record(Key::Of(key));

        if !found {
            return (None, false);
        }

        let frame = path.leaf_frame();
        let handle = self.raw.node(frame.node).as_leaf().records.get(frame.slot).value;
        (Some(self.raw.value(handle)), true)
    }

    /// Searches for records with keys in `[min_key, max_key]` and returns an
    /// iterator over them in ascending key order.
    ///
    /// [`Key::Min`] and [`Key::Max`] bound the range at the tree's extremes.
    /// An interval that covers no record yields an iterator that is already
    /// at its end; so does `min_key > max_key`.
    #[must_use]
    pub fn search_forward(&self, min_key: Key<&K>, max_key: Key<&K>) -> ForwardIter<'_, K, V, C> {
        match self.raw.find_range(min_key, max_key) {
            Some(ends) => ForwardIter {
                cursor: RangeCursor::over(&self.raw, ends.lo_leaf, ends.lo_slot, ends.hi_leaf, ends.hi_slot),
            },
            None => ForwardIter {
                cursor: RangeCursor::exhausted(&self.raw),
            },
        }
    }

    /// Searches for records with keys in `[min_key, max_key]` and returns an
    /// iterator over them in descending key order.
    #[must_use]
    pub fn search_backward(&self, min_key: Key<&K>, max_key: Key<&K>) -> BackwardIter<'_, K, V, C> {
        match self.raw.find_range(min_key, max_key) {
            Some(ends) => BackwardIter {
                cursor: RangeCursor::over(&self.raw, ends.hi_leaf, ends.hi_slot, ends.lo_leaf, ends.lo_slot),
            },
            None => BackwardIter {
                cursor: RangeCursor::exhausted(&self.raw),
            },
        }
    }
}

impl<K, V, C> fmt::Debug for BpTree<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BpTree")
            .field("max_degree", &self.raw.max_degree())
            .field("height", &self.raw.height())
            .finish_non_exhaustive()
    }
}

/// The shared state of both range iterators: the current position, the stop
/// position, and whether iteration has run out.
struct RangeCursor<'a, K, V, C> {
    tree: &'a RawBpTree<K, V, C>,
    leaf: Handle,
    slot: usize,
    stop_leaf: Handle,
    stop_slot: usize,
    at_end: bool,
}

impl<'a, K, V, C> RangeCursor<'a, K, V, C> {
    fn over(tree: &'a RawBpTree<K, V, C>, leaf: Handle, slot: usize, stop_leaf: Handle, stop_slot: usize) -> Self {
        Self {
            tree,
            leaf,
            slot,
            stop_leaf,
            stop_slot,
            at_end: false,
        }
    }

    fn exhausted(tree: &'a RawBpTree<K, V, C>) -> Self {
        Self {
            tree,
            leaf: tree.head_leaf(),
            slot: 0,
            stop_leaf: tree.head_leaf(),
            stop_slot: 0,
            at_end: true,
        }
    }

    fn record(&self) -> Result<(&'a K, &'a V), TreeError> {
        if self.at_end {
            return Err(TreeError::IterationExhausted);
        }

        let record = self.tree.node(self.leaf).as_leaf().records.get(self.slot);
        Ok((&record.key, self.tree.value(record.value)))
    }

    /// Marks the cursor exhausted if it sits on the stop position; returns
    /// true if stepping should continue.
    fn leave_or_stop(&mut self) -> bool {
        if self.at_end {
            return false;
        }

        if self.leaf == self.stop_leaf && self.slot == self.stop_slot {
            self.at_end = true;
            return false;
        }

        true
    }
}

/// An iterator over a searched record range in ascending key order.
///
/// Created by [`BpTree::search_forward`]. Besides implementing [`Iterator`],
/// it exposes the explicit cursor protocol
/// ([`is_at_end`](ForwardIter::is_at_end) /
/// [`record`](ForwardIter::record) / [`advance`](ForwardIter::advance)).
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct ForwardIter<'a, K, V, C> {
    cursor: RangeCursor<'a, K, V, C>,
}

impl<'a, K, V, C> ForwardIter<'a, K, V, C> {
    /// Returns true once the iteration has no more records.
    pub fn is_at_end(&self) -> bool {
        self.cursor.at_end
    }

    /// Returns the current record.
    ///
    /// # Errors
    ///
    /// [`TreeError::IterationExhausted`] if the iteration is at its end.
    pub fn record(&self) -> Result<(&'a K, &'a V), TreeError> {
        self.cursor.record()
    }

    /// Advances to the next record in ascending order. Advancing an
    /// exhausted iterator is a no-op.
    pub fn advance(&mut self) {
        if !self.cursor.leave_or_stop() {
            return;
        }

        let leaf = self.cursor.tree.node(self.cursor.leaf).as_leaf();

        if self.cursor.slot < leaf.records.len() - 1 {
            self.cursor.slot += 1;
        } else {
            self.cursor.leaf = leaf.next.expect("`ForwardIter::advance()` - ran past the tail leaf!");
            self.cursor.slot = 0;
        }
    }
}

impl<'a, K, V, C> Iterator for ForwardIter<'a, K, V, C> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.cursor.record().ok()?;
        self.advance();
        Some(item)
    }
}

impl<K, V, C> FusedIterator for ForwardIter<'_, K, V, C> {}

/// An iterator over a searched record range in descending key order.
///
/// Created by [`BpTree::search_backward`]; the cursor protocol mirrors
/// [`ForwardIter`].
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct BackwardIter<'a, K, V, C> {
    cursor: RangeCursor<'a, K, V, C>,
}

impl<'a, K, V, C> BackwardIter<'a, K, V, C> {
    /// Returns true once the iteration has no more records.
    pub fn is_at_end(&self) -> bool {
        self.cursor.at_end
    }

    /// Returns the current record.
    ///
    /// # Errors
    ///
    /// [`TreeError::IterationExhausted`] if the iteration is at its end.
    pub fn record(&self) -> Result<(&'a K, &'a V), TreeError> {
        self.cursor.record()
    }

    /// Advances to the next record in descending order. Advancing an
    /// exhausted iterator is a no-op.
    pub fn advance(&mut self) {
        if !self.cursor.leave_or_stop() {
            return;
        }

        if self.cursor.slot >= 1 {
            self.cursor.slot -= 1;
        } else {
            let leaf = self.cursor.tree.node(self.cursor.leaf).as_leaf();
            self.cursor.leaf = leaf.prev.expect("`BackwardIter::advance()` - ran past the head leaf!");
            self.cursor.slot = self.cursor.tree.node(self.cursor.leaf).as_leaf().records.len() - 1;
        }
    }
}

impl<'a, K, V, C> Iterator for BackwardIter<'a, K, V, C> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.cursor.record().ok()?;
        self.advance();
        Some(item)
    }
}

impl<K, V, C> FusedIterator for BackwardIter<'_, K, V, C> {}
