use smallvec::SmallVec;

use super::handle::Handle;

/// One level of a root-to-leaf route.
///
/// For internal levels `slot` is the child-entry index the descent took; for
/// the final (leaf) level it is a record slot.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PathFrame {
    pub(crate) node: Handle,
    pub(crate) slot: usize,
}

/// The route from the root to a located record.
///
/// Rebalancing rewrites frames in place while walking the path, and root
/// splits/collapses prepend or drop the top frame, so the stack is indexed
/// rather than popped.
pub(crate) struct RecordPath(SmallVec<[PathFrame; 16]>);

impl RecordPath {
    pub(crate) fn new() -> Self {
        Self(SmallVec::new())
    }

    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub(crate) fn frame(&self, level: usize) -> PathFrame {
        self.0[level]
    }

    #[inline]
    pub(crate) fn frame_mut(&mut self, level: usize) -> &mut PathFrame {
        &mut self.0[level]
    }

    /// Returns the leaf frame.
    #[inline]
    pub(crate) fn leaf_frame(&self) -> PathFrame {
        self.0[self.0.len() - 1]
    }

    pub(crate) fn append(&mut self, node: Handle, slot: usize) {
        self.0.push(PathFrame { node, slot });
    }

    /// Pushes a new root frame in front of the route after `increase_height`.
    pub(crate) fn prepend(&mut self, node: Handle, slot: usize) {
        self.0.insert(0, PathFrame { node, slot });
    }

    /// Drops the root frame after `decrease_height`.
    pub(crate) fn unprepend(&mut self) {
        self.0.remove(0);
    }
}
