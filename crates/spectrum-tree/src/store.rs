#![forbid(unsafe_code)]

//! One pool per record kind, plus whole-tree release.

use crate::node::{ActivityNode, CompositeTree, FragmentNode, ViewNode};
use crate::pool::{Handle, NodePool, PoolStats};

/// Occupancy of every pool in a [`NodeStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreStats {
    pub trees: PoolStats,
    pub activities: PoolStats,
    pub views: PoolStats,
    pub fragments: PoolStats,
}

impl StoreStats {
    /// Records currently owned by some tree.
    #[must_use]
    pub const fn live(&self) -> usize {
        self.trees.live + self.activities.live + self.views.live + self.fragments.live
    }
}

#[derive(Debug, Clone, Copy)]
enum Pending {
    Activity(Handle<ActivityNode>),
    View(Handle<ViewNode>),
    Fragment(Handle<FragmentNode>),
}

/// Owner of all tree records.
#[derive(Debug, Default)]
pub struct NodeStore {
    trees: NodePool<CompositeTree>,
    activities: NodePool<ActivityNode>,
    views: NodePool<ViewNode>,
    fragments: NodePool<FragmentNode>,
    pending: Vec<Pending>,
}

impl NodeStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire_tree(&mut self) -> Handle<CompositeTree> {
        self.trees.acquire()
    }

    pub fn acquire_activity(&mut self) -> Handle<ActivityNode> {
        self.activities.acquire()
    }

    pub fn acquire_view(&mut self) -> Handle<ViewNode> {
        self.views.acquire()
    }

    pub fn acquire_fragment(&mut self) -> Handle<FragmentNode> {
        self.fragments.acquire()
    }

    #[inline]
    pub fn tree(&self, h: Handle<CompositeTree>) -> &CompositeTree {
        self.trees.get(h)
    }

    #[inline]
    pub fn tree_mut(&mut self, h: Handle<CompositeTree>) -> &mut CompositeTree {
        self.trees.get_mut(h)
    }

    #[inline]
    pub fn activity(&self, h: Handle<ActivityNode>) -> &ActivityNode {
        self.activities.get(h)
    }

    #[inline]
    pub fn activity_mut(&mut self, h: Handle<ActivityNode>) -> &mut ActivityNode {
        self.activities.get_mut(h)
    }

    #[inline]
    pub fn view(&self, h: Handle<ViewNode>) -> &ViewNode {
        self.views.get(h)
    }

    #[inline]
    pub fn view_mut(&mut self, h: Handle<ViewNode>) -> &mut ViewNode {
        self.views.get_mut(h)
    }

    #[inline]
    pub fn fragment(&self, h: Handle<FragmentNode>) -> &FragmentNode {
        self.fragments.get(h)
    }

    #[inline]
    pub fn fragment_mut(&mut self, h: Handle<FragmentNode>) -> &mut FragmentNode {
        self.fragments.get_mut(h)
    }

    /// Return a tree and every record reachable from it to the pools.
    ///
    /// A spliced fragment releases its hosted view; that view is no longer
    /// listed among its former parent's children.
    pub fn release_tree(&mut self, tree: Handle<CompositeTree>) {
        let mut pending = std::mem::take(&mut self.pending);
        pending.clear();
        pending.extend(self.trees.get(tree).activities.iter().copied().map(Pending::Activity));
        self.trees.release(tree);

        while let Some(next) = pending.pop() {
            match next {
                Pending::Activity(h) => {
                    let node = self.activities.get(h);
                    pending.extend(node.views.iter().copied().map(Pending::View));
                    pending.extend(node.fragments.iter().copied().map(Pending::Fragment));
                    self.activities.release(h);
                }
                Pending::View(h) => {
                    let node = self.views.get(h);
                    pending.extend(node.children.iter().copied().map(Pending::View));
                    pending.extend(node.fragments.iter().copied().map(Pending::Fragment));
                    self.views.release(h);
                }
                Pending::Fragment(h) => {
                    let node = self.fragments.get(h);
                    pending.extend(node.children.iter().copied().map(Pending::Fragment));
                    pending.extend(node.view.map(Pending::View));
                    self.fragments.release(h);
                }
            }
        }
        self.pending = pending;
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            trees: self.trees.stats(),
            activities: self.activities.stats(),
            views: self.views.stats(),
            fragments: self.fragments.stats(),
        }
    }

    /// Drop all records, including free ones.
    pub fn clear(&mut self) {
        self.trees.clear();
        self.activities.clear();
        self.views.clear();
        self.fragments.clear();
        self.pending.clear();
    }
}
