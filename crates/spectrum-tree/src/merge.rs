#![forbid(unsafe_code)]

//! Building the composite tree from a live UI graph.
//!
//! A build runs in three passes per tracked activity:
//!
//! 1. the fragment forest is captured from the activity's fragment manager,
//!    pre-order, children under their parent fragment;
//! 2. when the view hierarchy is requested, every child of the content
//!    container is captured recursively and indexed by view identity;
//! 3. fragments are spliced into the view tree: a fragment whose hosted view
//!    has a captured parent is moved under that parent, and its hosted view
//!    moves under the fragment.
//!
//! All passes walk with explicit stacks so deep hierarchies cannot exhaust
//! the call stack.

use std::collections::HashMap;

use spectrum_core::graph::UiGraph;
use spectrum_core::{ActivityId, FragmentHost, FragmentId, LifecycleState, NodeRef, ViewId, ViewParent, Visibility};

use crate::node::{CompositeTree, FragmentKind, FragmentNode, Placement, ViewNode};
use crate::pool::Handle;
use crate::store::NodeStore;

/// Which decorations and sections a build captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Capture the view hierarchy at all.
    pub show_hierarchy: bool,
    /// Prefix class links with their package.
    pub append_package_names: bool,
    /// Capture declared identifier names.
    pub append_element_id: bool,
    /// Capture on-screen placement.
    pub append_element_location: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            show_hierarchy: true,
            append_package_names: false,
            append_element_id: true,
            append_element_location: false,
        }
    }
}

/// An activity as seen by the tracker at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackedActivity {
    pub id: ActivityId,
    pub state: LifecycleState,
}

/// Counters of the most recent build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildStats {
    pub activities: usize,
    pub views: usize,
    pub fragments: usize,
    pub spliced: usize,
}

#[derive(Debug, Clone, Copy)]
enum Owner {
    Roots,
    Fragment(Handle<FragmentNode>),
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    owner: Owner,
    cursor: usize,
}

/// Reusable tree builder.
///
/// Scratch buffers survive between builds; only the produced tree lives in
/// the [`NodeStore`].
#[derive(Debug, Default)]
pub struct TreeMerger {
    index: HashMap<ViewId, Handle<ViewNode>>,
    roots: Vec<Handle<FragmentNode>>,
    frames: Vec<Frame>,
    view_stack: Vec<(ViewId, Handle<ViewNode>)>,
    fragment_stack: Vec<(FragmentId, Option<Handle<FragmentNode>>)>,
    warnings: Vec<String>,
    stats: BuildStats,
}

impl TreeMerger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Irregularities met during the last build, in encounter order.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }

    pub fn stats(&self) -> BuildStats {
        self.stats
    }

    /// Capture every tracked activity that still resolves into a new tree.
    ///
    /// Activities whose type can no longer be resolved are skipped.
    pub fn build<G: UiGraph + ?Sized>(
        &mut self,
        graph: &G,
        tracked: &[TrackedActivity],
        options: BuildOptions,
        store: &mut NodeStore,
    ) -> Handle<CompositeTree> {
        let span = spectrum_core::debug_span!("tree_build", tracked = tracked.len());
        let _guard = span.enter();
        self.warnings.clear();
        self.stats = BuildStats::default();
        let tree = store.acquire_tree();

        for entry in tracked {
            let Some(info) = graph.type_info(NodeRef::Activity(entry.id)) else {
                spectrum_core::trace!(activity = entry.id.get(), "activity no longer resolves");
                continue;
            };
            let node = store.acquire_activity();
            {
                let record = store.activity_mut(node);
                record.activity = Some(entry.id);
                record.state = Some(entry.state);
                info.write_link(&mut record.name, options.append_package_names);
            }
            self.stats.activities += 1;

            self.roots.clear();
            if graph.hosts_fragments(entry.id) {
                self.capture_fragments(graph, entry.id, options, store);
            }

            if options.show_hierarchy
                && let Some(content) = graph.content_container(entry.id)
            {
                self.index.clear();
                for i in 0..graph.child_count(content) {
                    if let Some(child) = graph.child_at(content, i) {
                        let root = self.capture_views(graph, child, options, store);
                        store.activity_mut(node).views.push(root);
                    }
                }
                self.splice(graph, store);
            }

            store.activity_mut(node).fragments.extend(self.roots.drain(..));
            store.tree_mut(tree).activities.push(node);
        }

        spectrum_core::debug!(
            activities = self.stats.activities,
            views = self.stats.views,
            fragments = self.stats.fragments,
            spliced = self.stats.spliced,
            "composite tree built"
        );
        tree
    }

    fn capture_fragments<G: UiGraph + ?Sized>(
        &mut self,
        graph: &G,
        activity: ActivityId,
        options: BuildOptions,
        store: &mut NodeStore,
    ) {
        let mut stack = std::mem::take(&mut self.fragment_stack);
        stack.clear();
        push_fragments(graph, FragmentHost::Activity(activity), None, &mut stack);

        while let Some((fragment, parent)) = stack.pop() {
            let node = store.acquire_fragment();
            fill_fragment(graph, fragment, options, store.fragment_mut(node));
            self.stats.fragments += 1;
            match parent {
                Some(parent) => store.fragment_mut(parent).children.push(node),
                None => self.roots.push(node),
            }
            push_fragments(graph, FragmentHost::Fragment(fragment), Some(node), &mut stack);
        }
        self.fragment_stack = stack;
    }

    fn capture_views<G: UiGraph + ?Sized>(
        &mut self,
        graph: &G,
        root: ViewId,
        options: BuildOptions,
        store: &mut NodeStore,
    ) -> Handle<ViewNode> {
        let root_node = self.capture_view(graph, root, options, store);
        let mut stack = std::mem::take(&mut self.view_stack);
        stack.clear();
        push_children(graph, root, root_node, store, &mut stack);

        while let Some((view, parent)) = stack.pop() {
            let node = self.capture_view(graph, view, options, store);
            store.view_mut(parent).children.push(node);
            push_children(graph, view, node, store, &mut stack);
        }
        self.view_stack = stack;
        root_node
    }

    fn capture_view<G: UiGraph + ?Sized>(
        &mut self,
        graph: &G,
        view: ViewId,
        options: BuildOptions,
        store: &mut NodeStore,
    ) -> Handle<ViewNode> {
        let node = store.acquire_view();
        fill_view(graph, view, options, store.view_mut(node), &mut self.warnings);
        self.index.insert(view, node);
        self.stats.views += 1;
        node
    }

    /// Move fragments under the captured parents of their hosted views.
    ///
    /// Walks the fragment forest pre-order. A spliced fragment leaves its
    /// list, so the cursor only advances past fragments that stay.
    fn splice<G: UiGraph + ?Sized>(&mut self, graph: &G, store: &mut NodeStore) {
        self.frames.clear();
        self.frames.push(Frame {
            owner: Owner::Roots,
            cursor: 0,
        });

        while let Some(&Frame { owner, cursor }) = self.frames.last() {
            let current = match owner {
                Owner::Roots => self.roots.get(cursor).copied(),
                Owner::Fragment(h) => store.fragment(h).children.get(cursor).copied(),
            };
            let Some(current) = current else {
                self.frames.pop();
                continue;
            };

            if splice_one(graph, &self.index, store, current) {
                self.stats.spliced += 1;
                match owner {
                    Owner::Roots => {
                        self.roots.remove(cursor);
                    }
                    Owner::Fragment(h) => {
                        store.fragment_mut(h).children.remove(cursor);
                    }
                }
            } else if let Some(top) = self.frames.last_mut() {
                top.cursor += 1;
            }

            self.frames.push(Frame {
                owner: Owner::Fragment(current),
                cursor: 0,
            });
        }
    }
}

fn push_fragments<G: UiGraph + ?Sized>(
    graph: &G,
    host: FragmentHost,
    parent: Option<Handle<FragmentNode>>,
    stack: &mut Vec<(FragmentId, Option<Handle<FragmentNode>>)>,
) {
    for i in (0..graph.fragment_count(host)).rev() {
        if let Some(fragment) = graph.fragment_at(host, i) {
            stack.push((fragment, parent));
        }
    }
}

fn push_children<G: UiGraph + ?Sized>(
    graph: &G,
    view: ViewId,
    node: Handle<ViewNode>,
    store: &NodeStore,
    stack: &mut Vec<(ViewId, Handle<ViewNode>)>,
) {
    if !store.view(node).group {
        return;
    }
    for i in (0..graph.child_count(view)).rev() {
        if let Some(child) = graph.child_at(view, i) {
            stack.push((child, node));
        }
    }
}

fn fill_fragment<G: UiGraph + ?Sized>(
    graph: &G,
    fragment: FragmentId,
    options: BuildOptions,
    node: &mut FragmentNode,
) {
    node.fragment = Some(fragment);
    if let Some(info) = graph.type_info(NodeRef::Fragment(fragment)) {
        info.write_link(&mut node.name, options.append_package_names);
    }
    node.tag = graph.fragment_tag(fragment).map(str::to_owned);
    node.kind = if graph.is_dialog_fragment(fragment) {
        FragmentKind::Dialog
    } else if graph.is_fragment_in_layout(fragment) {
        FragmentKind::InLayout
    } else {
        FragmentKind::OutOfLayout
    };
}

fn fill_view<G: UiGraph + ?Sized>(
    graph: &G,
    view: ViewId,
    options: BuildOptions,
    node: &mut ViewNode,
    warnings: &mut Vec<String>,
) {
    node.view = Some(view);
    node.group = graph.is_view_group(view);
    node.visibility = graph.visibility(view);
    if let Some(info) = graph.type_info(NodeRef::View(view)) {
        info.write_link(&mut node.name, options.append_package_names);
    }

    if options.append_element_id {
        match graph.id_name(view) {
            Ok(name) => node.id_name = name,
            Err(err) => {
                spectrum_core::warn!(view = view.get(), %err, "identifier lookup failed");
                warnings.push(format!(
                    "Failed to obtain view id name for {}: {err}. Possibly id was manually generated.",
                    node.name
                ));
            }
        }
    }

    if options.append_element_location {
        node.placement = Some(match graph.view_parent(view) {
            None => Placement::OutOfLayout,
            Some(_) if node.visibility == Visibility::Gone => Placement::Gone,
            Some(_) => Placement::OnScreen(graph.global_visible_rect(view).unwrap_or_default()),
        });
    }
}

/// Splice one fragment if its hosted view's parent was captured.
///
/// The hosted view's node must still be a child of that parent; otherwise
/// the fragment stays where it is.
fn splice_one<G: UiGraph + ?Sized>(
    graph: &G,
    index: &HashMap<ViewId, Handle<ViewNode>>,
    store: &mut NodeStore,
    fragment: Handle<FragmentNode>,
) -> bool {
    let Some(id) = store.fragment(fragment).fragment else {
        return false;
    };
    let Some(hosted) = graph.fragment_view(id) else {
        return false;
    };
    let Some(ViewParent::View(parent)) = graph.view_parent(hosted) else {
        return false;
    };
    let (Some(&parent_node), Some(&hosted_node)) = (index.get(&parent), index.get(&hosted)) else {
        return false;
    };

    let parent_record = store.view_mut(parent_node);
    let Some(position) = parent_record.children.iter().position(|c| *c == hosted_node) else {
        return false;
    };
    parent_record.children.remove(position);
    parent_record.fragments.push(fragment);
    store.fragment_mut(fragment).view = Some(hosted_node);
    spectrum_core::trace!(fragment = id.get(), parent = parent.get(), "fragment spliced");
    true
}
