//! Property tests for tree capture and fragment splicing.

use std::collections::HashSet;

use proptest::prelude::*;
use spectrum_core::sim::{ClassSpec, SimulatedUi};
use spectrum_core::{FragmentHost, FragmentId, LifecycleState, ViewId};
use spectrum_tree::{
    BuildOptions, CompositeTree, FragmentNode, Handle, NodeStore, TrackedActivity, TreeMerger,
    ViewNode,
};

#[derive(Debug, Clone)]
struct Shape {
    /// Parent of view `i` is view `p % i` or the content container when `i == 0`.
    view_parents: Vec<usize>,
    /// `(host, hosted view)` per fragment; host `h` is the activity when
    /// `h % (i + 1) == i`, otherwise an earlier fragment.
    fragments: Vec<(usize, Option<usize>)>,
}

fn shape_strategy() -> impl Strategy<Value = Shape> {
    (
        prop::collection::vec(any::<usize>(), 1..40),
        prop::collection::vec((any::<usize>(), prop::option::of(any::<usize>())), 0..10),
    )
        .prop_map(|(view_parents, fragments)| Shape {
            view_parents,
            fragments,
        })
}

struct Built {
    ui: SimulatedUi,
    tracked: Vec<TrackedActivity>,
    views: Vec<ViewId>,
    fragments: Vec<FragmentId>,
}

fn build_ui(shape: &Shape) -> Built {
    let mut ui = SimulatedUi::new();
    let window = ui.add_activity(ClassSpec::kotlin("com.acme.MainActivity"));
    let mut views = Vec::new();
    for (i, p) in shape.view_parents.iter().enumerate() {
        let parent = if i == 0 { window.content } else { views[p % i] };
        views.push(ui.add_group(parent, ClassSpec::java("android.widget.FrameLayout")));
    }
    let mut fragments = Vec::new();
    for (i, (host, hosted)) in shape.fragments.iter().enumerate() {
        let pick = host % (i + 1);
        let host = if pick == i {
            FragmentHost::Activity(window.activity)
        } else {
            FragmentHost::Fragment(fragments[pick])
        };
        let f = ui.add_fragment(host, ClassSpec::kotlin("com.acme.PageFragment"), None);
        ui.set_fragment_view(f, hosted.map(|v| views[v % views.len()]));
        fragments.push(f);
    }
    Built {
        ui,
        tracked: vec![TrackedActivity {
            id: window.activity,
            state: LifecycleState::Resumed,
        }],
        views,
        fragments,
    }
}

#[derive(Default)]
struct Seen {
    views: Vec<ViewId>,
    fragments: Vec<FragmentId>,
}

fn walk(store: &NodeStore, tree: Handle<CompositeTree>) -> Seen {
    enum Item {
        View(Handle<ViewNode>),
        Fragment(Handle<FragmentNode>),
    }
    let mut seen = Seen::default();
    let mut stack = Vec::new();
    for act in &store.tree(tree).activities {
        let act = store.activity(*act);
        stack.extend(act.views.iter().copied().map(Item::View));
        stack.extend(act.fragments.iter().copied().map(Item::Fragment));
    }
    while let Some(item) = stack.pop() {
        match item {
            Item::View(h) => {
                let node = store.view(h);
                seen.views.extend(node.view);
                stack.extend(node.children.iter().copied().map(Item::View));
                stack.extend(node.fragments.iter().copied().map(Item::Fragment));
            }
            Item::Fragment(h) => {
                let node = store.fragment(h);
                seen.fragments.extend(node.fragment);
                stack.extend(node.children.iter().copied().map(Item::Fragment));
                stack.extend(node.view.map(Item::View));
            }
        }
    }
    seen
}

proptest! {
    #[test]
    fn every_element_appears_exactly_once(shape in shape_strategy()) {
        let built = build_ui(&shape);
        let mut store = NodeStore::new();
        let mut merger = TreeMerger::new();
        let tree = merger.build(&built.ui, &built.tracked, BuildOptions::default(), &mut store);
        let seen = walk(&store, tree);

        let unique_views: HashSet<_> = seen.views.iter().copied().collect();
        prop_assert_eq!(unique_views.len(), seen.views.len(), "a view node is reachable twice");
        prop_assert_eq!(seen.views.len(), built.views.len(), "a captured view went missing");

        let unique_frags: HashSet<_> = seen.fragments.iter().copied().collect();
        prop_assert_eq!(unique_frags.len(), seen.fragments.len(), "a fragment node is reachable twice");
        prop_assert_eq!(seen.fragments.len(), built.fragments.len(), "a fragment went missing");

        store.release_tree(tree);
        prop_assert_eq!(store.stats().live(), 0, "release left live records");
    }

    #[test]
    fn spliced_fragment_sits_under_hosted_views_parent(shape in shape_strategy()) {
        let built = build_ui(&shape);
        let mut store = NodeStore::new();
        let mut merger = TreeMerger::new();
        let tree = merger.build(&built.ui, &built.tracked, BuildOptions::default(), &mut store);

        let mut stack: Vec<Handle<ViewNode>> = store
            .tree(tree)
            .activities
            .iter()
            .flat_map(|a| store.activity(*a).views.clone())
            .collect();
        let mut spliced = 0usize;
        while let Some(h) = stack.pop() {
            let node = store.view(h);
            stack.extend(node.children.iter().copied());
            for f in &node.fragments {
                let frag = store.fragment(*f);
                let hosted = frag.view.expect("spliced fragment owns its hosted view");
                let hosted_id = store.view(hosted).view;
                prop_assert!(
                    !node.children.contains(&hosted),
                    "hosted view still listed under its former parent"
                );
                prop_assert!(hosted_id.is_some());
                stack.push(hosted);
                spliced += 1;
                let mut inner = frag.children.clone();
                while let Some(c) = inner.pop() {
                    let child = store.fragment(c);
                    inner.extend(child.children.iter().copied());
                    if let Some(v) = child.view {
                        stack.push(v);
                    }
                }
            }
        }
        prop_assert_eq!(spliced, merger.stats().spliced);
        store.release_tree(tree);
    }

    #[test]
    fn pool_reuse_keeps_allocation_flat(shape in shape_strategy()) {
        let built = build_ui(&shape);
        let mut store = NodeStore::new();
        let mut merger = TreeMerger::new();
        let tree = merger.build(&built.ui, &built.tracked, BuildOptions::default(), &mut store);
        store.release_tree(tree);
        let first = store.stats();
        let tree = merger.build(&built.ui, &built.tracked, BuildOptions::default(), &mut store);
        store.release_tree(tree);
        prop_assert_eq!(store.stats(), first, "second build allocated new records");
    }
}
