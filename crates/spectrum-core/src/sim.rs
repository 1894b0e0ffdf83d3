#![forbid(unsafe_code)]

//! In-memory UI graph.
//!
//! [`SimulatedUi`] stands in for a live toolkit: tests and the demo build
//! windows, view trees, and fragment managers with it and hand it to the
//! report engine as a [`UiGraph`].
//!
//! ```
//! use spectrum_core::graph::UiGraph;
//! use spectrum_core::identity::FragmentHost;
//! use spectrum_core::sim::{ClassSpec, SimulatedUi};
//!
//! let mut ui = SimulatedUi::new();
//! let window = ui.add_activity(ClassSpec::kotlin("com.acme.MainActivity"));
//! let container = ui.add_group(window.content, ClassSpec::java("android.widget.FrameLayout"));
//! let detail = ui.add_fragment(FragmentHost::Activity(window.activity), ClassSpec::kotlin("com.acme.DetailFragment"), Some("detail"));
//! let root = ui.add_group(container, ClassSpec::java("android.widget.LinearLayout"));
//! ui.set_fragment_view(detail, Some(root));
//!
//! assert_eq!(ui.child_count(window.content), 1);
//! assert_eq!(ui.fragment_tag(detail), Some("detail"));
//! ```

use std::collections::HashMap;

use crate::geometry::Rect;
use crate::graph::{LookupError, UiGraph, ViewParent, Visibility};
use crate::identity::{
    ActivityId, FragmentHost, FragmentId, NodeRef, SourceLanguage, TypeInfo, ViewId,
};
use crate::lifecycle::LifecycleState;

/// Implementing type of a simulated element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSpec {
    package: Option<String>,
    name: String,
    language: SourceLanguage,
}

impl ClassSpec {
    /// Parse a qualified name (`pkg.Name`) written in the given language.
    #[must_use]
    pub fn new(qualified: &str, language: SourceLanguage) -> Self {
        let (package, name) = match qualified.rsplit_once('.') {
            Some((package, name)) if !package.is_empty() => (Some(package.to_owned()), name),
            _ => (None, qualified),
        };
        Self {
            package,
            name: name.to_owned(),
            language,
        }
    }

    /// A Java type.
    #[must_use]
    pub fn java(qualified: &str) -> Self {
        Self::new(qualified, SourceLanguage::Java)
    }

    /// A Kotlin type.
    #[must_use]
    pub fn kotlin(qualified: &str) -> Self {
        Self::new(qualified, SourceLanguage::Kotlin)
    }

    /// Borrow as a [`TypeInfo`].
    #[must_use]
    pub fn info(&self) -> TypeInfo<'_> {
        TypeInfo {
            package: self.package.as_deref(),
            name: &self.name,
            language: self.language,
        }
    }
}

/// Identities created for a new simulated window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimWindow {
    /// The activity.
    pub activity: ActivityId,
    /// Its content container (a view group).
    pub content: ViewId,
}

#[derive(Debug)]
struct SimActivity {
    class: ClassSpec,
    state: Option<LifecycleState>,
    hosts_fragments: bool,
    content: ViewId,
    fragments: Vec<FragmentId>,
}

#[derive(Debug)]
struct SimView {
    class: ClassSpec,
    group: bool,
    children: Vec<ViewId>,
    parent: Option<ViewParent>,
    visibility: Visibility,
    id: Option<i32>,
    rect: Option<Rect>,
}

#[derive(Debug)]
struct SimFragment {
    class: ClassSpec,
    tag: Option<String>,
    dialog: bool,
    view: Option<ViewId>,
    children: Vec<FragmentId>,
    host: FragmentHost,
}

/// A mutable in-memory UI object graph.
#[derive(Debug, Default)]
pub struct SimulatedUi {
    next_id: u64,
    activities: HashMap<ActivityId, SimActivity>,
    views: HashMap<ViewId, SimView>,
    fragments: HashMap<FragmentId, SimFragment>,
    resources: HashMap<i32, String>,
}

impl SimulatedUi {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn insert_view(&mut self, class: ClassSpec, group: bool, parent: Option<ViewParent>) -> ViewId {
        let id = ViewId(self.next());
        self.views.insert(
            id,
            SimView {
                class,
                group,
                children: Vec::new(),
                parent,
                visibility: Visibility::Visible,
                id: None,
                rect: None,
            },
        );
        if let Some(ViewParent::View(parent)) = parent
            && let Some(parent) = self.views.get_mut(&parent)
        {
            parent.children.push(id);
        }
        id
    }

    fn insert_activity(&mut self, class: ClassSpec, lifecycle: bool) -> SimWindow {
        let activity = ActivityId(self.next());
        let content = self.insert_view(
            ClassSpec::java("androidx.appcompat.widget.ContentFrameLayout"),
            true,
            Some(ViewParent::Window),
        );
        self.activities.insert(
            activity,
            SimActivity {
                class,
                state: lifecycle.then_some(LifecycleState::Created),
                hosts_fragments: lifecycle,
                content,
                fragments: Vec::new(),
            },
        );
        SimWindow { activity, content }
    }

    /// Add a lifecycle-aware, fragment-hosting activity in state `created`.
    pub fn add_activity(&mut self, class: ClassSpec) -> SimWindow {
        self.insert_activity(class, true)
    }

    /// Add an activity that exposes no lifecycle and hosts no fragments.
    pub fn add_plain_activity(&mut self, class: ClassSpec) -> SimWindow {
        self.insert_activity(class, false)
    }

    /// Move an activity to a new lifecycle state.
    pub fn set_state(&mut self, activity: ActivityId, state: LifecycleState) {
        if let Some(entry) = self.activities.get_mut(&activity)
            && entry.state.is_some()
        {
            entry.state = Some(state);
        }
    }

    /// Drop an activity and everything it owns, as if collected.
    pub fn remove_activity(&mut self, activity: ActivityId) {
        if let Some(entry) = self.activities.remove(&activity) {
            self.remove_view_tree(entry.content);
            for fragment in entry.fragments {
                self.remove_fragment_tree(fragment);
            }
        }
    }

    fn remove_view_tree(&mut self, view: ViewId) {
        let mut stack = vec![view];
        while let Some(view) = stack.pop() {
            if let Some(entry) = self.views.remove(&view) {
                stack.extend(entry.children);
            }
        }
    }

    fn remove_fragment_tree(&mut self, fragment: FragmentId) {
        let mut stack = vec![fragment];
        while let Some(fragment) = stack.pop() {
            if let Some(entry) = self.fragments.remove(&fragment) {
                stack.extend(entry.children);
            }
        }
    }

    /// Append a leaf element under `parent`.
    pub fn add_view(&mut self, parent: ViewId, class: ClassSpec) -> ViewId {
        self.insert_view(class, false, Some(ViewParent::View(parent)))
    }

    /// Append a view group under `parent`.
    pub fn add_group(&mut self, parent: ViewId, class: ClassSpec) -> ViewId {
        self.insert_view(class, true, Some(ViewParent::View(parent)))
    }

    /// Create an element that is not attached to any layout.
    pub fn add_detached_view(&mut self, class: ClassSpec, group: bool) -> ViewId {
        self.insert_view(class, group, None)
    }

    /// Create an element whose parent is the window root rather than a view.
    pub fn add_window_view(&mut self, class: ClassSpec, group: bool) -> ViewId {
        self.insert_view(class, group, Some(ViewParent::Window))
    }

    /// Attach a detached element under `parent`.
    pub fn attach_view(&mut self, view: ViewId, parent: ViewId) {
        self.detach_view(view);
        if let Some(entry) = self.views.get_mut(&view) {
            entry.parent = Some(ViewParent::View(parent));
        } else {
            return;
        }
        if let Some(parent) = self.views.get_mut(&parent) {
            parent.children.push(view);
        }
    }

    /// Remove an element from its parent, keeping its own subtree.
    pub fn detach_view(&mut self, view: ViewId) {
        let parent = match self.views.get_mut(&view) {
            Some(entry) => entry.parent.take(),
            None => return,
        };
        if let Some(ViewParent::View(parent)) = parent
            && let Some(parent) = self.views.get_mut(&parent)
        {
            parent.children.retain(|child| *child != view);
        }
    }

    /// Change an element's visibility.
    pub fn set_visibility(&mut self, view: ViewId, visibility: Visibility) {
        if let Some(entry) = self.views.get_mut(&view) {
            entry.visibility = visibility;
        }
    }

    /// Set the on-screen rectangle reported for an element.
    pub fn set_rect(&mut self, view: ViewId, rect: Rect) {
        if let Some(entry) = self.views.get_mut(&view) {
            entry.rect = Some(rect);
        }
    }

    /// Give an element a numeric identifier.
    pub fn set_view_id(&mut self, view: ViewId, id: i32) {
        if let Some(entry) = self.views.get_mut(&view) {
            entry.id = Some(id);
        }
    }

    /// Register a resource name for a numeric identifier.
    pub fn define_resource(&mut self, id: i32, name: &str) {
        self.resources.insert(id, name.to_owned());
    }

    fn insert_fragment(
        &mut self,
        host: FragmentHost,
        class: ClassSpec,
        tag: Option<&str>,
        dialog: bool,
    ) -> FragmentId {
        let id = FragmentId(self.next());
        self.fragments.insert(
            id,
            SimFragment {
                class,
                tag: tag.map(str::to_owned),
                dialog,
                view: None,
                children: Vec::new(),
                host,
            },
        );
        match host {
            FragmentHost::Activity(activity) => {
                if let Some(entry) = self.activities.get_mut(&activity) {
                    entry.fragments.push(id);
                }
            }
            FragmentHost::Fragment(parent) => {
                if let Some(entry) = self.fragments.get_mut(&parent) {
                    entry.children.push(id);
                }
            }
        }
        id
    }

    /// Add a fragment to the host's manager.
    pub fn add_fragment(
        &mut self,
        host: FragmentHost,
        class: ClassSpec,
        tag: Option<&str>,
    ) -> FragmentId {
        self.insert_fragment(host, class, tag, false)
    }

    /// Add a dialog fragment to the host's manager.
    pub fn add_dialog_fragment(
        &mut self,
        host: FragmentHost,
        class: ClassSpec,
        tag: Option<&str>,
    ) -> FragmentId {
        self.insert_fragment(host, class, tag, true)
    }

    /// Set or clear the view a fragment inflated.
    pub fn set_fragment_view(&mut self, fragment: FragmentId, view: Option<ViewId>) {
        if let Some(entry) = self.fragments.get_mut(&fragment) {
            entry.view = view;
        }
    }

    /// Remove a fragment (and its children) from its host's manager.
    pub fn remove_fragment(&mut self, fragment: FragmentId) {
        let Some(host) = self.fragments.get(&fragment).map(|entry| entry.host) else {
            return;
        };
        match host {
            FragmentHost::Activity(activity) => {
                if let Some(entry) = self.activities.get_mut(&activity) {
                    entry.fragments.retain(|f| *f != fragment);
                }
            }
            FragmentHost::Fragment(parent) => {
                if let Some(entry) = self.fragments.get_mut(&parent) {
                    entry.children.retain(|f| *f != fragment);
                }
            }
        }
        self.remove_fragment_tree(fragment);
    }

    /// Human-readable label of a fragment host (used for attach events).
    #[must_use]
    pub fn host_label(&self, host: FragmentHost) -> String {
        let node = match host {
            FragmentHost::Activity(activity) => NodeRef::Activity(activity),
            FragmentHost::Fragment(fragment) => NodeRef::Fragment(fragment),
        };
        self.type_info(node)
            .map(|info| info.qualified_name())
            .unwrap_or_default()
    }

    /// Number of live views (including content containers).
    #[must_use]
    pub fn view_count(&self) -> usize {
        self.views.len()
    }
}

impl UiGraph for SimulatedUi {
    fn type_info(&self, node: NodeRef) -> Option<TypeInfo<'_>> {
        match node {
            NodeRef::Activity(id) => self.activities.get(&id).map(|a| a.class.info()),
            NodeRef::View(id) => self.views.get(&id).map(|v| v.class.info()),
            NodeRef::Fragment(id) => self.fragments.get(&id).map(|f| f.class.info()),
        }
    }

    fn lifecycle_state(&self, activity: ActivityId) -> Option<LifecycleState> {
        self.activities.get(&activity).and_then(|a| a.state)
    }

    fn hosts_fragments(&self, activity: ActivityId) -> bool {
        self.activities
            .get(&activity)
            .is_some_and(|a| a.hosts_fragments)
    }

    fn content_container(&self, activity: ActivityId) -> Option<ViewId> {
        let content = self.activities.get(&activity)?.content;
        self.is_view_group(content).then_some(content)
    }

    fn is_view_group(&self, view: ViewId) -> bool {
        self.views.get(&view).is_some_and(|v| v.group)
    }

    fn child_count(&self, view: ViewId) -> usize {
        self.views.get(&view).map_or(0, |v| v.children.len())
    }

    fn child_at(&self, view: ViewId, index: usize) -> Option<ViewId> {
        self.views.get(&view)?.children.get(index).copied()
    }

    fn view_parent(&self, view: ViewId) -> Option<ViewParent> {
        self.views.get(&view)?.parent
    }

    fn visibility(&self, view: ViewId) -> Visibility {
        self.views
            .get(&view)
            .map_or(Visibility::Gone, |v| v.visibility)
    }

    fn view_id(&self, view: ViewId) -> Option<i32> {
        self.views.get(&view)?.id
    }

    fn resource_name(&self, id: i32) -> Result<String, LookupError> {
        self.resources.get(&id).cloned().ok_or(LookupError { id })
    }

    fn global_visible_rect(&self, view: ViewId) -> Option<Rect> {
        self.views.get(&view)?.rect
    }

    fn fragment_count(&self, host: FragmentHost) -> usize {
        match host {
            FragmentHost::Activity(id) => self
                .activities
                .get(&id)
                .filter(|a| a.hosts_fragments)
                .map_or(0, |a| a.fragments.len()),
            FragmentHost::Fragment(id) => self.fragments.get(&id).map_or(0, |f| f.children.len()),
        }
    }

    fn fragment_at(&self, host: FragmentHost, index: usize) -> Option<FragmentId> {
        match host {
            FragmentHost::Activity(id) => self
                .activities
                .get(&id)
                .filter(|a| a.hosts_fragments)?
                .fragments
                .get(index)
                .copied(),
            FragmentHost::Fragment(id) => self.fragments.get(&id)?.children.get(index).copied(),
        }
    }

    fn fragment_view(&self, fragment: FragmentId) -> Option<ViewId> {
        self.fragments
            .get(&fragment)?
            .view
            .filter(|view| self.views.contains_key(view))
    }

    fn fragment_tag(&self, fragment: FragmentId) -> Option<&str> {
        self.fragments.get(&fragment)?.tag.as_deref()
    }

    fn is_dialog_fragment(&self, fragment: FragmentId) -> bool {
        self.fragments.get(&fragment).is_some_and(|f| f.dialog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_spec_splits_package() {
        let spec = ClassSpec::kotlin("com.acme.ui.MainActivity");
        let info = spec.info();
        assert_eq!(info.package, Some("com.acme.ui"));
        assert_eq!(info.name, "MainActivity");
        assert_eq!(info.language, SourceLanguage::Kotlin);
    }

    #[test]
    fn class_spec_without_package() {
        let spec = ClassSpec::java("View");
        assert_eq!(spec.info().package, None);
        assert_eq!(spec.info().name, "View");
    }

    #[test]
    fn views_link_to_parents_in_order() {
        let mut ui = SimulatedUi::new();
        let window = ui.add_activity(ClassSpec::java("a.Main"));
        let a = ui.add_group(window.content, ClassSpec::java("a.A"));
        let b = ui.add_view(a, ClassSpec::java("a.B"));
        let c = ui.add_view(a, ClassSpec::java("a.C"));

        assert_eq!(ui.child_count(a), 2);
        assert_eq!(ui.child_at(a, 0), Some(b));
        assert_eq!(ui.child_at(a, 1), Some(c));
        assert_eq!(ui.view_parent(b), Some(ViewParent::View(a)));
        assert_eq!(ui.view_parent(window.content), Some(ViewParent::Window));
        assert_eq!(ui.content_container(window.activity), Some(window.content));
    }

    #[test]
    fn detach_and_reattach() {
        let mut ui = SimulatedUi::new();
        let window = ui.add_activity(ClassSpec::java("a.Main"));
        let a = ui.add_group(window.content, ClassSpec::java("a.A"));
        let b = ui.add_group(window.content, ClassSpec::java("a.B"));
        let leaf = ui.add_view(a, ClassSpec::java("a.Leaf"));

        ui.detach_view(leaf);
        assert_eq!(ui.view_parent(leaf), None);
        assert_eq!(ui.child_count(a), 0);

        ui.attach_view(leaf, b);
        assert_eq!(ui.view_parent(leaf), Some(ViewParent::View(b)));
        assert_eq!(ui.child_at(b, 0), Some(leaf));
    }

    #[test]
    fn plain_activity_has_no_lifecycle_or_fragments() {
        let mut ui = SimulatedUi::new();
        let window = ui.add_plain_activity(ClassSpec::java("a.Plain"));
        ui.add_fragment(
            FragmentHost::Activity(window.activity),
            ClassSpec::java("a.F"),
            None,
        );
        assert_eq!(ui.lifecycle_state(window.activity), None);
        assert!(!ui.hosts_fragments(window.activity));
        assert_eq!(ui.fragment_count(FragmentHost::Activity(window.activity)), 0);
    }

    #[test]
    fn nested_fragment_managers() {
        let mut ui = SimulatedUi::new();
        let window = ui.add_activity(ClassSpec::java("a.Main"));
        let host = FragmentHost::Activity(window.activity);
        let outer = ui.add_fragment(host, ClassSpec::java("a.Outer"), None);
        let inner = ui.add_dialog_fragment(
            FragmentHost::Fragment(outer),
            ClassSpec::java("a.Inner"),
            Some("dialog"),
        );

        assert_eq!(ui.fragment_count(host), 1);
        assert_eq!(ui.fragment_at(FragmentHost::Fragment(outer), 0), Some(inner));
        assert!(ui.is_dialog_fragment(inner));
        assert_eq!(ui.host_label(FragmentHost::Fragment(outer)), "a.Outer");

        ui.remove_fragment(outer);
        assert_eq!(ui.fragment_count(host), 0);
        assert!(ui.type_info(NodeRef::Fragment(inner)).is_none());
    }

    #[test]
    fn id_name_skips_generated_and_reports_misses() {
        let mut ui = SimulatedUi::new();
        let window = ui.add_activity(ClassSpec::java("a.Main"));
        let named = ui.add_view(window.content, ClassSpec::java("a.V"));
        let generated = ui.add_view(window.content, ClassSpec::java("a.V"));
        let missing = ui.add_view(window.content, ClassSpec::java("a.V"));
        ui.set_view_id(named, 0x7F0A_0001);
        ui.define_resource(0x7F0A_0001, "title");
        ui.set_view_id(generated, 42);
        ui.set_view_id(missing, 0x7F0A_0002);

        assert_eq!(ui.id_name(named), Ok(Some("title".to_owned())));
        assert_eq!(ui.id_name(generated), Ok(None));
        assert_eq!(ui.id_name(missing), Err(LookupError { id: 0x7F0A_0002 }));
        assert_eq!(ui.id_name(window.content), Ok(None));
    }

    #[test]
    fn removed_activity_stops_resolving() {
        let mut ui = SimulatedUi::new();
        let window = ui.add_activity(ClassSpec::java("a.Main"));
        let v = ui.add_view(window.content, ClassSpec::java("a.V"));
        ui.remove_activity(window.activity);
        assert!(ui.type_info(NodeRef::Activity(window.activity)).is_none());
        assert!(ui.type_info(NodeRef::View(v)).is_none());
        assert_eq!(ui.view_count(), 0);
    }

    #[test]
    fn fragment_in_layout_follows_view_parent() {
        let mut ui = SimulatedUi::new();
        let window = ui.add_activity(ClassSpec::java("a.Main"));
        let f = ui.add_fragment(
            FragmentHost::Activity(window.activity),
            ClassSpec::java("a.F"),
            None,
        );
        assert!(!ui.is_fragment_in_layout(f));
        let root = ui.add_detached_view(ClassSpec::java("a.Root"), true);
        ui.set_fragment_view(f, Some(root));
        assert!(!ui.is_fragment_in_layout(f));
        ui.attach_view(root, window.content);
        assert!(ui.is_fragment_in_layout(f));
    }
}
