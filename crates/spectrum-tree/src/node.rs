#![forbid(unsafe_code)]

//! Records of the composite tree.
//!
//! Names and decorations are captured as text at build time, so rendering a
//! tree never touches the live UI graph.

use spectrum_core::{ActivityId, FragmentId, LifecycleState, Rect, ViewId, Visibility};

use crate::pool::{Handle, Poolable};

/// Root of one report: the tracked activities in tracking order.
#[derive(Debug, Default)]
pub struct CompositeTree {
    pub activities: Vec<Handle<ActivityNode>>,
}

impl Poolable for CompositeTree {
    fn reset(&mut self) {
        self.activities.clear();
    }
}

#[derive(Debug, Default)]
pub struct ActivityNode {
    pub activity: Option<ActivityId>,
    /// Class link, e.g. `.(MainActivity.kt:0)`.
    pub name: String,
    pub state: Option<LifecycleState>,
    /// Top-level views under the content container.
    pub views: Vec<Handle<ViewNode>>,
    /// Top-level fragments not spliced into a view.
    pub fragments: Vec<Handle<FragmentNode>>,
}

impl Poolable for ActivityNode {
    fn reset(&mut self) {
        self.activity = None;
        self.name.clear();
        self.state = None;
        self.views.clear();
        self.fragments.clear();
    }
}

/// Where a view sits on screen, captured when location decoration is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// The view has no parent.
    OutOfLayout,
    /// The view is attached but `Gone`.
    Gone,
    /// Attached and laid out within this global rectangle.
    OnScreen(Rect),
}

#[derive(Debug, Default)]
pub struct ViewNode {
    pub view: Option<ViewId>,
    pub name: String,
    pub group: bool,
    pub visibility: Visibility,
    /// Resource entry name, present only for declared ids.
    pub id_name: Option<String>,
    pub placement: Option<Placement>,
    pub children: Vec<Handle<ViewNode>>,
    /// Fragments whose hosted view was a direct child of this view.
    pub fragments: Vec<Handle<FragmentNode>>,
}

impl Poolable for ViewNode {
    fn reset(&mut self) {
        self.view = None;
        self.name.clear();
        self.group = false;
        self.visibility = Visibility::Visible;
        self.id_name = None;
        self.placement = None;
        self.children.clear();
        self.fragments.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FragmentKind {
    Dialog,
    /// Hosts a view that is attached to a parent.
    #[default]
    InLayout,
    OutOfLayout,
}

#[derive(Debug, Default)]
pub struct FragmentNode {
    pub fragment: Option<FragmentId>,
    pub name: String,
    pub tag: Option<String>,
    pub kind: FragmentKind,
    /// Child fragments not spliced into a view.
    pub children: Vec<Handle<FragmentNode>>,
    /// The hosted view's node, set once the fragment is spliced.
    pub view: Option<Handle<ViewNode>>,
}

impl Poolable for FragmentNode {
    fn reset(&mut self) {
        self.fragment = None;
        self.name.clear();
        self.tag = None;
        self.kind = FragmentKind::default();
        self.children.clear();
        self.view = None;
    }
}
