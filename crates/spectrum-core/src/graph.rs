#![forbid(unsafe_code)]

//! Read-only accessor over the live UI object graph.
//!
//! The toolkit owns every activity, view, and fragment. [`UiGraph`] is the
//! only way the report builder reaches them: child enumeration, visibility,
//! identifier lookup, screen rectangles, hosted-view lookup for fragments,
//! and parent lookup for views. Implementations answer for objects that are
//! still alive and return `None` (or zero counts) for identities that no
//! longer resolve.
//!
//! Child enumeration is index based (`*_count` + `*_at`) so walking the graph
//! allocates nothing on the accessor side.

use std::fmt;

use crate::geometry::Rect;
use crate::identity::{ActivityId, FragmentHost, FragmentId, NodeRef, TypeInfo, ViewId};
use crate::lifecycle::LifecycleState;

/// Visibility of a UI element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    /// Drawn and taking space.
    #[default]
    Visible,
    /// Not drawn, still taking space.
    Invisible,
    /// Not drawn, not taking space.
    Gone,
}

impl Visibility {
    /// Whether the element is drawn.
    #[inline]
    #[must_use]
    pub const fn is_visible(self) -> bool {
        matches!(self, Self::Visible)
    }
}

/// Parent of a UI element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewParent {
    /// Another UI element.
    View(ViewId),
    /// A non-element parent such as the window root.
    Window,
}

/// Identifier name lookup failure.
///
/// Raised when an element carries a numeric identifier that has no name in
/// the resource table (typically an id generated at runtime).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupError {
    /// The identifier that failed to resolve.
    pub id: i32,
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no resource name for id {:#010x}", self.id)
    }
}

impl std::error::Error for LookupError {}

/// Whether an identifier was generated at runtime rather than declared.
///
/// Generated ids live in the range with an empty package byte and a
/// non-zero entry; they never have a resource name.
#[inline]
#[must_use]
pub const fn is_generated_id(id: i32) -> bool {
    let bits = id as u32;
    (bits & 0xFF00_0000) == 0 && (bits & 0x00FF_FFFF) != 0
}

/// Sentinel for "no identifier".
pub const NO_ID: i32 = -1;

/// Read-only view of the toolkit's live object graph.
pub trait UiGraph {
    /// Implementing type of an element, or `None` once it no longer exists.
    fn type_info(&self, node: NodeRef) -> Option<TypeInfo<'_>>;

    /// Current lifecycle state of an activity.
    ///
    /// `None` means the activity does not expose a lifecycle at all and
    /// cannot be explored.
    fn lifecycle_state(&self, activity: ActivityId) -> Option<LifecycleState>;

    /// Whether the activity owns a fragment manager.
    fn hosts_fragments(&self, activity: ActivityId) -> bool;

    /// The activity's content container, if it is a view group.
    fn content_container(&self, activity: ActivityId) -> Option<ViewId>;

    /// Whether the element is a group that can own children.
    fn is_view_group(&self, view: ViewId) -> bool;

    /// Number of children of a view group (zero for leaves).
    fn child_count(&self, view: ViewId) -> usize;

    /// Child at `index`, in toolkit order.
    fn child_at(&self, view: ViewId, index: usize) -> Option<ViewId>;

    /// Parent of the element; `None` when detached from any layout.
    fn view_parent(&self, view: ViewId) -> Option<ViewParent>;

    /// Visibility of the element.
    fn visibility(&self, view: ViewId) -> Visibility;

    /// Numeric identifier of the element, if it has one.
    fn view_id(&self, view: ViewId) -> Option<i32>;

    /// Resource name of a numeric identifier.
    fn resource_name(&self, id: i32) -> Result<String, LookupError>;

    /// Portion of the element visible on screen, in screen coordinates.
    fn global_visible_rect(&self, view: ViewId) -> Option<Rect>;

    /// Number of fragments in the host's manager.
    fn fragment_count(&self, host: FragmentHost) -> usize;

    /// Fragment at `index` in the host's manager.
    fn fragment_at(&self, host: FragmentHost, index: usize) -> Option<FragmentId>;

    /// Root view the fragment inflated, if it currently has one.
    fn fragment_view(&self, fragment: FragmentId) -> Option<ViewId>;

    /// Tag the fragment was added with.
    fn fragment_tag(&self, fragment: FragmentId) -> Option<&str>;

    /// Whether the fragment is a dialog fragment.
    fn is_dialog_fragment(&self, fragment: FragmentId) -> bool;

    /// Whether the fragment's view is attached to a layout.
    fn is_fragment_in_layout(&self, fragment: FragmentId) -> bool {
        self.fragment_view(fragment)
            .and_then(|view| self.view_parent(view))
            .is_some()
    }

    /// Resolve the declared name of an element's identifier.
    ///
    /// `Ok(None)` when the element has no identifier or a generated one.
    fn id_name(&self, view: ViewId) -> Result<Option<String>, LookupError> {
        match self.view_id(view) {
            Some(id) if id != NO_ID && !is_generated_id(id) => self.resource_name(id).map(Some),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_have_empty_package_byte() {
        assert!(is_generated_id(1));
        assert!(is_generated_id(0x00FF_FFFF));
        assert!(!is_generated_id(0));
        assert!(!is_generated_id(0x7F0A_0001));
        assert!(!is_generated_id(NO_ID));
    }

    #[test]
    fn lookup_error_mentions_id() {
        let err = LookupError { id: 0x7F0A_0001 };
        assert_eq!(err.to_string(), "no resource name for id 0x7f0a0001");
    }

    #[test]
    fn visibility_default_is_visible() {
        assert!(Visibility::default().is_visible());
        assert!(!Visibility::Gone.is_visible());
        assert!(!Visibility::Invisible.is_visible());
    }
}
