#![forbid(unsafe_code)]

//! Opaque identities for live toolkit objects.
//!
//! Spectrum never owns activities, views, or fragments. It refers to them by
//! these copyable identities, and every attribute read goes back through the
//! [`UiGraph`](crate::graph::UiGraph) accessor. An identity whose object has
//! been collected simply stops resolving.

use std::fmt;

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u64);

        impl $name {
            /// Raw identity value.
            #[inline]
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "#{}"), self.0)
            }
        }
    };
}

opaque_id!(
    /// Identity of a top-level window (an activity).
    ActivityId,
    "activity"
);
opaque_id!(
    /// Identity of a single UI element.
    ViewId,
    "view"
);
opaque_id!(
    /// Identity of a fragment instance.
    FragmentId,
    "fragment"
);

/// Any element that can appear in a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRef {
    /// A top-level window.
    Activity(ActivityId),
    /// A UI element.
    View(ViewId),
    /// A fragment.
    Fragment(FragmentId),
}

impl From<ActivityId> for NodeRef {
    fn from(id: ActivityId) -> Self {
        Self::Activity(id)
    }
}

impl From<ViewId> for NodeRef {
    fn from(id: ViewId) -> Self {
        Self::View(id)
    }
}

impl From<FragmentId> for NodeRef {
    fn from(id: FragmentId) -> Self {
        Self::Fragment(id)
    }
}

/// Owner of a fragment manager.
///
/// Activities own the top-level manager; each fragment owns a child manager
/// of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FragmentHost {
    /// The activity's top-level fragment manager.
    Activity(ActivityId),
    /// A fragment's child fragment manager.
    Fragment(FragmentId),
}

/// Source language of an element's implementing type.
///
/// Decides the file extension of the clickable class link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SourceLanguage {
    /// Java source (`.java`).
    #[default]
    Java,
    /// Kotlin source (`.kt`).
    Kotlin,
}

impl SourceLanguage {
    /// Source file extension without the dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Java => "java",
            Self::Kotlin => "kt",
        }
    }
}

/// Implementing type of an element, borrowed from the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeInfo<'a> {
    /// Package (namespace) of the type, if it has one.
    pub package: Option<&'a str>,
    /// Simple type name.
    pub name: &'a str,
    /// Language the type is written in.
    pub language: SourceLanguage,
}

impl TypeInfo<'_> {
    /// Write the class link (`.(Name.kt:0)` or `pkg.(Name.kt:0)`) into `out`.
    ///
    /// Log viewers turn this form into a jump-to-source link.
    pub fn write_link(&self, out: &mut String, with_package: bool) {
        if with_package && let Some(package) = self.package {
            out.push_str(package);
        }
        out.push_str(".(");
        out.push_str(self.name);
        out.push('.');
        out.push_str(self.language.extension());
        out.push_str(":0)");
    }

    /// Class link as an owned string.
    #[must_use]
    pub fn link(&self, with_package: bool) -> String {
        let mut out = String::new();
        self.write_link(&mut out, with_package);
        out
    }

    /// Fully qualified name (`pkg.Name`).
    #[must_use]
    pub fn qualified_name(&self) -> String {
        match self.package {
            Some(package) => format!("{package}.{}", self.name),
            None => self.name.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAIN: TypeInfo<'static> = TypeInfo {
        package: Some("com.acme.demo"),
        name: "MainActivity",
        language: SourceLanguage::Kotlin,
    };

    #[test]
    fn link_without_package() {
        assert_eq!(MAIN.link(false), ".(MainActivity.kt:0)");
    }

    #[test]
    fn link_with_package() {
        assert_eq!(MAIN.link(true), "com.acme.demo.(MainActivity.kt:0)");
    }

    #[test]
    fn link_with_package_requested_but_missing() {
        let bare = TypeInfo {
            package: None,
            name: "FrameLayout",
            language: SourceLanguage::Java,
        };
        assert_eq!(bare.link(true), ".(FrameLayout.java:0)");
        assert_eq!(bare.qualified_name(), "FrameLayout");
    }

    #[test]
    fn qualified_name_joins_package() {
        assert_eq!(MAIN.qualified_name(), "com.acme.demo.MainActivity");
    }

    #[test]
    fn ids_display_with_kind() {
        assert_eq!(ActivityId(3).to_string(), "activity#3");
        assert_eq!(ViewId(9).to_string(), "view#9");
        assert_eq!(FragmentId(1).to_string(), "fragment#1");
        assert_eq!(NodeRef::from(ViewId(2)), NodeRef::View(ViewId(2)));
    }
}
