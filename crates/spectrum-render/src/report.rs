#![forbid(unsafe_code)]

//! Turning a composite tree into report text.
//!
//! A report is framed by a build-time header, a divider, a centred title and
//! the `HIERARCHY:` section. Pending changes, if any, follow under
//! `CHANGES:`; the log is cleared once rendered. A closing divider ends the
//! report.
//!
//! Nesting depth:
//!
//! | node                         | depth of its entries                   |
//! |------------------------------|----------------------------------------|
//! | activity (depth 0)           | fragments, then views, at +2           |
//! | view                         | spliced fragments at +1, children at +2 |
//! | fragment with hosted view    | child fragments, then the view, at +1  |
//! | fragment without hosted view | child fragments at +2                  |

use std::fmt::Write as _;
use std::time::Duration;

use spectrum_tree::{
    ActivityNode, CompositeTree, FragmentKind, FragmentNode, Handle, NodeStore, Placement,
    ViewNode,
};

use crate::changes::ChangeLog;
use crate::chunker::OutputChunker;
use crate::glyphs::GlyphSet;

/// Report title, centred over the divider.
pub const TITLE: &str = "SPECTRUM REPORT";
/// Width of the divider and of the title row, in characters.
pub const DIVIDER_WIDTH: usize = 100;
pub const HIERARCHY_HEADER: &str = "HIERARCHY:";
pub const CHANGES_HEADER: &str = "CHANGES:";

#[derive(Debug, Clone, Copy)]
enum Item {
    Activity(Handle<ActivityNode>),
    View(Handle<ViewNode>, usize),
    Fragment(Handle<FragmentNode>, usize),
}

/// Reusable report renderer.
#[derive(Debug, Clone)]
pub struct ReportRenderer {
    glyphs: GlyphSet,
    divider: String,
    title: String,
    line: String,
    stack: Vec<Item>,
}

impl Default for ReportRenderer {
    fn default() -> Self {
        Self::new(GlyphSet::default())
    }
}

impl ReportRenderer {
    #[must_use]
    pub fn new(glyphs: GlyphSet) -> Self {
        Self {
            glyphs,
            divider: divider(glyphs),
            title: format!("{TITLE:^DIVIDER_WIDTH$}"),
            line: String::new(),
            stack: Vec::new(),
        }
    }

    pub fn glyphs(&self) -> GlyphSet {
        self.glyphs
    }

    pub fn set_glyphs(&mut self, glyphs: GlyphSet) {
        if glyphs != self.glyphs {
            self.glyphs = glyphs;
            self.divider = divider(glyphs);
        }
    }

    /// Render `tree` and the pending `changes` into `out`, then clear
    /// `changes`.
    ///
    /// Returns the number of lines written.
    pub fn render(
        &mut self,
        store: &NodeStore,
        tree: Handle<CompositeTree>,
        changes: &mut ChangeLog,
        build_time: Duration,
        out: &mut OutputChunker,
    ) -> usize {
        let mut lines = 0usize;
        let mut emit = |out: &mut OutputChunker, line: &str| {
            out.push_line(line);
            lines += 1;
        };

        self.line.clear();
        let _ = write!(
            self.line,
            "Report built in {:.1} ms",
            build_time.as_secs_f64() * 1000.0
        );
        emit(out, &self.line);
        emit(out, &self.divider);
        emit(out, &self.title);
        emit(out, HIERARCHY_HEADER);

        self.stack.clear();
        self.stack.extend(
            store
                .tree(tree)
                .activities
                .iter()
                .rev()
                .map(|a| Item::Activity(*a)),
        );

        while let Some(item) = self.stack.pop() {
            self.line.clear();
            match item {
                Item::Activity(h) => {
                    let node = store.activity(h);
                    write_activity(&mut self.line, self.glyphs, node);
                    self.stack.extend(node.views.iter().rev().map(|v| Item::View(*v, 2)));
                    self.stack
                        .extend(node.fragments.iter().rev().map(|f| Item::Fragment(*f, 2)));
                }
                Item::View(h, depth) => {
                    let node = store.view(h);
                    write_view(&mut self.line, self.glyphs, depth, node);
                    self.stack
                        .extend(node.children.iter().rev().map(|v| Item::View(*v, depth + 2)));
                    self.stack.extend(
                        node.fragments
                            .iter()
                            .rev()
                            .map(|f| Item::Fragment(*f, depth + 1)),
                    );
                }
                Item::Fragment(h, depth) => {
                    let node = store.fragment(h);
                    write_fragment(&mut self.line, self.glyphs, depth, node);
                    let next = if node.view.is_some() { depth + 1 } else { depth + 2 };
                    self.stack.extend(node.view.map(|v| Item::View(v, next)));
                    self.stack
                        .extend(node.children.iter().rev().map(|f| Item::Fragment(*f, next)));
                }
            }
            emit(out, &self.line);
        }

        if !changes.is_empty() {
            emit(out, "");
            emit(out, CHANGES_HEADER);
            for entry in changes.entries() {
                self.line.clear();
                self.line.push_str(" - ");
                self.line.push_str(entry);
                emit(out, &self.line);
            }
            changes.clear();
        }

        emit(out, &self.divider);
        tracing::trace!(lines, "report rendered");
        lines
    }
}

fn divider(glyphs: GlyphSet) -> String {
    std::iter::repeat_n(glyphs.divider_cell(), DIVIDER_WIDTH).collect()
}

fn write_activity(out: &mut String, glyphs: GlyphSet, node: &ActivityNode) {
    out.push_str(glyphs.activity());
    out.push_str(&node.name);
    if let Some(state) = node.state {
        out.push_str(" [");
        out.push_str(state.as_str());
        out.push(']');
    }
}

fn write_view(out: &mut String, glyphs: GlyphSet, depth: usize, node: &ViewNode) {
    glyphs.write_indent(out, depth);
    let visible = node.visibility.is_visible();
    out.push_str(if node.group {
        glyphs.view_group(visible)
    } else {
        glyphs.view(visible)
    });
    out.push_str(&node.name);
    if let Some(id) = &node.id_name {
        out.push_str(" [id/");
        out.push_str(id);
        out.push(']');
    }
    match node.placement {
        None => {}
        Some(Placement::OutOfLayout) => out.push_str(" [out of layout]"),
        Some(Placement::Gone) => out.push_str(" [gone]"),
        Some(Placement::OnScreen(rect)) => {
            let (horizontal, cross, vertical) = glyphs.span_separators();
            let _ = write!(
                out,
                " [{}{horizontal}{}]{cross}[{}{vertical}{}]",
                rect.left, rect.right, rect.top, rect.bottom
            );
        }
    }
}

fn write_fragment(out: &mut String, glyphs: GlyphSet, depth: usize, node: &FragmentNode) {
    glyphs.write_indent(out, depth);
    out.push_str(match node.kind {
        FragmentKind::Dialog => glyphs.dialog_fragment(),
        FragmentKind::InLayout => glyphs.fragment(true),
        FragmentKind::OutOfLayout => glyphs.fragment(false),
    });
    out.push_str(&node.name);
    if let Some(tag) = &node.tag {
        out.push_str(" [tag '");
        out.push_str(tag);
        out.push_str("']");
    }
}
