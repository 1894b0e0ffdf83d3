#![forbid(unsafe_code)]

//! Line glyphs and indentation.

/// Glyph vocabulary used for hierarchy lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GlyphSet {
    /// Box-drawing and geometric symbols.
    #[default]
    Unicode,
    /// Plain ASCII for sinks that mangle Unicode.
    Ascii,
}

impl GlyphSet {
    /// Parse `unicode` or `ascii` (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("unicode") {
            Some(Self::Unicode)
        } else if value.eq_ignore_ascii_case("ascii") {
            Some(Self::Ascii)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn activity(self) -> &'static str {
        match self {
            Self::Unicode => "⬟[Activity] ",
            Self::Ascii => "#[Activity] ",
        }
    }

    #[must_use]
    pub const fn view_group(self, visible: bool) -> &'static str {
        match (self, visible) {
            (Self::Unicode, true) => "▸[ViewGroup] ",
            (Self::Unicode, false) => "▹[ViewGroup] ",
            (Self::Ascii, true) => ">[ViewGroup] ",
            (Self::Ascii, false) => "-[ViewGroup] ",
        }
    }

    #[must_use]
    pub const fn view(self, visible: bool) -> &'static str {
        match (self, visible) {
            (Self::Unicode, true) => "●[View] ",
            (Self::Unicode, false) => "○[View] ",
            (Self::Ascii, true) => "*[View] ",
            (Self::Ascii, false) => "o[View] ",
        }
    }

    #[must_use]
    pub const fn dialog_fragment(self) -> &'static str {
        match self {
            Self::Unicode => "◇[DialogFragment] ",
            Self::Ascii => "<>[DialogFragment] ",
        }
    }

    #[must_use]
    pub const fn fragment(self, in_layout: bool) -> &'static str {
        match (self, in_layout) {
            (Self::Unicode, true) => "■[Fragment] ",
            (Self::Unicode, false) => "□[Fragment(out-of-layout)] ",
            (Self::Ascii, true) => "=[Fragment] ",
            (Self::Ascii, false) => "_[Fragment(out-of-layout)] ",
        }
    }

    /// Indent unit for one level; even levels carry the anchor mark.
    #[must_use]
    pub const fn indent(self, level: usize) -> &'static str {
        match (self, level % 2 == 0) {
            (Self::Unicode, true) => "⡇ ",
            (Self::Ascii, true) => "| ",
            (_, false) => "  ",
        }
    }

    /// Append indentation for `depth` levels.
    pub fn write_indent(self, out: &mut String, depth: usize) {
        for level in 0..depth {
            out.push_str(self.indent(level));
        }
    }

    /// One cell of the horizontal divider.
    #[must_use]
    pub const fn divider_cell(self) -> char {
        match self {
            Self::Unicode => '―',
            Self::Ascii => '-',
        }
    }

    /// Horizontal and vertical span separators of a location box.
    #[must_use]
    pub const fn span_separators(self) -> (&'static str, &'static str, &'static str) {
        match self {
            Self::Unicode => (" ⇔ ", "×", " ⇕ "),
            Self::Ascii => (" <> ", "x", " ^v "),
        }
    }
}
