#![forbid(unsafe_code)]

//! Splitting rendered text into bounded sink messages.
//!
//! Sinks such as the platform log truncate long messages, so a report is
//! delivered as several messages. Lines are never split: a message ends
//! before the line that would push it past the ceiling. A single line that
//! alone exceeds the ceiling becomes its own oversized message.

/// Default ceiling, in bytes, of one sink message.
pub const DEFAULT_MAX_MESSAGE_BYTES: usize = 4000;

/// Accumulates newline-terminated lines into messages of at most
/// `max_bytes` bytes.
#[derive(Debug, Clone)]
pub struct OutputChunker {
    max_bytes: usize,
    current: String,
    messages: Vec<String>,
}

impl Default for OutputChunker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_MESSAGE_BYTES)
    }
}

impl OutputChunker {
    /// Create a chunker; a zero ceiling is treated as one byte.
    #[must_use]
    pub fn new(max_bytes: usize) -> Self {
        Self {
            max_bytes: max_bytes.max(1),
            current: String::new(),
            messages: Vec::new(),
        }
    }

    #[must_use]
    pub const fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Append one line; a trailing newline is added.
    pub fn push_line(&mut self, line: &str) {
        let cost = line.len() + 1;
        if !self.current.is_empty() && self.current.len() + cost > self.max_bytes {
            self.flush();
        }
        self.current.push_str(line);
        self.current.push('\n');
    }

    /// Append every line of `lines`.
    pub fn extend<'a>(&mut self, lines: impl IntoIterator<Item = &'a str>) {
        for line in lines {
            self.push_line(line);
        }
    }

    /// Finish the current message and return all messages in order.
    ///
    /// The chunker is empty afterwards and may be reused.
    pub fn build(&mut self) -> Vec<String> {
        if !self.current.is_empty() {
            self.flush();
        }
        std::mem::take(&mut self.messages)
    }

    fn flush(&mut self) {
        let capacity = self.current.len();
        let done = std::mem::replace(&mut self.current, String::with_capacity(capacity));
        self.messages.push(done);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_input_is_one_message() {
        let mut chunker = OutputChunker::new(64);
        chunker.extend(["HIERARCHY:", "⬟[Activity] .(MainActivity.kt:0) [resumed]"]);
        let messages = chunker.build();
        assert_eq!(messages.len(), 1);
        assert_eq!(
            messages[0],
            "HIERARCHY:\n⬟[Activity] .(MainActivity.kt:0) [resumed]\n"
        );
    }

    #[test]
    fn empty_build_yields_nothing() {
        let mut chunker = OutputChunker::new(16);
        assert!(chunker.build().is_empty());
    }

    #[test]
    fn flushes_before_the_line_that_overflows() {
        let mut chunker = OutputChunker::new(10);
        chunker.extend(["abcd", "efgh", "ij"]);
        let messages = chunker.build();
        assert_eq!(messages, vec!["abcd\nefgh\n", "ij\n"]);
    }

    #[test]
    fn exact_fit_stays_in_message() {
        let mut chunker = OutputChunker::new(6);
        chunker.extend(["ab", "cd"]);
        assert_eq!(chunker.build(), vec!["ab\ncd\n"]);
    }

    #[test]
    fn oversized_line_is_its_own_message() {
        let mut chunker = OutputChunker::new(8);
        chunker.extend(["ab", "0123456789abcdef", "cd"]);
        let messages = chunker.build();
        assert_eq!(messages, vec!["ab\n", "0123456789abcdef\n", "cd\n"]);
    }

    #[test]
    fn multibyte_lines_count_bytes() {
        // Each "⡇ " is four bytes.
        let mut chunker = OutputChunker::new(10);
        chunker.extend(["⡇ ⡇ ", "x"]);
        let messages = chunker.build();
        assert_eq!(messages.len(), 2);
    }

    #[test]
    fn reusable_after_build() {
        let mut chunker = OutputChunker::new(32);
        chunker.push_line("first");
        assert_eq!(chunker.build().len(), 1);
        chunker.push_line("second");
        assert_eq!(chunker.build(), vec!["second\n"]);
    }
}
