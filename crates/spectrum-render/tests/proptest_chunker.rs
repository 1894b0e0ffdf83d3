//! Property tests for message chunking.

use proptest::prelude::*;
use spectrum_render::OutputChunker;

fn line_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 .()\\[\\]:]{0,40}",
        "(⡇ |  ){0,6}[●○▸▹■□◇]\\[[A-Za-z]{1,12}\\] [a-z]{0,20}",
    ]
}

fn lines_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(line_strategy(), 0..80)
}

proptest! {
    #[test]
    fn concatenation_reproduces_input(lines in lines_strategy(), max in 1usize..256) {
        let mut chunker = OutputChunker::new(max);
        chunker.extend(lines.iter().map(String::as_str));
        let messages = chunker.build();

        let expected: String = lines.iter().map(|l| format!("{l}\n")).collect();
        prop_assert_eq!(messages.concat(), expected, "chunks lost or reordered text");
    }

    #[test]
    fn messages_respect_ceiling_unless_single_line(lines in lines_strategy(), max in 1usize..256) {
        let mut chunker = OutputChunker::new(max);
        chunker.extend(lines.iter().map(String::as_str));

        for message in chunker.build() {
            prop_assert!(!message.is_empty(), "empty message emitted");
            prop_assert!(message.ends_with('\n'), "message split a line: {message:?}");
            if message.len() > max {
                prop_assert_eq!(
                    message.matches('\n').count(),
                    1,
                    "oversized message holds more than one line"
                );
            }
        }
    }

    #[test]
    fn messages_are_packed(lines in lines_strategy(), max in 1usize..256) {
        let mut chunker = OutputChunker::new(max);
        chunker.extend(lines.iter().map(String::as_str));
        let messages = chunker.build();

        // A flush happens only when the next line would not fit.
        for pair in messages.windows(2) {
            let next_line = pair[1].split_inclusive('\n').next().unwrap_or_default();
            prop_assert!(
                pair[0].len() + next_line.len() > max,
                "message ended early: {:?} then {:?}",
                pair[0],
                next_line
            );
        }
    }
}
