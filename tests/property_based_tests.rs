// Property-based tests using proptest
// Random inputs shake out edge cases in the recovery paths that the worked
// scenarios in indenter_test.rs never reach.

use proptest::prelude::*;
use lucid_indent::buffer::{Buffer, HostBuffer};
use lucid_indent::grammar::{lex, parse};
use lucid_indent::indenter::{InsertEvent, NewLineIndenter};

// Property: the parse pipeline is total - any string lexes and parses
// without panicking, including heavily malformed input
proptest! {
    #[test]
    fn parse_pipeline_never_panics(text in "[a-z{}()\\[\\];:,/*\" \\n]{0,120}") {
        let tokens = lex(&text);
        let tree = parse(&tokens);
        // Every consumed token interval stays in bounds
        fn check(node: &lucid_indent::grammar::Node, len: usize) -> bool {
            node.first <= node.last
                && (len == 0 || node.last < len)
                && node.children.iter().all(|c| check(c, len))
        }
        prop_assert!(check(&tree, tokens.len()));
    }
}

// Property: recomputing the indent list twice with no intervening edit
// yields the same table (idempotence)
proptest! {
    #[test]
    fn recomputation_is_idempotent(text in "[a-z{}();\\n ]{0,100}") {
        let buffer = Buffer::from_text(&text);
        let mut indenter = NewLineIndenter::default();
        indenter.update_indent_list(&buffer);
        let first: Vec<usize> = (0..buffer.line_count()).map(|n| indenter.get_tabs(n)).collect();
        indenter.update_indent_list(&buffer);
        let second: Vec<usize> = (0..buffer.line_count()).map(|n| indenter.get_tabs(n)).collect();
        prop_assert_eq!(first, second);
    }
}

// Property: re-indenting a closer line twice in a row changes nothing the
// second time (dedent is idempotent)
proptest! {
    #[test]
    fn dedent_on_close_is_idempotent(depth in 1usize..5, pad in 0usize..8) {
        let mut text = String::new();
        for _ in 0..depth {
            text.push_str("if (x) {\n");
        }
        text.push_str("y = 1;\n");
        text.push_str(&" ".repeat(pad));
        let mut buffer = Buffer::from_text(&text);
        let mut indenter = NewLineIndenter::default();

        let offset = buffer.text().len();
        buffer.insert_text("}", offset).unwrap();
        indenter.text_inserted(&mut buffer, offset, 1);
        let once = buffer.text();

        // Fire the hook again on the same closer, wherever it moved to
        let offset = once.rfind('}').unwrap();
        indenter.text_inserted(&mut buffer, offset, 1);
        prop_assert_eq!(buffer.text(), once);
    }
}

// Property: monotonic nesting - each nesting level indents at least as far
// as the one enclosing it
proptest! {
    #[test]
    fn nesting_is_monotonic(depth in 1usize..6) {
        let mut text = String::new();
        for _ in 0..depth {
            text.push_str("if (x) {\n");
        }
        text.push_str("y = 1;\n");
        for _ in 0..depth {
            text.push_str("}\n");
        }
        let buffer = Buffer::from_text(&text);
        let mut indenter = NewLineIndenter::default();
        indenter.update_indent_list(&buffer);

        for line in 1..depth {
            prop_assert!(indenter.get_tabs(line) >= indenter.get_tabs(line - 1));
        }
        // The body line sits one unit deeper than the innermost opener
        prop_assert_eq!(indenter.get_tabs(depth), depth * 2);
    }
}

// Property: every keyword line of an else-if chain sits at the same level,
// no matter how long the chain gets
proptest! {
    #[test]
    fn else_if_chain_never_accumulates(links in 1usize..6) {
        let mut text = String::from("if (a) {\n  x = 1;\n}");
        for _ in 0..links {
            text.push_str(" else if (a) {\n  x = 1;\n}");
        }
        let buffer = Buffer::from_text(&text);
        let mut indenter = NewLineIndenter::default();
        indenter.update_indent_list(&buffer);

        for line in 0..buffer.line_count() {
            let expected = if buffer.line(line).trim_start().starts_with('x') { 2 } else { 0 };
            prop_assert_eq!(indenter.get_tabs(line), expected);
        }
    }
}

// Property: growing the buffer past the table's previous size never
// corrupts the values computed for unchanged lines
proptest! {
    #[test]
    fn table_growth_preserves_earlier_lines(extra in 1usize..200) {
        let base = "module m {\n  always {\n    y = 1;\n  }\n}";
        let buffer = Buffer::from_text(base);
        let mut indenter = NewLineIndenter::default();
        indenter.update_indent_list(&buffer);
        let before: Vec<usize> = (0..buffer.line_count()).map(|n| indenter.get_tabs(n)).collect();

        let grown = format!("{}{}", base, "\n".repeat(extra));
        indenter.update_indent_list(&Buffer::from_text(&grown));

        indenter.update_indent_list(&buffer);
        let after: Vec<usize> = (0..buffer.line_count()).map(|n| indenter.get_tabs(n)).collect();
        prop_assert_eq!(before, after);
    }
}

// Property: the newline hook always produces a terminator followed only by
// spaces, at any valid insertion point
proptest! {
    #[test]
    fn newline_rewrite_is_terminator_plus_spaces(
        text in "[a-z{}();\\n ]{0,60}",
        split in 0usize..61
    ) {
        let buffer = Buffer::from_text(&text);
        let offset = split.min(text.len());
        let mut indenter = NewLineIndenter::default();
        let mut event = InsertEvent { start: offset, end: offset, text: "\n".to_string() };
        indenter.verify_insert(&buffer, &mut event);
        prop_assert!(event.text.starts_with('\n'));
        prop_assert!(event.text[1..].chars().all(|c| c == ' '));
    }
}
