// src/indenter.rs - Edit-time triggers that keep typed lines indented
//
// Two hooks mirror the host editor's edit protocol. The pre-insertion hook
// rewrites an about-to-land newline so it arrives pre-indented; the
// post-insertion hook re-indents a line right after a closer or a label
// colon reveals its true level. No failure here may block the user's
// keystroke: errors are logged, the sink (if any) is told once, and the
// edit goes through unmodified.

use crate::buffer::HostBuffer;
use crate::config::IndentConfig;
use crate::engine::{IndentTable, compute_indents};
use crate::grammar::{lex, parse};
use crate::line_index::LineIndex;
use anyhow::{Context, Result};
use log::{debug, error};

/// A syntactically valid dummy statement spliced after a prospective newline
/// so the parser can complete the construct the user is still typing.
const PLACEHOLDER_STATEMENT: &str = "l;";

/// An about-to-be-applied insertion. The hook may rewrite `text` before the
/// host commits it.
#[derive(Debug)]
pub struct InsertEvent {
    /// Byte offset where the insertion starts.
    pub start: usize,
    /// Byte offset where the replaced range ends (equals `start` when
    /// nothing is selected).
    pub end: usize,
    pub text: String,
}

pub struct NewLineIndenter {
    tabs: IndentTable,
    line_index: LineIndex,
    config: IndentConfig,
    notify: Option<Box<dyn Fn(&str)>>,
}

impl NewLineIndenter {
    pub fn new(config: IndentConfig) -> Self {
        Self {
            tabs: IndentTable::new(),
            line_index: LineIndex::default(),
            config,
            notify: None,
        }
    }

    /// Install a sink for non-fatal, user-visible failure notices.
    pub fn set_notifier(&mut self, notify: impl Fn(&str) + 'static) {
        self.notify = Some(Box::new(notify));
    }

    /// Computed indent width for a line, for host rendering and queries.
    pub fn get_tabs(&self, line: usize) -> usize {
        self.tabs.get(line)
    }

    /// Force a full recomputation against the current buffer, e.g. on load.
    pub fn update_indent_list(&mut self, buffer: &impl HostBuffer) {
        if let Err(err) = self.update_indents(&buffer.text()) {
            self.report("Failed to compute the indent list", &err);
        }
    }

    /// Pre-insertion hook. Fires only when the host is about to insert a
    /// bare line terminator; rewrites it to `terminator + indent`.
    pub fn verify_insert(&mut self, buffer: &impl HostBuffer, event: &mut InsertEvent) {
        if event.text != "\n" && event.text != "\r\n" {
            return;
        }
        match self.indent_for_new_line(buffer, event) {
            Ok(width) => {
                debug!("pre-indenting new line to {} spaces", width);
                for _ in 0..width {
                    event.text.push(' ');
                }
            }
            // Leave the terminator untouched; typing must go through
            Err(err) => self.report("Failed to add indents to new line", &err),
        }
    }

    /// Post-insertion hook. Fires after every completed insertion; acts only
    /// on single characters outside bulk operations.
    pub fn text_inserted(&mut self, buffer: &mut impl HostBuffer, start: usize, length: usize) {
        if length != 1 || buffer.is_bulk_edit() {
            return;
        }
        let inserted = buffer.text_range(start, start + 1);
        let triggered = match inserted.as_str() {
            "}" | "]" | ")" | "/" => {
                let line = buffer.line(buffer.line_at_offset(start));
                matches!(line.trim(), "}" | "]" | ")" | "*/")
            }
            ":" => is_label_line(buffer.line(buffer.line_at_offset(start)).trim()),
            _ => false,
        };
        if triggered
            && let Err(err) = self.unindent(buffer, start)
        {
            self.report("Failed to re-indent closing line", &err);
        }
    }

    /// Recompute against the real buffer and rewrite the line's leading
    /// whitespace when its current width disagrees with the table.
    fn unindent(&mut self, buffer: &mut impl HostBuffer, start: usize) -> Result<()> {
        let text = buffer.text();
        self.update_indents(&text)?;

        let line_num = self.line_index.line_of(start);
        let width = self.tabs.get(line_num);
        let line = buffer.line(line_num);

        let (current_width, ws_bytes) = leading_width(&line);
        if width != current_width {
            let spaces = " ".repeat(width);
            buffer.replace_range(buffer.offset_at_line(line_num), ws_bytes, &spaces);
        }
        Ok(())
    }

    fn indent_for_new_line(
        &mut self,
        buffer: &impl HostBuffer,
        event: &InsertEvent,
    ) -> Result<usize> {
        let text = buffer.text();
        let head = text
            .get(..event.start)
            .context("insertion start is not a character boundary")?;
        let tail = text
            .get(event.end..)
            .context("insertion end is not a character boundary")?;

        // Hypothetical snapshot: the edit applied, plus a placeholder
        // statement so the construct being typed parses as complete
        let mut hypothetical =
            String::with_capacity(text.len() + event.text.len() + PLACEHOLDER_STATEMENT.len());
        hypothetical.push_str(head);
        hypothetical.push_str(&event.text);
        hypothetical.push_str(PLACEHOLDER_STATEMENT);
        hypothetical.push_str(tail);

        self.update_indents(&hypothetical)?;

        let line = self.line_index.line_of(event.start + event.text.len());
        Ok(self.tabs.get(line))
    }

    /// Rebuild every structure against one snapshot: line index, token
    /// stream, tree, and finally the table. The accumulator is threaded
    /// through explicitly, so a hypothetical-snapshot computation and a real
    /// one cannot interfere.
    fn update_indents(&mut self, text: &str) -> Result<()> {
        let tokens = lex(text);
        let tree = parse(&tokens);
        self.line_index = LineIndex::build(text);
        self.tabs.prepare(self.line_index.line_count());
        compute_indents(
            &tree,
            &tokens,
            text,
            &self.line_index,
            &self.config,
            &mut self.tabs,
        )
    }

    fn report(&self, message: &str, err: &anyhow::Error) {
        error!("{}: {:#}", message, err);
        if let Some(notify) = &self.notify {
            notify(message);
        }
    }
}

impl Default for NewLineIndenter {
    fn default() -> Self {
        Self::new(IndentConfig::default())
    }
}

/// Width of a line's leading whitespace (tab counts as 2) and the byte
/// length of that whitespace run.
fn leading_width(line: &str) -> (usize, usize) {
    let mut width = 0;
    let mut bytes = 0;
    for c in line.chars() {
        match c {
            ' ' => width += 1,
            '\t' => width += 2,
            _ => break,
        }
        bytes += 1;
    }
    (width, bytes)
}

/// A label line is a bare identifier (letters, digits, `_`, `.`) followed by
/// the just-typed colon, e.g. an FSM state label `state.IDLE:`.
fn is_label_line(trimmed: &str) -> bool {
    match trimmed.strip_suffix(':') {
        Some(name) => name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '.'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Buffer;

    fn type_newline(buffer: &mut Buffer, indenter: &mut NewLineIndenter, offset: usize) {
        let mut event = InsertEvent {
            start: offset,
            end: offset,
            text: "\n".to_string(),
        };
        indenter.verify_insert(buffer, &mut event);
        buffer.insert_text(&event.text, offset).unwrap();
    }

    fn type_char(buffer: &mut Buffer, indenter: &mut NewLineIndenter, offset: usize, c: char) {
        buffer.insert_text(&c.to_string(), offset).unwrap();
        indenter.text_inserted(buffer, offset, 1);
    }

    #[test]
    fn test_newline_after_open_brace_is_indented() {
        let mut buffer = Buffer::from_text("if (x) {\n");
        let mut indenter = NewLineIndenter::default();
        type_newline(&mut buffer, &mut indenter, 9);
        assert_eq!(buffer.text(), "if (x) {\n\n  ");
    }

    #[test]
    fn test_newline_hook_ignores_other_text() {
        let buffer = Buffer::from_text("a");
        let mut indenter = NewLineIndenter::default();
        let mut event = InsertEvent {
            start: 1,
            end: 1,
            text: "x".to_string(),
        };
        indenter.verify_insert(&buffer, &mut event);
        assert_eq!(event.text, "x");
    }

    #[test]
    fn test_crlf_terminator_supported() {
        let mut buffer = Buffer::from_text("always {\r\n");
        let mut indenter = NewLineIndenter::default();
        let mut event = InsertEvent {
            start: 10,
            end: 10,
            text: "\r\n".to_string(),
        };
        indenter.verify_insert(&buffer, &mut event);
        assert_eq!(event.text, "\r\n  ");
    }

    #[test]
    fn test_dedent_on_closing_brace() {
        // The editor has auto-indented the new line, then the user types '}'
        let mut buffer = Buffer::from_text("if (x) {\n  y = 1;\n  ");
        let mut indenter = NewLineIndenter::default();
        type_char(&mut buffer, &mut indenter, 20, '}');
        assert_eq!(buffer.text(), "if (x) {\n  y = 1;\n}");
    }

    #[test]
    fn test_dedent_on_comment_close() {
        let mut buffer = Buffer::from_text("/* note\n   text\n   *");
        let mut indenter = NewLineIndenter::default();
        type_char(&mut buffer, &mut indenter, 20, '/');
        assert_eq!(buffer.text(), "/* note\n   text\n*/");
    }

    #[test]
    fn test_dedent_on_label_colon() {
        let mut buffer = Buffer::from_text("case (s) {\n      s.IDLE");
        let mut indenter = NewLineIndenter::default();
        type_char(&mut buffer, &mut indenter, 23, ':');
        assert_eq!(buffer.text(), "case (s) {\n  s.IDLE:");
    }

    #[test]
    fn test_nonempty_line_not_reindented_by_closer() {
        let mut buffer = Buffer::from_text("if (x) {\n  y = 1;\n  z");
        let mut indenter = NewLineIndenter::default();
        type_char(&mut buffer, &mut indenter, 21, '}');
        // Line is not a bare closer, so it is left alone
        assert_eq!(buffer.text(), "if (x) {\n  y = 1;\n  z}");
    }

    #[test]
    fn test_bulk_edit_suppresses_reindent() {
        let mut buffer = Buffer::from_text("if (x) {\n  y = 1;\n  ");
        buffer.set_bulk_edit(true);
        let mut indenter = NewLineIndenter::default();
        type_char(&mut buffer, &mut indenter, 20, '}');
        assert_eq!(buffer.text(), "if (x) {\n  y = 1;\n  }");
    }

    #[test]
    fn test_label_line_detection() {
        assert!(is_label_line("state.IDLE:"));
        assert!(is_label_line("RUN:"));
        assert!(is_label_line(":"));
        assert!(!is_label_line("a + b:"));
        assert!(!is_label_line("foo"));
        assert!(!is_label_line("f(x):"));
    }

    #[test]
    fn test_leading_width_counts_tabs_as_two() {
        assert_eq!(leading_width("    x"), (4, 4));
        assert_eq!(leading_width("\t\tx"), (4, 2));
        assert_eq!(leading_width(" \t x"), (4, 3));
        assert_eq!(leading_width("x"), (0, 0));
    }
}
