// src/engine.rs - Indent table and the per-construct indent rules

use crate::config::IndentConfig;
use crate::grammar::{Node, NodeKind, Token, TokenKind};
use crate::line_index::LineIndex;
use anyhow::{Context, Result};

/// Per-line cumulative indent widths, in spaces.
///
/// The table is overwritten in place on every recomputation and only ever
/// grows; trailing entries left over from a longer buffer are stale but
/// unreachable once the valid prefix is rewritten.
#[derive(Debug, Default)]
pub struct IndentTable {
    widths: Vec<usize>,
    lines: usize,
}

impl IndentTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero the first `line_count` entries, growing when needed. Never
    /// shrinks the backing storage.
    pub fn prepare(&mut self, line_count: usize) {
        if self.widths.len() < line_count {
            self.widths.resize(line_count, 0);
        }
        for w in &mut self.widths[..line_count] {
            *w = 0;
        }
        self.lines = line_count;
    }

    pub fn get(&self, line: usize) -> usize {
        if line < self.lines {
            self.widths[line]
        } else {
            0
        }
    }

    /// The core primitive: add `width` to every line strictly after `first`,
    /// up to and including `last`.
    fn add_span(&mut self, first: usize, last: usize, width: usize) {
        for line in first + 1..=last.min(self.lines.saturating_sub(1)) {
            self.widths[line] += width;
        }
    }
}

/// Walk `tree` bottom-up and accumulate indent contributions into `table`.
/// The table must already be prepared for the snapshot's line count.
pub fn compute_indents(
    tree: &Node,
    tokens: &[Token],
    text: &str,
    line_index: &LineIndex,
    config: &IndentConfig,
    table: &mut IndentTable,
) -> Result<()> {
    let engine = Engine {
        tokens,
        text,
        line_index,
        config,
    };
    engine.walk(tree, NodeKind::Source, table)
}

struct Engine<'a> {
    tokens: &'a [Token],
    text: &'a str,
    line_index: &'a LineIndex,
    config: &'a IndentConfig,
}

fn is_body_kind(kind: NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Braced | NodeKind::Statement | NodeKind::AlwaysLine
    )
}

impl Engine<'_> {
    /// 0-based line of a token.
    fn line(&self, token_idx: usize) -> Result<usize> {
        let token = self
            .tokens
            .get(token_idx)
            .context("token index out of range")?;
        Ok(token.line - 1)
    }

    fn walk(&self, node: &Node, parent: NodeKind, table: &mut IndentTable) -> Result<()> {
        for child in &node.children {
            self.walk(child, node.kind, table)?;
        }
        self.apply(node, parent, table)
    }

    fn apply(&self, node: &Node, parent: NodeKind, table: &mut IndentTable) -> Result<()> {
        match node.kind {
            NodeKind::Module => self.module_rule(node, table),
            NodeKind::AlwaysLine => self.always_rule(node, table),
            NodeKind::ElseBlock => self.else_rule(node, table),
            NodeKind::Comment => self.comment_rule(node, table),
            NodeKind::Elem => self.span_to_end(&node.children, 0, table),
            // Groups are never construct bodies, so they always take the
            // generic rule (multi-line conditions, port lists, subscripts)
            NodeKind::Group => self.span(&node.children, 0, table),
            // A block or statement serving as an always/else body is
            // indented by its owner, not here.
            NodeKind::Braced | NodeKind::Statement
                if !matches!(parent, NodeKind::AlwaysLine | NodeKind::ElseBlock) =>
            {
                self.span(&node.children, 0, table)
            }
            _ => Ok(()),
        }
    }

    /// Indent the range covered by `children`, excluding the first line.
    /// When the last child's end line overshoots the second-to-last child's,
    /// the final line holds nothing but a trailing delimiter and is left at
    /// the enclosing level.
    fn span(&self, children: &[Node], exclude: usize, table: &mut IndentTable) -> Result<()> {
        if children.len() <= 2 + exclude {
            return Ok(());
        }
        let start = self.line(children[0].first)?;
        let end = self.line(children[children.len() - 1 - exclude].last)?;
        let end2 = self.line(children[children.len() - 2 - exclude].last)?;
        if end > end2 {
            table.add_span(start, end.saturating_sub(1), self.config.indent_width);
        } else {
            table.add_span(start, end, self.config.indent_width);
        }
        Ok(())
    }

    /// Trailing-boundary rule: indent through the last line, no tie-break.
    fn span_to_end(
        &self,
        children: &[Node],
        exclude: usize,
        table: &mut IndentTable,
    ) -> Result<()> {
        if children.len() <= 1 + exclude {
            return Ok(());
        }
        let start = self.line(children[0].first)?;
        let end = self.line(children[children.len() - 1 - exclude].last)?;
        table.add_span(start, end, self.config.indent_width);
        Ok(())
    }

    /// Module header continuation: the lines between the `module` keyword
    /// and the body's opening brace, inclusive, get one level. The body
    /// itself is covered by the generic rule on the body block.
    fn module_rule(&self, node: &Node, table: &mut IndentTable) -> Result<()> {
        let Some(body) = node.children.iter().find(|c| c.kind == NodeKind::Braced) else {
            return Ok(());
        };
        let start = self.line(node.first)?;
        let open = self.line(body.first)?;
        table.add_span(start, open, self.config.indent_width);
        Ok(())
    }

    fn body_of<'n>(&self, node: &'n Node) -> Option<&'n Node> {
        node.children.iter().find(|c| is_body_kind(c.kind))
    }

    fn always_rule(&self, node: &Node, table: &mut IndentTable) -> Result<()> {
        let exclude = match node.children.last() {
            Some(c) if c.kind == NodeKind::ElseBlock => 1,
            _ => 0,
        };
        match self.body_of(node) {
            // Braced body: indent the block's own children, which leaves the
            // brace lines at the construct's level
            Some(body) if body.kind == NodeKind::Braced => self.span(&body.children, 0, table),
            // Single statement or chained always: indent through the end of
            // the body, minus any trailing else clause
            Some(_) => self.span_to_end(&node.children, exclude, table),
            None => self.span(&node.children, 0, table),
        }
    }

    fn else_rule(&self, node: &Node, table: &mut IndentTable) -> Result<()> {
        let body = self.body_of(node);
        if let Some(b) = body
            && b.kind == NodeKind::AlwaysLine
            && self.tokens.get(b.first).map(|t| t.kind) == Some(TokenKind::If)
        {
            // else-if chain: the chained if continues at the same level
            return Ok(());
        }
        match body {
            Some(b) if b.kind == NodeKind::Braced => self.span(&b.children, 0, table),
            Some(_) => self.span_to_end(&node.children, 0, table),
            None => self.span(&node.children, 0, table),
        }
    }

    /// Comments indent at the heavier comment width, from the opening line
    /// through the line of the last non-whitespace character before `*/`.
    fn comment_rule(&self, node: &Node, table: &mut IndentTable) -> Result<()> {
        let token = self
            .tokens
            .get(node.first)
            .context("comment token out of range")?;
        let start = token.line - 1;
        let bytes = self.text.as_bytes();
        // Step over the closing "*/" and any trailing blank space
        let mut idx = token.stop.saturating_sub(2).max(token.start);
        while idx > token.start && bytes[idx].is_ascii_whitespace() {
            idx -= 1;
        }
        let end = self.line_index.line_of(idx);
        table.add_span(start, end, self.config.comment_indent_width);
        Ok(())
    }
}
