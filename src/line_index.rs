// src/line_index.rs - Byte-offset to line-number mapping for a buffer snapshot

/// Line start offsets for one immutable snapshot of the buffer.
///
/// The index is rebuilt from scratch for every snapshot; there is no
/// incremental patching. `starts` holds one entry per line plus a
/// `usize::MAX` sentinel, and is strictly increasing.
#[derive(Debug, Clone)]
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    pub fn build(text: &str) -> Self {
        let mut starts = Vec::with_capacity(text.len() / 32 + 2);
        starts.push(0);
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                starts.push(i + 1);
            }
        }
        starts.push(usize::MAX);
        Self { starts }
    }

    pub fn line_count(&self) -> usize {
        self.starts.len() - 1
    }

    /// Line containing `offset`: the greatest `i` with `starts[i] <= offset`.
    /// Offsets past the end of the buffer map to the last line.
    pub fn line_of(&self, offset: usize) -> usize {
        self.starts.partition_point(|&s| s <= offset) - 1
    }

    pub fn offset_of_line(&self, line: usize) -> Option<usize> {
        if line < self.line_count() {
            Some(self.starts[line])
        } else {
            None
        }
    }
}

impl Default for LineIndex {
    fn default() -> Self {
        Self::build("")
    }
}
