// src/buffer.rs - Host editor contract and a ropey-backed implementation

use ropey::Rope;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BufferError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Rope error: {0}")]
    Rope(#[from] ropey::Error),
}

/// What the indenter needs from the hosting editor widget. All offsets are
/// byte offsets into the current buffer content; lines are 0-based.
pub trait HostBuffer {
    fn text(&self) -> String;
    fn text_range(&self, start: usize, end: usize) -> String;
    fn line_count(&self) -> usize;
    /// Line content without its trailing newline.
    fn line(&self, line: usize) -> String;
    fn offset_at_line(&self, line: usize) -> usize;
    fn line_at_offset(&self, offset: usize) -> usize;
    fn replace_range(&mut self, offset: usize, len: usize, new_text: &str);
    /// True while an undo/redo or other bulk operation is applying, so the
    /// indenter can suppress re-indentation feedback loops.
    fn is_bulk_edit(&self) -> bool;
}

pub struct Buffer {
    pub rope: Rope,
    pub file_path: Option<String>,
    pub modified: bool,
    pub version: usize,
    pub bulk_edit: bool,
}

impl Buffer {
    pub fn new() -> Self {
        Self {
            rope: Rope::from(""),
            file_path: None,
            modified: false,
            version: 0,
            bulk_edit: false,
        }
    }

    pub fn from_text(text: &str) -> Self {
        let mut buffer = Self::new();
        buffer.rope = Rope::from_str(text);
        buffer
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Buffer {
    pub fn insert_text(&mut self, text: &str, offset: usize) -> Result<(), BufferError> {
        let char_idx = self.rope.try_byte_to_char(offset)?;
        self.rope.insert(char_idx, text);
        self.modified = true;
        self.version += 1;
        Ok(())
    }

    pub fn delete_range(&mut self, start: usize, end: usize) -> Result<(), BufferError> {
        let char_start = self.rope.try_byte_to_char(start)?;
        let char_end = self.rope.try_byte_to_char(end)?;
        self.rope.remove(char_start..char_end);
        self.modified = true;
        self.version += 1;
        Ok(())
    }

    pub fn line_len(&self, line_idx: usize) -> usize {
        if line_idx < self.rope.len_lines() {
            self.rope.line(line_idx).len_chars()
        } else {
            0
        }
    }

    /// Mark the start/end of a bulk operation (undo/redo replay). While set,
    /// post-insertion re-indent triggers are suppressed.
    pub fn set_bulk_edit(&mut self, active: bool) {
        self.bulk_edit = active;
    }

    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), BufferError> {
        let content = fs::read_to_string(path.as_ref())?;
        self.rope = Rope::from_str(&content);
        self.file_path = Some(path.as_ref().to_string_lossy().to_string());
        self.modified = false;
        self.version = 0;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), BufferError> {
        fs::write(path.as_ref(), self.rope.to_string())?;
        self.file_path = Some(path.as_ref().to_string_lossy().to_string());
        self.modified = false;
        Ok(())
    }
}

impl HostBuffer for Buffer {
    fn text(&self) -> String {
        self.rope.to_string()
    }

    fn text_range(&self, start: usize, end: usize) -> String {
        let char_start = self.rope.byte_to_char(start.min(self.rope.len_bytes()));
        let char_end = self.rope.byte_to_char(end.min(self.rope.len_bytes()));
        self.rope.slice(char_start..char_end).to_string()
    }

    fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    fn line(&self, line: usize) -> String {
        if line >= self.rope.len_lines() {
            return String::new();
        }
        let content = self.rope.line(line).to_string();
        content
            .trim_end_matches('\n')
            .trim_end_matches('\r')
            .to_string()
    }

    fn offset_at_line(&self, line: usize) -> usize {
        let line = line.min(self.rope.len_lines());
        self.rope.char_to_byte(self.rope.line_to_char(line))
    }

    fn line_at_offset(&self, offset: usize) -> usize {
        self.rope.byte_to_line(offset.min(self.rope.len_bytes()))
    }

    fn replace_range(&mut self, offset: usize, len: usize, new_text: &str) {
        let char_start = self.rope.byte_to_char(offset.min(self.rope.len_bytes()));
        let end = (offset + len).min(self.rope.len_bytes());
        let char_end = self.rope.byte_to_char(end);
        self.rope.remove(char_start..char_end);
        self.rope.insert(char_start, new_text);
        self.modified = true;
        self.version += 1;
    }

    fn is_bulk_edit(&self) -> bool {
        self.bulk_edit
    }
}

#[test]
fn test_insert_and_line_queries() {
    let mut buffer = Buffer::new();
    buffer.insert_text("always {\n}", 0).unwrap();
    assert_eq!(buffer.line_count(), 2);
    assert_eq!(buffer.line(0), "always {");
    assert_eq!(buffer.line(1), "}");
    assert_eq!(buffer.offset_at_line(1), 9);
    assert_eq!(buffer.line_at_offset(9), 1);
    assert!(buffer.modified);
}

#[test]
fn test_replace_range() {
    let mut buffer = Buffer::from_text("  }");
    buffer.replace_range(0, 2, "");
    assert_eq!(buffer.text(), "}");
    buffer.replace_range(0, 0, "    ");
    assert_eq!(buffer.text(), "    }");
}

#[test]
fn test_load_and_save() {
    use tempfile::NamedTempFile;
    let temp_file = NamedTempFile::new().unwrap();
    fs::write(temp_file.path(), "module m {\n}").unwrap();

    let mut buffer = Buffer::new();
    buffer.load_from_file(temp_file.path()).unwrap();
    assert_eq!(buffer.line_count(), 2);
    assert_eq!(buffer.line(0), "module m {");

    let save_file = NamedTempFile::new().unwrap();
    buffer.save_to_file(save_file.path()).unwrap();
    let content = fs::read_to_string(save_file.path()).unwrap();
    assert_eq!(content, "module m {\n}");
}

#[test]
fn test_bulk_edit_flag() {
    let mut buffer = Buffer::new();
    assert!(!buffer.is_bulk_edit());
    buffer.set_bulk_edit(true);
    assert!(buffer.is_bulk_edit());
}
