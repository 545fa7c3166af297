//! Single-line text editor used by the settings modal fields.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// A text buffer with a grapheme-aware cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    graphemes: Vec<String>,
    /// Cursor position in graphemes (0..=len)
    cursor: usize,
}

impl TextField {
    pub fn new(initial: &str) -> Self {
        let graphemes: Vec<String> = initial.graphemes(true).map(String::from).collect();
        let cursor = graphemes.len();
        TextField { graphemes, cursor }
    }

    pub fn value(&self) -> String {
        self.graphemes.concat()
    }

    pub fn is_empty(&self) -> bool {
        self.graphemes.is_empty()
    }

    pub fn insert(&mut self, c: char) {
        self.graphemes.insert(self.cursor, c.to_string());
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.graphemes.remove(self.cursor);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.graphemes.len() {
            self.graphemes.remove(self.cursor);
        }
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.graphemes.len());
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.graphemes.len();
    }

    /// Display column of the cursor, accounting for wide graphemes.
    pub fn cursor_col(&self) -> usize {
        self.graphemes[..self.cursor]
            .iter()
            .map(|g| g.width())
            .sum()
    }
}
