// src/run.rs - A run: a contiguous text fragment with uniform formatting

use crate::formatting::{FormatKind, Formatting, Hierarchy};

/// One fragment of document text. Content is owned, formatting applies to the
/// whole fragment, and `start_index`/`end_index` are inclusive char offsets
/// into the whole document, recomputed by the buffer after every edit.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub id: u64,
    pub content: String,
    pub formatting: Formatting,
    pub start_index: usize,
    pub end_index: usize,
}

/// Byte offset of the char at `char_idx`, or the string length when the index
/// points one past the end.
pub(crate) fn byte_offset(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(byte, _)| byte)
        .unwrap_or(s.len())
}

/// Char offsets of every non-overlapping occurrence of `needle`, scanning
/// left to right and resuming after each match.
pub(crate) fn find_offsets(haystack: &str, needle: &str) -> Vec<usize> {
    let mut offsets = Vec::new();
    if needle.is_empty() {
        return offsets;
    }
    let needle_chars = needle.chars().count();
    let mut byte = 0;
    let mut chars_before = 0;
    while let Some(rel) = haystack[byte..].find(needle) {
        chars_before += haystack[byte..byte + rel].chars().count();
        offsets.push(chars_before);
        chars_before += needle_chars;
        byte += rel + needle.len();
    }
    offsets
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '\n' => out.push_str("<br>"),
            _ => out.push(ch),
        }
    }
    out
}

impl Run {
    pub fn new(id: u64, content: String, formatting: Formatting) -> Self {
        Self {
            id,
            content,
            formatting,
            start_index: 0,
            end_index: 0,
        }
    }

    /// Length in chars, the unit of every document index.
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    /// Splice `text` into the content at a run-local char offset. The caller
    /// guarantees `local_index <= char_len()`.
    pub fn insert(&mut self, text: &str, local_index: usize) {
        let byte = byte_offset(&self.content, local_index);
        self.content.insert_str(byte, text);
    }

    /// Remove the half-open local char range `[local_start, local_end)`. The
    /// caller guarantees the bounds are valid for the current content.
    pub fn delete(&mut self, local_start: usize, local_end: usize) {
        let start = byte_offset(&self.content, local_start);
        let end = byte_offset(&self.content, local_end);
        self.content.replace_range(start..end, "");
    }

    /// Split the content around the inclusive local char range
    /// `[local_start, local_end]`, returning (before, clipped, after).
    pub fn split_content(&self, local_start: usize, local_end: usize) -> (String, String, String) {
        let start = byte_offset(&self.content, local_start);
        let end = byte_offset(&self.content, local_end + 1);
        (
            self.content[..start].to_string(),
            self.content[start..end].to_string(),
            self.content[end..].to_string(),
        )
    }

    /// Flip `kind` on this run's formatting.
    pub fn toggle_formatting(&mut self, kind: FormatKind) {
        self.formatting.toggle(kind);
    }

    /// Local char offsets of every non-overlapping occurrence of `needle`.
    pub fn find(&self, needle: &str) -> Vec<usize> {
        find_offsets(&self.content, needle)
    }

    /// Two runs may merge only when every formatting field matches.
    pub fn can_merge_with(&self, other: &Run) -> bool {
        self.formatting == other.formatting
    }

    /// Append the later run's content. Callers check `can_merge_with` first.
    pub fn merge(&mut self, later: Run) {
        self.content.push_str(&later.content);
    }

    /// HTML projection: escaped content wrapped bold -> italic -> sub/sup,
    /// with the hierarchy tag outermost when present.
    pub fn render(&self) -> String {
        let mut text = escape_html(&self.content);
        if self.formatting.bold {
            text = format!("<b>{}</b>", text);
        }
        if self.formatting.italic {
            text = format!("<i>{}</i>", text);
        }
        if self.formatting.subscript {
            text = format!("<sub>{}</sub>", text);
        }
        if self.formatting.superscript {
            text = format!("<sup>{}</sup>", text);
        }
        match self.formatting.hierarchy {
            Hierarchy::Body => {}
            Hierarchy::Title => text = format!("<h1>{}</h1>", text),
            Hierarchy::Heading => text = format!("<h2>{}</h2>", text),
            Hierarchy::Subheading => text = format!("<h3>{}</h3>", text),
        }
        text
    }
}

#[test]
fn test_insert_at_local_offset() {
    let mut run = Run::new(0, "Helo".to_string(), Formatting::default());
    run.insert("l", 2);
    assert_eq!(run.content, "Hello");
    run.insert("!", 5);
    assert_eq!(run.content, "Hello!");
}

#[test]
fn test_delete_half_open_range() {
    let mut run = Run::new(0, "Hello world".to_string(), Formatting::default());
    run.delete(5, 11);
    assert_eq!(run.content, "Hello");
    run.delete(0, 0);
    assert_eq!(run.content, "Hello");
}

#[test]
fn test_find_skips_overlapping_occurrences() {
    let run = Run::new(0, "ababab".to_string(), Formatting::default());
    assert_eq!(run.find("ab"), vec![0, 2, 4]);
    let run = Run::new(0, "aaaa".to_string(), Formatting::default());
    assert_eq!(run.find("aa"), vec![0, 2]);
}

#[test]
fn test_find_empty_needle_yields_nothing() {
    let run = Run::new(0, "abc".to_string(), Formatting::default());
    assert!(run.find("").is_empty());
}

#[test]
fn test_find_is_char_indexed() {
    let run = Run::new(0, "héllo héllo".to_string(), Formatting::default());
    assert_eq!(run.find("héllo"), vec![0, 6]);
}

#[test]
fn test_split_content_three_ways() {
    let run = Run::new(0, "Hello world".to_string(), Formatting::default());
    let (before, middle, after) = run.split_content(0, 4);
    assert_eq!(before, "");
    assert_eq!(middle, "Hello");
    assert_eq!(after, " world");
    let (before, middle, after) = run.split_content(6, 10);
    assert_eq!((before.as_str(), middle.as_str(), after.as_str()), ("Hello ", "world", ""));
}

#[test]
fn test_render_nests_tags_in_fixed_order() {
    let mut formatting = Formatting::default();
    formatting.bold = true;
    formatting.italic = true;
    formatting.subscript = true;
    let run = Run::new(0, "x".to_string(), formatting);
    assert_eq!(run.render(), "<sub><i><b>x</b></i></sub>");
}

#[test]
fn test_render_hierarchy_wraps_outermost() {
    let mut formatting = Formatting::default();
    formatting.bold = true;
    formatting.hierarchy = Hierarchy::Title;
    let run = Run::new(0, "Intro".to_string(), formatting);
    assert_eq!(run.render(), "<h1><b>Intro</b></h1>");
}

#[test]
fn test_render_escapes_markup() {
    let run = Run::new(0, "a < b & c\nd".to_string(), Formatting::default());
    assert_eq!(run.render(), "a &lt; b &amp; c<br>d");
}

#[test]
fn test_merge_appends_content() {
    let mut first = Run::new(0, "Hello ".to_string(), Formatting::default());
    let second = Run::new(1, "world".to_string(), Formatting::default());
    assert!(first.can_merge_with(&second));
    first.merge(second);
    assert_eq!(first.content, "Hello world");
}

#[test]
fn test_can_merge_requires_identical_formatting() {
    let plain = Run::new(0, "a".to_string(), Formatting::default());
    let mut bold = Formatting::default();
    bold.bold = true;
    let bolded = Run::new(1, "b".to_string(), bold);
    assert!(!plain.can_merge_with(&bolded));
}
