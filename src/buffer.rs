// src/buffer.rs - The document: an ordered run sequence with global indexing

use crate::formatting::{FormatKind, Formatting};
use crate::margin::{MarginSide, Margins};
use crate::run::{Run, byte_offset, find_offsets};
use crate::store::SnapshotStore;
use log::debug;

#[derive(thiserror::Error, Debug)]
pub enum DocumentError {
    #[error("index {index} out of range for document of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("invalid range: start {start} is past end {end}")]
    InvalidRange { start: usize, end: usize },
    #[error("no saved document named '{name}'")]
    NotFound { name: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The whole document. Run contents concatenated in order form the plain
/// text; every global index is a char offset into that concatenation.
///
/// Invariants re-established after every mutation: runs partition
/// `[0, total_len)` with inclusive `start_index`/`end_index` and no gaps,
/// and no two adjacent runs share identical formatting.
pub struct Buffer {
    runs: Vec<Run>,
    next_id: u64,
    pub margins: Margins,
    version: u64,
}

impl Buffer {
    pub fn new() -> Self {
        let mut buffer = Self {
            runs: Vec::new(),
            next_id: 0,
            margins: Margins::default(),
            version: 0,
        };
        buffer.seed_empty_run();
        buffer
    }

    fn fresh_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn seed_empty_run(&mut self) {
        let id = self.fresh_id();
        self.runs.push(Run::new(id, String::new(), Formatting::default()));
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    pub fn total_len(&self) -> usize {
        self.runs.iter().map(Run::char_len).sum()
    }

    /// Concatenation of all run contents: the coordinate space for every
    /// global-index operation.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.content.as_str()).collect()
    }

    /// Formatting in effect at a global char offset.
    pub fn formatting_at(&self, index: usize) -> Option<Formatting> {
        self.locate(index).map(|i| self.runs[i].formatting)
    }

    /// Run containing `index`, using inclusive run bounds.
    fn locate(&self, index: usize) -> Option<usize> {
        self.runs
            .iter()
            .position(|r| r.start_index <= index && index <= r.end_index)
    }

    /// Run that accepts an insertion at `index`. The `end_index + 1` slack
    /// lets an insertion land at the end of a run.
    fn locate_for_insert(&self, index: usize) -> Option<usize> {
        self.runs
            .iter()
            .position(|r| r.start_index <= index && index <= r.end_index + 1)
    }

    pub fn insert_at_index(&mut self, text: &str, global_index: usize) -> Result<(), DocumentError> {
        if self.runs.is_empty() {
            self.seed_empty_run();
            self.recalculate_indices();
        }
        let total = self.total_len();
        let (run_idx, local) = if global_index >= total {
            // Past-the-end insertions clamp to the end of the last run
            let last = self.runs.len() - 1;
            (last, self.runs[last].char_len())
        } else {
            let idx = self
                .locate_for_insert(global_index)
                .ok_or(DocumentError::IndexOutOfRange {
                    index: global_index,
                    len: total,
                })?;
            (idx, global_index - self.runs[idx].start_index)
        };
        self.runs[run_idx].insert(text, local);
        self.join_runs();
        self.recalculate_indices();
        self.bump_version();
        Ok(())
    }

    /// Delete the inclusive global char range `[start, end]`.
    pub fn delete_range(&mut self, start: usize, end: usize) -> Result<(), DocumentError> {
        if start > end {
            return Err(DocumentError::InvalidRange { start, end });
        }
        let total = self.total_len();
        if end >= total {
            return Err(DocumentError::IndexOutOfRange {
                index: end,
                len: total,
            });
        }
        let first = self
            .locate(start)
            .ok_or(DocumentError::IndexOutOfRange {
                index: start,
                len: total,
            })?;
        let last = self
            .locate(end)
            .ok_or(DocumentError::IndexOutOfRange { index: end, len: total })?;
        if first == last {
            let run = &mut self.runs[first];
            let local_start = start - run.start_index;
            let local_end = end - run.start_index + 1;
            run.delete(local_start, local_end);
        } else {
            let run = &mut self.runs[first];
            let local_start = start - run.start_index;
            let len = run.char_len();
            run.delete(local_start, len);
            let run = &mut self.runs[last];
            let local_end = end - run.start_index + 1;
            run.delete(0, local_end);
            self.runs.drain(first + 1..last);
        }
        self.join_runs();
        self.recalculate_indices();
        self.bump_version();
        Ok(())
    }

    /// Toggle `kind` over the inclusive global char range `[start, end]`.
    /// Each overlapping run is split three ways: the clipped portion becomes
    /// a new run with the toggle applied, the untouched prefix and suffix
    /// keep their formatting, and empty fragments are dropped.
    pub fn switch_formatting(
        &mut self,
        start: usize,
        end: usize,
        kind: FormatKind,
    ) -> Result<(), DocumentError> {
        if start > end {
            return Err(DocumentError::InvalidRange { start, end });
        }
        let total = self.total_len();
        if end >= total {
            return Err(DocumentError::IndexOutOfRange {
                index: end,
                len: total,
            });
        }
        let old = std::mem::take(&mut self.runs);
        let mut rebuilt = Vec::with_capacity(old.len() + 2);
        for run in old {
            if run.end_index < start || run.start_index > end {
                rebuilt.push(run);
                continue;
            }
            let clip_start = start.max(run.start_index) - run.start_index;
            let clip_end = end.min(run.end_index) - run.start_index;
            let (before, middle, after) = run.split_content(clip_start, clip_end);
            let base = run.formatting;
            let middle_id = if before.is_empty() {
                run.id
            } else {
                rebuilt.push(Run::new(run.id, before, base));
                self.fresh_id()
            };
            // The clipped portion is never empty: the range overlaps the run
            let mut middle_run = Run::new(middle_id, middle, base);
            middle_run.toggle_formatting(kind);
            rebuilt.push(middle_run);
            if !after.is_empty() {
                let id = self.fresh_id();
                rebuilt.push(Run::new(id, after, base));
            }
        }
        self.runs = rebuilt;
        self.join_runs();
        self.recalculate_indices();
        self.bump_version();
        Ok(())
    }

    /// Non-overlapping occurrences of `needle` in the flattened text,
    /// restricted to the inclusive window `[search_start, search_end]`
    /// (`None` means end of document). Results are inclusive
    /// `(match_start, match_end)` global char offsets.
    pub fn find_in_body(
        &self,
        needle: &str,
        search_start: usize,
        search_end: Option<usize>,
    ) -> Vec<(usize, usize)> {
        if needle.is_empty() {
            return Vec::new();
        }
        let text = self.plain_text();
        let total = text.chars().count();
        if total == 0 || search_start >= total {
            return Vec::new();
        }
        let end = search_end.map_or(total - 1, |e| e.min(total - 1));
        if search_start > end {
            return Vec::new();
        }
        let needle_len = needle.chars().count();
        let window_start = byte_offset(&text, search_start);
        let window_end = byte_offset(&text, end + 1);
        find_offsets(&text[window_start..window_end], needle)
            .into_iter()
            .map(|off| {
                let at = search_start + off;
                (at, at + needle_len - 1)
            })
            .collect()
    }

    /// HTML projection of the whole document, wrapped in a container that
    /// carries the margins as a padding directive.
    pub fn render(&self) -> String {
        let mut body = String::new();
        for run in &self.runs {
            body.push_str(&run.render());
        }
        format!(
            "<div style=\"padding: {}cm {}cm {}cm {}cm\">{}</div>",
            self.margins.top_cm, self.margins.right_cm, self.margins.bottom_cm, self.margins.left_cm, body
        )
    }

    pub fn set_margin(&mut self, side: MarginSide, value_mm: f64) {
        self.margins.set(side, value_mm);
        self.bump_version();
    }

    pub fn save(&mut self, store: &SnapshotStore, name: &str) -> Result<(), DocumentError> {
        self.join_runs();
        self.recalculate_indices();
        store.save(name, &self.runs)?;
        self.join_runs();
        self.recalculate_indices();
        Ok(())
    }

    /// Replace the run sequence with a persisted snapshot. Indices are
    /// recomputed from content rather than trusted, and `next_id` resumes
    /// past the highest persisted id. The version keeps counting up.
    pub fn load(&mut self, store: &SnapshotStore, name: &str) -> Result<(), DocumentError> {
        let runs = store.load(name)?;
        self.runs = runs;
        self.next_id = self.runs.iter().map(|r| r.id + 1).max().unwrap_or(0);
        self.join_runs();
        self.recalculate_indices();
        self.bump_version();
        Ok(())
    }

    /// Coalesce: drop empty runs, then scan backward merging every adjacent
    /// pair with identical formatting. An emptied document is reseeded with
    /// a single empty run.
    fn join_runs(&mut self) {
        self.runs.retain(|r| !r.content.is_empty());
        let mut i = self.runs.len();
        while i > 1 {
            i -= 1;
            if self.runs[i - 1].can_merge_with(&self.runs[i]) {
                let later = self.runs.remove(i);
                self.runs[i - 1].merge(later);
            }
        }
        if self.runs.is_empty() {
            self.seed_empty_run();
        }
    }

    /// Forward pass assigning each run its inclusive char range.
    fn recalculate_indices(&mut self) {
        let mut offset = 0;
        for run in &mut self.runs {
            let len = run.char_len();
            run.start_index = offset;
            run.end_index = (offset + len).saturating_sub(1);
            offset += len;
        }
    }

    fn bump_version(&mut self) {
        self.version += 1;
        debug!("document version is now {}", self.version);
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

#[test]
fn test_insert_into_empty_document() {
    let mut buffer = Buffer::new();
    buffer.insert_at_index("Hello", 0).unwrap();
    assert_eq!(buffer.plain_text(), "Hello");
    assert_eq!(buffer.runs().len(), 1);
    assert_eq!(buffer.runs()[0].start_index, 0);
    assert_eq!(buffer.runs()[0].end_index, 4);
}

#[test]
fn test_insert_past_end_clamps() {
    let mut buffer = Buffer::new();
    buffer.insert_at_index("Hello", 0).unwrap();
    buffer.insert_at_index("!", 999).unwrap();
    assert_eq!(buffer.plain_text(), "Hello!");
}

#[test]
fn test_bold_switch_splits_into_two_runs() {
    let mut buffer = Buffer::new();
    buffer.insert_at_index("Hello world", 0).unwrap();
    buffer.switch_formatting(0, 4, FormatKind::Bold).unwrap();
    let runs = buffer.runs();
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].content, "Hello");
    assert!(runs[0].formatting.bold);
    assert_eq!((runs[0].start_index, runs[0].end_index), (0, 4));
    assert_eq!(runs[1].content, " world");
    assert!(!runs[1].formatting.bold);
    assert_eq!((runs[1].start_index, runs[1].end_index), (5, 10));
}

#[test]
fn test_switch_in_run_interior_splits_three_ways() {
    let mut buffer = Buffer::new();
    buffer.insert_at_index("Hello world", 0).unwrap();
    buffer.switch_formatting(3, 7, FormatKind::Italic).unwrap();
    let runs = buffer.runs();
    assert_eq!(runs.len(), 3);
    assert_eq!(runs[0].content, "Hel");
    assert_eq!(runs[1].content, "lo wo");
    assert!(runs[1].formatting.italic);
    assert_eq!(runs[2].content, "rld");
    assert_eq!(buffer.plain_text(), "Hello world");
}

#[test]
fn test_delete_spanning_multiple_runs() {
    let mut buffer = Buffer::new();
    buffer.insert_at_index("Hello world", 0).unwrap();
    buffer.switch_formatting(3, 7, FormatKind::Bold).unwrap();
    buffer.delete_range(1, 9).unwrap();
    assert_eq!(buffer.plain_text(), "Hd");
    // The survivors share formatting, so they re-coalesce
    assert_eq!(buffer.runs().len(), 1);
}

#[test]
fn test_delete_everything_reseeds_empty_run() {
    let mut buffer = Buffer::new();
    buffer.insert_at_index("abc", 0).unwrap();
    buffer.delete_range(0, 2).unwrap();
    assert_eq!(buffer.plain_text(), "");
    assert_eq!(buffer.runs().len(), 1);
    buffer.insert_at_index("xyz", 0).unwrap();
    assert_eq!(buffer.plain_text(), "xyz");
}

#[test]
fn test_delete_reversed_range_is_an_error() {
    let mut buffer = Buffer::new();
    buffer.insert_at_index("abc", 0).unwrap();
    let version = buffer.version();
    assert!(matches!(
        buffer.delete_range(2, 1),
        Err(DocumentError::InvalidRange { start: 2, end: 1 })
    ));
    assert_eq!(buffer.version(), version);
    assert_eq!(buffer.plain_text(), "abc");
}

#[test]
fn test_switch_out_of_bounds_leaves_buffer_untouched() {
    let mut buffer = Buffer::new();
    buffer.insert_at_index("abc", 0).unwrap();
    let version = buffer.version();
    assert!(matches!(
        buffer.switch_formatting(0, 3, FormatKind::Bold),
        Err(DocumentError::IndexOutOfRange { .. })
    ));
    assert_eq!(buffer.version(), version);
    assert_eq!(buffer.runs().len(), 1);
    assert!(!buffer.runs()[0].formatting.bold);
}

#[test]
fn test_find_in_body_window() {
    let mut buffer = Buffer::new();
    buffer.insert_at_index("ababab", 0).unwrap();
    assert_eq!(
        buffer.find_in_body("ab", 0, None),
        vec![(0, 1), (2, 3), (4, 5)]
    );
    assert_eq!(buffer.find_in_body("ab", 1, None), vec![(2, 3), (4, 5)]);
    assert_eq!(buffer.find_in_body("ab", 0, Some(2)), vec![(0, 1)]);
    assert!(buffer.find_in_body("", 0, None).is_empty());
}

#[test]
fn test_find_spans_run_boundaries() {
    let mut buffer = Buffer::new();
    buffer.insert_at_index("Hello world", 0).unwrap();
    buffer.switch_formatting(0, 4, FormatKind::Bold).unwrap();
    // "o w" straddles the bold/plain boundary
    assert_eq!(buffer.find_in_body("o w", 0, None), vec![(4, 6)]);
}

#[test]
fn test_render_carries_margins() {
    let mut buffer = Buffer::new();
    buffer.insert_at_index("hi", 0).unwrap();
    buffer.set_margin(MarginSide::Top, 20.0);
    buffer.set_margin(MarginSide::Left, 15.0);
    assert_eq!(
        buffer.render(),
        "<div style=\"padding: 2cm 0cm 0cm 1.5cm\">hi</div>"
    );
}

#[test]
fn test_margin_change_bumps_version() {
    let mut buffer = Buffer::new();
    let version = buffer.version();
    buffer.set_margin(MarginSide::Bottom, 10.0);
    assert_eq!(buffer.version(), version + 1);
}

#[test]
fn test_insert_at_run_boundary_appends_to_earlier_run() {
    let mut buffer = Buffer::new();
    buffer.insert_at_index("ab", 0).unwrap();
    buffer.switch_formatting(0, 0, FormatKind::Bold).unwrap();
    // Index 1 is both the end of the bold run and the start of the plain one
    buffer.insert_at_index("X", 1).unwrap();
    assert_eq!(buffer.plain_text(), "aXb");
    assert!(buffer.formatting_at(1).unwrap().bold);
}
