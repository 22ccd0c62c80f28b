// tests/document_model_test.rs - Scenario tests for the run/buffer model

mod common;

use drafty::buffer::{Buffer, DocumentError};
use drafty::formatting::{FormatKind, Hierarchy};

#[test]
fn test_hello_world_bold_split() {
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
    common::assert_partition_invariant(&buffer);
}

#[test]
fn test_find_is_a_non_overlapping_scan() {
    let mut buffer = Buffer::new();
    buffer.insert_at_index("ababab", 0).unwrap();
    assert_eq!(
        buffer.find_in_body("ab", 0, None),
        vec![(0, 1), (2, 3), (4, 5)]
    );
}

#[test]
fn test_insert_then_delete_is_an_inverse() {
    let mut buffer = Buffer::new();
    buffer.insert_at_index("Hello world", 0).unwrap();
    let original = buffer.plain_text();

    buffer.insert_at_index("X", 5).unwrap();
    assert_eq!(buffer.plain_text(), "HelloX world");
    buffer.delete_range(5, 5).unwrap();
    assert_eq!(buffer.plain_text(), original);
    common::assert_partition_invariant(&buffer);
}

#[test]
fn test_toggle_involution_restores_structure() {
    let mut buffer = Buffer::new();
    buffer.insert_at_index("Hello world", 0).unwrap();
    buffer.switch_formatting(2, 6, FormatKind::Italic).unwrap();
    let text = buffer.plain_text();
    let per_char = common::formatting_per_char(&buffer);
    let run_count = buffer.runs().len();

    buffer.switch_formatting(3, 8, FormatKind::Bold).unwrap();
    buffer.switch_formatting(3, 8, FormatKind::Bold).unwrap();

    assert_eq!(buffer.plain_text(), text);
    assert_eq!(common::formatting_per_char(&buffer), per_char);
    assert_eq!(buffer.runs().len(), run_count);
    common::assert_partition_invariant(&buffer);
}

#[test]
fn test_ranges_are_inclusive_at_both_ends() {
    let mut buffer = Buffer::new();
    buffer.insert_at_index("abcdef", 0).unwrap();

    // Formatting [1, 3] covers exactly "bcd"
    buffer.switch_formatting(1, 3, FormatKind::Bold).unwrap();
    assert!(!buffer.formatting_at(0).unwrap().bold);
    assert!(buffer.formatting_at(1).unwrap().bold);
    assert!(buffer.formatting_at(3).unwrap().bold);
    assert!(!buffer.formatting_at(4).unwrap().bold);

    // Deleting [1, 3] removes exactly "bcd"
    buffer.delete_range(1, 3).unwrap();
    assert_eq!(buffer.plain_text(), "aef");
    common::assert_partition_invariant(&buffer);
}

#[test]
fn test_last_index_is_addressable_and_length_is_not() {
    let mut buffer = Buffer::new();
    buffer.insert_at_index("abc", 0).unwrap();

    buffer.switch_formatting(2, 2, FormatKind::Bold).unwrap();
    assert!(buffer.formatting_at(2).unwrap().bold);

    assert!(matches!(
        buffer.switch_formatting(3, 3, FormatKind::Bold),
        Err(DocumentError::IndexOutOfRange { .. })
    ));
    assert!(matches!(
        buffer.delete_range(0, 3),
        Err(DocumentError::IndexOutOfRange { .. })
    ));
}

#[test]
fn test_formatting_switch_spanning_runs_clips_per_run() {
    let mut buffer = Buffer::new();
    buffer.insert_at_index("one two three", 0).unwrap();
    buffer.switch_formatting(4, 6, FormatKind::Bold).unwrap();
    // Italic across the bold island and its plain neighbors
    buffer.switch_formatting(2, 9, FormatKind::Italic).unwrap();

    assert_eq!(buffer.plain_text(), "one two three");
    for i in 0..buffer.total_len() {
        let formatting = buffer.formatting_at(i).unwrap();
        assert_eq!(formatting.italic, (2..=9).contains(&i), "italic at {}", i);
        assert_eq!(formatting.bold, (4..=6).contains(&i), "bold at {}", i);
    }
    common::assert_partition_invariant(&buffer);
}

#[test]
fn test_hierarchy_switch_sets_level_over_range() {
    let mut buffer = Buffer::new();
    buffer.insert_at_index("Title\nbody text", 0).unwrap();
    buffer
        .switch_formatting(0, 4, FormatKind::Hierarchy(Hierarchy::Title))
        .unwrap();

    assert_eq!(buffer.formatting_at(0).unwrap().hierarchy, Hierarchy::Title);
    assert_eq!(buffer.formatting_at(5).unwrap().hierarchy, Hierarchy::Body);
    assert!(buffer.render().contains("<h1>Title</h1>"));
}

#[test]
fn test_subscript_and_superscript_exclude_each_other_per_range() {
    let mut buffer = Buffer::new();
    buffer.insert_at_index("H2O", 0).unwrap();
    buffer
        .switch_formatting(1, 1, FormatKind::Superscript)
        .unwrap();
    buffer
        .switch_formatting(1, 1, FormatKind::Subscript)
        .unwrap();

    let formatting = buffer.formatting_at(1).unwrap();
    assert!(formatting.subscript);
    assert!(!formatting.superscript);
    assert!(buffer.render().contains("<sub>2</sub>"));
}

#[test]
fn test_newline_inserts_render_as_breaks() {
    let mut buffer = Buffer::new();
    buffer.insert_at_index("ab", 0).unwrap();
    buffer.insert_at_index("\n", 1).unwrap();
    assert_eq!(buffer.plain_text(), "a\nb");
    assert!(buffer.render().contains("a<br>b"));
}

#[test]
fn test_version_counts_every_successful_mutation() {
    let mut buffer = Buffer::new();
    let start = buffer.version();
    buffer.insert_at_index("abc", 0).unwrap();
    buffer.switch_formatting(0, 1, FormatKind::Bold).unwrap();
    buffer.delete_range(2, 2).unwrap();
    assert_eq!(buffer.version(), start + 3);

    assert!(buffer.delete_range(5, 9).is_err());
    assert_eq!(buffer.version(), start + 3);
}
