// Common test utilities for document model tests

use drafty::buffer::Buffer;
use drafty::formatting::Formatting;

/// Assert the run partition invariant: runs tile `[0, total_len)` with
/// inclusive bounds, the first run starts at 0, and coalescing is maximal.
#[allow(dead_code)]
pub fn assert_partition_invariant(buffer: &Buffer) {
    let runs = buffer.runs();
    let total = buffer.total_len();
    if total == 0 {
        return;
    }
    assert_eq!(runs[0].start_index, 0);
    for pair in runs.windows(2) {
        assert_eq!(
            pair[0].end_index + 1,
            pair[1].start_index,
            "gap or overlap between adjacent runs"
        );
        assert!(
            !pair[0].can_merge_with(&pair[1]),
            "adjacent runs share identical formatting"
        );
    }
    assert_eq!(runs[runs.len() - 1].end_index, total - 1);
}

/// Formatting of every char in document order.
#[allow(dead_code)]
pub fn formatting_per_char(buffer: &Buffer) -> Vec<Formatting> {
    (0..buffer.total_len())
        .map(|i| buffer.formatting_at(i).unwrap())
        .collect()
}
