// Byte-level diff run scanner.
//
// Compares an original and a modified buffer position by position and yields
// contiguous runs of differing bytes. This is deliberately NOT a delta
// algorithm: there is no alignment search and no run merging. A run ends the
// moment a single byte matches again, so two mismatches separated by one
// matching byte always produce two runs. Consumers of the resulting IPS
// patches depend on this exact splitting, so it must not be "improved".

/// A contiguous region where `modified` differs from `original`.
///
/// `data` holds the modified bytes. For the trailing-growth run (modified
/// buffer longer than the original) there are no original bytes to compare
/// against; the whole tail is one run regardless of content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffRun {
    /// Byte offset into the modified buffer where the run starts.
    pub offset: usize,
    /// The replacement bytes.
    pub data: Vec<u8>,
}

/// Scan `original` against `modified` and collect every diff run.
///
/// The scan covers `min(original.len(), modified.len())`. If `modified` is
/// strictly longer, one final run starting at `original.len()` covers the
/// entire tail. If `original` is longer, its excess tail is not represented
/// at all: the IPS format cannot truncate.
pub fn diff_runs(original: &[u8], modified: &[u8]) -> Vec<DiffRun> {
    let overlap = original.len().min(modified.len());
    let mut runs = Vec::new();

    let mut i = 0;
    while i < overlap {
        if original[i] == modified[i] {
            i += 1;
            continue;
        }
        let start = i;
        i += 1;
        while i < overlap && original[i] != modified[i] {
            i += 1;
        }
        runs.push(DiffRun {
            offset: start,
            data: modified[start..i].to_vec(),
        });
    }

    if modified.len() > original.len() {
        runs.push(DiffRun {
            offset: original.len(),
            data: modified[original.len()..].to_vec(),
        });
    }

    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_buffers_yield_no_runs() {
        let data = b"same contents";
        assert!(diff_runs(data, data).is_empty());
    }

    #[test]
    fn single_byte_change() {
        let runs = diff_runs(b"abcdef", b"abXdef");
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].offset, 2);
        assert_eq!(runs[0].data, b"X");
    }

    #[test]
    fn matching_byte_splits_runs() {
        // Middle byte equal: two separate one-byte runs, never one merged run.
        let runs = diff_runs(&[0, 1, 0], &[9, 1, 8]);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0], DiffRun { offset: 0, data: vec![9] });
        assert_eq!(runs[1], DiffRun { offset: 2, data: vec![8] });
    }

    #[test]
    fn run_extends_while_bytes_differ() {
        let runs = diff_runs(&[0, 0, 0, 0, 0], &[0, 7, 8, 9, 0]);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].offset, 1);
        assert_eq!(runs[0].data, vec![7, 8, 9]);
    }

    #[test]
    fn longer_modified_emits_tail_run() {
        let runs = diff_runs(b"abc", b"abcdef");
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].offset, 3);
        assert_eq!(runs[0].data, b"def");
    }

    #[test]
    fn tail_run_emitted_even_when_overlap_matches() {
        // Tail is its own run, independent of any runs in the overlap.
        let runs = diff_runs(&[1, 2], &[1, 9, 3, 4]);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0], DiffRun { offset: 1, data: vec![9] });
        assert_eq!(runs[1], DiffRun { offset: 2, data: vec![3, 4] });
    }

    #[test]
    fn shorter_modified_ignores_original_tail() {
        let runs = diff_runs(b"abcdef", b"abc");
        assert!(runs.is_empty());
    }

    #[test]
    fn runs_are_strictly_ordered_without_overlap() {
        let orig = vec![0u8; 64];
        let mut modified = orig.clone();
        for i in [3usize, 10, 11, 12, 40, 63] {
            modified[i] = 0xFF;
        }
        let runs = diff_runs(&orig, &modified);
        assert_eq!(runs.len(), 4);
        let mut last_end = 0;
        for run in &runs {
            assert!(!run.data.is_empty());
            assert!(run.offset >= last_end);
            last_end = run.offset + run.data.len();
        }
    }
}
