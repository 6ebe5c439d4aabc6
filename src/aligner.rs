//! Side-by-side alignment of parsed hunks.

use crate::diff_file::{DiffLine, LineType};
use crate::parser::Hunk;
use crate::word_diff::compute_word_diff;

/// Left/right rows of one file plus its change counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alignment {
    pub left: Vec<DiffLine>,
    pub right: Vec<DiffLine>,
    pub add_count: usize,
    pub del_count: usize,
    /// Row index where each hunk starts.
    pub hunk_offsets: Vec<usize>,
    /// Row index where each change block starts: a removal run with the
    /// additions right after it, or a lone addition run.
    pub block_offsets: Vec<usize>,
}

/// Align every hunk of a file, in order. Hunks never interleave.
pub fn align_hunks(hunks: &[Hunk]) -> Alignment {
    let mut alignment = Alignment::default();

    for hunk in hunks {
        alignment.hunk_offsets.push(alignment.left.len());
        align_lines(&hunk.lines, &mut alignment);
    }

    alignment
}

/// Walk one hunk's lines and append its rows.
///
/// Context lines go to both sides. A run of removals plus the run of
/// additions right after it forms a modification block. Additions with no
/// removal before them get a placeholder on the left.
fn align_lines(lines: &[DiffLine], out: &mut Alignment) {
    let mut i = 0;

    while i < lines.len() {
        match lines[i].line_type {
            LineType::Context | LineType::Placeholder => {
                out.left.push(lines[i].clone());
                out.right.push(lines[i].clone());
                i += 1;
            }
            LineType::Removed => {
                out.block_offsets.push(out.left.len());
                let del_start = i;
                while i < lines.len() && lines[i].line_type == LineType::Removed {
                    i += 1;
                }
                let add_start = i;
                while i < lines.len() && lines[i].line_type == LineType::Added {
                    i += 1;
                }

                out.del_count += add_start - del_start;
                out.add_count += i - add_start;
                align_block(&lines[del_start..add_start], &lines[add_start..i], out);
            }
            LineType::Added => {
                out.block_offsets.push(out.left.len());
                while i < lines.len() && lines[i].line_type == LineType::Added {
                    out.left.push(DiffLine::placeholder());
                    out.right.push(lines[i].clone());
                    out.add_count += 1;
                    i += 1;
                }
            }
        }
    }
}

/// Pair removals and additions by position. Rows where both sides exist are
/// modification pairs and get word-level segments.
fn align_block(removed: &[DiffLine], added: &[DiffLine], out: &mut Alignment) {
    let rows = removed.len().max(added.len());

    for row in 0..rows {
        let mut left = removed.get(row).cloned().unwrap_or_else(DiffLine::placeholder);
        let mut right = added.get(row).cloned().unwrap_or_else(DiffLine::placeholder);

        if left.line_type == LineType::Removed && right.line_type == LineType::Added {
            let (left_segments, right_segments) = compute_word_diff(&left.content, &right.content);
            left.segments = left_segments;
            right.segments = right_segments;
        }

        out.left.push(left);
        out.right.push(right);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff_file::Segment;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use LineType::{Added, Context, Placeholder, Removed};

    fn joined(segments: &[Segment]) -> String {
        segments.iter().map(|s| s.text.as_str()).collect()
    }

    fn ctx(s: &str) -> DiffLine {
        DiffLine::new_context(s, 1, 1)
    }

    fn del(s: &str) -> DiffLine {
        DiffLine::new_removed(s, 1)
    }

    fn add(s: &str) -> DiffLine {
        DiffLine::new_added(s, 1)
    }

    fn hunk(lines: Vec<DiffLine>) -> Hunk {
        Hunk {
            old_start: 1,
            old_count: 0,
            new_start: 1,
            new_count: 0,
            lines,
        }
    }

    fn types(lines: &[DiffLine]) -> Vec<LineType> {
        lines.iter().map(|l| l.line_type).collect()
    }

    #[test]
    fn test_context_only() {
        let a = align_hunks(&[hunk(vec![ctx("line1"), ctx("line2")])]);
        assert_eq!((a.add_count, a.del_count), (0, 0));
        assert_eq!(types(&a.left), vec![Context, Context]);
        assert_eq!(a.left, a.right);
    }

    #[test]
    fn test_delete_only() {
        let a = align_hunks(&[hunk(vec![del("deleted1"), del("deleted2")])]);
        assert_eq!((a.add_count, a.del_count), (0, 2));
        assert_eq!(types(&a.left), vec![Removed, Removed]);
        assert_eq!(types(&a.right), vec![Placeholder, Placeholder]);
        assert!(a.left.iter().all(|l| l.segments.is_empty()));
    }

    #[test]
    fn test_add_only() {
        let a = align_hunks(&[hunk(vec![add("added1"), add("added2")])]);
        assert_eq!((a.add_count, a.del_count), (2, 0));
        assert_eq!(types(&a.left), vec![Placeholder, Placeholder]);
        assert_eq!(types(&a.right), vec![Added, Added]);
    }

    #[test]
    fn test_modification_pair_gets_segments() {
        let a = align_hunks(&[hunk(vec![del("old"), add("new")])]);
        assert_eq!((a.add_count, a.del_count), (1, 1));
        assert_eq!(a.left.len(), 1);
        assert_eq!(a.left[0].line_type, Removed);
        assert_eq!(a.right[0].line_type, Added);
        assert_eq!(a.left[0].segments, vec![Segment::new("old", true)]);
        assert_eq!(a.right[0].segments, vec![Segment::new("new", true)]);
    }

    #[test]
    fn test_more_deletes_than_adds() {
        let a = align_hunks(&[hunk(vec![del("del1"), del("del2"), del("del3"), add("add1")])]);
        assert_eq!((a.add_count, a.del_count), (1, 3));
        assert_eq!(types(&a.left), vec![Removed, Removed, Removed]);
        assert_eq!(types(&a.right), vec![Added, Placeholder, Placeholder]);
        assert!(!a.left[0].segments.is_empty());
        assert!(a.left[1].segments.is_empty());
        assert!(a.left[2].segments.is_empty());
    }

    #[test]
    fn test_more_adds_than_deletes() {
        let a = align_hunks(&[hunk(vec![del("del1"), add("add1"), add("add2"), add("add3")])]);
        assert_eq!((a.add_count, a.del_count), (3, 1));
        assert_eq!(types(&a.left), vec![Removed, Placeholder, Placeholder]);
        assert_eq!(types(&a.right), vec![Added, Added, Added]);
        assert_eq!(a.right[1].content, "add2");
        assert!(a.right[2].segments.is_empty());
    }

    #[test]
    fn test_mixed_with_context() {
        let a = align_hunks(&[hunk(vec![ctx("ctx1"), del("del"), add("add"), ctx("ctx2")])]);
        assert_eq!(types(&a.left), vec![Context, Removed, Context]);
        assert_eq!(types(&a.right), vec![Context, Added, Context]);
    }

    #[test]
    fn test_add_before_delete_is_not_paired() {
        // An addition run followed by removals is two separate blocks.
        let a = align_hunks(&[hunk(vec![add("new"), del("old")])]);
        assert_eq!(types(&a.left), vec![Placeholder, Removed]);
        assert_eq!(types(&a.right), vec![Added, Placeholder]);
        assert!(a.right[0].segments.is_empty());
    }

    #[test]
    fn test_block_offsets_mark_each_change_block() {
        let a = align_hunks(&[hunk(vec![
            add("a"),
            del("b"),
            add("c"),
            del("d"),
            add("e"),
            ctx("f"),
            del("g"),
        ])]);
        assert_eq!(types(&a.left), vec![Placeholder, Removed, Removed, Context, Removed]);
        assert_eq!(a.block_offsets, vec![0, 1, 2, 4]);
    }

    #[test]
    fn test_multiple_hunks_concatenate() {
        let a = align_hunks(&[
            hunk(vec![ctx("ctx1"), del("del1")]),
            hunk(vec![add("add2"), ctx("ctx2")]),
        ]);
        assert_eq!((a.add_count, a.del_count), (1, 1));
        assert_eq!(a.left.len(), 4);
        assert_eq!(a.right.len(), 4);
        assert_eq!(a.hunk_offsets, vec![0, 2]);
        assert_eq!(a.block_offsets, vec![1, 2]);
        // The removal at the end of the first hunk never pairs with the
        // addition opening the second.
        assert_eq!(types(&a.right), vec![Context, Placeholder, Added, Context]);
    }

    #[test]
    fn test_no_hunks() {
        assert_eq!(align_hunks(&[]), Alignment::default());
    }

    fn line_strategy() -> impl Strategy<Value = DiffLine> {
        prop_oneof![
            "[a-z ]{0,8}".prop_map(|s| ctx(&s)),
            "[a-z ]{0,8}".prop_map(|s| add(&s)),
            "[a-z ]{0,8}".prop_map(|s| del(&s)),
        ]
    }

    proptest! {
        #[test]
        fn prop_sides_have_equal_length_and_counts_match(
            hunks in prop::collection::vec(prop::collection::vec(line_strategy(), 0..12), 0..4)
        ) {
            let hunks: Vec<Hunk> = hunks.into_iter().map(hunk).collect();
            let a = align_hunks(&hunks);

            prop_assert_eq!(a.left.len(), a.right.len());
            prop_assert_eq!(a.right.iter().filter(|l| l.line_type == Added).count(), a.add_count);
            prop_assert_eq!(a.left.iter().filter(|l| l.line_type == Removed).count(), a.del_count);
            prop_assert!(a.left.iter().all(|l| l.line_type != Added));
            prop_assert!(a.right.iter().all(|l| l.line_type != Removed));

            for (l, r) in a.left.iter().zip(&a.right) {
                if l.line_type == Removed && r.line_type == Added {
                    prop_assert_eq!(joined(&l.segments), l.content.clone());
                    prop_assert_eq!(joined(&r.segments), r.content.clone());
                } else {
                    prop_assert!(l.segments.is_empty() && r.segments.is_empty());
                }
            }

            prop_assert_eq!(align_hunks(&hunks), a);
        }

        #[test]
        fn prop_block_placeholders_match_run_difference(dels in 0usize..6, adds in 0usize..6) {
            let mut lines: Vec<DiffLine> = (0..dels).map(|n| del(&format!("d{n}"))).collect();
            lines.extend((0..adds).map(|n| add(&format!("a{n}"))));
            let a = align_hunks(&[hunk(lines)]);

            let pairs = a.left.iter().zip(&a.right)
                .filter(|(l, r)| l.line_type == Removed && r.line_type == Added)
                .count();
            let placeholders = a.left.iter().chain(&a.right).filter(|l| l.is_placeholder()).count();

            prop_assert_eq!(a.left.len(), dels.max(adds));
            prop_assert_eq!(pairs, dels.min(adds));
            prop_assert_eq!(placeholders, dels.abs_diff(adds));
        }
    }
}
