//! Word-level diff between the two sides of a modification pair.
//!
//! Both lines are split into alternating runs of whitespace and
//! non-whitespace, a longest common subsequence is computed over those
//! tokens, and each line is turned into [`Segment`]s: tokens on the LCS are
//! unchanged, all others are changed. Concatenating a line's segments always
//! yields the line again.

use crate::diff_file::Segment;

/// Largest token table (old tokens x new tokens) worth filling in. Past this
/// both lines are reported as a single changed segment.
pub const MAX_LCS_CELLS: usize = 4_000_000;

/// Split `line` into maximal runs of whitespace and non-whitespace.
pub fn tokenize(line: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_space = None;

    for (i, ch) in line.char_indices() {
        let space = ch.is_whitespace();
        if in_space.is_some_and(|prev| prev != space) {
            tokens.push(&line[start..i]);
            start = i;
        }
        in_space = Some(space);
    }
    if start < line.len() {
        tokens.push(&line[start..]);
    }

    tokens
}

/// Suffix LCS lengths: `table[i * (m + 1) + j]` is the LCS length of
/// `a[i..]` and `b[j..]`.
fn lcs_table(a: &[&str], b: &[&str]) -> Vec<u32> {
    let n = a.len();
    let m = b.len();
    let width = m + 1;
    let mut table = vec![0u32; (n + 1) * width];

    for i in (0..n).rev() {
        for j in (0..m).rev() {
            table[i * width + j] = if a[i] == b[j] {
                table[(i + 1) * width + j + 1] + 1
            } else {
                table[(i + 1) * width + j].max(table[i * width + j + 1])
            };
        }
    }

    table
}

/// Mark every token of `a` and `b` as changed (`true`) or on the LCS
/// (`false`).
///
/// The table is walked forward from the top-left corner and equal tokens are
/// matched as soon as they meet, so among several LCS of the same length the
/// one using the earliest tokens of both sequences wins.
pub fn mark_changes(a: &[&str], b: &[&str]) -> (Vec<bool>, Vec<bool>) {
    let mut a_changed = vec![true; a.len()];
    let mut b_changed = vec![true; b.len()];

    if a.is_empty() || b.is_empty() || a.len().saturating_mul(b.len()) > MAX_LCS_CELLS {
        return (a_changed, b_changed);
    }

    let table = lcs_table(a, b);
    let width = b.len() + 1;
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        if a[i] == b[j] {
            a_changed[i] = false;
            b_changed[j] = false;
            i += 1;
            j += 1;
        } else if table[(i + 1) * width + j] >= table[i * width + j + 1] {
            i += 1;
        } else {
            j += 1;
        }
    }

    (a_changed, b_changed)
}

/// Merge consecutive tokens with the same flag into segments.
fn build_segments(tokens: &[&str], changed: &[bool]) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();

    for (token, &is_changed) in tokens.iter().zip(changed) {
        match segments.last_mut() {
            Some(last) if last.changed == is_changed => last.text.push_str(token),
            _ => segments.push(Segment::new(*token, is_changed)),
        }
    }

    segments
}

/// Compute segments for the removed (`old_text`) and added (`new_text`) side
/// of one aligned row.
pub fn compute_word_diff(old_text: &str, new_text: &str) -> (Vec<Segment>, Vec<Segment>) {
    let old_tokens = tokenize(old_text);
    let new_tokens = tokenize(new_text);
    let (old_changed, new_changed) = mark_changes(&old_tokens, &new_tokens);

    (
        build_segments(&old_tokens, &old_changed),
        build_segments(&new_tokens, &new_changed),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use similar::{Algorithm, DiffTag, capture_diff_slices};

    fn joined(segments: &[Segment]) -> String {
        segments.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_tokenize_alternates_runs() {
        assert_eq!(
            tokenize("  let x =\tfoo(1);  "),
            vec!["  ", "let", " ", "x", " ", "=", "\t", "foo(1);", "  "]
        );
        assert!(tokenize("").is_empty());
        assert_eq!(tokenize("word"), vec!["word"]);
    }

    #[test]
    fn test_tokenize_multibyte() {
        assert_eq!(tokenize("héllo wörld"), vec!["héllo", " ", "wörld"]);
    }

    #[test]
    fn test_single_word_replaced() {
        let (old, new) = compute_word_diff("old", "new");
        assert_eq!(old, vec![Segment::new("old", true)]);
        assert_eq!(new, vec![Segment::new("new", true)]);
    }

    #[test]
    fn test_middle_word_changed() {
        let (old, new) = compute_word_diff("foo bar baz", "foo qux baz");
        assert_eq!(
            old,
            vec![
                Segment::new("foo ", false),
                Segment::new("bar", true),
                Segment::new(" baz", false),
            ]
        );
        assert_eq!(
            new,
            vec![
                Segment::new("foo ", false),
                Segment::new("qux", true),
                Segment::new(" baz", false),
            ]
        );
    }

    #[test]
    fn test_appended_words() {
        let (old, new) = compute_word_diff(
            "    println(\"hello\")",
            "    println(\"hello\") // greet",
        );
        assert_eq!(old, vec![Segment::new("    println(\"hello\")", false)]);
        assert_eq!(
            new,
            vec![
                Segment::new("    println(\"hello\")", false),
                Segment::new(" // greet", true),
            ]
        );
    }

    #[test]
    fn test_identical_lines_have_no_changes() {
        let (old, new) = compute_word_diff("same text", "same text");
        assert_eq!(old, vec![Segment::new("same text", false)]);
        assert_eq!(new, vec![Segment::new("same text", false)]);
    }

    #[test]
    fn test_empty_side() {
        let (old, new) = compute_word_diff("", "added words");
        assert!(old.is_empty());
        assert_eq!(new, vec![Segment::new("added words", true)]);
    }

    #[test]
    fn test_ties_prefer_earliest_tokens() {
        // "a" could match either occurrence on the new side; the first wins.
        let (old_changed, new_changed) = mark_changes(&["a"], &["a", " ", "a"]);
        assert_eq!(old_changed, vec![false]);
        assert_eq!(new_changed, vec![false, true, true]);

        // Equal-length paths: the old side is advanced first, so "y" pairs
        // with the first new token.
        let (old_changed, new_changed) = mark_changes(&["x", "y"], &["y", "x"]);
        assert_eq!(old_changed, vec![true, false]);
        assert_eq!(new_changed, vec![false, true]);
    }

    #[test]
    fn test_oversized_lines_are_fully_changed() {
        let long = "w ".repeat(2_100);
        let (old, new) = compute_word_diff(&long, &long);
        assert_eq!(old, vec![Segment::new(long.clone(), true)]);
        assert_eq!(new, vec![Segment::new(long, true)]);
    }

    #[test]
    fn test_repeated_words_across_different_gaps() {
        let old_tokens = tokenize("c c");
        let new_tokens = tokenize("c  c  ");
        let (old_changed, new_changed) = mark_changes(&old_tokens, &new_tokens);

        assert_eq!(old_changed, vec![false, true, false]);
        assert_eq!(new_changed, vec![false, true, false, true]);
    }

    proptest! {
        #[test]
        fn prop_segments_reconstruct_lines(old in "[a-c \t]{0,24}", new in "[a-c \t]{0,24}") {
            let (left, right) = compute_word_diff(&old, &new);
            prop_assert_eq!(joined(&left), old);
            prop_assert_eq!(joined(&right), new);
        }

        #[test]
        fn prop_adjacent_segments_alternate(old in "[ab ]{0,24}", new in "[ab ]{0,24}") {
            let (left, right) = compute_word_diff(&old, &new);
            for segments in [&left, &right] {
                prop_assert!(segments.windows(2).all(|w| w[0].changed != w[1].changed));
                prop_assert!(segments.iter().all(|s| !s.text.is_empty()));
            }
        }

        #[test]
        fn prop_unchanged_tokens_form_a_longest_common_subsequence(
            old in "[a-c ]{0,20}",
            new in "[a-c ]{0,20}",
        ) {
            let old_tokens = tokenize(&old);
            let new_tokens = tokenize(&new);
            let (old_changed, new_changed) = mark_changes(&old_tokens, &new_tokens);

            let kept_old: Vec<&str> = old_tokens
                .iter()
                .zip(&old_changed)
                .filter(|(_, changed)| !**changed)
                .map(|(t, _)| *t)
                .collect();
            let kept_new: Vec<&str> = new_tokens
                .iter()
                .zip(&new_changed)
                .filter(|(_, changed)| !**changed)
                .map(|(t, _)| *t)
                .collect();
            prop_assert_eq!(&kept_old, &kept_new);

            // Myers yields a minimal edit script, so its equal runs cover a
            // longest common subsequence.
            let lcs_len: usize = capture_diff_slices(Algorithm::Myers, &old_tokens, &new_tokens)
                .iter()
                .map(|op| op.as_tag_tuple())
                .filter(|(tag, _, _)| *tag == DiffTag::Equal)
                .map(|(_, old_range, _)| old_range.len())
                .sum();
            prop_assert_eq!(kept_old.len(), lcs_len);
        }
    }
}
