//! Line-level diff between two versions of a chunk
//!
//! Lines are split with [`str::lines`], so `\n` and `\r\n` endings compare
//! equal and a missing final newline is not a change. The diff itself is
//! Myers' algorithm from `similar`.

use similar::{Algorithm, ChangeTag, TextDiff};
use std::fmt;

/// Classification of one line of diff output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineChange {
    Inserted,
    Deleted,
    Unchanged,
}

impl From<ChangeTag> for LineChange {
    fn from(tag: ChangeTag) -> Self {
        match tag {
            ChangeTag::Insert => Self::Inserted,
            ChangeTag::Delete => Self::Deleted,
            ChangeTag::Equal => Self::Unchanged,
        }
    }
}

impl fmt::Display for LineChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Inserted => "Inserted",
            Self::Deleted => "Deleted",
            Self::Unchanged => "Unchanged",
        };
        f.write_str(label)
    }
}

/// One line of diff output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub kind: LineChange,
    pub text: String,
}

impl DiffLine {
    fn new(kind: LineChange, text: &str) -> Self {
        Self {
            kind,
            text: text.to_string(),
        }
    }
}

/// Diff `old` against `new` line by line
///
/// Within a replaced region deletions are emitted before insertions.
pub fn diff_lines(old: &str, new: &str) -> Vec<DiffLine> {
    let old_lines: Vec<&str> = old.lines().collect();
    let new_lines: Vec<&str> = new.lines().collect();

    let diff = TextDiff::configure()
        .algorithm(Algorithm::Myers)
        .diff_slices(&old_lines[..], &new_lines[..]);

    diff.iter_all_changes()
        .map(|change| DiffLine::new(change.tag().into(), change.value()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn changes(lines: &[DiffLine]) -> Vec<(LineChange, &str)> {
        lines
            .iter()
            .filter(|l| l.kind != LineChange::Unchanged)
            .map(|l| (l.kind, l.text.as_str()))
            .collect()
    }

    #[test]
    fn test_modified_line() {
        let diff = diff_lines("line1\nline2\n", "line1\nline2 changed\n");
        assert_eq!(
            diff,
            vec![
                DiffLine::new(LineChange::Unchanged, "line1"),
                DiffLine::new(LineChange::Deleted, "line2"),
                DiffLine::new(LineChange::Inserted, "line2 changed"),
            ]
        );
    }

    #[test]
    fn test_identical_content() {
        let diff = diff_lines("a\nb\n", "a\nb\n");
        assert!(diff.iter().all(|l| l.kind == LineChange::Unchanged));
        assert_eq!(diff.len(), 2);
    }

    #[test]
    fn test_from_empty_is_all_inserted() {
        let diff = diff_lines("", "a\nb");
        assert_eq!(
            changes(&diff),
            vec![(LineChange::Inserted, "a"), (LineChange::Inserted, "b")]
        );
    }

    #[test]
    fn test_to_empty_is_all_deleted() {
        let diff = diff_lines("a\nb\n", "");
        assert_eq!(
            changes(&diff),
            vec![(LineChange::Deleted, "a"), (LineChange::Deleted, "b")]
        );
    }

    #[test]
    fn test_interleaved_edits() {
        let old = "a\nb\nc\nd\ne\n";
        let new = "a\nc\nx\nd\ne\nf\n";
        assert_eq!(
            changes(&diff_lines(old, new)),
            vec![
                (LineChange::Deleted, "b"),
                (LineChange::Inserted, "x"),
                (LineChange::Inserted, "f"),
            ]
        );
    }

    #[test]
    fn test_unchanged_lines_preserve_order() {
        let old = "keep1\nold\nkeep2\n";
        let new = "keep1\nnew\nkeep2\n";
        let diff = diff_lines(old, new);
        let texts: Vec<&str> = diff.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["keep1", "old", "new", "keep2"]);
    }

    #[test]
    fn test_crlf_and_lf_lines_compare_equal() {
        let diff = diff_lines("a\r\nb\r\n", "a\nb\n");
        assert!(diff.iter().all(|l| l.kind == LineChange::Unchanged));
    }

    #[test]
    fn test_edits_at_both_ends_of_long_text() {
        let old: String = (0..3000).map(|i| format!("line {i}\n")).collect();
        let new = old
            .replacen("line 0\n", "first edited\n", 1)
            .replacen("line 2999\n", "last edited\n", 1);

        assert_eq!(
            changes(&diff_lines(&old, &new)),
            vec![
                (LineChange::Deleted, "line 0"),
                (LineChange::Inserted, "first edited"),
                (LineChange::Deleted, "line 2999"),
                (LineChange::Inserted, "last edited"),
            ]
        );
    }

    #[test]
    fn test_missing_final_newline_is_not_a_change() {
        let diff = diff_lines("a\nb", "a\nb\n");
        assert!(diff.iter().all(|l| l.kind == LineChange::Unchanged));
    }

    #[test]
    fn test_change_type_labels() {
        assert_eq!(LineChange::Inserted.to_string(), "Inserted");
        assert_eq!(LineChange::Deleted.to_string(), "Deleted");
    }
}
