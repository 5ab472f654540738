//! Line-level diff of two blobs, built on `similar`'s Myers implementation.

use std::fmt;

use similar::{ChangeTag, TextDiff};

/// Context lines kept around each change.
const CONTEXT: usize = 3;

/// Hunks describing how to turn one blob into another.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlobDiff {
    pub hunks: Vec<DiffHunk>,
    /// Either side was not UTF-8; `hunks` is empty in that case.
    pub binary: bool,
}

impl BlobDiff {
    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty() && !self.binary
    }

    pub fn additions(&self) -> usize {
        self.lines()
            .filter(|l| matches!(l, DiffLine::Added(_)))
            .count()
    }

    pub fn deletions(&self) -> usize {
        self.lines()
            .filter(|l| matches!(l, DiffLine::Removed(_)))
            .count()
    }

    fn lines(&self) -> impl Iterator<Item = &DiffLine> {
        self.hunks.iter().flat_map(|h| &h.lines)
    }
}

/// A contiguous region of changes, with 1-based line numbers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiffHunk {
    pub old_start: usize,
    pub old_count: usize,
    pub new_start: usize,
    pub new_count: usize,
    pub lines: Vec<DiffLine>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiffLine {
    Context(String),
    Added(String),
    Removed(String),
}

/// Diff two blobs line by line. An empty slice stands for an absent file.
pub fn diff_blobs(old: &[u8], new: &[u8]) -> BlobDiff {
    if old == new {
        return BlobDiff::default();
    }
    let (Ok(old), Ok(new)) = (std::str::from_utf8(old), std::str::from_utf8(new)) else {
        return BlobDiff {
            hunks: Vec::new(),
            binary: true,
        };
    };

    let text = TextDiff::from_lines(old, new);
    let hunks = text
        .grouped_ops(CONTEXT)
        .iter()
        .filter_map(|group| {
            let first = group.first()?;
            let last = group.last()?;
            let old_range = first.old_range().start..last.old_range().end;
            let new_range = first.new_range().start..last.new_range().end;

            let lines = group
                .iter()
                .flat_map(|op| text.iter_changes(op))
                .map(|change| {
                    let line = change.value().trim_end_matches('\n').to_string();
                    match change.tag() {
                        ChangeTag::Equal => DiffLine::Context(line),
                        ChangeTag::Delete => DiffLine::Removed(line),
                        ChangeTag::Insert => DiffLine::Added(line),
                    }
                })
                .collect();

            Some(DiffHunk {
                old_start: old_range.start + 1,
                old_count: old_range.len(),
                new_start: new_range.start + 1,
                new_count: new_range.len(),
                lines,
            })
        })
        .collect();

    BlobDiff {
        hunks,
        binary: false,
    }
}

impl fmt::Display for BlobDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.binary {
            return writeln!(f, "Binary files differ");
        }
        for hunk in &self.hunks {
            writeln!(
                f,
                "@@ -{},{} +{},{} @@",
                hunk.old_start, hunk.old_count, hunk.new_start, hunk.new_count
            )?;
            for line in &hunk.lines {
                match line {
                    DiffLine::Context(l) => writeln!(f, " {l}")?,
                    DiffLine::Added(l) => writeln!(f, "+{l}")?,
                    DiffLine::Removed(l) => writeln!(f, "-{l}")?,
                }
            }
        }
        Ok(())
    }
}
