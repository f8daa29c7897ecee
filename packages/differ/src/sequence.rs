//! LCS sequence differ
//!
//! Classic dynamic-programming longest common subsequence over two token
//! sequences. Time and memory are O(n·m) in the token counts, which bounds
//! practical inputs to editor-sized documents.
//!
//! When two alignments are equally long the backtrack consumes the *new*
//! token first. Because the backtrack runs from the end, this places a
//! removal before the addition that replaces it in the returned order:
//! `"sat."` → `"sat down."` yields `-sat.` `+sat ` `+down.`.

use crate::tokenizer::{token_len, tokenize};
use serde::{Deserialize, Serialize};

/// Classification of a diffed element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeStatus {
    Unchanged,
    Added,
    Removed,
}

/// One step of an alignment between `old` and `new`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edit {
    pub status: ChangeStatus,
    /// Index into `old` (unchanged and removed steps)
    pub old_index: Option<usize>,
    /// Index into `new` (unchanged and added steps)
    pub new_index: Option<usize>,
}

/// Align two sequences, covering every element of both exactly once.
pub fn diff_sequences<T: PartialEq>(old: &[T], new: &[T]) -> Vec<Edit> {
    let n = old.len();
    let m = new.len();

    // lcs[i][j] = LCS length of old[..i] and new[..j]
    let mut lcs = vec![vec![0usize; m + 1]; n + 1];
    for i in 1..=n {
        for j in 1..=m {
            lcs[i][j] = if old[i - 1] == new[j - 1] {
                lcs[i - 1][j - 1] + 1
            } else {
                lcs[i - 1][j].max(lcs[i][j - 1])
            };
        }
    }

    let mut edits = Vec::with_capacity(n + m);
    let (mut i, mut j) = (n, m);

    while i > 0 || j > 0 {
        if i > 0 && j > 0 && old[i - 1] == new[j - 1] {
            edits.push(Edit {
                status: ChangeStatus::Unchanged,
                old_index: Some(i - 1),
                new_index: Some(j - 1),
            });
            i -= 1;
            j -= 1;
        } else if j > 0 && (i == 0 || lcs[i][j - 1] >= lcs[i - 1][j]) {
            edits.push(Edit {
                status: ChangeStatus::Added,
                old_index: None,
                new_index: Some(j - 1),
            });
            j -= 1;
        } else {
            edits.push(Edit {
                status: ChangeStatus::Removed,
                old_index: Some(i - 1),
                new_index: None,
            });
            i -= 1;
        }
    }

    edits.reverse();
    edits
}

/// A word token classified by the differ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordChange<'a> {
    pub status: ChangeStatus,
    /// The token, trailing whitespace included
    pub value: &'a str,
    /// Character offset within the old text: where the token starts for
    /// unchanged and removed tokens, the insertion point for added ones
    pub old_offset: usize,
}

/// Word-level diff of two strings.
pub fn diff_words<'a>(old: &'a str, new: &'a str) -> Vec<WordChange<'a>> {
    let old_tokens = tokenize(old);
    let new_tokens = tokenize(new);

    let mut offset = 0;
    diff_sequences(&old_tokens, &new_tokens)
        .into_iter()
        .map(|edit| {
            let value = match (edit.old_index, edit.new_index) {
                (Some(i), _) => old_tokens[i],
                (None, Some(j)) => new_tokens[j],
                (None, None) => "",
            };
            let change = WordChange {
                status: edit.status,
                value,
                old_offset: offset,
            };
            if edit.status != ChangeStatus::Added {
                offset += token_len(value);
            }
            change
        })
        .collect()
}
