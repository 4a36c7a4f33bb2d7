//! The diff engine: edit-script types, the recursive driver with its
//! speed-up reductions, and the derived read-outs over edit scripts.

mod bisect;
mod cleanup;
mod common;
mod half_match;
mod lines;

pub(crate) use cleanup::{cleanup_merge, cleanup_semantic, cleanup_semantic_lossless};
pub(crate) use common::{common_prefix, common_suffix};

use std::fmt::Display;

use chrono::NaiveTime;
use serde_repr::{Deserialize_repr, Serialize_repr};
use tracing::trace;

use crate::{string, units, DiffMatchPatch};

/// The three edit operations, with the canonical wire values.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize_repr, Deserialize_repr)]
#[repr(i8)]
pub enum Op {
    Delete = -1,
    Equal = 0,
    Insert = 1,
}

/// One record of an edit script: an operation and the run of code units it
/// applies to.
///
/// `Diff::delete("Hello")` removes `Hello`, `Diff::insert("Goodbye")` adds
/// `Goodbye`, `Diff::equal("World")` keeps `World`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diff {
    pub(crate) op: Op,
    pub(crate) text: Vec<char>,
}

impl Diff {
    pub(crate) fn new(op: Op, text: &[char]) -> Self {
        Self {
            op,
            text: text.to_vec(),
        }
    }

    pub fn delete(text: &str) -> Self {
        Self::new(Op::Delete, &units(text))
    }

    pub fn insert(text: &str) -> Self {
        Self::new(Op::Insert, &units(text))
    }

    pub fn equal(text: &str) -> Self {
        Self::new(Op::Equal, &units(text))
    }

    /// The operation of this record.
    pub fn op(&self) -> Op {
        self.op
    }

    /// The affected run, as code units.
    pub fn data(&self) -> &[char] {
        &self.text
    }

    /// The affected run, rebuilt as a string.
    pub fn text(&self) -> String {
        string(&self.text)
    }

    /// Length of the affected run in code units.
    pub fn size(&self) -> usize {
        self.text.len()
    }
}

impl Display for Diff {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:?}, {})", self.op, self.text())
    }
}

impl DiffMatchPatch {
    /// Compute the edit script turning `old` into `new`.
    ///
    /// The result honours the configured time budget: when the deadline
    /// passes mid-search the script is still valid, just not minimal.
    ///
    /// ```
    /// use textpatch::{Diff, DiffMatchPatch};
    ///
    /// let dmp = DiffMatchPatch::new();
    /// assert_eq!(
    ///     vec![Diff::equal("ab"), Diff::insert("123"), Diff::equal("c")],
    ///     dmp.diff_main("abc", "ab123c"),
    /// );
    /// ```
    pub fn diff_main(&self, old: &str, new: &str) -> Vec<Diff> {
        let old = units(old);
        let new = units(new);
        trace!(old_len = old.len(), new_len = new.len(), "diffing");

        self.diff_internal(&old, &new, self.checklines(), self.deadline())
    }

    pub(crate) fn diff_internal(
        &self,
        old: &[char],
        new: &[char],
        checklines: bool,
        deadline: Option<NaiveTime>,
    ) -> Vec<Diff> {
        if old == new {
            if old.is_empty() {
                return Vec::new();
            }
            return vec![Diff::new(Op::Equal, old)];
        }

        // Peel the common affixes off before the expensive part.
        let prefix = common_prefix(old, new);
        let suffix = common_suffix(&old[prefix..], &new[prefix..]);

        let mut diffs = self.compute(
            &old[prefix..old.len() - suffix],
            &new[prefix..new.len() - suffix],
            checklines,
            deadline,
        );

        if prefix > 0 {
            diffs.insert(0, Diff::new(Op::Equal, &old[..prefix]));
        }
        if suffix > 0 {
            diffs.push(Diff::new(Op::Equal, &new[new.len() - suffix..]));
        }

        cleanup_merge(&mut diffs);

        diffs
    }

    // The affix-free core: cheap reductions first, then half-match
    // divide-and-conquer, line mode, or the full bisection.
    fn compute(
        &self,
        old: &[char],
        new: &[char],
        checklines: bool,
        deadline: Option<NaiveTime>,
    ) -> Vec<Diff> {
        if old.is_empty() {
            return vec![Diff::new(Op::Insert, new)];
        }
        if new.is_empty() {
            return vec![Diff::new(Op::Delete, old)];
        }

        let (long, short, old_is_long) = if old.len() > new.len() {
            (old, new, true)
        } else {
            (new, old, false)
        };

        if let Some(idx) = long.windows(short.len()).position(|w| w == short) {
            // Shorter text sits inside the longer one.
            let op = if old_is_long { Op::Delete } else { Op::Insert };
            return vec![
                Diff::new(op, &long[..idx]),
                Diff::new(Op::Equal, short),
                Diff::new(op, &long[idx + short.len()..]),
            ];
        }

        if short.len() == 1 {
            // Single unit, and containment was ruled out above.
            return vec![Diff::new(Op::Delete, old), Diff::new(Op::Insert, new)];
        }

        // With a bounded budget, a long shared middle is worth splitting on
        // even if the result is not guaranteed minimal.
        if self.timeout_bounded() {
            if let Some(hm) = half_match::half_match(old, new) {
                let mut diffs = self.diff_internal(hm.prefix1, hm.prefix2, checklines, deadline);
                diffs.push(Diff::new(Op::Equal, hm.common));
                diffs.extend(self.diff_internal(hm.suffix1, hm.suffix2, checklines, deadline));
                return diffs;
            }
        }

        if checklines && old.len() > 100 && new.len() > 100 {
            return self.line_mode(old, new, deadline);
        }

        self.bisect(old, new, deadline)
    }

    // Line-level pre-pass: diff over line IDs, then re-diff each replacement
    // block unit by unit to recover accuracy.
    fn line_mode(&self, old: &[char], new: &[char], deadline: Option<NaiveTime>) -> Vec<Diff> {
        let encoded = lines::lines_to_units(old, new);
        let coarse = self.diff_internal(&encoded.units1, &encoded.units2, false, deadline);
        let mut diffs = lines::units_to_lines(&coarse, &encoded.lines);

        // Eliminate freak matches between unrelated lines.
        cleanup_semantic(&mut diffs);

        // A trailing dummy equality flushes the last replacement block.
        diffs.push(Diff::new(Op::Equal, &[]));

        let mut pointer = 0;
        let mut count_delete = 0;
        let mut count_insert = 0;
        let mut text_delete: Vec<char> = Vec::new();
        let mut text_insert: Vec<char> = Vec::new();

        while pointer < diffs.len() {
            match diffs[pointer].op {
                Op::Insert => {
                    count_insert += 1;
                    text_insert.extend_from_slice(diffs[pointer].data());
                }
                Op::Delete => {
                    count_delete += 1;
                    text_delete.extend_from_slice(diffs[pointer].data());
                }
                Op::Equal => {
                    if count_delete >= 1 && count_insert >= 1 {
                        // Replace this run with a character-level diff.
                        let start = pointer - count_delete - count_insert;
                        diffs.drain(start..pointer);
                        pointer = start;

                        let sub = self.diff_internal(&text_delete, &text_insert, false, deadline);
                        let sublen = sub.len();
                        sub.into_iter().rev().for_each(|d| diffs.insert(pointer, d));
                        pointer += sublen;
                    }
                    count_insert = 0;
                    count_delete = 0;
                    text_delete.clear();
                    text_insert.clear();
                }
            }
            pointer += 1;
        }

        diffs.pop();
        diffs
    }

    /// Length of the common prefix of two texts, in code units.
    pub fn diff_common_prefix(&self, old: &str, new: &str) -> usize {
        common_prefix(&units(old), &units(new))
    }

    /// Length of the common suffix of two texts, in code units.
    pub fn diff_common_suffix(&self, old: &str, new: &str) -> usize {
        common_suffix(&units(old), &units(new))
    }

    /// Rewrite a diff in place to be more human readable, expanding
    /// coincidental equalities between unrelated regions.
    pub fn diff_cleanup_semantic(&self, diffs: &mut Vec<Diff>) {
        cleanup_semantic(diffs);
    }

    /// Slide edit boundaries in place to line up with word, line and
    /// sentence boundaries, without changing what the diff describes.
    pub fn diff_cleanup_semantic_lossless(&self, diffs: &mut Vec<Diff>) {
        cleanup_semantic_lossless(diffs);
    }

    /// Rewrite a diff in place to use fewer, larger edits, trading up to
    /// `edit_cost` equality units per edit eliminated.
    pub fn diff_cleanup_efficiency(&self, diffs: &mut Vec<Diff>) {
        self.cleanup_efficiency(diffs);
    }

    /// Normalize a diff in place: coalesce runs of the same operation,
    /// hoist shared affixes into equalities, drop empty records.
    pub fn diff_cleanup_merge(&self, diffs: &mut Vec<Diff>) {
        cleanup_merge(diffs);
    }

    /// Map a source-text offset through a diff to the equivalent offset in
    /// the target text. Offsets inside a deletion map to the position just
    /// before it.
    pub fn diff_x_index(&self, diffs: &[Diff], loc: usize) -> usize {
        x_index(diffs, loc)
    }

    /// Rebuild the source text from a diff.
    pub fn diff_text1(&self, diffs: &[Diff]) -> String {
        string(&text1_units(diffs))
    }

    /// Rebuild the target text from a diff.
    pub fn diff_text2(&self, diffs: &[Diff]) -> String {
        string(&text2_units(diffs))
    }

    /// Levenshtein distance described by a diff: the larger of the inserted
    /// and deleted unit counts over each replacement run, summed.
    pub fn diff_levenshtein(&self, diffs: &[Diff]) -> usize {
        let mut levenshtein = 0;
        let mut inserts = 0;
        let mut deletes = 0;

        for diff in diffs {
            match diff.op {
                Op::Insert => inserts += diff.size(),
                Op::Delete => deletes += diff.size(),
                Op::Equal => {
                    // A deletion paired with an insertion is one substitution.
                    levenshtein += inserts.max(deletes);
                    inserts = 0;
                    deletes = 0;
                }
            }
        }

        levenshtein + inserts.max(deletes)
    }
}

pub(crate) fn x_index(diffs: &[Diff], loc: usize) -> usize {
    let mut chars1 = 0;
    let mut chars2 = 0;
    let mut last_chars1 = 0;
    let mut last_chars2 = 0;

    let mut hit = None;
    for diff in diffs {
        if diff.op != Op::Insert {
            chars1 += diff.size();
        }
        if diff.op != Op::Delete {
            chars2 += diff.size();
        }
        if chars1 > loc {
            hit = Some(diff);
            break;
        }
        last_chars1 = chars1;
        last_chars2 = chars2;
    }

    if matches!(hit, Some(d) if d.op == Op::Delete) {
        // The location was deleted.
        return last_chars2;
    }

    last_chars2 + (loc - last_chars1)
}

pub(crate) fn text1_units(diffs: &[Diff]) -> Vec<char> {
    diffs
        .iter()
        .filter(|d| d.op != Op::Insert)
        .flat_map(|d| d.data().iter().copied())
        .collect()
}

pub(crate) fn text2_units(diffs: &[Diff]) -> Vec<char> {
    diffs
        .iter()
        .filter(|d| d.op != Op::Delete)
        .flat_map(|d| d.data().iter().copied())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diff_common_prefix_suffix() {
        let dmp = DiffMatchPatch::new();
        assert_eq!(0, dmp.diff_common_prefix("abc", "xyz"));
        assert_eq!(4, dmp.diff_common_prefix("1234abcdef", "1234xyz"));
        assert_eq!(4, dmp.diff_common_prefix("1234", "1234xyz"));

        assert_eq!(0, dmp.diff_common_suffix("abc", "xyz"));
        assert_eq!(4, dmp.diff_common_suffix("abcdef1234", "xyz1234"));
        assert_eq!(4, dmp.diff_common_suffix("1234", "xyz1234"));
    }

    #[test]
    fn test_diff_text() {
        let dmp = DiffMatchPatch::new();
        let diffs = vec![
            Diff::equal("jump"),
            Diff::delete("s"),
            Diff::insert("ed"),
            Diff::equal(" over "),
            Diff::delete("the"),
            Diff::insert("a"),
            Diff::equal(" lazy"),
        ];
        assert_eq!("jumps over the lazy", dmp.diff_text1(&diffs));
        assert_eq!("jumped over a lazy", dmp.diff_text2(&diffs));
    }

    #[test]
    fn test_diff_x_index() {
        let dmp = DiffMatchPatch::new();

        // Translation on equality.
        let diffs = vec![Diff::delete("a"), Diff::insert("1234"), Diff::equal("xyz")];
        assert_eq!(5, dmp.diff_x_index(&diffs, 2));

        // Translation on deletion.
        let diffs = vec![Diff::equal("a"), Diff::delete("1234"), Diff::equal("xyz")];
        assert_eq!(1, dmp.diff_x_index(&diffs, 3));
    }

    #[test]
    fn test_diff_levenshtein() {
        let dmp = DiffMatchPatch::new();

        // Trailing equality.
        let diffs = vec![Diff::delete("abc"), Diff::insert("1234"), Diff::equal("xyz")];
        assert_eq!(4, dmp.diff_levenshtein(&diffs));

        // Leading equality.
        let diffs = vec![Diff::equal("xyz"), Diff::delete("abc"), Diff::insert("1234")];
        assert_eq!(4, dmp.diff_levenshtein(&diffs));

        // Middle equality.
        let diffs = vec![Diff::delete("abc"), Diff::equal("xyz"), Diff::insert("1234")];
        assert_eq!(7, dmp.diff_levenshtein(&diffs));
    }

    #[test]
    fn test_diff_main_trivial() {
        let mut dmp = DiffMatchPatch::new();
        dmp.set_timeout(None);

        // Null case.
        assert!(dmp.diff_main("", "").is_empty());

        // Equality.
        assert_eq!(vec![Diff::equal("abc")], dmp.diff_main("abc", "abc"));

        // Simple insertion.
        assert_eq!(
            vec![Diff::equal("ab"), Diff::insert("123"), Diff::equal("c")],
            dmp.diff_main("abc", "ab123c")
        );

        // Simple deletion.
        assert_eq!(
            vec![Diff::equal("a"), Diff::delete("123"), Diff::equal("bc")],
            dmp.diff_main("a123bc", "abc")
        );

        // Two insertions.
        assert_eq!(
            vec![
                Diff::equal("a"),
                Diff::insert("123"),
                Diff::equal("b"),
                Diff::insert("456"),
                Diff::equal("c"),
            ],
            dmp.diff_main("abc", "a123b456c")
        );

        // Two deletions.
        assert_eq!(
            vec![
                Diff::equal("a"),
                Diff::delete("123"),
                Diff::equal("b"),
                Diff::delete("456"),
                Diff::equal("c"),
            ],
            dmp.diff_main("a123b456c", "abc")
        );
    }

    #[test]
    fn test_diff_main_real() {
        let mut dmp = DiffMatchPatch::new();
        dmp.set_timeout(None);
        dmp.set_checklines(false);

        // Simple substitution.
        assert_eq!(
            vec![Diff::delete("a"), Diff::insert("b")],
            dmp.diff_main("a", "b")
        );

        assert_eq!(
            vec![
                Diff::delete("Apple"),
                Diff::insert("Banana"),
                Diff::equal("s are a"),
                Diff::insert("lso"),
                Diff::equal(" fruit."),
            ],
            dmp.diff_main("Apples are a fruit.", "Bananas are also fruit.")
        );

        // Non-ASCII and control units.
        assert_eq!(
            vec![
                Diff::delete("a"),
                Diff::insert("\u{0680}"),
                Diff::equal("x"),
                Diff::delete("\t"),
                Diff::insert("\0"),
            ],
            dmp.diff_main("ax\t", "\u{0680}x\0")
        );

        // Overlaps.
        assert_eq!(
            vec![
                Diff::delete("1"),
                Diff::equal("a"),
                Diff::delete("y"),
                Diff::equal("b"),
                Diff::delete("2"),
                Diff::insert("xab"),
            ],
            dmp.diff_main("1ayb2", "abxab")
        );

        assert_eq!(
            vec![Diff::insert("xaxcx"), Diff::equal("abc"), Diff::delete("y")],
            dmp.diff_main("abcy", "xaxcxabc")
        );

        assert_eq!(
            vec![
                Diff::delete("ABCD"),
                Diff::equal("a"),
                Diff::delete("="),
                Diff::insert("-"),
                Diff::equal("bcd"),
                Diff::delete("="),
                Diff::insert("-"),
                Diff::equal("efghijklmnopqrs"),
                Diff::delete("EFGHIJKLMNOefg"),
            ],
            dmp.diff_main(
                "ABCDa=bcd=efghijklmnopqrsEFGHIJKLMNOefg",
                "a-bcd-efghijklmnopqrs"
            )
        );

        // Large equality.
        assert_eq!(
            vec![
                Diff::insert(" "),
                Diff::equal("a"),
                Diff::insert("nd"),
                Diff::equal(" [[Pennsylvania]]"),
                Diff::delete(" and [[New"),
            ],
            dmp.diff_main("a [[Pennsylvania]] and [[New", " and [[Pennsylvania]]")
        );
    }

    #[test]
    fn test_diff_main_linemode() {
        let mut dmp = DiffMatchPatch::new();
        dmp.set_timeout(None);

        // Line mode and character mode agree after cleanup.
        let old = "1234567890\n1234567890\n1234567890\n1234567890\n1234567890\n1234567890\n1234567890\n1234567890\n1234567890\n1234567890\n1234567890\n1234567890\n1234567890\n";
        let new = "abcdefghij\nabcdefghij\nabcdefghij\nabcdefghij\nabcdefghij\nabcdefghij\nabcdefghij\nabcdefghij\nabcdefghij\nabcdefghij\nabcdefghij\nabcdefghij\nabcdefghij\n";
        dmp.set_checklines(true);
        let line_diffs = dmp.diff_main(old, new);
        dmp.set_checklines(false);
        let char_diffs = dmp.diff_main(old, new);
        assert_eq!(char_diffs, line_diffs);

        // Either way both texts must be recoverable.
        let old = "1234567890\n1234567890\n1234567890\nabcdef\nghijkl\n1234567890\n1234567890\n1234567890\nmnopqr\n1234567890\n1234567890\n";
        let new = "abcdefghij\n1234567890\n1234567890\n1234567890\nstuvwx\nyz\n1234567890\n1234567890\n";
        dmp.set_checklines(true);
        let diffs = dmp.diff_main(old, new);
        assert_eq!(old, dmp.diff_text1(&diffs));
        assert_eq!(new, dmp.diff_text2(&diffs));
    }
}
