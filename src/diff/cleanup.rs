//! Post-hoc normalization passes over edit scripts. All of them mutate the
//! script in place and keep it well formed: no empty records, no adjacent
//! records with the same operation.

use super::common::{common_overlap, common_prefix, common_suffix};
use super::{Diff, Op};
use crate::DiffMatchPatch;

/// Coalesce runs of the same operation, hoist shared affixes of paired
/// delete/insert runs into the neighbouring equalities, and slide single
/// edits over equalities they duplicate. Repeats until stable.
pub(crate) fn cleanup_merge(diffs: &mut Vec<Diff>) {
    // A trailing dummy equality flushes the final run.
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
                pointer += 1;
            }
            Op::Delete => {
                count_delete += 1;
                text_delete.extend_from_slice(diffs[pointer].data());
                pointer += 1;
            }
            Op::Equal => {
                if count_delete + count_insert > 1 {
                    if count_delete != 0 && count_insert != 0 {
                        // Factor out a common prefix into the equality before
                        // the run.
                        let commonlen = common_prefix(&text_insert, &text_delete);
                        if commonlen != 0 {
                            let anchor = pointer - count_delete - count_insert;
                            if anchor > 0 && diffs[anchor - 1].op == Op::Equal {
                                diffs[anchor - 1]
                                    .text
                                    .extend_from_slice(&text_insert[..commonlen]);
                            } else {
                                diffs.insert(0, Diff::new(Op::Equal, &text_insert[..commonlen]));
                                pointer += 1;
                            }
                            text_insert.drain(..commonlen);
                            text_delete.drain(..commonlen);
                        }

                        // And a common suffix into the equality after it.
                        let commonlen = common_suffix(&text_insert, &text_delete);
                        if commonlen != 0 {
                            let mut merged =
                                text_insert[text_insert.len() - commonlen..].to_vec();
                            merged.extend_from_slice(diffs[pointer].data());
                            diffs[pointer].text = merged;
                            text_insert.truncate(text_insert.len() - commonlen);
                            text_delete.truncate(text_delete.len() - commonlen);
                        }
                    }

                    // Replace the run with the merged records.
                    pointer -= count_delete + count_insert;
                    diffs.drain(pointer..pointer + count_delete + count_insert);
                    if !text_delete.is_empty() {
                        diffs.insert(pointer, Diff::new(Op::Delete, &text_delete));
                        pointer += 1;
                    }
                    if !text_insert.is_empty() {
                        diffs.insert(pointer, Diff::new(Op::Insert, &text_insert));
                        pointer += 1;
                    }
                    pointer += 1;
                } else if pointer != 0 && diffs[pointer - 1].op == Op::Equal {
                    // Merge this equality into the previous one.
                    let tail = diffs[pointer].text.clone();
                    diffs[pointer - 1].text.extend_from_slice(&tail);
                    diffs.remove(pointer);
                } else {
                    pointer += 1;
                }

                count_insert = 0;
                count_delete = 0;
                text_delete.clear();
                text_insert.clear();
            }
        }
    }

    if diffs.last().is_some_and(|d| d.text.is_empty()) {
        diffs.pop();
    }

    // Second pass: a single edit surrounded by equalities can sometimes be
    // shifted sideways to eliminate one of them,
    // e.g. A<ins>BA</ins>C -> <ins>AB</ins>AC.
    let mut changes = false;
    let mut pointer = 1;
    while pointer + 1 < diffs.len() {
        if diffs[pointer - 1].op == Op::Equal && diffs[pointer + 1].op == Op::Equal {
            let prev = diffs[pointer - 1].text.clone();
            let next = diffs[pointer + 1].text.clone();

            if diffs[pointer].text.ends_with(&prev) {
                // Shift the edit over the previous equality.
                let edit = &diffs[pointer].text;
                let mut shifted = prev.clone();
                shifted.extend_from_slice(&edit[..edit.len() - prev.len()]);
                diffs[pointer].text = shifted;

                let mut grown = prev;
                grown.extend_from_slice(&next);
                diffs[pointer + 1].text = grown;

                diffs.remove(pointer - 1);
                changes = true;
            } else if diffs[pointer].text.starts_with(&next) {
                // Shift the edit over the next equality.
                diffs[pointer - 1].text.extend_from_slice(&next);

                let edit = &diffs[pointer].text;
                let mut shifted = edit[next.len()..].to_vec();
                shifted.extend_from_slice(&next);
                diffs[pointer].text = shifted;

                diffs.remove(pointer + 1);
                changes = true;
            }
        }
        pointer += 1;
    }

    if changes {
        cleanup_merge(diffs);
    }
}

/// Expand coincidental equalities that are no longer than the edits on both
/// sides of them, then lift half-or-more overlaps between adjacent
/// delete/insert pairs into equalities.
pub(crate) fn cleanup_semantic(diffs: &mut Vec<Diff>) {
    let mut changes = false;
    // Indices of candidate equalities, newest last.
    let mut equalities: Vec<usize> = Vec::new();
    let mut last_equality: Option<Vec<char>> = None;

    // Edit sizes before and after the newest candidate.
    let mut insertions1 = 0;
    let mut deletions1 = 0;
    let mut insertions2 = 0;
    let mut deletions2 = 0;

    let mut pointer: isize = 0;
    while (pointer as usize) < diffs.len() {
        let idx = pointer as usize;
        if diffs[idx].op == Op::Equal {
            equalities.push(idx);
            insertions1 = insertions2;
            deletions1 = deletions2;
            insertions2 = 0;
            deletions2 = 0;
            last_equality = Some(diffs[idx].text.clone());
        } else {
            if diffs[idx].op == Op::Insert {
                insertions2 += diffs[idx].size();
            } else {
                deletions2 += diffs[idx].size();
            }

            let expendable = last_equality.as_ref().is_some_and(|eq| {
                eq.len() <= insertions1.max(deletions1) && eq.len() <= insertions2.max(deletions2)
            });
            if expendable {
                if let (Some(eq), Some(&anchor)) = (last_equality.take(), equalities.last()) {
                    // Rewrite the equality as a delete + insert pair.
                    diffs.insert(anchor, Diff::new(Op::Delete, &eq));
                    diffs[anchor + 1].op = Op::Insert;

                    // Drop it, and the one before it needs reevaluation.
                    equalities.pop();
                    equalities.pop();
                    pointer = equalities.last().map_or(-1, |&e| e as isize);

                    insertions1 = 0;
                    deletions1 = 0;
                    insertions2 = 0;
                    deletions2 = 0;
                    changes = true;
                }
            }
        }
        pointer += 1;
    }

    if changes {
        cleanup_merge(diffs);
    }
    cleanup_semantic_lossless(diffs);

    // Lift overlaps between adjacent delete/insert pairs,
    // e.g. <del>abcxxx</del><ins>xxxdef</ins> -> <del>abc</del>xxx<ins>def</ins>
    // and  <del>xxxabc</del><ins>defxxx</ins> -> <ins>def</ins>xxx<del>abc</del>,
    // but only when the overlap spans at least half of one side.
    let mut pointer = 1;
    while pointer < diffs.len() {
        if diffs[pointer - 1].op == Op::Delete && diffs[pointer].op == Op::Insert {
            let deletion = diffs[pointer - 1].text.clone();
            let insertion = diffs[pointer].text.clone();
            let overlap1 = common_overlap(&deletion, &insertion);
            let overlap2 = common_overlap(&insertion, &deletion);

            if overlap1 >= overlap2 {
                if overlap1 * 2 >= deletion.len() || overlap1 * 2 >= insertion.len() {
                    diffs.insert(pointer, Diff::new(Op::Equal, &insertion[..overlap1]));
                    diffs[pointer - 1].text = deletion[..deletion.len() - overlap1].to_vec();
                    diffs[pointer + 1].text = insertion[overlap1..].to_vec();
                    pointer += 1;
                }
            } else if overlap2 * 2 >= deletion.len() || overlap2 * 2 >= insertion.len() {
                // The insertion tail overlaps the deletion head: swap order.
                diffs.insert(pointer, Diff::new(Op::Equal, &deletion[..overlap2]));
                diffs[pointer - 1] =
                    Diff::new(Op::Insert, &insertion[..insertion.len() - overlap2]);
                diffs[pointer + 1] = Diff::new(Op::Delete, &deletion[overlap2..]);
                pointer += 1;
            }
            pointer += 1;
        }
        pointer += 1;
    }
}

/// Slide single edits that sit between two equalities towards the best
/// scoring boundary. Lossless: the described change is unaffected.
pub(crate) fn cleanup_semantic_lossless(diffs: &mut Vec<Diff>) {
    let mut pointer: isize = 1;
    // The first and last record have nothing to trade with.
    while diffs.len() > 1 && (pointer as usize) < diffs.len() - 1 {
        let idx = pointer as usize;
        if diffs[idx - 1].op == Op::Equal && diffs[idx + 1].op == Op::Equal {
            let mut equality1 = diffs[idx - 1].text.clone();
            let mut edit = diffs[idx].text.clone();
            let mut equality2 = diffs[idx + 1].text.clone();

            // First shift the edit as far left as it will go.
            let offset = common_suffix(&equality1, &edit);
            if offset > 0 {
                let common = edit[edit.len() - offset..].to_vec();
                equality1.truncate(equality1.len() - offset);

                let mut shifted = common.clone();
                shifted.extend_from_slice(&edit[..edit.len() - offset]);
                edit = shifted;

                let mut grown = common;
                grown.extend_from_slice(&equality2);
                equality2 = grown;
            }

            // Then step right one unit at a time, keeping the best boundary.
            let mut best_equality1 = equality1.clone();
            let mut best_edit = edit.clone();
            let mut best_equality2 = equality2.clone();
            let mut best_score =
                boundary_score(&equality1, &edit) + boundary_score(&edit, &equality2);

            while !edit.is_empty() && !equality2.is_empty() && edit[0] == equality2[0] {
                equality1.push(edit[0]);
                edit.remove(0);
                edit.push(equality2[0]);
                equality2.remove(0);

                let score = boundary_score(&equality1, &edit) + boundary_score(&edit, &equality2);
                // >= favours trailing over leading whitespace on edits.
                if score >= best_score {
                    best_score = score;
                    best_equality1.clone_from(&equality1);
                    best_edit.clone_from(&edit);
                    best_equality2.clone_from(&equality2);
                }
            }

            if diffs[idx - 1].text != best_equality1 {
                // An improvement was found; write it back.
                if !best_equality1.is_empty() {
                    diffs[idx - 1].text = best_equality1;
                } else {
                    diffs.remove(idx - 1);
                    pointer -= 1;
                }

                diffs[pointer as usize].text = best_edit;

                if !best_equality2.is_empty() {
                    diffs[pointer as usize + 1].text = best_equality2;
                } else {
                    diffs.remove(pointer as usize + 1);
                    pointer -= 1;
                }
            }
        }
        pointer += 1;
    }
}

// Score how nicely the boundary between `one` and `two` falls on logical
// breaks, from 6 (edge of the text) down to 0 (mid-word).
fn boundary_score(one: &[char], two: &[char]) -> u8 {
    let (Some(&char1), Some(&char2)) = (one.last(), two.first()) else {
        return 6;
    };

    let non_alphanumeric1 = !char1.is_alphanumeric();
    let non_alphanumeric2 = !char2.is_alphanumeric();
    let whitespace1 = non_alphanumeric1 && char1.is_whitespace();
    let whitespace2 = non_alphanumeric2 && char2.is_whitespace();
    let linebreak1 = whitespace1 && (char1 == '\n' || char1 == '\r');
    let linebreak2 = whitespace2 && (char2 == '\n' || char2 == '\r');
    let blankline1 = linebreak1 && ends_with_blank_line(one);
    let blankline2 = linebreak2 && starts_with_blank_line(two);

    if blankline1 || blankline2 {
        5
    } else if linebreak1 || linebreak2 {
        4
    } else if non_alphanumeric1 && !whitespace1 && whitespace2 {
        // End of a sentence.
        3
    } else if whitespace1 || whitespace2 {
        2
    } else if non_alphanumeric1 || non_alphanumeric2 {
        1
    } else {
        0
    }
}

fn ends_with_blank_line(text: &[char]) -> bool {
    text.ends_with(&['\n', '\n']) || text.ends_with(&['\n', '\r', '\n'])
}

fn starts_with_blank_line(text: &[char]) -> bool {
    text.starts_with(&['\n', '\n'])
        || text.starts_with(&['\n', '\r', '\n'])
        || text.starts_with(&['\r', '\n', '\n'])
        || text.starts_with(&['\r', '\n', '\r', '\n'])
}

impl DiffMatchPatch {
    /// Drop equalities shorter than `edit_cost` that sit between edits on
    /// both sides, when the surrounding edit shapes make the trade pay off.
    pub(crate) fn cleanup_efficiency(&self, diffs: &mut Vec<Diff>) {
        if diffs.is_empty() {
            return;
        }
        let edit_cost = self.edit_cost();

        let mut changes = false;
        let mut equalities: Vec<usize> = Vec::new();
        let mut last_equality: Option<Vec<char>> = None;

        // Edit operations on either side of the newest candidate.
        let mut pre_ins = false;
        let mut pre_del = false;
        let mut post_ins = false;
        let mut post_del = false;

        let mut pointer: isize = 0;
        while (pointer as usize) < diffs.len() {
            let idx = pointer as usize;
            if diffs[idx].op == Op::Equal {
                if diffs[idx].size() < edit_cost && (post_ins || post_del) {
                    // A candidate.
                    equalities.push(idx);
                    pre_ins = post_ins;
                    pre_del = post_del;
                    last_equality = Some(diffs[idx].text.clone());
                } else {
                    // Not a candidate, and can never become one.
                    equalities.clear();
                    last_equality = None;
                }
                post_ins = false;
                post_del = false;
            } else {
                if diffs[idx].op == Op::Delete {
                    post_del = true;
                } else {
                    post_ins = true;
                }

                // Five shapes are worth splitting:
                // <ins>A</ins><del>B</del>XY<ins>C</ins><del>D</del>
                // <ins>A</ins>X<ins>C</ins><del>D</del>
                // <ins>A</ins><del>B</del>X<ins>C</ins>
                // <ins>A</del>X<ins>C</ins><del>D</del>
                // <ins>A</ins><del>B</del>X<del>C</del>
                let split = last_equality.as_ref().is_some_and(|eq| {
                    (pre_ins && pre_del && post_ins && post_del)
                        || (eq.len() * 2 < edit_cost
                            && pre_ins as u8 + pre_del as u8 + post_ins as u8 + post_del as u8 == 3)
                });
                if split {
                    if let (Some(eq), Some(&anchor)) = (last_equality.take(), equalities.last()) {
                        // Rewrite the equality as a delete + insert pair.
                        diffs.insert(anchor, Diff::new(Op::Delete, &eq));
                        diffs[anchor + 1].op = Op::Insert;
                        equalities.pop();

                        if pre_ins && pre_del {
                            // No changes that could affect earlier entries.
                            post_ins = true;
                            post_del = true;
                            equalities.clear();
                        } else {
                            // The previous equality needs reevaluation.
                            equalities.pop();
                            pointer = equalities.last().map_or(-1, |&e| e as isize);
                            post_ins = false;
                            post_del = false;
                        }
                        changes = true;
                    }
                }
            }
            pointer += 1;
        }

        if changes {
            cleanup_merge(diffs);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleanup_merge() {
        // Null case.
        let mut diffs: Vec<Diff> = vec![];
        cleanup_merge(&mut diffs);
        assert!(diffs.is_empty());

        // No change.
        let mut diffs = vec![Diff::equal("a"), Diff::delete("b"), Diff::insert("c")];
        cleanup_merge(&mut diffs);
        assert_eq!(
            vec![Diff::equal("a"), Diff::delete("b"), Diff::insert("c")],
            diffs
        );

        // Merge equalities.
        let mut diffs = vec![Diff::equal("a"), Diff::equal("b"), Diff::equal("c")];
        cleanup_merge(&mut diffs);
        assert_eq!(vec![Diff::equal("abc")], diffs);

        // Merge deletions.
        let mut diffs = vec![Diff::delete("a"), Diff::delete("b"), Diff::delete("c")];
        cleanup_merge(&mut diffs);
        assert_eq!(vec![Diff::delete("abc")], diffs);

        // Merge insertions.
        let mut diffs = vec![Diff::insert("a"), Diff::insert("b"), Diff::insert("c")];
        cleanup_merge(&mut diffs);
        assert_eq!(vec![Diff::insert("abc")], diffs);

        // Merge interweave.
        let mut diffs = vec![
            Diff::delete("a"),
            Diff::insert("b"),
            Diff::delete("c"),
            Diff::insert("d"),
            Diff::equal("e"),
            Diff::equal("f"),
        ];
        cleanup_merge(&mut diffs);
        assert_eq!(
            vec![Diff::delete("ac"), Diff::insert("bd"), Diff::equal("ef")],
            diffs
        );

        // Prefix and suffix detection.
        let mut diffs = vec![Diff::delete("a"), Diff::insert("abc"), Diff::delete("dc")];
        cleanup_merge(&mut diffs);
        assert_eq!(
            vec![
                Diff::equal("a"),
                Diff::delete("d"),
                Diff::insert("b"),
                Diff::equal("c"),
            ],
            diffs
        );

        // Prefix and suffix detection with equalities.
        let mut diffs = vec![
            Diff::equal("x"),
            Diff::delete("a"),
            Diff::insert("abc"),
            Diff::delete("dc"),
            Diff::equal("y"),
        ];
        cleanup_merge(&mut diffs);
        assert_eq!(
            vec![
                Diff::equal("xa"),
                Diff::delete("d"),
                Diff::insert("b"),
                Diff::equal("cy"),
            ],
            diffs
        );

        // Slide edit left.
        let mut diffs = vec![Diff::equal("a"), Diff::insert("ba"), Diff::equal("c")];
        cleanup_merge(&mut diffs);
        assert_eq!(vec![Diff::insert("ab"), Diff::equal("ac")], diffs);

        // Slide edit right.
        let mut diffs = vec![Diff::equal("c"), Diff::insert("ab"), Diff::equal("a")];
        cleanup_merge(&mut diffs);
        assert_eq!(vec![Diff::equal("ca"), Diff::insert("ba")], diffs);

        // Slide edit left recursive.
        let mut diffs = vec![
            Diff::equal("a"),
            Diff::delete("b"),
            Diff::equal("c"),
            Diff::delete("ac"),
            Diff::equal("x"),
        ];
        cleanup_merge(&mut diffs);
        assert_eq!(vec![Diff::delete("abc"), Diff::equal("acx")], diffs);

        // Slide edit right recursive.
        let mut diffs = vec![
            Diff::equal("x"),
            Diff::delete("ca"),
            Diff::equal("c"),
            Diff::delete("b"),
            Diff::equal("a"),
        ];
        cleanup_merge(&mut diffs);
        assert_eq!(vec![Diff::equal("xca"), Diff::delete("cba")], diffs);

        // Empty merge.
        let mut diffs = vec![Diff::delete("b"), Diff::insert("ab"), Diff::equal("c")];
        cleanup_merge(&mut diffs);
        assert_eq!(vec![Diff::insert("a"), Diff::equal("bc")], diffs);

        // Empty equality.
        let mut diffs = vec![Diff::equal(""), Diff::insert("a"), Diff::equal("b")];
        cleanup_merge(&mut diffs);
        assert_eq!(vec![Diff::insert("a"), Diff::equal("b")], diffs);
    }

    #[test]
    fn test_cleanup_semantic() {
        // Null case.
        let mut diffs: Vec<Diff> = vec![];
        cleanup_semantic(&mut diffs);
        assert!(diffs.is_empty());

        // No elimination #1.
        let mut diffs = vec![
            Diff::delete("ab"),
            Diff::insert("cd"),
            Diff::equal("12"),
            Diff::delete("e"),
        ];
        cleanup_semantic(&mut diffs);
        assert_eq!(
            vec![
                Diff::delete("ab"),
                Diff::insert("cd"),
                Diff::equal("12"),
                Diff::delete("e"),
            ],
            diffs
        );

        // No elimination #2.
        let mut diffs = vec![
            Diff::delete("abc"),
            Diff::insert("ABC"),
            Diff::equal("1234"),
            Diff::delete("wxyz"),
        ];
        cleanup_semantic(&mut diffs);
        assert_eq!(
            vec![
                Diff::delete("abc"),
                Diff::insert("ABC"),
                Diff::equal("1234"),
                Diff::delete("wxyz"),
            ],
            diffs
        );

        // Simple elimination.
        let mut diffs = vec![Diff::delete("a"), Diff::equal("b"), Diff::delete("c")];
        cleanup_semantic(&mut diffs);
        assert_eq!(vec![Diff::delete("abc"), Diff::insert("b")], diffs);

        // Backpass elimination.
        let mut diffs = vec![
            Diff::delete("ab"),
            Diff::equal("cd"),
            Diff::delete("e"),
            Diff::equal("f"),
            Diff::insert("g"),
        ];
        cleanup_semantic(&mut diffs);
        assert_eq!(vec![Diff::delete("abcdef"), Diff::insert("cdfg")], diffs);

        // Multiple eliminations.
        let mut diffs = vec![
            Diff::insert("1"),
            Diff::equal("A"),
            Diff::delete("B"),
            Diff::insert("2"),
            Diff::equal("_"),
            Diff::insert("1"),
            Diff::equal("A"),
            Diff::delete("B"),
            Diff::insert("2"),
        ];
        cleanup_semantic(&mut diffs);
        assert_eq!(vec![Diff::delete("AB_AB"), Diff::insert("1A2_1A2")], diffs);

        // Word boundaries.
        let mut diffs = vec![
            Diff::equal("The c"),
            Diff::delete("ow and the c"),
            Diff::equal("at."),
        ];
        cleanup_semantic(&mut diffs);
        assert_eq!(
            vec![
                Diff::equal("The "),
                Diff::delete("cow and the "),
                Diff::equal("cat."),
            ],
            diffs
        );

        // No overlap elimination.
        let mut diffs = vec![Diff::delete("abcxx"), Diff::insert("xxdef")];
        cleanup_semantic(&mut diffs);
        assert_eq!(vec![Diff::delete("abcxx"), Diff::insert("xxdef")], diffs);

        // Overlap elimination.
        let mut diffs = vec![Diff::delete("abcxxx"), Diff::insert("xxxdef")];
        cleanup_semantic(&mut diffs);
        assert_eq!(
            vec![Diff::delete("abc"), Diff::equal("xxx"), Diff::insert("def")],
            diffs
        );

        // Reverse overlap elimination.
        let mut diffs = vec![Diff::delete("xxxabc"), Diff::insert("defxxx")];
        cleanup_semantic(&mut diffs);
        assert_eq!(
            vec![Diff::insert("def"), Diff::equal("xxx"), Diff::delete("abc")],
            diffs
        );

        // Two overlap eliminations.
        let mut diffs = vec![
            Diff::delete("abcd1212"),
            Diff::insert("1212efghi"),
            Diff::equal("----"),
            Diff::delete("A3"),
            Diff::insert("3BC"),
        ];
        cleanup_semantic(&mut diffs);
        assert_eq!(
            vec![
                Diff::delete("abcd"),
                Diff::equal("1212"),
                Diff::insert("efghi"),
                Diff::equal("----"),
                Diff::delete("A"),
                Diff::equal("3"),
                Diff::insert("BC"),
            ],
            diffs
        );
    }

    #[test]
    fn test_cleanup_semantic_lossless() {
        // Null case.
        let mut diffs: Vec<Diff> = vec![];
        cleanup_semantic_lossless(&mut diffs);
        assert!(diffs.is_empty());

        // Blank lines.
        let mut diffs = vec![
            Diff::equal("AAA\r\n\r\nBBB"),
            Diff::insert("\r\nDDD\r\n\r\nBBB"),
            Diff::equal("\r\nEEE"),
        ];
        cleanup_semantic_lossless(&mut diffs);
        assert_eq!(
            vec![
                Diff::equal("AAA\r\n\r\n"),
                Diff::insert("BBB\r\nDDD\r\n\r\n"),
                Diff::equal("BBB\r\nEEE"),
            ],
            diffs
        );

        // Line boundaries.
        let mut diffs = vec![
            Diff::equal("AAA\r\nBBB"),
            Diff::insert(" DDD\r\nBBB"),
            Diff::equal(" EEE"),
        ];
        cleanup_semantic_lossless(&mut diffs);
        assert_eq!(
            vec![
                Diff::equal("AAA\r\n"),
                Diff::insert("BBB DDD\r\n"),
                Diff::equal("BBB EEE"),
            ],
            diffs
        );

        // Word boundaries.
        let mut diffs = vec![
            Diff::equal("The c"),
            Diff::insert("ow and the c"),
            Diff::equal("at."),
        ];
        cleanup_semantic_lossless(&mut diffs);
        assert_eq!(
            vec![
                Diff::equal("The "),
                Diff::insert("cow and the "),
                Diff::equal("cat."),
            ],
            diffs
        );

        // Alphanumeric boundaries.
        let mut diffs = vec![
            Diff::equal("The-c"),
            Diff::insert("ow-and-the-c"),
            Diff::equal("at."),
        ];
        cleanup_semantic_lossless(&mut diffs);
        assert_eq!(
            vec![
                Diff::equal("The-"),
                Diff::insert("cow-and-the-"),
                Diff::equal("at."),
            ],
            diffs
        );

        // Hitting the start.
        let mut diffs = vec![Diff::equal("a"), Diff::delete("a"), Diff::equal("ax")];
        cleanup_semantic_lossless(&mut diffs);
        assert_eq!(vec![Diff::delete("a"), Diff::equal("aax")], diffs);

        // Hitting the end.
        let mut diffs = vec![Diff::equal("xa"), Diff::delete("a"), Diff::equal("a")];
        cleanup_semantic_lossless(&mut diffs);
        assert_eq!(vec![Diff::equal("xaa"), Diff::delete("a")], diffs);

        // Sentence boundaries.
        let mut diffs = vec![
            Diff::equal("The xxx. The "),
            Diff::insert("zzz. The "),
            Diff::equal("yyy."),
        ];
        cleanup_semantic_lossless(&mut diffs);
        assert_eq!(
            vec![
                Diff::equal("The xxx."),
                Diff::insert(" The zzz."),
                Diff::equal(" The yyy."),
            ],
            diffs
        );
    }

    #[test]
    fn test_cleanup_efficiency() {
        let mut dmp = DiffMatchPatch::new();

        // Null case.
        let mut diffs: Vec<Diff> = vec![];
        dmp.cleanup_efficiency(&mut diffs);
        assert!(diffs.is_empty());

        // No elimination.
        let mut diffs = vec![
            Diff::delete("ab"),
            Diff::insert("12"),
            Diff::equal("wxyz"),
            Diff::delete("cd"),
            Diff::insert("34"),
        ];
        dmp.cleanup_efficiency(&mut diffs);
        assert_eq!(
            vec![
                Diff::delete("ab"),
                Diff::insert("12"),
                Diff::equal("wxyz"),
                Diff::delete("cd"),
                Diff::insert("34"),
            ],
            diffs
        );

        // Four-edit elimination.
        let mut diffs = vec![
            Diff::delete("ab"),
            Diff::insert("12"),
            Diff::equal("xyz"),
            Diff::delete("cd"),
            Diff::insert("34"),
        ];
        dmp.cleanup_efficiency(&mut diffs);
        assert_eq!(
            vec![Diff::delete("abxyzcd"), Diff::insert("12xyz34")],
            diffs
        );

        // Three-edit elimination.
        let mut diffs = vec![
            Diff::insert("12"),
            Diff::equal("x"),
            Diff::delete("cd"),
            Diff::insert("34"),
        ];
        dmp.cleanup_efficiency(&mut diffs);
        assert_eq!(vec![Diff::delete("xcd"), Diff::insert("12x34")], diffs);

        // Backpass elimination.
        let mut diffs = vec![
            Diff::delete("ab"),
            Diff::insert("12"),
            Diff::equal("xy"),
            Diff::insert("34"),
            Diff::equal("z"),
            Diff::delete("cd"),
            Diff::insert("56"),
        ];
        dmp.cleanup_efficiency(&mut diffs);
        assert_eq!(
            vec![Diff::delete("abxyzcd"), Diff::insert("12xy34z56")],
            diffs
        );

        // High cost elimination.
        dmp.set_edit_cost(5);
        let mut diffs = vec![
            Diff::delete("ab"),
            Diff::insert("12"),
            Diff::equal("wxyz"),
            Diff::delete("cd"),
            Diff::insert("34"),
        ];
        dmp.cleanup_efficiency(&mut diffs);
        assert_eq!(
            vec![Diff::delete("abwxyzcd"), Diff::insert("12wxyz34")],
            diffs
        );
    }
}
