//! The patch engine: turn an edit script into context-carrying hunks, and
//! apply hunks to a target text that may have drifted from the source.

mod text;

use tracing::debug;

use crate::diff::{
    cleanup_semantic, cleanup_semantic_lossless, text1_units, text2_units, x_index, Diff, Op,
};
use crate::{string, units, DiffMatchPatch};

/// One hunk: a localized change with equal-context on both ends and its
/// offsets into the source (`start1`) and target (`start2`) texts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Patch {
    pub(crate) diffs: Vec<Diff>,
    pub(crate) start1: usize,
    pub(crate) start2: usize,
    pub(crate) length1: usize,
    pub(crate) length2: usize,
}

impl Patch {
    /// The embedded edit script, including the context records.
    pub fn diffs(&self) -> &[Diff] {
        &self.diffs
    }

    /// 0-based offset of the hunk in the source text.
    pub fn start1(&self) -> usize {
        self.start1
    }

    /// 0-based offset of the hunk in the target text.
    pub fn start2(&self) -> usize {
        self.start2
    }

    /// Code units of source text the hunk covers.
    pub fn length1(&self) -> usize {
        self.length1
    }

    /// Code units of target text the hunk covers.
    pub fn length2(&self) -> usize {
        self.length2
    }
}

/// A list of hunks.
pub type Patches = Vec<Patch>;

/// The accepted argument shapes of [`DiffMatchPatch::patch_make`].
pub enum PatchInput<'a> {
    /// Source and target texts; the diff is computed and cleaned up here.
    Texts(&'a str, &'a str),
    /// A precomputed diff; the source text is reconstructed from it.
    Diffs(&'a [Diff]),
    /// Source text plus its precomputed diff. The preferred shape.
    TextDiffs(&'a str, &'a [Diff]),
    /// Source text, target text and the diff.
    #[deprecated(note = "the target text is ignored; use `TextDiffs`")]
    TextsDiffs(&'a str, &'a str, &'a [Diff]),
}

impl<'a> PatchInput<'a> {
    pub fn new_texts(old: &'a str, new: &'a str) -> Self {
        Self::Texts(old, new)
    }

    pub fn new_diffs(diffs: &'a [Diff]) -> Self {
        Self::Diffs(diffs)
    }

    pub fn new_text_diffs(old: &'a str, diffs: &'a [Diff]) -> Self {
        Self::TextDiffs(old, diffs)
    }
}

impl DiffMatchPatch {
    /// Build a list of hunks from any of the [`PatchInput`] shapes.
    ///
    /// ```
    /// use textpatch::{DiffMatchPatch, PatchInput};
    ///
    /// let dmp = DiffMatchPatch::new();
    /// let patches = dmp.patch_make(PatchInput::new_texts(
    ///     "Apples are a fruit.",
    ///     "Bananas are also fruit.",
    /// ));
    /// let (patched, applied) = dmp.patch_apply(&patches, "Apples are a fruit.");
    /// assert_eq!("Bananas are also fruit.", patched);
    /// assert!(applied.iter().all(|&ok| ok));
    /// ```
    #[allow(deprecated)]
    pub fn patch_make(&self, input: PatchInput) -> Patches {
        let computed;
        let (text, diffs): (Vec<char>, &[Diff]) = match input {
            PatchInput::Texts(old, new) => {
                let mut diffs = self.diff_main(old, new);
                if diffs.len() > 2 {
                    cleanup_semantic(&mut diffs);
                    self.cleanup_efficiency(&mut diffs);
                }
                computed = diffs;
                (units(old), &computed)
            }
            PatchInput::Diffs(diffs) => (text1_units(diffs), diffs),
            PatchInput::TextDiffs(old, diffs) => (units(old), diffs),
            PatchInput::TextsDiffs(old, _, diffs) => (units(old), diffs),
        };

        self.patch_make_units(&text, diffs)
    }

    fn patch_make_units(&self, text: &[char], diffs: &[Diff]) -> Patches {
        if diffs.is_empty() {
            return Vec::new();
        }

        let margin = self.patch_margin() as usize;
        let mut patches = Vec::new();
        let mut patch = Patch::default();

        // Cursors into the source and target texts.
        let mut char_count1 = 0;
        let mut char_count2 = 0;

        // Unlike unidiff, these hunks carry a rolling context: the context
        // of each hunk is measured against the text with all earlier hunks
        // already applied.
        let mut prepatch: Vec<char> = text.to_vec();
        let mut postpatch: Vec<char> = text.to_vec();

        for (idx, diff) in diffs.iter().enumerate() {
            if patch.diffs.is_empty() && diff.op != Op::Equal {
                patch.start1 = char_count1;
                patch.start2 = char_count2;
            }

            match diff.op {
                Op::Insert => {
                    patch.length2 += diff.size();
                    postpatch = [
                        &postpatch[..char_count2],
                        diff.data(),
                        &postpatch[char_count2..],
                    ]
                    .concat();
                    patch.diffs.push(diff.clone());
                }
                Op::Delete => {
                    patch.length1 += diff.size();
                    postpatch = [
                        &postpatch[..char_count2],
                        &postpatch[char_count2 + diff.size()..],
                    ]
                    .concat();
                    patch.diffs.push(diff.clone());
                }
                Op::Equal => {
                    if diff.size() <= 2 * margin && !patch.diffs.is_empty() && idx + 1 != diffs.len()
                    {
                        // Small equality inside a hunk.
                        patch.length1 += diff.size();
                        patch.length2 += diff.size();
                        patch.diffs.push(diff.clone());
                    } else if diff.size() >= 2 * margin && !patch.diffs.is_empty() {
                        // Time to close this hunk and start fresh.
                        self.patch_add_context(&mut patch, &prepatch);
                        patches.push(std::mem::take(&mut patch));
                        prepatch.clone_from(&postpatch);
                        char_count1 = char_count2;
                    }
                }
            }

            if diff.op != Op::Insert {
                char_count1 += diff.size();
            }
            if diff.op != Op::Delete {
                char_count2 += diff.size();
            }
        }

        // Pick up the leftover hunk if not empty.
        if !patch.diffs.is_empty() {
            self.patch_add_context(&mut patch, &prepatch);
            patches.push(patch);
        }

        patches
    }

    // Grow equal context around a bare hunk until the covered pattern is
    // unique in `text`, bounded by the matcher's width, then extend one
    // extra margin.
    fn patch_add_context(&self, patch: &mut Patch, text: &[char]) {
        if text.is_empty() {
            return;
        }

        let margin = self.patch_margin() as usize;
        let mut pattern = &text[patch.start2..patch.start2 + patch.length1];
        let mut padding = 0;

        while pattern.is_empty()
            || (find(text, pattern) != rfind(text, pattern)
                && pattern.len() < self.match_max_bits() - 2 * margin)
        {
            padding += margin;
            let begin = patch.start2.saturating_sub(padding);
            let end = (patch.start2 + patch.length1 + padding).min(text.len());
            pattern = &text[begin..end];
        }

        // One extra chunk for good luck.
        padding += margin;

        let begin = patch.start2.saturating_sub(padding);
        let prefix = &text[begin..patch.start2];
        if !prefix.is_empty() {
            patch.diffs.insert(0, Diff::new(Op::Equal, prefix));
        }

        let begin = (patch.start2 + patch.length1).min(text.len());
        let end = (patch.start2 + patch.length1 + padding).min(text.len());
        let suffix = &text[begin..end];
        if !suffix.is_empty() {
            patch.diffs.push(Diff::new(Op::Equal, suffix));
        }

        patch.start1 -= prefix.len();
        patch.start2 -= prefix.len();
        patch.length1 += prefix.len() + suffix.len();
        patch.length2 += prefix.len() + suffix.len();
    }

    /// A deep copy of a list of hunks. Equivalent to `patches.clone()`;
    /// here for parity with the rest of the operation set.
    pub fn patch_deep_copy(&self, patches: &Patches) -> Patches {
        patches.clone()
    }

    /// Apply hunks to `text`, tolerating drift between it and the text the
    /// hunks were made from. Returns the patched text and one success flag
    /// per hunk (hunks may have been split internally, so the flag list can
    /// be longer than the input).
    pub fn patch_apply(&self, patches: &Patches, text: &str) -> (String, Vec<bool>) {
        let (patched, applied) = self.patch_apply_units(patches, &units(text));
        (string(&patched), applied)
    }

    fn patch_apply_units(&self, patches: &Patches, source: &[char]) -> (Vec<char>, Vec<bool>) {
        if patches.is_empty() {
            return (source.to_vec(), Vec::new());
        }

        // Work on a deep copy; the caller's hunks stay untouched.
        let mut patches = patches.clone();

        let null_padding = self.patch_add_padding_units(&mut patches);
        let mut text = [&null_padding[..], source, &null_padding[..]].concat();
        self.patch_split_max_units(&mut patches);

        let deadline = self.deadline();

        // Offset between expected and actual hunk locations, accumulated
        // over the hunks applied so far.
        let mut delta: isize = 0;
        let mut applied = vec![false; patches.len()];

        for (x, patch) in patches.iter().enumerate() {
            let expected_loc = (patch.start2 as isize + delta).max(0) as usize;
            let text1 = text1_units(&patch.diffs);

            let mut start_loc = None;
            let mut end_loc = None;
            if text1.len() > self.match_max_bits() {
                // Only a monster delete leaves an oversized pattern behind;
                // match its head and tail separately.
                let head = self
                    .match_internal(&text, &text1[..self.match_max_bits()], expected_loc)
                    .ok()
                    .flatten();
                if let Some(head_loc) = head {
                    end_loc = self
                        .match_internal(
                            &text,
                            &text1[text1.len() - self.match_max_bits()..],
                            expected_loc + text1.len() - self.match_max_bits(),
                        )
                        .ok()
                        .flatten();
                    // Accept only a tail strictly after the head.
                    if end_loc.is_some_and(|el| head_loc < el) {
                        start_loc = Some(head_loc);
                    }
                }
            } else {
                start_loc = self.match_internal(&text, &text1, expected_loc).ok().flatten();
            }

            let Some(start_loc) = start_loc else {
                // No match. Subtract this hunk's net length so the later
                // hunks keep sensible expected positions.
                delta -= patch.length2 as isize - patch.length1 as isize;
                debug!(hunk = x, applied = false, "hunk skipped");
                continue;
            };

            applied[x] = true;
            delta = start_loc as isize - expected_loc as isize;

            let end = match end_loc {
                Some(el) => (el + self.match_max_bits()).min(text.len()),
                None => (start_loc + text1.len()).min(text.len()),
            };
            let found = text[start_loc..end].to_vec();

            if text1 == found {
                // Spot on: splice the replacement straight in.
                text = [
                    &text[..start_loc],
                    &text2_units(&patch.diffs),
                    &text[start_loc + text1.len()..],
                ]
                .concat();
            } else {
                // Imperfect match. Diff what we expected against what we
                // found and thread the hunk's edits through it.
                let mut diffs = self.diff_internal(&text1, &found, false, deadline);
                if text1.len() > self.match_max_bits()
                    && self.diff_levenshtein(&diffs) as f64 / text1.len() as f64
                        > self.delete_threshold() as f64
                {
                    // The end points match but the content is too far gone.
                    applied[x] = false;
                } else {
                    cleanup_semantic_lossless(&mut diffs);
                    let mut index1 = 0;
                    for diff in &patch.diffs {
                        if diff.op != Op::Equal {
                            let index2 = x_index(&diffs, index1);
                            if diff.op == Op::Insert {
                                text = [
                                    &text[..start_loc + index2],
                                    diff.data(),
                                    &text[start_loc + index2..],
                                ]
                                .concat();
                            } else {
                                let del_end = start_loc + x_index(&diffs, index1 + diff.size());
                                text = [&text[..start_loc + index2], &text[del_end..]].concat();
                            }
                        }
                        if diff.op != Op::Delete {
                            index1 += diff.size();
                        }
                    }
                }
            }
            debug!(hunk = x, applied = applied[x], "hunk applied");
        }

        // Strip the padding off.
        let text = text[null_padding.len()..text.len() - null_padding.len()].to_vec();
        (text, applied)
    }

    /// Add a run of padding units to both ends of every hunk's context and
    /// bump the offsets, so hunks at the text edges have context to match
    /// against. Returns the padding string.
    pub fn patch_add_padding(&self, patches: &mut Patches) -> String {
        string(&self.patch_add_padding_units(patches))
    }

    fn patch_add_padding_units(&self, patches: &mut Patches) -> Vec<char> {
        let pad_len = self.patch_margin() as usize;
        // Code units 1..margin; they cannot collide with real text drawn
        // from any sane source.
        let null_padding: Vec<char> = (1..=pad_len as u32).filter_map(char::from_u32).collect();

        // Bump all the hunks forward.
        for patch in patches.iter_mut() {
            patch.start1 += pad_len;
            patch.start2 += pad_len;
        }

        // The first hunk's leading edge.
        if let Some(first) = patches.first_mut() {
            if first.diffs.first().map_or(true, |d| d.op != Op::Equal) {
                first.diffs.insert(0, Diff::new(Op::Equal, &null_padding));
                first.start1 -= pad_len;
                first.start2 -= pad_len;
                first.length1 += pad_len;
                first.length2 += pad_len;
            } else if let Some(d) = first.diffs.first_mut() {
                if pad_len > d.size() {
                    // Grow the first equality back into the padding.
                    let extra = pad_len - d.size();
                    let mut grown = null_padding[d.size()..].to_vec();
                    grown.extend_from_slice(d.data());
                    d.text = grown;
                    first.start1 -= extra;
                    first.start2 -= extra;
                    first.length1 += extra;
                    first.length2 += extra;
                }
            }
        }

        // The last hunk's trailing edge.
        if let Some(last) = patches.last_mut() {
            if last.diffs.last().map_or(true, |d| d.op != Op::Equal) {
                last.diffs.push(Diff::new(Op::Equal, &null_padding));
                last.length1 += pad_len;
                last.length2 += pad_len;
            } else if let Some(d) = last.diffs.last_mut() {
                if pad_len > d.size() {
                    let extra = pad_len - d.size();
                    d.text.extend_from_slice(&null_padding[..extra]);
                    last.length1 += extra;
                    last.length2 += extra;
                }
            }
        }

        null_padding
    }

    /// Break up any hunk covering more source text than the matcher can
    /// handle into a chain of smaller hunks with rolling context.
    pub fn patch_split_max(&self, patches: &mut Patches) {
        self.patch_split_max_units(patches);
    }

    fn patch_split_max_units(&self, patches: &mut Patches) {
        let patch_size = self.match_max_bits();
        let margin = self.patch_margin() as usize;

        let mut x = 0;
        while x < patches.len() {
            if patches[x].length1 <= patch_size {
                x += 1;
                continue;
            }

            let mut bigpatch = patches.remove(x);
            let mut start1 = bigpatch.start1;
            let mut start2 = bigpatch.start2;
            let mut precontext: Vec<char> = Vec::new();
            let mut subpatches = Vec::new();

            while !bigpatch.diffs.is_empty() {
                let mut patch = Patch {
                    start1: start1 - precontext.len(),
                    start2: start2 - precontext.len(),
                    ..Default::default()
                };
                let mut empty = true;

                if !precontext.is_empty() {
                    patch.length1 = precontext.len();
                    patch.length2 = precontext.len();
                    patch.diffs.push(Diff::new(Op::Equal, &precontext));
                }

                while !bigpatch.diffs.is_empty() && patch.length1 < patch_size - margin {
                    let op = bigpatch.diffs[0].op;
                    if op == Op::Insert {
                        // Insertions are harmless.
                        let d = bigpatch.diffs.remove(0);
                        patch.length2 += d.size();
                        start2 += d.size();
                        patch.diffs.push(d);
                        empty = false;
                    } else if op == Op::Delete
                        && patch.diffs.len() == 1
                        && patch.diffs[0].op == Op::Equal
                        && bigpatch.diffs[0].size() > 2 * patch_size
                    {
                        // A monster deletion passes through in one chunk.
                        let d = bigpatch.diffs.remove(0);
                        patch.length1 += d.size();
                        start1 += d.size();
                        patch.diffs.push(d);
                        empty = false;
                    } else {
                        // Deletion or equality: take as much as fits.
                        let take = bigpatch.diffs[0]
                            .size()
                            .min(patch_size - patch.length1 - margin);
                        let run = bigpatch.diffs[0].data()[..take].to_vec();

                        patch.length1 += run.len();
                        start1 += run.len();
                        if op == Op::Equal {
                            patch.length2 += run.len();
                            start2 += run.len();
                        } else {
                            empty = false;
                        }

                        if run.len() == bigpatch.diffs[0].size() {
                            bigpatch.diffs.remove(0);
                        } else {
                            bigpatch.diffs[0].text.drain(..run.len());
                        }
                        patch.diffs.push(Diff::new(op, &run));
                    }
                }

                // Head context for the next subpatch.
                precontext = text2_units(&patch.diffs);
                if precontext.len() > margin {
                    precontext.drain(..precontext.len() - margin);
                }

                // Trailing context for this one.
                let mut postcontext = text1_units(&bigpatch.diffs);
                postcontext.truncate(margin);
                if !postcontext.is_empty() {
                    patch.length1 += postcontext.len();
                    patch.length2 += postcontext.len();
                    match patch.diffs.last_mut() {
                        Some(d) if d.op == Op::Equal => d.text.extend_from_slice(&postcontext),
                        _ => patch.diffs.push(Diff::new(Op::Equal, &postcontext)),
                    }
                }

                if !empty {
                    subpatches.push(patch);
                }
            }

            let inserted = subpatches.len();
            patches.splice(x..x, subpatches);
            x += inserted;
        }
    }
}

fn find(text: &[char], pattern: &[char]) -> Option<usize> {
    if pattern.is_empty() {
        return Some(0);
    }
    text.windows(pattern.len()).position(|w| w == pattern)
}

fn rfind(text: &[char], pattern: &[char]) -> Option<usize> {
    if pattern.is_empty() {
        return Some(text.len());
    }
    text.windows(pattern.len()).rposition(|w| w == pattern)
}
