//! The textual form of hunks: GNU-diff-style headers with percent-escaped
//! body lines.

use std::fmt::Display;

use crate::delta::{escape, unescape};
use crate::diff::{Diff, Op};
use crate::{DiffMatchPatch, Error};

use super::{Patch, Patches};

impl Display for Patch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "@@ -{} +{} @@",
            coords(self.start1, self.length1),
            coords(self.start2, self.length2)
        )?;

        for diff in &self.diffs {
            let sign = match diff.op() {
                Op::Insert => '+',
                Op::Delete => '-',
                Op::Equal => ' ',
            };
            writeln!(f, "{sign}{}", escape(&diff.text()))?;
        }

        Ok(())
    }
}

// Offsets print 1-based; a length of 1 is implied, and an empty range keeps
// the 0-based offset with an explicit ",0".
fn coords(start: usize, length: usize) -> String {
    match length {
        0 => format!("{start},0"),
        1 => format!("{}", start + 1),
        _ => format!("{},{}", start + 1, length),
    }
}

fn parse_coords(text: &str) -> Option<(usize, usize)> {
    let number = |t: &str| -> Option<usize> {
        if t.is_empty() || !t.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        t.parse().ok()
    };

    match text.split_once(',') {
        // A missing length reads as 1, keeping the raw start.
        None => Some((number(text)?, 1)),
        // A literal 0 keeps the raw start too.
        Some((start, "0")) => Some((number(start)?, 0)),
        // Anything else converts the start to 0-based.
        Some((start, len)) => Some((number(start)?.checked_sub(1)?, number(len)?)),
    }
}

fn parse_header(line: &str) -> Option<(usize, usize, usize, usize)> {
    let body = line.strip_prefix("@@ -")?.strip_suffix(" @@")?;
    let (old, new) = body.split_once(" +")?;
    let (start1, length1) = parse_coords(old)?;
    let (start2, length2) = parse_coords(new)?;
    Some((start1, length1, start2, length2))
}

impl DiffMatchPatch {
    /// Serialize hunks into a text block resembling the GNU diff/patch
    /// format, suitable for storage or transmission.
    pub fn patch_to_text(&self, patches: &Patches) -> String {
        patches.iter().map(Patch::to_string).collect()
    }

    /// Parse a text block produced by [`Self::patch_to_text`].
    pub fn patch_from_text(&self, text: &str) -> Result<Patches, Error> {
        let mut patches = Vec::new();
        if text.is_empty() {
            return Ok(patches);
        }

        let lines: Vec<&str> = text.split('\n').collect();
        let mut pointer = 0;

        while pointer < lines.len() {
            let header = lines[pointer];
            let (start1, length1, start2, length2) =
                parse_header(header).ok_or_else(|| Error::InvalidPatch(header.to_string()))?;

            let mut patch = Patch {
                diffs: Vec::new(),
                start1,
                start2,
                length1,
                length2,
            };
            pointer += 1;

            while pointer < lines.len() {
                let line = lines[pointer];
                let Some(sign) = line.chars().next() else {
                    // Blank line? Whatever.
                    pointer += 1;
                    continue;
                };

                let body = unescape(&line[sign.len_utf8()..])?;
                match sign {
                    '-' => patch.diffs.push(Diff::delete(&body)),
                    '+' => patch.diffs.push(Diff::insert(&body)),
                    ' ' => patch.diffs.push(Diff::equal(&body)),
                    // The next hunk begins.
                    '@' => break,
                    _ => {
                        return Err(Error::InvalidMode {
                            mode: sign,
                            line: line.to_string(),
                        })
                    }
                }
                pointer += 1;
            }

            patches.push(patch);
        }

        Ok(patches)
    }
}
