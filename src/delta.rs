//! The delta codec: a compact tab-separated transcript of an edit script,
//! readable by the other ports of the algorithm family. `=n` keeps `n`
//! code units, `-n` drops them, `+body` inserts percent-escaped text.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::diff::{Diff, Op};
use crate::{units, DiffMatchPatch, Error};

// Everything outside this set is escaped; the set must not change, or
// deltas stop round-tripping against the other implementations.
const ESCAPED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b';')
    .remove(b'/')
    .remove(b'?')
    .remove(b':')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'+')
    .remove(b'$')
    .remove(b',')
    .remove(b'#');

/// Percent-escape `text`, leaving spaces literal.
pub(crate) fn escape(text: &str) -> String {
    utf8_percent_encode(text, ESCAPED)
        .to_string()
        .replace("%20", " ")
}

/// Strict percent decoding: any malformed escape or invalid UTF-8 is an
/// error. Lowercase hex digits are accepted.
pub(crate) fn unescape(input: &str) -> Result<String, Error> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());

    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hi = bytes.get(i + 1).and_then(|&b| (b as char).to_digit(16));
            let lo = bytes.get(i + 2).and_then(|&b| (b as char).to_digit(16));
            match (hi, lo) {
                (Some(hi), Some(lo)) => {
                    out.push((hi * 16 + lo) as u8);
                    i += 3;
                }
                _ => return Err(Error::IllegalEscape(input.to_string())),
            }
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }

    String::from_utf8(out).map_err(|_| Error::IllegalEscape(input.to_string()))
}

impl DiffMatchPatch {
    /// Crush a diff into a delta transcript,
    /// e.g. `=3\t-2\t+ing` — keep 3 units, delete 2, insert `ing`.
    pub fn diff_to_delta(&self, diffs: &[Diff]) -> String {
        diffs
            .iter()
            .map(|diff| match diff.op() {
                Op::Insert => format!("+{}", escape(&diff.text())),
                Op::Delete => format!("-{}", diff.size()),
                Op::Equal => format!("={}", diff.size()),
            })
            .collect::<Vec<_>>()
            .join("\t")
    }

    /// Rebuild the full diff from the source text and a delta transcript.
    pub fn diff_from_delta(&self, old: &str, delta: &str) -> Result<Vec<Diff>, Error> {
        let old = units(old);
        let mut diffs = Vec::new();
        // Cursor into `old`.
        let mut pointer = 0;

        for token in delta.split('\t') {
            // Blank tokens are fine, e.g. from a trailing tab.
            let Some(op) = token.chars().next() else {
                continue;
            };
            let body = &token[op.len_utf8()..];

            match op {
                '+' => {
                    let text = unescape(body)?;
                    diffs.push(Diff::insert(&text));
                }
                '-' | '=' => {
                    let n = body
                        .parse::<isize>()
                        .ok()
                        .filter(|&n| n >= 0)
                        .ok_or_else(|| Error::InvalidNumber(token.to_string()))?
                        as usize;

                    let end = pointer + n;
                    if end > old.len() {
                        return Err(Error::LengthMismatch {
                            delta: end,
                            source_len: old.len(),
                        });
                    }

                    let run = &old[pointer..end];
                    pointer = end;
                    if op == '=' {
                        diffs.push(Diff::new(Op::Equal, run));
                    } else {
                        diffs.push(Diff::new(Op::Delete, run));
                    }
                }
                _ => return Err(Error::InvalidOp(token.to_string())),
            }
        }

        if pointer != old.len() {
            return Err(Error::LengthMismatch {
                delta: pointer,
                source_len: old.len(),
            });
        }

        Ok(diffs)
    }
}
