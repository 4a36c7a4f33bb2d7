//! Line-table compression for the line-mode pre-pass. Every distinct line
//! becomes one code unit, so the driver can diff a large text as a short
//! string of line IDs and inflate the result afterwards.

use std::collections::HashMap;

use super::Diff;

// The first text may fill the table this far, the second up to the full
// 16-bit value space; past the cap the rest of a text collapses into one
// entry.
const FIRST_TEXT_CAP: usize = 40_000;
const SECOND_TEXT_CAP: usize = 65_535;

// IDs are materialized as `char`s, which exclude the UTF-16 surrogate
// range; IDs at or past it are shifted around the gap.
const SURROGATE_BASE: usize = 0xD800;
const SURROGATE_SPAN: usize = 0x800;

pub(super) struct EncodedLines<'a> {
    pub(super) units1: Vec<char>,
    pub(super) units2: Vec<char>,
    pub(super) lines: Vec<&'a [char]>,
}

/// Re-express both texts as strings of line IDs over a shared table.
/// Index 0 of the table is reserved for the empty string.
pub(super) fn lines_to_units<'a>(old: &'a [char], new: &'a [char]) -> EncodedLines<'a> {
    let mut lines: Vec<&[char]> = vec![&[]];
    let mut table: HashMap<&[char], usize> = HashMap::new();

    let units1 = munge(old, &mut lines, &mut table, FIRST_TEXT_CAP);
    let units2 = munge(new, &mut lines, &mut table, SECOND_TEXT_CAP);

    EncodedLines {
        units1,
        units2,
        lines,
    }
}

fn munge<'a>(
    text: &'a [char],
    lines: &mut Vec<&'a [char]>,
    table: &mut HashMap<&'a [char], usize>,
    max_lines: usize,
) -> Vec<char> {
    let mut encoded = Vec::new();
    let mut start = 0;

    while start < text.len() {
        // Lines keep their trailing newline; the tail without one is a line
        // of its own.
        let end = text[start..]
            .iter()
            .position(|&u| u == '\n')
            .map_or(text.len(), |p| start + p + 1);

        let mut line = &text[start..end];
        let mut next = end;

        if let Some(&id) = table.get(line) {
            encoded.push(id_to_unit(id));
        } else {
            if lines.len() == max_lines {
                // Table full: the entire remainder becomes a single entry.
                line = &text[start..];
                next = text.len();
            }
            let id = lines.len();
            table.insert(line, id);
            lines.push(line);
            encoded.push(id_to_unit(id));
        }

        start = next;
    }

    encoded
}

/// Inflate an edit script over line IDs back into one over real text.
pub(super) fn units_to_lines(diffs: &[Diff], lines: &[&[char]]) -> Vec<Diff> {
    diffs
        .iter()
        .map(|d| {
            let text = d
                .data()
                .iter()
                .flat_map(|&u| lines[unit_to_id(u)].iter().copied())
                .collect::<Vec<_>>();
            Diff::new(d.op(), &text)
        })
        .collect()
}

fn id_to_unit(id: usize) -> char {
    let value = if id < SURROGATE_BASE {
        id
    } else {
        id + SURROGATE_SPAN
    };
    char::from_u32(value as u32).expect("line id stays below the scalar-value ceiling")
}

fn unit_to_id(unit: char) -> usize {
    let value = unit as usize;
    if value < SURROGATE_BASE {
        value
    } else {
        value - SURROGATE_SPAN
    }
}
