//! Half-match detection: a shared substring at least half as long as the
//! longer input lets the diff split into two smaller problems.

use super::common::{common_prefix, common_suffix};

/// The five pieces of a half-match split, `text1` parts first.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct HalfMatch<'a> {
    pub(crate) prefix1: &'a [char],
    pub(crate) suffix1: &'a [char],
    pub(crate) prefix2: &'a [char],
    pub(crate) suffix2: &'a [char],
    pub(crate) common: &'a [char],
}

/// Probe both inputs for a common substring of at least half the length of
/// the longer one. The caller gates this on a bounded diff timeout: with
/// unlimited time a possibly suboptimal split is not worth taking.
pub(crate) fn half_match<'a>(old: &'a [char], new: &'a [char]) -> Option<HalfMatch<'a>> {
    let (long, short) = if old.len() > new.len() {
        (old, new)
    } else {
        (new, old)
    };

    if long.len() < 4 || short.len() * 2 < long.len() {
        return None;
    }

    // Seed from the second quarter, then from the third.
    let hm1 = from_seed(long, short, long.len().div_ceil(4));
    let hm2 = from_seed(long, short, long.len().div_ceil(2));

    let hm = match (hm1, hm2) {
        (None, None) => return None,
        (Some(hm), None) | (None, Some(hm)) => hm,
        // Both hit: the longer split wins, the earlier seed on a tie.
        (Some(hm1), Some(hm2)) => {
            if hm1.common.len() >= hm2.common.len() {
                hm1
            } else {
                hm2
            }
        }
    };

    // The pieces came out relative to (long, short); put text1's first.
    if old.len() > new.len() {
        Some(hm)
    } else {
        Some(HalfMatch {
            prefix1: hm.prefix2,
            suffix1: hm.suffix2,
            prefix2: hm.prefix1,
            suffix2: hm.suffix1,
            common: hm.common,
        })
    }
}

// Does a quarter-length substring of `long` starting at `idx` occur in
// `short` with enough shared context around it to span half of `long`?
fn from_seed<'a>(long: &'a [char], short: &'a [char], idx: usize) -> Option<HalfMatch<'a>> {
    let seed = &long[idx..idx + long.len() / 4];

    let mut j = 0;
    let mut best_common: &[char] = &[];
    let mut best_long: (&[char], &[char]) = (&[], &[]);
    let mut best_short: (&[char], &[char]) = (&[], &[]);

    while let Some(pos) = short[j..].windows(seed.len()).position(|w| w == seed) {
        j += pos;

        let prefix_len = common_prefix(&long[idx..], &short[j..]);
        let suffix_len = common_suffix(&long[..idx], &short[..j]);

        if best_common.len() < suffix_len + prefix_len {
            best_common = &short[j - suffix_len..j + prefix_len];
            best_long = (&long[..idx - suffix_len], &long[idx + prefix_len..]);
            best_short = (&short[..j - suffix_len], &short[j + prefix_len..]);
        }

        j += 1;
    }

    if best_common.len() * 2 >= long.len() {
        Some(HalfMatch {
            prefix1: best_long.0,
            suffix1: best_long.1,
            prefix2: best_short.0,
            suffix2: best_short.1,
            common: best_common,
        })
    } else {
        None
    }
}
