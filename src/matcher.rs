//! Bitap approximate matching: locate a pattern near an expected position,
//! weighing edit errors against distance from that position.

use std::collections::HashMap;

use tracing::trace;

use crate::{units, DiffMatchPatch, Error};

impl DiffMatchPatch {
    /// Locate `pattern` in `text` as close to `loc` as the configured
    /// threshold allows. `Ok(None)` means no acceptable match.
    ///
    /// ```
    /// use textpatch::DiffMatchPatch;
    ///
    /// let dmp = DiffMatchPatch::new();
    /// assert_eq!(Some(5), dmp.match_main("abcdefghijk", "fgh", 5).unwrap());
    /// ```
    pub fn match_main(&self, text: &str, pattern: &str, loc: usize) -> Result<Option<usize>, Error> {
        let text = units(text);
        let pattern = units(pattern);
        trace!(
            text_len = text.len(),
            pattern_len = pattern.len(),
            loc,
            "matching"
        );

        self.match_internal(&text, &pattern, loc)
    }

    pub(crate) fn match_internal(
        &self,
        text: &[char],
        pattern: &[char],
        loc: usize,
    ) -> Result<Option<usize>, Error> {
        let loc = loc.min(text.len());

        if text == pattern {
            // Shortcut, also covers two empty texts.
            Ok(Some(0))
        } else if text.is_empty() {
            Ok(None)
        } else if text
            .get(loc..loc + pattern.len())
            .is_some_and(|run| run == pattern)
        {
            // Perfect match at the perfect spot (includes the empty pattern).
            Ok(Some(loc))
        } else {
            self.match_bitap(text, pattern, loc)
        }
    }

    pub(crate) fn match_bitap(
        &self,
        text: &[char],
        pattern: &[char],
        loc: usize,
    ) -> Result<Option<usize>, Error> {
        if pattern.len() > self.match_max_bits() {
            return Err(Error::PatternTooLong {
                len: pattern.len(),
                max: self.match_max_bits(),
            });
        }

        let alphabet = match_alphabet(pattern);

        // Highest score beyond which we give up.
        let mut score_threshold = self.match_threshold() as f64;

        // A nearby exact match tightens the threshold up front.
        if let Some(best) = text
            .windows(pattern.len())
            .skip(loc)
            .position(|w| w == pattern)
            .map(|pos| pos + loc)
        {
            score_threshold = self
                .bitap_score(0, best, loc, pattern.len())
                .min(score_threshold);

            // And the nearest one in the other direction.
            if let Some(best) = text
                .windows(pattern.len())
                .enumerate()
                .take(loc + pattern.len() + 1)
                .filter(|(_, w)| *w == pattern)
                .map(|(i, _)| i)
                .last()
            {
                score_threshold = self
                    .bitap_score(0, best, loc, pattern.len())
                    .min(score_threshold);
            }
        }

        let matchmask = 1u64 << (pattern.len() - 1);
        let mut best_loc = None;

        let mut bin_mid;
        let mut bin_max = pattern.len() + text.len();
        let mut last_rd: Vec<u64> = Vec::new();

        for d in 0..pattern.len() {
            // How far from `loc` can a match with d errors sit and still
            // clear the threshold? Binary search; each error level reuses
            // the previous level's bound as its ceiling.
            let mut bin_min = 0;
            bin_mid = bin_max;
            while bin_min < bin_mid {
                if self.bitap_score(d, loc + bin_mid, loc, pattern.len()) <= score_threshold {
                    bin_min = bin_mid;
                } else {
                    bin_max = bin_mid;
                }
                bin_mid = (bin_max - bin_min) / 2 + bin_min;
            }
            bin_max = bin_mid;

            let mut start = (loc + 1).saturating_sub(bin_mid).max(1);
            let finish = (loc + bin_mid).min(text.len()) + pattern.len();

            let mut rd = vec![0u64; finish + 2];
            rd[finish + 1] = (1u64 << d) - 1;

            let mut j = finish;
            while j >= start {
                let char_match = if text.len() < j {
                    // Out of range.
                    0
                } else {
                    alphabet.get(&text[j - 1]).copied().unwrap_or(0)
                };

                rd[j] = if d == 0 {
                    // First pass: exact match.
                    ((rd[j + 1] << 1) | 1) & char_match
                } else {
                    // Subsequent passes: fuzzy match.
                    (((rd[j + 1] << 1) | 1) & char_match)
                        | (((last_rd[j + 1] | last_rd[j]) << 1) | 1)
                        | last_rd[j + 1]
                };

                if rd[j] & matchmask != 0 {
                    let score = self.bitap_score(d, j - 1, loc, pattern.len());
                    // This match will almost certainly be better than any
                    // existing one, but check anyway.
                    if score <= score_threshold {
                        score_threshold = score;
                        best_loc = Some(j - 1);
                        if j - 1 > loc {
                            // When passing loc, don't exceed the current
                            // distance from it.
                            start = (2 * loc).saturating_sub(j - 1).max(1);
                        } else {
                            // Already passed loc; downhill from here.
                            break;
                        }
                    }
                }

                j -= 1;
            }

            // No hope of a better match at higher error levels.
            if self.bitap_score(d + 1, loc, loc, pattern.len()) > score_threshold {
                break;
            }
            last_rd = rd;
        }

        Ok(best_loc)
    }

    // Score a candidate with `errors` edit errors at position `x`: error
    // ratio plus distance penalty. Monotone in both.
    fn bitap_score(&self, errors: usize, x: usize, loc: usize, pattern_len: usize) -> f64 {
        let accuracy = errors as f64 / pattern_len as f64;
        let proximity = loc.abs_diff(x);

        if self.match_distance() == 0 {
            // Proximity collapses to a hard cut-off.
            return if proximity == 0 { accuracy } else { 1.0 };
        }

        accuracy + proximity as f64 / self.match_distance() as f64
    }
}

// One bitmask per pattern symbol; bit p marks the symbol at distance p
// from the pattern's end.
fn match_alphabet(pattern: &[char]) -> HashMap<char, u64> {
    let mut masks = HashMap::with_capacity(pattern.len());
    for (i, &c) in pattern.iter().enumerate() {
        *masks.entry(c).or_insert(0) |= 1u64 << (pattern.len() - i - 1);
    }
    masks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_alphabet() {
        // Unique symbols.
        assert_eq!(
            HashMap::from([('a', 4), ('b', 2), ('c', 1)]),
            match_alphabet(&units("abc"))
        );

        // Duplicates fold into one mask.
        assert_eq!(
            HashMap::from([('a', 37), ('b', 18), ('c', 8)]),
            match_alphabet(&units("abcaba"))
        );
    }

    #[test]
    fn test_match_bitap() {
        let mut dmp = DiffMatchPatch::new();
        dmp.set_match_distance(100);

        // Exact matches.
        assert_eq!(
            Ok(Some(5)),
            dmp.match_bitap(&units("abcdefghijk"), &units("fgh"), 5)
        );
        assert_eq!(
            Ok(Some(5)),
            dmp.match_bitap(&units("abcdefghijk"), &units("fgh"), 0)
        );

        // Fuzzy matches.
        assert_eq!(
            Ok(Some(4)),
            dmp.match_bitap(&units("abcdefghijk"), &units("efxhi"), 0)
        );
        assert_eq!(
            Ok(Some(2)),
            dmp.match_bitap(&units("abcdefghijk"), &units("cdefxyhijk"), 5)
        );
        assert_eq!(
            Ok(None),
            dmp.match_bitap(&units("abcdefghijk"), &units("bxy"), 1)
        );

        // Overflow.
        assert_eq!(
            Ok(Some(2)),
            dmp.match_bitap(&units("123456789xx0"), &units("3456789x0"), 2)
        );

        // Threshold sweeps.
        dmp.set_match_threshold(0.4);
        assert_eq!(
            Ok(Some(4)),
            dmp.match_bitap(&units("abcdefghijk"), &units("efxyhi"), 1)
        );

        dmp.set_match_threshold(0.3);
        assert_eq!(
            Ok(None),
            dmp.match_bitap(&units("abcdefghijk"), &units("efxyhi"), 1)
        );

        dmp.set_match_threshold(0.0);
        assert_eq!(
            Ok(Some(1)),
            dmp.match_bitap(&units("abcdefghijk"), &units("bcdef"), 1)
        );
        dmp.set_match_threshold(0.5);

        // Multiple selections.
        assert_eq!(
            Ok(Some(0)),
            dmp.match_bitap(&units("abcdexyzabcde"), &units("abccde"), 3)
        );
        assert_eq!(
            Ok(Some(8)),
            dmp.match_bitap(&units("abcdexyzabcde"), &units("abccde"), 5)
        );

        // Distance sweeps.
        dmp.set_match_distance(10);
        assert_eq!(
            Ok(None),
            dmp.match_bitap(&units("abcdefghijklmnopqrstuvwxyz"), &units("abcdefg"), 24)
        );
        assert_eq!(
            Ok(Some(0)),
            dmp.match_bitap(&units("abcdefghijklmnopqrstuvwxyz"), &units("abcdxxefg"), 1)
        );

        dmp.set_match_distance(1000);
        assert_eq!(
            Ok(Some(0)),
            dmp.match_bitap(&units("abcdefghijklmnopqrstuvwxyz"), &units("abcdefg"), 24)
        );
    }

    #[test]
    fn test_match_main() {
        let mut dmp = DiffMatchPatch::new();

        // Full-text equality shortcut.
        assert_eq!(Ok(Some(0)), dmp.match_main("abcdef", "abcdef", 1000));

        // Empty text.
        assert_eq!(Ok(None), dmp.match_main("", "abcdef", 1));

        // Empty pattern sticks to the (clamped) location.
        assert_eq!(Ok(Some(3)), dmp.match_main("abcdef", "", 3));

        // Exact match at the spot.
        assert_eq!(Ok(Some(3)), dmp.match_main("abcdef", "de", 3));

        // Runs off the end.
        assert_eq!(Ok(Some(3)), dmp.match_main("abcdef", "defy", 4));

        // Complex fuzzy match.
        dmp.set_match_threshold(0.7);
        assert_eq!(
            Ok(Some(4)),
            dmp.match_main(
                "I am the very model of a modern major general.",
                " that berry ",
                5
            )
        );
    }

    #[test]
    fn test_match_pattern_too_long() {
        let dmp = DiffMatchPatch::new();
        assert_eq!(
            Err(Error::PatternTooLong { len: 33, max: 32 }),
            dmp.match_main(
                "abcdefghijklmnopqrstuvwxyz0123456789",
                "xxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx",
                0
            )
        );
    }

    #[test]
    fn test_bitap_score_monotone() {
        let dmp = DiffMatchPatch::new();
        // Non-decreasing in errors and in distance.
        for errors in 0..4 {
            for x in 0..50 {
                assert!(
                    dmp.bitap_score(errors, x, 10, 5) <= dmp.bitap_score(errors + 1, x, 10, 5)
                );
                assert!(
                    dmp.bitap_score(errors, x, 10, 5) <= dmp.bitap_score(errors, x + 50, 10, 5)
                );
            }
        }
    }
}
