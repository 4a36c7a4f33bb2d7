//! Myers' bidirectional O(ND) search for the middle snake. See Myers 1986,
//! "An O(ND) Difference Algorithm and Its Variations".

use chrono::{NaiveTime, Utc};

use super::{Diff, Op};
use crate::DiffMatchPatch;

impl DiffMatchPatch {
    // Find the point where the forward and reverse paths of the edit graph
    // overlap, split the problem there and recurse on both halves. Expects
    // inputs with no common affix. On deadline expiry the trivial
    // delete-everything/insert-everything script comes back instead.
    pub(crate) fn bisect(
        &self,
        old: &[char],
        new: &[char],
        deadline: Option<NaiveTime>,
    ) -> Vec<Diff> {
        let old_len = old.len() as isize;
        let new_len = new.len() as isize;

        let max_d = (old_len + new_len + 1) / 2;
        let v_offset = max_d;
        let v_len = 2 * max_d;

        let mut v1 = vec![-1_isize; v_len as usize + 2];
        let mut v2 = vec![-1_isize; v_len as usize + 2];
        v1[v_offset as usize + 1] = 0;
        v2[v_offset as usize + 1] = 0;

        let delta = old_len - new_len;
        // With an odd delta the forward path meets the reverse path head on;
        // with an even one the reverse path detects the overlap.
        let front = delta % 2 != 0;

        // Trim the k loops once a path runs off an edge of the grid.
        let mut k1start: isize = 0;
        let mut k1end: isize = 0;
        let mut k2start: isize = 0;
        let mut k2end: isize = 0;

        for d in 0..max_d {
            if let Some(deadline) = deadline {
                if Utc::now().time() > deadline {
                    break;
                }
            }

            // Walk the forward path one step.
            let mut k1 = -d + k1start;
            while k1 <= d - k1end {
                let k1_offset = (v_offset + k1) as usize;
                let mut x1 = if k1 == -d || (k1 != d && v1[k1_offset - 1] < v1[k1_offset + 1]) {
                    v1[k1_offset + 1]
                } else {
                    v1[k1_offset - 1] + 1
                };
                let mut y1 = x1 - k1;

                while x1 < old_len && y1 < new_len && old[x1 as usize] == new[y1 as usize] {
                    x1 += 1;
                    y1 += 1;
                }
                v1[k1_offset] = x1;

                if x1 > old_len {
                    // Ran off the right of the graph.
                    k1end += 2;
                } else if y1 > new_len {
                    // Ran off the bottom of the graph.
                    k1start += 2;
                } else if front {
                    let k2_offset = v_offset + delta - k1;
                    if k2_offset >= 0 && k2_offset < v_len && v2[k2_offset as usize] != -1 {
                        // Mirror x2 onto the top-left coordinate system.
                        let x2 = old_len - v2[k2_offset as usize];
                        if x1 >= x2 {
                            return self.bisect_split(old, new, x1 as usize, y1 as usize, deadline);
                        }
                    }
                }

                k1 += 2;
            }

            // Walk the reverse path one step.
            let mut k2 = -d + k2start;
            while k2 <= d - k2end {
                let k2_offset = (v_offset + k2) as usize;
                let mut x2 = if k2 == -d || (k2 != d && v2[k2_offset - 1] < v2[k2_offset + 1]) {
                    v2[k2_offset + 1]
                } else {
                    v2[k2_offset - 1] + 1
                };
                let mut y2 = x2 - k2;

                while x2 < old_len
                    && y2 < new_len
                    && old[(old_len - x2 - 1) as usize] == new[(new_len - y2 - 1) as usize]
                {
                    x2 += 1;
                    y2 += 1;
                }
                v2[k2_offset] = x2;

                if x2 > old_len {
                    // Ran off the left of the graph.
                    k2end += 2;
                } else if y2 > new_len {
                    // Ran off the top of the graph.
                    k2start += 2;
                } else if !front {
                    let k1_offset = v_offset + delta - k2;
                    if k1_offset >= 0 && k1_offset < v_len && v1[k1_offset as usize] != -1 {
                        let x1 = v1[k1_offset as usize];
                        let y1 = v_offset + x1 - k1_offset;
                        // Mirror x2 onto the top-left coordinate system.
                        let x2 = old_len - x2;
                        if x1 >= x2 {
                            return self.bisect_split(old, new, x1 as usize, y1 as usize, deadline);
                        }
                    }
                }

                k2 += 2;
            }
        }

        // No commonality at all, or the clock ran out.
        vec![Diff::new(Op::Delete, old), Diff::new(Op::Insert, new)]
    }

    fn bisect_split(
        &self,
        old: &[char],
        new: &[char],
        x: usize,
        y: usize,
        deadline: Option<NaiveTime>,
    ) -> Vec<Diff> {
        // A stale forward entry read from the reverse side can sit one past
        // the grid edge.
        let x = x.min(old.len());
        let y = y.min(new.len());

        let mut diffs = self.diff_internal(&old[..x], &new[..y], false, deadline);
        diffs.extend(self.diff_internal(&old[x..], &new[y..], false, deadline));
        diffs
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, Utc};

    use super::*;
    use crate::units;

    #[test]
    fn test_bisect_normal() {
        let dmp = DiffMatchPatch::new();
        // The bisection result is not normalized, so the exact interleaving
        // of the delete/insert pairs is part of the contract here.
        assert_eq!(
            vec![
                Diff::delete("c"),
                Diff::insert("m"),
                Diff::equal("a"),
                Diff::delete("t"),
                Diff::insert("p"),
            ],
            dmp.bisect(&units("cat"), &units("map"), None)
        );
    }

    #[test]
    fn test_bisect_timeout() {
        let dmp = DiffMatchPatch::new();
        // An already-expired deadline degrades to the trivial script.
        let expired = (Utc::now() - TimeDelta::milliseconds(10)).time();
        assert_eq!(
            vec![Diff::delete("cat"), Diff::insert("map")],
            dmp.bisect(&units("cat"), &units("map"), Some(expired))
        );
    }
}
