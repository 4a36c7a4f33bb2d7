//! Shared-affix measurements. All three run a handful of slice compares
//! rather than walking unit by unit; see the notes on binary-search affix
//! scanning at <https://neil.fraser.name/news/2007/10/09/>.

/// Length of the longest prefix shared by `lhs` and `rhs`, in code units.
pub(crate) fn common_prefix(lhs: &[char], rhs: &[char]) -> usize {
    if lhs.is_empty() || rhs.is_empty() || lhs[0] != rhs[0] {
        return 0;
    }

    let mut lo = 0;
    let mut hi = lhs.len().min(rhs.len());
    let mut mid = hi;
    let mut start = 0;

    while lo < mid {
        if lhs[start..mid] == rhs[start..mid] {
            lo = mid;
            start = lo;
        } else {
            hi = mid;
        }
        mid = (hi - lo) / 2 + lo;
    }

    mid
}

/// Length of the longest suffix shared by `lhs` and `rhs`, in code units.
pub(crate) fn common_suffix(lhs: &[char], rhs: &[char]) -> usize {
    if lhs.is_empty() || rhs.is_empty() || lhs.last() != rhs.last() {
        return 0;
    }

    let mut lo = 0;
    let mut hi = lhs.len().min(rhs.len());
    let mut mid = hi;
    let mut start = 0;

    while lo < mid {
        if lhs[lhs.len() - mid..lhs.len() - start] == rhs[rhs.len() - mid..rhs.len() - start] {
            lo = mid;
            start = lo;
        } else {
            hi = mid;
        }
        mid = (hi - lo) / 2 + lo;
    }

    mid
}

/// Largest `k` such that the last `k` units of `lhs` equal the first `k`
/// units of `rhs`.
pub(crate) fn common_overlap(lhs: &[char], rhs: &[char]) -> usize {
    if lhs.is_empty() || rhs.is_empty() {
        return 0;
    }

    // Truncate to equal lengths before scanning.
    let l = if lhs.len() > rhs.len() {
        &lhs[lhs.len() - rhs.len()..]
    } else {
        lhs
    };
    let r = if rhs.len() > lhs.len() {
        &rhs[..lhs.len()]
    } else {
        rhs
    };
    let minlen = l.len();

    if l == r {
        return minlen;
    }

    // Grow a candidate ending of `l` and hunt for it at the head of `r`.
    // Performance analysis: https://neil.fraser.name/news/2010/11/04/
    let mut best = 0;
    let mut len = 1;
    loop {
        let pattern = &l[minlen - len..];
        let Some(found) = r.windows(pattern.len()).position(|w| w == pattern) else {
            return best;
        };

        len += found;
        if found == 0 || l[minlen - len..] == r[..len] {
            best = len;
            len += 1;
        }
    }
}
