//! Diff, fuzzy match and patch for plain text.
//!
//! The crate implements the diff-match-patch algorithm family: Myers'
//! bidirectional diff with semantic cleanup, a bitap fuzzy matcher, and a
//! patch engine that survives drifted targets. All three are reached
//! through a single [`DiffMatchPatch`] facade carrying the tunables.
//!
//! ```
//! use textpatch::DiffMatchPatch;
//!
//! let dmp = DiffMatchPatch::new();
//! let diffs = dmp.diff_main("The cat sat", "The hat sat");
//! assert_eq!("The cat sat", dmp.diff_text1(&diffs));
//! assert_eq!("The hat sat", dmp.diff_text2(&diffs));
//! ```
//!
//! Texts are handled as sequences of `char` code units; every offset,
//! length and count on the public surface is in those units.

pub mod delta;
pub mod diff;
pub mod errors;
pub mod html;
pub mod matcher;
pub mod patch;

pub use diff::{Diff, Op};
pub use errors::Error;
pub use patch::{Patch, PatchInput, Patches};

use chrono::{NaiveTime, TimeDelta, Utc};

/// Collect a string into the code units the algorithms run on.
pub(crate) fn units(text: &str) -> Vec<char> {
    text.chars().collect()
}

/// The inverse of [`units`].
pub(crate) fn string(units: &[char]) -> String {
    units.iter().collect()
}

/// Facade over the diff, match and patch engines.
///
/// One instance carries the tunables for all three; construction gives the
/// stock defaults and each knob has a `set_*` method. An instance is meant
/// to be exclusively owned by the caller for the duration of an operation;
/// none of the operations mutate it.
pub struct DiffMatchPatch {
    /// Run a line-level pre-pass on large texts before the character diff.
    /// Faster on texts with many lines, at a small cost in minimality.
    checklines: bool,
    /// Diff deadline in milliseconds. `None` or `Some(0)` removes the time
    /// bound (and with it the half-match speed-up).
    timeout: Option<u32>,
    /// Cost of an empty edit operation in terms of edit characters.
    edit_cost: usize,
    /// At what point is no match declared (0.0 = perfection, 1.0 = very loose).
    match_threshold: f32,
    /// How far to search for a match. A candidate this many code units away
    /// from the expected location adds 1.0 to its score.
    match_distance: usize,
    /// Word width of the bitap matcher; also drives hunk splitting.
    match_max_bits: usize,
    /// When deleting a large block of text, how closely its contents have to
    /// match the expected contents (0.0 = perfection, 1.0 = very loose).
    /// `match_threshold` still controls how closely the end points match.
    delete_threshold: f32,
    /// Context length kept around each hunk.
    patch_margin: u8,
}

impl Default for DiffMatchPatch {
    fn default() -> Self {
        Self {
            checklines: true,
            timeout: Some(1000),
            edit_cost: 4,
            match_threshold: 0.5,
            match_distance: 1000,
            match_max_bits: 32,
            delete_threshold: 0.5,
            patch_margin: 4,
        }
    }
}

impl DiffMatchPatch {
    /// A facade with the stock tunables.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn checklines(&self) -> bool {
        self.checklines
    }

    /// Enable or disable the line-level pre-pass on large texts.
    /// Defaults to `true`.
    pub fn set_checklines(&mut self, checklines: bool) {
        self.checklines = checklines;
    }

    /// Diff time budget in milliseconds, `None` for unbounded. Defaults to
    /// one second. `Some(0)` behaves like `None`.
    pub fn set_timeout(&mut self, timeout: Option<u32>) {
        self.timeout = timeout;
    }

    // A zero timeout means unbounded, not instantly expired.
    pub(crate) fn timeout_bounded(&self) -> bool {
        self.timeout.is_some_and(|ms| ms > 0)
    }

    /// The absolute instant the current diff must wrap up by, if bounded.
    pub(crate) fn deadline(&self) -> Option<NaiveTime> {
        let ms = self.timeout.filter(|&ms| ms > 0)?;
        Utc::now()
            .checked_add_signed(TimeDelta::milliseconds(ms as i64))
            .map(|t| t.time())
    }

    pub(crate) fn edit_cost(&self) -> usize {
        self.edit_cost
    }

    /// Cost of an empty edit operation in terms of edit characters, used by
    /// the efficiency cleanup. Defaults to 4.
    pub fn set_edit_cost(&mut self, edit_cost: usize) {
        self.edit_cost = edit_cost;
    }

    pub(crate) fn match_threshold(&self) -> f32 {
        self.match_threshold
    }

    /// Cut-off score for a valid match: closer to 0 demands accuracy,
    /// closer to 1 accepts almost anything. Defaults to 0.5.
    pub fn set_match_threshold(&mut self, threshold: f32) {
        self.match_threshold = threshold;
    }

    pub(crate) fn match_distance(&self) -> usize {
        self.match_distance
    }

    /// Distance at which a candidate's location penalty reaches 1.0;
    /// 0 requires the match at the exact expected location. Defaults to 1000.
    pub fn set_match_distance(&mut self, distance: usize) {
        self.match_distance = distance;
    }

    pub(crate) fn match_max_bits(&self) -> usize {
        self.match_max_bits
    }

    pub(crate) fn delete_threshold(&self) -> f32 {
        self.delete_threshold
    }

    /// How closely the contents of a large deletion have to match the
    /// expected contents when applying a patch. Defaults to 0.5.
    pub fn set_delete_threshold(&mut self, threshold: f32) {
        self.delete_threshold = threshold;
    }

    pub(crate) fn patch_margin(&self) -> u8 {
        self.patch_margin
    }
}
