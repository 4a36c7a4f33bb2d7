//! Informational HTML rendering of an edit script.

use crate::diff::{Diff, Op};
use crate::DiffMatchPatch;

impl DiffMatchPatch {
    /// Render a diff as HTML, insertions and deletions tinted, newlines
    /// shown as pilcrows. Intended as a starting point for custom display
    /// code rather than as a styling surface.
    pub fn diff_pretty_html(&self, diffs: &[Diff]) -> String {
        let mut html = String::new();

        for diff in diffs {
            let text = diff
                .text()
                .replace('&', "&amp;")
                .replace('<', "&lt;")
                .replace('>', "&gt;")
                .replace('\n', "&para;<br>");

            match diff.op() {
                Op::Insert => {
                    html.push_str("<ins style=\"background:#e6ffe6;\">");
                    html.push_str(&text);
                    html.push_str("</ins>");
                }
                Op::Delete => {
                    html.push_str("<del style=\"background:#ffe6e6;\">");
                    html.push_str(&text);
                    html.push_str("</del>");
                }
                Op::Equal => {
                    html.push_str("<span>");
                    html.push_str(&text);
                    html.push_str("</span>");
                }
            }
        }

        html
    }
}
