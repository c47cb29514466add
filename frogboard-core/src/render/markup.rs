//! Post content to HTML
//!
//! Content is escaped, then two pieces of board syntax are recognised:
//! - greentext: a line starting with `>` (but not a `>>N` citation)
//! - citations: `>>N` becomes a link when the target is known
//!
//! Only tags are added; the text of the content comes through unchanged, so
//! stripping tags and decoding entities gives back the original string.
//!
//! The class names below are utility classes picked up by the stylesheet
//! build, which scans this file alongside the templates.

use std::fmt;

use serde::Serialize;

use crate::citation::CITATION_RE;
use crate::models::PostId;

/// Outer frame of an opening post
pub const OP_FRAME_CLASS: &str = "rounded-lg border border-emerald-200 bg-white p-4 shadow-sm";

/// Outer frame of a reply or feed entry
pub const REPLY_FRAME_CLASS: &str =
    "rounded-md border border-gray-200 bg-emerald-50 p-3 shadow-sm target:ring-2 target:ring-emerald-400";

pub const GREENTEXT_CLASS: &str = "text-green-600";

pub const CITATION_CLASS: &str = "font-medium text-blue-700 underline hover:text-red-600";

/// Citation whose target is not on the page or does not exist
pub const DEAD_CITATION_CLASS: &str = "text-gray-400 line-through";

pub const BACKLINK_CLASS: &str = "mr-1 text-xs text-blue-700 hover:underline";

pub const PAGE_LINK_CLASS: &str = "rounded border border-gray-300 px-2 py-1 hover:bg-emerald-100";

pub const CURRENT_PAGE_CLASS: &str = "rounded border border-emerald-500 bg-emerald-500 px-2 py-1 text-white";

pub const THREAD_TITLE_CLASS: &str = "font-bold text-blue-900";

pub const BOARD_LINK_CLASS: &str = "text-blue-700 hover:text-red-600 hover:underline";

pub const NAV_LINK_CLASS: &str = "mx-1 text-blue-700 hover:underline";

pub const ACTION_LINK_CLASS: &str = "text-xs text-blue-700 hover:underline";

pub const OMITTED_CLASS: &str = "ml-6 text-sm italic text-gray-500";

pub const EMPTY_CLASS: &str = "py-8 text-center text-gray-500";

/// HTML produced by this crate, safe to embed without escaping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Markup(String);

impl Markup {
    /// Wrap markup that was built from escaped parts.
    pub(crate) fn trusted(html: String) -> Self {
        Self(html)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromIterator<Markup> for Markup {
    fn from_iter<I: IntoIterator<Item = Markup>>(iter: I) -> Self {
        Self(iter.into_iter().map(|m| m.0).collect())
    }
}

/// Escape text for use in element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Format post content.
///
/// `link` maps a cited post to an href, or `None` when the citation should
/// render dead.
pub fn format_content(content: &str, link: impl Fn(PostId) -> Option<String>) -> Markup {
    let mut out = String::with_capacity(content.len() + content.len() / 4);

    for (i, line) in content.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }

        if is_greentext(line) {
            out.push_str(&format!(r#"<span class="{GREENTEXT_CLASS}">"#));
            push_line(&mut out, line, &link);
            out.push_str("</span>");
        } else {
            push_line(&mut out, line, &link);
        }
    }

    Markup(out)
}

fn is_greentext(line: &str) -> bool {
    line.starts_with('>')
        && !CITATION_RE
            .find(line)
            .is_some_and(|citation| citation.start() == 0)
}

fn push_line(out: &mut String, line: &str, link: &impl Fn(PostId) -> Option<String>) {
    let mut last = 0;

    for caps in CITATION_RE.captures_iter(line) {
        let (Some(whole), Some(digits)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        out.push_str(&escape(&line[last..whole.start()]));

        let target = digits
            .as_str()
            .parse::<u64>()
            .ok()
            .and_then(|n| PostId::new(n).ok())
            .and_then(link);

        // Digits are kept as written so `>>007` survives
        match target {
            Some(href) => out.push_str(&format!(
                r#"<a href="{}" class="{CITATION_CLASS}">&gt;&gt;{}</a>"#,
                escape(&href),
                digits.as_str()
            )),
            None => out.push_str(&format!(
                r#"<span class="{DEAD_CITATION_CLASS}">&gt;&gt;{}</span>"#,
                digits.as_str()
            )),
        }

        last = whole.end();
    }

    out.push_str(&escape(&line[last..]));
}
