//! HTML-escaped, size-bounded message chunking.
//!
//! Reports are sent as `<pre>` blocks in HTML parse mode. The report body is
//! escaped once, then cut into units of at most `max_len` code points so each
//! rendered message stays under the provider cap. Every unit opens and closes
//! its own `<pre>` wrapper and never cuts an escape sequence in half.

/// Telegram caps text messages at 4096 characters; keep headroom.
pub const DEFAULT_MAX_MESSAGE_LEN: usize = 3900;

/// Minimum content space of the first unit, even if the header overflows the cap.
pub const MIN_CHUNK_CONTENT: usize = 100;

const PRE_OPEN: &str = "<pre>";
const PRE_CLOSE: &str = "</pre>";
const WRAPPER_LEN: usize = PRE_OPEN.len() + PRE_CLOSE.len();
/// Longest escape sequence produced by [`escape_html`] (`&amp;`).
const MAX_ENTITY_LEN: usize = 5;

/// One deliverable unit: optional header followed by a `<pre>` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Already-formatted HTML header, empty for continuation units.
    pub header: String,
    /// Escaped body without the `<pre>` wrapper.
    pub body: String,
}

impl Chunk {
    /// Text to hand to the provider.
    #[must_use]
    pub fn render(&self) -> String {
        format!("{}{PRE_OPEN}{}{PRE_CLOSE}", self.header, self.body)
    }
}

/// Replace `&`, `<` and `>` with their HTML entities.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Escape `report` and split it into ordered units.
///
/// The first unit carries `header` and gets whatever space is left after the
/// header and wrapper, but never less than [`MIN_CHUNK_CONTENT`]. An empty
/// report yields a single unit with an empty `<pre>` block.
#[must_use]
pub fn chunk_report(report: &str, header: &str, max_len: usize) -> Vec<Chunk> {
    let escaped: Vec<char> = escape_html(report).chars().collect();
    if escaped.is_empty() {
        return vec![Chunk {
            header: header.to_string(),
            body: String::new(),
        }];
    }

    let first_limit = max_len
        .saturating_sub(header.chars().count() + WRAPPER_LEN)
        .max(MIN_CHUNK_CONTENT);
    let rest_limit = max_len.saturating_sub(WRAPPER_LEN).max(MIN_CHUNK_CONTENT);

    let mut chunks = Vec::new();
    let mut start = 0;
    let mut limit = first_limit;
    while start < escaped.len() {
        let end = split_point(&escaped, start, limit);
        chunks.push(Chunk {
            header: if chunks.is_empty() {
                header.to_string()
            } else {
                String::new()
            },
            body: escaped[start..end].iter().collect(),
        });
        start = end;
        limit = rest_limit;
    }
    chunks
}

/// End of the unit starting at `start`, moved back before an entity that
/// would otherwise straddle the boundary.
fn split_point(chars: &[char], start: usize, limit: usize) -> usize {
    let end = (start + limit).min(chars.len());
    if end == chars.len() {
        return end;
    }
    let window_start = end.saturating_sub(MAX_ENTITY_LEN - 1).max(start);
    let open_entity = chars[window_start..end]
        .iter()
        .rposition(|c| *c == '&')
        .map(|offset| window_start + offset)
        .filter(|amp| !chars[*amp..end].contains(&';'));
    match open_entity {
        Some(amp) if amp > start => amp,
        _ => end,
    }
}
