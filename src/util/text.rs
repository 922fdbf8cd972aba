use std::borrow::Cow;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

/// Default excerpt length in characters.
pub const DEFAULT_EXCERPT_LENGTH: usize = 220;
/// Default reading speed used by [`estimate_reading_time`].
pub const DEFAULT_WORDS_PER_MINUTE: usize = 220;
/// Default cap on entity-decoding passes in [`decode_entities`].
pub const DEFAULT_MAX_DECODE_PASSES: usize = 5;

/// Appended to excerpts that were cut short. A single character, so a cut
/// excerpt is never longer than `max_length + 1` characters.
const ELLIPSIS: char = '…';

/// Longest entity we try to recognize, e.g. `&#x1F600;`.
const MAX_ENTITY_LEN: usize = 12;

fn escaped_entity_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"&(?:lt|gt|amp|quot|#39);").expect("entity pattern is a valid regex")
    })
}

fn escaped_markup_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)&(?:lt|gt);").expect("markup pattern is a valid regex"))
}

fn html_tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)</?[a-z][^>]*>").expect("tag pattern is a valid regex"))
}

/// Extracts readable text from an HTML fragment.
///
/// Tags are removed (each one acts as a word break), `<script>` and `<style>`
/// bodies are dropped, entities are decoded once, and runs of whitespace are
/// collapsed to a single space. Works without any rendering environment.
///
/// # Examples
///
/// ```
/// use insights::util::plain_text;
///
/// assert_eq!(plain_text("<p>Hello <b>world</b></p>"), "Hello world");
/// assert_eq!(plain_text("  Fish &amp;\n chips "), "Fish & chips");
/// ```
pub fn plain_text(html: &str) -> String {
    let stripped = strip_tags(html);
    let decoded = decode_once(&stripped);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(pos) = rest.find('<') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        let opens_tag = after
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'));
        if !opens_tag {
            // A bare '<' in text, e.g. "a < b"
            out.push('<');
            rest = after;
            continue;
        }

        out.push(' ');

        if let Some(comment) = after.strip_prefix("!--") {
            rest = comment.find("-->").map_or("", |end| &comment[end + 3..]);
            continue;
        }

        let Some(end) = after.find('>') else {
            // Unterminated tag swallows the remainder
            rest = "";
            break;
        };

        let name = after[..end]
            .chars()
            .take_while(char::is_ascii_alphanumeric)
            .collect::<String>()
            .to_ascii_lowercase();
        rest = &after[end + 1..];

        if name == "script" || name == "style" {
            // ASCII lowercasing keeps byte offsets stable
            let closing = format!("</{name}");
            rest = match rest.to_ascii_lowercase().find(&closing) {
                Some(idx) => {
                    let tail = &rest[idx..];
                    tail.find('>').map_or("", |gt| &tail[gt + 1..])
                }
                None => "",
            };
        }
    }

    out.push_str(rest);
    out
}

/// Decodes one layer of HTML entities (named basics plus numeric forms).
fn decode_once(value: &str) -> Cow<'_, str> {
    if !value.contains('&') {
        return Cow::Borrowed(value);
    }

    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        let candidate = &rest[pos..];
        match decode_entity_at(candidate) {
            Some((ch, len)) => {
                out.push(ch);
                rest = &candidate[len..];
            }
            None => {
                out.push('&');
                rest = &candidate[1..];
            }
        }
    }

    out.push_str(rest);
    Cow::Owned(out)
}

/// Parses the entity at the start of `s` (which begins with `&`).
/// Returns the decoded character and the entity's byte length.
fn decode_entity_at(s: &str) -> Option<(char, usize)> {
    let (semi, _) = s
        .char_indices()
        .take(MAX_ENTITY_LEN)
        .find(|&(_, c)| c == ';')?;
    let name = &s[1..semi];

    let ch = match name {
        "lt" => '<',
        "gt" => '>',
        "amp" => '&',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        _ => {
            let number = name.strip_prefix('#')?;
            let code = match number.strip_prefix('x').or_else(|| number.strip_prefix('X')) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse::<u32>().ok()?,
            };
            char::from_u32(code)?
        }
    };

    Some((ch, semi + 1))
}

/// Reverses HTML-entity escaping, repeatedly, for content that an upstream
/// store escaped more than once.
///
/// Runs at most `max_passes` passes and stops early once no escaped entity
/// (`&lt;`, `&gt;`, `&amp;`, `&quot;`, `&#39;`) remains or a pass changes
/// nothing. Within the pass cap the result is a fixed point: decoding it again
/// returns it unchanged.
///
/// # Examples
///
/// ```
/// use insights::util::decode_entities;
///
/// assert_eq!(decode_entities("&amp;lt;p&amp;gt;", 5), "<p>");
/// assert_eq!(decode_entities("plain", 5), "plain");
/// ```
pub fn decode_entities(value: &str, max_passes: usize) -> String {
    let mut current = value.to_string();

    for _ in 0..max_passes {
        if !escaped_entity_pattern().is_match(&current) {
            break;
        }
        let next = decode_once(&current).into_owned();
        if next == current {
            break;
        }
        current = next;
    }

    current
}

/// True when escaped angle brackets are still present, i.e. the text holds
/// markup that was escaped more times than we decoded.
pub fn contains_escaped_markup(value: &str) -> bool {
    escaped_markup_pattern().is_match(value)
}

/// True when the text contains at least one HTML tag.
pub fn looks_like_html(value: &str) -> bool {
    html_tag_pattern().is_match(value)
}

/// Returns a plain-text preview of at most `max_length` characters.
///
/// Text that fits is returned unchanged. Longer text is cut at exactly
/// `max_length` characters (no word-boundary search), trailing whitespace is
/// trimmed, and `…` is appended.
pub fn excerpt(html: &str, max_length: usize) -> String {
    let text = plain_text(html);
    if text.chars().count() <= max_length {
        return text;
    }

    let cut: String = text.chars().take(max_length).collect();
    format!("{}{}", cut.trim_end(), ELLIPSIS)
}

/// Escapes `& < > " '` for interpolation into markup.
///
/// Ampersands are replaced first so the entities produced by the later
/// replacements are not escaped a second time.
pub fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Formats an estimated reading time, e.g. `"4 min read"`.
///
/// Returns an empty string when the content has no words; otherwise the
/// estimate is rounded and never below one minute.
pub fn estimate_reading_time(html: &str, words_per_minute: usize) -> String {
    let words = plain_text(html).split_whitespace().count();
    if words == 0 {
        return String::new();
    }

    let minutes = (words as f64 / words_per_minute.max(1) as f64).round() as usize;
    format!("{} min read", minutes.max(1))
}

/// Formats the `YYYY-MM-DD` prefix of a timestamp as e.g. `"Oct 3, 2024"`.
///
/// Only the first ten characters are read. The date is built from explicit
/// year/month/day components, so no timezone shift can move it to a
/// neighbouring day. Returns an empty string when any component is missing,
/// zero, or the date does not exist.
///
/// # Examples
///
/// ```
/// use insights::util::format_date;
///
/// assert_eq!(format_date("2024-10-03T00:00:00+00:00"), "Oct 3, 2024");
/// assert_eq!(format_date("not-a-date"), "");
/// ```
pub fn format_date(value: &str) -> String {
    let head: String = value.chars().take(10).collect();
    let mut parts = head.split('-');

    let (Some(year), Some(month), Some(day)) = (
        parts.next().and_then(leading_number),
        parts.next().and_then(leading_number),
        parts.next().and_then(leading_number),
    ) else {
        return String::new();
    };

    if year == 0 || month == 0 || day == 0 {
        return String::new();
    }

    let Ok(year) = i32::try_from(year) else {
        return String::new();
    };

    NaiveDate::from_ymd_opt(year, month, day)
        .map(|date| date.format("%b %-d, %Y").to_string())
        .unwrap_or_default()
}

/// Parses the run of ASCII digits at the start of `s`.
fn leading_number(s: &str) -> Option<u32> {
    let end = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(s.len(), |(idx, _)| idx);
    s[..end].parse().ok()
}
