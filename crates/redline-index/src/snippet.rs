//! Context snippet extraction.

use crate::config::SearchConfig;

#[derive(Debug)]
struct Window {
    start: usize,
    end: usize,
    first_match: usize,
    last_match_end: usize,
}

/// Build context snippets for `matches` (`(offset, len)` in characters).
///
/// Each match gets `context_chars` on either side; windows that overlap or
/// touch are merged; window edges are pulled inward to the nearest word
/// boundary without cutting into a match. At most `max_snippets` snippets
/// are returned, in document order. A leading or trailing `...` marks a
/// window that does not reach the start or end of the content.
pub fn extract(content: &str, matches: &[(usize, usize)], config: &SearchConfig) -> Vec<String> {
    if matches.is_empty() || config.max_snippets == 0 {
        return Vec::new();
    }

    let chars: Vec<char> = content.chars().collect();
    let len = chars.len();
    let ctx = config.context_chars;

    let mut sorted = matches.to_vec();
    sorted.sort_unstable();

    let mut windows: Vec<Window> = Vec::new();
    for (offset, match_len) in sorted {
        let offset = offset.min(len);
        let match_end = (offset + match_len).min(len);
        let start = offset.saturating_sub(ctx);
        let end = (match_end + ctx).min(len);

        match windows.last_mut() {
            Some(w) if start <= w.end => {
                w.end = w.end.max(end);
                w.last_match_end = w.last_match_end.max(match_end);
            }
            _ => {
                if windows.len() == config.max_snippets {
                    break;
                }
                windows.push(Window {
                    start,
                    end,
                    first_match: offset,
                    last_match_end: match_end,
                });
            }
        }
    }

    windows.iter().map(|w| render(&chars, w)).collect()
}

fn render(chars: &[char], window: &Window) -> String {
    let len = chars.len();
    let mid_word = |i: usize| chars[i - 1].is_alphanumeric() && chars[i].is_alphanumeric();

    let mut start = window.start;
    while start > 0 && start < window.first_match && mid_word(start) {
        start += 1;
    }

    let mut end = window.end;
    while end < len && end > window.last_match_end && mid_word(end) {
        end -= 1;
    }

    let body: String = chars[start..end].iter().collect();
    let mut snippet = String::with_capacity(body.len() + 6);
    if start > 0 {
        snippet.push_str("...");
    }
    snippet.push_str(body.trim());
    if end < len {
        snippet.push_str("...");
    }
    snippet
}
