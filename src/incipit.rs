/// Suffixes that suppress a sentence boundary when they immediately precede
/// the punctuation mark. Matched as literal suffixes of the preceding text,
/// not as whole words, so "approx." still splits but "Mrs." never does.
const NON_BOUNDARY_SUFFIXES: &[&str] = &["Dr", "Mr", "Ms", "Mrs", "Prof", "Rev", "Sen", "Rep", "v"];

const LEADING_QUOTES: &[char] = &['"', '\'', '“', '‘'];
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', '"', '\'', '”', '’'];

/// Returns the first `word_count` words of the sentence containing `offset`,
/// looking only at the text before it. A boundary is sentence punctuation
/// followed by whitespace and an ASCII uppercase letter. `offset` is a byte
/// position; it is clamped back to the nearest character boundary so a
/// caller slip degrades instead of panicking.
pub fn sentence_start(text: &str, offset: usize, word_count: usize) -> String {
    let mut end = offset.min(text.len());
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    let before = &text[..end];
    if before.is_empty() {
        return String::new();
    }

    let fragment = before[last_boundary(before)..].trim();
    let fragment =
        fragment.trim_start_matches(|c: char| LEADING_QUOTES.contains(&c) || c.is_whitespace());

    let mut words: Vec<&str> = fragment.split_whitespace().take(word_count).collect();
    if words.is_empty() {
        return String::new();
    }
    let last = words.len() - 1;
    words[last] = words[last].trim_end_matches(TRAILING_PUNCTUATION);
    words.join(" ")
}

/// Byte index where the last sentence of `text` starts (0 when the whole
/// text is a single sentence).
fn last_boundary(text: &str) -> usize {
    let mut start = 0;
    for (i, c) in text.char_indices() {
        if !matches!(c, '.' | '?' | '!') {
            continue;
        }
        if ends_with_non_boundary_suffix(&text[..i]) {
            continue;
        }
        let after = i + c.len_utf8();
        let rest = &text[after..];
        let ws_len: usize = rest
            .chars()
            .take_while(|ch| ch.is_whitespace())
            .map(|ch| ch.len_utf8())
            .sum();
        if ws_len == 0 {
            continue;
        }
        if let Some(next) = rest[ws_len..].chars().next() {
            if next.is_ascii_uppercase() {
                start = after + ws_len;
            }
        }
    }
    start
}

fn ends_with_non_boundary_suffix(before: &str) -> bool {
    NON_BOUNDARY_SUFFIXES.iter().any(|s| before.ends_with(s))
}
