use scraper::ElementRef;

/// Number of words kept when a label is derived from body text
pub const LABEL_WORDS: usize = 7;

/// Collapses every whitespace run into one space and trims the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text of an element with text nodes concatenated as-is, then collapsed
pub fn collapsed_text(el: ElementRef<'_>) -> String {
    collapse_whitespace(&el.text().collect::<String>())
}

/// Text of an element with a space between text nodes, then collapsed
///
/// Adjacent blocks such as `<p>a</p><p>b</p>` yield `"a b"` rather than `"ab"`.
pub fn separated_text(el: ElementRef<'_>) -> String {
    collapse_whitespace(&el.text().collect::<Vec<_>>().join(" "))
}

/// First `max_words` words of `text`, with `...` appended when more remain
pub fn word_summary(text: &str, max_words: usize) -> Option<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return None;
    }
    let mut summary = words[..words.len().min(max_words)].join(" ");
    if words.len() > max_words {
        summary.push_str("...");
    }
    Some(summary)
}
