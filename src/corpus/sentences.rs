// Sentence segmentation and short-sentence filtering.
//
// Segmentation is rule-based: a run of terminal punctuation followed by
// whitespace ends a sentence unless the next word starts lowercase or the
// period belongs to an abbreviation or an initial ("Dr.", "e.g.", "J.").
// Reference abbreviations ("No.", "p.", "Fig.") only hold before a number,
// since most of them are also ordinary words.
// Paragraphs are split independently, so a sentence never spans two of them.

use std::sync::LazyLock;

use regex_lite::Regex;

/// Sentences shorter than this are treated as headers or fragments.
pub const DEFAULT_MIN_LENGTH: usize = 20;

/// Terminal punctuation, optional closing quotes/brackets, then whitespace.
static BOUNDARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[.!?]+["'”’)\]]*\s+"#).expect("valid sentence boundary regex")
});

/// Lowercased words that end in a period without ending the sentence.
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "vs", "etc", "e.g", "i.e", "cf", "al",
    "inc", "ltd", "corp", "dept", "approx", "jan", "feb", "apr", "jun", "jul", "aug", "sept",
    "oct", "nov", "u.s", "u.k", "ph.d", "eds",
];

/// Abbreviations that introduce a number: "No. 5", "pp. 12-14", "Fig. 3".
const NUMBERED: &[&str] = &["no", "nos", "vol", "pp", "p", "fig", "figs", "sec", "ch", "art"];

/// Split one paragraph into trimmed, non-empty sentences.
pub fn split_sentences(paragraph: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for boundary in BOUNDARY.find_iter(paragraph) {
        if ends_sentence(paragraph, boundary.start(), boundary.as_str(), boundary.end()) {
            push_trimmed(&mut sentences, &paragraph[start..boundary.end()]);
            start = boundary.end();
        }
    }
    push_trimmed(&mut sentences, &paragraph[start..]);

    sentences
}

/// Keep only sentences with at least `min_length` characters, preserving order.
///
/// Length is counted in Unicode scalar values, not bytes.
pub fn filter_short(sentences: Vec<String>, min_length: usize) -> Vec<String> {
    sentences
        .into_iter()
        .filter(|s| s.chars().count() >= min_length)
        .collect()
}

fn ends_sentence(text: &str, start: usize, matched: &str, end: usize) -> bool {
    match text[end..].chars().next() {
        None => return true,
        Some(c) if c.is_lowercase() => return false,
        Some(_) => {}
    }

    // "?!" or "..." always close the sentence; a lone period needs a look back.
    let punctuation: String = matched.chars().take_while(|c| ".!?".contains(*c)).collect();
    if punctuation != "." {
        return true;
    }

    let word = text[..start]
        .split_whitespace()
        .last()
        .unwrap_or("")
        .trim_start_matches(|c: char| !c.is_alphanumeric());
    let next = text[end..].split_whitespace().next().unwrap_or("");

    !is_abbreviation(word, next)
}

fn is_abbreviation(word: &str, next: &str) -> bool {
    let lower = word.to_lowercase();

    // A lone capital, except the pronoun "I"
    let mut chars = word.chars();
    let is_initial =
        matches!((chars.next(), chars.next()), (Some(c), None) if c.is_uppercase() && c != 'I');
    if is_initial || ABBREVIATIONS.contains(&lower.as_str()) {
        return true;
    }

    next.starts_with(|c: char| c.is_ascii_digit()) && NUMBERED.contains(&lower.as_str())
}

fn push_trimmed(sentences: &mut Vec<String>, piece: &str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        sentences.push(piece.to_string());
    }
}
