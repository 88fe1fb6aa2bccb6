// Ranking, CSV persistence and terminal display of matches.

pub mod csv;
pub mod terminal;

use crate::models::Match;

/// Sort matches by ascending distance, most similar first.
///
/// Ties keep no particular order.
pub fn rank_matches(mut matches: Vec<Match>) -> Vec<Match> {
    matches.sort_unstable_by(|a, b| a.similarity.total_cmp(&b.similarity));
    matches
}

/// Shorten a sentence for the match table, keeping at most `max_chars`
/// characters and marking the cut with "...".
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(similarity: f64) -> Match {
        Match {
            similarity,
            doc1: "a.docx".to_string(),
            sentence1: String::new(),
            doc2: "b.docx".to_string(),
            sentence2: String::new(),
        }
    }

    #[test]
    fn test_rank_puts_closest_first() {
        let ranked = rank_matches(vec![at(0.15), at(0.0), at(0.08)]);
        let order: Vec<f64> = ranked.iter().map(|m| m.similarity).collect();
        assert_eq!(order, vec![0.0, 0.08, 0.15]);
    }

    #[test]
    fn test_truncate_keeps_short_sentences() {
        assert_eq!(truncate_chars("Short sentence.", 110), "Short sentence.");
        assert_eq!(truncate_chars(&"x".repeat(110), 110), "x".repeat(110));
    }

    #[test]
    fn test_truncate_cuts_on_character_boundaries() {
        let sentence = "Café résumé naïve";
        assert_eq!(truncate_chars(sentence, 4), "Café...");
        assert_eq!(truncate_chars(sentence, 6), "Café r...");
    }
}
