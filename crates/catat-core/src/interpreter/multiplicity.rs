//! Single vs. multiple transaction detection
//!
//! Coarse on purpose: the result only picks which extraction schema to
//! request. The extractor decides how many transactions there really are.

use super::keywords::{contains_any_phrase, MULTI_INDICATORS, TRANSACTION_VERBS};

/// Number of times `word` starts a word in `text`
fn count_word_starts(text: &str, word: &str) -> usize {
    text.match_indices(word)
        .filter(|(idx, _)| {
            text[..*idx]
                .chars()
                .next_back()
                .map_or(true, |prev| !prev.is_alphanumeric())
        })
        .count()
}

/// Total occurrences of transaction verbs in `text` (already lowercase)
pub fn count_transaction_verbs(text: &str) -> usize {
    TRANSACTION_VERBS
        .iter()
        .map(|verb| count_word_starts(text, verb))
        .sum()
}

/// Whether `text` joins several items with a conjunction or list comma
pub fn has_multi_indicator(text: &str) -> bool {
    contains_any_phrase(&text.to_lowercase(), MULTI_INDICATORS)
}

/// Whether `text` appears to describe more than one transaction
pub fn detect_multiple_transactions(text: &str) -> bool {
    let lower = text.to_lowercase();
    contains_any_phrase(&lower, MULTI_INDICATORS) && count_transaction_verbs(&lower) >= 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conjunction_and_two_verbs() {
        assert!(detect_multiple_transactions(
            "bayar makan 50rb dan isi bensin 100rb"
        ));
        assert!(detect_multiple_transactions(
            "Tadi bayar makan 50rb, terus isi bensin 100rb, sama beli pulsa 25rb"
        ));
    }

    #[test]
    fn test_no_conjunction() {
        assert!(!detect_multiple_transactions(
            "bayar makan di restoran yang enak 50rb"
        ));
    }

    #[test]
    fn test_conjunction_with_single_verb() {
        assert!(!detect_multiple_transactions("beli kopi dan roti 30rb"));
    }

    #[test]
    fn test_decimal_comma_is_not_a_list() {
        assert!(!detect_multiple_transactions("kemarin bayar kos 1,2 juta"));
    }

    #[test]
    fn test_future_pair() {
        assert!(detect_multiple_transactions(
            "besok bayar listrik 150rb dan lusa bayar internet 300rb"
        ));
    }

    #[test]
    fn test_verbs_counted_at_word_start_only() {
        assert_eq!(count_transaction_verbs("bayar makan"), 2);
        assert_eq!(count_transaction_verbs("bayar bayar bayar"), 3);
        // "pembayaran" does not start with "bayar"; "dimakan" does not start with "makan"
        assert_eq!(count_transaction_verbs("pembayaran dimakan"), 0);
        assert_eq!(count_transaction_verbs("(beli) 20rb"), 1);
    }

    #[test]
    fn test_has_multi_indicator() {
        assert!(has_multi_indicator("a DAN b"));
        assert!(has_multi_indicator("a, b"));
        assert!(!has_multi_indicator("1,5 juta"));
    }
}
