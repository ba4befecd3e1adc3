//! Transaction-validity filter
//!
//! Cheap pre-check before calling the extractor. A message must carry a
//! number, plus either a transaction/category word or a time expression.

use super::keywords::{
    contains_any_keyword, contains_any_phrase, has_category_hint, TIME_EXPRESSIONS,
    TRANSACTION_KEYWORDS,
};

/// Whether `text` contains at least one ASCII digit
pub fn has_amount_digit(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit())
}

/// Whether `text` mentions when the transaction happened
pub fn has_time_expression(text: &str) -> bool {
    contains_any_phrase(&text.to_lowercase(), TIME_EXPRESSIONS)
}

/// Whether `text` plausibly describes a financial transaction
pub fn is_valid_transaction_input(text: &str) -> bool {
    if !has_amount_digit(text) {
        return false;
    }

    let lower = text.to_lowercase();
    contains_any_keyword(&lower, TRANSACTION_KEYWORDS)
        || has_category_hint(&lower)
        || contains_any_phrase(&lower, TIME_EXPRESSIONS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_and_number() {
        assert!(is_valid_transaction_input("bayar makan 50rb"));
        assert!(is_valid_transaction_input("Terima gaji 5 juta"));
        assert!(is_valid_transaction_input("paid rent 300"));
    }

    #[test]
    fn test_no_digit_is_never_valid() {
        assert!(!is_valid_transaction_input("bayar makan lima puluh ribu"));
        assert!(!is_valid_transaction_input("besok bayar listrik"));
        assert!(!is_valid_transaction_input("transfer gaji bonus belanja"));
        assert!(!is_valid_transaction_input(""));
    }

    #[test]
    fn test_typo_keyword_with_number() {
        // "pembayaran" contains "bayar" exactly
        assert!(is_valid_transaction_input("pembayaran 20000"));
        // "belanj" is a fuzzy match for "belanja"
        assert!(is_valid_transaction_input("belanj sayur 30rb"));
    }

    #[test]
    fn test_category_hint_with_number() {
        assert!(is_valid_transaction_input("netflix 54rb"));
        assert!(is_valid_transaction_input("bensin 20k"));
    }

    #[test]
    fn test_time_expression_path() {
        // verb typo'd beyond tolerance, but a time word and a number are present
        assert!(is_valid_transaction_input("besok bykr 150rb"));
        assert!(is_valid_transaction_input("tanggal 15 xyz 20rb"));
    }

    #[test]
    fn test_number_without_context() {
        assert!(!is_valid_transaction_input("123"));
        assert!(!is_valid_transaction_input("jam 7 ketemu di lobby"));
    }

    #[test]
    fn test_has_time_expression() {
        assert!(has_time_expression("Kemarin bayar kos"));
        assert!(has_time_expression("2 hari lalu"));
        assert!(!has_time_expression("bayar kos"));
    }
}
