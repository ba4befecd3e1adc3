//! Rupiah amount notation
//!
//! Handles the shorthand people type in chat: "50rb", "100k", "1,2 juta",
//! "1.5jt", "Rp 25.000". A comma is always a decimal separator. A dot followed
//! by exactly three digits is a thousands separator, any other dot is a
//! decimal point.

use std::sync::OnceLock;

use regex::Regex;

fn amount_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(\d+(?:[.,]\d+)*)(?:\s*(ribu|rb|juta|jt|k)\b)?").expect("valid regex")
    })
}

/// Multiplier for a shorthand suffix
fn suffix_multiplier(suffix: &str) -> f64 {
    match suffix.to_lowercase().as_str() {
        "k" | "rb" | "ribu" => 1_000.0,
        "jt" | "juta" => 1_000_000.0,
        _ => 1.0,
    }
}

/// Parse a bare number using Indonesian separators
fn parse_number(raw: &str) -> Option<f64> {
    let chars: Vec<char> = raw.chars().collect();
    let mut normalized = String::with_capacity(raw.len());

    for (i, c) in chars.iter().enumerate() {
        match c {
            ',' => normalized.push('.'),
            '.' => {
                let digits_after = chars[i + 1..]
                    .iter()
                    .take_while(|c| c.is_ascii_digit())
                    .count();
                if digits_after != 3 {
                    normalized.push('.');
                }
            }
            _ => normalized.push(*c),
        }
    }

    normalized.parse::<f64>().ok()
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Every positive amount mentioned in `text`, in order of appearance
pub fn find_amounts(text: &str) -> Vec<f64> {
    amount_regex()
        .captures_iter(text)
        .filter_map(|caps| {
            let number = parse_number(caps.get(1)?.as_str())?;
            let multiplier = caps
                .get(2)
                .map(|m| suffix_multiplier(m.as_str()))
                .unwrap_or(1.0);
            Some(round_cents(number * multiplier))
        })
        .filter(|amount| amount.is_finite() && *amount > 0.0)
        .collect()
}

/// First amount mentioned in `text`
pub fn parse_amount(text: &str) -> Option<f64> {
    find_amounts(text).into_iter().next()
}

/// Format as whole rupiah with dot grouping, e.g. `Rp 1.200.000`
pub fn format_rupiah(amount: f64) -> String {
    let rounded = amount.round();
    let digits = format!("{}", rounded.abs() as u64);

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    if rounded < 0.0 {
        format!("-Rp {}", grouped)
    } else {
        format!("Rp {}", grouped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shorthand_suffixes() {
        assert_eq!(parse_amount("50rb"), Some(50_000.0));
        assert_eq!(parse_amount("100k"), Some(100_000.0));
        assert_eq!(parse_amount("25 ribu"), Some(25_000.0));
        assert_eq!(parse_amount("5 JUTA"), Some(5_000_000.0));
        assert_eq!(parse_amount("1.5jt"), Some(1_500_000.0));
    }

    #[test]
    fn test_decimal_comma() {
        assert_eq!(parse_amount("bayar kos 1,2 juta"), Some(1_200_000.0));
        assert_eq!(parse_amount("2,5"), Some(2.5));
    }

    #[test]
    fn test_thousands_dot() {
        assert_eq!(parse_amount("Rp 25.000"), Some(25_000.0));
        assert_eq!(parse_amount("1.500.000"), Some(1_500_000.0));
        assert_eq!(parse_amount("1.250,5"), Some(1_250.5));
    }

    #[test]
    fn test_suffix_needs_word_boundary() {
        // "kg" is not the "k" multiplier
        assert_eq!(parse_amount("beli beras 5kg"), Some(5.0));
    }

    #[test]
    fn test_find_amounts_in_order() {
        let amounts = find_amounts("bayar makan 50rb dan isi bensin 100rb");
        assert_eq!(amounts, vec![50_000.0, 100_000.0]);
    }

    #[test]
    fn test_no_amount() {
        assert_eq!(parse_amount("bayar makan"), None);
        assert_eq!(parse_amount("0"), None);
    }

    #[test]
    fn test_format_rupiah() {
        assert_eq!(format_rupiah(1_200_000.0), "Rp 1.200.000");
        assert_eq!(format_rupiah(500.0), "Rp 500");
        assert_eq!(format_rupiah(25_000.4), "Rp 25.000");
        assert_eq!(format_rupiah(0.0), "Rp 0");
        assert_eq!(format_rupiah(-15_000.0), "-Rp 15.000");
    }
}
