//! JSON parsing helpers for AI backend responses
//!
//! Models often wrap the JSON payload in prose or code fences, so the payload
//! is located first and then decoded and validated against the closed
//! transaction shape.

use serde::Deserialize;
use serde_json::Value;

use crate::amount::parse_amount;
use crate::error::{Error, Result};
use crate::interpreter::dates::MAX_DAY_OFFSET;
use crate::models::{Category, ExtractedTransaction, ExtractionSchema, TransactionKind};

/// Transaction as it comes off the wire, before validation
///
/// Accepts the legacy field names `type`, `daysAgo` and `specificDate`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTransaction {
    amount: Value,
    #[serde(alias = "type")]
    kind: String,
    category: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, alias = "daysAgo")]
    day_offset: Option<Value>,
    #[serde(default, alias = "specificDate")]
    day_of_month: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RawTransactions {
    transactions: Vec<RawTransaction>,
}

fn truncate(text: &str) -> String {
    if text.chars().count() > 200 {
        format!("{}...", text.chars().take(200).collect::<String>())
    } else {
        text.to_string()
    }
}

/// Slice between the first `open` and the last `close`
fn locate<'a>(response: &'a str, open: char, close: char) -> Option<&'a str> {
    let start = response.find(open)?;
    let end = response.rfind(close)?;
    (start < end).then(|| &response[start..=end])
}

fn decode<'a, T: Deserialize<'a>>(json_str: &'a str) -> Result<T> {
    serde_json::from_str(json_str).map_err(|e| {
        Error::InvalidData(format!(
            "Invalid JSON from AI: {} | Raw: {}",
            e,
            truncate(json_str)
        ))
    })
}

/// Integral value from a JSON number (or numeric string); `null` is absent
fn integral(value: Option<&Value>, field: &str) -> Result<Option<i64>> {
    let invalid = || Error::InvalidData(format!("{} must be an integer", field));

    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(i) => Ok(Some(i)),
            None => {
                let f = n.as_f64().ok_or_else(invalid)?;
                if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                    Ok(Some(f as i64))
                } else {
                    Err(invalid())
                }
            }
        },
        Some(Value::String(s)) => s.trim().parse::<i64>().map(Some).map_err(|_| invalid()),
        Some(_) => Err(invalid()),
    }
}

fn amount(value: &Value) -> Result<f64> {
    let amount = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_amount(s),
        _ => None,
    }
    .ok_or_else(|| Error::InvalidData(format!("amount is not a number: {}", value)))?;

    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidData(format!(
            "amount must be positive, got {}",
            amount
        )));
    }
    Ok(amount)
}

fn validate(raw: RawTransaction) -> Result<ExtractedTransaction> {
    let amount = amount(&raw.amount)?;
    let kind: TransactionKind = raw.kind.parse().map_err(Error::InvalidData)?;
    let category: Category = raw.category.parse().map_err(Error::InvalidData)?;

    let description = raw.description.unwrap_or_default().trim().to_string();
    if description.is_empty() {
        return Err(Error::InvalidData("description is empty".into()));
    }

    let day_offset = integral(raw.day_offset.as_ref(), "dayOffset")?;
    if let Some(offset) = day_offset.filter(|o| o.unsigned_abs() > MAX_DAY_OFFSET as u64) {
        return Err(Error::InvalidData(format!(
            "dayOffset out of range: {}",
            offset
        )));
    }
    let day_of_month = match integral(raw.day_of_month.as_ref(), "dayOfMonth")? {
        None | Some(0) => None,
        Some(day) if (1..=31).contains(&day) => Some(day as u32),
        Some(day) => {
            return Err(Error::InvalidData(format!(
                "dayOfMonth out of range: {}",
                day
            )))
        }
    };

    Ok(ExtractedTransaction {
        amount,
        kind,
        category,
        description,
        day_offset,
        day_of_month,
    })
}

/// Parse and validate an extraction response of the given shape
///
/// A single response yields exactly one record; a multi response yields at
/// least one. A bare JSON array is accepted for the multi shape.
pub fn parse_extraction(
    response: &str,
    schema: ExtractionSchema,
) -> Result<Vec<ExtractedTransaction>> {
    let response = response.trim();

    let raw = match schema {
        ExtractionSchema::Single => {
            let json_str = locate(response, '{', '}').ok_or_else(|| {
                Error::InvalidData(format!(
                    "No JSON found in AI response | Raw: {}",
                    truncate(response)
                ))
            })?;
            vec![decode::<RawTransaction>(json_str)?]
        }
        ExtractionSchema::Multi => {
            let object_first = match (response.find('{'), response.find('[')) {
                (Some(o), Some(a)) => o < a,
                (Some(_), None) => true,
                _ => false,
            };
            if object_first {
                let json_str = locate(response, '{', '}').ok_or_else(|| {
                    Error::InvalidData(format!(
                        "No JSON found in AI response | Raw: {}",
                        truncate(response)
                    ))
                })?;
                decode::<RawTransactions>(json_str)?.transactions
            } else {
                let json_str = locate(response, '[', ']').ok_or_else(|| {
                    Error::InvalidData(format!(
                        "No JSON found in AI response | Raw: {}",
                        truncate(response)
                    ))
                })?;
                decode::<Vec<RawTransaction>>(json_str)?
            }
        }
    };

    if raw.is_empty() {
        return Err(Error::InvalidData("AI returned no transactions".into()));
    }

    raw.into_iter().map(validate).collect()
}

/// Clean up free-text advice from the model
pub fn parse_recommendation(response: &str) -> Result<String> {
    let text = response
        .trim()
        .trim_start_matches("```markdown")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    if text.is_empty() {
        return Err(Error::InvalidData("Empty recommendation from AI".into()));
    }
    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single() {
        let response = r#"{"amount": 1200000, "kind": "expense", "category": "Bills", "description": "Bayar kos", "dayOffset": 1}"#;
        let result = parse_extraction(response, ExtractionSchema::Single).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].amount, 1_200_000.0);
        assert_eq!(result[0].kind, TransactionKind::Expense);
        assert_eq!(result[0].category, Category::Bills);
        assert_eq!(result[0].day_offset, Some(1));
        assert_eq!(result[0].day_of_month, None);
    }

    #[test]
    fn test_parse_single_with_text_and_fences() {
        let response = "Here you go:\n```json\n{\"amount\": 50000, \"kind\": \"expense\", \"category\": \"food\", \"description\": \"Makan\"}\n```";
        let result = parse_extraction(response, ExtractionSchema::Single).unwrap();
        assert_eq!(result[0].category, Category::Food);
    }

    #[test]
    fn test_legacy_field_names() {
        let response = r#"{"amount": 5000000, "type": "income", "category": "Salary", "description": "Gaji", "daysAgo": 0, "specificDate": 25}"#;
        let result = parse_extraction(response, ExtractionSchema::Single).unwrap();
        assert_eq!(result[0].kind, TransactionKind::Income);
        assert_eq!(result[0].day_offset, Some(0));
        assert_eq!(result[0].day_of_month, Some(25));
    }

    #[test]
    fn test_parse_multi() {
        let response = r#"{"transactions": [
            {"amount": 150000, "kind": "expense", "category": "Bills", "description": "Listrik", "dayOffset": -1},
            {"amount": 300000, "kind": "expense", "category": "Bills", "description": "Internet", "dayOffset": -2}
        ]}"#;
        let result = parse_extraction(response, ExtractionSchema::Multi).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].day_offset, Some(-1));
        assert_eq!(result[1].day_offset, Some(-2));
    }

    #[test]
    fn test_parse_multi_bare_array() {
        let response = r#"[{"amount": 20000, "kind": "expense", "category": "Food", "description": "Kopi"}]"#;
        let result = parse_extraction(response, ExtractionSchema::Multi).unwrap();
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_empty_multi_is_error() {
        let result = parse_extraction(r#"{"transactions": []}"#, ExtractionSchema::Multi);
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_no_json() {
        let result = parse_extraction("Sorry, I can't help with that", ExtractionSchema::Single);
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_rejects_unknown_category() {
        let response = r#"{"amount": 10000, "kind": "expense", "category": "Groceries", "description": "Sayur"}"#;
        assert!(parse_extraction(response, ExtractionSchema::Single).is_err());
    }

    #[test]
    fn test_rejects_non_positive_amount() {
        let response = r#"{"amount": 0, "kind": "expense", "category": "Food", "description": "Gratis"}"#;
        assert!(parse_extraction(response, ExtractionSchema::Single).is_err());
        let response = r#"{"amount": -5, "kind": "expense", "category": "Food", "description": "Minus"}"#;
        assert!(parse_extraction(response, ExtractionSchema::Single).is_err());
    }

    #[test]
    fn test_rejects_blank_description() {
        let response = r#"{"amount": 10000, "kind": "expense", "category": "Food", "description": "  "}"#;
        assert!(parse_extraction(response, ExtractionSchema::Single).is_err());
    }

    #[test]
    fn test_rejects_fractional_offset() {
        let response = r#"{"amount": 10000, "kind": "expense", "category": "Food", "description": "Makan", "dayOffset": 1.5}"#;
        assert!(parse_extraction(response, ExtractionSchema::Single).is_err());
    }

    #[test]
    fn test_day_offset_bounds() {
        let at_limit = r#"{"amount": 10000, "kind": "expense", "category": "Food", "description": "Makan", "dayOffset": -36500}"#;
        let result = parse_extraction(at_limit, ExtractionSchema::Single).unwrap();
        assert_eq!(result[0].day_offset, Some(-36_500));

        let absurd = r#"{"amount": 10000, "kind": "expense", "category": "Food", "description": "Makan", "dayOffset": 200000000000}"#;
        assert!(matches!(
            parse_extraction(absurd, ExtractionSchema::Single),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_day_of_month_bounds() {
        let zero = r#"{"amount": 10000, "kind": "expense", "category": "Food", "description": "Makan", "dayOfMonth": 0}"#;
        let result = parse_extraction(zero, ExtractionSchema::Single).unwrap();
        assert_eq!(result[0].day_of_month, None);

        let too_big = r#"{"amount": 10000, "kind": "expense", "category": "Food", "description": "Makan", "dayOfMonth": 32}"#;
        assert!(parse_extraction(too_big, ExtractionSchema::Single).is_err());
    }

    #[test]
    fn test_null_optionals_and_string_amount() {
        let response = r#"{"amount": "50rb", "kind": "Expense", "category": "Food", "description": "Makan", "dayOffset": null, "dayOfMonth": null}"#;
        let result = parse_extraction(response, ExtractionSchema::Single).unwrap();
        assert_eq!(result[0].amount, 50_000.0);
        assert_eq!(result[0].day_offset, None);
        assert_eq!(result[0].day_of_month, None);
    }

    #[test]
    fn test_parse_recommendation() {
        assert_eq!(
            parse_recommendation("```markdown\nKurangi jajan\n```").unwrap(),
            "Kurangi jajan"
        );
        assert!(parse_recommendation("   ").is_err());
    }
}
