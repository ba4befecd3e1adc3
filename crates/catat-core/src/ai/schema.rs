//! Response schemas for structured extraction
//!
//! Two dialects of the same shape: standard JSON Schema (Ollama `format`,
//! OpenAI `response_format`) and the OpenAPI subset Gemini accepts as
//! `responseSchema` (upper-case type names, `nullable` instead of optional).

use serde_json::{json, Value};

use crate::models::{Category, ExtractionSchema, TransactionKind};

const AMOUNT_DESC: &str = "Transaction amount as a plain number (e.g. 50rb = 50000, 1,2 juta = 1200000)";
const DESCRIPTION_DESC: &str = "Short description of the transaction";
const DAY_OFFSET_DESC: &str =
    "Days relative to today: 0 = today, 1 = yesterday, 2 = two days ago, -1 = tomorrow, -2 = day after tomorrow";
const DAY_OF_MONTH_DESC: &str = "Explicit day of month (1-31) when a date like 'tanggal 15' is mentioned";

fn kind_values() -> Vec<&'static str> {
    vec![
        TransactionKind::Income.as_str(),
        TransactionKind::Expense.as_str(),
    ]
}

fn category_values() -> Vec<&'static str> {
    Category::all().iter().map(|c| c.as_str()).collect()
}

fn transaction_json_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "amount": { "type": "number", "description": AMOUNT_DESC },
            "kind": { "type": "string", "enum": kind_values() },
            "category": { "type": "string", "enum": category_values() },
            "description": { "type": "string", "description": DESCRIPTION_DESC },
            "dayOffset": { "type": "integer", "description": DAY_OFFSET_DESC },
            "dayOfMonth": {
                "type": "integer",
                "minimum": 1,
                "maximum": 31,
                "description": DAY_OF_MONTH_DESC
            }
        },
        "required": ["amount", "kind", "category", "description"]
    })
}

fn transaction_gemini_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "amount": { "type": "NUMBER", "description": AMOUNT_DESC },
            "kind": { "type": "STRING", "format": "enum", "enum": kind_values() },
            "category": { "type": "STRING", "format": "enum", "enum": category_values() },
            "description": { "type": "STRING", "description": DESCRIPTION_DESC },
            "dayOffset": { "type": "INTEGER", "nullable": true, "description": DAY_OFFSET_DESC },
            "dayOfMonth": { "type": "INTEGER", "nullable": true, "description": DAY_OF_MONTH_DESC }
        },
        "required": ["amount", "kind", "category", "description"]
    })
}

/// Standard JSON Schema for the requested response shape
pub fn json_schema(schema: ExtractionSchema) -> Value {
    match schema {
        ExtractionSchema::Single => transaction_json_schema(),
        ExtractionSchema::Multi => json!({
            "type": "object",
            "properties": {
                "transactions": { "type": "array", "items": transaction_json_schema() }
            },
            "required": ["transactions"]
        }),
    }
}

/// Gemini `responseSchema` for the requested response shape
pub fn gemini_schema(schema: ExtractionSchema) -> Value {
    match schema {
        ExtractionSchema::Single => transaction_gemini_schema(),
        ExtractionSchema::Multi => json!({
            "type": "OBJECT",
            "properties": {
                "transactions": { "type": "ARRAY", "items": transaction_gemini_schema() }
            },
            "required": ["transactions"]
        }),
    }
}
