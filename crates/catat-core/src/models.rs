//! Domain models for Catat

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Direction of money flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Indonesian label used in confirmations ("Pemasukan" / "Pengeluaran")
    pub fn label(&self) -> &'static str {
        match self {
            Self::Income => "Pemasukan",
            Self::Expense => "Pengeluaran",
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction kind: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Closed set of transaction categories
///
/// Backends must pick one of these; anything else is rejected during
/// extraction validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Food,
    Transport,
    Bills,
    Salary,
    Shopping,
    Entertainment,
    Transfer,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Transport => "Transport",
            Self::Bills => "Bills",
            Self::Salary => "Salary",
            Self::Shopping => "Shopping",
            Self::Entertainment => "Entertainment",
            Self::Transfer => "Transfer",
            Self::Other => "Other",
        }
    }

    /// All categories, in schema enum order
    pub fn all() -> &'static [Category] {
        &[
            Self::Food,
            Self::Transport,
            Self::Bills,
            Self::Salary,
            Self::Shopping,
            Self::Entertainment,
            Self::Transfer,
            Self::Other,
        ]
    }

    /// Indonesian description shown next to the category name in prompts
    pub fn label(&self) -> &'static str {
        match self {
            Self::Food => "Makanan & Minuman",
            Self::Transport => "Transportasi",
            Self::Bills => "Tagihan & Utilitas",
            Self::Salary => "Gaji & Penghasilan",
            Self::Shopping => "Belanja",
            Self::Entertainment => "Hiburan",
            Self::Transfer => "Transfer Uang",
            Self::Other => "Lainnya",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Food => "🍔",
            Self::Transport => "🚗",
            Self::Bills => "📄",
            Self::Salary => "💰",
            Self::Shopping => "🛍️",
            Self::Entertainment => "🎬",
            Self::Transfer => "💸",
            Self::Other => "📦",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::all()
            .iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .copied()
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which response shape to request from the extraction backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionSchema {
    /// One transaction object
    Single,
    /// `{ "transactions": [ ... ] }`
    Multi,
}

impl ExtractionSchema {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Multi => "multi",
        }
    }
}

impl std::fmt::Display for ExtractionSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A transaction as returned by the extraction backend, before date resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedTransaction {
    pub amount: f64,
    pub kind: TransactionKind,
    pub category: Category,
    pub description: String,
    /// Days relative to today: positive is the past, negative the future
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_offset: Option<i64>,
    /// Explicit day of month; takes precedence over `day_offset`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_month: Option<u32>,
}

/// A transaction with its calendar date resolved, ready to persist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedTransaction {
    pub amount: f64,
    pub kind: TransactionKind,
    pub category: Category,
    pub description: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_offset: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_month: Option<u32>,
    /// Human phrase for the date ("kemarin", "tanggal 15", ...)
    pub when: String,
}

/// Outcome of interpreting one chat message
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Interpretation {
    /// Small talk; `message` is the reply to show
    CasualReply { message: String },
    /// Did not look like a transaction; `message` asks the user to rephrase
    Unrecognized { message: String },
    SingleTransaction { transaction: ResolvedTransaction },
    MultipleTransactions { transactions: Vec<ResolvedTransaction> },
}

impl Interpretation {
    /// Transactions carried by this outcome (empty for replies)
    pub fn transactions(&self) -> &[ResolvedTransaction] {
        match self {
            Self::SingleTransaction { transaction } => std::slice::from_ref(transaction),
            Self::MultipleTransactions { transactions } => transactions,
            Self::CasualReply { .. } | Self::Unrecognized { .. } => &[],
        }
    }

    /// Reply text for non-transaction outcomes
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::CasualReply { message } | Self::Unrecognized { message } => Some(message),
            _ => None,
        }
    }
}

/// A stored transaction row, as supplied by the persistence layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub amount: f64,
    pub kind: TransactionKind,
    pub category: Category,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
}

impl From<&ResolvedTransaction> for LedgerEntry {
    fn from(tx: &ResolvedTransaction) -> Self {
        Self {
            amount: tx.amount,
            kind: tx.kind,
            category: tx.category,
            description: tx.description.clone(),
            date: tx.date,
        }
    }
}
