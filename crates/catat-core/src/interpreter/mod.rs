//! Chat message interpreter
//!
//! Turns one free-text message into an [`Interpretation`]:
//!
//! 1. Casual chat (greetings, thanks, ...) gets a canned reply
//! 2. Text that does not look like a transaction gets a "didn't understand" reply
//! 3. The multiplicity detector picks the single or multi extraction schema
//! 4. The AI backend extracts records, whose dates are then resolved
//!
//! Only step 4 touches the network. Extraction failures surface as
//! [`Error::Extraction`] carrying a message meant for the user; nothing is
//! retried.

pub mod casual;
pub mod dates;
pub mod keywords;
pub mod multiplicity;
pub mod replies;
pub mod validity;

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::ai::{AIBackend, AIClient};
use crate::error::{Error, Result};
use crate::models::{ExtractedTransaction, ExtractionSchema, Interpretation, ResolvedTransaction};

pub use casual::{casual_intent, detect_casual_chat, CasualIntent};
pub use dates::{describe_offset, resolve_date};
pub use multiplicity::detect_multiple_transactions;
pub use replies::{CyclingPicker, FixedPicker, RandomPicker, ReplyPicker};
pub use validity::is_valid_transaction_input;

/// Attach a calendar date and display phrase to an extracted record
pub fn resolve_transaction(tx: &ExtractedTransaction, today: NaiveDate) -> ResolvedTransaction {
    ResolvedTransaction {
        amount: tx.amount,
        kind: tx.kind,
        category: tx.category,
        description: tx.description.clone(),
        date: resolve_date(today, tx.day_offset, tx.day_of_month),
        day_offset: tx.day_offset,
        day_of_month: tx.day_of_month,
        when: describe_offset(tx.day_offset, tx.day_of_month),
    }
}

/// Which extraction schema a message needs
pub fn schema_for(text: &str) -> ExtractionSchema {
    if detect_multiple_transactions(text) {
        ExtractionSchema::Multi
    } else {
        ExtractionSchema::Single
    }
}

/// Stateless message interpreter
///
/// Owns its backend client and reply picker; cheap to clone and safe to share
/// across tasks.
#[derive(Clone)]
pub struct Interpreter {
    client: Option<AIClient>,
    picker: Arc<dyn ReplyPicker>,
}

impl Interpreter {
    /// Create an interpreter backed by `client`
    pub fn new(client: AIClient) -> Self {
        Self {
            client: Some(client),
            picker: Arc::new(RandomPicker),
        }
    }

    /// Create an interpreter with no backend
    ///
    /// Casual chat and unrecognized input still work; anything that needs
    /// extraction fails with [`Error::Config`].
    pub fn without_backend() -> Self {
        Self {
            client: None,
            picker: Arc::new(RandomPicker),
        }
    }

    /// Create from environment variables (see [`AIClient::from_env`])
    pub fn from_env() -> Self {
        match AIClient::from_env() {
            Some(client) => Self::new(client),
            None => Self::without_backend(),
        }
    }

    /// Replace the reply picker (e.g. a fixed one in tests)
    pub fn with_picker(mut self, picker: impl ReplyPicker + 'static) -> Self {
        self.picker = Arc::new(picker);
        self
    }

    /// The configured backend, if any
    pub fn client(&self) -> Option<&AIClient> {
        self.client.as_ref()
    }

    /// Interpret a message relative to the local date
    pub async fn interpret(&self, text: &str) -> Result<Interpretation> {
        self.interpret_on(text, chrono::Local::now().date_naive())
            .await
    }

    /// Interpret a message relative to `today`
    pub async fn interpret_on(&self, text: &str, today: NaiveDate) -> Result<Interpretation> {
        if let Some(message) = detect_casual_chat(text, self.picker.as_ref()) {
            debug!("Casual chat detected");
            return Ok(Interpretation::CasualReply { message });
        }

        if !is_valid_transaction_input(text) {
            debug!("Input does not look like a transaction");
            let message = replies::choose(self.picker.as_ref(), replies::NOT_UNDERSTOOD_REPLIES);
            return Ok(Interpretation::Unrecognized {
                message: message.to_string(),
            });
        }

        let schema = schema_for(text);
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| Error::Config("No AI backend configured".into()))?;

        let failure_message = match schema {
            ExtractionSchema::Single => replies::EXTRACTION_FAILED,
            ExtractionSchema::Multi => replies::MULTI_EXTRACTION_FAILED,
        };

        let records = client.extract(text, schema).await.map_err(|e| {
            warn!(schema = %schema, model = client.model(), error = %e, "Extraction failed");
            Error::Extraction(failure_message.to_string())
        })?;

        let mut resolved: Vec<ResolvedTransaction> = records
            .iter()
            .map(|tx| resolve_transaction(tx, today))
            .collect();

        info!(
            schema = %schema,
            count = resolved.len(),
            "Extracted transactions"
        );

        if resolved.is_empty() {
            return Err(Error::Extraction(failure_message.to_string()));
        }

        match schema {
            ExtractionSchema::Single => Ok(Interpretation::SingleTransaction {
                transaction: resolved.remove(0),
            }),
            ExtractionSchema::Multi => Ok(Interpretation::MultipleTransactions {
                transactions: resolved,
            }),
        }
    }
}
