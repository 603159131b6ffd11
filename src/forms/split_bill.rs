// 💳 Bill Split Draft - ephemeral input for one split interaction
//
// Holds what the user has typed so far. Nothing here touches a balance:
// `settlement_delta` only computes the number the registry should apply.
//
// Draft lifetime: created when a friend is selected, discarded on submit
// or on any selection change.

use crate::error::{SplitError, SplitResult, ValidationError};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

// ============================================================================
// PAYER
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Payer {
    #[default]
    User,
    Friend,
}

impl Payer {
    /// Option label in the "who is paying" picker
    pub fn label<'a>(&self, friend_name: &'a str) -> &'a str {
        match self {
            Payer::User => "You",
            Payer::Friend => friend_name,
        }
    }

    pub fn other(&self) -> Payer {
        match self {
            Payer::User => Payer::Friend,
            Payer::Friend => Payer::User,
        }
    }
}

// ============================================================================
// NUMERIC INPUT
// ============================================================================

/// Parse a text field into an amount.
///
/// Empty → `Ok(None)` (not entered). Non-numeric, negative or non-finite
/// input is a validation error.
pub fn parse_amount(field: &str, raw: &str) -> Result<Option<f64>, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    let value: f64 = raw
        .parse()
        .map_err(|_| ValidationError::new(field, format!("'{}' is not a number", raw)))?;

    if !value.is_finite() {
        return Err(ValidationError::new(field, "Amount must be finite"));
    }
    if value < 0.0 {
        return Err(ValidationError::new(field, "Amount cannot be negative"));
    }

    Ok(Some(value))
}

// ============================================================================
// SPLIT DRAFT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SplitDraft {
    pub bill_total: Option<f64>,
    pub payer_expense: Option<f64>,
    pub payer: Payer,
}

impl SplitDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_bill_total(&mut self, raw: &str) -> SplitResult<()> {
        let value = parse_amount("bill_total", raw)?;
        self.bill_total = value;
        debug!(?value, "draft: bill total set");
        Ok(())
    }

    /// Store the payer's share unless it exceeds the bill total.
    ///
    /// Returns `Ok(false)` when the value was refused and the previous one
    /// kept. An unset bill counts as 0 here, so nothing above 0 is accepted
    /// before a bill is entered.
    pub fn set_payer_expense(&mut self, raw: &str) -> SplitResult<bool> {
        let value = parse_amount("payer_expense", raw)?;

        let proposed = value.unwrap_or(0.0);
        if proposed > self.bill_total.unwrap_or(0.0) {
            debug!(proposed, kept = ?self.payer_expense, "draft: expense exceeds bill, kept previous");
            return Ok(false);
        }

        self.payer_expense = value;
        debug!(?value, "draft: payer expense set");
        Ok(true)
    }

    pub fn set_payer(&mut self, payer: Payer) {
        self.payer = payer;
        debug!(?payer, "draft: payer set");
    }

    /// `bill_total - payer_expense`, unset fields read as 0. Never stored.
    pub fn friend_expense(&self) -> f64 {
        self.bill_total.unwrap_or(0.0) - self.payer_expense.unwrap_or(0.0)
    }

    /// Balance delta this draft would apply to the selected friend.
    ///
    /// A missing or zero bill/expense is invalid. When the user pays the
    /// friend now owes their share (+friend_expense); when the friend pays
    /// the user's own expense is booked against them (-payer_expense).
    pub fn settlement_delta(&self) -> SplitResult<f64> {
        let bill = match self.bill_total {
            Some(v) if v != 0.0 => v,
            _ => {
                warn!("split rejected: bill total missing");
                return Err(SplitError::validation("bill_total", "Bill value is required"));
            }
        };
        let expense = match self.payer_expense {
            Some(v) if v != 0.0 => v,
            _ => {
                warn!("split rejected: payer expense missing");
                return Err(SplitError::validation("payer_expense", "Your expense is required"));
            }
        };

        Ok(match self.payer {
            Payer::User => bill - expense,
            Payer::Friend => -expense,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
