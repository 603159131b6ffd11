// 🧑 Friend Entity - Stable identity + running balance
//
// "The id is IDENTITY (never changes), the balance is a VALUE (changes on every split)"
//
// Sign convention:
// - negative balance → I owe this friend |balance|
// - positive balance → this friend owes me |balance|
// - zero             → settled

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// FRIEND ID
// ============================================================================

/// Opaque friend identifier, unique within a registry for the process lifetime
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FriendId(String);

impl FriendId {
    pub fn new(id: impl Into<String>) -> Self {
        FriendId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FriendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FriendId {
    fn from(id: &str) -> Self {
        FriendId(id.to_string())
    }
}

impl From<String> for FriendId {
    fn from(id: String) -> Self {
        FriendId(id)
    }
}

// ============================================================================
// BALANCE STATUS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceStatus {
    /// I owe the friend
    Owes,
    /// The friend owes me
    Owed,
    /// Settled
    Even,
}

impl BalanceStatus {
    pub fn from_balance(balance: f64) -> Self {
        if balance < 0.0 {
            BalanceStatus::Owes
        } else if balance > 0.0 {
            BalanceStatus::Owed
        } else {
            BalanceStatus::Even
        }
    }
}

// ============================================================================
// FRIEND ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Friend {
    /// Stable identity - NEVER changes
    pub id: FriendId,

    pub name: String,

    /// Avatar URL (not validated)
    pub image: String,

    /// Signed net amount between me and this friend
    pub balance: f64,
}

impl Friend {
    /// Create a settled friend (balance 0)
    pub fn new(id: FriendId, name: String, image: String) -> Self {
        Friend {
            id,
            name,
            image,
            balance: 0.0,
        }
    }

    pub fn with_balance(mut self, balance: f64) -> Self {
        self.balance = balance;
        self
    }

    pub fn status(&self) -> BalanceStatus {
        BalanceStatus::from_balance(self.balance)
    }

    /// Human wording for the balance, e.g. "You owe Clark 7 €"
    pub fn describe_balance(&self, currency: &str) -> String {
        let amount = format_amount(self.balance.abs());
        match self.status() {
            BalanceStatus::Owes => format!("You owe {} {} {}", self.name, amount, currency),
            BalanceStatus::Owed => format!("{} owes you {} {}", self.name, amount, currency),
            BalanceStatus::Even => format!("You and {} are even.", self.name),
        }
    }
}

/// Whole amounts print without decimals, anything else with two
pub fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn friend(name: &str, balance: f64) -> Friend {
        Friend::new(
            FriendId::from("118836"),
            name.to_string(),
            "https://i.pravatar.cc/48?u=118836".to_string(),
        )
        .with_balance(balance)
    }

    #[test]
    fn test_new_friend_is_settled() {
        let f = Friend::new(FriendId::from("1"), "Ana".to_string(), String::new());
        assert_eq!(f.balance, 0.0);
        assert_eq!(f.status(), BalanceStatus::Even);
    }

    #[test]
    fn test_balance_status_sign() {
        assert_eq!(BalanceStatus::from_balance(-7.0), BalanceStatus::Owes);
        assert_eq!(BalanceStatus::from_balance(20.0), BalanceStatus::Owed);
        assert_eq!(BalanceStatus::from_balance(0.0), BalanceStatus::Even);
    }

    #[test]
    fn test_describe_balance() {
        assert_eq!(friend("Clark", -7.0).describe_balance("€"), "You owe Clark 7 €");
        assert_eq!(friend("Sarah", 20.0).describe_balance("€"), "Sarah owes you 20 €");
        assert_eq!(
            friend("Anthony", 0.0).describe_balance("€"),
            "You and Anthony are even."
        );
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(7.0), "7");
        assert_eq!(format_amount(7.5), "7.50");
    }

    #[test]
    fn test_friend_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&FriendId::from("abc")).unwrap();
        assert_eq!(json, "\"abc\"");
    }
}
