// 📒 Friend Registry - append-only list of friends and their balances
//
// Insertion order is display order. Entries are never removed or reordered;
// the only mutation after insert is a balance delta.

use crate::error::{SplitError, SplitResult};
use crate::friend::{Friend, FriendId};
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct FriendRegistry {
    friends: Vec<Friend>,
}

impl FriendRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        FriendRegistry { friends: Vec::new() }
    }

    /// Create a registry pre-populated in the given order
    pub fn with_friends(friends: Vec<Friend>) -> Self {
        FriendRegistry { friends }
    }

    /// Append a friend. Id uniqueness is the id generator's job, not checked here.
    pub fn add_friend(&mut self, friend: Friend) {
        debug!(id = %friend.id, name = %friend.name, "registry: friend appended");
        self.friends.push(friend);
    }

    /// `balance += delta` for the matching friend; every other entry untouched
    pub fn apply_balance_delta(&mut self, id: &FriendId, delta: f64) -> SplitResult<f64> {
        let friend = self
            .friends
            .iter_mut()
            .find(|f| &f.id == id)
            .ok_or_else(|| SplitError::NotFound(id.clone()))?;

        friend.balance += delta;
        debug!(id = %id, delta, balance = friend.balance, "registry: balance updated");
        Ok(friend.balance)
    }

    /// Current friends in insertion order
    pub fn list(&self) -> &[Friend] {
        &self.friends
    }

    pub fn get(&self, id: &FriendId) -> Option<&Friend> {
        self.friends.iter().find(|f| &f.id == id)
    }

    pub fn contains(&self, id: &FriendId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.friends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.friends.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn friend(id: &str, name: &str, balance: f64) -> Friend {
        Friend::new(FriendId::from(id), name.to_string(), format!("img/{}", id))
            .with_balance(balance)
    }

    #[test]
    fn test_add_friend_appends_in_order() {
        let mut registry = FriendRegistry::with_friends(vec![friend("1", "Clark", -7.0)]);
        registry.add_friend(friend("2", "A", 0.0));
        registry.add_friend(friend("3", "B", 0.0));

        let names: Vec<&str> = registry.list().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Clark", "A", "B"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_apply_balance_delta_only_touches_target() {
        let mut registry = FriendRegistry::with_friends(vec![
            friend("1", "Clark", -7.0),
            friend("2", "Sarah", 20.0),
        ]);

        let balance = registry.apply_balance_delta(&FriendId::from("1"), 8.0).unwrap();

        assert_eq!(balance, 1.0);
        assert_eq!(registry.get(&FriendId::from("1")).unwrap().balance, 1.0);
        assert_eq!(registry.get(&FriendId::from("2")).unwrap().balance, 20.0);
    }

    #[test]
    fn test_apply_balance_delta_unknown_id() {
        let mut registry = FriendRegistry::with_friends(vec![friend("1", "Clark", -7.0)]);

        let result = registry.apply_balance_delta(&FriendId::from("nope"), 5.0);

        assert_eq!(result, Err(SplitError::NotFound(FriendId::from("nope"))));
        assert_eq!(registry.list()[0].balance, -7.0);
    }

    #[test]
    fn test_empty_registry() {
        let registry = FriendRegistry::new();
        assert!(registry.is_empty());
        assert!(!registry.contains(&FriendId::from("1")));
    }
}
