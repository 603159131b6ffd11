// 🔑 Id generation for new friends
//
// Production uses random UUIDs (same as every entity id in this crate's
// lineage); tests use a deterministic counter.

use crate::friend::FriendId;

/// Source of fresh, collision-free friend ids
pub trait IdGenerator: Send {
    fn generate_id(&mut self) -> FriendId;
}

/// Random v4 UUIDs
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn generate_id(&mut self) -> FriendId {
        FriendId::new(uuid::Uuid::new_v4().to_string())
    }
}

/// `<prefix>1`, `<prefix>2`, ...
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: &str) -> Self {
        SequentialIds {
            prefix: prefix.to_string(),
            next: 1,
        }
    }
}

impl IdGenerator for SequentialIds {
    fn generate_id(&mut self) -> FriendId {
        let id = FriendId::new(format!("{}{}", self.prefix, self.next));
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_ids_are_distinct() {
        let mut ids = UuidIds;
        let a = ids.generate_id();
        let b = ids.generate_id();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
    }

    #[test]
    fn test_sequential_ids() {
        let mut ids = SequentialIds::new("f-");
        assert_eq!(ids.generate_id().as_str(), "f-1");
        assert_eq!(ids.generate_id().as_str(), "f-2");
    }
}
