// ➕ Add-Friend Form
//
// Open/close flag plus two text fields. Submitting builds a settled Friend
// whose image is `image_template + id`.

use crate::error::{SplitError, SplitResult};
use crate::friend::{Friend, FriendId};
use crate::ids::IdGenerator;
use crate::registry::FriendRegistry;
use serde::Serialize;
use tracing::{info, warn};

/// Default avatar service; the friend id is appended as the seed
pub const DEFAULT_IMAGE_TEMPLATE: &str = "https://i.pravatar.cc/48?u=";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddFriendForm {
    pub open: bool,
    pub name: String,
    pub image_template: String,
}

impl AddFriendForm {
    pub fn new(image_template: &str) -> Self {
        AddFriendForm {
            open: false,
            name: String::new(),
            image_template: image_template.to_string(),
        }
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    pub fn set_image_template(&mut self, template: &str) {
        self.image_template = template.to_string();
    }

    /// Label for the button that opens/closes this form
    pub fn toggle_label(&self) -> &'static str {
        if self.open {
            "Close"
        } else {
            "Add Friend"
        }
    }

    /// Create the friend, close the form, reset the name.
    ///
    /// A closed form cannot be submitted. An empty (or whitespace-only) name
    /// is rejected and the form stays open with its fields intact. The image
    /// template is never reset.
    pub fn submit(
        &mut self,
        registry: &mut FriendRegistry,
        ids: &mut dyn IdGenerator,
    ) -> SplitResult<FriendId> {
        if !self.open {
            warn!("add friend rejected: form is closed");
            return Err(SplitError::FormClosed);
        }

        let name = self.name.trim();
        if name.is_empty() {
            warn!("add friend rejected: empty name");
            return Err(SplitError::validation("name", "Friend name is required"));
        }

        let id = ids.generate_id();
        let image = format!("{}{}", self.image_template, id);
        let friend = Friend::new(id.clone(), name.to_string(), image);

        info!(id = %id, name = %friend.name, "friend added");
        registry.add_friend(friend);

        self.open = false;
        self.name.clear();
        Ok(id)
    }
}

impl Default for AddFriendForm {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_TEMPLATE)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;

    fn open_form(name: &str) -> AddFriendForm {
        let mut form = AddFriendForm::default();
        form.toggle();
        form.set_name(name);
        form
    }

    #[test]
    fn test_submit_adds_settled_friend() {
        let mut registry = FriendRegistry::new();
        let mut ids = SequentialIds::new("id-");
        let mut form = open_form("Dana");

        let id = form.submit(&mut registry, &mut ids).unwrap();

        assert_eq!(id.as_str(), "id-1");
        let friend = registry.get(&id).unwrap();
        assert_eq!(friend.name, "Dana");
        assert_eq!(friend.balance, 0.0);
        assert_eq!(friend.image, "https://i.pravatar.cc/48?u=id-1");
    }

    #[test]
    fn test_submit_closes_and_resets_name_only() {
        let mut registry = FriendRegistry::new();
        let mut ids = SequentialIds::new("id-");
        let mut form = open_form("Dana");
        form.set_image_template("https://example.com/a?seed=");

        form.submit(&mut registry, &mut ids).unwrap();

        assert!(!form.open);
        assert_eq!(form.name, "");
        assert_eq!(form.image_template, "https://example.com/a?seed=");
        assert_eq!(registry.list()[0].image, "https://example.com/a?seed=id-1");
    }

    #[test]
    fn test_submit_empty_name_rejected() {
        let mut registry = FriendRegistry::new();
        let mut ids = SequentialIds::new("id-");
        let mut form = open_form("   ");

        let result = form.submit(&mut registry, &mut ids);

        assert!(matches!(result, Err(SplitError::Validation(ref e)) if e.field == "name"));
        assert!(registry.is_empty());
        assert!(form.open);
        assert_eq!(form.name, "   ");
    }

    #[test]
    fn test_submit_closed_form_rejected() {
        let mut registry = FriendRegistry::new();
        let mut ids = SequentialIds::new("id-");
        let mut form = AddFriendForm::default();
        form.set_name("Dana");

        let result = form.submit(&mut registry, &mut ids);

        assert_eq!(result, Err(SplitError::FormClosed));
        assert!(registry.is_empty());
        assert_eq!(form.name, "Dana");
    }

    #[test]
    fn test_submit_trims_name() {
        let mut registry = FriendRegistry::new();
        let mut ids = SequentialIds::new("id-");
        let mut form = open_form("  Dana ");

        form.submit(&mut registry, &mut ids).unwrap();

        assert_eq!(registry.list()[0].name, "Dana");
    }

    #[test]
    fn test_toggle_label() {
        let mut form = AddFriendForm::default();
        assert_eq!(form.toggle_label(), "Add Friend");
        form.toggle();
        assert_eq!(form.toggle_label(), "Close");
        form.close();
        assert!(!form.open);
    }
}
