// 🧭 SplitApp - owns registry, selection, forms; the only entry point for views
//
// Views call one operation per user event, then re-render from `snapshot()`
// or the read accessors. Each operation either completes or returns an
// error with nothing changed.

use crate::config::Config;
use crate::error::{SplitError, SplitResult};
use crate::forms::{AddFriendForm, Payer, SplitDraft};
use crate::friend::{Friend, FriendId};
use crate::ids::{IdGenerator, UuidIds};
use crate::registry::FriendRegistry;
use crate::selection::Selection;
use serde::Serialize;
use tracing::{debug, error, info};

// ============================================================================
// SNAPSHOT
// ============================================================================

/// Everything a view needs to draw one frame
#[derive(Debug, Clone, Serialize)]
pub struct AppSnapshot {
    pub friends: Vec<FriendView>,
    pub selection: Selection,
    pub add_friend_form: AddFriendForm,
    pub split: Option<SplitView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FriendView {
    #[serde(flatten)]
    pub friend: Friend,
    pub balance_text: String,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SplitView {
    pub friend_id: FriendId,
    pub friend_name: String,
    #[serde(flatten)]
    pub draft: SplitDraft,
    pub friend_expense: f64,
}

// ============================================================================
// APP
// ============================================================================

pub struct SplitApp {
    registry: FriendRegistry,
    selection: Selection,
    add_form: AddFriendForm,
    draft: SplitDraft,
    ids: Box<dyn IdGenerator>,
    currency: String,
}

impl SplitApp {
    /// Build from config with random UUID ids
    pub fn from_config(config: &Config) -> Self {
        Self::with_ids(config, Box::new(UuidIds))
    }

    pub fn with_ids(config: &Config, ids: Box<dyn IdGenerator>) -> Self {
        SplitApp {
            registry: FriendRegistry::with_friends(config.seed_friends()),
            selection: Selection::None,
            add_form: AddFriendForm::new(&config.image_template),
            draft: SplitDraft::new(),
            ids,
            currency: config.currency.clone(),
        }
    }

    // ------------------------------------------------------------------------
    // Read side
    // ------------------------------------------------------------------------

    pub fn friends(&self) -> &[Friend] {
        self.registry.list()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_selected(&self, id: &FriendId) -> bool {
        self.selection.is_selected(id)
    }

    /// The selected friend, if any
    pub fn selected_friend(&self) -> Option<&Friend> {
        self.selection.selected().and_then(|id| self.registry.get(id))
    }

    pub fn add_form(&self) -> &AddFriendForm {
        &self.add_form
    }

    /// Draft only exists while a friend is selected
    pub fn draft(&self) -> Option<&SplitDraft> {
        self.selection.selected().map(|_| &self.draft)
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn snapshot(&self) -> AppSnapshot {
        let friends = self
            .registry
            .list()
            .iter()
            .map(|f| FriendView {
                balance_text: f.describe_balance(&self.currency),
                selected: self.selection.is_selected(&f.id),
                friend: f.clone(),
            })
            .collect();

        let split = self.selected_friend().map(|f| SplitView {
            friend_id: f.id.clone(),
            friend_name: f.name.clone(),
            draft: self.draft,
            friend_expense: self.draft.friend_expense(),
        });

        AppSnapshot {
            friends,
            selection: self.selection.clone(),
            add_friend_form: self.add_form.clone(),
            split,
        }
    }

    // ------------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------------

    /// Select / deselect / switch. Closes the add-friend form and drops the draft.
    pub fn toggle_select(&mut self, id: &FriendId) -> SplitResult<&Selection> {
        if !self.registry.contains(id) {
            return Err(SplitError::NotFound(id.clone()));
        }

        self.selection.toggle(id);
        self.add_form.close();
        self.draft = SplitDraft::new();
        debug!(selection = ?self.selection, "selection changed");
        Ok(&self.selection)
    }

    // ------------------------------------------------------------------------
    // Add-friend form
    // ------------------------------------------------------------------------

    /// Open/close the form. Opening clears the selection.
    pub fn toggle_add_form(&mut self) {
        self.add_form.toggle();
        if self.add_form.open && !self.selection.is_none() {
            self.selection.clear();
            self.draft = SplitDraft::new();
        }
        debug!(open = self.add_form.open, "add friend form toggled");
    }

    pub fn set_friend_name(&mut self, name: &str) {
        self.add_form.set_name(name);
    }

    pub fn set_image_template(&mut self, template: &str) {
        self.add_form.set_image_template(template);
    }

    pub fn submit_new_friend(&mut self) -> SplitResult<FriendId> {
        self.add_form.submit(&mut self.registry, self.ids.as_mut())
    }

    /// Fill the form fields and submit in one step.
    ///
    /// On rejection the form is restored to what it held before the call.
    pub fn add_friend(&mut self, name: &str, image_template: Option<&str>) -> SplitResult<FriendId> {
        let previous = self.add_form.clone();

        self.add_form.set_name(name);
        if let Some(template) = image_template {
            self.add_form.set_image_template(template);
        }

        match self.submit_new_friend() {
            Ok(id) => Ok(id),
            Err(err) => {
                self.add_form = previous;
                Err(err)
            }
        }
    }

    // ------------------------------------------------------------------------
    // Bill split
    // ------------------------------------------------------------------------

    fn draft_mut(&mut self) -> SplitResult<&mut SplitDraft> {
        if self.selection.is_none() {
            return Err(SplitError::NoSelection);
        }
        Ok(&mut self.draft)
    }

    pub fn set_bill_total(&mut self, raw: &str) -> SplitResult<()> {
        self.draft_mut()?.set_bill_total(raw)
    }

    /// `Ok(false)` when the value exceeded the bill and the old one was kept
    pub fn set_payer_expense(&mut self, raw: &str) -> SplitResult<bool> {
        self.draft_mut()?.set_payer_expense(raw)
    }

    pub fn set_payer(&mut self, payer: Payer) -> SplitResult<()> {
        self.draft_mut()?.set_payer(payer);
        Ok(())
    }

    /// Apply the draft to the selected friend, then clear selection and draft.
    ///
    /// Returns the friend's new balance.
    pub fn submit_split(&mut self) -> SplitResult<f64> {
        let id = self
            .selection
            .selected()
            .cloned()
            .ok_or(SplitError::NoSelection)?;

        let delta = self.draft.settlement_delta()?;

        let balance = match self.registry.apply_balance_delta(&id, delta) {
            Ok(balance) => balance,
            Err(err) => {
                error!(friend = %id, "selection points at a friend missing from the registry");
                return Err(err);
            }
        };

        info!(friend = %id, delta, balance, payer = ?self.draft.payer, "bill split applied");
        self.selection.clear();
        self.draft = SplitDraft::new();
        Ok(balance)
    }
}

// ============================================================================
// TESTS
// ============================================================================
