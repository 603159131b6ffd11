// Split Bill - Core Library
// Exposes all modules for use in the TUI, API server, and tests

pub mod app;
pub mod config;
pub mod error;
pub mod forms;
pub mod friend;
pub mod ids;
pub mod logging;
pub mod registry;
pub mod selection;

// Re-export commonly used types
pub use app::{AppSnapshot, FriendView, SplitApp, SplitView};
pub use config::{Config, FriendSeed, ServerConfig, CONFIG_ENV_VAR};
pub use error::{SplitError, SplitResult, ValidationError};
pub use forms::{parse_amount, AddFriendForm, Payer, SplitDraft};
pub use friend::{format_amount, BalanceStatus, Friend, FriendId};
pub use ids::{IdGenerator, SequentialIds, UuidIds};
pub use registry::FriendRegistry;
pub use selection::Selection;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
