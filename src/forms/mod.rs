// 📝 Forms - the two input surfaces of the app
//
// Each form owns its in-progress field values and produces a single
// committed change on submit.

pub mod add_friend;
pub mod split_bill;

pub use add_friend::AddFriendForm;
pub use split_bill::{parse_amount, Payer, SplitDraft};
