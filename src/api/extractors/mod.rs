//! Request extractors.

mod current_user;
mod validated_json;

pub use current_user::{Admin, CurrentUser, Me, ScopeRequirement, UsersRead};
pub use validated_json::ValidatedJson;
