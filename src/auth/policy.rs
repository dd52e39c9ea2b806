use tracing::warn;

use crate::accounts::repo_types::Account;
use crate::error::ApiError;

/// The sole authorization rule: an account may only act on itself.
/// Must run after identity resolution and before any sensitive read or
/// mutation.
pub fn ensure_owner(principal: &Account, target_id: i64) -> Result<(), ApiError> {
    if principal.id != target_id {
        warn!(
            principal_id = principal.id,
            target_id, "ownership check failed"
        );
        return Err(ApiError::Forbidden);
    }
    Ok(())
}
