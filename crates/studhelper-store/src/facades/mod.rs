//! # Facades
//!
//! Thin adapters over the stores for presentation code. Each borrows the
//! [`AppContext`](crate::AppContext), exposes read views, and runs
//! client-side validation before delegating to a store action, so invalid
//! input never reaches the network.

mod auth;
mod classes;
mod file_upload;
mod ui;

pub use auth::AuthFacade;
pub use classes::ClassesFacade;
pub use file_upload::{FileUploadFacade, UploadOutcome, UploadState, UploadTarget};
pub use ui::UiFacade;

use studhelper_validation::Validation;

use crate::error::{StoreError, StoreResult};

/// Merges validation results into one error listing every message.
pub(crate) fn check_all(results: impl IntoIterator<Item = Validation>) -> StoreResult<()> {
    let errors: Vec<String> = results
        .into_iter()
        .flat_map(|v| v.errors().to_vec())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(StoreError::Validation(errors.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use studhelper_validation::{validate_email, validate_username};

    #[test]
    fn test_check_all_joins_in_order() {
        let err = check_all([validate_email("nope"), validate_username("ab")]).unwrap_err();
        assert_eq!(
            err.message(),
            "Please enter a valid email address; Username must be at least 3 characters long"
        );
    }

    #[test]
    fn test_check_all_passes_valid_input() {
        assert!(check_all([validate_email("ada@example.com")]).is_ok());
    }
}
