//! Validation guards evaluated before a save/confirm intent is allowed to
//! commit. A tripped guard surfaces on the active form and never changes
//! the stage.

use serde::{Deserialize, Serialize};

use super::state::{ConnectionDraft, FieldDraft, VerifyDraft};
use crate::config::FieldNameMatch;
use crate::store::{FieldStore, Timestamp, VendorParamStore};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValidationError {
    EmptyCredentials,
    EmptyProjectName,
    EmptyFolderPath,
    InvalidDateRange { from: Timestamp, to: Timestamp },
    EmptyFieldName,
    DuplicateFieldName { name: String },
    EmptyVerifyTitle,
    MissingScenario,
    UnknownScenario { code: String },
    ParamSave { msg: String },
}

impl ValidationError {
    /// Field-level message for the renderer.
    pub fn message(&self) -> String {
        match self {
            ValidationError::EmptyCredentials => "username and password are required".to_string(),
            ValidationError::EmptyProjectName => "project name must not be empty".to_string(),
            ValidationError::EmptyFolderPath => "folder path is required".to_string(),
            ValidationError::InvalidDateRange { .. } => {
                "date range end precedes its start".to_string()
            }
            ValidationError::EmptyFieldName => "field name must not be empty".to_string(),
            ValidationError::DuplicateFieldName { name } => {
                format!("a field named {} already exists", name)
            }
            ValidationError::EmptyVerifyTitle => "verification title is required".to_string(),
            ValidationError::MissingScenario => "pick a scenario to verify".to_string(),
            ValidationError::UnknownScenario { code } => format!("unknown scenario {}", code),
            ValidationError::ParamSave { msg } => msg.clone(),
        }
    }
}

pub fn check_login(username: &str, password: &str) -> Option<ValidationError> {
    if username.trim().is_empty() || password.is_empty() {
        return Some(ValidationError::EmptyCredentials);
    }
    None
}

pub fn check_project_name(name: &str) -> Option<ValidationError> {
    if name.trim().is_empty() {
        return Some(ValidationError::EmptyProjectName);
    }
    None
}

pub fn check_connection(draft: &ConnectionDraft) -> Option<ValidationError> {
    if draft.folder_path.trim().is_empty() {
        return Some(ValidationError::EmptyFolderPath);
    }
    if draft.date_to < draft.date_from {
        return Some(ValidationError::InvalidDateRange {
            from: draft.date_from,
            to: draft.date_to,
        });
    }
    None
}

/// The pure duplicate predicate behind the name input. Empty candidates are
/// not duplicates; they are rejected by the emptiness check instead.
pub fn is_duplicate_field_name(
    candidate: &str,
    fields: &dyn FieldStore,
    mode: FieldNameMatch,
) -> bool {
    !candidate.is_empty() && fields.contains(candidate, mode)
}

pub fn check_field_draft(
    draft: &FieldDraft,
    fields: &dyn FieldStore,
    mode: FieldNameMatch,
) -> Option<ValidationError> {
    if draft.name.trim().is_empty() {
        return Some(ValidationError::EmptyFieldName);
    }
    if is_duplicate_field_name(&draft.name, fields, mode) {
        return Some(ValidationError::DuplicateFieldName {
            name: draft.name.clone(),
        });
    }
    None
}

pub fn check_verify_draft(
    draft: &VerifyDraft,
    vendor: &dyn VendorParamStore,
) -> Option<ValidationError> {
    if draft.title.trim().is_empty() {
        return Some(ValidationError::EmptyVerifyTitle);
    }
    match &draft.scenario_code {
        None => Some(ValidationError::MissingScenario),
        Some(code) if vendor.scenario(code).is_none() => {
            Some(ValidationError::UnknownScenario { code: code.clone() })
        }
        Some(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{DataType, MappingStatus, MemoryFieldStore, StandardField};

    fn store_with(names: &[&str]) -> MemoryFieldStore {
        MemoryFieldStore::new(
            names
                .iter()
                .map(|n| StandardField {
                    name: n.to_string(),
                    data_type: DataType::String,
                    description: String::new(),
                    source_column: None,
                    mapping_status: MappingStatus::Failed,
                })
                .collect(),
        )
    }

    #[test]
    fn login_requires_both_credentials() {
        assert!(check_login("", "pw").is_some());
        assert!(check_login("user", "").is_some());
        assert!(check_login("  ", "pw").is_some());
        assert!(check_login("a", "b").is_none());
    }

    #[test]
    fn duplicate_predicate_is_exact_by_default() {
        let store = store_with(&["acct_id"]);
        assert!(is_duplicate_field_name(
            "acct_id",
            &store,
            FieldNameMatch::Exact
        ));
        assert!(!is_duplicate_field_name(
            "ACCT_ID",
            &store,
            FieldNameMatch::Exact
        ));
        assert!(!is_duplicate_field_name("", &store, FieldNameMatch::Exact));
    }

    #[test]
    fn field_draft_checks_empty_before_duplicate() {
        let store = store_with(&["acct_id"]);
        let mut draft = FieldDraft::default();
        assert_eq!(
            check_field_draft(&draft, &store, FieldNameMatch::Exact),
            Some(ValidationError::EmptyFieldName)
        );
        draft.name = "acct_id".to_string();
        let err = check_field_draft(&draft, &store, FieldNameMatch::Exact).expect("duplicate");
        assert_eq!(
            err,
            ValidationError::DuplicateFieldName {
                name: "acct_id".to_string()
            }
        );
        assert!(err.message().contains("acct_id"));
        draft.name = "settle_date".to_string();
        assert_eq!(check_field_draft(&draft, &store, FieldNameMatch::Exact), None);
    }

    #[test]
    fn connection_guard_checks_path_and_range() {
        let mut draft = ConnectionDraft::default();
        assert_eq!(
            check_connection(&draft),
            Some(ValidationError::EmptyFolderPath)
        );
        draft.folder_path = "/data".to_string();
        draft.date_from = 10;
        draft.date_to = 5;
        assert!(matches!(
            check_connection(&draft),
            Some(ValidationError::InvalidDateRange { .. })
        ));
        draft.date_to = 20;
        assert_eq!(check_connection(&draft), None);
    }
}
