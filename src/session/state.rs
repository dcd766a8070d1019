//! Session state with deterministic hashing.
//!
//! Stage-local data lives inside the stage variant that owns it, so entering
//! a stage rebuilds its transient state from scratch and nothing stale can
//! leak across a stage boundary.

use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use super::events::{Tab, VerifySubtab};
use super::guards::ValidationError;
use super::lifecycle::StageKind;
use crate::store::{
    DataType, DbType, OverviewStats, PipelineStep, Project, StandardField, Stores, Timestamp,
    TrendPoint, VendorScenario, VerificationJob,
};

/// The simulated ETL run finishes when the step counter reaches this value.
pub const PROCESSING_TERMINAL_STEP: u8 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionDraft {
    pub db_type: DbType,
    pub folder_path: String,
    pub date_from: Timestamp,
    pub date_to: Timestamp,
}

impl ConnectionDraft {
    /// Prefill from the selected project, the way the connection form does.
    pub fn for_project(project: &Project) -> Self {
        Self {
            db_type: project.db_type,
            folder_path: project.path.clone(),
            date_from: project.date_from,
            date_to: project.date_to,
        }
    }
}

impl Default for ConnectionDraft {
    fn default() -> Self {
        Self {
            db_type: DbType::Sas,
            folder_path: String::new(),
            date_from: 0,
            date_to: 0,
        }
    }
}

// =============================================================================
// Portal drill-down state
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldDraft {
    pub name: String,
    pub data_type: DataType,
    pub description: String,
    /// Re-evaluated on every keystroke of the name input; gates save.
    pub duplicate: bool,
}

impl Default for FieldDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            data_type: DataType::String,
            description: String::new(),
            duplicate: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TestRunState {
    Idle,
    Running { generation: u64 },
    Succeeded { preview: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldEditSession {
    pub field: String,
    pub script: String,
    pub test: TestRunState,
}

impl FieldEditSession {
    pub fn for_field(field: &StandardField) -> Self {
        let script = match &field.source_column {
            Some(src) => format!("SELECT {} FROM STANDARD_TRANSACTION", src),
            None => format!(
                "-- transformation for {}\nCASE\n  WHEN channel_id = 'ATM' THEN 'ATM'\n  ELSE 'Branch'\nEND",
                field.name
            ),
        };
        Self {
            field: field.name.clone(),
            script,
            test: TestRunState::Idle,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldPane {
    List,
    Create(FieldDraft),
    Edit(FieldEditSession),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VerifyDraft {
    pub title: String,
    pub scenario_code: Option<String>,
    pub description: String,
    pub date_from: Timestamp,
    pub date_to: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerifyPane {
    List,
    Create(VerifyDraft),
    Detail { job_id: String, subtab: VerifySubtab },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParamDraft {
    pub scenario: String,
    pub param: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamPane {
    List,
    Edit(ParamDraft),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortalState {
    pub tab: Tab,
    pub fields: FieldPane,
    pub verify: VerifyPane,
    pub params: ParamPane,
}

impl Default for PortalState {
    fn default() -> Self {
        Self {
            tab: Tab::Overview,
            fields: FieldPane::List,
            verify: VerifyPane::List,
            params: ParamPane::List,
        }
    }
}

// =============================================================================
// Stage and session state
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Login,
    ProjectList,
    Connect { draft: ConnectionDraft },
    Processing { step: u8, generation: u64 },
    Portal(PortalState),
}

impl Stage {
    pub fn kind(&self) -> StageKind {
        match self {
            Stage::Login => StageKind::Login,
            Stage::ProjectList => StageKind::ProjectList,
            Stage::Connect { .. } => StageKind::Connect,
            Stage::Processing { .. } => StageKind::Processing,
            Stage::Portal(_) => StageKind::Portal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionState {
    pub stage: Stage,
    pub authenticated: bool,
    pub username: Option<String>,
    /// Id of the project the session is working in, once selected.
    pub current_project: Option<String>,
    /// Last rejected input, surfaced field-level by the renderer.
    pub last_validation: Option<ValidationError>,
    /// Logical time, set by the driver before each dispatch.
    pub now: Timestamp,
    /// Intent counter, for determinism and log correlation.
    pub seq: u64,
    /// Generations fence off ticks from cancelled timers.
    pub timer_generation: u64,
    pub test_generation: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            stage: Stage::Login,
            authenticated: false,
            username: None,
            current_project: None,
            last_validation: None,
            now: 0,
            seq: 0,
            timer_generation: 0,
            test_generation: 0,
        }
    }

    /// Deterministic state hash for replay validation.
    pub fn state_hash(&self) -> u64 {
        let mut h = DefaultHasher::new();
        Hash::hash(self, &mut h);
        h.finish()
    }

    /// Portal drill-down state, when the session is in the portal.
    pub fn portal(&self) -> Option<&PortalState> {
        match &self.stage {
            Stage::Portal(p) => Some(p),
            _ => None,
        }
    }

    pub fn portal_mut(&mut self) -> Option<&mut PortalState> {
        match &mut self.stage {
            Stage::Portal(p) => Some(p),
            _ => None,
        }
    }

    /// Read-only view of the whole session for a stateless renderer.
    pub fn snapshot(&self, stores: &Stores) -> Snapshot {
        Snapshot {
            stage: self.stage.clone(),
            authenticated: self.authenticated,
            username: self.username.clone(),
            current_project: self
                .current_project
                .as_deref()
                .and_then(|id| stores.projects.get(id))
                .cloned(),
            last_validation: self.last_validation.clone(),
            projects: stores.projects.list().to_vec(),
            fields: stores.fields.list().to_vec(),
            scenarios: stores.vendor.scenarios().to_vec(),
            jobs: stores.jobs.list().to_vec(),
            pipeline: stores.overview.pipeline().to_vec(),
            stats: stores.overview.stats(),
            trend: stores.overview.trend().to_vec(),
            state_hash: self.state_hash(),
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything a stateless renderer needs to draw one frame.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub stage: Stage,
    pub authenticated: bool,
    pub username: Option<String>,
    pub current_project: Option<Project>,
    pub last_validation: Option<ValidationError>,
    pub projects: Vec<Project>,
    pub fields: Vec<StandardField>,
    pub scenarios: Vec<VendorScenario>,
    pub jobs: Vec<VerificationJob>,
    pub pipeline: Vec<PipelineStep>,
    pub stats: OverviewStats,
    pub trend: Vec<TrendPoint>,
    pub state_hash: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_session_starts_at_login() {
        let state = SessionState::new();
        assert_eq!(state.stage.kind(), StageKind::Login);
        assert!(!state.authenticated);
        assert!(state.portal().is_none());
    }

    #[test]
    fn state_hash_tracks_stage_changes() {
        let mut state = SessionState::new();
        let before = state.state_hash();
        state.stage = Stage::ProjectList;
        assert_ne!(before, state.state_hash());
    }

    #[test]
    fn state_hash_is_stable_for_identical_states() {
        let a = SessionState::new();
        let b = SessionState::new();
        assert_eq!(a.state_hash(), b.state_hash());
    }

    #[test]
    fn edit_session_script_follows_source_column() {
        let mapped = StandardField {
            name: "txn_time".to_string(),
            data_type: DataType::Timestamp,
            description: String::new(),
            source_column: Some("TXN_DT_TIME".to_string()),
            mapping_status: crate::store::MappingStatus::Mapped,
        };
        let sess = FieldEditSession::for_field(&mapped);
        assert!(sess.script.contains("TXN_DT_TIME"));

        let unmapped = StandardField {
            source_column: None,
            ..mapped
        };
        let sess = FieldEditSession::for_field(&unmapped);
        assert!(sess.script.contains("CASE"));
    }

    #[test]
    fn snapshot_serializes() {
        let stores = crate::seed::seeded_stores();
        let state = SessionState::new();
        let snap = state.snapshot(&stores);
        let json = serde_json::to_value(&snap).expect("snapshot JSON");
        assert_eq!(json["stage"], "Login");
        assert_eq!(json["projects"].as_array().map(|a| a.len()), Some(2));
        assert!(json["state_hash"].is_u64());
    }
}
