//! Intents dispatched into the reducer and commands it emits back.

use serde::{Deserialize, Serialize};

use super::state::ConnectionDraft;
use crate::logging::Level;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tab {
    Overview,
    FieldMapping,
    VendorParams,
    Verification,
    History,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerifySubtab {
    Settings,
    Report,
    DiffLog,
}

/// Everything the rendering layer (or an internal timer) can ask the
/// controller to do. One intent maps to one reducer case.
#[derive(Debug, Clone)]
pub enum Intent {
    Login { username: String, password: String },
    SelectProject { id: String },
    CreateProject { name: String },
    ConfirmConnection { draft: ConnectionDraft },
    CancelConnection,
    ProcessingTick { generation: u64 },
    StopProcessing,
    EnterPortal,
    SwitchTab { tab: Tab },
    OpenFieldCreate,
    FieldDraftName { text: String },
    SaveField,
    OpenFieldEdit { name: String },
    CloseFieldPane,
    RunFieldTest,
    FieldTestDone { field: String, generation: u64 },
    OpenVerifyCreate,
    VerifyDraftTitle { text: String },
    VerifyDraftScenario { code: String },
    SaveVerify,
    SelectVerify { id: String },
    SwitchVerifyTab { subtab: VerifySubtab },
    CloseVerifyPane,
    OpenParamEdit { scenario: String, param: String },
    ParamDraftValue { text: String },
    SaveParamEdit,
    CloseParamEdit,
    SwitchProject,
    Logout,
}

impl Intent {
    /// Stable name for log correlation; payloads stay out of the log line.
    pub fn name(&self) -> &'static str {
        match self {
            Intent::Login { .. } => "login",
            Intent::SelectProject { .. } => "select_project",
            Intent::CreateProject { .. } => "create_project",
            Intent::ConfirmConnection { .. } => "confirm_connection",
            Intent::CancelConnection => "cancel_connection",
            Intent::ProcessingTick { .. } => "processing_tick",
            Intent::StopProcessing => "stop_processing",
            Intent::EnterPortal => "enter_portal",
            Intent::SwitchTab { .. } => "switch_tab",
            Intent::OpenFieldCreate => "open_field_create",
            Intent::FieldDraftName { .. } => "field_draft_name",
            Intent::SaveField => "save_field",
            Intent::OpenFieldEdit { .. } => "open_field_edit",
            Intent::CloseFieldPane => "close_field_pane",
            Intent::RunFieldTest => "run_field_test",
            Intent::FieldTestDone { .. } => "field_test_done",
            Intent::OpenVerifyCreate => "open_verify_create",
            Intent::VerifyDraftTitle { .. } => "verify_draft_title",
            Intent::VerifyDraftScenario { .. } => "verify_draft_scenario",
            Intent::SaveVerify => "save_verify",
            Intent::SelectVerify { .. } => "select_verify",
            Intent::SwitchVerifyTab { .. } => "switch_verify_tab",
            Intent::CloseVerifyPane => "close_verify_pane",
            Intent::OpenParamEdit { .. } => "open_param_edit",
            Intent::ParamDraftValue { .. } => "param_draft_value",
            Intent::SaveParamEdit => "save_param_edit",
            Intent::CloseParamEdit => "close_param_edit",
            Intent::SwitchProject => "switch_project",
            Intent::Logout => "logout",
        }
    }
}

/// Side effects the reducer asks the driver to perform. The reducer never
/// touches a clock or a timer itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start the repeating ETL progress timer for this generation.
    StartProcessingTimer { generation: u64 },
    /// Stop the progress timer. Safe to issue when none is running.
    CancelProcessingTimer,
    /// Schedule the one-shot simulated field test.
    ScheduleFieldTest { field: String, generation: u64 },
    /// Abort a pending field test, if any.
    CancelFieldTest,
    Log { level: Level, msg: String },
}
