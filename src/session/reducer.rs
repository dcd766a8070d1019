//! Pure reducer: (SessionState, Intent) -> (SessionState, Vec<Command>)
//!
//! All state transitions happen here. The reducer never touches a clock or
//! a timer; anything with a lifetime outside the current dispatch is
//! expressed as a [`Command`] for the driver to execute. Undefined
//! `(stage, intent)` combinations are no-ops, logged at debug level.

use super::events::{Command, Intent, Tab, VerifySubtab};
use super::guards::{self, ValidationError};
use super::lifecycle::{next_stage, StageEvent};
use super::state::{
    ConnectionDraft, FieldDraft, FieldEditSession, FieldPane, ParamDraft, ParamPane, PortalState,
    SessionState, Stage, TestRunState, VerifyDraft, VerifyPane, PROCESSING_TERMINAL_STEP,
};
use crate::config::Config;
use crate::logging::Level;
use crate::store::{DbType, MappingStatus, Project, ProjectStatus, StandardField, Stores};

/// Fixed payload of the always-successful simulated test run.
const TEST_PREVIEW: &str = "[Success] 10,000 rows processed. Sample: \"2025-11-19 14:30:25\"";

/// Result of processing one intent.
#[derive(Debug)]
pub struct ReducerOutput {
    pub commands: Vec<Command>,
    pub state_hash: u64,
}

fn info(msg: String) -> Command {
    Command::Log {
        level: Level::Info,
        msg,
    }
}

fn ignored(commands: &mut Vec<Command>, intent: &str, why: &str) {
    commands.push(Command::Log {
        level: Level::Debug,
        msg: format!("{} ignored: {}", intent, why),
    });
}

/// Cancel a pending field test when its owning sub-state is torn down.
fn cancel_pending_test(stage: &Stage, commands: &mut Vec<Command>) {
    if let Stage::Portal(PortalState {
        fields: FieldPane::Edit(sess),
        ..
    }) = stage
    {
        if matches!(sess.test, TestRunState::Running { .. }) {
            commands.push(Command::CancelFieldTest);
        }
    }
}

fn collapse_panes(portal: &mut PortalState, commands: &mut Vec<Command>) {
    if let FieldPane::Edit(sess) = &portal.fields {
        if matches!(sess.test, TestRunState::Running { .. }) {
            commands.push(Command::CancelFieldTest);
        }
    }
    portal.fields = FieldPane::List;
    portal.verify = VerifyPane::List;
    portal.params = ParamPane::List;
}

/// Pure reducer function.
pub fn reduce(
    state: &mut SessionState,
    stores: &mut Stores,
    intent: Intent,
    cfg: &Config,
) -> ReducerOutput {
    let mut commands = Vec::new();
    state.seq += 1;
    state.last_validation = None;
    let kind = state.stage.kind();

    match intent {
        // === Stage transitions ===
        Intent::Login { username, password } => {
            match next_stage(kind, StageEvent::LoginSubmitted) {
                Err(e) => ignored(&mut commands, "login", &e.msg),
                Ok(_) => match guards::check_login(&username, &password) {
                    Some(err) => state.last_validation = Some(err),
                    None => {
                        state.authenticated = true;
                        state.username = Some(username.clone());
                        state.stage = Stage::ProjectList;
                        commands.push(info(format!("session opened for {}", username)));
                    }
                },
            }
        }

        Intent::SelectProject { id } => match next_stage(kind, StageEvent::ProjectSelected) {
            Err(e) => ignored(&mut commands, "select_project", &e.msg),
            Ok(_) => match stores.projects.get(&id) {
                None => ignored(&mut commands, "select_project", "unknown project id"),
                Some(project) => {
                    let draft = ConnectionDraft::for_project(project);
                    let name = project.name.clone();
                    state.current_project = Some(id);
                    state.stage = Stage::Connect { draft };
                    commands.push(info(format!("project selected: {}", name)));
                }
            },
        },

        Intent::CreateProject { name } => match next_stage(kind, StageEvent::ProjectCreated) {
            Err(e) => ignored(&mut commands, "create_project", &e.msg),
            Ok(_) => match guards::check_project_name(&name) {
                Some(err) => state.last_validation = Some(err),
                None => {
                    let id = format!("P-{}-{}", state.now, state.seq);
                    stores.projects.insert(Project {
                        id: id.clone(),
                        name: name.trim().to_string(),
                        path: String::new(),
                        db_type: DbType::Sas,
                        date_from: 0,
                        date_to: 0,
                        created_at: state.now,
                        last_edited_at: state.now,
                        status: ProjectStatus::Active,
                    });
                    commands.push(info(format!("project created: {}", id)));
                }
            },
        },

        Intent::ConfirmConnection { draft } => {
            match next_stage(kind, StageEvent::ConnectionConfirmed) {
                Err(e) => ignored(&mut commands, "confirm_connection", &e.msg),
                Ok(_) => match guards::check_connection(&draft) {
                    Some(err) => state.last_validation = Some(err),
                    None => {
                        state.timer_generation += 1;
                        let generation = state.timer_generation;
                        state.stage = Stage::Processing {
                            step: 0,
                            generation,
                        };
                        commands.push(Command::StartProcessingTimer { generation });
                        commands.push(info("simulated ETL run started".to_string()));
                    }
                },
            }
        }

        Intent::CancelConnection => match next_stage(kind, StageEvent::ConnectCancelled) {
            Err(e) => ignored(&mut commands, "cancel_connection", &e.msg),
            Ok(_) => {
                state.current_project = None;
                state.stage = Stage::ProjectList;
                commands.push(info("connection cancelled".to_string()));
            }
        },

        Intent::ProcessingTick { generation } => match &mut state.stage {
            Stage::Processing {
                step,
                generation: g,
            } if *g == generation => {
                if *step < PROCESSING_TERMINAL_STEP {
                    *step += 1;
                    let step = *step;
                    commands.push(Command::Log {
                        level: Level::Debug,
                        msg: format!("processing step {}/{}", step, PROCESSING_TERMINAL_STEP),
                    });
                    if step == PROCESSING_TERMINAL_STEP {
                        commands.push(Command::CancelProcessingTimer);
                        commands.push(info("simulated ETL run complete".to_string()));
                    }
                } else {
                    // Terminal state is idempotent: a late tick only re-requests
                    // cancellation, it never increments.
                    commands.push(Command::CancelProcessingTimer);
                }
            }
            _ => ignored(&mut commands, "processing_tick", "stale or out-of-stage tick"),
        },

        Intent::StopProcessing => match next_stage(kind, StageEvent::ProcessingStopped) {
            Err(e) => ignored(&mut commands, "stop_processing", &e.msg),
            Ok(_) => {
                commands.push(Command::CancelProcessingTimer);
                let draft = state
                    .current_project
                    .as_deref()
                    .and_then(|id| stores.projects.get(id))
                    .map(ConnectionDraft::for_project)
                    .unwrap_or_default();
                state.stage = Stage::Connect { draft };
                commands.push(info("processing stopped".to_string()));
            }
        },

        Intent::EnterPortal => match next_stage(kind, StageEvent::PortalEntered) {
            Err(e) => ignored(&mut commands, "enter_portal", &e.msg),
            Ok(_) => {
                let ready = matches!(
                    &state.stage,
                    Stage::Processing { step, .. } if *step >= PROCESSING_TERMINAL_STEP
                );
                if ready {
                    state.stage = Stage::Portal(PortalState::default());
                    commands.push(Command::CancelProcessingTimer);
                    commands.push(info("entered portal".to_string()));
                } else {
                    ignored(&mut commands, "enter_portal", "processing incomplete");
                }
            }
        },

        Intent::SwitchProject => match next_stage(kind, StageEvent::ProjectSwitched) {
            Err(e) => ignored(&mut commands, "switch_project", &e.msg),
            Ok(_) => {
                cancel_pending_test(&state.stage, &mut commands);
                state.current_project = None;
                state.stage = Stage::ProjectList;
                commands.push(info("returned to project list".to_string()));
            }
        },

        Intent::Logout => match next_stage(kind, StageEvent::LoggedOut) {
            Err(e) => ignored(&mut commands, "logout", &e.msg),
            Ok(_) => {
                cancel_pending_test(&state.stage, &mut commands);
                state.authenticated = false;
                state.username = None;
                state.current_project = None;
                state.stage = Stage::Login;
                commands.push(info("session closed".to_string()));
            }
        },

        // === Portal tabs ===
        Intent::SwitchTab { tab } => match state.portal_mut() {
            None => ignored(&mut commands, "switch_tab", "not in portal"),
            Some(portal) => {
                collapse_panes(portal, &mut commands);
                portal.tab = tab;
            }
        },

        // === Field mapping pane ===
        Intent::OpenFieldCreate => match state.portal_mut() {
            Some(portal) if portal.tab == Tab::FieldMapping && portal.fields == FieldPane::List => {
                portal.fields = FieldPane::Create(FieldDraft::default());
            }
            _ => ignored(&mut commands, "open_field_create", "field list not active"),
        },

        Intent::FieldDraftName { text } => {
            let duplicate =
                guards::is_duplicate_field_name(&text, stores.fields.as_ref(), cfg.field_name_match);
            match state.portal_mut().map(|p| &mut p.fields) {
                Some(FieldPane::Create(draft)) => {
                    draft.duplicate = duplicate;
                    draft.name = text;
                }
                _ => ignored(&mut commands, "field_draft_name", "no field draft"),
            }
        }

        Intent::SaveField => {
            let draft = match state.portal() {
                Some(PortalState {
                    fields: FieldPane::Create(d),
                    ..
                }) => Some(d.clone()),
                _ => None,
            };
            match draft {
                None => ignored(&mut commands, "save_field", "no field draft"),
                Some(draft) => match guards::check_field_draft(
                    &draft,
                    stores.fields.as_ref(),
                    cfg.field_name_match,
                ) {
                    Some(err) => state.last_validation = Some(err),
                    None => {
                        stores.fields.insert(StandardField {
                            name: draft.name.clone(),
                            data_type: draft.data_type,
                            description: draft.description.clone(),
                            source_column: None,
                            mapping_status: MappingStatus::Failed,
                        });
                        if let Some(portal) = state.portal_mut() {
                            portal.fields = FieldPane::List;
                        }
                        commands.push(info(format!("field added: {}", draft.name)));
                    }
                },
            }
        }

        Intent::OpenFieldEdit { name } => {
            let sess = stores.fields.get(&name).map(FieldEditSession::for_field);
            match (state.portal_mut(), sess) {
                (Some(portal), Some(sess))
                    if portal.tab == Tab::FieldMapping && portal.fields == FieldPane::List =>
                {
                    portal.fields = FieldPane::Edit(sess);
                }
                _ => ignored(&mut commands, "open_field_edit", "unknown field or pane busy"),
            }
        }

        Intent::CloseFieldPane => match &mut state.stage {
            Stage::Portal(portal) if portal.fields != FieldPane::List => {
                if let FieldPane::Edit(sess) = &portal.fields {
                    if matches!(sess.test, TestRunState::Running { .. }) {
                        commands.push(Command::CancelFieldTest);
                    }
                }
                portal.fields = FieldPane::List;
            }
            _ => ignored(&mut commands, "close_field_pane", "no open field pane"),
        },

        Intent::RunFieldTest => match &mut state.stage {
            Stage::Portal(PortalState {
                fields: FieldPane::Edit(sess),
                ..
            }) if !matches!(sess.test, TestRunState::Running { .. }) => {
                state.test_generation += 1;
                let generation = state.test_generation;
                sess.test = TestRunState::Running { generation };
                commands.push(Command::ScheduleFieldTest {
                    field: sess.field.clone(),
                    generation,
                });
            }
            _ => ignored(&mut commands, "run_field_test", "no idle edit session"),
        },

        Intent::FieldTestDone { field, generation } => {
            let mut applied = false;
            if let Stage::Portal(PortalState {
                fields: FieldPane::Edit(sess),
                ..
            }) = &mut state.stage
            {
                let expected = matches!(
                    sess.test,
                    TestRunState::Running { generation: g } if g == generation
                );
                if sess.field == field && expected {
                    sess.test = TestRunState::Succeeded {
                        preview: TEST_PREVIEW.to_string(),
                    };
                    applied = true;
                }
            }
            if applied {
                stores.fields.set_status(&field, MappingStatus::Success);
                commands.push(info(format!("field test succeeded: {}", field)));
            } else {
                ignored(&mut commands, "field_test_done", "stale test completion");
            }
        }

        // === Verification pane ===
        Intent::OpenVerifyCreate => match state.portal_mut() {
            Some(portal) if portal.tab == Tab::Verification && portal.verify == VerifyPane::List => {
                portal.verify = VerifyPane::Create(VerifyDraft::default());
            }
            _ => ignored(&mut commands, "open_verify_create", "verify list not active"),
        },

        Intent::VerifyDraftTitle { text } => match state.portal_mut().map(|p| &mut p.verify) {
            Some(VerifyPane::Create(draft)) => draft.title = text,
            _ => ignored(&mut commands, "verify_draft_title", "no verify draft"),
        },

        Intent::VerifyDraftScenario { code } => match state.portal_mut().map(|p| &mut p.verify) {
            Some(VerifyPane::Create(draft)) => draft.scenario_code = Some(code),
            _ => ignored(&mut commands, "verify_draft_scenario", "no verify draft"),
        },

        Intent::SaveVerify => {
            let draft = match state.portal() {
                Some(PortalState {
                    verify: VerifyPane::Create(d),
                    ..
                }) => Some(d.clone()),
                _ => None,
            };
            match draft {
                None => ignored(&mut commands, "save_verify", "no verify draft"),
                Some(draft) => match guards::check_verify_draft(&draft, stores.vendor.as_ref()) {
                    Some(err) => state.last_validation = Some(err),
                    None => {
                        // The creation path is a simulation stub: nothing is
                        // persisted, the form just validates and closes.
                        if let Some(portal) = state.portal_mut() {
                            portal.verify = VerifyPane::List;
                        }
                        commands.push(info(format!(
                            "verification schedule accepted (simulation only): {}",
                            draft.title
                        )));
                    }
                },
            }
        }

        Intent::SelectVerify { id } => {
            let known = stores.jobs.get(&id).is_some();
            match state.portal_mut() {
                Some(portal)
                    if portal.tab == Tab::Verification
                        && portal.verify == VerifyPane::List
                        && known =>
                {
                    portal.verify = VerifyPane::Detail {
                        job_id: id,
                        subtab: VerifySubtab::Report,
                    };
                }
                _ => ignored(&mut commands, "select_verify", "unknown job or pane busy"),
            }
        }

        Intent::SwitchVerifyTab { subtab } => match state.portal_mut().map(|p| &mut p.verify) {
            Some(VerifyPane::Detail { subtab: current, .. }) => *current = subtab,
            _ => ignored(&mut commands, "switch_verify_tab", "no verify detail open"),
        },

        Intent::CloseVerifyPane => match state.portal_mut() {
            Some(portal) if portal.verify != VerifyPane::List => {
                portal.verify = VerifyPane::List;
            }
            _ => ignored(&mut commands, "close_verify_pane", "no open verify pane"),
        },

        // === Vendor parameter pane ===
        Intent::OpenParamEdit { scenario, param } => {
            let value = stores.vendor.scenario(&scenario).and_then(|s| {
                s.params
                    .iter()
                    .rev()
                    .find(|p| p.name == param)
                    .map(|p| p.value.clone())
            });
            match (state.portal_mut(), value) {
                (Some(portal), Some(value))
                    if portal.tab == Tab::VendorParams && portal.params == ParamPane::List =>
                {
                    portal.params = ParamPane::Edit(ParamDraft {
                        scenario,
                        param,
                        value,
                    });
                }
                _ => ignored(&mut commands, "open_param_edit", "unknown parameter or pane busy"),
            }
        }

        Intent::ParamDraftValue { text } => match state.portal_mut().map(|p| &mut p.params) {
            Some(ParamPane::Edit(draft)) => draft.value = text,
            _ => ignored(&mut commands, "param_draft_value", "no parameter draft"),
        },

        Intent::SaveParamEdit => {
            let draft = match state.portal() {
                Some(PortalState {
                    params: ParamPane::Edit(d),
                    ..
                }) => Some(d.clone()),
                _ => None,
            };
            match draft {
                None => ignored(&mut commands, "save_param_edit", "no parameter draft"),
                Some(draft) => match stores.vendor.update_parameter(
                    &draft.scenario,
                    &draft.param,
                    &draft.value,
                    state.now,
                    cfg.param_save_mode,
                ) {
                    Err(e) => {
                        state.last_validation = Some(ValidationError::ParamSave { msg: e.msg })
                    }
                    Ok(()) => {
                        if let Some(portal) = state.portal_mut() {
                            portal.params = ParamPane::List;
                        }
                        commands.push(info(format!(
                            "parameter saved: {}.{}",
                            draft.scenario, draft.param
                        )));
                    }
                },
            }
        }

        Intent::CloseParamEdit => match state.portal_mut() {
            Some(portal) if portal.params != ParamPane::List => {
                portal.params = ParamPane::List;
            }
            _ => ignored(&mut commands, "close_param_edit", "no parameter draft"),
        },
    }

    ReducerOutput {
        commands,
        state_hash: state.state_hash(),
    }
}
