//! Cross-cutting invariant checks, usable from tests and from the driver's
//! periodic self-audit.

use std::collections::HashSet;

use crate::session::state::{SessionState, Stage, PROCESSING_TERMINAL_STEP};
use crate::store::{Project, StandardField, VendorScenario, VerificationJob};

#[derive(Debug, Clone)]
pub struct InvariantViolation {
    pub msg: String,
}

impl InvariantViolation {
    fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

/// The step counter never leaves the 0..=3 band.
pub fn assert_processing_step(state: &SessionState) -> Result<(), InvariantViolation> {
    if let Stage::Processing { step, .. } = &state.stage {
        if *step > PROCESSING_TERMINAL_STEP {
            return Err(InvariantViolation::new(format!(
                "processing step out of range: {}",
                step
            )));
        }
    }
    Ok(())
}

/// Field names are unique within the catalogue.
pub fn assert_unique_field_names(fields: &[StandardField]) -> Result<(), InvariantViolation> {
    let mut seen = HashSet::new();
    for field in fields {
        if !seen.insert(field.name.as_str()) {
            return Err(InvariantViolation::new(format!(
                "duplicate field name: {}",
                field.name
            )));
        }
    }
    Ok(())
}

/// The project list stays in newest-first display order.
pub fn assert_projects_newest_first(projects: &[Project]) -> Result<(), InvariantViolation> {
    for pair in projects.windows(2) {
        if pair[0].created_at < pair[1].created_at {
            return Err(InvariantViolation::new(format!(
                "project order broken: {} created before {}",
                pair[0].id, pair[1].id
            )));
        }
    }
    Ok(())
}

/// Parameter activation windows are well-formed: start never after end, and
/// at most one still-active row per parameter name within a scenario.
pub fn assert_param_windows(scenario: &VendorScenario) -> Result<(), InvariantViolation> {
    let mut active = HashSet::new();
    for param in &scenario.params {
        if param.active_from > param.active_to {
            return Err(InvariantViolation::new(format!(
                "{}.{} window starts after it ends",
                scenario.code, param.name
            )));
        }
        if param.is_active() && !active.insert(param.name.as_str()) {
            return Err(InvariantViolation::new(format!(
                "{}.{} has more than one still-active row",
                scenario.code, param.name
            )));
        }
    }
    Ok(())
}

/// Dangling scenario references on verification jobs. Not enforced as an
/// error anywhere; callers surface these as warnings.
pub fn check_scenario_refs(jobs: &[VerificationJob], scenarios: &[VendorScenario]) -> Vec<String> {
    let known: HashSet<&str> = scenarios.iter().map(|s| s.code.as_str()).collect();
    jobs.iter()
        .filter(|j| !known.contains(j.scenario_code.as_str()))
        .map(|j| format!("{} references unknown scenario {}", j.id, j.scenario_code))
        .collect()
}
