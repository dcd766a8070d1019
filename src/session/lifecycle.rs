//! Top-level stage transition table.
//!
//! Exactly one stage is active at a time. Every legal transition between
//! stages is listed here and nowhere else; the reducer consults this table
//! before committing any stage change, and anything the table rejects is a
//! no-op.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StageKind {
    Login,
    ProjectList,
    Connect,
    Processing,
    Portal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageEvent {
    LoginSubmitted,
    ProjectSelected,
    ProjectCreated,
    ConnectCancelled,
    ConnectionConfirmed,
    ProcessingStopped,
    PortalEntered,
    ProjectSwitched,
    LoggedOut,
}

#[derive(Debug, Clone)]
pub struct TransitionError {
    pub msg: String,
}

pub fn next_stage(from: StageKind, event: StageEvent) -> Result<StageKind, TransitionError> {
    use StageEvent::*;
    use StageKind::*;
    match (from, event) {
        (Login, LoginSubmitted) => Ok(ProjectList),
        (ProjectList, ProjectSelected) => Ok(Connect),
        (ProjectList, ProjectCreated) => Ok(ProjectList),
        (ProjectList, LoggedOut) => Ok(Login),
        (Connect, ConnectCancelled) => Ok(ProjectList),
        (Connect, ConnectionConfirmed) => Ok(Processing),
        (Processing, ProcessingStopped) => Ok(Connect),
        (Processing, PortalEntered) => Ok(Portal),
        (Portal, ProjectSwitched) => Ok(ProjectList),
        (Portal, LoggedOut) => Ok(Login),
        (from, event) => Err(TransitionError {
            msg: format!("no transition from {:?} on {:?}", from, event),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KINDS: [StageKind; 5] = [
        StageKind::Login,
        StageKind::ProjectList,
        StageKind::Connect,
        StageKind::Processing,
        StageKind::Portal,
    ];

    const EVENTS: [StageEvent; 9] = [
        StageEvent::LoginSubmitted,
        StageEvent::ProjectSelected,
        StageEvent::ProjectCreated,
        StageEvent::ConnectCancelled,
        StageEvent::ConnectionConfirmed,
        StageEvent::ProcessingStopped,
        StageEvent::PortalEntered,
        StageEvent::ProjectSwitched,
        StageEvent::LoggedOut,
    ];

    #[test]
    fn table_matches_design() {
        assert_eq!(
            next_stage(StageKind::Login, StageEvent::LoginSubmitted).unwrap(),
            StageKind::ProjectList
        );
        assert_eq!(
            next_stage(StageKind::ProjectList, StageEvent::ProjectSelected).unwrap(),
            StageKind::Connect
        );
        assert_eq!(
            next_stage(StageKind::Connect, StageEvent::ConnectionConfirmed).unwrap(),
            StageKind::Processing
        );
        assert_eq!(
            next_stage(StageKind::Processing, StageEvent::PortalEntered).unwrap(),
            StageKind::Portal
        );
        assert_eq!(
            next_stage(StageKind::Portal, StageEvent::ProjectSwitched).unwrap(),
            StageKind::ProjectList
        );
    }

    #[test]
    fn everything_off_the_table_is_rejected() {
        let legal: &[(StageKind, StageEvent)] = &[
            (StageKind::Login, StageEvent::LoginSubmitted),
            (StageKind::ProjectList, StageEvent::ProjectSelected),
            (StageKind::ProjectList, StageEvent::ProjectCreated),
            (StageKind::ProjectList, StageEvent::LoggedOut),
            (StageKind::Connect, StageEvent::ConnectCancelled),
            (StageKind::Connect, StageEvent::ConnectionConfirmed),
            (StageKind::Processing, StageEvent::ProcessingStopped),
            (StageKind::Processing, StageEvent::PortalEntered),
            (StageKind::Portal, StageEvent::ProjectSwitched),
            (StageKind::Portal, StageEvent::LoggedOut),
        ];
        let mut rejected = 0;
        for from in KINDS {
            for event in EVENTS {
                let result = next_stage(from, event);
                if legal.contains(&(from, event)) {
                    assert!(result.is_ok(), "{:?}/{:?} should be legal", from, event);
                } else {
                    assert!(result.is_err(), "{:?}/{:?} should be rejected", from, event);
                    rejected += 1;
                }
            }
        }
        assert_eq!(rejected, KINDS.len() * EVENTS.len() - legal.len());
    }
}
