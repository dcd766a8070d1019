use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// What "save" means for a vendor parameter edit.
///
/// The activation window on each parameter row supports either reading:
/// `InPlace` rewrites the active row, `Versioned` closes the active row's
/// window and appends a fresh one ending at the still-active sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamSaveMode {
    InPlace,
    Versioned,
}

/// How candidate standard-field names are compared against existing ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldNameMatch {
    /// Case-sensitive, exact match.
    Exact,
    /// Trimmed, case-insensitive match.
    TrimmedCi,
}

#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Interval between simulated ETL progress ticks.
    pub processing_tick_ms: u64,
    /// Delay before a simulated field test run reports success.
    pub test_run_delay_ms: u64,
    pub param_save_mode: ParamSaveMode,
    pub field_name_match: FieldNameMatch,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            processing_tick_ms: std::env::var("PROC_TICK_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1500),
            test_run_delay_ms: std::env::var("TEST_RUN_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
            param_save_mode: match std::env::var("PARAM_SAVE_MODE").as_deref() {
                Ok("in_place") => ParamSaveMode::InPlace,
                _ => ParamSaveMode::Versioned,
            },
            field_name_match: match std::env::var("FIELD_NAME_MATCH").as_deref() {
                Ok("trimmed_ci") => FieldNameMatch::TrimmedCi,
                _ => FieldNameMatch::Exact,
            },
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// SHA256 over the serialized config, recorded in the run manifest so a
    /// log stream can be correlated with the exact configuration that
    /// produced it.
    pub fn config_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.to_json().as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Config {
        Config {
            processing_tick_ms: 1500,
            test_run_delay_ms: 1000,
            param_save_mode: ParamSaveMode::Versioned,
            field_name_match: FieldNameMatch::Exact,
        }
    }

    #[test]
    fn config_hash_deterministic() {
        let a = base();
        let b = base();
        assert_eq!(a.config_hash(), b.config_hash());
        assert_eq!(a.config_hash().len(), 64);
    }

    #[test]
    fn config_hash_changes_with_mode() {
        let a = base();
        let mut b = base();
        b.param_save_mode = ParamSaveMode::InPlace;
        assert_ne!(a.config_hash(), b.config_hash());
    }

    #[test]
    fn config_json_round_trip() {
        let json = base().to_json();
        assert!(json.contains("\"processing_tick_ms\""));
        assert!(json.contains("\"versioned\""));
        let parsed: serde_json::Value = serde_json::from_str(&json).expect("config JSON");
        assert!(parsed.is_object());
    }
}
