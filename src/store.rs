//! Entity model and store interfaces.
//!
//! Every collection the controller renders sits behind a trait so the
//! navigation core never depends on where the data comes from. The shipped
//! implementations are in-memory; nothing here survives process exit.

use serde::{Deserialize, Serialize};

use crate::config::{FieldNameMatch, ParamSaveMode};

/// Epoch milliseconds.
pub type Timestamp = u64;

/// `active_to` sentinel meaning "still active" (9999-01-01T00:00:00Z).
pub const STILL_ACTIVE: Timestamp = 253_370_764_800_000;

/// Render a timestamp as `YYYY-MM-DD HH:MM:SS` for display snapshots.
pub fn fmt_ts(ts: Timestamp) -> String {
    match chrono::DateTime::from_timestamp_millis(ts as i64) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "-".to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct StoreError {
    pub msg: String,
}

impl StoreError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

// =============================================================================
// Projects
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DbType {
    Sas,
    Northwind,
    Oracle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectStatus {
    Active,
    Ready,
    Archived,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub path: String,
    pub db_type: DbType,
    pub date_from: Timestamp,
    pub date_to: Timestamp,
    pub created_at: Timestamp,
    pub last_edited_at: Timestamp,
    pub status: ProjectStatus,
}

/// Projects in display order: newest first.
pub trait ProjectStore {
    fn list(&self) -> &[Project];
    fn get(&self, id: &str) -> Option<&Project>;
    fn insert(&mut self, project: Project);
}

#[derive(Debug, Default)]
pub struct MemoryProjectStore {
    projects: Vec<Project>,
}

impl MemoryProjectStore {
    pub fn new(projects: Vec<Project>) -> Self {
        Self { projects }
    }
}

impl ProjectStore for MemoryProjectStore {
    fn list(&self) -> &[Project] {
        &self.projects
    }

    fn get(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    fn insert(&mut self, project: Project) {
        // Front insertion keeps the vector in display order.
        self.projects.insert(0, project);
    }
}

// =============================================================================
// Standard fields
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    String,
    Int,
    Decimal,
    Timestamp,
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MappingStatus {
    Mapped,
    Unmapped,
    Success,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardField {
    pub name: String,
    pub data_type: DataType,
    pub description: String,
    pub source_column: Option<String>,
    pub mapping_status: MappingStatus,
}

pub trait FieldStore {
    fn list(&self) -> &[StandardField];
    fn get(&self, name: &str) -> Option<&StandardField>;
    /// The duplicate predicate behind the field-create name input.
    fn contains(&self, candidate: &str, mode: FieldNameMatch) -> bool;
    fn insert(&mut self, field: StandardField);
    fn set_status(&mut self, name: &str, status: MappingStatus) -> bool;
}

#[derive(Debug, Default)]
pub struct MemoryFieldStore {
    fields: Vec<StandardField>,
}

impl MemoryFieldStore {
    pub fn new(fields: Vec<StandardField>) -> Self {
        Self { fields }
    }
}

impl FieldStore for MemoryFieldStore {
    fn list(&self) -> &[StandardField] {
        &self.fields
    }

    fn get(&self, name: &str) -> Option<&StandardField> {
        self.fields.iter().find(|f| f.name == name)
    }

    fn contains(&self, candidate: &str, mode: FieldNameMatch) -> bool {
        match mode {
            FieldNameMatch::Exact => self.fields.iter().any(|f| f.name == candidate),
            FieldNameMatch::TrimmedCi => {
                let wanted = candidate.trim().to_lowercase();
                self.fields
                    .iter()
                    .any(|f| f.name.trim().to_lowercase() == wanted)
            }
        }
    }

    fn insert(&mut self, field: StandardField) {
        self.fields.push(field);
    }

    fn set_status(&mut self, name: &str, status: MappingStatus) -> bool {
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(field) => {
                field.mapping_status = status;
                true
            }
            None => false,
        }
    }
}

// =============================================================================
// Vendor scenarios and parameters
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Schedule {
    Daily,
    Monthly,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorParameter {
    pub name: String,
    pub value: String,
    pub active_from: Timestamp,
    pub active_to: Timestamp,
    pub updated_at: Timestamp,
}

impl VendorParameter {
    pub fn is_active(&self) -> bool {
        self.active_to == STILL_ACTIVE
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorScenario {
    pub code: String,
    pub title: String,
    pub schedule: Schedule,
    pub params: Vec<VendorParameter>,
}

pub trait VendorParamStore {
    fn scenarios(&self) -> &[VendorScenario];
    fn scenario(&self, code: &str) -> Option<&VendorScenario>;
    /// Apply a parameter edit. `Versioned` closes the newest row for the
    /// parameter and appends a fresh still-active one; `InPlace` rewrites
    /// the newest row's value.
    fn update_parameter(
        &mut self,
        code: &str,
        name: &str,
        value: &str,
        now: Timestamp,
        mode: ParamSaveMode,
    ) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryVendorParamStore {
    scenarios: Vec<VendorScenario>,
}

impl MemoryVendorParamStore {
    pub fn new(scenarios: Vec<VendorScenario>) -> Self {
        Self { scenarios }
    }
}

impl VendorParamStore for MemoryVendorParamStore {
    fn scenarios(&self) -> &[VendorScenario] {
        &self.scenarios
    }

    fn scenario(&self, code: &str) -> Option<&VendorScenario> {
        self.scenarios.iter().find(|s| s.code == code)
    }

    fn update_parameter(
        &mut self,
        code: &str,
        name: &str,
        value: &str,
        now: Timestamp,
        mode: ParamSaveMode,
    ) -> Result<(), StoreError> {
        let scenario = self
            .scenarios
            .iter_mut()
            .find(|s| s.code == code)
            .ok_or_else(|| StoreError::new(format!("unknown scenario: {}", code)))?;

        // Newest row for the parameter wins; rows are kept in append order.
        let idx = scenario
            .params
            .iter()
            .rposition(|p| p.name == name)
            .ok_or_else(|| StoreError::new(format!("unknown parameter: {}.{}", code, name)))?;

        match mode {
            ParamSaveMode::InPlace => {
                let row = &mut scenario.params[idx];
                row.value = value.to_string();
                row.updated_at = now;
            }
            ParamSaveMode::Versioned => {
                let active_from = {
                    let row = &mut scenario.params[idx];
                    if row.is_active() {
                        // Windows never invert, even under a skewed clock.
                        row.active_to = now.max(row.active_from);
                    }
                    row.active_to.max(now)
                };
                scenario.params.push(VendorParameter {
                    name: name.to_string(),
                    value: value.to_string(),
                    active_from,
                    active_to: STILL_ACTIVE,
                    updated_at: now,
                });
            }
        }
        Ok(())
    }
}

// =============================================================================
// Verification jobs
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    NotStarted,
    InProgress,
    Success,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// False positive: alert raised where none was expected.
    Type1,
    /// False negative: expected alert missing.
    Type2,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamRow {
    pub name: String,
    pub vendor_value: String,
    pub run_value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyDiff {
    pub year: u16,
    pub month: u8,
    pub simulated: u32,
    pub actual: u32,
    pub type1: u32,
    pub type2: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorRow {
    pub pid: String,
    pub account_id: String,
    pub occurred_at: Timestamp,
    pub kind: ErrorKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationJob {
    pub id: String,
    pub title: String,
    pub description: String,
    pub scenario_code: String,
    pub schedule: Schedule,
    pub created_at: Timestamp,
    pub started_at: Option<Timestamp>,
    pub ended_at: Option<Timestamp>,
    pub status: JobStatus,
    pub simulated_alerts: u32,
    pub actual_alerts: u32,
    pub type1_errors: u32,
    pub type2_errors: u32,
    pub params: Vec<ParamRow>,
    pub monthly_diff: Vec<MonthlyDiff>,
    pub errors: Vec<ErrorRow>,
}

pub trait VerificationJobStore {
    fn list(&self) -> &[VerificationJob];
    fn get(&self, id: &str) -> Option<&VerificationJob>;
}

#[derive(Debug, Default)]
pub struct MemoryVerificationJobStore {
    jobs: Vec<VerificationJob>,
}

impl MemoryVerificationJobStore {
    pub fn new(jobs: Vec<VerificationJob>) -> Self {
        Self { jobs }
    }
}

impl VerificationJobStore for MemoryVerificationJobStore {
    fn list(&self) -> &[VerificationJob] {
        &self.jobs
    }

    fn get(&self, id: &str) -> Option<&VerificationJob> {
        self.jobs.iter().find(|j| j.id == id)
    }
}

// =============================================================================
// Overview aggregates
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineStep {
    pub name: String,
    pub done: u64,
    pub total: u64,
    pub note: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct OverviewStats {
    pub errors_7d: u32,
    pub in_progress: u32,
    pub verified_7d: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendPoint {
    pub label: String,
    pub errors: u32,
    pub processing: u32,
    pub verified: u32,
}

pub trait OverviewStore {
    fn pipeline(&self) -> &[PipelineStep];
    fn stats(&self) -> OverviewStats;
    fn trend(&self) -> &[TrendPoint];
}

#[derive(Debug, Default)]
pub struct MemoryOverviewStore {
    pipeline: Vec<PipelineStep>,
    stats: OverviewStats,
    trend: Vec<TrendPoint>,
}

impl MemoryOverviewStore {
    pub fn new(pipeline: Vec<PipelineStep>, stats: OverviewStats, trend: Vec<TrendPoint>) -> Self {
        Self {
            pipeline,
            stats,
            trend,
        }
    }
}

impl OverviewStore for MemoryOverviewStore {
    fn pipeline(&self) -> &[PipelineStep] {
        &self.pipeline
    }

    fn stats(&self) -> OverviewStats {
        self.stats
    }

    fn trend(&self) -> &[TrendPoint] {
        &self.trend
    }
}

// =============================================================================
// Aggregate handle passed to the reducer
// =============================================================================

pub struct Stores {
    pub projects: Box<dyn ProjectStore + Send>,
    pub fields: Box<dyn FieldStore + Send>,
    pub vendor: Box<dyn VendorParamStore + Send>,
    pub jobs: Box<dyn VerificationJobStore + Send>,
    pub overview: Box<dyn OverviewStore + Send>,
}

impl Stores {
    pub fn empty() -> Self {
        Self {
            projects: Box::new(MemoryProjectStore::default()),
            fields: Box::new(MemoryFieldStore::default()),
            vendor: Box::new(MemoryVendorParamStore::default()),
            jobs: Box::new(MemoryVerificationJobStore::default()),
            overview: Box::new(MemoryOverviewStore::default()),
        }
    }
}
