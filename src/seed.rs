//! Demonstration dataset for the portal.
//!
//! Two historical projects, the standard-field catalogue, three vendor
//! scenarios with their parameter windows, three verification jobs and the
//! overview aggregates. Everything is in-memory; a deployment would swap
//! these stores for ones backed by real services.

use crate::store::{
    DataType, DbType, ErrorKind, ErrorRow, JobStatus, MappingStatus, MemoryFieldStore,
    MemoryOverviewStore, MemoryProjectStore, MemoryVendorParamStore, MemoryVerificationJobStore,
    MonthlyDiff, OverviewStats, ParamRow, PipelineStep, Project, ProjectStatus, Schedule,
    StandardField, Stores, Timestamp, TrendPoint, VendorParameter, VendorScenario,
    VerificationJob, STILL_ACTIVE,
};

fn ts(s: &str) -> Timestamp {
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .expect("seed timestamp")
        .and_utc()
        .timestamp_millis() as Timestamp
}

pub fn seeded_stores() -> Stores {
    Stores {
        projects: Box::new(MemoryProjectStore::new(projects())),
        fields: Box::new(MemoryFieldStore::new(fields())),
        vendor: Box::new(MemoryVendorParamStore::new(scenarios())),
        jobs: Box::new(MemoryVerificationJobStore::new(jobs())),
        overview: Box::new(MemoryOverviewStore::new(pipeline(), stats(), trend())),
    }
}

fn projects() -> Vec<Project> {
    vec![
        Project {
            id: "TCA001".to_string(),
            name: "2025Q3 Trade Data".to_string(),
            path: "/data/warehouse/2025q3_trade_data".to_string(),
            db_type: DbType::Sas,
            date_from: ts("2025-01-01 00:00:00"),
            date_to: ts("2025-03-31 23:59:59"),
            created_at: ts("2025-11-19 10:00:00"),
            last_edited_at: ts("2025-11-19 10:00:00"),
            status: ProjectStatus::Ready,
        },
        Project {
            id: "TCA002".to_string(),
            name: "2025Q2 Trade Data".to_string(),
            path: "/data/warehouse/2025q2_trade_data".to_string(),
            db_type: DbType::Sas,
            date_from: ts("2025-01-01 00:00:00"),
            date_to: ts("2025-03-31 23:59:59"),
            created_at: ts("2025-08-15 09:30:00"),
            last_edited_at: ts("2025-08-15 09:30:00"),
            status: ProjectStatus::Archived,
        },
    ]
}

fn fields() -> Vec<StandardField> {
    vec![
        StandardField {
            name: "txn_time".to_string(),
            data_type: DataType::Timestamp,
            description: "Transaction time".to_string(),
            source_column: Some("TXN_DT_TIME".to_string()),
            mapping_status: MappingStatus::Mapped,
        },
        StandardField {
            name: "period_days".to_string(),
            data_type: DataType::Int,
            description: "Aggregation window in days".to_string(),
            source_column: Some("PARAM_DAYS".to_string()),
            mapping_status: MappingStatus::Failed,
        },
        StandardField {
            name: "party_id".to_string(),
            data_type: DataType::String,
            description: "Customer identifier".to_string(),
            source_column: Some("CUST_ID".to_string()),
            mapping_status: MappingStatus::Mapped,
        },
        StandardField {
            name: "txn_amount".to_string(),
            data_type: DataType::Decimal,
            description: "Single transaction amount".to_string(),
            source_column: Some("TXN_AMT".to_string()),
            mapping_status: MappingStatus::Mapped,
        },
        StandardField {
            name: "channel".to_string(),
            data_type: DataType::String,
            description: "Transaction channel".to_string(),
            source_column: None,
            mapping_status: MappingStatus::Unmapped,
        },
    ]
}

fn scenarios() -> Vec<VendorScenario> {
    let updated = ts("2025-10-10 10:45:45");
    let window_from = ts("2026-01-01 00:00:00");
    let window_to = ts("2026-03-31 23:59:59");
    vec![
        VendorScenario {
            code: "txna1101".to_string(),
            title: "Frequent large cash deposits and withdrawals on one account".to_string(),
            schedule: Schedule::Monthly,
            params: vec![
                VendorParameter {
                    name: "credit_limit".to_string(),
                    value: "1,000,000".to_string(),
                    active_from: window_from,
                    active_to: window_to,
                    updated_at: updated,
                },
                VendorParameter {
                    name: "debit_limit".to_string(),
                    value: "1,000,000".to_string(),
                    active_from: window_from,
                    active_to: window_to,
                    updated_at: updated,
                },
            ],
        },
        VendorScenario {
            code: "txna1102".to_string(),
            title: "Single transaction above reporting threshold".to_string(),
            schedule: Schedule::Daily,
            params: vec![VendorParameter {
                name: "amount".to_string(),
                value: "500,000".to_string(),
                active_from: window_from,
                active_to: STILL_ACTIVE,
                updated_at: updated,
            }],
        },
        VendorScenario {
            code: "txna1103".to_string(),
            title: "Aggregate debits above monthly threshold".to_string(),
            schedule: Schedule::Monthly,
            params: vec![VendorParameter {
                name: "debit_limit".to_string(),
                value: "1,000,000".to_string(),
                active_from: window_from,
                active_to: window_to,
                updated_at: updated,
            }],
        },
    ]
}

fn jobs() -> Vec<VerificationJob> {
    vec![
        VerificationJob {
            id: "V-001".to_string(),
            title: "2025 Q4 analysis - scenario backtest".to_string(),
            description: "Replay Q4 transactions against vendor thresholds".to_string(),
            scenario_code: "txna1101".to_string(),
            schedule: Schedule::Monthly,
            created_at: ts("2025-11-19 10:00:00"),
            started_at: Some(ts("2025-11-20 10:00:00")),
            ended_at: Some(ts("2025-11-21 10:00:00")),
            status: JobStatus::Success,
            simulated_alerts: 100,
            actual_alerts: 98,
            type1_errors: 1,
            type2_errors: 1,
            params: vec![
                ParamRow {
                    name: "credit_limit".to_string(),
                    vendor_value: "1,000,000".to_string(),
                    run_value: "1,000,000".to_string(),
                },
                ParamRow {
                    name: "debit_limit".to_string(),
                    vendor_value: "1,000,000".to_string(),
                    run_value: "1,000,000".to_string(),
                },
            ],
            monthly_diff: vec![
                MonthlyDiff {
                    year: 2025,
                    month: 1,
                    simulated: 30,
                    actual: 30,
                    type1: 0,
                    type2: 0,
                },
                MonthlyDiff {
                    year: 2025,
                    month: 2,
                    simulated: 40,
                    actual: 38,
                    type1: 1,
                    type2: 1,
                },
                MonthlyDiff {
                    year: 2025,
                    month: 3,
                    simulated: 30,
                    actual: 30,
                    type1: 0,
                    type2: 0,
                },
            ],
            errors: vec![
                ErrorRow {
                    pid: "ETR0039432903".to_string(),
                    account_id: "RTU13434".to_string(),
                    occurred_at: ts("2025-11-20 10:00:00"),
                    kind: ErrorKind::Type1,
                },
                ErrorRow {
                    pid: "UIR32040234".to_string(),
                    account_id: "UIR32040".to_string(),
                    occurred_at: ts("2025-11-20 10:00:00"),
                    kind: ErrorKind::Type2,
                },
            ],
        },
        VerificationJob {
            id: "V-002".to_string(),
            title: "2025 Q4 parameter tuning test".to_string(),
            description: "Lowered threshold trial run".to_string(),
            scenario_code: "txna1102".to_string(),
            schedule: Schedule::Daily,
            created_at: ts("2025-11-20 09:00:00"),
            started_at: Some(ts("2025-11-20 14:00:00")),
            ended_at: None,
            status: JobStatus::InProgress,
            simulated_alerts: 0,
            actual_alerts: 0,
            type1_errors: 0,
            type2_errors: 0,
            params: vec![ParamRow {
                name: "amount".to_string(),
                vendor_value: "500,000".to_string(),
                run_value: "450,000".to_string(),
            }],
            monthly_diff: Vec::new(),
            errors: Vec::new(),
        },
        VerificationJob {
            id: "V-003".to_string(),
            title: "2025 Q3 backfill test".to_string(),
            description: String::new(),
            scenario_code: "txna1103".to_string(),
            schedule: Schedule::Monthly,
            created_at: ts("2025-11-18 15:30:00"),
            started_at: None,
            ended_at: None,
            status: JobStatus::Failed,
            simulated_alerts: 0,
            actual_alerts: 0,
            type1_errors: 0,
            type2_errors: 0,
            params: Vec::new(),
            monthly_diff: Vec::new(),
            errors: Vec::new(),
        },
    ]
}

fn pipeline() -> Vec<PipelineStep> {
    vec![
        PipelineStep {
            name: "Data extraction".to_string(),
            done: 12_500_000,
            total: 12_500_000,
            note: "12.5M rows".to_string(),
        },
        PipelineStep {
            name: "Field standardization".to_string(),
            done: 47,
            total: 49,
            note: "2 fields need manual review".to_string(),
        },
        PipelineStep {
            name: "Data load".to_string(),
            done: 0,
            total: 1,
            note: "waiting".to_string(),
        },
    ]
}

fn stats() -> OverviewStats {
    OverviewStats {
        errors_7d: 4,
        in_progress: 10,
        verified_7d: 5,
    }
}

fn trend() -> Vec<TrendPoint> {
    [
        ("11/13", 4, 20, 50),
        ("11/14", 2, 30, 60),
        ("11/15", 5, 25, 55),
        ("11/16", 1, 40, 80),
        ("11/17", 0, 10, 90),
    ]
    .into_iter()
    .map(|(label, errors, processing, verified)| TrendPoint {
        label: label.to_string(),
        errors,
        processing,
        verified,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::STILL_ACTIVE;

    #[test]
    fn seed_is_internally_consistent() {
        let stores = seeded_stores();
        assert_eq!(stores.projects.list().len(), 2);
        assert_eq!(stores.fields.list().len(), 5);
        assert_eq!(stores.vendor.scenarios().len(), 3);
        assert_eq!(stores.jobs.list().len(), 3);

        // Every job references a seeded scenario.
        for job in stores.jobs.list() {
            assert!(
                stores.vendor.scenario(&job.scenario_code).is_some(),
                "job {} references unknown scenario {}",
                job.id,
                job.scenario_code
            );
        }
    }

    #[test]
    fn seed_projects_newest_first() {
        let stores = seeded_stores();
        let list = stores.projects.list();
        assert!(list[0].created_at >= list[1].created_at);
    }

    #[test]
    fn seed_has_still_active_window() {
        let stores = seeded_stores();
        let scenario = stores.vendor.scenario("txna1102").expect("txna1102");
        assert_eq!(scenario.params[0].active_to, STILL_ACTIVE);
    }
}
