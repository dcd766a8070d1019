use anyhow::Result;

use amlportal::config::Config;
use amlportal::driver::SessionDriver;
use amlportal::invariants;
use amlportal::logging::{json_log, obj, v_str, v_u64};
use amlportal::seed::seeded_stores;
use amlportal::session::events::{Intent, Tab, VerifySubtab};
use amlportal::session::state::{FieldPane, Stage, TestRunState, PROCESSING_TERMINAL_STEP};

/// Scripted walkthrough of the portal: login, connect a data source, wait
/// for the simulated ETL run, then exercise the workspace drill-downs. The
/// final snapshot is printed as JSON so a renderer (or a human) can inspect
/// exactly what a view layer would receive.
#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();
    json_log(
        "startup",
        obj(&[
            ("config_hash", v_str(&cfg.config_hash())),
            ("proc_tick_ms", v_u64(cfg.processing_tick_ms)),
            ("test_run_delay_ms", v_u64(cfg.test_run_delay_ms)),
        ]),
    );

    let mut driver = SessionDriver::new(cfg, seeded_stores());

    for warning in invariants::check_scenario_refs(
        driver.stores().jobs.list(),
        driver.stores().vendor.scenarios(),
    ) {
        json_log("audit", obj(&[("msg", v_str(&warning))]));
    }

    driver.dispatch(Intent::Login {
        username: "user001".to_string(),
        password: "secret".to_string(),
    });
    driver.dispatch(Intent::CreateProject {
        name: "2026Q1 Trade Data".to_string(),
    });
    driver.dispatch(Intent::SelectProject {
        id: "TCA001".to_string(),
    });

    let draft = match &driver.state().stage {
        Stage::Connect { draft } => draft.clone(),
        other => anyhow::bail!("expected connection form, got {:?}", other),
    };
    driver.dispatch(Intent::ConfirmConnection { draft });

    driver
        .run_until(|s| {
            matches!(s.stage, Stage::Processing { step, .. } if step == PROCESSING_TERMINAL_STEP)
        })
        .await;
    driver.dispatch(Intent::EnterPortal);

    // Field mapping: a duplicate name is caught on the keystroke, a fresh
    // one saves, and the edit pane runs the simulated transformation test.
    driver.dispatch(Intent::SwitchTab {
        tab: Tab::FieldMapping,
    });
    driver.dispatch(Intent::OpenFieldCreate);
    driver.dispatch(Intent::FieldDraftName {
        text: "txn_time".to_string(),
    });
    driver.dispatch(Intent::FieldDraftName {
        text: "settle_date".to_string(),
    });
    driver.dispatch(Intent::SaveField);
    driver.dispatch(Intent::OpenFieldEdit {
        name: "settle_date".to_string(),
    });
    driver.dispatch(Intent::RunFieldTest);
    driver
        .run_until(|s| {
            matches!(
                s.portal().map(|p| &p.fields),
                Some(FieldPane::Edit(sess))
                    if matches!(sess.test, TestRunState::Succeeded { .. })
            )
        })
        .await;
    driver.dispatch(Intent::CloseFieldPane);

    // Vendor parameters: open the edit modal and save through the
    // configured mode.
    driver.dispatch(Intent::SwitchTab {
        tab: Tab::VendorParams,
    });
    driver.dispatch(Intent::OpenParamEdit {
        scenario: "txna1101".to_string(),
        param: "credit_limit".to_string(),
    });
    driver.dispatch(Intent::ParamDraftValue {
        text: "1,200,000".to_string(),
    });
    driver.dispatch(Intent::SaveParamEdit);

    // Verification: drill into the finished job and walk its sub-tabs.
    driver.dispatch(Intent::SwitchTab {
        tab: Tab::Verification,
    });
    driver.dispatch(Intent::SelectVerify {
        id: "V-001".to_string(),
    });
    driver.dispatch(Intent::SwitchVerifyTab {
        subtab: VerifySubtab::Settings,
    });
    driver.dispatch(Intent::SwitchVerifyTab {
        subtab: VerifySubtab::DiffLog,
    });
    driver.dispatch(Intent::CloseVerifyPane);

    invariants::assert_processing_step(driver.state()).map_err(|v| anyhow::anyhow!(v.msg))?;
    invariants::assert_unique_field_names(driver.stores().fields.list())
        .map_err(|v| anyhow::anyhow!(v.msg))?;

    driver.dispatch(Intent::SwitchProject);
    driver.dispatch(Intent::Logout);

    let snapshot = driver.snapshot();
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
