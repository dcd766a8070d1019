//! Imperative shell around the pure reducer.
//!
//! The driver owns the session state, the stores, and every scheduled task.
//! Timer lifetimes are scoped to the driver: the reducer's cancel commands
//! abort the owning task, and `Drop` aborts whatever is still pending, so a
//! timer can never outlive the stage that started it. Ticks additionally
//! carry a generation number, which the reducer uses to discard anything a
//! cancelled timer managed to enqueue before it died.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};

use crate::config::Config;
use crate::logging::{self, obj, v_str, Level};
use crate::session::events::{Command, Intent};
use crate::session::reducer::{reduce, ReducerOutput};
use crate::session::state::{SessionState, Snapshot};
use crate::store::Stores;

pub struct SessionDriver {
    state: SessionState,
    stores: Stores,
    cfg: Config,
    tx: mpsc::UnboundedSender<Intent>,
    rx: mpsc::UnboundedReceiver<Intent>,
    processing_timer: Option<JoinHandle<()>>,
    field_test: Option<JoinHandle<()>>,
}

impl SessionDriver {
    pub fn new(cfg: Config, stores: Stores) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            state: SessionState::new(),
            stores,
            cfg,
            tx,
            rx,
            processing_timer: None,
            field_test: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn stores(&self) -> &Stores {
        &self.stores
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot(&self.stores)
    }

    /// Run one intent to completion, executing every command it emits.
    /// Intents are strictly serialized; there is no way for two mutations
    /// to interleave.
    pub fn dispatch(&mut self, intent: Intent) -> u64 {
        let name = intent.name();
        self.state.now = logging::ts_epoch_ms();
        let ReducerOutput {
            commands,
            state_hash,
        } = reduce(&mut self.state, &mut self.stores, intent, &self.cfg);
        logging::log(
            Level::Debug,
            "driver",
            "dispatch",
            obj(&[
                ("intent", v_str(name)),
                ("state_hash", v_str(&format!("{:x}", state_hash))),
            ]),
        );
        for command in commands {
            self.run_command(command);
        }
        state_hash
    }

    fn run_command(&mut self, command: Command) {
        match command {
            Command::StartProcessingTimer { generation } => {
                self.abort_processing_timer();
                let tx = self.tx.clone();
                let tick = Duration::from_millis(self.cfg.processing_tick_ms);
                self.processing_timer = Some(tokio::spawn(async move {
                    let mut timer = tokio::time::interval(tick);
                    // An interval yields immediately on its first tick.
                    timer.tick().await;
                    loop {
                        timer.tick().await;
                        if tx.send(Intent::ProcessingTick { generation }).is_err() {
                            break;
                        }
                    }
                }));
            }
            Command::CancelProcessingTimer => self.abort_processing_timer(),
            Command::ScheduleFieldTest { field, generation } => {
                self.abort_field_test();
                let tx = self.tx.clone();
                let delay = Duration::from_millis(self.cfg.test_run_delay_ms);
                self.field_test = Some(tokio::spawn(async move {
                    sleep(delay).await;
                    let _ = tx.send(Intent::FieldTestDone { field, generation });
                }));
            }
            Command::CancelFieldTest => self.abort_field_test(),
            Command::Log { level, msg } => {
                logging::log(level, "session", "event", obj(&[("msg", v_str(&msg))]));
            }
        }
    }

    fn abort_processing_timer(&mut self) {
        if let Some(handle) = self.processing_timer.take() {
            handle.abort();
        }
    }

    fn abort_field_test(&mut self) {
        if let Some(handle) = self.field_test.take() {
            handle.abort();
        }
    }

    /// Process queued internal intents until `pred` holds. This is how a
    /// caller waits for timer-driven progress; wrap it in a timeout if the
    /// predicate might never become true.
    pub async fn run_until<F>(&mut self, pred: F)
    where
        F: Fn(&SessionState) -> bool,
    {
        while !pred(&self.state) {
            match self.rx.recv().await {
                Some(intent) => {
                    self.dispatch(intent);
                }
                None => return,
            }
        }
    }

    /// Dispatch whatever internal intents are already queued, without
    /// waiting for more.
    pub fn drain_pending(&mut self) {
        while let Ok(intent) = self.rx.try_recv() {
            self.dispatch(intent);
        }
    }
}

impl Drop for SessionDriver {
    fn drop(&mut self) {
        self.abort_processing_timer();
        self.abort_field_test();
    }
}
