//! Session and navigation controller for a bank AML data-verification portal.
//!
//! Architecture:
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │   Intents    │────►│   Reducer    │────►│   Commands   │
//! │ (UI + timer) │     │  (pure fn)   │     │ (timers/log) │
//! └──────────────┘     └──────────────┘     └──────────────┘
//!                             │
//!                             ▼
//!                      ┌──────────────┐     ┌──────────────┐
//!                      │ SessionState │────►│   Snapshot   │
//!                      │   (hashed)   │     │ (for render) │
//!                      └──────────────┘     └──────────────┘
//! ```
//!
//! The reducer owns every state transition; the [`driver`] is the imperative
//! shell that executes the commands it emits (scoped timers, structured
//! logging) and feeds timer completions back in as intents. Entity
//! collections live behind the store traits in [`store`] so the navigation
//! core stays decoupled from data provenance.

pub mod config;
pub mod driver;
pub mod invariants;
pub mod logging;
pub mod seed;
pub mod session;
pub mod store;
