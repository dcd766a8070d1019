//! The navigation core: session state, dispatchable intents, validation
//! guards, the stage transition table, and the pure reducer that ties them
//! together. Everything here is synchronous and deterministic; timers and
//! logging happen in the driver, instructed by the commands the reducer
//! returns.

pub mod events;
pub mod guards;
pub mod lifecycle;
pub mod reducer;
pub mod state;
