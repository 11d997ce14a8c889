//! Client session: lifecycle controller, onboarding flow, and state types.
//!
//! DESIGN
//! ======
//! `SessionController` is the only owner of auth state. Front ends hold it
//! (or borrow it) and read `SessionState` back after each operation.

pub mod controller;
pub mod onboarding;
pub mod state;

pub use controller::SessionController;
pub use onboarding::{Onboarding, SetPasswordOutcome};
pub use state::{ActionOutcome, ProfileStatus, SessionPhase, SessionState};
