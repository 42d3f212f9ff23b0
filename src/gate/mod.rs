//! Gate Module - The turn-gating interaction filter
//!
//! Every gated input goes intercept → lock → prompt → resolve → replay or
//! suppress:
//!
//! - **TurnGate** - Owns the state machine, decides per event
//! - **Presenter** - Shows one question per turn, first answer counts
//! - **EventReplay** - Rebuilds and redelivers the held-back event
//! - **InputInterceptor** - Capture-phase listeners feeding the gate
//! - **TransientNotifier** - "Turn skipped" notices that dismiss themselves

mod interceptor;
mod notifier;
mod presenter;
mod replay;
mod state;
mod turn_gate;

pub use interceptor::*;
pub use notifier::*;
pub use presenter::*;
pub use replay::*;
pub use state::*;
pub use turn_gate::*;
