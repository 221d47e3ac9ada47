//! In-memory chat state for summzy.
//!
//! [`SessionStore`] keeps one document conversation per chat, and
//! [`Throttle`] limits how often non-admin users may trigger AI requests.
//! Both are thread-safe and live only as long as the process.

mod store;
mod throttle;

pub use store::{ChatSession, ChatTurn, Role, SessionStore};
pub use throttle::{Throttle, ThrottleDecision};
