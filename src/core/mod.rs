//! Domain types and display logic shared by the TUI and the one-shot
//! commands.

pub mod format;
pub mod state;
pub mod symbol;

pub use state::{
    parse_positive_pair, DashboardState, FormState, Notification, Severity, UiStatus,
    NOTIFICATION_TTL,
};
pub use symbol::Symbol;
