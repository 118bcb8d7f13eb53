//! Terminal user interface for negentropy.
//!
//! A keyboard-driven timer: tabs of tasks across the top, the running
//! stopwatch in the middle, and a status and help line at the bottom. All
//! behavior lives in [`Machine`]; the rest of this module feeds it events
//! and draws what it reports.

mod app;
mod confirm;
mod event;
mod input;
mod keymap;
mod machine;
mod notifications;
mod tabs;
mod view;

pub use app::{MAX_POLL, run_tui};
pub use confirm::{Answer, ConfirmationGate, PendingAction, Resolution};
pub use event::{Command, Event, EventQueue};
pub use input::{CHAR_LIMIT, TextInput};
pub use keymap::{Binding, KeyPress, Keymap};
pub use machine::{InteractionState, Machine, Snapshot, TabLabel};
pub use notifications::{NotificationLevel, StatusMessage};
pub use tabs::{Selection, Tabs};
pub use view::{Palette, productivity_ratio, render};
