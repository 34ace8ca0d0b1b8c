pub mod config;
pub mod event;
pub mod medicine;
pub mod reminder;

pub use event::{DisplayStatus, EventStatus, ReminderEvent};
pub use medicine::Medicine;
pub use reminder::{Recurrence, Reminder};
