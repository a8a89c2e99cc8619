//! Notifier adapters.

mod recording;

pub use recording::{Delivery, RecordingNotifier};
