//! Mail transports.
//!
//! Delivery to a real relay belongs to the host; these transports cover
//! development (log only) and tests (capture).

pub mod log;
pub mod recording;

pub use log::LogMailTransport;
pub use recording::RecordingMailTransport;
