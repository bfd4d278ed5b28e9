//! Push notifications for Vitae.
//!
//! The agent pings the person it represents whenever a visitor leaves
//! contact details or asks something the background text can't answer.
//! Delivery goes through the Pushover messages API as a single form POST.

pub mod pushover;

pub use pushover::{PushoverConfig, PushoverNotifier};
