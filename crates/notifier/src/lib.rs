//! Notification worker: drains the application stream and delivers email.

pub mod email;
pub mod shutdown;
pub mod worker;
