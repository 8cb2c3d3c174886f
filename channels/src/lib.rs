//! Blocking hand-off channels shared between threads.

mod message;

pub use message::MessageChannel;
