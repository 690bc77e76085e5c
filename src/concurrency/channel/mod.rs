//! Blocking channels used by the serialized worker.
//!
//! `mpsc` carries requests from any number of callers to the one worker;
//! `oneshot` carries each reply back to the caller that is waiting for it.

pub mod mpsc;
pub mod oneshot;
