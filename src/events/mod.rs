//! Messages exchanged between threads.
//!
//! - [`audio`] – commands for the audio thread and its replies
pub mod audio;
