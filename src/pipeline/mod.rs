//! Pipeline stages for one poll cycle.
//!
//! - `validate`: API response contract check
//! - `interpret`: status code to notification text
//! - `poll`: the watcher loop

pub mod interpret;
pub mod poll;
pub mod validate;

pub use interpret::interpret;
pub use poll::Watcher;
pub use validate::validate;
