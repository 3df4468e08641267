//! Credential models handed to the driver by injected prompts.

pub mod prompt;
pub mod secret;

pub use prompt::*;
pub use secret::*;
