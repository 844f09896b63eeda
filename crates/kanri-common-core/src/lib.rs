//! Core types shared across the Kanri workspace.

pub mod error;
pub mod slug;
pub mod tasknum;
pub mod timestamp;

pub use error::{Error, Result};
pub use slug::Slug;
pub use tasknum::TaskNumber;
pub use timestamp::Timestamp;
