//! Advisory tip source for the public OT display ticker.
//!
//! The ticker shows one short guidance line alongside the recency feed. The
//! line comes from a hosted generative model; fetching it is the only
//! operation in the system allowed to suspend. The ticker cache keeps the
//! last good line, so a slow or failed fetch never disturbs rendering.

pub mod prompts;
pub mod source;
pub mod ticker;

#[cfg(feature = "remote")]
pub mod remote;

pub use prompts::*;
pub use source::*;
pub use ticker::*;
