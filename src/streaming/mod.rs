//! HTTP range streaming.
//!
//! [`range`] turns a `Range` header into a validated byte window and
//! [`direct`] serves the corresponding 200/206 response with a lazy,
//! flow-controlled body.

pub mod direct;
pub mod range;

pub use range::ParsedRange;
