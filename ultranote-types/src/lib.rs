#![deny(missing_docs)]
//! Shared types for ultranote.
//!
//! These types sit between the Stream Source (a remote completion endpoint),
//! the SSE decoder in `ultranote-sse`, and whatever renders the generated
//! notes. Nothing here performs I/O.

pub mod error;
pub mod mode;
pub mod request;
pub mod sink;
pub mod stream;

pub use error::*;
pub use mode::*;
pub use request::*;
pub use sink::*;
pub use stream::*;
