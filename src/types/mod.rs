//! Request and response types for the Kinesis listing operations.
//!
//! Field names follow the AWS JSON 1.1 wire format (`PascalCase`).

mod common;
mod requests;
mod responses;

pub use common::*;
pub use requests::*;
pub use responses::*;
