//! Token value objects and signed-request verification.

pub mod signed_request;
pub mod token;

pub use signed_request::*;
pub use token::*;
