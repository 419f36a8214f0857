//! The cart store: a single task owning the cart, with stock validation and
//! persistence on every mutation.

pub mod error;
mod messages;
mod service;

pub use error::*;
pub use messages::*;
pub use service::*;
