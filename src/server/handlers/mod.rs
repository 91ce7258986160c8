//! Endpoint HTTP handlers.

mod health;
mod parse;
mod signatures;

pub use health::health_handler;
pub use parse::parse_website_handler;
pub use signatures::signatures_handler;
