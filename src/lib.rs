pub mod common;
pub mod handler;
pub mod identity;
pub mod notify;
pub mod store;
pub mod test_utils;
pub mod validation;

pub use common::config::Config;
pub use handler::Waitlist;
