//! Car sharing console: a numbered-menu front end over companies, cars
//! and customers.

pub mod console;
pub mod core;
pub mod error;
pub mod menu;
pub mod store;

#[cfg(test)]
pub mod test_support;

pub use error::AppError;
