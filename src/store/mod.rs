//! # Record Stores
//!
//! Companies own cars; customers hold at most one rented car.
//!
//! ```text
//! Company ◀── company_id ── Car ◀── rented_car_id ── Customer
//!   (delete cascades to cars)   (delete clears the rental)
//! ```
//!
//! The menu layer only sees the three repository traits. [`Database`] is the
//! JSON-file implementation used by the binary and the tests.

pub mod database;

use thiserror::Error;

use serde::{Deserialize, Serialize};

pub use database::Database;

pub type CompanyId = u32;
pub type CarId = u32;
pub type CustomerId = u32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Car {
    pub id: CarId,
    pub name: String,
    pub company_id: CompanyId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    #[serde(default)]
    pub rented_car_id: Option<CarId>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage format error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{table} named '{name}' already exists")]
    Duplicate { table: &'static str, name: String },
    #[error("{table} {id} does not exist")]
    MissingReference { table: &'static str, id: u32 },
    #[error("{table} named '{name}' does not exist")]
    NotFound { table: &'static str, name: String },
}

pub type Result<T> = std::result::Result<T, StoreError>;

pub trait CompanyRepository {
    fn create_company(&mut self, name: &str) -> Result<Company>;

    /// All companies, ascending by id.
    fn companies(&self) -> Result<Vec<Company>>;

    fn company_by_name(&self, name: &str) -> Result<Option<Company>>;

    fn company_by_id(&self, id: CompanyId) -> Result<Option<Company>>;
}

pub trait CarRepository {
    fn create_car(&mut self, name: &str, company_id: CompanyId) -> Result<Car>;

    /// Cars of one company, ascending by id.
    fn cars_by_company(&self, company_id: CompanyId) -> Result<Vec<Car>>;

    /// Cars of one company that no customer currently holds.
    fn available_cars(&self, company_id: CompanyId) -> Result<Vec<Car>>;

    fn car_by_name(&self, name: &str) -> Result<Option<Car>>;

    fn car_by_id(&self, id: CarId) -> Result<Option<Car>>;
}

pub trait CustomerRepository {
    fn create_customer(&mut self, name: &str) -> Result<Customer>;

    /// All customers, ascending by id.
    fn customers(&self) -> Result<Vec<Customer>>;

    fn customer_by_name(&self, name: &str) -> Result<Option<Customer>>;

    fn customer_by_id(&self, id: CustomerId) -> Result<Option<Customer>>;

    /// Sets or clears (`None`) the customer's single rental slot.
    fn set_rented_car(&mut self, name: &str, car_id: Option<CarId>) -> Result<()>;
}

/// Everything the application needs from storage.
pub trait Store: CompanyRepository + CarRepository + CustomerRepository {}

impl<T: CompanyRepository + CarRepository + CustomerRepository> Store for T {}
