//! # JSON Database
//!
//! All three tables live in one JSON document. The file is read once when
//! the database is opened and rewritten after every mutation.
//!
//! Writes use atomic rename (write `.tmp`, then `rename()`) so a crash never
//! leaves a half-written file. A mutation is applied to a copy of the
//! tables first; memory only changes once the file write succeeded.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::{
    Car, CarId, CarRepository, Company, CompanyId, CompanyRepository, Customer, CustomerId,
    CustomerRepository, Result, StoreError,
};

const COMPANY: &str = "company";
const CAR: &str = "car";
const CUSTOMER: &str = "customer";

#[derive(Serialize, Deserialize, Clone, Debug)]
struct Tables {
    #[serde(default)]
    companies: Vec<Company>,
    #[serde(default)]
    cars: Vec<Car>,
    #[serde(default)]
    customers: Vec<Customer>,
    next_company_id: CompanyId,
    next_car_id: CarId,
    next_customer_id: CustomerId,
    /// Unix timestamp of the last write.
    saved_at: i64,
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            companies: Vec::new(),
            cars: Vec::new(),
            customers: Vec::new(),
            next_company_id: 1,
            next_car_id: 1,
            next_customer_id: 1,
            saved_at: 0,
        }
    }
}

#[derive(Debug)]
pub struct Database {
    /// `None` keeps everything in memory.
    path: Option<PathBuf>,
    tables: Tables,
}

impl Database {
    /// Opens the database file, creating it (and its directory) if missing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        if path.exists() {
            let json = fs::read_to_string(&path)?;
            let tables: Tables = serde_json::from_str(&json)?;
            info!(
                "Opened database {} ({} companies, {} cars, {} customers)",
                path.display(),
                tables.companies.len(),
                tables.cars.len(),
                tables.customers.len()
            );
            return Ok(Self {
                path: Some(path),
                tables,
            });
        }

        info!("Creating database {}", path.display());
        let mut tables = Tables::default();
        tables.saved_at = Utc::now().timestamp();
        atomic_write_json(&path, &tables)?;
        Ok(Self {
            path: Some(path),
            tables,
        })
    }

    pub fn in_memory() -> Self {
        Self {
            path: None,
            tables: Tables::default(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Applies `change` to a copy of the tables, persists it, then commits.
    fn apply<T>(&mut self, change: impl FnOnce(&mut Tables) -> Result<T>) -> Result<T> {
        let mut next = self.tables.clone();
        let value = change(&mut next)?;
        next.saved_at = Utc::now().timestamp();
        if let Some(path) = &self.path {
            atomic_write_json(path, &next)?;
            debug!("Database saved to {}", path.display());
        }
        self.tables = next;
        Ok(value)
    }

    /// Deletes a company together with its cars and any rentals of them.
    pub fn delete_company(&mut self, id: CompanyId) -> Result<()> {
        self.apply(|t| {
            if !t.companies.iter().any(|c| c.id == id) {
                return Err(StoreError::MissingReference { table: COMPANY, id });
            }
            t.companies.retain(|c| c.id != id);
            let removed: Vec<CarId> = t
                .cars
                .iter()
                .filter(|car| car.company_id == id)
                .map(|car| car.id)
                .collect();
            t.cars.retain(|car| car.company_id != id);
            for customer in &mut t.customers {
                if customer.rented_car_id.is_some_and(|car| removed.contains(&car)) {
                    customer.rented_car_id = None;
                }
            }
            Ok(())
        })
    }

    /// Deletes a car and clears any customer's rental of it.
    pub fn delete_car(&mut self, id: CarId) -> Result<()> {
        self.apply(|t| {
            if !t.cars.iter().any(|c| c.id == id) {
                return Err(StoreError::MissingReference { table: CAR, id });
            }
            t.cars.retain(|c| c.id != id);
            for customer in &mut t.customers {
                if customer.rented_car_id == Some(id) {
                    customer.rented_car_id = None;
                }
            }
            Ok(())
        })
    }
}

/// Atomically write `data` as JSON to `path` (via `.tmp` + rename).
fn atomic_write_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    let tmp_path = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(data)?;
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

fn duplicate(table: &'static str, name: &str) -> StoreError {
    StoreError::Duplicate {
        table,
        name: name.to_string(),
    }
}

impl CompanyRepository for Database {
    fn create_company(&mut self, name: &str) -> Result<Company> {
        self.apply(|t| {
            if t.companies.iter().any(|c| c.name == name) {
                return Err(duplicate(COMPANY, name));
            }
            let company = Company {
                id: t.next_company_id,
                name: name.to_string(),
            };
            t.next_company_id += 1;
            t.companies.push(company.clone());
            Ok(company)
        })
    }

    fn companies(&self) -> Result<Vec<Company>> {
        let mut companies = self.tables.companies.clone();
        companies.sort_by_key(|c| c.id);
        Ok(companies)
    }

    fn company_by_name(&self, name: &str) -> Result<Option<Company>> {
        Ok(self.tables.companies.iter().find(|c| c.name == name).cloned())
    }

    fn company_by_id(&self, id: CompanyId) -> Result<Option<Company>> {
        Ok(self.tables.companies.iter().find(|c| c.id == id).cloned())
    }
}

impl CarRepository for Database {
    fn create_car(&mut self, name: &str, company_id: CompanyId) -> Result<Car> {
        self.apply(|t| {
            if !t.companies.iter().any(|c| c.id == company_id) {
                return Err(StoreError::MissingReference {
                    table: COMPANY,
                    id: company_id,
                });
            }
            if t.cars.iter().any(|c| c.name == name) {
                return Err(duplicate(CAR, name));
            }
            let car = Car {
                id: t.next_car_id,
                name: name.to_string(),
                company_id,
            };
            t.next_car_id += 1;
            t.cars.push(car.clone());
            Ok(car)
        })
    }

    fn cars_by_company(&self, company_id: CompanyId) -> Result<Vec<Car>> {
        let mut cars: Vec<Car> = self
            .tables
            .cars
            .iter()
            .filter(|c| c.company_id == company_id)
            .cloned()
            .collect();
        cars.sort_by_key(|c| c.id);
        Ok(cars)
    }

    fn available_cars(&self, company_id: CompanyId) -> Result<Vec<Car>> {
        let rented: Vec<CarId> = self
            .tables
            .customers
            .iter()
            .filter_map(|c| c.rented_car_id)
            .collect();
        let mut cars = self.cars_by_company(company_id)?;
        cars.retain(|car| !rented.contains(&car.id));
        Ok(cars)
    }

    fn car_by_name(&self, name: &str) -> Result<Option<Car>> {
        Ok(self.tables.cars.iter().find(|c| c.name == name).cloned())
    }

    fn car_by_id(&self, id: CarId) -> Result<Option<Car>> {
        Ok(self.tables.cars.iter().find(|c| c.id == id).cloned())
    }
}

impl CustomerRepository for Database {
    fn create_customer(&mut self, name: &str) -> Result<Customer> {
        self.apply(|t| {
            if t.customers.iter().any(|c| c.name == name) {
                return Err(duplicate(CUSTOMER, name));
            }
            let customer = Customer {
                id: t.next_customer_id,
                name: name.to_string(),
                rented_car_id: None,
            };
            t.next_customer_id += 1;
            t.customers.push(customer.clone());
            Ok(customer)
        })
    }

    fn customers(&self) -> Result<Vec<Customer>> {
        let mut customers = self.tables.customers.clone();
        customers.sort_by_key(|c| c.id);
        Ok(customers)
    }

    fn customer_by_name(&self, name: &str) -> Result<Option<Customer>> {
        Ok(self.tables.customers.iter().find(|c| c.name == name).cloned())
    }

    fn customer_by_id(&self, id: CustomerId) -> Result<Option<Customer>> {
        Ok(self.tables.customers.iter().find(|c| c.id == id).cloned())
    }

    fn set_rented_car(&mut self, name: &str, car_id: Option<CarId>) -> Result<()> {
        self.apply(|t| {
            if let Some(id) = car_id {
                if !t.cars.iter().any(|c| c.id == id) {
                    return Err(StoreError::MissingReference { table: CAR, id });
                }
            }
            let customer = t
                .customers
                .iter_mut()
                .find(|c| c.name == name)
                .ok_or_else(|| StoreError::NotFound {
                    table: CUSTOMER,
                    name: name.to_string(),
                })?;
            customer.rented_car_id = car_id;
            Ok(())
        })
    }
}
