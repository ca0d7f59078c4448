//! # Application State
//!
//! ```text
//! App<S: Store>
//! ├── store: S            // companies, cars, customers
//! ├── session: Session    // current company / current customer
//! └── menus: Menus        // ids of every menu in the tree
//! ```
//!
//! The session is set by pre-display hooks on entry into a company or a
//! customer menu and read by the commands below them. It is owned by the
//! app and handed to nothing else, so sibling scopes cannot race on it.

use crate::menu::MenuId;
use crate::store::{Company, Customer, Store};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Session {
    pub current_company: Option<Company>,
    pub current_customer: Option<Customer>,
}

/// Every menu of the application, wired once at startup.
#[derive(Debug, Clone, Copy)]
pub struct Menus {
    pub root: MenuId,
    pub manager: MenuId,
    pub manager_companies: MenuId,
    pub customer_companies: MenuId,
    pub customers: MenuId,
    pub cars: MenuId,
    pub rentals: MenuId,
    pub car_chooser: MenuId,
}

pub struct App<S: Store> {
    pub store: S,
    pub session: Session,
    pub menus: Menus,
}

impl<S: Store> App<S> {
    pub fn new(store: S, menus: Menus) -> Self {
        Self {
            store,
            session: Session::default(),
            menus,
        }
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
