//! # Menu Layout
//!
//! Builds the fixed menu tree and rebuilds the record-driven lists.
//!
//! ```text
//! root "Welcome select an option: "
//! ├── 1. Log in as a manager ──▶ manager
//! │     ├── 1. Company list ──▶ manager_companies ─[select company]─▶ cars (back: manager)
//! │     └── 2. Create a company
//! ├── 2. Log in as a customer ─▶ customers ─[select customer]─▶ rentals (back: root)
//! │                                 rentals: 1. Rent a car ──▶ customer_companies ──▶ car_chooser
//! └── 3. Create a customer
//! ```

use log::{debug, warn};

use super::action::Command;
use super::state::Menus;
use crate::menu::{Action, Menu, MenuError, MenuOption, MenuTree};
use crate::store::Store;

pub const COMPANY_LIST_EMPTY: &str = "The company list is empty!";
pub const CUSTOMER_LIST_EMPTY: &str = "The customer list is empty!";
pub const NO_AVAILABLE_CARS: &str = "No available cars!";

fn fixed(names: &[&str]) -> Vec<MenuOption<Command>> {
    names.iter().map(|n| MenuOption::new(*n)).collect()
}

/// Creates every menu, binds the fixed options and fills the record lists.
pub fn build<S: Store>(tree: &mut MenuTree<Command>, store: &S) -> Result<Menus, MenuError> {
    let root = tree.insert(
        Menu::new(fixed(&[
            "Log in as a manager",
            "Log in as a customer",
            "Create a customer",
        ]))
        .with_title("Welcome select an option: "),
    );
    let manager = tree.insert(Menu::new(fixed(&["Company list", "Create a company"])));
    let manager_companies = tree.insert(
        Menu::new(Vec::new())
            .with_title("Choose a company: ")
            .with_empty_message(COMPANY_LIST_EMPTY),
    );
    let customer_companies = tree.insert(
        Menu::new(Vec::new())
            .with_title("Choose a company: ")
            .with_empty_message(COMPANY_LIST_EMPTY),
    );
    let customers = tree.insert(
        Menu::new(Vec::new())
            .with_title("Choose a customer: ")
            .with_empty_message(CUSTOMER_LIST_EMPTY),
    );
    let cars = tree.insert(Menu::new(fixed(&["Car list", "Create a car"])));
    let rentals = tree.insert(Menu::new(fixed(&[
        "Rent a car",
        "Return a rented car",
        "My rented car",
    ])));
    let car_chooser = tree.insert(
        Menu::new(Vec::new())
            .with_title("Choose a car: ")
            .with_empty_message(NO_AVAILABLE_CARS),
    );

    let menus = Menus {
        root,
        manager,
        manager_companies,
        customer_companies,
        customers,
        cars,
        rentals,
        car_chooser,
    };

    tree.add_sub_menu(root, 0, manager, None, None)?;
    tree.add_sub_menu(root, 1, customers, None, None)?;
    tree.bind_action(root, 2, Action::Command(Command::CreateCustomer))?;

    tree.add_sub_menu(manager, 0, manager_companies, None, None)?;
    tree.bind_action(manager, 1, Action::Command(Command::CreateCompany))?;

    tree.bind_action(cars, 0, Action::Command(Command::ListCars))?;
    tree.bind_action(cars, 1, Action::Command(Command::CreateCar))?;
    tree.set_parent_menu(cars, Some(manager))?;

    tree.bind_action(rentals, 0, Action::Command(Command::RentCar))?;
    tree.bind_action(rentals, 1, Action::Command(Command::ReturnCar))?;
    tree.bind_action(rentals, 2, Action::Command(Command::ShowRentedCar))?;
    tree.set_parent_menu(rentals, Some(root))?;

    tree.set_parent_menu(customer_companies, Some(rentals))?;
    tree.set_parent_menu(car_chooser, Some(rentals))?;

    rebuild_companies(tree, &menus, store)?;
    rebuild_customers(tree, &menus, store)?;
    Ok(menus)
}

/// Refreshes both company lists from the store and re-wires their options.
///
/// A storage failure leaves the lists as they were.
pub fn rebuild_companies<S: Store>(
    tree: &mut MenuTree<Command>,
    menus: &Menus,
    store: &S,
) -> Result<(), MenuError> {
    let companies = match store.companies() {
        Ok(companies) => companies,
        Err(e) => {
            warn!("Failed to list companies: {e}");
            return Ok(());
        }
    };
    let names: Vec<String> = companies.into_iter().map(|c| c.name).collect();
    debug!("Rebuilding company lists with {} entries", names.len());

    tree.set_options_list(
        menus.manager_companies,
        names.iter().map(MenuOption::new).collect(),
    )?;
    for i in 0..names.len() {
        tree.add_sub_menu(
            menus.manager_companies,
            i,
            menus.cars,
            Some(Command::SelectCompany),
            Some(menus.manager),
        )?;
    }

    tree.set_options_list(
        menus.customer_companies,
        names
            .iter()
            .map(|name| MenuOption::with_action(name, Action::Command(Command::ChooseRentalCompany)))
            .collect(),
    )?;
    Ok(())
}

/// Refreshes the customer list from the store and re-wires its options.
pub fn rebuild_customers<S: Store>(
    tree: &mut MenuTree<Command>,
    menus: &Menus,
    store: &S,
) -> Result<(), MenuError> {
    let customers = match store.customers() {
        Ok(customers) => customers,
        Err(e) => {
            warn!("Failed to list customers: {e}");
            return Ok(());
        }
    };
    debug!("Rebuilding customer list with {} entries", customers.len());

    tree.set_options_list(
        menus.customers,
        customers.iter().map(|c| MenuOption::new(c.name.as_str())).collect(),
    )?;
    for i in 0..customers.len() {
        tree.add_sub_menu(
            menus.customers,
            i,
            menus.rentals,
            Some(Command::SelectCustomer),
            Some(menus.root),
        )?;
    }
    Ok(())
}
