//! # Commands
//!
//! Everything an option can do besides opening a submenu becomes a
//! `Command`. Hooks are commands too: `SelectCompany` and `SelectCustomer`
//! run before their submenu is shown and fill the session.
//!
//! ```text
//! option chosen → Command → App::perform(...) → Flow (next menu)
//! ```
//!
//! Storage failures never end the session: they are logged, reported on the
//! console and navigation returns to the menu the command belongs to.

use std::io::{BufRead, Write};

use log::{info, warn};

use super::menus::{rebuild_companies, rebuild_customers};
use super::state::App;
use crate::console::Console;
use crate::error::AppError;
use crate::menu::{Action, Controller, Flow, MenuId, MenuOption, MenuTree};
use crate::store::{Company, Customer, CustomerId, Store, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    CreateCustomer,
    CreateCompany,
    ListCars,
    CreateCar,
    RentCar,
    ReturnCar,
    ShowRentedCar,
    /// Customer picked a company to rent from.
    ChooseRentalCompany,
    /// Customer picked a car from the chooser.
    RentSelectedCar,
    /// Hook: resolve the chosen company before the car menu.
    SelectCompany,
    /// Hook: resolve the chosen customer before the rental menu.
    SelectCustomer,
}

pub const ALREADY_RENTED: &str = "You've already rented a car!";
pub const NOT_RENTED: &str = "You didn't rent a car!";

impl<S: Store> Controller for App<S> {
    type Command = Command;
    type Error = AppError;

    fn before_show<R: BufRead, W: Write>(
        &mut self,
        hook: &Command,
        menus: &mut MenuTree<Command>,
        console: &mut Console<R, W>,
    ) -> Result<Option<Flow>, AppError> {
        match hook {
            Command::SelectCompany => self.select_company(menus, console),
            Command::SelectCustomer => self.select_customer(menus, console),
            other => {
                warn!("{other:?} is not a hook, ignoring");
                Ok(None)
            }
        }
    }

    fn perform<R: BufRead, W: Write>(
        &mut self,
        command: &Command,
        menus: &mut MenuTree<Command>,
        console: &mut Console<R, W>,
    ) -> Result<Flow, AppError> {
        match command {
            Command::CreateCustomer => self.create_customer(menus, console),
            Command::CreateCompany => self.create_company(menus, console),
            Command::ListCars => self.list_cars(console),
            Command::CreateCar => self.create_car(console),
            Command::RentCar => self.rent_car(menus, console),
            Command::ReturnCar => self.return_car(console),
            Command::ShowRentedCar => self.show_rented_car(console),
            Command::ChooseRentalCompany => self.choose_rental_company(menus, console),
            Command::RentSelectedCar => self.rent_selected_car(menus, console),
            // Bound directly, a hook selects and then enters its menu.
            Command::SelectCompany => Ok(self
                .select_company(menus, console)?
                .unwrap_or(Flow::Show(self.menus.cars))),
            Command::SelectCustomer => Ok(self
                .select_customer(menus, console)?
                .unwrap_or(Flow::Show(self.menus.rentals))),
        }
    }
}

impl<S: Store> App<S> {
    /// Logs a storage failure, tells the user, and continues at `back`.
    fn storage_failed<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
        what: &str,
        err: StoreError,
        back: MenuId,
    ) -> Result<Flow, AppError> {
        warn!("Failed to {what}: {err}");
        console.println(format!("Could not {what}: {err}"))?;
        Ok(Flow::Show(back))
    }

    fn prompt<R: BufRead, W: Write>(
        console: &mut Console<R, W>,
        question: &str,
    ) -> Result<String, AppError> {
        console.blank()?;
        console.println(question)?;
        Ok(console.read_line()?)
    }

    fn select_company<R: BufRead, W: Write>(
        &mut self,
        menus: &mut MenuTree<Command>,
        console: &mut Console<R, W>,
    ) -> Result<Option<Flow>, AppError> {
        let name = menus
            .selected_description(self.menus.manager_companies)?
            .unwrap_or_default()
            .to_string();
        match self.store.company_by_name(&name) {
            Ok(Some(company)) => {
                menus.set_title(self.menus.cars, format!("'{}' company: ", company.name))?;
                self.session.current_company = Some(company);
                Ok(None)
            }
            Ok(None) => {
                warn!("Company '{name}' vanished from the store");
                console.println(format!("The company '{name}' no longer exists!"))?;
                Ok(Some(Flow::Show(self.menus.manager)))
            }
            Err(e) => self
                .storage_failed(console, "load the company", e, self.menus.manager)
                .map(Some),
        }
    }

    fn select_customer<R: BufRead, W: Write>(
        &mut self,
        menus: &mut MenuTree<Command>,
        console: &mut Console<R, W>,
    ) -> Result<Option<Flow>, AppError> {
        let name = menus
            .selected_description(self.menus.customers)?
            .unwrap_or_default()
            .to_string();
        match self.store.customer_by_name(&name) {
            Ok(Some(customer)) => {
                menus.set_title(self.menus.rentals, format!("Welcome '{}': ", customer.name))?;
                self.session.current_customer = Some(customer);
                Ok(None)
            }
            Ok(None) => {
                warn!("Customer '{name}' vanished from the store");
                console.println(format!("The customer '{name}' no longer exists!"))?;
                Ok(Some(Flow::Show(self.menus.root)))
            }
            Err(e) => self
                .storage_failed(console, "load the customer", e, self.menus.root)
                .map(Some),
        }
    }

    fn create_customer<R: BufRead, W: Write>(
        &mut self,
        menus: &mut MenuTree<Command>,
        console: &mut Console<R, W>,
    ) -> Result<Flow, AppError> {
        let name = Self::prompt(console, "Enter the customer name:")?;
        match self.store.create_customer(&name) {
            Ok(customer) => {
                info!("Created customer {} '{}'", customer.id, customer.name);
                console.println("The customer was created!")?;
            }
            Err(e) => {
                self.storage_failed(console, "create the customer", e, self.menus.root)?;
            }
        }
        rebuild_customers(menus, &self.menus, &self.store)?;
        Ok(Flow::Show(self.menus.root))
    }

    fn create_company<R: BufRead, W: Write>(
        &mut self,
        menus: &mut MenuTree<Command>,
        console: &mut Console<R, W>,
    ) -> Result<Flow, AppError> {
        let name = Self::prompt(console, "Enter the company name:")?;
        match self.store.create_company(&name) {
            Ok(company) => {
                info!("Created company {} '{}'", company.id, company.name);
                console.println("The company was created!")?;
            }
            Err(e) => {
                self.storage_failed(console, "create the company", e, self.menus.manager)?;
            }
        }
        rebuild_companies(menus, &self.menus, &self.store)?;
        Ok(Flow::Show(self.menus.manager))
    }

    /// The company chosen by the last `SelectCompany`, or back to the manager menu.
    fn current_company(&self) -> Result<Company, Flow> {
        self.session
            .current_company
            .clone()
            .ok_or(Flow::Show(self.menus.manager))
    }

    fn current_customer(&self) -> Result<Customer, Flow> {
        self.session
            .current_customer
            .clone()
            .ok_or(Flow::Show(self.menus.root))
    }

    fn list_cars<R: BufRead, W: Write>(
        &mut self,
        console: &mut Console<R, W>,
    ) -> Result<Flow, AppError> {
        let company = match self.current_company() {
            Ok(company) => company,
            Err(flow) => return Ok(flow),
        };
        let cars = match self.store.cars_by_company(company.id) {
            Ok(cars) => cars,
            Err(e) => return self.storage_failed(console, "list the cars", e, self.menus.cars),
        };

        console.blank()?;
        console.println(format!("'{}' cars:", company.name))?;
        if cars.is_empty() {
            console.println("The car list is empty!")?;
        }
        for (i, car) in cars.iter().enumerate() {
            console.println(format!("{}. {}", i + 1, car.name))?;
        }
        Ok(Flow::Show(self.menus.cars))
    }

    fn create_car<R: BufRead, W: Write>(
        &mut self,
        console: &mut Console<R, W>,
    ) -> Result<Flow, AppError> {
        let company = match self.current_company() {
            Ok(company) => company,
            Err(flow) => return Ok(flow),
        };
        let name = Self::prompt(console, "Enter the car name:")?;
        match self.store.create_car(&name, company.id) {
            Ok(car) => {
                info!("Created car {} '{}' for company {}", car.id, car.name, company.id);
                console.println("The car was added!")?;
                Ok(Flow::Show(self.menus.cars))
            }
            Err(e) => self.storage_failed(console, "add the car", e, self.menus.cars),
        }
    }

    fn rent_car<R: BufRead, W: Write>(
        &mut self,
        menus: &mut MenuTree<Command>,
        console: &mut Console<R, W>,
    ) -> Result<Flow, AppError> {
        let customer = match self.current_customer() {
            Ok(customer) => customer,
            Err(flow) => return Ok(flow),
        };
        menus.set_parent_menu(self.menus.customer_companies, Some(self.menus.rentals))?;

        if customer.rented_car_id.is_some() {
            console.blank()?;
            console.println(ALREADY_RENTED)?;
            return Ok(Flow::Show(self.menus.rentals));
        }

        let count = menus.get(self.menus.customer_companies)?.len();
        for i in 0..count {
            menus.bind_action(
                self.menus.customer_companies,
                i,
                Action::Command(Command::ChooseRentalCompany),
            )?;
        }
        Ok(Flow::Show(self.menus.customer_companies))
    }

    fn choose_rental_company<R: BufRead, W: Write>(
        &mut self,
        menus: &mut MenuTree<Command>,
        console: &mut Console<R, W>,
    ) -> Result<Flow, AppError> {
        let rentals = self.menus.rentals;
        let name = menus
            .selected_description(self.menus.customer_companies)?
            .unwrap_or_default()
            .to_string();
        let company = match self.store.company_by_name(&name) {
            Ok(Some(company)) => company,
            Ok(None) => {
                console.println(format!("The company '{name}' no longer exists!"))?;
                return Ok(Flow::Show(rentals));
            }
            Err(e) => return self.storage_failed(console, "load the company", e, rentals),
        };
        let cars = match self.store.available_cars(company.id) {
            Ok(cars) => cars,
            Err(e) => return self.storage_failed(console, "list the cars", e, rentals),
        };

        menus.set_options_list(
            self.menus.car_chooser,
            cars.into_iter()
                .map(|car| MenuOption::with_action(car.name, Action::Command(Command::RentSelectedCar)))
                .collect(),
        )?;
        menus.set_parent_menu(self.menus.car_chooser, Some(rentals))?;
        Ok(Flow::Show(self.menus.car_chooser))
    }

    fn rent_selected_car<R: BufRead, W: Write>(
        &mut self,
        menus: &mut MenuTree<Command>,
        console: &mut Console<R, W>,
    ) -> Result<Flow, AppError> {
        let rentals = self.menus.rentals;
        let customer = match self.current_customer() {
            Ok(customer) => customer,
            Err(flow) => return Ok(flow),
        };
        let name = menus
            .selected_description(self.menus.car_chooser)?
            .unwrap_or_default()
            .to_string();
        let car = match self.store.car_by_name(&name) {
            Ok(Some(car)) => car,
            Ok(None) => {
                console.println(format!("The car '{name}' no longer exists!"))?;
                return Ok(Flow::Show(rentals));
            }
            Err(e) => return self.storage_failed(console, "load the car", e, rentals),
        };

        if let Err(e) = self.store.set_rented_car(&customer.name, Some(car.id)) {
            return self.storage_failed(console, "rent the car", e, rentals);
        }
        info!("Customer '{}' rented car {} '{}'", customer.name, car.id, car.name);
        self.refresh_customer(customer.id);
        console.println(format!("You rented '{}'", car.name))?;
        Ok(Flow::Show(rentals))
    }

    fn return_car<R: BufRead, W: Write>(
        &mut self,
        console: &mut Console<R, W>,
    ) -> Result<Flow, AppError> {
        let rentals = self.menus.rentals;
        let customer = match self.current_customer() {
            Ok(customer) => customer,
            Err(flow) => return Ok(flow),
        };

        console.blank()?;
        if customer.rented_car_id.is_none() {
            console.println(NOT_RENTED)?;
            return Ok(Flow::Show(rentals));
        }
        if let Err(e) = self.store.set_rented_car(&customer.name, None) {
            return self.storage_failed(console, "return the car", e, rentals);
        }
        info!("Customer '{}' returned their car", customer.name);
        self.refresh_customer(customer.id);
        console.println("You've returned a rented car!")?;
        Ok(Flow::Show(rentals))
    }

    fn show_rented_car<R: BufRead, W: Write>(
        &mut self,
        console: &mut Console<R, W>,
    ) -> Result<Flow, AppError> {
        let rentals = self.menus.rentals;
        let customer = match self.current_customer() {
            Ok(customer) => customer,
            Err(flow) => return Ok(flow),
        };

        console.blank()?;
        let Some(car_id) = customer.rented_car_id else {
            console.println(NOT_RENTED)?;
            return Ok(Flow::Show(rentals));
        };
        let car = match self.store.car_by_id(car_id) {
            Ok(Some(car)) => car,
            Ok(None) => {
                console.println(NOT_RENTED)?;
                return Ok(Flow::Show(rentals));
            }
            Err(e) => return self.storage_failed(console, "load the car", e, rentals),
        };
        let company = match self.store.company_by_id(car.company_id) {
            Ok(company) => company.map(|c| c.name).unwrap_or_default(),
            Err(e) => return self.storage_failed(console, "load the company", e, rentals),
        };

        console.println("You rented car:")?;
        console.println(&car.name)?;
        console.println("Company:")?;
        console.println(&company)?;
        Ok(Flow::Show(rentals))
    }

    /// Re-reads the session customer so its rental slot matches the store.
    fn refresh_customer(&mut self, id: CustomerId) {
        match self.store.customer_by_id(id) {
            Ok(customer) => self.session.current_customer = customer,
            Err(e) => warn!("Failed to refresh customer {id}: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{CarRepository, CompanyRepository, CustomerRepository};
    use crate::test_support::{output, scripted_console, test_app};

    #[test]
    fn test_select_company_fills_session_and_title() {
        let (mut app, mut tree) = test_app();
        let mut console = scripted_console("");
        tree.select(app.menus.manager_companies, 2).unwrap();

        let flow = app
            .before_show(&Command::SelectCompany, &mut tree, &mut console)
            .unwrap();

        assert_eq!(flow, None);
        assert_eq!(app.session.current_company.as_ref().unwrap().name, "Tesla");
        assert_eq!(tree.get(app.menus.cars).unwrap().title(), Some("'Tesla' company: "));
    }

    #[test]
    fn test_select_customer_fills_session_and_title() {
        let (mut app, mut tree) = test_app();
        let mut console = scripted_console("");
        tree.select(app.menus.customers, 1).unwrap();

        app.before_show(&Command::SelectCustomer, &mut tree, &mut console)
            .unwrap();

        assert_eq!(app.session.current_customer.as_ref().unwrap().name, "Alice");
        assert_eq!(tree.get(app.menus.rentals).unwrap().title(), Some("Welcome 'Alice': "));
    }

    #[test]
    fn test_rent_car_refuses_second_rental() {
        let (mut app, mut tree) = test_app();
        let civic = app.store.car_by_name("Civic").unwrap().unwrap();
        app.store.set_rented_car("Alice", Some(civic.id)).unwrap();
        app.session.current_customer = app.store.customer_by_name("Alice").unwrap();
        let mut console = scripted_console("");

        let flow = app.perform(&Command::RentCar, &mut tree, &mut console).unwrap();

        assert_eq!(flow, Flow::Show(app.menus.rentals));
        assert!(output(&console).contains(ALREADY_RENTED));
        assert_eq!(
            app.store.customer_by_name("Alice").unwrap().unwrap().rented_car_id,
            Some(civic.id)
        );
    }

    #[test]
    fn test_rent_car_binds_companies_and_reparents() {
        let (mut app, mut tree) = test_app();
        app.session.current_customer = app.store.customer_by_name("Bob").unwrap();
        tree.set_parent_menu(app.menus.customer_companies, None).unwrap();
        let mut console = scripted_console("");

        let flow = app.perform(&Command::RentCar, &mut tree, &mut console).unwrap();

        let companies = tree.get(app.menus.customer_companies).unwrap();
        assert_eq!(flow, Flow::Show(app.menus.customer_companies));
        assert_eq!(companies.parent(), Some(app.menus.rentals));
        assert!(companies
            .options()
            .iter()
            .all(|o| o.action() == &Action::Command(Command::ChooseRentalCompany)));
    }

    #[test]
    fn test_return_without_rental_leaves_state() {
        let (mut app, mut tree) = test_app();
        app.session.current_customer = app.store.customer_by_name("Bob").unwrap();
        let before = app.session.clone();
        let mut console = scripted_console("");

        app.perform(&Command::ReturnCar, &mut tree, &mut console).unwrap();

        assert!(output(&console).contains(NOT_RENTED));
        assert_eq!(app.session, before);
        assert_eq!(app.store.customer_by_name("Bob").unwrap().unwrap().rented_car_id, None);
    }

    #[test]
    fn test_return_clears_rental() {
        let (mut app, mut tree) = test_app();
        let civic = app.store.car_by_name("Civic").unwrap().unwrap();
        app.store.set_rented_car("Bob", Some(civic.id)).unwrap();
        app.session.current_customer = app.store.customer_by_name("Bob").unwrap();
        let mut console = scripted_console("");

        app.perform(&Command::ReturnCar, &mut tree, &mut console).unwrap();

        assert!(output(&console).contains("You've returned a rented car!"));
        assert_eq!(app.session.current_customer.unwrap().rented_car_id, None);
        assert_eq!(app.store.customer_by_name("Bob").unwrap().unwrap().rented_car_id, None);
    }

    #[test]
    fn test_show_rented_car_prints_car_and_company() {
        let (mut app, mut tree) = test_app();
        let model3 = app.store.car_by_name("Model 3").unwrap().unwrap();
        app.store.set_rented_car("Bob", Some(model3.id)).unwrap();
        app.session.current_customer = app.store.customer_by_name("Bob").unwrap();
        let mut console = scripted_console("");

        app.perform(&Command::ShowRentedCar, &mut tree, &mut console).unwrap();

        assert_eq!(output(&console), "\nYou rented car:\nModel 3\nCompany:\nTesla\n");
    }

    #[test]
    fn test_list_cars_without_company_returns_to_manager() {
        let (mut app, mut tree) = test_app();
        let mut console = scripted_console("");

        let flow = app.perform(&Command::ListCars, &mut tree, &mut console).unwrap();

        assert_eq!(flow, Flow::Show(app.menus.manager));
        assert_eq!(output(&console), "");
    }

    #[test]
    fn test_list_cars_prints_numbered_list() {
        let (mut app, mut tree) = test_app();
        app.session.current_company = app.store.company_by_name("Acme").unwrap();
        let mut console = scripted_console("");

        app.perform(&Command::ListCars, &mut tree, &mut console).unwrap();

        assert_eq!(output(&console), "\n'Acme' cars:\n1. Civic\n2. Corolla\n");
    }

    #[test]
    fn test_create_duplicate_company_is_reported() {
        let (mut app, mut tree) = test_app();
        let mut console = scripted_console("Acme\n");

        let flow = app.perform(&Command::CreateCompany, &mut tree, &mut console).unwrap();

        let out = output(&console);
        assert_eq!(flow, Flow::Show(app.menus.manager));
        assert!(out.contains("Could not create the company"));
        assert!(!out.contains("The company was created!"));
        assert_eq!(app.store.companies().unwrap().len(), 2);
    }

    #[test]
    fn test_choose_rental_company_rebuilds_chooser() {
        let (mut app, mut tree) = test_app();
        let civic = app.store.car_by_name("Civic").unwrap().unwrap();
        app.store.set_rented_car("Alice", Some(civic.id)).unwrap();
        tree.select(app.menus.customer_companies, 1).unwrap();
        let mut console = scripted_console("");

        let flow = app
            .perform(&Command::ChooseRentalCompany, &mut tree, &mut console)
            .unwrap();

        let chooser = tree.get(app.menus.car_chooser).unwrap();
        assert_eq!(flow, Flow::Show(app.menus.car_chooser));
        let names: Vec<&str> = chooser.options().iter().map(|o| o.description()).collect();
        assert_eq!(names, vec!["Corolla"]);
        assert_eq!(
            chooser.options()[0].action(),
            &Action::Command(Command::RentSelectedCar)
        );
    }
}
