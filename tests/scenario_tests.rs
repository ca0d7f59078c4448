use std::io::Cursor;

use carsharing::console::Console;
use carsharing::core::run;
use carsharing::store::{
    CarRepository, CompanyRepository, CustomerRepository, Database,
};

// ============================================================================
// Helper Functions
// ============================================================================

/// Runs a whole session over `store` with scripted input.
/// Returns the store afterwards and everything printed.
fn session(store: Database, input: &str) -> (Database, String) {
    let mut console = Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::<u8>::new());
    let store = run(store, &mut console).expect("session should end cleanly");
    let out = String::from_utf8(console.writer().clone()).unwrap();
    (store, out)
}

/// Acme owns Civic and Corolla; Alice rents Civic; Bob rents nothing.
fn rental_fixture() -> Database {
    let mut db = Database::in_memory();
    let acme = db.create_company("Acme").unwrap();
    let civic = db.create_car("Civic", acme.id).unwrap();
    db.create_car("Corolla", acme.id).unwrap();
    db.create_customer("Alice").unwrap();
    db.create_customer("Bob").unwrap();
    db.set_rented_car("Alice", Some(civic.id)).unwrap();
    db
}

const ROOT_MENU: &str = "\nWelcome select an option: \n\n1. Log in as a manager\n2. Log in as a customer\n3. Create a customer\n0. Exit\n";

// ============================================================================
// Navigation
// ============================================================================

#[test]
fn test_exit_immediately() {
    let (_, out) = session(Database::in_memory(), "0\n");
    assert_eq!(out, ROOT_MENU);
}

#[test]
fn test_invalid_input_reprompts_without_crashing() {
    let (_, out) = session(Database::in_memory(), "abc\n9\n-1\n\n0\n");
    assert_eq!(out.matches("invalid input, retry").count(), 3);
    assert_eq!(out.matches("Welcome select an option:").count(), 1);
}

#[test]
fn test_invalid_utf8_selection_reprompts() {
    let mut console = Console::new(Cursor::new(b"\xff\xfe\n0\n".to_vec()), Vec::<u8>::new());
    run(Database::in_memory(), &mut console).expect("session should end cleanly");
    let out = String::from_utf8_lossy(console.writer()).into_owned();

    assert_eq!(out.matches("invalid input, retry").count(), 1);
    assert_eq!(out.matches("Welcome select an option:").count(), 1);
}

#[test]
fn test_end_of_input_ends_session() {
    let (store, out) = session(Database::in_memory(), "1\n");
    assert!(out.contains("1. Company list"));
    assert!(store.companies().unwrap().is_empty());
}

#[test]
fn test_empty_company_list_returns_to_manager() {
    // manager → company list (empty) → back at manager → root → exit
    let (_, out) = session(Database::in_memory(), "1\n1\n0\n0\n");
    assert!(out.contains("\nThe company list is empty!\n"));
    assert_eq!(out.matches("1. Company list").count(), 2);
    assert!(out.contains("0. Back"));
}

#[test]
fn test_empty_customer_list_returns_to_root() {
    let (_, out) = session(Database::in_memory(), "2\n0\n");
    assert!(out.contains("\nThe customer list is empty!\n"));
    assert_eq!(out.matches("Welcome select an option:").count(), 2);
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_create_customer_then_listed() {
    // create Alice → root again → customer list → back → exit
    let (store, out) = session(Database::in_memory(), "3\nAlice\n2\n0\n0\n");

    let alice = store.customer_by_name("Alice").unwrap().unwrap();
    assert_eq!(alice.rented_car_id, None);
    assert!(out.contains("Enter the customer name:\nThe customer was created!\n"));
    assert!(out.contains("Choose a customer: \n\n1. Alice\n0. Back\n"));
    assert_eq!(out.matches("Welcome select an option:").count(), 3);
}

#[test]
fn test_manager_creates_company_and_car_customer_rents_it() {
    let input = [
        "1", "2", "Acme", // manager: create company Acme
        "1", "1", // company list → Acme
        "2", "Civic", // create car Civic
        "1", // car list
        "0", "0", // back to manager, back to root
        "3", "Alice", // create customer Alice
        "2", "1", // customer list → Alice
        "1", "1", "1", // rent a car → Acme → Civic
        "3", // my rented car
        "0", "0", // back to root, exit
    ]
    .join("\n");

    let (store, out) = session(Database::in_memory(), &input);

    assert!(out.contains("The company was created!"));
    assert!(out.contains("'Acme' company: \n\n1. Car list\n2. Create a car\n0. Back\n"));
    assert!(out.contains("The car was added!"));
    assert!(out.contains("'Acme' cars:\n1. Civic\n"));
    assert!(out.contains("Welcome 'Alice': "));
    assert!(out.contains("Choose a car: \n\n1. Civic\n0. Back\n"));
    assert!(out.contains("You rented 'Civic'"));
    assert!(out.contains("You rented car:\nCivic\nCompany:\nAcme\n"));

    let civic = store.car_by_name("Civic").unwrap().unwrap();
    let alice = store.customer_by_name("Alice").unwrap().unwrap();
    assert_eq!(alice.rented_car_id, Some(civic.id));
}

#[test]
fn test_available_cars_exclude_rented_one() {
    // customer list → Bob → rent a car → Acme → chooser → back ×2 → exit
    let (_, out) = session(rental_fixture(), "2\n2\n1\n1\n0\n0\n0\n");

    assert!(out.contains("Choose a car: \n\n1. Corolla\n0. Back\n"));
    assert!(!out.contains("1. Civic"));
}

#[test]
fn test_second_rental_is_refused() {
    // customer list → Alice → rent a car → refused → back → exit
    let (store, out) = session(rental_fixture(), "2\n1\n1\n0\n0\n");

    assert!(out.contains("\nYou've already rented a car!\n"));
    assert!(!out.contains("Choose a car:"));
    let civic = store.car_by_name("Civic").unwrap().unwrap();
    assert_eq!(
        store.customer_by_name("Alice").unwrap().unwrap().rented_car_id,
        Some(civic.id)
    );
}

#[test]
fn test_return_without_rental_reports_and_keeps_state() {
    // Bob → return a rented car → my rented car → back → exit
    let (store, out) = session(rental_fixture(), "2\n2\n2\n3\n0\n0\n");

    assert_eq!(out.matches("You didn't rent a car!").count(), 2);
    assert_eq!(store.customer_by_name("Bob").unwrap().unwrap().rented_car_id, None);
}

#[test]
fn test_return_then_rent_again() {
    // Alice → return → rent → Acme → chooser now lists both cars → Corolla
    let (store, out) = session(rental_fixture(), "2\n1\n2\n1\n1\n2\n0\n0\n");

    assert!(out.contains("You've returned a rented car!"));
    assert!(out.contains("1. Civic\n2. Corolla\n"));
    assert!(out.contains("You rented 'Corolla'"));
    let corolla = store.car_by_name("Corolla").unwrap().unwrap();
    assert_eq!(
        store.customer_by_name("Alice").unwrap().unwrap().rented_car_id,
        Some(corolla.id)
    );
}

#[test]
fn test_no_available_cars_returns_to_rental_menu() {
    let mut db = rental_fixture();
    let corolla = db.car_by_name("Corolla").unwrap().unwrap();
    db.set_rented_car("Bob", Some(corolla.id)).unwrap();
    db.create_customer("Carol").unwrap();

    // Carol → rent → Acme → no cars → rental menu → back → exit
    let (_, out) = session(db, "2\n3\n1\n1\n0\n0\n");

    assert!(out.contains("\nNo available cars!\n"));
    assert_eq!(out.matches("Welcome 'Carol': ").count(), 2);
}

#[test]
fn test_new_company_appears_in_both_lists() {
    // manager → create Globex → back → Bob → rent a car → company list
    let input = "1\n2\nGlobex\n0\n2\n2\n1\n0\n0\n0\n";
    let (_, out) = session(rental_fixture(), input);

    assert!(out.contains("The company was created!"));
    assert!(out.contains("Choose a company: \n\n1. Acme\n2. Globex\n0. Back\n"));
}

#[test]
fn test_duplicate_customer_is_reported() {
    let (store, out) = session(rental_fixture(), "3\nBob\n0\n");

    assert!(out.contains("Could not create the customer"));
    assert!(!out.contains("The customer was created!"));
    assert_eq!(store.customers().unwrap().len(), 2);
}

#[test]
fn test_session_persists_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("carsharing.json");

    let db = Database::open(&path).unwrap();
    session(db, "1\n2\nAcme\n0\n3\nAlice\n0\n");

    let reopened = Database::open(&path).unwrap();
    assert!(reopened.company_by_name("Acme").unwrap().is_some());
    assert!(reopened.customer_by_name("Alice").unwrap().is_some());
}
