//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::io::Cursor;

use crate::console::Console;
use crate::core::action::Command;
use crate::core::menus;
use crate::core::state::App;
use crate::menu::MenuTree;
use crate::store::{CarRepository, CompanyRepository, CustomerRepository, Database};

pub type ScriptedConsole = Console<Cursor<Vec<u8>>, Vec<u8>>;

/// A console that reads `input` and captures everything printed.
pub fn scripted_console(input: &str) -> ScriptedConsole {
    Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
}

pub fn output(console: &ScriptedConsole) -> String {
    String::from_utf8_lossy(console.writer()).into_owned()
}

/// Acme (Civic, Corolla), Tesla (Model 3); customers Alice and Bob, no rentals.
pub fn seeded_store() -> Database {
    let mut db = Database::in_memory();
    let acme = db.create_company("Acme").unwrap();
    let tesla = db.create_company("Tesla").unwrap();
    db.create_car("Civic", acme.id).unwrap();
    db.create_car("Corolla", acme.id).unwrap();
    db.create_car("Model 3", tesla.id).unwrap();
    db.create_customer("Alice").unwrap();
    db.create_customer("Bob").unwrap();
    db
}

/// An app over `seeded_store()` with its fully wired menu tree.
pub fn test_app() -> (App<Database>, MenuTree<Command>) {
    let store = seeded_store();
    let mut tree = MenuTree::new();
    let menus = menus::build(&mut tree, &store).unwrap();
    (App::new(store, menus), tree)
}
