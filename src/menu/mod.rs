//! # Menu Navigation Engine
//!
//! A tree of numbered option lists driven from the console.
//!
//! ```text
//!   MenuTree (arena)
//!   ├── Menu #0  "Welcome select an option: "     parent: None  → "0. Exit"
//!   │     1. Log in as a manager  ── SubMenu ──▶ Menu #1
//!   │     2. Create a customer    ── Command(C)
//!   └── Menu #1                                    parent: #0    → "0. Back"
//!         1. Company list         ── SubMenu { before_show: Some(C) } ──▶ ...
//! ```
//!
//! Menus live in an arena and refer to each other by [`MenuId`]. The parent
//! link is navigation only: whoever wires a submenu may point its parent at
//! any other menu, so "Back" can return somewhere other than the menu that
//! opened it.
//!
//! Actions are data ([`Action`]), not closures. The navigator looks the
//! action up from the option list *when the option is chosen*, so replacing
//! a list with [`MenuTree::set_options_list`] drops every binding the old
//! list carried. Re-wire after every rebuild.
//!
//! ## Modules
//!
//! - [`tree`]: `MenuTree`, `Menu`, `MenuOption`, `Action`
//! - [`navigator`]: the show/read/dispatch loop and the `Controller` seam

pub mod navigator;
pub mod tree;

pub use navigator::{Controller, Flow, run, show};
pub use tree::{Action, Menu, MenuError, MenuId, MenuOption, MenuTree};
