//! # Core Application Logic
//!
//! The car sharing application on top of the menu engine.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • App (store, session) │
//!                    │  • Command (actions)    │
//!                    │  • menus (tree layout)  │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    menu    │      │  console   │      │   store    │
//!     │  engine    │      │ stdin/out  │      │   JSON     │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: the `App` struct and the `Session` context
//! - [`action`]: the `Command` enum and its handlers
//! - [`menus`]: builds and rebuilds the menu tree
//! - [`config`]: config file, env and CLI resolution

pub mod action;
pub mod config;
pub mod menus;
pub mod state;

use std::io::{BufRead, Write};

use log::info;

use crate::console::Console;
use crate::error::AppError;
use crate::menu::{self, MenuTree};
use crate::store::Store;
use action::Command;
use state::App;

/// Wires the menu tree and runs it from the root until the user exits.
///
/// End of input counts as a normal exit. The store is handed back so callers
/// can inspect what the session changed.
pub fn run<S, R, W>(store: S, console: &mut Console<R, W>) -> Result<S, AppError>
where
    S: Store,
    R: BufRead,
    W: Write,
{
    let mut tree: MenuTree<Command> = MenuTree::new();
    let menus = menus::build(&mut tree, &store)?;
    let mut app = App::new(store, menus);

    match menu::run(&mut tree, menus.root, &mut app, console) {
        Ok(()) => info!("Session ended by user"),
        Err(e) if e.is_input_closed() => info!("Input closed, ending session"),
        Err(e) => return Err(e),
    }
    Ok(app.into_store())
}
