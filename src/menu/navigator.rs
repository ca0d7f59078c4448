//! # Navigator
//!
//! Runs the show → read → dispatch cycle.
//!
//! ```text
//!            ┌──────────────────────────────────────────────┐
//!            ▼                                              │
//!   show(id) ── empty? ──yes──▶ print empty-message ──▶ parent / stop
//!            │no
//!            ▼
//!   print title, "n. option", "0. Back|Exit"
//!            ▼
//!   read selection in 0..=len (re-prompts on bad input)
//!            ▼
//!   0 ──▶ parent / stop
//!   n ──▶ action at n-1:  SubMenu  → hook, then child ───────┤
//!                         Command  → controller → Flow ──────┘
//! ```
//!
//! Every step yields the next menu to show, so the loop is iterative and
//! arbitrarily long sessions do not grow the call stack.

use std::io::{BufRead, Write};

use log::debug;

use super::tree::{Action, MenuError, MenuId, MenuTree};
use crate::console::{Console, ConsoleError};

pub const NO_ACTION_MESSAGE: &str = "No action defined";

/// Where navigation continues after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Show(MenuId),
    Exit,
}

/// Application side of the engine: runs commands and pre-display hooks.
///
/// Both receive the tree mutably so they can rebuild option lists, retitle
/// menus and re-parent them before navigation continues.
pub trait Controller {
    type Command: Clone;
    type Error: From<MenuError> + From<ConsoleError>;

    /// Runs before a submenu is shown.
    ///
    /// Returning `Some(flow)` cancels entry into the submenu and continues
    /// at `flow` instead.
    fn before_show<R: BufRead, W: Write>(
        &mut self,
        hook: &Self::Command,
        menus: &mut MenuTree<Self::Command>,
        console: &mut Console<R, W>,
    ) -> Result<Option<Flow>, Self::Error>;

    fn perform<R: BufRead, W: Write>(
        &mut self,
        command: &Self::Command,
        menus: &mut MenuTree<Self::Command>,
        console: &mut Console<R, W>,
    ) -> Result<Flow, Self::Error>;
}

/// Shows `start` and follows navigation until a parentless menu exits.
pub fn run<H, R, W>(
    menus: &mut MenuTree<H::Command>,
    start: MenuId,
    controller: &mut H,
    console: &mut Console<R, W>,
) -> Result<(), H::Error>
where
    H: Controller,
    R: BufRead,
    W: Write,
{
    let mut next = Some(start);
    while let Some(id) = next {
        next = show(menus, id, controller, console)?;
    }
    debug!("Navigation finished");
    Ok(())
}

/// One show cycle for `id`. Returns the menu to show next, `None` to stop.
pub fn show<H, R, W>(
    menus: &mut MenuTree<H::Command>,
    id: MenuId,
    controller: &mut H,
    console: &mut Console<R, W>,
) -> Result<Option<MenuId>, H::Error>
where
    H: Controller,
    R: BufRead,
    W: Write,
{
    console.blank()?;

    let menu = menus.get(id)?;
    let Some(lines) = menu.render() else {
        debug!("Menu {id:?} is empty, deferring to {:?}", menu.parent());
        let (message, parent) = (menu.empty_message().to_string(), menu.parent());
        console.println(message)?;
        return Ok(parent);
    };
    for line in &lines {
        console.println(line)?;
    }

    let selection = console.read_selection(menu.len())?;
    menus.select(id, selection)?;
    let menu = menus.get(id)?;

    if selection == 0 {
        debug!("Menu {id:?}: back to {:?}", menu.parent());
        return Ok(menu.parent());
    }

    // Looked up now, not when the option was created: rebinding always wins.
    let action = menu.options()[selection - 1].action().clone();
    match action {
        Action::Unbound => {
            console.println(NO_ACTION_MESSAGE)?;
            Ok(Some(id))
        }
        Action::SubMenu { menu, before_show } => {
            if let Some(hook) = before_show {
                if let Some(flow) = controller.before_show(&hook, menus, console)? {
                    return Ok(next_menu(flow));
                }
            }
            debug!("Menu {id:?}: option {selection} opens {menu:?}");
            Ok(Some(menu))
        }
        Action::Command(command) => {
            let flow = controller.perform(&command, menus, console)?;
            debug!("Menu {id:?}: option {selection} ran command, continuing at {flow:?}");
            Ok(next_menu(flow))
        }
    }
}

fn next_menu(flow: Flow) -> Option<MenuId> {
    match flow {
        Flow::Show(id) => Some(id),
        Flow::Exit => None,
    }
}
