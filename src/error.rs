use thiserror::Error;

use crate::console::ConsoleError;
use crate::core::config::ConfigError;
use crate::menu::MenuError;
use crate::store::StoreError;

/// Failures that end a run. Anything recoverable is handled where it occurs.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Menu(#[from] MenuError),
    #[error(transparent)]
    Console(#[from] ConsoleError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl AppError {
    /// True when stdin ran out; callers treat this as a normal exit.
    pub fn is_input_closed(&self) -> bool {
        matches!(self, AppError::Console(ConsoleError::Closed))
    }
}
