//! Console adapters: operator input and output for the interactive loop.

mod console_presenter;
mod stdin_reader;

pub use console_presenter::ConsolePresenter;
pub use stdin_reader::{spawn_line_reader, spawn_stdin_reader};
