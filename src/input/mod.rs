pub mod completer;
pub mod history;

pub use completer::ShellHelper;
pub use history::{History, HistoryError};
