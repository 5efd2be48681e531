//! Command implementations.

pub mod config;
pub mod preview;
pub mod run;
pub mod scan;

pub use self::config::{execute_init, execute_show};
pub use self::preview::execute_preview;
pub use self::run::execute_run;
pub use self::scan::execute_scan;
