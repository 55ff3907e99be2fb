//! Terminal front end: the interactive menu and output formatting.

pub mod menu;
pub mod print;
