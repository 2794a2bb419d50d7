pub mod catalog;
pub mod fieldtype;
pub mod reader;
pub mod snapshot;
pub mod types;
