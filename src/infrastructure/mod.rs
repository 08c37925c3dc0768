pub mod aliases;
pub mod config;
pub mod csv;
pub mod persistence;
