pub mod config;
pub mod earnings;
pub mod project;
pub mod session;
pub mod tasks;
