pub mod api;
pub mod appointments;
pub mod backend;
pub mod cancel;
pub mod cli;
pub mod core;
pub mod dashboard;
pub mod session;
