pub mod csv;
pub mod flag;
pub mod job;
pub mod user;
