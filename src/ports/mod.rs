//! Port traits decoupling the domain from I/O concerns.

pub mod data_port;
pub mod config_port;
pub mod report_port;
