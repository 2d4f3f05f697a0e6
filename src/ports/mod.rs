//! Port traits isolating the domain from I/O.

pub mod chart_port;
pub mod config_port;
pub mod data_port;
