//! Transport layer

pub mod unix_socket;
