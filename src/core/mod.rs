//! Core controller logic

pub mod address;
pub mod connector;
pub mod dispatcher;
pub mod error;
pub mod mode;
pub mod registry;
pub mod scanner;
pub mod service;
pub mod types;
