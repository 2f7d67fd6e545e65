//! Security module - input validation

pub mod validator;

pub use validator::*;
