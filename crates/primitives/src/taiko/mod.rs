/// Constants for Taiko stack chains.
pub mod constants;
