//! Application module

pub mod cli;
pub mod input;
pub mod startup;
