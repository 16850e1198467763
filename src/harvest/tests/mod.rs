//! Test modules for the harvest core
//!
//! Workers run against stub processors so that failures, panics and timing
//! are fully scripted.

mod scenarios;
mod support;
