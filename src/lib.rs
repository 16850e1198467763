pub mod app;
pub mod core;
pub mod harvest;
pub mod remote;
pub mod sink;
