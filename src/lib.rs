pub mod cli;
pub mod config;
pub mod drivers;
pub mod hid;
pub mod input;
pub mod manager;
