pub mod cli;
pub mod config;
pub mod db;
pub mod logging;
mod serde_utils;

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
