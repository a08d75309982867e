pub mod api;
pub mod backend;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod i18n;
pub mod logging;
pub mod service;
pub mod sql_constants;
pub mod tasks;

#[cfg(test)]
pub mod test_utils;
