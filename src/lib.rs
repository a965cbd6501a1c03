pub mod args;
pub mod backup;
pub mod commands;
mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod present;
pub mod store;
pub mod tracker;
mod utils;

#[cfg(test)]
mod test;

pub use config::Config;
pub use error::Error;
pub use error::Result;
pub use tracker::Tracker;
