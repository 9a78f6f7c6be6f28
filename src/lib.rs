mod server;
pub mod logger;
pub mod config;

pub use {
    server::*,
    config::Config,
};
