pub mod cli;
pub mod config;
pub mod discovery;
pub mod model;
pub mod parser;
