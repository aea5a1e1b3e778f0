// Library exports for the binary and integration tests
pub mod cli;
pub mod config;
pub mod console;
pub mod launcher;
pub mod provider;
pub mod report;
pub mod settings;
