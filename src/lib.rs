pub mod analysis;
pub mod comparison;
pub mod config;
pub mod error;
pub mod format;
pub mod generate;
pub mod insights;
pub mod registry;
pub mod resolve;
pub mod scenario;
pub mod session;
pub mod types;
