//! CLI command implementations

pub mod completions;
pub mod db;
pub mod equipment;
pub mod generate;
pub mod init;
pub mod load;
pub mod report;
pub mod stock;
pub mod update_content;
