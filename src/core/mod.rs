//! Core module - storage, workspace and configuration

pub mod config;
pub mod store;
pub mod workspace;

pub use config::Config;
pub use store::{MaintenanceStore, StockItem, StoreError};
pub use workspace::{Workspace, WorkspaceError};
