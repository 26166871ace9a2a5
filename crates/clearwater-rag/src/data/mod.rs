//! Ancillary data accessors: inventory CSV, chart statistics, knowledgebase text and
//! object storage

pub mod chart;
pub mod inventory;
mod knowledgebase;
mod object_store;

pub use chart::{summarize, ColumnSummary};
pub use inventory::{InventoryAnalytics, InventoryStore, Record};
pub use knowledgebase::Knowledgebase;
#[cfg(feature = "http")]
pub use object_store::HttpObjectStore;
pub use object_store::{LocalObjectStore, ObjectPath, ObjectStore};
