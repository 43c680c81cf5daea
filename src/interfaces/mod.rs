//! Abstract interfaces for dynsource components.
//!
//! These traits define the contracts for:
//! - Table store (lifecycle + scan capabilities of the backing service)

pub mod table_store;

pub use table_store::{
    RawItem, Result, ScanPage, StoreError, TableDescription, TableStatus, TableStore,
};
