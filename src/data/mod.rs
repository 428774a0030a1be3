//! Data module - workbook loading, caching and table views

mod cache;
pub mod frames;
mod loader;
mod model;

pub use cache::WorkbookCache;
pub use loader::{
    load_workbook, LoadError, LoadOutcome, SheetName, SheetSpec, TableSource, TableSources,
};
pub use model::{ApplicationSpend, CostDataset, CspSpend, LogicalTable, ServiceSpend};
