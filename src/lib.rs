//! Cloud Cost Dashboard - cloud spend workbook loading and reporting
//!
//! Loads CSP, service and application spend from a workbook, falls back to
//! sample data per table, and renders the dashboard charts.

pub mod charts;
pub mod config;
pub mod data;
pub mod gui;
pub mod stats;
