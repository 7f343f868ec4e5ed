//! Application layer module
//!
//! This module contains the service that orchestrates extraction for one
//! rendered page.

pub mod page_data_service;

pub use page_data_service::PageDataService;
