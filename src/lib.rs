//! finsight - personal finance tracking from the command line
//!
//! This library provides the core functionality for the finsight finance
//! tracker: recording income and expenses, monthly budgets with per-category
//! allocations, savings goals, recurring templates, and the analytics built
//! on top of them (health score, spending velocity, category breakdown,
//! trends and smart insights).
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (transactions, categories, budgets, goals, recurring)
//! - `storage`: JSON file storage layer, one table per entity
//! - `audit`: Audit logging of every change
//! - `services`: Business logic, scoped to one user
//! - `analytics`: Pure computations over a snapshot of a user's data
//! - `export`: Spreadsheet, JSON and YAML export
//! - `display`: Terminal formatting
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use finsight::config::{paths::FinsightPaths, settings::Settings};
//! use finsight::services::ReportService;
//! use finsight::storage::Storage;
//!
//! let paths = FinsightPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::open(paths)?;
//! let snapshot = ReportService::new(&storage, settings.require_user()?)
//!     .snapshot(chrono::Local::now().date_naive(), settings.insight_limit)?;
//! println!("{}", snapshot.financial_health(snapshot.current_month()).overall);
//! ```

pub mod analytics;
pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{FinsightError, FinsightResult};
