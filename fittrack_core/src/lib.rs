#![forbid(unsafe_code)]

//! Core domain model and business logic for the fittrack fitness tracker.
//!
//! This crate provides:
//! - Domain types (daily logs, profile, challenges, workout plans)
//! - Food and exercise catalogs
//! - Aggregates, streaks and achievements derived from raw logs
//! - Meal/workout suggestions and weekly plan generation
//! - Record stores (in-memory and JSON-lines on disk)
//! - The `FitnessTracker` service tying them together

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod store;
pub mod jsonl;
pub mod aggregate;
pub mod streak;
pub mod achievements;
pub mod estimate;
pub mod suggest;
pub mod plan;
pub mod social;
pub mod tracker;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog};
pub use config::Config;
pub use store::{MemoryStore, RecordStore};
pub use jsonl::JsonlStore;
pub use aggregate::{CalorieStatus, DailySummary, DateRange, MacroTotals};
pub use suggest::{FoodSuggestions, MacroNeed};
pub use plan::{estimate_plan_calories, generate_plan};
pub use social::RankMetric;
pub use tracker::{FitnessTracker, Logged};
