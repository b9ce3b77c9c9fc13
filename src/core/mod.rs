//! Core business logic layer
//!
//! This module contains the fundamental data structures, traits, and
//! operations of the study tracker: courses, semester ordering, grade
//! averaging, the preferences store and dashboard queries.

pub mod data;
pub mod deadlines;
pub mod events;
pub mod grades;
pub mod operations;
pub mod preferences;
pub mod seed;
pub mod semester;
pub mod traits;
