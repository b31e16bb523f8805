//! Qualification grade calculator for unit-based vocational courses.
//!
//! The core is [`scheme::aggregate`], which turns a student's per-unit grades
//! into total points, a qualification grade and UCAS points under a
//! configurable [`scheme::SchemeConfig`].

pub mod config;
pub mod model;
pub mod output;
pub mod scheme;
pub mod store;
