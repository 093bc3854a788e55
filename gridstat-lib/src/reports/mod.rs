//! Report generation for engine output
//!
//! Commands describe what they produced as a [`Report`] and hand it to one of two
//! generators, each accessed through a `generate` function:
//! - **Console**: Aligned terminal output with optional ANSI colors
//! - **JSON**: Machine-readable structured data
//!
//! Values are carried as the engine produced them. Presentation choices such as
//! rendering fractions as percentages, or spelling out why a metric has insufficient
//! data, are made here and centralized in the `common` module.

mod common;
mod console;
mod json;
mod report;

pub use console::generate as generate_console;
pub use json::generate as generate_json;
pub use report::Report;
