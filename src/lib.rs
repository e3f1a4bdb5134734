//! Track identification library - shared modules for the binary and tests.

pub mod console;
pub mod disambiguate;
pub mod dispose;
pub mod identify;
pub mod library;
pub mod models;
pub mod normalize;
pub mod probe;
pub mod progress;
pub mod run;
pub mod safety;
pub mod scoring;
