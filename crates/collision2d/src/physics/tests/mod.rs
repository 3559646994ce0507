//! Cross-module collision tests

mod grid_integration;
