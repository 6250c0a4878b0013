//! marquee: a terminal browser for The Movie Database catalog.
//!
//! The binary is a thin shell over these modules; they are exposed as a
//! library so the integration tests can drive the view state and the catalog
//! client directly.

pub mod app;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod keybindings;
pub mod theme;
pub mod ui;
pub mod util;
