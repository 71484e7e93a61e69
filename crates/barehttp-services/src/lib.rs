//! The three services served by `barehttp-core`
//!
//! - [`admin`] - diagnostic commands and a guarded pseudo-terminal
//! - [`drawer`] - parametric SVG shapes
//! - [`sorter`] - merge sort of an integer list
//!
//! Each service exposes a `routes` function building its [`ServerState`]
//! and a binary under `src/bin/` that wires it to [`launch::serve`].
//!
//! [`ServerState`]: barehttp_core::ServerState

pub mod admin;
pub mod drawer;
pub mod launch;
pub mod pages;
pub mod sorter;
