//! tailview
//!
//! Interactive terminal viewer for a paginated, searchable remote log stream.
//!
//! Pure core, impure shell: [`model`] and [`state`] are plain data and
//! synchronous transitions; [`source`] talks HTTP; [`view`] owns the terminal
//! and the event loop.

pub mod config;
pub mod logging;
pub mod model;
pub mod source;
pub mod state;
pub mod view;

#[cfg(test)]
mod test_harness;
