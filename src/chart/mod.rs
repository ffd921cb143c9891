//! Chart intent detection, parameter extraction and dispatch
//!
//! Runs parallel to query routing: decides whether a query wants a
//! visualization, which type, with what parameters, and assembles the
//! matching builder's arguments from a data row. Chart generation is
//! best-effort and never raises to the caller.

pub mod dispatch;
pub mod figures;
pub mod intent;
pub mod params;

pub use dispatch::{generate_chart_from_data, get_chart_suggestions};
pub use intent::detect_chart_intent;
pub use params::extract_chart_parameters;
