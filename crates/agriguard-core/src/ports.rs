//! Port trait definitions
//!
//! These traits define the external services the dashboard talks to.

pub mod services;

pub use services::{Geocoder, Predictor};
