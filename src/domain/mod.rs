//! Domain layer - Port definitions
//!
//! This module defines the traits the materializer's collaborators
//! implement, following hexagonal architecture principles.

pub mod ports;

pub use ports::*;
