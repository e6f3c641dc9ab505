//! Bucketwire Application Layer
//!
//! Ports describe every collaborator the fan-out transport talks to; the
//! dispatch use case drives one request through them.
pub mod ports;
pub mod use_cases;
