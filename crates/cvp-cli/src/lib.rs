//! Contract vendor pipeline CLI library.
//!
//! Only the logging setup lives here so integration tests can reuse it;
//! everything else is private to the binary.

#![deny(unsafe_code)]

pub mod logging;
