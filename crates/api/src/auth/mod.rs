//! Token handling for the external identity platform.

pub mod jwt;
