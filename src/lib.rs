//! netconfig: network interface discovery probe
//!
//! Enumerates a host's network adapters, normalizes every address into
//! `(address, prefix length, broadcast or scope)` form, and renders the
//! result as a JSON discovery document.

pub mod config;
pub mod discovery;
pub mod host;
pub mod network;
pub mod output;
