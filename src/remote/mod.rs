// src/remote/mod.rs

//! Remote endpoints.
//!
//! A [`target::Target`] is a fully-typed, immutable description of one
//! addressable machine: name, address and credential references. How such
//! a machine came to exist (cloud provider control planes, auth
//! bootstrapping) is not this crate's concern; group config files are the
//! only source of targets.

pub mod target;
pub mod transfer;

pub use target::Target;
pub use transfer::TransferError;
