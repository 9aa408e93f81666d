//! This crate contains the hash, curve and TLV framing primitives that the key derivation and
//! commitment crates are built from.
//!
//! It lies at the bottom of the crate-hierarchy in this workspace i.e., it does not depend on any
//! other crate in this workspace.

pub mod constants;
pub mod errors;
pub mod hash;
pub mod secp;
pub mod tlv;

#[cfg(test)]
mod test_utils;
