pub(crate) mod bip32;
pub(crate) mod derive;
pub(crate) mod keyset;
pub(crate) mod merkle;

use anyhow::{Context, Result};
use channel_crypto_primitives::secp::Secret;

/// Parses a hex-encoded 32-byte secret from a command-line argument.
pub(crate) fn parse_secret(name: &str, hex_str: &str) -> Result<Secret> {
    let bytes = hex::decode(hex_str).with_context(|| format!("{name} is not valid hex"))?;
    Secret::from_slice(&bytes).with_context(|| format!("{name} is not a valid secret"))
}

/// Parses a hex argument into raw bytes.
pub(crate) fn parse_hex(name: &str, hex_str: &str) -> Result<Vec<u8>> {
    hex::decode(hex_str).with_context(|| format!("{name} is not valid hex"))
}
