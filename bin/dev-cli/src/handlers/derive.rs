//! Single-key derivation commands.

use std::fmt;

use anyhow::Result;
use channel_crypto_key_deriv::{
    derive_revocation_privkey, derive_revocation_pubkey, derive_simple_privkey,
    derive_simple_pubkey,
};
use secp256k1::{PublicKey, SECP256K1};
use serde::Serialize;
use tracing::info;

use crate::{
    cli::{
        OutputFormat, RevocationPrivkeyArgs, RevocationPubkeyArgs, SimplePrivkeyArgs,
        SimplePubkeyArgs,
    },
    handlers::parse_secret,
    output::emit,
};

/// A derived pubkey.
#[derive(Debug, Serialize)]
pub(crate) struct PubkeyReport {
    pub(crate) pubkey: PublicKey,
}

impl fmt::Display for PubkeyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pubkey)
    }
}

/// A derived private key along with its pubkey so the two can be checked against each other.
#[derive(Debug, Serialize)]
pub(crate) struct PrivkeyReport {
    pub(crate) privkey: String,
    pub(crate) pubkey: PublicKey,
}

impl PrivkeyReport {
    fn new(privkey: secp256k1::SecretKey) -> Self {
        Self {
            privkey: hex::encode(privkey.secret_bytes()),
            pubkey: privkey.public_key(SECP256K1),
        }
    }
}

impl fmt::Display for PrivkeyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "privkey: {}", self.privkey)?;
        write!(f, "pubkey:  {}", self.pubkey)
    }
}

pub(crate) fn simple_pubkey(args: &SimplePubkeyArgs) -> Result<PubkeyReport> {
    let pubkey = derive_simple_pubkey(&args.basepoint, &args.commitment.point)?;
    Ok(PubkeyReport { pubkey })
}

pub(crate) fn simple_privkey(args: &SimplePrivkeyArgs) -> Result<PrivkeyReport> {
    let secret = parse_secret("basepoint secret", &args.basepoint_secret)?;
    let basepoint = secret.public_key()?;
    let privkey = derive_simple_privkey(&secret, &basepoint, &args.commitment.point)?;
    Ok(PrivkeyReport::new(privkey))
}

pub(crate) fn revocation_pubkey(args: &RevocationPubkeyArgs) -> Result<PubkeyReport> {
    let pubkey = derive_revocation_pubkey(&args.revocation_basepoint, &args.commitment.point)?;
    Ok(PubkeyReport { pubkey })
}

pub(crate) fn revocation_privkey(args: &RevocationPrivkeyArgs) -> Result<PrivkeyReport> {
    let basepoint_secret = parse_secret(
        "revocation basepoint secret",
        &args.revocation_basepoint_secret,
    )?;
    let per_commitment_secret = parse_secret("per-commitment secret", &args.per_commitment_secret)?;

    let privkey = derive_revocation_privkey(
        &basepoint_secret,
        &per_commitment_secret,
        &basepoint_secret.public_key()?,
        &per_commitment_secret.public_key()?,
    )?;
    Ok(PrivkeyReport::new(privkey))
}

pub(crate) fn handle_simple_pubkey(args: SimplePubkeyArgs, format: OutputFormat) -> Result<()> {
    let report = simple_pubkey(&args)?;
    info!(basepoint = %args.basepoint, pubkey = %report.pubkey, "derived simple pubkey");
    emit(&report, format)
}

pub(crate) fn handle_simple_privkey(args: SimplePrivkeyArgs, format: OutputFormat) -> Result<()> {
    let report = simple_privkey(&args)?;
    info!(pubkey = %report.pubkey, "derived simple privkey");
    emit(&report, format)
}

pub(crate) fn handle_revocation_pubkey(
    args: RevocationPubkeyArgs,
    format: OutputFormat,
) -> Result<()> {
    let report = revocation_pubkey(&args)?;
    info!(basepoint = %args.revocation_basepoint, pubkey = %report.pubkey, "derived revocation pubkey");
    emit(&report, format)
}

pub(crate) fn handle_revocation_privkey(
    args: RevocationPrivkeyArgs,
    format: OutputFormat,
) -> Result<()> {
    let report = revocation_privkey(&args)?;
    info!(pubkey = %report.pubkey, "derived revocation privkey");
    emit(&report, format)
}
