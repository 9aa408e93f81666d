use std::fmt;

use anyhow::Result;
use channel_crypto_key_deriv::bip32_pubkey;
use secp256k1::PublicKey;
use serde::Serialize;
use tracing::info;

use crate::{
    cli::{Bip32PubkeyArgs, OutputFormat},
    output::emit,
};

#[derive(Debug, Serialize)]
pub(crate) struct ChildReport {
    pub(crate) index: u32,
    pub(crate) pubkey: PublicKey,
}

impl fmt::Display for ChildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pubkey)
    }
}

pub(crate) fn child_pubkey(args: &Bip32PubkeyArgs) -> Result<ChildReport> {
    let pubkey = bip32_pubkey(&args.xpub, args.index)?;
    Ok(ChildReport {
        index: args.index,
        pubkey,
    })
}

pub(crate) fn handle_bip32_pubkey(args: Bip32PubkeyArgs, format: OutputFormat) -> Result<()> {
    let report = child_pubkey(&args)?;
    info!(parent = %args.xpub.fingerprint(), index = %args.index, "derived child pubkey");
    emit(&report, format)
}
