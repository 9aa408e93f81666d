//! Derives every key of one commitment from both parties' basepoints.
//!
//! Basepoint files are the json form of [`Basepoints`]:
//!
//! ```json
//! {
//!   "revocation": "02...",
//!   "payment": "03...",
//!   "htlc": "02...",
//!   "delayed_payment": "03..."
//! }
//! ```

use std::{fmt, fs, path::Path};

use anyhow::{Context, Result};
use channel_crypto_key_deriv::{Basepoints, Keyset};
use serde::Serialize;
use tracing::info;

use crate::{
    cli::{KeysetArgs, OutputFormat},
    output::emit,
};

fn read_basepoints(path: &Path) -> Result<Basepoints> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read basepoints file {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse basepoints file {}", path.display()))
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub(crate) struct KeysetReport(Keyset);

impl fmt::Display for KeysetReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let k = &self.0;
        writeln!(f, "self_revocation_key:      {}", k.self_revocation_key)?;
        writeln!(f, "self_delayed_payment_key: {}", k.self_delayed_payment_key)?;
        writeln!(f, "self_payment_key:         {}", k.self_payment_key)?;
        writeln!(f, "other_payment_key:        {}", k.other_payment_key)?;
        writeln!(f, "self_htlc_key:            {}", k.self_htlc_key)?;
        write!(f, "other_htlc_key:           {}", k.other_htlc_key)
    }
}

pub(crate) fn derive_keyset(args: &KeysetArgs) -> Result<KeysetReport> {
    let local = read_basepoints(&args.local)?;
    let remote = read_basepoints(&args.remote)?;

    let keyset = Keyset::derive(
        &args.commitment.point,
        &local,
        &remote,
        args.static_remotekey,
    )?;
    Ok(KeysetReport(keyset))
}

pub(crate) fn handle_keyset(args: KeysetArgs, format: OutputFormat) -> Result<()> {
    let report = derive_keyset(&args)?;
    info!(per_commitment_point = %args.commitment.point, "derived keyset");
    emit(&report, format)
}
