//! CLI for poking at channel key derivation and TLV commitments during development.

mod cli;
mod handlers;
mod output;

use anyhow::{Error, Result};
use channel_crypto_common::logging::{self, LoggerConfig};
use clap::Parser;

use crate::handlers::{bip32, derive, keyset, merkle};

fn main() -> Result<(), Error> {
    let mut log_config = LoggerConfig::with_base_name("dev-cli");
    if let Some(url) = logging::get_otlp_url_from_env() {
        log_config.set_otlp_url(url);
    }
    let _guard = logging::init(log_config);

    let cli = cli::Cli::parse();
    let format = cli.format;
    match cli.command {
        cli::Commands::SimplePubkey(args) => derive::handle_simple_pubkey(args, format),
        cli::Commands::SimplePrivkey(args) => derive::handle_simple_privkey(args, format),
        cli::Commands::RevocationPubkey(args) => derive::handle_revocation_pubkey(args, format),
        cli::Commands::RevocationPrivkey(args) => derive::handle_revocation_privkey(args, format),
        cli::Commands::Bip32Pubkey(args) => bip32::handle_bip32_pubkey(args, format),
        cli::Commands::Keyset(args) => keyset::handle_keyset(args, format),
        cli::Commands::MerkleRoot(args) => merkle::handle_merkle_root(args, format),
        cli::Commands::MerkleProof(args) => merkle::handle_merkle_proof(args, format),
        cli::Commands::MerkleVerify(args) => merkle::handle_merkle_verify(args, format),
    }
}
