use std::path::PathBuf;

use bitcoin::bip32::Xpub;
use clap::{Parser, Subcommand, ValueEnum};
use secp256k1::PublicKey;

#[derive(Parser)]
#[command(
    name = "dev-cli",
    about = "Channel key derivation and TLV commitment CLI for dev environment",
    version
)]
pub(crate) struct Cli {
    #[arg(
        long,
        global = true,
        env = "CHANNEL_CRYPTO_FORMAT",
        value_enum,
        default_value_t = OutputFormat::Text,
        help = "how to print results"
    )]
    pub(crate) format: OutputFormat,

    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug, Clone)]
pub(crate) enum Commands {
    SimplePubkey(SimplePubkeyArgs),

    SimplePrivkey(SimplePrivkeyArgs),

    RevocationPubkey(RevocationPubkeyArgs),

    RevocationPrivkey(RevocationPrivkeyArgs),

    Bip32Pubkey(Bip32PubkeyArgs),

    Keyset(KeysetArgs),

    MerkleRoot(MerkleRootArgs),

    MerkleProof(MerkleProofArgs),

    MerkleVerify(MerkleVerifyArgs),
}

#[derive(Parser, Debug, Clone)]
#[command(about = "Derive a payment, htlc or delayed-payment pubkey", version)]
pub(crate) struct SimplePubkeyArgs {
    #[arg(
        long,
        env = "BASEPOINT",
        value_parser = clap::value_parser!(PublicKey),
        help = "the compressed basepoint of the key family"
    )]
    pub(crate) basepoint: PublicKey,

    #[clap(flatten)]
    pub(crate) commitment: PerCommitmentPointArg,
}

#[derive(Parser, Debug, Clone)]
#[command(about = "Derive a payment, htlc or delayed-payment private key", version)]
pub(crate) struct SimplePrivkeyArgs {
    #[arg(
        long,
        env = "BASEPOINT_SECRET",
        hide_env_values = true,
        help = "the hex-encoded secret of the basepoint"
    )]
    pub(crate) basepoint_secret: String,

    #[clap(flatten)]
    pub(crate) commitment: PerCommitmentPointArg,
}

#[derive(Parser, Debug, Clone)]
#[command(about = "Derive a revocation pubkey", version)]
pub(crate) struct RevocationPubkeyArgs {
    #[arg(
        long,
        env = "REVOCATION_BASEPOINT",
        value_parser = clap::value_parser!(PublicKey),
        help = "the counterparty's compressed revocation basepoint"
    )]
    pub(crate) revocation_basepoint: PublicKey,

    #[clap(flatten)]
    pub(crate) commitment: PerCommitmentPointArg,
}

#[derive(Parser, Debug, Clone)]
#[command(about = "Derive a revocation private key from a revealed secret", version)]
pub(crate) struct RevocationPrivkeyArgs {
    #[arg(
        long,
        env = "REVOCATION_BASEPOINT_SECRET",
        hide_env_values = true,
        help = "the hex-encoded secret of our revocation basepoint"
    )]
    pub(crate) revocation_basepoint_secret: String,

    #[arg(
        long,
        env = "PER_COMMITMENT_SECRET",
        hide_env_values = true,
        help = "the hex-encoded per-commitment secret revealed by the counterparty"
    )]
    pub(crate) per_commitment_secret: String,
}

#[derive(Parser, Debug, Clone)]
pub(crate) struct PerCommitmentPointArg {
    #[arg(
        long = "per-commitment-point",
        env = "PER_COMMITMENT_POINT",
        value_parser = clap::value_parser!(PublicKey),
        help = "the compressed per-commitment point"
    )]
    pub(crate) point: PublicKey,
}

#[derive(Parser, Debug, Clone)]
#[command(about = "Derive a non-hardened child pubkey from an xpub", version)]
pub(crate) struct Bip32PubkeyArgs {
    #[arg(
        long,
        env = "XPUB",
        value_parser = clap::value_parser!(Xpub),
        help = "the base58 extended public key"
    )]
    pub(crate) xpub: Xpub,

    #[arg(long, help = "the child index, below 2^31")]
    pub(crate) index: u32,
}

#[derive(Parser, Debug, Clone)]
#[command(about = "Derive every key of one commitment", version)]
pub(crate) struct KeysetArgs {
    #[arg(long, env = "LOCAL_BASEPOINTS", help = "the path to our basepoints json file")]
    pub(crate) local: PathBuf,

    #[arg(
        long,
        env = "REMOTE_BASEPOINTS",
        help = "the path to the counterparty's basepoints json file"
    )]
    pub(crate) remote: PathBuf,

    #[clap(flatten)]
    pub(crate) commitment: PerCommitmentPointArg,

    #[arg(
        long,
        env = "STATIC_REMOTEKEY",
        help = "use the counterparty's payment basepoint as is"
    )]
    pub(crate) static_remotekey: bool,
}

#[derive(Parser, Debug, Clone)]
pub(crate) struct StreamArgs {
    #[arg(
        long,
        env = "TLV_STREAM",
        conflicts_with = "records",
        required_unless_present = "records",
        help = "the hex-encoded tlv stream, validated for ordering"
    )]
    pub(crate) stream: Option<String>,

    #[arg(
        long = "record",
        help = "a hex-encoded record taken verbatim, in stream order (repeatable)"
    )]
    pub(crate) records: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
#[command(about = "Compute the merkle root of a tlv stream", version)]
pub(crate) struct MerkleRootArgs {
    #[clap(flatten)]
    pub(crate) stream: StreamArgs,
}

#[derive(Parser, Debug, Clone)]
#[command(about = "Produce an inclusion proof for one record of a tlv stream", version)]
pub(crate) struct MerkleProofArgs {
    #[clap(flatten)]
    pub(crate) stream: StreamArgs,

    #[arg(long, help = "the position of the record to disclose")]
    pub(crate) index: usize,
}

#[derive(Parser, Debug, Clone)]
#[command(about = "Check an inclusion proof against a root", version)]
pub(crate) struct MerkleVerifyArgs {
    #[arg(long, env = "MERKLE_ROOT", help = "the hex-encoded root")]
    pub(crate) root: String,

    #[arg(long, help = "the hex-encoded disclosed record")]
    pub(crate) record: String,

    #[arg(long, help = "the path to the proof json file")]
    pub(crate) proof: PathBuf,
}
