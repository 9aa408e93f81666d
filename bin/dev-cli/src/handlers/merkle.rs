//! TLV commitment commands.

use std::{fmt, fs};

use anyhow::{Context, Result};
use channel_crypto_merkle::{Digest, InclusionProof, MerkleTree};
use channel_crypto_primitives::tlv::TlvStream;
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    cli::{MerkleProofArgs, MerkleRootArgs, MerkleVerifyArgs, OutputFormat, StreamArgs},
    handlers::parse_hex,
    output::emit,
};

/// Reads the records to commit to. A whole stream is parsed and checked for ordering; individual
/// records are taken as given.
fn read_records(args: &StreamArgs) -> Result<Vec<Vec<u8>>> {
    if let Some(stream) = &args.stream {
        let bytes = parse_hex("stream", stream)?;
        let stream = TlvStream::parse(&bytes).context("invalid tlv stream")?;
        return Ok(stream
            .records()
            .iter()
            .map(|record| record.wire().to_vec())
            .collect());
    }

    args.records
        .iter()
        .map(|record| parse_hex("record", record))
        .collect()
}

fn build_tree(args: &StreamArgs) -> Result<(Vec<Vec<u8>>, MerkleTree)> {
    let records = read_records(args)?;
    let tree = MerkleTree::build(&records)?;
    Ok((records, tree))
}

#[derive(Debug, Serialize)]
pub(crate) struct RootReport {
    pub(crate) root: Digest,
    pub(crate) records: usize,
    pub(crate) depth: usize,
}

impl fmt::Display for RootReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ProofReport {
    pub(crate) root: Digest,
    pub(crate) record: String,
    pub(crate) proof: InclusionProof,
}

impl fmt::Display for ProofReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "root:   {}", self.root)?;
        writeln!(f, "record: {}", self.record)?;
        writeln!(f, "index:  {}", self.proof.leaf_index())?;
        writeln!(f, "nonce:  {}", self.proof.nonce())?;
        write!(f, "path:   [")?;
        for (i, sibling) in self.proof.siblings().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{sibling}")?;
        }
        write!(f, "]")
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct VerifyReport {
    pub(crate) valid: bool,
}

impl fmt::Display for VerifyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", if self.valid { "valid" } else { "invalid" })
    }
}

pub(crate) fn merkle_root(args: &MerkleRootArgs) -> Result<RootReport> {
    let (records, tree) = build_tree(&args.stream)?;
    Ok(RootReport {
        root: tree.root(),
        records: records.len(),
        depth: tree.depth(),
    })
}

pub(crate) fn merkle_proof(args: &MerkleProofArgs) -> Result<ProofReport> {
    let (records, tree) = build_tree(&args.stream)?;
    let proof = tree.prove(args.index)?;
    Ok(ProofReport {
        root: tree.root(),
        record: hex::encode(&records[args.index]),
        proof,
    })
}

pub(crate) fn merkle_verify(args: &MerkleVerifyArgs) -> Result<VerifyReport> {
    let root: Digest = args.root.parse().context("root is not a 32-byte hex digest")?;
    let record = parse_hex("record", &args.record)?;

    let contents = fs::read_to_string(&args.proof)
        .with_context(|| format!("failed to read proof file {}", args.proof.display()))?;
    let proof: InclusionProof = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse proof file {}", args.proof.display()))?;

    Ok(VerifyReport {
        valid: proof.verify(&record, &root),
    })
}

pub(crate) fn handle_merkle_root(args: MerkleRootArgs, format: OutputFormat) -> Result<()> {
    let report = merkle_root(&args)?;
    info!(root = %report.root, records = %report.records, "computed merkle root");
    emit(&report, format)
}

pub(crate) fn handle_merkle_proof(args: MerkleProofArgs, format: OutputFormat) -> Result<()> {
    let report = merkle_proof(&args)?;
    info!(root = %report.root, index = %args.index, "built inclusion proof");
    emit(&report, format)
}

pub(crate) fn handle_merkle_verify(args: MerkleVerifyArgs, format: OutputFormat) -> Result<()> {
    let report = merkle_verify(&args)?;
    if !report.valid {
        warn!(root = %args.root, "inclusion proof does not match root");
    }
    emit(&report, format)
}
