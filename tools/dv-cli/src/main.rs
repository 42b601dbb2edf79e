//! DV-CLI: Drop-Verify command line
//!
//! Local verification of distribution payloads: normalize a JSON file,
//! build its merkle tree, and compare against an expected root. File
//! reading is the caller-side retrieval the engine leaves out; this tool
//! never touches the network.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dv_01_normalizer::{Normalizer, PayloadNormalizer};
use dv_02_merkle::{parse_root_hex, verify_proof, DistributionTree};
use dv_03_analytics::{DistributionAnalytics, DistributionAnalyzer};
use dv_04_verifier::VerificationService;
use shared_types::{Amount, LeafFormat, ProposalRef, DEFAULT_DECIMALS};

/// Drop-Verify: check a claimed token distribution against a merkle root.
#[derive(Parser, Debug)]
#[command(name = "dv-cli")]
#[command(about = "Verify distribution payloads against governance merkle roots")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Normalize a payload file and verify it against an expected root
    Verify {
        /// Path to the distribution payload (JSON)
        #[arg(short, long)]
        file: PathBuf,

        /// Expected merkle root (64 hex chars, 0x optional)
        #[arg(short, long)]
        root: String,

        /// Leaf format (double_hashed | indexed | packed); auto-detected if omitted
        #[arg(long)]
        format: Option<LeafFormat>,

        /// Decimal scaling for fractional amounts
        #[arg(long, default_value_t = DEFAULT_DECIMALS)]
        decimals: u32,

        /// Governance space the proposal lives in
        #[arg(long, requires = "proposal")]
        space: Option<String>,

        /// Proposal identifier the root was referenced from
        #[arg(long)]
        proposal: Option<String>,
    },

    /// Compute and print the payload's merkle root
    Root {
        #[arg(short, long)]
        file: PathBuf,

        /// Leaf format to hash with
        #[arg(long)]
        format: LeafFormat,

        #[arg(long, default_value_t = DEFAULT_DECIMALS)]
        decimals: u32,
    },

    /// Print one recipient's merkle proof as JSON
    Proof {
        #[arg(short, long)]
        file: PathBuf,

        /// Recipient address to prove
        #[arg(short, long)]
        address: String,

        #[arg(long)]
        format: LeafFormat,

        #[arg(long, default_value_t = DEFAULT_DECIMALS)]
        decimals: u32,
    },

    /// Verify a single claim without the payload (standalone proof check)
    CheckProof {
        #[arg(short, long)]
        address: String,

        /// Claimed amount in base units
        #[arg(long)]
        amount: String,

        /// Claim index (required for the indexed format)
        #[arg(long)]
        index: Option<u64>,

        #[arg(short, long)]
        root: String,

        /// Comma-separated sibling hashes, leaf to root
        #[arg(long, value_delimiter = ',')]
        proof: Vec<String>,

        #[arg(long)]
        format: LeafFormat,
    },

    /// Normalize a payload and print checks + statistics (no root needed)
    Inspect {
        #[arg(short, long)]
        file: PathBuf,

        #[arg(long, default_value_t = DEFAULT_DECIMALS)]
        decimals: u32,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Command::Verify {
            file,
            root,
            format,
            decimals,
            space,
            proposal,
        } => {
            let normalized = normalize_file(&file, decimals)?;
            let service = VerificationService::new();
            let result = match proposal {
                Some(proposal_id) => service.verify_proposal(
                    &normalized.entries,
                    &root,
                    format,
                    ProposalRef {
                        space,
                        proposal_id,
                    },
                )?,
                None => service.verify_normalized(&normalized, &root, format)?,
            };
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(if result.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }

        Command::Root {
            file,
            format,
            decimals,
        } => {
            let normalized = normalize_file(&file, decimals)?;
            let tree = DistributionTree::build(&normalized.entries, format)?;
            println!("{}", tree.root_hex());
            Ok(ExitCode::SUCCESS)
        }

        Command::Proof {
            file,
            address,
            format,
            decimals,
        } => {
            let normalized = normalize_file(&file, decimals)?;
            let tree = DistributionTree::build(&normalized.entries, format)?;
            let Some(proof) = tree.proof(&address) else {
                bail!("address {address} is not in the distribution");
            };
            let hashes: Vec<String> = proof
                .iter()
                .map(|hash| format!("0x{}", hex::encode(hash)))
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "address": address.to_ascii_lowercase(),
                    "root": tree.root_hex(),
                    "format": format,
                    "proof": hashes,
                }))?
            );
            Ok(ExitCode::SUCCESS)
        }

        Command::CheckProof {
            address,
            amount,
            index,
            root,
            proof,
            format,
        } => {
            let amount = Amount::parse(&amount, DEFAULT_DECIMALS)
                .context("claimed amount does not parse")?
                .amount;
            let siblings = proof
                .iter()
                .map(|hash| parse_root_hex(hash))
                .collect::<Result<Vec<_>, _>>()
                .context("proof element is not a 32-byte hash")?;
            let valid = verify_proof(&address, &amount, index, &siblings, &root, format)?;
            println!("{}", if valid { "valid" } else { "invalid" });
            Ok(if valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }

        Command::Inspect { file, decimals } => {
            let normalized = normalize_file(&file, decimals)?;
            let analysis = DistributionAnalyzer::new().analyze(&normalized.entries);
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "entries": normalized.entry_count(),
                    "payload_warnings": normalized.warnings,
                    "checks": analysis.checks,
                    "statistics": analysis.statistics,
                }))?
            );
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn normalize_file(
    path: &PathBuf,
    decimals: u32,
) -> Result<dv_01_normalizer::NormalizedDistribution> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("cannot read payload file {}", path.display()))?;
    let payload: serde_json::Value =
        serde_json::from_str(&raw).context("payload file is not valid JSON")?;
    Normalizer::with_decimals(decimals)
        .normalize(&payload)
        .context("payload did not normalize")
}
