//! worldgen: command-line entry point for World generation.
//!
//! `worldgen generate` mints a signed planet (or moon) for a single root and
//! optionally persists the signing key pair; `worldgen verify` decodes an
//! existing World file and checks its signature.

mod cli;

use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::info;

use cli::{Cli, Command, GenerateArgs, VerifyArgs};
use ztworld_core::{logging, WorldgenConfig};
use ztworld_world::keyfile::{read_identity_public, read_world, write_signing_keys, write_world};
use ztworld_world::{
    generate_moon, generate_planet, GenerationRequest, GenerationSummary, World,
};

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    let config = match &cli.config {
        Some(path) => WorldgenConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => WorldgenConfig::default(),
    };
    logging::init_from_config(&config.logging);

    match cli.command {
        Command::Generate(args) => run_generate(&config, args),
        Command::Verify(args) => run_verify(args),
    }
}

/// JSON report of a generation run.
#[derive(Debug, Serialize)]
struct GenerateReport {
    #[serde(flatten)]
    summary: GenerationSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    output_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    key_dir: Option<String>,
    /// Hex World bytes, present when no output path was given
    #[serde(skip_serializing_if = "Option::is_none")]
    world_hex: Option<String>,
}

fn run_generate(config: &WorldgenConfig, args: GenerateArgs) -> Result<()> {
    let identity = match (args.identity, &args.identity_file) {
        (Some(text), _) => text,
        (None, Some(path)) => read_identity_public(path)
            .with_context(|| format!("failed to read identity from {}", path.display()))?,
        (None, None) => bail!("either --identity or --identity-file is required"),
    };

    let output_path = args.out.or_else(|| config.output.world_path.clone());
    // The World is written only after its signing key is on disk.
    let request = GenerationRequest {
        identity,
        endpoints: args.endpoints,
        comment: args.comment,
        output_path: None,
    };

    let result = if args.moon {
        generate_moon(&request)?
    } else {
        generate_planet(&request)?
    };

    let key_dir = args.key_dir.or_else(|| config.output.key_dir.clone());
    if let Some(dir) = &key_dir {
        let (previous, current) =
            write_signing_keys(dir, &result.signing_key, &result.signing_key)
                .with_context(|| format!("failed to write signing keys to {}", dir.display()))?;
        info!(
            previous = %previous.display(),
            current = %current.display(),
            "persisted signing keys"
        );
    }

    if let Some(path) = &output_path {
        write_world(path, &result.bytes)
            .with_context(|| format!("failed to write world to {}", path.display()))?;
    }

    if args.json {
        let report = GenerateReport {
            summary: result.summary(),
            output_path: output_path.as_deref().map(display_path),
            key_dir: key_dir.as_deref().map(display_path),
            world_hex: output_path.is_none().then(|| hex::encode(&result.bytes)),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if let Some(path) = &output_path {
        let summary = result.summary();
        println!(
            "{} {} ({} bytes) written to {}",
            summary.world_type,
            summary.world_id,
            summary.size,
            path.display()
        );
        println!("root      {}", summary.identity);
        println!("signer    {}", summary.signer);
    } else {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(&result.bytes)?;
        stdout.flush()?;
    }

    Ok(())
}

/// Decoded World as reported by `verify`.
#[derive(Debug, Serialize)]
struct VerifyReport {
    world_type: &'static str,
    world_id: u64,
    timestamp: u64,
    updates_must_be_signed_by: String,
    roots: Vec<RootReport>,
    signature_valid: bool,
}

#[derive(Debug, Serialize)]
struct RootReport {
    identity: String,
    endpoints: Vec<String>,
}

impl VerifyReport {
    fn new(world: &World, signature_valid: bool) -> Self {
        Self {
            world_type: world.world_type().name(),
            world_id: world.id(),
            timestamp: world.timestamp(),
            updates_must_be_signed_by: hex::encode(world.updates_must_be_signed_by()),
            roots: world
                .roots()
                .iter()
                .map(|root| RootReport {
                    identity: root.identity().to_string(),
                    endpoints: root.endpoints().iter().map(ToString::to_string).collect(),
                })
                .collect(),
            signature_valid,
        }
    }
}

fn run_verify(args: VerifyArgs) -> Result<()> {
    let world = read_world(&args.path)
        .with_context(|| format!("failed to decode world {}", args.path.display()))?;

    let outcome = match &args.signer {
        Some(text) => {
            let signer = parse_signer(text)?;
            world.verify_signature_with(&signer)
        }
        None => world.verify_signature(),
    };

    let report = VerifyReport::new(&world, outcome.is_ok());
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("type      {}", report.world_type);
        println!("id        {}", report.world_id);
        println!("timestamp {}", report.timestamp);
        println!("roots     {}", report.roots.len());
        for root in &report.roots {
            println!("  {} {}", root.identity, root.endpoints.join(" "));
        }
        println!(
            "signature {}",
            if report.signature_valid { "valid" } else { "INVALID" }
        );
    }

    outcome.with_context(|| format!("signature check failed for {}", args.path.display()))?;
    Ok(())
}

fn parse_signer(text: &str) -> Result<[u8; 32]> {
    let bytes = hex::decode(text.trim()).context("signer must be hex")?;
    bytes
        .try_into()
        .map_err(|bytes: Vec<u8>| anyhow::anyhow!("signer must be 32 bytes, got {}", bytes.len()))
}

fn display_path(path: &Path) -> String {
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_signer() {
        let key = parse_signer(&"ab".repeat(32)).unwrap();
        assert_eq!(key, [0xab; 32]);
        assert!(parse_signer("abcd").is_err());
        assert!(parse_signer("zz").is_err());
    }

    #[test]
    fn test_generate_writes_world_and_keys() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("planet");
        let keys = dir.path().join("keys");

        let args = GenerateArgs {
            identity: Some(format!("1234567890:0:{}", "aa".repeat(32))),
            identity_file: None,
            endpoints: vec!["203.0.113.5/9993".to_string()],
            comment: "cli test".to_string(),
            out: Some(out.clone()),
            key_dir: Some(keys.clone()),
            moon: false,
            json: true,
        };
        run_generate(&WorldgenConfig::default(), args).unwrap();

        let world = read_world(&out).unwrap();
        assert!(world.verify_signature().is_ok());
        assert!(keys.join("previous.key").exists());
        assert!(keys.join("current.key").exists());

        run_verify(VerifyArgs {
            path: out,
            signer: None,
            json: true,
        })
        .unwrap();
    }

    #[test]
    fn test_failed_key_write_leaves_no_world() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("planet");
        // a regular file where the key directory should be
        let keys = dir.path().join("keys");
        std::fs::write(&keys, b"occupied").unwrap();

        let args = GenerateArgs {
            identity: Some(format!("1234567890:0:{}", "aa".repeat(32))),
            identity_file: None,
            endpoints: vec!["203.0.113.5/9993".to_string()],
            comment: String::new(),
            out: Some(out.clone()),
            key_dir: Some(keys),
            moon: false,
            json: true,
        };

        assert!(run_generate(&WorldgenConfig::default(), args).is_err());
        assert!(!out.exists());
    }

    #[test]
    fn test_generate_uses_config_output_path() {
        let dir = tempfile::tempdir().unwrap();
        let identity_file = dir.path().join("identity.public");
        std::fs::write(
            &identity_file,
            format!("1234567890:0:{}\n", "aa".repeat(32)),
        )
        .unwrap();

        let mut config = WorldgenConfig::default();
        config.output.world_path = Some(dir.path().join("moon"));

        let args = GenerateArgs {
            identity: None,
            identity_file: Some(identity_file),
            endpoints: Vec::new(),
            comment: String::new(),
            out: None,
            key_dir: None,
            moon: true,
            json: true,
        };
        run_generate(&config, args).unwrap();

        let world = read_world(&dir.path().join("moon")).unwrap();
        assert_eq!(world.world_type().name(), "moon");
    }

    #[test]
    fn test_verify_rejects_wrong_signer() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("planet");
        let request = GenerationRequest {
            identity: format!("1234567890:0:{}", "aa".repeat(32)),
            endpoints: Vec::new(),
            comment: String::new(),
            output_path: Some(out.clone()),
        };
        generate_planet(&request).unwrap();

        let result = run_verify(VerifyArgs {
            path: out,
            signer: Some("11".repeat(32)),
            json: true,
        });
        assert!(result.is_err());
    }
}
