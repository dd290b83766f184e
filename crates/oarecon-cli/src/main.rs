use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use oarecon_core::{AppConfig, ExitCode, TaskRecord};
use oarecon_science::sources::{CrossRefRegistry, RmdService};
use oarecon_science::{
    BatchRunner, DepositBuilder, DoiResolver, HttpDoiResolver, IdentityConfirmer, ScienceError,
    TitleMatcher, normalize,
};

// ─── CLI Definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "oarecon",
    about = "Confirm DOIs and assemble deposit metadata for open-access records",
    version,
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output in JSON format. Also enabled by setting OARECON_JSON=1.
    #[arg(long, global = true)]
    json: bool,

    /// Config file (defaults to the user config directory).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the canonical form of a DOI.
    Normalize { raw: String },

    /// Check whether a DOI resolves.
    Resolve { doi: String },

    /// Compare two titles.
    Similar { a: String, b: String },

    /// Confirm the DOI of a single subject.
    Confirm {
        #[arg(long)]
        title: String,
        #[arg(long)]
        doi: Option<String>,
        #[arg(long)]
        external_id: Option<String>,
    },

    /// Assemble deposit metadata for a record (JSON object of record columns).
    DepositMeta {
        #[arg(long)]
        record: PathBuf,
        /// Confirmed DOI, overriding the record's own.
        #[arg(long)]
        doi: Option<String>,
    },

    /// Confirm DOIs for a JSON array of records.
    ConfirmBatch {
        #[arg(long)]
        records: PathBuf,
    },
}

// ─── Main ────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let start = Instant::now();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let json_output = cli.json || std::env::var("OARECON_JSON").as_deref() == Ok("1");
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    }
    .context("loading config")?;

    match cli.command {
        Commands::Normalize { raw } => {
            let doi = normalize(&raw);
            if doi.is_empty() {
                fail(json_output, ExitCode::NotFound, "no_doi", &format!("no DOI in {raw:?}"), start);
            }
            if json_output {
                print_ok(serde_json::json!({ "doi": doi }), start)?;
            } else {
                println!("{doi}");
            }
        }

        Commands::Resolve { doi } => {
            let resolver = resolver(&config)?;
            let resolves = resolver.resolves(&doi).await;
            if json_output {
                print_ok(serde_json::json!({ "doi": doi, "resolves": resolves }), start)?;
            } else if resolves {
                println!("{doi} resolves");
            } else {
                println!("{doi} does not resolve");
            }
            if !resolves {
                std::process::exit(ExitCode::NotFound as i32);
            }
        }

        Commands::Similar { a, b } => {
            let matcher = TitleMatcher::with_threshold(config.matching.title_threshold);
            let score = matcher.score(&a, &b);
            let similar = matcher.similar(&a, &b);
            if json_output {
                print_ok(
                    serde_json::json!({
                        "similar": similar,
                        "score": score,
                        "threshold": matcher.threshold(),
                    }),
                    start,
                )?;
            } else {
                println!("{} (score {score:.3})", if similar { "match" } else { "no match" });
            }
        }

        Commands::Confirm {
            title,
            doi,
            external_id,
        } => {
            let registry = CrossRefRegistry::from_config(&config.registry)?;
            let service = RmdService::from_config(&config.service)?;
            let resolver = resolver(&config)?;
            let confirmer = IdentityConfirmer::new(&registry, &service, &resolver)
                .with_matcher(TitleMatcher::with_threshold(config.matching.title_threshold));

            match confirmer
                .confirm_identity(&title, doi.as_deref(), external_id.as_deref())
                .await
            {
                Ok(doi) => {
                    if json_output {
                        print_ok(serde_json::json!({ "doi": doi, "url": doi.url() }), start)?;
                    } else {
                        println!("{doi}");
                    }
                }
                Err(e) => fail_science(json_output, &e, start),
            }
        }

        Commands::DepositMeta { record, doi } => {
            let value = read_json(&record)?;
            let record = match TaskRecord::from_json(&value) {
                Ok(r) => r,
                Err(e) => fail(json_output, ExitCode::InvalidArgs, "invalid_record", &e.to_string(), start),
            };
            let registry = CrossRefRegistry::from_config(&config.registry)?;
            let service = RmdService::from_config(&config.service)?;

            match DepositBuilder::new(&registry, &service)
                .build_deposit_metadata(&record, doi.as_deref())
                .await
            {
                Ok(meta) => {
                    if json_output {
                        print_ok(serde_json::to_value(&meta)?, start)?;
                    } else {
                        println!("{}", serde_json::to_string_pretty(&meta)?);
                    }
                }
                Err(e) => fail_science(json_output, &e, start),
            }
        }

        Commands::ConfirmBatch { records } => {
            let value = read_json(&records)?;
            let Some(items) = value.as_array() else {
                fail(json_output, ExitCode::InvalidArgs, "invalid_records", "expected a JSON array", start);
            };
            let mut parsed = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                match TaskRecord::from_json(item) {
                    Ok(r) => parsed.push(r),
                    Err(e) => fail(
                        json_output,
                        ExitCode::InvalidArgs,
                        "invalid_record",
                        &format!("record {i}: {e}"),
                        start,
                    ),
                }
            }

            let registry = CrossRefRegistry::from_config(&config.registry)?;
            let service = RmdService::from_config(&config.service)?;
            let resolver = resolver(&config)?;
            let confirmer = IdentityConfirmer::new(&registry, &service, &resolver)
                .with_matcher(TitleMatcher::with_threshold(config.matching.title_threshold));
            let runner = BatchRunner::new(confirmer, config.batch.ambiguous_doi);

            match runner.confirm_batch(&parsed).await {
                Ok(report) => {
                    if json_output {
                        print_ok(serde_json::to_value(&report)?, start)?;
                    } else {
                        for outcome in &report.outcomes {
                            match outcome {
                                oarecon_science::BatchOutcome::Confirmed { id, doi } => {
                                    println!("  ok    {id}  {doi}");
                                }
                                oarecon_science::BatchOutcome::Skipped { id, reason } => {
                                    println!("  skip  {id}  {reason}");
                                }
                            }
                        }
                        println!(
                            "\n{} confirmed, {} skipped",
                            report.confirmed(),
                            report.skipped()
                        );
                    }
                }
                Err(e) => fail_science(json_output, &e, start),
            }
        }
    }

    Ok(())
}

// ─── Helpers ────────────────────────────────────────────────────────────────

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn resolver(config: &AppConfig) -> Result<HttpDoiResolver> {
    Ok(HttpDoiResolver::with_base_url(
        &config.resolver.base_url,
        Duration::from_secs(config.resolver.timeout_secs),
    )?)
}

fn read_json(path: &Path) -> Result<serde_json::Value> {
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parsing {}", path.display()))
}

fn print_json(val: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(val)?);
    Ok(())
}

fn print_ok(data: serde_json::Value, start: Instant) -> Result<()> {
    print_json(&serde_json::json!({
        "status": "ok",
        "data": data,
        "meta": { "duration_ms": start.elapsed().as_millis() }
    }))
}

fn exit_code(err: &ScienceError) -> (ExitCode, &'static str) {
    match err {
        ScienceError::MalformedDoi(_) => (ExitCode::InvalidArgs, "malformed_doi"),
        ScienceError::UnresolvableDoi(_) => (ExitCode::NotFound, "unresolvable_doi"),
        ScienceError::NotInRegistry(_) => (ExitCode::NotFound, "not_in_registry"),
        ScienceError::NoDoiFound(_) => (ExitCode::NotFound, "no_doi_found"),
        ScienceError::TitleMismatch { .. } => (ExitCode::Mismatch, "title_mismatch"),
        ScienceError::AmbiguousDoi { .. } => (ExitCode::Mismatch, "ambiguous_doi"),
        ScienceError::IncompleteMetadata { .. } => (ExitCode::Incomplete, "incomplete_metadata"),
        ScienceError::Registry(_) => (ExitCode::NetworkError, "registry_error"),
        ScienceError::Service(_) => (ExitCode::NetworkError, "service_error"),
        ScienceError::Http(_) | ScienceError::ApiError(..) | ScienceError::RateLimit(..) => {
            (ExitCode::NetworkError, "network_error")
        }
        ScienceError::Core(_) => (ExitCode::InvalidArgs, "invalid_record"),
        ScienceError::Parse(_) => (ExitCode::GeneralError, "parse_error"),
    }
}

fn fail_science(json_output: bool, err: &ScienceError, start: Instant) -> ! {
    let (code, kind) = exit_code(err);
    fail(json_output, code, kind, &err.to_string(), start)
}

fn fail(json_output: bool, code: ExitCode, kind: &str, message: &str, start: Instant) -> ! {
    if json_output {
        let _ = print_json(&serde_json::json!({
            "status": "error",
            "error": kind,
            "message": message,
            "meta": { "duration_ms": start.elapsed().as_millis() }
        }));
    } else {
        eprintln!("error: {message}");
    }
    std::process::exit(code as i32);
}
