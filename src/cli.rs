//! Command-line host.
//!
//! 命令行入口：解析参数并调用已装配的 use case。

use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::warn;

use ocr_app::usecases::{OcrSource, RestoreOutcome, StoreOutcome};
use ocr_core::file_validation::{sanitize_filename, CandidateFile};
use ocr_core::url_guard::UrlKind;
use ocr_infra::fs::candidate_from_path;

use crate::bootstrap::AppUseCases;

#[derive(Debug, Parser)]
#[command(name = "mistral-ocr-desk", version, about = "OCR documents with the Mistral OCR API")]
pub struct Cli {
    /// Configuration file (defaults to config.toml in the data directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage the stored Mistral API key
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },
    /// Check whether a URL may be sent for OCR
    CheckUrl { url: String },
    /// Validate files without sending them
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Run OCR on files, a URL or the clipboard image
    Ocr(OcrArgs),
}

#[derive(Debug, Subcommand)]
pub enum KeyAction {
    /// Store the key; reads one line from stdin when KEY is omitted
    Set { key: Option<String> },
    /// Show whether a key is stored and usable on this device
    Status,
    /// Remove the stored key
    Clear,
}

#[derive(Debug, Args)]
pub struct OcrArgs {
    /// Remote image or document URL
    #[arg(long, conflicts_with_all = ["paste", "files"])]
    pub url: Option<String>,

    /// Use the image currently on the clipboard
    #[arg(long, conflicts_with = "files")]
    pub paste: bool,

    pub files: Vec<PathBuf>,

    /// Write result.md and images/ here instead of printing the markdown
    #[arg(long, value_name = "DIR")]
    pub out: Option<PathBuf>,
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

pub async fn run(command: Command, usecases: &AppUseCases) -> anyhow::Result<ExitCode> {
    match command {
        Command::Key { action } => run_key(action, usecases).await,
        Command::CheckUrl { url } => match usecases.accept_url.execute(&url) {
            Ok(url) => {
                let kind = match url.kind() {
                    UrlKind::Image => "image",
                    UrlKind::Document => "document",
                };
                println!("OK ({kind}): {url}");
                Ok(ExitCode::SUCCESS)
            }
            Err(reason) => {
                eprintln!("{reason}");
                Ok(ExitCode::FAILURE)
            }
        },
        Command::Check { files } => {
            let (accepted, success) = validate_paths(&files, usecases).await;
            for file in &accepted {
                println!("accepted: {}", file.name);
            }
            Ok(exit_code(success))
        }
        Command::Ocr(args) => run_ocr(args, usecases).await,
    }
}

async fn run_key(action: KeyAction, usecases: &AppUseCases) -> anyhow::Result<ExitCode> {
    match action {
        KeyAction::Set { key } => {
            let raw = match key {
                Some(key) => key,
                None => {
                    let mut line = String::new();
                    io::stdin()
                        .lock()
                        .read_line(&mut line)
                        .context("Failed to read API key from stdin")?;
                    line
                }
            };
            match usecases.store_api_key.execute(&raw).await? {
                StoreOutcome::Cleared => println!("API key cleared"),
                StoreOutcome::Encrypted => println!("API key saved (encrypted)"),
                StoreOutcome::PlaintextFallback { reason } => {
                    println!("API key saved (not encrypted: {reason})")
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        KeyAction::Status => match usecases.restore_api_key.execute().await? {
            RestoreOutcome::NotStored => {
                println!("no API key stored");
                Ok(ExitCode::FAILURE)
            }
            RestoreOutcome::Restored {
                encrypted,
                migrated,
                ..
            } => {
                match (encrypted, migrated) {
                    (true, _) => println!("API key stored (encrypted)"),
                    (false, true) => println!("API key stored (migrated to encrypted storage)"),
                    (false, false) => println!("API key stored (not encrypted)"),
                }
                Ok(ExitCode::SUCCESS)
            }
            RestoreOutcome::NeedsReentry => {
                println!("stored API key cannot be decrypted on this device; run `key set` again");
                Ok(ExitCode::FAILURE)
            }
        },
        KeyAction::Clear => {
            usecases.clear_api_key.execute()?;
            println!("API key cleared");
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Validate files on disk and print the report. Returns the accepted files and
/// whether every file was accepted.
async fn validate_paths(paths: &[PathBuf], usecases: &AppUseCases) -> (Vec<CandidateFile>, bool) {
    let mut candidates = Vec::with_capacity(paths.len());
    let mut success = true;
    for path in paths {
        match candidate_from_path(path).await {
            Ok(candidate) => candidates.push(candidate),
            Err(err) => {
                eprintln!("{err:#}");
                success = false;
            }
        }
    }

    let report = usecases.validate_files.execute(candidates).await;
    for summary in report.summaries() {
        eprintln!("{summary}");
    }
    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }

    let success = success && report.is_complete_success();
    (report.accepted, success)
}

async fn run_ocr(args: OcrArgs, usecases: &AppUseCases) -> anyhow::Result<ExitCode> {
    let mut success = true;
    let mut sources: Vec<(String, OcrSource)> = Vec::new();

    if let Some(url) = &args.url {
        match usecases.accept_url.execute(url) {
            Ok(validated) => sources.push((url.clone(), OcrSource::Url(validated))),
            Err(reason) => {
                eprintln!("{reason}");
                return Ok(ExitCode::FAILURE);
            }
        }
    } else if args.paste {
        let pasted = usecases.paste_clipboard_image.execute().await?;
        for warning in &pasted.warnings {
            eprintln!("warning: {warning}");
        }
        sources.push((pasted.file.name.clone(), OcrSource::File(pasted.file)));
    } else {
        if args.files.is_empty() {
            anyhow::bail!("nothing to OCR: pass files, --url or --paste");
        }
        let (accepted, all_accepted) = validate_paths(&args.files, usecases).await;
        success = all_accepted;
        sources.extend(
            accepted
                .into_iter()
                .map(|file| (file.name.clone(), OcrSource::File(file))),
        );
    }

    if sources.is_empty() {
        return Ok(ExitCode::FAILURE);
    }

    let restored = usecases.restore_api_key.execute().await?;
    let Some(api_key) = restored.key() else {
        if matches!(restored, RestoreOutcome::NeedsReentry) {
            eprintln!("stored API key cannot be decrypted on this device; run `key set` again");
        } else {
            eprintln!("no API key stored; run `key set` first");
        }
        return Ok(ExitCode::FAILURE);
    };

    let multiple = sources.len() > 1;
    for (label, source) in &sources {
        let result = match usecases.run_ocr.execute(source, Some(api_key)).await {
            Ok(result) => result,
            Err(err) => {
                warn!(source = %label, error = %err, "OCR failed");
                eprintln!("{label}: {err}");
                success = false;
                continue;
            }
        };

        match &args.out {
            Some(out) => {
                let dir = export_dir(out, label, multiple);
                match usecases.export_result.execute(&result, &dir).await {
                    Ok(summary) => {
                        println!("{label}: {}", summary.markdown_path.display());
                        for skipped in &summary.images_skipped {
                            eprintln!("{label}: image {skipped} could not be decoded");
                        }
                    }
                    Err(err) => {
                        eprintln!("{label}: {err}");
                        success = false;
                    }
                }
            }
            None => {
                if multiple {
                    println!("<!-- {label} -->");
                }
                println!("{}", result.markdown);
            }
        }
    }

    Ok(exit_code(success))
}

/// A single result goes straight into `out`; several get one subdirectory
/// each, named after the source.
fn export_dir(out: &Path, label: &str, multiple: bool) -> PathBuf {
    if multiple {
        out.join(sanitize_filename(label))
    } else {
        out.to_path_buf()
    }
}
