// src/main.rs
// =============================================================================
// This is the entry point of the embed-lens CLI.
//
// What happens here:
// 1. Set up logging (RUST_LOG, default "warn", written to stderr)
// 2. Parse command-line arguments using clap
// 3. Build the media pipeline from the optional config file
// 4. Dispatch to the subcommand handler and print its output
// 5. Exit with proper code (0 = success, 1 = problems found, 2 = error)
// =============================================================================

mod cli;

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use embed_lens::cache::ContentCache;
use embed_lens::surfaces::{
    check_post, presentation_order, prose_links, AnchorTarget, Inconsistency, ProseLinks,
};
use embed_lens::{MediaItem, MediaPipeline, MediaType, PipelineConfig, Preset, Transformer};

fn main() {
    init_logging();

    let exit_code = match run() {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr so JSON on stdout stays machine readable
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

// Returns:
//   Ok(0) = success
//   Ok(1) = consistency problems found (check)
//   Err   = bad input or config, reported as exit code 2
fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            input,
            json,
            config,
            presentation,
        } => handle_extract(&input, json, config.as_deref(), presentation),
        Commands::Transform {
            input,
            preset,
            config,
        } => handle_transform(&input, preset, config.as_deref()),
        Commands::Links {
            input,
            json,
            config,
        } => handle_links(&input, json, config.as_deref()),
        Commands::Check {
            inputs,
            json,
            config,
        } => handle_check(&inputs, json, config.as_deref()),
    }
}

fn build_pipeline(config_path: Option<&Path>) -> Result<MediaPipeline> {
    let config = match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            PipelineConfig::load(path)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => PipelineConfig::default(),
    };

    MediaPipeline::try_new(config).context("invalid pipeline configuration")
}

// "-" means stdin
fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut raw = String::new();
        io::stdin()
            .read_to_string(&mut raw)
            .context("failed to read post body from stdin")?;
        return Ok(raw);
    }

    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn handle_extract(input: &Path, json: bool, config: Option<&Path>, presentation: bool) -> Result<i32> {
    let pipeline = build_pipeline(config)?;
    let raw = read_input(input)?;

    let mut content = pipeline.process(&raw);
    if presentation {
        content.media_items =
            presentation_order(&content.media_items, &pipeline.config().animated_extension);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&content)?);
    } else {
        print_media_table(&content.media_items);
    }

    Ok(0)
}

fn handle_transform(input: &Path, preset: Preset, config: Option<&Path>) -> Result<i32> {
    let pipeline = build_pipeline(config)?;
    let raw = read_input(input)?;

    let text = Transformer::preset(preset).apply(&raw, pipeline.host_rewrite());
    print!("{}", text);
    if !text.is_empty() && !text.ends_with('\n') {
        println!();
    }

    Ok(0)
}

// Links are read from the cleaned text: that is what the inline surface shows
fn handle_links(input: &Path, json: bool, config: Option<&Path>) -> Result<i32> {
    let pipeline = build_pipeline(config)?;
    let raw = read_input(input)?;

    let content = pipeline.process(&raw);
    let links = prose_links(&content.cleaned_text);

    if json {
        println!("{}", serde_json::to_string_pretty(&links)?);
    } else {
        print_links_table(&links);
    }

    Ok(0)
}

// One checked file, as printed by `check --json`
#[derive(Debug, Serialize)]
struct CheckReport {
    file: PathBuf,
    media: usize,
    problems: Vec<Inconsistency>,
}

fn handle_check(inputs: &[PathBuf], json: bool, config: Option<&Path>) -> Result<i32> {
    let pipeline = build_pipeline(config)?;
    let mut cache = ContentCache::new();
    let mut reports = Vec::with_capacity(inputs.len());

    for input in inputs {
        let raw = read_input(input)?;
        let content = cache.get_or_process(&raw, &pipeline);

        reports.push(CheckReport {
            file: input.clone(),
            media: content.media_items.len(),
            problems: check_post(&raw, &pipeline, content),
        });
    }

    tracing::debug!(files = reports.len(), cache_hits = cache.hits(), "check finished");

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        print_check_table(&reports);
    }

    let problem_count: usize = reports.iter().map(|r| r.problems.len()).sum();
    if problem_count > 0 {
        Ok(1)
    } else {
        Ok(0)
    }
}

// Prints the media list as a human-readable table
fn print_media_table(items: &[MediaItem]) {
    println!("{:<8} {:<80}", "TYPE", "URL");
    println!("{}", "=".repeat(88));

    for item in items {
        let kind = match item.media_type {
            MediaType::Image => "image",
            MediaType::Video => "video",
        };
        println!("{:<8} {:<80}", kind, item.url);
    }

    println!();
    println!("{} media item(s)", items.len());
}

fn print_links_table(links: &ProseLinks) {
    println!("{:<10} {:<80}", "KIND", "TARGET");
    println!("{}", "=".repeat(90));

    for anchor in &links.anchors {
        let (kind, target) = match anchor {
            AnchorTarget::PostPreview { author, permlink } => {
                ("post", format!("@{}/{}", author, permlink))
            }
            AnchorTarget::Profile { username } => ("profile", format!("/skater/{}", username)),
            AnchorTarget::External { href } => ("external", href.clone()),
        };
        println!("{:<10} {:<80}", kind, target);
    }

    for username in &links.mentions {
        println!("{:<10} {:<80}", "mention", format!("@{}", username));
    }

    println!();
    println!(
        "{} link(s), {} mention(s)",
        links.anchors.len(),
        links.mentions.len()
    );
}

fn print_check_table(reports: &[CheckReport]) {
    println!("{:<40} {:<8} {:<60}", "FILE", "MEDIA", "PROBLEM");
    println!("{}", "=".repeat(108));

    for report in reports {
        let file = truncate(&report.file.display().to_string(), 37);

        if report.problems.is_empty() {
            println!("{:<40} {:<8} {:<60}", file, report.media, "ok");
            continue;
        }

        for problem in &report.problems {
            let message = match problem {
                Inconsistency::RenderedInline { url } => format!("rendered inline: {}", url),
                Inconsistency::LeftInText { url } => format!("left in text: {}", url),
                Inconsistency::MissingFromGallery { url } => format!("not in gallery: {}", url),
                Inconsistency::SourceLeftInText { source } => format!("not stripped: {}", source),
            };
            println!("{:<40} {:<8} {:<60}", file, report.media, message);
        }
    }

    println!();

    let failing = reports.iter().filter(|r| !r.problems.is_empty()).count();
    println!("Summary:");
    println!("   OK: {}", reports.len() - failing);
    println!("   With problems: {}", failing);
    println!("   Total: {}", reports.len());
}

// Truncates on a char boundary, adding "..." when cut
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}
