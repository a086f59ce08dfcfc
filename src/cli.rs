// src/cli.rs
// =============================================================================
// Command-line interface, defined with clap's derive API.
//
// Every command reads post bodies from files, or from stdin when the path
// is "-". Each one can take a TOML config with --config.
// =============================================================================

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use embed_lens::Preset;

#[derive(Parser, Debug)]
#[command(
    name = "embed-lens",
    version,
    about = "Extracts media embeds from post bodies and strips them from the prose",
    long_about = "embed-lens reads a Markdown/HTML post body, lists the images and videos it embeds \
                  (deduplicated, filtered and with canonical hosts) and prints the prose without them. \
                  Set RUST_LOG=debug to see what the pipeline does."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the media of a post body
    ///
    /// Example: embed-lens extract post.md --json
    Extract {
        /// Post body file, or "-" for stdin
        input: PathBuf,

        /// Print the full result (cleaned text and media) as JSON
        #[arg(long)]
        json: bool,

        /// Pipeline configuration (TOML)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Show media in carousel order (animated images first)
        #[arg(long)]
        presentation: bool,
    },

    /// Print the post body after a preset of text passes
    ///
    /// Example: embed-lens transform post.md --preset inline
    Transform {
        /// Post body file, or "-" for stdin
        input: PathBuf,

        /// gallery = prose with all media removed, inline = share links as players
        #[arg(long, value_enum, default_value_t = Preset::Gallery)]
        preset: Preset,

        /// Pipeline configuration (TOML)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// List the post/profile links and @mentions left in the cleaned prose
    ///
    /// Example: embed-lens links post.md --json
    Links {
        /// Post body file, or "-" for stdin
        input: PathBuf,

        /// Output results in JSON format instead of a table
        #[arg(long)]
        json: bool,

        /// Pipeline configuration (TOML)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Check that no media would show up both inline and in the gallery
    ///
    /// Exits with 1 when any file has a problem.
    Check {
        /// Post body files ("-" for stdin)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output results in JSON format instead of a table
        #[arg(long)]
        json: bool,

        /// Pipeline configuration (TOML)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_transform_defaults_to_gallery() {
        let cli = Cli::parse_from(["embed-lens", "transform", "post.md"]);
        match cli.command {
            Commands::Transform { preset, config, .. } => {
                assert_eq!(preset, Preset::Gallery);
                assert!(config.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_check_needs_an_input() {
        assert!(Cli::try_parse_from(["embed-lens", "check"]).is_err());
    }
}
