//! Command-line interface definitions for Investment Sentinel.
//!
//! This module defines the CLI arguments and subcommands using the `clap` crate.
//! Site settings can be provided via command-line flags or environment variables;
//! flags override values from the optional YAML config file.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments for the Investment Sentinel application.
///
/// # Examples
///
/// ```sh
/// # Check that the cookie still opens the gated course page
/// investment_sentinel page
///
/// # Full brief as plain text, discovering up to 5 posts
/// FM_COOKIE="session=..." investment_sentinel --discovery-limit 5 brief
///
/// # Brief as JSON, also written to ./out/<date>/
/// investment_sentinel brief --format json -o ./out
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long, global = true, env = "SENTINEL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Base site address
    #[arg(long, global = true, env = "FM_BASE_URL")]
    pub base_url: Option<String>,

    /// Path of the gated content page
    #[arg(long, global = true, env = "FM_CONTENT_PATH")]
    pub content_path: Option<String>,

    /// Cookie header value for the gated site
    #[arg(long, global = true, env = "FM_COOKIE", hide_env_values = true)]
    pub cookie: Option<String>,

    /// Comma-separated list of article URLs always included in the digest
    #[arg(long, global = true, env = "FM_FIXED_URLS")]
    pub fixed_urls: Option<String>,

    /// Path of the index page scanned for article links
    #[arg(long, global = true, env = "FM_INDEX_PATH")]
    pub index_path: Option<String>,

    /// Regex matched against the path of each discovered link
    #[arg(long, global = true, env = "FM_ARTICLE_PATTERN")]
    pub article_pattern: Option<String>,

    /// Maximum number of discovered links (values below 1 are treated as 1)
    #[arg(long, global = true, env = "FM_DISCOVERY_LIMIT", allow_negative_numbers = true)]
    pub discovery_limit: Option<i64>,

    /// Maximum number of article fetches in flight
    #[arg(long, global = true)]
    pub concurrency: Option<usize>,

    /// Retries for transport errors and 5xx responses
    #[arg(long, global = true)]
    pub retries: Option<usize>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fetch the gated content page and report its title
    Page {
        /// Explicit URL, overrides the configured content path
        #[arg(long)]
        url: Option<String>,
        /// Path relative to the base site address
        #[arg(long)]
        path: Option<String>,
    },
    /// Fetch one article and print its extracted fields
    Article {
        #[arg(long)]
        url: Option<String>,
    },
    /// Fetch and extract an explicit list of URLs
    Batch {
        #[arg(long = "url")]
        urls: Vec<String>,
    },
    /// List article links found on the index page
    Discover,
    /// Discover, merge with the fixed list, fetch and extract everything
    Digest,
    /// Build the full brief: digest, news, broker status, recommendations
    Brief {
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
        /// Also write the brief (JSON and text) under this directory
        #[arg(short, long)]
        output_dir: Option<String>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Text,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_brief_defaults() {
        let cli = Cli::parse_from(["investment_sentinel", "brief"]);
        assert_eq!(
            cli.command,
            Command::Brief {
                format: Format::Text,
                output_dir: None
            }
        );
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "investment_sentinel",
            "digest",
            "--base-url",
            "https://site.test",
            "--discovery-limit",
            "-3",
        ]);
        assert_eq!(cli.command, Command::Digest);
        assert_eq!(cli.base_url.as_deref(), Some("https://site.test"));
        assert_eq!(cli.discovery_limit, Some(-3));
    }

    #[test]
    fn test_cli_batch_repeated_urls() {
        let cli = Cli::parse_from([
            "investment_sentinel",
            "batch",
            "--url",
            "/post/a",
            "--url",
            "/post/b",
        ]);
        assert_eq!(
            cli.command,
            Command::Batch {
                urls: vec!["/post/a".into(), "/post/b".into()]
            }
        );
    }

    #[test]
    fn test_cli_brief_json_with_output() {
        let cli = Cli::parse_from([
            "investment_sentinel",
            "brief",
            "--format",
            "json",
            "-o",
            "/tmp/briefs",
        ]);
        assert_eq!(
            cli.command,
            Command::Brief {
                format: Format::Json,
                output_dir: Some("/tmp/briefs".into())
            }
        );
    }
}
