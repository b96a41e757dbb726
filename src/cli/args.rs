//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output
//! - `--config <file>`: Use this config file

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::auth::AuthConfig;
use crate::core::config::OutputFormat;
use crate::core::query::RepositoryQuery;

/// repostamp - stamp builds with the exact state of a git repository
#[derive(Parser, Debug)]
#[command(name = "repostamp")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if repostamp was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output; suppresses warnings
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file to use instead of the default locations
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read a repository and print its state
    #[command(
        name = "read",
        long_about = "Read a repository and print its state.\n\n\
            Resolves HEAD, a branch or a tag to a commit, describes untagged \
            commits with their nearest reachable tag, and reports whether the \
            working tree is clean.\n\n\
            With neither --path nor --url, the repository is found by searching \
            upward from the current directory.",
        after_help = "\
WORKFLOW EXAMPLES:
    # The repository containing the current directory
    repostamp read

    # A tag of a remote repository, as key=value lines
    repostamp read --url https://example.com/app.git --tag v1.2.0 --format text

    # A branch of a local checkout
    repostamp read --path ../service --branch release"
    )]
    Read {
        #[command(flatten)]
        target: TargetArgs,

        #[command(flatten)]
        auth: AuthArgs,

        /// Output format [default: json, or the config file's output.format]
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        long_about = "Generate shell completion scripts for tab-completion.\n\n\
            Outputs a completion script for the specified shell. Add the output \
            to your shell's configuration to enable tab-completion.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Bash (add to ~/.bashrc)
    repostamp completion bash >> ~/.bashrc

    # Zsh (add to ~/.zshrc)
    repostamp completion zsh >> ~/.zshrc

    # Fish
    repostamp completion fish > ~/.config/fish/completions/repostamp.fish

    # PowerShell
    repostamp completion powershell >> $PROFILE"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Which repository and reference to read.
#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// Local repository (work tree root or .git directory); no upward search
    #[arg(long, env = "GIT_DIR", value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Remote repository to clone; takes priority over --path
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Branch to resolve instead of HEAD (not with --tag)
    #[arg(long)]
    pub branch: Option<String>,

    /// Tag to resolve instead of HEAD
    #[arg(long)]
    pub tag: Option<String>,
}

impl From<TargetArgs> for RepositoryQuery {
    fn from(args: TargetArgs) -> Self {
        RepositoryQuery {
            path: args.path,
            url: args.url,
            branch: args.branch,
            tag: args.tag,
        }
    }
}

/// Credentials for remote access; these override the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct AuthArgs {
    /// Username for HTTP basic auth
    #[arg(long)]
    pub username: Option<String>,

    /// Password for HTTP basic auth
    #[arg(long, env = "REPOSTAMP_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// SSH private key text
    #[arg(long, env = "REPOSTAMP_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,

    /// SSH private key file
    #[arg(long, value_name = "FILE")]
    pub private_key_file: Option<PathBuf>,

    /// Accept any SSH host key
    #[arg(long)]
    pub insecure_ignore_host_key: bool,

    /// Accept any TLS certificate
    #[arg(long)]
    pub insecure_skip_tls_verify: bool,
}

impl From<AuthArgs> for AuthConfig {
    fn from(args: AuthArgs) -> Self {
        AuthConfig {
            username: args.username,
            password: args.password,
            private_key: args.private_key,
            private_key_file: args.private_key_file,
            insecure_ignore_host_key: args.insecure_ignore_host_key,
            insecure_skip_tls_verify: args.insecure_skip_tls_verify,
        }
    }
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
}
