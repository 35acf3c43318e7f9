//! CLI module - Command-line interface definitions and handlers

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;
use crate::core::render::{OutputFormat, RenderConfig};
use crate::core::text::Position;
use crate::links::ResolutionScope;

/// marklink - named anchors and links inside source comments.
#[derive(Parser, Debug)]
#[command(name = "marklink")]
#[command(
    author,
    version,
    about,
    long_about = r#"marklink finds anchor and link markers in source files, resolves links to
anchors, and computes how an editor should decorate them.

Markers:
    [[anchor:NAME]]          pure anchor (hidden when decorated)
    [[anchor:NAME|Label]]    anchor shown as its label
    [[link:NAME]]            pure link
    [[link:NAME|Label]]      link shown as its label

Every data command prints a ResultSet in the selected format (default: jsonl).

Output formats:
- jsonl: one JSON object per line (best for piping into tools)
- json: a single JSON array
- md: human-friendly Markdown
- raw: excerpts only (unstable; intended for debugging)

Examples:
    marklink scan src/main.rs
    marklink anchors list
    marklink resolve src/lib.rs --scope document
    marklink decorate src/lib.rs --cursor 12:4
    marklink preview src/lib.rs
    marklink lint
"#
)]
pub struct Cli {
    /// Root directory for all operations.
    #[arg(
        long,
        global = true,
        default_value = ".",
        value_name = "ROOT",
        long_help = "Root directory for all operations (defaults to the current directory).\n\n\
Document identities are paths relative to this root, and positional FILE arguments\n\
are interpreted relative to it."
    )]
    pub root: PathBuf,

    /// Output format (jsonl/json/md/raw).
    #[arg(
        long,
        global = true,
        default_value = "jsonl",
        value_name = "FORMAT",
        value_parser = parse_format,
        long_help = "Select the output format for ResultSet.\n\n\
Supported values:\n\
- jsonl (default)\n\
- json\n\
- md (markdown)\n\
- raw\n\n\
Has no effect on `preview`, which prints decorated text."
    )]
    pub format: OutputFormat,

    /// Config file (defaults to ROOT/.marklink.json when present).
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Where links look for anchors (document/project).
    #[arg(
        long,
        global = true,
        env = "MARKLINK_SCOPE",
        value_parser = ["document", "project"],
        value_name = "SCOPE",
        long_help = "Where links look for anchors.\n\n\
- document: only the link's own file\n\
- project: the link's own file first, then every other file under ROOT\n\n\
Overrides the `scope` setting of the config file."
    )]
    pub scope: Option<String>,

    /// Disable colored output (when applicable).
    #[arg(
        long,
        global = true,
        long_help = "Disable colored output. This is useful when piping to files or when your\n\
terminal does not support ANSI colors."
    )]
    pub no_color: bool,

    /// Quiet mode (errors only on stderr).
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (debug diagnostics on stderr).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Enable debug diagnostics on stderr. RUST_LOG takes precedence when set."
    )]
    pub verbose: bool,

    /// Pretty-print JSON/JSONL output with indentation.
    #[arg(
        long,
        global = true,
        long_help = "Pretty-print JSON and JSONL output with indentation for human readability.\n\n\
This is useful when manually inspecting results. Has no effect on md/raw formats."
    )]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the markers of one file.
    #[command(long_about = "Scan FILE and emit one anchor or link result per marker, in\n\
document order, with byte spans and zero-based line/character ranges.\n\n\
Example:\n\
  marklink scan src/main.rs\n")]
    Scan {
        /// File to scan (relative to ROOT unless absolute).
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Anchor queries across the workspace.
    Anchors {
        #[command(subcommand)]
        action: AnchorCommands,
    },

    /// Resolve every link of one file.
    #[command(long_about = "Resolve each link in FILE and report whether it is resolved,\n\
unresolved, or ambiguous (several files define the anchor).\n\n\
Examples:\n\
  marklink resolve src/lib.rs\n\
  marklink resolve src/lib.rs --scope document\n")]
    Resolve {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Compute the decoration sets of one file.
    #[command(long_about = "Emit the five decoration sets for FILE as decoration results:\n\
anchor_display, anchor_display_active, link_display, link_display_active, hidden.\n\n\
Markers containing the cursor are also reported as `active` items.\n\n\
Examples:\n\
  marklink decorate src/lib.rs\n\
  marklink decorate src/lib.rs --cursor 10:4\n")]
    Decorate {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Cursor position, zero-based (LINE:CHAR).
        #[arg(long, value_name = "LINE:CHAR", value_parser = parse_position)]
        cursor: Option<Position>,
    },

    /// Print a file the way it looks decorated.
    #[command(long_about = "Print FILE with marker delimiters removed, labels colored, and\n\
anchor/link icons appended, as an editor would display it.\n\n\
Example:\n\
  marklink preview src/lib.rs --cursor 3:0\n")]
    Preview {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Cursor position, zero-based (LINE:CHAR).
        #[arg(long, value_name = "LINE:CHAR", value_parser = parse_position)]
        cursor: Option<Position>,
    },

    /// Report malformed markers, duplicate anchors and broken links.
    #[command(long_about = "Check every file under ROOT and emit issue results:\n\
MALFORMED_MARKER, OVERLAPPING_MARKER, DUPLICATE_ANCHOR, UNRESOLVED_LINK, AMBIGUOUS_LINK.\n\n\
Issues are data; the exit status stays 0.\n\n\
Example:\n\
  marklink lint\n")]
    Lint,
}

#[derive(Subcommand, Debug)]
pub enum AnchorCommands {
    /// List anchors.
    #[command(long_about = "Index every file under ROOT and emit one anchor result per\n\
definition, sorted by path.\n\n\
Examples:\n\
  marklink anchors list\n\
  marklink anchors list --filter setup\n")]
    List {
        /// Only anchors whose name contains this text (case-insensitive).
        #[arg(long, value_name = "TEXT")]
        filter: Option<String>,
    },

    /// Show the definitions of one anchor.
    #[command(long_about = "Emit every definition of NAME (one per file at most).\n\
With --with-links, also emit the links that resolve to it.\n\n\
Examples:\n\
  marklink anchors get setup\n\
  marklink anchors get setup --with-links\n")]
    Get {
        #[arg(value_name = "NAME")]
        name: String,

        /// Include links that point at the anchor.
        #[arg(long)]
        with_links: bool,
    },
}

fn parse_position(s: &str) -> Result<Position, String> {
    s.parse::<Position>().map_err(|e| e.to_string())
}

fn parse_format(s: &str) -> Result<OutputFormat, String> {
    s.parse::<OutputFormat>()
}

pub fn run(cli: Cli) -> Result<()> {
    let render_config = RenderConfig::with_pretty(cli.format, cli.pretty);

    // Get absolute root path
    let root = cli.root.canonicalize().unwrap_or(cli.root);

    let (mut config, source) = Config::discover(&root, cli.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(path) = source {
        log::debug!("Using config from: {}", path.display());
    }
    if let Some(scope) = cli.scope.as_deref() {
        config.scope = scope
            .parse::<ResolutionScope>()
            .map_err(anyhow::Error::msg)?;
    }

    if cli.no_color {
        colored::control::set_override(false);
    }

    match cli.command {
        Commands::Scan { file } => {
            crate::host::commands::run_scan(&root, &file, &config, render_config)
        }

        Commands::Anchors { action } => match action {
            AnchorCommands::List { filter } => {
                crate::anchors::api::run_list(&root, &config, filter.as_deref(), render_config)
            }
            AnchorCommands::Get { name, with_links } => {
                crate::anchors::api::run_get(&root, &config, &name, with_links, render_config)
            }
        },

        Commands::Resolve { file } => {
            crate::host::commands::run_resolve(&root, &file, &config, render_config)
        }

        Commands::Decorate { file, cursor } => {
            crate::host::commands::run_decorate(&root, &file, cursor, &config, render_config)
        }

        Commands::Preview { file, cursor } => {
            crate::host::commands::run_preview(&root, &file, cursor, &config, !cli.no_color)
        }

        Commands::Lint => crate::anchors::lint::run_lint(&root, &config, render_config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_cursor() {
        let cli =
            Cli::try_parse_from(["marklink", "decorate", "a.rs", "--cursor", "10:4"]).unwrap();
        match cli.command {
            Commands::Decorate { cursor, .. } => {
                assert_eq!(cursor, Some(Position::new(10, 4)))
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_invalid_cursor_rejected() {
        let result = Cli::try_parse_from(["marklink", "decorate", "a.rs", "--cursor", "ten"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_format_parsing() {
        let cli = Cli::try_parse_from(["marklink", "--format", "md", "lint"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Markdown);

        let cli = Cli::try_parse_from(["marklink", "lint"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Jsonl);

        assert!(Cli::try_parse_from(["marklink", "--format", "yaml", "lint"]).is_err());
    }

    #[test]
    fn test_invalid_scope_rejected() {
        assert!(Cli::try_parse_from(["marklink", "--scope", "galaxy", "lint"]).is_err());
    }
}
