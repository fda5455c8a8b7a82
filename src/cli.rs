//! CLI module - Command-line interface definitions and handlers

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use crate::api::DEFAULT_PREFIX;
use crate::cache::config::CacheConfig;
use crate::cache::store::CacheStore;
use crate::core::render::{OutputFormat, RenderConfig};

/// wmts-cache - manage an on-disk WMTS tile and document cache.
#[derive(Parser, Debug)]
#[command(name = "wmts-cache")]
#[command(
    author,
    version,
    about,
    long_about = r#"wmts-cache inspects and purges a WMTS disk cache, and serves the
management API over HTTP.

The cache root holds one collection per project: a `<hash>.inf` marker with the
project path, and a `<hash>/` directory with `docs/` and `tiles/<layer>/`.

Admin commands print a ResultSet in the selected format (default: jsonl).

Examples:
    wmts-cache --rootdir /var/cache/wmts list
    wmts-cache --rootdir /var/cache/wmts delete france_parts --layer roads
    wmts-cache --rootdir /var/cache/wmts locate --project /data/p.qgs REQUEST=GetCapabilities
    wmts-cache --rootdir /var/cache/wmts serve --bind 0.0.0.0:8080
"#
)]
pub struct Cli {
    /// Cache root directory.
    #[arg(
        long,
        global = true,
        env = "WMTS_CACHE_ROOTDIR",
        value_name = "DIR",
        long_help = "Cache root directory. It must already exist.\n\n\
Can also be set with WMTS_CACHE_ROOTDIR."
    )]
    pub rootdir: Option<PathBuf>,

    /// Tile layout (tc/mp/tms/reverse_tms).
    #[arg(
        long,
        global = true,
        env = "WMTS_CACHE_LAYOUT",
        default_value = "tc",
        value_name = "LAYOUT",
        long_help = "Tile layout used when the cache root is initialized.\n\n\
Supported values:\n\
- tc (default): 3 digit directory groups\n\
- mp: 4 digit directory groups\n\
- tms: level/column/row\n\
- reverse_tms: row/column/level\n\n\
Commands that read an existing cache use the layout recorded in wmts.json."
    )]
    pub layout: String,

    /// Output format (jsonl/json/md).
    #[arg(
        long,
        global = true,
        default_value = "jsonl",
        value_name = "FORMAT",
        long_help = "Select the output format for ResultSet.\n\n\
Supported values:\n\
- jsonl (default)\n\
- json\n\
- md (markdown)"
    )]
    pub format: String,

    /// Pretty-print JSON/JSONL output with indentation.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose mode (debug logging).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Enable debug logging on stderr. RUST_LOG takes precedence when set."
    )]
    pub verbose: bool,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the management API.
    #[command(
        long_about = "Serve the management API until interrupted.\n\n\
A root without wmts.json is initialized with --layout; an existing root keeps\n\
its recorded layout.\n\n\
Example:\n\
  wmts-cache --rootdir /var/cache/wmts serve --bind 127.0.0.1:8080 --prefix /wmtscache\n"
    )]
    Serve {
        /// Address to listen on.
        #[arg(
            long,
            env = "WMTS_CACHE_BIND",
            default_value = "127.0.0.1:8080",
            value_name = "ADDR"
        )]
        bind: SocketAddr,

        /// URL prefix the API is mounted under.
        #[arg(long, default_value = DEFAULT_PREFIX, value_name = "PREFIX")]
        prefix: String,
    },

    /// List cached collections.
    #[command(
        long_about = "Emit one item per collection with its hash, project, layers and\n\
document count.\n\n\
NAME is a glob matched against the full project path or its file name, with or\n\
without the .qgs extension. `*` matches all.\n\n\
Examples:\n\
  wmts-cache list\n\
  wmts-cache list --name 'france_*'\n"
    )]
    List {
        /// Project name or glob.
        #[arg(long, default_value = "*", value_name = "NAME")]
        name: String,
    },

    /// Delete cached collections or a single layer.
    #[command(
        long_about = "Remove every collection whose project matches NAME, or only the\n\
tiles of --layer in each of them.\n\n\
Collections whose marker does not hash to their name are skipped.\n\n\
Examples:\n\
  wmts-cache delete france_parts\n\
  wmts-cache delete '*' --layer roads\n"
    )]
    Delete {
        /// Project name or glob.
        #[arg(value_name = "NAME")]
        name: String,

        /// Only remove this layer.
        #[arg(long, value_name = "LAYER")]
        layer: Option<String>,
    },

    /// Print the cache path for a request.
    #[command(
        long_about = "Compute the path a request would be cached under. Nothing is written.\n\n\
Parameters containing TILEMATRIX address a tile, anything else a document.\n\n\
Examples:\n\
  wmts-cache locate --project /data/p.qgs SERVICE=WMTS REQUEST=GetCapabilities\n\
  wmts-cache locate --project /data/p.qgs LAYER=roads TILEMATRIX=3 TILEROW=2 TILECOL=5\n"
    )]
    Locate {
        /// Project identifier.
        #[arg(long, value_name = "PROJECT")]
        project: String,

        /// Document file suffix.
        #[arg(long, default_value = ".xml", value_name = "SUFFIX")]
        suffix: String,

        /// Request parameters.
        #[arg(value_name = "KEY=VALUE")]
        params: Vec<String>,
    },
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    crate::logging::init(cli.verbose, cli.log_json)?;

    let format: OutputFormat = cli.format.parse().unwrap_or_default();
    let render_config = RenderConfig::with_pretty(format, cli.pretty);

    let root = cli
        .rootdir
        .context("No cache root given, use --rootdir or WMTS_CACHE_ROOTDIR")?;

    match cli.command {
        Commands::Serve { bind, prefix } => {
            let config = CacheConfig::new(&root).with_layout(cli.layout);
            let store = CacheStore::open_or_create(&config)
                .with_context(|| format!("Invalid cache configuration for {}", root.display()))?;

            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .context("Failed to start async runtime")?;
            runtime.block_on(crate::api::serve(Arc::new(store), bind, &prefix))
        }

        Commands::List { name } => crate::commands::run_list(&root, &name, render_config),

        Commands::Delete { name, layer } => {
            crate::commands::run_delete(&root, &name, layer.as_deref(), render_config)
        }

        Commands::Locate {
            project,
            suffix,
            params,
        } => crate::commands::run_locate(
            &root,
            &cli.layout,
            &project,
            &suffix,
            &params,
            render_config,
        ),
    }
}
