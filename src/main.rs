use anyhow::Context;
use clap::{Parser, Subcommand};
use graphwire::{MetadataCache, QueryResult, RawValue, StaticSchema};
use std::io::Read;
use std::path::PathBuf;

/// Graphwire - decode compact graph query replies offline
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode a JSON-encoded raw reply and print the result as JSON
    Decode {
        /// File holding the reply, `-` for stdin
        #[arg(long, default_value = "-")]
        reply: PathBuf,

        /// Property key dictionary, in index order
        #[arg(long, value_delimiter = ',')]
        property_keys: Vec<String>,

        /// Label dictionary, in index order
        #[arg(long, value_delimiter = ',')]
        labels: Vec<String>,

        /// Relationship type dictionary, in index order
        #[arg(long, value_delimiter = ',')]
        relationship_types: Vec<String>,

        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },
}

fn read_input(path: &PathBuf) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("reading reply from stdin")?;
        Ok(input)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
    }
}

fn main() -> anyhow::Result<()> {
    // Defaults to INFO level, can be overridden with RUST_LOG env var
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Command::Decode {
            reply,
            property_keys,
            labels,
            relationship_types,
            pretty,
        } => {
            let input = read_input(&reply)?;
            let raw = RawValue::from_json_str(&input).context("reply is not valid JSON")?;

            let schema = StaticSchema {
                labels,
                property_keys,
                relationship_types,
            };
            let cache = MetadataCache::new();
            let result = QueryResult::from_reply(&raw, &cache, &schema)
                .context("decoding reply")?;

            log::debug!("Decoded {} rows", result.row_count());
            let json = result.to_json()?;
            let output = if pretty {
                serde_json::to_string_pretty(&json)?
            } else {
                serde_json::to_string(&json)?
            };
            println!("{}", output);
        }
    }

    Ok(())
}
