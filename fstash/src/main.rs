mod config;
mod data;
mod logging;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::Config;
use fstash_core::StashStore;
use output::{DeleteOutput, ListOutput, OutputWriter, ShowOutput, StashOutput};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// fstash - A local file stash
#[derive(Parser)]
#[command(name = "fstash")]
#[command(about = "Stash directory trees by name and expand them back", long_about = None)]
#[command(version)]
struct Cli {
    /// Storage root (defaults to FSTASH_HOME env var or ~/.fstash)
    #[arg(short, long, global = true)]
    root: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a stash from the content of a directory
    Create {
        /// Name of the stash: letters, digits, '-' and '_' (case-insensitive)
        #[arg(short = 'n', long)]
        stash_name: String,

        /// Directory whose content is stashed
        #[arg(short = 'c', long, default_value = ".")]
        stash_content: PathBuf,
    },

    /// Expand a stash into a directory, rendering templates
    Expand {
        /// Name of the stash
        #[arg(short = 'n', long)]
        stash_name: String,

        /// Directory the stash is expanded into
        #[arg(short = 'd', long, default_value = ".")]
        destination: PathBuf,

        /// Template data as file=<json object>, keyed by file name without extension
        data: Vec<String>,
    },

    /// Expand a stash into a directory as plain copies
    Pop {
        /// Name of the stash
        #[arg(short = 'n', long)]
        stash_name: String,

        /// Directory the stash is expanded into
        #[arg(short = 'd', long, default_value = ".")]
        destination: PathBuf,
    },

    /// Delete a stash
    Delete {
        /// Name of the stash
        #[arg(short = 'n', long)]
        stash_name: String,
    },

    /// List existing stashes
    List,

    /// Show the files of a stash
    Show {
        /// Name of the stash
        #[arg(short = 'n', long)]
        stash_name: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let out = OutputWriter::new(cli.json);
    match run(cli, &out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = result_code(&err);
            out.write_error(&err, code);
            ExitCode::from(code)
        }
    }
}

fn run(cli: Cli, out: &OutputWriter) -> Result<()> {
    let config = Config::resolve(cli.root)?;
    let store = StashStore::open(&config.storage_root).with_context(|| {
        format!(
            "Failed to open stash storage at {}",
            config.storage_root.display()
        )
    })?;

    match cli.command {
        Commands::Create {
            stash_name,
            stash_content,
        } => cmd_create(&store, out, &stash_name, &config.resolve_dir(&stash_content)),
        Commands::Expand {
            stash_name,
            destination,
            data,
        } => cmd_expand(
            &store,
            out,
            &stash_name,
            &config.resolve_dir(&destination),
            &data,
        ),
        Commands::Pop {
            stash_name,
            destination,
        } => cmd_pop(&store, out, &stash_name, &config.resolve_dir(&destination)),
        Commands::Delete { stash_name } => cmd_delete(&store, out, &stash_name),
        Commands::List => cmd_list(&store, out),
        Commands::Show { stash_name } => cmd_show(&store, out, &stash_name),
    }
}

/// Exit status for a failed command.
fn result_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<fstash_core::Error>() {
        Some(fstash_core::Error::InvalidName { .. }) => 2,
        Some(fstash_core::Error::NotFound { .. }) => 3,
        Some(fstash_core::Error::Template { .. }) => 4,
        _ => 1,
    }
}

fn cmd_create(store: &StashStore, out: &OutputWriter, name: &str, source: &Path) -> Result<()> {
    let summary = store
        .create(name, source)
        .with_context(|| format!("Failed to create stash {} from {}", name, source.display()))?;

    let output = StashOutput {
        success: true,
        result_code: 0,
        operation: "create",
        destination: summary.path.display().to_string(),
        stash: summary,
    };
    out.write(&output, || {
        format!(
            "Created stash {} ({} files, {} bytes)\n",
            output.stash.name, output.stash.stats.files, output.stash.stats.bytes
        )
    })
}

fn cmd_expand(
    store: &StashStore,
    out: &OutputWriter,
    name: &str,
    dest: &Path,
    data: &[String],
) -> Result<()> {
    let template_data = data::parse_template_data(data)?;
    let summary = store
        .expand(name, dest, &template_data)
        .with_context(|| format!("Failed to expand stash {} into {}", name, dest.display()))?;

    write_restore(out, "expand", summary, dest)
}

fn cmd_pop(store: &StashStore, out: &OutputWriter, name: &str, dest: &Path) -> Result<()> {
    let summary = store
        .pop(name, dest)
        .with_context(|| format!("Failed to pop stash {} into {}", name, dest.display()))?;

    write_restore(out, "pop", summary, dest)
}

fn write_restore(
    out: &OutputWriter,
    operation: &'static str,
    summary: fstash_core::StashSummary,
    dest: &Path,
) -> Result<()> {
    let output = StashOutput {
        success: true,
        result_code: 0,
        operation,
        stash: summary,
        destination: dest.display().to_string(),
    };
    out.write(&output, || {
        format!(
            "Expanded stash {} into {} ({} files)\n",
            output.stash.name, output.destination, output.stash.stats.files
        )
    })
}

fn cmd_delete(store: &StashStore, out: &OutputWriter, name: &str) -> Result<()> {
    let deleted = store
        .delete(name)
        .with_context(|| format!("Failed to delete stash {}", name))?;

    let output = DeleteOutput {
        success: true,
        result_code: 0,
        name: fstash_core::StashName::normalize(name).to_string(),
        deleted,
    };
    out.write(&output, || {
        if output.deleted {
            format!("Deleted stash {}\n", output.name)
        } else {
            format!("No stash named {}\n", output.name)
        }
    })
}

fn cmd_list(store: &StashStore, out: &OutputWriter) -> Result<()> {
    let stashes = store.list().with_context(|| "Failed to list stashes")?;

    let output = ListOutput {
        success: true,
        result_code: 0,
        stashes,
    };
    out.write(&output, || format!("{}\n", output.stashes.join(" ")))
}

fn cmd_show(store: &StashStore, out: &OutputWriter, name: &str) -> Result<()> {
    let manifest = store
        .manifest(name)
        .with_context(|| format!("Failed to read stash {}", name))?;

    let output = ShowOutput::new(fstash_core::StashName::normalize(name).to_string(), &manifest);
    out.write(&output, || manifest.to_string())
}
