//! w3edit - Wasteland 3 save editor CLI
//!
//! Decode an XLZF save, hand the document to an external editor, and encode
//! the result into a sibling save the game can load. The original file is
//! never overwritten.

mod edit;
mod report;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use report::{HeaderReport, SaveReport};
use std::fs;
use std::path::{Path, PathBuf};
use w3_core::container::{self, DEFAULT_OUTPUT_SUFFIX};
use w3_core::{Compression, Lz4Compression, SaveContainer};

#[derive(Parser)]
#[command(name = "w3edit")]
#[command(about = "Edit Wasteland 3 XLZF save containers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a save, open the document in an editor, encode the result
    Edit {
        /// Input save file
        save: PathBuf,

        /// Editor command (falls back to $VISUAL, then $EDITOR, then vi)
        #[arg(long)]
        editor: Option<String>,

        /// Pretty-print command to pipe the document through before editing,
        /// e.g. "xmlstarlet format"
        #[arg(long)]
        format_with: Option<String>,

        /// Suffix appended to the output directory and file name
        #[arg(long, default_value = DEFAULT_OUTPUT_SUFFIX)]
        suffix: String,

        /// Output metadata JSON file
        #[arg(long)]
        metadata: Option<PathBuf>,
    },

    /// Decode a save and write the plain document
    Unpack {
        /// Input save file
        save: PathBuf,

        /// Output file for the decompressed document
        #[arg(long)]
        out: PathBuf,
    },

    /// Rebuild a save from a previously unpacked document
    Pack {
        /// Input save file providing the header fields
        save: PathBuf,

        /// Replacement document
        #[arg(long)]
        payload: PathBuf,

        /// Output save path (defaults to the derived sibling path)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Suffix appended to the output directory and file name
        #[arg(long, default_value = DEFAULT_OUTPUT_SUFFIX)]
        suffix: String,

        /// Output metadata JSON file
        #[arg(long)]
        metadata: Option<PathBuf>,
    },

    /// Print the header fields of a save
    Info {
        /// Input save file
        save: PathBuf,

        /// Emit machine-readable JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let compression = Lz4Compression;

    match cli.command {
        Commands::Edit { save, editor, format_with, suffix, metadata } => {
            let mut container = load_save(&save, &compression)?;

            let edited =
                edit::edit_payload(container.payload(), editor.as_deref(), format_with.as_deref())?;
            container.set_payload(edited);

            let out = container::derived_output_path(&save, &suffix);
            write_save(&mut container, &save, &out, &compression, metadata.as_deref())?;
        }

        Commands::Unpack { save, out } => {
            let container = load_save(&save, &compression)?;
            fs::write(&out, container.payload())
                .with_context(|| format!("Failed to write document: {}", out.display()))?;
            println!("✅ Unpacked {} bytes to {}", container.payload().len(), out.display());
        }

        Commands::Pack { save, payload, out, suffix, metadata } => {
            let mut container = load_save(&save, &compression)?;

            let document = fs::read(&payload)
                .with_context(|| format!("Failed to read document: {}", payload.display()))?;
            container.set_payload(document);

            let out = out.unwrap_or_else(|| container::derived_output_path(&save, &suffix));
            write_save(&mut container, &save, &out, &compression, metadata.as_deref())?;
        }

        Commands::Info { save, json } => {
            let container = load_save(&save, &compression)?;
            let view = HeaderReport::from_header(&container.header);
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                view.print();
            }
        }
    }

    Ok(())
}

fn load_save(path: &Path, compression: &dyn Compression) -> Result<SaveContainer> {
    container::load(path, compression)
        .with_context(|| format!("Failed to load save: {}", path.display()))
}

fn write_save(
    container: &mut SaveContainer,
    input: &Path,
    out: &Path,
    compression: &dyn Compression,
    metadata: Option<&Path>,
) -> Result<()> {
    if out == input {
        bail!("Refusing to overwrite the input save: {}", input.display());
    }

    container::save(container, out, compression)
        .with_context(|| format!("Failed to write save: {}", out.display()))?;

    let report = SaveReport::collect(&container.header, out)?;
    report.print();

    if let Some(metadata_path) = metadata {
        report.write_json(metadata_path)?;
    }

    Ok(())
}
