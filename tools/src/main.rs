use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use assets::Palette;
use clap::{Parser, Subcommand};
use glob::Pattern;
use qwt_tools::{
    dump, listing, load_image, resolve, schema_report, split_path, summary, write_obj, write_png,
    SCHEMA_NAMES,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "qwt-tools",
    version,
    about = "Quake PAK, WAD, BSP, MDL and SPR inspection tools",
    after_help = "Nested content is addressed with '|', e.g. 'id1/pak0.pak|gfx.wad|CONCHARS'."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a one-line summary.
    Info {
        /// File path, optionally with nested entries.
        path: String,
    },
    /// List directory entries, textures, frames or colors.
    List {
        path: String,
        /// Show offsets, sizes and types.
        #[arg(long, short)]
        verbose: bool,
        /// Only list entries whose name matches this glob.
        #[arg(long)]
        glob: Option<String>,
    },
    /// Write the raw bytes of a file or nested entry.
    Extract {
        path: String,
        #[arg(long, short)]
        output: PathBuf,
    },
    /// Expand an image to PNG.
    Image {
        path: String,
        /// Palette file, optionally nested (e.g. 'pak0.pak|gfx/palette.lmp').
        #[arg(long)]
        palette: String,
        /// Texture, skin or sprite frame index.
        #[arg(long, default_value_t = 0)]
        index: usize,
        /// Mip level 1 to 4; 1 is full size.
        #[arg(long)]
        mip: Option<u8>,
        #[arg(long, short)]
        output: PathBuf,
    },
    /// Write BSP or MDL geometry as Wavefront OBJ.
    Obj {
        path: String,
        /// Fractional MDL frame to blend.
        #[arg(long, default_value_t = 0.0)]
        frame: f32,
        #[arg(long, short)]
        output: PathBuf,
    },
    /// Print a JSON report with the decoded header.
    Dump { path: String },
    /// Print a built-in layout as JSON with its fingerprint.
    Schema {
        /// Layout name; pass 'list' to see all names.
        name: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Info { path } => {
            let data = read_root(&path)?;
            let file = open(&path, &data)?;
            println!("{}", summary(&file)?);
        }
        Command::List {
            path,
            verbose,
            glob,
        } => {
            let pattern = match glob {
                Some(value) => Some(Pattern::new(&value).context("invalid glob pattern")?),
                None => None,
            };
            let data = read_root(&path)?;
            let file = open(&path, &data)?;
            print!("{}", listing(&file, verbose, pattern.as_ref())?);
        }
        Command::Extract { path, output } => {
            let data = read_root(&path)?;
            let file = open(&path, &data)?;
            fs::write(&output, file.bytes)
                .with_context(|| format!("write {}", output.display()))?;
            tracing::info!("wrote {} bytes to {}", file.bytes.len(), output.display());
        }
        Command::Image {
            path,
            palette,
            index,
            mip,
            output,
        } => {
            let palette = load_palette(&palette)?;
            let data = read_root(&path)?;
            let file = open(&path, &data)?;
            let image = load_image(&file, index)?;
            write_png(&image, &palette, mip, &output)?;
        }
        Command::Obj {
            path,
            frame,
            output,
        } => {
            let data = read_root(&path)?;
            let file = open(&path, &data)?;
            let handle = fs::File::create(&output)
                .with_context(|| format!("create {}", output.display()))?;
            let mut writer = BufWriter::new(handle);
            write_obj(&file, frame, &mut writer)?;
            writer
                .flush()
                .with_context(|| format!("write {}", output.display()))?;
            tracing::info!("wrote {}", output.display());
        }
        Command::Dump { path } => {
            let data = read_root(&path)?;
            let file = open(&path, &data)?;
            let report = dump(&file)?;
            let json = serde_json::to_string_pretty(&report).context("serialize json")?;
            println!("{json}");
        }
        Command::Schema { name } => {
            if name == "list" {
                for name in SCHEMA_NAMES {
                    println!("{name}");
                }
            } else {
                let report = schema_report(&name)?;
                let json = serde_json::to_string_pretty(&report).context("serialize json")?;
                println!("{json}");
            }
        }
    }
    Ok(())
}

/// Reads the outermost file of a possibly nested path.
fn read_root(path: &str) -> Result<Vec<u8>> {
    let (file, _) = split_path(path);
    fs::read(Path::new(file)).with_context(|| format!("read {file}"))
}

fn open<'a>(path: &str, data: &'a [u8]) -> Result<qwt_tools::Resolved<'a>> {
    let (file, inner) = split_path(path);
    resolve(file, data, &inner).with_context(|| format!("open {path}"))
}

fn load_palette(path: &str) -> Result<Palette> {
    let data = read_root(path)?;
    let file = open(path, &data)?;
    Palette::parse(file.bytes).with_context(|| format!("parse palette {path}"))
}
