//! Bitflag CLI - render bit-flag quality bands

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use bitflag_core::config::{Settings, SCHEME_DIRS_ENV};
use bitflag_core::io::{
    scheme_from_json, scheme_from_xml_str, scheme_to_json, write_rgba_tiff, write_xml_file,
    SchemeCatalog, TiffBandReader,
};
use bitflag_core::{BandReader, FlagScheme, PixelWindow};
use bitflag_editor::{CheckState, EditorOptions, FlagTreeModel, NodeIndex};
use bitflag_render::{render_band, Legend};

const PATH_LIST_SEPARATOR: char = if cfg!(windows) { ';' } else { ':' };

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "bitflag")]
#[command(author, version, about = "Render bit-flag quality bands", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Extra directories with scheme files (.xml, .json)
    #[arg(long = "scheme-dir", global = true, env = SCHEME_DIRS_ENV, value_delimiter = PATH_LIST_SEPARATOR)]
    scheme_dirs: Vec<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct SchemeSource {
    /// Name of a catalog scheme
    #[arg(short, long, conflicts_with = "scheme_file")]
    scheme: Option<String>,
    /// Scheme file (.xml or .json); the first scheme in it is used
    #[arg(long)]
    scheme_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the bands of a raster file
    Info {
        /// Input raster file
        input: PathBuf,
    },
    /// Render a flag band to an RGBA TIFF
    Render {
        /// Input raster file
        input: PathBuf,
        /// Output RGBA TIFF
        output: PathBuf,
        #[command(flatten)]
        source: SchemeSource,
        /// Band number (1-based)
        #[arg(short, long, default_value = "1")]
        band: usize,
        /// Paint every visible state with the combined flags color
        #[arg(long)]
        combine_flags: bool,
        /// Check every parameter; zero states follow the configured policy
        #[arg(long)]
        show_all: bool,
        /// Pixel window as 'row,col,rows,cols'
        #[arg(short, long)]
        window: Option<String>,
    },
    /// Print the legend of a scheme
    Legend {
        #[command(flatten)]
        source: SchemeSource,
    },
    /// Catalog operations
    Schemes {
        #[command(subcommand)]
        action: SchemeCommands,
    },
}

#[derive(Subcommand)]
enum SchemeCommands {
    /// List catalog schemes
    List,
    /// Print the parameter tree of a scheme
    Show {
        #[command(flatten)]
        source: SchemeSource,
    },
    /// Write a catalog scheme to a file (.xml or .json)
    Export {
        /// Scheme name
        name: String,
        /// Output file
        output: PathBuf,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

fn load_catalog(settings: &Settings) -> SchemeCatalog {
    let pb = spinner("Loading schemes...");
    let catalog = SchemeCatalog::from_settings(settings);
    pb.finish_and_clear();
    catalog
}

fn resolve_scheme(source: &SchemeSource, settings: &Settings) -> Result<FlagScheme> {
    if let Some(path) = &source.scheme_file {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let scheme = if is_json(path) {
            scheme_from_json(&text)
        } else {
            scheme_from_xml_str(&text)
        };
        return scheme.with_context(|| format!("Invalid scheme file {}", path.display()));
    }

    let Some(name) = &source.scheme else {
        anyhow::bail!("Specify a scheme with --scheme <NAME> or --scheme-file <PATH>");
    };
    let catalog = load_catalog(settings);
    catalog.get(name).cloned().with_context(|| {
        let names: Vec<_> = catalog.names().collect();
        format!("Unknown scheme '{}'. Available: {}", name, names.join(", "))
    })
}

fn parse_window(s: &str) -> Result<PixelWindow> {
    let parts: Vec<usize> = s
        .split(',')
        .map(|v| v.trim().parse::<usize>())
        .collect::<std::result::Result<_, _>>()
        .context("Window values must be non-negative integers")?;
    let [row_off, col_off, rows, cols] = parts[..] else {
        anyhow::bail!("Window must be 'row,col,rows,cols', got: {}", s);
    };
    Ok(PixelWindow {
        row_off,
        col_off,
        rows,
        cols,
    })
}

fn read_raster(path: &Path) -> Result<TiffBandReader> {
    let pb = spinner("Reading raster...");
    let reader = TiffBandReader::open(path).context("Failed to read raster")?;
    pb.finish_and_clear();
    let (rows, cols) = reader.shape();
    info!("Input: {} x {}, {} band(s)", cols, rows, reader.band_count());
    Ok(reader)
}

/// Check every parameter in an editor so the zero-state policy applies.
fn show_all_states(scheme: &FlagScheme, options: EditorOptions) -> FlagScheme {
    let mut model = FlagTreeModel::with_options(options);
    model.set_scheme(scheme);
    for row in 0..model.len() {
        model.set_check_state(NodeIndex::Parameter(row), CheckState::Checked);
    }
    model.to_scheme()
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let mut settings = Settings::from_env();
    settings.scheme_directories = cli.scheme_dirs;

    match cli.command {
        // ── Info ─────────────────────────────────────────────────────
        Commands::Info { input } => {
            let reader = read_raster(&input)?;
            let (rows, cols) = reader.shape();
            println!("File: {}", input.display());
            println!("Dimensions: {} x {} ({} cells)", cols, rows, rows * cols);
            println!("Bands: {}", reader.band_count());
            for band in 1..=reader.band_count() {
                let sample_type = reader.sample_type(band)?;
                let flags = if sample_type.carries_flags() {
                    format!("{} flag bits", reader.bit_depth(band)?)
                } else {
                    "no flags".to_string()
                };
                println!("  Band {}: {} ({})", band, sample_type.name(), flags);
            }
        }

        // ── Render ───────────────────────────────────────────────────
        Commands::Render {
            input,
            output,
            source,
            band,
            combine_flags,
            show_all,
            window,
        } => {
            let mut scheme = resolve_scheme(&source, &settings)?;
            if combine_flags {
                scheme.set_combine_flags(true);
            }
            if show_all {
                scheme = show_all_states(&scheme, EditorOptions::from(&settings));
            }
            info!("Scheme: {} ({} parameters)", scheme.name(), scheme.len());

            let reader = read_raster(&input)?;
            let window = match window {
                Some(w) => parse_window(&w)?,
                None => {
                    let (rows, cols) = reader.shape();
                    PixelWindow::full(rows, cols)
                }
            };

            let start = Instant::now();
            let rgba = render_band(&reader, band, &window, &scheme)
                .with_context(|| format!("Failed to render band {}", band))?;
            let elapsed = start.elapsed();

            let pb = spinner("Writing output...");
            write_rgba_tiff(&output, window.cols, window.rows, &rgba)
                .context("Failed to write output")?;
            pb.finish_and_clear();

            println!("Rendered band saved to: {}", output.display());
            println!("  Processing time: {:.2?}", elapsed);
        }

        // ── Legend ───────────────────────────────────────────────────
        Commands::Legend { source } => {
            let scheme = resolve_scheme(&source, &settings)?;
            print!("{}", Legend::new(&scheme));
        }

        // ── Schemes ──────────────────────────────────────────────────
        Commands::Schemes { action } => match action {
            SchemeCommands::List => {
                let catalog = load_catalog(&settings);
                for scheme in &catalog {
                    println!("{} ({} parameters)", scheme.name(), scheme.len());
                }
            }
            SchemeCommands::Show { source } => {
                let scheme = resolve_scheme(&source, &settings)?;
                let mut model = FlagTreeModel::with_options(EditorOptions::from(&settings));
                model.set_scheme(&scheme);
                println!("{}", scheme.name());
                println!("{}", model);
            }
            SchemeCommands::Export { name, output } => {
                let source = SchemeSource {
                    scheme: Some(name),
                    scheme_file: None,
                };
                let scheme = resolve_scheme(&source, &settings)?;
                if is_json(&output) {
                    fs::write(&output, scheme_to_json(&scheme)?)
                        .context("Failed to write output")?;
                } else {
                    write_xml_file(&output, &[scheme]).context("Failed to write output")?;
                }
                println!("Scheme saved to: {}", output.display());
            }
        },
    }

    Ok(())
}
