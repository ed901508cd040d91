//! Docmark - view a PDF or image next to its editable markdown.
//!
//! # Usage
//!
//! ```bash
//! docmark scan.png
//! docmark --no-viewer notes.png
//! docmark --print --json receipt.jpg
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;

use docmark::app::App;
use docmark::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    parse_flag_tokens, save_config_flags,
};
use docmark::intake::{CommandConverter, IntakeOutcome, PathPicker, select_file};
use docmark::perf;
use docmark::viewer::{AssetPaths, LopdfRenderer, PdfRenderer};

/// A terminal document viewer with OCR-to-markdown editing
#[derive(Parser, Debug)]
#[command(name = "docmark", version, about, long_about = None)]
struct Cli {
    /// PDF or image to open on startup
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Start with only the markdown editor visible
    #[arg(long)]
    no_viewer: bool,

    /// Disable inline image rendering (show placeholders only)
    #[arg(long)]
    no_images: bool,

    /// Force image rendering to use half-cell fallback mode
    #[arg(long)]
    force_half_cell: bool,

    /// OCR command reading an image on stdin and writing markdown to stdout
    #[arg(long, value_name = "CMD")]
    ocr_command: Option<String>,

    /// Directory holding the PDF renderer's cmaps/, standard_fonts/ and wasm/
    #[arg(long, value_name = "DIR")]
    asset_root: Option<PathBuf>,

    /// Convert FILE and print the markdown instead of starting the UI
    #[arg(long)]
    print: bool,

    /// With --print, emit OCR items as JSON
    #[arg(long, requires = "print")]
    json: bool,

    /// Enable performance logging
    #[arg(long)]
    perf: bool,

    /// Write detailed debug events to a file
    #[arg(long, value_name = "PATH")]
    render_debug_log: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

/// Tracing output goes beside the debug log so the TUI stays clean.
fn trace_log_path(debug_log: &Path) -> PathBuf {
    let mut name = debug_log.as_os_str().to_owned();
    name.push(".trace");
    PathBuf::from(name)
}

fn init_tracing(debug_log: Option<&Path>) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .from_env_lossy();
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match debug_log {
        Some(path) => {
            let path = trace_log_path(path);
            let file = File::create(&path)
                .with_context(|| format!("Failed to create trace log {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

fn build_converter(flags: &ConfigFlags) -> Result<CommandConverter> {
    flags
        .ocr_command
        .as_deref()
        .map(CommandConverter::from_command_line)
        .transpose()
        .context("Invalid --ocr-command")
        .map(Option::unwrap_or_default)
}

/// Run intake once without a terminal UI and print the result.
fn print_document(
    file: &Path,
    converter: &CommandConverter,
    assets: &AssetPaths,
    json: bool,
) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let picker = PathPicker::new(file);
    let outcome = runtime
        .block_on(select_file(&picker, converter))
        .with_context(|| format!("Failed to convert {}", file.display()))?;

    match outcome {
        IntakeOutcome::Cancelled => anyhow::bail!("Nothing to convert"),
        IntakeOutcome::Pdf(url) => {
            let pdf = LopdfRenderer.load(&url, assets)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&pdf.pages)?);
            } else {
                println!("{}", pdf.pages.join("\n\x0c\n"));
            }
        }
        IntakeOutcome::Image { conversion, .. } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&conversion.items)?);
            } else {
                println!("{}", conversion.markdown);
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    let render_debug_log_path = effective
        .render_debug_log
        .clone()
        .or_else(|| std::env::var_os("DOCMARK_RENDER_DEBUG_LOG").map(PathBuf::from));
    init_tracing(render_debug_log_path.as_deref())?;

    perf::set_enabled(effective.perf);
    if let Err(err) = perf::set_debug_log_path(render_debug_log_path.as_deref()) {
        tracing::warn!(
            "Failed to initialize render debug log {}: {err}",
            render_debug_log_path
                .as_ref()
                .map_or_else(|| "<unset>".to_string(), |p| p.display().to_string()),
        );
    }

    let converter = build_converter(&effective)?;
    let asset_root = effective
        .asset_root
        .clone()
        .unwrap_or_else(|| PathBuf::from("assets"));

    if cli.print {
        let file = cli
            .file
            .as_deref()
            .context("--print needs a FILE to convert")?;
        return print_document(file, &converter, &AssetPaths::under(&asset_root), cli.json);
    }

    if let Some(file) = &cli.file
        && !file.exists()
    {
        anyhow::bail!("File not found: {}", file.display());
    }

    let mut app = App::new()
        .with_initial_file(cli.file)
        .with_viewer_visible(!effective.no_viewer)
        .with_images_enabled(!effective.no_images)
        .with_force_half_cell(effective.force_half_cell)
        .with_converter(Arc::new(converter))
        .with_asset_root(asset_root)
        .with_config_paths(
            Some(global_path),
            local_path.exists().then_some(local_path),
        );

    app.run().context("Application error")
}
