use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;
use tracing_subscriber::filter::LevelFilter as SubscriberLevel;
use vidsheet::{
    BatchOptions, BatchReport, BuildOptions, ProgressCallback, ProgressInfo, RenderContext,
    ThumbnailConfig, WorkItem, config,
};

const CLI_AFTER_HELP: &str = "Examples:\n  vidsheet holiday.mp4\n  vidsheet videos/ --cells 9 --cell-columns 3 --jobs 4 --progress\n  vidsheet videos/ --font DejaVuSans.ttf --json\n  vidsheet --completions zsh > _vidsheet";

#[derive(Debug, Parser)]
#[command(
    name = "vidsheet",
    version,
    about = "Generate contact sheets (grids of evenly spaced frames) for video files",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    /// A video file, or a directory to search recursively for videos.
    #[arg(required_unless_present = "completions")]
    path: Option<PathBuf>,

    /// Number of frames sampled into each sheet.
    #[arg(short = 'c', long, default_value_t = config::DEFAULT_CELLS)]
    cells: u32,

    /// Number of cells per row.
    #[arg(short = 's', long, default_value_t = config::DEFAULT_CELL_COLUMNS)]
    cell_columns: u32,

    /// Cell width for portrait and square videos.
    #[arg(short = 'w', long, default_value_t = config::DEFAULT_CELL_MAX_WIDTH)]
    cell_max_width: u32,

    /// Cell height for landscape videos.
    #[arg(short = 't', long, default_value_t = config::DEFAULT_CELL_MAX_HEIGHT)]
    cell_max_height: u32,

    /// Padding around and between cells, in pixels.
    #[arg(short = 'b', long, default_value_t = config::DEFAULT_CELL_BORDER)]
    cell_border: u32,

    /// TrueType/OpenType font used to draw the file name above the grid.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Title font size in pixels.
    #[arg(long, default_value_t = vidsheet::DEFAULT_FONT_SIZE)]
    font_size: f32,

    /// Number of videos processed in parallel (directory mode).
    #[arg(short = 'j', long)]
    jobs: Option<usize>,

    /// Print the directory summary as JSON.
    #[arg(long)]
    json: bool,

    /// Show debug logging, including FFmpeg's own messages.
    #[arg(long)]
    verbose: bool,

    /// Show a progress bar.
    #[arg(long)]
    progress: bool,

    /// Print a shell completion script and exit.
    #[arg(long, value_enum, value_name = "SHELL")]
    completions: Option<Shell>,
}

impl Cli {
    fn thumbnail_config(&self) -> ThumbnailConfig {
        ThumbnailConfig::new()
            .with_cells(self.cells)
            .with_cell_columns(self.cell_columns)
            .with_cell_max_size(self.cell_max_width, self.cell_max_height)
            .with_cell_border(self.cell_border)
    }
}

/// Drives an indicatif bar from library progress callbacks.
struct BarProgress {
    bar: ProgressBar,
}

impl ProgressCallback for BarProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        if let Some(total) = info.total {
            self.bar.set_length(total);
        }
        self.bar.set_position(info.current);
    }
}

fn progress_bar(enabled: bool) -> Result<Option<ProgressBar>, Box<dyn std::error::Error>> {
    if !enabled {
        return Ok(None);
    }
    let bar = ProgressBar::new(0);
    let style = ProgressStyle::with_template("{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}")?;
    bar.set_style(style.progress_chars("##-"));
    Ok(Some(bar))
}

fn install_subscriber(
    level: SubscriberLevel,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        SubscriberLevel::DEBUG
    } else {
        SubscriberLevel::INFO
    };
    if let Err(error) = install_subscriber(level) {
        eprintln!("{} logging disabled: {error}", "warning:".yellow().bold());
    }

    vidsheet::set_ffmpeg_log_level(if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Error
    });
}

fn summary_line(report: &BatchReport) -> String {
    format!(
        "Wrote {} of {} sheet(s)",
        report.succeeded().count(),
        report.outcomes.len()
    )
}

fn run_single(
    cli: &Cli,
    path: &Path,
    config: &ThumbnailConfig,
    render: Option<&RenderContext>,
) -> Result<(), Box<dyn std::error::Error>> {
    let bar = progress_bar(cli.progress)?;
    let mut options = BuildOptions::new();
    if let Some(bar) = &bar {
        bar.set_message(path.display().to_string());
        options = options.with_progress(Arc::new(BarProgress { bar: bar.clone() }));
    }

    let result = vidsheet::create_thumbnail_with_options(path, config, render, &options);
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }
    let output = result?;

    println!("{} {}", "OK:".green().bold(), output.display());
    Ok(())
}

fn run_directory(
    cli: &Cli,
    directory: &Path,
    config: &ThumbnailConfig,
    render: Option<&RenderContext>,
) -> Result<(), Box<dyn std::error::Error>> {
    let videos = vidsheet::find_videos(directory)?;
    if videos.is_empty() && !cli.json {
        println!(
            "{} no video files found under {}",
            "warning:".yellow().bold(),
            directory.display()
        );
        return Ok(());
    }

    let items: Vec<WorkItem> = videos
        .into_iter()
        .map(|path| WorkItem::new(path, *config))
        .collect();

    let bar = progress_bar(cli.progress)?;
    let mut options = BatchOptions::new();
    if let Some(jobs) = cli.jobs {
        options = options.with_workers(jobs);
    }
    if let Some(bar) = &bar {
        options = options.with_progress(Arc::new(BarProgress { bar: bar.clone() }));
    }

    let report = vidsheet::run_batch(items, &options, render)?;
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report.to_json())?);
    } else {
        for outcome in report.failed() {
            if let Err(error) = &outcome.result {
                println!(
                    "{} {}: {error}",
                    "FAILED:".red().bold(),
                    outcome.path.display()
                );
            }
        }
        let summary = summary_line(&report);
        if report.is_success() {
            println!("{} {}", "success:".green().bold(), summary.green());
        } else {
            println!("{} {}", "done:".yellow().bold(), summary.yellow());
        }
    }

    if report.is_success() {
        Ok(())
    } else {
        Err(format!(
            "{} of {} video(s) failed",
            report.failed().count(),
            report.outcomes.len()
        )
        .into())
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        let mut command = Cli::command();
        clap_complete::generate(shell, &mut command, "vidsheet", &mut std::io::stdout());
        return Ok(());
    }

    init_logging(cli.verbose);

    let path = cli.path.clone().ok_or("a video file or directory is required")?;
    if !path.exists() {
        return Err(vidsheet::ThumbnailError::PathNotFound(path).into());
    }

    let config = cli.thumbnail_config();
    config.validate()?;

    let render = cli
        .font
        .as_ref()
        .map(|font| RenderContext::from_file(font, cli.font_size))
        .transpose()?;

    if path.is_file() {
        run_single(&cli, &path, &config, render.as_ref())
    } else if path.is_dir() {
        run_directory(&cli, &path, &config, render.as_ref())
    } else {
        Err(format!("{} is neither a file nor a directory", path.display()).into())
    }
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}
