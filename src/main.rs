//! cutkit - send path lists to a CutcutGo cutter

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use cutkit::{
    find_bbox, flip, init_logging, known_devices, list_ports, load_path_list, media_layout,
    mirror, setup_options, Config, CutterSession, Offset, PathList, PlotMode, PlotRequest,
};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "cutkit", version = cutkit::VERSION)]
#[command(about = "Driver for Cricut-class cutters running CutcutGo", long_about = None)]
struct Cli {
    /// Configuration file (.toml or .json); defaults to the user config
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plot a path list
    Plot(PlotArgs),
    /// Print the bounding box of a path list
    Bbox {
        /// Path list file
        input: PathBuf,
        #[command(flatten)]
        transform: TransformArgs,
    },
    /// List serial ports and any cutter found on them
    Ports,
}

#[derive(Args)]
struct TransformArgs {
    /// Reflect the design top to bottom
    #[arg(long)]
    flip: bool,
    /// Reflect the design left to right
    #[arg(long)]
    mirror: bool,
}

#[derive(Args)]
struct PlotArgs {
    /// Path list file: JSON `[[[x, y], ...], ...]` or a dump file
    input: PathBuf,

    /// cut, outline, or dry-run
    #[arg(short, long, default_value_t = PlotMode::Cut)]
    mode: PlotMode,

    /// Do not write anything to the device
    #[arg(long)]
    dry_run: bool,

    /// Offset in mm as `x` or `x,y`
    #[arg(long, allow_hyphen_values = true)]
    offset: Option<Offset>,

    /// Media preset id
    #[arg(long)]
    media: Option<u16>,

    /// Media width in mm
    #[arg(long)]
    width: Option<f64>,

    /// Media height in mm
    #[arg(long)]
    height: Option<f64>,

    #[arg(long)]
    margin_top: Option<f64>,

    #[arg(long)]
    margin_left: Option<f64>,

    /// Keep cutting segments that leave the media
    #[arg(long)]
    no_clipping: bool,

    /// Serial port; discovered by USB id when omitted
    #[arg(short, long)]
    port: Option<String>,

    /// Record every command sent to this file
    #[arg(long)]
    transcript: Option<PathBuf>,

    #[command(flatten)]
    transform: TransformArgs,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_json)?;
    tracing::debug!("cutkit {} built {}", cutkit::VERSION, cutkit::BUILD_DATE);

    let config = Config::load_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;

    match cli.command {
        Commands::Plot(args) => plot(config, args),
        Commands::Bbox { input, transform } => {
            let paths = load_design(&input, &transform)?;
            let bbox = find_bbox(&paths)?;
            println!("{}", serde_json::to_string_pretty(&bbox)?);
            Ok(())
        }
        Commands::Ports => show_ports(),
    }
}

fn load_design(input: &Path, transform: &TransformArgs) -> Result<PathList> {
    let mut paths = load_path_list(input)
        .with_context(|| format!("Failed to read path list {}", input.display()))?;
    if transform.flip {
        paths = flip(&paths)?;
    }
    if transform.mirror {
        paths = mirror(&paths)?;
    }
    Ok(paths)
}

fn apply_overrides(config: &mut Config, args: &PlotArgs) {
    if args.dry_run {
        config.connection.dry_run = true;
    }
    if let Some(port) = &args.port {
        config.connection.port = port.clone();
    }
    if let Some(transcript) = &args.transcript {
        config.connection.transcript = Some(transcript.clone());
    }
    if let Some(media) = args.media {
        config.tool.media = media;
    }
    if let Some(width) = args.width {
        config.plot.media_width = width;
    }
    if let Some(height) = args.height {
        config.plot.media_height = height;
    }
    if args.margin_top.is_some() {
        config.plot.margin_top = args.margin_top;
    }
    if args.margin_left.is_some() {
        config.plot.margin_left = args.margin_left;
    }
    if let Some(offset) = args.offset {
        config.plot.offset_x = offset.x;
        config.plot.offset_y = offset.y;
    }
    if args.no_clipping {
        config.plot.sw_clipping = false;
    }
}

fn start_session(config: &Config) -> Result<CutterSession> {
    let session = cutkit::open_session(config)?;
    let session = session.with_progress(Box::new(|done, total, flags| {
        eprint!(" {:3}% {}\r", 100 * done / total.max(1), flags);
    }));

    match &config.connection.transcript {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create transcript {}", path.display()))?;
            Ok(session.with_transcript(Box::new(file)))
        }
        None => Ok(session),
    }
}

fn plot(mut config: Config, args: PlotArgs) -> Result<()> {
    apply_overrides(&mut config, &args);
    config.validate()?;

    let paths = load_design(&args.input, &args.transform)?;
    let request = PlotRequest::new(paths)
        .with_layout(media_layout(&config))
        .with_offset(config.plot.offset())
        .with_mode(args.mode);

    let mut session = start_session(&config)?;
    tracing::info!("Using {}", session.device().name);

    let tool = session.setup(setup_options(&config))?;
    tracing::debug!("Tool setup: {:?}", tool);

    let state = session.wait_for_ready(Duration::from_secs(30), Duration::from_secs(2))?;
    if !state.is_ready() {
        bail!("Cutter is not ready: {}", state);
    }

    let (output, delivery) = session.plot(&request)?;
    session.close()?;
    eprintln!();

    let report = serde_json::json!({
        "report": output.report,
        "commands": output.commands.len(),
        "sent": delivery.sent,
        "timeouts": delivery.timeouts,
    });
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", serde_json::to_string_pretty(&report)?)?;
    Ok(())
}

fn show_ports() -> Result<()> {
    let devices = known_devices();
    let ports = list_ports()?;
    if ports.is_empty() {
        println!("No serial ports found");
    }
    for port in ports {
        match port.identify(&devices) {
            Some(device) => println!("{}  {}  [{}]", port.port_name, port.description, device.name),
            None => println!("{}  {}", port.port_name, port.description),
        }
    }
    Ok(())
}
