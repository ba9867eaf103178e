use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "camoverlay", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the composited webcam frame described by a config file.
    Render(RenderArgs),
    /// List the valid overlay position names.
    Positions,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Overlay configuration JSON.
    #[arg(long = "config")]
    config_path: PathBuf,

    /// Output PNG path, or `-` for stdout.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Positions => cmd_positions(),
    }
}

fn read_config_json(path: &Path) -> anyhow::Result<camoverlay::OverlayConfig> {
    let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
    let r = BufReader::new(f);
    let cfg: camoverlay::OverlayConfig =
        serde_json::from_reader(r).with_context(|| "parse overlay config JSON")?;
    Ok(cfg)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = read_config_json(&args.config_path)?;
    cfg.validate()?;

    if args.out.as_os_str() == "-" {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        camoverlay::render_overlay(&cfg, &mut out)?;
        out.flush()?;
        return Ok(());
    }

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let file = File::create(&args.out)
        .with_context(|| format!("create output '{}'", args.out.display()))?;
    let mut out = BufWriter::new(file);
    camoverlay::render_overlay(&cfg, &mut out)?;
    out.flush()?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_positions() -> anyhow::Result<()> {
    for position in camoverlay::Position::ALL {
        println!("{position}");
    }
    Ok(())
}
