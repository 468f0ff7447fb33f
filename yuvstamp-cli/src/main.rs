use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use yuvstamp::{FrameSequence, Image, bgr_to_yuv420};

#[derive(Parser, Debug)]
#[command(name = "yuvstamp", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the geometry of a 24-bit BMP file.
    Info(InfoArgs),
    /// Convert a 24-bit BMP to a headerless planar YUV 4:2:0 dump.
    Convert(ConvertArgs),
    /// Stamp a BMP onto every frame of a raw YUV 4:2:0 video.
    Overlay(OverlayArgs),
}

#[derive(Parser, Debug)]
struct InfoArgs {
    /// Input BMP path.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Input BMP path.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output raw YUV path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct OverlayArgs {
    /// Input BMP path (the stamp).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Input raw YUV 4:2:0 video path.
    #[arg(long)]
    video: PathBuf,

    /// Video frame width in pixels.
    #[arg(long)]
    width: u32,

    /// Video frame height in pixels.
    #[arg(long)]
    height: u32,

    /// Number of frames to load from the video.
    #[arg(long)]
    frames: u32,

    /// Horizontal offset of the stamp's top-left corner (must be even).
    #[arg(long, default_value_t = 0)]
    offset_x: u32,

    /// Vertical offset of the stamp's top-left corner (must be even).
    #[arg(long, default_value_t = 0)]
    offset_y: u32,

    /// Output raw YUV path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Info(args) => cmd_info(args),
        Command::Convert(args) => cmd_convert(args),
        Command::Overlay(args) => cmd_overlay(args),
    }
}

fn cmd_info(args: InfoArgs) -> anyhow::Result<()> {
    let image = Image::decode(&args.in_path)?;
    println!(
        "{}x{} px, {} bytes per pixel, {} pixel bytes",
        image.width(),
        image.height(),
        image.bytes_per_pixel(),
        image.data().len()
    );
    Ok(())
}

fn cmd_convert(args: ConvertArgs) -> anyhow::Result<()> {
    let mut image = Image::decode(&args.in_path)
        .with_context(|| format!("decode '{}'", args.in_path.display()))?;
    bgr_to_yuv420(&mut image)?;
    image.save(&args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_overlay(args: OverlayArgs) -> anyhow::Result<()> {
    let mut image = Image::decode(&args.in_path)
        .with_context(|| format!("decode '{}'", args.in_path.display()))?;
    bgr_to_yuv420(&mut image)?;

    let mut video = FrameSequence::load(&args.video, args.width, args.height, args.frames)
        .with_context(|| format!("load '{}'", args.video.display()))?;
    video.overlay(&image, args.offset_x, args.offset_y)?;
    video.save(&args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
