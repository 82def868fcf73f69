use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use scriptreel::encode::ffmpeg::{DEFAULT_OUT_PATH, ensure_parent_dir};
use scriptreel::{
    Animation, AnimationConfig, CpuRenderer, CpuRendererOpts, FfmpegSink, FfmpegSinkOpts,
    FrameIndex, FrameScript, ScriptHost,
};

#[derive(Parser, Debug)]
#[command(name = "scriptreel", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the animation to MP4 (requires `ffmpeg` on PATH). This is the default.
    Render(RenderArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Print the resolved configuration as JSON.
    Config(ScriptArgs),
}

#[derive(Args, Debug)]
struct ScriptArgs {
    /// Lua script declaring the animation globals.
    #[arg(long, default_value = "main.lua", conflicts_with = "no_script")]
    script: PathBuf,

    /// Skip the script and use the built-in defaults.
    #[arg(long, default_value_t = false)]
    no_script: bool,

    /// Font file for `DrawText`, overriding the script's `fontPath`.
    #[arg(long)]
    font: Option<PathBuf>,
}

impl Default for ScriptArgs {
    fn default() -> Self {
        Self {
            script: PathBuf::from("main.lua"),
            no_script: false,
            font: None,
        }
    }
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    script: ScriptArgs,

    /// Output MP4 path.
    #[arg(long, default_value = DEFAULT_OUT_PATH)]
    out: PathBuf,

    /// Encoder executable.
    #[arg(long, default_value = "ffmpeg")]
    ffmpeg: PathBuf,

    /// Fail instead of overwriting an existing output file.
    #[arg(long, default_value_t = false)]
    no_overwrite: bool,
}

impl Default for RenderArgs {
    fn default() -> Self {
        Self {
            script: ScriptArgs::default(),
            out: PathBuf::from(DEFAULT_OUT_PATH),
            ffmpeg: PathBuf::from("ffmpeg"),
            no_overwrite: false,
        }
    }
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    script: ScriptArgs,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd.unwrap_or_else(|| Command::Render(RenderArgs::default())) {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Config(args) => cmd_config(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

/// Resolved configuration plus the script that produced it, if any.
struct Loaded {
    config: AnimationConfig,
    host: Option<ScriptHost>,
}

impl Loaded {
    fn script(&mut self) -> Option<&mut dyn FrameScript> {
        self.host.as_mut().map(|h| h as &mut dyn FrameScript)
    }
}

fn load(args: &ScriptArgs) -> anyhow::Result<Loaded> {
    let (config, host) = if args.no_script {
        (AnimationConfig::default(), None)
    } else {
        let mut host = ScriptHost::new()?;
        host.load_script(&args.script)?;
        let config = host
            .read_config()
            .with_context(|| format!("resolve config from '{}'", args.script.display()))?;
        (config, Some(host))
    };
    let config = match &args.font {
        Some(font) => config.with_font_path(Some(font.clone())),
        None => config,
    };
    Ok(Loaded { config, host })
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut loaded = load(&args.script)?;

    let animation = Animation::new(loaded.config.clone())?;
    let mut renderer = CpuRenderer::new(&loaded.config, CpuRendererOpts::default())?;

    let mut sink_opts = FfmpegSinkOpts::new(args.out).with_program(args.ffmpeg);
    sink_opts.overwrite = !args.no_overwrite;
    let mut sink = FfmpegSink::new(sink_opts);

    let stats = animation.run(&mut renderer, loaded.script(), &mut sink)?;

    eprintln!(
        "wrote {} ({} frames, {} bytes of raw video)",
        sink.out_path().display(),
        stats.frames_written,
        stats.bytes_written
    );
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut loaded = load(&args.script)?;
    let config = loaded.config.clone();
    let mut renderer = CpuRenderer::new(&config, CpuRendererOpts::default())?;
    let frame = scriptreel::render_single_frame(
        &mut renderer,
        loaded.script(),
        &config,
        FrameIndex(args.frame),
    )?;

    ensure_parent_dir(&args.out)?;
    image::save_buffer_with_format(
        &args.out,
        frame.data(),
        frame.width,
        frame.height,
        image::ColorType::Rgb8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_config(args: ScriptArgs) -> anyhow::Result<()> {
    let loaded = load(&args)?;
    let json = serde_json::to_string_pretty(&loaded.config).context("serialize config")?;
    println!("{json}");
    Ok(())
}
