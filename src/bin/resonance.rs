use std::{
    io::{BufRead, Write as _},
    path::PathBuf,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use resonance::{Canvas, ChatSession, Fps, FrameIndex, HeroScene, HeroSceneOpts, Persona, chat};

#[derive(Parser, Debug)]
#[command(name = "resonance", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single hero frame as a PNG.
    Frame(FrameArgs),
    /// Render a PNG sequence of the hero animation.
    Render(RenderArgs),
    /// Talk to the chat endpoint from stdin.
    Chat(ChatArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[arg(long, default_value_t = 1280)]
    width: u32,

    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Scene time in seconds to advance to before rendering.
    #[arg(long, default_value_t = 0.0)]
    time: f64,

    /// Seed for the visual random stream (default: entropy).
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Output directory for frame_NNNNN.png files.
    #[arg(long)]
    out: PathBuf,

    /// Length of the sequence in seconds.
    #[arg(long)]
    seconds: f64,

    #[arg(long, default_value_t = 60)]
    fps: u32,

    #[arg(long, default_value_t = 1280)]
    width: u32,

    #[arg(long, default_value_t = 720)]
    height: u32,

    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser, Debug)]
struct ChatArgs {
    /// Chat endpoint URL.
    #[arg(long, default_value = chat::DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Persona name sent with every request.
    #[arg(long, default_value = "Resonance")]
    name: String,

    /// Persona task sent with every request.
    #[arg(long, default_value = "assist with creative and technical tasks")]
    task: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
        Command::Chat(args) => cmd_chat(args),
    }
}

fn make_scene(width: u32, height: u32, seed: Option<u64>) -> anyhow::Result<HeroScene> {
    Ok(HeroScene::new(HeroSceneOpts {
        canvas: Canvas::new(width, height),
        seed,
    })?)
}

fn write_png(path: &PathBuf, frame: &resonance::FrameRgba) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut scene = make_scene(args.width, args.height, args.seed)?;

    // Step in display-refresh increments so the tween set sees the same
    // clock it would in a live loop.
    let step = Fps::new(60, 1)?.frame_duration_secs();
    let mut t = 0.0;
    while t < args.time {
        scene.advance(step.min(args.time - t));
        t += step;
    }

    let frame = scene.render_frame()?;
    write_png(&args.out, &frame)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    if args.seconds <= 0.0 {
        anyhow::bail!("--seconds must be > 0");
    }
    let fps = Fps::new(args.fps, 1)?;
    let step = fps.frame_duration_secs();
    let frame_count = (args.seconds * fps.as_f64()).ceil() as u64;

    let mut scene = make_scene(args.width, args.height, args.seed)?;
    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("create output dir '{}'", args.out.display()))?;

    for i in (0..frame_count).map(FrameIndex) {
        let frame = scene.render_frame()?;
        let path = args.out.join(format!("frame_{:05}.png", i.0));
        write_png(&path, &frame)?;
        scene.advance(step);
    }

    eprintln!("wrote {frame_count} frames to {}", args.out.display());
    Ok(())
}

fn cmd_chat(args: ChatArgs) -> anyhow::Result<()> {
    let persona = Persona {
        name: args.name,
        task: args.task,
    };
    let mut session = ChatSession::connect(args.endpoint, persona);

    let stdin = std::io::stdin();
    let mut out = std::io::stdout();

    loop {
        write!(out, "> ")?;
        out.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match session.send(line.trim_end()) {
            Ok(Some(reply)) => println!("{}", reply.text),
            Ok(None) => {}
            // Same posture as the page: report and keep the session alive.
            Err(err) => eprintln!("{err}"),
        }
    }

    Ok(())
}
