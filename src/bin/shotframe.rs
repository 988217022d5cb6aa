use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "shotframe", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite a screenshot into a scene and write the image.
    Render(RenderArgs),
    /// Print the frame layout for a content size as JSON.
    Frame(FrameArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Scene description JSON. Defaults apply when omitted.
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Screenshot to composite (PNG, JPEG or WebP).
    #[arg(long)]
    image: PathBuf,

    /// Output image path.
    #[arg(long)]
    out: PathBuf,

    /// Override the scene's export scale.
    #[arg(long)]
    scale: Option<f64>,

    /// Output format. Inferred from the output extension when omitted.
    #[arg(long, value_enum)]
    format: Option<FormatChoice>,

    /// JPEG quality in 0..=1.
    #[arg(long, default_value_t = 0.92)]
    quality: f32,

    /// Register a font face: `family[:weight]=path`. Repeatable.
    #[arg(long = "font", value_name = "SPEC")]
    fonts: Vec<String>,

    /// Render as an editor preview (transparent backgrounds show a checkerboard).
    #[arg(long)]
    preview: bool,

    /// Bitmap for an `image` background, overriding the scene's `source`.
    #[arg(long)]
    background_image: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Frame skin (none, browser, macos, windows, iphone, android).
    #[arg(long)]
    kind: String,

    /// Content width in logical pixels.
    #[arg(long)]
    width: f64,

    /// Content height in logical pixels.
    #[arg(long)]
    height: f64,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatChoice {
    Png,
    Jpeg,
    Webp,
}

impl From<FormatChoice> for shotframe::ImageFormat {
    fn from(c: FormatChoice) -> Self {
        match c {
            FormatChoice::Png => Self::Png,
            FormatChoice::Jpeg => Self::Jpeg,
            FormatChoice::Webp => Self::Webp,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_env("SHOTFRAME_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut scene = match &args.scene {
        Some(path) => shotframe::SceneDescription::from_path(path)?,
        None => shotframe::SceneDescription::default(),
    };
    if let Some(scale) = args.scale {
        scene.export_scale = scale;
    }

    let screenshot = shotframe::Bitmap::open(&args.image)?;
    scene = scene.with_source_image(Arc::new(screenshot));

    let scene_dir = args
        .scene
        .as_deref()
        .and_then(Path::parent)
        .unwrap_or_else(|| Path::new("."));
    attach_background_image(&mut scene, args.background_image.as_deref(), scene_dir)?;

    let mut fonts = shotframe::FontBook::new();
    for spec in &args.fonts {
        let (family, weight, path) = parse_font_spec(spec)?;
        fonts.load(family, weight, path)?;
    }

    let format = match args.format {
        Some(f) => f.into(),
        None => format_from_extension(&args.out)?,
    };
    let opts = shotframe::ExportOptions {
        format,
        quality: args.quality,
    };

    let mut renderer = shotframe::Renderer::new(shotframe::RendererOpts {
        fonts,
        ..shotframe::RendererOpts::default()
    });
    let blob = if args.preview {
        let mut canvas = shotframe::Canvas::new(0, 0)?;
        renderer.render_canvas(&scene, &mut canvas, shotframe::RenderPurpose::Preview)?;
        shotframe::encode(&mut canvas, &opts)?
    } else {
        let mut pool = shotframe::CanvasPool::default();
        shotframe::export_scene(&mut renderer, &scene, &opts, &mut pool)?
    };

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, &blob.bytes)
        .with_context(|| format!("write {} '{}'", blob.mime, args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let kind = shotframe::FrameKind::from_name(&args.kind);
    let layout = shotframe::compute_frame_layout(kind, args.width, args.height);
    let json = serde_json::to_string_pretty(&layout).context("serialize frame layout")?;
    println!("{json}");
    Ok(())
}

fn attach_background_image(
    scene: &mut shotframe::SceneDescription,
    override_path: Option<&Path>,
    scene_dir: &Path,
) -> anyhow::Result<()> {
    let background = scene.background.type_name();
    let shotframe::Background::Image { source, bitmap } = &mut scene.background else {
        if override_path.is_some() {
            tracing::warn!(background, "--background-image ignored for a non-image background");
        }
        return Ok(());
    };
    let path = match (override_path, source.as_deref()) {
        (Some(p), _) => p.to_path_buf(),
        (None, Some(s)) => scene_dir.join(s),
        (None, None) => return Ok(()),
    };
    let decoded = shotframe::Bitmap::open(&path)
        .with_context(|| format!("load background image '{}'", path.display()))?;
    *bitmap = Some(Arc::new(decoded));
    Ok(())
}

/// `family[:weight]=path`, weight defaulting to 400.
fn parse_font_spec(spec: &str) -> anyhow::Result<(String, u16, PathBuf)> {
    let (name, path) = spec
        .split_once('=')
        .with_context(|| format!("font spec '{spec}' must look like family[:weight]=path"))?;
    let (family, weight) = match name.rsplit_once(':') {
        Some((family, w)) => (
            family,
            w.trim()
                .parse::<u16>()
                .with_context(|| format!("font weight '{w}' in '{spec}'"))?,
        ),
        None => (name, 400),
    };
    if family.trim().is_empty() || path.trim().is_empty() {
        anyhow::bail!("font spec '{spec}' must look like family[:weight]=path");
    }
    Ok((family.trim().to_owned(), weight, PathBuf::from(path.trim())))
}

fn format_from_extension(out: &Path) -> anyhow::Result<shotframe::ImageFormat> {
    let ext = out
        .extension()
        .and_then(|e| e.to_str())
        .with_context(|| format!("cannot infer format from '{}'; pass --format", out.display()))?;
    Ok(ext.parse()?)
}
