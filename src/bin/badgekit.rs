use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "badgekit", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export a template as SVG, PNG, WebP, or PDF.
    Export(ExportArgs),
    /// Print the auto-fit viewBox and zoom for a container size.
    Fit(FitArgs),
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Template JSON.
    #[arg(long)]
    template: PathBuf,

    /// Layer overrides JSON (object keyed by layer id).
    #[arg(long)]
    overrides: Option<PathBuf>,

    #[arg(long, value_enum)]
    format: FormatChoice,

    /// Raster multiplier for PNG and WebP: 1, 2, 4, or 8.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=8))]
    scale: u32,

    /// Output directory; the file name is derived from the template name.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Runtime configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Leave font `@import` rules out instead of inlining font binaries.
    #[arg(long)]
    no_embed_fonts: bool,
}

#[derive(Parser, Debug)]
struct FitArgs {
    /// Template JSON.
    #[arg(long)]
    template: PathBuf,

    /// Container size in pixels, `<W>x<H>`.
    #[arg(long, value_parser = parse_container)]
    container: (f64, f64),

    /// Runtime configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatChoice {
    Svg,
    Png,
    Webp,
    Pdf,
}

impl From<FormatChoice> for badgekit::ExportFormat {
    fn from(c: FormatChoice) -> Self {
        match c {
            FormatChoice::Svg => Self::Svg,
            FormatChoice::Png => Self::Png,
            FormatChoice::Webp => Self::Webp,
            FormatChoice::Pdf => Self::Pdf,
        }
    }
}

fn parse_container(raw: &str) -> Result<(f64, f64), String> {
    let (w, h) = raw
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected <W>x<H>, got '{raw}'"))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v > 0.0)
            .ok_or_else(|| format!("invalid container dimension '{s}'"))
    };
    Ok((parse(w)?, parse(h)?))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Export(args) => cmd_export(args),
        Command::Fit(args) => cmd_fit(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<badgekit::BadgeConfig> {
    Ok(match path {
        Some(p) => badgekit::BadgeConfig::from_json_file(p)?,
        None => badgekit::BadgeConfig::default(),
    })
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if args.no_embed_fonts {
        config.export.embed_fonts = false;
    }

    let template = badgekit::Template::from_json_file(&args.template)?;
    let overrides = match &args.overrides {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("read overrides '{}'", path.display()))?;
            badgekit::overrides_from_json_str(&json)?
        }
        None => badgekit::LayerOverrides::new(),
    };

    let exporter = badgekit::Exporter::new(&config);
    let scale = badgekit::RasterScale::try_from(args.scale)?;
    let artifact = exporter.export(&template, &overrides, args.format.into(), scale)?;
    let path = artifact.write_to_dir(&args.out_dir)?;

    for url in &artifact.failed_fonts {
        eprintln!("font not embedded: {url}");
    }
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn cmd_fit(args: FitArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let template = badgekit::Template::from_json_file(&args.template)?;
    let content = template.require_intrinsic_size()?;

    let mut viewport = badgekit::ViewportController::new(config.viewport, Some(content));
    viewport.set_container_size(badgekit::Size::new(args.container.0, args.container.1));

    let report = serde_json::json!({
        "viewBox": viewport.view_box(),
        "zoom": viewport.zoom(),
        "zoomPercentage": viewport.zoom_percentage(),
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("serialize fit report")?
    );
    Ok(())
}
