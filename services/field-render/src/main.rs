//! Temperature field renderer.
//!
//! Reads `x y T` samples, interpolates them onto a regular grid and writes a
//! filled contour plot as PNG.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use field_render::{run, RenderRequest};
use grid_processor::{ClampRange, InterpolationConfig, InterpolationMethod};
use renderer::PlotStyle;
use sample_parser::{DecimalSeparator, ParseOptions};
use tracing::{info, Level, Subscriber};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "field-render")]
#[command(about = "Render scattered temperature samples as a filled contour plot")]
struct Args {
    /// Sample file with one `x y T` row per line
    input: PathBuf,

    /// Decimal separator used in the file ("." or ",")
    #[arg(short, long, env = "FIELD_DECIMAL_SEPARATOR", default_value = ".")]
    decimal_separator: DecimalSeparator,

    /// Interpolation method: nearest, linear or cubic
    #[arg(short, long, default_value = "nearest")]
    method: InterpolationMethod,

    /// Fail on rows that do not have exactly three fields
    #[arg(long)]
    strict: bool,

    /// Grid nodes along each axis
    #[arg(long, default_value_t = 100)]
    resolution: usize,

    /// Lower clamp bound for interpolated temperatures
    #[arg(long, default_value_t = ClampRange::DEFAULT_MIN, allow_negative_numbers = true)]
    clamp_min: f64,

    /// Upper clamp bound (historically documented as 500, applied as 300)
    #[arg(long, default_value_t = ClampRange::DEFAULT_MAX, allow_negative_numbers = true)]
    clamp_max: f64,

    /// Output PNG path
    #[arg(short, long, default_value = "temperature_field.png")]
    output: PathBuf,

    /// Image width in pixels
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = 600)]
    height: u32,

    /// TrueType font for labels (falls back to the built-in font)
    #[arg(long, env = "FIELD_RENDER_FONT")]
    font: Option<PathBuf>,

    /// Overlay the input samples as markers
    #[arg(long)]
    show_samples: bool,

    /// Open the written image in the system viewer
    #[arg(long)]
    show: bool,

    /// Print a JSON summary of the render to stdout
    #[arg(long)]
    summary_json: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn into_request(self) -> Result<RenderRequest> {
        let mut parse = ParseOptions::new(self.decimal_separator);
        if self.strict {
            parse = parse.strict();
        }

        let clamp = ClampRange::new(self.clamp_min, self.clamp_max)?;
        let interpolation = InterpolationConfig::default()
            .with_method(self.method)
            .with_resolution(self.resolution, self.resolution)
            .with_clamp(clamp);
        interpolation.validate()?;

        let mut style = PlotStyle::default()
            .with_size(self.width, self.height)
            .with_samples(self.show_samples);
        if let Some(font) = self.font {
            style = style.with_font_file(font);
        }

        Ok(RenderRequest {
            input: self.input,
            parse,
            interpolation,
            style,
            output: self.output,
            show: self.show,
        })
    }
}

fn parse_level(name: &str) -> Level {
    match name.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Plain-text subscriber on stderr, keeping stdout free for the summary.
fn build_subscriber(level: Level) -> impl Subscriber + Send + Sync + 'static {
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish()
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing::subscriber::set_global_default(build_subscriber(parse_level(&args.log_level)))?;

    let summary_json = args.summary_json;
    let request = args.into_request()?;
    info!(
        input = %request.input.display(),
        method = %request.interpolation.method,
        separator = %request.parse.decimal_separator,
        "Starting field render"
    );

    let summary = run(&request)?;

    if summary_json {
        let json = serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?;
        println!("{json}");
    }

    Ok(())
}
