use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use raster_burn::toolpath::write_gcode;
use raster_burn::{GenerationParameters, compile_image_file};

/// Convert a raster image to speed-modulated G-code for burning.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Input image (PNG, JPEG).
    input: PathBuf,

    /// G-code output file.
    #[arg(short, long, default_value = "out.g")]
    output: PathBuf,

    /// Also write a preview of the quantized image at source resolution.
    #[arg(long)]
    preview: Option<PathBuf>,

    /// TOML parameter file. Defaults apply to every missing field.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Working grid columns.
    #[arg(long)]
    columns: Option<u32>,

    /// Working grid rows.
    #[arg(long)]
    rows: Option<u32>,

    /// Number of shades to quantize to.
    #[arg(long)]
    shades: Option<u32>,

    /// Log level: error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Cli {
    fn parameters(&self) -> Result<GenerationParameters> {
        let mut params = match &self.config {
            Some(path) => GenerationParameters::load(path)
                .with_context(|| format!("reading parameters from '{}'", path.display()))?,
            None => GenerationParameters::default(),
        };
        if let Some(columns) = self.columns {
            params.columns = columns;
        }
        if let Some(rows) = self.rows {
            params.rows = rows;
        }
        if let Some(shades) = self.shades {
            params.num_shades = shades;
        }
        Ok(params)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    let params = cli.parameters()?;
    log::debug!("Parameters: {params:?}");

    let result = compile_image_file(&cli.input, &params)
        .with_context(|| format!("converting '{}'", cli.input.display()))?;

    let file = File::create(&cli.output)
        .with_context(|| format!("creating '{}'", cli.output.display()))?;
    write_gcode(
        &mut BufWriter::new(file),
        &result.toolpath,
        params.units,
        params.precision,
    )
    .with_context(|| format!("writing G-code to '{}'", cli.output.display()))?;
    log::info!("Wrote {}", cli.output.display());

    if let Some(preview_path) = &cli.preview {
        result
            .preview()?
            .save(preview_path)
            .with_context(|| format!("writing preview to '{}'", preview_path.display()))?;
        log::info!("Wrote preview {}", preview_path.display());
    }

    println!("{}", result.summary);
    Ok(())
}
