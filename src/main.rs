use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use svd2regs::{generate, GeneratorConfig};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Generate C++ register and bit-field headers from SVD files"
)]
struct Args {
    /// Input SVD file
    input: PathBuf,

    /// Generate code only for the specified peripheral
    #[arg(short = 'p', long = "peripheral", value_name = "PERIPHERAL")]
    peripheral: Option<String>,

    /// Overwrite existing enumerations header files
    #[arg(short = 'o', long = "overwrite")]
    overwrite: bool,

    /// Directory receiving the device directory
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// YAML file with generator options
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fail when fields sharing an enumeration differ in width
    #[arg(long)]
    strict: bool,

    /// Print debug logs
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => GeneratorConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => GeneratorConfig::default(),
    };
    config.overwrite_enumerations |= args.overwrite;
    config.strict_enum_widths |= args.strict;

    let summary = generate(
        &args.input,
        &args.output_dir,
        &config,
        args.peripheral.as_deref(),
    )?;
    tracing::info!(
        "{} register headers, {} enumeration headers written to {}",
        summary.registers.len(),
        summary.enumerations.len(),
        summary.device_dir.display()
    );
    Ok(())
}
