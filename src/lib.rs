//! Generate C++ register and bit-field headers from CMSIS-SVD descriptions.
//!
//! The description is parsed by `svd-parser`, converted into a raw tree
//! ([`raw`]), every `derivedFrom` is resolved ([`resolver`]) and the
//! resolved [`model`] is emitted peripheral by peripheral. Enumeration groups
//! shared between fields are defined once per run, see [`EnumRegistry`].

mod formater;
pub use formater::*;

pub mod config;
pub mod enumeration;
pub mod error;
pub mod field;
pub mod model;
pub mod peripheral;
pub mod raw;
mod register;
pub mod resolver;
pub mod svd;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{info, warn};

pub use config::GeneratorConfig;
pub use enumeration::{EnumRegistry, Materialize};
pub use error::{Error, Result};
pub use model::Device;
pub use peripheral::{gen_peripheral, PeripheralHeaders};
pub use resolver::resolve_device;

/// Directory, inside the device directory, holding the enumeration headers.
pub const ENUMERATIONS_DIR: &str = "BitsField";

/// Generate the headers of every peripheral of `device`, or only of the one
/// named `filter` (case insensitive). One registry is used for the whole
/// call, peripherals are processed in document order.
pub fn generate_device(
    device: &Device,
    config: &GeneratorConfig,
    filter: Option<&str>,
) -> Result<Vec<PeripheralHeaders>> {
    let peripherals: Vec<_> = device
        .peripherals
        .iter()
        .filter(|per| filter.map_or(true, |name| per.name.eq_ignore_ascii_case(name)))
        .collect();

    let conflicts = validate::enum_width_conflicts(
        peripherals.iter().copied(),
        config.narrow_field_max_width,
    );
    for conflict in conflicts {
        if config.strict_enum_widths {
            return Err(Error::EnumWidthConflict(conflict));
        }
        warn!("{conflict}");
    }

    let mut registry = EnumRegistry::new();
    Ok(peripherals
        .into_iter()
        .map(|per| gen_peripheral(device, per, &mut registry, config))
        .collect())
}

/// Files written by [`generate`].
#[derive(Debug, Default)]
pub struct Summary {
    pub device_dir: PathBuf,
    pub registers: Vec<PathBuf>,
    pub enumerations: Vec<PathBuf>,
    /// Enumeration headers left untouched because they already existed.
    pub kept: Vec<PathBuf>,
}

/// Parse `svd`, resolve it and write the headers under
/// `output/<Device>/` and `output/<Device>/BitsField/`.
pub fn generate(
    svd: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &GeneratorConfig,
    filter: Option<&str>,
) -> anyhow::Result<Summary> {
    let svd_path = svd.as_ref();
    let output = output.as_ref();
    inner_generate(svd_path, output, config, filter)
}

fn inner_generate(
    svd_path: &Path,
    output: &Path,
    config: &GeneratorConfig,
    filter: Option<&str>,
) -> anyhow::Result<Summary> {
    let svd_data = std::fs::read_to_string(svd_path)
        .with_context(|| format!("Failed to read {}", svd_path.display()))?;
    let svd_device = svd_parser::parse(&svd_data)
        .with_context(|| format!("Failed to parse {}", svd_path.display()))?;
    let raw = svd::raw_device(&svd_device);
    let device = resolve_device(&raw)
        .with_context(|| format!("Failed to resolve device {}", raw.name))?;
    info!(
        "device {} with {} peripherals",
        device.name,
        device.peripherals.len()
    );

    let headers = generate_device(&device, config, filter)?;
    if let Some(filter) = filter {
        if headers.is_empty() {
            anyhow::bail!("no peripheral named {filter} in {}", device.name);
        }
    }

    let device_dir = output.join(camel_case(&device.name));
    let enumerations_dir = device_dir.join(ENUMERATIONS_DIR);
    std::fs::create_dir_all(&enumerations_dir).with_context(|| {
        format!("Failed to create {}", enumerations_dir.display())
    })?;

    let mut summary = Summary {
        device_dir: device_dir.clone(),
        ..Default::default()
    };
    for header in headers {
        let registers = device_dir.join(&header.registers_file);
        std::fs::write(&registers, header.registers.as_bytes())
            .with_context(|| format!("Failed to write {}", registers.display()))?;
        info!("{} written", registers.display());
        summary.registers.push(registers);

        let enumerations = enumerations_dir.join(&header.enumerations_file);
        if !config.overwrite_enumerations && enumerations.exists() {
            info!("{} exists, kept", enumerations.display());
            summary.kept.push(enumerations);
            continue;
        }
        std::fs::write(&enumerations, header.enumerations.as_bytes())
            .with_context(|| {
                format!("Failed to write {}", enumerations.display())
            })?;
        info!("{} written", enumerations.display());
        summary.enumerations.push(enumerations);
    }
    Ok(summary)
}
