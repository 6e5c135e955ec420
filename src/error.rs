use thiserror::Error;

use crate::model::ElementKind;
use crate::validate::WidthConflict;

/// Errors produced while resolving and generating a device.
#[derive(Error, Debug)]
pub enum Error {
    /// A `derivedFrom` reference that names no element of the same kind.
    #[error("{kind} {name} derives from unknown {kind} {base}")]
    UnresolvedDerivation {
        kind: ElementKind,
        name: String,
        base: String,
    },
    /// A chain of `derivedFrom` references that loops back on itself.
    #[error("circular derivation of {kind}: {}", chain.join(" -> "))]
    DerivationCycle { kind: ElementKind, chain: Vec<String> },
    /// A required attribute absent on the element and on all of its bases.
    #[error("{kind} {name} is missing required attribute {attribute}")]
    MissingAttribute {
        kind: ElementKind,
        name: String,
        attribute: &'static str,
    },
    #[error("{0}")]
    EnumWidthConflict(WidthConflict),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
