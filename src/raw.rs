//! Raw description tree, as produced by the document parser. Attributes are
//! `None` when the element does not set them, derivation is still pending.

use crate::model::{Access, EnumValue};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDevice {
    pub name: String,
    pub description: Option<String>,
    pub access: Option<Access>,
    pub width: Option<u32>,
    pub peripherals: Vec<RawPeripheral>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPeripheral {
    pub name: String,
    pub derived_from: Option<String>,
    pub base_address: Option<u64>,
    pub access: Option<Access>,
    pub width: Option<u32>,
    pub description: Option<String>,
    pub registers: Option<Vec<RawRegister>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRegister {
    pub name: String,
    pub derived_from: Option<String>,
    pub address_offset: Option<u64>,
    pub access: Option<Access>,
    pub width: Option<u32>,
    pub description: Option<String>,
    pub fields: Option<Vec<RawField>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawField {
    pub name: String,
    pub derived_from: Option<String>,
    pub access: Option<Access>,
    pub bit_offset: Option<u32>,
    pub bit_width: Option<u32>,
    pub description: Option<String>,
    pub enumerated_values: Option<Vec<EnumValue>>,
}

impl RawDevice {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn peripheral(&self, name: &str) -> Option<&RawPeripheral> {
        self.peripherals.iter().find(|per| per.name == name)
    }
}

impl RawPeripheral {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

impl RawRegister {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

impl RawField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}
