//! Resolved register model. Everything here is built once by the resolver and
//! only read afterwards.

use std::fmt;

/// Access mode of a peripheral, register or field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Access {
    ReadOnly,
    WriteOnly,
    ReadWrite,
    WriteOnce,
    ReadWriteOnce,
    #[default]
    Unspecified,
}

impl Access {
    /// Access used when generating code, `Unspecified` behaves as read-write.
    pub fn effective(self) -> Self {
        match self {
            Access::Unspecified => Access::ReadWrite,
            access => access,
        }
    }

    /// Name of the access mode type in the generated headers.
    pub fn mode_type(self) -> &'static str {
        match self.effective() {
            Access::ReadOnly => "ReadMode",
            Access::WriteOnly | Access::WriteOnce => "WriteMode",
            Access::ReadWrite | Access::ReadWriteOnce | Access::Unspecified => {
                "ReadWriteMode"
            }
        }
    }
}

impl From<svd_parser::svd::Access> for Access {
    fn from(value: svd_parser::svd::Access) -> Self {
        use svd_parser::svd::Access as SvdAccess;
        match value {
            SvdAccess::ReadOnly => Access::ReadOnly,
            SvdAccess::WriteOnly => Access::WriteOnly,
            SvdAccess::ReadWrite => Access::ReadWrite,
            SvdAccess::WriteOnce => Access::WriteOnce,
            SvdAccess::ReadWriteOnce => Access::ReadWriteOnce,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub name: String,
    pub description: Option<String>,
    pub access: Access,
    pub width: u32,
    pub peripherals: Vec<Peripheral>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Peripheral {
    pub name: String,
    pub base_address: u64,
    pub access: Access,
    pub width: u32,
    pub description: Option<String>,
    pub registers: Vec<Register>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Register {
    pub name: String,
    /// Absolute address, base address of the peripheral plus the offset.
    pub address: u64,
    pub offset: u64,
    pub access: Access,
    pub width: u32,
    pub description: Option<String>,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub access: Access,
    pub bit_offset: u32,
    pub bit_width: u32,
    pub description: Option<String>,
    /// Explicit named values, `None` when neither the field nor its base
    /// declare any.
    pub enumerated_values: Option<Vec<EnumValue>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub name: String,
    pub value: u64,
    pub description: Option<String>,
}

/// Kind of a description element, used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Peripheral,
    Register,
    Field,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ElementKind::Peripheral => "peripheral",
            ElementKind::Register => "register",
            ElementKind::Field => "field",
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn unspecified_is_read_write() {
        assert_eq!(Access::Unspecified.effective(), Access::ReadWrite);
        assert_eq!(Access::Unspecified.mode_type(), "ReadWriteMode");
    }

    #[test]
    fn once_modes() {
        assert_eq!(Access::WriteOnce.mode_type(), "WriteMode");
        assert_eq!(Access::ReadWriteOnce.mode_type(), "ReadWriteMode");
        assert_eq!(Access::ReadOnly.mode_type(), "ReadMode");
    }
}
