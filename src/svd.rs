//! Conversion of a parsed SVD document into the raw tree. Clusters are
//! flattened and `dim` arrays unrolled. `derivedFrom` is kept as written,
//! except for references between registers of the same cluster which are
//! renamed like the registers they name.

use svd_parser::svd::{
    self, DimElement, EnumeratedValues, MaybeArray, RegisterCluster,
    RegisterProperties,
};
use tracing::{debug, warn};

use crate::formater::dim_name;
use crate::model::{Access, EnumValue};
use crate::raw::{RawDevice, RawField, RawPeripheral, RawRegister};

pub fn raw_device(device: &svd::Device) -> RawDevice {
    let description = device.description.trim();
    RawDevice {
        name: device.name.clone(),
        description: (!description.is_empty()).then(|| description.to_string()),
        access: device.default_register_properties.access.map(Access::from),
        width: device.default_register_properties.size,
        peripherals: device
            .peripherals
            .iter()
            .flat_map(|peripheral| raw_peripherals(device, peripheral))
            .collect(),
    }
}

fn dim_indexes(dim: &DimElement) -> Vec<String> {
    (0..dim.dim)
        .map(|i| {
            dim.dim_index
                .as_ref()
                .and_then(|indexes| indexes.get(i as usize).cloned())
                .unwrap_or_else(|| i.to_string())
        })
        .collect()
}

fn raw_peripherals(
    device: &svd::Device,
    peripheral: &svd::Peripheral,
) -> Vec<RawPeripheral> {
    match peripheral {
        MaybeArray::Single(info) => {
            vec![raw_peripheral(device, info, info.name.clone(), info.base_address)]
        }
        MaybeArray::Array(info, dim) => dim_indexes(dim)
            .iter()
            .enumerate()
            .map(|(i, index)| {
                let base_address =
                    info.base_address + i as u64 * u64::from(dim.dim_increment);
                raw_peripheral(device, info, dim_name(&info.name, index), base_address)
            })
            .collect(),
    }
}

fn raw_peripheral(
    device: &svd::Device,
    info: &svd::PeripheralInfo,
    name: String,
    base_address: u64,
) -> RawPeripheral {
    let registers = info.registers.as_ref().map(|children| {
        let mut registers = vec![];
        flatten_registers(
            device,
            children,
            0,
            "",
            &RegisterProperties::default(),
            &mut registers,
        );
        registers
    });
    RawPeripheral {
        name,
        derived_from: info.derived_from.clone(),
        base_address: Some(base_address),
        access: info.default_register_properties.access.map(Access::from),
        width: info.default_register_properties.size,
        description: info.description.clone(),
        registers,
    }
}

/// `derivedFrom` of a register of a cluster. A bare name matching one of
/// its `siblings` gets the same prefix the sibling gets when flattened.
fn scoped_reference(
    derived_from: Option<&String>,
    prefix: &str,
    siblings: &[RegisterCluster],
) -> Option<String> {
    let reference = derived_from?;
    let sibling = !prefix.is_empty()
        && !reference.contains('.')
        && siblings.iter().any(|child| {
            matches!(child, RegisterCluster::Register(reg) if reg.name == *reference)
        });
    if sibling {
        Some(format!("{prefix}{reference}"))
    } else {
        Some(reference.clone())
    }
}

fn flatten_registers(
    device: &svd::Device,
    children: &[RegisterCluster],
    offset: u64,
    prefix: &str,
    defaults: &RegisterProperties,
    out: &mut Vec<RawRegister>,
) {
    for child in children {
        match child {
            RegisterCluster::Register(MaybeArray::Single(info)) => {
                let raw = RawRegister {
                    name: format!("{prefix}{}", info.name),
                    derived_from: scoped_reference(
                        info.derived_from.as_ref(),
                        prefix,
                        children,
                    ),
                    address_offset: Some(offset + u64::from(info.address_offset)),
                    ..raw_register(device, info, defaults)
                };
                out.push(raw);
            }
            RegisterCluster::Register(MaybeArray::Array(info, dim)) => {
                for (i, index) in dim_indexes(dim).iter().enumerate() {
                    let raw = RawRegister {
                        name: format!("{prefix}{}", dim_name(&info.name, index)),
                        derived_from: scoped_reference(
                            info.derived_from.as_ref(),
                            prefix,
                            children,
                        ),
                        address_offset: Some(
                            offset
                                + u64::from(info.address_offset)
                                + i as u64 * u64::from(dim.dim_increment),
                        ),
                        ..raw_register(device, info, defaults)
                    };
                    out.push(raw);
                }
            }
            RegisterCluster::Cluster(MaybeArray::Single(info)) => {
                let prefix = format!("{prefix}{}_", info.name);
                let offset = offset + u64::from(info.address_offset);
                let defaults =
                    inherit_properties(&info.default_register_properties, defaults);
                flatten_registers(device, &info.children, offset, &prefix, &defaults, out);
            }
            RegisterCluster::Cluster(MaybeArray::Array(info, dim)) => {
                let defaults =
                    inherit_properties(&info.default_register_properties, defaults);
                for (i, index) in dim_indexes(dim).iter().enumerate() {
                    let prefix = format!("{prefix}{}_", dim_name(&info.name, index));
                    let offset = offset
                        + u64::from(info.address_offset)
                        + i as u64 * u64::from(dim.dim_increment);
                    flatten_registers(
                        device,
                        &info.children,
                        offset,
                        &prefix,
                        &defaults,
                        out,
                    );
                }
            }
        }
    }
}

fn inherit_properties(
    own: &RegisterProperties,
    outer: &RegisterProperties,
) -> RegisterProperties {
    let mut properties = own.clone();
    properties.size = own.size.or(outer.size);
    properties.access = own.access.or(outer.access);
    properties
}

/// Attributes of a register shared by every element of an array, the name,
/// offset and reference are set by the caller.
fn raw_register(
    device: &svd::Device,
    info: &svd::RegisterInfo,
    defaults: &RegisterProperties,
) -> RawRegister {
    RawRegister {
        access: info.properties.access.or(defaults.access).map(Access::from),
        width: info.properties.size.or(defaults.size),
        description: info.description.clone(),
        fields: info.fields.as_ref().map(|fields| {
            fields
                .iter()
                .flat_map(|field| raw_fields(device, field))
                .collect()
        }),
        ..RawRegister::new(info.name.clone())
    }
}

fn raw_fields(device: &svd::Device, field: &svd::Field) -> Vec<RawField> {
    match field {
        MaybeArray::Single(info) => {
            vec![raw_field(device, info, info.name.clone(), info.bit_range.offset)]
        }
        MaybeArray::Array(info, dim) => dim_indexes(dim)
            .iter()
            .enumerate()
            .map(|(i, index)| {
                let offset = info.bit_range.offset + i as u32 * dim.dim_increment;
                raw_field(device, info, dim_name(&info.name, index), offset)
            })
            .collect(),
    }
}

fn raw_field(
    device: &svd::Device,
    info: &svd::FieldInfo,
    name: String,
    bit_offset: u32,
) -> RawField {
    RawField {
        name,
        derived_from: info.derived_from.clone(),
        access: info.access.map(Access::from),
        bit_offset: Some(bit_offset),
        bit_width: Some(info.bit_range.width),
        description: info.description.clone(),
        enumerated_values: enumerated_values(device, &info.enumerated_values),
    }
}

/// Find an `enumeratedValues` block by its `derivedFrom` path. The leading
/// components of `PERIPHERAL.REG.FIELD.NAME`, `REG.FIELD.NAME` or
/// `FIELD.NAME` must match the elements holding the block, a bare `NAME`
/// matches anywhere in the device.
fn find_enumerated_values<'a>(
    device: &'a svd::Device,
    path: &str,
) -> Option<&'a EnumeratedValues> {
    let mut owners: Vec<&str> = path.split('.').collect();
    let name = owners.pop()?;
    if owners.len() > 3 {
        return None;
    }
    device.peripherals.iter().find_map(|per| {
        per.all_registers().find_map(|reg| {
            reg.fields().find_map(|field| {
                let holders = [per.name.as_str(), reg.name.as_str(), field.name.as_str()];
                if !holders.ends_with(&owners) {
                    return None;
                }
                field
                    .enumerated_values
                    .iter()
                    .find(|values| values.name.as_deref() == Some(name))
            })
        })
    })
}

fn enumerated_values(
    device: &svd::Device,
    blocks: &[EnumeratedValues],
) -> Option<Vec<EnumValue>> {
    let values: Vec<EnumValue> = blocks
        .iter()
        .filter_map(|block| match &block.derived_from {
            None => Some(block),
            Some(path) => {
                let found = find_enumerated_values(device, path);
                if found.is_none() {
                    warn!("enumeratedValues {path} not found, ignored");
                }
                found
            }
        })
        .flat_map(|block| block.values.iter())
        .filter_map(|value| {
            let Some(literal) = value.value else {
                debug!("enumeratedValue {} without value skipped", value.name);
                return None;
            };
            Some(EnumValue {
                name: value.name.clone(),
                value: literal,
                description: value.description.clone(),
            })
        })
        .collect();
    (!values.is_empty()).then_some(values)
}
