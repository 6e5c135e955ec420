//! Resolves `derivedFrom` references of the raw tree into a model without
//! any pending derivation.
//!
//! Each element is merged attribute by attribute with its base, the element
//! value wins over the base value. Chains are followed until an element
//! without a base is reached, then the enclosing scope supplies the defaults
//! for what is still unset (access and width only, bit offset and width of
//! fields never come from the enclosing register).

use std::ptr;

use tracing::debug;

use crate::error::{Error, Result};
use crate::model::{Device, ElementKind, Field, Peripheral, Register};
use crate::raw::{RawDevice, RawField, RawPeripheral, RawRegister};

/// Register width used when the device itself does not declare one.
pub const DEFAULT_REGISTER_WIDTH: u32 = 32;

trait Derive: Clone {
    const KIND: ElementKind;
    fn name(&self) -> &str;
    fn derived_from(&self) -> Option<&str>;
    /// Take from `base` every attribute `self` leaves unset. Child lists are
    /// not copied, they are looked up where they are declared.
    fn inherit(&mut self, base: &Self);
}

impl Derive for RawPeripheral {
    const KIND: ElementKind = ElementKind::Peripheral;
    fn name(&self) -> &str {
        &self.name
    }
    fn derived_from(&self) -> Option<&str> {
        self.derived_from.as_deref()
    }
    fn inherit(&mut self, base: &Self) {
        self.base_address = self.base_address.or(base.base_address);
        self.access = self.access.or(base.access);
        self.width = self.width.or(base.width);
        if self.description.is_none() {
            self.description = base.description.clone();
        }
    }
}

impl Derive for RawRegister {
    const KIND: ElementKind = ElementKind::Register;
    fn name(&self) -> &str {
        &self.name
    }
    fn derived_from(&self) -> Option<&str> {
        self.derived_from.as_deref()
    }
    fn inherit(&mut self, base: &Self) {
        self.address_offset = self.address_offset.or(base.address_offset);
        self.access = self.access.or(base.access);
        self.width = self.width.or(base.width);
        if self.description.is_none() {
            self.description = base.description.clone();
        }
    }
}

impl Derive for RawField {
    const KIND: ElementKind = ElementKind::Field;
    fn name(&self) -> &str {
        &self.name
    }
    fn derived_from(&self) -> Option<&str> {
        self.derived_from.as_deref()
    }
    fn inherit(&mut self, base: &Self) {
        self.access = self.access.or(base.access);
        self.bit_offset = self.bit_offset.or(base.bit_offset);
        self.bit_width = self.bit_width.or(base.bit_width);
        if self.description.is_none() {
            self.description = base.description.clone();
        }
        if self.enumerated_values.is_none() {
            self.enumerated_values = base.enumerated_values.clone();
        }
    }
}

/// Merge `element` with every base of its derivation chain. `lookup` is
/// called once per link, in chain order.
fn flatten<'a, T, F>(element: &'a T, mut lookup: F) -> Result<T>
where
    T: Derive,
    F: FnMut(&str) -> Option<&'a T>,
{
    let mut merged = element.clone();
    let mut chain = vec![element];
    let mut current = element;
    while let Some(base_name) = current.derived_from() {
        let base =
            lookup(base_name).ok_or_else(|| Error::UnresolvedDerivation {
                kind: T::KIND,
                name: current.name().to_string(),
                base: base_name.to_string(),
            })?;
        if chain.iter().any(|seen| ptr::eq(*seen, base)) {
            let chain = chain
                .iter()
                .map(|seen| seen.name())
                .chain(std::iter::once(base.name()))
                .map(str::to_string)
                .collect();
            return Err(Error::DerivationCycle {
                kind: T::KIND,
                chain,
            });
        }
        debug!("{} {} derived from {}", T::KIND, current.name(), base.name());
        merged.inherit(base);
        chain.push(base);
        current = base;
    }
    Ok(merged)
}

fn missing(kind: ElementKind, name: &str, attribute: &'static str) -> Error {
    Error::MissingAttribute {
        kind,
        name: name.to_string(),
        attribute,
    }
}

/// Register list of the peripheral and the field list of the register an
/// element was found in. References of the element are relative to it.
type FieldScope<'a> = (&'a [RawRegister], &'a [RawField]);

/// Upper bound of any acyclic register chain of the device.
fn register_count(device: &RawDevice) -> usize {
    device
        .peripherals
        .iter()
        .map(|per| per.registers.as_ref().map_or(0, Vec::len))
        .sum()
}

/// Register list of `peripheral`, taken from its bases if it has none.
fn peripheral_registers<'a>(
    device: &'a RawDevice,
    peripheral: &'a RawPeripheral,
) -> Option<&'a [RawRegister]> {
    let mut current = peripheral;
    // bounded, a cycle is reported when the peripheral itself is resolved
    for _ in 0..=device.peripherals.len() {
        if let Some(registers) = &current.registers {
            return Some(registers);
        }
        current = device.peripheral(current.derived_from.as_deref()?)?;
    }
    None
}

/// Field list of `register`, taken from its bases if it has none, with the
/// register list of the register declaring it.
fn register_fields<'a>(
    device: &'a RawDevice,
    scope: &'a [RawRegister],
    register: &'a RawRegister,
) -> Option<FieldScope<'a>> {
    let mut scope = scope;
    let mut current = register;
    for _ in 0..=register_count(device) {
        if let Some(fields) = &current.fields {
            return Some((scope, fields));
        }
        (scope, current) =
            lookup_register(device, scope, current.derived_from.as_deref()?)?;
    }
    None
}

fn find_register<'a>(
    registers: &'a [RawRegister],
    name: &str,
) -> Option<(&'a [RawRegister], &'a RawRegister)> {
    let register = registers.iter().find(|reg| reg.name == name)?;
    Some((registers, register))
}

/// Find a register by `REG` in `scope` or by `PERIPHERAL.REG`, with the
/// register list holding it. Registers flattened out of a cluster are also
/// found by `CLUSTER.REG`.
fn lookup_register<'a>(
    device: &'a RawDevice,
    scope: &'a [RawRegister],
    path: &str,
) -> Option<(&'a [RawRegister], &'a RawRegister)> {
    if let Some((peripheral, register)) = path.split_once('.') {
        if let Some(peripheral) = device.peripheral(peripheral) {
            let registers = peripheral_registers(device, peripheral)?;
            return find_register(registers, &register.replace('.', "_"));
        }
    }
    find_register(scope, &path.replace('.', "_"))
}

/// Find a field by `FIELD` in the fields of `scope`, by `REG.FIELD` in its
/// registers or by `PERIPHERAL.REG.FIELD`, with the scope holding it.
fn lookup_field<'a>(
    device: &'a RawDevice,
    scope: FieldScope<'a>,
    path: &str,
) -> Option<(FieldScope<'a>, &'a RawField)> {
    let (scope, name) = match path.rsplit_once('.') {
        None => (scope, path),
        Some((register, name)) => {
            let (registers, register) = lookup_register(device, scope.0, register)?;
            (register_fields(device, registers, register)?, name)
        }
    };
    let field = scope.1.iter().find(|field| field.name == name)?;
    Some((scope, field))
}

/// Resolve the whole device, peripherals in document order.
pub fn resolve_device(raw: &RawDevice) -> Result<Device> {
    let mut device = Device {
        name: raw.name.clone(),
        description: raw.description.clone(),
        access: raw.access.unwrap_or_default(),
        width: raw.width.unwrap_or(DEFAULT_REGISTER_WIDTH),
        peripherals: Vec::with_capacity(raw.peripherals.len()),
    };
    for peripheral in &raw.peripherals {
        let peripheral = resolve_peripheral(raw, &device, peripheral)?;
        device.peripherals.push(peripheral);
    }
    Ok(device)
}

fn resolve_peripheral(
    raw_device: &RawDevice,
    device: &Device,
    raw: &RawPeripheral,
) -> Result<Peripheral> {
    let merged = flatten(raw, |name| raw_device.peripheral(name))?;
    let base_address = merged
        .base_address
        .ok_or_else(|| missing(ElementKind::Peripheral, &raw.name, "baseAddress"))?;
    let mut peripheral = Peripheral {
        name: raw.name.clone(),
        base_address,
        access: merged.access.unwrap_or(device.access),
        width: merged.width.unwrap_or(device.width),
        description: merged.description.clone(),
        registers: vec![],
    };
    // own registers if any, otherwise the base ones, both placed at the
    // address of this peripheral
    let registers = peripheral_registers(raw_device, raw).unwrap_or_default();
    peripheral.registers = registers
        .iter()
        .map(|reg| resolve_register(raw_device, &peripheral, registers, reg))
        .collect::<Result<_>>()?;
    Ok(peripheral)
}

fn resolve_register<'a>(
    raw_device: &'a RawDevice,
    peripheral: &Peripheral,
    siblings: &'a [RawRegister],
    raw: &'a RawRegister,
) -> Result<Register> {
    // each base is looked up relative to the register list of the previous one
    let mut scope = siblings;
    let merged = flatten(raw, |path| {
        let (found, base) = lookup_register(raw_device, scope, path)?;
        scope = found;
        Some(base)
    })?;
    let offset = merged
        .address_offset
        .ok_or_else(|| missing(ElementKind::Register, &raw.name, "addressOffset"))?;
    let mut register = Register {
        name: raw.name.clone(),
        address: peripheral.base_address + offset,
        offset,
        access: merged.access.unwrap_or(peripheral.access),
        width: merged.width.unwrap_or(peripheral.width),
        description: merged.description.clone(),
        fields: vec![],
    };
    // inherited fields keep the scope of the register declaring them
    let no_fields: &[RawField] = &[];
    let scope = register_fields(raw_device, siblings, raw).unwrap_or((siblings, no_fields));
    register.fields = scope
        .1
        .iter()
        .map(|field| resolve_field(raw_device, &register, scope, field))
        .collect::<Result<_>>()?;
    Ok(register)
}

fn resolve_field<'a>(
    raw_device: &'a RawDevice,
    register: &Register,
    scope: FieldScope<'a>,
    raw: &'a RawField,
) -> Result<Field> {
    let mut scope = scope;
    let merged = flatten(raw, |path| {
        let (found, base) = lookup_field(raw_device, scope, path)?;
        scope = found;
        Some(base)
    })?;
    let bit_offset = merged
        .bit_offset
        .ok_or_else(|| missing(ElementKind::Field, &raw.name, "bitOffset"))?;
    let bit_width = merged
        .bit_width
        .ok_or_else(|| missing(ElementKind::Field, &raw.name, "bitWidth"))?;
    Ok(Field {
        name: raw.name.clone(),
        access: merged.access.unwrap_or(register.access),
        bit_offset,
        bit_width,
        description: merged.description,
        enumerated_values: merged.enumerated_values,
    })
}
