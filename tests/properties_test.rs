use proptest::prelude::*;
use svd2regs::enumeration::group_id;
use svd2regs::model::Access;
use svd2regs::raw::{RawDevice, RawField, RawPeripheral, RawRegister};
use svd2regs::{resolve_device, EnumRegistry, Materialize};

fn access() -> impl Strategy<Value = Access> {
    prop::sample::select(vec![
        Access::ReadOnly,
        Access::WriteOnly,
        Access::ReadWrite,
        Access::WriteOnce,
        Access::ReadWriteOnce,
    ])
}

fn device(base: RawPeripheral, derived: RawPeripheral) -> RawDevice {
    RawDevice {
        peripherals: vec![base, derived],
        ..RawDevice::new("FUZZ_DEV")
    }
}

fn register(offset: u64) -> RawRegister {
    RawRegister {
        address_offset: Some(offset),
        fields: Some(vec![RawField {
            bit_offset: Some(0),
            bit_width: Some(1),
            ..RawField::new("EN")
        }]),
        ..RawRegister::new("CTRL")
    }
}

proptest! {
    #[test]
    fn test_own_attribute_wins(
        base_access in access(),
        own_access in access(),
        base_width in prop::sample::select(vec![8u32, 16, 32]),
        own_width in prop::sample::select(vec![8u32, 16, 32]),
    ) {
        let base = RawPeripheral {
            base_address: Some(0x4000_0000),
            access: Some(base_access),
            width: Some(base_width),
            registers: Some(vec![]),
            ..RawPeripheral::new("BASE")
        };
        let derived = RawPeripheral {
            derived_from: Some("BASE".into()),
            base_address: Some(0x5000_0000),
            access: Some(own_access),
            width: Some(own_width),
            ..RawPeripheral::new("DERIVED")
        };
        let resolved = resolve_device(&device(base, derived)).unwrap();
        let derived = &resolved.peripherals[1];
        prop_assert_eq!(derived.access, own_access);
        prop_assert_eq!(derived.width, own_width);
        prop_assert_eq!(derived.base_address, 0x5000_0000);
    }

    #[test]
    fn test_unset_attribute_is_inherited(
        base_access in access(),
        base_address in any::<u32>(),
        description in "[a-zA-Z ]{1,20}",
    ) {
        let base = RawPeripheral {
            base_address: Some(u64::from(base_address)),
            access: Some(base_access),
            description: Some(description.clone()),
            registers: Some(vec![register(0)]),
            ..RawPeripheral::new("BASE")
        };
        let derived = RawPeripheral {
            derived_from: Some("BASE".into()),
            ..RawPeripheral::new("DERIVED")
        };
        let resolved = resolve_device(&device(base, derived)).unwrap();
        let derived = &resolved.peripherals[1];
        prop_assert_eq!(derived.access, base_access);
        prop_assert_eq!(derived.base_address, u64::from(base_address));
        prop_assert_eq!(derived.description.as_deref(), Some(description.as_str()));
        prop_assert_eq!(derived.registers[0].fields[0].access, base_access);
    }

    #[test]
    fn test_address_is_base_plus_offset(
        base_address in any::<u32>(),
        derived_address in any::<u32>(),
        offsets in prop::collection::vec(0u32..0x1000, 1..8),
    ) {
        let registers = offsets
            .iter()
            .map(|offset| register(u64::from(*offset)))
            .collect();
        let base = RawPeripheral {
            base_address: Some(u64::from(base_address)),
            registers: Some(registers),
            ..RawPeripheral::new("BASE")
        };
        let derived = RawPeripheral {
            derived_from: Some("BASE".into()),
            base_address: Some(u64::from(derived_address)),
            ..RawPeripheral::new("DERIVED")
        };
        let resolved = resolve_device(&device(base, derived)).unwrap();
        for peripheral in &resolved.peripherals {
            prop_assert_eq!(peripheral.registers.len(), offsets.len());
            for register in &peripheral.registers {
                prop_assert_eq!(
                    register.address,
                    peripheral.base_address + register.offset
                );
            }
        }
    }

    #[test]
    fn test_group_id_is_deterministic(
        peripheral in "[A-Z][A-Z0-9_]{0,8}",
        register in "[A-Z][A-Z0-9_]{0,8}",
        field in "[A-Z][A-Z0-9_]{0,8}",
    ) {
        let id = group_id(&peripheral, &register, &field);
        prop_assert_eq!(&id, &group_id(&peripheral, &register, &field));
        prop_assert!(id.ends_with("Values"));
        prop_assert!(id.chars().all(|c| c.is_ascii_alphabetic()));
    }

    #[test]
    fn test_trailing_digits_collide(
        register in "[A-Z]{1,6}",
        first in 0u32..100,
        second in 0u32..100,
    ) {
        prop_assert_eq!(
            group_id("TIM", &format!("{register}{first}"), "STATUS"),
            group_id("TIM", &format!("{register}{second}"), "STATUS")
        );
    }

    #[test]
    fn test_registry_defines_each_id_once(
        ids in prop::collection::vec("[A-C]Values", 1..20),
    ) {
        let mut registry = EnumRegistry::new();
        let mut defined = vec![];
        for id in &ids {
            if registry.materialize(id) == Materialize::Define {
                prop_assert!(!defined.contains(id));
                defined.push(id.clone());
            }
            prop_assert!(registry.exists(id));
        }
        prop_assert_eq!(registry.defined_len(), defined.len());
    }
}
