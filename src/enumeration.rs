//! Enumeration groups: the per field value types, deduplicated across the
//! whole run by their synthesized identifier.

use std::collections::HashSet;
use std::fmt::Write;

use tracing::debug;

use crate::formater::{camel_case, strip_id};
use crate::model::{EnumValue, Field};

const GROUP_SUFFIX: &str = "Values";
const MARKER_SUFFIX: &str = "Base";
/// Widest field that may get synthesized values, whatever the configuration.
pub const MAX_SYNTHESIZED_WIDTH: u32 = 16;

/// Identifier of the enumeration group of a field.
///
/// Only the names take part, the content of the field does not. Digits and
/// punctuation are removed, so `SR1.STATUS` and `SR2.STATUS` share a group.
pub fn group_id(peripheral: &str, register: &str, field: &str) -> String {
    strip_id(&format!(
        "{}{}{}{GROUP_SUFFIX}",
        camel_case(peripheral),
        camel_case(register),
        camel_case(field)
    ))
}

/// Group used as the marker of a register pack when none of its fields
/// has one.
pub fn placeholder_id(peripheral: &str, register: &str) -> String {
    strip_id(&format!(
        "{}{}{GROUP_SUFFIX}",
        camel_case(peripheral),
        camel_case(register)
    ))
}

/// Name of the marker type of a group.
pub fn marker_name(id: &str) -> String {
    format!("{id}{MARKER_SUFFIX}")
}

/// Answer of [`EnumRegistry::materialize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Materialize {
    /// First request for this identifier, emit the full definition.
    Define,
    /// Already defined earlier in the run, emit only a reference.
    ReferenceOnly,
}

/// Tracks which enumeration groups were already emitted.
///
/// One registry must live for a whole generation run. The first caller to
/// materialize an identifier defines it, so the order of the calls decides
/// which field gives its values to a shared group: callers must request
/// groups in document order (peripherals, then registers, then fields).
#[derive(Debug, Default)]
pub struct EnumRegistry {
    defined: HashSet<String>,
}

impl EnumRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `id` was materialized earlier in the run.
    pub fn exists(&self, id: &str) -> bool {
        self.defined.contains(id)
    }

    pub fn materialize(&mut self, id: &str) -> Materialize {
        if self.defined.contains(id) {
            debug!("enumeration {id} already defined");
            return Materialize::ReferenceOnly;
        }
        self.defined.insert(id.to_string());
        debug!("enumeration {id} defined");
        Materialize::Define
    }

    /// Number of groups defined so far.
    pub fn defined_len(&self) -> usize {
        self.defined.len()
    }
}

/// Values of an enumeration group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupValues<'a> {
    /// Named values declared in the description.
    Explicit(&'a [EnumValue]),
    /// One value per integer of a narrow field, `0..2^width`.
    Synthesized(u32),
}

impl<'a> GroupValues<'a> {
    /// Values of `field`, `None` if the field is wider than `max_width` and
    /// declares no value: it then gets no group at all.
    pub fn of(field: &'a Field, max_width: u32) -> Option<Self> {
        match &field.enumerated_values {
            Some(values) => Some(Self::Explicit(values)),
            None if field.bit_width <= max_width.min(MAX_SYNTHESIZED_WIDTH) => {
                Some(Self::Synthesized(field.bit_width))
            }
            None => None,
        }
    }
}

/// Enumeration group to be emitted.
#[derive(Debug)]
pub struct EnumerationGroup<'a> {
    pub id: String,
    pub values: GroupValues<'a>,
}

impl EnumerationGroup<'_> {
    pub fn gen_group(&self, out: &mut String) {
        gen_marker(&self.id, out);
        let id = &self.id;
        out.push_str(
            "template <typename Reg, size_t offset, size_t size, \
             typename AccessMode, typename BaseType>\n",
        );
        let _ = writeln!(
            out,
            "struct {id}: public RegisterField<Reg, offset, size, AccessMode>"
        );
        out.push_str("{\n");
        match self.values {
            GroupValues::Explicit(values) => {
                for value in values {
                    gen_value(&camel_case(&value.name), value.value, out);
                }
            }
            GroupValues::Synthesized(width) => {
                for i in 0..1u64 << width {
                    gen_value(&format!("Value{i}"), i, out);
                }
            }
        }
        out.push_str("} ;\n\n");
    }
}

/// Empty type used as the marker of a group.
pub fn gen_marker(id: &str, out: &mut String) {
    let _ = writeln!(out, "struct {} {{}} ;\n", marker_name(id));
}

fn gen_value(name: &str, value: u64, out: &mut String) {
    let _ = writeln!(
        out,
        "  using {name} = BitsField<Reg, offset, size, AccessMode, BaseType, {value}U> ;"
    );
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::Access;

    fn field(width: u32, values: Option<Vec<EnumValue>>) -> Field {
        Field {
            name: "F".into(),
            access: Access::ReadWrite,
            bit_offset: 0,
            bit_width: width,
            description: None,
            enumerated_values: values,
        }
    }

    #[test]
    fn timer_ctrl_enable() {
        assert_eq!(group_id("Timer", "CTRL", "ENABLE"), "TimerCtrlEnableValues");
    }

    #[test]
    fn same_names_same_id() {
        assert_eq!(
            group_id("USART1", "CR1", "UE"),
            group_id("USART1", "CR1", "UE")
        );
        assert_ne!(group_id("USART", "CR", "UE"), group_id("USART", "CR", "TE"));
    }

    // digits and punctuation are dropped on purpose so numbered instances
    // of the same register share their enumerations
    #[test]
    fn digits_collide() {
        assert_eq!(group_id("TIM", "SR1", "STATUS"), group_id("TIM", "SR2", "STATUS"));
        assert_eq!(group_id("USART1", "CR", "UE"), group_id("USART2", "CR", "UE"));
        assert_eq!(group_id("TIM", "SR1", "STATUS"), "TimSrStatusValues");
    }

    #[test]
    fn define_then_reference() {
        let mut registry = EnumRegistry::new();
        assert!(!registry.exists("AValues"));
        assert_eq!(registry.materialize("AValues"), Materialize::Define);
        assert!(registry.exists("AValues"));
        assert_eq!(registry.materialize("AValues"), Materialize::ReferenceOnly);
        assert_eq!(registry.materialize("AValues"), Materialize::ReferenceOnly);
        assert_eq!(registry.materialize("BValues"), Materialize::Define);
        assert_eq!(registry.defined_len(), 2);

        let mut fresh = EnumRegistry::new();
        assert!(!fresh.exists("AValues"));
        assert_eq!(fresh.materialize("AValues"), Materialize::Define);
    }

    #[test]
    fn values_source() {
        let narrow = field(1, None);
        assert_eq!(GroupValues::of(&narrow, 5), Some(GroupValues::Synthesized(1)));
        let wide = field(8, None);
        assert_eq!(GroupValues::of(&wide, 5), None);
        let named = field(
            8,
            Some(vec![EnumValue {
                name: "FAST".into(),
                value: 3,
                description: None,
            }]),
        );
        assert!(matches!(
            GroupValues::of(&named, 5),
            Some(GroupValues::Explicit(values)) if values.len() == 1
        ));
    }

    #[test]
    fn synthesized_group() {
        let group = EnumerationGroup {
            id: "TimerCtrlEnableValues".into(),
            values: GroupValues::Synthesized(1),
        };
        let mut out = String::new();
        group.gen_group(&mut out);
        let expected = "\
struct TimerCtrlEnableValuesBase {} ;

template <typename Reg, size_t offset, size_t size, typename AccessMode, typename BaseType>
struct TimerCtrlEnableValues: public RegisterField<Reg, offset, size, AccessMode>
{
  using Value0 = BitsField<Reg, offset, size, AccessMode, BaseType, 0U> ;
  using Value1 = BitsField<Reg, offset, size, AccessMode, BaseType, 1U> ;
} ;

";
        assert_eq!(out, expected);
    }

    #[test]
    fn explicit_group() {
        let values = [
            EnumValue {
                name: "DIV_1".into(),
                value: 0,
                description: None,
            },
            EnumValue {
                name: "DIV_8".into(),
                value: 3,
                description: Some("divide by 8".into()),
            },
        ];
        let group = EnumerationGroup {
            id: "TimCrDivValues".into(),
            values: GroupValues::Explicit(&values),
        };
        let mut out = String::new();
        group.gen_group(&mut out);
        assert!(out.contains("  using Div1 = BitsField<Reg, offset, size, AccessMode, BaseType, 0U> ;\n"));
        assert!(out.contains("  using Div8 = BitsField<Reg, offset, size, AccessMode, BaseType, 3U> ;\n"));
        assert!(!out.contains("Value0"));
    }
}
