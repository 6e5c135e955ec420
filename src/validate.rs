//! Consistency checks over a resolved model before generating code.

use std::collections::hash_map::{Entry, HashMap};
use std::fmt;

use crate::enumeration::{group_id, GroupValues};
use crate::model::Peripheral;

/// Two fields sharing an enumeration group while having different widths.
/// The group is defined by the first one, so the second would get values
/// that do not fit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidthConflict {
    pub group: String,
    pub first: String,
    pub first_width: u32,
    pub other: String,
    pub other_width: u32,
}

impl fmt::Display for WidthConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "enumeration {} is defined by {} with {} bits but also used by {} with {} bits",
            self.group, self.first, self.first_width, self.other, self.other_width
        )
    }
}

/// Every field, in document order, whose width differs from the first field
/// sharing its enumeration group.
pub fn enum_width_conflicts<'a>(
    peripherals: impl IntoIterator<Item = &'a Peripheral>,
    max_width: u32,
) -> Vec<WidthConflict> {
    let mut first_use: HashMap<String, (String, u32)> = HashMap::new();
    let mut conflicts = vec![];
    for peripheral in peripherals {
        for register in &peripheral.registers {
            for field in &register.fields {
                if GroupValues::of(field, max_width).is_none() {
                    continue;
                }
                let group =
                    group_id(&peripheral.name, &register.name, &field.name);
                let path = format!(
                    "{}.{}.{}",
                    peripheral.name, register.name, field.name
                );
                match first_use.entry(group) {
                    Entry::Vacant(entry) => {
                        entry.insert((path, field.bit_width));
                    }
                    Entry::Occupied(entry) => {
                        let (first, first_width) = entry.get();
                        if *first_width != field.bit_width {
                            conflicts.push(WidthConflict {
                                group: entry.key().clone(),
                                first: first.clone(),
                                first_width: *first_width,
                                other: path,
                                other_width: field.bit_width,
                            });
                        }
                    }
                }
            }
        }
    }
    conflicts
}
