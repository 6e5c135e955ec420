use std::fmt::Write;

use crate::enumeration::{
    group_id, marker_name, EnumerationGroup, GroupValues, Materialize,
};
use crate::formater::camel_case;
use crate::model::{Field, Peripheral, Register};
use crate::peripheral::ContextCodeGen;

/// How a field is exposed in the register structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldAlias {
    /// Alias of its enumeration group, carrying the marker type.
    Enumerated { group: String },
    /// Bare bit range.
    Plain,
}

/// Alias name of `field` inside `register`.
pub fn alias_name(register: &Register, field: &Field) -> String {
    let name = camel_case(&field.name);
    if name == camel_case(&register.name) {
        format!("{name}Field")
    } else {
        name
    }
}

/// Emit the alias of `field`, and its enumeration group into the context if
/// this is the first field to need it.
pub(crate) fn gen_field(
    context: &mut ContextCodeGen,
    peripheral: &Peripheral,
    register: &Register,
    field: &Field,
    out: &mut String,
) -> FieldAlias {
    let name = alias_name(register, field);
    let owner = format!(
        "{}::{}",
        camel_case(&peripheral.name),
        camel_case(&register.name)
    );
    let offset = field.bit_offset;
    let width = field.bit_width;
    let mode = field.access.mode_type();

    let Some(values) =
        GroupValues::of(field, context.config.narrow_field_max_width)
    else {
        let _ = writeln!(
            out,
            "    using {name} = RegisterField<{owner}, {offset}, {width}, {mode}> ;"
        );
        return FieldAlias::Plain;
    };

    let id = group_id(&peripheral.name, &register.name, &field.name);
    if context.registry.materialize(&id) == Materialize::Define {
        EnumerationGroup {
            id: id.clone(),
            values,
        }
        .gen_group(&mut context.enumerations);
    }
    let marker = marker_name(&id);
    let _ = writeln!(
        out,
        "    using {name} = {id}<{owner}, {offset}, {width}, {mode}, {marker}> ;"
    );
    FieldAlias::Enumerated { group: id }
}
