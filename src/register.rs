use std::fmt::Write;

use crate::enumeration::{
    gen_marker, group_id, marker_name, placeholder_id, Materialize,
};
use crate::field::{gen_field, FieldAlias};
use crate::formater::camel_case;
use crate::model::{Peripheral, Register};
use crate::peripheral::ContextCodeGen;

/// Emit the structure of `register` followed by its packed alias.
pub(crate) fn gen_register(
    context: &mut ContextCodeGen,
    peripheral: &Peripheral,
    register: &Register,
    out: &mut String,
) {
    let aliases = gen_register_base(context, peripheral, register, out);
    gen_register_pack(context, peripheral, register, &aliases, out);
}

fn gen_register_base(
    context: &mut ContextCodeGen,
    peripheral: &Peripheral,
    register: &Register,
    out: &mut String,
) -> Vec<FieldAlias> {
    let _ = writeln!(
        out,
        "  struct {} : public RegisterBase<0x{:X}, {}, {}>",
        camel_case(&register.name),
        register.address,
        register.width,
        register.access.mode_type()
    );
    out.push_str("  {\n");
    let aliases = register
        .fields
        .iter()
        .map(|field| gen_field(context, peripheral, register, field, out))
        .collect();
    out.push_str("  } ;\n\n");
    aliases
}

/// Marker type accepted by the packed alias: the one of the first field
/// with a group, or whose group was made by another register with a field
/// of the same name. Otherwise a placeholder made for the register.
fn pack_marker(
    context: &mut ContextCodeGen,
    peripheral: &Peripheral,
    register: &Register,
    aliases: &[FieldAlias],
) -> String {
    let known = aliases.iter().zip(&register.fields).find_map(|(alias, field)| {
        match alias {
            FieldAlias::Enumerated { group } => Some(group.clone()),
            FieldAlias::Plain => {
                let id = group_id(&peripheral.name, &register.name, &field.name);
                context.registry.exists(&id).then_some(id)
            }
        }
    });
    if let Some(id) = known {
        return marker_name(&id);
    }
    let id = placeholder_id(&peripheral.name, &register.name);
    if context.registry.materialize(&id) == Materialize::Define {
        gen_marker(&id, &mut context.enumerations);
    }
    marker_name(&id)
}

fn gen_register_pack(
    context: &mut ContextCodeGen,
    peripheral: &Peripheral,
    register: &Register,
    aliases: &[FieldAlias],
    out: &mut String,
) {
    let marker = pack_marker(context, peripheral, register, aliases);
    out.push_str("  template<typename... T>\n");
    let _ = writeln!(
        out,
        "  using {}Pack = Register<0x{:X}, {}, {}, {marker}, T...> ;\n",
        camel_case(&register.name),
        register.address,
        register.width,
        register.access.mode_type()
    );
}
