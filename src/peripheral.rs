use std::fmt::Write;

use tracing::debug;

use crate::config::GeneratorConfig;
use crate::enumeration::EnumRegistry;
use crate::formater::{camel_case, file_banner, file_stem};
use crate::model::{Device, Peripheral};
use crate::register::gen_register;

/// State shared by the generation of one peripheral.
pub(crate) struct ContextCodeGen<'a> {
    pub registry: &'a mut EnumRegistry,
    pub config: &'a GeneratorConfig,
    /// Groups defined while generating this peripheral.
    pub enumerations: String,
}

impl<'a> ContextCodeGen<'a> {
    pub fn new(
        registry: &'a mut EnumRegistry,
        config: &'a GeneratorConfig,
    ) -> Self {
        Self {
            registry,
            config,
            enumerations: String::new(),
        }
    }
}

/// The two headers generated for a peripheral.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeripheralHeaders {
    pub peripheral: String,
    pub registers_file: String,
    pub registers: String,
    pub enumerations_file: String,
    pub enumerations: String,
}

/// Generate both headers of `peripheral`. Groups already defined by an
/// earlier peripheral of the same run are only referenced.
pub fn gen_peripheral(
    device: &Device,
    peripheral: &Peripheral,
    registry: &mut EnumRegistry,
    config: &GeneratorConfig,
) -> PeripheralHeaders {
    let mut context = ContextCodeGen::new(registry, config);
    let struct_name = camel_case(&peripheral.name);
    let mut body = String::new();
    let _ = writeln!(body, "struct {struct_name}");
    body.push_str("{\n");
    for register in &peripheral.registers {
        gen_register(&mut context, peripheral, register, &mut body);
    }
    body.push_str("} ;\n\n");
    debug!(
        "peripheral {} with {} registers",
        peripheral.name,
        peripheral.registers.len()
    );

    let stem = file_stem(&peripheral.name);
    let registers_file = format!("{stem}registers.hpp");
    let enumerations_file = format!("{stem}bitsfield.hpp");

    let details = match &peripheral.description {
        Some(description) => format!(
            "{}. This header file is auto-generated for {} device.",
            description.trim_end_matches(['.', ' ']),
            device.name
        ),
        None => format!(
            "This header file is auto-generated for {} device.",
            device.name
        ),
    };
    let guard = format!("{}REGISTERS_HPP", stem.to_uppercase());
    let mut registers = file_banner(&registers_file, &details, config.banner_width);
    registers.push('\n');
    gen_guard_open(&guard, &mut registers);
    let _ = writeln!(
        registers,
        "#include \"{enumerations_file}\"  //for Bits Fields defs"
    );
    registers.push_str(concat!(
        "#include \"registerbase.hpp\"   //for RegisterBase\n",
        "#include \"register.hpp\"       //for Register\n",
        "#include \"accessmode.hpp\"     //for ReadMode, WriteMode, ReadWriteMode\n",
        "\n",
    ));
    registers.push_str(&body);
    gen_guard_close(&guard, &mut registers);

    let details = format!(
        "Enumerations related with {} peripheral. This header file is \
         auto-generated for {} device.",
        peripheral.name, device.name
    );
    let guard = format!("{}ENUMS_HPP", stem.to_uppercase());
    let mut enumerations =
        file_banner(&enumerations_file, &details, config.banner_width);
    enumerations.push('\n');
    gen_guard_open(&guard, &mut enumerations);
    enumerations.push_str("#include \"bitsfield.hpp\"     //for BitsField\n\n");
    enumerations.push_str(&context.enumerations);
    gen_guard_close(&guard, &mut enumerations);

    PeripheralHeaders {
        peripheral: peripheral.name.clone(),
        registers_file,
        registers,
        enumerations_file,
        enumerations,
    }
}

fn gen_guard_open(guard: &str, out: &mut String) {
    let _ = writeln!(out, "#if !defined({guard})");
    let _ = writeln!(out, "#define {guard}\n");
}

fn gen_guard_close(guard: &str, out: &mut String) {
    let _ = writeln!(out, "#endif //#if !defined({guard})");
}
