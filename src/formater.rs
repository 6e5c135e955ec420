use std::fmt::Write;

const BANNER_RULE: usize = 79;
const BANNER_INDENT: &str = "*                 ";

/// Title-case every run of letters and drop the underscores, `TIMER_EX`
/// becomes `TimerEx`, `I2C1` stays `I2C1`.
pub fn camel_case(name: &str) -> String {
    let mut output = String::with_capacity(name.len());
    let mut in_word = false;
    for letter in name.chars() {
        if letter.is_alphabetic() {
            if in_word {
                output.extend(letter.to_lowercase());
            } else {
                output.extend(letter.to_uppercase());
            }
            in_word = true;
            continue;
        }
        in_word = false;
        if letter != '_' {
            output.push(letter);
        }
    }

    output
}

/// Keep only letters and underscores. Names that differ only by digits or
/// punctuation end up identical.
pub fn strip_id(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphabetic() || *c == '_')
        .collect()
}

/// Name used for the generated files and guards of a peripheral.
pub fn file_stem(name: &str) -> String {
    name.to_lowercase().replace('_', "")
}

/// Name of one element of a `dim` array.
pub fn dim_name(name: &str, index: &str) -> String {
    let output = name.replace("[%s]", index);
    output.replace("%s", index)
}

/// Word wrap `text`, words are never split so a single long word may exceed
/// `width`.
pub fn split_into_lines(text: &str, width: usize) -> Vec<String> {
    let mut lines = vec![];
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.len() + word.len() > width {
            lines.push(line.trim_end().to_string());
            line.clear();
        }
        line.push_str(word);
        line.push(' ');
    }
    lines.push(line.trim_end().to_string());
    lines
}

pub fn file_banner(file_name: &str, description: &str, width: usize) -> String {
    let lines = split_into_lines(description, width);
    let mut output = String::new();
    // writing into a String never fails
    let _ = writeln!(output, "/{}", "*".repeat(BANNER_RULE));
    let _ = writeln!(output, "* Filename      : {file_name}");
    output.push_str("*\n");
    let mut lines = lines.iter();
    if let Some(first) = lines.next() {
        let _ = writeln!(output, "* Details       : {first}");
    }
    for line in lines {
        let _ = writeln!(output, "{BANNER_INDENT}{line}");
    }
    output.push_str("*\n*\n");
    let _ = writeln!(output, "{}/", "*".repeat(BANNER_RULE));
    output
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn camel() {
        assert_eq!(camel_case("Timer"), "Timer");
        assert_eq!(camel_case("CTRL"), "Ctrl");
        assert_eq!(camel_case("TIMER_EX"), "TimerEx");
        assert_eq!(camel_case("TimerEx"), "Timerex");
        assert_eq!(camel_case("USART1_CR1"), "Usart1Cr1");
        assert_eq!(camel_case("I2C1"), "I2C1");
        assert_eq!(camel_case(""), "");
    }

    #[test]
    fn strip() {
        assert_eq!(strip_id("Usart1Cr1UeValues"), "UsartCrUeValues");
        assert_eq!(strip_id("Tim.2-Ctrl_x"), "TimCtrl_x");
    }

    #[test]
    fn stem() {
        assert_eq!(file_stem("USART_1"), "usart1");
    }

    #[test]
    fn dim() {
        assert_eq!(dim_name("CH[%s]", "3"), "CH3");
        assert_eq!(dim_name("CH%s_CTRL", "A"), "CHA_CTRL");
    }

    #[test]
    fn wrap() {
        assert_eq!(
            split_into_lines("one two  three four", 9),
            ["one two", "three", "four"]
        );
        assert_eq!(split_into_lines("", 10), [""]);
        assert_eq!(
            split_into_lines("averyveryverylongword x", 5),
            ["averyveryverylongword", "x"]
        );
    }

    #[test]
    fn wrap_respects_width() {
        let text = "Enumerations related with TIMER peripheral. This header \
                    file is auto-generated for STM32F411 device.";
        for line in split_into_lines(text, 62) {
            assert!(line.len() <= 62, "{line}");
        }
    }

    #[test]
    fn banner() {
        let banner = file_banner(
            "wwdgfieldvalues.hpp",
            "Enumerations related with WWDG peripheral. This header file is \
             auto-generated for STM32F411 device.",
            62,
        );
        let expected = "\
/*******************************************************************************
* Filename      : wwdgfieldvalues.hpp
*
* Details       : Enumerations related with WWDG peripheral. This header file is
*                 auto-generated for STM32F411 device.
*
*
*******************************************************************************/
";
        assert_eq!(banner, expected);
    }
}
