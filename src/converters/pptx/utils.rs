//! Utility functions for the conversion: XML escaping and lenient number/length parsing.

// --- Text Escaping ---

/// Escapes special XML characters (`&`, `<`, `>`) for use in element text content.
pub fn escape_xml_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escapes text for use inside a double-quoted XML attribute value.
pub fn escape_xml_attr(text: &str) -> String {
    escape_xml_text(text).replace('"', "&quot;")
}

// --- Number Parsing ---

/// Length in bytes of the numeric literal at the start of `s` (sign, digits, one decimal
/// point, optional exponent). Returns 0 when `s` does not start with a number.
pub(crate) fn numeric_prefix_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut i = 0;
    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }
    let mut digits = 0;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
        digits += 1;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return 0;
    }
    // Exponent only counts when digits follow, so "1em" keeps its unit.
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        if j < bytes.len() && bytes[j].is_ascii_digit() {
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            i = j;
        }
    }
    i
}

/// Parses the number at the start of `s`, returning it with the unparsed remainder.
pub fn parse_leading_number(s: &str) -> Option<(f64, &str)> {
    let s = s.trim_start();
    let len = numeric_prefix_len(s);
    if len == 0 {
        return None;
    }
    let value = s[..len].parse::<f64>().ok()?;
    Some((value, &s[len..]))
}

/// Parses an attribute length, applying the unit heuristics used for slide output:
/// `%` scales by 0.12, `em` maps to `v * 10 + 8`, `pt` adds 6, and `px` or a bare number
/// is taken as-is. Values are not clamped.
///
/// # Returns
/// `None` if the value does not start with a number.
pub fn parse_length(value: &str) -> Option<f64> {
    let (number, unit) = parse_leading_number(value)?;
    let length = match unit.trim() {
        "%" => number * 0.12,
        "em" => number * 10.0 + 8.0,
        "pt" => number + 6.0,
        _ => number,
    };
    Some(length)
}

/// Splits a comma/whitespace separated list of numbers, skipping anything unparsable.
pub fn parse_number_list(input: &str) -> Vec<f64> {
    input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse::<f64>().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_attr_quotes() {
        assert_eq!(
            escape_xml_attr(r#"a "b" & <c>"#),
            "a &quot;b&quot; &amp; &lt;c&gt;"
        );
    }

    #[test]
    fn test_parse_leading_number_variants() {
        assert_eq!(parse_leading_number("12.5px"), Some((12.5, "px")));
        assert_eq!(parse_leading_number("-3"), Some((-3.0, "")));
        assert_eq!(parse_leading_number("1e3"), Some((1000.0, "")));
        assert_eq!(parse_leading_number("1em"), Some((1.0, "em")));
        assert_eq!(parse_leading_number(".5"), Some((0.5, "")));
        assert_eq!(parse_leading_number("abc"), None);
        assert_eq!(parse_leading_number("-"), None);
    }

    #[test]
    fn test_parse_length_units() {
        assert_eq!(parse_length("10"), Some(10.0));
        assert_eq!(parse_length("10px"), Some(10.0));
        assert_eq!(parse_length("12pt"), Some(18.0));
        assert_eq!(parse_length("2em"), Some(28.0));
        assert!((parse_length("50%").unwrap() - 6.0).abs() < 1e-9);
        assert_eq!(parse_length("-4"), Some(-4.0));
        assert_eq!(parse_length("auto"), None);
    }

    #[test]
    fn test_parse_number_list() {
        assert_eq!(parse_number_list("10, 20 30"), vec![10.0, 20.0, 30.0]);
        assert_eq!(parse_number_list(""), Vec::<f64>::new());
    }
}
