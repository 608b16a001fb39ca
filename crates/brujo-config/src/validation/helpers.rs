/// Push an error if `value` is outside `[min, max]`.
pub(crate) fn validate_range(errors: &mut Vec<String>, name: &str, value: u32, min: u32, max: u32) {
    if value < min || value > max {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}

/// Accept `xx` or `xx_YY` / `xx-YY` style codes.
pub(crate) fn validate_language(errors: &mut Vec<String>, code: &str) {
    let mut parts = code.splitn(2, ['_', '-']);
    let lang = parts.next().unwrap_or_default();
    let region_ok = parts
        .next()
        .map_or(true, |r| !r.is_empty() && r.chars().all(|c| c.is_ascii_alphanumeric()));
    let lang_ok = (2..=3).contains(&lang.len()) && lang.chars().all(|c| c.is_ascii_lowercase());

    if !lang_ok || !region_ok {
        errors.push(format!("language = {code:?} is not a language code"));
    }
}
