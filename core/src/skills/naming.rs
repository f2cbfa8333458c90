//! Skill name rules.
//!
//! A skill name doubles as its directory name, so `init` only insists that it
//! is a safe path segment. The conventional hyphen-case style (lowercase
//! ASCII letters, digits and single hyphens, at most [`MAX_NAME_LEN`]
//! characters) is reported as a lint, never as a failure.

pub const MAX_NAME_LEN: usize = 64;

/// Returns `Err(reason)` when `name` cannot be used as a single directory name.
pub fn check_path_segment(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("name is empty".to_string());
    }

    if is_unsafe_path_segment(name) {
        return Err("name is not a safe path segment".to_string());
    }

    Ok(())
}

/// Returns `Err(reason)` when `name` is not conventional hyphen-case.
pub fn check_name_style(name: &str) -> Result<(), String> {
    if name.len() > MAX_NAME_LEN {
        return Err(format!(
            "name is {} characters long, recommended maximum is {}",
            name.len(),
            MAX_NAME_LEN
        ));
    }

    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
    {
        return Err(format!(
            "character {:?} is unusual, prefer lowercase letters, digits and hyphens",
            c
        ));
    }

    if name.starts_with('-') || name.ends_with('-') {
        return Err("name starts or ends with a hyphen".to_string());
    }

    if name.contains("--") {
        return Err("name contains consecutive hyphens".to_string());
    }

    Ok(())
}

pub(crate) fn is_unsafe_path_segment(name: &str) -> bool {
    name.contains("..")
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0')
        || name == "."
        || name.trim().is_empty()
}

/// `pdf-form-filler` -> `Pdf Form Filler`.
pub fn title_case(name: &str) -> String {
    name.split('-')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
