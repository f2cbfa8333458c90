//! Files written by `init_skill`. `{name}` and `{title}` are substituted;
//! in the manifest template `{yaml_name}` is the name as a YAML scalar.

pub const SKILL_TEMPLATE: &str = r#"---
name: {yaml_name}
description: "[TODO: Explain what this skill does and when it should be used.]"
---

# {title}

## Overview

[TODO: 1-2 sentences explaining what this skill enables.]

## Instructions

[TODO: Pick the structure that fits this skill: a step-by-step workflow,
a set of tasks, reference guidelines, or a list of capabilities.]

## Resources

### scripts/
Executable helpers for operations that need deterministic results.

### references/
Documentation loaded into context only when needed.

### assets/
Templates and files used in the produced output.
"#;

pub const EXAMPLE_SCRIPT: &str = r#"#!/usr/bin/env python3
"""Example helper script for {name}."""


def main():
    print("This is an example script for {name}")


if __name__ == "__main__":
    main()
"#;

pub const EXAMPLE_REFERENCE: &str = r#"# Reference Documentation for {title}

Placeholder for detailed reference material. Replace or delete this file.
"#;

pub const EXAMPLE_ASSET: &str = r#"# Example Asset File

Placeholder for templates or other files used in the output.
Replace or delete this file.
"#;

pub fn render(template: &str, name: &str, title: &str) -> String {
    template
        .replace("{yaml_name}", &yaml_scalar(name))
        .replace("{name}", name)
        .replace("{title}", title)
}

/// `name` as a YAML string scalar, quoted only when plain style would change its meaning.
fn yaml_scalar(name: &str) -> String {
    serde_yaml::to_string(name)
        .map(|s| s.trim_end().to_string())
        .unwrap_or_else(|_| format!("'{}'", name.replace('\'', "''")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_substitutes_placeholders() {
        let rendered = render(SKILL_TEMPLATE, "pdf-tools", "Pdf Tools");
        assert!(rendered.starts_with("---\nname: pdf-tools\n"));
        assert!(rendered.contains("# Pdf Tools"));
        assert!(!rendered.contains("{name}"));
        assert!(!rendered.contains("{title}"));
        assert!(!rendered.contains("{yaml_name}"));
    }

    #[test]
    fn manifest_name_stays_a_string() {
        for name in ["yes", "42", "#tag", "a: b", "Release Notes", "it's"] {
            let rendered = render(SKILL_TEMPLATE, name, name);
            let frontmatter = rendered.split("---").nth(1).unwrap();
            let value: serde_yaml::Value = serde_yaml::from_str(frontmatter).unwrap();
            assert_eq!(value["name"].as_str(), Some(name), "{rendered}");
        }
    }
}
