use skillkit_core::{
    InitOptions, Lint, ManifestField, PackageOptions, SkillError, Validation, ValidationIssue,
    init_skill, lint_skill, load_skill, package_skill, unpack_skill, validate_skill,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use walkdir::WalkDir;

fn read_tree(root: &Path) -> Vec<(String, Option<Vec<u8>>)> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .map(|entry| {
            let entry = entry.unwrap();
            let rel = entry
                .path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/");
            let content = entry
                .file_type()
                .is_file()
                .then(|| fs::read(entry.path()).unwrap());
            (rel, content)
        })
        .collect()
}

#[test]
fn init_edit_validate_package_unpack() {
    let tmp = TempDir::new().unwrap();
    let workspace = tmp.path().join("skills");

    let dir = init_skill("release-notes", &workspace, InitOptions::default()).unwrap();
    assert_eq!(validate_skill(&dir).unwrap(), Validation::Valid);

    fs::write(
        dir.join("SKILL.md"),
        "---\nname: release-notes\ndescription: Drafts release notes from a changelog.\n---\n\n# Release Notes\n",
    )
    .unwrap();
    fs::write(dir.join("scripts/collect.sh"), "#!/bin/sh\ngit log --oneline\n").unwrap();
    fs::write(dir.join("assets/template.md"), "## {{version}}\n").unwrap();

    let skill = load_skill(&dir).unwrap();
    assert_eq!(skill.name, "release-notes");
    assert_eq!(skill.description, "Drafts release notes from a changelog.");

    let out = tmp.path().join("dist");
    let archive = package_skill(&dir, Some(&out), &PackageOptions::default()).unwrap();
    assert_eq!(archive.file_name().unwrap(), "release-notes.skill");

    let extracted = unpack_skill(&archive, &tmp.path().join("unpacked")).unwrap();
    assert_eq!(read_tree(&dir), read_tree(&extracted));
    assert_eq!(validate_skill(&extracted).unwrap(), Validation::Valid);
}

#[test]
fn every_missing_or_empty_field_is_named() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("demo");
    fs::create_dir_all(&dir).unwrap();

    let cases = [
        ("---\ndescription: d\n---\n", ValidationIssue::MissingField(ManifestField::Name)),
        ("---\nname: demo\n---\n", ValidationIssue::MissingField(ManifestField::Description)),
        ("---\nname:\ndescription: d\n---\n", ValidationIssue::EmptyField(ManifestField::Name)),
        ("---\nname: demo\ndescription: ''\n---\n", ValidationIssue::EmptyField(ManifestField::Description)),
        ("---\nversion: 1\ndescription: d\n---\n", ValidationIssue::MissingField(ManifestField::Name)),
        ("---\nname: demo\nauthor: me\n---\n", ValidationIssue::MissingField(ManifestField::Description)),
    ];

    for (content, issue) in cases {
        fs::write(dir.join("SKILL.md"), content).unwrap();
        assert_eq!(validate_skill(&dir).unwrap(), Validation::Invalid(issue.clone()));

        let out = tmp.path().join("dist");
        let err = package_skill(&dir, Some(&out), &PackageOptions::default()).unwrap_err();
        assert!(matches!(err, SkillError::ValidationFailed(ref got) if *got == issue));
        assert!(!out.exists());
    }
}

#[test]
fn init_over_existing_skill_keeps_it() {
    let tmp = TempDir::new().unwrap();
    let dir = init_skill("demo", tmp.path(), InitOptions::default()).unwrap();
    fs::write(dir.join("SKILL.md"), "---\nname: demo\ndescription: Edited.\n---\n").unwrap();
    let before = read_tree(&dir);

    let err = init_skill("demo", tmp.path(), InitOptions { with_examples: true }).unwrap_err();
    assert!(matches!(err, SkillError::AlreadyExists { .. }));
    assert_eq!(before, read_tree(&dir));
}

#[test]
fn any_safe_name_round_trips_through_the_workflow() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("dist");

    for name in ["MySkill", "my_skill", "Release Notes", "true"] {
        let dir = init_skill(name, &tmp.path().join("src"), InitOptions::default()).unwrap();
        assert_eq!(validate_skill(&dir).unwrap(), Validation::Valid, "{name}");
        assert_eq!(load_skill(&dir).unwrap().name, name);

        let archive = package_skill(&dir, Some(&out), &PackageOptions::default()).unwrap();
        let extracted = unpack_skill(&archive, &tmp.path().join("unpacked")).unwrap();
        assert_eq!(read_tree(&dir), read_tree(&extracted), "{name}");
    }
}

#[test]
fn style_problems_warn_without_blocking() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("Converter");
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("SKILL.md"),
        "---\nname: Converter\ndescription: Turns <csv> into JSON.\nversion: 2\n---\n",
    )
    .unwrap();

    assert_eq!(validate_skill(&dir).unwrap(), Validation::Valid);

    let lints = lint_skill(&dir).unwrap();
    assert_eq!(lints[0], Lint::UnknownKeys(vec!["version".to_string()]));
    assert!(matches!(lints[1], Lint::NameStyle(_)));
    assert_eq!(lints[2], Lint::DescriptionHasAngleBrackets);

    let archive = package_skill(&dir, Some(&tmp.path().join("dist")), &PackageOptions::default())
        .unwrap();
    assert!(archive.is_file());
}
