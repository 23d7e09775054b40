use anyhow::Result;

use crate::{CliTest, HOME_DART, stdout};

#[test]
fn test_restore_after_localize() -> Result<()> {
    let test = CliTest::flutter_project()?;
    test.write_file("lib/home.dart", HOME_DART)?;

    test.localize_command()
        .args(["--backup", "--repair", "--no-report"])
        .output()?;
    assert_ne!(test.read_file("lib/home.dart")?, HOME_DART);

    let output = test.command().arg("restore").output()?;

    assert!(output.status.success());
    assert_eq!(test.read_file("lib/home.dart")?, HOME_DART);
    assert!(!test.root().join(".l10nify_backup").exists());
    let out = stdout(&output);
    assert!(out.contains("Restored 1 file(s) from .l10nify_backup"), "{}", out);
    assert!(out.contains("  - lib/home.dart"));

    Ok(())
}

#[test]
fn test_restore_without_backup() -> Result<()> {
    let test = CliTest::flutter_project()?;

    let output = test.command().arg("restore").output()?;

    assert!(output.status.success());
    assert_eq!(stdout(&output), "No backups found in .l10nify_backup\n");

    Ok(())
}
