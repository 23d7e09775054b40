use anyhow::{Context, Result};
use insta::assert_snapshot;
use serde_json::Value;

use crate::{CliTest, stdout};

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    assert_eq!(parsed["sourceRoot"], "lib");
    assert_eq!(parsed["arbDir"], "lib/l10n");
    assert_eq!(parsed["templateArb"], "app_en.arb");
    assert_eq!(parsed["lookupAccessor"], "AppLocalizations.of(context)");
    assert!(
        parsed.get("targetArb").is_none(),
        "targetArb is unset by default"
    );

    // 2-space indentation and trailing newline
    assert!(content.contains("\n  \"sourceRoot\""));
    assert!(content.ends_with("}\n"));

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("init").output()?;

    assert!(output.status.success());
    assert_snapshot!(stdout(&output), @"✓ Created .l10nifyrc.json");
    assert!(test.root().join(".l10nifyrc.json").exists());
    assert_config_content(&test.read_file(".l10nifyrc.json")?)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".l10nifyrc.json", "{}")?;

    let output = test.command().arg("init").output()?;

    assert_eq!(output.status.code(), Some(1));
    assert_snapshot!(stdout(&output), @"error: .l10nifyrc.json already exists");
    assert_eq!(test.read_file(".l10nifyrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::flutter_project()?;
    test.command().arg("init").output()?;
    test.write_file("lib/main.dart", "void main() {}\n")?;

    let output = test.scan_command().output()?;

    assert!(
        output.status.success(),
        "Scan should work with initialized config. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    Ok(())
}
