use anyhow::Result;
use serde_json::Value;

use crate::{CliTest, HOME_DART, stderr, stdout};

#[test]
fn test_localize_with_repair_rewrites_and_imports() -> Result<()> {
    let test = CliTest::flutter_project()?;
    test.write_file("lib/home.dart", HOME_DART)?;

    let output = test.localize_command().arg("--repair").output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        test.read_file("lib/home.dart")?,
        "\
import 'package:flutter/material.dart';
import 'l10n/app_localizations.dart';

class Home extends StatelessWidget {
  @override
  Widget build(BuildContext context) {
    return Text(AppLocalizations.of(context)?.welcome ?? 'Welcome');
  }
}
"
    );
    let out = stdout(&output);
    assert!(out.contains("Localized 1 string(s) in 1 file(s):"), "{}", out);
    assert!(out.contains("  - lib/home.dart: 1 string(s), import, 1 repair(s)"));

    Ok(())
}

#[test]
fn test_localize_without_repair_reports_const_site() -> Result<()> {
    let test = CliTest::flutter_project()?;
    test.write_file("lib/home.dart", HOME_DART)?;

    let output = test.localize_command().arg("--no-report").output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(
        test.read_file("lib/home.dart")?
            .contains("return const Text(AppLocalizations.of(context)?.welcome ?? 'Welcome');")
    );
    let out = stdout(&output);
    assert!(
        out.contains("error: enclosing `const` must be removed  unrepaired"),
        "{}",
        out
    );
    assert!(out.contains("--> lib/home.dart:6:"), "{}", out);
    assert!(out.contains("left unchanged by const-constructor"), "{}", out);

    Ok(())
}

#[test]
fn test_localize_dry_run_writes_no_source() -> Result<()> {
    let test = CliTest::flutter_project()?;
    test.write_file("lib/home.dart", HOME_DART)?;

    let output = test.localize_command().arg("--dry-run").output()?;

    assert!(output.status.success());
    assert_eq!(test.read_file("lib/home.dart")?, HOME_DART);
    let out = stdout(&output);
    assert!(out.contains("Would localize 1 string(s) in 1 file(s):"), "{}", out);
    assert!(out.contains("Run without --dry-run to apply these changes."));

    // Reports are still written
    let audit: Value = serde_json::from_str(&test.read_file("localized_strings.json")?)?;
    assert_eq!(audit["dryRun"], true);
    assert_eq!(audit["summary"]["stringsLocalized"], 1);

    Ok(())
}

#[test]
fn test_localize_writes_reports() -> Result<()> {
    let test = CliTest::flutter_project()?;
    test.write_file("lib/home.dart", HOME_DART)?;

    let output = test.localize_command().output()?;

    assert!(output.status.success());
    let log = test.read_file("localization_changes.log")?;
    assert!(log.contains("lib/home.dart"), "{}", log);
    assert!(log.contains("\"Welcome\" -> welcome"), "{}", log);

    let audit: Value = serde_json::from_str(&test.read_file("localized_strings.json")?)?;
    assert_eq!(audit["dryRun"], false);
    assert_eq!(audit["summary"]["filesModified"], 1);
    assert_eq!(audit["localized"][0]["key"], "welcome");
    assert_eq!(audit["localized"][0]["line"], 6);

    Ok(())
}

#[test]
fn test_localize_no_report() -> Result<()> {
    let test = CliTest::flutter_project()?;
    test.write_file("lib/home.dart", HOME_DART)?;

    let output = test.localize_command().arg("--no-report").output()?;

    assert!(output.status.success());
    assert!(!test.root().join("localization_changes.log").exists());
    assert!(!test.root().join("localized_strings.json").exists());

    Ok(())
}

#[test]
fn test_second_run_is_a_no_op() -> Result<()> {
    let test = CliTest::flutter_project()?;
    test.write_file("lib/home.dart", HOME_DART)?;

    test.localize_command().arg("--repair").output()?;
    let once = test.read_file("lib/home.dart")?;
    let output = test.localize_command().arg("--repair").output()?;

    assert!(output.status.success());
    assert_eq!(test.read_file("lib/home.dart")?, once);
    assert!(stdout(&output).contains("nothing to localize"));

    Ok(())
}

#[test]
fn test_localize_with_backup() -> Result<()> {
    let test = CliTest::flutter_project()?;
    test.write_file("lib/home.dart", HOME_DART)?;

    let output = test.localize_command().arg("--backup").output()?;

    assert!(output.status.success());
    assert_eq!(test.read_file(".l10nify_backup/lib/home.dart")?, HOME_DART);
    assert!(stdout(&output).contains("Backed up 1 file(s)."));

    Ok(())
}

#[test]
fn test_generated_files_are_ignored() -> Result<()> {
    let test = CliTest::flutter_project()?;
    let generated = "String label() => 'Welcome';\n";
    test.write_file("lib/home.g.dart", generated)?;

    let output = test.localize_command().arg("--no-report").output()?;

    assert!(output.status.success());
    assert_eq!(test.read_file("lib/home.g.dart")?, generated);

    Ok(())
}

#[test]
fn test_missing_template_is_fatal() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("lib/home.dart", HOME_DART)?;

    let output = test.localize_command().output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(
        stderr(&output).contains("Template ARB file not found"),
        "{}",
        stderr(&output)
    );
    assert_eq!(test.read_file("lib/home.dart")?, HOME_DART);

    Ok(())
}

#[test]
fn test_missing_source_root_is_fatal() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.localize_command().output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Source root not found"));

    Ok(())
}

#[test]
fn test_missing_translation_is_reported_for_target() -> Result<()> {
    let test = CliTest::flutter_project()?;
    test.write_file("lib/l10n/app_es.arb", r#"{"@@locale": "es", "signIn": "Entrar"}"#)?;
    test.write_file("lib/home.dart", HOME_DART)?;

    let output = test
        .localize_command()
        .args(["--target-arb", "app_es.arb", "--no-report"])
        .output()?;

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(
        out.contains("warning: key `welcome` has no translation  missing-translation"),
        "{}",
        out
    );

    Ok(())
}
