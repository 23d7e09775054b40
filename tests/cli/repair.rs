use anyhow::Result;

use crate::{CliTest, stderr, stdout};

const UNREPAIRED: &str = "\
import 'package:flutter/material.dart';

class Labels {
  static const title = AppLocalizations.of(context)?.welcome ?? 'Welcome';
}
";

#[test]
fn test_repair_fixes_const_and_import() -> Result<()> {
    let test = CliTest::flutter_project()?;
    test.write_file(
        "lib/home.dart",
        "\
import 'package:flutter/material.dart';

Widget build(BuildContext context) {
  return const Text(AppLocalizations.of(context)?.welcome ?? 'Welcome');
}
",
    )?;

    let output = test.repair_command().output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        test.read_file("lib/home.dart")?,
        "\
import 'package:flutter/material.dart';
import 'l10n/app_localizations.dart';

Widget build(BuildContext context) {
  return Text(AppLocalizations.of(context)?.welcome ?? 'Welcome');
}
"
    );
    assert!(stdout(&output).contains("Repaired 1 file(s):"));

    Ok(())
}

#[test]
fn test_repair_dry_run() -> Result<()> {
    let test = CliTest::flutter_project()?;
    let content = "Widget f(BuildContext context) => const Text(AppLocalizations.of(context)?.welcome ?? 'Welcome');\n";
    test.write_file("lib/home.dart", content)?;

    let output = test.repair_command().args(["--dry-run", "--no-imports"]).output()?;

    assert!(output.status.success());
    assert_eq!(test.read_file("lib/home.dart")?, content);
    let out = stdout(&output);
    assert!(out.contains("Would repair 1 file(s):"), "{}", out);
    assert!(out.contains("  - lib/home.dart: 1 repair(s)"), "{}", out);

    Ok(())
}

#[test]
fn test_repair_fails_on_unrepaired_site() -> Result<()> {
    let test = CliTest::flutter_project()?;
    test.write_file("lib/labels.dart", UNREPAIRED)?;

    // Without the static-context pass the constant field cannot be fixed.
    let output = test
        .repair_command()
        .args(["--no-imports", "--no-context"])
        .output()?;

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("unrepaired"));

    Ok(())
}

#[test]
fn test_repair_nothing_to_do() -> Result<()> {
    let test = CliTest::flutter_project()?;
    test.write_file("lib/main.dart", "void main() {}\n")?;

    let output = test.repair_command().output()?;

    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "✓ Checked 1 source file - nothing to repair\n"
    );

    Ok(())
}
