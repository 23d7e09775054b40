use anyhow::Result;

use crate::{CliTest, HOME_DART, stdout};

#[test]
fn test_scan_reports_localizable_strings() -> Result<()> {
    let test = CliTest::flutter_project()?;
    test.write_file("lib/home.dart", HOME_DART)?;

    let output = test.scan_command().output()?;

    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(
        out.contains("error: \"Welcome\" can use key `welcome`  localizable"),
        "{}",
        out
    );
    assert!(out.contains("--> lib/home.dart:6:"));
    // Scanning never writes
    assert_eq!(test.read_file("lib/home.dart")?, HOME_DART);

    Ok(())
}

#[test]
fn test_scan_clean_project() -> Result<()> {
    let test = CliTest::flutter_project()?;
    test.write_file(
        "lib/home.dart",
        "Widget f(BuildContext context) => Text(AppLocalizations.of(context)?.welcome ?? 'Welcome');\n",
    )?;

    let output = test.scan_command().output()?;

    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "✓ Checked 1 source file - no localizable strings found\n"
    );

    Ok(())
}

#[test]
fn test_scan_with_custom_source_root() -> Result<()> {
    let test = CliTest::flutter_project()?;
    test.write_file("app/home.dart", HOME_DART)?;

    let output = test.scan_command().args(["--source-root", "app"]).output()?;

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("--> app/home.dart:6:"));

    Ok(())
}
