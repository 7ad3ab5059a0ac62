mod cli {
    #![allow(non_snake_case)]

    use assert_cmd::prelude::*;
    use predicates::prelude::*;
    use predicates::str::{contains, is_empty, starts_with};

    use std::io::Write;
    use std::process::Command;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    const NAME: &str = "domaincov";

    const REPORT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<coverage line-rate="0.6" lines-covered="60" lines-valid="100">
  <packages>
    <package name="App">
      <classes>
        <class name="App.Services.Foo" filename="Services\Foo.cs" line-rate="0.5">
          <lines>
            <line number="1" hits="1" />
            <line number="2" hits="0" />
          </lines>
        </class>
      </classes>
    </package>
  </packages>
</coverage>"#;

    fn report_file(
        content: impl AsRef<[u8]>,
    ) -> Result<tempfile::NamedTempFile, Box<dyn std::error::Error>> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(content.as_ref())?;
        Ok(file)
    }

    fn command(dir: &tempfile::TempDir) -> Result<Command, Box<dyn std::error::Error>> {
        let mut cmd = Command::cargo_bin(NAME)?;
        cmd.current_dir(dir.path());
        Ok(cmd)
    }

    #[test]
    fn test_output__when_no_report_provided() -> TestResult {
        let dir = tempfile::tempdir()?;
        let mut cmd = command(&dir)?;

        cmd.assert()
            .code(1)
            .stdout(starts_with("Usage:"))
            .stdout(contains("domaincov"))
            .stdout(contains("Coverage analysis").not());
        Ok(())
    }

    #[test]
    fn test_output__when_report_missing() -> TestResult {
        let dir = tempfile::tempdir()?;
        let mut cmd = command(&dir)?;

        cmd.arg(dir.path().join("does-not-exist.xml"));

        cmd.assert()
            .failure()
            .stdout(is_empty())
            .stderr(contains("Failed to read coverage report"));
        Ok(())
    }

    #[test]
    fn test_output__when_report_malformed() -> TestResult {
        let dir = tempfile::tempdir()?;
        let file = report_file(r#"<coverage lines-valid="1" lines-covered="1" line-rate="1"><class>"#)?;
        let mut cmd = command(&dir)?;

        cmd.arg(file.path());

        cmd.assert()
            .failure()
            .stdout(is_empty())
            .stderr(contains("Malformed coverage report"));
        Ok(())
    }

    #[test]
    fn test_output__when_root_attribute_missing() -> TestResult {
        let dir = tempfile::tempdir()?;
        let file = report_file(r#"<coverage lines-valid="1" lines-covered="1"/>"#)?;
        let mut cmd = command(&dir)?;

        cmd.arg(file.path());

        cmd.assert()
            .failure()
            .stdout(is_empty())
            .stderr(contains("line-rate"));
        Ok(())
    }

    #[test]
    fn test_output__when_report_valid() -> TestResult {
        let dir = tempfile::tempdir()?;
        let file = report_file(REPORT)?;
        let mut cmd = command(&dir)?;

        cmd.arg(file.path());

        cmd.assert()
            .success()
            .stdout(contains("[Domain logic: Services, Utils, Models]\n  Lines:             2\n  Covered:           1\n  Line rate:     50.00%"))
            .stdout(contains("[Presentation: UI, Program.cs (excluded)]\n  Lines:             0\n  Covered:           0\n\n"))
            .stdout(contains("[Adjusted (presentation excluded)]\n  Lines:           100\n  Covered:          60\n  Line rate:     60.00%"))
            .stdout(contains("   50.00% |    1/2    | App.Services.Foo"));
        Ok(())
    }

    #[test]
    fn test_output__when_threshold_failed() -> TestResult {
        let dir = tempfile::tempdir()?;
        let file = report_file(REPORT)?;
        let mut cmd = command(&dir)?;

        cmd.arg(file.path()).args(["--fail-under-domain", "80"]);

        cmd.assert()
            .failure()
            .stdout(contains("Coverage analysis"))
            .stdout(contains("Domain coverage: 50.0% (threshold: 80.0%"));
        Ok(())
    }

    #[test]
    fn test_output__when_threshold_passed() -> TestResult {
        let dir = tempfile::tempdir()?;
        let file = report_file(REPORT)?;
        let mut cmd = command(&dir)?;

        cmd.arg(file.path()).args(["--fail-under-adjusted", "55"]);

        cmd.assert()
            .success()
            .stdout(contains("Adjusted coverage: 60.0% (threshold: 55.0%"));
        Ok(())
    }

    #[test]
    fn test_output__when_config_in_working_directory() -> TestResult {
        let dir = tempfile::tempdir()?;
        std::fs::write(
            dir.path().join("domaincov.toml"),
            "[markers]\ndomain = [\"Core\"]\n",
        )?;
        let file = report_file(REPORT)?;
        let mut cmd = command(&dir)?;

        cmd.arg(file.path());

        cmd.assert()
            .success()
            .stdout(contains("[Domain logic: Core]\n  Lines:             0\n  Covered:           0\n\n"))
            .stdout(contains("App.Services.Foo").not());
        Ok(())
    }

    #[test]
    fn test_output__when_config_explicit_and_missing() -> TestResult {
        let dir = tempfile::tempdir()?;
        let file = report_file(REPORT)?;
        let mut cmd = command(&dir)?;

        cmd.arg(file.path()).args(["--config", "nope.toml"]);

        cmd.assert()
            .failure()
            .stdout(is_empty())
            .stderr(contains("Failed to read config file"));
        Ok(())
    }

    #[test]
    fn test_output__when_top_limited() -> TestResult {
        let dir = tempfile::tempdir()?;
        let file = report_file(REPORT)?;
        let mut cmd = command(&dir)?;

        cmd.arg(file.path()).args(["--top", "0"]);

        cmd.assert()
            .success()
            .stdout(contains("App.Services.Foo").not());
        Ok(())
    }

    #[test]
    fn test_output__when_report_latin1() -> TestResult {
        let dir = tempfile::tempdir()?;
        let mut content = Vec::new();
        content.extend_from_slice(b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\n");
        content.extend_from_slice(b"<coverage line-rate=\"1\" lines-covered=\"1\" lines-valid=\"1\">");
        content.extend_from_slice(b"<class name=\"Caf\xE9\" filename=\"Models/Caf\xE9.cs\" line-rate=\"1\">");
        content.extend_from_slice(b"<lines><line number=\"1\" hits=\"3\"/></lines></class></coverage>");
        let file = report_file(content)?;
        let mut cmd = command(&dir)?;

        cmd.arg(file.path());

        cmd.assert()
            .success()
            .stdout(contains("  100.00% |    1/1    | Caf\u{e9}"));
        Ok(())
    }

    #[test]
    fn test_output__when_report_undecodable() -> TestResult {
        let dir = tempfile::tempdir()?;
        let file = report_file(
            &b"<coverage line-rate=\"0\" lines-covered=\"0\" lines-valid=\"0\"><class name=\"Caf\xE9\"/></coverage>"[..],
        )?;
        let mut cmd = command(&dir)?;

        cmd.arg(file.path());

        cmd.assert()
            .failure()
            .stdout(is_empty())
            .stderr(contains("Malformed coverage report"));
        Ok(())
    }
}
