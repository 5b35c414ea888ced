//! Integration tests for cairn

mod cli_tests {
    use assert_cmd::Command;
    use predicates::prelude::*;
    use tempfile::TempDir;

    fn cairn() -> Command {
        let mut cmd = Command::cargo_bin("cairn").unwrap();
        cmd.env_remove("CAIRN_CONFIG");
        cmd
    }

    #[test]
    fn help_displays() {
        cairn()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Versioned artifact fetcher"));
    }

    #[test]
    fn version_displays() {
        cairn()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("cairn"));
    }

    #[test]
    fn fetch_help() {
        cairn()
            .args(["fetch", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Fetch an artifact into the cache"));
    }

    #[test]
    fn completions_generate() {
        cairn()
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("cairn"));
    }

    #[test]
    fn fetch_rejects_malformed_url() {
        let dir = TempDir::new().unwrap();
        cairn()
            .args(["fetch", "not a url"])
            .args(["--cache-dir"])
            .arg(dir.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid artifact URL"));
    }

    #[test]
    fn config_path_honors_override() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("cairn-test.toml");

        cairn()
            .arg("-c")
            .arg(&config)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("cairn-test.toml"));
    }

    #[test]
    fn config_show_defaults() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config.toml");

        cairn()
            .arg("-c")
            .arg(&config)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[cache]"))
            .stdout(predicate::str::contains("timeout_secs = 300"));
    }

    #[test]
    fn config_init_then_set_roundtrip() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config.toml");

        cairn()
            .arg("-c")
            .arg(&config)
            .args(["config", "init"])
            .assert()
            .success();
        assert!(config.is_file());

        cairn()
            .arg("-c")
            .arg(&config)
            .args(["config", "set", "download.timeout_secs", "120"])
            .assert()
            .success();

        cairn()
            .arg("-c")
            .arg(&config)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("timeout_secs = 120"));
    }

    #[test]
    fn config_set_unknown_key_fails() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config.toml");

        cairn()
            .arg("-c")
            .arg(&config)
            .args(["config", "set", "cache.rocket_boosters", "on"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown configuration key"))
            .stderr(predicate::str::contains("Valid keys"));
    }

    #[test]
    fn cache_list_empty_cache() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config.toml");

        cairn()
            .arg("-c")
            .arg(&config)
            .args(["cache", "list", "--cache-dir"])
            .arg(dir.path().join("never-created"))
            .assert()
            .success()
            .stdout(predicate::str::contains("is empty"));
    }

    #[test]
    fn cache_path_maps_url_segments() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config.toml");
        let expected = dir.path().join("sandbox/24.0.12345.0/us");

        cairn()
            .arg("-c")
            .arg(&config)
            .args(["cache", "path", "https://host.example/sandbox/24.0.12345.0/us"])
            .arg("--cache-dir")
            .arg(dir.path())
            .assert()
            .success()
            .stdout(format!("{}\n", expected.display()));
    }
}

mod fetch_tests {
    use assert_cmd::Command;
    use predicates::prelude::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn cairn() -> Command {
        let mut cmd = Command::cargo_bin("cairn").unwrap();
        cmd.env_remove("CAIRN_CONFIG");
        cmd
    }

    fn fixture_zip(files: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default();
        for (name, content) in files {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn fetch_end_to_end_plain_output() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/ver1/app")
            .with_status(200)
            .with_body(fixture_zip(&[("manifest.json", r#"{"version": "1.0"}"#)]))
            .expect(1)
            .create();

        let cache = TempDir::new().unwrap();
        let entry = cache.path().join("ver1/app");

        cairn()
            .args(["fetch", &format!("{}/ver1/app", server.url())])
            .args(["--cache-dir"])
            .arg(cache.path())
            .args(["--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::contains(entry.to_str().unwrap()));

        assert!(entry.join("manifest.json").is_file());
        assert!(entry.join("lastused").is_file());
        mock.assert();
    }

    #[test]
    fn fetch_with_platform_prints_both_paths() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/ver1/app")
            .with_status(200)
            .with_body(fixture_zip(&[("manifest.json", r#"{"version": "1.0"}"#)]))
            .create();
        server
            .mock("GET", "/ver1/platform")
            .with_status(200)
            .with_body(fixture_zip(&[
                ("manifest.json", "{}"),
                ("Prerequisite Components/DotNetCore/keep.txt", "shipped"),
            ]))
            .create();

        let cache = TempDir::new().unwrap();

        cairn()
            .args(["fetch", &format!("{}/ver1/app", server.url())])
            .args(["--platform", "--format", "plain"])
            .args(["--cache-dir"])
            .arg(cache.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("ver1/app"))
            .stdout(predicate::str::contains("ver1/platform"));

        assert!(cache.path().join("ver1/platform/manifest.json").is_file());
    }

    #[test]
    fn fetch_json_output() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/ver1/app")
            .with_status(200)
            .with_body(fixture_zip(&[("manifest.json", "{}")]))
            .create();

        let cache = TempDir::new().unwrap();

        cairn()
            .args(["fetch", &format!("{}/ver1/app", server.url())])
            .args(["--format", "json"])
            .args(["--cache-dir"])
            .arg(cache.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("\"application\""))
            .stdout(predicate::str::contains("\"platform\": null"));
    }

    #[test]
    fn fetch_download_failure_reports_url() {
        let mut server = mockito::Server::new();
        server.mock("GET", "/ver1/app").with_status(404).create();

        let cache = TempDir::new().unwrap();

        cairn()
            .args(["fetch", &format!("{}/ver1/app", server.url())])
            .args(["--cache-dir"])
            .arg(cache.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("Download failed"));
    }

    #[test]
    fn cache_list_shows_fetched_entry() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/ver1/app")
            .with_status(200)
            .with_body(fixture_zip(&[("manifest.json", "{}")]))
            .create();

        let dir = TempDir::new().unwrap();
        let cache = dir.path().join("artifacts");
        let config = dir.path().join("config.toml");
        std::fs::write(
            &config,
            format!("[cache]\nbase_path = \"{}\"\n", cache.display()),
        )
        .unwrap();

        cairn()
            .arg("-c")
            .arg(&config)
            .args(["fetch", &format!("{}/ver1/app", server.url())])
            .assert()
            .success();

        cairn()
            .arg("-c")
            .arg(&config)
            .args(["cache", "list", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::contains("ver1/app"));
    }
}
