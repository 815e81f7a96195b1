//! Tests for the app-token-cli library module.

use super::*;
use app_token_core::KeyLoadError;
use std::io::Write as _;

// Test key generated for this crate only - DO NOT USE IN PRODUCTION
const PKCS1_KEY_PEM: &str = include_str!("../../../testdata/keys/app-pkcs1.pem");

fn cli_with(key_path: Option<&Path>, app_id: Option<&str>) -> Cli {
    Cli {
        key_path: key_path.map(Path::to_path_buf),
        app_id: app_id.map(str::to_string),
        config: None,
        clock_skew_seconds: None,
        lifetime_seconds: None,
        format: OutputFormat::Text,
        log_level: "warn".to_string(),
        json_logs: false,
    }
}

fn write_temp(contents: &str, suffix: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

mod parsing_tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "app-token",
            "--key-path",
            "/keys/app.pem",
            "--app-id",
            "12345",
            "--format",
            "json",
            "--lifetime-seconds",
            "300",
        ])
        .unwrap();

        assert_eq!(cli.key_path, Some(PathBuf::from("/keys/app.pem")));
        assert_eq!(cli.app_id.as_deref(), Some("12345"));
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.lifetime_seconds, Some(300));
        assert_eq!(cli.clock_skew_seconds, None);
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["app-token", "-k", "/k.pem", "-a", "1"]).unwrap();

        assert_eq!(cli.format, OutputFormat::Text);
        assert_eq!(cli.log_level, "warn");
        assert!(!cli.json_logs);
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        let result = Cli::try_parse_from(["app-token", "--format", "yaml"]);
        assert!(result.is_err());
    }
}

mod settings_tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::default();

        assert_eq!(settings.timing.clock_skew_seconds, 60);
        assert_eq!(settings.timing.lifetime_seconds, 600);
        assert_eq!(settings.token_timing().unwrap(), TokenTiming::default());
    }

    #[test]
    fn test_load_settings_without_sources_uses_defaults() {
        let settings = load_settings_with_env(None, Some(config::Map::new())).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_settings_from_toml_file() {
        let file = write_temp("[timing]\nlifetime_seconds = 300\n", ".toml");

        let settings = load_settings_with_env(Some(file.path()), Some(config::Map::new())).unwrap();

        assert_eq!(settings.timing.lifetime_seconds, 300);
        assert_eq!(settings.timing.clock_skew_seconds, 60);
    }

    #[test]
    fn test_load_settings_from_yaml_file() {
        let file = write_temp("timing:\n  clock_skew_seconds: 30\n", ".yaml");

        let settings = load_settings_with_env(Some(file.path()), Some(config::Map::new())).unwrap();

        assert_eq!(settings.timing.clock_skew_seconds, 30);
        assert_eq!(settings.timing.lifetime_seconds, 600);
    }

    #[test]
    fn test_environment_overrides_file() {
        let file = write_temp("[timing]\nlifetime_seconds = 300\n", ".toml");
        let mut env = config::Map::new();
        env.insert(
            "APP_TOKEN__TIMING__LIFETIME_SECONDS".to_string(),
            "120".to_string(),
        );

        let settings = load_settings_with_env(Some(file.path()), Some(env)).unwrap();

        assert_eq!(settings.timing.lifetime_seconds, 120);
    }

    #[test]
    fn test_missing_settings_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let result = load_settings_with_env(Some(path.as_path()), Some(config::Map::new()));

        let err = result.unwrap_err();
        assert!(matches!(err, CliError::Settings(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_cli_flags_override_settings() {
        let mut cli = cli_with(None, None);
        cli.clock_skew_seconds = Some(5);
        cli.lifetime_seconds = Some(90);

        let settings = Settings::default().with_overrides(&cli);

        assert_eq!(settings.timing.clock_skew_seconds, 5);
        assert_eq!(settings.timing.lifetime_seconds, 90);
    }

    #[test]
    fn test_lifetime_over_cap_is_rejected() {
        let settings = Settings {
            timing: TimingSettings {
                clock_skew_seconds: 60,
                lifetime_seconds: 900,
            },
        };

        assert!(settings.token_timing().is_err());
    }
}

mod run_tests {
    use super::*;

    #[test]
    fn test_run_prints_bare_token() {
        let key = write_temp(PKCS1_KEY_PEM, ".pem");
        let cli = cli_with(Some(key.path()), Some("12345"));

        let output = run(&cli).unwrap();

        assert_eq!(output.split('.').count(), 3);
        assert!(!output.contains('\n'));
    }

    #[test]
    fn test_run_json_output() {
        let key = write_temp(PKCS1_KEY_PEM, ".pem");
        let mut cli = cli_with(Some(key.path()), Some("12345"));
        cli.format = OutputFormat::Json;

        let output = run(&cli).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["issuer"], "12345");
        assert_eq!(value["token"].as_str().unwrap().split('.').count(), 3);
        assert!(value["issued_at"].is_string());
        assert!(value["expires_at"].is_string());
    }

    #[test]
    fn test_run_missing_app_id() {
        let key = write_temp(PKCS1_KEY_PEM, ".pem");
        let cli = cli_with(Some(key.path()), None);

        let err = run(&cli).unwrap_err();

        assert!(matches!(
            err,
            CliError::Issue(IssueError::Configuration(ConfigurationError::MissingRequired { .. }))
        ));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_run_empty_app_id_checked_before_key() {
        let cli = cli_with(Some(Path::new("/no/such/key.pem")), Some(""));

        let err = run(&cli).unwrap_err();

        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_run_missing_key_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.pem");
        let cli = cli_with(Some(path.as_path()), Some("12345"));

        let err = run(&cli).unwrap_err();

        assert!(matches!(
            err,
            CliError::Issue(IssueError::KeyLoad(KeyLoadError::Unreadable { .. }))
        ));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_run_rejects_out_of_range_lifetime() {
        let key = write_temp(PKCS1_KEY_PEM, ".pem");
        let mut cli = cli_with(Some(key.path()), Some("12345"));
        cli.lifetime_seconds = Some(601);

        let err = run(&cli).unwrap_err();

        assert_eq!(err.exit_code(), 2);
    }
}

#[test]
fn test_exit_codes_are_distinct_per_failure_kind() {
    let configuration = CliError::from(ConfigurationError::MissingRequired {
        name: "GITHUB_APP_ID".to_string(),
    });
    let key_load = CliError::from(IssueError::from(KeyLoadError::InvalidFormat {
        message: "bad".to_string(),
    }));
    let signing = CliError::from(IssueError::from(app_token_core::SigningError::new("boom")));
    let output = CliError::from(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"));

    assert_eq!(configuration.exit_code(), 2);
    assert_eq!(key_load.exit_code(), 3);
    assert_eq!(signing.exit_code(), 4);
    assert_eq!(output.exit_code(), 5);
}
