// Integration test for the settings-driven logging bootstrap.
// Note: this runs as a single test because it owns global state (the
// process working directory and the global tracing dispatcher).

use std::fs;

use groundwork::{
    get_logger, init_logging, load_settings, setup_logger, LogConfig, SettingsError,
};
use tempfile::TempDir;

#[test]
fn test_bootstrap_comprehensive() {
    let workdir = TempDir::new().unwrap();
    let rotate_dir = TempDir::new().unwrap();
    std::env::set_current_dir(workdir.path()).unwrap();

    temp_env::with_vars(
        [
            ("ENV", None::<&str>),
            ("GW_GREETING", Some("hello from the environment")),
        ],
        || {
            // Missing config/dev.yaml: the failure propagates out of
            // setup_logger and nothing is installed.
            let err = setup_logger().unwrap_err();
            assert!(matches!(
                err.downcast_ref::<SettingsError>(),
                Some(SettingsError::NotFound { .. })
            ));

            // Write a settings file: plain (non-rotating) file output plus
            // a ${VAR} substitution outside the logging section.
            fs::create_dir_all("config").unwrap();
            fs::write(
                "config/dev.yaml",
                "greeting: ${GW_GREETING}\n\
                 missing: ${GW_NOT_SET}\n\
                 logging:\n\
                 \x20 level: info\n\
                 \x20 to_file: true\n\
                 \x20 log_dir: logs\n\
                 \x20 rotate:\n\
                 \x20   enabled: false\n",
            )
            .unwrap();

            // Substitution happens on load; unset tokens stay verbatim.
            let settings = load_settings().unwrap();
            assert_eq!(
                settings["greeting"].as_str(),
                Some("hello from the environment")
            );
            assert_eq!(settings["missing"].as_str(), Some("${GW_NOT_SET}"));

            // First bootstrap installs the global dispatcher.
            let _handle = setup_logger().unwrap();

            let log = get_logger("worker");
            log.info("first message");

            // ENV defaults to dev, so the plain file is logs/dev.log.
            let log_path = workdir.path().join("logs/dev.log");
            assert!(log_path.exists(), "plain log file should be created");

            let contents = fs::read_to_string(&log_path).unwrap();
            let line = contents
                .lines()
                .find(|l| l.contains("first message"))
                .expect("emitted line should reach the file");

            // Default template: [%(asctime)s] %(levelname)s %(name)s : %(message)s
            assert!(line.starts_with('['), "line should start with a timestamp");
            assert!(line.contains("] INFO worker : first message"));

            // A second bootstrap must not accumulate handlers: one emit
            // still appends exactly one line.
            fs::write(
                "config/dev.yaml",
                "logging:\n\
                 \x20 level: bogus\n\
                 \x20 to_file: true\n\
                 \x20 log_dir: logs\n\
                 \x20 rotate:\n\
                 \x20   enabled: false\n",
            )
            .unwrap();

            // Unknown level name falls back to INFO instead of failing.
            let _second = setup_logger().unwrap();

            let before = fs::read_to_string(&log_path).unwrap().lines().count();
            log.info("second message");
            let after = fs::read_to_string(&log_path).unwrap().lines().count();
            assert_eq!(after, before + 1, "handlers must not accumulate");

            // Rotating bootstrap: builds a dated file under the directory.
            let rotating = LogConfig {
                to_file: true,
                log_dir: rotate_dir.path().to_path_buf(),
                ..LogConfig::default()
            };
            let handle = init_logging(&rotating).unwrap();

            tracing::dispatcher::with_default(&handle.dispatch(), || {
                get_logger("rotating").info("rotated message");
            });

            let rotated: Vec<_> = fs::read_dir(rotate_dir.path())
                .unwrap()
                .filter_map(Result::ok)
                .map(|e| e.file_name().to_string_lossy().to_string())
                .filter(|name| name.starts_with("dev.") && name.ends_with(".log"))
                .collect();
            assert!(
                !rotated.is_empty(),
                "rotating appender should create a dated dev.*.log file"
            );

            let rotated_contents =
                fs::read_to_string(rotate_dir.path().join(&rotated[0])).unwrap();
            assert!(rotated_contents.contains("INFO rotating : rotated message"));

            // Console-only bootstrap: the configured log_dir must be left
            // alone, while the console handler still accepts events at the
            // resolved severity.
            let console_only = LogConfig {
                to_file: false,
                log_dir: rotate_dir.path().join("should-not-exist"),
                ..LogConfig::default()
            };
            let handle = init_logging(&console_only).unwrap();

            tracing::dispatcher::with_default(&handle.dispatch(), || {
                assert!(
                    tracing::event_enabled!(tracing::Level::INFO),
                    "console handler should gate at INFO"
                );
                get_logger("console").info("console only");
            });

            assert!(
                !console_only.log_dir.exists(),
                "console-only bootstrap must not create the log directory"
            );
        },
    );
}
