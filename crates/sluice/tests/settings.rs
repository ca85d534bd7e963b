use std::io::Write;

use clap::Parser;
use sluice::config::CompressionSetting;
use sluice::{Args, Settings};

fn args(extra: &[&str]) -> Args {
    let mut argv = vec!["sluice"];
    argv.extend_from_slice(extra);
    Args::try_parse_from(argv).unwrap()
}

const REQUIRED: [&str; 4] = ["--password=1234", "--database=shop", "--query=SELECT * FROM users", "--parquet=users"];

#[test]
fn test_cli_only_uses_defaults() {
    let settings = Settings::load(&args(&REQUIRED)).unwrap();

    assert_eq!(settings.host, "127.0.0.1");
    assert_eq!(settings.port, 3306);
    assert_eq!(settings.user, "root");
    assert_eq!(settings.query, "SELECT * FROM users");
    assert_eq!(settings.batch_size, 1024);
    assert_eq!(settings.row_group_size, 65536);
    assert_eq!(settings.compression, CompressionSetting::Snappy);
    assert_eq!(settings.output_path().to_str(), Some("users.parquet"));
    assert_eq!(settings.output_name(), "users");
}

#[test]
fn test_missing_required_value_is_an_error() {
    let result = Settings::load(&args(&["--password=1234", "--database=shop", "--parquet=users"]));
    assert!(result.is_err());
}

#[test]
fn test_empty_password_is_rejected() {
    let result = Settings::load(&args(&["--password=", "--database=shop", "--query=SELECT 1", "--parquet=out"]));
    assert!(result.is_err());
}

#[test]
fn test_file_then_cli_precedence() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sluice.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(
        file,
        r#"
host = "db.internal"
port = 3307
password = "from-file"
database = "shop"
query = "SELECT id FROM orders"
parquet = "exports/orders"
compression = "zstd"
batch_size = 10
"#
    )
    .unwrap();

    let config = format!("--config={}", path.display());
    let settings = Settings::load(&args(&[&config, "--port=3310", "--password=from-cli"])).unwrap();

    assert_eq!(settings.host, "db.internal");
    assert_eq!(settings.port, 3310);
    assert_eq!(settings.password, "from-cli");
    assert_eq!(settings.compression, CompressionSetting::Zstd);
    assert_eq!(settings.batch_size, 10);
    assert_eq!(settings.output_path().to_str(), Some("exports/orders.parquet"));
    assert_eq!(settings.output_name(), "orders");
}

#[test]
fn test_unknown_compression_is_rejected() {
    let mut argv = REQUIRED.to_vec();
    argv.push("--compression=lzma");
    assert!(Settings::load(&args(&argv)).is_err());
}

#[test]
fn test_mysql_config_from_settings() {
    let settings = Settings::load(&args(&[&REQUIRED[..], &["--user=reporter", "--host=10.0.0.5"]].concat())).unwrap();
    let mysql = settings.mysql_config();

    assert_eq!(mysql.user, "reporter");
    assert_eq!(mysql.host, "10.0.0.5");
    assert_eq!(mysql.database, "shop");
}
