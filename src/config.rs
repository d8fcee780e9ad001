//! CLI arguments and server configuration defaults.

use clap::Parser;
use shadow_rs::formatcp;

use crate::build;

const VERSION_INFO: &str = formatcp!(
    r#"{}\ncommit_hash: {}\nbuild_time: {}\nbuild_env: {},{}"#,
    build::PKG_VERSION,
    build::SHORT_COMMIT,
    build::BUILD_TIME,
    build::RUST_VERSION,
    build::RUST_CHANNEL
);

pub const DEFAULT_STORAGE_DIR: &str = "./uploads";
pub const DEFAULT_STATIC_DIR: &str = "./static";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_UPLOAD_MAX_SIZE: usize = 100 * 1024 * 1024;

/// CLI arguments and environment configuration for the server.
#[derive(Parser, Debug)]
#[command(name = "file-drop", version = VERSION_INFO, about = "Minimal file sharing server")]
pub struct Args {
    #[arg(
        short = 's',
        long,
        env = "UPLOAD_DIR",
        default_value = DEFAULT_STORAGE_DIR,
        help = "Directory uploaded files are stored in"
    )]
    pub storage_dir: String,
    #[arg(
        long,
        env = "STATIC_DIR",
        default_value = DEFAULT_STATIC_DIR,
        help = "Directory with the upload form and stylesheet"
    )]
    pub static_dir: String,
    #[arg(
        short = 'b',
        long,
        env = "BIND",
        default_value = "0.0.0.0",
        help = "Bind address"
    )]
    pub host: String,
    #[arg(
        short = 'p',
        long,
        env = "PORT",
        default_value_t = DEFAULT_PORT,
        help = "HTTP port"
    )]
    pub port: u16,
    #[arg(
        long,
        env = "UPLOAD_MAX_SIZE",
        default_value_t = DEFAULT_UPLOAD_MAX_SIZE,
        help = "Max multipart upload body size in bytes"
    )]
    pub upload_max_size: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_upload_limit_is_100_mib() {
        assert_eq!(DEFAULT_UPLOAD_MAX_SIZE, 104_857_600);
    }

    #[test]
    fn flags_override_defaults() {
        let args = Args::try_parse_from([
            "file-drop",
            "-s",
            "/srv/drop",
            "-p",
            "9000",
            "--upload-max-size",
            "1024",
        ])
        .expect("parse flags");
        assert_eq!(args.storage_dir, "/srv/drop");
        assert_eq!(args.port, 9000);
        assert_eq!(args.upload_max_size, 1024);
    }
}
