//! jobstamp: cache the output of a command between invocations.
//!
//! Everything after `--` is the command to run. If the command was run
//! before with the same arguments, its output files all exist, and none of
//! its dependencies changed, the captured stdout, stderr and exit code are
//! replayed instead of running it again.

#![warn(missing_docs)]

mod command;
mod error;
mod shebang;
mod stamp;

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Cache results from jobs.
#[derive(Parser, Debug)]
#[command(name = "jobstamp", version, about = "Cache results from jobs")]
pub struct Cli {
    /// Paths which, if more recent than the last time this job was invoked,
    /// cause the job to be re-invoked.
    #[arg(long, value_name = "PATH", num_args = 0..)]
    pub dependencies: Vec<PathBuf>,

    /// Expected output paths of this command, which cause the job to be
    /// re-invoked if they do not exist.
    #[arg(long, value_name = "PATH", num_args = 0..)]
    pub output_files: Vec<PathBuf>,

    /// Directory to store cached results from this command.
    #[arg(long, value_name = "DIRECTORY")]
    pub stamp_directory: Option<PathBuf>,

    /// Compare content hashes instead of modification times. Slower, but
    /// withstands files being copied or moved.
    #[arg(long)]
    pub use_hashes: bool,

    /// Path to a `jobstamp.toml` configuration file.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// The command to run, given after `--`.
    #[arg(last = true, required = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            process::exit(1);
        }
        Err(e) => e.exit(),
    };

    match stamp::run(&cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Installs the stderr trace subscriber.
///
/// `RUST_LOG` takes precedence; otherwise stamp decisions are shown only
/// when the debug switch is on.
pub fn init_tracing(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if debug { "info" } else { "warn" }));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_command_only() {
        let cli = Cli::parse_from(["jobstamp", "--", "make", "all"]);
        assert_eq!(cli.command, vec!["make", "all"]);
        assert!(cli.dependencies.is_empty());
        assert!(cli.output_files.is_empty());
        assert!(cli.stamp_directory.is_none());
        assert!(!cli.use_hashes);
        assert!(cli.config.is_none());
    }

    #[test]
    fn parse_all_flags() {
        let cli = Cli::parse_from([
            "jobstamp",
            "--dependencies",
            "src/a.c",
            "src/b.c",
            "--output-files",
            "build/a.o",
            "--stamp-directory",
            "/tmp/stamps",
            "--use-hashes",
            "--config",
            "jobstamp.toml",
            "--",
            "cc",
            "-c",
            "src/a.c",
        ]);
        assert_eq!(
            cli.dependencies,
            vec![PathBuf::from("src/a.c"), PathBuf::from("src/b.c")]
        );
        assert_eq!(cli.output_files, vec![PathBuf::from("build/a.o")]);
        assert_eq!(cli.stamp_directory, Some(PathBuf::from("/tmp/stamps")));
        assert!(cli.use_hashes);
        assert_eq!(cli.config, Some(PathBuf::from("jobstamp.toml")));
        assert_eq!(cli.command, vec!["cc", "-c", "src/a.c"]);
    }

    #[test]
    fn command_flags_are_not_parsed() {
        let cli = Cli::parse_from(["jobstamp", "--", "ls", "--use-hashes"]);
        assert!(!cli.use_hashes);
        assert_eq!(cli.command, vec!["ls", "--use-hashes"]);
    }

    #[test]
    fn missing_double_dash_is_rejected() {
        let err = Cli::try_parse_from(["jobstamp", "--use-hashes"]).unwrap_err();
        assert!(err.use_stderr());
    }

    #[test]
    fn empty_command_is_rejected() {
        assert!(Cli::try_parse_from(["jobstamp", "--"]).is_err());
    }
}
