//! # uvcbuild
//!
//! Command-line driver that builds the UVC sample driver for Android.
//!
//! ## Overview
//!
//! For every requested ABI, `uvcbuild`:
//!
//! - **Generates** a Ninja build tree in `<output>/android/<abi>` with
//!   `cmake -G Ninja` and the ABI's toolchain file
//! - **Builds** and installs it with `cmake --build . --target install`
//!
//! The first failing step stops the run with exit status 1.
//!
//! ## Quick Start
//!
//! ```bash
//! # Build every ABI in Release mode into ./build
//! uvcbuild
//!
//! # Debug build for a single ABI
//! uvcbuild --arch arm64-v8a -bt Debug
//!
//! # Show the commands without running them
//! uvcbuild --dry-run --verbose
//! ```
//!
//! ## Options
//!
//! | Flag | Description | Default |
//! |------|-------------|---------|
//! | `-a`, `--arch` | Comma separated ABIs | `armeabi-v7a,arm64-v8a,x86` |
//! | `-i`, `--install` | Install directory | `build` |
//! | `-o`, `--output` | Generated build files | `build` |
//! | `-bt`, `--build-type` | `Release` or `Debug` | `Release` |
//! | `-vh`, `--vuforia-header-dir` | Driver header directory | `../../build/include` |
//! | `-ue`, `--uvc-external-dir` | libusb/libuvc/libjpeg-turbo build files | `UVCCamera/libuvccamera/src/main/jni` |
//! | `--toolchain-dir` | Toolchain file directory | `cmake` |
//! | `--source-dir` | CMake source root | current directory |
//! | `--config` | Config file | discovered `uvcbuild.toml` |
//! | `--dry-run` | Print commands only | off |
//! | `-v`, `--verbose` | Print resolved settings and commands | off |
//!
//! ## Configuration
//!
//! Settings can also come from `uvcbuild.toml`; see [`config`].

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::ffi::OsString;
use std::path::PathBuf;

use uvcbuild_sdk::builders::CMakeBuilder;
use uvcbuild_sdk::resolve::{
    DEFAULT_ARCHITECTURES, DEFAULT_EXTERNAL_DIR, DEFAULT_HEADER_DIR, DEFAULT_INSTALL_DIR,
    DEFAULT_OUTPUT_DIR, DEFAULT_TOOLCHAIN_DIR, join_architectures,
};
use uvcbuild_sdk::{BuildConfiguration, BuildOptions, BuildType, ConfigurationResolver};

pub mod config;

/// Builds the UVC sample driver for each Android ABI with CMake.
#[derive(Parser, Debug)]
#[command(name = "uvcbuild", author, version, about = "Multi-ABI CMake build driver for the UVC sample driver", long_about = None)]
pub struct Cli {
    #[arg(
        short = 'a',
        long,
        help = "Architectures. Comma separated list of: armeabi-v7a, arm64-v8a, x86 [default: armeabi-v7a,arm64-v8a,x86]"
    )]
    pub arch: Option<String>,

    #[arg(short = 'i', long, help = "Install directory [default: build]")]
    pub install: Option<PathBuf>,

    #[arg(short = 'o', long, help = "Location of generated build files [default: build]")]
    pub output: Option<PathBuf>,

    #[arg(long, value_enum, help = "Build type (also -bt) [default: Release]")]
    pub build_type: Option<BuildTypeArg>,

    #[arg(
        long,
        help = "Directory that contains Vuforia/Driver/Driver.h (also -vh) [default: ../../build/include]"
    )]
    pub vuforia_header_dir: Option<PathBuf>,

    #[arg(
        long,
        help = "Directory containing libusb, libuvc and libjpeg-turbo build files (also -ue). By default this expects the UVCCamera repository layout [default: UVCCamera/libuvccamera/src/main/jni]"
    )]
    pub uvc_external_dir: Option<PathBuf>,

    #[arg(long, help = "Directory with android.toolchain.<abi>.cmake files [default: cmake]")]
    pub toolchain_dir: Option<PathBuf>,

    #[arg(long, help = "CMake source root [default: current directory]")]
    pub source_dir: Option<PathBuf>,

    #[arg(long, help = "Path to a uvcbuild.toml config file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Print the commands that would run without running them")]
    pub dry_run: bool,

    #[arg(short = 'v', long, help = "Print resolved settings and full command lines")]
    pub verbose: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum BuildTypeArg {
    #[value(name = "Release")]
    Release,
    #[value(name = "Debug")]
    Debug,
}

impl From<BuildTypeArg> for BuildType {
    fn from(arg: BuildTypeArg) -> Self {
        match arg {
            BuildTypeArg::Release => BuildType::Release,
            BuildTypeArg::Debug => BuildType::Debug,
        }
    }
}

/// Multi-letter single-dash spellings accepted for compatibility with the
/// existing build instructions, and the long flags they stand for.
const LEGACY_FLAGS: [(&str, &str); 3] = [
    ("-bt", "--build-type"),
    ("-vh", "--vuforia-header-dir"),
    ("-ue", "--uvc-external-dir"),
];

/// Rewrites `-bt`, `-vh` and `-ue` (and their `-xx=value` forms) to the long
/// flags clap understands. Arguments after `--` are left untouched.
pub fn normalize_legacy_flags<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut passthrough = false;
    args.into_iter()
        .map(Into::into)
        .map(|arg: OsString| {
            if passthrough {
                return arg;
            }
            if arg == "--" {
                passthrough = true;
                return arg;
            }
            arg.to_str()
                .and_then(rewrite_legacy_flag)
                .map(OsString::from)
                .unwrap_or(arg)
        })
        .collect()
}

fn rewrite_legacy_flag(text: &str) -> Option<String> {
    LEGACY_FLAGS.iter().find_map(|(short, long)| {
        if text == *short {
            return Some(long.to_string());
        }
        text.strip_prefix(short)
            .and_then(|rest| rest.strip_prefix('='))
            .map(|value| format!("{}={}", long, value))
    })
}

/// Parses the process arguments, accepting the legacy short spellings.
pub fn parse_args() -> Cli {
    Cli::parse_from(normalize_legacy_flags(std::env::args_os()))
}

/// Initializes `env_logger`. `RUST_LOG` wins over the verbosity default.
pub fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .try_init();
}

/// Runs a full build as described by `cli`.
///
/// Any error, including an invalid architecture or a failed CMake step, is
/// returned to the caller, which exits with status 1.
pub fn run(cli: Cli) -> Result<()> {
    let config_resolver = load_config(cli.config.as_deref())?;
    if let Some(config_path) = &config_resolver.config_path {
        println!("Using config file: {:?}", config_path);
    }

    let options = build_options(&cli, &config_resolver)?;
    let resolver = ConfigurationResolver::from_env()?;
    let config = resolver.resolve(&options)?;

    if cli.verbose {
        print_configuration(&config);
    }
    if cli.dry_run {
        println!("  Mode: dry-run (no changes will be made)");
    }

    let report = CMakeBuilder::new(&config)
        .verbose(cli.verbose)
        .dry_run(cli.dry_run)
        .build()?;
    log::debug!(
        "completed {} step(s) for {}",
        report.steps.len(),
        join_architectures(&report.completed)
    );

    println!("Project generation and compilation succeeded.");
    Ok(())
}

fn load_config(explicit: Option<&std::path::Path>) -> Result<config::ConfigResolver> {
    match explicit {
        Some(path) => config::ConfigResolver::from_path(path)
            .with_context(|| format!("Failed to load config file {:?}", path)),
        None => Ok(config::ConfigResolver::new().unwrap_or_else(|e| {
            eprintln!("Warning: ignoring config file: {:#}", e);
            config::ConfigResolver::default()
        })),
    }
}

/// Merges CLI flags, config file values and defaults. CLI wins.
pub fn build_options(cli: &Cli, resolver: &config::ConfigResolver) -> Result<BuildOptions> {
    let build_type = match cli.build_type {
        Some(arg) => arg.into(),
        None => match resolver.build_type() {
            Some(raw) => raw.parse::<BuildType>()?,
            None => BuildType::default(),
        },
    };

    Ok(BuildOptions {
        architectures: resolver.resolve(
            cli.arch.clone(),
            |r| r.arch(),
            DEFAULT_ARCHITECTURES.to_string(),
        ),
        install_dir: resolver.resolve(
            cli.install.clone(),
            |r| r.install(),
            PathBuf::from(DEFAULT_INSTALL_DIR),
        ),
        output_dir: resolver.resolve(
            cli.output.clone(),
            |r| r.output(),
            PathBuf::from(DEFAULT_OUTPUT_DIR),
        ),
        build_type,
        header_dir: resolver.resolve(
            cli.vuforia_header_dir.clone(),
            |r| r.vuforia_header_dir(),
            PathBuf::from(DEFAULT_HEADER_DIR),
        ),
        external_dir: resolver.resolve(
            cli.uvc_external_dir.clone(),
            |r| r.uvc_external_dir(),
            PathBuf::from(DEFAULT_EXTERNAL_DIR),
        ),
        toolchain_dir: resolver.resolve(
            cli.toolchain_dir.clone(),
            |r| r.toolchain_dir(),
            PathBuf::from(DEFAULT_TOOLCHAIN_DIR),
        ),
        source_dir: cli.source_dir.clone().or_else(|| resolver.source_dir()),
    })
}

fn print_configuration(config: &BuildConfiguration) {
    println!("Build configuration:");
    println!("  Architectures: {}", join_architectures(&config.architectures));
    println!("  Build type: {}", config.build_type);
    println!("  Install: {}", config.install_dir.display());
    println!("  Output: {}", config.output_dir.display());
    println!("  Header dir: {}", config.header_dir.display());
    println!("  External dir: {}", config.external_dir.display());
    println!("  Toolchain dir: {}", config.toolchain_dir.display());
    println!("  Source dir: {}", config.source_dir.display());
}
