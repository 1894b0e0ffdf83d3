#![forbid(unsafe_code)]

//! Command-line argument parsing for the demo.
//!
//! Parses args manually. Configuration starts from `SPECTRUM_*` environment
//! overrides; explicit flags win over them.

use std::env;
use std::process;

use spectrum::{GlyphSet, SpectrumConfig};

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
Spectrum Demo: UI state reports for a simulated application

USAGE:
    spectrum-demo [OPTIONS]

OPTIONS:
    --glyphs=SET         Glyph set: 'unicode' (default) or 'ascii'
    --locations          Append on-screen locations to views
    --packages           Prefix class links with their package
    --no-ids             Omit view identifier names
    --no-hierarchy       Report activities and fragments only
    --no-throttle        Report on every change
    --throttle-ms=N      Throttle window in milliseconds (default: 500)
    --max-bytes=N        Maximum bytes per printed message (default: 4000)
    --help, -h           Show this help message
    --version, -V        Show version

ENVIRONMENT VARIABLES:
    SPECTRUM_*           Any engine setting, see the runtime docs
    RUST_LOG             Internal diagnostics filter (default: warn)";

/// Parsed command-line options.
#[derive(Debug, Clone)]
pub struct Opts {
    pub config: SpectrumConfig,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            config: SpectrumConfig::default().with_enabled(true),
        }
    }
}

impl Opts {
    /// Parse the process arguments on top of environment overrides.
    pub fn parse() -> Self {
        let parsed = SpectrumConfig::from_env();
        for error in &parsed.errors {
            eprintln!("Ignoring {error}");
        }
        let base = Self {
            config: parsed.config.with_enabled(true),
        };
        let args: Vec<String> = env::args().skip(1).collect();
        match base.apply(&args) {
            Ok(Parsed::Run(opts)) => opts,
            Ok(Parsed::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Parsed::Version) => {
                println!("spectrum-demo {VERSION}");
                process::exit(0);
            }
            Err(message) => {
                eprintln!("{message}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    /// Apply command-line flags.
    pub fn apply(mut self, args: &[String]) -> Result<Parsed, String> {
        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => return Ok(Parsed::Help),
                "--version" | "-V" => return Ok(Parsed::Version),
                "--locations" => self.config.append_element_location = true,
                "--packages" => self.config.append_package_names = true,
                "--no-ids" => self.config.append_element_id = false,
                "--no-hierarchy" => self.config.show_hierarchy = false,
                "--no-throttle" => self.config.throttle = false,
                other => {
                    if let Some(val) = other.strip_prefix("--glyphs=") {
                        self.config.glyphs = GlyphSet::parse(val)
                            .ok_or_else(|| format!("Invalid --glyphs value: {val}"))?;
                    } else if let Some(val) = other.strip_prefix("--throttle-ms=") {
                        let ms: u64 = val
                            .parse()
                            .map_err(|_| format!("Invalid --throttle-ms value: {val}"))?;
                        self.config.throttle_window = std::time::Duration::from_millis(ms);
                    } else if let Some(val) = other.strip_prefix("--max-bytes=") {
                        match val.parse::<usize>() {
                            Ok(n) if n > 0 => self.config.max_message_bytes = n,
                            _ => return Err(format!("Invalid --max-bytes value: {val}")),
                        }
                    } else {
                        return Err(format!("Unknown argument: {other}"));
                    }
                }
            }
        }
        Ok(Parsed::Run(self))
    }
}

/// Outcome of flag parsing.
#[derive(Debug)]
pub enum Parsed {
    Run(Opts),
    Help,
    Version,
}
