//! Command-line surface of the `tex2svg` binary.

use std::{ffi::OsString, path::PathBuf};

use clap::Parser;

use crate::engine::EngineConfig;

#[derive(Debug, Parser)]
#[command(
    name = "tex2svg",
    version,
    about = "Render a TeX formula to SVG with MathJax.",
    args_override_self = true
)]
pub struct Cli {
    /// TeX source of the formula
    #[arg(long, allow_hyphen_values = true)]
    pub tex: Option<String>,

    /// Typeset as a displayed equation
    #[arg(long, overrides_with = "no_display")]
    pub display: bool,

    /// Typeset inline (default)
    #[arg(long, overrides_with = "display")]
    pub no_display: bool,

    /// MathJax bundle to load (defaults to $TEX2SVG_MATHJAX, then the embedded bundle)
    #[arg(long, value_name = "PATH")]
    pub mathjax: Option<PathBuf>,
}

impl Cli {
    /// Parse the process arguments, ignoring anything unrecognized.
    pub fn from_env() -> Self {
        Self::parse_from(known_args(std::env::args_os()))
    }

    /// The TeX source, treating `--tex ""` like a missing flag.
    pub fn tex(&self) -> Option<&str> {
        self.tex.as_deref().filter(|tex| !tex.is_empty())
    }

    pub fn engine_config(&self) -> EngineConfig {
        match &self.mathjax {
            Some(bundle) => EngineConfig::new(bundle.clone()),
            None => EngineConfig::default(),
        }
    }
}

/// Keep only the tokens the command line understands.
///
/// `--tex` and `--mathjax` take the next token as their value whatever it
/// looks like, and are dropped when no token follows. Anything else that is
/// not a known flag is dropped, so stray words and unknown options are
/// ignored instead of rejected. The first token (the program name) is kept.
pub fn known_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args = args.into_iter().map(Into::into);
    let mut kept: Vec<OsString> = args.next().into_iter().collect();
    while let Some(arg) = args.next() {
        match arg.to_str() {
            Some("--tex" | "--mathjax") => {
                if let Some(value) = args.next() {
                    kept.push(arg);
                    kept.push(value);
                }
            }
            Some("--display" | "--no-display" | "--help" | "-h" | "--version" | "-V") => {
                kept.push(arg)
            }
            _ => {}
        }
    }
    kept
}
