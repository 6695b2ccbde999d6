//! The typesetting engine seam.
//!
//! The crate never lays out math itself. An [`Engine`] receives TeX and
//! hands back MathJax's serialized output tree; everything after that is
//! done by [`crate::svg`] and [`crate::Converter`].

mod mathjax;

use std::{env, path::PathBuf};

pub use mathjax::MathJax;

use crate::Result;

/// Environment variable naming a bundle to load instead of the embedded one.
pub const BUNDLE_ENV: &str = "TEX2SVG_MATHJAX";

/// The bundle built from `js/` at compile time, if the build could produce one.
#[cfg(embedded_mathjax)]
pub const EMBEDDED_BUNDLE: Option<&str> = Some(include_str!(concat!(env!("OUT_DIR"), "/mathjax.js")));
#[cfg(not(embedded_mathjax))]
pub const EMBEDDED_BUNDLE: Option<&str> = None;

/// Something that turns TeX into a serialized MathJax output tree.
pub trait Engine {
    /// Typeset `tex` and return the serialized output tree, container element included.
    fn typeset(&mut self, tex: &str, display: bool) -> Result<String>;
}

impl<E: Engine + ?Sized> Engine for Box<E> {
    fn typeset(&mut self, tex: &str, display: bool) -> Result<String> {
        (**self).typeset(tex, display)
    }
}

/// Startup options for [`MathJax`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// ES module bundle whose default export converts TeX. `None` uses
    /// [`EMBEDDED_BUNDLE`].
    pub bundle: Option<PathBuf>,
}

impl EngineConfig {
    /// Load the bundle at `bundle` instead of the embedded one.
    pub fn new(bundle: impl Into<PathBuf>) -> Self {
        Self {
            bundle: Some(bundle.into()),
        }
    }

    pub fn embedded() -> Self {
        Self { bundle: None }
    }
}

impl Default for EngineConfig {
    /// `$TEX2SVG_MATHJAX` if set, otherwise the embedded bundle.
    fn default() -> Self {
        let bundle = env::var_os(BUNDLE_ENV)
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);
        Self { bundle }
    }
}
