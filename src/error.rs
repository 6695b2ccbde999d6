use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can go wrong between a TeX string and its SVG.
#[derive(Debug, Error)]
pub enum Error {
    /// The request carried no TeX source. The engine is never started for it.
    #[error("texString must be a non-empty string")]
    EmptyTex,

    /// No bundle was given and none was embedded at build time.
    #[error("no MathJax bundle: build js/ (npm run build) or pass --mathjax / set $TEX2SVG_MATHJAX")]
    NoBundle,

    #[error("failed to read MathJax bundle {}", .path.display())]
    Bundle {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The bundle was read but could not be compiled or evaluated.
    #[error("failed to initialize MathJax: {0}")]
    Init(String),

    /// MathJax threw while converting.
    #[error("{0}")]
    Engine(String),

    /// MathJax converted the formula but marked a node with `data-mjx-error`.
    #[error("{0}")]
    Render(String),

    #[error("malformed MathJax output: {0}")]
    Output(#[from] quick_xml::Error),
}
