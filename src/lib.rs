//! Render TeX math to SVG with MathJax embedded in V8.
//!
//! MathJax does all of the typesetting. This crate starts it, hands it the
//! formula, checks the result for MathJax's error annotation and returns the
//! `<svg>` element.
//!
//! ```no_run
//! let mut converter = tex2svg::Converter::new();
//! let output = converter.convert(r"\int_{-\infty}^\infty e^{-x^2}\,\mathrm dx", true)?;
//! println!("{}", output.svg);
//! # Ok::<(), tex2svg::Error>(())
//! ```
//!
//! The MathJax bundle is built from `js/` by the build script and embedded
//! in the crate; see [`EngineConfig`] for loading a different one.

use std::cell::RefCell;

pub mod cli;
mod converter;
pub mod engine;
mod error;
pub mod svg;

pub use converter::{ConversionRequest, ConversionResult, Converter, SvgOutput};
pub use engine::{Engine, EngineConfig, MathJax};
pub use error::{Error, Result};

thread_local! {
    static CONVERTER: RefCell<Converter> = RefCell::new(Converter::new());
}

/// Render `tex` with this thread's shared converter.
///
/// MathJax is started on the first valid call made from a thread and kept
/// for the rest of that thread's life. Use a [`Converter`] directly to
/// control when the engine is created and dropped.
pub fn convert_tex_to_svg<'a>(tex: impl Into<Option<&'a str>>, display: bool) -> ConversionResult {
    CONVERTER.with(|converter| converter.borrow_mut().convert(tex, display))
}
