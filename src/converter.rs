use std::fmt;

use log::{debug, warn};

use crate::{
    engine::{Engine, EngineConfig, MathJax},
    svg, Error, Result,
};

/// A validated conversion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionRequest<'a> {
    pub tex: &'a str,
    pub display: bool,
}

impl<'a> ConversionRequest<'a> {
    /// Fails with [`Error::EmptyTex`] when `tex` is missing or empty.
    pub fn new(tex: Option<&'a str>, display: bool) -> Result<Self> {
        match tex {
            Some(tex) if !tex.is_empty() => Ok(Self { tex, display }),
            _ => Err(Error::EmptyTex),
        }
    }
}

/// A rendered formula.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgOutput {
    /// The `<svg>` element, without MathJax's container.
    pub svg: String,
    /// Whether it was typeset in display mode.
    pub display: bool,
}

impl fmt::Display for SvgOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.svg)
    }
}

pub type ConversionResult = Result<SvgOutput>;

type Start<E> = Box<dyn Fn() -> Result<E>>;

/// TeX to SVG conversion over a lazily started [`Engine`].
///
/// The engine is created by the first valid [`convert`](Self::convert) and
/// reused until the converter is dropped.
pub struct Converter<E = MathJax> {
    start: Start<E>,
    engine: Option<E>,
}

impl Converter<MathJax> {
    /// A converter that starts MathJax from the default bundle.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self::with_engine(move || MathJax::new(&config))
    }
}

impl Default for Converter<MathJax> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Engine> Converter<E> {
    /// A converter whose engine is produced by `start` on first use.
    pub fn with_engine(start: impl Fn() -> Result<E> + 'static) -> Self {
        Self {
            start: Box::new(start),
            engine: None,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.engine.is_some()
    }

    /// Start the engine unless it is already running.
    ///
    /// A failed start leaves the converter uninitialized, so the next call
    /// tries again.
    pub fn ensure_initialized(&mut self) -> Result<&mut E> {
        let engine = match self.engine.take() {
            Some(engine) => engine,
            None => (self.start)()?,
        };
        Ok(self.engine.insert(engine))
    }

    /// Render `tex` to SVG.
    ///
    /// Errors thrown by the engine and error annotations inside its output
    /// both come back as `Err`; neither panics.
    pub fn convert<'a>(&mut self, tex: impl Into<Option<&'a str>>, display: bool) -> ConversionResult {
        let request = ConversionRequest::new(tex.into(), display)?;
        self.run(request)
    }

    fn run(&mut self, request: ConversionRequest<'_>) -> ConversionResult {
        let engine = self.ensure_initialized()?;
        debug!("typesetting {:?} (display: {})", request.tex, request.display);
        let tree = engine.typeset(request.tex, request.display)?;

        if let Some(message) = svg::find_error(&tree)? {
            warn!("MathJax reported an error for {:?}: {message}", request.tex);
            return Err(Error::Render(message));
        }

        let svg = match svg::extract_svg(&tree)? {
            Some(svg) => svg.to_owned(),
            None => {
                warn!("no <svg> element in MathJax output, returning it whole");
                tree
            }
        };
        Ok(SvgOutput {
            svg,
            display: request.display,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use super::*;

    /// Wraps the input in a container the way MathJax does, or misbehaves on cue.
    struct Scripted;

    impl Engine for Scripted {
        fn typeset(&mut self, tex: &str, display: bool) -> Result<String> {
            match tex {
                "throw" => Err(Error::Engine("boom".into())),
                "annotated" => Ok(r#"<c><svg><g data-mjx-error="Undefined control sequence \oops"/></svg></c>"#.into()),
                "bare" => Ok("<c>no svg here</c>".into()),
                _ => Ok(format!(
                    r#"<mjx-container display="{display}"><svg data-tex="{tex}" data-display="{display}"></svg></mjx-container>"#
                )),
            }
        }
    }

    fn counting() -> (Converter<Scripted>, Rc<Cell<usize>>) {
        let starts = Rc::new(Cell::new(0));
        let counter = Rc::clone(&starts);
        let converter = Converter::with_engine(move || {
            counter.set(counter.get() + 1);
            Ok(Scripted)
        });
        (converter, starts)
    }

    #[test]
    fn request_rejects_missing_and_empty() {
        assert!(matches!(ConversionRequest::new(None, false), Err(Error::EmptyTex)));
        assert!(matches!(ConversionRequest::new(Some(""), true), Err(Error::EmptyTex)));
        assert_eq!(
            ConversionRequest::new(Some("x"), true).unwrap(),
            ConversionRequest { tex: "x", display: true }
        );
    }

    #[test]
    fn validation_does_not_start_the_engine() {
        let (mut converter, starts) = counting();
        let empty = converter.convert("", false).unwrap_err();
        let missing = converter.convert(None, false).unwrap_err();
        assert!(!empty.to_string().is_empty());
        assert!(!missing.to_string().is_empty());
        assert_eq!(starts.get(), 0);
        assert!(!converter.is_initialized());
    }

    #[test]
    fn extracts_svg_and_echoes_display() {
        let (mut converter, _) = counting();
        let output = converter.convert("x^2", true).unwrap();
        assert_eq!(
            output.svg,
            r#"<svg data-tex="x^2" data-display="true"></svg>"#
        );
        assert!(output.display);
        assert_eq!(output.to_string(), output.svg);
    }

    #[test]
    fn starts_once_across_calls() {
        let (mut converter, starts) = counting();
        let first = converter.convert("a", false).unwrap();
        let second = converter.convert("b", false).unwrap();
        let third = converter.convert("b", true).unwrap();
        assert_eq!(starts.get(), 1);
        assert_ne!(first.svg, second.svg);
        assert_ne!(second.svg, third.svg);
    }

    #[test]
    fn engine_exception_becomes_err() {
        let (mut converter, _) = counting();
        let err = converter.convert("throw", false).unwrap_err();
        assert!(matches!(err, Error::Engine(ref message) if message == "boom"));
        assert!(converter.convert("ok", false).is_ok());
    }

    #[test]
    fn annotation_becomes_render_error() {
        let (mut converter, _) = counting();
        let err = converter.convert("annotated", false).unwrap_err();
        assert_eq!(err.to_string(), r"Undefined control sequence \oops");
    }

    #[test]
    fn falls_back_to_whole_tree() {
        let (mut converter, _) = counting();
        assert_eq!(converter.convert("bare", false).unwrap().svg, "<c>no svg here</c>");
    }

    #[test]
    fn failed_start_is_retried() {
        let attempts = Rc::new(Cell::new(0));
        let counter = Rc::clone(&attempts);
        let mut converter = Converter::with_engine(move || {
            counter.set(counter.get() + 1);
            if counter.get() == 1 {
                Err(Error::Init("not yet".into()))
            } else {
                Ok(Scripted)
            }
        });

        let err = converter.convert("x", false).unwrap_err();
        assert_eq!(err.to_string(), "failed to initialize MathJax: not yet");
        assert!(!converter.is_initialized());

        assert!(converter.convert("x", false).is_ok());
        assert!(converter.is_initialized());
        assert_eq!(attempts.get(), 2);
    }

    #[test]
    fn ensure_initialized_is_idempotent() {
        let (mut converter, starts) = counting();
        converter.ensure_initialized().unwrap();
        converter.ensure_initialized().unwrap();
        assert_eq!(starts.get(), 1);
    }
}
