use std::{fs, sync::Once, time::Instant};

use log::debug;
use v8::{Context, Function, Global, OwnedIsolate};

use super::{Engine, EngineConfig, EMBEDDED_BUNDLE};
use crate::{Error, Result};

fn create_origin<'s>(
    scope: &mut v8::HandleScope<'s>,
    filename: impl AsRef<str>,
    is_module: bool,
) -> Option<v8::ScriptOrigin<'s>> {
    let name: v8::Local<'s, v8::Value> = v8::String::new(scope, filename.as_ref())?.into();
    Some(v8::ScriptOrigin::new(
        scope, name, 0, 0, false, 0, name, false, false, is_module,
    ))
}

// The bundle is self-contained; any import is left unresolved.
fn resolve_module<'s>(
    _context: v8::Local<'s, v8::Context>,
    _name: v8::Local<'s, v8::String>,
    _arr: v8::Local<'s, v8::FixedArray>,
    _referrer: v8::Local<'s, v8::Module>,
) -> Option<v8::Local<'s, v8::Module>> {
    None
}

static PLATFORM: Once = Once::new();

fn initialize_platform() {
    PLATFORM.call_once(|| {
        let platform = v8::new_default_platform(0, false).make_shared();
        v8::V8::initialize_platform(platform);
        v8::V8::initialize();
    });
}

/// `error.message` when the thrown value has one, its string form otherwise.
fn exception_message<'s>(
    scope: &mut v8::HandleScope<'s>,
    exception: v8::Local<'s, v8::Value>,
) -> String {
    if let Ok(object) = v8::Local::<v8::Object>::try_from(exception) {
        let message = v8::String::new(scope, "message")
            .and_then(|key| object.get(scope, key.into()))
            .filter(|message| message.is_string())
            .map(|message| message.to_rust_string_lossy(scope));
        if let Some(message) = message.filter(|message| !message.is_empty()) {
            return message;
        }
    }
    exception.to_rust_string_lossy(scope)
}

fn caught_message<'s>(scope: &mut v8::TryCatch<'_, v8::HandleScope<'s>>) -> String {
    match scope.exception() {
        Some(exception) => exception_message(scope, exception),
        None => "JavaScript execution was terminated".to_owned(),
    }
}

/// Compile and evaluate the bundle, then return its default export.
fn load_entry<'s>(
    scope: &mut v8::HandleScope<'s>,
    code: &str,
    filename: &str,
) -> Result<v8::Local<'s, Function>> {
    let scope = &mut v8::TryCatch::new(scope);

    let source = v8::String::new(scope, code)
        .ok_or_else(|| Error::Init("bundle is too large for a JavaScript string".into()))?;
    let origin = create_origin(scope, filename, true)
        .ok_or_else(|| Error::Init("bundle file name is not representable".into()))?;
    let source = v8::script_compiler::Source::new(source, Some(&origin));
    let module = v8::script_compiler::compile_module(scope, source)
        .ok_or_else(|| Error::Init(caught_message(scope)))?;

    module
        .instantiate_module(scope, resolve_module)
        .ok_or_else(|| Error::Init(caught_message(scope)))?;
    module
        .evaluate(scope)
        .ok_or_else(|| Error::Init(caught_message(scope)))?;
    if module.get_status() == v8::ModuleStatus::Errored {
        let exception = v8::Local::new(scope, module.get_exception());
        return Err(Error::Init(exception_message(scope, exception)));
    }

    let key = v8::String::new(scope, "default")
        .ok_or_else(|| Error::Init("failed to allocate export name".into()))?;
    let entry = module
        .get_module_namespace()
        .to_object(scope)
        .and_then(|namespace| namespace.get(scope, key.into()))
        .ok_or_else(|| Error::Init(caught_message(scope)))?;
    v8::Local::<Function>::try_from(entry)
        .map_err(|_| Error::Init(format!("{filename} has no default-exported function")))
}

/// MathJax running inside its own V8 isolate.
///
/// Construction compiles the whole bundle, so it is expensive; conversions
/// afterwards only call into the already-evaluated module.
pub struct MathJax {
    // Globals go before the isolate so they are released first.
    context: Global<Context>,
    entry: Global<Function>,
    isolate: OwnedIsolate,
}

impl MathJax {
    /// Start MathJax from the bundle named by `config`, or the embedded one.
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let Some(path) = &config.bundle else {
            debug!("starting embedded MathJax");
            return Self::from_source(EMBEDDED_BUNDLE.ok_or(Error::NoBundle)?, "mathjax.js");
        };
        let code = fs::read_to_string(path).map_err(|source| Error::Bundle {
            path: path.clone(),
            source,
        })?;
        debug!("starting MathJax from {}", path.display());
        Self::from_source(&code, &path.display().to_string())
    }

    /// Start MathJax from bundle source already in memory.
    ///
    /// `code` must be an ES module without imports whose default export is
    /// `(tex: string, display: boolean) => string`.
    pub fn from_source(code: &str, filename: &str) -> Result<Self> {
        initialize_platform();
        let started = Instant::now();

        let mut isolate = v8::Isolate::new(Default::default());
        let (context, entry) = {
            let handle_scope = &mut v8::HandleScope::new(&mut isolate);
            let context = v8::Context::new(handle_scope);
            let scope = &mut v8::ContextScope::new(handle_scope, context);
            let entry = load_entry(scope, code, filename)?;
            (Global::new(scope, context), Global::new(scope, entry))
        };

        debug!("MathJax ready in {:?}", started.elapsed());
        Ok(Self {
            context,
            entry,
            isolate,
        })
    }
}

impl Engine for MathJax {
    fn typeset(&mut self, tex: &str, display: bool) -> Result<String> {
        let handle_scope = &mut v8::HandleScope::new(&mut self.isolate);
        let context = v8::Local::new(handle_scope, &self.context);
        let scope = &mut v8::ContextScope::new(handle_scope, context);
        let scope = &mut v8::TryCatch::new(scope);

        let entry = v8::Local::new(scope, &self.entry);
        let tex = v8::String::new(scope, tex)
            .ok_or_else(|| Error::Engine("TeX source is too large".into()))?;
        let display = v8::Boolean::new(scope, display);
        let receiver: v8::Local<v8::Value> = v8::undefined(scope).into();

        match entry.call(scope, receiver, &[tex.into(), display.into()]) {
            Some(tree) => Ok(tree.to_rust_string_lossy(scope)),
            None => Err(Error::Engine(caught_message(scope))),
        }
    }
}
