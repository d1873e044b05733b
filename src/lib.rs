//! Makes CSS-module output tree-shakeable.
//!
//! The CSS-modules compiler emits modules that call `styleInject(css)` at the
//! top level, so every imported stylesheet is kept by the bundler even when
//! none of its class names are used. This plugin rewrites that exact module
//! shape into one whose default export is an accessor, `styles()`, which
//! injects the CSS on its first call and returns the class map.

use swc_core::{
    common::{SourceMapper, Span, DUMMY_SP},
    ecma::{
        ast::Program,
        visit::{VisitMut, VisitMutWith},
    },
    plugin::{
        metadata::TransformPluginMetadataContextKind, plugin_transform,
        proxies::TransformPluginProgramMetadata,
    },
};
use tracing::{debug, error, trace};

pub mod codegen;
pub mod config;
pub mod error;
pub mod extract;
pub mod filter;
pub mod parse;
pub mod shape;

pub use config::Options;
pub use error::{Error, Result};
pub use filter::Filter;
pub use shape::STYLE_INJECT_SUFFIX;

pub const PLUGIN_NAME: &str = "postcss-treeshakeable";

// -----------------------------------------------------------------------------
// Library host
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOutput {
    pub code: String,
}

/// Source-to-source form of the plugin, for hosts that hand over module text.
#[derive(Debug, Clone)]
pub struct TreeshakeablePlugin {
    filter: Filter,
}

impl TreeshakeablePlugin {
    pub fn new(options: &Options) -> Result<Self> {
        Ok(Self {
            filter: Filter::new(options)?,
        })
    }

    pub fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    /// `Ok(None)` means "leave the module as it is".
    pub fn transform(&self, code: &str, id: &str) -> Result<Option<TransformOutput>> {
        if !self.filter.matches(id) {
            trace!(id, "skipped by filter");
            return Ok(None);
        }
        let (module, cm) = parse::parse_module(code, id)?;
        Ok(lazy_source(&module, id, Some(&*cm)).map(|code| TransformOutput { code }))
    }

    /// Like [`transform`](Self::transform), but returns the input unchanged
    /// when there is nothing to rewrite.
    pub fn apply(&self, code: &str, id: &str) -> Result<String> {
        Ok(match self.transform(code, id)? {
            Some(out) => out.code,
            None => code.to_string(),
        })
    }
}

fn lazy_source(
    module: &swc_core::ecma::ast::Module,
    id: &str,
    source_map: Option<&dyn SourceMapper>,
) -> Option<String> {
    let shape = match shape::match_css_module(module) {
        Ok(shape) => shape,
        Err(mismatch) => {
            debug!(id, ?mismatch, "not a generated css module");
            return None;
        }
    };
    let Some(fragments) = extract::extract(&shape, source_map) else {
        debug!(id, "css module literals have no raw text");
        return None;
    };
    debug!(id, "deferring style injection");
    Some(codegen::render(&fragments))
}

// -----------------------------------------------------------------------------
// AST host
// -----------------------------------------------------------------------------

/// Replaces a matching module with its lazy form. The generated code is
/// parsed back into an AST with every span reset, since its positions do not
/// exist in the host's source map. Literal `raw` text is kept, so the host's
/// printer reproduces it exactly.
pub fn rewrite_program(
    program: Program,
    id: &str,
    filter: &Filter,
    source_map: Option<&dyn SourceMapper>,
) -> Program {
    if !filter.matches(id) {
        trace!(id, "skipped by filter");
        return program;
    }
    let Program::Module(module) = &program else {
        trace!(id, "scripts are never css modules");
        return program;
    };
    let span = module.span;
    let Some(code) = lazy_source(module, id, source_map) else {
        return program;
    };

    match parse::parse_module(&code, id) {
        Ok((mut lazy, _)) => {
            lazy.visit_mut_with(&mut ResetSpans);
            lazy.span = span;
            Program::Module(lazy)
        }
        Err(err) => {
            error!(id, %err, "generated module did not parse, keeping original");
            program
        }
    }
}

struct ResetSpans;

impl VisitMut for ResetSpans {
    fn visit_mut_span(&mut self, span: &mut Span) {
        *span = DUMMY_SP;
    }
}

// -----------------------------------------------------------------------------
// Entrypoint
// -----------------------------------------------------------------------------

#[plugin_transform]
pub fn process_transform(program: Program, metadata: TransformPluginProgramMetadata) -> Program {
    let config = metadata.get_transform_plugin_config().unwrap_or_default();

    // Plugins can only fail the build by panicking.
    let filter = match Options::from_json(&config).and_then(|options| Filter::new(&options)) {
        Ok(filter) => filter,
        Err(err) => panic!("{PLUGIN_NAME}: {err}"),
    };

    let id = metadata
        .get_context(&TransformPluginMetadataContextKind::Filename)
        .unwrap_or_default();

    rewrite_program(program, &id, &filter, Some(&metadata.source_map))
}
