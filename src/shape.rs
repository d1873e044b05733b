//! Recognises the exact module emitted by the CSS-modules compiler:
//!
//! ```js
//! var css = ".a_1a2b{color:red}";
//! export default {"a": "a_1a2b"};
//! import styleInject from "…/style-inject/dist/style-inject.es.js";
//! styleInject(css);
//! ```
//!
//! Anything else is a [`Mismatch`], never an error.

use swc_core::ecma::ast::*;

pub const CSS_BINDING: &str = "css";
pub const INJECT_BINDING: &str = "styleInject";
pub const STYLE_INJECT_SUFFIX: &str = "style-inject/dist/style-inject.es.js";

/// Borrowed pieces of a matched module.
#[derive(Debug, Clone, Copy)]
pub struct CssModuleShape<'a> {
    pub css: &'a Str,
    pub class_map: &'a ObjectLit,
    pub helper_src: &'a Str,
}

/// Which part of the expected shape was not found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    StatementCount(usize),
    CssBinding,
    DefaultExport,
    ClassMapProperty(usize),
    HelperImport,
    HelperSource,
    InjectCall,
}

pub fn match_css_module(module: &Module) -> Result<CssModuleShape<'_>, Mismatch> {
    let [css_decl, default_export, helper_import, inject_call] = module.body.as_slice() else {
        return Err(Mismatch::StatementCount(module.body.len()));
    };

    let css = match_css_binding(css_decl).ok_or(Mismatch::CssBinding)?;
    let class_map = match_default_export(default_export)?;
    let helper_src = match_helper_import(helper_import)?;
    match_inject_call(inject_call).ok_or(Mismatch::InjectCall)?;

    Ok(CssModuleShape {
        css,
        class_map,
        helper_src,
    })
}

// var css = "...";
fn match_css_binding(item: &ModuleItem) -> Option<&Str> {
    let ModuleItem::Stmt(Stmt::Decl(Decl::Var(var))) = item else {
        return None;
    };
    let [decl] = var.decls.as_slice() else {
        return None;
    };
    match (&decl.name, decl.init.as_deref()) {
        (Pat::Ident(name), Some(Expr::Lit(Lit::Str(css)))) if name.id.sym.as_ref() == CSS_BINDING => {
            Some(css)
        }
        _ => None,
    }
}

// export default { key: literal, ... };
fn match_default_export(item: &ModuleItem) -> Result<&ObjectLit, Mismatch> {
    let ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultExpr(export)) = item else {
        return Err(Mismatch::DefaultExport);
    };
    let Expr::Object(obj) = export.expr.unwrap_parens() else {
        return Err(Mismatch::DefaultExport);
    };
    for (index, prop) in obj.props.iter().enumerate() {
        if !is_literal_property(prop) {
            return Err(Mismatch::ClassMapProperty(index));
        }
    }
    Ok(obj)
}

fn is_literal_property(prop: &PropOrSpread) -> bool {
    let PropOrSpread::Prop(prop) = prop else {
        return false;
    };
    let Prop::KeyValue(kv) = &**prop else {
        return false;
    };
    let key_ok = match &kv.key {
        PropName::Ident(_) | PropName::Str(_) | PropName::Num(_) | PropName::BigInt(_) => true,
        PropName::Computed(_) => false,
    };
    let value_ok = match &*kv.value {
        Expr::Lit(lit) => match lit {
            Lit::Str(_) | Lit::Num(_) | Lit::Bool(_) | Lit::Null(_) | Lit::BigInt(_) | Lit::Regex(_) => true,
            Lit::JSXText(_) => false,
        },
        _ => false,
    };
    key_ok && value_ok
}

// import styleInject from "…/style-inject/dist/style-inject.es.js";
fn match_helper_import(item: &ModuleItem) -> Result<&Str, Mismatch> {
    let ModuleItem::ModuleDecl(ModuleDecl::Import(import)) = item else {
        return Err(Mismatch::HelperImport);
    };
    if import.type_only || import.with.is_some() || !matches!(import.phase, ImportPhase::Evaluation) {
        return Err(Mismatch::HelperImport);
    }
    let [ImportSpecifier::Default(default)] = import.specifiers.as_slice() else {
        return Err(Mismatch::HelperImport);
    };
    if default.local.sym.as_ref() != INJECT_BINDING {
        return Err(Mismatch::HelperImport);
    }
    if !import.src.value.to_string().ends_with(STYLE_INJECT_SUFFIX) {
        return Err(Mismatch::HelperSource);
    }
    Ok(&import.src)
}

// styleInject(<one argument>);
//
// The argument itself is not inspected: the compiler always passes `css`.
fn match_inject_call(item: &ModuleItem) -> Option<()> {
    let ModuleItem::Stmt(Stmt::Expr(stmt)) = item else {
        return None;
    };
    let Expr::Call(call) = &*stmt.expr else {
        return None;
    };
    let Callee::Expr(callee) = &call.callee else {
        return None;
    };
    let Expr::Ident(callee) = &**callee else {
        return None;
    };
    match call.args.as_slice() {
        [arg] if arg.spread.is_none() && callee.sym.as_ref() == INJECT_BINDING => Some(()),
        _ => None,
    }
}
