use swc_core::{
    common::{SourceMapper, Span},
    ecma::ast::*,
};

use crate::shape::CssModuleShape;

/// Source text copied out of a matched module. Nothing here is re-serialised
/// from a parsed value, so quoting, escapes and number formatting survive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragments {
    /// The CSS string literal, quotes included.
    pub css: String,
    /// `{ key: value, ... }` rebuilt from the raw key and value text.
    pub class_map: String,
    /// The helper's import source literal, quotes included.
    pub helper_src: String,
}

/// Raw text lookup: the node's own `raw` first, then the original source.
struct RawText<'a> {
    source_map: Option<&'a dyn SourceMapper>,
}

impl RawText<'_> {
    fn snippet(&self, span: Span) -> Option<String> {
        if span.is_dummy() {
            return None;
        }
        self.source_map?.span_to_snippet(span).ok()
    }

    fn str_lit(&self, s: &Str) -> Option<String> {
        match &s.raw {
            Some(raw) => Some(raw.to_string()),
            None => self.snippet(s.span),
        }
    }

    fn key(&self, key: &PropName) -> Option<String> {
        match key {
            // `sym` is decoded, so escaped identifiers need the source text.
            PropName::Ident(i) => self.snippet(i.span).or_else(|| Some(i.sym.to_string())),
            PropName::Str(s) => self.str_lit(s),
            PropName::Num(n) => n.raw.as_ref().map(|r| r.to_string()).or_else(|| self.snippet(n.span)),
            PropName::BigInt(b) => b.raw.as_ref().map(|r| r.to_string()).or_else(|| self.snippet(b.span)),
            PropName::Computed(_) => None,
        }
    }

    fn value(&self, value: &Expr) -> Option<String> {
        let Expr::Lit(lit) = value else {
            return None;
        };
        match lit {
            Lit::Str(s) => self.str_lit(s),
            Lit::Num(n) => n.raw.as_ref().map(|r| r.to_string()).or_else(|| self.snippet(n.span)),
            Lit::BigInt(b) => b.raw.as_ref().map(|r| r.to_string()).or_else(|| self.snippet(b.span)),
            Lit::Bool(b) => Some(b.value.to_string()),
            Lit::Null(_) => Some("null".to_string()),
            Lit::Regex(r) => self.snippet(r.span),
            Lit::JSXText(_) => None,
        }
    }
}

/// Copies the three fragments out of `shape`. `None` when some piece has no
/// recoverable raw text, in which case the module is left alone.
pub fn extract(shape: &CssModuleShape<'_>, source_map: Option<&dyn SourceMapper>) -> Option<Fragments> {
    let raw = RawText { source_map };

    let css = raw.str_lit(shape.css)?;
    let helper_src = raw.str_lit(shape.helper_src)?;

    let mut entries = Vec::with_capacity(shape.class_map.props.len());
    for prop in &shape.class_map.props {
        let PropOrSpread::Prop(prop) = prop else {
            return None;
        };
        let Prop::KeyValue(kv) = &**prop else {
            return None;
        };
        entries.push(format!("{}: {}", raw.key(&kv.key)?, raw.value(&kv.value)?));
    }

    Some(Fragments {
        css,
        class_map: format!("{{ {} }}", entries.join(", ")),
        helper_src,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_module;
    use crate::shape::match_css_module;
    use pretty_assertions::assert_eq;
    use swc_core::common::DUMMY_SP;

    fn fragments(code: &str) -> Fragments {
        let (module, cm) = parse_module(code, "test.css").unwrap();
        let shape = match_css_module(&module).unwrap();
        extract(&shape, Some(&*cm)).unwrap()
    }

    #[test]
    fn copies_literal_text_verbatim() {
        let f = fragments(concat!(
            "var css = '.a{content:\"\\u2014\"}\\n';\n",
            "export default {'a': 'a_1', \"b-c\": \"b\\u0041\", d: 0x1F, e: 1e3, f: true, g: null, h: 10n};\n",
            "import styleInject from './style-inject/dist/style-inject.es.js';\n",
            "styleInject(css);\n",
        ));
        assert_eq!(f.css, "'.a{content:\"\\u2014\"}\\n'");
        assert_eq!(
            f.class_map,
            "{ 'a': 'a_1', \"b-c\": \"b\\u0041\", d: 0x1F, e: 1e3, f: true, g: null, h: 10n }"
        );
        assert_eq!(f.helper_src, "'./style-inject/dist/style-inject.es.js'");
    }

    #[test]
    fn empty_map_keeps_padding() {
        let f = fragments(concat!(
            "var css = \"\";\n",
            "export default {};\n",
            "import styleInject from \"style-inject/dist/style-inject.es.js\";\n",
            "styleInject(css);\n",
        ));
        assert_eq!(f.class_map, "{  }");
        assert_eq!(f.css, "\"\"");
    }

    #[test]
    fn regex_values_use_source_text() {
        let f = fragments(concat!(
            "var css = \"\";\n",
            "export default {re: /a\\/b/gi};\n",
            "import styleInject from \"style-inject/dist/style-inject.es.js\";\n",
            "styleInject(css);\n",
        ));
        assert_eq!(f.class_map, "{ re: /a\\/b/gi }");
    }

    #[test]
    fn escaped_identifier_keys_keep_source_text() {
        let f = fragments(concat!(
            "var css = \"\";\n",
            "export default {\\u0061: \"x\", b\\u0062: 1, plain: 2};\n",
            "import styleInject from \"style-inject/dist/style-inject.es.js\";\n",
            "styleInject(css);\n",
        ));
        assert_eq!(f.class_map, "{ \\u0061: \"x\", b\\u0062: 1, plain: 2 }");
    }

    #[test]
    fn regex_without_source_text_declines() {
        let (mut module, _) = parse_module(
            concat!(
                "var css = \"\";\n",
                "export default {re: /a/g};\n",
                "import styleInject from \"style-inject/dist/style-inject.es.js\";\n",
                "styleInject(css);\n",
            ),
            "test.css",
        )
        .unwrap();
        let shape = match_css_module(&module).unwrap();
        assert_eq!(extract(&shape, None), None);

        if let ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultExpr(export)) = &mut module.body[1] {
            if let Expr::Object(obj) = &mut *export.expr {
                obj.props.clear();
            }
        }
        let shape = match_css_module(&module).unwrap();
        assert_eq!(extract(&shape, None).unwrap().class_map, "{  }");
    }

    #[test]
    fn falls_back_to_source_when_raw_is_missing() {
        let (mut module, cm) = parse_module(
            concat!(
                "var css = \".x{}\";\n",
                "export default {};\n",
                "import styleInject from \"style-inject/dist/style-inject.es.js\";\n",
                "styleInject(css);\n",
            ),
            "test.css",
        )
        .unwrap();
        if let ModuleItem::Stmt(Stmt::Decl(Decl::Var(var))) = &mut module.body[0] {
            if let Some(Expr::Lit(Lit::Str(s))) = var.decls[0].init.as_deref_mut() {
                s.raw = None;
            }
        }
        let shape = match_css_module(&module).unwrap();
        assert_eq!(extract(&shape, Some(&*cm)).unwrap().css, "\".x{}\"");
        assert_eq!(extract(&shape, None), None);
    }

    #[test]
    fn synthetic_nodes_without_raw_decline() {
        let css = Str {
            span: DUMMY_SP,
            value: "".into(),
            raw: None,
        };
        let src = Str {
            span: DUMMY_SP,
            value: "style-inject/dist/style-inject.es.js".into(),
            raw: Some("\"style-inject/dist/style-inject.es.js\"".into()),
        };
        let map = ObjectLit {
            span: DUMMY_SP,
            props: vec![],
        };
        let shape = CssModuleShape {
            css: &css,
            class_map: &map,
            helper_src: &src,
        };
        assert_eq!(extract(&shape, None), None);
    }
}
