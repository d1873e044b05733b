use swc_core::{
    common::{sync::Lrc, FileName, SourceMap, Spanned},
    ecma::{
        ast::{EsVersion, Module},
        parser::{error::Error as SyntaxError, lexer::Lexer, EsSyntax, Parser, StringInput, Syntax},
    },
};

use crate::error::{Error, Result};

/// Parses `code` as an ES module. Any syntax error, recovered or not, is fatal.
pub fn parse_module(code: &str, id: &str) -> Result<(Module, Lrc<SourceMap>)> {
    let cm: Lrc<SourceMap> = Default::default();
    let fm = cm.new_source_file(Lrc::new(FileName::Custom(id.to_string())), code.to_string());

    let lexer = Lexer::new(
        Syntax::Es(EsSyntax::default()),
        EsVersion::latest(),
        StringInput::from(&*fm),
        None,
    );
    let mut parser = Parser::new_from(lexer);
    let parsed = parser.parse_module();
    let recovered = parser.take_errors();

    match parsed {
        Ok(module) => match recovered.into_iter().next() {
            Some(err) => Err(to_parse_error(&cm, id, err)),
            None => Ok((module, cm)),
        },
        Err(err) => Err(to_parse_error(&cm, id, err)),
    }
}

fn to_parse_error(cm: &SourceMap, id: &str, err: SyntaxError) -> Error {
    let loc = cm.lookup_char_pos(err.span().lo());
    Error::Parse {
        id: id.to_string(),
        line: loc.line,
        column: loc.col_display + 1,
        message: err.kind().msg().into_owned(),
    }
}
