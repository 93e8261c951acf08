//! Turns script text into the [`Script`] tree the runtime evaluates.

mod lexer;
mod parser;

use ix_core::{CallSiteInfo, IxError, Script};

pub const DEFAULT_SCRIPT_NAME: &str = "<script>";

pub fn compile_script(name: &str, source: &str) -> Result<Script, IxError> {
    let tokens = lexer::tokenize(name, source)?;
    let body = parser::Parser::new(tokens).parse_script(CallSiteInfo::new(name, 1, 1))?;
    tracing::debug!(script = name, bytes = source.len(), "compiled script");
    Ok(Script {
        name: name.to_string(),
        source: source.to_string(),
        body,
    })
}
