pub mod codegen;
pub mod error;
pub mod msg;
pub mod parser;

pub use codegen::CodeWriter;
pub use error::{Error, MalformedCommand};
pub use msg::{Msg, Msgs};
pub use parser::{AluOp, Command, Line, Parser};

use indexmap::IndexMap;
use std::io::Write;

/// Translate one unit of VM source into Hack assembly on `out`.
///
/// Lines are classified and emitted one at a time, front to back. The first
/// malformed line aborts the whole translation; label and function
/// redefinitions are collected as warnings and returned for the caller to
/// print.
pub fn translate<W: Write>(basename: &str, source: &str, out: W) -> Result<Msgs, Error> {
    let mut parser = Parser::new(basename, source);
    let mut writer = CodeWriter::new(basename, out);
    let mut msgs = Msgs::new();
    let mut labels: IndexMap<String, usize> = IndexMap::new();
    let mut functions: IndexMap<String, usize> = IndexMap::new();

    while parser.has_more() {
        let line = parser.advance();

        let command = match Command::parse(line) {
            Ok(command) => command,
            Err(cause) => {
                return Err(Error::at_line(line.no(), line.raw(), cause.into()));
            }
        };

        match &command {
            Command::Label(name) => {
                if let Some(prev) = labels.insert(name.clone(), line.no()) {
                    msgs.warn(format!("Re-defined label: `{name}`"), line);
                    msgs.note(format!("Already defined at line {prev}."), line);
                }
            }
            Command::Function(name, _) => {
                if let Some(prev) = functions.insert(name.clone(), line.no()) {
                    msgs.warn(format!("Re-defined function: `{name}`"), line);
                    msgs.note(format!("Already defined at line {prev}."), line);
                }
            }
            _ => {}
        }

        if let Err(cause) = writer.write(&command) {
            return Err(Error::at_line(line.no(), line.raw(), cause));
        }
    }

    writer.finish()?;
    Ok(msgs)
}
