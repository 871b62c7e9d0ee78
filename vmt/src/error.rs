use arch::seg::Segment;
use color_print::cprintln;
use thiserror::Error;

/// A line the classifier refused. Raised eagerly, before any code for the
/// line is emitted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedCommand {
    #[error("unknown command: `{0}`")]
    UnknownCommand(String),

    #[error("unknown segment: `{0}`")]
    UnknownSegment(String),

    #[error("`{command}` requires {want} operand(s), got {got}")]
    MissingOperand {
        command: String,
        want: usize,
        got: usize,
    },

    #[error("too many operands for `{command}`: expected {want}, got {got}")]
    ExtraOperand {
        command: String,
        want: usize,
        got: usize,
    },

    #[error("cannot parse `{0}` as an index")]
    BadIndex(String),

    #[error("{seg} index {index} is out of range (max {max})")]
    IndexOutOfRange { seg: Segment, index: u16, max: u16 },

    #[error("cannot pop to the constant segment")]
    PopConstant,

    #[error("`{0}` is not a valid symbol")]
    BadSymbol(String),

    #[error("empty command")]
    Empty,
}

#[derive(Error, Debug)]
pub enum Error {
    /// A rejected source line, with its position and text.
    #[error("{cause}")]
    AtLine {
        line: usize,
        text: String,
        #[source]
        cause: Box<Error>,
    },

    #[error(transparent)]
    Command(#[from] MalformedCommand),

    /// `call` is classified but not wired to an emitter.
    #[error("`call` is not supported by this translator")]
    CallNotImplemented,

    #[error("Failed to read file: {0}")]
    FileRead(String, #[source] std::io::Error),

    #[error("Failed to write file: {0}")]
    FileWrite(String, #[source] std::io::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Attach the offending line's number and raw text.
    pub fn at_line(line: usize, text: &str, cause: Error) -> Error {
        Error::AtLine {
            line,
            text: text.to_string(),
            cause: Box::new(cause),
        }
    }

    /// Print the error with diagnostic information showing the source location
    /// and line content.
    pub fn print_diag(&self, file: &str) {
        match self {
            Error::AtLine { line, text, cause } => {
                cprintln!("<red,bold>error</>: {}", cause);
                cprintln!("     <blue>--></> <underline>{}:{}</>", file, line);
                cprintln!("      <blue>|</>");
                cprintln!(" <blue>{:>4} |</> {}", line, text);
                cprintln!("      <blue>|</>");
            }
            cause => cprintln!("<red,bold>error</>: {}", cause),
        }
    }
}
