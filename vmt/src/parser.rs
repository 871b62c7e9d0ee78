use crate::error::MalformedCommand;
use arch::seg::Segment;
use color_print::cformat;
use std::str::FromStr;
use strum::{Display, EnumString};

// ----------------------------------------------------------------------------
// Line

/// One source line: raw text plus the comment-stripped command part.
#[derive(Debug, Clone)]
pub struct Line {
    path: String,
    idx: usize,
    raw: String,
    code: String,
}

impl Line {
    pub fn new(path: &str, idx: usize, raw: &str) -> Self {
        let code = match raw.split_once("//") {
            Some((code, _comment)) => code,
            None => raw,
        };
        Self {
            path: path.to_string(),
            idx,
            raw: raw.to_string(),
            code: code.trim().to_string(),
        }
    }

    pub fn pos(&self) -> String {
        format!("{}:{}", self.path, self.no())
    }

    pub fn no(&self) -> usize {
        self.idx + 1
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }
}

// ----------------------------------------------------------------------------
// Scanner

/// Comment-stripped, non-empty source lines in order. Consumed once, front to
/// back.
pub struct Parser {
    lines: Vec<Line>,
    cursor: usize,
}

impl Parser {
    pub fn new(path: &str, source: &str) -> Self {
        let lines = source
            .lines()
            .enumerate()
            .map(|(idx, raw)| Line::new(path, idx, raw))
            .filter(|line| !line.is_empty())
            .collect();
        Parser { lines, cursor: 0 }
    }

    pub fn has_more(&self) -> bool {
        self.cursor < self.lines.len()
    }

    /// Next line. Call `has_more` first.
    pub fn advance(&mut self) -> &Line {
        let line = &self.lines[self.cursor];
        self.cursor += 1;
        line
    }
}

// ----------------------------------------------------------------------------
// Command

/// The nine stack ALU commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum AluOp {
    Add,
    Sub,
    Neg,
    Eq,
    Gt,
    Lt,
    And,
    Or,
    Not,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Alu(AluOp),
    Push(Segment, u16),
    Pop(Segment, u16),
    Label(String),
    Goto(String),
    IfGoto(String),
    Function(String, u16),
    Return,
    Call(String, u16),
}

impl Command {
    pub fn parse(line: &Line) -> Result<Command, MalformedCommand> {
        let words: Vec<&str> = line.code().split_whitespace().collect();
        let (key, args) = words.split_first().ok_or(MalformedCommand::Empty)?;

        if let Ok(op) = AluOp::from_str(key) {
            expect_arity(key, args, 0)?;
            return Ok(Command::Alu(op));
        }

        match *key {
            "push" | "pop" => {
                expect_arity(key, args, 2)?;
                let seg = Segment::from_str(args[0])
                    .map_err(|_| MalformedCommand::UnknownSegment(args[0].to_string()))?;
                let index = parse_index(args[1])?;
                if let Some(max) = seg.max_index() {
                    if index > max {
                        return Err(MalformedCommand::IndexOutOfRange { seg, index, max });
                    }
                }
                if *key == "push" {
                    Ok(Command::Push(seg, index))
                } else if seg == Segment::Constant {
                    Err(MalformedCommand::PopConstant)
                } else {
                    Ok(Command::Pop(seg, index))
                }
            }
            "label" | "goto" | "if-goto" => {
                expect_arity(key, args, 1)?;
                let name = parse_symbol(args[0])?;
                Ok(match *key {
                    "label" => Command::Label(name),
                    "goto" => Command::Goto(name),
                    _ => Command::IfGoto(name),
                })
            }
            "function" => {
                expect_arity(key, args, 2)?;
                Ok(Command::Function(parse_symbol(args[0])?, parse_index(args[1])?))
            }
            "call" => {
                expect_arity(key, args, 2)?;
                Ok(Command::Call(parse_symbol(args[0])?, parse_index(args[1])?))
            }
            "return" => {
                expect_arity(key, args, 0)?;
                Ok(Command::Return)
            }
            _ => Err(MalformedCommand::UnknownCommand(key.to_string())),
        }
    }
}

fn expect_arity(key: &str, args: &[&str], want: usize) -> Result<(), MalformedCommand> {
    if args.len() < want {
        return Err(MalformedCommand::MissingOperand {
            command: key.to_string(),
            want,
            got: args.len(),
        });
    }
    if args.len() > want {
        return Err(MalformedCommand::ExtraOperand {
            command: key.to_string(),
            want,
            got: args.len(),
        });
    }
    Ok(())
}

fn parse_index(s: &str) -> Result<u16, MalformedCommand> {
    s.parse::<u16>()
        .map_err(|_| MalformedCommand::BadIndex(s.to_string()))
}

fn parse_symbol(s: &str) -> Result<String, MalformedCommand> {
    let head_ok = s
        .chars()
        .next()
        .is_some_and(|c| !c.is_ascii_digit());
    let chars_ok = s
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "_.$:".contains(c));
    if head_ok && chars_ok {
        Ok(s.to_string())
    } else {
        Err(MalformedCommand::BadSymbol(s.to_string()))
    }
}

impl Command {
    pub fn cformat(&self) -> String {
        match self {
            Command::Alu(op) => cformat!("<red>{}</>", op),
            Command::Push(seg, index) => {
                cformat!("<red>push</> <blue>{}</> <yellow>{}</>", seg, index)
            }
            Command::Pop(seg, index) => {
                cformat!("<red>pop</> <blue>{}</> <yellow>{}</>", seg, index)
            }
            Command::Label(name) => cformat!("<red>label</> <green>{}</>", name),
            Command::Goto(name) => cformat!("<red>goto</> <green>{}</>", name),
            Command::IfGoto(name) => cformat!("<red>if-goto</> <green>{}</>", name),
            Command::Function(name, n) => {
                cformat!("<red>function</> <green>{}</> <yellow>{}</>", name, n)
            }
            Command::Return => cformat!("<red>return</>"),
            Command::Call(name, n) => {
                cformat!("<red>call</> <green>{}</> <yellow>{}</>", name, n)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(code: &str) -> Result<Command, MalformedCommand> {
        Command::parse(&Line::new("Test", 0, code))
    }

    #[test]
    fn classifies_every_kind() {
        assert_eq!(classify("add"), Ok(Command::Alu(AluOp::Add)));
        assert_eq!(classify("not"), Ok(Command::Alu(AluOp::Not)));
        assert_eq!(
            classify("push constant 7"),
            Ok(Command::Push(Segment::Constant, 7))
        );
        assert_eq!(classify("pop local 2"), Ok(Command::Pop(Segment::Local, 2)));
        assert_eq!(classify("label LOOP"), Ok(Command::Label("LOOP".into())));
        assert_eq!(classify("goto LOOP"), Ok(Command::Goto("LOOP".into())));
        assert_eq!(classify("if-goto LOOP"), Ok(Command::IfGoto("LOOP".into())));
        assert_eq!(
            classify("function Foo.bar 3"),
            Ok(Command::Function("Foo.bar".into(), 3))
        );
        assert_eq!(classify("return"), Ok(Command::Return));
        assert_eq!(
            classify("call Foo.bar 2"),
            Ok(Command::Call("Foo.bar".into(), 2))
        );
    }

    #[test]
    fn comments_and_whitespace() {
        assert_eq!(
            classify("  push   argument  0  // first argument"),
            Ok(Command::Push(Segment::Argument, 0))
        );
        assert!(Line::new("Test", 0, "// only a comment").is_empty());
        assert!(Line::new("Test", 0, "   ").is_empty());
    }

    #[test]
    fn rejects_unknown_keyword() {
        assert_eq!(
            classify("frobnicate"),
            Err(MalformedCommand::UnknownCommand("frobnicate".into()))
        );
    }

    #[test]
    fn rejects_unknown_segment() {
        assert_eq!(
            classify("push frame 0"),
            Err(MalformedCommand::UnknownSegment("frame".into()))
        );
    }

    #[test]
    fn rejects_wrong_arity() {
        assert!(matches!(
            classify("push local"),
            Err(MalformedCommand::MissingOperand { .. })
        ));
        assert!(matches!(
            classify("add 1"),
            Err(MalformedCommand::ExtraOperand { .. })
        ));
        assert!(matches!(
            classify("label A B"),
            Err(MalformedCommand::ExtraOperand { .. })
        ));
        assert!(matches!(
            classify("return 0"),
            Err(MalformedCommand::ExtraOperand { .. })
        ));
    }

    #[test]
    fn rejects_bad_index() {
        assert_eq!(
            classify("push constant x"),
            Err(MalformedCommand::BadIndex("x".into()))
        );
        assert_eq!(
            classify("push constant -1"),
            Err(MalformedCommand::BadIndex("-1".into()))
        );
        assert_eq!(
            classify("push constant 99999"),
            Err(MalformedCommand::BadIndex("99999".into()))
        );
    }

    #[test]
    fn rejects_out_of_range_index() {
        assert_eq!(
            classify("push temp 8"),
            Err(MalformedCommand::IndexOutOfRange {
                seg: Segment::Temp,
                index: 8,
                max: 7
            })
        );
        assert_eq!(
            classify("pop pointer 2"),
            Err(MalformedCommand::IndexOutOfRange {
                seg: Segment::Pointer,
                index: 2,
                max: 1
            })
        );
        assert_eq!(
            classify("push constant 32768"),
            Err(MalformedCommand::IndexOutOfRange {
                seg: Segment::Constant,
                index: 32768,
                max: 0x7FFF
            })
        );
        assert_eq!(
            classify("push constant 32767"),
            Ok(Command::Push(Segment::Constant, 32767))
        );
    }

    #[test]
    fn rejects_pop_constant() {
        assert_eq!(classify("pop constant 0"), Err(MalformedCommand::PopConstant));
    }

    #[test]
    fn rejects_bad_symbol() {
        assert_eq!(
            classify("label 1st"),
            Err(MalformedCommand::BadSymbol("1st".into()))
        );
        assert_eq!(
            classify("goto a#b"),
            Err(MalformedCommand::BadSymbol("a#b".into()))
        );
        assert_eq!(
            classify("label loop$end:2"),
            Ok(Command::Label("loop$end:2".into()))
        );
    }

    #[test]
    fn scanner_yields_lines_in_order() {
        let mut parser = Parser::new("Test", "push constant 1\n\n// gap\nadd\n");
        assert!(parser.has_more());
        assert_eq!(parser.advance().code(), "push constant 1");
        assert_eq!(parser.advance().no(), 4);
        assert!(!parser.has_more());
    }
}
