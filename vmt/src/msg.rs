use crate::parser::Line;
use color_print::cprintln;

/// Non-fatal diagnostics collected while translating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    Warn(String),
    Note(String),
}

impl Msg {
    pub fn print(&self, info: (&str, usize, &str)) {
        let (file, line, raw) = info;
        match self {
            Msg::Warn(msg) => cprintln!("<yellow,bold>warn</>: {}", msg),
            Msg::Note(msg) => cprintln!("<green,bold>note</>: {}", msg),
        }
        cprintln!("     <blue>--></> <underline>{}:{}</>", file, line);
        cprintln!("      <blue>|</>");
        cprintln!(" <blue>{:>4} |</> {}", line, raw);
        cprintln!("      <blue>|</>");
    }
}

/// Messages paired with the line they concern.
#[derive(Debug, Default)]
pub struct Msgs(Vec<(Msg, usize, String)>);

impl Msgs {
    pub fn new() -> Self {
        Msgs(Vec::new())
    }

    pub fn warn(&mut self, text: String, line: &Line) {
        self.0.push((Msg::Warn(text), line.no(), line.raw().to_string()));
    }

    pub fn note(&mut self, text: String, line: &Line) {
        self.0.push((Msg::Note(text), line.no(), line.raw().to_string()));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (Msg, usize, String)> {
        self.0.iter()
    }

    pub fn print(&self, file: &str) {
        for (msg, line, raw) in &self.0 {
            msg.print((file, *line, raw));
        }
    }
}
