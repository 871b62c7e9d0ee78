use strum::Display;

/// Jump field of a Hack C-instruction. The condition is evaluated against the
/// ALU output of the same instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Jump {
    JGT,
    JEQ,
    JGE,
    JLT,
    JNE,
    JLE,
    JMP,
}

#[test]
fn test() {
    assert_eq!(Jump::JEQ.to_string(), "JEQ");
    assert_eq!(Jump::JMP.to_string(), "JMP");
}
