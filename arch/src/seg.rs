use strum::{Display, EnumString};

/// The eight memory segments a stack command can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Segment {
    Constant,
    Local,
    Argument,
    This,
    That,
    Temp,
    Pointer,
    Static,
}

impl Segment {
    /// Largest index a command may address in this segment. `None` leaves the
    /// full A-instruction range to the assembler.
    pub fn max_index(&self) -> Option<u16> {
        match self {
            Segment::Temp => Some(7),
            Segment::Pointer => Some(1),
            Segment::Constant => Some(0x7FFF),
            _ => None,
        }
    }
}

#[test]
fn test() {
    assert_eq!("argument".parse(), Ok(Segment::Argument));
    assert_eq!("pointer".parse(), Ok(Segment::Pointer));
    assert!("frame".parse::<Segment>().is_err());
    assert_eq!(Segment::Temp.max_index(), Some(7));
    assert_eq!(Segment::Local.max_index(), None);
    assert_eq!(Segment::Constant.to_string(), "constant");
}
