use crate::error::{Error, MalformedCommand};
use crate::parser::{AluOp, Command};
use arch::jump::Jump;
use arch::reg::Reg;
use arch::seg::Segment;
use std::io::Write;

/// Emits Hack assembly for one translation unit. Owns the output sink, the
/// file-scoped basename and the counter behind comparison branch labels.
/// The basename never changes and the counter never resets, so every
/// comparison gets a label pair no other comparison in the output shares.
pub struct CodeWriter<W: Write> {
    out: W,
    basename: String,
    label_seq: usize,
}

impl<W: Write> CodeWriter<W> {
    pub fn new(basename: &str, out: W) -> Self {
        CodeWriter {
            out,
            basename: basename.to_string(),
            label_seq: 0,
        }
    }

    fn unique_label(&mut self, prefix: &str) -> String {
        let label = format!("{}${}", prefix, self.label_seq);
        self.label_seq += 1;
        label
    }

    fn scope_label(&self, label: &str) -> String {
        format!("{}${}", self.basename, label)
    }

    fn static_symbol(&self, index: u16) -> String {
        format!("{}.{}", self.basename, index)
    }

    pub fn write(&mut self, command: &Command) -> Result<(), Error> {
        match command {
            Command::Alu(op) => self.alu(*op),
            Command::Push(seg, index) => self.push(*seg, *index),
            Command::Pop(seg, index) => self.pop(*seg, *index),
            Command::Label(name) => self.label(name),
            Command::Goto(name) => self.goto(name),
            Command::IfGoto(name) => self.if_goto(name),
            Command::Function(name, n_locals) => self.function(name, *n_locals),
            Command::Return => self.ret(),
            Command::Call(..) => Err(Error::CallNotImplemented),
        }
    }

    /// Halting loop. Every translation ends here so execution never runs past
    /// the last generated instruction.
    pub fn finish(mut self) -> Result<(), Error> {
        writeln!(
            self.out,
            "(END)\n\
             @END\n\
             0;JMP"
        )?;
        self.out.flush()?;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // push / pop

    fn push(&mut self, segment: Segment, index: u16) -> Result<(), Error> {
        match segment {
            Segment::Constant => self.push_constant(index),
            Segment::Local => self.push_base(Reg::LCL, index),
            Segment::Argument => self.push_base(Reg::ARG, index),
            Segment::This => self.push_base(Reg::THIS, index),
            Segment::That => self.push_base(Reg::THAT, index),
            Segment::Temp => {
                let slot = temp_slot(index)?;
                self.push_direct(&slot.to_string())
            }
            Segment::Pointer => {
                let reg = pointer_reg(index)?;
                self.push_direct(&reg.to_string())
            }
            Segment::Static => {
                let symbol = self.static_symbol(index);
                self.push_direct(&symbol)
            }
        }
    }

    fn pop(&mut self, segment: Segment, index: u16) -> Result<(), Error> {
        match segment {
            Segment::Constant => Err(MalformedCommand::PopConstant.into()),
            Segment::Local => self.pop_base(Reg::LCL, index),
            Segment::Argument => self.pop_base(Reg::ARG, index),
            Segment::This => self.pop_base(Reg::THIS, index),
            Segment::That => self.pop_base(Reg::THAT, index),
            Segment::Temp => {
                let slot = temp_slot(index)?;
                self.pop_direct(&slot.to_string())
            }
            Segment::Pointer => {
                let reg = pointer_reg(index)?;
                self.pop_direct(&reg.to_string())
            }
            Segment::Static => {
                let symbol = self.static_symbol(index);
                self.pop_direct(&symbol)
            }
        }
    }

    fn push_constant(&mut self, index: u16) -> Result<(), Error> {
        writeln!(
            self.out,
            "@{index}\n\
             D=A\n\
             @SP\n\
             A=M\n\
             M=D\n\
             @SP\n\
             M=M+1"
        )?;
        Ok(())
    }

    // *(base + index) -> top of stack
    fn push_base(&mut self, base: Reg, index: u16) -> Result<(), Error> {
        writeln!(
            self.out,
            "@{base}\n\
             D=M\n\
             @{index}\n\
             A=D+A\n\
             D=M\n\
             @SP\n\
             A=M\n\
             M=D\n\
             @SP\n\
             M=M+1"
        )?;
        Ok(())
    }

    // cell at `symbol` -> top of stack
    fn push_direct(&mut self, symbol: &str) -> Result<(), Error> {
        writeln!(
            self.out,
            "@{symbol}\n\
             D=M\n\
             @SP\n\
             A=M\n\
             M=D\n\
             @SP\n\
             M=M+1"
        )?;
        Ok(())
    }

    // top of stack -> *(base + index), target address parked in R13
    fn pop_base(&mut self, base: Reg, index: u16) -> Result<(), Error> {
        writeln!(
            self.out,
            "@{base}\n\
             D=M\n\
             @{index}\n\
             D=D+A\n\
             @{r13}\n\
             M=D\n\
             @SP\n\
             AM=M-1\n\
             D=M\n\
             @{r13}\n\
             A=M\n\
             M=D",
            r13 = Reg::R13
        )?;
        Ok(())
    }

    // top of stack -> cell at `symbol`
    fn pop_direct(&mut self, symbol: &str) -> Result<(), Error> {
        writeln!(
            self.out,
            "@SP\n\
             AM=M-1\n\
             D=M\n\
             @{symbol}\n\
             M=D"
        )?;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // arithmetic / logic

    fn alu(&mut self, op: AluOp) -> Result<(), Error> {
        match op {
            AluOp::Add => self.binary("M=D+M"),
            AluOp::Sub => self.binary("M=M-D"),
            AluOp::And => self.binary("M=D&M"),
            AluOp::Or => self.binary("M=D|M"),
            AluOp::Neg => self.unary("M=-M"),
            AluOp::Not => self.unary("M=!M"),
            AluOp::Eq => self.compare("EQ", Jump::JEQ),
            AluOp::Gt => self.compare("GT", Jump::JGT),
            AluOp::Lt => self.compare("LT", Jump::JLT),
        }
    }

    // pop y into D, overwrite x in place
    fn binary(&mut self, assign: &str) -> Result<(), Error> {
        writeln!(
            self.out,
            "@SP\n\
             AM=M-1\n\
             D=M\n\
             @SP\n\
             A=M-1\n\
             {assign}"
        )?;
        Ok(())
    }

    fn unary(&mut self, assign: &str) -> Result<(), Error> {
        writeln!(
            self.out,
            "@SP\n\
             A=M-1\n\
             {assign}"
        )?;
        Ok(())
    }

    // x <op> y via the sign of x - y. The difference wraps at the word
    // boundary and is not corrected, so operands more than 2^15 apart compare
    // the wrong way round.
    fn compare(&mut self, prefix: &str, jump: Jump) -> Result<(), Error> {
        let true_label = self.unique_label(&format!("{prefix}_TRUE"));
        let end_label = self.unique_label(&format!("{prefix}_END"));
        writeln!(
            self.out,
            "@SP\n\
             AM=M-1\n\
             D=M\n\
             @SP\n\
             A=M-1\n\
             D=M-D\n\
             @{true_label}\n\
             D;{jump}\n\
             @SP\n\
             A=M-1\n\
             M=0\n\
             @{end_label}\n\
             0;JMP\n\
             ({true_label})\n\
             @SP\n\
             A=M-1\n\
             M=-1\n\
             ({end_label})"
        )?;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // branching

    fn label(&mut self, name: &str) -> Result<(), Error> {
        writeln!(self.out, "({})", self.scope_label(name))?;
        Ok(())
    }

    fn goto(&mut self, name: &str) -> Result<(), Error> {
        writeln!(
            self.out,
            "@{target}\n\
             0;JMP",
            target = self.scope_label(name)
        )?;
        Ok(())
    }

    // taken for any nonzero value, not only the canonical true encoding
    fn if_goto(&mut self, name: &str) -> Result<(), Error> {
        writeln!(
            self.out,
            "@SP\n\
             AM=M-1\n\
             D=M\n\
             @{target}\n\
             D;{jne}",
            target = self.scope_label(name),
            jne = Jump::JNE
        )?;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // subroutines

    // The entry label is deliberately unqualified: callers address a function
    // by its own name, and name uniqueness across files is the caller's
    // contract. The locals are zero-initialized by pushing, which also grows
    // the stack past the frame base.
    fn function(&mut self, name: &str, n_locals: u16) -> Result<(), Error> {
        writeln!(self.out, "({name})")?;
        for _ in 0..n_locals {
            self.push_constant(0)?;
        }
        Ok(())
    }

    // Frame teardown. R13 snapshots the frame base before LCL is overwritten,
    // R14 holds the return address fetched from *(frame - 5). The saved block
    // below the frame is [return address, LCL, ARG, THIS, THAT], so the
    // restore order walking R13 downward is THAT, THIS, ARG, LCL.
    fn ret(&mut self) -> Result<(), Error> {
        writeln!(
            self.out,
            "@{lcl}\n\
             D=M\n\
             @{r13}\n\
             M=D\n\
             @5\n\
             A=D-A\n\
             D=M\n\
             @{r14}\n\
             M=D\n\
             @SP\n\
             AM=M-1\n\
             D=M\n\
             @{arg}\n\
             A=M\n\
             M=D\n\
             @{arg}\n\
             D=M+1\n\
             @SP\n\
             M=D",
            lcl = Reg::LCL,
            arg = Reg::ARG,
            r13 = Reg::R13,
            r14 = Reg::R14
        )?;
        for reg in [Reg::THAT, Reg::THIS, Reg::ARG, Reg::LCL] {
            writeln!(
                self.out,
                "@{r13}\n\
                 AM=M-1\n\
                 D=M\n\
                 @{reg}\n\
                 M=D",
                r13 = Reg::R13
            )?;
        }
        writeln!(
            self.out,
            "@{r14}\n\
             A=M\n\
             0;JMP",
            r14 = Reg::R14
        )?;
        Ok(())
    }
}

fn pointer_reg(index: u16) -> Result<Reg, MalformedCommand> {
    match index {
        0 => Ok(Reg::THIS),
        1 => Ok(Reg::THAT),
        _ => Err(MalformedCommand::IndexOutOfRange {
            seg: Segment::Pointer,
            index,
            max: 1,
        }),
    }
}

fn temp_slot(index: u16) -> Result<Reg, MalformedCommand> {
    Reg::temp(index).ok_or(MalformedCommand::IndexOutOfRange {
        seg: Segment::Temp,
        index,
        max: 7,
    })
}
