use crate::codec::{Assembler, CodecError, Direction, Disassembler, Translated, Translator};
use crate::registers::{Register, RegisterBank};

/// A translation session: the single owner of one register bank.
#[derive(Debug, Clone, Default)]
pub struct Session {
    bank: RegisterBank,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bank(bank: RegisterBank) -> Self {
        Self { bank }
    }

    pub fn bank(&self) -> &RegisterBank {
        &self.bank
    }

    pub fn into_bank(self) -> RegisterBank {
        self.bank
    }

    pub fn assemble<S: AsRef<str>>(&mut self, lines: &[S]) -> Result<Vec<String>, CodecError> {
        self.run_text(&Assembler, lines)
    }

    pub fn disassemble<S: AsRef<str>>(&mut self, lines: &[S]) -> Result<Vec<String>, CodecError> {
        self.run_text(&Disassembler, lines)
    }

    pub fn translate<S: AsRef<str>>(
        &mut self,
        direction: Direction,
        lines: &[S],
    ) -> Result<Vec<String>, CodecError> {
        match direction {
            Direction::Assemble => self.assemble(lines),
            Direction::Disassemble => self.disassemble(lines),
        }
    }

    fn run_text<T: Translator, S: AsRef<str>>(
        &mut self,
        t: &T,
        lines: &[S],
    ) -> Result<Vec<String>, CodecError> {
        Ok(self.run(t, lines)?.into_iter().map(|tr| tr.text).collect())
    }

    /// Translate a batch line by line. Registers written for lines before a
    /// failing one stay written; no output is returned for a failed batch.
    pub fn run<T: Translator, S: AsRef<str>>(
        &mut self,
        t: &T,
        lines: &[S],
    ) -> Result<Vec<Translated>, CodecError> {
        if lines.is_empty() {
            return Err(CodecError::EmptyInput);
        }
        tracing::debug!(direction = ?t.direction(), lines = lines.len(), "translating batch");
        let mut out = Vec::with_capacity(lines.len());
        for (idx, line) in lines.iter().enumerate() {
            let tr = t.translate_line(line.as_ref()).map_err(|err| {
                tracing::warn!(line = idx + 1, %err, "batch aborted");
                err
            })?;
            self.apply(&tr);
            out.push(tr);
        }
        tracing::debug!(pc = self.bank.get(Register::Pc), "batch translated");
        Ok(out)
    }

    fn apply(&mut self, tr: &Translated) {
        self.bank.update(Register::Ir, tr.code);
        if let Some(addr) = tr.operand {
            self.bank.update(Register::Ar, addr);
        }
        self.bank.increment_pc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registers::{Operation, Snapshot};
    use pretty_assertions::assert_eq;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    fn fixed_clock() -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(86_400 * 365)
    }

    #[test]
    fn program_assembles_and_tracks_registers() {
        let mut s = Session::new();
        let out = s.assemble(&["LDA 100", "ADD 101", "STA 102", "HLT"]).unwrap();
        assert_eq!(out, vec!["A100", "9101", "B102", "7001"]);
        let regs = s.bank().snapshot();
        assert_eq!(regs.pc, 4);
        assert_eq!(regs.ir, 0x7001);
        assert_eq!(regs.ar, 0x102);
        assert_eq!(regs.dr, 0);
        assert_eq!(regs.ac, 0);
        // 3 x (IR, AR, PC) + (IR, PC)
        assert_eq!(s.bank().log().len(), 11);
    }

    #[test]
    fn log_order_per_line() {
        let mut s = Session::new();
        s.disassemble(&["A100"]).unwrap();
        let ops: Vec<_> = s.bank().log().iter().map(|e| (e.operation, e.register, e.value)).collect();
        assert_eq!(
            ops,
            vec![
                (Operation::Update, Register::Ir, 0xA100),
                (Operation::Update, Register::Ar, 0x100),
                (Operation::Increment, Register::Pc, 1),
            ]
        );
    }

    #[test]
    fn empty_batch_touches_nothing() {
        let mut s = Session::new();
        let none: [&str; 0] = [];
        assert_eq!(s.assemble(&none), Err(CodecError::EmptyInput));
        assert_eq!(s.disassemble(&none), Err(CodecError::EmptyInput));
        assert!(s.bank().log().is_empty());
        assert_eq!(s.bank().snapshot(), Snapshot::default());
    }

    #[test]
    fn failure_keeps_earlier_side_effects() {
        let mut s = Session::new();
        let err = s.assemble(&["CLA", "BAD", "HLT"]).unwrap_err();
        assert_eq!(err, CodecError::InvalidInstruction("BAD".into()));
        assert_eq!(s.bank().get(Register::Pc), 1);
        assert_eq!(s.bank().get(Register::Ir), 0x7800);
        assert_eq!(s.bank().log().len(), 2);
    }

    #[test]
    fn pc_continues_across_batches() {
        let mut s = Session::new();
        s.translate(Direction::Assemble, &["CLA"]).unwrap();
        s.translate(Direction::Disassemble, &["7001".to_string()]).unwrap();
        assert_eq!(s.bank().get(Register::Pc), 2);
    }

    #[test]
    fn supplied_bank_is_used_and_handed_back() {
        let mut s = Session::with_bank(RegisterBank::with_clock(fixed_clock));
        s.assemble(&["ISZ 0FF"]).unwrap();
        let bank = s.into_bank();
        assert_eq!(bank.get(Register::Ir), 0xE0FF);
        assert_eq!(bank.log().len(), 3);
        assert!(bank.log().iter().all(|e| e.timestamp == "1971-01-01 00:00:00"));
    }
}
