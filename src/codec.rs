use serde::{Deserialize, Serialize};

use crate::opcode::{InstrKind, Mnemonic};
use crate::registers::Touched;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Input is empty")]
    EmptyInput,
    #[error("Invalid instruction {0}")]
    InvalidInstruction(String),
    #[error("Invalid machine code {0}")]
    InvalidMachineCode(String),
    #[error("Malformed line {0:?}")]
    MalformedLine(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Mnemonic to hex.
    Assemble,
    /// Hex to mnemonic.
    Disassemble,
}

/// One successfully translated line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translated {
    pub text: String,
    pub mnemonic: Mnemonic,
    /// Full instruction word, loaded into IR.
    pub code: u32,
    /// Address operand of memory-reference instructions, loaded into AR.
    pub operand: Option<u32>,
}

impl Translated {
    fn register_ref(mnemonic: Mnemonic, text: String) -> Self {
        Self { text, mnemonic, code: u32::from(mnemonic.value()), operand: None }
    }

    fn memory_ref(mnemonic: Mnemonic, addr: u32, text: String) -> Self {
        Self {
            text,
            mnemonic,
            code: (u32::from(mnemonic.value()) << 12) | addr,
            operand: Some(addr),
        }
    }

    /// Registers the session writes for this line.
    pub fn writes(&self) -> Touched {
        match self.operand {
            Some(_) => Touched::IR | Touched::AR | Touched::PC,
            None => Touched::IR | Touched::PC,
        }
    }
}

pub trait Translator {
    fn direction(&self) -> Direction;
    fn translate_line(&self, line: &str) -> Result<Translated, CodecError>;
}

/// `LDA 100` -> `A100`, `HLT` -> `7001`.
pub struct Assembler;

/// `A100` -> `LDA 100`, `7001` -> `HLT`.
pub struct Disassembler;

impl Translator for Assembler {
    fn direction(&self) -> Direction {
        Direction::Assemble
    }

    fn translate_line(&self, line: &str) -> Result<Translated, CodecError> {
        let malformed = || CodecError::MalformedLine(line.trim().to_string());
        let lookup = |name: &str| {
            Mnemonic::from_name(name).ok_or_else(|| CodecError::InvalidInstruction(name.to_string()))
        };
        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts.as_slice() {
            [name] => {
                let m = lookup(*name)?;
                if m.kind() != InstrKind::RegisterReference {
                    return Err(malformed());
                }
                Ok(Translated::register_ref(m, m.code().to_string()))
            }
            [name, operand] => {
                let m = lookup(*name)?;
                if m.kind() != InstrKind::MemoryReference {
                    return Err(malformed());
                }
                let addr = parse_address(*operand).ok_or_else(malformed)?;
                Ok(Translated::memory_ref(m, addr, format!("{}{}", m.code(), operand)))
            }
            _ => Err(malformed()),
        }
    }
}

impl Translator for Disassembler {
    fn direction(&self) -> Direction {
        Direction::Disassemble
    }

    fn translate_line(&self, line: &str) -> Result<Translated, CodecError> {
        let line = line.trim();
        let invalid = || CodecError::InvalidMachineCode(line.to_string());
        if line.len() == 4 {
            if let Some(m) = Mnemonic::from_register_code(line) {
                return Ok(Translated::register_ref(m, m.name().to_string()));
            }
        }
        let mut chars = line.chars();
        let digit = chars.next().ok_or_else(invalid)?;
        let m = Mnemonic::from_opcode_digit(digit).ok_or_else(invalid)?;
        let operand = chars.as_str();
        let addr = parse_address(operand).ok_or_else(invalid)?;
        Ok(Translated::memory_ref(m, addr, format!("{} {}", m.name(), operand)))
    }
}

/// Exactly three hex digits.
pub fn parse_address(s: &str) -> Option<u32> {
    if s.len() != 3 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(s, 16).ok()
}
