use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstrKind {
    /// Opcode digit followed by a 3-hex-digit address.
    MemoryReference,
    /// Full 4-hex-digit code, no operand.
    RegisterReference,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mnemonic {
    // Memory-reference
    And,
    Add,
    Lda,
    Sta,
    Bun,
    Bsa,
    Isz,
    // Register-reference
    Cla,
    Cle,
    Cma,
    Cme,
    Cir,
    Cil,
    Inc,
    Spa,
    Sna,
    Sza,
    Sze,
    Hlt,
}

#[derive(Debug, Clone, Copy)]
pub struct InstrDesc {
    pub mnemonic: Mnemonic,
    pub name: &'static str,
    /// One digit for memory-reference, four digits for register-reference.
    pub code: &'static str,
    /// `code` as a number.
    pub value: u16,
    pub kind: InstrKind,
}

const fn mri(mnemonic: Mnemonic, name: &'static str, code: &'static str, value: u16) -> InstrDesc {
    InstrDesc { mnemonic, name, code, value, kind: InstrKind::MemoryReference }
}

const fn rri(mnemonic: Mnemonic, name: &'static str, code: &'static str, value: u16) -> InstrDesc {
    InstrDesc { mnemonic, name, code, value, kind: InstrKind::RegisterReference }
}

pub const TABLE: &[InstrDesc] = &[
    mri(Mnemonic::And, "AND", "8", 0x8),
    mri(Mnemonic::Add, "ADD", "9", 0x9),
    mri(Mnemonic::Lda, "LDA", "A", 0xA),
    mri(Mnemonic::Sta, "STA", "B", 0xB),
    mri(Mnemonic::Bun, "BUN", "C", 0xC),
    mri(Mnemonic::Bsa, "BSA", "D", 0xD),
    mri(Mnemonic::Isz, "ISZ", "E", 0xE),
    rri(Mnemonic::Cla, "CLA", "7800", 0x7800),
    rri(Mnemonic::Cle, "CLE", "7400", 0x7400),
    rri(Mnemonic::Cma, "CMA", "7200", 0x7200),
    rri(Mnemonic::Cme, "CME", "7100", 0x7100),
    rri(Mnemonic::Cir, "CIR", "7080", 0x7080),
    rri(Mnemonic::Cil, "CIL", "7040", 0x7040),
    rri(Mnemonic::Inc, "INC", "7020", 0x7020),
    rri(Mnemonic::Spa, "SPA", "7010", 0x7010),
    rri(Mnemonic::Sna, "SNA", "7008", 0x7008),
    rri(Mnemonic::Sza, "SZA", "7004", 0x7004),
    rri(Mnemonic::Sze, "SZE", "7002", 0x7002),
    rri(Mnemonic::Hlt, "HLT", "7001", 0x7001),
];

impl Mnemonic {
    pub const ALL: [Mnemonic; 19] = [
        Mnemonic::And,
        Mnemonic::Add,
        Mnemonic::Lda,
        Mnemonic::Sta,
        Mnemonic::Bun,
        Mnemonic::Bsa,
        Mnemonic::Isz,
        Mnemonic::Cla,
        Mnemonic::Cle,
        Mnemonic::Cma,
        Mnemonic::Cme,
        Mnemonic::Cir,
        Mnemonic::Cil,
        Mnemonic::Inc,
        Mnemonic::Spa,
        Mnemonic::Sna,
        Mnemonic::Sza,
        Mnemonic::Sze,
        Mnemonic::Hlt,
    ];

    pub fn desc(self) -> &'static InstrDesc {
        // TABLE is ordered like the enum declaration.
        &TABLE[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.desc().name
    }

    pub fn code(self) -> &'static str {
        self.desc().code
    }

    pub fn value(self) -> u16 {
        self.desc().value
    }

    pub fn kind(self) -> InstrKind {
        self.desc().kind
    }

    /// Case-sensitive lookup by mnemonic text.
    pub fn from_name(name: &str) -> Option<Self> {
        TABLE.iter().find(|d| d.name == name).map(|d| d.mnemonic)
    }

    /// Exact match against the 4-digit register-reference codes.
    pub fn from_register_code(code: &str) -> Option<Self> {
        TABLE
            .iter()
            .find(|d| d.kind == InstrKind::RegisterReference && d.code == code)
            .map(|d| d.mnemonic)
    }

    /// Memory-reference opcode digit (`8`..=`E`, upper case).
    pub fn from_opcode_digit(digit: char) -> Option<Self> {
        let mut buf = [0u8; 4];
        let digit: &str = digit.encode_utf8(&mut buf);
        TABLE
            .iter()
            .find(|d| d.kind == InstrKind::MemoryReference && d.code == digit)
            .map(|d| d.mnemonic)
    }
}

impl std::fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn table_follows_enum_order() {
        for m in Mnemonic::ALL {
            assert_eq!(m.desc().mnemonic, m);
        }
        assert_eq!(TABLE.len(), Mnemonic::ALL.len());
    }

    #[test]
    fn table_is_a_bijection() {
        let names: HashSet<_> = TABLE.iter().map(|d| d.name).collect();
        let codes: HashSet<_> = TABLE.iter().map(|d| d.code).collect();
        assert_eq!(names.len(), TABLE.len());
        assert_eq!(codes.len(), TABLE.len());
    }

    #[test]
    fn code_widths_match_kind() {
        for d in TABLE {
            match d.kind {
                InstrKind::MemoryReference => assert_eq!(d.code.len(), 1, "{}", d.name),
                InstrKind::RegisterReference => assert_eq!(d.code.len(), 4, "{}", d.name),
            }
            assert_eq!(u16::from_str_radix(d.code, 16).unwrap(), d.value, "{}", d.name);
        }
    }

    #[test]
    fn lookups() {
        assert_eq!(Mnemonic::from_name("LDA"), Some(Mnemonic::Lda));
        assert_eq!(Mnemonic::from_name("lda"), None);
        assert_eq!(Mnemonic::from_register_code("7001"), Some(Mnemonic::Hlt));
        assert_eq!(Mnemonic::from_register_code("A"), None);
        assert_eq!(Mnemonic::from_opcode_digit('E'), Some(Mnemonic::Isz));
        assert_eq!(Mnemonic::from_opcode_digit('7'), None);
        assert_eq!(Mnemonic::from_opcode_digit('1'), None);
        assert_eq!(Mnemonic::Cir.to_string(), "CIR");
    }
}
