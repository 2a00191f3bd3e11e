use std::time::{SystemTime, UNIX_EPOCH};

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Register {
    #[serde(rename = "AR")]
    Ar, // Address register
    #[serde(rename = "PC")]
    Pc, // Program counter
    #[serde(rename = "DR")]
    Dr, // Data register
    #[serde(rename = "AC")]
    Ac, // Accumulator
    #[serde(rename = "IR")]
    Ir, // Instruction register
}

impl Register {
    /// Display order.
    pub const ALL: [Register; 5] = [Register::Ar, Register::Pc, Register::Dr, Register::Ac, Register::Ir];

    pub fn name(self) -> &'static str {
        match self {
            Register::Ar => "AR",
            Register::Pc => "PC",
            Register::Dr => "DR",
            Register::Ac => "AC",
            Register::Ir => "IR",
        }
    }
}

impl std::fmt::Display for Register {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

bitflags! {
/// Registers written while translating one line. DR and AC are never written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Touched: u8 {
const AR = 1 << 0;
const PC = 1 << 1;
const IR = 1 << 2;
}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "AR")]
    pub ar: u32,
    #[serde(rename = "PC")]
    pub pc: u32,
    #[serde(rename = "DR")]
    pub dr: u32,
    #[serde(rename = "AC")]
    pub ac: u32,
    #[serde(rename = "IR")]
    pub ir: u32,
}

impl Snapshot {
    pub fn get(&self, r: Register) -> u32 {
        match r {
            Register::Ar => self.ar,
            Register::Pc => self.pc,
            Register::Dr => self.dr,
            Register::Ac => self.ac,
            Register::Ir => self.ir,
        }
    }

    fn slot(&mut self, r: Register) -> &mut u32 {
        match r {
            Register::Ar => &mut self.ar,
            Register::Pc => &mut self.pc,
            Register::Dr => &mut self.dr,
            Register::Ac => &mut self.ac,
            Register::Ir => &mut self.ir,
        }
    }

    /// `(register, value)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Register, u32)> + '_ {
        Register::ALL.into_iter().map(move |r| (r, self.get(r)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    #[serde(rename = "UPDATE")]
    Update,
    #[serde(rename = "INCREMENT")]
    Increment,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Update => write!(f, "UPDATE"),
            Operation::Increment => write!(f, "INCREMENT"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "Operation")]
    pub operation: Operation,
    #[serde(rename = "Register")]
    pub register: Register,
    #[serde(rename = "Value")]
    pub value: u32,
    /// State after this entry's own change.
    #[serde(rename = "Registers")]
    pub registers: Snapshot,
}

pub type Clock = fn() -> SystemTime;

/// Register file mirrored during translation, plus its audit trail.
#[derive(Debug, Clone)]
pub struct RegisterBank {
    regs: Snapshot,
    log: Vec<LogEntry>,
    clock: Clock,
}

impl Default for RegisterBank {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterBank {
    pub fn new() -> Self {
        Self::with_clock(SystemTime::now)
    }

    pub fn with_clock(clock: Clock) -> Self {
        Self {
            regs: Snapshot::default(),
            log: Vec::new(),
            clock,
        }
    }

    pub fn get(&self, r: Register) -> u32 {
        self.regs.get(r)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.regs
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    pub fn update(&mut self, r: Register, value: u32) {
        *self.regs.slot(r) = value;
        self.record(Operation::Update, r, value);
    }

    pub fn increment_pc(&mut self) {
        let pc = self.regs.pc.wrapping_add(1);
        self.regs.pc = pc;
        self.record(Operation::Increment, Register::Pc, pc);
    }

    fn record(&mut self, operation: Operation, register: Register, value: u32) {
        tracing::trace!(%operation, %register, value, "register write");
        self.log.push(LogEntry {
            timestamp: format_timestamp((self.clock)()),
            operation,
            register,
            value,
            registers: self.regs,
        });
    }
}

/// `YYYY-MM-DD HH:MM:SS` in UTC, not the local time zone.
pub fn format_timestamp(t: SystemTime) -> String {
    let secs = t.duration_since(UNIX_EPOCH).unwrap_or_default().as_secs();
    let (year, month, day) = days_to_date(secs / 86400);
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
        year,
        month,
        day,
        (secs / 3600) % 24,
        (secs / 60) % 60,
        secs % 60
    )
}

// Civil date from days since the Unix epoch (Hinnant's algorithm).
fn days_to_date(days: u64) -> (u32, u32, u32) {
    let z = days as i64 + 719468;
    let era = z.div_euclid(146097);
    let doe = z.rem_euclid(146097) as u32;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let y = yoe as i64 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let y = if m <= 2 { y + 1 } else { y };
    (y as u32, m, d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn fixed_clock() -> SystemTime {
        // 2024-03-01 12:34:56 UTC
        UNIX_EPOCH + Duration::from_secs(1_709_296_496)
    }

    #[test]
    fn starts_zeroed_and_unlogged() {
        let bank = RegisterBank::new();
        assert!(bank.snapshot().iter().all(|(_, v)| v == 0));
        assert!(bank.log().is_empty());
    }

    #[test]
    fn snapshot_order_is_fixed() {
        let order: Vec<_> = RegisterBank::new().snapshot().iter().map(|(r, _)| r.name()).collect();
        assert_eq!(order, ["AR", "PC", "DR", "AC", "IR"]);
    }

    #[test]
    fn update_logs_state_after_write() {
        let mut bank = RegisterBank::with_clock(fixed_clock);
        bank.update(Register::Ir, 0x7001);
        bank.update(Register::Ar, 0x102);
        assert_eq!(bank.log().len(), 2);
        let last = &bank.log()[1];
        assert_eq!(last.operation, Operation::Update);
        assert_eq!(last.register, Register::Ar);
        assert_eq!(last.value, 0x102);
        assert_eq!(last.registers.ir, 0x7001);
        assert_eq!(last.registers.ar, 0x102);
        assert_eq!(bank.log()[0].registers.ar, 0);
        assert_eq!(last.timestamp, "2024-03-01 12:34:56");
    }

    #[test]
    fn increment_pc_logs_increment() {
        let mut bank = RegisterBank::new();
        bank.increment_pc();
        bank.increment_pc();
        assert_eq!(bank.get(Register::Pc), 2);
        let e = &bank.log()[1];
        assert_eq!(e.operation, Operation::Increment);
        assert_eq!(e.register, Register::Pc);
        assert_eq!(e.value, 2);
        assert_eq!(e.registers.pc, 2);
    }

    #[test]
    fn values_are_not_width_limited() {
        let mut bank = RegisterBank::new();
        bank.update(Register::Ac, 0x1_0000);
        assert_eq!(bank.get(Register::Ac), 0x1_0000);
    }

    #[test]
    fn log_entry_serializes_with_capitalized_field_names() {
        let mut bank = RegisterBank::with_clock(fixed_clock);
        bank.update(Register::Ir, 10);
        let json = serde_json::to_string(&bank.log()[0]).unwrap();
        assert_eq!(
            json,
            r#"{"Timestamp":"2024-03-01 12:34:56","Operation":"UPDATE","Register":"IR","Value":10,"Registers":{"AR":0,"PC":0,"DR":0,"AC":0,"IR":10}}"#
        );
    }

    #[test]
    fn epoch_formats() {
        assert_eq!(format_timestamp(UNIX_EPOCH), "1970-01-01 00:00:00");
    }

    #[test]
    fn touched_names_in_display_order() {
        let names: Vec<_> = Touched::all().iter_names().map(|(n, _)| n).collect();
        assert_eq!(names, ["AR", "PC", "IR"]);
    }
}
