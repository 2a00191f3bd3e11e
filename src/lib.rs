pub mod codec;
pub mod opcode;
pub mod registers;
pub mod session;
pub mod workspace;

pub use codec::{Assembler, CodecError, Direction, Disassembler, Translated, Translator};
pub use opcode::{InstrKind, Mnemonic};
pub use registers::{LogEntry, Operation, Register, RegisterBank, Snapshot, Touched};
pub use session::Session;
pub use workspace::{DataFile, Workspace, WorkspaceConfig};
