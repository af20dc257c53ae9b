use std::fmt::{self, Display};

/// A decoded CHIP-8 instruction.
///
/// `x` and `y` are register numbers, `k` an 8-bit immediate, `addr` a 12-bit
/// address and `n` a 4-bit immediate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instr {
    /// 0NNN: call a machine-code routine. Not supported, executed as a no-op.
    Sys { addr: u16 },
    /// 00E0
    ClearScreen,
    /// 00EE
    Return,
    /// 1NNN
    Jump { addr: u16 },
    /// 2NNN
    Call { addr: u16 },
    /// 3XKK
    SkipEqImm { x: u8, k: u8 },
    /// 4XKK
    SkipNeImm { x: u8, k: u8 },
    /// 5XY0
    SkipEqReg { x: u8, y: u8 },
    /// 6XKK
    LoadImm { x: u8, k: u8 },
    /// 7XKK
    AddImm { x: u8, k: u8 },
    /// 8XY0
    Move { x: u8, y: u8 },
    /// 8XY1
    Or { x: u8, y: u8 },
    /// 8XY2
    And { x: u8, y: u8 },
    /// 8XY3
    Xor { x: u8, y: u8 },
    /// 8XY4
    Add { x: u8, y: u8 },
    /// 8XY5: VX - VY
    Sub { x: u8, y: u8 },
    /// 8XY6
    ShiftRight { x: u8, y: u8 },
    /// 8XY7: VY - VX
    SubReversed { x: u8, y: u8 },
    /// 8XYE
    ShiftLeft { x: u8, y: u8 },
    /// 9XY0
    SkipNeReg { x: u8, y: u8 },
    /// ANNN
    LoadI { addr: u16 },
    /// BNNN
    JumpOffset { addr: u16 },
    /// CXKK
    Random { x: u8, k: u8 },
    /// DXYN
    Draw { x: u8, y: u8, n: u8 },
    /// EX9E
    SkipKeyPressed { x: u8 },
    /// EXA1
    SkipKeyNotPressed { x: u8 },
    /// FX07
    GetDelay { x: u8 },
    /// FX0A
    WaitKey { x: u8 },
    /// FX15
    SetDelay { x: u8 },
    /// FX18
    SetSound { x: u8 },
    /// FX1E
    AddI { x: u8 },
    /// FX29
    LoadFont { x: u8 },
    /// FX33
    StoreBcd { x: u8 },
    /// FX55
    StoreRegs { x: u8 },
    /// FX65
    LoadRegs { x: u8 },
}

impl Instr {
    /// Returns `None` for words that don't encode any instruction.
    pub fn decode(instr: u16) -> Option<Self> {
        use Instr::*;

        let [op, x, y, n] = nibbles_from_u16(instr);
        let k = (instr & 0x00ff) as u8;
        let addr = instr & 0x0fff;

        let decoded = match op {
            0x0 => match instr {
                0x00e0 => ClearScreen,
                0x00ee => Return,
                _ => Sys { addr },
            },
            0x1 => Jump { addr },
            0x2 => Call { addr },
            0x3 => SkipEqImm { x, k },
            0x4 => SkipNeImm { x, k },
            0x5 if n == 0 => SkipEqReg { x, y },
            0x6 => LoadImm { x, k },
            0x7 => AddImm { x, k },
            0x8 => match n {
                0x0 => Move { x, y },
                0x1 => Or { x, y },
                0x2 => And { x, y },
                0x3 => Xor { x, y },
                0x4 => Add { x, y },
                0x5 => Sub { x, y },
                0x6 => ShiftRight { x, y },
                0x7 => SubReversed { x, y },
                0xe => ShiftLeft { x, y },
                _ => return None,
            },
            0x9 if n == 0 => SkipNeReg { x, y },
            0xa => LoadI { addr },
            0xb => JumpOffset { addr },
            0xc => Random { x, k },
            0xd => Draw { x, y, n },
            0xe => match k {
                0x9e => SkipKeyPressed { x },
                0xa1 => SkipKeyNotPressed { x },
                _ => return None,
            },
            0xf => match k {
                0x07 => GetDelay { x },
                0x0a => WaitKey { x },
                0x15 => SetDelay { x },
                0x18 => SetSound { x },
                0x1e => AddI { x },
                0x29 => LoadFont { x },
                0x33 => StoreBcd { x },
                0x55 => StoreRegs { x },
                0x65 => LoadRegs { x },
                _ => return None,
            },
            _ => return None,
        };

        Some(decoded)
    }
}

/// Conventional assembler mnemonics, for trace logs.
impl Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instr::*;

        match *self {
            Sys { addr } => write!(f, "SYS 0x{addr:03x}"),
            ClearScreen => write!(f, "CLS"),
            Return => write!(f, "RET"),
            Jump { addr } => write!(f, "JP 0x{addr:03x}"),
            Call { addr } => write!(f, "CALL 0x{addr:03x}"),
            SkipEqImm { x, k } => write!(f, "SE V{x:X}, 0x{k:02x}"),
            SkipNeImm { x, k } => write!(f, "SNE V{x:X}, 0x{k:02x}"),
            SkipEqReg { x, y } => write!(f, "SE V{x:X}, V{y:X}"),
            LoadImm { x, k } => write!(f, "LD V{x:X}, 0x{k:02x}"),
            AddImm { x, k } => write!(f, "ADD V{x:X}, 0x{k:02x}"),
            Move { x, y } => write!(f, "LD V{x:X}, V{y:X}"),
            Or { x, y } => write!(f, "OR V{x:X}, V{y:X}"),
            And { x, y } => write!(f, "AND V{x:X}, V{y:X}"),
            Xor { x, y } => write!(f, "XOR V{x:X}, V{y:X}"),
            Add { x, y } => write!(f, "ADD V{x:X}, V{y:X}"),
            Sub { x, y } => write!(f, "SUB V{x:X}, V{y:X}"),
            ShiftRight { x, y } => write!(f, "SHR V{x:X}, V{y:X}"),
            SubReversed { x, y } => write!(f, "SUBN V{x:X}, V{y:X}"),
            ShiftLeft { x, y } => write!(f, "SHL V{x:X}, V{y:X}"),
            SkipNeReg { x, y } => write!(f, "SNE V{x:X}, V{y:X}"),
            LoadI { addr } => write!(f, "LD I, 0x{addr:03x}"),
            JumpOffset { addr } => write!(f, "JP V0, 0x{addr:03x}"),
            Random { x, k } => write!(f, "RND V{x:X}, 0x{k:02x}"),
            Draw { x, y, n } => write!(f, "DRW V{x:X}, V{y:X}, {n}"),
            SkipKeyPressed { x } => write!(f, "SKP V{x:X}"),
            SkipKeyNotPressed { x } => write!(f, "SKNP V{x:X}"),
            GetDelay { x } => write!(f, "LD V{x:X}, DT"),
            WaitKey { x } => write!(f, "LD V{x:X}, K"),
            SetDelay { x } => write!(f, "LD DT, V{x:X}"),
            SetSound { x } => write!(f, "LD ST, V{x:X}"),
            AddI { x } => write!(f, "ADD I, V{x:X}"),
            LoadFont { x } => write!(f, "LD F, V{x:X}"),
            StoreBcd { x } => write!(f, "LD B, V{x:X}"),
            StoreRegs { x } => write!(f, "LD [I], V{x:X}"),
            LoadRegs { x } => write!(f, "LD V{x:X}, [I]"),
        }
    }
}

/// Big endian byte (and bit) order.
fn nibbles_from_u16(x: u16) -> [u8; 4] {
    let a = (x & 0xf000) >> (4 * 3);
    let b = (x & 0x0f00) >> (4 * 2);
    let c = (x & 0x00f0) >> 4;
    let d = x & 0x000f;
    [a, b, c, d].map(|n| n as u8)
}
