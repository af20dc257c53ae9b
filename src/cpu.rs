mod instr;
mod keypad;
mod mem;
mod regs;
mod screen;
mod stack;
mod timers;

pub use instr::Instr;
pub use keypad::Keypad;
pub use mem::Mem;
pub use regs::Regs;
pub use screen::{Frame, Point, Screen, HEIGHT, WIDTH};
pub use stack::Stack;
pub use timers::Timers;

use crate::error::{Result, VmError};
use log::{debug, info, trace};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::time::Duration;

/// Whether the interpreter is executing, or parked on an `FX0A`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running,
    WaitingForKey { x: u8 },
}

/// What a call to [`Chip8::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Executed(Instr),
    /// Still waiting for a key; nothing changed.
    Waiting,
    /// The pending `FX0A` completed with this key.
    KeyReceived(u8),
}

/// How the program counter moves after an instruction.
enum Flow {
    Next,
    Skip,
    Goto(u16),
    Stay,
}

/// The whole machine. Each instance is independent; the frontend drives it
/// through [`Chip8::step`], [`Chip8::tick_timers`] and the keypad.
///
/// Quirks follow the original COSMAC VIP interpreter:
/// * `8XY6`/`8XYE` shift `VY` into `VX`.
/// * `8XY1`/`8XY2`/`8XY3` reset `VF`.
/// * `FX55`/`FX65` leave `I` just past the last register transferred.
/// * `BNNN` jumps to `NNN + V0`.
#[derive(Debug)]
pub struct Chip8 {
    pc: u16,
    i: u16,
    stack: Stack,
    v: Regs,
    mem: Mem,
    screen: Screen,
    keypad: Keypad,
    timers: Timers,
    state: State,
    rng: StdRng,
}

impl Chip8 {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// A machine whose `CXKK` results are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            pc: Mem::ROM_START,
            i: 0,
            stack: Stack::new(),
            v: Regs::new(),
            mem: Mem::new(),
            screen: Screen::new(),
            keypad: Keypad::new(),
            timers: Timers::new(),
            state: State::Running,
            rng,
        }
    }

    /// Back to power-on state. The loaded program is discarded too.
    pub fn reset(&mut self) {
        debug!("reset");
        self.pc = Mem::ROM_START;
        self.i = 0;
        self.stack = Stack::new();
        self.v = Regs::new();
        self.mem.reset();
        self.screen.clear();
        self.keypad.release_all();
        self.timers = Timers::new();
        self.state = State::Running;
    }

    pub fn load_program(&mut self, rom: &[u8]) -> Result<()> {
        self.mem.load_program(rom)?;
        info!("loaded {} byte program at 0x{:03x}", rom.len(), Mem::ROM_START);
        Ok(())
    }

    /// The instruction word at the program counter.
    pub fn fetch_opcode(&self) -> Result<u16> {
        self.mem.read_word(self.pc as usize)
    }

    /// Run one fetch-decode-execute cycle.
    ///
    /// On error nothing about the failing instruction has been applied, and
    /// the machine shouldn't be stepped again.
    pub fn step(&mut self) -> Result<Step> {
        if let State::WaitingForKey { x } = self.state {
            let Some(key) = self.keypad.first_pressed() else {
                return Ok(Step::Waiting);
            };
            debug!("key 0x{key:x} pressed, resuming");
            self.v[x] = key;
            self.state = State::Running;
            self.pc = self.pc.wrapping_add(2);
            return Ok(Step::KeyReceived(key));
        }

        let pc = self.pc;
        let opcode = self.fetch_opcode()?;
        let instr = Instr::decode(opcode).ok_or(VmError::UnknownOpcode { opcode, pc })?;
        trace!("0x{pc:04x}: {opcode:04x}  {instr}");

        let next = match self.execute(instr)? {
            Flow::Next => pc.wrapping_add(2),
            Flow::Skip => pc.wrapping_add(4),
            Flow::Goto(addr) => addr,
            Flow::Stay => pc,
        };
        self.pc = next;

        Ok(Step::Executed(instr))
    }

    fn execute(&mut self, instr: Instr) -> Result<Flow> {
        use Instr::*;

        let flow = match instr {
            Sys { .. } => Flow::Next,
            ClearScreen => {
                self.screen.clear();
                Flow::Next
            }
            Return => Flow::Goto(self.stack.pop()?),
            Jump { addr } => Flow::Goto(addr),
            Call { addr } => {
                self.stack.push(self.pc.wrapping_add(2))?;
                Flow::Goto(addr)
            }
            SkipEqImm { x, k } => skip_if(self.v[x] == k),
            SkipNeImm { x, k } => skip_if(self.v[x] != k),
            SkipEqReg { x, y } => skip_if(self.v[x] == self.v[y]),
            SkipNeReg { x, y } => skip_if(self.v[x] != self.v[y]),
            LoadImm { x, k } => {
                self.v[x] = k;
                Flow::Next
            }
            AddImm { x, k } => {
                self.v[x] = self.v[x].wrapping_add(k);
                Flow::Next
            }
            Move { x, y } => {
                self.v[x] = self.v[y];
                Flow::Next
            }
            Or { x, y } => {
                self.v[x] |= self.v[y];
                self.v.set_flag(false);
                Flow::Next
            }
            And { x, y } => {
                self.v[x] &= self.v[y];
                self.v.set_flag(false);
                Flow::Next
            }
            Xor { x, y } => {
                self.v[x] ^= self.v[y];
                self.v.set_flag(false);
                Flow::Next
            }
            Add { x, y } => {
                let (sum, carry) = self.v[x].overflowing_add(self.v[y]);
                self.v[x] = sum;
                self.v.set_flag(carry);
                Flow::Next
            }
            Sub { x, y } => {
                let (diff, borrow) = self.v[x].overflowing_sub(self.v[y]);
                self.v[x] = diff;
                self.v.set_flag(!borrow);
                Flow::Next
            }
            SubReversed { x, y } => {
                // y - x
                let (diff, borrow) = self.v[y].overflowing_sub(self.v[x]);
                self.v[x] = diff;
                self.v.set_flag(!borrow);
                Flow::Next
            }
            ShiftRight { x, y } => {
                let src = self.v[y];
                self.v[x] = src >> 1;
                self.v.set_flag(src & 0x01 != 0);
                Flow::Next
            }
            ShiftLeft { x, y } => {
                let src = self.v[y];
                self.v[x] = src << 1;
                self.v.set_flag(src & 0x80 != 0);
                Flow::Next
            }
            LoadI { addr } => {
                self.i = addr;
                Flow::Next
            }
            JumpOffset { addr } => Flow::Goto(addr + self.v[0] as u16),
            Random { x, k } => {
                self.v[x] = self.rng.gen::<u8>() & k;
                Flow::Next
            }
            Draw { x, y, n } => {
                self.draw_sprite(x, y, n)?;
                Flow::Next
            }
            SkipKeyPressed { x } => skip_if(self.keypad.is_key_pressed(self.v[x])),
            SkipKeyNotPressed { x } => skip_if(!self.keypad.is_key_pressed(self.v[x])),
            GetDelay { x } => {
                self.v[x] = self.timers.delay();
                Flow::Next
            }
            WaitKey { x } => {
                debug!("waiting for a key into V{x:X}");
                self.state = State::WaitingForKey { x };
                Flow::Stay
            }
            SetDelay { x } => {
                self.timers.set_delay(self.v[x]);
                Flow::Next
            }
            SetSound { x } => {
                self.timers.set_sound(self.v[x]);
                Flow::Next
            }
            AddI { x } => {
                self.i = self.i.wrapping_add(self.v[x] as u16);
                Flow::Next
            }
            LoadFont { x } => {
                self.i = Mem::sprite_offset(self.v[x]);
                Flow::Next
            }
            StoreBcd { x } => {
                let bcd = bcd_from_u8(self.v[x]);
                self.mem
                    .slice_mut(self.i as usize, bcd.len())?
                    .copy_from_slice(&bcd);
                Flow::Next
            }
            StoreRegs { x } => {
                // Write registers to memory.
                let dst = self.mem.slice_mut(self.i as usize, x as usize + 1)?;
                for (reg, byte) in (0..=x).zip(dst) {
                    *byte = self.v[reg];
                }
                self.i = self.i.wrapping_add(x as u16 + 1);
                Flow::Next
            }
            LoadRegs { x } => {
                // Read memory into registers.
                let src = self.mem.slice(self.i as usize, x as usize + 1)?;
                for (reg, &byte) in (0..=x).zip(src) {
                    self.v[reg] = byte;
                }
                self.i = self.i.wrapping_add(x as u16 + 1);
                Flow::Next
            }
        };

        Ok(flow)
    }

    fn draw_sprite(&mut self, x: u8, y: u8, n: u8) -> Result<()> {
        let sprite = self.mem.slice(self.i as usize, n as usize)?;
        let xy = Point::from((self.v[x], self.v[y]));

        let collision = self.screen.draw_sprite(xy, sprite);
        self.v.set_flag(collision);
        Ok(())
    }

    /// Let `elapsed` wall-clock time pass for the delay and sound timers.
    pub fn tick_timers(&mut self, elapsed: Duration) -> u32 {
        self.timers.advance(elapsed)
    }

    /// True when the next instruction is a jump to itself: the program has
    /// finished and will spin forever.
    pub fn is_halted(&self) -> bool {
        self.state == State::Running && self.fetch_opcode().ok() == Some(0x1000 | self.pc)
    }

    pub fn frame(&self) -> Frame {
        self.screen.snapshot()
    }

    pub fn sound_active(&self) -> bool {
        self.timers.sound_active()
    }

    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    pub fn keypad_mut(&mut self) -> &mut Keypad {
        &mut self.keypad
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn i(&self) -> u16 {
        self.i
    }

    pub fn v(&self, x: u8) -> u8 {
        self.v[x]
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.depth()
    }

    pub fn delay_timer(&self) -> u8 {
        self.timers.delay()
    }

    pub fn sound_timer(&self) -> u8 {
        self.timers.sound()
    }

    pub fn read_byte(&self, addr: usize) -> Result<u8> {
        self.mem.read_byte(addr)
    }

    pub fn write_byte(&mut self, addr: usize, value: u8) -> Result<()> {
        self.mem.write_byte(addr, value)
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}

fn skip_if(cond: bool) -> Flow {
    if cond {
        Flow::Skip
    } else {
        Flow::Next
    }
}

/// Convert x to "big endian" binary coded decimal:
/// [hundreds, tens, ones]
fn bcd_from_u8(x: u8) -> [u8; 3] {
    [x / 100, x / 10 % 10, x % 10]
}
