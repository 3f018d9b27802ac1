/// Classic BPF instruction in the layout the kernel loads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RawInstruction {
    /// Operation code
    pub op: u16,
    /// Jump offset if true
    pub jt: u8,
    /// Jump offset if false
    pub jf: u8,
    /// Constant operand
    pub k: u32,
}

impl RawInstruction {
    pub const fn new(op: u16, jt: u8, jf: u8, k: u32) -> Self {
        Self { op, jt, jf, k }
    }
}

/// `ret #k`: accept `k` bytes of the packet (0 drops it).
pub const fn ret(k: u32) -> RawInstruction {
    // BPF_RET | BPF_K
    RawInstruction::new(0x06, 0, 0, k)
}
