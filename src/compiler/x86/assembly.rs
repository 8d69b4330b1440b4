use std::fmt::*;

/*
Assembly DSL
Registers are prefixed with %
Segment overridden memory is written [%seg:%reg]
Each instruction is followed by a ;
Expressions to evaluate are in {}
Literals are emitted exactly as they are written in the Rust source
labels are prefixed with @, `here` is the current address ($)
```
let attr = 0x1E;
assembly!(
    (buffer) {
        mov %ax, 0xB800;
        mov %es, %ax;
        mov %ah, {Immediate::Byte(attr)};
    @clear_loop:
        mov [%es:%di], %al;
        loop @clear_loop;
        jmp here;
    }
)
```

would translate to:
```
    mov ax, 0xB800
    mov es, ax
    mov ah, 0x1E

clear_loop:
    mov [es:di], al
    loop clear_loop
    jmp $
```
*/

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Reg8 {
    Al,
    Ah,
}

impl Display for Reg8 {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        use Reg8::*;
        match self {
            Al => f.write_str("al"),
            Ah => f.write_str("ah"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Reg16 {
    Ax,
    Cx,
    Si,
    Di,
}

impl Display for Reg16 {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        use Reg16::*;
        match self {
            Ax => f.write_str("ax"),
            Cx => f.write_str("cx"),
            Si => f.write_str("si"),
            Di => f.write_str("di"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SegReg {
    Ds,
    Es,
}

impl Display for SegReg {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        use SegReg::*;
        match self {
            Ds => f.write_str("ds"),
            Es => f.write_str("es"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Reg {
    R8(Reg8),
    R16(Reg16),
    Seg(SegReg),
}

impl Display for Reg {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        use Reg::*;
        match self {
            R8(r8) => f.write_fmt(format_args!("{}", r8)),
            R16(r16) => f.write_fmt(format_args!("{}", r16)),
            Seg(seg) => f.write_fmt(format_args!("{}", seg)),
        }
    }
}

/// An immediate value computed while generating code.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Immediate {
    /// Written in decimal
    Dec(i64),
    /// Written as a two digit hex byte, e.g. `0x1E`
    Byte(u8),
}

impl Display for Immediate {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        use Immediate::*;
        match self {
            Dec(i) => f.write_fmt(format_args!("{}", i)),
            Byte(b) => f.write_fmt(format_args!("0x{:02X}", b)),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    Register(Reg),
    /// Memory addressed through a segment override: `[es:di]`
    Segmented(SegReg, Reg16),
    Label(String),
    Imm(Immediate),
    /// A literal taken verbatim from the code generator: `' '`, `0xB800`, `2000`
    Literal(&'static str),
    /// The address of the current instruction: `$`
    Here,
}

impl Display for Operand {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        use Operand::*;
        match self {
            Register(reg) => f.write_fmt(format_args!("{}", reg)),
            Segmented(seg, reg) => f.write_fmt(format_args!("[{}:{}]", seg, reg)),
            Label(lbl) => f.write_str(lbl),
            Imm(imm) => f.write_fmt(format_args!("{}", imm)),
            Literal(lit) => f.write_str(lit),
            Here => f.write_str("$"),
        }
    }
}

/// One item in a `db` declaration.
#[derive(Clone, Debug, PartialEq)]
pub enum DataItem {
    /// A quoted string literal; the text is written between double quotes as is
    Str(String),
    /// A byte written in decimal
    Byte(u8),
    /// A byte written in hex
    HexByte(u8),
}

impl Display for DataItem {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        use DataItem::*;
        match self {
            Str(s) => f.write_fmt(format_args!("\"{}\"", s)),
            Byte(b) => f.write_fmt(format_args!("{}", b)),
            HexByte(b) => f.write_fmt(format_args!("0x{:02X}", b)),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Inst {
    Bits(u8),
    Org(u16),
    Label(String),
    Data(Option<String>, Vec<DataItem>),
    /// Zero fill up to the given offset from the start of the section
    PadTo(u16),
    /// A line of source which is written to the output unchanged
    Verbatim(String),

    Jmp(Operand),
    Jz(Operand),
    Jne(Operand),
    Loop(Operand),
    Int(Operand),

    Cli,
    Sti,
    Hlt,
    Lodsb,

    Mov(Operand, Operand),
    Inc(Operand),
    Xor(Operand, Operand),
    Or(Operand, Operand),
    Cmp(Operand, Operand),
}

impl Display for Inst {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        use Inst::*;
        // Add separating newline?
        match self {
            Label(lbl) if !lbl.starts_with(".") => f.write_str("\n")?,
            _ => f.write_str("")?,
        };

        // Indent instruction?
        match self {
            Label(_) | Bits(_) | Org(_) | Verbatim(_) => (),
            _ => f.write_str("    ")?,
        };

        match self {
            Bits(b) => f.write_fmt(format_args!("bits {}", b)),
            Org(o) => f.write_fmt(format_args!("org 0x{:04X}", o)),
            Label(lbl) => f.write_fmt(format_args!("{}:", lbl)),
            Data(lbl, items) => {
                if let Some(lbl) = lbl {
                    f.write_fmt(format_args!("{}: ", lbl))?;
                }
                f.write_str("db ")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(",")?;
                    }
                    f.write_fmt(format_args!("{}", item))?;
                }
                Ok(())
            }
            PadTo(offset) => f.write_fmt(format_args!("times {}-($-$$) db 0", offset)),
            Verbatim(line) => f.write_str(line),

            Jmp(a) => f.write_fmt(format_args!("jmp {}", a)),
            Jz(a) => f.write_fmt(format_args!("jz {}", a)),
            Jne(a) => f.write_fmt(format_args!("jne {}", a)),
            Loop(a) => f.write_fmt(format_args!("loop {}", a)),
            Int(a) => f.write_fmt(format_args!("int {}", a)),

            Cli => f.write_str("cli"),
            Sti => f.write_str("sti"),
            Hlt => f.write_str("hlt"),
            Lodsb => f.write_str("lodsb"),

            Mov(a, b) => f.write_fmt(format_args!("mov {}, {}", a, b)),
            Inc(a) => f.write_fmt(format_args!("inc {}", a)),
            Xor(a, b) => f.write_fmt(format_args!("xor {}, {}", a, b)),
            Or(a, b) => f.write_fmt(format_args!("or {}, {}", a, b)),
            Cmp(a, b) => f.write_fmt(format_args!("cmp {}, {}", a, b)),
        }
    }
}

#[macro_export]
macro_rules! unit_op {
    (cli) => {
        $crate::compiler::x86::assembly::Inst::Cli
    };
    (sti) => {
        $crate::compiler::x86::assembly::Inst::Sti
    };
    (hlt) => {
        $crate::compiler::x86::assembly::Inst::Hlt
    };
    (lodsb) => {
        $crate::compiler::x86::assembly::Inst::Lodsb
    };
}

#[macro_export]
macro_rules! unary_op {
    (jmp) => {
        $crate::compiler::x86::assembly::Inst::Jmp
    };
    (jz) => {
        $crate::compiler::x86::assembly::Inst::Jz
    };
    (jne) => {
        $crate::compiler::x86::assembly::Inst::Jne
    };
    (loop) => {
        $crate::compiler::x86::assembly::Inst::Loop
    };
    (int) => {
        $crate::compiler::x86::assembly::Inst::Int
    };
    (inc) => {
        $crate::compiler::x86::assembly::Inst::Inc
    };
}

#[macro_export]
macro_rules! binary_op {
    (mov) => {
        $crate::compiler::x86::assembly::Inst::Mov
    };
    (xor) => {
        $crate::compiler::x86::assembly::Inst::Xor
    };
    (or) => {
        $crate::compiler::x86::assembly::Inst::Or
    };
    (cmp) => {
        $crate::compiler::x86::assembly::Inst::Cmp
    };
}

#[macro_export]
macro_rules! reg16 {
    (ax) => {
        $crate::compiler::x86::assembly::Reg16::Ax
    };
    (cx) => {
        $crate::compiler::x86::assembly::Reg16::Cx
    };
    (si) => {
        $crate::compiler::x86::assembly::Reg16::Si
    };
    (di) => {
        $crate::compiler::x86::assembly::Reg16::Di
    };
}

#[macro_export]
macro_rules! segment {
    (ds) => {
        $crate::compiler::x86::assembly::SegReg::Ds
    };
    (es) => {
        $crate::compiler::x86::assembly::SegReg::Es
    };
}

#[macro_export]
macro_rules! register {
    (al) => {
        $crate::compiler::x86::assembly::Reg::R8($crate::compiler::x86::assembly::Reg8::Al)
    };
    (ah) => {
        $crate::compiler::x86::assembly::Reg::R8($crate::compiler::x86::assembly::Reg8::Ah)
    };
    (ds) => {
        $crate::compiler::x86::assembly::Reg::Seg($crate::segment!(ds))
    };
    (es) => {
        $crate::compiler::x86::assembly::Reg::Seg($crate::segment!(es))
    };
    ($r:tt) => {
        $crate::compiler::x86::assembly::Reg::R16($crate::reg16!($r))
    };
}

#[macro_export]
macro_rules! operand {
    // current address
    (here) => {
        $crate::compiler::x86::assembly::Operand::Here
    };

    // memory
    ([%$seg:tt:%$reg:tt]) => {
        $crate::compiler::x86::assembly::Operand::Segmented(
            $crate::segment!($seg),
            $crate::reg16!($reg),
        )
    };

    // computed immediate
    ({$e:expr}) => {
        $crate::compiler::x86::assembly::Operand::Imm($e)
    };

    // register
    (%$reg:tt) => {
        $crate::compiler::x86::assembly::Operand::Register($crate::register!($reg))
    };

    ($e:literal) => {
        $crate::compiler::x86::assembly::Operand::Literal(stringify!($e))
    };

    // labels
    (@{$e:expr}) => {
        $crate::compiler::x86::assembly::Operand::Label($e.into())
    };
    (@$e:tt) => {
        $crate::compiler::x86::assembly::Operand::Label(stringify!($e).into())
    };
}

#[macro_export]
macro_rules! assembly {
    (($buf:expr) {}) => {
    };

    /********************/
    /*  MACRO OPERATIONS */
    /********************/
    // Append another set of instructions
    (($buf:expr) {{{$is:expr}} $($tail:tt)*}) => {
        for inst in $is.iter() {
            $buf.push(inst.clone());
        }
        $crate::assembly!(($buf) {$($tail)*})
    };

    /********************/
    /*     LABELS       */
    /********************/
    (($buf:expr) {@{$label:expr}: $($tail:tt)*}) => {
        $buf.push($crate::compiler::x86::assembly::Inst::Label($label.into()));
        $crate::assembly!(($buf) {$($tail)*})
    };
    (($buf:expr) {@$label:tt: $($tail:tt)*}) => {
        $buf.push($crate::compiler::x86::assembly::Inst::Label(stringify!($label).into()));
        $crate::assembly!(($buf) {$($tail)*})
    };

    /********************/
    /* UNIT OPERATORS */
    /********************/
    (($buf:expr) {$inst:tt; $($tail:tt)*}) => {
        $buf.push($crate::unit_op!($inst));
        $crate::assembly!(($buf) {$($tail)*})
    };

    /********************/
    /* Special Ops      */
    /********************/
    (($buf:expr) {bits $b:tt; $($tail:tt)*}) => {
        $buf.push($crate::compiler::x86::assembly::Inst::Bits($b));
        $crate::assembly!(($buf) {$($tail)*})
    };
    (($buf:expr) {org $o:tt; $($tail:tt)*}) => {
        $buf.push($crate::compiler::x86::assembly::Inst::Org($o));
        $crate::assembly!(($buf) {$($tail)*})
    };
    (($buf:expr) {times $o:tt; $($tail:tt)*}) => {
        $buf.push($crate::compiler::x86::assembly::Inst::PadTo($o));
        $crate::assembly!(($buf) {$($tail)*})
    };
    (($buf:expr) {db {$b:expr}; $($tail:tt)*}) => {
        $buf.push($crate::compiler::x86::assembly::Inst::Data(
            None,
            vec![$crate::compiler::x86::assembly::DataItem::HexByte($b)],
        ));
        $crate::assembly!(($buf) {$($tail)*})
    };

    /********************/
    /* UNARY OPERATORS */
    /********************/
    (($buf:expr) {$inst:tt $a:tt; $($tail:tt)*}) => {
        $buf.push($crate::unary_op!($inst)($crate::operand!($a)));
        $crate::assembly!(($buf) {$($tail)*})
    };
    (($buf:expr) {$inst:tt % $a:tt; $($tail:tt)*}) => {
        $buf.push($crate::unary_op!($inst)($crate::operand!(%$a)));
        $crate::assembly!(($buf) {$($tail)*})
    };
    (($buf:expr) {$inst:tt @ $a:tt; $($tail:tt)*}) => {
        $buf.push($crate::unary_op!($inst)($crate::operand!(@$a)));
        $crate::assembly!(($buf) {$($tail)*})
    };

    /********************/
    /* BINARY OPERATORS */
    /********************/
    // reg, literal
    (($buf:expr) {$inst:tt % $a:tt, $b:tt; $($tail:tt)*}) => {
        $buf.push($crate::binary_op!($inst)($crate::operand!(% $a), $crate::operand!($b)));
        $crate::assembly!(($buf) {$($tail)*})
    };
    // reg, reg
    (($buf:expr) {$inst:tt % $a:tt, % $b:tt; $($tail:tt)*}) => {
        $buf.push($crate::binary_op!($inst)($crate::operand!(% $a), $crate::operand!(% $b)));
        $crate::assembly!(($buf) {$($tail)*})
    };
    // reg, label
    (($buf:expr) {$inst:tt % $a:tt, @ $b:tt; $($tail:tt)*}) => {
        $buf.push($crate::binary_op!($inst)($crate::operand!(% $a), $crate::operand!(@ $b)));
        $crate::assembly!(($buf) {$($tail)*})
    };
    // mem, reg
    (($buf:expr) {$inst:tt [$($a:tt)+], % $b:tt; $($tail:tt)*}) => {
        $buf.push($crate::binary_op!($inst)($crate::operand!([$($a)+]), $crate::operand!(% $b)));
        $crate::assembly!(($buf) {$($tail)*})
    };
}
