//! The fixed parts of a boot sector: the header which places the code at the
//! BIOS load address, the screen clear that runs first, and the footer which
//! halts the machine and pads the sector out to its signature.
use super::colour::{ColourState, CURSOR_OFFSET, SCREEN_COLUMNS, SCREEN_ROWS};
use super::x86::assembly::{Immediate, Inst};
use crate::assembly;

/// Address the BIOS loads the boot sector to
pub const BOOT_ORIGIN: u16 = 0x7C00;

/// Size of a boot sector in bytes
pub const SECTOR_SIZE: usize = 512;

/// Offset of the boot signature within the sector
pub const SIGNATURE_OFFSET: u16 = 510;

/// The two bytes the BIOS requires at the end of a bootable sector
pub const BOOT_SIGNATURE: [u8; 2] = [0x55, 0xAA];

/// Number of character cells in the text mode framebuffer
pub const SCREEN_CELLS: u16 = SCREEN_COLUMNS * SCREEN_ROWS;

/// Targets 16-bit real mode at the boot sector load address
pub fn header(code: &mut Vec<Inst>) {
    assembly! {(code) {
        bits 16;
        org {BOOT_ORIGIN};
    }}
}

/// Fills every cell of the text mode screen with a space in the colours of
/// `colours`, then points `di` at the bottom right cell.
pub fn clear_screen(colours: &ColourState, code: &mut Vec<Inst>) {
    let attr = colours.attribute();
    assembly! {(code) {
        cli;
        mov %ax, 0xB800;
        mov %es, %ax;
        xor %di, %di;
        mov %cx, {Immediate::Dec(SCREEN_CELLS as i64)};
        mov %al, ' ';
        mov %ah, {Immediate::Byte(attr)};
    @clear_loop:
        mov [%es:%di], %al;
        inc %di;
        mov [%es:%di], %ah;
        inc %di;
        loop @clear_loop;
        mov %di, {Immediate::Dec(CURSOR_OFFSET as i64)};
    }}
}

/// Halts the machine, then zero fills the sector up to the boot signature
/// and writes the signature.
pub fn footer(code: &mut Vec<Inst>) {
    assembly! {(code) {
        cli;
        hlt;
        jmp here;
        times {SIGNATURE_OFFSET};
        db {BOOT_SIGNATURE[0]};
        db {BOOT_SIGNATURE[1]};
    }}
}
