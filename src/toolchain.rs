//! The external tools a compiled program passes through: NASM assembles the
//! generated source into a flat binary and QEMU boots the resulting image.
use std::fmt::Display;
use std::path::Path;
use std::process::Command;

use log::info;

use crate::compiler::framer::{BOOT_SIGNATURE, SECTOR_SIZE, SIGNATURE_OFFSET};

pub const DEFAULT_ASSEMBLER: &str = "nasm";
pub const DEFAULT_EMULATOR: &str = "qemu-system-x86_64";

#[derive(Debug)]
pub enum ToolchainError {
    Io(std::io::Error),
    AssemblerFailed(Option<i32>),
    EmulatorFailed(Option<i32>),
    InvalidImage(ImageError),
}

impl Display for ToolchainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolchainError::Io(e) => write!(f, "{}", e),
            ToolchainError::AssemblerFailed(code) => {
                write!(f, "Assembler failed with exit code {}", fmt_code(*code))
            }
            ToolchainError::EmulatorFailed(code) => {
                write!(f, "Emulator failed with exit code {}", fmt_code(*code))
            }
            ToolchainError::InvalidImage(e) => write!(f, "Invalid boot image: {}", e),
        }
    }
}

fn fmt_code(code: Option<i32>) -> String {
    code.map_or("<signal>".into(), |c| c.to_string())
}

impl From<std::io::Error> for ToolchainError {
    fn from(e: std::io::Error) -> Self {
        ToolchainError::Io(e)
    }
}

impl From<ImageError> for ToolchainError {
    fn from(e: ImageError) -> Self {
        ToolchainError::InvalidImage(e)
    }
}

#[derive(Debug, PartialEq)]
pub enum ImageError {
    WrongSize(usize),
    MissingSignature([u8; 2]),
}

impl Display for ImageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageError::WrongSize(sz) => {
                write!(f, "expected {} bytes but found {}", SECTOR_SIZE, sz)
            }
            ImageError::MissingSignature(sig) => write!(
                f,
                "expected signature 0x{:02X} 0x{:02X} but found 0x{:02X} 0x{:02X}",
                BOOT_SIGNATURE[0], BOOT_SIGNATURE[1], sig[0], sig[1]
            ),
        }
    }
}

/// Checks that `image` is exactly one sector and ends with the boot signature.
pub fn verify_boot_image(image: &[u8]) -> Result<(), ImageError> {
    if image.len() != SECTOR_SIZE {
        return Err(ImageError::WrongSize(image.len()));
    }

    let offset = SIGNATURE_OFFSET as usize;
    let sig = [image[offset], image[offset + 1]];
    if sig != BOOT_SIGNATURE {
        return Err(ImageError::MissingSignature(sig));
    }

    Ok(())
}

/// Runs NASM to turn generated assembly into a raw boot image.
pub struct Assembler {
    program: String,
}

impl Default for Assembler {
    fn default() -> Self {
        Assembler::new(DEFAULT_ASSEMBLER)
    }
}

impl Assembler {
    pub fn new(program: &str) -> Assembler {
        Assembler {
            program: program.into(),
        }
    }

    pub fn command(&self, asm: &Path, image: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-f").arg("bin").arg(asm).arg("-o").arg(image);
        cmd
    }

    /// Assembles `asm` into `image` then checks that the result is bootable.
    pub fn assemble(&self, asm: &Path, image: &Path) -> Result<(), ToolchainError> {
        info!("Assembling {:?} with {}", asm, self.program);
        let status = self.command(asm, image).status()?;
        if !status.success() {
            return Err(ToolchainError::AssemblerFailed(status.code()));
        }

        let bytes = std::fs::read(image)?;
        verify_boot_image(&bytes)?;
        Ok(())
    }
}

/// Boots an image in QEMU as a raw disk.
pub struct Emulator {
    program: String,
}

impl Default for Emulator {
    fn default() -> Self {
        Emulator::new(DEFAULT_EMULATOR)
    }
}

impl Emulator {
    pub fn new(program: &str) -> Emulator {
        Emulator {
            program: program.into(),
        }
    }

    pub fn command(&self, image: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-drive")
            .arg(format!("file={},format=raw", image.display()));
        cmd
    }

    /// Blocks until the emulator exits.
    pub fn run(&self, image: &Path) -> Result<(), ToolchainError> {
        info!("Booting {:?} with {}", image, self.program);
        let status = self.command(image).status()?;
        if !status.success() {
            return Err(ToolchainError::EmulatorFailed(status.code()));
        }
        Ok(())
    }
}
