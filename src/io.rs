use std::path::Path;

use log::warn;

use crate::result::Result;

pub const NEX_FILE_EXT: &str = "nexs";

/// Reads a source file.  Bytes which are not valid UTF-8 are replaced.
pub fn read_source(path: &Path) -> Result<String> {
    match path.extension() {
        Some(ex) if ex.to_ascii_lowercase() == NEX_FILE_EXT => (),
        _ => warn!(
            "{:?} does not have the .{} extension, compiling anyway",
            path, NEX_FILE_EXT
        ),
    }

    let bytes = std::fs::read(path).map_err(|e| format!("Could not read {:?}: {}", path, e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Creates `path` and passes it to `write`.
pub fn write_file<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut std::fs::File) -> std::io::Result<()>,
{
    let mut file =
        std::fs::File::create(path).map_err(|e| format!("Could not create {:?}: {}", path, e))?;
    write(&mut file).map_err(|e| format!("Could not write {:?}: {}", path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("nex-io-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_write_then_read() {
        let path = temp_path("hello.nexs");
        write_file(&path, |f| {
            use std::io::Write;
            f.write_all(b"PRINT \"Hi\"\nSTOP\n")
        })
        .unwrap();

        let text = read_source(&path).unwrap();
        assert_eq!(text, "PRINT \"Hi\"\nSTOP\n");
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let path = temp_path("bytes.nexs");
        std::fs::write(&path, [b'm', b'o', b'v', 0xFF]).unwrap();
        let text = read_source(&path).unwrap();
        assert!(text.starts_with("mov"));
        assert!(text.ends_with('\u{FFFD}'));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_file() {
        assert!(read_source(&temp_path("missing.nexs")).is_err());
    }
}
