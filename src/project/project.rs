use std::path::{Path, PathBuf};

use crate::result::Result;

/// Given the path to a source file, return the name that should be used
/// for the project: the file name without its extension.
pub fn get_project_name(src: &Path) -> Result<&str> {
    if src.is_file() {
        src.file_stem()
            .map(|name| name.to_str())
            .flatten()
            .ok_or_else(|| "Could not extract name from given path".into())
    } else {
        Err(format!("Given path is not a file: {}", src.display()))
    }
}

/// The path of the file the generated assembly is written to when the
/// assembly is an intermediate step towards `output`.
pub fn intermediate_asm_path(output: &Path) -> PathBuf {
    let mut name = output.as_os_str().to_owned();
    name.push(".asm");
    PathBuf::from(name)
}

/// The path the manifest of `output` is written to.
pub fn manifest_path(output: &Path) -> PathBuf {
    let mut name = output.as_os_str().to_owned();
    name.push(".manifest");
    PathBuf::from(name)
}
