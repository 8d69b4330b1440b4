use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::compiler::{Colour, Compiler};

/// The file formats a [`Manifest`] can be written in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ManifestFormat {
    Yaml,
    Json,
}

impl FromStr for ManifestFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yaml" => Ok(ManifestFormat::Yaml),
            "json" => Ok(ManifestFormat::Json),
            _ => Err(format!("Unknown manifest format: {}", s)),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct PrintBlockEntry {
    pub id: u32,
    pub label: String,
    pub segments: Vec<String>,
}

/// Describes what a boot sector was compiled from: its colours, the print
/// blocks that were generated and the labels jumped to by `GO` directives.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct Manifest {
    pub name: String,
    pub background: Colour,
    pub background_code: u8,
    pub foreground: Colour,
    pub foreground_code: u8,
    pub attribute: u8,
    pub print_blocks: Vec<PrintBlockEntry>,
    pub jumps: Vec<String>,
    pub verbatim_lines: usize,
}

impl Manifest {
    pub fn extract(name: &str, compiler: &Compiler) -> Manifest {
        let colours = compiler.colours();
        let print_blocks = compiler
            .blocks()
            .iter()
            .map(|b| PrintBlockEntry {
                id: b.id(),
                label: b.label(),
                segments: b.segments().to_vec(),
            })
            .collect();

        Manifest {
            name: name.into(),
            background: colours.background(),
            background_code: colours.background().code(),
            foreground: colours.foreground(),
            foreground_code: colours.foreground().code(),
            attribute: colours.attribute(),
            print_blocks,
            jumps: compiler.jumps().to_vec(),
            verbatim_lines: compiler.verbatim(),
        }
    }

    /// Loads a manifest from the given reader.
    pub fn read<R: std::io::Read>(reader: R, format: ManifestFormat) -> Result<Manifest, String> {
        match format {
            ManifestFormat::Yaml => serde_yaml::from_reader(reader).map_err(|e| format!("{}", e)),
            ManifestFormat::Json => serde_json::from_reader(reader).map_err(|e| format!("{}", e)),
        }
    }

    /// Writes the Manifest to the given writer
    pub fn write<W: std::io::Write>(&self, writer: W, format: ManifestFormat) -> Result<(), String> {
        match format {
            ManifestFormat::Yaml => serde_yaml::to_writer(writer, self).map_err(|e| format!("{}", e)),
            ManifestFormat::Json => {
                serde_json::to_writer_pretty(writer, self).map_err(|e| format!("{}", e))
            }
        }
    }
}
