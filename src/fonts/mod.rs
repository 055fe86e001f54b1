//! Font loading utilities for report card rendering.
//!
//! `genpdf` needs TrueType metrics for every font it lays out.  The preferred
//! family is Liberation Sans, which is metric-compatible with Helvetica and is
//! therefore mapped onto the built-in PDF Helvetica instead of being embedded.
//! The files are searched in the following directories, in order:
//!
//! 1. an explicit directory passed by the caller,
//! 2. the directory named by the `REPORT_CARDS_FONTS_DIR` environment variable,
//! 3. `assets/fonts` next to the running executable,
//! 4. `assets/fonts` inside this crate.
//!
//! When none of them holds the family, common system font installations are
//! tried before giving up.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use genpdf::error::{Error, ErrorKind};
use genpdf::fonts::{self, Builtin, FontData, FontFamily};
use log::{debug, warn};
use printpdf::BuiltinFont;

/// Name of the preferred font family, as used in its file names.
pub const DEFAULT_FONT_FAMILY_NAME: &str = "LiberationSans";

/// Environment variable naming a directory that holds the preferred family.
pub const FONTS_DIR_ENV: &str = "REPORT_CARDS_FONTS_DIR";

const FONT_FILES: &[&str] = &[
    "LiberationSans-Regular.ttf",
    "LiberationSans-Bold.ttf",
    "LiberationSans-Italic.ttf",
    "LiberationSans-BoldItalic.ttf",
];

/// Built-in PDF fonts standing in for each face of a Helvetica-compatible family.
const HELVETICA_FACES: FontFamily<Option<BuiltinFont>> = FontFamily {
    regular: Some(BuiltinFont::Helvetica),
    bold: Some(BuiltinFont::HelveticaBold),
    italic: Some(BuiltinFont::HelveticaOblique),
    bold_italic: Some(BuiltinFont::HelveticaBoldOblique),
};

const EMBEDDED_FACES: FontFamily<Option<BuiltinFont>> = FontFamily {
    regular: None,
    bold: None,
    italic: None,
    bold_italic: None,
};

struct SystemFontFiles {
    family: &'static str,
    files: FontFamily<&'static str>,
    builtin: FontFamily<Option<BuiltinFont>>,
}

const SYSTEM_FONT_FAMILIES: &[SystemFontFiles] = &[
    SystemFontFiles {
        family: "Liberation Sans",
        files: FontFamily {
            regular: "LiberationSans-Regular.ttf",
            bold: "LiberationSans-Bold.ttf",
            italic: "LiberationSans-Italic.ttf",
            bold_italic: "LiberationSans-BoldItalic.ttf",
        },
        builtin: HELVETICA_FACES,
    },
    SystemFontFiles {
        family: "Arial",
        files: FontFamily {
            regular: "arial.ttf",
            bold: "arialbd.ttf",
            italic: "ariali.ttf",
            bold_italic: "arialbi.ttf",
        },
        builtin: HELVETICA_FACES,
    },
    SystemFontFiles {
        family: "DejaVu Sans",
        files: FontFamily {
            regular: "DejaVuSans.ttf",
            bold: "DejaVuSans-Bold.ttf",
            italic: "DejaVuSans-Oblique.ttf",
            bold_italic: "DejaVuSans-BoldOblique.ttf",
        },
        builtin: EMBEDDED_FACES,
    },
];

const SYSTEM_FONT_DIRECTORIES: &[&str] = &[
    "/usr/share/fonts/truetype/liberation",
    "/usr/share/fonts/truetype/liberation2",
    "/usr/share/fonts/liberation-sans",
    "/usr/share/fonts/liberation",
    "/usr/share/fonts/TTF",
    "/usr/share/fonts/truetype/dejavu",
    "/usr/share/fonts/dejavu-sans-fonts",
    "/usr/share/fonts/dejavu",
    "/Library/Fonts",
    "/System/Library/Fonts/Supplemental",
];

/// A resolved font family, ready to be installed into any number of documents.
#[derive(Clone)]
pub struct FontSource {
    family: FontFamily<FontData>,
    description: String,
}

impl FontSource {
    /// Resolves the font family, optionally searching `directory` first.
    pub fn resolve(directory: Option<&Path>) -> Result<Self, Error> {
        match load_bundled_font_family(directory) {
            Ok((family, location)) => {
                debug!(
                    "Using '{}' fonts from {}",
                    DEFAULT_FONT_FAMILY_NAME,
                    location.display()
                );
                let description =
                    format!("{} ({})", DEFAULT_FONT_FAMILY_NAME, location.display());
                Ok(Self {
                    family,
                    description,
                })
            }
            Err(err) if fonts_missing(&err) => match system_font_family() {
                Ok((family, description)) => {
                    warn!(
                        "Bundled fonts unavailable ({}); falling back to {}.",
                        err, description
                    );
                    Ok(Self {
                        family,
                        description,
                    })
                }
                Err(fallback_err) => Err(Error::new(
                    format!("{}; system font fallback failed: {}", err, fallback_err),
                    io::Error::new(io::ErrorKind::NotFound, "no usable fonts found"),
                )),
            },
            Err(err) => Err(err),
        }
    }

    /// Returns a copy of the font family for a new document.
    pub fn family(&self) -> FontFamily<FontData> {
        self.family.clone()
    }

    /// Human readable name and location of the resolved family.
    pub fn description(&self) -> &str {
        &self.description
    }
}

fn env_path(var: &str) -> Option<PathBuf> {
    env::var_os(var).and_then(|value| {
        let path = PathBuf::from(value);
        if path.as_os_str().is_empty() {
            None
        } else {
            Some(path)
        }
    })
}

/// Directories searched for the preferred family, in priority order.
pub fn font_directory_candidates(directory: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    let mut push_unique = |candidate: PathBuf| {
        if !candidates.iter().any(|existing| existing == &candidate) {
            candidates.push(candidate);
        }
    };

    if let Some(directory) = directory {
        push_unique(directory.to_path_buf());
    }

    if let Some(path) = env_path(FONTS_DIR_ENV) {
        push_unique(path);
    }

    if let Ok(current_exe) = env::current_exe() {
        if let Some(bin_dir) = current_exe.parent() {
            push_unique(bin_dir.join("assets/fonts"));
        }
    }

    push_unique(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts"));

    candidates
}

fn missing_font_files(path: &Path) -> Vec<PathBuf> {
    FONT_FILES
        .iter()
        .map(|name| path.join(name))
        .filter(|candidate| !candidate.is_file())
        .collect()
}

fn resolve_font_directory(directory: Option<&Path>) -> Result<PathBuf, Error> {
    let mut attempts = Vec::new();

    for candidate in font_directory_candidates(directory) {
        let exists = candidate.is_dir();
        let missing = missing_font_files(&candidate);

        if exists && missing.is_empty() {
            return Ok(candidate);
        }

        let reason = if !exists {
            "directory missing".to_owned()
        } else {
            let missing_list = missing
                .iter()
                .map(|path| path.file_name().unwrap_or_default().to_string_lossy())
                .collect::<Vec<_>>()
                .join(", ");
            format!("missing files [{}]", missing_list)
        };

        attempts.push(format!("{} ({})", candidate.display(), reason));
    }

    Err(Error::new(
        format!(
            "Unable to locate the '{}' font family. Checked: {}. Set {} to a directory containing {}.",
            DEFAULT_FONT_FAMILY_NAME,
            attempts.join(", "),
            FONTS_DIR_ENV,
            FONT_FILES.join(", ")
        ),
        io::Error::new(io::ErrorKind::NotFound, "font directory not found"),
    ))
}

fn load_bundled_font_family(
    directory: Option<&Path>,
) -> Result<(FontFamily<FontData>, PathBuf), Error> {
    let location = resolve_font_directory(directory)?;

    let family = fonts::from_files(&location, DEFAULT_FONT_FAMILY_NAME, Some(Builtin::Helvetica))
        .map_err(|err| {
            Error::new(
                format!(
                    "Failed to load font family '{}' from {}: {}",
                    DEFAULT_FONT_FAMILY_NAME,
                    location.display(),
                    err
                ),
                io::Error::new(io::ErrorKind::Other, err.to_string()),
            )
        })?;

    Ok((family, location))
}

fn system_font_directories() -> Vec<PathBuf> {
    let mut directories: Vec<PathBuf> = SYSTEM_FONT_DIRECTORIES
        .iter()
        .map(PathBuf::from)
        .collect();

    for var in ["WINDIR", "SystemRoot"] {
        if let Some(root) = env_path(var) {
            directories.push(root.join("Fonts"));
        }
    }

    directories
}

fn load_system_font(
    directory: &Path,
    file: &str,
    builtin: Option<BuiltinFont>,
) -> Result<FontData, Error> {
    let path = directory.join(file);
    FontData::load(&path, builtin).map_err(|err| {
        Error::new(
            format!("Failed to load font at {}: {}", path.display(), err),
            io::Error::new(io::ErrorKind::Other, err.to_string()),
        )
    })
}

fn load_system_family(
    directory: &Path,
    family: &SystemFontFiles,
) -> Result<FontFamily<FontData>, Error> {
    let SystemFontFiles { files, builtin, .. } = family;
    Ok(FontFamily {
        regular: load_system_font(directory, files.regular, builtin.regular)?,
        bold: load_system_font(directory, files.bold, builtin.bold)?,
        italic: load_system_font(directory, files.italic, builtin.italic)?,
        bold_italic: load_system_font(directory, files.bold_italic, builtin.bold_italic)?,
    })
}

fn system_font_family() -> Result<(FontFamily<FontData>, String), Error> {
    let directories = system_font_directories();

    for family in SYSTEM_FONT_FAMILIES {
        let FontFamily {
            regular,
            bold,
            italic,
            bold_italic,
        } = family.files;
        for directory in &directories {
            let complete = [regular, bold, italic, bold_italic]
                .iter()
                .all(|name| directory.join(name).is_file());
            if !complete {
                continue;
            }

            let fonts = load_system_family(directory, family)?;
            return Ok((
                fonts,
                format!("system '{}' fonts in {}", family.family, directory.display()),
            ));
        }
    }

    Err(Error::new(
        "no Liberation Sans, Arial or DejaVu Sans installation found",
        io::Error::new(io::ErrorKind::NotFound, "system fonts not found"),
    ))
}

fn fonts_missing(err: &Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::IoError(io_err)
            if io_err.kind() == io::ErrorKind::NotFound
                || io_err.kind() == io::ErrorKind::PermissionDenied
    )
}

/// Indicates whether any usable font family can be resolved.
pub fn fonts_available(directory: Option<&Path>) -> bool {
    FontSource::resolve(directory).is_ok()
}
