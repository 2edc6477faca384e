//! Process-wide font registration for report rendering.
//!
//! The report uses the regular and bold faces of a single family.  Both faces are read and
//! validated once by [`initialize`] (or [`initialize_default`]) and kept for the lifetime of
//! the process; every build afterwards takes a fresh [`FontFamily`] from the registered
//! bytes.  Rendering before initialization fails with
//! [`ComposeError::FontsNotReady`](crate::builder::ComposeError::FontsNotReady).

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use genpdf::error::Error;
use genpdf::fonts::{FontData, FontFamily};
use log::{debug, warn};

/// Name of the font family used for all report text.
pub const FONT_FAMILY_NAME: &str = "Raleway";

/// Environment variable that points at a directory holding the font files.
pub const FONTS_DIR_ENV: &str = "VISITOR_REPORT_FONTS_DIR";

const REGULAR_FILE: &str = "Raleway-Regular.ttf";
const BOLD_FILE: &str = "Raleway-Bold.ttf";
const FONT_FILES: &[&str] = &[REGULAR_FILE, BOLD_FILE];

static REGISTRY: OnceLock<RegisteredFaces> = OnceLock::new();

struct RegisteredFaces {
    source: PathBuf,
    regular: Vec<u8>,
    bold: Vec<u8>,
}

/// Directory next to the crate manifest where the font files are expected.
pub fn bundled_fonts_source_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts")
}

fn font_directory_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(path) = env::var(FONTS_DIR_ENV) {
        if !path.trim().is_empty() {
            candidates.push(PathBuf::from(path));
        }
    }

    if let Ok(current_exe) = env::current_exe() {
        if let Some(bin_dir) = current_exe.parent() {
            let candidate = bin_dir.join("assets/fonts");
            if !candidates.iter().any(|existing| existing == &candidate) {
                candidates.push(candidate);
            }
        }
    }

    let manifest_candidate = bundled_fonts_source_dir();
    if !candidates
        .iter()
        .any(|existing| existing == &manifest_candidate)
    {
        candidates.push(manifest_candidate);
    }

    candidates
}

fn missing_font_files(path: &Path) -> Vec<PathBuf> {
    FONT_FILES
        .iter()
        .map(|name| path.join(name))
        .filter(|candidate| !candidate.is_file())
        .collect()
}

/// Returns whether both font files are present in `directory`.
pub fn fonts_available(directory: impl AsRef<Path>) -> bool {
    let directory = directory.as_ref();
    directory.is_dir() && missing_font_files(directory).is_empty()
}

/// Finds the first directory holding both font files.
///
/// The search order is [`FONTS_DIR_ENV`], `assets/fonts` next to the running executable,
/// and finally `assets/fonts` next to the crate manifest.
pub fn resolve_font_directory() -> Result<PathBuf, Error> {
    let mut attempts = Vec::new();

    for candidate in font_directory_candidates() {
        let exists = candidate.is_dir();
        let missing = missing_font_files(&candidate);

        if exists && missing.is_empty() {
            return Ok(candidate);
        }

        let reason = if !exists {
            format!("directory missing at {}", candidate.display())
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

    let summary = if attempts.is_empty() {
        "no search paths were available".to_owned()
    } else {
        attempts.join(", ")
    };

    Err(Error::new(
        format!(
            "Unable to locate the {} font files. Checked: {}. See assets/fonts/README.md or set {}.",
            FONT_FAMILY_NAME, summary, FONTS_DIR_ENV
        ),
        io::Error::new(io::ErrorKind::NotFound, "report fonts directory not found"),
    ))
}

fn read_face(path: &Path, weight: &str) -> Result<Vec<u8>, Error> {
    let bytes = fs::read(path).map_err(|err| {
        Error::new(
            format!(
                "Failed to read {} {} font at {}: {}",
                FONT_FAMILY_NAME,
                weight,
                path.display(),
                err
            ),
            err,
        )
    })?;

    // Parse once up front so a corrupt file fails here rather than in the first build.
    FontData::new(bytes.clone(), None).map_err(|err| {
        Error::new(
            format!(
                "Failed to parse {} {} font at {}: {}",
                FONT_FAMILY_NAME,
                weight,
                path.display(),
                err
            ),
            io::Error::new(io::ErrorKind::InvalidData, err.to_string()),
        )
    })?;

    Ok(bytes)
}

/// Registers the regular and bold faces found in `directory`.
///
/// Only the first successful call takes effect; later calls are no-ops that log a warning
/// when they name a different directory.
pub fn initialize(directory: impl AsRef<Path>) -> Result<(), Error> {
    let directory = directory.as_ref();
    register(directory, &directory.join(REGULAR_FILE), &directory.join(BOLD_FILE))
}

/// Registers an explicit pair of font files in place of the bundled family.
///
/// Useful where the family's files are not at hand but another TrueType pair is, such as
/// system fonts on a build machine.  The same first-call-wins rule as [`initialize`]
/// applies; [`registered_directory`] reports the directory of `regular`.
pub fn initialize_faces(regular: impl AsRef<Path>, bold: impl AsRef<Path>) -> Result<(), Error> {
    let regular = regular.as_ref();
    let source = regular.parent().unwrap_or(regular);
    register(source, regular, bold.as_ref())
}

fn register(source: &Path, regular: &Path, bold: &Path) -> Result<(), Error> {
    if let Some(existing) = REGISTRY.get() {
        if existing.source != source {
            warn!(
                "Fonts already registered from {}; ignoring {}",
                existing.source.display(),
                source.display()
            );
        }
        return Ok(());
    }

    let faces = RegisteredFaces {
        source: source.to_path_buf(),
        regular: read_face(regular, "regular")?,
        bold: read_face(bold, "bold")?,
    };

    if REGISTRY.set(faces).is_ok() {
        debug!("Registered {} fonts from {}", FONT_FAMILY_NAME, source.display());
    }
    Ok(())
}

/// Resolves the font directory with [`resolve_font_directory`] and registers it.
pub fn initialize_default() -> Result<PathBuf, Error> {
    let directory = resolve_font_directory()?;
    initialize(&directory)?;
    Ok(directory)
}

/// Indicates whether the fonts have been registered for this process.
pub fn is_ready() -> bool {
    REGISTRY.get().is_some()
}

/// Directory the registered fonts were loaded from, if any.
pub fn registered_directory() -> Option<&'static Path> {
    REGISTRY.get().map(|faces| faces.source.as_path())
}

/// Builds a font family from the registered faces.
///
/// Italic slots reuse the upright faces since the report never sets italic text.
pub(crate) fn registered_family() -> Option<Result<FontFamily<FontData>, Error>> {
    let faces = REGISTRY.get()?;
    Some(build_family(faces))
}

fn build_family(faces: &RegisteredFaces) -> Result<FontFamily<FontData>, Error> {
    let regular = FontData::new(faces.regular.clone(), None)?;
    let bold = FontData::new(faces.bold.clone(), None)?;
    Ok(FontFamily {
        italic: regular.clone(),
        bold_italic: bold.clone(),
        regular,
        bold,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_missing_files_in_existing_directory() {
        let directory = tempfile::tempdir().expect("create temp font dir");
        fs::write(directory.path().join(REGULAR_FILE), b"not a font").expect("write placeholder");

        assert!(!fonts_available(directory.path()));
        let missing = missing_font_files(directory.path());
        assert_eq!(missing, vec![directory.path().join(BOLD_FILE)]);
    }

    #[test]
    fn corrupt_font_is_rejected() {
        let directory = tempfile::tempdir().expect("create temp font dir");
        let path = directory.path().join(REGULAR_FILE);
        fs::write(&path, b"not a font").expect("write placeholder");

        let err = read_face(&path, "regular").unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn unreadable_face_names_its_path() {
        let directory = tempfile::tempdir().expect("create temp font dir");
        let path = directory.path().join(BOLD_FILE);

        let err = read_face(&path, "bold").unwrap_err();
        assert!(err.to_string().contains("Failed to read Raleway bold font"));
        assert!(err.to_string().contains(BOLD_FILE));
    }
}
