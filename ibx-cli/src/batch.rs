//! Directory conversion
//!
//! Every file below the input directory whose extension maps to a registered
//! format is converted into the output directory, keeping its relative path
//! and swapping the extension. Each file is reported on its own line:
//!
//! ```text
//! converting in/a.dat --> out/a.xml ... OK
//! converting in/sub/b.dat --> out/sub/b.xml ... OK (unchanged)
//! files processed: 2
//! ```
//!
//! A failing file is reported and skipped; the rest of the tree still runs.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use ibx_codec::{
    Conversion, FormatError, FormatOptions, FormatRegistry, PassthroughReason,
};
use thiserror::Error;
use tracing::{debug, warn};

use crate::counterpart;

/// Errors for a single file conversion.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Error reading file '{}': {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("Error writing file '{}': {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Format(#[from] FormatError),
}

/// What happened to one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Converted,
    /// Copied verbatim.
    Unchanged(PassthroughReason),
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub unchanged: usize,
    pub failed: usize,
}

/// Convert `source` from one format to another, falling back to a verbatim
/// copy when the source format declines the input.
pub fn convert_bytes(
    registry: &FormatRegistry,
    source: &[u8],
    from: &str,
    to: &str,
    options: &FormatOptions,
) -> Result<(Vec<u8>, FileOutcome), FormatError> {
    match registry.convert(source, from, to, options)? {
        Conversion::Converted(output) => Ok((output.into_bytes(), FileOutcome::Converted)),
        Conversion::Passthrough(reason) => Ok((source.to_vec(), FileOutcome::Unchanged(reason))),
    }
}

/// Convert one file. The output is written only once it is complete.
pub fn convert_file(
    registry: &FormatRegistry,
    input: &Path,
    output: &Path,
    from: &str,
    to: &str,
    options: &FormatOptions,
) -> Result<FileOutcome, ConvertError> {
    let source = fs::read(input).map_err(|source| ConvertError::Read {
        path: input.to_path_buf(),
        source,
    })?;
    let (bytes, outcome) = convert_bytes(registry, &source, from, to, options)?;
    let write_error = |source| ConvertError::Write {
        path: output.to_path_buf(),
        source,
    };
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    fs::write(output, bytes).map_err(write_error)?;
    Ok(outcome)
}

/// All regular files below `root`, sorted.
pub fn collect_files(root: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else {
                files.push(path);
            }
        }
    }
    files.sort();
    Ok(files)
}

/// Settings for one directory conversion.
pub struct BatchJob<'a> {
    pub registry: &'a FormatRegistry,
    pub options: FormatOptions,
    /// Only convert files detected as this format.
    pub from: Option<&'a str>,
    /// Target format; defaults to the other side of each file's format.
    pub to: Option<&'a str>,
    pub binary_extension: &'a str,
    pub text_extension: &'a str,
}

impl BatchJob<'_> {
    fn extension_for(&self, format: &str) -> &str {
        if format == "ibx" {
            self.binary_extension
        } else {
            self.text_extension
        }
    }

    fn source_format(&self, path: &Path) -> Option<String> {
        let detected = self
            .registry
            .detect_format_from_filename(&path.to_string_lossy())?;
        match self.from {
            Some(from) if from != detected => None,
            _ => Some(detected),
        }
    }

    /// Path a file below `input_dir` is written to.
    pub fn output_path(&self, input_dir: &Path, output_dir: &Path, file: &Path, to: &str) -> PathBuf {
        let relative = file.strip_prefix(input_dir).unwrap_or(file);
        output_dir
            .join(relative)
            .with_extension(self.extension_for(to))
    }

    /// Convert every matching file below `input_dir`, reporting to `report`.
    pub fn run(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        report: &mut impl Write,
    ) -> io::Result<BatchSummary> {
        let mut summary = BatchSummary::default();
        for file in collect_files(input_dir)? {
            let Some(from) = self.source_format(&file) else {
                debug!(path = %file.display(), "skipping file without a matching format");
                continue;
            };
            let to = self.to.unwrap_or_else(|| counterpart(&from));
            let target = self.output_path(input_dir, output_dir, &file, to);

            write!(
                report,
                "converting {} --> {} ... ",
                file.display(),
                target.display()
            )?;
            match convert_file(self.registry, &file, &target, &from, to, &self.options) {
                Ok(FileOutcome::Converted) => writeln!(report, "OK")?,
                Ok(FileOutcome::Unchanged(reason)) => {
                    debug!(path = %file.display(), %reason, "copied unchanged");
                    summary.unchanged += 1;
                    writeln!(report, "OK (unchanged)")?;
                }
                Err(err) => {
                    warn!(path = %file.display(), error = %err, "conversion failed");
                    summary.failed += 1;
                    writeln!(report, "FAILED: {err}")?;
                }
            }
            summary.processed += 1;
        }
        writeln!(report, "files processed: {}", summary.processed)?;
        Ok(summary)
    }
}
