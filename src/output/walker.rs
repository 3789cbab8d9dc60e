// Tree walker
//
// Walks the input directory, renders pages and copies everything else
// into the output directory.

use crate::config::Config;
use crate::context::PageContext;
use crate::error::{Error, Result};
use crate::output::render::PageRenderer;
use crate::paths::{map_output_path, OutputAction};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A file found under the input root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path as found on disk
    pub path: PathBuf,
    /// Path relative to the input root
    pub relative_path: PathBuf,
    pub file_name: String,
}

impl SourceFile {
    /// Directory of the file relative to the input root (empty at the root)
    pub fn relative_dir(&self) -> &Path {
        self.relative_path.parent().unwrap_or(Path::new(""))
    }
}

/// Counts from one full walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionResult {
    /// Files rendered through a template
    pub converted: usize,
    /// Files copied verbatim
    pub skipped: usize,
}

impl ConversionResult {
    pub fn summary(&self) -> String {
        format!(
            "Converted {} files, copied {} non-input files",
            self.converted, self.skipped
        )
    }
}

/// Renders or copies every file of an input tree
pub struct TreeWalker<'a> {
    renderer: &'a PageRenderer,
    context: &'a PageContext,
}

impl<'a> TreeWalker<'a> {
    pub fn new(renderer: &'a PageRenderer, context: &'a PageContext) -> Self {
        Self { renderer, context }
    }

    /// List every file below `input_dir`, at any depth
    pub fn discover(input_dir: &Path) -> Result<Vec<SourceFile>> {
        if !input_dir.is_dir() {
            return Err(Error::InputDirNotFound(input_dir.to_path_buf()));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(input_dir).sort_by_file_name() {
            let entry = entry?;
            // Dangling links are kept so the copy reports them
            let is_file = entry.file_type().is_file()
                || (entry.path_is_symlink() && !entry.path().is_dir());
            if !is_file {
                continue;
            }

            let relative_path = match entry.path().strip_prefix(input_dir) {
                Ok(relative) => relative.to_path_buf(),
                Err(_) => PathBuf::from(entry.file_name()),
            };
            files.push(SourceFile {
                path: entry.path().to_path_buf(),
                relative_path,
                file_name: entry.file_name().to_string_lossy().into_owned(),
            });
        }

        Ok(files)
    }

    /// Process every file under `input_dir` into `output_dir`.
    ///
    /// Existing output files are overwritten.
    pub fn walk(&self, input_dir: &Path, output_dir: &Path) -> Result<ConversionResult> {
        tracing::info!(
            "Building {} into {}",
            input_dir.display(),
            output_dir.display()
        );
        fs::create_dir_all(output_dir).map_err(|e| Error::write(output_dir, e))?;

        let mut result = ConversionResult::default();
        for source in Self::discover(input_dir)? {
            let mapping = map_output_path(source.relative_dir(), &source.file_name);
            let output = output_dir.join(&mapping.output);

            match mapping.action {
                OutputAction::Render => {
                    tracing::debug!("Rendering {} -> {}", source.path.display(), output.display());
                    self.renderer.render_file(&source.path, &output, self.context)?;
                    result.converted += 1;
                }
                OutputAction::Copy => {
                    tracing::debug!("Copying {} -> {}", source.path.display(), output.display());
                    copy_file(&source.path, &output)?;
                    result.skipped += 1;
                }
            }
        }

        tracing::info!("{}", result.summary());
        Ok(result)
    }
}

fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::write(parent, e))?;
    }
    fs::copy(from, to).map_err(|source| Error::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Build the whole site described by `config`
pub fn build(config: &Config) -> Result<ConversionResult> {
    let renderer = PageRenderer::from_config(config)?;
    TreeWalker::new(&renderer, &config.context).walk(&config.input_dir, &config.output_dir)
}
