//! Output path rules
//!
//! Decides, for every file under the input root, whether it is rendered or
//! copied and where the result lands relative to the output root.

use std::path::{Component, Path, PathBuf};

const MARKDOWN_SUFFIX: &str = ".md";
const TEMPLATE_SUFFIX: &str = ".jinja2";
const INDEX_SOURCE: &str = "index.md";
const INDEX_OUTPUT: &str = "index.html";

/// What happens to a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputAction {
    /// Convert through front matter, Markdown and a template
    Render,
    /// Copy byte-for-byte
    Copy,
}

/// Result of mapping one source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMapping {
    pub action: OutputAction,
    /// Output path relative to the output root
    pub output: PathBuf,
}

impl PathMapping {
    pub fn should_render(&self) -> bool {
        self.action == OutputAction::Render
    }
}

/// Map a file in `relative_dir` (relative to the input root) to its output path.
///
/// Rules are checked in order:
/// 1. `index.md` renders to `<dir>/index.html`
/// 2. `X.md` renders to `<dir>/X/index.html`
/// 3. `Y.jinja2` renders to `<dir>/Y`
/// 4. anything else is copied to `<dir>/<name>`
pub fn map_output_path(relative_dir: &Path, file_name: &str) -> PathMapping {
    let (action, output) = if file_name == INDEX_SOURCE {
        (OutputAction::Render, relative_dir.join(INDEX_OUTPUT))
    } else if let Some(stem) = file_name.strip_suffix(MARKDOWN_SUFFIX) {
        // A bare ".md" has no stem; keep the whole name as the folder.
        let folder = if stem.is_empty() { file_name } else { stem };
        (
            OutputAction::Render,
            relative_dir.join(folder).join(INDEX_OUTPUT),
        )
    } else if let Some(stem) = file_name.strip_suffix(TEMPLATE_SUFFIX) {
        let name = if stem.is_empty() { file_name } else { stem };
        (OutputAction::Render, relative_dir.join(name))
    } else {
        (OutputAction::Copy, relative_dir.join(file_name))
    };

    PathMapping {
        action,
        output: normalize_path(&output),
    }
}

/// Lexically normalize a path: drop `.` segments, resolve `..` against
/// preceding normal segments and collapse redundant separators.
///
/// Leading `..` segments of a relative path are kept. An empty result
/// becomes `.`.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        return PathBuf::from(".");
    }

    parts.iter().collect()
}
