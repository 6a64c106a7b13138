//! Finding Gradle projects and their modules on disk

use glob::Pattern;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::error::{FactsError, Result, ResultExt};
use crate::models::config::Settings;

const BUILD_SCRIPTS: [&str; 2] = ["build.gradle.kts", "build.gradle"];
const SETTINGS_SCRIPTS: [&str; 2] = ["settings.gradle.kts", "settings.gradle"];
const PROPERTIES_FILE: &str = "gradle.properties";

/// A directory holding a build or settings script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectModule {
    /// Directory name, the project name for the root module; used for display
    pub name: String,
    /// Gradle path such as `:core:data`, `:` for the root module; identifies the module
    pub path: String,
    pub root: PathBuf,
    pub build_script: Option<PathBuf>,
    pub settings_script: Option<PathBuf>,
}

impl ProjectModule {
    pub fn new(name: impl Into<String>, path: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            root: root.into(),
            build_script: None,
            settings_script: None,
        }
    }

    /// Locate the scripts in `dir`; `None` when it holds neither kind
    fn from_dir(name: String, path: String, dir: &Path) -> Option<Self> {
        let build_script = first_existing(dir, &BUILD_SCRIPTS);
        let settings_script = first_existing(dir, &SETTINGS_SCRIPTS);
        if build_script.is_none() && settings_script.is_none() {
            return None;
        }
        Some(Self {
            name,
            path,
            root: dir.to_path_buf(),
            build_script,
            settings_script,
        })
    }

    pub fn is_root(&self) -> bool {
        self.path == ":"
    }
}

/// One project: its modules and properties files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradleProject {
    pub name: String,
    pub root: PathBuf,
    /// Ordered by Gradle path, root module first
    pub modules: Vec<ProjectModule>,
    pub property_files: Vec<PathBuf>,
}

impl GradleProject {
    pub fn root_module(&self) -> Option<&ProjectModule> {
        self.modules.iter().find(|m| m.is_root())
    }

    pub fn build_scripts(&self) -> impl Iterator<Item = &Path> {
        self.modules.iter().filter_map(|m| m.build_script.as_deref())
    }
}

/// Project roots under the scan path
///
/// Every immediate sub-directory is a project, unless the scan path is one
/// itself: `single_project` is set or it holds a build or settings script.
pub fn discover_projects(settings: &Settings) -> Result<Vec<PathBuf>> {
    let scan_path = &settings.scan_path;
    if !scan_path.is_dir() {
        return Err(FactsError::InvalidPath {
            path: scan_path.clone(),
        });
    }
    if settings.single_project || has_gradle_script(scan_path) {
        return Ok(vec![scan_path.clone()]);
    }

    let excludes = compile_patterns(&settings.exclude_patterns)?;
    let entries = fs::read_dir(scan_path).with_file_context(scan_path)?;

    let mut projects = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if !path.is_dir() || (path.is_symlink() && !settings.follow_links) {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if excludes.iter().any(|p| p.matches(&name)) {
            debug!(path = %path.display(), "project excluded");
            continue;
        }
        projects.push(path);
    }
    projects.sort();
    Ok(projects)
}

/// Modules and properties files of the project rooted at `root`
///
/// Traversal problems below the root are returned next to the project
/// instead of failing it. `max_depth` counts directories below the root.
pub fn discover_project(root: &Path, settings: &Settings) -> Result<(GradleProject, Vec<(PathBuf, FactsError)>)> {
    let excludes = compile_patterns(&settings.exclude_patterns)?;
    let project_name = dir_name(root);

    let mut walker = WalkDir::new(root)
        .follow_links(settings.follow_links)
        .sort_by_file_name();
    if let Some(max_depth) = settings.max_depth {
        walker = walker.max_depth(max_depth + 1);
    }

    let mut modules = Vec::new();
    let mut property_files = Vec::new();
    let mut issues = Vec::new();

    let entries = walker
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_excluded(entry, root, &excludes));
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let err = FactsError::from(err);
                if err.is_critical() {
                    return Err(err);
                }
                let path = match &err {
                    FactsError::PermissionDenied { path } | FactsError::DirectoryTraversal { path, .. } => {
                        path.clone()
                    }
                    _ => root.to_path_buf(),
                };
                issues.push((path, err));
                continue;
            }
        };

        if entry.file_type().is_file() {
            if entry.file_name() == PROPERTIES_FILE {
                property_files.push(entry.into_path());
            }
            continue;
        }
        if !entry.file_type().is_dir() {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let segments: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        let (name, gradle_path) = if segments.is_empty() {
            (project_name.clone(), ":".to_string())
        } else {
            (dir_name(entry.path()), format!(":{}", segments.join(":")))
        };
        if let Some(module) = ProjectModule::from_dir(name, gradle_path, entry.path()) {
            modules.push(module);
        }
    }

    modules.sort_by(|a, b| (!a.is_root(), &a.path).cmp(&(!b.is_root(), &b.path)));
    debug!(
        project = %project_name,
        modules = modules.len(),
        properties = property_files.len(),
        "project discovered"
    );

    Ok((
        GradleProject {
            name: project_name,
            root: root.to_path_buf(),
            modules,
            property_files,
        },
        issues,
    ))
}

/// Whether `dir` directly holds a build or settings script
pub fn has_gradle_script(dir: &Path) -> bool {
    BUILD_SCRIPTS
        .iter()
        .chain(SETTINGS_SCRIPTS.iter())
        .any(|name| dir.join(name).is_file())
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| Pattern::new(p).map_err(FactsError::from))
        .collect()
}

/// Match against the entry's file name and its path relative to the project
fn is_excluded(entry: &DirEntry, root: &Path, excludes: &[Pattern]) -> bool {
    let name = entry.file_name().to_string_lossy();
    let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
    excludes
        .iter()
        .any(|p| p.matches(&name) || p.matches_path(relative))
}

fn first_existing(dir: &Path, names: &[&str]) -> Option<PathBuf> {
    names.iter().map(|name| dir.join(name)).find(|path| path.is_file())
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
