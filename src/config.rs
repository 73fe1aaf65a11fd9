//! Project configuration. A diarymap project is a directory containing a
//! `diarymap.yaml` file naming the manuscript, the datasets, and the output
//! location; all paths in the file are resolved relative to the project root.

use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};

const PROJECT_FILE: &str = "diarymap.yaml";

fn default_diary() -> PathBuf {
    PathBuf::from("diary.md")
}

fn default_places() -> PathBuf {
    PathBuf::from("places.json")
}

fn default_timeline() -> PathBuf {
    PathBuf::from("data/timeline.json")
}

fn default_output() -> PathBuf {
    PathBuf::from("index.html")
}

#[derive(Deserialize)]
struct Project {
    title: String,

    #[serde(default = "default_diary")]
    diary: PathBuf,

    #[serde(default = "default_places")]
    places: PathBuf,

    #[serde(default = "default_timeline")]
    timeline: PathBuf,

    #[serde(default = "default_output")]
    output: PathBuf,

    /// Optional page-template override. When absent the template embedded in
    /// the binary is used.
    #[serde(default)]
    template: Option<PathBuf>,
}

/// Fully-resolved build configuration.
pub struct Config {
    pub project_root: PathBuf,
    pub title: String,
    pub diary: PathBuf,
    pub places: PathBuf,
    pub timeline: PathBuf,
    pub template: Option<PathBuf>,
    pub output: PathBuf,
}

impl Config {
    /// Finds `diarymap.yaml` in `dir` or the nearest ancestor directory and
    /// loads it, so the tool can be invoked from anywhere inside a project.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        let path = dir.join(PROJECT_FILE);
        if path.exists() {
            Config::from_project_file(&path)
        } else {
            match dir.parent() {
                Some(parent) => Config::from_directory(parent),
                None => Err(anyhow!(
                    "Could not find `{}` in any parent directory",
                    PROJECT_FILE
                )),
            }
        }
    }

    pub fn from_project_file(path: &Path) -> Result<Config> {
        let file = open(path, "project")?;
        let project: Project = serde_yaml::from_reader(file)?;
        match path.parent() {
            None => Err(anyhow!(
                "Can't get parent directory for provided project file path '{:?}'",
                path
            )),
            Some(project_root) => Ok(Config {
                title: project.title,
                diary: project_root.join(project.diary),
                places: project_root.join(project.places),
                timeline: project_root.join(project.timeline),
                template: project.template.map(|p| project_root.join(p)),
                output: project_root.join(project.output),
                project_root: project_root.to_owned(),
            }),
        }
    }
}

fn open(path: &Path, kind: &str) -> Result<File> {
    match File::open(path) {
        Err(e) => Err(anyhow!(
            "Opening {} file `{}`: {}",
            kind,
            path.display(),
            e
        )),
        Ok(file) => Ok(file),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let project: Project = serde_yaml::from_str("title: Edgar's Diary\n").unwrap();
        assert_eq!(project.diary, PathBuf::from("diary.md"));
        assert_eq!(project.places, PathBuf::from("places.json"));
        assert_eq!(project.timeline, PathBuf::from("data/timeline.json"));
        assert_eq!(project.output, PathBuf::from("index.html"));
        assert!(project.template.is_none());
    }

    #[test]
    fn test_missing_title_rejected() {
        assert!(serde_yaml::from_str::<Project>("diary: other.md\n").is_err());
    }

    #[test]
    fn test_paths_resolve_against_project_root() {
        let config = Config::from_project_file(Path::new("test-data/diarymap.yaml")).unwrap();
        assert_eq!(config.project_root, PathBuf::from("test-data"));
        assert_eq!(config.diary, PathBuf::from("test-data/diary.md"));
        assert_eq!(config.output, PathBuf::from("test-data/index.html"));
    }
}
