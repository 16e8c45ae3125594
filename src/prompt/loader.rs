//! Prompt Loader - Load prompt templates from files
//!
//! Templates are plain UTF-8 text files kept in a single directory. Every
//! `load` reads the file again; nothing is cached between calls.

use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{PromptError, Result};

/// Directory name for templates shipped with the crate
pub const PROMPTS_DIR_NAME: &str = "prompts";

/// Loads prompt templates from a directory
#[derive(Debug, Clone)]
pub struct PromptLoader {
    /// Base directory containing prompt template files
    prompts_dir: PathBuf,
}

impl Default for PromptLoader {
    /// Loader rooted at the crate's own `prompts/` directory, independent of the
    /// caller's working directory
    fn default() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join(PROMPTS_DIR_NAME))
    }
}

impl PromptLoader {
    /// Create a new PromptLoader with the given prompts directory
    pub fn new(prompts_dir: impl AsRef<Path>) -> Self {
        Self {
            prompts_dir: prompts_dir.as_ref().to_path_buf(),
        }
    }

    /// Load a template from disk
    ///
    /// # Arguments
    /// * `filename` - File name relative to the prompts directory (e.g. `meal_plan.txt`)
    ///
    /// # Returns
    /// The template content with surrounding whitespace trimmed
    pub fn load(&self, filename: &str) -> Result<String> {
        let path = self.prompt_path(filename);
        if !path.is_file() {
            return Err(PromptError::NotFound(path));
        }

        let content = std::fs::read_to_string(&path)?;
        debug!("Loaded prompt template {} ({} bytes)", path.display(), content.len());
        Ok(content.trim().to_string())
    }

    /// Check if a template exists on disk
    pub fn exists(&self, filename: &str) -> bool {
        self.prompt_path(filename).is_file()
    }

    /// Get the full path for a template by file name
    fn prompt_path(&self, filename: &str) -> PathBuf {
        self.prompts_dir.join(filename)
    }

    /// List all template files in the directory, sorted by name
    pub fn list_available(&self) -> Result<Vec<String>> {
        let entries = std::fs::read_dir(&self.prompts_dir)?;

        let mut templates = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_file()
                && let Some(name) = path.file_name().and_then(|n| n.to_str())
            {
                templates.push(name.to_string());
            }
        }

        templates.sort();
        Ok(templates)
    }

    /// Get the prompts directory path
    pub fn prompts_dir(&self) -> &Path {
        &self.prompts_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_loader() -> (PromptLoader, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let loader = PromptLoader::new(temp_dir.path());
        (loader, temp_dir)
    }

    fn write_template(temp_dir: &TempDir, name: &str, content: &str) {
        fs::write(temp_dir.path().join(name), content).unwrap();
    }

    #[test]
    fn test_new_loader() {
        let (loader, temp_dir) = create_test_loader();
        assert_eq!(loader.prompts_dir(), temp_dir.path());
    }

    #[test]
    fn test_default_loader_uses_crate_prompts_dir() {
        let loader = PromptLoader::default();
        assert!(loader.prompts_dir().ends_with(PROMPTS_DIR_NAME));
        assert!(loader.prompts_dir().is_absolute());
    }

    #[test]
    fn test_load_template_trims_whitespace() {
        let (loader, temp_dir) = create_test_loader();
        write_template(&temp_dir, "greet.txt", "\n  Hello {{name}}!  \n\n");

        let content = loader.load("greet.txt").unwrap();
        assert_eq!(content, "Hello {{name}}!");
    }

    #[test]
    fn test_load_is_not_cached() {
        let (loader, temp_dir) = create_test_loader();
        write_template(&temp_dir, "test.txt", "Original content");
        assert_eq!(loader.load("test.txt").unwrap(), "Original content");

        write_template(&temp_dir, "test.txt", "Modified content");
        assert_eq!(loader.load("test.txt").unwrap(), "Modified content");
    }

    #[test]
    fn test_load_nonexistent() {
        let (loader, temp_dir) = create_test_loader();
        let err = loader.load("nonexistent.txt").unwrap_err();
        assert!(err.is_not_found());
        match err {
            PromptError::NotFound(path) => assert_eq!(path, temp_dir.path().join("nonexistent.txt")),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_load_directory_is_not_found() {
        let (loader, temp_dir) = create_test_loader();
        fs::create_dir(temp_dir.path().join("nested")).unwrap();
        assert!(matches!(loader.load("nested"), Err(PromptError::NotFound(_))));
    }

    #[test]
    fn test_exists() {
        let (loader, temp_dir) = create_test_loader();
        write_template(&temp_dir, "exists.txt", "content");

        assert!(loader.exists("exists.txt"));
        assert!(!loader.exists("nonexistent.txt"));
    }

    #[test]
    fn test_list_available() {
        let (loader, temp_dir) = create_test_loader();
        write_template(&temp_dir, "plan.txt", "plan template");
        write_template(&temp_dir, "chef.txt", "chef template");
        fs::create_dir(temp_dir.path().join("subdir")).unwrap();

        let available = loader.list_available().unwrap();
        assert_eq!(available, vec!["chef.txt", "plan.txt"]);
    }

    #[test]
    fn test_list_available_missing_dir() {
        let loader = PromptLoader::new("/definitely/not/a/real/prompts/dir");
        let err = loader.list_available().unwrap_err();
        assert!(err.is_not_found());
    }
}
