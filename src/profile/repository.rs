//! Profile loading and lookup

use eyre::{Context, Result};
use indexmap::IndexMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::Profile;

/// A profile file that could not be loaded
#[derive(Debug, Clone)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of a directory load
#[derive(Debug, Default)]
pub struct LoadReport {
    pub loaded: usize,
    pub failures: Vec<LoadFailure>,
}

/// Profile repository backed by a directory of JSON files
pub struct ProfileRepository {
    profiles_dir: PathBuf,
    profiles: IndexMap<String, Profile>,
}

impl ProfileRepository {
    /// Create an empty repository for a directory
    pub fn new(profiles_dir: PathBuf) -> Self {
        Self {
            profiles_dir,
            profiles: IndexMap::new(),
        }
    }

    /// Create a repository and load it immediately
    pub fn open(profiles_dir: PathBuf) -> Result<(Self, LoadReport)> {
        let mut repo = Self::new(profiles_dir);
        let report = repo.load_all()?;
        Ok((repo, report))
    }

    /// Load every `*.json` profile in the directory.
    ///
    /// Bad files are skipped and reported; only an unreadable directory is an error.
    pub fn load_all(&mut self) -> Result<LoadReport> {
        let mut report = LoadReport::default();
        self.profiles.clear();

        if !self.profiles_dir.exists() {
            log::warn!("Profiles directory not found: {}", self.profiles_dir.display());
            return Ok(report);
        }

        let entries = fs::read_dir(&self.profiles_dir)
            .with_context(|| format!("Failed to read profiles directory: {}", self.profiles_dir.display()))?;

        let mut paths: Vec<PathBuf> = entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| p.is_file() && p.extension().map(|e| e == "json").unwrap_or(false))
            .collect();
        paths.sort();

        for path in paths {
            match self.load_profile(&path) {
                Ok(profile) => {
                    if self.profiles.contains_key(&profile.id) {
                        let reason = format!("duplicate profile id '{}'", profile.id);
                        log::warn!("Skipping {}: {}", path.display(), reason);
                        report.failures.push(LoadFailure { path, reason });
                        continue;
                    }
                    log::info!("Loaded profile: {} ({})", profile.canonical_name, profile.id);
                    self.profiles.insert(profile.id.clone(), profile);
                    report.loaded += 1;
                }
                Err(e) => {
                    log::warn!("Failed to load profile from {}: {:#}", path.display(), e);
                    report.failures.push(LoadFailure {
                        path,
                        reason: format!("{:#}", e),
                    });
                }
            }
        }

        self.profiles.sort_keys();

        Ok(report)
    }

    /// Load and validate a single profile file
    pub fn load_profile(&self, path: &Path) -> Result<Profile> {
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read profile file: {}", path.display()))?;

        let mut profile: Profile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse profile file: {}", path.display()))?;

        if profile.id.trim().is_empty() {
            profile.id = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
        }

        if profile.name().is_none() {
            eyre::bail!("Profile '{}' has no canonical_name", profile.id);
        }

        Ok(profile)
    }

    /// Get a profile by id
    pub fn get(&self, id: &str) -> Option<&Profile> {
        self.profiles.get(id)
    }

    /// All profile ids, sorted
    pub fn ids(&self) -> Vec<&str> {
        self.profiles.keys().map(String::as_str).collect()
    }

    /// All profiles, sorted by id
    pub fn profiles(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.values()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Ids of profiles whose name, alt names or keywords contain `query` (case-insensitive)
    pub fn search(&self, query: &str) -> Vec<&str> {
        let query = query.trim().to_lowercase();
        self.profiles
            .values()
            .filter(|p| p.matches(&query))
            .map(|p| p.id.as_str())
            .collect()
    }

    /// Get the profiles directory
    pub fn profiles_dir(&self) -> &Path {
        &self.profiles_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, file: &str, content: &str) {
        fs::write(dir.join(file), content).unwrap();
    }

    fn fixture() -> TempDir {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "ramana.json",
            r#"{"id": "ramana-maharshi", "canonical_name": "Ramana Maharshi", "keywords": ["nonduality", "self-inquiry"]}"#,
        );
        write(
            temp.path(),
            "nisargadatta.json",
            r#"{"id": "nisargadatta-maharaj", "canonical_name": "Nisargadatta Maharaj", "alt_names": ["Maruti"], "keywords": ["I Am"]}"#,
        );
        temp
    }

    #[test]
    fn test_load_all() {
        let temp = fixture();
        let (repo, report) = ProfileRepository::open(temp.path().to_path_buf()).unwrap();

        assert_eq!(report.loaded, 2);
        assert!(report.failures.is_empty());
        assert_eq!(repo.ids(), vec!["nisargadatta-maharaj", "ramana-maharshi"]);
        assert_eq!(repo.get("ramana-maharshi").unwrap().canonical_name, "Ramana Maharshi");
        assert!(repo.get("unknown").is_none());
    }

    #[test]
    fn test_load_skips_bad_files() {
        let temp = fixture();
        write(temp.path(), "broken.json", "{ not json");
        write(temp.path(), "nameless.json", r#"{"id": "nameless"}"#);
        write(temp.path(), "notes.txt", "ignored");

        let (repo, report) = ProfileRepository::open(temp.path().to_path_buf()).unwrap();

        assert_eq!(repo.ids().len(), 2);
        assert_eq!(report.failures.len(), 2);
        assert!(report.failures.iter().any(|f| f.path.ends_with("broken.json")));
        assert!(report.failures.iter().any(|f| f.reason.contains("canonical_name")));
    }

    #[test]
    fn test_load_id_defaults_to_file_stem() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "anandamayi-ma.json", r#"{"canonical_name": "Anandamayi Ma"}"#);

        let (repo, _) = ProfileRepository::open(temp.path().to_path_buf()).unwrap();

        assert!(repo.get("anandamayi-ma").is_some());
    }

    #[test]
    fn test_load_accepts_null_optional_fields() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "sparse.json",
            r#"{"id": null, "canonical_name": "Sparse", "keywords": null, "care_notes": null, "affiliations": null}"#,
        );

        let (repo, report) = ProfileRepository::open(temp.path().to_path_buf()).unwrap();

        assert!(report.failures.is_empty());
        let profile = repo.get("sparse").unwrap();
        assert!(profile.keywords.is_empty());
        assert!(profile.care_notes.is_empty());
    }

    #[test]
    fn test_load_duplicate_id_first_wins() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "a.json", r#"{"id": "same", "canonical_name": "First"}"#);
        write(temp.path(), "b.json", r#"{"id": "same", "canonical_name": "Second"}"#);

        let (repo, report) = ProfileRepository::open(temp.path().to_path_buf()).unwrap();

        assert_eq!(repo.get("same").unwrap().canonical_name, "First");
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].reason.contains("duplicate"));
    }

    #[test]
    fn test_load_missing_dir_is_empty() {
        let temp = TempDir::new().unwrap();
        let (repo, report) = ProfileRepository::open(temp.path().join("nope")).unwrap();

        assert!(repo.is_empty());
        assert_eq!(report.loaded, 0);
    }

    #[test]
    fn test_search() {
        let temp = fixture();
        let (repo, _) = ProfileRepository::open(temp.path().to_path_buf()).unwrap();

        assert_eq!(repo.search("RAMANA"), vec!["ramana-maharshi"]);
        assert_eq!(repo.search("maruti"), vec!["nisargadatta-maharaj"]);
        assert_eq!(repo.search("nonduality"), vec!["ramana-maharshi"]);
        assert_eq!(repo.search("maha").len(), 2);
        assert!(repo.search("sufism").is_empty());
    }
}
