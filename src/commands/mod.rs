//! Subcommand implementations

pub mod chat;
pub mod completions;
pub mod config;
pub mod profile;
pub mod prompt;

use eyre::Result;

use crate::config::Config;
use crate::profile::Profile;
use crate::profile::repository::ProfileRepository;

/// Load the configured profiles directory, reporting skipped files on stderr
pub fn open_repository(config: &Config) -> Result<ProfileRepository> {
    use colored::*;

    let (repo, report) = ProfileRepository::open(config.profiles_dir())?;
    for failure in &report.failures {
        eprintln!(
            "{} Skipped {}: {}",
            "⚠".yellow(),
            failure.path.display(),
            failure.reason.dimmed()
        );
    }
    log::info!("Loaded {} profiles from {}", report.loaded, repo.profiles_dir().display());
    log::debug!("Profiles: {}", repo.ids().join(", "));
    Ok(repo)
}

/// Look up a profile or fail with a hint
pub fn find_profile<'a>(repo: &'a ProfileRepository, id: &str) -> Result<&'a Profile> {
    match repo.get(id) {
        Some(profile) => Ok(profile),
        None => eyre::bail!(
            "Profile '{}' not found in {} (run 'clearlist list' to see available profiles)",
            id,
            repo.profiles_dir().display()
        ),
    }
}
