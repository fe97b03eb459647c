//! Profile listing, display and search

use colored::*;
use eyre::Result;
use serde::Serialize;

use super::{find_profile, open_repository};
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::profile::Profile;

#[derive(Serialize)]
struct ProfileSummary {
    id: String,
    name: String,
    traditions: Vec<String>,
}

impl From<&Profile> for ProfileSummary {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id.clone(),
            name: profile.canonical_name.clone(),
            traditions: profile.affiliations.traditions.clone(),
        }
    }
}

fn print_summaries(summaries: &[ProfileSummary], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(summaries)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(summaries)?),
        OutputFormat::Text => {
            for summary in summaries {
                print!("  {} {} - {}", "●".green(), summary.id.blue(), summary.name.bold());
                if !summary.traditions.is_empty() {
                    print!(" ({})", summary.traditions.join(", ").dimmed());
                }
                println!();
            }
        }
    }
    Ok(())
}

pub fn list(format: OutputFormat, config: &Config) -> Result<()> {
    let repo = open_repository(config)?;
    let summaries: Vec<ProfileSummary> = repo.profiles().map(ProfileSummary::from).collect();

    if format == OutputFormat::Text {
        println!("{}", "Available Profiles:".bold());
        println!();
        if summaries.is_empty() {
            println!("  {} No profiles found in {}", "(none)".dimmed(), repo.profiles_dir().display());
            return Ok(());
        }
    }

    print_summaries(&summaries, format)
}

pub fn search(query: &str, format: OutputFormat, config: &Config) -> Result<()> {
    let repo = open_repository(config)?;
    let summaries: Vec<ProfileSummary> = repo
        .search(query)
        .into_iter()
        .filter_map(|id| repo.get(id))
        .map(ProfileSummary::from)
        .collect();

    if format == OutputFormat::Text && summaries.is_empty() {
        println!("{} No profiles match '{}'", "✗".red(), query);
        return Ok(());
    }

    print_summaries(&summaries, format)
}

pub fn show(id: &str, format: OutputFormat, config: &Config) -> Result<()> {
    let repo = open_repository(config)?;
    let profile = find_profile(&repo, id)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(profile)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(profile)?),
        OutputFormat::Text => print_profile(profile),
    }

    Ok(())
}

fn print_profile(profile: &Profile) {
    print!("{} {}", "Profile:".bold(), profile.canonical_name.green().bold());
    if let Some(pronunciation) = profile.pronunciation() {
        print!(" {}", format!("({})", pronunciation).dimmed());
    }
    println!();
    println!("{} {}", "Id:".bold(), profile.id);

    if !profile.affiliations.traditions.is_empty() {
        println!("{} {}", "Tradition:".bold(), profile.traditions().cyan());
    }

    if !profile.thesis.is_empty() {
        println!();
        println!("{}", "Core Teaching:".bold());
        println!("  {}", profile.thesis);
    }

    if !profile.claims.is_empty() {
        println!();
        println!("{}", "Claims:".bold());
        for claim in &profile.claims {
            println!("  {} {}", "•".cyan(), claim.text);
        }
    }

    if !profile.practice.is_empty() {
        println!();
        println!("{}", "Practices:".bold());
        for practice in &profile.practice {
            println!("  {} ({} steps)", practice.name.bold(), practice.steps.len());
            for (i, step) in practice.steps.iter().enumerate() {
                println!("    {}. {}", i + 1, step);
            }
        }
    }

    if !profile.keywords.is_empty() {
        println!();
        println!("{} {}", "Keywords:".bold(), profile.keywords.join(", ").magenta());
    }

    if !profile.alt_names.is_empty() {
        println!("{} {}", "Also known as:".bold(), profile.alt_names.join(", "));
    }

    if !profile.care_notes.is_empty() {
        println!();
        println!("{}", "Care Notes:".bold());
        for note in &profile.care_notes {
            println!("  {} {}", "!".yellow(), note.italic());
        }
    }
}
