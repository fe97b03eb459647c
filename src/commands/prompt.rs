//! Classification and prompt preview

use colored::*;
use eyre::Result;

use super::{find_profile, open_repository};
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::persona::prompt::assemble;
use crate::semantic::{CategoryTable, classify as classify_question};

pub fn classify(question: &str, format: OutputFormat) -> Result<()> {
    let table = CategoryTable::builtin();
    let scores = classify_question(question, table);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&scores)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&scores)?),
        OutputFormat::Text => {
            println!("{} {}", "Question:".bold(), question);
            println!();
            if scores.is_zero() {
                println!("  {}", "(no category matched)".dimmed());
                return Ok(());
            }

            let folded = question.to_lowercase();
            for (category, score) in scores.iter() {
                let label = format!("{:<22}", category.as_str());
                if score > 0 {
                    let matched: Vec<&str> = table
                        .keywords(category)
                        .iter()
                        .map(String::as_str)
                        .filter(|kw| folded.contains(kw))
                        .collect();
                    println!(
                        "  {} {} {}",
                        label.cyan(),
                        score.to_string().green().bold(),
                        format!("({})", matched.join(", ")).dimmed()
                    );
                } else {
                    println!("  {} {}", label.dimmed(), "0".dimmed());
                }
            }
        }
    }

    Ok(())
}

pub fn prompt(id: &str, question: &str, show_scores: bool, config: &Config) -> Result<()> {
    let repo = open_repository(config)?;
    let profile = find_profile(&repo, id)?;

    let scores = classify_question(question, CategoryTable::builtin());
    log::debug!("Scores for {:?}: {}", question, scores);
    let assembled = assemble(profile, question, &scores)?;

    if show_scores {
        let sections: Vec<&str> = assembled.sections.iter().map(|c| c.as_str()).collect();
        eprintln!("{} {}", "Scores:".bold(), scores);
        eprintln!("{} {}", "Sections:".bold(), sections.join(", "));
        eprintln!("{} {}", "Tone:".bold(), assembled.tone.directive());
        if !assembled.focus.is_empty() {
            eprintln!("{} {}", "Focus:".bold(), assembled.focus.join(", "));
        }
        eprintln!();
    }

    println!("{}", assembled);

    Ok(())
}
