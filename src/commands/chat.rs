//! Talking to personas through the generation client

use colored::*;
use eyre::{Context, Result};
use std::io::{self, BufRead, Write};

use super::{find_profile, open_repository};
use crate::config::Config;
use crate::generation::{GenerationClient, OpenAiClient};
use crate::persona::agent::{PersonaAgent, Reply};
use crate::profile::Profile;
use crate::profile::repository::ProfileRepository;
use crate::semantic::CategoryTable;

const EXIT_WORDS: &[&str] = &["quit", "exit", "bye"];

fn build_agent<'a>(profile: &'a Profile, config: &Config) -> Result<PersonaAgent<'a, OpenAiClient>> {
    let api_key = Config::api_key()?;
    let client = OpenAiClient::new(&config.generation.api_base, &api_key);
    let agent = PersonaAgent::new(
        profile,
        CategoryTable::builtin(),
        client,
        config.generation.options(),
    )?;
    Ok(agent)
}

fn print_reply(name: &str, reply: &Reply) {
    println!();
    println!("{}", format!("─── {} ", name).blue().bold());
    match reply {
        Reply::Answer(text) => println!("{}", text),
        Reply::Fallback { text, cause } => {
            log::warn!("Showing fallback reply: {}", cause);
            println!("{}", text.yellow());
        }
    }
    println!();
}

pub fn ask(id: &str, question: &str, config: &Config) -> Result<()> {
    let repo = open_repository(config)?;
    let profile = find_profile(&repo, id)?;
    let agent = build_agent(profile, config)?;

    println!("{} {}", agent.name().blue().bold(), "thinking...".dimmed());
    let reply = agent.respond(question)?;
    print_reply(agent.name(), &reply);

    Ok(())
}

pub fn run(id: Option<&str>, config: &Config) -> Result<()> {
    let repo = open_repository(config)?;
    if repo.is_empty() {
        eyre::bail!("No profiles found in {}", repo.profiles_dir().display());
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();

    let profile = match id {
        Some(id) => find_profile(&repo, id)?,
        None => select_profile(&repo, &mut input)?,
    };
    let agent = build_agent(profile, config)?;

    println!();
    println!("{} {}", "Selected Profile:".bold(), agent.name().green().bold());
    let selected = agent.profile();
    if !selected.affiliations.traditions.is_empty() {
        println!("{}", format!("Tradition: {}", selected.traditions()).dimmed());
    }
    if !selected.thesis.is_empty() {
        println!("{}", format!("Core Teaching: {}", selected.thesis).dimmed());
    }
    println!();
    println!("{}", format!("Chatting with {}", agent.name()).blue().bold());
    println!("{}", "Type 'quit' to end the conversation".dimmed());
    println!();

    chat_loop(&agent, &mut input)
}

fn chat_loop<C: GenerationClient>(agent: &PersonaAgent<'_, C>, input: &mut impl BufRead) -> Result<()> {
    loop {
        let Some(line) = read_line(&format!("{}", "You: ".green().bold()), input)? else {
            println!();
            break;
        };
        let message = line.trim();

        if message.is_empty() {
            continue;
        }

        if EXIT_WORDS.contains(&message.to_lowercase().as_str()) {
            println!();
            println!(
                "{} Thank you for our conversation. May you find clarity in your own inquiry.",
                format!("{}:", agent.name()).blue().bold()
            );
            break;
        }

        println!("{} {}", format!("{}:", agent.name()).blue().bold(), "thinking...".dimmed());
        let reply = agent.respond(message)?;
        print_reply(agent.name(), &reply);
    }

    Ok(())
}

/// Pick a profile: the only one if there is just one, otherwise a numbered menu
fn select_profile<'a>(repo: &'a ProfileRepository, input: &mut impl BufRead) -> Result<&'a Profile> {
    let profiles: Vec<&Profile> = repo.profiles().collect();
    if let [only] = profiles.as_slice() {
        return Ok(*only);
    }

    println!("{}", "Available Profiles:".bold());
    for (i, profile) in profiles.iter().enumerate() {
        println!("  {}. {} - {}", i + 1, profile.id.blue(), profile.canonical_name);
    }

    loop {
        let Some(choice) = read_line("\nSelect profile number [1]: ", input)? else {
            eyre::bail!("No profile selected");
        };
        let choice = choice.trim();
        let choice = if choice.is_empty() { "1" } else { choice };

        match parse_choice(choice, profiles.len()) {
            Some(index) => return Ok(profiles[index]),
            None => eprintln!("{} Invalid choice. Please enter a number from 1 to {}.", "✗".red(), profiles.len()),
        }
    }
}

/// 1-based menu choice to index
fn parse_choice(choice: &str, count: usize) -> Option<usize> {
    choice
        .parse::<usize>()
        .ok()
        .filter(|&n| n >= 1 && n <= count)
        .map(|n| n - 1)
}

/// Print a prompt and read one line; `None` on end of input
fn read_line(prompt: &str, input: &mut impl BufRead) -> Result<Option<String>> {
    print!("{}", prompt);
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut line = String::new();
    let read = input.read_line(&mut line).context("Failed to read input")?;
    if read == 0 { Ok(None) } else { Ok(Some(line)) }
}
