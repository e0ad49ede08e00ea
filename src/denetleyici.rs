use colored::Colorize;
use env_logger::Env;
use log::{error, info};
use std::path::PathBuf;

use clap::Parser;
mod libeslestirme;
use crate::libeslestirme::soru::QuizItem;

#[derive(Parser, Debug)]
#[command(name = "Denetleyici")]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "info")]
    log_level: String,

    sorular: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level)).init();

    let sorular = match args.sorular {
        Some(f) => f,
        None => {
            error!("{}", "Question file not specified!".red());
            std::process::exit(1);
        }
    };
    info!(
        "{}",
        format!("Checking question file {:?}", sorular).cyan()
    );

    let json = std::fs::read_to_string(sorular).unwrap();
    let items: Vec<QuizItem> = match serde_json::from_str(json.as_str()) {
        Ok(c) => c,
        Err(error) => {
            error!("{}", format!("Malformed JSON: {}!", error).red());
            std::process::exit(1);
        }
    };

    let mut matchings = 0usize;
    let mut problems = 0usize;
    for item in &items {
        let Some(matching) = &item.matching else {
            continue;
        };
        matchings += 1;
        info!(
            "{}",
            format!(
                "├ Matching: {} ({} questions, id {})",
                matching.title,
                matching.questions.len(),
                matching.id
            )
            .blue()
        );
        for (index, question) in matching.questions.iter().enumerate() {
            info!(
                "{}",
                format!(
                    "│ ├ {}. {} ({} prompts, {} answers)",
                    index + 1,
                    question.title,
                    question.question.len(),
                    question.correct_answer.len()
                )
                .blue()
            );
            // prompts pair with answers by index, so the lengths have to agree
            if question.question.len() != question.correct_answer.len() {
                problems += 1;
                error!(
                    "{} {}",
                    "│ │".blue(),
                    "├ ✘ prompt and answer counts differ".red()
                );
            }
            for (pos, prompt) in question.question.iter().enumerate() {
                if prompt.is_empty() {
                    problems += 1;
                    error!(
                        "{} {}",
                        "│ │".blue(),
                        format!("├ ✘ prompt {} is empty", pos + 1).red()
                    );
                }
            }
            for (pos, answer) in question.correct_answer.iter().enumerate() {
                if answer.is_empty() {
                    problems += 1;
                    error!(
                        "{} {}",
                        "│ │".blue(),
                        format!("├ ✘ answer {} is empty", pos + 1).red()
                    );
                }
            }
        }
    }

    if matchings == 0 {
        println!("{}", "No matching blocks in this file!".yellow());
    }
    if problems > 0 {
        println!("{}", format!("{} problem(s) found.", problems).bright_red());
        std::process::exit(1);
    }
    println!(
        "{}",
        format!("{} matching block(s), no problems found.", matchings).bright_green()
    );
}
