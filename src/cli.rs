use crate::libeslestirme::oturum::{self, DropOutcome, Phase, Session, Summary};
use crate::libeslestirme::sayac::Ticker;
use crate::libeslestirme::ses::{Cue, CuePlayer};
use crate::libeslestirme::soru::{self, Fetch, PromptContent};
use crate::Error;
use colored::Colorize;
use log::debug;
use std::time::Duration;
use text_io::read;

#[derive(Debug, PartialEq)]
enum Command {
    Place(usize, usize),
    Next,
    Previous,
    Jump(usize),
    Finish,
    Quit,
    Unknown,
}

impl Command {
    fn from_str(input: &str) -> Command {
        let mut parts = input.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some("q"), _) => Command::Quit,
            (Some("s"), _) => Command::Finish,
            (Some("i"), _) => Command::Next,
            (Some("g"), _) => Command::Previous,
            (Some("n"), Some(num)) => match num.parse::<usize>() {
                Ok(num) if num >= 1 => Command::Jump(num - 1),
                _ => Command::Unknown,
            },
            (Some(answer), Some(prompt)) => {
                match (answer.parse::<usize>(), prompt.parse::<usize>()) {
                    (Ok(answer), Ok(prompt)) if answer >= 1 && prompt >= 1 => {
                        Command::Place(answer - 1, prompt - 1)
                    }
                    _ => Command::Unknown,
                }
            }
            _ => Command::Unknown,
        }
    }
}

pub fn cli_loop(fetch: Fetch, matching_id: &str, cues: &dyn CuePlayer) -> Result<(), Error> {
    println!("{}", "Yükleniyor...".yellow());
    let items = fetch.wait()?;
    let matching = soru::find_matching(&items, matching_id)
        .ok_or_else(|| Error::NotFound(matching_id.to_string()))?;

    let mut session = Session::new(matching);
    let ticker = Ticker::start(Duration::from_secs(1));

    println!(
        "{}",
        format!(
            "==========> {} ({} soru) <==========",
            session.matching().title,
            session.question_count()
        )
        .cyan()
    );
    println!(
        "{}",
        "Cevapları hedeflerle eşleştiriniz; `cevap hedef` bir cevabı bir hedefe bırakır.".yellow()
    );

    while session.phase() == Phase::Active {
        for _ in 0..ticker.poll() {
            session.tick();
        }
        print_question(&session);

        print!(
            "{} ",
            "Komut (`cevap hedef` bırakır, i=ileri, g=geri, n <numara>=atla, s=sınavı bitir, q=çık):"
                .cyan()
        );
        let line: String = read!("{}\n");
        let command = Command::from_str(line.as_str());
        debug!("command: {:?}", command);

        match command {
            Command::Place(chip_pos, prompt) => place(&mut session, cues, chip_pos, prompt),
            Command::Next => {
                session.advance_or_submit();
            }
            Command::Previous => session.previous(),
            Command::Jump(index) => {
                if index >= session.question_count() {
                    println!(
                        "{}",
                        format!("Sadece {} soru var!", session.question_count()).bright_red()
                    );
                } else {
                    session.jump(index);
                }
            }
            Command::Finish => {
                session.submit();
            }
            Command::Quit => {
                println!("{}", "Erken çıkılıyor!".cyan());
                session.exit();
            }
            Command::Unknown => println!("{}", "Anlaşılamadı.".bright_red()),
        }
    }

    for _ in 0..ticker.poll() {
        session.tick();
    }
    if let Some(summary) = session.summary() {
        print_summary(&session, summary);
        session.exit();
    }
    Ok(())
}

fn place(session: &mut Session, cues: &dyn CuePlayer, chip_pos: usize, prompt: usize) {
    let prompt_count = session
        .current_question()
        .map_or(0, |question| question.question.len());
    let Some(&chip) = session.chip_order().get(chip_pos) else {
        println!(
            "{}",
            format!("Sadece {} cevap var!", session.chip_order().len()).bright_red()
        );
        return;
    };
    if prompt >= prompt_count {
        println!(
            "{}",
            format!("Sadece {} hedef var!", prompt_count).bright_red()
        );
        return;
    }
    if session.is_consumed(chip) {
        println!("{}", "Bu cevap zaten bir hedefte duruyor.".bright_red());
        return;
    }
    cues.play(Cue::Pickup);
    match session.drag_ended(&chip.to_string(), Some(&oturum::drop_zone_id(prompt))) {
        Some(DropOutcome::Correct) => cues.play(Cue::Correct),
        Some(DropOutcome::Incorrect) => cues.play(Cue::Wrong),
        None => {}
    }
}

fn print_question(session: &Session) {
    let Some(question) = session.current_question() else {
        return;
    };
    println!();
    println!(
        "{}{}",
        format!(
            "{}/{}. ",
            session.current_index() + 1,
            session.question_count()
        )
        .cyan(),
        question.title.clone().black().bold().on_white()
    );
    println!(
        "{}",
        format!("Geçen Süre: {}", session.elapsed()).yellow()
    );

    println!("{}", "Hedefler:".cyan());
    for (index, prompt) in question.question.iter().enumerate() {
        let shown = match soru::classify_prompt(prompt) {
            PromptContent::Image(url) => format!("[görsel] {url}"),
            PromptContent::Text(text) => text.to_string(),
        };
        print!("  {}. {} -> ", format!("{}", index + 1).bold(), shown);
        match session.placed_answer(index) {
            Some((text, true)) => println!("{}", text.bright_green()),
            Some((text, false)) => println!("{}", text.bright_red()),
            None => println!("{}", "(boş)".dimmed()),
        }
    }

    println!("{}", "Cevaplar:".cyan());
    for (pos, &chip) in session.chip_order().iter().enumerate() {
        let text = &question.correct_answer[chip];
        if session.is_consumed(chip) {
            println!(
                "  {}. {}",
                format!("{}", pos + 1).bold(),
                format!("{} (kullanıldı)", text).dimmed()
            );
        } else {
            println!("  {}. {}", format!("{}", pos + 1).bold(), text);
        }
    }
}

fn print_summary(session: &Session, summary: Summary) {
    let prompt_count = session
        .current_question()
        .map_or(0, |question| question.question.len());
    println!();
    println!("{}", "==========> Sınav Sonucu <==========".cyan());
    println!("{}", oturum::SCORING_RULE.yellow());
    println!("Toplam Soru: {prompt_count}");
    println!("Doğru Sayısı: {}", summary.correct.to_string().bright_green());
    println!(
        "Yanlış Sayısı: {}",
        summary.incorrect.to_string().bright_red()
    );
    println!("Boş Sayısı: {}", summary.empty.to_string().dimmed());
    println!(
        "{}",
        format!("Toplam Puan: {}", summary.total_points).bold()
    );
    println!("Geçen Süre: {}", session.elapsed());
}
