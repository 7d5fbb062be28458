//! The `eduflex chat` command.

use std::io::{BufRead, Write};

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use eduflex_core::chatbot::CareerBot;

pub fn execute(message: Option<String>, seed: Option<u64>) -> Result<()> {
    let bot = CareerBot::with_default_advice()?;
    let mut rng: Box<dyn RngCore> = match seed {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(rand::rng()),
    };

    if let Some(message) = message {
        if let Some(reply) = bot.reply(&message, rng.as_mut()) {
            println!("{reply}");
        }
        return Ok(());
    }

    println!("Ask about careers after 12th, engineering or medicine. Type 'bye' to leave.");
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("you> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        if matches!(line.trim().to_lowercase().as_str(), "bye" | "exit" | "quit") {
            println!("bot> Goodbye!");
            break;
        }
        if let Some(reply) = bot.reply(&line, rng.as_mut()) {
            println!("bot> {reply}");
        }
    }
    Ok(())
}
