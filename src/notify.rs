use std::io::{BufRead, Write};

use anyhow::Result;
use colored::Colorize;

pub fn info(msg: &str) {
    println!("{} {}", "info:".blue().bold(), msg);
}

pub fn ok(msg: &str) {
    println!("{} {}", "ok:".green().bold(), msg);
}

pub fn warning(msg: &str) {
    println!("{} {}", "warning:".yellow().bold(), msg);
}

/// Token-related messages never reach the user; everything else is shown.
pub fn error(msg: &str) {
    if is_suppressed(msg) {
        return;
    }

    println!("{} {}", "error:".red().bold(), msg);
}

pub fn is_suppressed(msg: &str) -> bool {
    msg.to_lowercase().contains("token")
}

/// `[y/N]` prompt on stdin. Anything but an explicit yes is a no.
pub fn confirm(prompt: &str) -> Result<bool> {
    print!("{} {} [y/N] ", "confirm:".cyan().bold(), prompt);
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;

    let answer = answer.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_messages_are_suppressed() {
        assert!(is_suppressed("Invalid token"));
        assert!(is_suppressed("TOKEN expired"));
        assert!(!is_suppressed("Workouts not found"));
    }
}
