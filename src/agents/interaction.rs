use crate::error::{Result, SvcupError};
use colored::Colorize;
use std::io::{self, BufRead, Write};

/// Asks the operator before each manifest rewrite.
///
/// Disabled interaction approves every update without prompting.
pub struct UpdateInteraction {
    enabled: bool,
    apply_all: bool,
    input: Box<dyn BufRead>,
}

impl UpdateInteraction {
    pub fn new(enabled: bool) -> Self {
        let input: Box<dyn BufRead> = if enabled {
            Box::new(io::stdin().lock())
        } else {
            Box::new(io::empty())
        };

        Self {
            enabled,
            apply_all: false,
            input,
        }
    }

    #[cfg(test)]
    pub fn scripted(answers: &str) -> Self {
        Self {
            enabled: true,
            apply_all: false,
            input: Box::new(io::Cursor::new(answers.to_string())),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Confirm pinning `service` from `old` to `new`
    pub fn confirm(&mut self, service: &str, old: &str, new: &str) -> Result<bool> {
        if !self.enabled {
            return Ok(true);
        }

        println!(
            "\n{} {}: {} {} {}",
            "[Pin]".cyan().bold(),
            service.white().bold(),
            old.red(),
            "→".dimmed(),
            new.green().bold()
        );

        if self.apply_all {
            println!("{}", "Pinning (all remaining accepted).".dimmed());
            return Ok(true);
        }

        loop {
            print!("{}", "Pin this version? [Y/n/a/q]: ".bold());
            io::stdout().flush()?;

            let mut answer = String::new();
            if self.input.read_line(&mut answer)? == 0 {
                return Err(SvcupError::UserCancelled);
            }

            match answer.trim().to_lowercase().as_str() {
                "" | "y" | "yes" => return Ok(true),
                "n" | "no" => {
                    println!("{}", format!("Keeping {old} for {service}.").dimmed());
                    return Ok(false);
                }
                "a" | "all" => {
                    println!("{}", "Pinning every remaining update.".green().bold());
                    self.apply_all = true;
                    return Ok(true);
                }
                "q" | "quit" => {
                    println!("{}", "Leaving the manifest as it is now.".yellow());
                    return Err(SvcupError::UserCancelled);
                }
                other => println!(
                    "{}",
                    format!("'{other}' is not an answer; use y, n, a or q.").red()
                ),
            }
        }
    }
}
