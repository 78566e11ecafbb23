// 🖥️ Console Mode - line-oriented front-end over any reader/writer
//
//   deposit <pin> <amount>
//   withdraw <pin> <amount>
//   balance <pin>
//   change-pin <old> <new>
//   help | quit | exit

use crate::session::Teller;
use anyhow::Result;
use std::io::{BufRead, Write};

const USAGE: &str = "Commands: deposit <pin> <amount> | withdraw <pin> <amount> | \
balance <pin> | change-pin <old> <new> | help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    Deposit { pin: &'a str, amount: &'a str },
    Withdraw { pin: &'a str, amount: &'a str },
    Balance { pin: &'a str },
    ChangePin { old_pin: &'a str, new_pin: &'a str },
    Help,
    Quit,
    /// Unrecognised name or wrong number of arguments
    Unknown,
}

impl<'a> Command<'a> {
    /// None for blank lines
    pub fn parse(line: &'a str) -> Option<Self> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let (name, args) = parts.split_first()?;

        let command = match (name.to_lowercase().as_str(), args) {
            ("deposit", &[pin, amount]) => Command::Deposit { pin, amount },
            ("withdraw", &[pin, amount]) => Command::Withdraw { pin, amount },
            ("balance", &[pin]) => Command::Balance { pin },
            ("change-pin", &[old_pin, new_pin]) => Command::ChangePin { old_pin, new_pin },
            ("help", &[]) => Command::Help,
            ("quit" | "exit", &[]) => Command::Quit,
            _ => Command::Unknown,
        };

        Some(command)
    }
}

/// Run commands until `quit` or end of input
pub fn run_console<R: BufRead, W: Write>(teller: &mut Teller, input: R, mut output: W) -> Result<()> {
    writeln!(output, "{}", teller.status().message)?;
    writeln!(output, "{}", USAGE)?;

    for line in input.lines() {
        let line = line?;

        let Some(command) = Command::parse(&line) else {
            continue;
        };

        let message = match command {
            Command::Deposit { pin, amount } => {
                fill(teller, pin, amount);
                teller.deposit_action().message.clone()
            }
            Command::Withdraw { pin, amount } => {
                fill(teller, pin, amount);
                teller.withdraw_action().message.clone()
            }
            Command::Balance { pin } => {
                fill(teller, pin, "");
                teller.check_balance_action().message.clone()
            }
            Command::ChangePin { old_pin, new_pin } => {
                fill(teller, old_pin, "");
                teller.change_pin_action(new_pin).message.clone()
            }
            Command::Help => USAGE.to_string(),
            Command::Unknown => format!("Unrecognised command. {}", USAGE),
            Command::Quit => break,
        };

        writeln!(output, "{}", message)?;
        teller.clear_inputs();
    }

    output.flush()?;
    Ok(())
}

fn fill(teller: &mut Teller, pin: &str, amount: &str) {
    teller.pin_input = pin.to_string();
    teller.amount_input = amount.to_string();
}
