//! Interactive text front end: a numbered menu read from any `BufRead`.
//!
//! The shell only turns answers into [`Command`]s and prints [`Outcome`](crate::Outcome)s;
//! everything else goes through [`Ledger::execute`].

use rust_decimal::Decimal;
use std::io::{self, BufRead, Write};
use std::str::FromStr;
use tracing::{error, info};

use crate::ledger::{Command, Ledger};
use crate::stores::RecordBackend;
use crate::Error;

const MENU: &str = "
1. Add Student
2. Record Payment
3. Display Student Details
4. Display Due Fees
5. Exit";

type Result<T, E = Box<dyn std::error::Error + Send + Sync>> = std::result::Result<T, E>;

struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// Prints `label` and reads one trimmed line. `None` means end of input.
    fn ask(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn say(&mut self, message: impl std::fmt::Display) -> io::Result<()> {
        writeln!(self.output, "{}", message)
    }
}

fn parse_amount(raw: &str) -> Result<Decimal, Error> {
    Decimal::from_str(raw).map_err(|_| Error::InvalidInput(format!("{:?} is not a number", raw)))
}

/// Runs the menu loop until the user picks Exit or input ends.
///
/// Exiting does not save anything: every accepted change was already written
/// by the ledger. A storage failure ends the session with an error.
pub fn run<B, R, W>(ledger: &mut Ledger<B>, input: R, output: W) -> Result<()>
where
    B: RecordBackend,
    R: BufRead,
    W: Write,
{
    let mut prompter = Prompter { input, output };
    info!("shell session started");

    loop {
        prompter.say(MENU)?;
        let Some(choice) = prompter.ask("Enter your choice: ")? else {
            break;
        };

        let command = match choice.as_str() {
            "1" => {
                let Some(name) = prompter.ask("Enter student name: ")? else { break };
                let Some(id) = prompter.ask("Enter student ID: ")? else { break };
                let Some(fees) = prompter.ask("Enter fees amount: ")? else { break };
                parse_amount(&fees).map(|fees| Command::Add { name, id, fees })
            }
            "2" => {
                let Some(id) = prompter.ask("Enter student ID: ")? else { break };
                let Some(amount) = prompter.ask("Enter the amount paid: ")? else { break };
                parse_amount(&amount).map(|amount| Command::Pay { id, amount })
            }
            "3" => {
                let Some(id) = prompter.ask("Enter student ID: ")? else { break };
                Ok(Command::Details { id })
            }
            "4" => {
                let Some(id) = prompter.ask("Enter student ID: ")? else { break };
                Ok(Command::DueFees { id })
            }
            "5" => break,
            _ => {
                prompter.say("Invalid choice. Please enter a number from 1 to 5.")?;
                continue;
            }
        };

        match command.and_then(|command| ledger.execute(command)) {
            Ok(outcome) => prompter.say(outcome)?,
            Err(err @ Error::StorageUnavailable { .. }) => {
                error!(error = %err, "could not persist change, ending session");
                prompter.say(format!("Error: {}", err))?;
                return Err(err.into());
            }
            Err(err) => prompter.say(format!("Error: {}", err))?,
        }
    }

    info!("shell session ended");
    Ok(())
}
