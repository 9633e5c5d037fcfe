use phf::{Map, phf_map};
use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use thousands::Separable;
use tokio::sync::mpsc;

/// Type alias for a function that operates on two f64s and returns an f64.
type BinaryHandler = fn(f64, f64) -> f64;
mod binary;
pub mod config;
mod engine;
mod error;
mod format;
pub mod history;
pub mod session;
mod special;
pub mod translate;
mod unary;

pub use config::Config;
pub use engine::{Action, Calculation, EngineState, Operator, Outcome, dispatch};
pub use error::CalcError;
pub use format::{format_result, number_to_string, parse_display};
pub use history::{History, HistoryEntry};
pub use session::{Session, TranslationDone};
pub use translate::translate;

/// Every keypad token the REPL understands, besides plain digits:
/// 1. Token (Key, lower case)
/// 2. Help Group (&'static str)
/// 3. Usage String (&'static str)
/// 4. Action dispatched to the engine
const KEY_DATA: Map<&'static str, (&'static str, &'static str, Action)> = phf_map! {
    // Entry
    "." => ("Entry", ". | Decimal point", Action::Decimal),
    "backspace" => ("Entry", "backspace | Delete the last typed character", Action::Backspace),
    "bs" => ("Entry", "bs | Same as backspace", Action::Backspace),
    "neg" => ("Entry", "neg | Toggle the sign (+/-)", Action::ToggleSign),
    "+/-" => ("Entry", "+/- | Toggle the sign", Action::ToggleSign),

    // Operators
    "+" => ("Operators", "+ | Addition", Action::Operator(Operator::Add)),
    "-" => ("Operators", "- | Subtraction", Action::Operator(Operator::Subtract)),
    "*" => ("Operators", "* | Multiplication", Action::Operator(Operator::Multiply)),
    "/" => ("Operators", "/ | Division", Action::Operator(Operator::Divide)),
    "%" => ("Operators", "% | Remainder (sign follows the dividend)", Action::Operator(Operator::Remainder)),
    "=" => ("Operators", "= | Finish the calculation", Action::Operator(Operator::Equals)),
    "enter" => ("Operators", "enter | Same as =", Action::Operator(Operator::Equals)),

    // Unary
    "sq" => ("Unary", "sq | Square the displayed value (x²)", Action::Square),
    "sqrt" => ("Unary", "sqrt | Square root of the displayed value (√x)", Action::SquareRoot),

    // Clearing
    "ce" => ("Clear", "ce | Clear the current entry", Action::ClearEntry),
    "ac" => ("Clear", "ac | Clear everything except memory", Action::ClearAll),
    "escape" => ("Clear", "escape | Same as ac", Action::ClearAll),

    // Memory
    "ms" => ("Memory", "ms | Save the displayed value to memory", Action::MemorySave),
    "mr" => ("Memory", "mr | Recall the memory value", Action::MemoryRecall),
    "mc" => ("Memory", "mc | Clear the memory", Action::MemoryClear),
};

/// Session commands handled by the REPL itself.
const COMMANDS: &[(&str, &str)] = &[
    ("? <phrase>", "Translate a natural-language phrase, e.g. '? half of 24 plus tax at 8%'"),
    ("cancel", "Abandon the translation in flight"),
    ("history", "Show the last calculations, newest first"),
    ("clear-history", "Forget all calculations"),
    ("help [key]", "List all keys or show usage for [key]"),
    ("exit", "Quit"),
];

/// Looks up a keypad token, ignoring case.
pub fn lookup_key(token: &str) -> Option<Action> {
    KEY_DATA
        .get(token.to_lowercase().as_str())
        .map(|(_group, _usage, action)| *action)
}

/// Displays help for all keys or a specific key, reading from the key table.
fn display_help(token: &str) -> Result<(), CalcError> {
    if token.is_empty() {
        println!("\n--- Available Keys ---");
        println!("\n  ✨ Digits:");
        println!("    - {:<9} | Type digits directly, e.g. 42 or 3.14", "0-9");

        let mut grouped_help: HashMap<&'static str, Vec<(&'static str, &'static str)>> =
            HashMap::new();
        for (key, (group, usage, _action)) in KEY_DATA.entries() {
            grouped_help.entry(*group).or_default().push((*key, *usage));
        }

        for group in ["Entry", "Operators", "Unary", "Clear", "Memory"] {
            if let Some(items) = grouped_help.get_mut(group) {
                items.sort();
                println!("\n  ✨ {}:", group);
                for (key, usage) in items.iter() {
                    println!("    - {:<9} | {}", key, usage);
                }
            }
        }

        println!("\n  ✨ Commands:");
        for (command, usage) in COMMANDS {
            println!("    - {:<13} | {}", command, usage);
        }
    } else if let Some((group, usage, _action)) = KEY_DATA.get(token.to_lowercase().as_str()) {
        println!("\n--- Help for '{}' ---", token);
        println!("  Type: {}", group);
        println!("  Usage: {}", usage);
    } else {
        return Err(CalcError::UnknownKey(token.to_string()));
    }

    Ok(())
}

/// Helper to convert various Unicode digits and separators to ASCII digits and standard separators.
pub(crate) fn unicode_to_ascii(c: char) -> char {
    match c {
        // Persian (Extended Arabic-Indic) Digits
        '۰'..='۹' => char::from(b'0' + (c as u32 - '۰' as u32) as u8),
        // Standard Arabic (Arabic-Indic) Digits
        '٠'..='٩' => char::from(b'0' + (c as u32 - '٠' as u32) as u8),

        // Persian/Arabic Separators
        '٫' => '.', // Arabic Decimal Separator -> ASCII Period
        '٬' => ',', // Arabic Thousands Separator -> ASCII Comma

        _ => c, // Leave all other characters unchanged
    }
}

/// Turns one input token into keypad actions.
///
/// Named keys map to a single action. Numeric literals (ASCII, Persian or
/// Arabic-Indic digits, with optional thousands separators) are typed one
/// key at a time.
pub fn actions_for_token(token: &str) -> Result<Vec<Action>, CalcError> {
    if let Some(action) = lookup_key(token) {
        return Ok(vec![action]);
    }

    let cleaned: String = token
        .chars()
        .map(unicode_to_ascii)
        .filter(|c| *c != ',')
        .collect();

    if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(CalcError::UnknownKey(token.to_string()));
    }

    Ok(cleaned
        .chars()
        .map(|c| match c {
            '.' => Action::Decimal,
            digit => Action::Digit(digit),
        })
        .collect())
}

/// The display line: grouped value, pending operator and memory indicator.
pub fn render_display(state: &EngineState, group_digits: bool) -> String {
    let value = if group_digits {
        state.display().separate_with_commas()
    } else {
        state.display().to_string()
    };

    let pending = match state.last_operator {
        Some(op) if op.is_binary() => format!(" {}", op.symbol()),
        _ => String::new(),
    };
    let memory = if state.memory.is_some() { "  [M]" } else { "" };

    format!("{}{}{}", value, pending, memory)
}

fn report_error(err: &CalcError) {
    if err.is_informational() {
        println!("  {}", err);
    } else {
        eprintln!("Error: {}", err);
    }
}

fn report_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::Finalized(calculation) => {
            println!("  {} = {}", calculation.expression, calculation.result)
        }
        Outcome::Notice(message) => println!("  {}", message),
        Outcome::Updated | Outcome::Unchanged => {}
    }
}

/// Processes a single keypad token against the session.
pub fn process_token(session: &mut Session, token: &str) -> Result<(), CalcError> {
    for action in actions_for_token(token)? {
        let outcome = session.dispatch(action)?;
        report_outcome(&outcome);
    }
    Ok(())
}

/// Handles one input line. Returns `false` when the user asked to quit.
fn handle_line(session: &mut Session, line: &str) -> bool {
    // Check for comment marker (#) and strip the rest of the line
    let input = line.split('#').next().unwrap_or("").trim();

    if input.eq_ignore_ascii_case("exit") {
        return false;
    }

    if let Some(phrase) = input.strip_prefix('?') {
        match session.request_translation(phrase.trim()) {
            Ok(_) => println!("  Thinking..."),
            Err(err) => report_error(&err),
        }
        return true;
    }

    let mut tokens = input.split_whitespace();
    match tokens.next() {
        None => {}
        Some("help") => {
            if let Err(err) = display_help(tokens.next().unwrap_or("")) {
                report_error(&err);
            }
        }
        Some("history") => {
            if session.history().is_empty() {
                println!("  No calculations yet");
            }
            for entry in session.history().entries() {
                println!(
                    "  [{}] {} = {}",
                    entry.timestamp.format("%H:%M:%S"),
                    entry.expression,
                    entry.result
                );
            }
        }
        Some("clear-history") => {
            session.clear_history();
            println!("  History cleared");
        }
        Some("cancel") => {
            if !session.cancel_translation() {
                println!("  Nothing to cancel");
            }
        }
        Some(first) => {
            for token in std::iter::once(first).chain(tokens) {
                if let Err(err) = process_token(session, token) {
                    report_error(&err);
                    // On error, skip the rest of the line
                    break;
                }
            }
        }
    }

    true
}

/// Reads stdin on a plain thread so the async loop can also wait on
/// translation completions.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (lines, receiver) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if lines.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    eprintln!("I/O Error: {}", e);
                    break;
                }
            }
        }
    });
    receiver
}

fn print_prompt(session: &Session, config: &Config) -> io::Result<()> {
    let busy = if session.is_translating() {
        "  (translating...)"
    } else {
        ""
    };
    print!(
        "Display: {}{}\n> ",
        render_display(session.state(), config.group_digits),
        busy
    );
    io::stdout().flush()
}

pub async fn main_app_loop(config: Config) -> anyhow::Result<()> {
    let (mut session, mut completions) = Session::new(&config);
    let mut lines = spawn_stdin_reader();

    println!("Welcome to kalk-nl. Type 'exit' to quit.");
    println!("Type 'help' for a list of all keys, or '? <phrase>' for natural language.");
    print_prompt(&session, &config)?;

    loop {
        tokio::select! {
            line = lines.recv() => {
                // stdin closed
                let Some(line) = line else { break };
                if !handle_line(&mut session, &line) {
                    break;
                }
            }
            Some(done) = completions.recv() => {
                match session.complete(done) {
                    Some(Ok(calculation)) => {
                        println!("\n  {} = {}", calculation.expression, calculation.result)
                    }
                    Some(Err(err)) => {
                        println!();
                        report_error(&err);
                    }
                    None => continue,
                }
            }
        }
        print_prompt(&session, &config)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unicode_digits() {
        assert_eq!(unicode_to_ascii('۷'), '7');
        assert_eq!(unicode_to_ascii('٣'), '3');
        assert_eq!(unicode_to_ascii('٫'), '.');
        assert_eq!(unicode_to_ascii('x'), 'x');
    }

    #[test]
    fn test_help_for_unknown_key() {
        assert!(display_help("sto").is_err());
        assert!(display_help("sqrt").is_ok());
    }
}
