//! Minimal operator shell over a wallet: one-shot subcommands for scripts
//! and an interactive loop when invoked with no arguments.

use colored::Colorize;
use rustyline::{error::ReadlineError, DefaultEditor};
use shell_words::split;
use strsim::levenshtein;
use thiserror::Error;

use crate::{
    config::ConfigManager,
    currency::CurrencyId,
    errors::WalletError,
    ledger::{Wallet, INITIAL_REWARD_KEY},
    storage::{JsonPrefStore, PrefStore},
};

const COMMANDS: [&str; 7] = [
    "balance",
    "charge",
    "reward",
    "set",
    "grant-status",
    "help",
    "exit",
];

/// User-facing CLI error wrapper.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] WalletError),
    #[error("Readline error: {0}")]
    Readline(#[from] ReadlineError),
    #[error("{0}")]
    Usage(String),
}

/// Entry point used by the binary. Returns the process exit code.
pub fn run_cli() -> Result<i32, CliError> {
    let config = ConfigManager::new()?.load()?;
    let store = JsonPrefStore::new_default()?;
    let mut wallet = Wallet::open(Box::new(store), &config.grant)?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        run_shell(&mut wallet)?;
        Ok(0)
    } else {
        let tokens: Vec<&str> = args.iter().map(String::as_str).collect();
        dispatch(&mut wallet, &tokens)
    }
}

fn run_shell(wallet: &mut Wallet) -> Result<(), CliError> {
    let mut editor = DefaultEditor::new()?;
    println!("Wallet shell. Type `help` for commands, `exit` to quit.");

    loop {
        match editor.readline("wallet> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                editor.add_history_entry(trimmed).ok();

                let tokens = match split(trimmed) {
                    Ok(tokens) => tokens,
                    Err(err) => {
                        println!("{} {}", "[!]".yellow(), err);
                        continue;
                    }
                };
                let tokens: Vec<&str> = tokens.iter().map(String::as_str).collect();
                if matches!(tokens.first(), Some(&"exit") | Some(&"quit")) {
                    break;
                }
                if let Err(err) = dispatch(wallet, &tokens) {
                    println!("{} {}", "[x]".red(), err);
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

fn dispatch(wallet: &mut Wallet, tokens: &[&str]) -> Result<i32, CliError> {
    match tokens.first().copied() {
        Some("balance") => {
            match tokens.get(1).copied() {
                Some(raw) => {
                    let currency = parse_currency(raw)?;
                    print_balance(currency, wallet.balance(currency));
                }
                None => {
                    for (currency, value) in wallet.balances() {
                        print_balance(currency, value);
                    }
                }
            }
            Ok(0)
        }
        Some("charge") => {
            let currency = parse_currency(required(tokens, 1, "charge <currency> <amount> [item]")?)?;
            let amount = parse_amount(required(tokens, 2, "charge <currency> <amount> [item]")?)?;
            let label = tokens.get(3).copied().unwrap_or("");

            let charged = wallet.charge_labeled(
                currency,
                amount,
                label,
                |item| {
                    if item.is_empty() {
                        println!("{}", "Charge accepted.".green());
                    } else {
                        println!("{} {}", "Purchased".green(), item);
                    }
                },
                || println!("{}", "Insufficient balance.".red()),
            )?;
            print_balance(currency, wallet.balance(currency));
            Ok(if charged { 0 } else { 1 })
        }
        Some("reward") => {
            let currency = parse_currency(required(tokens, 1, "reward <currency> <amount>")?)?;
            let amount = parse_amount(required(tokens, 2, "reward <currency> <amount>")?)?;
            wallet.reward(currency, amount)?;
            print_balance(currency, wallet.balance(currency));
            Ok(0)
        }
        Some("set") => {
            let currency = parse_currency(required(tokens, 1, "set <currency> <amount>")?)?;
            let amount = parse_amount(required(tokens, 2, "set <currency> <amount>")?)?;
            wallet.set_balance(currency, amount)?;
            print_balance(currency, wallet.balance(currency));
            Ok(0)
        }
        Some("grant-status") => {
            if wallet.store().has_key(INITIAL_REWARD_KEY) {
                println!("Initial grant: issued");
            } else {
                println!("Initial grant: pending");
            }
            Ok(0)
        }
        Some("help") => {
            print_help();
            Ok(0)
        }
        Some(other) => {
            suggest_command(other);
            Err(CliError::Usage(format!("unknown command `{}`", other)))
        }
        None => Ok(0),
    }
}

fn print_balance(currency: CurrencyId, value: i64) {
    println!("{}: {}", currency, value);
}

fn print_help() {
    println!("Commands:");
    println!("  balance [currency]              show one or all balances");
    println!("  charge <currency> <amount> [item]  debit if sufficient");
    println!("  reward <currency> <amount>      credit unconditionally");
    println!("  set <currency> <amount>         overwrite a balance");
    println!("  grant-status                    initial grant state");
    println!("  exit                            leave the shell");
}

fn suggest_command(input: &str) {
    let mut suggestions: Vec<(usize, &str)> = COMMANDS
        .iter()
        .map(|&name| (levenshtein(name, input), name))
        .collect();
    suggestions.sort_by_key(|(distance, _)| *distance);

    if let Some((distance, best)) = suggestions.first() {
        if *distance <= 3 {
            println!("Suggestion: `{}`?", best);
        }
    }
}

fn required<'a>(tokens: &[&'a str], index: usize, usage: &str) -> Result<&'a str, CliError> {
    tokens
        .get(index)
        .copied()
        .ok_or_else(|| CliError::Usage(format!("usage: {}", usage)))
}

fn parse_currency(raw: &str) -> Result<CurrencyId, CliError> {
    CurrencyId::from_key(raw).ok_or_else(|| {
        CliError::Usage(format!(
            "unknown currency `{}` (expected coins, gems or energy)",
            raw
        ))
    })
}

fn parse_amount(raw: &str) -> Result<i64, CliError> {
    raw.parse::<i64>()
        .map_err(|_| CliError::Usage(format!("invalid amount `{}`", raw)))
}
