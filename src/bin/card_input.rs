//! CLI tool for exercising card number entry.
//!
//! # Usage
//!
//! ```bash
//! # Format a raw number
//! card-input format 378282246310005
//!
//! # Classify a (partial) number
//! card-input classify 4111 --output json
//!
//! # Replay keystrokes; '<' is a backspace
//! card-input type 41111111111111111<<
//!
//! # Dump the built-in rule table
//! card-input rules > rules.json
//!
//! # Use a custom table and separator
//! card-input --rules rules.json --separator " " format 4111111111111111
//! ```

use card_input::{
    Card, CardNumber, CardTypeRegistry, Cvc, Expiry, InputConfig, InputState, NumberInput, Signal,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "card-input")]
#[command(
    author,
    version,
    about = "Card number entry: formatting, issuer detection and validation"
)]
struct Cli {
    /// JSON config file (separator and optional rule table)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// JSON rule table replacing the built-in issuers
    #[arg(short, long, global = true)]
    rules: Option<PathBuf>,

    /// Group separator
    #[arg(short, long, global = true)]
    separator: Option<String>,

    /// Log edits and lookups to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Format a card number for display
    Format {
        /// Raw card number
        card_number: String,
    },

    /// Remove separators from a display string
    Unformat {
        /// Display text
        text: String,
    },

    /// Classify a (partial) card number
    Classify {
        /// Card number (separators allowed)
        card_number: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },

    /// List the card types a partial number could still be
    Candidates {
        /// Partial card number
        card_number: String,
    },

    /// Replay keystrokes into a field ('<' deletes backward)
    Type {
        /// Keys to type
        keys: String,
    },

    /// Validate a complete card
    Card {
        /// Card number
        card_number: String,

        /// Expiry date (MM/YY or MM/YYYY)
        #[arg(short, long)]
        expiry: Option<String>,

        /// Verification code
        #[arg(long)]
        cvc: Option<String>,
    },

    /// Print the rule table as JSON
    Rules,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "card_input=debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let input = match load_input(&cli) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    match cli.command {
        Commands::Format { card_number } => cmd_format(&input, &card_number),
        Commands::Unformat { text } => {
            println!("{}", input.formatter().unformatted(&text));
        }
        Commands::Classify {
            card_number,
            output,
        } => cmd_classify(&input, &card_number, output),
        Commands::Candidates { card_number } => cmd_candidates(&input, &card_number),
        Commands::Type { keys } => cmd_type(input, &keys),
        Commands::Card {
            card_number,
            expiry,
            cvc,
        } => cmd_card(&input, &card_number, expiry.as_deref(), cvc.as_deref()),
        Commands::Rules => cmd_rules(input.formatter().registry()),
    }
}

fn load_input(cli: &Cli) -> Result<NumberInput, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => InputConfig::from_file(path)?,
        None => InputConfig::default(),
    };
    if let Some(path) = &cli.rules {
        config.rules = Some(CardTypeRegistry::from_file(path)?.rules().to_vec());
    }
    if let Some(separator) = &cli.separator {
        config.separator = separator.clone();
    }
    Ok(config.input()?)
}

fn cmd_format(input: &NumberInput, card_number: &str) {
    let number = CardNumber::from_lossy(card_number);
    println!("{}", input.formatter().formatted(number.as_str()));
}

fn cmd_classify(input: &NumberInput, card_number: &str, output: OutputFormat) {
    let number = CardNumber::from_lossy(card_number);
    let registry = input.formatter().registry();
    let validation = registry.validate(&number);
    let state = InputState::classify(registry, &number, validation);
    let card_type = registry.resolve(number.as_str()).map(|r| r.name().to_string());
    let issues: Vec<String> = validation.issues().map(|i| i.to_string()).collect();

    match output {
        OutputFormat::Text => {
            println!("State: {}", state);
            println!("Card Type: {}", card_type.as_deref().unwrap_or("Unknown"));
            if validation.is_valid() {
                println!("Issues: none");
            } else {
                println!("Issues: {}", issues.join(", "));
            }
            println!("Masked: {}", number.masked());
        }
        OutputFormat::Json => {
            let value = serde_json::json!({
                "state": state,
                "valid": validation.is_valid(),
                "card_type": card_type,
                "issues": issues,
                "masked": number.masked(),
            });
            println!("{}", value);
        }
    }

    std::process::exit(if validation.is_valid() { 0 } else { 1 });
}

fn cmd_candidates(input: &NumberInput, card_number: &str) {
    let number = CardNumber::from_lossy(card_number);
    let registry = input.formatter().registry();
    let candidates = registry.candidates(number.as_str());

    if candidates.is_empty() {
        println!("No card type matches");
        std::process::exit(1);
    }

    let resolved = registry.resolve(number.as_str()).map(|r| r.name());
    for candidate in candidates {
        let marker = if resolved == Some(candidate.rule.name()) { "*" } else { " " };
        println!(
            "{} {:<18} {:?} lengths {:?}",
            marker,
            candidate.rule.name(),
            candidate.specificity,
            candidate.rule.lengths()
        );
    }
}

fn cmd_type(mut input: NumberInput, keys: &str) {
    for key in keys.chars() {
        let outcome = if key == '<' {
            input.delete_backward()
        } else {
            input.insert_str(&key.to_string())
        };

        let signals: Vec<&str> = outcome
            .signals
            .iter()
            .map(|s| match s {
                Signal::TextChanged(_) => "text-changed",
                Signal::Completed => "completed",
                Signal::InvalidTerminalInput => "invalid-terminal-input",
            })
            .collect();

        println!(
            "{} {:<24} {:<16} {}{}",
            key,
            input.text(),
            input.state().to_string(),
            if outcome.accepted { "" } else { "[refused] " },
            signals.join(" ")
        );
    }
}

fn cmd_card(input: &NumberInput, card_number: &str, expiry: Option<&str>, cvc: Option<&str>) {
    let expiry = match expiry.map(Expiry::parse).transpose() {
        Ok(expiry) => expiry,
        Err(e) => {
            println!("Valid: no");
            println!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let cvc = match cvc.map(Cvc::parse).transpose() {
        Ok(cvc) => cvc,
        Err(e) => {
            println!("Valid: no");
            println!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let card = Card::new(CardNumber::from_lossy(card_number), expiry, cvc);
    match card.validate(input.formatter().registry()) {
        Ok(()) => {
            println!("Valid: yes");
            if let Some(rule) = input.formatter().registry().resolve(card.number().as_str()) {
                println!("Card Type: {}", rule.name());
            }
            println!("Masked: {}", card.number().masked());
        }
        Err(e) => {
            println!("Valid: no");
            println!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn cmd_rules(registry: &CardTypeRegistry) {
    match registry.to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
