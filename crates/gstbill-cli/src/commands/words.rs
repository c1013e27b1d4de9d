//! Words command - print an amount in words.

use clap::Args;

use gstbill_core::invoice::parse_amount;
use gstbill_core::invoice::words::{amount_to_words, words_phrase};

use super::load_config;

/// Arguments for the words command.
#[derive(Args)]
pub struct WordsArgs {
    /// Amount in rupees; paise are dropped (e.g. 1,23,456.78 or "₹ 999")
    amount: String,

    /// Print the full footer phrase ("RUPEES ... ONLY")
    #[arg(long)]
    phrase: bool,
}

pub async fn run(args: WordsArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let amount = parse_amount(&args.amount)
        .ok_or_else(|| anyhow::anyhow!("Not a valid amount: {}", args.amount))?;

    if amount.is_sign_negative() {
        anyhow::bail!("Amount must not be negative: {}", args.amount);
    }

    let words = amount_to_words(amount);

    if args.phrase {
        let config = load_config(config_path)?;
        println!(
            "{}",
            words_phrase(&words, &config.words.prefix, &config.words.suffix)
        );
    } else {
        println!("{}", words);
    }

    Ok(())
}
