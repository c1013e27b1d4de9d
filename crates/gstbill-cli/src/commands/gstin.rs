//! GSTIN command - validate GSTINs and show their states.

use clap::Args;
use console::style;

use gstbill_core::invoice::gstin::{check_gstin, normalize_gstin, state_code_of};
use gstbill_core::invoice::state_name_for_code;

/// Arguments for the gstin command.
#[derive(Args)]
pub struct GstinArgs {
    /// One or more GSTINs
    #[arg(required = true)]
    gstins: Vec<String>,
}

pub async fn run(args: GstinArgs) -> anyhow::Result<()> {
    let mut invalid = 0;

    for raw in &args.gstins {
        let gstin = normalize_gstin(raw);
        let state = state_code_of(&gstin)
            .map(|code| match state_name_for_code(code) {
                Some(name) => format!("{} ({})", name, code),
                None => format!("unknown state ({})", code),
            })
            .unwrap_or_else(|| "no state code".to_string());

        match check_gstin(&gstin) {
            Ok(()) => println!("{} {} - {}", style("✓").green(), gstin, state),
            Err(issue) => {
                invalid += 1;
                println!("{} {} - {}", style("✗").red(), gstin, issue);
            }
        }
    }

    if invalid > 0 {
        anyhow::bail!("{} of {} GSTINs are invalid", invalid, args.gstins.len());
    }

    Ok(())
}
