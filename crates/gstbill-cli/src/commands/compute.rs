//! Compute command - build one invoice document from a JSON bundle.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use gstbill_core::invoice::format_amount;
use gstbill_core::{InvoiceBundle, InvoiceDocument, InvoiceEngine, TaxIdentity, TaxRegime};

use super::load_config;

/// Arguments for the compute command.
#[derive(Args)]
pub struct ComputeArgs {
    /// Input bundle: { transaction, company, party, serviceNames }
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Lines per page (overrides config)
    #[arg(short = 'p', long)]
    page_size: Option<usize>,

    /// Check document invariants and report violations
    #[arg(long)]
    verify: bool,

    /// Print data-quality warnings to stderr
    #[arg(long)]
    show_warnings: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON document
    Json,
    /// CSV line table
    Csv,
    /// Plain text invoice
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ComputeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    if args.page_size == Some(0) {
        anyhow::bail!("--page-size must be at least 1");
    }

    info!("Computing invoice from {}", args.input.display());

    let bundle = InvoiceBundle::from_file(&args.input)?;
    let mut engine = InvoiceEngine::new(config);
    if let Some(page_size) = args.page_size {
        engine = engine.with_page_size(page_size);
    }

    let document = engine.compute_bundle(&bundle);

    if args.verify {
        let issues = document.verify();
        if issues.is_empty() {
            eprintln!("{} Document invariants hold", style("✓").green());
        } else {
            eprintln!("{}", style("Invariant violations:").red());
            for issue in &issues {
                eprintln!("  - {}", issue);
            }
        }
    }

    if args.show_warnings && !document.metadata.warnings.is_empty() {
        eprintln!("{}", style("Warnings:").yellow());
        for warning in &document.metadata.warnings {
            eprintln!("  - {}", warning);
        }
    }

    let output = format_document(&document, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

pub fn format_document(document: &InvoiceDocument, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(document)?),
        OutputFormat::Csv => format_csv(document),
        OutputFormat::Text => Ok(format_text(document)),
    }
}

fn format_csv(document: &InvoiceDocument) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "page",
        "serial",
        "kind",
        "name",
        "hsn_sac",
        "quantity",
        "unit_price",
        "taxable",
        "gst_rate",
        "cgst",
        "sgst",
        "igst",
        "line_total",
    ])?;

    for page in &document.pages {
        for (offset, taxed) in page.lines.iter().enumerate() {
            let line = &taxed.line;
            wtr.write_record([
                page.page_number.to_string(),
                (page.first_serial + offset).to_string(),
                format!("{:?}", line.kind).to_lowercase(),
                line.name.clone(),
                line.hsn_sac.clone().unwrap_or_default(),
                line.quantity.normalize().to_string(),
                format_amount(line.unit_price),
                format_amount(line.taxable_amount),
                taxed.gst_rate.normalize().to_string(),
                format_amount(taxed.cgst),
                format_amount(taxed.sgst),
                format_amount(taxed.igst),
                format_amount(taxed.line_total),
            ])?;
        }
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(document: &InvoiceDocument) -> String {
    let mut output = String::new();
    let header = &document.header;

    output.push_str(&format!(
        "Invoice: {}\n",
        header.invoice_number.as_deref().unwrap_or("-")
    ));
    if let Some(date) = header.date {
        output.push_str(&format!("Date: {}\n", date));
    }
    output.push_str(&format!("Tax: {}\n", document.regime.display()));
    output.push('\n');

    push_party(&mut output, "Seller", &document.seller);
    push_party(&mut output, "Buyer", &document.buyer);

    for page in &document.pages {
        output.push_str(&format!("Page {}/{}\n", page.page_number, page.page_count));
        for (offset, taxed) in page.lines.iter().enumerate() {
            let line = &taxed.line;
            output.push_str(&format!(
                "  {:>3}. {:<30} {:>8} x {:>10} = {:>12}",
                page.first_serial + offset,
                line.name,
                line.quantity.normalize(),
                format_amount(line.unit_price),
                format_amount(line.taxable_amount),
            ));
            match document.regime {
                TaxRegime::NoTax => {}
                TaxRegime::Intrastate => output.push_str(&format!(
                    "  CGST {} SGST {} @ {}%",
                    format_amount(taxed.cgst),
                    format_amount(taxed.sgst),
                    taxed.gst_rate.normalize()
                )),
                TaxRegime::Interstate => output.push_str(&format!(
                    "  IGST {} @ {}%",
                    format_amount(taxed.igst),
                    taxed.gst_rate.normalize()
                )),
            }
            output.push_str(&format!("  -> {}\n", format_amount(taxed.line_total)));
        }
        output.push('\n');
    }

    let totals = &document.totals;
    output.push_str("Summary:\n");
    output.push_str(&format!("  Taxable: {}\n", format_amount(totals.total_taxable)));
    match document.regime {
        TaxRegime::NoTax => {}
        TaxRegime::Intrastate => {
            output.push_str(&format!("  CGST:    {}\n", format_amount(totals.total_cgst)));
            output.push_str(&format!("  SGST:    {}\n", format_amount(totals.total_sgst)));
        }
        TaxRegime::Interstate => {
            output.push_str(&format!("  IGST:    {}\n", format_amount(totals.total_igst)));
        }
    }
    output.push_str(&format!("  Total:   {}\n", format_amount(totals.grand_total)));
    output.push_str(&format!("  {}\n", document.amount_in_words_phrase));

    if let Some(due_date) = header.due_date {
        output.push_str(&format!("\nPayment due: {}\n", due_date));
    }

    output
}

fn push_party(output: &mut String, role: &str, identity: &TaxIdentity) {
    output.push_str(&format!("{}:\n", role));
    output.push_str(&format!("  {}\n", identity.name.as_deref().unwrap_or("-")));
    if let Some(gstin) = &identity.gstin {
        output.push_str(&format!("  GSTIN: {}\n", gstin));
    }
    if let Some(state) = &identity.state_name {
        match identity.state_code {
            Some(code) => output.push_str(&format!("  State: {} ({})\n", state, code)),
            None => output.push_str(&format!("  State: {}\n", state)),
        }
    }
    output.push('\n');
}
