//! unsheet CLI - worksheet PDF to structured JSON record

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use colored::Colorize;

use unsheet::{
    output, ExtractOptions, Extractor, JsonFormat, OcrOptions, ProviderConfig, ProviderKind,
    TableStyle,
};

#[derive(Parser)]
#[command(name = "unsheet")]
#[command(version)]
#[command(about = "Convert a worksheet PDF to a structured JSON record", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Output JSON file
    #[arg(short, long, value_name = "FILE", default_value = "output.json")]
    output: PathBuf,

    /// Write compact JSON instead of pretty-printed
    #[arg(long)]
    compact: bool,

    /// Table-merge key convention
    #[arg(long, value_enum, default_value = "tables")]
    table_style: TableStyleArg,

    /// Try external structuring services before rule-based segmentation
    #[arg(long)]
    structure: bool,

    /// OpenAI API key (first structuring attempt)
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_key: Option<String>,

    /// Gemini API key (second structuring attempt)
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    gemini_key: Option<String>,

    /// Process OCR fallback pages in parallel
    #[arg(long)]
    parallel: bool,

    /// OCR recognition language
    #[arg(long, default_value = "eng")]
    ocr_lang: String,

    /// Rasterization resolution for the OCR fallback
    #[arg(long, default_value = "150")]
    ocr_dpi: u32,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum TableStyleArg {
    /// Single "tables" array entry
    Tables,
    /// Per-grid "Categories" entries
    Categories,
}

impl From<TableStyleArg> for TableStyle {
    fn from(style: TableStyleArg) -> Self {
        match style {
            TableStyleArg::Tables => TableStyle::Tables,
            TableStyleArg::Categories => TableStyle::Categories,
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();

    let mut options = ExtractOptions::new()
        .with_table_style(cli.table_style.into())
        .with_ocr(OcrOptions {
            language: cli.ocr_lang.clone(),
            dpi: cli.ocr_dpi,
            ..OcrOptions::default()
        });
    if cli.parallel {
        options = options.parallel();
    }

    if cli.structure {
        if let Some(key) = &cli.openai_key {
            options = options
                .with_provider(ProviderConfig::new(ProviderKind::OpenAi, key).with_priority(0));
        }
        if let Some(key) = &cli.gemini_key {
            options = options
                .with_provider(ProviderConfig::new(ProviderKind::Gemini, key).with_priority(1));
        }
        if options.providers.is_empty() {
            eprintln!(
                "{}: --structure requires at least one API key (--openai-key / --gemini-key)",
                "Error".red().bold()
            );
            return ExitCode::FAILURE;
        }
    }

    let format = if cli.compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let record = match Extractor::with_options(options).extract_file(&cli.input) {
        Ok(record) => record,
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = output::write_json(&record, &cli.output, format) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        return ExitCode::FAILURE;
    }

    println!(
        "{} structured record written to {}",
        "Saved".green().bold(),
        cli.output.display()
    );
    ExitCode::SUCCESS
}
