//! cellgrid CLI - view and edit sheet files

use anyhow::{bail, Context, Result};
use cellgrid::prelude::*;
use cellgrid::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cellgrid")]
#[command(author, version, about = "Grid-of-cells calculator")]
struct Cli {
    /// Log evaluation details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SheetArgs {
    /// Sheet file (`column,row,content` lines)
    input: PathBuf,

    /// Number of columns
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: u16,

    /// Number of rows
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    height: u32,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every non-empty cell with its displayed value
    Show {
        #[command(flatten)]
        sheet: SheetArgs,

        /// Also print raw text and evaluation depth
        #[arg(short, long)]
        raw: bool,
    },

    /// Print the displayed value of one cell
    Get {
        #[command(flatten)]
        sheet: SheetArgs,

        /// Cell address (e.g. B12)
        address: String,
    },

    /// Set a cell, re-evaluate and save the file
    Set {
        #[command(flatten)]
        sheet: SheetArgs,

        /// Cell address (e.g. B12)
        address: String,

        /// New raw text; empty clears the cell
        text: String,
    },

    /// Print evaluation statistics and the depth of every formula
    Order {
        #[command(flatten)]
        sheet: SheetArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Show { sheet, raw } => show(&sheet, raw),
        Commands::Get { sheet, address } => get(&sheet, &address),
        Commands::Set {
            sheet,
            address,
            text,
        } => set(&sheet, &address, &text),
        Commands::Order { sheet } => order(&sheet),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open(args: &SheetArgs) -> Result<Sheet> {
    Sheet::open(&args.input, args.width, args.height)
        .with_context(|| format!("Failed to open '{}'", args.input.display()))
}

fn parse_address(sheet: &Sheet, text: &str) -> Result<Address> {
    let address = Address::parse(text).with_context(|| format!("Invalid address '{text}'"))?;
    if !sheet.is_in_bounds(address.col(), address.row()) {
        bail!(
            "{address} is outside the {}x{} sheet",
            sheet.width(),
            sheet.height()
        );
    }
    Ok(address)
}

fn show(args: &SheetArgs, raw: bool) -> Result<()> {
    let sheet = open(args)?;

    for (address, cell) in sheet.cells().filter(|(_, cell)| !cell.is_empty()) {
        if raw {
            let depth = cell
                .order()
                .map_or_else(|| "-".to_string(), |d| d.to_string());
            println!("{address}\t{}\t{}\t{depth}", cell.display(), cell.raw());
        } else {
            println!("{address}\t{}", cell.display());
        }
    }

    Ok(())
}

fn get(args: &SheetArgs, address: &str) -> Result<()> {
    let sheet = open(args)?;
    let address = parse_address(&sheet, address)?;
    println!("{}", sheet.value(address));
    Ok(())
}

fn set(args: &SheetArgs, address: &str, text: &str) -> Result<()> {
    let mut sheet = if args.input.exists() {
        open(args)?
    } else {
        Sheet::new(args.width, args.height).context("Invalid sheet dimensions")?
    };

    let address = parse_address(&sheet, address)?;
    sheet
        .set(address, text)
        .with_context(|| format!("Failed to set {address}"))?;
    let stats = sheet.evaluate();

    save(&sheet, &args.input)?;
    if stats.errors > 0 {
        eprintln!("{} cell(s) show an error", stats.errors);
    }
    println!("{}", sheet.value(address));
    Ok(())
}

fn save(sheet: &Sheet, path: &Path) -> Result<()> {
    let written = sheet
        .save(path)
        .with_context(|| format!("Failed to write '{}'", path.display()))?;
    tracing::debug!("Wrote {written} cells to '{}'", path.display());
    Ok(())
}

fn order(args: &SheetArgs) -> Result<()> {
    let mut sheet = open(args)?;
    let stats = sheet.evaluate();
    let depths = sheet.depth();

    println!("Formulas: {}", stats.formula_count);
    println!("Rounds: {}", stats.rounds);
    println!("Circular references: {}", stats.circular_references);
    println!("Errors: {}", stats.errors);

    for level in 1..=depths.max_level() {
        let layer: Vec<String> = depths.layer(level).map(|a| a.to_string()).collect();
        if !layer.is_empty() {
            println!("  {level}: {}", layer.join(" "));
        }
    }

    let cycles: Vec<String> = sheet
        .cells()
        .filter(|(address, _)| depths.is_cycle(*address))
        .map(|(address, _)| address.to_string())
        .collect();
    if !cycles.is_empty() {
        println!("  cycle: {}", cycles.join(" "));
    }

    Ok(())
}
