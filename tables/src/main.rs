use anyhow::{Context, Result};
use braille_input_core::{Cell, Config, InputHandler, PATTERN_TABLE};
use braille_tables::console::{run_session, ConsoleDisplay, ConsoleOutput};
use braille_tables::{Table, TableTranslator, EN_US_G1};
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "braille-tables", about = "Braille keyboard input and back-translation")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Type gestures read from stdin, one per line ("1 3", "space", "space+1 2")
    Type {
        /// Input table (overrides the config file)
        #[arg(long)]
        table: Option<String>,
        #[arg(long)]
        contracted: bool,
        /// TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print effects as JSON lines
        #[arg(long)]
        json: bool,
        /// Extra TOML table files to register
        #[arg(long = "table-file")]
        table_files: Vec<PathBuf>,
    },
    /// Back-translate cells given in dot notation ("0" is a space)
    Translate {
        #[arg(long, default_value = EN_US_G1)]
        table: String,
        #[arg(long = "table-file")]
        table_files: Vec<PathBuf>,
        #[arg(required = true)]
        cells: Vec<String>,
    },
    /// Compile a TOML table to fst + bincode
    Compile {
        input: PathBuf,
        #[arg(long, default_value = "table.fst")]
        out_fst: PathBuf,
        #[arg(long, default_value = "table.bincode")]
        out_bincode: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Type {
            table,
            contracted,
            config,
            json,
            table_files,
        } => run_type(table, contracted, config, json, &table_files),
        Command::Translate {
            table,
            table_files,
            cells,
        } => run_translate(&table, &table_files, &cells),
        Command::Compile {
            input,
            out_fst,
            out_bincode,
        } => {
            let table = Table::load_toml(&input)?;
            table.save_compiled(&out_fst, &out_bincode)?;
            println!(
                "Compiled '{}' ({} keys) to {} and {}",
                table.name(),
                table.len(),
                out_fst.display(),
                out_bincode.display()
            );
            Ok(())
        }
    }
}

fn translator_with(table_files: &[PathBuf]) -> Result<TableTranslator> {
    let mut translator = TableTranslator::new();
    for path in table_files {
        let name = translator.load_table_file(path)?;
        tracing::info!(name = %name, path = %path.display(), "loaded table file");
    }
    Ok(translator)
}

fn run_translate(table: &str, table_files: &[PathBuf], cells: &[String]) -> Result<()> {
    let translator = translator_with(table_files)?;
    let cells = cells
        .iter()
        .map(|s| s.parse::<Cell>().with_context(|| format!("cell '{}'", s)))
        .collect::<Result<Vec<_>>>()?;
    let tables = [table.to_string(), PATTERN_TABLE.to_string()];
    println!("{}", translator.back_translate(&tables, &cells)?);
    Ok(())
}

fn run_type(
    table: Option<String>,
    contracted: bool,
    config_path: Option<PathBuf>,
    json: bool,
    table_files: &[PathBuf],
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => Config::load_toml(path)?,
        None => Config::default(),
    };
    if let Some(table) = table {
        config.set_input_table(&table);
    }

    let translator = translator_with(table_files)?;
    let output = ConsoleOutput::new(io::stdout(), json);
    let mut handler =
        InputHandler::new(translator, output, ConsoleDisplay::new(), config).with_contracted(contracted);

    run_session(&mut handler, io::stdin().lock())
}
