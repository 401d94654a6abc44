use anyhow::{bail, Context, Result};
use carrot::{
    convert::ColumnType,
    storage::{open_existing, open_or_create},
    Table, TableOptions, DEFAULT_FILL,
};
use clap::{Parser, Subcommand};
use std::{collections::HashMap, fs, fs::File, io, path::PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Query and edit delimiter-separated text tables"
)]
struct Args {
    /// Table file to operate on
    #[arg(short, long)]
    file: PathBuf,
    /// Field separator (overrides the config file)
    #[arg(short, long)]
    sep: Option<String>,
    /// YAML file with table options
    #[arg(long)]
    config: Option<PathBuf>,
    /// Apply edits in memory only; do not write the file back
    #[arg(long)]
    no_write: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the file (if absent) and write a header
    Init { columns: Vec<String> },
    /// Print the table
    Show {
        #[arg(long, default_value = " | ")]
        outer: String,
        #[arg(long, default_value = "\n")]
        row_sep: String,
    },
    /// Check every row has as many fields as the header
    Verify,
    /// Print the first row where COLUMN equals VALUE
    Find { column: String, value: String },
    /// Print every row where COLUMN equals VALUE
    FindAll { column: String, value: String },
    /// Print one column
    Column { name: String },
    /// Append a row
    Add { fields: Vec<String> },
    /// Set COLUMN to NEW in the first row where it equals MATCHING
    Set {
        column: String,
        matching: String,
        new: String,
    },
    /// Set COLUMN to NEW in every row where it equals MATCHING
    SetAll {
        column: String,
        matching: String,
        new: String,
    },
    /// Append a column filled with DEFAULT
    AddColumn {
        name: String,
        #[arg(default_value = DEFAULT_FILL)]
        default: String,
    },
    /// Remove a column
    RemoveColumn { name: String },
    /// Stable sort by one column (string order)
    Sort { column: String },
    /// Remove repeated rows, keeping the first
    Dedup,
    /// Print the table as JSON
    Json {
        #[arg(long)]
        pretty: bool,
    },
    /// Convert columns to declared types and print them as JSON
    Convert {
        /// COLUMN=TYPE, repeatable
        #[arg(short = 't', long = "type", value_parser = parse_type_spec)]
        types: Vec<(String, ColumnType)>,
        /// Report every bad field instead of stopping at the first
        #[arg(long)]
        check: bool,
    },
    /// Guess a type for every column
    Infer,
}

fn parse_type_spec(s: &str) -> Result<(String, ColumnType), String> {
    let (name, ty) = s
        .split_once('=')
        .ok_or_else(|| format!("expected COLUMN=TYPE, got `{}`", s))?;
    let ty = ty.parse::<ColumnType>().map_err(|e| e.to_string())?;
    Ok((name.to_string(), ty))
}

fn load_options(args: &Args) -> Result<TableOptions> {
    let mut options = match &args.config {
        Some(path) => {
            let yaml = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            TableOptions::from_yaml_str(&yaml)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => TableOptions::default(),
    };
    if let Some(sep) = &args.sep {
        options.separator = sep.clone();
    }
    if args.no_write {
        options.auto_write = false;
    }
    // the CLI always needs the parsed content
    options.parse_on_open = true;
    Ok(options)
}

fn open_table(args: &Args, options: &TableOptions) -> Result<Table<File>> {
    let file = open_existing(&args.file)
        .with_context(|| format!("opening {}", args.file.display()))?;
    let table = Table::with_options(file, options)
        .with_context(|| format!("parsing {}", args.file.display()))?;
    if table.is_valid() == Some(false) {
        warn!(file = %args.file.display(), "table has rows that disagree with the header");
    }
    Ok(table)
}

fn print_row(row: &[String], sep: &str) {
    println!("{}", row.join(sep));
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let options = load_options(&args)?;
    debug!(
        file = %args.file.display(),
        sep = %options.separator,
        write = options.auto_write,
        "startup"
    );

    match &args.command {
        Command::Init { columns } => init_file(&args, &options, columns),
        command => {
            let mut table = open_table(&args, &options)?;
            run(&mut table, command, &options)?;
            if !options.auto_write {
                debug!("write-back suppressed");
            }
            Ok(())
        }
    }
}

fn init_file(args: &Args, options: &TableOptions, columns: &[String]) -> Result<()> {
    if columns.is_empty() {
        bail!("init needs at least one column name");
    }
    let file = open_or_create(&args.file)
        .with_context(|| format!("creating {}", args.file.display()))?;
    let existing = Table::new(file, options.separator.as_str())?;
    if !existing.is_empty() || existing.columns() != [String::new()] {
        bail!("{} already has content", args.file.display());
    }
    let mut table = Table::from_parts(
        existing.into_storage(),
        options.separator.as_str(),
        columns.to_vec(),
        Vec::new(),
    )?;
    table.submit()?;
    info!(file = %args.file.display(), columns = columns.len(), "initialised");
    Ok(())
}

fn run(table: &mut Table<File>, command: &Command, options: &TableOptions) -> Result<()> {
    let sep = options.separator.as_str();
    let write = options.auto_write;

    match command {
        Command::Init { .. } => bail!("init does not operate on an existing table"),
        Command::Show { outer, row_sep } => {
            let stdout = io::stdout();
            table.display(&mut stdout.lock(), outer, row_sep)?;
        }
        Command::Verify => {
            table.check_integrity()?;
            println!("ok: {} rows, {} columns", table.len(), table.columns().len());
        }
        Command::Find { column, value } => match table.find(column, value)? {
            Some(row) => print_row(row, sep),
            None => bail!("no row with {} = {}", column, value),
        },
        Command::FindAll { column, value } => match table.find_all(column, value)? {
            Some(rows) => rows.into_iter().for_each(|row| print_row(row, sep)),
            None => bail!("no row with {} = {}", column, value),
        },
        Command::Column { name } => {
            for field in table.get_column(name)? {
                println!("{}", field);
            }
        }
        Command::Add { fields } => {
            table.add(fields.iter().cloned(), write)?;
            info!(rows = table.len(), "row added");
        }
        Command::Set {
            column,
            matching,
            new,
        } => {
            if !table.set(column, matching, new.as_str(), write)? {
                warn!(column = %column, matching = %matching, "no matching row");
            }
        }
        Command::SetAll {
            column,
            matching,
            new,
        } => {
            let changed = table.set_all(column, matching, new.as_str(), write)?;
            info!(changed, "rows updated");
        }
        Command::AddColumn { name, default } => {
            table.add_column(name.as_str(), default, write)?;
        }
        Command::RemoveColumn { name } => {
            table.remove_column(name, write)?;
        }
        Command::Sort { column } => {
            table.sort(column, write)?;
        }
        Command::Dedup => {
            let removed = table.dedup(write)?;
            info!(removed, "duplicates removed");
        }
        Command::Json { pretty } => {
            let text = if *pretty {
                table.to_json_pretty()?
            } else {
                table.to_json()?
            };
            println!("{}", text);
        }
        Command::Convert { types, check } => {
            let types: HashMap<String, ColumnType> = types.iter().cloned().collect();
            if *check {
                let failures = table.verify_types(&types)?;
                for failure in &failures {
                    println!("{}", failure);
                }
                if !failures.is_empty() {
                    bail!("{} fields failed to convert", failures.len());
                }
            } else {
                let values = table.convert_types(&types)?;
                println!("{}", serde_json::to_string(&values)?);
            }
        }
        Command::Infer => {
            for (name, ty) in table.infer_types() {
                println!("{}{}{}", name, sep, ty);
            }
        }
    }
    Ok(())
}
