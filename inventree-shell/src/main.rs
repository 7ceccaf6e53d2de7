use std::env;
use std::fs::metadata;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Result;
use chrono::Local;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use inventree::io::{FlatFile, Persistence};
use inventree::{Direction, Inventory, Record};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use strum::EnumString;
use tracing_subscriber::EnvFilter;

mod output;

use output::Format;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None, disable_help_subcommand = true)]
struct Cli {
    /// Inventory file location (created if missing)
    inventory: PathBuf,

    /// Print records as JSON
    #[arg(short, long, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    parameter: Option<Parameter>,
}

#[derive(Debug, EnumString, PartialEq, Subcommand)]
#[strum(ascii_case_insensitive)]
enum Parameter {
    /// Add a record (and append it to the inventory file)
    Add {
        date_entered: String,
        stock_label: String,
        brand: String,
        engine_number: String,
        status: String,
    },
    /// List records with this brand (ignoring case)
    Brand { brand: String },
    /// Display record count
    Count,
    /// Delete a record (and save a timestamped snapshot of the inventory)
    Delete { engine_number: String },
    /// Get the record with this engine number
    Get { engine_number: String },
    /// Interactive Help
    Help,
    /// List records sorted by engine number
    List {
        /// Direction (Descending or Ascending)
        direction: Option<Direction>,
    },
    /// Verify inventory indexes
    Verify,
}

fn get_history_file() -> Option<PathBuf> {
    dirs::preference_dir()
        .and_then(|mut base| {
            base.push("inventree");
            // Note: Not create_dir_all(), because we don't want to create preference
            // dirs if they don't exist.
            if metadata(base.clone()).ok().is_none() {
                std::fs::create_dir(base.clone()).ok()?
            }
            Some(base)
        })
        .map(|mut base| {
            base.push("history.txt");
            base
        })
}

// Words are split like a shell would, so "Harley Davidson" is a single word.
fn split_line(line: &str) -> Result<Vec<String>, String> {
    shlex::split(line).ok_or_else(|| "error: unbalanced quotes".to_string())
}

// EnumString doesn't deal with variant parameters, so fill them in from the remaining words.
fn parse_words(words: &[&str]) -> Result<Parameter, String> {
    let parameter = Parameter::from_str(words[0]).map_err(|e| format!("error: {e}"))?;
    let parameter = match parameter {
        Parameter::Add { .. } => match words {
            [_, date_entered, stock_label, brand, engine_number, status] => Parameter::Add {
                date_entered: date_entered.to_string(),
                stock_label: stock_label.to_string(),
                brand: brand.to_string(),
                engine_number: engine_number.to_string(),
                status: status.to_string(),
            },
            _ => {
                return Err(
                    "usage: add <date entered> <stock label> <brand> <engine number> <status>"
                        .to_string(),
                )
            }
        },
        Parameter::Brand { .. } => match words {
            [_, brand] => Parameter::Brand {
                brand: brand.to_string(),
            },
            _ => return Err("usage: brand <brand>".to_string()),
        },
        Parameter::Delete { .. } => match words {
            [_, engine_number] => Parameter::Delete {
                engine_number: engine_number.to_string(),
            },
            _ => return Err("usage: delete <engine number>".to_string()),
        },
        Parameter::Get { .. } => match words {
            [_, engine_number] => Parameter::Get {
                engine_number: engine_number.to_string(),
            },
            _ => return Err("usage: get <engine number>".to_string()),
        },
        Parameter::List { .. } => match words {
            [_] => Parameter::List { direction: None },
            [_, direction] => match Direction::from_str(direction) {
                Ok(direction) => Parameter::List {
                    direction: Some(direction),
                },
                Err(_) => return Err("usage: list [<direction>]".to_string()),
            },
            _ => return Err("usage: list [<direction>]".to_string()),
        },
        p => p,
    };
    Ok(parameter)
}

// Field values are written to the inventory file unquoted. Command line arguments can carry
// newlines (e.g. `$'On\nhand'`), which would split a record across two lines.
fn check_record(record: &Record) -> Result<(), String> {
    if record.engine_number().trim().is_empty() {
        return Err("engine number must not be empty".to_string());
    }
    let fields = [
        record.date_entered(),
        record.stock_label(),
        record.brand(),
        record.engine_number(),
        record.status(),
    ];
    if fields.iter().any(|field| field.contains(',') || field.contains('\n')) {
        return Err("fields must not contain commas or newlines".to_string());
    }
    Ok(())
}

fn interactive(inventory: &mut Inventory, path: &Path, format: Format) -> Result<()> {
    // `()` can be used when no completer is required
    let mut rl = DefaultEditor::new()?;
    if let Some(file_location) = get_history_file() {
        if let Err(e) = rl.load_history(&file_location) {
            println!("error loading history: {e}");
        }
    }
    println!("terminate with ctrl-c or ctrl-d");
    loop {
        let readline = rl.readline("inventory: ");
        match readline {
            Ok(line) => {
                let words = match split_line(&line) {
                    Ok(words) => words,
                    Err(e) => {
                        println!("{e}");
                        continue;
                    }
                };
                if words.is_empty() {
                    continue;
                }
                let words = words.iter().map(String::as_str).collect::<Vec<&str>>();
                let parameter = match parse_words(&words) {
                    Ok(p) => p,
                    Err(usage) => {
                        println!("{usage}");
                        continue;
                    }
                };
                process_parameter(inventory, path, format, &parameter)?;
                rl.add_history_entry(line.as_str())?;
            }
            Err(ReadlineError::Interrupted) => {
                println!("terminating...");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("terminating...");
                break;
            }
            Err(err) => {
                println!("Error: {err:?}");
                break;
            }
        }
    }
    if let Some(file_location) = get_history_file() {
        if let Err(e) = rl.save_history(&file_location) {
            println!("error saving history: {e}");
        }
    }
    Ok(())
}

fn process_parameter(
    inventory: &mut Inventory,
    path: &Path,
    format: Format,
    parameter: &Parameter,
) -> Result<()> {
    match parameter {
        Parameter::Add {
            date_entered,
            stock_label,
            brand,
            engine_number,
            status,
        } => {
            let record = Record::new(
                date_entered.as_str(),
                stock_label.as_str(),
                brand.as_str(),
                engine_number.as_str(),
                status.as_str(),
            );
            if let Err(e) = check_record(&record) {
                println!("add failed: {e}");
                return Ok(());
            }
            match inventory.add(record.clone()) {
                Ok(()) => {
                    // The inventory is still usable if the file can't be updated
                    if let Err(err) = FlatFile.append(path, &record) {
                        println!("append failed: {err:#}");
                    }
                    println!("added: {engine_number}");
                }
                Err(err) => println!("add failed: {err}"),
            }
        }
        Parameter::Brand { brand } => {
            let records = inventory.find_by_brand(brand);
            if records.is_empty() && format == Format::Table {
                println!("no records found with brand: {brand}");
            } else {
                output::print_records(&records, format)?;
            }
        }
        Parameter::Count => println!("count: {}", inventory.len()),
        Parameter::Delete { engine_number } => match inventory.delete(engine_number) {
            Ok(record) => {
                println!("deleted: {}", record.engine_number());
                let snapshot = output::snapshot_path(path, Local::now().naive_local());
                match FlatFile.save(&snapshot, inventory.list_sorted()) {
                    Ok(()) => {
                        tracing::info!(
                            "Deleted {engine_number}, snapshot: {}",
                            snapshot.display()
                        );
                        println!("saved: {}", snapshot.display());
                    }
                    Err(err) => println!("save failed: {err:#}"),
                }
                output::print_records(&inventory.list_sorted(), format)?;
            }
            Err(err) => println!("delete failed: {err}"),
        },
        Parameter::Get { engine_number } => match inventory.get(engine_number) {
            Ok(record) => output::print_records(&[record], format)?,
            Err(_) => println!("not found"),
        },
        Parameter::Help => {
            let help = Cli::command().render_help().to_string();

            let mut print_it = false;

            for line in help.lines() {
                if line.starts_with("Arguments:") {
                    print_it = false;
                }
                if print_it && !line.is_empty() {
                    println!("{}", line);
                }
                if line.starts_with("Commands:") {
                    print_it = true;
                }
            }
        }
        Parameter::List { direction } => {
            let records: Vec<&Record> = inventory
                .records(direction.unwrap_or_default())
                .collect();
            output::print_records(&records, format)?;
        }
        Parameter::Verify => match inventory.verify() {
            Ok(_) => println!("Ok"),
            Err(e) => println!("Verification failed: {e}"),
        },
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_dir = match env::var("TMPDIR") {
        Ok(d) => d,
        Err(_e) => ".".to_string(),
    };

    let file_appender = tracing_appender::rolling::daily(log_dir, "inventree.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(non_blocking)
        .init();

    tracing::info!("Starting inventree-shell {}", env!("CARGO_PKG_VERSION"));

    let format = if cli.json {
        Format::Json
    } else {
        Format::Table
    };

    let opened = Inventory::open(&FlatFile, &cli.inventory);
    if let Some(err) = &opened.error {
        println!("load failed, inventory may be incomplete: {err}");
    }
    if opened.skipped > 0 {
        println!("skipped {} unreadable lines", opened.skipped);
    }
    if opened.duplicates > 0 {
        println!("skipped {} duplicate engine numbers", opened.duplicates);
    }
    let mut inventory = opened.inventory;
    inventory.info();

    match cli.parameter {
        Some(parameter) => process_parameter(&mut inventory, &cli.inventory, format, &parameter)?,
        None => interactive(&mut inventory, &cli.inventory, format)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_parses_words_case_insensitively() {
        assert_eq!(
            parse_words(&["GET", "E100"]),
            Ok(Parameter::Get {
                engine_number: "E100".to_string()
            })
        );
        assert_eq!(parse_words(&["count"]), Ok(Parameter::Count));
    }

    #[test]
    fn it_parses_add() {
        assert_eq!(
            parse_words(&["add", "2024-06-01", "New", "Honda", "E100", "On-hand"]),
            Ok(Parameter::Add {
                date_entered: "2024-06-01".to_string(),
                stock_label: "New".to_string(),
                brand: "Honda".to_string(),
                engine_number: "E100".to_string(),
                status: "On-hand".to_string(),
            })
        );
        assert!(parse_words(&["add", "2024-06-01", "New"]).is_err());
    }

    #[test]
    fn it_parses_list_direction() {
        assert_eq!(
            parse_words(&["list", "descending"]),
            Ok(Parameter::List {
                direction: Some(Direction::Descending)
            })
        );
        assert_eq!(
            parse_words(&["list"]),
            Ok(Parameter::List { direction: None })
        );
        assert!(parse_words(&["list", "sideways"]).is_err());
    }

    #[test]
    fn it_parses_quoted_words() {
        let words = split_line(r#"add 2024-06-01 New "Harley Davidson" E100 'On hand'"#)
            .expect("splits");
        let words = words.iter().map(String::as_str).collect::<Vec<&str>>();
        assert_eq!(
            parse_words(&words),
            Ok(Parameter::Add {
                date_entered: "2024-06-01".to_string(),
                stock_label: "New".to_string(),
                brand: "Harley Davidson".to_string(),
                engine_number: "E100".to_string(),
                status: "On hand".to_string(),
            })
        );

        let words = split_line(r#"brand "Harley Davidson""#).expect("splits");
        let words = words.iter().map(String::as_str).collect::<Vec<&str>>();
        assert_eq!(
            parse_words(&words),
            Ok(Parameter::Brand {
                brand: "Harley Davidson".to_string()
            })
        );
        assert!(split_line(r#"brand "Harley"#).is_err());
    }

    #[test]
    fn it_rejects_unknown_words() {
        assert!(parse_words(&["frobnicate"]).is_err());
        assert!(parse_words(&["delete"]).is_err());
    }

    #[test]
    fn it_checks_records() {
        assert!(check_record(&Record::new("d", "l", "b", "E1", "s")).is_ok());
        assert!(check_record(&Record::new("d", "l", "b", " ", "s")).is_err());
        assert!(check_record(&Record::new("d", "l,x", "b", "E1", "s")).is_err());
        assert!(check_record(&Record::new("d", "l", "b", "E1", "On\nhand")).is_err());
    }

    #[test]
    fn it_builds_cli() {
        Cli::command().debug_assert();
    }
}
