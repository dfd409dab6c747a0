use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::capture::{PlainTextRecognizer, TextRecognizer};
use crate::receipt::parse_receipt_text;
use crate::state::Day;
use crate::store::{Store, StoreError};

#[derive(Parser)]
#[command(name = "domify")]
#[command(about = "Household dashboard for groceries, pantry, to-dos and home devices")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Use development mode (uses separate dev config/database)
    #[arg(long)]
    pub dev: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch interactive TUI (default if no subcommand)
    Tui,
    /// Quickly add an item to the grocery list
    AddGrocery {
        /// Item name
        name: String,
    },
    /// Quickly add a to-do
    AddTodo {
        /// To-do text
        text: String,
    },
    /// Extract grocery items from a receipt text file
    ParseReceipt {
        /// Path to the receipt text file
        file: String,
        /// Stock the pantry with the extracted items
        #[arg(long)]
        import: bool,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Storage error: {0}")]
    StoreError(#[from] StoreError),
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),
}

/// Handle the add-grocery command
pub fn handle_add_grocery(name: String, store: &Store) -> Result<(), CliError> {
    let mut state = store.load_or_default(Day::today())?;
    if !state.add_grocery(&name) {
        println!("Nothing to add: empty item name");
        return Ok(());
    }
    store.save(&state)?;
    println!("Grocery item added: {}", name.trim());
    Ok(())
}

/// Handle the add-todo command
pub fn handle_add_todo(text: String, store: &Store) -> Result<(), CliError> {
    let mut state = store.load_or_default(Day::today())?;
    if !state.add_todo(&text) {
        println!("Nothing to add: empty to-do");
        return Ok(());
    }
    store.save(&state)?;
    println!("To-do added: {}", text.trim());
    Ok(())
}

/// Handle the parse-receipt command. Prints the extracted items; with
/// --import, also stocks the pantry with the new ones. Unrecognizable
/// content reads as an empty receipt, not a failure.
pub fn handle_parse_receipt(file: String, import: bool, store: &Store) -> Result<(), CliError> {
    let bytes = std::fs::read(&file)?;
    let items = match PlainTextRecognizer.recognize(&bytes, &mut |_| {}) {
        Ok(text) => parse_receipt_text(&text),
        Err(_) => Vec::new(),
    };

    if items.is_empty() {
        println!("No items recognized");
        return Ok(());
    }
    for item in &items {
        println!("{}", item);
    }

    if import {
        let mut state = store.load_or_default(Day::today())?;
        let added = state.import_pantry_items(&items);
        store.save(&state)?;
        println!("Imported {} of {} items into the pantry", added, items.len());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_receipt_treats_unrecognizable_content_as_empty() {
        let path = std::env::temp_dir().join("domify-test-cli-receipt.bin");
        std::fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        let store = Store::open_in_memory().unwrap();
        let result = handle_parse_receipt(path.to_string_lossy().into_owned(), true, &store);
        assert!(result.is_ok());

        let state = store.load_or_default(Day::today()).unwrap();
        assert!(state.pantry.is_empty());

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn parse_receipt_import_stocks_the_pantry() {
        let path = std::env::temp_dir().join("domify-test-cli-receipt.txt");
        std::fs::write(&path, "Milk 19.99\nBread 15.00\n").unwrap();

        let store = Store::open_in_memory().unwrap();
        handle_parse_receipt(path.to_string_lossy().into_owned(), true, &store).unwrap();

        let state = store.load_or_default(Day::today()).unwrap();
        let names: Vec<&str> = state.pantry.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Milk", "Bread"]);

        std::fs::remove_file(&path).ok();
    }
}
