pub use crate::error::Error;

pub use anstream::println;
pub use color_eyre::eyre::{eyre, Context, Result};
pub use std::format as f;

use colored::Colorize;

pub fn new_table() -> prettytable::Table {
    let mut table = prettytable::Table::new();

    let format = prettytable::format::FormatBuilder::new()
        .padding(1, 1)
        .build();

    table.set_format(format);

    table
}

/// Print a section banner for the console report
pub fn print_header(title: &str) {
    println!("\n{}", "=".repeat(80).bright_cyan());
    println!("{}", title.to_uppercase().bright_cyan().bold());
    println!("{}", "=".repeat(80).bright_cyan());
}
