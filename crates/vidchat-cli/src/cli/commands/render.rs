//! Render command handler.

use std::io::{self, Read};

use anyhow::{Context, Result};
use vidchat_core::markup;

pub fn run() -> Result<()> {
    let mut raw = String::new();
    io::stdin()
        .read_to_string(&mut raw)
        .context("read stdin")?;
    // Input ends with a newline that is not part of the message.
    let raw = raw.trim_end_matches(['\r', '\n']);
    println!("{}", markup::render(raw));
    Ok(())
}
