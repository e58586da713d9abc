use anyhow::Result;
use colored::Colorize;
use std::io::{BufRead, Write};

/// Asks `title` and reads one line back. Only an exact "yes" counts as confirmation.
pub fn wait_for_input<R: BufRead, W: Write>(
    title: &str,
    reader: &mut R,
    writer: &mut W,
) -> Result<(String, bool)> {
    writeln!(writer, "{}", title.yellow())?;
    write!(writer, "   -> ")?;
    writer.flush()?;

    let mut text = String::new();
    reader.read_line(&mut text)?;
    let text = text.trim_end_matches(&['\r', '\n'][..]).to_owned();
    let yes = text == "yes";

    Ok((text, yes))
}

pub fn confirm(title: &str) -> Result<bool> {
    let stdin = std::io::stdin();
    let (_, yes) = wait_for_input(title, &mut stdin.lock(), &mut std::io::stdout())?;
    Ok(yes)
}
