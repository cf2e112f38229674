//! Manual entry for books no source knows about.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::io::{self, BufRead, StdinLock, Stdout, Write};
use toshokan_extract::models::sentinel::{UNKNOWN, UNKNOWN_AUTHOR, UNKNOWN_PAGES, UNTITLED};
use toshokan_extract::{BookMetadata, IdentifierKind, Identifiers};
use tracing::{debug, instrument};

/// Line-based prompts. Blank answers become sentinels.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Ask for every field of a record. Identifiers already present in
    /// `known` are kept and not asked for again.
    #[instrument(skip_all)]
    pub fn metadata(&mut self, known: &Identifiers) -> Result<BookMetadata> {
        writeln!(self.output, "No source knows this book; please enter its details.").or_raise(|| ErrorKind::Output)?;
        let title = self.line("Title: ")?;
        let title = match title.is_empty() {
            true => UNTITLED.to_string(),
            false => title,
        };

        let mut authors = Vec::new();
        loop {
            let author = self.line("Author (leave blank when done): ")?;
            if author.is_empty() {
                break;
            }
            authors.push(author);
        }
        if authors.is_empty() {
            authors.push(UNKNOWN_AUTHOR.to_string());
        }

        let publisher = self.line("Publisher: ")?;
        let publish_date = self.line("Publish date: ")?;

        let mut identifiers = known.clone();
        for kind in IdentifierKind::ALL {
            if identifiers.is_known(kind) {
                continue;
            }
            let prompt = format!("{kind} (leave blank if unknown): ");
            if let Some(value) = self.until_valid(&prompt, |raw| kind.parse_value(raw).ok())? {
                identifiers.set(kind, value);
            }
        }

        let pages = self
            .until_valid("Number of pages: ", |raw| raw.parse::<i64>().ok().filter(|pages| *pages >= 0))?
            .unwrap_or(UNKNOWN_PAGES);

        let metadata = BookMetadata {
            title,
            authors,
            publishers: vec![or_unknown(publisher)],
            publish_date: or_unknown(publish_date),
            pages,
            identifiers,
        };
        debug!(title = %metadata.title, "manual entry complete");
        Ok(metadata.normalized())
    }

    /// Read one trimmed line.
    fn line(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{prompt}").or_raise(|| ErrorKind::Output)?;
        self.output.flush().or_raise(|| ErrorKind::Output)?;
        let mut line = String::new();
        if self.input.read_line(&mut line).or_raise(|| ErrorKind::Input)? == 0 {
            exn::bail!(ErrorKind::Input);
        }
        Ok(line.trim().to_string())
    }

    /// Ask until `parse` accepts the answer. `None` for a blank answer.
    fn until_valid<T>(&mut self, prompt: &str, parse: impl Fn(&str) -> Option<T>) -> Result<Option<T>> {
        loop {
            let raw = self.line(prompt)?;
            if raw.is_empty() {
                return Ok(None);
            }
            match parse(&raw) {
                Some(value) => return Ok(Some(value)),
                None => {
                    writeln!(self.output, "Invalid entry {raw:?}, please try again.").or_raise(|| ErrorKind::Output)?
                },
            }
        }
    }
}

fn or_unknown(value: String) -> String {
    match value.is_empty() {
        true => UNKNOWN.to_string(),
        false => value,
    }
}
