//! anyfile - inspect how logical filenames resolve and read their content.

use anyhow::{Context, Result};
use anyfile::file_handler::{count_reader_lines, CommentRule};
use anyfile::{resolve_readable, resolve_writable, sorted_keys, ReaderFactory, SortRule, ToolConfig};
use clap::{Arg, ArgMatches, Command};
use std::collections::HashMap;
use std::io::{self, BufRead, Write};

fn main() -> Result<()> {
    // Initialize logging; RUST_LOG=anyfile=debug traces resolution
    env_logger::init();

    let name_arg = || {
        Arg::new("name")
            .help("Logical filename; compressed siblings are found automatically")
            .required(true)
            .index(1)
    };

    let matches = Command::new("anyfile")
        .version(anyfile::VERSION)
        .about("Resolve and read files across their compressed variants")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("resolve")
                .about("Show which physical file and access method serve a name")
                .arg(name_arg()),
        )
        .subcommand(
            Command::new("cat")
                .about("Write the resolved content to stdout")
                .arg(name_arg()),
        )
        .subcommand(
            Command::new("lines")
                .about("Count lines of the resolved content")
                .arg(name_arg())
                .arg(
                    Arg::new("skip")
                        .long("skip")
                        .value_name("RULES")
                        .help("Comma list of comment rules to exclude: whitespace, hash"),
                ),
        )
        .subcommand(
            Command::new("clean")
                .about("Remove the file a new write of NAME would replace")
                .arg(name_arg()),
        )
        .subcommand(
            Command::new("sort")
                .about("Print keys of 'key value' lines ordered by a rule")
                .arg(name_arg())
                .arg(
                    Arg::new("by")
                        .long("by")
                        .value_name("RULE")
                        .default_value("key")
                        .help("key, value-asc, value-abs-asc, value-desc or value-abs-desc"),
                )
                .arg(
                    Arg::new("sep")
                        .long("sep")
                        .value_name("SEP")
                        .help("Separator between key and value (default: whitespace)"),
                ),
        )
        .get_matches();

    let factory = ReaderFactory::new(load_config()?);

    match matches.subcommand() {
        Some(("resolve", sub)) => {
            let resolution = resolve_readable(name(sub));
            println!("{resolution}");
            if !resolution.is_found() {
                std::process::exit(1);
            }
        }
        Some(("cat", sub)) => cat(&factory, sub)?,
        Some(("lines", sub)) => {
            let rules = match sub.get_one::<String>("skip") {
                Some(text) => CommentRule::parse_list(text)?,
                None => Vec::new(),
            };
            let reader = factory.try_open(name(sub))?;
            println!("{}", count_reader_lines(reader, &rules)?);
        }
        Some(("clean", sub)) => {
            let removed = resolve_writable(name(sub));
            if removed.is_found() {
                println!("removed {}", removed.path.display());
            } else {
                println!("nothing to remove");
            }
        }
        Some(("sort", sub)) => sort(&factory, sub)?,
        _ => unreachable!("subcommand_required is set"),
    }

    Ok(())
}

fn name(matches: &ArgMatches) -> &str {
    matches
        .get_one::<String>("name")
        .map(String::as_str)
        .unwrap_or_default()
}

#[cfg(feature = "config")]
fn load_config() -> Result<ToolConfig> {
    ToolConfig::load().context("loading tool configuration")
}

#[cfg(not(feature = "config"))]
fn load_config() -> Result<ToolConfig> {
    Ok(ToolConfig::default())
}

fn cat(factory: &ReaderFactory, matches: &ArgMatches) -> Result<()> {
    let mut reader = factory.try_open(name(matches))?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match io::copy(&mut reader, &mut out).and_then(|_| out.flush()) {
        Ok(()) => {}
        // Downstream closed early (`| head`); stop quietly.
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => return Ok(()),
        Err(e) => return Err(e).context("copying content to stdout"),
    }
    reader.finish()?;
    Ok(())
}

fn sort(factory: &ReaderFactory, matches: &ArgMatches) -> Result<()> {
    let rule: SortRule = matches
        .get_one::<String>("by")
        .map(String::as_str)
        .unwrap_or("key")
        .parse()?;
    let sep = matches.get_one::<String>("sep");

    let mut reader = factory.try_open(name(matches))?;
    let mut values: HashMap<String, f64> = HashMap::new();
    let mut line = String::new();
    let mut line_number = 0usize;
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        line_number += 1;
        let record = line.trim_end_matches(['\n', '\r']);
        if record.trim().is_empty() {
            continue;
        }
        let parts = match sep {
            Some(sep) => record.split_once(sep.as_str()),
            None => record.trim().split_once(char::is_whitespace),
        };
        let Some((key, value)) = parts else {
            anyhow::bail!("line {line_number}: expected 'key value', got {record:?}");
        };
        let value: f64 = value
            .trim()
            .parse()
            .with_context(|| format!("line {line_number}: invalid value {:?}", value.trim()))?;
        values.insert(key.trim().to_string(), value);
    }
    reader.finish()?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for key in sorted_keys(&values, rule) {
        writeln!(out, "{key}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_version_constant() {
        assert!(!anyfile::VERSION.is_empty());
    }
}
