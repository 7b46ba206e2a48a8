//! CLI argument parsing using clap derive

use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;
use setconf_content::{EndMarker, LineClassifier, Sign, Syntax};

use crate::error::{CliError, Result};

/// Change a key in a text file to a given value
#[derive(Parser, Debug)]
#[command(name = "setconf")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
Examples:
  setconf Makefile CC clang
  setconf my.conf x=42
  setconf my.conf counter+=1
  setconf PKGBUILD sha256sums \"('123abc' 'abc123')\" ')'
  setconf app.py NUMS \"[1, 2, 3]\" ']'
  setconf -a server.conf ABC 123
  setconf -u .config CONFIG_DEBUG y")]
pub struct Cli {
    /// Enable debug output on stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress warnings, such as a missing end marker
    #[arg(short, long)]
    pub quiet: bool,

    /// Add the key if it doesn't exist; creates the file if needed
    #[arg(short, long, conflicts_with = "uncomment")]
    pub add: bool,

    /// Uncomment commented-out lines with the key before setting it
    #[arg(short, long)]
    pub uncomment: bool,

    /// Print the changes as FILE:LINE: OLD -> NEW without writing
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Syntax definition (TOML, JSON or YAML) overriding the operators,
    /// comment markers and line ending
    #[arg(long, env = "SETCONF_SYNTAX", value_name = "FILE")]
    pub syntax: Option<PathBuf>,

    /// The file to change
    pub file: PathBuf,

    /// KEY VALUE [END], or KEY=VALUE, KEY+=N, KEY-=N
    #[arg(
        value_name = "ARGS",
        required = true,
        num_args = 1..=3,
        allow_hyphen_values = true
    )]
    pub args: Vec<OsString>,
}

/// What to do with the file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Set every assignment of the key
    Set { key: Vec<u8>, value: Vec<u8> },
    /// Replace a value that may run over several lines, up to `end`
    Span {
        key: Vec<u8>,
        value: Vec<u8>,
        end: EndMarker,
    },
    /// Add to or subtract from a numeric value
    Adjust {
        key: Vec<u8>,
        delta: Vec<u8>,
        sign: Sign,
    },
    /// Uncomment the key, then set it
    Uncomment { key: Vec<u8>, value: Vec<u8> },
    /// Set the key, or append `line` if it is not there
    Add {
        key: Vec<u8>,
        value: Vec<u8>,
        line: Vec<u8>,
    },
}

impl Cli {
    /// Interpret the positional arguments.
    pub fn operation(&self, syntax: &Syntax, classifier: &LineClassifier) -> Result<Operation> {
        let args: Vec<&[u8]> = self.args.iter().map(|a| a.as_encoded_bytes()).collect();

        if self.add {
            return match args.as_slice() {
                [key, value] => {
                    let key = key_arg(key)?;
                    let mut line = key.clone();
                    line.push(b'=');
                    line.extend_from_slice(value);
                    Ok(Operation::Add {
                        key,
                        value: value.to_vec(),
                        line,
                    })
                }
                [literal] => {
                    let (key, value) = classifier.parse_assignment(literal)?;
                    Ok(Operation::Add {
                        key: key_arg(key)?,
                        value: value.to_vec(),
                        line: literal.trim_ascii().to_vec(),
                    })
                }
                _ => Err(CliError::user("--add takes KEY VALUE or KEY=VALUE")),
            };
        }

        if self.uncomment {
            let (key, value) = match args.as_slice() {
                [key, value] => (*key, *value),
                [literal] => split_at_equals(literal)?,
                _ => return Err(CliError::user("--uncomment takes KEY VALUE or KEY=VALUE")),
            };
            return Ok(Operation::Uncomment {
                key: key_arg(key)?,
                value: value.to_vec(),
            });
        }

        match args.as_slice() {
            [key, value, end] => Ok(Operation::Span {
                key: key_arg(key)?,
                value: value.to_vec(),
                end: EndMarker::parse(end),
            }),
            [key, value] => Ok(Operation::Set {
                key: key_arg(key)?,
                value: value.to_vec(),
            }),
            [literal] => single_argument(literal, syntax),
            _ => Err(CliError::user("expected KEY VALUE [END] or KEY=VALUE")),
        }
    }
}

/// `KEY+=N` and `KEY-=N` are checked before a plain `KEY=VALUE`.
fn single_argument(literal: &[u8], syntax: &Syntax) -> Result<Operation> {
    for (op, sign) in syntax.delta_operators() {
        let token = op.as_bytes();
        if let Some(pos) = literal.windows(token.len()).position(|w| w == token) {
            return Ok(Operation::Adjust {
                key: key_arg(&literal[..pos])?,
                delta: literal[pos + token.len()..].trim_ascii().to_vec(),
                sign,
            });
        }
    }

    let (key, value) = split_at_equals(literal)?;
    Ok(Operation::Set {
        key: key_arg(key)?,
        value: value.to_vec(),
    })
}

fn split_at_equals(literal: &[u8]) -> Result<(&[u8], &[u8])> {
    let pos = literal
        .iter()
        .position(|&b| b == b'=')
        .ok_or_else(|| setconf_content::Error::no_assignment(literal))?;
    Ok((&literal[..pos], &literal[pos + 1..]))
}

fn key_arg(key: &[u8]) -> Result<Vec<u8>> {
    let key = key.trim_ascii();
    if key.is_empty() {
        return Err(CliError::user("the key must not be empty"));
    }
    Ok(key.to_vec())
}
