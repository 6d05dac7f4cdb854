//! Minimal CLI: inventory → (check | generate)
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use polyjson::Inventory;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// generate polymorphic JSON codecs for the unions and containers declared in an inventory
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    /// log generation steps (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// render codecs as Rust source
    Generate(GenerateOut),
    /// validate the inventory and print a summary
    Check(CheckOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// One or more inventory files. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,

    /// Rust path of the module holding the declared types (overrides the inventory's `package`)
    #[arg(long, short)]
    package: Option<String>,
}

#[derive(clap::Parser, Debug)]
struct GenerateOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output .rs file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct CheckOut {
    #[command(flatten)]
    input_settings: InputSettings,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    /// Load and merge every input, in the order given.
    fn load(&self) -> Result<(String, Inventory)> {
        let source_paths = resolve_file_path_patterns(&self.input)
            .context("failed to resolve input file paths")?;
        let mut inventory = Inventory::new();
        for source_path in source_paths {
            tracing::debug!(path = %source_path.display(), "loading inventory");
            inventory.merge(Inventory::from_path(&source_path)?);
        }
        let package = self
            .package
            .clone()
            .or_else(|| inventory.package.clone())
            .unwrap_or_default();
        Ok((package, inventory))
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn verbose(&self) -> bool {
        self.verbose
    }
    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Generate(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }

                let (package, inventory) = target.input_settings.load()?;
                let Inventory {
                    unions, containers, ..
                } = &inventory;

                if let Some(out) = target.out.as_ref() {
                    polyjson::write_codec_file(out, &package, unions, containers)
                        .with_context(|| format!("failed to generate {}", out.display()))?;
                    eprintln!("{} {}", "wrote".green().bold(), out.display());
                } else {
                    let mut stdout = std::io::stdout().lock();
                    polyjson::generate(&mut stdout, &package, unions, containers)?;
                }
            }
            Command::Check(target) => {
                let (package, inventory) = target.input_settings.load()?;
                let plan =
                    polyjson::lower::lower_to_ir(&package, &inventory.unions, &inventory.containers)?;
                eprintln!(
                    "{} {} unions, {} containers, {} record types under {}",
                    "ok".green().bold(),
                    plan.unions.len(),
                    plan.containers.len(),
                    plan.backing.len(),
                    package.bold(),
                );
            }
        }
        Ok(())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
