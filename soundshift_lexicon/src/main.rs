//! `soundshift` command line tool.
//!
//! Evolves words and phrases through the built-in Old Daric -> Daric rules
//! (or a JSON language definition), exports a whole lexicon, generates
//! random ancestral words, and sweeps synthetic consonant clusters through
//! the sandhi group.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use soundshift_engine::builtin::ancestral_def;
use soundshift_engine::{EngineOptions, Language};
use soundshift_lexicon::export::export_lexicon;
use soundshift_lexicon::generator::{WordShape, sample_vocabulary};
use soundshift_lexicon::sweep::{long_clusters, short_clusters, sweep_sandhi};
use soundshift_lexicon::{Lexicon, default_lexicon};
use soundshift_prng::WordRng;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "soundshift")]
#[command(about = "Derive descendant-language words by ordered sound change")]
#[command(version)]
struct Cli {
    /// Verbose logging (per-stage debug events)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Language definition JSON to use instead of the built-in rules
    #[arg(short, long, global = true, value_name = "FILE")]
    rules: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evolve words or phrases and print the result
    Evolve {
        /// Ancestral words in external notation; each argument is one phrase
        #[arg(required = true)]
        words: Vec<String>,

        /// Print every intermediate form with the rule that produced it
        #[arg(short, long)]
        trace: bool,

        /// Keep stress and geminate markers in intermediate forms
        #[arg(short, long)]
        debug: bool,
    },
    /// Evolve a whole lexicon and write a JSON word list
    Export {
        /// Lexicon JSON (defaults to the embedded ancestral lexicon)
        #[arg(short, long, value_name = "FILE")]
        lexicon: Option<PathBuf>,

        /// Output file (defaults to stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Include each word's full derivation
        #[arg(long)]
        derivations: bool,
    },
    /// Generate random ancestral words and their descendants
    Generate {
        #[arg(short, long, default_value = "1")]
        seed: u64,

        #[arg(short = 'n', long, default_value = "20")]
        count: usize,

        #[arg(long, default_value = "1")]
        min_syllables: usize,

        #[arg(long, default_value = "4")]
        max_syllables: usize,
    },
    /// Run the sandhi group on every short consonant cluster
    Sweep {
        /// Longest cluster to try exhaustively
        #[arg(short, long, default_value = "3")]
        max_len: usize,

        /// Also try cycled and repeated clusters of this length
        #[arg(short, long, value_name = "LEN")]
        long: Option<usize>,
    },
    /// Print the built-in language definition as JSON
    Rules,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    match cli.command {
        Command::Evolve { words, trace, debug } => {
            let language = load_language(cli.rules.as_deref(), EngineOptions { debug })?;
            evolve_words(&language, &words, trace)
        }
        Command::Export {
            lexicon,
            output,
            derivations,
        } => {
            let language = load_language(cli.rules.as_deref(), EngineOptions::default())?;
            let lexicon = match lexicon {
                Some(path) => {
                    let json = std::fs::read_to_string(&path)
                        .with_context(|| format!("reading lexicon {}", path.display()))?;
                    Lexicon::from_json(&json)
                        .with_context(|| format!("parsing lexicon {}", path.display()))?
                }
                None => default_lexicon(),
            };
            let report = export_lexicon(&language, &lexicon, derivations);
            for failure in &report.failures {
                eprintln!("failed: {} ({}): {}", failure.form, failure.gloss, failure.error);
            }
            match output {
                Some(path) => {
                    let file = File::create(&path)
                        .with_context(|| format!("creating {}", path.display()))?;
                    let mut writer = BufWriter::new(file);
                    report.write_json(language.name(), &mut writer)?;
                    writer.flush()?;
                    info!(path = %path.display(), words = report.entries.len(), "wrote word list");
                }
                None => {
                    let stdout = std::io::stdout();
                    let mut handle = stdout.lock();
                    report.write_json(language.name(), &mut handle)?;
                    writeln!(handle)?;
                }
            }
            Ok(())
        }
        Command::Generate {
            seed,
            count,
            min_syllables,
            max_syllables,
        } => {
            let language = load_language(cli.rules.as_deref(), EngineOptions::default())?;
            let shape = WordShape {
                min_syllables,
                max_syllables,
                ..WordShape::default()
            };
            if min_syllables > max_syllables || max_syllables == 0 {
                bail!("invalid syllable range {min_syllables}..={max_syllables}");
            }
            let mut rng = WordRng::new(seed);
            for word in sample_vocabulary(&mut rng, &shape, count) {
                match language.evolve_final(&word) {
                    Ok(descendant) => println!("{word}\t{descendant}"),
                    Err(e) => eprintln!("{word}\tfailed: {e}"),
                }
            }
            Ok(())
        }
        Command::Sweep { max_len, long } => {
            let language = load_language(cli.rules.as_deref(), EngineOptions::default())?;
            let no_class =
                || anyhow!("language '{}' has no consonant class 'C'", language.name());
            let mut words = short_clusters(&language, 2, max_len.max(2)).ok_or_else(no_class)?;
            if let Some(len) = long {
                words.extend(long_clusters(&language, len).ok_or_else(no_class)?);
            }
            let report = sweep_sandhi(&language, words);
            println!("{} clusters", report.words);
            for (passes, n) in &report.passes {
                println!("  {passes:>3} passes: {n}");
            }
            for failure in &report.failures {
                println!("  FAILED {}: {}", failure.word, failure.error);
            }
            if !report.failures.is_empty() {
                bail!("{} clusters did not converge", report.failures.len());
            }
            Ok(())
        }
        Command::Rules => {
            println!("{}", ancestral_def().to_json()?);
            Ok(())
        }
    }
}

fn load_language(rules: Option<&Path>, options: EngineOptions) -> Result<Language> {
    let Some(path) = rules else {
        return Ok(Language::builtin(options));
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading language definition {}", path.display()))?;
    let language = Language::from_json(&json, options)
        .with_context(|| format!("compiling language definition {}", path.display()))?;
    info!(language = language.name(), "loaded language definition");
    Ok(language)
}

fn evolve_words(language: &Language, words: &[String], trace: bool) -> Result<()> {
    let mut failed = 0;
    for word in words {
        let derivation = match language.derive(word) {
            Ok(d) => d,
            Err(e) => {
                eprintln!("{word}: {e}");
                failed += 1;
                continue;
            }
        };
        if trace {
            println!("{word}");
            for stage in derivation.stages().iter().skip(1) {
                println!("  {:<28} {}", stage.rule, stage.form);
            }
        } else {
            println!("{word}\t{}", derivation.final_form());
        }
    }
    if failed > 0 {
        bail!("{failed} of {} words failed", words.len());
    }
    Ok(())
}

fn setup_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}
