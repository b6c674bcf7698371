mod debug_report;

use std::fs;
use std::io::{self, IsTerminal, Read};
use traduko::{Grammar, Options, Signature, SubstitutionTable, TagDictionary, Translator};

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let translator = match build_translator(&config) {
        Ok(translator) => translator,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    if config.words_mode {
        let inventory = translator.parse_words(&config.sentences);
        debug_report::print_inventory(&inventory, config.color);
        return;
    }

    let options = match config.seed {
        Some(seed) => Options { seed },
        None => Options::default(),
    };

    if config.verbose {
        match translator.translate_verbose_with(&config.sentences, &options) {
            Ok(out) => debug_report::print_run(&out, config.color),
            Err(err) => {
                eprintln!("{err}");
                std::process::exit(1);
            }
        }
    } else {
        match translator.translate_with(&config.sentences, &options) {
            Ok(out) => {
                for sentence in &out.sentences {
                    println!("{sentence}");
                }
                if !out.ambiguities.is_empty() {
                    eprintln!(
                        "note: {} sentence(s) had multiple candidate translations; \
                         re-run with --verbose to inspect them",
                        out.ambiguities.len()
                    );
                }
            }
            Err(err) => {
                eprintln!("{err}");
                std::process::exit(1);
            }
        }
    }
}

struct CliConfig {
    grammar_path: String,
    table_path: Option<String>,
    dict_path: Option<String>,
    sentences: Vec<String>,
    seed: Option<u64>,
    words_mode: bool,
    verbose: bool,
    color: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut grammar_path: Option<String> = None;
    let mut table_path: Option<String> = None;
    let mut dict_path: Option<String> = None;
    let mut sentences: Vec<String> = Vec::new();
    let mut seed: Option<u64> = None;
    let mut words_mode = false;
    let mut verbose = false;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("traduko {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--words" => words_mode = true,
            "--verbose" => verbose = true,
            "--grammar" => grammar_path = Some(expect_value(&mut args, "--grammar")?),
            "--table" => table_path = Some(expect_value(&mut args, "--table")?),
            "--dict" => dict_path = Some(expect_value(&mut args, "--dict")?),
            "--seed" => {
                let value = expect_value(&mut args, "--seed")?;
                seed = Some(parse_seed(&value)?);
            }
            "--" => {
                sentences.extend(args);
                break;
            }
            _ if arg.starts_with("--grammar=") => {
                grammar_path = Some(arg.trim_start_matches("--grammar=").to_string());
            }
            _ if arg.starts_with("--table=") => {
                table_path = Some(arg.trim_start_matches("--table=").to_string());
            }
            _ if arg.starts_with("--dict=") => {
                dict_path = Some(arg.trim_start_matches("--dict=").to_string());
            }
            _ if arg.starts_with("--seed=") => {
                seed = Some(parse_seed(arg.trim_start_matches("--seed="))?);
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => sentences.push(arg),
        }
    }

    let Some(grammar_path) = grammar_path else {
        return Err(format!("error: --grammar is required\n\n{}", help_text()));
    };

    if sentences.is_empty() {
        sentences = read_stdin_sentences()?;
    }
    if sentences.is_empty() {
        return Err(format!("error: no sentences provided\n\n{}", help_text()));
    }

    Ok(CliConfig {
        grammar_path,
        table_path,
        dict_path,
        sentences,
        seed,
        words_mode,
        verbose,
        color,
    })
}

fn expect_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, String> {
    args.next().ok_or_else(|| format!("error: {flag} expects a value"))
}

fn parse_seed(value: &str) -> Result<u64, String> {
    value.parse().map_err(|_| format!("error: invalid --seed '{value}' (expected an integer)"))
}

fn read_stdin_sentences() -> Result<Vec<String>, String> {
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer.lines().map(str::trim).filter(|line| !line.is_empty()).map(String::from).collect())
}

fn build_translator(config: &CliConfig) -> Result<Translator, String> {
    let grammar = load_grammar(&config.grammar_path)?;
    let table = match &config.table_path {
        Some(path) => load_table(path)?,
        None => SubstitutionTable::new(),
    };
    let dictionary = match &config.dict_path {
        Some(path) => load_dictionary(path)?,
        None => TagDictionary::new(),
    };
    Ok(Translator::new(grammar, table, dictionary))
}

fn load_grammar(path: &str) -> Result<Grammar, String> {
    let text = fs::read_to_string(path)
        .map_err(|err| format!("error: failed to read grammar '{path}': {err}"))?;
    Grammar::parse(&text).map_err(|err| format!("error: {path}: {err}"))
}

fn load_table(path: &str) -> Result<SubstitutionTable, String> {
    let text = fs::read_to_string(path)
        .map_err(|err| format!("error: failed to read table '{path}': {err}"))?;
    let raw: std::collections::BTreeMap<String, String> = serde_json::from_str(&text)
        .map_err(|err| format!("error: failed to parse table '{path}': {err}"))?;

    let mut table = SubstitutionTable::new();
    for (src, tgt) in raw {
        let src: Signature = src.parse().map_err(|err| format!("error: {path}: {err}"))?;
        let tgt: Signature = tgt.parse().map_err(|err| format!("error: {path}: {err}"))?;
        table.insert(src, tgt);
    }
    Ok(table)
}

fn load_dictionary(path: &str) -> Result<TagDictionary, String> {
    let text = fs::read_to_string(path)
        .map_err(|err| format!("error: failed to read dictionary '{path}': {err}"))?;
    serde_json::from_str(&text)
        .map_err(|err| format!("error: failed to parse dictionary '{path}': {err}"))
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "traduko {version}

Rule-based parse-tree translation CLI.

Usage:
  traduko --grammar <file> [OPTIONS] [--] <sentence>...
  traduko --grammar <file> [OPTIONS] < sentences.txt

Each positional argument (or stdin line) is one sentence.

Options:
  --grammar <file>   Source-language grammar, NLTK-style productions. Required.
  --table <file>     Substitution table JSON: {{\"src rule\": \"tgt rule\"}}.
  --dict <file>      Tag dictionary JSON: {{\"tag\": {{\"word\": \"t\" | [\"a\", \"b\"]}}}}.
  --seed <n>         Seed for ambiguous word choice (default: time-derived).
  --words            Build the tag/word inventory instead of translating.
  --verbose          Print the per-sentence rewrite report.
  --color            Force ANSI color output.
  --no-color         Disable ANSI color output.
  -h, --help         Show this help message.
  -V, --version      Print version information.

Exit codes:
  0  Success.
  1  Translation failure (unparsable sentences, cyclic table).
  2  Invalid arguments or unreadable inputs.
",
        version = env!("CARGO_PKG_VERSION")
    )
}
