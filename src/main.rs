//! Triglot command-line interface

use anyhow::{bail, Context};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use triglot::{Language, TranslationOutcome};

#[derive(Parser, Debug)]
#[command(
    name = "triglot",
    version,
    about = "Translate source code between Python, C and Java"
)]
struct Cli {
    /// Input source file
    input: PathBuf,

    /// Source language (inferred from the input extension when omitted)
    #[arg(long = "from", value_name = "LANG")]
    from_lang: Option<Language>,

    /// Target language
    #[arg(long = "to", value_name = "LANG")]
    to_lang: Language,

    /// Write the translated program here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Parse and translate but print only warnings and the verdict
    #[arg(long)]
    check: bool,

    /// Emit the full outcome as JSON
    #[arg(long)]
    json: bool,

    /// Keep the source in a commented shell when the pipeline fails
    #[arg(long)]
    fallback: bool,

    /// Disable the boolean-variable naming heuristic
    #[arg(long)]
    strict_types: bool,

    /// Print per-construct diagnostics to stderr
    #[arg(long)]
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let source_code = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;

    let from = match cli.from_lang {
        Some(lang) => lang,
        None => infer_language(&cli.input)?,
    };

    let outcome = run_translation(&source_code, from, cli.to_lang, &cli);

    if cli.debug {
        for warning in &outcome.warnings {
            eprintln!("warning: {warning}");
        }
        if let Some(error) = &outcome.error {
            eprintln!("error: {error}");
        }
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        if !outcome.success {
            std::process::exit(1);
        }
        return Ok(());
    }

    if cli.check {
        for warning in &outcome.warnings {
            println!("warning: {warning}");
        }
        if outcome.success {
            println!("ok: {} -> {}", from, cli.to_lang);
            return Ok(());
        }
        bail!(outcome.error.unwrap_or_else(|| "translation failed".to_string()));
    }

    match (outcome.success, outcome.translated_code) {
        (true, Some(code)) => {
            if !cli.debug {
                for warning in &outcome.warnings {
                    eprintln!("warning: {warning}");
                }
            }
            match &cli.output {
                Some(path) => fs::write(path, code)
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => print!("{code}"),
            }
            Ok(())
        }
        _ => bail!(outcome.error.unwrap_or_else(|| "translation failed".to_string())),
    }
}

fn run_translation(
    source_code: &str,
    from: Language,
    to: Language,
    cli: &Cli,
) -> TranslationOutcome {
    if cli.strict_types {
        return translate_strict(source_code, from, to);
    }
    if cli.fallback {
        triglot::translate_or_fallback(source_code, from, to)
    } else {
        triglot::translate(source_code, from, to)
    }
}

/// Strict-types path sets the context flag before parsing, so it goes
/// through the translator directly instead of the top-level helper.
fn translate_strict(source_code: &str, from: Language, to: Language) -> TranslationOutcome {
    use triglot::context::TranslationContext;
    use triglot::{LanguagePair, Translator};

    let pair = LanguagePair::new(from, to);
    let translator = match Translator::new(pair) {
        Ok(t) => t,
        Err(err) => return failed(err.to_string()),
    };
    let mut ctx = TranslationContext::new(pair);
    ctx.strict_types = true;
    match translator.translate_with(source_code, &mut ctx) {
        Ok(result) => TranslationOutcome {
            success: true,
            translated_code: Some(result.code),
            warnings: result.warnings,
            error: None,
            service_used: "pipeline".to_string(),
        },
        Err(err) => failed(err.to_string()),
    }
}

fn failed(error: String) -> TranslationOutcome {
    TranslationOutcome {
        success: false,
        translated_code: None,
        warnings: Vec::new(),
        error: Some(error),
        service_used: "pipeline".to_string(),
    }
}

fn infer_language(path: &PathBuf) -> anyhow::Result<Language> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .with_context(|| format!("{} has no file extension, pass --from", path.display()))?;
    Language::from_extension(ext)
        .with_context(|| format!("unrecognized extension '.{ext}', pass --from"))
}
