use std::fs;
use std::path::PathBuf;

use ayah_align::{
    ChapterInput, ChapterReport, JsonReferenceProvider, NormalizeOptions, RecitationVerifier,
    RecitationVerifierBuilder, ReferenceProvider, VerifierConfig, VerifyError, VerseInput,
    VerseReport,
};
use chrono::Utc;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

const SCHEMA_VERSION: u32 = 1;

/// Runs recitation checks over a JSON case file and writes a JSON report.
#[derive(Debug, Parser)]
#[command(name = "verify_report")]
struct Args {
    /// JSON file with an array of cases. A case carries `id`, `hypothesis`,
    /// optional `options`, and one of: `reference` (single verse text),
    /// `verses` (chapter texts), or `chapter`[/`verse`] numbers resolved
    /// through --reference.
    cases: PathBuf,

    /// Normalization rules resource; the engine falls back to regex
    /// patterns when it cannot be read.
    #[arg(long, default_value = "assets/normalization_rules.json")]
    rules: PathBuf,

    /// Reference text file for cases addressed by chapter/verse number.
    #[arg(long)]
    reference: Option<PathBuf>,

    /// Output path; stdout when omitted.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct Case {
    id: String,
    hypothesis: String,
    #[serde(default)]
    reference: Option<String>,
    #[serde(default)]
    verses: Option<Vec<String>>,
    #[serde(default)]
    chapter: Option<u32>,
    #[serde(default)]
    verse: Option<u32>,
    #[serde(default)]
    options: Option<NormalizeOptions>,
}

#[derive(Debug, Serialize)]
struct Report {
    schema_version: u32,
    meta: Meta,
    cases: Vec<CaseOutcome>,
}

#[derive(Debug, Serialize)]
struct Meta {
    generated_at: String,
    tool: String,
    case_count: usize,
}

#[derive(Debug, Serialize)]
struct CaseOutcome {
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    verse: Option<VerseReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    chapter: Option<ChapterReport>,
}

fn main() {
    tracing_subscriber::fmt::init();
    if let Err(err) = run(Args::parse()) {
        eprintln!("verify_report failed: {err}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), VerifyError> {
    let data = fs::read_to_string(&args.cases).map_err(|e| VerifyError::Io {
        context: "read case file",
        source: e,
    })?;
    let cases: Vec<Case> = serde_json::from_str(&data).map_err(|e| VerifyError::Json {
        context: "parse case file",
        source: e,
    })?;

    let verifier = RecitationVerifierBuilder::new(VerifierConfig {
        rules_path: args.rules.to_string_lossy().to_string(),
        options: NormalizeOptions::default(),
    })
    .build()?;

    let reference = args
        .reference
        .as_deref()
        .map(JsonReferenceProvider::load)
        .transpose()?;

    let progress = ProgressBar::new(cases.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut outcomes = Vec::with_capacity(cases.len());
    for case in &cases {
        progress.set_message(case.id.clone());
        outcomes.push(run_case(&verifier, reference.as_ref(), case)?);
        progress.inc(1);
    }
    progress.finish_and_clear();

    let report = Report {
        schema_version: SCHEMA_VERSION,
        meta: Meta {
            generated_at: Utc::now().to_rfc3339(),
            tool: verifier.normalizer_id().to_string(),
            case_count: outcomes.len(),
        },
        cases: outcomes,
    };
    let rendered = serde_json::to_string_pretty(&report).map_err(|e| VerifyError::Json {
        context: "serialize report",
        source: e,
    })?;

    match &args.output {
        Some(path) => {
            fs::write(path, rendered).map_err(|e| VerifyError::Io {
                context: "write report file",
                source: e,
            })?;
            tracing::info!(path = %path.display(), "report written");
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

fn run_case(
    verifier: &RecitationVerifier,
    reference: Option<&JsonReferenceProvider>,
    case: &Case,
) -> Result<CaseOutcome, VerifyError> {
    if let Some(text) = &case.reference {
        let report = verifier.verify_verse(&VerseInput {
            reference: text.clone(),
            hypothesis: case.hypothesis.clone(),
            options: case.options,
        })?;
        return Ok(CaseOutcome {
            id: case.id.clone(),
            verse: Some(report),
            chapter: None,
        });
    }

    if let Some(verses) = &case.verses {
        let report = verifier.verify_chapter(&ChapterInput {
            verses: verses.clone(),
            hypothesis: case.hypothesis.clone(),
            options: case.options,
        })?;
        return Ok(CaseOutcome {
            id: case.id.clone(),
            verse: None,
            chapter: Some(report),
        });
    }

    let Some(chapter) = case.chapter else {
        return Err(VerifyError::InvalidInput {
            message: format!(
                "case {:?} needs one of 'reference', 'verses' or 'chapter'",
                case.id
            ),
        });
    };
    let provider = reference.ok_or_else(|| VerifyError::InvalidInput {
        message: format!(
            "case {:?} addresses chapter {chapter} but no --reference file was given",
            case.id
        ),
    })?;

    if let Some(verse) = case.verse {
        let report = verifier.verify_verse(&VerseInput {
            reference: provider.verse_text(chapter, verse)?,
            hypothesis: case.hypothesis.clone(),
            options: case.options,
        })?;
        return Ok(CaseOutcome {
            id: case.id.clone(),
            verse: Some(report),
            chapter: None,
        });
    }

    let verse_count = provider.verse_count(chapter)?;
    let verses: Vec<String> = (1..=verse_count as u32)
        .map(|verse| provider.verse_text(chapter, verse))
        .collect::<Result<_, _>>()?;
    let report = verifier.verify_chapter(&ChapterInput {
        verses,
        hypothesis: case.hypothesis.clone(),
        options: case.options,
    })?;
    Ok(CaseOutcome {
        id: case.id.clone(),
        verse: None,
        chapter: Some(report),
    })
}
