use std::fs;
use std::path::{Path, PathBuf};

use ayah_align::{
    ChapterInput, NormalizeOptions, RecitationVerifier, RecitationVerifierBuilder, VerifierConfig,
    VerseInput, VerseReport,
};
use libtest_mimic::{Arguments, Failed, Trial};
use serde::Deserialize;

const SUITE_NAME: &str = "verse_alignment";
const SCORE_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, Deserialize)]
struct FixtureCase {
    #[serde(default)]
    reference: Option<String>,
    #[serde(default)]
    verses: Option<Vec<String>>,
    hypothesis: String,
    #[serde(default)]
    options: Option<NormalizeOptions>,
    expected: Expected,
}

#[derive(Debug, Clone, Deserialize)]
struct Expected {
    #[serde(default)]
    score_percent: Option<f64>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    word_ops: Option<Vec<(String, usize, usize, usize, usize)>>,
    #[serde(default)]
    spells: Option<Vec<SpellExpectation>>,
    #[serde(default)]
    chapter: Option<ChapterExpectation>,
}

#[derive(Debug, Clone, Deserialize)]
struct SpellExpectation {
    slot: usize,
    #[serde(default)]
    op: Option<String>,
    #[serde(default)]
    error_ranges: Option<Vec<[usize; 2]>>,
    #[serde(default)]
    has_missing: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChapterExpectation {
    correct_verses: usize,
    total_verses: usize,
    all_correct: bool,
    statuses: Vec<String>,
}

fn main() {
    let args = Arguments::from_args();
    let repo_root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let cases_dir = repo_root.join("test-data").join("cases");

    let fixtures = match load_fixtures(&cases_dir) {
        Ok(fixtures) => fixtures,
        Err(message) => {
            run_setup_failure(&args, message);
            return;
        }
    };
    if fixtures.is_empty() {
        run_setup_failure(
            &args,
            "No fixture cases found under test-data/cases.".to_string(),
        );
        return;
    }

    let rules_path = repo_root.join("assets").join("normalization_rules.json");
    let mut tests = Vec::with_capacity(fixtures.len() * 2);
    for (stem, case) in fixtures {
        // Every fixture runs against both normalizer selections; the
        // contract shape and alignment results must not depend on which
        // implementation answered.
        let table_case = case.clone();
        let table_rules = rules_path.clone();
        tests.push(Trial::test(
            format!("{SUITE_NAME}::rule_table::{stem}"),
            move || {
                run_case(&table_case, Some(table_rules.as_path()), "rule_table")
                    .map_err(Failed::from)
            },
        ));
        tests.push(Trial::test(
            format!("{SUITE_NAME}::regex_fallback::{stem}"),
            move || run_case(&case, None, "regex_fallback").map_err(Failed::from),
        ));
    }

    libtest_mimic::run(&args, tests).exit();
}

fn run_setup_failure(args: &Arguments, message: String) {
    let test = Trial::test(format!("{SUITE_NAME}::setup"), move || {
        Err(Failed::from(message))
    });
    libtest_mimic::run(args, vec![test]).exit();
}

fn load_fixtures(cases_dir: &Path) -> Result<Vec<(String, FixtureCase)>, String> {
    let entries = fs::read_dir(cases_dir)
        .map_err(|err| format!("read {}: {err}", cases_dir.display()))?;
    let mut fixtures = Vec::new();
    for entry in entries {
        let path = entry.map_err(|err| err.to_string())?.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }
        let stem = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("case")
            .to_string();
        let data =
            fs::read_to_string(&path).map_err(|err| format!("read {}: {err}", path.display()))?;
        let case: FixtureCase = serde_json::from_str(&data)
            .map_err(|err| format!("parse {}: {err}", path.display()))?;
        fixtures.push((stem, case));
    }
    fixtures.sort_by(|(a, _), (b, _)| a.cmp(b));
    Ok(fixtures)
}

fn build_engine(rules_path: Option<&Path>) -> Result<RecitationVerifier, String> {
    let config = VerifierConfig {
        rules_path: rules_path
            .map(|path| path.to_string_lossy().to_string())
            .unwrap_or_default(),
        options: NormalizeOptions::default(),
    };
    RecitationVerifierBuilder::new(config)
        .build()
        .map_err(|err| format!("engine build failed: {err}"))
}

fn run_case(
    case: &FixtureCase,
    rules_path: Option<&Path>,
    expected_tool: &str,
) -> Result<(), String> {
    let engine = build_engine(rules_path)?;
    if engine.normalizer_id() != expected_tool {
        return Err(format!(
            "expected normalizer {expected_tool}, engine selected {}",
            engine.normalizer_id()
        ));
    }

    if let Some(verses) = &case.verses {
        let report = engine
            .verify_chapter(&ChapterInput {
                verses: verses.clone(),
                hypothesis: case.hypothesis.clone(),
                options: case.options,
            })
            .map_err(|err| format!("verify_chapter failed: {err}"))?;
        let expected = case
            .expected
            .chapter
            .as_ref()
            .ok_or("chapter fixture lacks expected.chapter")?;
        check_eq("correct_verses", report.correct_verses, expected.correct_verses)?;
        check_eq("total_verses", report.total_verses, expected.total_verses)?;
        check_eq("all_correct", report.all_correct, expected.all_correct)?;
        for (index, (verse, status)) in report
            .verses
            .iter()
            .zip(expected.statuses.iter())
            .enumerate()
        {
            check_eq(
                &format!("verses[{index}].status"),
                grade_str(&verse.report)?,
                status.clone(),
            )?;
        }
        return Ok(());
    }

    let reference = case
        .reference
        .as_ref()
        .ok_or("fixture needs 'reference' or 'verses'")?;
    let report = engine
        .verify_verse(&VerseInput {
            reference: reference.clone(),
            hypothesis: case.hypothesis.clone(),
            options: case.options,
        })
        .map_err(|err| format!("verify_verse failed: {err}"))?;

    if report.spells.normalization.tool != expected_tool {
        return Err(format!(
            "normalization metadata reports tool {:?}, expected {expected_tool:?}",
            report.spells.normalization.tool
        ));
    }

    if let Some(score) = case.expected.score_percent {
        if (report.score_percent - score).abs() > SCORE_TOLERANCE {
            return Err(format!(
                "score_percent {} differs from expected {score}",
                report.score_percent
            ));
        }
    }
    if let Some(status) = &case.expected.status {
        check_eq("status", grade_str(&report)?, status.clone())?;
    }
    if let Some(expected_ops) = &case.expected.word_ops {
        let actual: Vec<(String, usize, usize, usize, usize)> = report
            .word_ops
            .iter()
            .map(|op| {
                (
                    op.op.as_str().to_string(),
                    op.ref_start,
                    op.ref_end,
                    op.hyp_start,
                    op.hyp_end,
                )
            })
            .collect();
        check_eq("word_ops", actual, expected_ops.clone())?;
    }
    if let Some(spells) = &case.expected.spells {
        for expectation in spells {
            let record = report
                .spells
                .words
                .get(expectation.slot)
                .ok_or_else(|| format!("no spell record at slot {}", expectation.slot))?;
            if let Some(op) = &expectation.op {
                check_eq(
                    &format!("spells[{}].op", expectation.slot),
                    record.op.as_str().to_string(),
                    op.clone(),
                )?;
            }
            if let Some(ranges) = &expectation.error_ranges {
                check_eq(
                    &format!("spells[{}].hyp_error_ranges", expectation.slot),
                    record.hyp_error_ranges.clone(),
                    ranges.clone(),
                )?;
            }
            if let Some(missing) = expectation.has_missing {
                check_eq(
                    &format!("spells[{}].has_missing", expectation.slot),
                    record.has_missing,
                    missing,
                )?;
            }
        }
    }
    Ok(())
}

fn grade_str(report: &VerseReport) -> Result<String, String> {
    serde_json::to_value(report.status)
        .map_err(|err| err.to_string())?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| "status did not serialize to a string".to_string())
}

fn check_eq<T: PartialEq + std::fmt::Debug>(
    field: &str,
    actual: T,
    expected: T,
) -> Result<(), String> {
    if actual != expected {
        return Err(format!("{field}: got {actual:?}, expected {expected:?}"));
    }
    Ok(())
}
