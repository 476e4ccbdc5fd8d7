//! Incremental consistency tests
//!
//! Validation criteria:
//! 1. Equivalence: after every edit, the incrementally maintained row states equal a
//!    from-scratch classification of the current document.
//! 2. Marker correspondence: after every edit, a marker exists for a row iff the row is not
//!    `Text`, block openers carry the chunk-start class, and no marker outlives its row.

use chunk_core::{ChunkSession, FencePatterns, MarkerStyle, Position, RowState, classify_document};
use chunk_core_lang::FenceConfig;
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regex::Regex;

/// Lines and fragments biased towards fence boundaries.
const LINE_POOL: &[&str] = &[
    "```{r}",
    "```",
    "```{r} # label",
    "x <- 1",
    "plain text",
    "",
    "<<chunk>>=",
    "@",
    "@ comment",
];

const FRAGMENT_POOL: &[&str] = &["`", "{r}", "``", "x", " ", "@", "<<", ">>=", "\n", "\n```\n"];

fn random_position(session: &ChunkSession, rng: &mut StdRng) -> Position {
    let document = session.document();
    let row = rng.gen_range(0..document.line_count());
    let column = rng.gen_range(0..=document.line_len(row));
    Position::new(row, column)
}

fn random_text(rng: &mut StdRng) -> String {
    if rng.gen_bool(0.5) {
        FRAGMENT_POOL[rng.gen_range(0..FRAGMENT_POOL.len())].to_string()
    } else {
        let count = rng.gen_range(1..4);
        (0..count)
            .map(|_| LINE_POOL[rng.gen_range(0..LINE_POOL.len())])
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn random_edit(session: &mut ChunkSession, rng: &mut StdRng) {
    match rng.gen_range(0..5) {
        0 | 1 => {
            let position = random_position(session, rng);
            let text = random_text(rng);
            session.insert(position, &text);
        }
        2 => {
            let start = random_position(session, rng);
            let end = random_position(session, rng);
            session.remove(start, end);
        }
        3 => {
            let row = rng.gen_range(0..=session.document().line_count());
            let count = rng.gen_range(1..4);
            let lines: Vec<&str> = (0..count)
                .map(|_| LINE_POOL[rng.gen_range(0..LINE_POOL.len())])
                .collect();
            session.insert_lines(row, &lines);
        }
        _ => {
            let line_count = session.document().line_count();
            let first = rng.gen_range(0..line_count);
            let last = rng.gen_range(first..line_count.min(first + 4));
            session.remove_lines(first, last);
        }
    }
}

fn assert_consistent(session: &ChunkSession, fences: &FencePatterns, context: &str) {
    let document = session.document();
    let expected = classify_document(fences, document);
    let states = session.states().expect("highlighter attached");
    assert_eq!(states, expected.as_slice(), "{context}\n{}", document.text());

    let foreign_rows: Vec<usize> = (0..document.line_count())
        .filter(|&row| states[row] != RowState::Text)
        .collect();
    let opener_rows: Vec<usize> = (0..document.line_count())
        .filter(|&row| states[row] == RowState::BlockBegin)
        .collect();
    let markers = session.markers();
    assert_eq!(markers.rows_with_class("foreign_line"), foreign_rows, "{context}");
    assert_eq!(markers.rows_with_class("chunk_start"), opener_rows, "{context}");
    assert_eq!(markers.len(), foreign_rows.len(), "{context}");
}

fn run_random_edits(fences: FencePatterns, seed: u64, operation_count: usize) {
    let mut rng = StdRng::seed_from_u64(seed);
    let initial: Vec<&str> = (0..40)
        .map(|_| LINE_POOL[rng.gen_range(0..LINE_POOL.len())])
        .collect();

    let mut session = ChunkSession::new(&initial.join("\n"));
    session.attach(fences.clone(), MarkerStyle::default());
    assert_consistent(&session, &fences, "initial");

    for i in 0..operation_count {
        random_edit(&mut session, &mut rng);
        assert_consistent(&session, &fences, &format!("seed {seed}, edit {i}"));
    }
}

fn r_fences(text_is_terminator: bool) -> FencePatterns {
    FencePatterns::new(
        Regex::new(r"^```\{r\}").unwrap(),
        Regex::new(r"^```$").unwrap(),
        text_is_terminator,
    )
}

#[test]
fn test_random_edits_non_terminator() {
    for seed in 0..8 {
        run_random_edits(r_fences(false), seed, 300);
    }
}

#[test]
fn test_random_edits_terminator() {
    for seed in 100..108 {
        run_random_edits(r_fences(true), seed, 300);
    }
}

#[test]
fn test_random_edits_sweave_preset() {
    let fences = FencePatterns::compile(&FenceConfig::sweave()).unwrap();
    for seed in 200..204 {
        run_random_edits(fences.clone(), seed, 300);
    }
}

#[test]
fn test_random_edits_r_markdown_preset() {
    let fences = FencePatterns::compile(&FenceConfig::r_markdown()).unwrap();
    for seed in 300..304 {
        run_random_edits(fences.clone(), seed, 300);
    }
}

#[test]
fn test_set_text_resets_consistently() {
    let fences = r_fences(true);
    let mut session = ChunkSession::new("```{r}\nx");
    session.attach(fences.clone(), MarkerStyle::default());
    assert_consistent(&session, &fences, "initial");

    session.set_text("a\n```{r}\n```\nb\n```");
    assert_consistent(&session, &fences, "after set_text");
    assert_eq!(session.document().line_count(), 5);
}
