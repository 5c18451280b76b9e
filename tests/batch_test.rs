//! Integration tests for directory batch processing.

use std::fs;
use std::path::Path;

use pagecells::render::read_submission_file;
use pagecells::{
    process_directory, process_directory_with_options, BatchRunner, BoundingBox, ExtractOptions,
    Extractor, Glyph, GlyphDump, GlyphDumpLoader, SubmissionWriter,
};

fn text_line(text: &str, x: f32, y: f32) -> Vec<Glyph> {
    text.chars()
        .enumerate()
        .map(|(i, c)| {
            let left = x + i as f32 * 5.0;
            Glyph::new(c.to_string(), BoundingBox::new(left, y, left + 5.0, y + 10.0))
        })
        .collect()
}

fn write_dump(dir: &Path, name: &str, pages: &[Vec<Glyph>]) {
    let json = GlyphDump::from_pages(pages).to_json().unwrap();
    fs::write(dir.join(name), json).unwrap();
}

/// Input directory with one document of each kind.
fn sample_input() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_dump(dir.path(), "a_blank.json", &[text_line("     ", 0.0, 0.0)]);
    write_dump(
        dir.path(),
        "b_paper.json",
        &[
            text_line("Introduction to layout", 50.0, 700.0),
            text_line("Second page body", 50.0, 500.0),
        ],
    );
    fs::write(dir.path().join("broken.json"), "{\"pages\": [").unwrap();
    write_dump(
        dir.path(),
        "report.coco_standard.json",
        &[text_line("Annual report", 60.0, 720.0)],
    );
    fs::write(dir.path().join("readme.txt"), "not a document").unwrap();
    dir
}

#[test]
fn test_batch_writes_one_row_per_document_with_cells() {
    let input = sample_input();
    let out = tempfile::tempdir().unwrap();
    let csv_path = out.path().join("submission.csv");

    let summary = process_directory(input.path(), &csv_path).unwrap();
    assert_eq!(summary.total, 4);
    assert_eq!(summary.processed, 4);
    assert_eq!(summary.written, 2);
    assert_eq!(summary.empty, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.cells, 3);
    assert!(!summary.cancelled);

    let results = read_submission_file(&csv_path).unwrap();
    let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["b_paper", "report"]);

    let paper = &results[0];
    assert_eq!(paper.cells.len(), 2);
    assert_eq!(paper.cells[0].text, "Introduction to layout");
    assert_eq!((paper.cells[0].page, paper.cells[0].block_index), (1, 0));
    assert_eq!((paper.cells[1].page, paper.cells[1].block_index), (2, 0));
}

#[test]
fn test_batch_csv_header_and_quoting() {
    let input = sample_input();
    let out = tempfile::tempdir().unwrap();
    let csv_path = out.path().join("submission.csv");
    process_directory(input.path(), &csv_path).unwrap();

    let text = fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "id,solution");
    assert!(lines[1].starts_with("b_paper,\"[{\"\"X\"\":50.0,\"\"Y\"\":700.0"));
    assert!(lines[2].starts_with("report,\"[{"));
    assert!(lines[2].contains("\"\"BlockType\"\":\"\"paragraph\"\""));
}

#[test]
fn test_batch_output_is_reproducible() {
    let input = sample_input();
    let out = tempfile::tempdir().unwrap();
    let parallel = out.path().join("parallel.csv");
    let sequential = out.path().join("sequential.csv");

    process_directory(input.path(), &parallel).unwrap();
    process_directory_with_options(
        input.path(),
        &sequential,
        ExtractOptions::new().sequential(),
    )
    .unwrap();

    assert_eq!(
        fs::read_to_string(&parallel).unwrap(),
        fs::read_to_string(&sequential).unwrap()
    );
}

#[test]
fn test_empty_directory_writes_header_only() {
    let input = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let csv_path = out.path().join("submission.csv");

    let summary = process_directory(input.path(), &csv_path).unwrap();
    assert_eq!(summary.total, 0);
    assert_eq!(fs::read_to_string(&csv_path).unwrap(), "id,solution\n");
}

#[test]
fn test_progress_reports_every_document() {
    let input = sample_input();
    let runner = BatchRunner::new(Extractor::default(), Box::new(GlyphDumpLoader::new()));
    let mut sink = SubmissionWriter::new(Vec::new()).unwrap();

    let mut seen = Vec::new();
    runner
        .run_with_progress(input.path(), &mut sink, |progress| {
            assert_eq!(progress.total, 4);
            seen.push((progress.index, progress.outcome.id().to_string()));
        })
        .unwrap();

    assert_eq!(
        seen,
        vec![
            (1, "a_blank".to_string()),
            (2, "b_paper".to_string()),
            (3, "broken".to_string()),
            (4, "report".to_string()),
        ]
    );
    assert_eq!(sink.rows(), 2);
}
