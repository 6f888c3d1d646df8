//! Integration tests: the full load → transform → write pipeline

mod common;

use common::{content_opf, sample_epub, write_epub, CONTAINER_XML, SIZED_XHTML};
use epub_imgfix::{process_batch, process_file, Container, EntryName, Error, Transform};
use pretty_assertions::assert_eq;

const BOTH: &[Transform] = &[Transform::SvgUnwrap, Transform::ResponsiveImages];

#[test]
fn test_entry_set_and_untouched_bytes_preserved() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("book.epub");
    sample_epub(&path);

    let before = Container::open(&path).unwrap();
    process_file(&path, BOTH).unwrap();
    let after = Container::open(&path).unwrap();

    let names_before: Vec<_> = before.entries().map(|e| e.name().clone()).collect();
    let names_after: Vec<_> = after.entries().map(|e| e.name().clone()).collect();
    assert_eq!(names_before, names_after);

    for name in ["mimetype", "OEBPS/Styles/style.css", "OEBPS/Images/p001.jpg"] {
        let name = EntryName::new(name).unwrap();
        assert_eq!(
            before.entry(&name).unwrap().data(),
            after.entry(&name).unwrap().data(),
            "non-document entry '{}' must be unchanged",
            name
        );
    }
}

#[test]
fn test_svg_wrapper_rewritten_to_plain_img() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("book.epub");
    sample_epub(&path);

    let report = process_file(&path, &[Transform::SvgUnwrap]).unwrap();
    assert!(report
        .rewritten
        .iter()
        .any(|n| n.as_str() == "OEBPS/Text/illust.xhtml"));

    let after = Container::open(&path).unwrap();
    let name = EntryName::new("OEBPS/Text/illust.xhtml").unwrap();
    let doc = after.entry(&name).unwrap().data_as_str().unwrap();

    assert!(doc.contains(r#"<img src="../Images/p001.jpg" alt="Page one"/>"#));
    assert!(!doc.contains("<svg"));
    assert!(!doc.contains("<figure"));
    // Declaration preserved
    assert!(doc.starts_with(r#"<?xml version="1.0" encoding="utf-8"?>"#));
}

#[test]
fn test_resize_strips_sizes_and_injects_one_style() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("book.epub");
    sample_epub(&path);

    process_file(&path, &[Transform::ResponsiveImages]).unwrap();

    let after = Container::open(&path).unwrap();
    let name = EntryName::new("OEBPS/Text/sized.xhtml").unwrap();
    let doc = after.entry(&name).unwrap().data_as_str().unwrap();

    assert!(doc.contains(r#"<img src="../Images/p001.jpg"/>"#));
    assert!(!doc.contains("width=\"600\""));
    assert!(!doc.contains("height=\"800\""));
    assert_eq!(doc.matches("<style").count(), 1);
    assert!(doc.contains("max-width: 100%"));
}

#[test]
fn test_resize_twice_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("book.epub");
    sample_epub(&path);

    process_file(&path, &[Transform::ResponsiveImages]).unwrap();
    let once = std::fs::read(&path).unwrap();

    let report = process_file(&path, &[Transform::ResponsiveImages]).unwrap();
    let twice = std::fs::read(&path).unwrap();

    assert!(report.rewritten.is_empty());
    assert_eq!(once, twice);
}

#[test]
fn test_missing_input_is_not_found_and_creates_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.epub");

    let err = process_file(&path, BOTH).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    assert!(!path.exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_malformed_document_skipped_and_preserved() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("book.epub");

    let broken = b"<html><body><p>never closed</body></html>";
    let opf = content_opf(&[
        ("good.xhtml", "application/xhtml+xml"),
        ("broken.xhtml", "application/xhtml+xml"),
    ]);
    write_epub(
        &path,
        &[
            ("mimetype", b"application/epub+zip"),
            ("META-INF/container.xml", CONTAINER_XML.as_bytes()),
            ("OEBPS/content.opf", opf.as_bytes()),
            ("OEBPS/good.xhtml", SIZED_XHTML.as_bytes()),
            ("OEBPS/broken.xhtml", broken),
        ],
    );

    let report = process_file(&path, &[Transform::ResponsiveImages]).unwrap();

    assert_eq!(report.rewritten.len(), 1);
    assert_eq!(report.rewritten[0].as_str(), "OEBPS/good.xhtml");
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].name.as_str(), "OEBPS/broken.xhtml");

    let after = Container::open(&path).unwrap();
    let broken_name = EntryName::new("OEBPS/broken.xhtml").unwrap();
    assert_eq!(after.entry(&broken_name).unwrap().data(), broken);

    let good_name = EntryName::new("OEBPS/good.xhtml").unwrap();
    let good = after.entry(&good_name).unwrap().data_as_str().unwrap();
    assert!(!good.contains("width=\"600\""));
}

#[test]
fn test_binary_garbage_document_reported_as_such() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("book.epub");

    let garbage: &[u8] = &[0x3C, 0x68, 0x74, 0x6D, 0x6C, 0xFF, 0xFE, 0x3E];
    let opf = content_opf(&[("binary.xhtml", "application/xhtml+xml")]);
    write_epub(
        &path,
        &[
            ("mimetype", b"application/epub+zip"),
            ("META-INF/container.xml", CONTAINER_XML.as_bytes()),
            ("OEBPS/content.opf", opf.as_bytes()),
            ("OEBPS/binary.xhtml", garbage),
        ],
    );

    let report = process_file(&path, BOTH).unwrap();

    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].name.as_str(), "OEBPS/binary.xhtml");
    assert!(
        report.skipped[0].reason.starts_with("not valid UTF-8"),
        "reason was: {}",
        report.skipped[0].reason
    );

    let after = Container::open(&path).unwrap();
    let name = EntryName::new("OEBPS/binary.xhtml").unwrap();
    assert_eq!(after.entry(&name).unwrap().data(), garbage);
}

#[test]
fn test_corrupt_archive_left_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("not-an-epub.epub");
    std::fs::write(&path, b"garbage bytes").unwrap();

    let err = process_file(&path, BOTH).unwrap_err();
    assert!(matches!(err, Error::CorruptArchive(_)));
    assert_eq!(std::fs::read(&path).unwrap(), b"garbage bytes");
}

#[test]
fn test_batch_continues_past_failures() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.epub");
    let bad = dir.path().join("bad.epub");
    sample_epub(&good);
    std::fs::write(&bad, b"garbage").unwrap();

    let outcomes = process_batch([bad.clone(), good.clone()], BOTH);

    assert_eq!(outcomes.len(), 2);
    assert!(outcomes[0].result.is_err());
    let report = outcomes[1].result.as_ref().unwrap();
    assert_eq!(report.rewritten.len(), 2);
}

#[test]
fn test_mimetype_written_first_and_stored() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("book.epub");
    sample_epub(&path);

    process_file(&path, BOTH).unwrap();

    let file = std::fs::File::open(&path).unwrap();
    let mut zip = zip::ZipArchive::new(file).unwrap();
    let first = zip.by_index(0).unwrap();
    assert_eq!(first.name(), "mimetype");
    assert_eq!(first.compression(), zip::CompressionMethod::Stored);
}
