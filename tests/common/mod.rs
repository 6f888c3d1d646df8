//! Shared helpers: build miniature EPUB files on disk for pipeline tests.

use std::io::Write;
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const CONTAINER_XML: &str = r#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#;

/// OPF with the given manifest items, hrefs relative to `OEBPS/`.
pub fn content_opf(items: &[(&str, &str)]) -> String {
    let mut manifest = String::new();
    for (i, (href, media_type)) in items.iter().enumerate() {
        manifest.push_str(&format!(
            "    <item id=\"item{}\" href=\"{}\" media-type=\"{}\"/>\n",
            i, href, media_type
        ));
    }
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0" unique-identifier="uid">
  <manifest>
{}  </manifest>
</package>"#,
        manifest
    )
}

/// Write an EPUB at `path` with the given entries, in order. The `mimetype`
/// entry is stored uncompressed, the rest deflated.
pub fn write_epub(path: &Path, entries: &[(&str, &[u8])]) {
    let file = std::fs::File::create(path).unwrap();
    let mut zip = ZipWriter::new(file);

    for (name, data) in entries {
        let options = if *name == "mimetype" {
            SimpleFileOptions::default().compression_method(CompressionMethod::Stored)
        } else {
            SimpleFileOptions::default()
        };
        zip.start_file(*name, options).unwrap();
        zip.write_all(data).unwrap();
    }

    zip.finish().unwrap();
}

/// An EPUB with one SVG-wrapped illustration page, one sized-image page,
/// a stylesheet and a fake image.
pub fn sample_epub(path: &Path) {
    let opf = content_opf(&[
        ("Text/illust.xhtml", "application/xhtml+xml"),
        ("Text/sized.xhtml", "application/xhtml+xml"),
        ("Styles/style.css", "text/css"),
        ("Images/p001.jpg", "image/jpeg"),
    ]);

    write_epub(
        path,
        &[
            ("mimetype", b"application/epub+zip"),
            ("META-INF/container.xml", CONTAINER_XML.as_bytes()),
            ("OEBPS/content.opf", opf.as_bytes()),
            ("OEBPS/Text/illust.xhtml", ILLUST_XHTML.as_bytes()),
            ("OEBPS/Text/sized.xhtml", SIZED_XHTML.as_bytes()),
            ("OEBPS/Styles/style.css", b"body { margin: 0; }"),
            ("OEBPS/Images/p001.jpg", JPEG_BYTES),
        ],
    );
}

pub const ILLUST_XHTML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<html xmlns="http://www.w3.org/1999/xhtml"><head><title>illust</title></head><body><figure class="illust"><svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 800 1200"><image xlink:href="../Images/p001.jpg" alt="Page one" width="800" height="1200"/></svg></figure></body></html>"#;

pub const SIZED_XHTML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<html xmlns="http://www.w3.org/1999/xhtml"><head><title>sized</title></head><body><img src="../Images/p001.jpg" width="600" height="800"/></body></html>"#;

pub const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0xFF, 0xD9];
