//! Benchmarks for docweave loading and resolution.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use docweave::{Document, StyleKind, TableGrid};
use std::io::Cursor;

/// Creates a synthetic DOCX with `paragraph_count` list paragraphs, a style
/// chain `depth` levels deep, and one table of `paragraph_count / 10` rows.
fn create_test_docx(paragraph_count: usize, depth: usize) -> Vec<u8> {
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    let mut buffer = Vec::new();
    let mut zip = ZipWriter::new(Cursor::new(&mut buffer));

    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

    zip.start_file("[Content_Types].xml", options).unwrap();
    zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
  <Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
  <Override PartName="/word/numbering.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml"/>
</Types>"#,
    )
    .unwrap();

    zip.start_file("_rels/.rels", options).unwrap();
    zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#,
    )
    .unwrap();

    zip.start_file("word/_rels/document.xml.rels", options).unwrap();
    zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering" Target="numbering.xml"/>
</Relationships>"#,
    )
    .unwrap();

    // Style chain: Level0 <- Level1 <- ... <- Level{depth-1}
    let mut styles = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:docDefaults><w:rPrDefault><w:rPr><w:sz w:val="22"/></w:rPr></w:rPrDefault></w:docDefaults>"#,
    );
    for level in 0..depth {
        let based_on = if level == 0 {
            String::new()
        } else {
            format!(r#"<w:basedOn w:val="Level{}"/>"#, level - 1)
        };
        styles.push_str(&format!(
            r#"
  <w:style w:type="paragraph" w:styleId="Level{level}">{based_on}<w:rPr><w:sz w:val="{}"/></w:rPr></w:style>"#,
            20 + level * 2
        ));
    }
    styles.push_str("\n</w:styles>");
    zip.start_file("word/styles.xml", options).unwrap();
    zip.write_all(styles.as_bytes()).unwrap();

    zip.start_file("word/numbering.xml", options).unwrap();
    zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:abstractNum w:abstractNumId="0">
    <w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="upperRoman"/><w:lvlText w:val="%1."/></w:lvl>
    <w:lvl w:ilvl="1"><w:start w:val="1"/><w:numFmt w:val="lowerLetter"/><w:lvlText w:val="%1.%2"/></w:lvl>
  </w:abstractNum>
  <w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num>
</w:numbering>"#,
    )
    .unwrap();

    let mut content = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>"#,
    );
    for i in 0..paragraph_count {
        content.push_str(&format!(
            r#"
    <w:p><w:pPr><w:pStyle w:val="Level{}"/><w:numPr><w:ilvl w:val="{}"/><w:numId w:val="1"/></w:numPr></w:pPr>
      <w:r><w:t>This is paragraph {} with some test content for benchmarking purposes.</w:t></w:r>
    </w:p>"#,
            i % depth.max(1),
            i % 2,
            i
        ));
    }
    content.push_str("\n    <w:tbl><w:tblGrid><w:gridCol/><w:gridCol/><w:gridCol/></w:tblGrid>");
    for row in 0..(paragraph_count / 10).max(1) {
        let merge = if row % 2 == 0 {
            r#"<w:vMerge w:val="restart"/>"#
        } else {
            "<w:vMerge/>"
        };
        content.push_str(&format!(
            r#"<w:tr><w:tc><w:tcPr><w:gridSpan w:val="2"/></w:tcPr><w:p/></w:tc><w:tc><w:tcPr>{}</w:tcPr><w:p/></w:tc></w:tr>"#,
            merge
        ));
    }
    content.push_str("</w:tbl>\n  </w:body>\n</w:document>");

    zip.start_file("word/document.xml", options).unwrap();
    zip.write_all(content.as_bytes()).unwrap();

    zip.finish().unwrap();
    buffer
}

/// Benchmark package loading at various sizes.
fn bench_open(c: &mut Criterion) {
    let mut group = c.benchmark_group("open");

    for para_count in [10, 100, 500, 1000].iter() {
        let data = create_test_docx(*para_count, 8);
        let size = data.len() as u64;

        group.throughput(Throughput::Bytes(size));
        group.bench_with_input(
            BenchmarkId::new("paragraphs", para_count),
            &data,
            |b, data| {
                b.iter(|| {
                    let _ = Document::from_bytes(black_box(data.clone()));
                });
            },
        );
    }

    group.finish();
}

/// Benchmark based-on chain resolution, cold cache.
fn bench_style_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("style_resolution");

    for depth in [2, 8, 32].iter() {
        let data = create_test_docx(10, *depth);
        let document = Document::from_bytes(data).unwrap();
        let leaf = format!("Level{}", depth - 1);

        group.bench_with_input(BenchmarkId::new("depth", depth), &leaf, |b, leaf| {
            b.iter(|| {
                document.styles().clear_cache();
                let _ = document.resolve_style(black_box(leaf), StyleKind::Paragraph);
            });
        });
    }

    group.finish();
}

/// Benchmark list marker generation for every list paragraph.
fn bench_numbering(c: &mut Criterion) {
    let mut group = c.benchmark_group("numbering");

    for para_count in [100, 1000].iter() {
        let data = create_test_docx(*para_count, 4);
        let document = Document::from_bytes(data).unwrap();
        let refs: Vec<_> = document
            .body()
            .unwrap()
            .paragraphs()
            .iter()
            .filter_map(|p| p.numbering())
            .collect();

        group.bench_with_input(BenchmarkId::new("paragraphs", para_count), &refs, |b, refs| {
            b.iter(|| {
                document.numbering().reset();
                for r in refs {
                    let _ = document.text_for(black_box(r.num_id), r.level);
                }
            });
        });
    }

    group.finish();
}

/// Benchmark merged-cell geometry of the synthetic table.
fn bench_table_geometry(c: &mut Criterion) {
    let data = create_test_docx(1000, 4);
    let document = Document::from_bytes(data).unwrap();
    let tables = document.tables().unwrap();

    c.bench_function("table_geometry", |b| {
        b.iter(|| {
            let grid = TableGrid::from_table(black_box(&tables[0]));
            black_box(grid.layout());
        });
    });
}

criterion_group!(
    benches,
    bench_open,
    bench_style_resolution,
    bench_numbering,
    bench_table_geometry,
);
criterion_main!(benches);
