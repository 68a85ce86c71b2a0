//! Integration tests for docx-pages.
//!
//! Documents are built in memory as real ZIP containers, so these run
//! without fixtures, fonts or network access. Rendering uses `BlockFont`.

use docx_pages::{
    BlockFont, ConversionConfig, ConversionMode, ConversionProgressCallback, ConversionResponse,
    Converter, DocPagesError, ImageFormat,
};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use zip::write::SimpleFileOptions;

// ── Test helpers ─────────────────────────────────────────────────────────────

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// A minimal but well-formed .docx with one run per paragraph.
fn docx(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| {
            if p.is_empty() {
                "<w:p/>".to_string()
            } else {
                format!("<w:p><w:r><w:t xml:space=\"preserve\">{p}</w:t></w:r></w:p>")
            }
        })
        .collect();
    docx_from_body(&body)
}

fn docx_from_body(body: &str) -> Vec<u8> {
    let xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <w:document xmlns:w=\"{W_NS}\"><w:body>{body}<w:sectPr/></w:body></w:document>"
    );
    docx_with_main_part(&xml)
}

/// A container whose `word/document.xml` holds exactly `xml`.
fn docx_with_main_part(xml: &str) -> Vec<u8> {
    let content_types = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
        <Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
        <Override PartName=\"/word/document.xml\" \
        ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml\"/>\
        </Types>";

    let mut zip = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    zip.start_file("[Content_Types].xml", options).unwrap();
    zip.write_all(content_types.as_bytes()).unwrap();
    zip.start_file("word/document.xml", options).unwrap();
    zip.write_all(xml.as_bytes()).unwrap();
    zip.finish().unwrap().into_inner()
}

/// Converter whose pages hold exactly `capacity` lines.
fn converter(capacity: u32, wrap_width: usize) -> Converter {
    let config = ConversionConfig::builder()
        .page_size(200, 20 + capacity * 10)
        .padding(10)
        .line_spacing(10)
        .wrap_width(wrap_width)
        .image_format(ImageFormat::Png)
        .build()
        .unwrap();
    Converter::new(config, Arc::new(BlockFont::new(6.0)))
}

fn page_lines(output: &docx_pages::ConversionOutput) -> Vec<Vec<String>> {
    output
        .pages
        .iter()
        .map(|p| p.layout.lines.iter().map(|l| l.text.clone()).collect())
        .collect()
}

// ── Text mode ────────────────────────────────────────────────────────────────

#[test]
fn text_mode_joins_non_blank_paragraphs() {
    let c = converter(34, 60);
    let text = c.convert_text_blocking(&docx(&["Hello", "", "World"])).unwrap();
    assert_eq!(text, "Hello\nWorld");
}

#[test]
fn text_mode_concatenates_runs_and_skips_tables() {
    let body = "<w:p><w:r><w:t>Hel</w:t></w:r><w:r><w:t>lo</w:t></w:r></w:p>\
                <w:tbl><w:tr><w:tc><w:p><w:r><w:t>cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>\
                <w:p><w:r><w:t xml:space=\"preserve\">a </w:t></w:r><w:r><w:t>b</w:t></w:r></w:p>";
    let text = converter(34, 60)
        .convert_text_blocking(&docx_from_body(body))
        .unwrap();
    assert_eq!(text, "Hello\na b");
}

#[tokio::test]
async fn text_mode_async_response_shape() {
    let response = converter(34, 60)
        .run(ConversionMode::Text, docx(&["Hello", "", "World"]))
        .await
        .unwrap();
    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value, serde_json::json!({ "mode": "text", "text": "Hello\nWorld" }));
}

#[tokio::test]
async fn text_mode_needs_no_font() {
    let bytes = docx(&["Hello", "", "World"]);
    assert_eq!(
        docx_pages::text_from_bytes_blocking(&bytes).unwrap(),
        "Hello\nWorld"
    );
    assert_eq!(
        docx_pages::text_from_bytes(bytes.clone()).await.unwrap(),
        converter(34, 60).convert_text(bytes).await.unwrap()
    );
    assert!(matches!(
        docx_pages::text_from_bytes(b"garbage".to_vec()).await,
        Err(DocPagesError::DocumentParse { .. })
    ));
}

#[test]
fn text_mode_from_plain_thread() {
    let c = converter(34, 60);
    let text = tokio_test::block_on(c.convert_text(docx(&["tab\there", "x"]))).unwrap();
    assert_eq!(text, "tab\there\nx");
}

// ── Errors ───────────────────────────────────────────────────────────────────

#[test]
fn malformed_input_is_a_parse_error() {
    let c = converter(3, 10);
    for bytes in [
        b"".to_vec(),
        b"%PDF-1.7 not a word file".to_vec(),
        b"PK\x03\x04 truncated".to_vec(),
        docx_with_main_part(&format!(
            "<w:document xmlns:w=\"{W_NS}\"><w:body><w:p><w:r><w:t>Hello wor"
        )),
    ] {
        let err = c.convert_pages_blocking(&bytes).unwrap_err();
        assert!(
            matches!(err, DocPagesError::DocumentParse { .. }),
            "unexpected error: {err}"
        );
        assert!(err.is_client_error());

        let err = c.convert_text_blocking(&bytes).unwrap_err();
        assert!(matches!(err, DocPagesError::DocumentParse { .. }));
    }
}

#[test]
fn zip_without_main_part_is_a_parse_error() {
    let mut zip = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    zip.start_file("hello.txt", SimpleFileOptions::default())
        .unwrap();
    zip.write_all(b"hi").unwrap();
    let bytes = zip.finish().unwrap().into_inner();

    let err = converter(3, 10).convert_text_blocking(&bytes).unwrap_err();
    assert!(err.to_string().contains("word/document.xml"), "got: {err}");
}

#[tokio::test]
async fn async_pipeline_reports_parse_error() {
    let err = converter(3, 10)
        .convert_pages(b"not a docx".to_vec())
        .await
        .unwrap_err();
    assert!(matches!(err, DocPagesError::DocumentParse { .. }));
}

// ── Image mode ───────────────────────────────────────────────────────────────

#[test]
fn seven_lines_at_capacity_three_give_three_two_pages_and_one() {
    let c = converter(3, 60);
    let paragraphs = ["l1", "l2", "l3", "l4", "l5", "l6", "l7"];
    let output = c.convert_pages_blocking(&docx(&paragraphs)).unwrap();

    let sizes: Vec<usize> = page_lines(&output).iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![3, 3, 1]);
    assert_eq!(output.stats.lines_per_page, 3);

    let numbers: Vec<usize> = output.pages.iter().map(|p| p.page_num).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
}

#[test]
fn wrapped_lines_respect_width_and_are_conserved() {
    let width = 12;
    let paragraphs = [
        "The quick brown fox jumps over the lazy dog",
        "",
        "Pack my box with five dozen liquor jugs",
        "supercalifragilisticexpialidocious is long",
        "short",
    ];
    let c = converter(4, width);
    let output = c.convert_pages_blocking(&docx(&paragraphs)).unwrap();
    let pages = page_lines(&output);

    for line in pages.iter().flatten() {
        assert!(line.chars().count() <= width, "line too long: {line:?}");
    }

    // Every page but the last is full.
    for page in &pages[..pages.len() - 1] {
        assert_eq!(page.len(), 4);
    }

    // Concatenating pages gives back the word stream in order.
    let flattened: Vec<String> = pages.concat();
    assert_eq!(flattened.len(), output.stats.wrapped_lines);
    let words: Vec<String> = flattened
        .iter()
        .flat_map(|l| l.split_whitespace())
        .map(str::to_string)
        .collect();
    // Long words come back hard-broken into width-sized pieces.
    let expected: Vec<String> = paragraphs
        .iter()
        .flat_map(|p| p.split_whitespace())
        .flat_map(|w| {
            let chars: Vec<char> = w.chars().collect();
            chars
                .chunks(width)
                .map(|c| c.iter().collect::<String>())
                .collect::<Vec<_>>()
        })
        .collect();
    assert_eq!(words, expected);
}

#[test]
fn empty_document_yields_zero_pages() {
    let output = converter(3, 10)
        .convert_pages_blocking(&docx(&["", "   ", ""]))
        .unwrap();
    assert!(output.pages.is_empty());
    assert_eq!(output.into_pages_response().pages.len(), 0);
}

#[test]
fn rendered_pages_decode_at_configured_size() {
    let output = converter(3, 20)
        .convert_pages_blocking(&docx(&["alpha", "beta"]))
        .unwrap();
    let page = &output.pages[0];
    assert_eq!(page.file_name, "page-1.png");
    let decoded = image::load_from_memory(&page.bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (200, 50));
}

#[test]
fn layout_is_deterministic_across_runs() {
    let bytes = docx(&["one two three four five", "six seven", "eight"]);
    let c = converter(2, 9);
    let a = c.convert_pages_blocking(&bytes).unwrap();
    let b = c.convert_pages_blocking(&bytes).unwrap();

    let layouts_a: Vec<_> = a.pages.iter().map(|p| p.layout.clone()).collect();
    let layouts_b: Vec<_> = b.pages.iter().map(|p| p.layout.clone()).collect();
    assert_eq!(layouts_a, layouts_b);
    let bytes_a: Vec<_> = a.pages.iter().map(|p| p.bytes.clone()).collect();
    let bytes_b: Vec<_> = b.pages.iter().map(|p| p.bytes.clone()).collect();
    assert_eq!(bytes_a, bytes_b);
}

#[test]
fn line_coordinates_follow_padding_and_spacing() {
    let output = converter(3, 60)
        .convert_pages_blocking(&docx(&["a", "b", "c", "d"]))
        .unwrap();
    let coords: Vec<(i32, i32)> = output.pages[1]
        .layout
        .lines
        .iter()
        .map(|l| (l.x, l.y))
        .collect();
    // Second page restarts at the top padding.
    assert_eq!(coords, vec![(10, 10)]);
    let first: Vec<i32> = output.pages[0].layout.lines.iter().map(|l| l.y).collect();
    assert_eq!(first, vec![10, 20, 30]);
}

#[tokio::test]
async fn async_and_blocking_pipelines_agree() {
    let bytes = docx(&[
        "Lorem ipsum dolor sit amet consectetur",
        "adipiscing elit sed do eiusmod",
        "tempor incididunt ut labore",
    ]);
    let config = ConversionConfig::builder()
        .page_size(200, 50)
        .padding(10)
        .line_spacing(10)
        .wrap_width(10)
        .image_format(ImageFormat::Png)
        .render_concurrency(3)
        .build()
        .unwrap();
    let c = Converter::new(config, Arc::new(BlockFont::new(6.0)));

    let blocking = c.convert_pages_blocking(&bytes).unwrap();
    let concurrent = c.convert_pages(bytes).await.unwrap();

    assert!(concurrent.pages.len() > 1);
    assert_eq!(page_lines(&blocking), page_lines(&concurrent));
    assert_eq!(blocking.to_pages_response(), concurrent.to_pages_response());
}

#[tokio::test]
async fn run_images_returns_pages_response() {
    let response = converter(3, 60)
        .run(ConversionMode::Images, docx(&["a", "b", "c", "d"]))
        .await
        .unwrap();
    match response {
        ConversionResponse::Pages(pages) => {
            let names: Vec<&str> = pages.pages.iter().map(|p| p.file_name.as_str()).collect();
            assert_eq!(names, vec!["page-1.png", "page-2.png"]);
            assert!(pages.pages.iter().all(|p| p.mime == "image/png"));
        }
        other => panic!("expected pages, got {other:?}"),
    }
}

// ── Progress ─────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Counting {
    started: AtomicUsize,
    rendered: AtomicUsize,
    completed: AtomicUsize,
    order: Mutex<Vec<usize>>,
}

impl ConversionProgressCallback for Counting {
    fn on_conversion_start(&self, total_pages: usize) {
        self.started.store(total_pages, Ordering::SeqCst);
    }
    fn on_page_rendered(&self, page_num: usize, _total: usize, _bytes: usize) {
        self.rendered.fetch_add(1, Ordering::SeqCst);
        self.order.lock().unwrap().push(page_num);
    }
    fn on_conversion_complete(&self, total_pages: usize) {
        self.completed.store(total_pages, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn progress_callback_sees_every_page() {
    let counting = Arc::new(Counting::default());
    let config = ConversionConfig::builder()
        .page_size(200, 40)
        .padding(10)
        .line_spacing(10)
        .image_format(ImageFormat::Png)
        .render_concurrency(3)
        .progress_callback(counting.clone())
        .build()
        .unwrap();
    let c = Converter::new(config, Arc::new(BlockFont::new(6.0)));

    // Capacity 2, five lines → 3 pages.
    let output = c
        .convert_pages(docx(&["a", "b", "c", "d", "e"]))
        .await
        .unwrap();

    assert_eq!(output.pages.len(), 3);
    assert_eq!(counting.started.load(Ordering::SeqCst), 3);
    assert_eq!(counting.rendered.load(Ordering::SeqCst), 3);
    assert_eq!(counting.completed.load(Ordering::SeqCst), 3);
    // Pages render concurrently, but events still arrive in page order.
    assert_eq!(*counting.order.lock().unwrap(), vec![1, 2, 3]);
}

// ── Output ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn write_pages_and_convert_input_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.docx");
    std::fs::write(&input, docx(&["a", "b", "c", "d"])).unwrap();

    let c = converter(3, 60);
    let response = c
        .convert_input(input.to_str().unwrap(), ConversionMode::Text)
        .await
        .unwrap();
    assert_eq!(
        response,
        ConversionResponse::Text(docx_pages::TextResponse::new("a\nb\nc\nd".into()))
    );

    let bytes = std::fs::read(&input).unwrap();
    let output = c.convert_pages(bytes).await.unwrap();
    let out_dir = dir.path().join("pages");
    let written = docx_pages::write_pages(&output, &out_dir).await.unwrap();
    assert_eq!(written, vec![out_dir.join("page-1.png"), out_dir.join("page-2.png")]);
    for path in &written {
        let decoded = image::open(path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (200, 50));
    }
}
