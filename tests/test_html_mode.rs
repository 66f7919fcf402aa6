//! Tests for HTML paragraph transcription.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use spoken_ipa::config::TranscriptionConfig;
use spoken_ipa::pipeline::html::prepare_document;
use spoken_ipa::pipeline::{
    transcribe_html, CheckpointStore, HtmlCheckpoint, HtmlJob, OutputSink, Transcriber,
};
use spoken_ipa::tagger::HeuristicTagger;
use tempfile::tempdir;

fn shout(text: &str) -> String {
    format!("{}\n", text.trim().to_uppercase())
}

fn transcriber(config: &TranscriptionConfig) -> Transcriber {
    Transcriber::new(Box::new(shout), Box::new(HeuristicTagger::new()), config)
}

fn run(html: &str, config: &TranscriptionConfig) -> String {
    let dir = tempdir().unwrap();
    let input = dir.path().join("page.html");
    let output = dir.path().join("page.ipa.html");
    fs::write(&input, html).unwrap();
    transcribe_html(&transcriber(config), &input, Some(&output), config).unwrap();
    fs::read_to_string(&output).unwrap()
}

const PAGE: &str = "<html><head><title>X</title></head><body>\n\
<h1>Title</h1>\n\
<div id=\"secondary\"><div><p>Hidden.</p></div></div>\n\
<p>Fish &amp; chips.</p>\n\
<p></p>\n\
</body></html>";

mod document {
    use super::*;

    #[test]
    fn test_page_output() {
        let out = run(PAGE, &TranscriptionConfig::default());
        assert_eq!(
            out,
            "<html><body>\n\
             <h1>Title</h1>\n\
             \n\
             <p>FISH & CHIPS.</p>\n<p>Fish & chips.</p>\n\
             <p></p>\n\
             </body></html>"
        );
    }

    #[test]
    fn test_denylisted_region_removed_at_any_depth() {
        let html = "<div id=\"actionbar\"><div><div><p>Deep.</p></div></div><p>Shallow.</p></div>\
                    <p>Visible.</p>";
        let out = run(html, &TranscriptionConfig::default());
        assert!(!out.contains("Deep"));
        assert!(!out.contains("Shallow"));
        assert_eq!(out, "<p>VISIBLE.</p>\n<p>Visible.</p>");
    }

    #[test]
    fn test_no_paragraphs_copied_through() {
        let html = "<body><h1>Only a heading</h1><span>and a span</span></body>";
        assert_eq!(run(html, &TranscriptionConfig::default()), html);
    }

    #[test]
    fn test_malformed_html_copied_through() {
        let html = "<p unclosed paragraph <b>bold";
        assert_eq!(run(html, &TranscriptionConfig::default()), html);
    }

    #[test]
    fn test_inline_markup_preserved_in_ipa_copy() {
        let html = "<p class=\"body\">Say <em>hello</em> now.</p>";
        assert_eq!(
            run(html, &TranscriptionConfig::default()),
            "<p class=\"body\">SAY <em>HELLO</em> NOW.</p>\n<p class=\"body\">Say <em>hello</em> now.</p>"
        );
    }

    #[test]
    fn test_numeric_paragraph_not_transcribed() {
        let html = "<p>1984 &ndash; 2001</p>";
        assert_eq!(run(html, &TranscriptionConfig::default()), "<p>1984 - 2001</p>");
    }

    #[test]
    fn test_custom_attribute_rules() {
        let html = "<aside class=\"ad\"><p>Buy.</p></aside><p>Read.</p>";
        let config = TranscriptionConfig::default()
            .with_skip_attributes(vec![spoken_ipa::config::AttributeRule::new("class", "ad")]);
        assert_eq!(run(html, &config), "<p>READ.</p>\n<p>Read.</p>");
    }
}

mod resume {
    use super::*;

    fn long_page() -> String {
        let mut html = String::from("<html><body>\n");
        for i in 0..7 {
            html.push_str(&format!("<div class=\"c\"><p>Paragraph number {}.</p></div>\n", i));
        }
        html.push_str("</body></html>\n");
        html
    }

    #[test]
    fn test_resume_after_first_batch_is_byte_identical() {
        let dir = tempdir().unwrap();
        let config = TranscriptionConfig::default().with_batch_size(3);
        let input = dir.path().join("page.html");
        fs::write(&input, long_page()).unwrap();

        let reference = dir.path().join("reference.html");
        transcribe_html(&transcriber(&config), &input, Some(&reference), &config).unwrap();

        let output = dir.path().join("interrupted.html");
        let store = CheckpointStore::for_output(&output);
        let t = transcriber(&config);
        {
            let content = prepare_document(&long_page(), &config.skip_attributes);
            let mut job = HtmlJob::new(&t, content, OutputSink::create(&output).unwrap(), &config)
                .with_checkpoints(store.clone());
            assert_eq!(job.paragraph_count(), 7);
            assert!(job.step().unwrap());
        }
        let checkpoint: HtmlCheckpoint = store.load();
        assert_eq!(checkpoint.paragraphs_processed, 3);
        assert_eq!(checkpoint.output_bytes, fs::metadata(&output).unwrap().len());

        append_garbage(&output);
        let resumed = config.clone().with_resume(true);
        transcribe_html(&t, &input, Some(&output), &resumed).unwrap();

        assert_eq!(fs::read(&output).unwrap(), fs::read(&reference).unwrap());
        assert!(!store.path().exists());
    }

    fn append_garbage(path: &Path) {
        let mut file = OpenOptions::new().append(true).open(path).unwrap();
        file.write_all(b"<p>partial").unwrap();
    }
}
