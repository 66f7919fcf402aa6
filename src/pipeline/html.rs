//! HTML paragraph mode.
//!
//! Only `<p>` elements are transcribed. Everything between paragraphs is copied
//! through byte for byte, and each paragraph is written twice: first a copy
//! whose text runs are replaced by their IPA, then the original paragraph with
//! its entities decoded.
//!
//! Before paragraphs are located, whole regions that never hold body text are
//! removed: `script`, `style`, `head`, `noscript`, `svg`, `nav` and `footer`
//! elements, plus any element whose open tag carries a denylisted attribute
//! (`id="secondary"` and `id="actionbar"` by default). Both removals track
//! nesting depth, so a nested `<div>` inside a removed `<div>` does not end the
//! removal early.

use std::borrow::Cow;
use std::fs;
use std::ops::Range;
use std::path::Path;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::config::{AttributeRule, TranscriptionConfig};
use crate::error::Result;
use crate::text::normalize;

use super::checkpoint::{CheckpointStore, HtmlCheckpoint};
use super::output::OutputSink;
use super::plain::resumable_length;
use super::transcriber::Transcriber;

/// Elements removed together with their content.
pub const SKIP_TAGS: [&str; 7] = ["script", "style", "head", "noscript", "svg", "nav", "footer"];

lazy_static! {
    /// Any open or close tag; group 1 is `/` for a close tag, group 2 the name.
    static ref RE_TAG: Regex = Regex::new(r"<(/?)([A-Za-z][A-Za-z0-9-]*)\b[^>]*>").unwrap();

    /// Any markup between `<` and `>`.
    static ref RE_MARKUP: Regex = Regex::new(r"<[^>]*>").unwrap();

    static ref RE_PARAGRAPH: Regex = Regex::new(r"(?is)(<p\b[^>]*>)(.*?)(</p>)").unwrap();

    static ref RE_SKIP_OPEN: Regex = Regex::new(&format!(
        r"(?i)<({})\b[^>]*>",
        SKIP_TAGS.join("|")
    ))
    .unwrap();

    /// Named, decimal and hexadecimal character references.
    static ref RE_ENTITY: Regex =
        Regex::new(r"&(?:#[0-9]+|#[xX][0-9A-Fa-f]+|[A-Za-z][A-Za-z0-9]*);").unwrap();
}

/// End offset of the element whose open tag ends at `from`.
///
/// Counts same-name open and close tags. If the element is never closed, the
/// removal stops after the last same-name tag seen.
fn element_end(content: &str, from: usize, name: &str) -> usize {
    let mut depth = 1usize;
    let mut end = from;
    for caps in RE_TAG.captures_iter(&content[from..]) {
        if !caps[2].eq_ignore_ascii_case(name) {
            continue;
        }
        let tag = &caps[0];
        if &caps[1] == "/" {
            depth -= 1;
        } else if tag.ends_with("/>") {
            continue;
        } else {
            depth += 1;
        }
        end = from + caps.get(0).map_or(0, |m| m.end());
        if depth == 0 {
            break;
        }
    }
    end
}

/// Remove every element whose open tag matches `open` (group 1 is the name).
fn remove_elements(content: &str, open: &Regex) -> String {
    let mut content = content.to_string();
    loop {
        let found = open.captures(&content).and_then(|caps| {
            let whole = caps.get(0)?;
            let name = caps.get(1)?.as_str().to_string();
            Some((whole.range(), whole.as_str().ends_with("/>"), name))
        });
        let Some((tag, self_closing, name)) = found else {
            break;
        };
        let end = if self_closing {
            tag.end
        } else {
            element_end(&content, tag.end, &name)
        };
        content.replace_range(tag.start..end, "");
    }
    content
}

/// Remove `script`, `style`, `head` and the other [`SKIP_TAGS`] elements.
pub fn strip_skipped_elements(content: &str) -> String {
    remove_elements(content, &RE_SKIP_OPEN)
}

fn attribute_pattern(rule: &AttributeRule) -> Option<Regex> {
    let pattern = format!(
        r#"(?i)<([A-Za-z][A-Za-z0-9-]*)\b[^>]*\b{}\s*=\s*["']{}["'][^>]*>"#,
        regex::escape(&rule.name),
        regex::escape(&rule.value)
    );
    match Regex::new(&pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            log::warn!("Ignoring attribute rule {}={}: {}", rule.name, rule.value, e);
            None
        },
    }
}

/// Remove elements whose open tag carries any of the denylisted attributes.
pub fn strip_elements_by_attribute(content: &str, rules: &[AttributeRule]) -> String {
    rules
        .iter()
        .filter_map(attribute_pattern)
        .fold(content.to_string(), |content, re| remove_elements(&content, &re))
}

/// Decode character references and fold typographic characters.
///
/// References that are not recognised are left as written.
///
/// ```
/// use spoken_ipa::pipeline::html::decode_html_text;
///
/// assert_eq!(decode_html_text("Fish &amp; chips&nbsp;&ndash; &#8230;"), "Fish & chips - ...");
/// assert_eq!(decode_html_text("&bogus; & more"), "&bogus; & more");
/// ```
pub fn decode_html_text(text: &str) -> String {
    let decoded = RE_ENTITY.replace_all(text, |caps: &Captures| {
        match quick_xml::escape::unescape(&caps[0]) {
            Ok(value) => value.into_owned(),
            Err(_) => caps[0].to_string(),
        }
    });
    decoded
        .replace('\u{00A0}', " ")
        .replace('\u{2013}', "-")
        .replace('\u{2026}', "...")
}

/// Decode the text between tags, leaving the tags alone.
pub fn decode_text_nodes(html: &str) -> String {
    split_markup(html)
        .into_iter()
        .map(|run| match run {
            Run::Markup(tag) => Cow::Borrowed(tag),
            Run::Text(text) => Cow::Owned(decode_html_text(text)),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Run<'a> {
    Markup(&'a str),
    Text(&'a str),
}

/// Split `html` into alternating markup and text runs, skipping empty text.
fn split_markup(html: &str) -> Vec<Run<'_>> {
    let mut runs = Vec::new();
    let mut last = 0;
    for tag in RE_MARKUP.find_iter(html) {
        if tag.start() > last {
            runs.push(Run::Text(&html[last..tag.start()]));
        }
        runs.push(Run::Markup(tag.as_str()));
        last = tag.end();
    }
    if last < html.len() {
        runs.push(Run::Text(&html[last..]));
    }
    runs
}

fn has_alphabetic(text: &str) -> bool {
    text.chars().any(char::is_alphabetic)
}

/// One run of a paragraph, ready for reassembly.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    /// Written unchanged in both copies.
    Fixed(String),
    /// Replaced by the transcription of `normalized` in the IPA copy.
    Spoken { decoded: String, normalized: String },
}

/// A paragraph split into what is kept and what is transcribed.
#[derive(Debug, Clone)]
struct PreparedParagraph<'a> {
    open: &'a str,
    close: &'a str,
    decoded_inner: String,
    /// `None` when the paragraph has no words and is copied through.
    pieces: Option<Vec<Piece>>,
}

impl<'a> PreparedParagraph<'a> {
    fn new(open: &'a str, inner: &'a str, close: &'a str) -> Self {
        let decoded_inner = decode_text_nodes(inner);
        let plain = decode_html_text(&RE_MARKUP.replace_all(inner, ""));
        if !has_alphabetic(plain.trim()) {
            return Self {
                open,
                close,
                decoded_inner,
                pieces: None,
            };
        }

        let pieces = split_markup(inner)
            .into_iter()
            .map(|run| match run {
                Run::Markup(tag) => Piece::Fixed(tag.to_string()),
                Run::Text(text) => {
                    let decoded = decode_html_text(text);
                    if has_alphabetic(&decoded) {
                        let normalized = normalize(&decoded);
                        Piece::Spoken { decoded, normalized }
                    } else {
                        Piece::Fixed(decoded)
                    }
                },
            })
            .collect();

        Self {
            open,
            close,
            decoded_inner,
            pieces: Some(pieces),
        }
    }

    /// Texts to send for transcription, in order.
    fn units(&self) -> impl Iterator<Item = &str> {
        self.pieces.iter().flatten().filter_map(|piece| match piece {
            Piece::Spoken { normalized, .. } => Some(normalized.as_str()),
            Piece::Fixed(_) => None,
        })
    }

    /// IPA copy followed by the decoded original. Consumes one result per unit.
    fn assemble(&self, results: &mut impl Iterator<Item = String>) -> String {
        let original = format!("{}{}{}", self.open, self.decoded_inner, self.close);
        let Some(pieces) = &self.pieces else {
            return original;
        };

        let mut ipa_inner = String::new();
        for piece in pieces {
            match piece {
                Piece::Fixed(text) => ipa_inner.push_str(text),
                Piece::Spoken { decoded, .. } => {
                    let ipa = results.next().unwrap_or_default();
                    let body = decoded.trim();
                    let start = decoded.len() - decoded.trim_start().len();
                    let leading = &decoded[..start];
                    let trailing = &decoded[start + body.len()..];
                    ipa_inner.push_str(leading);
                    ipa_inner.push_str(ipa.trim());
                    ipa_inner.push_str(trailing);
                },
            }
        }
        format!("{}{}{}\n{}", self.open, ipa_inner, self.close, original)
    }
}

/// Location of one `<p>` element in the prepared document.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ParagraphSpan {
    whole: Range<usize>,
    open: Range<usize>,
    inner: Range<usize>,
    close: Range<usize>,
}

fn find_paragraphs(content: &str) -> Vec<ParagraphSpan> {
    RE_PARAGRAPH
        .captures_iter(content)
        .filter_map(|caps| {
            Some(ParagraphSpan {
                whole: caps.get(0)?.range(),
                open: caps.get(1)?.range(),
                inner: caps.get(2)?.range(),
                close: caps.get(3)?.range(),
            })
        })
        .collect()
}

/// Apply both removal passes to a raw document.
pub fn prepare_document(raw: &str, skip_attributes: &[AttributeRule]) -> String {
    strip_elements_by_attribute(&strip_skipped_elements(raw), skip_attributes)
}

/// An HTML transcription in progress.
///
/// Each [`step`](Self::step) transcribes and writes one batch of paragraphs
/// and checkpoints it; the final step writes whatever follows the last
/// paragraph.
pub struct HtmlJob<'a> {
    transcriber: &'a Transcriber,
    content: String,
    paragraphs: Vec<ParagraphSpan>,
    next: usize,
    prev_end: usize,
    sink: OutputSink,
    store: Option<CheckpointStore>,
    batch_size: usize,
    progress_every: usize,
    done: bool,
}

impl<'a> HtmlJob<'a> {
    /// Create a job over an already prepared document (see
    /// [`prepare_document`]).
    pub fn new(
        transcriber: &'a Transcriber,
        content: String,
        sink: OutputSink,
        config: &TranscriptionConfig,
    ) -> Self {
        let paragraphs = find_paragraphs(&content);
        let progress_every = (paragraphs.len() / 100).max(1);
        Self {
            transcriber,
            content,
            paragraphs,
            next: 0,
            prev_end: 0,
            sink,
            store: None,
            batch_size: config.batch_size.max(1),
            progress_every,
            done: false,
        }
    }

    /// Write a checkpoint to `store` after every batch.
    pub fn with_checkpoints(mut self, store: CheckpointStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Skip the paragraphs a checkpoint says are already written.
    ///
    /// The sink must already be positioned at `checkpoint.output_bytes`.
    pub fn resume_from(mut self, checkpoint: &HtmlCheckpoint) -> Self {
        self.next = checkpoint.paragraphs_processed.min(self.paragraphs.len());
        self.prev_end = match self.next {
            0 => 0,
            n => self.paragraphs[n - 1].whole.end,
        };
        self
    }

    /// Number of paragraphs in the document.
    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }

    /// Process one batch. Returns `false` once the document is complete.
    pub fn step(&mut self) -> Result<bool> {
        if self.done {
            return Ok(false);
        }
        if self.next >= self.paragraphs.len() {
            self.sink.write_str(&self.content[self.prev_end..])?;
            self.sink.flush()?;
            self.done = true;
            return Ok(false);
        }

        let end = (self.next + self.batch_size).min(self.paragraphs.len());
        let content = self.content.as_str();
        let prepared: Vec<PreparedParagraph> = self.paragraphs[self.next..end]
            .iter()
            .map(|span| {
                PreparedParagraph::new(
                    &content[span.open.clone()],
                    &content[span.inner.clone()],
                    &content[span.close.clone()],
                )
            })
            .collect();
        let units: Vec<String> = prepared
            .iter()
            .flat_map(|p| p.units().map(str::to_string))
            .collect();
        let mut results = self.transcriber.transcribe_all(&units).into_iter();

        for (offset, paragraph) in prepared.iter().enumerate() {
            let index = self.next + offset;
            let span = &self.paragraphs[index];
            self.sink.write_str(&content[self.prev_end..span.whole.start])?;
            self.sink.write_str(&paragraph.assemble(&mut results))?;
            self.prev_end = span.whole.end;
            if (index + 1) % self.progress_every == 0 {
                log::info!("paragraph {} / {}", index + 1, self.paragraphs.len());
            }
        }
        self.sink.flush()?;
        self.next = end;

        if let Some(store) = &self.store {
            store.save(&HtmlCheckpoint {
                paragraphs_processed: end,
                output_bytes: self.sink.position(),
            })?;
        }
        Ok(true)
    }

    /// Process the remaining paragraphs and the document tail.
    pub fn run(mut self) -> Result<()> {
        while self.step()? {}
        Ok(())
    }
}

/// Transcribe the HTML file at `input`, writing to `output` or standard
/// output.
///
/// Resuming follows the same rules as plain mode: the output is cut back to
/// the checkpointed length and the run continues after the checkpointed
/// paragraph.
pub fn transcribe_html(
    transcriber: &Transcriber,
    input: &Path,
    output: Option<&Path>,
    config: &TranscriptionConfig,
) -> Result<()> {
    let raw = fs::read_to_string(input)?;
    let content = prepare_document(&raw, &config.skip_attributes);

    let Some(output) = output else {
        return HtmlJob::new(transcriber, content, OutputSink::stdout(), config).run();
    };

    let store = CheckpointStore::for_output(output);
    let checkpoint = if config.resume {
        store.load::<HtmlCheckpoint>()
    } else {
        HtmlCheckpoint::default()
    };

    let job = match resumable_length(output, checkpoint.output_bytes) {
        Some(offset) if checkpoint.paragraphs_processed > 0 => {
            let job = HtmlJob::new(transcriber, content, OutputSink::resume(output, offset)?, config);
            log::info!(
                "Resuming HTML from paragraph {} / {}",
                checkpoint.paragraphs_processed,
                job.paragraph_count()
            );
            job.resume_from(&checkpoint)
        },
        _ => {
            if checkpoint.paragraphs_processed > 0 {
                log::warn!(
                    "Output {} is shorter than its checkpoint, starting over",
                    output.display()
                );
            }
            HtmlJob::new(transcriber, content, OutputSink::create(output)?, config)
        },
    };

    job.with_checkpoints(store.clone()).run()?;
    store.remove()
}
