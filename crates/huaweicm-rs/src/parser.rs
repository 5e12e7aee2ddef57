// crates/huaweicm-rs/src/parser.rs

//! Forward-only tokenizing of one bulk-configuration XML file and the
//! per-event dispatch shared by both passes.
//!
//! Element and attribute names are matched by local name, so namespace
//! prefixes (`xsi:type`) are ignored. Character and entity references inside
//! element text arrive as separate events and are resolved into the pending
//! text. Parameter capture into the context's
//! [`ParameterMap`](crate::context::ParameterMap) is pass-independent; only
//! the `moi`/`NE`/`filefooter` actions differ between discovery and
//! extraction.

use crate::columns::{ColumnRegistry, RegistryBuilder};
use crate::context::ParseContext;
use crate::csv::escape_field;
use crate::error::CmError;
use crate::sink::TableSink;
use quick_xml::Reader;
use quick_xml::events::{BytesRef, BytesStart, Event};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub(crate) const NE_TABLE: &str = "SUBSESSION_NE";
pub(crate) const FOOTER_TABLE: &str = "filefooter";

/// Which pass is consuming the event stream, with the side of the column
/// registry that pass is allowed to touch.
pub(crate) enum PassState<'a> {
    /// Schema discovery: grows the column lists, writes no data rows.
    Discovery(&'a mut RegistryBuilder),
    /// Value extraction: reads the sealed registry, writes rows.
    Extraction(&'a ColumnRegistry),
}

/// Tokenizes `path` and dispatches every event against `ctx` and `sinks`.
///
/// `write_footer` enables the once-per-file `filefooter` side effect; the
/// driver sets it for the discovery pass, or for the extraction pass when
/// discovery was skipped.
///
/// # Errors
/// Returns [`CmError::Xml`] on unparseable XML and [`CmError::Io`] on sink
/// failures. The caller decides whether the failure is file-scoped.
pub(crate) fn parse_file<S: TableSink>(
    path: &Path,
    pass: &mut PassState<'_>,
    ctx: &mut ParseContext,
    sinks: &mut S,
    write_footer: bool,
) -> Result<(), CmError> {
    ctx.file_name = file_basename(path);

    // Opened here rather than via `Reader::from_file` so an unreadable file
    // reports as an I/O failure, not a parse failure.
    let file = File::open(path)?;
    let mut reader = Reader::from_reader(BufReader::new(file));
    let mut buf = Vec::new();
    // A value like `a &amp; b` arrives as three events (text, reference,
    // text); while this is true the segments append to the pending text
    // instead of replacing it.
    let mut text_continues = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                text_continues = false;
                handle_start(&e, ctx, sinks, write_footer)?;
            }
            Event::Empty(e) => {
                text_continues = false;
                // A self-closing element behaves like an immediately closed
                // start tag.
                handle_start(&e, ctx, sinks, write_footer)?;
                let name = e.local_name().as_ref().to_vec();
                handle_end(&name, pass, ctx, sinks)?;
            }
            Event::End(e) => {
                text_continues = false;
                handle_end(e.local_name().as_ref(), pass, ctx, sinks)?;
            }
            Event::Text(t) => {
                let text = t.xml_content().map_err(quick_xml::Error::from)?;
                if text_continues {
                    ctx.pending_text.push_str(&text);
                } else if !text.chars().all(char::is_whitespace) {
                    ctx.pending_text = text.into_owned();
                    text_continues = true;
                }
            }
            Event::CData(t) => {
                let text = reader
                    .decoder()
                    .decode(&t)
                    .map_err(quick_xml::Error::from)?;
                if text_continues {
                    ctx.pending_text.push_str(&text);
                } else if !text.chars().all(char::is_whitespace) {
                    ctx.pending_text = text.into_owned();
                    text_continues = true;
                }
            }
            Event::GeneralRef(e) => {
                if !text_continues {
                    ctx.pending_text.clear();
                    text_continues = true;
                }
                push_general_ref(&e, &mut ctx.pending_text)?;
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

/// Appends the character a `&...;` reference stands for: numeric character
/// references and the five predefined XML entities. An undeclared entity is
/// kept as its raw reference text.
fn push_general_ref(e: &BytesRef<'_>, out: &mut String) -> Result<(), CmError> {
    if let Some(ch) = e.resolve_char_ref()? {
        out.push(ch);
        return Ok(());
    }
    let name = e.decode().map_err(quick_xml::Error::from)?;
    match name.as_ref() {
        "amp" => out.push('&'),
        "lt" => out.push('<'),
        "gt" => out.push('>'),
        "quot" => out.push('"'),
        "apos" => out.push('\''),
        other => {
            out.push('&');
            out.push_str(other);
            out.push(';');
        }
    }
    Ok(())
}

fn handle_start<S: TableSink>(
    e: &BytesStart<'_>,
    ctx: &mut ParseContext,
    sinks: &mut S,
    write_footer: bool,
) -> Result<(), CmError> {
    match e.local_name().as_ref() {
        b"filefooter" => {
            if write_footer {
                let mut datetime = String::new();
                if let Some(v) = attr_by_local_name(e, b"datetime")? {
                    ctx.datetime = v.clone();
                    datetime = v;
                }
                if !sinks.has_table(FOOTER_TABLE) {
                    sinks.write_line(FOOTER_TABLE, "FileName,datetime")?;
                }
                let row = format!(
                    "{},{}",
                    escape_field(&ctx.file_name),
                    escape_field(&datetime)
                );
                sinks.write_line(FOOTER_TABLE, &row)?;
            }
        }
        b"moi" => {
            ctx.in_moi = true;
            if let Some(v) = attr_by_local_name(e, b"type")? {
                ctx.moi_type = v;
            }
        }
        // Structural wrapper around the parameter elements.
        b"attributes" => {}
        b"module" => {
            for attr in e.attributes() {
                let attr = attr?;
                match attr.key.local_name().as_ref() {
                    b"type" => ctx.module.xsi_type = attr.unescape_value()?.into_owned(),
                    b"productversion" => {
                        ctx.module.productversion = attr.unescape_value()?.into_owned()
                    }
                    b"remark" => ctx.module.remark = attr.unescape_value()?.into_owned(),
                    _ => {}
                }
            }
        }
        b"NE" => {
            // Only attributes present on this block overwrite; omitted ones
            // keep the previous sibling's value.
            for attr in e.attributes() {
                let attr = attr?;
                match attr.key.local_name().as_ref() {
                    b"type" => ctx.ne.xsi_type = attr.unescape_value()?.into_owned(),
                    b"netype" => ctx.ne.netype = attr.unescape_value()?.into_owned(),
                    b"neversion" => ctx.ne.neversion = attr.unescape_value()?.into_owned(),
                    b"neid" => ctx.ne.neid = attr.unescape_value()?.into_owned(),
                    _ => {}
                }
            }
        }
        _ => {}
    }
    Ok(())
}

fn handle_end<S: TableSink>(
    name: &[u8],
    pass: &mut PassState<'_>,
    ctx: &mut ParseContext,
    sinks: &mut S,
) -> Result<(), CmError> {
    match name {
        b"NE" => {
            if let PassState::Extraction(_) = pass {
                if !sinks.has_table(NE_TABLE) {
                    sinks.write_line(NE_TABLE, &ctx.header_prefix())?;
                }
                sinks.write_line(NE_TABLE, &ctx.row_prefix())?;
            }
        }
        // Header and row were emitted at the start tag.
        b"filefooter" => {}
        b"moi" => {
            match pass {
                PassState::Discovery(builder) => {
                    builder.note_instance(&ctx.moi_type, ctx.params.names());
                }
                PassState::Extraction(registry) => {
                    let columns = registry.columns(&ctx.moi_type).unwrap_or(&[]);
                    if !sinks.has_table(&ctx.moi_type) {
                        let mut header = ctx.header_prefix();
                        for column in columns {
                            header.push(',');
                            header.push_str(column);
                        }
                        sinks.write_line(&ctx.moi_type, &header)?;
                    }
                    let mut row = ctx.row_prefix();
                    for column in columns {
                        row.push(',');
                        if let Some(value) = ctx.params.get(column) {
                            row.push_str(value);
                        }
                    }
                    sinks.write_line(&ctx.moi_type, &row)?;
                }
            }
            ctx.params.clear();
            ctx.in_moi = false;
        }
        b"attributes" => {}
        _ => {
            // Leaf parameter element: capture in both passes.
            if ctx.in_moi {
                let param = String::from_utf8_lossy(name);
                ctx.params.store(&param, escape_field(&ctx.pending_text));
            }
        }
    }
    Ok(())
}

fn attr_by_local_name(e: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>, CmError> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() == name {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn file_basename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
