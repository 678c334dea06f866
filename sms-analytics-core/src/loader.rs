//! Export loader
//!
//! Reads the XML written by "SMS Backup & Restore":
//!
//! ```xml
//! <smses count="2">
//!   <sms date="1394460300000" type="1" contact_name="Peter Phan" ... />
//!   <sms date="1394461200000" type="2" contact_name="Peter Phan" ... />
//! </smses>
//! ```
//!
//! Every direct child of the root element is a record and must carry
//! `date` (milliseconds since the epoch), `type` and `contact_name`.
//! Deeper elements (MMS parts, address lists) are ignored.

use crate::error::{Error, Result};
use crate::types::{Direction, MessageRecord};
use chrono::DateTime;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::path::Path;

/// Load all records from an export file.
pub fn load(path: impl AsRef<Path>) -> Result<Vec<MessageRecord>> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| Error::Input {
        path: path.to_path_buf(),
        source,
    })?;

    let content = String::from_utf8(bytes).map_err(|e| Error::Parse {
        path: path.to_path_buf(),
        message: format!("export is not valid UTF-8: {}", e),
    })?;

    let records = parse(&content, path)?;
    tracing::info!(path = %path.display(), records = records.len(), "Loaded export");
    Ok(records)
}

/// Parse export XML already held in memory.
///
/// `origin` is only used to label errors.
pub fn parse(xml: &str, origin: &Path) -> Result<Vec<MessageRecord>> {
    parse_records(xml).map_err(|message| Error::Parse {
        path: origin.to_path_buf(),
        message,
    })
}

fn parse_records(xml: &str) -> std::result::Result<Vec<MessageRecord>, String> {
    let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut records = Vec::new();
    let mut depth = 0usize;
    let mut saw_root = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                match depth {
                    0 => open_root(&mut saw_root)?,
                    1 => records.push(parse_record(&e, records.len() + 1)?),
                    _ => {}
                }
                depth += 1;
            }
            Ok(Event::Empty(e)) => match depth {
                0 => open_root(&mut saw_root)?,
                1 => records.push(parse_record(&e, records.len() + 1)?),
                _ => {}
            },
            Ok(Event::End(_)) => depth = depth.saturating_sub(1),
            Ok(Event::Text(text))
                if depth == 0 && !text.iter().all(u8::is_ascii_whitespace) =>
            {
                return Err(format!(
                    "unexpected text outside the root element at byte {}",
                    reader.buffer_position()
                ));
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(format!(
                    "malformed XML near byte {}: {}",
                    reader.buffer_position(),
                    e
                ));
            }
        }
    }

    if !saw_root {
        return Err("document has no root element".to_string());
    }
    if depth != 0 {
        return Err("unexpected end of document: root element is not closed".to_string());
    }

    Ok(records)
}

fn open_root(saw_root: &mut bool) -> std::result::Result<(), String> {
    if *saw_root {
        return Err("document has more than one root element".to_string());
    }
    *saw_root = true;
    Ok(())
}

/// Build a record from one child element; `index` is 1-based.
fn parse_record(
    element: &BytesStart<'_>,
    index: usize,
) -> std::result::Result<MessageRecord, String> {
    let mut date = None;
    let mut type_flag = None;
    let mut contact_name = None;

    for attr in element.attributes() {
        let attr = attr.map_err(|e| format!("record {}: malformed attribute: {}", index, e))?;
        let value = attr
            .unescape_value()
            .map_err(|e| format!("record {}: bad attribute value: {}", index, e))?;
        match attr.key.as_ref() {
            b"date" => date = Some(value.into_owned()),
            b"type" => type_flag = Some(value.into_owned()),
            b"contact_name" => contact_name = Some(value.into_owned()),
            _ => {}
        }
    }

    let date = date.ok_or_else(|| missing(index, "date"))?;
    let type_flag = type_flag.ok_or_else(|| missing(index, "type"))?;
    let contact_name = contact_name.ok_or_else(|| missing(index, "contact_name"))?;

    let millis: i64 = date
        .trim()
        .parse()
        .map_err(|_| format!("record {}: date {:?} is not an integer", index, date))?;
    let timestamp = DateTime::from_timestamp(millis.div_euclid(1000), 0)
        .ok_or_else(|| format!("record {}: date {} is out of range", index, millis))?;

    Ok(MessageRecord::new(
        timestamp,
        Direction::from_type_flag(&type_flag),
        contact_name,
    ))
}

fn missing(index: usize, attribute: &str) -> String {
    format!(
        "record {}: missing required attribute `{}`",
        index, attribute
    )
}
