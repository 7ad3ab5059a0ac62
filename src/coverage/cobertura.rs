//! Cobertura XML format parser

use log::debug;
use quick_xml::encoding::Decoder;
use quick_xml::escape::unescape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fmt::Display;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use super::{CoverageReport, LineRecord, ReportTotals, UnitCoverage};
use crate::error::{AnalyzeError, Result};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parse a Cobertura XML file
pub fn parse_cobertura(path: &Path) -> Result<CoverageReport> {
    let content = fs::read(path).map_err(|source| AnalyzeError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Read {} bytes from {}", content.len(), path.display());
    parse_cobertura_bytes(&content)
}

/// Parse raw Cobertura XML, honouring the `encoding` of its declaration
pub fn parse_cobertura_bytes(content: &[u8]) -> Result<CoverageReport> {
    let content = content.strip_prefix(UTF8_BOM).unwrap_or(content);
    parse_events(Reader::from_reader(content))
}

/// Parse Cobertura XML content from a string
pub fn parse_cobertura_string(content: &str) -> Result<CoverageReport> {
    parse_events(Reader::from_str(content.trim_start_matches('\u{feff}')))
}

/// The whole document is validated before anything is returned: a report is
/// either parsed completely or rejected.
fn parse_events(mut reader: Reader<&[u8]>) -> Result<CoverageReport> {
    reader.trim_text(true);

    let mut totals: Option<ReportTotals> = None;
    let mut units: Vec<UnitCoverage> = Vec::new();
    // Indices into `units` of every <class> still open, outermost first
    let mut open_classes: Vec<usize> = Vec::new();
    let mut depth = 0usize;

    let mut buf = Vec::new();

    loop {
        let position = reader.buffer_position();
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| malformed(reader.buffer_position(), e))?;
        // The declaration may switch the encoding, so look it up per event
        let decoder = reader.decoder();

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_empty = matches!(event, Event::Empty(_));

                if depth == 0 {
                    if totals.is_some() {
                        return Err(malformed(position, "more than one root element"));
                    }
                    totals = Some(read_totals(e, decoder, position)?);
                } else {
                    match e.name().as_ref() {
                        b"class" => {
                            units.push(read_unit(e, decoder, position)?);
                            if !is_empty {
                                open_classes.push(units.len() - 1);
                            }
                        }
                        b"line" => {
                            // A line belongs to every enclosing class
                            if !open_classes.is_empty() {
                                let record = read_line(e, decoder, position)?;
                                for &idx in &open_classes {
                                    units[idx].lines.push(record);
                                }
                            }
                        }
                        _ => {}
                    }
                }

                if !is_empty {
                    depth += 1;
                }
            }
            Event::End(ref e) => {
                if depth == 0 {
                    return Err(malformed(position, "closing tag without an opening tag"));
                }
                depth -= 1;
                if depth > 0 && e.name().as_ref() == b"class" {
                    open_classes.pop();
                }
            }
            Event::Text(_) | Event::CData(_) => {
                if depth == 0 {
                    return Err(malformed(position, "text outside the root element"));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if depth > 0 {
        return Err(malformed(
            reader.buffer_position(),
            format!("unexpected end of document, {} element(s) left open", depth),
        ));
    }

    let totals = totals.ok_or_else(|| malformed(0, "document has no root element"))?;

    debug!(
        "Parsed report: {} unit(s), {} declared lines, {} declared covered",
        units.len(),
        totals.lines_valid,
        totals.lines_covered
    );

    Ok(CoverageReport { totals, units })
}

fn read_totals(e: &BytesStart, decoder: Decoder, position: usize) -> Result<ReportTotals> {
    let element = decoder
        .decode(e.name().as_ref())
        .map_err(|err| malformed(position, err))?
        .into_owned();

    let mut lines_valid: Option<u64> = None;
    let mut lines_covered: Option<u64> = None;
    let mut line_rate: Option<f64> = None;

    for attr in e.attributes() {
        let attr = attr.map_err(|err| malformed(position, err))?;
        match attr.key.as_ref() {
            b"lines-valid" => {
                lines_valid = Some(parse_number(&element, "lines-valid", &decode(&attr, decoder, position)?)?);
            }
            b"lines-covered" => {
                lines_covered = Some(parse_number(&element, "lines-covered", &decode(&attr, decoder, position)?)?);
            }
            b"line-rate" => {
                line_rate = Some(parse_number(&element, "line-rate", &decode(&attr, decoder, position)?)?);
            }
            _ => {}
        }
    }

    Ok(ReportTotals {
        lines_valid: lines_valid.ok_or(AnalyzeError::MissingData { attribute: "lines-valid" })?,
        lines_covered: lines_covered.ok_or(AnalyzeError::MissingData { attribute: "lines-covered" })?,
        line_rate: line_rate.ok_or(AnalyzeError::MissingData { attribute: "line-rate" })?,
    })
}

fn read_unit(e: &BytesStart, decoder: Decoder, position: usize) -> Result<UnitCoverage> {
    let mut unit = UnitCoverage::default();

    for attr in e.attributes() {
        let attr = attr.map_err(|err| malformed(position, err))?;
        match attr.key.as_ref() {
            b"filename" => unit.filename = decode(&attr, decoder, position)?,
            b"name" => unit.name = decode(&attr, decoder, position)?,
            b"line-rate" => {
                unit.declared_rate = parse_number("class", "line-rate", &decode(&attr, decoder, position)?)?;
            }
            _ => {}
        }
    }

    Ok(unit)
}

fn read_line(e: &BytesStart, decoder: Decoder, position: usize) -> Result<LineRecord> {
    let mut record = LineRecord { hits: 0 };

    for attr in e.attributes() {
        let attr = attr.map_err(|err| malformed(position, err))?;
        if attr.key.as_ref() == b"hits" {
            record.hits = parse_number("line", "hits", &decode(&attr, decoder, position)?)?;
        }
    }

    Ok(record)
}

fn decode(attr: &Attribute, decoder: Decoder, position: usize) -> Result<String> {
    let raw = decoder
        .decode(&attr.value)
        .map_err(|err| malformed(position, err))?;
    let value = unescape(&raw).map_err(|err| malformed(position, err))?;
    Ok(value.into_owned())
}

fn parse_number<T: FromStr>(element: &str, attribute: &str, value: &str) -> Result<T> {
    value.trim().parse::<T>().map_err(|_| AnalyzeError::InvalidValue {
        element: element.to_string(),
        attribute: attribute.to_string(),
        value: value.to_string(),
    })
}

fn malformed(position: usize, message: impl Display) -> AnalyzeError {
    AnalyzeError::Parse {
        position,
        message: message.to_string(),
    }
}
