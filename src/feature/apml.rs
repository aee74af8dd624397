//! Streaming reader for APML feature lists.
//!
//! The expected layout is:
//!
//! ```text
//! <...>
//!   <LC_MS_RUN number_of_features="2" tr_min="10.0" tr_max="60.0"
//!              m_z_min="400.0" m_z_max="1600.0">
//!     <LC_MS_FEATURES>
//!       <MS1_FEATURE Tr="12.34" m_z="500.10">
//!         <LC_INFO AREA="750"/>
//!       </MS1_FEATURE>
//!       ...
//!     </LC_MS_FEATURES>
//!   </LC_MS_RUN>
//! </...>
//! ```
//!
//! Only the first `LC_MS_RUN` is read. `LC_INFO` is taken from the direct
//! children of each `MS1_FEATURE`.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, warn};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::{sample_name, Feature, FeatureError, FeatureList, RunBounds, SourceFormat};
use crate::quantize::Decimal;

/// Default input buffer size for APML parsing (64KB)
pub const DEFAULT_INPUT_BUFFER_SIZE: usize = 64 * 1024;

/// Read an APML file; the sample name is the file stem
pub fn read_apml<P: AsRef<Path>>(path: P) -> Result<FeatureList, FeatureError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let reader = BufReader::with_capacity(DEFAULT_INPUT_BUFFER_SIZE, file);
    ApmlReader::new(reader).read(&sample_name(path))
}

/// Pull parser over an APML document
pub struct ApmlReader<R: BufRead> {
    reader: Reader<R>,
}

impl<R: BufRead> ApmlReader<R> {
    /// Create a reader over any buffered source
    pub fn new(reader: R) -> Self {
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.config_mut().trim_text(true);
        Self { reader: xml_reader }
    }

    /// Parse the whole document into a feature list named `name`
    pub fn read(mut self, name: &str) -> Result<FeatureList, FeatureError> {
        let mut state = ParseState::default();
        let mut buf = Vec::new();

        loop {
            match self.reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    state.open(e)?;
                    state.depth += 1;
                }
                Ok(Event::Empty(ref e)) => {
                    state.open(e)?;
                    state.close(e.name().as_ref())?;
                }
                Ok(Event::End(ref e)) => {
                    state.depth = state.depth.saturating_sub(1);
                    state.close(e.name().as_ref())?;
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(FeatureError::XmlError(e)),
                _ => {}
            }
            buf.clear();
        }

        state.finish(name)
    }
}

#[derive(Debug)]
struct RunHeader {
    declared_count: usize,
    bounds: RunBounds,
}

#[derive(Debug)]
struct PendingFeature {
    depth: usize,
    retention_time: Decimal,
    mz: Decimal,
    area: Option<f64>,
}

#[derive(Debug, Default)]
struct ParseState {
    depth: usize,
    header: Option<RunHeader>,
    in_run: bool,
    saw_feature_list: bool,
    in_feature_list: bool,
    pending: Option<PendingFeature>,
    features: Vec<Feature>,
}

impl ParseState {
    /// Handle an opening (or self-closing) tag at the current depth
    fn open(&mut self, e: &BytesStart) -> Result<(), FeatureError> {
        match e.name().as_ref() {
            b"LC_MS_RUN" => {
                if self.header.is_some() {
                    warn!("Ignoring additional LC_MS_RUN element");
                    return Ok(());
                }
                self.header = Some(parse_run_header(e)?);
                self.in_run = true;
            }
            b"LC_MS_FEATURES" if self.in_run => {
                self.saw_feature_list = true;
                self.in_feature_list = true;
            }
            b"MS1_FEATURE" if self.in_feature_list && self.pending.is_none() => {
                self.pending = Some(PendingFeature {
                    depth: self.depth,
                    retention_time: required_decimal(e, "MS1_FEATURE", "Tr")?,
                    mz: required_decimal(e, "MS1_FEATURE", "m_z")?,
                    area: None,
                });
            }
            b"LC_INFO" => {
                if let Some(pending) = self.pending.as_mut() {
                    if pending.area.is_none() && self.depth == pending.depth + 1 {
                        pending.area = Some(required_intensity(e)?);
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Handle a closing tag; `self.depth` already points at the closed element
    fn close(&mut self, name: &[u8]) -> Result<(), FeatureError> {
        match name {
            b"MS1_FEATURE" => {
                if self.pending.as_ref().map(|p| p.depth) != Some(self.depth) {
                    return Ok(());
                }
                if let Some(pending) = self.pending.take() {
                    let area = pending.area.ok_or_else(|| {
                        FeatureError::MissingAttribute("MS1_FEATURE/LC_INFO/@AREA".to_string())
                    })?;
                    self.features
                        .push(Feature::new(pending.retention_time, pending.mz, area));
                }
            }
            b"LC_MS_FEATURES" => self.in_feature_list = false,
            b"LC_MS_RUN" => self.in_run = false,
            _ => {}
        }
        Ok(())
    }

    fn finish(self, name: &str) -> Result<FeatureList, FeatureError> {
        let header = self
            .header
            .ok_or_else(|| FeatureError::Format("missing LC_MS_RUN element".to_string()))?;
        if !self.saw_feature_list {
            return Err(FeatureError::Format(
                "missing LC_MS_FEATURES element".to_string(),
            ));
        }
        if header.declared_count != self.features.len() {
            warn!(
                "{}: header declares {} features but {} were read",
                name,
                header.declared_count,
                self.features.len()
            );
        }
        debug!("{}: read {} features", name, self.features.len());

        Ok(FeatureList {
            name: name.to_string(),
            bounds: header.bounds,
            features: self.features,
            declared_count: Some(header.declared_count),
            format: SourceFormat::Apml,
        })
    }
}

fn parse_run_header(e: &BytesStart) -> Result<RunHeader, FeatureError> {
    let count_text = get_attribute(e, "number_of_features")?.ok_or_else(|| {
        FeatureError::MissingAttribute("LC_MS_RUN/@number_of_features".to_string())
    })?;
    let declared_count = count_text
        .trim()
        .parse()
        .map_err(|_| FeatureError::parse("LC_MS_RUN/@number_of_features", count_text.as_str()))?;

    Ok(RunHeader {
        declared_count,
        bounds: RunBounds::new(
            required_decimal(e, "LC_MS_RUN", "tr_min")?,
            required_decimal(e, "LC_MS_RUN", "tr_max")?,
            required_decimal(e, "LC_MS_RUN", "m_z_min")?,
            required_decimal(e, "LC_MS_RUN", "m_z_max")?,
        ),
    })
}

fn required_decimal(e: &BytesStart, element: &str, name: &str) -> Result<Decimal, FeatureError> {
    let field = format!("{element}/@{name}");
    let text = get_attribute(e, name)?.ok_or_else(|| FeatureError::MissingAttribute(field.clone()))?;
    text.parse().map_err(|_| FeatureError::parse(field, text))
}

fn required_intensity(e: &BytesStart) -> Result<f64, FeatureError> {
    const FIELD: &str = "LC_INFO/@AREA";
    let text = get_attribute(e, "AREA")?
        .ok_or_else(|| FeatureError::MissingAttribute(FIELD.to_string()))?;
    match text.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
        _ => Err(FeatureError::parse(FIELD, text)),
    }
}

/// Get an attribute value by name
fn get_attribute(e: &BytesStart, name: &str) -> Result<Option<String>, FeatureError> {
    for attr in e.attributes() {
        let attr = attr.map_err(|e| FeatureError::XmlError(quick_xml::Error::from(e)))?;
        if attr.key.as_ref() == name.as_bytes() {
            let value = std::str::from_utf8(&attr.value)?.to_string();
            return Ok(Some(value));
        }
    }
    Ok(None)
}
