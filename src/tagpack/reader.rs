//! YAML reader for TagPack documents
//!
//! Builds a [`FieldValue`] tree from parser events so that scalar style is
//! still known when a scalar is resolved: only plain scalars are resolved to
//! null, bool, numbers or timestamps. Quoted scalars always stay text.
//!
//! Resolution mixes YAML versions: null, bool and numbers follow the YAML 1.2
//! core schema (`yes`, `on`, `0777` and `1_000` stay text or decimal), while
//! timestamps follow the YAML 1.1 grammar. Merge keys (`<<`) from YAML 1.1 are
//! honored.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use yaml_rust2::parser::{Event, EventReceiver, Parser, Tag};
use yaml_rust2::scanner::TScalarStyle;

use super::errors::{TagPackError, TagPackResult};
use super::value::{FieldMap, FieldValue};

/// Plain key that merges a mapping (or list of mappings) into its parent
const MERGE_KEY: &str = "<<";

static INT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-+]?[0-9]+$").expect("valid regex"));

static FLOAT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[-+]?(\.[0-9]+|[0-9]+(\.[0-9]*)?)([eE][-+]?[0-9]+)?$").expect("valid regex")
});

static DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})$").expect("valid regex"));

static TIMESTAMP_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^([0-9]{4})-([0-9]{1,2})-([0-9]{1,2})",
        r"(?:[Tt]|[ \t]+)([0-9]{1,2}):([0-9]{2}):([0-9]{2})(?:\.([0-9]*))?",
        r"(?:[ \t]*(Z|([-+])([0-9]{1,2})(?::?([0-9]{2}))?))?$",
    ))
    .expect("valid regex")
});

/// Parses the first YAML document in `source`.
///
/// An empty stream yields [`FieldValue::Null`].
pub fn parse_document(source: &str) -> TagPackResult<FieldValue> {
    let mut builder = TreeBuilder::default();
    let mut parser = Parser::new_from_str(source);
    parser
        .load(&mut builder, false)
        .map_err(|e| TagPackError::Parse(e.to_string()))?;
    builder.finish()
}

enum PendingKey {
    Field(String),
    Merge,
}

enum Frame {
    Sequence {
        anchor: usize,
        items: Vec<FieldValue>,
    },
    Mapping {
        anchor: usize,
        entries: FieldMap,
        pending_key: Option<PendingKey>,
    },
}

#[derive(Default)]
struct TreeBuilder {
    stack: Vec<Frame>,
    anchors: HashMap<usize, FieldValue>,
    root: Option<FieldValue>,
    error: Option<TagPackError>,
}

impl TreeBuilder {
    fn finish(self) -> TagPackResult<FieldValue> {
        if let Some(err) = self.error {
            return Err(err);
        }
        Ok(self.root.unwrap_or(FieldValue::Null))
    }

    fn push_value(&mut self, value: FieldValue, anchor: usize) {
        if anchor > 0 {
            self.anchors.insert(anchor, value.clone());
        }
        match self.stack.last_mut() {
            Some(Frame::Sequence { items, .. }) => items.push(value),
            Some(Frame::Mapping {
                entries,
                pending_key,
                ..
            }) => match pending_key.take() {
                Some(PendingKey::Field(key)) => {
                    entries.insert(key, value);
                }
                Some(PendingKey::Merge) => {
                    if let Err(e) = merge_into(entries, value) {
                        self.error.get_or_insert(e);
                    }
                }
                None => match mapping_key(&value) {
                    Some(key) => *pending_key = Some(PendingKey::Field(key)),
                    None => {
                        self.error.get_or_insert_with(|| {
                            TagPackError::Parse(format!(
                                "unsupported mapping key of type {}",
                                value.type_name()
                            ))
                        });
                    }
                },
            },
            None => {
                if self.root.is_none() {
                    self.root = Some(value);
                }
            }
        }
    }

    /// Marks the next value of the current mapping as a merge source.
    ///
    /// Returns false unless a mapping is waiting for a key.
    fn begin_merge(&mut self) -> bool {
        match self.stack.last_mut() {
            Some(Frame::Mapping {
                pending_key: pending_key @ None,
                ..
            }) => {
                *pending_key = Some(PendingKey::Merge);
                true
            }
            _ => false,
        }
    }
}

/// Copies merged entries into `entries` without overriding existing keys.
///
/// In a list of mappings, earlier mappings take precedence.
fn merge_into(entries: &mut FieldMap, value: FieldValue) -> TagPackResult<()> {
    let sources = match value {
        FieldValue::Map(map) => vec![map],
        FieldValue::List(items) => items
            .into_iter()
            .map(|item| match item {
                FieldValue::Map(map) => Ok(map),
                other => Err(merge_error(&other)),
            })
            .collect::<TagPackResult<Vec<_>>>()?,
        other => return Err(merge_error(&other)),
    };
    for source in sources {
        for (key, value) in source {
            entries.entry(key).or_insert(value);
        }
    }
    Ok(())
}

fn merge_error(value: &FieldValue) -> TagPackError {
    TagPackError::Parse(format!(
        "merge key expects a mapping or a list of mappings, got {}",
        value.type_name()
    ))
}

impl EventReceiver for TreeBuilder {
    fn on_event(&mut self, ev: Event) {
        match ev {
            Event::Scalar(text, style, anchor, tag) => {
                if style == TScalarStyle::Plain
                    && tag.is_none()
                    && text == MERGE_KEY
                    && self.begin_merge()
                {
                    return;
                }
                let value = resolve_scalar(text, style, tag.as_ref());
                self.push_value(value, anchor);
            }
            Event::SequenceStart(anchor, ..) => self.stack.push(Frame::Sequence {
                anchor,
                items: Vec::new(),
            }),
            Event::MappingStart(anchor, ..) => self.stack.push(Frame::Mapping {
                anchor,
                entries: FieldMap::new(),
                pending_key: None,
            }),
            Event::SequenceEnd | Event::MappingEnd => {
                let (value, anchor) = match self.stack.pop() {
                    Some(Frame::Sequence { anchor, items }) => (FieldValue::List(items), anchor),
                    Some(Frame::Mapping {
                        anchor, entries, ..
                    }) => (FieldValue::Map(entries), anchor),
                    None => return,
                };
                self.push_value(value, anchor);
            }
            Event::Alias(id) => {
                let value = self.anchors.get(&id).cloned().unwrap_or(FieldValue::Null);
                self.push_value(value, 0);
            }
            _ => {}
        }
    }
}

/// Mapping keys are kept as strings; scalar keys are stringified.
fn mapping_key(value: &FieldValue) -> Option<String> {
    match value {
        FieldValue::Map(_) | FieldValue::List(_) => None,
        FieldValue::Null => Some(String::new()),
        other => Some(other.to_string()),
    }
}

fn resolve_scalar(text: String, style: TScalarStyle, tag: Option<&Tag>) -> FieldValue {
    if let Some(tag) = tag {
        match tag.suffix.as_str() {
            "str" => return FieldValue::Text(text),
            "timestamp" => return parse_timestamp(&text).unwrap_or(FieldValue::Text(text)),
            _ => {}
        }
    }
    if style != TScalarStyle::Plain {
        return FieldValue::Text(text);
    }
    resolve_plain(text)
}

/// Resolves a plain scalar the way a YAML loader with timestamp support does.
pub(crate) fn resolve_plain(text: String) -> FieldValue {
    match text.as_str() {
        "" | "~" | "null" | "Null" | "NULL" => return FieldValue::Null,
        "true" | "True" | "TRUE" => return FieldValue::Bool(true),
        "false" | "False" | "FALSE" => return FieldValue::Bool(false),
        ".inf" | "+.inf" | ".Inf" | "+.Inf" | ".INF" | "+.INF" => {
            return FieldValue::Float(f64::INFINITY)
        }
        "-.inf" | "-.Inf" | "-.INF" => return FieldValue::Float(f64::NEG_INFINITY),
        ".nan" | ".NaN" | ".NAN" => return FieldValue::Float(f64::NAN),
        _ => {}
    }

    if INT_PATTERN.is_match(&text) {
        if let Ok(i) = text.parse::<i64>() {
            return FieldValue::Int(i);
        }
    }
    if let Some(hex) = text.strip_prefix("0x") {
        if let Ok(i) = i64::from_str_radix(hex, 16) {
            return FieldValue::Int(i);
        }
    }
    if let Some(oct) = text.strip_prefix("0o") {
        if let Ok(i) = i64::from_str_radix(oct, 8) {
            return FieldValue::Int(i);
        }
    }
    if FLOAT_PATTERN.is_match(&text) {
        if let Ok(x) = text.parse::<f64>() {
            return FieldValue::Float(x);
        }
    }
    if let Some(ts) = parse_timestamp(&text) {
        return ts;
    }
    FieldValue::Text(text)
}

fn parse_timestamp(text: &str) -> Option<FieldValue> {
    if let Some(caps) = DATE_PATTERN.captures(text) {
        let date = NaiveDate::from_ymd_opt(
            caps[1].parse().ok()?,
            caps[2].parse().ok()?,
            caps[3].parse().ok()?,
        )?;
        return Some(FieldValue::Date(date));
    }

    let caps = TIMESTAMP_PATTERN.captures(text)?;
    let date = NaiveDate::from_ymd_opt(
        caps[1].parse().ok()?,
        caps[2].parse().ok()?,
        caps[3].parse().ok()?,
    )?;
    let nanos = match caps.get(7) {
        Some(frac) if !frac.as_str().is_empty() => {
            let digits: String = frac.as_str().chars().take(9).collect();
            let scale = 10u32.pow(9 - digits.len() as u32);
            digits.parse::<u32>().ok()? * scale
        }
        _ => 0,
    };
    let time = NaiveTime::from_hms_nano_opt(
        caps[4].parse().ok()?,
        caps[5].parse().ok()?,
        caps[6].parse().ok()?,
        nanos,
    )?;
    let naive = date.and_time(time);

    let utc: DateTime<Utc> = match (caps.get(8), caps.get(9)) {
        (Some(_), Some(sign)) => {
            let hours: i32 = caps[10].parse().ok()?;
            let minutes: i32 = caps.get(11).map_or(Ok(0), |m| m.as_str().parse()).ok()?;
            let mut offset = hours * 3600 + minutes * 60;
            if sign.as_str() == "-" {
                offset = -offset;
            }
            FixedOffset::east_opt(offset)?
                .from_local_datetime(&naive)
                .single()?
                .with_timezone(&Utc)
        }
        _ => naive.and_utc(),
    };
    Some(FieldValue::DateTime(utc))
}
