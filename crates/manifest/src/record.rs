//! Parsing one line of a world description into a [`Record`].
//!
//! Parsing is purely syntactic. Whether the indices a record names actually
//! exist is decided later by the engine's builder.

use std::str::{FromStr, SplitWhitespace};

use harbor::{JobDuration, ShipDimensions, ShipKind, SkillName};

use crate::ManifestError;

/// One object declared by a line of the description.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Port {
        name: String,
        index: u64,
    },
    Dock {
        name: String,
        index: u64,
        port: u64,
    },
    /// `parent` is a dock index or a port index.
    Ship {
        name: String,
        index: u64,
        parent: u64,
        kind: ShipKind,
        dimensions: ShipDimensions,
    },
    Person {
        name: String,
        index: u64,
        port: u64,
        skill: SkillName,
    },
    Job {
        name: String,
        index: u64,
        ship: u64,
        duration: JobDuration,
        requirements: Vec<SkillName>,
    },
}

impl Record {
    /// The record's keyword as it appears in the file.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Port { .. } => "port",
            Self::Dock { .. } => "dock",
            Self::Ship {
                kind: ShipKind::Passenger { .. },
                ..
            } => "pship",
            Self::Ship { .. } => "cship",
            Self::Person { .. } => "person",
            Self::Job { .. } => "job",
        }
    }
}

/// Parses line number `line` (1-based).
///
/// Returns `Ok(None)` for blank lines and `//` comments. Tokens after the
/// last expected field are ignored, except on `job` lines where every
/// trailing token is a required skill.
pub fn parse_line(line: usize, text: &str) -> Result<Option<Record>, ManifestError> {
    let mut tokens = text.split_whitespace();
    let Some(first) = tokens.next() else {
        return Ok(None);
    };
    if first.starts_with("//") {
        return Ok(None);
    }

    let keyword = match first {
        "port" => "port",
        "dock" => "dock",
        "pship" => "pship",
        "cship" => "cship",
        "person" => "person",
        "job" => "job",
        other => {
            return Err(ManifestError::UnknownKeyword {
                line,
                keyword: other.to_owned(),
            })
        }
    };
    let mut fields = Fields {
        line,
        keyword,
        tokens,
    };

    let name = fields.text("name")?.to_owned();
    let index = fields.number("index")?;
    let record = match keyword {
        "port" => Record::Port { name, index },
        "dock" => Record::Dock {
            name,
            index,
            port: fields.number("port")?,
        },
        "pship" | "cship" => {
            let parent = fields.number("parent")?;
            let dimensions = ShipDimensions {
                weight: fields.number("weight")?,
                length: fields.number("length")?,
                width: fields.number("width")?,
                draft: fields.number("draft")?,
            };
            let kind = if keyword == "pship" {
                ShipKind::Passenger {
                    passengers: fields.number("passengers")?,
                    rooms: fields.number("rooms")?,
                    occupied_rooms: fields.number("occupied rooms")?,
                }
            } else {
                ShipKind::Cargo {
                    cargo_weight: fields.number("cargo weight")?,
                    cargo_volume: fields.number("cargo volume")?,
                    cargo_value: fields.number("cargo value")?,
                }
            };
            Record::Ship {
                name,
                index,
                parent,
                kind,
                dimensions,
            }
        }
        "person" => Record::Person {
            name,
            index,
            port: fields.number("port")?,
            skill: fields.skill()?,
        },
        _ => {
            let ship = fields.number("ship")?;
            let duration = fields.duration()?;
            // Split tokens are never empty and never contain whitespace.
            let requirements = fields.tokens.filter_map(SkillName::new).collect();
            Record::Job {
                name,
                index,
                ship,
                duration,
                requirements,
            }
        }
    };
    Ok(Some(record))
}

// ---------------------------------------------------------------------------
// Field cursor
// ---------------------------------------------------------------------------

struct Fields<'a> {
    line: usize,
    keyword: &'static str,
    tokens: SplitWhitespace<'a>,
}

impl<'a> Fields<'a> {
    fn text(&mut self, field: &'static str) -> Result<&'a str, ManifestError> {
        self.tokens.next().ok_or(ManifestError::MissingField {
            line: self.line,
            keyword: self.keyword,
            field,
        })
    }

    fn number<T: FromStr>(&mut self, field: &'static str) -> Result<T, ManifestError> {
        let raw = self.text(field)?;
        raw.parse().map_err(|_| ManifestError::InvalidNumber {
            line: self.line,
            field,
            value: raw.to_owned(),
        })
    }

    fn skill(&mut self) -> Result<SkillName, ManifestError> {
        let raw = self.text("skill")?;
        SkillName::new(raw).ok_or(ManifestError::MissingField {
            line: self.line,
            keyword: self.keyword,
            field: "skill",
        })
    }

    fn duration(&mut self) -> Result<JobDuration, ManifestError> {
        let raw = self.text("duration")?;
        let seconds: f64 = raw.parse().map_err(|_| ManifestError::InvalidNumber {
            line: self.line,
            field: "duration",
            value: raw.to_owned(),
        })?;
        JobDuration::from_secs(seconds).ok_or(ManifestError::InvalidDuration {
            line: self.line,
            value: raw.to_owned(),
        })
    }
}
