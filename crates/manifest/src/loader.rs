//! Feeding parsed records into the engine.

use std::path::Path;

use harbor::{
    DockId, EngineConfig, HarborError, JobId, PersonId, PortId, ShipId, World, WorldBuilder,
};
use tracing::Instrument;

use crate::record::{parse_line, Record};
use crate::{LoadReport, ManifestError};

/// A running world together with the report of how it was loaded.
#[derive(Debug)]
pub struct Loaded {
    pub world: World,
    pub report: LoadReport,
}

/// Applies every line of `text` to `builder`.
///
/// Bad lines are recorded in the returned report and skipped; loading
/// always reaches the end of the text. The builder is left open so callers
/// can add more before [`WorldBuilder::finish`].
pub fn populate(builder: &mut WorldBuilder, text: &str) -> LoadReport {
    let mut report = LoadReport::default();
    for (number, raw) in text.lines().enumerate() {
        let line = number + 1;
        report.lines = line;
        let record = match parse_line(line, raw) {
            Ok(Some(record)) => record,
            Ok(None) => continue,
            Err(err) => {
                report.record_error(&err);
                continue;
            }
        };
        let keyword = record.keyword();
        match apply(builder, record) {
            Ok(()) => {
                tracing::trace!(line, keyword, "record loaded");
                report.records += 1;
            }
            Err(source) => report.record_error(&ManifestError::Reference { line, source }),
        }
    }
    report
}

fn apply(builder: &mut WorldBuilder, record: Record) -> Result<(), HarborError> {
    match record {
        Record::Port { name, index } => {
            builder.add_port(PortId::new(index), name)?;
        }
        Record::Dock { name, index, port } => {
            builder.add_dock(DockId::new(index), name, PortId::new(port))?;
        }
        Record::Ship {
            name,
            index,
            parent,
            kind,
            dimensions,
        } => {
            builder.add_ship(ShipId::new(index), name, parent, kind, dimensions)?;
        }
        Record::Person {
            name,
            index,
            port,
            skill,
        } => {
            builder.add_person(PersonId::new(index), name, PortId::new(port), skill)?;
        }
        Record::Job {
            name,
            index,
            ship,
            duration,
            requirements,
        } => {
            builder.add_job(JobId::new(index), name, ShipId::new(ship), duration, requirements)?;
        }
    }
    Ok(())
}

/// Builds and starts a world from description text.
///
/// Must be called inside a tokio runtime; job tasks start immediately.
pub fn load_str(
    name: impl Into<String>,
    text: &str,
    config: EngineConfig,
) -> Result<Loaded, ManifestError> {
    let mut builder = WorldBuilder::new(name, config)?;
    let report = populate(&mut builder, text);
    let world = builder.finish();
    tracing::info!(
        world = %world.id(),
        lines = report.lines,
        records = report.records,
        malformed = report.malformed,
        rejected = report.rejected,
        "world description loaded"
    );
    Ok(Loaded { world, report })
}

/// Reads `path` and loads it with [`load_str`]. The world is named after the
/// file stem.
pub async fn load_file(path: impl AsRef<Path>, config: EngineConfig) -> Result<Loaded, ManifestError> {
    let path = path.as_ref();
    let span = tracing::info_span!("load", path = %path.display());
    async {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ManifestError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "world".to_owned());
        load_str(name, &text, config)
    }
    .instrument(span)
    .await
}
