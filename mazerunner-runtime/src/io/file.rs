use mazerunner_api::algorithm::ResultLines;
use mazerunner_api::writer::ResultWriter;
use mazerunner_common::error::{MazerunnerError, MazerunnerResult};
use mazerunner_common::job::JobDescriptor;
use mazerunner_common::types::{Edge, VertexId};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use url::Url;

/// Maps a location onto the local filesystem.
///
/// `file://` URLs name absolute paths. Bare paths resolve under `root`, which stands in
/// for the default distributed filesystem. Any other scheme is unsupported.
pub fn resolve_location(root: &Path, location: &str) -> MazerunnerResult<PathBuf> {
    if !location.contains("://") {
        return Ok(root.join(location.trim_start_matches('/')));
    }
    let url = Url::parse(location)
        .map_err(|e| MazerunnerError::InvalidArgument(format!("location {location:?}: {e}")))?;
    if url.scheme() != "file" {
        return Err(MazerunnerError::Unsupported(format!(
            "{} locations need a distributed filesystem: {location}",
            url.scheme()
        )));
    }
    url.to_file_path()
        .map_err(|_| MazerunnerError::InvalidArgument(format!("bad file URL: {location}")))
}

/// Reads a whitespace separated `src dst` edge list. Lines starting with `#` are skipped;
/// extra columns are ignored.
pub fn read_edge_list(path: impl AsRef<Path>) -> MazerunnerResult<Vec<Edge<VertexId, ()>>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(b' ')
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| MazerunnerError::Io(e.into()))?;

    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec.map_err(|e| MazerunnerError::Internal(format!("edge list read: {e}")))?;
        let mut fields = rec.iter().filter(|f| !f.is_empty());
        let Some(first) = fields.next() else {
            continue;
        };
        let src: VertexId = first
            .parse()
            .map_err(|e| MazerunnerError::InvalidArgument(format!("edge src parse: {e}")))?;
        let dst: VertexId = fields
            .next()
            .ok_or_else(|| MazerunnerError::InvalidArgument("edge target missing".to_string()))?
            .parse()
            .map_err(|e| MazerunnerError::InvalidArgument(format!("edge target parse: {e}")))?;
        out.push(Edge::new(src, dst, ()));
    }
    Ok(out)
}

/// Writes property update lists to the local filesystem, one result per line.
#[derive(Debug, Clone)]
pub struct FileResultWriter {
    root: PathBuf,
}

impl FileResultWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ResultWriter for FileResultWriter {
    fn write_update(
        &self,
        job: &JobDescriptor,
        output_path: &str,
        results: ResultLines,
    ) -> MazerunnerResult<u64> {
        let target = resolve_location(&self.root, output_path)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut out = BufWriter::new(File::create(&target)?);
        let mut written = 0u64;
        for line in results {
            out.write_all(line.as_bytes())?;
            out.write_all(b"\n")?;
            written += 1;
        }
        out.flush()?;

        info!(
            analysis = %job.analysis,
            path = %target.display(),
            lines = written,
            "property update list written"
        );
        Ok(written)
    }
}
