//! Binary snapshot codec.
//!
//! All integers are little-endian `u32`:
//!
//! ```text
//! total_vertex_count
//! repeat total_vertex_count:
//!     vertex_id
//!     title_length              (Titled only)
//!     title_bytes[title_length] (Titled only, UTF-8, spaces as '_')
//!     link_count
//!     link_target_ids[link_count]
//! ```

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

use log::info;

use crate::error::{GraphError, Result};
use crate::graph::{Graph, VertexId};
use crate::title_index::TitleIndex;

/// Caps speculative allocation for a declared length; larger records still
/// load but grow incrementally, so a corrupt header cannot reserve gigabytes.
const MAX_PREALLOC: usize = 1 << 16;

/// Record layout of a snapshot file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotLayout {
    /// Each record carries the article title.
    Titled,
    /// Links only; titles are hydrated externally by id.
    LinksOnly,
}

impl FromStr for SnapshotLayout {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "titled" => Ok(SnapshotLayout::Titled),
            "links-only" | "links_only" | "lean" => Ok(SnapshotLayout::LinksOnly),
            other => Err(format!(
                "invalid snapshot layout '{}', expected 'titled' or 'links-only'",
                other
            )),
        }
    }
}

/// A fully loaded snapshot: the graph plus its title index.
///
/// Built once, read-only afterwards.
pub struct Snapshot {
    pub graph: Graph,
    pub titles: TitleIndex,
    pub layout: SnapshotLayout,
    pub load_time_ms: f64,
}

impl Snapshot {
    /// Load a snapshot file.
    pub fn load(path: impl AsRef<Path>, layout: SnapshotLayout) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let snapshot = Self::read_from(BufReader::new(file), layout)?;
        info!(
            "loaded {} in {:.1}ms: {} vertices, {} edges, density {:.2}, max id {}",
            path.display(),
            snapshot.load_time_ms,
            snapshot.graph.vertex_count(),
            snapshot.graph.edge_count(),
            snapshot.graph.density(),
            snapshot.graph.max_id()
        );
        Ok(snapshot)
    }

    /// Decode a snapshot from any byte stream.
    ///
    /// Exactly the declared number of records must be present, each must
    /// introduce a distinct vertex, and nothing may follow the last record.
    pub fn read_from<R: Read>(mut reader: R, layout: SnapshotLayout) -> Result<Self> {
        let start = Instant::now();

        let declared = read_u32(&mut reader, "vertex count")? as usize;
        let mut graph = Graph::with_capacity(declared.min(MAX_PREALLOC));
        let mut titles: Vec<(String, VertexId)> = match layout {
            SnapshotLayout::Titled => Vec::with_capacity(declared.min(MAX_PREALLOC)),
            SnapshotLayout::LinksOnly => Vec::new(),
        };

        for record in 0..declared {
            let id = read_u32(&mut reader, "vertex id")?;

            let title = match layout {
                SnapshotLayout::Titled => {
                    let len = read_u32(&mut reader, "title length")? as usize;
                    let raw = read_bytes(&mut reader, len, "title")?;
                    let title = String::from_utf8(raw).map_err(|_| {
                        GraphError::corrupt(format!("record {}: title is not valid UTF-8", record))
                    })?;
                    Some(title.replace('_', " "))
                }
                SnapshotLayout::LinksOnly => None,
            };

            let link_count = read_u32(&mut reader, "link count")? as usize;
            let mut links = Vec::with_capacity(link_count.min(MAX_PREALLOC));
            for _ in 0..link_count {
                links.push(read_u32(&mut reader, "link target")?);
            }

            if let Some(ref t) = title {
                titles.push((t.clone(), id));
            }
            graph.add_article(id, title, links);
        }

        let mut probe = [0u8; 1];
        if reader.read(&mut probe)? != 0 {
            return Err(GraphError::corrupt(format!(
                "trailing data after {} declared records",
                declared
            )));
        }

        if graph.vertex_count() != declared {
            return Err(GraphError::corrupt(format!(
                "declared {} vertices but loaded {}",
                declared,
                graph.vertex_count()
            )));
        }

        Ok(Snapshot {
            graph,
            titles: TitleIndex::new(titles),
            layout,
            load_time_ms: start.elapsed().as_secs_f64() * 1000.0,
        })
    }
}

/// Write `graph` to `path` in the given layout.
pub fn write_snapshot(path: impl AsRef<Path>, graph: &Graph, layout: SnapshotLayout) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_to(&mut writer, graph, layout)?;
    writer.flush()?;
    Ok(())
}

/// Encode `graph` into a byte stream, records in ascending id order.
///
/// Titles are stored with spaces as underscores; untitled articles get an
/// empty title in the `Titled` layout.
pub fn write_to<W: Write>(writer: &mut W, graph: &Graph, layout: SnapshotLayout) -> Result<()> {
    let count = u32::try_from(graph.vertex_count())
        .map_err(|_| GraphError::corrupt("vertex count exceeds u32"))?;
    writer.write_all(&count.to_le_bytes())?;

    for id in graph.sorted_ids() {
        writer.write_all(&id.to_le_bytes())?;

        if layout == SnapshotLayout::Titled {
            let title = graph.title(id).unwrap_or("").replace(' ', "_");
            let len = u32::try_from(title.len())
                .map_err(|_| GraphError::corrupt(format!("title of {} exceeds u32", id)))?;
            writer.write_all(&len.to_le_bytes())?;
            writer.write_all(title.as_bytes())?;
        }

        let links = graph.links(id);
        let len = u32::try_from(links.len())
            .map_err(|_| GraphError::corrupt(format!("link list of {} exceeds u32", id)))?;
        writer.write_all(&len.to_le_bytes())?;
        for link in links {
            writer.write_all(&link.to_le_bytes())?;
        }
    }

    Ok(())
}

fn read_u32<R: Read>(reader: &mut R, what: &str) -> Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf).map_err(|e| truncated(e, what))?;
    Ok(u32::from_le_bytes(buf))
}

fn read_bytes<R: Read>(reader: &mut R, len: usize, what: &str) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(len.min(MAX_PREALLOC));
    let read = reader.by_ref().take(len as u64).read_to_end(&mut buf)?;
    if read != len {
        return Err(GraphError::corrupt(format!(
            "truncated {}: expected {} bytes, found {}",
            what, len, read
        )));
    }
    Ok(buf)
}

fn truncated(e: io::Error, what: &str) -> GraphError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        GraphError::corrupt(format!("truncated {}", what))
    } else {
        GraphError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn animals() -> Graph {
        let mut g = Graph::new();
        g.add_article(1, Some("Cat".into()), vec![2]);
        g.add_article(2, Some("Dog".into()), vec![3]);
        g.add_article(3, Some("Bird".into()), vec![]);
        g
    }

    fn encode(graph: &Graph, layout: SnapshotLayout) -> Vec<u8> {
        let mut buf = Vec::new();
        write_to(&mut buf, graph, layout).unwrap();
        buf
    }

    fn u32s(values: &[u32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn test_load_file_reports_counts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        write_snapshot(&path, &animals(), SnapshotLayout::Titled).unwrap();

        let snap = Snapshot::load(&path, SnapshotLayout::Titled).unwrap();
        assert_eq!(snap.graph.vertex_count(), 3);
        assert_eq!(snap.graph.edge_count(), 2);
        assert_eq!(snap.graph.max_id(), 3);
        assert_eq!(snap.titles.len(), 3);
        assert_eq!(snap.graph.links(1), &[2]);
        assert_eq!(snap.graph.title(3), Some("Bird"));
    }

    #[test]
    fn test_hand_encoded_titled_record() {
        let mut bytes = u32s(&[1, 42, 9]);
        bytes.extend_from_slice(b"Big_Cats!");
        bytes.extend(u32s(&[3, 7, 7, 42]));

        let snap = Snapshot::read_from(bytes.as_slice(), SnapshotLayout::Titled).unwrap();
        assert_eq!(snap.graph.title(42), Some("Big Cats!"));
        assert_eq!(snap.graph.links(42), &[7, 7, 42]);
        assert_eq!(snap.titles.entries()[0], ("Big Cats!".to_string(), 42));
    }

    #[test]
    fn test_links_only_layout() {
        let bytes = u32s(&[2, 10, 1, 20, 20, 0]);
        let snap = Snapshot::read_from(bytes.as_slice(), SnapshotLayout::LinksOnly).unwrap();
        assert_eq!(snap.graph.vertex_count(), 2);
        assert_eq!(snap.graph.max_id(), 20);
        assert_eq!(snap.graph.links(10), &[20]);
        assert_eq!(snap.graph.title(10), None);
        assert!(snap.titles.is_empty());
    }

    #[test]
    fn test_written_layouts_decode() {
        let g = animals();
        let lean = encode(&g, SnapshotLayout::LinksOnly);
        let titled = encode(&g, SnapshotLayout::Titled);
        assert!(lean.len() < titled.len());

        let snap = Snapshot::read_from(lean.as_slice(), SnapshotLayout::LinksOnly).unwrap();
        assert_eq!(snap.graph.links(2), &[3]);
    }

    #[test]
    fn test_duplicate_ids_are_corrupt() {
        let bytes = u32s(&[2, 5, 0, 5, 0]);
        let err = Snapshot::read_from(bytes.as_slice(), SnapshotLayout::LinksOnly).err().unwrap();
        assert!(matches!(err, GraphError::CorruptSnapshot { .. }));
    }

    #[test]
    fn test_truncated_stream_is_corrupt() {
        let bytes = encode(&animals(), SnapshotLayout::Titled);
        for cut in [2, 6, 10, bytes.len() - 1] {
            let err = Snapshot::read_from(&bytes[..cut], SnapshotLayout::Titled).err().unwrap();
            assert!(
                matches!(err, GraphError::CorruptSnapshot { .. }),
                "cut at {} gave {:?}",
                cut,
                err
            );
        }
    }

    #[test]
    fn test_trailing_bytes_are_corrupt() {
        let mut bytes = encode(&animals(), SnapshotLayout::LinksOnly);
        bytes.push(0);
        let err = Snapshot::read_from(bytes.as_slice(), SnapshotLayout::LinksOnly).err().unwrap();
        assert!(matches!(err, GraphError::CorruptSnapshot { .. }));
    }

    #[test]
    fn test_invalid_utf8_title_is_corrupt() {
        let mut bytes = u32s(&[1, 1, 2]);
        bytes.extend_from_slice(&[0xff, 0xfe]);
        bytes.extend(u32s(&[0]));
        let err = Snapshot::read_from(bytes.as_slice(), SnapshotLayout::Titled).err().unwrap();
        assert!(matches!(err, GraphError::CorruptSnapshot { .. }));
    }

    #[test]
    fn test_huge_declared_link_count_does_not_preallocate() {
        let bytes = u32s(&[1, 1, u32::MAX]);
        let err = Snapshot::read_from(bytes.as_slice(), SnapshotLayout::LinksOnly).err().unwrap();
        assert!(matches!(err, GraphError::CorruptSnapshot { .. }));
    }

    #[test]
    fn test_empty_snapshot() {
        let bytes = u32s(&[0]);
        let snap = Snapshot::read_from(bytes.as_slice(), SnapshotLayout::Titled).unwrap();
        assert_eq!(snap.graph.vertex_count(), 0);
        assert!(snap.titles.is_empty());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Snapshot::load(dir.path().join("nope.bin"), SnapshotLayout::Titled)
            .err()
            .unwrap();
        assert!(matches!(err, GraphError::Io(_)));
    }

    #[test]
    fn test_layout_parsing() {
        assert_eq!("titled".parse::<SnapshotLayout>(), Ok(SnapshotLayout::Titled));
        assert_eq!("Links-Only".parse::<SnapshotLayout>(), Ok(SnapshotLayout::LinksOnly));
        assert_eq!(
            "csv".parse::<SnapshotLayout>(),
            Err("invalid snapshot layout 'csv', expected 'titled' or 'links-only'".to_string())
        );
    }
}
