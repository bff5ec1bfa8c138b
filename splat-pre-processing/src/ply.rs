//! Binary little-endian PLY reading and canonical splat layout writing.
use crate::error::PreprocessError;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Seek, Write};
use std::path::Path;

/// Canonical 14-property layout every output scene is normalised to.
/// Order defines the binary layout of each output vertex.
pub const CANONICAL_PROPERTIES: [&str; 14] = [
    "x", "y", "z", "scale_0", "scale_1", "scale_2", "f_dc_0", "f_dc_1", "f_dc_2", "opacity",
    "rot_0", "rot_1", "rot_2", "rot_3",
];

/// Value written for a canonical property the source does not carry, and for
/// every property of a padding splat. Scale and opacity of -100 make the splat
/// invisible after the renderer's exp/sigmoid activations.
pub fn filler_value(name: &str) -> f32 {
    match name {
        "scale_0" | "scale_1" | "scale_2" | "opacity" => -100.0,
        "rot_0" => 1.0,
        _ => 0.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    F32,
    F64,
}

impl ScalarType {
    fn parse(ty: &str) -> Option<Self> {
        Some(match ty {
            "char" | "int8" => Self::I8,
            "uchar" | "uint8" => Self::U8,
            "short" | "int16" => Self::I16,
            "ushort" | "uint16" => Self::U16,
            "int" | "int32" => Self::I32,
            "uint" | "uint32" => Self::U32,
            "float" | "float32" => Self::F32,
            "double" | "float64" => Self::F64,
            _ => return None,
        })
    }

    pub fn size(self) -> usize {
        match self {
            Self::I8 | Self::U8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::I32 | Self::U32 | Self::F32 => 4,
            Self::F64 => 8,
        }
    }

    fn read(self, bytes: &[u8]) -> f64 {
        match self {
            Self::I8 => bytes[0] as i8 as f64,
            Self::U8 => bytes[0] as f64,
            Self::I16 => i16::from_le_bytes([bytes[0], bytes[1]]) as f64,
            Self::U16 => u16::from_le_bytes([bytes[0], bytes[1]]) as f64,
            Self::I32 => i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as f64,
            Self::U32 => u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as f64,
            Self::F32 => f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as f64,
            Self::F64 => f64::from_le_bytes([
                bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
            ]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlyProperty {
    pub name: String,
    pub ty: ScalarType,
    /// Byte offset inside one vertex record.
    pub offset: usize,
}

#[derive(Debug, Clone)]
pub struct PlyHeader {
    pub vertex_count: usize,
    pub properties: Vec<PlyProperty>,
    pub stride: usize,
}

impl PlyHeader {
    /// Byte length of the vertex block.
    pub fn data_len(&self) -> usize {
        self.vertex_count.saturating_mul(self.stride)
    }

    pub fn property(&self, name: &str) -> Option<&PlyProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// True when the source already matches the canonical 14-float layout.
    pub fn is_canonical(&self) -> bool {
        self.properties.len() == CANONICAL_PROPERTIES.len()
            && self
                .properties
                .iter()
                .zip(CANONICAL_PROPERTIES)
                .all(|(p, name)| p.name == name && p.ty == ScalarType::F32)
    }
}

/// A fully loaded scene: header plus raw vertex records.
pub struct PlyScene {
    pub header: PlyHeader,
    pub vertex_data: Vec<u8>,
}

impl PlyScene {
    pub fn vertex_count(&self) -> usize {
        self.header.vertex_count
    }

    fn value(&self, vertex: usize, property: &PlyProperty) -> f64 {
        let start = vertex * self.header.stride + property.offset;
        property.ty.read(&self.vertex_data[start..start + property.ty.size()])
    }

    /// Scene-space xyz of every vertex, in file order (file order = stable id).
    pub fn positions(&self) -> Vec<[f32; 3]> {
        // Presence of x/y/z is checked when the header is parsed.
        let (Some(x), Some(y), Some(z)) = (
            self.header.property("x"),
            self.header.property("y"),
            self.header.property("z"),
        ) else {
            return Vec::new();
        };

        (0..self.vertex_count())
            .map(|i| {
                [
                    self.value(i, x) as f32,
                    self.value(i, y) as f32,
                    self.value(i, z) as f32,
                ]
            })
            .collect()
    }

    /// One vertex converted to the canonical layout.
    pub fn canonical_vertex(&self, vertex: usize) -> [f32; 14] {
        let mut out = [0.0f32; 14];
        for (slot, name) in out.iter_mut().zip(CANONICAL_PROPERTIES) {
            *slot = match self.header.property(name) {
                Some(property) => self.value(vertex, property) as f32,
                None => filler_value(name),
            };
        }
        out
    }
}

fn header_error(path: &Path, line: &str) -> PreprocessError {
    PreprocessError::MalformedHeader {
        path: path.to_path_buf(),
        line: line.to_string(),
    }
}

fn read_header<R: BufRead>(path: &Path, reader: &mut R) -> Result<PlyHeader, PreprocessError> {
    let mut line = String::new();
    let mut next_line = |line: &mut String| -> Result<String, PreprocessError> {
        line.clear();
        let read = reader
            .read_line(line)
            .map_err(|e| PreprocessError::io(path, e))?;
        if read == 0 {
            return Err(header_error(path, "<eof before end_header>"));
        }
        Ok(line.trim().to_string())
    };

    if next_line(&mut line)? != "ply" {
        return Err(PreprocessError::NotPly {
            path: path.to_path_buf(),
        });
    }

    let mut vertex_count = None;
    let mut in_vertex = false;
    let mut properties = Vec::new();
    let mut stride = 0;

    loop {
        let current = next_line(&mut line)?;
        let parts: Vec<&str> = current.split_whitespace().collect();
        match parts.as_slice() {
            ["end_header"] => break,
            ["format", format, ..] => {
                if *format != "binary_little_endian" {
                    return Err(PreprocessError::UnsupportedFormat {
                        path: path.to_path_buf(),
                        format: format.to_string(),
                    });
                }
            }
            ["comment", ..] | ["obj_info", ..] | [] => {}
            ["element", "vertex", count] => {
                let count = count
                    .parse::<usize>()
                    .map_err(|_| header_error(path, &current))?;
                vertex_count = Some(count);
                in_vertex = true;
            }
            ["element", _, _] => {
                // Elements before the vertex block would shift the vertex data.
                if vertex_count.is_none() {
                    return Err(header_error(path, &current));
                }
                in_vertex = false;
            }
            ["property", "list", ..] if in_vertex => {
                return Err(PreprocessError::UnsupportedPropertyType {
                    path: path.to_path_buf(),
                    ty: "list".to_string(),
                });
            }
            ["property", ty, name] => {
                if !in_vertex {
                    continue;
                }
                let ty = ScalarType::parse(ty).ok_or_else(|| {
                    PreprocessError::UnsupportedPropertyType {
                        path: path.to_path_buf(),
                        ty: ty.to_string(),
                    }
                })?;
                properties.push(PlyProperty {
                    name: name.to_string(),
                    ty,
                    offset: stride,
                });
                stride += ty.size();
            }
            _ => return Err(header_error(path, &current)),
        }
    }

    let vertex_count = vertex_count.ok_or_else(|| header_error(path, "<no vertex element>"))?;
    if vertex_count.checked_mul(stride).is_none() {
        return Err(header_error(path, &format!("element vertex {vertex_count}")));
    }
    let header = PlyHeader {
        vertex_count,
        properties,
        stride,
    };

    if ["x", "y", "z"].iter().any(|n| header.property(n).is_none()) {
        return Err(PreprocessError::MissingPosition {
            path: path.to_path_buf(),
        });
    }

    Ok(header)
}

/// Open `path` and parse its header, rejecting files whose vertex block
/// is shorter than the header claims. The reader is left at the first vertex.
fn open_ply(path: &Path) -> Result<(PlyHeader, BufReader<File>), PreprocessError> {
    let file = File::open(path).map_err(|e| PreprocessError::io(path, e))?;
    let file_len = file
        .metadata()
        .map_err(|e| PreprocessError::io(path, e))?
        .len();
    let mut reader = BufReader::new(file);
    let header = read_header(path, &mut reader)?;

    let data_start = reader
        .stream_position()
        .map_err(|e| PreprocessError::io(path, e))?;
    let available = file_len.saturating_sub(data_start);
    if (header.data_len() as u64) > available {
        return Err(PreprocessError::TruncatedVertexData {
            path: path.to_path_buf(),
            expected: header.data_len(),
            found: usize::try_from(available).unwrap_or(usize::MAX),
        });
    }
    Ok((header, reader))
}

/// Read only the header, used to find the largest scene before converting.
pub fn read_ply_header(path: &Path) -> Result<PlyHeader, PreprocessError> {
    open_ply(path).map(|(header, _)| header)
}

pub fn read_ply(path: &Path) -> Result<PlyScene, PreprocessError> {
    let (header, reader) = open_ply(path)?;

    // Bounded by the file length checked in `open_ply`.
    let expected = header.data_len();
    let mut vertex_data = Vec::with_capacity(expected);
    reader
        .take(expected as u64)
        .read_to_end(&mut vertex_data)
        .map_err(|e| PreprocessError::io(path, e))?;

    if vertex_data.len() != expected {
        return Err(PreprocessError::TruncatedVertexData {
            path: path.to_path_buf(),
            expected,
            found: vertex_data.len(),
        });
    }

    Ok(PlyScene {
        header,
        vertex_data,
    })
}

/// Write `scene` in the canonical layout, padded with filler splats up to `target_count`.
/// Returns the number of padding vertices appended.
pub fn write_canonical_ply(
    path: &Path,
    scene: &PlyScene,
    target_count: usize,
) -> Result<usize, PreprocessError> {
    let file = File::create(path).map_err(|e| PreprocessError::io(path, e))?;
    let mut out = BufWriter::new(file);
    let io = |e| PreprocessError::io(path, e);

    let total = target_count.max(scene.vertex_count());
    let mut header = format!("ply\nformat binary_little_endian 1.0\nelement vertex {total}\n");
    for name in CANONICAL_PROPERTIES {
        header.push_str(&format!("property float {name}\n"));
    }
    header.push_str("end_header\n");
    out.write_all(header.as_bytes()).map_err(io)?;

    if scene.header.is_canonical() {
        out.write_all(&scene.vertex_data).map_err(io)?;
    } else {
        for vertex in 0..scene.vertex_count() {
            for value in scene.canonical_vertex(vertex) {
                out.write_all(&value.to_le_bytes()).map_err(io)?;
            }
        }
    }

    let padding = total - scene.vertex_count();
    let mut filler = Vec::with_capacity(CANONICAL_PROPERTIES.len() * 4);
    for name in CANONICAL_PROPERTIES {
        filler.extend_from_slice(&filler_value(name).to_le_bytes());
    }
    for _ in 0..padding {
        out.write_all(&filler).map_err(io)?;
    }

    out.flush().map_err(io)?;
    Ok(padding)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Write a little-endian PLY with the given float properties.
    pub(crate) fn write_fixture(path: &Path, names: &[&str], rows: &[Vec<f32>]) {
        let mut bytes = format!(
            "ply\nformat binary_little_endian 1.0\ncomment fixture\nelement vertex {}\n",
            rows.len()
        )
        .into_bytes();
        for name in names {
            bytes.extend_from_slice(format!("property float {name}\n").as_bytes());
        }
        bytes.extend_from_slice(b"end_header\n");
        for row in rows {
            for v in row {
                bytes.extend_from_slice(&v.to_le_bytes());
            }
        }
        std::fs::write(path, bytes).unwrap();
    }

    #[test]
    fn reads_positions_in_file_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.ply");
        write_fixture(
            &path,
            &["x", "y", "z", "opacity"],
            &[vec![1.0, 2.0, 3.0, 0.5], vec![-1.0, -2.0, -3.0, 0.25]],
        );

        let scene = read_ply(&path).unwrap();
        assert_eq!(scene.vertex_count(), 2);
        assert_eq!(scene.positions(), vec![[1.0, 2.0, 3.0], [-1.0, -2.0, -3.0]]);
        assert!(!scene.header.is_canonical());
    }

    #[test]
    fn mixed_scalar_types_are_decoded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mixed.ply");
        let mut bytes = b"ply\nformat binary_little_endian 1.0\nelement vertex 1\n\
property double x\nproperty float y\nproperty short z\nproperty uchar red\nend_header\n"
            .to_vec();
        bytes.extend_from_slice(&4.5f64.to_le_bytes());
        bytes.extend_from_slice(&(-1.5f32).to_le_bytes());
        bytes.extend_from_slice(&(-7i16).to_le_bytes());
        bytes.push(200);
        std::fs::write(&path, bytes).unwrap();

        let scene = read_ply(&path).unwrap();
        assert_eq!(scene.header.stride, 8 + 4 + 2 + 1);
        assert_eq!(scene.positions(), vec![[4.5, -1.5, -7.0]]);
    }

    #[test]
    fn missing_position_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flat.ply");
        write_fixture(&path, &["x", "y"], &[vec![0.0, 0.0]]);

        assert!(matches!(
            read_ply(&path),
            Err(PreprocessError::MissingPosition { .. })
        ));
    }

    #[test]
    fn truncated_data_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.ply");
        write_fixture(&path, &["x", "y", "z"], &[vec![0.0, 0.0, 0.0]]);
        let mut bytes = std::fs::read(&path).unwrap();
        bytes.truncate(bytes.len() - 2);
        std::fs::write(&path, bytes).unwrap();

        assert!(matches!(
            read_ply(&path),
            Err(PreprocessError::TruncatedVertexData {
                expected: 12,
                found: 10,
                ..
            })
        ));
    }

    #[test]
    fn overflowing_vertex_count_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.ply");
        let header = format!(
            "ply\nformat binary_little_endian 1.0\nelement vertex {}\nproperty float x\nproperty float y\nproperty float z\nend_header\n",
            usize::MAX
        );
        std::fs::write(&path, header).unwrap();

        assert!(matches!(
            read_ply(&path),
            Err(PreprocessError::MalformedHeader { .. })
        ));
        assert!(matches!(
            read_ply_header(&path),
            Err(PreprocessError::MalformedHeader { .. })
        ));
    }

    #[test]
    fn vertex_count_beyond_file_length_is_rejected_from_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inflated.ply");
        let mut bytes = b"ply\nformat binary_little_endian 1.0\nelement vertex 4000000000\nproperty float x\nproperty float y\nproperty float z\nend_header\n".to_vec();
        for v in [1.0f32, 2.0, 3.0] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        std::fs::write(&path, bytes).unwrap();

        assert!(matches!(
            read_ply_header(&path),
            Err(PreprocessError::TruncatedVertexData {
                expected: 48_000_000_000,
                found: 12,
                ..
            })
        ));
        assert!(matches!(
            read_ply(&path),
            Err(PreprocessError::TruncatedVertexData { found: 12, .. })
        ));
    }

    #[test]
    fn ascii_format_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ascii.ply");
        std::fs::write(
            &path,
            "ply\nformat ascii 1.0\nelement vertex 0\nproperty float x\nend_header\n",
        )
        .unwrap();

        assert!(matches!(
            read_ply(&path),
            Err(PreprocessError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn canonical_output_fills_missing_and_pads() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.ply");
        let dst = dir.path().join("dst.ply");
        write_fixture(&src, &["x", "y", "z", "opacity"], &[vec![1.0, 2.0, 3.0, 0.7]]);

        let scene = read_ply(&src).unwrap();
        let padding = write_canonical_ply(&dst, &scene, 3).unwrap();
        assert_eq!(padding, 2);

        let written = read_ply(&dst).unwrap();
        assert!(written.header.is_canonical());
        assert_eq!(written.vertex_count(), 3);

        let first = written.canonical_vertex(0);
        assert_eq!(&first[0..3], &[1.0, 2.0, 3.0]);
        assert_eq!(first[3], -100.0); // scale_0 filled
        assert_eq!(first[9], 0.7); // opacity carried over
        assert_eq!(first[10], 1.0); // rot_0 identity

        let pad = written.canonical_vertex(2);
        assert_eq!(&pad[0..3], &[0.0, 0.0, 0.0]);
        assert_eq!(pad[9], -100.0);
    }
}
