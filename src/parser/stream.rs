//! Transparent gzip/plain-text stream opening, grounded on
//! `flate2::read::GzDecoder` usage in
//! `examples/ChainSafe-forest/tests/conformance_tests/tests/conformance_runner.rs`.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;

use crate::error::Result;

const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Opens `path`, auto-detecting gzip compression from the first two bytes,
/// and returns a buffered line reader over the decoded contents.
pub fn open_report(path: impl AsRef<Path>) -> Result<Box<dyn BufRead + Send>> {
    let mut file = File::open(path)?;
    let mut magic = [0u8; 2];
    let read = file.read(&mut magic)?;
    let mut file = file;
    use std::io::Seek;
    file.seek(std::io::SeekFrom::Start(0))?;

    if read == 2 && magic == GZIP_MAGIC {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_plain_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("r.rpt");
        std::fs::write(&path, "Startpoint: a\nEndpoint: b\n").unwrap();
        let mut reader = open_report(&path).unwrap();
        let mut first_line = String::new();
        reader.read_line(&mut first_line).unwrap();
        assert_eq!(first_line.trim(), "Startpoint: a");
    }

    #[test]
    fn reads_gzip_transparently() {
        use flate2::write::GzEncoder;
        use flate2::Compression;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("r.rpt.gz");
        let file = std::fs::File::create(&path).unwrap();
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(b"Startpoint: a\nEndpoint: b\n").unwrap();
        encoder.finish().unwrap();

        let mut reader = open_report(&path).unwrap();
        let mut first_line = String::new();
        reader.read_line(&mut first_line).unwrap();
        assert_eq!(first_line.trim(), "Startpoint: a");
    }
}
