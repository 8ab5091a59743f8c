//! Read access to a dictionary package

use crate::error::{KotobaError, Result};
use std::io::{Read, Seek};
use zip::ZipArchive;

/// Upper bound on the buffer reserved from a header's declared size
const MAX_CAPACITY_HINT: u64 = 16 * 1024 * 1024;

/// A dictionary package: a zip archive of JSON files
pub struct DictionaryArchive<R> {
    zip: ZipArchive<R>,
}

impl<R: Read + Seek> DictionaryArchive<R> {
    /// Fails with `MalformedArchive` when `reader` is not a zip archive
    pub fn new(reader: R) -> Result<Self> {
        let zip = ZipArchive::new(reader)
            .map_err(|e| KotobaError::MalformedArchive(e.to_string()))?;
        Ok(Self { zip })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.zip.index_for_name(name).is_some()
    }

    pub fn read_to_string(&mut self, name: &str) -> Result<String> {
        let mut file = self.zip.by_name(name)?;
        let hint = file.size().min(MAX_CAPACITY_HINT) as usize;
        let mut content = String::with_capacity(hint);
        file.read_to_string(&mut content)?;
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    #[test]
    fn test_reads_named_files() {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("index.json", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"{}").unwrap();
        let mut cursor = writer.finish().unwrap();
        cursor.set_position(0);

        let mut archive = DictionaryArchive::new(cursor).unwrap();
        assert!(archive.contains("index.json"));
        assert!(!archive.contains("term_bank_1.json"));
        assert_eq!(archive.read_to_string("index.json").unwrap(), "{}");
        assert!(archive.read_to_string("missing.json").is_err());
    }

    #[test]
    fn test_not_a_zip() {
        let err = DictionaryArchive::new(Cursor::new(b"plain text".to_vec()))
            .err()
            .unwrap();
        assert!(matches!(err, KotobaError::MalformedArchive(_)));
    }
}
