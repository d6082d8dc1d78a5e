//! Reports printed (or dumped as JSON) after a save is written, and the
//! JSON view of a container header for `info`.

use anyhow::{Context, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use w3_core::SaveHeader;

/// Summary of a written save file.
#[derive(Debug, Serialize)]
pub struct SaveReport {
    pub output: String,
    /// Decompressed document length (the header's `DataSize`)
    pub data_size: usize,
    /// Compressed payload length (the header's `SaveDataSize`)
    pub save_data_size: usize,
    /// Compressed / decompressed
    pub compression_ratio: f64,
    /// Total bytes on disk, header included
    pub file_size: u64,
    /// SHA256 of the written file (hex)
    pub checksum: String,
    /// Report creation time (RFC3339)
    pub created_at: String,
}

impl SaveReport {
    /// Reads the written file back and summarizes it.
    pub fn collect(header: &SaveHeader, output: &Path) -> Result<SaveReport> {
        let bytes = fs::read(output)
            .with_context(|| format!("Failed to read written save: {}", output.display()))?;

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let checksum = format!("{:x}", hasher.finalize());

        let compression_ratio = if header.data_size == 0 {
            0.0
        } else {
            header.save_data_size as f64 / header.data_size as f64
        };

        Ok(SaveReport {
            output: output.display().to_string(),
            data_size: header.data_size,
            save_data_size: header.save_data_size,
            compression_ratio,
            file_size: bytes.len() as u64,
            checksum,
            created_at: chrono::Utc::now().to_rfc3339(),
        })
    }

    pub fn print(&self) {
        println!("\n✅ Save written: {}", self.output);
        println!("   Document size:   {} bytes", self.data_size);
        println!("   Compressed size: {} bytes", self.save_data_size);
        println!("   Compression:     {:.1}%", self.compression_ratio * 100.0);
        println!("   Checksum:        {}", self.checksum);
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write metadata: {}", path.display()))?;
        println!("📄 Metadata saved to: {}", path.display());
        Ok(())
    }
}

/// JSON view of the ten header fields. Opaque values are rendered lossily
/// for display only; the container itself keeps the raw bytes.
#[derive(Debug, Serialize)]
pub struct HeaderReport {
    pub version: String,
    pub location: String,
    pub save_time: String,
    pub data_size: usize,
    pub save_data_size: usize,
    pub hash: String,
    pub indices: String,
    pub names: String,
    pub levels: String,
    pub permadeath: String,
}

impl HeaderReport {
    pub fn from_header(header: &SaveHeader) -> HeaderReport {
        let lossy = |bytes: &[u8]| String::from_utf8_lossy(bytes).into_owned();
        HeaderReport {
            version: lossy(&header.version),
            location: lossy(&header.location),
            save_time: lossy(&header.save_time),
            data_size: header.data_size,
            save_data_size: header.save_data_size,
            hash: lossy(&header.hash),
            indices: lossy(&header.indices),
            names: lossy(&header.names),
            levels: lossy(&header.levels),
            permadeath: lossy(&header.permadeath),
        }
    }

    pub fn print(&self) {
        println!("Version:      {}", self.version);
        println!("Location:     {}", self.location);
        println!("SaveTime:     {}", self.save_time);
        println!("DataSize:     {}", self.data_size);
        println!("SaveDataSize: {}", self.save_data_size);
        println!("Hash:         {}", self.hash);
        println!("Indices:      {}", self.indices);
        println!("Names:        {}", self.names);
        println!("Levels:       {}", self.levels);
        println!("Permadeath:   {}", self.permadeath);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_header() -> SaveHeader {
        SaveHeader {
            version: b"1.0".to_vec(),
            location: b"Ranger HQ".to_vec(),
            save_time: b"now".to_vec(),
            data_size: 100,
            save_data_size: 40,
            hash: b"h".to_vec(),
            indices: b"i".to_vec(),
            names: b"n".to_vec(),
            levels: b"l".to_vec(),
            permadeath: b"False".to_vec(),
        }
    }

    #[test]
    fn test_collect_report() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("save.xml");
        fs::write(&path, b"0123456789").unwrap();

        let report = SaveReport::collect(&sample_header(), &path).unwrap();
        assert_eq!(report.file_size, 10);
        assert_eq!(report.data_size, 100);
        assert!((report.compression_ratio - 0.4).abs() < 1e-9);
        assert_eq!(report.checksum.len(), 64);
    }

    #[test]
    fn test_header_report_lossy_view() {
        let mut header = sample_header();
        header.names = vec![0xff, b'a'];
        let view = HeaderReport::from_header(&header);
        assert_eq!(view.location, "Ranger HQ");
        assert!(view.names.ends_with('a'));
    }
}
