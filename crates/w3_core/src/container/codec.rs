use super::error::SaveError;
use super::header::SaveHeader;
use crate::compress::Compression;

/// An XLZF save held fully in memory: the parsed header, the compressed
/// payload as it sits on disk, and the decompressed document.
///
/// The two header size fields track the actual payload lengths at all
/// times: decode verifies them against the file, [`SaveContainer::set_payload`]
/// and [`SaveContainer::encode`] recompute them. A container therefore always
/// serializes to a file the game can load.
#[derive(Debug, Clone)]
pub struct SaveContainer {
    pub header: SaveHeader,
    payload_compressed: Vec<u8>,
    payload_plain: Vec<u8>,
}

impl SaveContainer {
    /// Parses raw file bytes and inflates the payload.
    ///
    /// The payload must be exactly `SaveDataSize` bytes; both truncation and
    /// trailing garbage are rejected before decompression is attempted. A
    /// payload that inflates to a length other than `DataSize` fails with
    /// [`SaveError::Integrity`] carrying both lengths.
    pub fn decode(bytes: &[u8], compression: &dyn Compression) -> Result<Self, SaveError> {
        let (header, payload) = SaveHeader::parse(bytes)?;

        if payload.len() != header.save_data_size {
            return Err(SaveError::PayloadLength {
                declared: header.save_data_size,
                actual: payload.len(),
            });
        }

        let plain = compression.decompress(payload, header.data_size)?;
        if plain.len() != header.data_size {
            return Err(SaveError::Integrity {
                expected: header.data_size,
                actual: plain.len(),
            });
        }

        log::debug!(
            "decoded container: {} compressed bytes -> {} plain bytes",
            payload.len(),
            plain.len()
        );

        Ok(SaveContainer {
            header,
            payload_compressed: payload.to_vec(),
            payload_plain: plain,
        })
    }

    /// The decompressed document.
    pub fn payload(&self) -> &[u8] {
        &self.payload_plain
    }

    /// Replaces the decompressed document, keeping `DataSize` current.
    pub fn set_payload(&mut self, payload: Vec<u8>) {
        self.header.data_size = payload.len();
        self.payload_plain = payload;
    }

    /// Re-serializes the container, compressing under the capability's
    /// worst-case output bound.
    pub fn encode(&mut self, compression: &dyn Compression) -> Result<Vec<u8>, SaveError> {
        let bound = compression.max_compressed_len(self.payload_plain.len());
        self.encode_with_capacity(compression, bound)
    }

    /// Re-serializes the container with an explicit compression capacity.
    ///
    /// Recomputes `DataSize` and `SaveDataSize` from the actual payload
    /// lengths, then emits the magic line, the ten header fields, and exactly
    /// `SaveDataSize` payload bytes. The whole file is produced in memory;
    /// nothing is written anywhere.
    ///
    /// An undersized `max_output_len` fails with a recoverable
    /// [`SaveError::Compression`]; retry with a larger bound, or use
    /// [`SaveContainer::encode`].
    pub fn encode_with_capacity(
        &mut self,
        compression: &dyn Compression,
        max_output_len: usize,
    ) -> Result<Vec<u8>, SaveError> {
        self.header.data_size = self.payload_plain.len();

        let compressed = compression.compress(&self.payload_plain, max_output_len)?;
        self.header.save_data_size = compressed.len();
        self.payload_compressed = compressed;

        let mut out = Vec::with_capacity(self.header.encoded_len() + self.payload_compressed.len());
        self.header.write_to(&mut out);
        out.extend_from_slice(&self.payload_compressed);

        log::debug!(
            "encoded container: {} plain bytes -> {} compressed bytes",
            self.header.data_size,
            self.header.save_data_size
        );

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compress::Lz4Compression;

    fn sample_header(data_size: usize, save_data_size: usize) -> SaveHeader {
        SaveHeader {
            version: b"1.6.9.420 (PC)".to_vec(),
            location: b"Downtown Colorado Springs".to_vec(),
            save_time: b"07/11/2026 20:14:35".to_vec(),
            data_size,
            save_data_size,
            hash: b"2fd4e1c67a2d28fc".to_vec(),
            indices: b"0,1".to_vec(),
            names: b"Nacho;Cordite".to_vec(),
            levels: b"12;11".to_vec(),
            permadeath: b"False".to_vec(),
        }
    }

    /// A well-formed file whose payload decompresses to `plain`.
    fn sample_file(plain: &[u8]) -> Vec<u8> {
        let lz4 = Lz4Compression;
        let compressed = lz4.compress(plain, lz4.max_compressed_len(plain.len())).unwrap();
        let header = sample_header(plain.len(), compressed.len());

        let mut bytes = Vec::new();
        header.write_to(&mut bytes);
        bytes.extend_from_slice(&compressed);
        bytes
    }

    #[test]
    fn test_decode_populates_container() {
        let bytes = sample_file(b"<xml>");
        let container = SaveContainer::decode(&bytes, &Lz4Compression).unwrap();

        assert_eq!(container.payload(), b"<xml>");
        assert_eq!(container.header.data_size, 5);
        assert_eq!(container.header.location, b"Downtown Colorado Springs");
    }

    #[test]
    fn test_noop_edit_roundtrip() {
        let bytes = sample_file(b"<save><player name='Nacho'/></save>");
        let mut container = SaveContainer::decode(&bytes, &Lz4Compression).unwrap();
        let original_header = container.header.clone();

        let reencoded = container.encode(&Lz4Compression).unwrap();
        let restored = SaveContainer::decode(&reencoded, &Lz4Compression).unwrap();

        assert_eq!(restored.payload(), b"<save><player name='Nacho'/></save>");
        assert_eq!(restored.header.version, original_header.version);
        assert_eq!(restored.header.hash, original_header.hash);
        assert_eq!(restored.header.data_size, original_header.data_size);
    }

    #[test]
    fn test_encode_keeps_sizes_consistent() {
        let bytes = sample_file(b"<xml>");
        let mut container = SaveContainer::decode(&bytes, &Lz4Compression).unwrap();
        container.set_payload(b"a much longer document than before".to_vec());

        let encoded = container.encode(&Lz4Compression).unwrap();
        let (header, payload) = SaveHeader::parse(&encoded).unwrap();

        assert_eq!(header.data_size, 34);
        assert_eq!(header.save_data_size, payload.len());
        // Nothing after the declared payload.
        assert_eq!(encoded.len(), header.encoded_len() + header.save_data_size);
    }

    #[test]
    fn test_end_to_end_edit() {
        let bytes = sample_file(b"<xml>");
        let mut container = SaveContainer::decode(&bytes, &Lz4Compression).unwrap();

        container.set_payload(b"<xml2>".to_vec());
        let saved = container.encode(&Lz4Compression).unwrap();
        assert_eq!(container.header.data_size, 6);
        assert_eq!(container.header.save_data_size, saved.len() - container.header.encoded_len());

        let restored = SaveContainer::decode(&saved, &Lz4Compression).unwrap();
        assert_eq!(restored.payload(), b"<xml2>");
    }

    #[test]
    fn test_understated_data_size_is_integrity_error() {
        let plain = b"<xml2>";
        let lz4 = Lz4Compression;
        let compressed = lz4.compress(plain, lz4.max_compressed_len(plain.len())).unwrap();
        // Header lies: declares one byte less than the document inflates to.
        let header = sample_header(plain.len() - 1, compressed.len());

        let mut bytes = Vec::new();
        header.write_to(&mut bytes);
        bytes.extend_from_slice(&compressed);

        let err = SaveContainer::decode(&bytes, &lz4).unwrap_err();
        match err {
            SaveError::Integrity { expected, actual } => {
                assert_eq!(expected, 5);
                assert_eq!(actual, 6);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_truncated_payload_rejected_before_decompression() {
        let mut bytes = sample_file(b"<xml>");
        bytes.pop();

        let err = SaveContainer::decode(&bytes, &Lz4Compression).unwrap_err();
        match err {
            SaveError::PayloadLength { declared, actual } => {
                assert_eq!(actual, declared - 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_trailing_garbage_rejected() {
        let mut bytes = sample_file(b"<xml>");
        bytes.push(0x00);

        let err = SaveContainer::decode(&bytes, &Lz4Compression).unwrap_err();
        assert!(matches!(err, SaveError::PayloadLength { .. }));
    }

    #[test]
    fn test_undersized_capacity_is_recoverable() {
        let bytes = sample_file(b"<xml>");
        let mut container = SaveContainer::decode(&bytes, &Lz4Compression).unwrap();
        let incompressible: Vec<u8> =
            (0u32..512).map(|i| (i.wrapping_mul(2654435761) >> 24) as u8).collect();
        container.set_payload(incompressible);

        let err = container.encode_with_capacity(&Lz4Compression, 8).unwrap_err();
        assert!(err.is_recoverable());

        // The default bound succeeds where the fixed guess failed.
        container.encode(&Lz4Compression).unwrap();
    }
}
