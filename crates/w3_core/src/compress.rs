//! Compression boundary for the save container.
//!
//! The container codec never touches a compression algorithm directly; it
//! calls whatever [`Compression`] value the caller hands it. The shipped
//! implementation is LZ4 block compression via `lz4_flex`, but anything that
//! turns bytes into fewer bytes and back fits behind the trait.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompressError {
    #[error("compressed output does not fit in {capacity} bytes")]
    InsufficientCapacity { capacity: usize },

    #[error("compressor produced no output for {input_len} input bytes")]
    EmptyOutput { input_len: usize },

    #[error("corrupt compressed stream: {0}")]
    Corrupt(String),
}

impl CompressError {
    /// Whether retrying with a larger output capacity can succeed.
    pub fn is_capacity(&self) -> bool {
        matches!(self, CompressError::InsufficientCapacity { .. })
    }
}

/// Compress/decompress over plain byte buffers.
///
/// Each call owns its buffers for the duration of that call only; nothing is
/// shared or reused between calls.
pub trait Compression {
    /// Compress `input` into at most `max_output_len` bytes.
    ///
    /// Fails with [`CompressError::InsufficientCapacity`] when the output
    /// does not fit; the caller may retry with a larger bound.
    fn compress(&self, input: &[u8], max_output_len: usize) -> Result<Vec<u8>, CompressError>;

    /// Decompress `input`, which is expected to inflate to
    /// `expected_output_len` bytes.
    ///
    /// Returns the bytes actually produced. The caller compares the returned
    /// length against the expected one, so a stream that inflates to a
    /// slightly different size must still decompress rather than fail here.
    fn decompress(&self, input: &[u8], expected_output_len: usize)
        -> Result<Vec<u8>, CompressError>;

    /// Worst-case compressed size for `input_len` bytes of input.
    ///
    /// Passing this as `max_output_len` to [`Compression::compress`] is
    /// guaranteed to succeed.
    fn max_compressed_len(&self, input_len: usize) -> usize;
}

/// LZ4 block compression, the default capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lz4Compression;

impl Compression for Lz4Compression {
    fn compress(&self, input: &[u8], max_output_len: usize) -> Result<Vec<u8>, CompressError> {
        let mut output = vec![0u8; max_output_len];
        let written = lz4_flex::block::compress_into(input, &mut output)
            .map_err(|_| CompressError::InsufficientCapacity { capacity: max_output_len })?;
        if written == 0 && !input.is_empty() {
            return Err(CompressError::EmptyOutput { input_len: input.len() });
        }
        output.truncate(written);
        Ok(output)
    }

    fn decompress(
        &self,
        input: &[u8],
        expected_output_len: usize,
    ) -> Result<Vec<u8>, CompressError> {
        // Slack past the expected length, so a stream that inflates larger
        // than declared still yields its true size to the caller.
        let capacity = expected_output_len + expected_output_len / 2 + 64;
        let mut output = vec![0u8; capacity];
        let written = lz4_flex::block::decompress_into(input, &mut output)
            .map_err(|e| CompressError::Corrupt(e.to_string()))?;
        output.truncate(written);
        Ok(output)
    }

    fn max_compressed_len(&self, input_len: usize) -> usize {
        lz4_flex::block::get_maximum_output_size(input_len)
    }
}
