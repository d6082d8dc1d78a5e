use super::error::SaveError;
use super::MAGIC;

/// The ten header fields of an XLZF save, in file order.
///
/// The format fixes both the order and the names, so this is a positional
/// record rather than a map: a file missing a field, or carrying one out of
/// order, does not parse. Only `DataSize` and `SaveDataSize` are numbers;
/// every other value is an opaque byte string the game wrote and expects to
/// read back verbatim, so no text encoding is assumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveHeader {
    pub version: Vec<u8>,
    pub location: Vec<u8>,
    pub save_time: Vec<u8>,
    /// Length of the decompressed document in bytes.
    pub data_size: usize,
    /// Length of the compressed payload in bytes.
    pub save_data_size: usize,
    pub hash: Vec<u8>,
    pub indices: Vec<u8>,
    pub names: Vec<u8>,
    pub levels: Vec<u8>,
    pub permadeath: Vec<u8>,
}

impl SaveHeader {
    /// Parses the magic line and the ten header fields from the start of
    /// `bytes`, returning the header and the remaining payload bytes.
    pub fn parse(bytes: &[u8]) -> Result<(SaveHeader, &[u8]), SaveError> {
        let mut lines = LineReader { rest: bytes };

        match lines.next_line() {
            Some(line) if line == MAGIC => {}
            _ => return Err(SaveError::BadMagic),
        }

        let header = SaveHeader {
            version: opaque_field(&mut lines, "Version")?,
            location: opaque_field(&mut lines, "Location")?,
            save_time: opaque_field(&mut lines, "SaveTime")?,
            data_size: numeric_field(&mut lines, "DataSize")?,
            save_data_size: numeric_field(&mut lines, "SaveDataSize")?,
            hash: opaque_field(&mut lines, "Hash")?,
            indices: opaque_field(&mut lines, "Indices")?,
            names: opaque_field(&mut lines, "Names")?,
            levels: opaque_field(&mut lines, "Levels")?,
            permadeath: opaque_field(&mut lines, "Permadeath")?,
        };

        Ok((header, lines.rest))
    }

    /// Serializes the magic line and all ten fields in file order.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(MAGIC);
        out.push(b'\n');
        push_field(out, "Version", &self.version);
        push_field(out, "Location", &self.location);
        push_field(out, "SaveTime", &self.save_time);
        push_field(out, "DataSize", self.data_size.to_string().as_bytes());
        push_field(out, "SaveDataSize", self.save_data_size.to_string().as_bytes());
        push_field(out, "Hash", &self.hash);
        push_field(out, "Indices", &self.indices);
        push_field(out, "Names", &self.names);
        push_field(out, "Levels", &self.levels);
        push_field(out, "Permadeath", &self.permadeath);
    }

    /// Serialized length of the magic line plus all header lines.
    pub fn encoded_len(&self) -> usize {
        let mut out = Vec::new();
        self.write_to(&mut out);
        out.len()
    }
}

/// Splits input into `\n`-terminated lines without copying.
struct LineReader<'a> {
    rest: &'a [u8],
}

impl<'a> LineReader<'a> {
    /// Next line with its terminator stripped. `None` once no terminated
    /// line remains; header lines are always `\n`-terminated, so the
    /// unterminated tail is payload, not a line.
    fn next_line(&mut self) -> Option<&'a [u8]> {
        let pos = self.rest.iter().position(|&b| b == b'\n')?;
        let line = &self.rest[..pos];
        self.rest = &self.rest[pos + 1..];
        Some(line)
    }
}

fn split_field<'a>(line: &'a [u8], name: &'static str) -> Result<&'a [u8], SaveError> {
    line.strip_prefix(name.as_bytes())
        .and_then(|rest| rest.strip_prefix(b":=".as_slice()))
        .ok_or(SaveError::Format { field: name })
}

fn opaque_field(lines: &mut LineReader<'_>, name: &'static str) -> Result<Vec<u8>, SaveError> {
    let line = lines.next_line().ok_or(SaveError::Format { field: name })?;
    Ok(split_field(line, name)?.to_vec())
}

fn numeric_field(lines: &mut LineReader<'_>, name: &'static str) -> Result<usize, SaveError> {
    let line = lines.next_line().ok_or(SaveError::Format { field: name })?;
    let value = split_field(line, name)?;
    std::str::from_utf8(value)
        .ok()
        .and_then(|text| text.parse::<usize>().ok())
        .ok_or_else(|| SaveError::NumericField {
            field: name,
            value: String::from_utf8_lossy(value).into_owned(),
        })
}

fn push_field(out: &mut Vec<u8>, name: &str, value: &[u8]) {
    out.extend_from_slice(name.as_bytes());
    out.extend_from_slice(b":=");
    out.extend_from_slice(value);
    out.push(b'\n');
}
