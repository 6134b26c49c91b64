//! Source CSV reading with encoding handling.
//!
//! The source is read once, front to back, through a single [`SourceReader`].
//! UTF-8 input is streamed directly (a leading BOM is skipped) and every
//! field is decoded lossily, so a stray invalid byte becomes U+FFFD instead of
//! ending the run. Other encodings are decoded up front with `encoding_rs`,
//! optionally after detection with `chardet`.

use csv::{ByteRecord, ReaderBuilder, StringRecord, Trim};
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Read};
use std::path::Path;
use std::rc::Rc;
use std::str::FromStr;

use crate::error::{SourceError, SourceResult};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Text encoding of the source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceEncoding {
    #[default]
    Utf8,
    Windows1252,
    Latin1,
    /// Detect from the file content
    Auto,
}

impl FromStr for SourceEncoding {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "utf-8" | "utf8" | "ascii" => Ok(SourceEncoding::Utf8),
            "windows-1252" | "cp1252" => Ok(SourceEncoding::Windows1252),
            "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => Ok(SourceEncoding::Latin1),
            "auto" => Ok(SourceEncoding::Auto),
            other => Err(SourceError::UnsupportedEncoding(other.to_string())),
        }
    }
}

impl fmt::Display for SourceEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SourceEncoding::Utf8 => "utf-8",
            SourceEncoding::Windows1252 => "windows-1252",
            SourceEncoding::Latin1 => "iso-8859-1",
            SourceEncoding::Auto => "auto",
        })
    }
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to a string using the named encoding
pub fn decode_content(bytes: &[u8], encoding: &str) -> SourceResult<String> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match encoding.parse::<SourceEncoding>()? {
        SourceEncoding::Utf8 => Ok(String::from_utf8_lossy(bytes).into_owned()),
        // WHATWG maps the latin-1 labels onto windows-1252
        SourceEncoding::Windows1252 | SourceEncoding::Latin1 => {
            Ok(encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned())
        }
        SourceEncoding::Auto => match detect_encoding(bytes).parse::<SourceEncoding>() {
            Ok(detected) if detected != SourceEncoding::Auto => {
                decode_content(bytes, &detected.to_string())
            }
            // Fallback: UTF-8 with lossy conversion
            _ => Ok(String::from_utf8_lossy(bytes).into_owned()),
        },
    }
}

/// Wrap a raw byte stream so that it yields UTF-8 text
fn decoding_reader<'a, R: Read + 'a>(
    reader: R,
    encoding: SourceEncoding,
) -> SourceResult<Box<dyn Read + 'a>> {
    match encoding {
        SourceEncoding::Utf8 => {
            let mut buffered = BufReader::new(reader);
            if buffered.fill_buf()?.starts_with(UTF8_BOM) {
                buffered.consume(UTF8_BOM.len());
            }
            Ok(Box::new(buffered))
        }
        other => {
            let mut bytes = Vec::new();
            BufReader::new(reader).read_to_end(&mut bytes)?;
            let decoded = decode_content(&bytes, &other.to_string())?;
            Ok(Box::new(Cursor::new(decoded.into_bytes())))
        }
    }
}

/// Named field lookup over a source row
pub trait SourceFields {
    /// Value of the named field, or `None` if the row has no such field
    fn field(&self, name: &str) -> Option<&str>;
}

impl SourceFields for HashMap<String, String> {
    fn field(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

/// Header of the source file with a name index
#[derive(Debug)]
pub struct SourceHeader {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl SourceHeader {
    fn new(names: Vec<String>) -> Self {
        let mut index = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            // First occurrence wins on duplicate names
            index.entry(name.clone()).or_insert(i);
        }
        Self { names, index }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }
}

/// One data row of the source file
#[derive(Debug, Clone)]
pub struct SourceRow {
    header: Rc<SourceHeader>,
    record: StringRecord,
}

impl SourceRow {
    /// Physical line of this row in the source file, when known
    pub fn line(&self) -> Option<u64> {
        self.record.position().map(|p| p.line())
    }

    pub fn len(&self) -> usize {
        self.record.len()
    }

    pub fn is_empty(&self) -> bool {
        self.record.is_empty()
    }
}

impl SourceFields for SourceRow {
    fn field(&self, name: &str) -> Option<&str> {
        self.header
            .position(name)
            .and_then(|i| self.record.get(i))
    }
}

/// Sequential reader over a delimited source
pub struct SourceReader<R: Read> {
    reader: csv::Reader<R>,
    header: Rc<SourceHeader>,
}

impl<'a> SourceReader<Box<dyn Read + 'a>> {
    /// Open a source file with the given delimiter and encoding
    pub fn open<P: AsRef<Path>>(
        path: P,
        delimiter: u8,
        encoding: SourceEncoding,
    ) -> SourceResult<Self> {
        let file = File::open(path.as_ref())?;
        Self::decoding(file, delimiter, encoding)
    }

    /// Read from any byte stream in the given encoding
    pub fn decoding<S: Read + 'a>(
        source: S,
        delimiter: u8,
        encoding: SourceEncoding,
    ) -> SourceResult<Self> {
        SourceReader::from_reader(decoding_reader(source, encoding)?, delimiter)
    }
}

impl<R: Read> SourceReader<R> {
    /// Read UTF-8 CSV from a reader; the first row is the header.
    ///
    /// Invalid UTF-8 sequences are replaced with U+FFFD.
    pub fn from_reader(reader: R, delimiter: u8) -> SourceResult<Self> {
        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .trim(Trim::None)
            .from_reader(reader);

        let names: Vec<String> = reader
            .byte_headers()?
            .iter()
            .map(|name| String::from_utf8_lossy(name).into_owned())
            .collect();
        if names.is_empty() {
            return Err(SourceError::NoHeaders);
        }

        Ok(Self {
            reader,
            header: Rc::new(SourceHeader::new(names)),
        })
    }

    pub fn headers(&self) -> &[String] {
        self.header.names()
    }

    /// Read the next data row, or `None` at end of input
    pub fn next_row(&mut self) -> SourceResult<Option<SourceRow>> {
        let mut bytes = ByteRecord::new();
        if !self.reader.read_byte_record(&mut bytes)? {
            return Ok(None);
        }

        let position = bytes.position().cloned();
        let mut record = StringRecord::from_byte_record_lossy(bytes);
        record.set_position(position);

        Ok(Some(SourceRow {
            header: Rc::clone(&self.header),
            record,
        }))
    }
}

impl<R: Read> Iterator for SourceReader<R> {
    type Item = SourceResult<SourceRow>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_row().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(csv: &str) -> SourceReader<&[u8]> {
        SourceReader::from_reader(csv.as_bytes(), b',').unwrap()
    }

    #[test]
    fn test_simple_csv() {
        let mut source = reader("name,age\nAlice,30\nBob,25\n");
        assert_eq!(source.headers(), &["name", "age"]);

        let first = source.next_row().unwrap().unwrap();
        assert_eq!(first.field("name"), Some("Alice"));
        assert_eq!(first.field("age"), Some("30"));

        let second = source.next_row().unwrap().unwrap();
        assert_eq!(second.field("name"), Some("Bob"));

        assert!(source.next_row().unwrap().is_none());
    }

    #[test]
    fn test_quoted_values() {
        let mut source = reader("name,value\n\"Smith, Alice\",\"Hello \"\"World\"\"\"\n");
        let row = source.next_row().unwrap().unwrap();
        assert_eq!(row.field("name"), Some("Smith, Alice"));
        assert_eq!(row.field("value"), Some("Hello \"World\""));
    }

    #[test]
    fn test_unknown_field_is_none() {
        let mut source = reader("a,b\n1,2\n");
        let row = source.next_row().unwrap().unwrap();
        assert_eq!(row.field("c"), None);
    }

    #[test]
    fn test_empty_values_kept() {
        let mut source = reader("a,b,c\n1,,3\n");
        let row = source.next_row().unwrap().unwrap();
        assert_eq!(row.field("b"), Some(""));
    }

    #[test]
    fn test_whitespace_not_trimmed() {
        let mut source = reader("a\n  x  \n");
        let row = source.next_row().unwrap().unwrap();
        assert_eq!(row.field("a"), Some("  x  "));
    }

    #[test]
    fn test_empty_lines_skipped() {
        let rows: Vec<_> = reader("a,b\n1,2\n\n3,4\n").collect::<Result<_, _>>().unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_ragged_row_is_error() {
        let mut source = reader("a,b\n1,2,3\n");
        assert!(matches!(source.next_row(), Err(SourceError::Csv(_))));
    }

    #[test]
    fn test_duplicate_header_first_wins() {
        let mut source = reader("a,a\n1,2\n");
        let row = source.next_row().unwrap().unwrap();
        assert_eq!(row.field("a"), Some("1"));
    }

    #[test]
    fn test_empty_input_has_no_headers() {
        let result = SourceReader::from_reader("".as_bytes(), b',');
        assert!(matches!(result, Err(SourceError::NoHeaders)));
    }

    #[test]
    fn test_semicolon_delimiter() {
        let mut source = SourceReader::from_reader("a;b\n1;2\n".as_bytes(), b';').unwrap();
        let row = source.next_row().unwrap().unwrap();
        assert_eq!(row.field("b"), Some("2"));
    }

    #[test]
    fn test_utf8_bom_skipped() {
        let bytes = b"\xEF\xBB\xBFname\nAlice\n";
        let mut source =
            SourceReader::decoding(&bytes[..], b',', SourceEncoding::Utf8).unwrap();
        assert_eq!(source.headers(), &["name"]);
        let row = source.next_row().unwrap().unwrap();
        assert_eq!(row.field("name"), Some("Alice"));
    }

    #[test]
    fn test_invalid_utf8_replaced() {
        let bytes: &[u8] = b"a\nok\nbad\xFF\nlater\n";
        let mut source = SourceReader::decoding(bytes, b',', SourceEncoding::Utf8).unwrap();

        let values: Vec<String> = source
            .by_ref()
            .map(|row| row.unwrap().field("a").unwrap_or_default().to_string())
            .collect();
        assert_eq!(values, vec!["ok", "bad\u{FFFD}", "later"]);
    }

    #[test]
    fn test_invalid_utf8_header_replaced() {
        let mut source = SourceReader::from_reader(&b"n\xE9\nx\n"[..], b',').unwrap();
        assert_eq!(source.headers(), &["n\u{FFFD}"]);
        let row = source.next_row().unwrap().unwrap();
        assert_eq!(row.line(), Some(2));
    }

    #[test]
    fn test_windows_1252_decoding() {
        // "Société" in windows-1252
        let bytes: &[u8] = b"name\nSoci\xE9t\xE9\n";
        let mut source =
            SourceReader::decoding(bytes, b',', SourceEncoding::Windows1252).unwrap();
        let row = source.next_row().unwrap().unwrap();
        assert_eq!(row.field("name"), Some("Société"));
    }

    #[test]
    fn test_encoding_names() {
        assert_eq!("UTF-8".parse::<SourceEncoding>().unwrap(), SourceEncoding::Utf8);
        assert_eq!("cp1252".parse::<SourceEncoding>().unwrap(), SourceEncoding::Windows1252);
        assert_eq!("latin1".parse::<SourceEncoding>().unwrap(), SourceEncoding::Latin1);
        assert_eq!("auto".parse::<SourceEncoding>().unwrap(), SourceEncoding::Auto);
        assert!(matches!(
            "ebcdic".parse::<SourceEncoding>(),
            Err(SourceError::UnsupportedEncoding(_))
        ));
    }

    #[test]
    fn test_detect_ascii_as_utf8() {
        assert_eq!(detect_encoding(b"plain ascii text, nothing else"), "utf-8");
    }

    #[test]
    fn test_hashmap_fields() {
        let mut row = HashMap::new();
        row.insert("a".to_string(), "x".to_string());
        assert_eq!(row.field("a"), Some("x"));
        assert_eq!(row.field("b"), None);
    }
}
