//! Four-line text encoding of records.
//!
//! Each record is written as `id`, `name`, `quantity`, `unit_price`, one
//! field per line, with no header, count, or blank line between records.
//! Decoding works on an in-memory buffer so callers never hand the codec a
//! file handle.

use std::io::{self, Write};

use stockfile_core::{DomainError, ItemId};
use thiserror::Error;

use crate::record::Record;

/// Field of the four-line record layout.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Field {
    Id,
    Name,
    Quantity,
    UnitPrice,
}

impl core::fmt::Display for Field {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Field::Id => "id",
            Field::Name => "name",
            Field::Quantity => "quantity",
            Field::UnitPrice => "unit price",
        })
    }
}

/// Why decoding stopped before the end of the buffer.
///
/// `record` is the zero-based position of the record being read.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CodecError {
    #[error("record {record}: unexpected end of input while reading {field}")]
    UnexpectedEof { record: usize, field: Field },

    #[error("record {record}: invalid {field} `{token}`")]
    InvalidNumber {
        record: usize,
        field: Field,
        token: String,
    },

    #[error("record {record}: {source}")]
    InvalidRecord {
        record: usize,
        #[source]
        source: DomainError,
    },
}

/// Write one record as four consecutive lines.
pub fn write_record<W: Write>(sink: &mut W, record: &Record) -> io::Result<()> {
    sink.write_all(encode_one(record).as_bytes())
}

/// Encode a record sequence into the backing-file layout, in order.
pub fn encode(records: &[Record]) -> String {
    records.iter().map(encode_one).collect()
}

fn encode_one(record: &Record) -> String {
    format!(
        "{}\n{}\n{}\n{}\n",
        record.id_typed(),
        record.name(),
        record.quantity(),
        record.unit_price()
    )
}

/// Result of decoding a whole buffer.
#[derive(Debug, Default, PartialEq)]
pub struct Decoded {
    /// Records parsed before the buffer ended or a record failed.
    pub records: Vec<Record>,
    /// Set when decoding stopped on a malformed or truncated record.
    pub error: Option<CodecError>,
}

/// Decode every well-formed record from the start of `src`.
///
/// Decoding stops at the first record that cannot be read; everything before
/// it is kept.
pub fn decode(src: &str) -> Decoded {
    let mut reader = RecordReader::new(src);
    let records = reader.by_ref().collect();
    Decoded {
        records,
        error: reader.into_error(),
    }
}

/// Iterator over the records of a buffer.
///
/// Yields records until the input is exhausted or a record is malformed, then
/// stays finished. The stop reason, if any, is returned by `into_error`.
#[derive(Debug)]
pub struct RecordReader<'a> {
    src: &'a str,
    pos: usize,
    index: usize,
    error: Option<CodecError>,
    done: bool,
}

impl<'a> RecordReader<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            index: 0,
            error: None,
            done: false,
        }
    }

    pub fn into_error(self) -> Option<CodecError> {
        self.error
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    /// Next whitespace-delimited token, skipping leading whitespace and line breaks.
    fn token(&mut self) -> Option<&'a str> {
        self.skip_whitespace();
        let rest = self.rest();
        if rest.is_empty() {
            return None;
        }
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        self.pos += end;
        Some(&rest[..end])
    }

    /// Discard everything up to and including the next line break.
    fn skip_line(&mut self) {
        let rest = self.rest();
        self.pos += rest.find('\n').map(|idx| idx + 1).unwrap_or(rest.len());
    }

    /// Read one full line without its terminator; `None` at end of input.
    fn line(&mut self) -> Option<&'a str> {
        let rest = self.rest();
        if rest.is_empty() {
            return None;
        }
        let (line, consumed) = match rest.find('\n') {
            Some(idx) => (&rest[..idx], idx + 1),
            None => (rest, rest.len()),
        };
        self.pos += consumed;
        Some(line.strip_suffix('\r').unwrap_or(line))
    }

    fn number<T: core::str::FromStr>(&mut self, field: Field) -> Result<T, CodecError> {
        let record = self.index;
        let token = self
            .token()
            .ok_or(CodecError::UnexpectedEof { record, field })?;
        token.parse::<T>().map_err(|_| CodecError::InvalidNumber {
            record,
            field,
            token: token.to_string(),
        })
    }

    fn read_record(&mut self) -> Result<Option<Record>, CodecError> {
        self.skip_whitespace();
        if self.rest().is_empty() {
            return Ok(None);
        }

        let record = self.index;
        let id: i64 = self.number(Field::Id)?;
        self.skip_line();
        let name = self.line().ok_or(CodecError::UnexpectedEof {
            record,
            field: Field::Name,
        })?;
        let quantity: i64 = self.number(Field::Quantity)?;
        let unit_price: f64 = self.number(Field::UnitPrice)?;

        Record::new(ItemId::new(id), name, quantity, unit_price)
            .map(Some)
            .map_err(|source| CodecError::InvalidRecord { record, source })
    }
}

impl Iterator for RecordReader<'_> {
    type Item = Record;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_record() {
            Ok(Some(record)) => {
                self.index += 1;
                Some(record)
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                self.error = Some(err);
                None
            }
        }
    }
}

impl core::iter::FusedIterator for RecordReader<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, name: &str, quantity: i64, unit_price: f64) -> Record {
        Record::new(ItemId::new(id), name, quantity, unit_price).unwrap()
    }

    #[test]
    fn encode_writes_four_lines_per_record() {
        let records = vec![record(1, "Bolt", 100, 0.5), record(2, "Wing Nut", 200, 0.25)];
        assert_eq!(encode(&records), "1\nBolt\n100\n0.5\n2\nWing Nut\n200\n0.25\n");
    }

    #[test]
    fn encode_uses_default_number_formatting() {
        let records = vec![record(-4, "Washer", -10, 100.0)];
        assert_eq!(encode(&records), "-4\nWasher\n-10\n100\n");
    }

    #[test]
    fn write_record_matches_encode() {
        let bolt = record(7, "Bolt", 3, 1.75);
        let mut sink = Vec::new();
        write_record(&mut sink, &bolt).unwrap();
        assert_eq!(String::from_utf8(sink).unwrap(), encode(&[bolt]));
    }

    #[test]
    fn decode_reads_records_in_order() {
        let decoded = decode("1\nBolt\n100\n0.5\n2\nWing Nut\n200\n0.25\n");
        assert_eq!(decoded.error, None);
        assert_eq!(
            decoded.records,
            vec![record(1, "Bolt", 100, 0.5), record(2, "Wing Nut", 200, 0.25)]
        );
    }

    #[test]
    fn decode_empty_and_blank_input() {
        for src in ["", "\n", "\r\n", "  \n\n"] {
            let decoded = decode(src);
            assert!(decoded.records.is_empty(), "input {src:?}");
            assert_eq!(decoded.error, None, "input {src:?}");
        }
    }

    #[test]
    fn decode_accepts_missing_final_newline_and_crlf() {
        let decoded = decode("1\r\nBolt\r\n100\r\n0.5");
        assert_eq!(decoded.error, None);
        assert_eq!(decoded.records, vec![record(1, "Bolt", 100, 0.5)]);
    }

    #[test]
    fn decode_preserves_spaces_in_name() {
        let decoded = decode("3\n  Hex  Bolt M8 \n5\n0.1\n");
        assert_eq!(decoded.records[0].name(), "  Hex  Bolt M8 ");
    }

    #[test]
    fn decode_discards_rest_of_id_line() {
        let decoded = decode("3 trailing\nBolt\n5\n0.1\n");
        assert_eq!(decoded.error, None);
        assert_eq!(decoded.records, vec![record(3, "Bolt", 5, 0.1)]);
    }

    #[test]
    fn decode_keeps_records_before_truncated_tail() {
        let decoded = decode("1\nBolt\n100\n0.5\n2\nNut\n");
        assert_eq!(decoded.records, vec![record(1, "Bolt", 100, 0.5)]);
        assert_eq!(
            decoded.error,
            Some(CodecError::UnexpectedEof {
                record: 1,
                field: Field::Quantity,
            })
        );
    }

    #[test]
    fn decode_stops_at_garbled_record() {
        let decoded = decode("1\nBolt\n100\n0.5\nabc\nNut\n1\n1\n3\nWasher\n1\n1\n");
        assert_eq!(decoded.records.len(), 1);
        match decoded.error {
            Some(CodecError::InvalidNumber { record, field, token }) => {
                assert_eq!(record, 1);
                assert_eq!(field, Field::Id);
                assert_eq!(token, "abc");
            }
            other => panic!("expected InvalidNumber, got {other:?}"),
        }
    }

    #[test]
    fn decode_rejects_bad_price() {
        let decoded = decode("1\nBolt\n100\ncheap\n");
        assert!(decoded.records.is_empty());
        assert!(matches!(
            decoded.error,
            Some(CodecError::InvalidNumber {
                field: Field::UnitPrice,
                ..
            })
        ));
    }

    #[test]
    fn decode_reports_missing_name() {
        let decoded = decode("9\n");
        assert_eq!(
            decoded.error,
            Some(CodecError::UnexpectedEof {
                record: 0,
                field: Field::Name,
            })
        );
    }

    #[test]
    fn reader_stays_finished_after_error() {
        let mut reader = RecordReader::new("x\n");
        assert!(reader.next().is_none());
        assert!(reader.next().is_none());
        assert!(reader.into_error().is_some());
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_record() -> impl Strategy<Value = Record> {
            (
                any::<i64>(),
                "[^\r\n]{0,40}",
                any::<i64>(),
                -1.0e12f64..1.0e12f64,
            )
                .prop_map(|(id, name, quantity, unit_price)| {
                    Record::new(ItemId::new(id), name, quantity, unit_price).unwrap()
                })
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: decoding an encoded sequence reproduces it field-for-field.
            #[test]
            fn encode_decode_reproduces_records(records in prop::collection::vec(arb_record(), 0..20)) {
                let decoded = decode(&encode(&records));
                prop_assert_eq!(decoded.error, None);
                prop_assert_eq!(decoded.records, records);
            }
        }
    }
}
