//! Framing for TLV records.
//!
//! This is only the envelope: `bigsize(type) || bigsize(length) || value`. Interpreting the value
//! of any particular record type is left to the codec that owns the message schema. The commitment
//! only ever needs each record's exact wire bytes and the concatenation of the whole stream.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{TlvError, TlvResult};

/// Appends the BigSize encoding of `value` to `buf`.
///
/// | Range | Encoding |
/// |-------|----------|
/// | `< 0xfd` | 1 byte |
/// | `<= 0xffff` | `0xfd` followed by 2 bytes big-endian |
/// | `<= 0xffff_ffff` | `0xfe` followed by 4 bytes big-endian |
/// | otherwise | `0xff` followed by 8 bytes big-endian |
pub fn write_bigsize(buf: &mut Vec<u8>, value: u64) {
    match value {
        0..=0xfc => buf.push(value as u8),
        0xfd..=0xffff => {
            buf.push(0xfd);
            buf.extend_from_slice(&(value as u16).to_be_bytes());
        }
        0x1_0000..=0xffff_ffff => {
            buf.push(0xfe);
            buf.extend_from_slice(&(value as u32).to_be_bytes());
        }
        _ => {
            buf.push(0xff);
            buf.extend_from_slice(&value.to_be_bytes());
        }
    }
}

/// Reads a BigSize value from the front of `cursor`, advancing it.
///
/// Non-minimal encodings are rejected.
pub fn read_bigsize(cursor: &mut &[u8]) -> TlvResult<u64> {
    let (&prefix, rest) = cursor.split_first().ok_or(TlvError::Truncated)?;

    let (value, width, min) = match prefix {
        0xfd => (take_be(rest, 2)?, 2, 0xfd),
        0xfe => (take_be(rest, 4)?, 4, 0x1_0000),
        0xff => (take_be(rest, 8)?, 8, 0x1_0000_0000),
        _ => {
            *cursor = rest;
            return Ok(prefix as u64);
        }
    };

    if value < min {
        return Err(TlvError::NonMinimalBigSize);
    }

    *cursor = &rest[width..];
    Ok(value)
}

fn take_be(bytes: &[u8], width: usize) -> TlvResult<u64> {
    let raw = bytes.get(..width).ok_or(TlvError::Truncated)?;
    Ok(raw.iter().fold(0u64, |acc, b| (acc << 8) | *b as u64))
}

/// Encodes `value` as a truncated u64: big-endian with leading zero bytes stripped.
pub fn tu64(value: u64) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    let skip = (value.leading_zeros() / 8) as usize;
    bytes[skip..].to_vec()
}

/// A single TLV record in its exact wire form.
///
/// Serializes as the hex of its wire bytes; deserializing goes through [`TlvRecord::from_wire`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TlvRecord {
    /// The record type.
    record_type: u64,

    /// Length of `bigsize(type) || bigsize(len)`.
    header_len: usize,

    /// `bigsize(type) || bigsize(len) || value`.
    wire: Vec<u8>,
}

impl TlvRecord {
    /// Frames `value` as a record of type `record_type`.
    pub fn new(record_type: u64, value: &[u8]) -> Self {
        let mut wire = Vec::with_capacity(value.len() + 18);
        write_bigsize(&mut wire, record_type);
        write_bigsize(&mut wire, value.len() as u64);
        let header_len = wire.len();
        wire.extend_from_slice(value);

        Self {
            record_type,
            header_len,
            wire,
        }
    }

    /// Takes pre-encoded wire bytes of exactly one record.
    ///
    /// The header is checked against the payload length, but the bytes are kept verbatim.
    pub fn from_wire(wire: &[u8]) -> TlvResult<Self> {
        let mut cursor = wire;
        let record = Self::read(&mut cursor)?;

        if !cursor.is_empty() {
            return Err(TlvError::LengthMismatch {
                declared: record.value().len() as u64,
                actual: wire.len() - record.header_len,
            });
        }

        Ok(record)
    }

    /// Reads one record from the front of `cursor`, advancing it.
    fn read(cursor: &mut &[u8]) -> TlvResult<Self> {
        let start = *cursor;
        let record_type = read_bigsize(cursor)?;
        let declared = read_bigsize(cursor)?;
        let header_len = start.len() - cursor.len();

        let len = usize::try_from(declared).map_err(|_| TlvError::Truncated)?;
        if cursor.len() < len {
            return Err(TlvError::LengthMismatch {
                declared,
                actual: cursor.len(),
            });
        }

        *cursor = &cursor[len..];
        let consumed = start.len() - cursor.len();

        Ok(Self {
            record_type,
            header_len,
            wire: start[..consumed].to_vec(),
        })
    }

    /// The record type.
    pub const fn record_type(&self) -> u64 {
        self.record_type
    }

    /// The full wire encoding, header included.
    pub fn wire(&self) -> &[u8] {
        &self.wire
    }

    /// The payload without the header.
    pub fn value(&self) -> &[u8] {
        &self.wire[self.header_len..]
    }
}

impl Serialize for TlvRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        hex::serde::serialize(&self.wire, serializer)
    }
}

impl<'de> Deserialize<'de> for TlvRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire: Vec<u8> = hex::serde::deserialize(deserializer)?;
        Self::from_wire(&wire).map_err(de::Error::custom)
    }
}

impl AsRef<[u8]> for TlvRecord {
    fn as_ref(&self) -> &[u8] {
        &self.wire
    }
}

/// An ordered sequence of records with strictly ascending types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TlvRecord>", into = "Vec<TlvRecord>")]
pub struct TlvStream {
    records: Vec<TlvRecord>,
}

impl TlvStream {
    /// Builds a stream, rejecting records that are not in strictly ascending type order.
    ///
    /// Records are never re-sorted.
    pub fn new(records: Vec<TlvRecord>) -> TlvResult<Self> {
        for pair in records.windows(2) {
            let (previous, current) = (pair[0].record_type, pair[1].record_type);
            if current <= previous {
                return Err(TlvError::UnorderedRecords { previous, current });
            }
        }

        Ok(Self { records })
    }

    /// Splits a concatenated wire stream into its records.
    pub fn parse(mut bytes: &[u8]) -> TlvResult<Self> {
        let mut records = Vec::new();
        while !bytes.is_empty() {
            records.push(TlvRecord::read(&mut bytes)?);
        }

        Self::new(records)
    }

    /// The records in stream order.
    pub fn records(&self) -> &[TlvRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the stream has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The concatenation of every record's wire bytes.
    pub fn concat(&self) -> Vec<u8> {
        self.records.iter().flat_map(|r| r.wire.iter().copied()).collect()
    }
}

impl TryFrom<Vec<TlvRecord>> for TlvStream {
    type Error = TlvError;

    fn try_from(records: Vec<TlvRecord>) -> TlvResult<Self> {
        Self::new(records)
    }
}

impl From<TlvStream> for Vec<TlvRecord> {
    fn from(stream: TlvStream) -> Self {
        stream.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bigsize_boundaries() {
        let cases: &[(u64, &str)] = &[
            (0, "00"),
            (252, "fc"),
            (253, "fd00fd"),
            (65535, "fdffff"),
            (65536, "fe00010000"),
            (4294967295, "feffffffff"),
            (4294967296, "ff0000000100000000"),
            (u64::MAX, "ffffffffffffffffff"),
        ];

        for (value, encoded) in cases {
            let mut buf = Vec::new();
            write_bigsize(&mut buf, *value);
            assert_eq!(hex::encode(&buf), *encoded, "encoding {value}");

            let bytes = hex::decode(encoded).unwrap();
            let mut cursor = &bytes[..];
            assert_eq!(read_bigsize(&mut cursor).unwrap(), *value);
            assert!(cursor.is_empty());
        }
    }

    #[test]
    fn bigsize_rejects_non_minimal() {
        for encoded in ["fd00fc", "fe0000ffff", "ff00000000ffffffff"] {
            let bytes = hex::decode(encoded).unwrap();
            assert_eq!(
                read_bigsize(&mut &bytes[..]),
                Err(TlvError::NonMinimalBigSize),
                "{encoded}"
            );
        }
    }

    #[test]
    fn bigsize_truncated() {
        for encoded in ["", "fd00", "fe0001", "ff00000001"] {
            let bytes = hex::decode(encoded).unwrap();
            assert_eq!(read_bigsize(&mut &bytes[..]), Err(TlvError::Truncated));
        }
    }

    #[test]
    fn tu64_strips_leading_zeros() {
        assert_eq!(tu64(0), Vec::<u8>::new());
        assert_eq!(tu64(1), vec![1]);
        assert_eq!(tu64(1000), vec![0x03, 0xe8]);
        assert_eq!(tu64(u64::MAX), vec![0xff; 8]);
    }

    #[test]
    fn record_framing() {
        let record = TlvRecord::new(1, &tu64(1000));
        assert_eq!(hex::encode(record.wire()), "010203e8");
        assert_eq!(record.record_type(), 1);
        assert_eq!(record.value(), &[0x03, 0xe8]);

        let parsed = TlvRecord::from_wire(record.wire()).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn record_from_wire_checks_length() {
        let short = hex::decode("010303e8").unwrap();
        assert!(matches!(
            TlvRecord::from_wire(&short),
            Err(TlvError::LengthMismatch {
                declared: 3,
                actual: 2
            })
        ));

        let long = hex::decode("010203e800").unwrap();
        assert!(matches!(
            TlvRecord::from_wire(&long),
            Err(TlvError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn stream_requires_ascending_types() {
        let one = TlvRecord::new(1, &tu64(1000));
        let two = TlvRecord::new(2, &[0, 0, 1, 0, 0, 2, 0, 3]);

        assert!(TlvStream::new(vec![one.clone(), two.clone()]).is_ok());
        assert_eq!(
            TlvStream::new(vec![two, one.clone()]),
            Err(TlvError::UnorderedRecords {
                previous: 2,
                current: 1
            })
        );
        assert_eq!(
            TlvStream::new(vec![one.clone(), one]),
            Err(TlvError::UnorderedRecords {
                previous: 1,
                current: 1
            })
        );
    }

    #[test]
    fn stream_parse_and_concat() {
        let all = hex::decode("010203e802080000010000020003").unwrap();
        let stream = TlvStream::parse(&all).unwrap();

        assert_eq!(stream.len(), 2);
        assert_eq!(stream.records()[1].record_type(), 2);
        assert_eq!(stream.concat(), all);
    }

    #[test]
    fn record_json_is_its_wire_hex() {
        let record = TlvRecord::new(2, &[0, 0, 1, 0, 0, 2, 0, 3]);
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, "\"02080000010000020003\"");

        let back: TlvRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
        assert_eq!(back.value(), record.value());
    }

    #[test]
    fn record_json_goes_through_wire_checks() {
        assert!(serde_json::from_str::<TlvRecord>("\"fd\"").is_err());
        assert!(serde_json::from_str::<TlvRecord>("\"010303e8\"").is_err());
        assert!(serde_json::from_str::<TlvRecord>("\"010203e800\"").is_err());
    }

    #[test]
    fn stream_json_rejects_unordered_records() {
        let ordered = serde_json::from_str::<TlvStream>(r#"["010203e8", "02080000010000020003"]"#)
            .unwrap();
        assert_eq!(ordered.records()[0].record_type(), 1);
        assert_eq!(
            serde_json::to_string(&ordered).unwrap(),
            r#"["010203e8","02080000010000020003"]"#
        );

        let err = serde_json::from_str::<TlvStream>(r#"["02080000010000020003", "010203e8"]"#)
            .unwrap_err();
        assert!(err.to_string().contains("record type 1 follows type 2"));
    }

    #[test]
    fn value_skips_multi_byte_header() {
        let payload = vec![0xab; 300];
        let record = TlvRecord::new(0x1_0000, &payload);
        assert_eq!(record.value(), &payload[..]);

        let parsed = TlvRecord::from_wire(record.wire()).unwrap();
        assert_eq!(parsed.value(), &payload[..]);
        assert_eq!(parsed, record);
    }
}
