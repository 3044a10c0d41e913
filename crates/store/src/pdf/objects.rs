//! PDF object model
//!
//! The handful of object types the exporter needs to describe image pages:
//! numbers, names, strings, arrays, dictionaries, streams and indirect
//! references.

use std::collections::BTreeMap;
use std::io::{self, Write};

#[derive(Debug, Clone, PartialEq)]
pub enum PdfObject {
    Integer(i64),
    Real(f64),
    String(PdfString),
    Name(String),
    Array(Vec<PdfObject>),
    Dictionary(PdfDictionary),
    Stream(PdfStream),
    /// Indirect reference (object number, generation)
    Reference(u32, u16),
}

impl PdfObject {
    pub fn name(s: impl Into<String>) -> Self {
        PdfObject::Name(s.into())
    }

    pub fn reference(obj_num: u32) -> Self {
        PdfObject::Reference(obj_num, 0)
    }

    /// Text string. Non-ASCII text is written as UTF-16BE with a byte order
    /// mark so document titles keep their diacritics.
    pub fn text(s: &str) -> Self {
        if s.is_ascii() {
            PdfObject::String(PdfString::Literal(s.as_bytes().to_vec()))
        } else {
            let mut bytes = vec![0xFE, 0xFF];
            for unit in s.encode_utf16() {
                bytes.extend_from_slice(&unit.to_be_bytes());
            }
            PdfObject::String(PdfString::Hex(bytes))
        }
    }
}

impl From<i64> for PdfObject {
    fn from(n: i64) -> Self {
        PdfObject::Integer(n)
    }
}

impl From<u32> for PdfObject {
    fn from(n: u32) -> Self {
        PdfObject::Integer(n as i64)
    }
}

impl From<f64> for PdfObject {
    fn from(n: f64) -> Self {
        PdfObject::Real(n)
    }
}

impl From<PdfDictionary> for PdfObject {
    fn from(dict: PdfDictionary) -> Self {
        PdfObject::Dictionary(dict)
    }
}

impl From<Vec<PdfObject>> for PdfObject {
    fn from(arr: Vec<PdfObject>) -> Self {
        PdfObject::Array(arr)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PdfString {
    /// `(...)`
    Literal(Vec<u8>),
    /// `<...>`
    Hex(Vec<u8>),
}

/// Dictionary with deterministic key order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfDictionary {
    entries: BTreeMap<String, PdfObject>,
}

impl PdfDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, type_name: &str) -> Self {
        self.insert("Type", PdfObject::name(type_name));
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PdfObject>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&PdfObject> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PdfObject)> {
        self.entries.iter()
    }
}

/// Stream dictionary plus payload
#[derive(Debug, Clone, PartialEq)]
pub struct PdfStream {
    pub dict: PdfDictionary,
    pub data: Vec<u8>,
    /// Payload is already encoded and carries its own `Filter`
    pub encoded: bool,
}

impl PdfStream {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            dict: PdfDictionary::new(),
            data,
            encoded: false,
        }
    }

    /// Payload already encoded with `filter`
    pub fn encoded(dict: PdfDictionary, data: Vec<u8>, filter: &str) -> Self {
        let mut dict = dict;
        dict.insert("Filter", PdfObject::name(filter));
        Self {
            dict,
            data,
            encoded: true,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Writes objects in PDF syntax
pub struct PdfSerializer<W: Write> {
    writer: W,
}

impl<W: Write> PdfSerializer<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    pub fn write_object(&mut self, obj: &PdfObject) -> io::Result<()> {
        match obj {
            PdfObject::Integer(n) => write!(self.writer, "{}", n),
            PdfObject::Real(n) => write!(self.writer, "{}", format_real(*n)),
            PdfObject::String(s) => self.write_string(s),
            PdfObject::Name(name) => self.write_name(name),
            PdfObject::Array(items) => {
                write!(self.writer, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(self.writer, " ")?;
                    }
                    self.write_object(item)?;
                }
                write!(self.writer, "]")
            }
            PdfObject::Dictionary(dict) => self.write_dictionary(dict),
            PdfObject::Stream(stream) => {
                self.write_dictionary(&stream.dict)?;
                write!(self.writer, "\nstream\n")?;
                self.writer.write_all(&stream.data)?;
                write!(self.writer, "\nendstream")
            }
            PdfObject::Reference(num, generation) => write!(self.writer, "{} {} R", num, generation),
        }
    }

    fn write_string(&mut self, s: &PdfString) -> io::Result<()> {
        match s {
            PdfString::Literal(data) => {
                write!(self.writer, "(")?;
                for &byte in data {
                    match byte {
                        b'(' | b')' | b'\\' => write!(self.writer, "\\{}", byte as char)?,
                        b'\n' => write!(self.writer, "\\n")?,
                        b'\r' => write!(self.writer, "\\r")?,
                        0x20..=0x7E => write!(self.writer, "{}", byte as char)?,
                        _ => write!(self.writer, "\\{:03o}", byte)?,
                    }
                }
                write!(self.writer, ")")
            }
            PdfString::Hex(data) => {
                write!(self.writer, "<")?;
                for byte in data {
                    write!(self.writer, "{:02X}", byte)?;
                }
                write!(self.writer, ">")
            }
        }
    }

    fn write_name(&mut self, name: &str) -> io::Result<()> {
        write!(self.writer, "/")?;
        for byte in name.bytes() {
            let delimiter = b"#()<>[]{}/%".contains(&byte);
            if (0x21..=0x7E).contains(&byte) && !delimiter {
                write!(self.writer, "{}", byte as char)?;
            } else {
                write!(self.writer, "#{:02X}", byte)?;
            }
        }
        Ok(())
    }

    fn write_dictionary(&mut self, dict: &PdfDictionary) -> io::Result<()> {
        write!(self.writer, "<<")?;
        for (key, value) in dict.iter() {
            write!(self.writer, " ")?;
            self.write_name(key)?;
            write!(self.writer, " ")?;
            self.write_object(value)?;
        }
        write!(self.writer, " >>")
    }
}

/// Shortest decimal form with at most four fractional digits
pub(crate) fn format_real(n: f64) -> String {
    if n.fract() == 0.0 {
        return format!("{}", n as i64);
    }
    let s = format!("{:.4}", n);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(obj: &PdfObject) -> String {
        let mut serializer = PdfSerializer::new(Vec::new());
        serializer.write_object(obj).unwrap();
        String::from_utf8(serializer.into_inner()).unwrap()
    }

    #[test]
    fn test_numbers() {
        assert_eq!(render(&PdfObject::Integer(42)), "42");
        assert_eq!(render(&PdfObject::Real(595.0)), "595");
        assert_eq!(render(&PdfObject::Real(595.27559)), "595.2756");
        assert_eq!(render(&PdfObject::Real(-0.00001)), "0");
    }

    #[test]
    fn test_name_escaping() {
        assert_eq!(render(&PdfObject::name("XObject")), "/XObject");
        assert_eq!(render(&PdfObject::name("A B")), "/A#20B");
    }

    #[test]
    fn test_text_strings() {
        assert_eq!(render(&PdfObject::text("Sastro (Alm.)")), "(Sastro \\(Alm.\\))");
        // "é" becomes FEFF 00E9
        assert_eq!(render(&PdfObject::text("é")), "<FEFF00E9>");
    }

    #[test]
    fn test_dictionary_and_reference() {
        let mut dict = PdfDictionary::new().with_type("Page");
        dict.insert("Parent", PdfObject::reference(2));
        assert_eq!(render(&PdfObject::Dictionary(dict)), "<< /Parent 2 0 R /Type /Page >>");
    }

    #[test]
    fn test_encoded_stream() {
        let stream = PdfStream::encoded(PdfDictionary::new(), vec![1, 2, 3], "DCTDecode");
        assert!(stream.encoded);
        assert_eq!(stream.dict.get("Filter"), Some(&PdfObject::name("DCTDecode")));
        assert_eq!(stream.len(), 3);
    }

    #[test]
    fn test_array() {
        let arr = PdfObject::from(vec![PdfObject::Integer(0), PdfObject::Real(841.89)]);
        assert_eq!(render(&arr), "[0 841.89]");
    }
}
