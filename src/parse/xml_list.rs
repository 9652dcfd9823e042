//! Attribute-list XML documents.
//!
//! Exchange and name lists arrive as flat XML: a container element holding a
//! sequence of elements carrying `Code` and `Name` attributes. Document-level
//! breakage is the outer `Err`; a per-element problem (missing attribute) is
//! an inner `Err` so the caller can count it as a row failure and continue.

use anyhow::Context;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

pub(crate) fn read_code_name_rows(
    text: &str,
    element: &[u8],
) -> anyhow::Result<Vec<anyhow::Result<(String, String)>>> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut rows = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.name().as_ref() == element => {
                rows.push(code_name_pair(&e));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(rows)
}

fn code_name_pair(e: &BytesStart<'_>) -> anyhow::Result<(String, String)> {
    let mut code = None;
    let mut name = None;

    for attr in e.attributes() {
        let attr = attr?;
        match attr.key.as_ref() {
            b"Code" => code = Some(attr.unescape_value()?.into_owned()),
            b"Name" => name = Some(attr.unescape_value()?.into_owned()),
            _ => {}
        }
    }

    Ok((
        code.context("missing Code attribute")?,
        name.context("missing Name attribute")?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_empty_and_paired_elements() {
        let doc = r#"<?xml version="1.0"?>
<ArrayOfEXCHANGE>
  <EXCHANGE Code="NYSE" Name="New York Stock Exchange"/>
  <EXCHANGE Code="AMEX" Name="American Stock Exchange"></EXCHANGE>
</ArrayOfEXCHANGE>"#;

        let rows = read_code_name_rows(doc, b"EXCHANGE").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].as_ref().unwrap(),
            &(
                "NYSE".to_string(),
                "New York Stock Exchange".to_string()
            )
        );
    }

    #[test]
    fn missing_attribute_is_a_row_failure() {
        let doc = r#"<ArrayOfSYMBOL><SYMBOL Code="AAPL"/></ArrayOfSYMBOL>"#;
        let rows = read_code_name_rows(doc, b"SYMBOL").unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_err());
    }

    #[test]
    fn broken_document_is_a_file_failure() {
        assert!(read_code_name_rows("<ArrayOfSYMBOL><SYM", b"SYMBOL").is_err());
    }

    #[test]
    fn entities_are_unescaped() {
        let doc = r#"<ArrayOfSYMBOL><SYMBOL Code="T" Name="AT&amp;T Inc"/></ArrayOfSYMBOL>"#;
        let rows = read_code_name_rows(doc, b"SYMBOL").unwrap();
        assert_eq!(rows[0].as_ref().unwrap().1, "AT&T Inc");
    }
}
