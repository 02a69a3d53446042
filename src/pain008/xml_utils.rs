use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use rust_decimal::Decimal;
use std::io::Write;

use crate::core::LastschriftError;

/// Thin element-oriented layer over `quick_xml::Writer`.
pub struct XmlWriter<W: Write> {
    writer: Writer<W>,
}

impl<W: Write> XmlWriter<W> {
    /// Wrap `inner` and emit the XML declaration. An `indent` of 0 writes
    /// everything on one line.
    pub fn new(inner: W, indent: usize) -> Result<Self, LastschriftError> {
        let mut writer = if indent == 0 {
            Writer::new(inner)
        } else {
            Writer::new_with_indent(inner, b' ', indent)
        };
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(Self { writer })
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    pub fn start_element(&mut self, name: &str) -> Result<&mut Self, LastschriftError> {
        self.writer.write_event(Event::Start(BytesStart::new(name)))?;
        Ok(self)
    }

    pub fn start_element_with_attrs(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self, LastschriftError> {
        let mut elem = BytesStart::new(name);
        for (k, v) in attrs {
            check_chars(name, v)?;
            elem.push_attribute((*k, *v));
        }
        self.writer.write_event(Event::Start(elem))?;
        Ok(self)
    }

    pub fn end_element(&mut self, name: &str) -> Result<&mut Self, LastschriftError> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(self)
    }

    /// `<name/>`
    pub fn empty_element(&mut self, name: &str) -> Result<&mut Self, LastschriftError> {
        self.writer.write_event(Event::Empty(BytesStart::new(name)))?;
        Ok(self)
    }

    /// `<name>text</name>`; fails on characters XML 1.0 cannot represent.
    pub fn text_element(&mut self, name: &str, text: &str) -> Result<&mut Self, LastschriftError> {
        check_chars(name, text)?;
        self.start_element(name)?;
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        self.end_element(name)
    }

    /// Write a text element only when a value is present.
    pub fn optional_text_element(
        &mut self,
        name: &str,
        text: Option<&str>,
    ) -> Result<&mut Self, LastschriftError> {
        match text {
            Some(text) => self.text_element(name, text),
            None => Ok(self),
        }
    }

    pub fn text_element_with_attrs(
        &mut self,
        name: &str,
        text: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self, LastschriftError> {
        check_chars(name, text)?;
        self.start_element_with_attrs(name, attrs)?;
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        self.end_element(name)
    }

    /// Write a decimal amount with Ccy attribute.
    pub fn amount_element(
        &mut self,
        name: &str,
        amount: Decimal,
        currency: &str,
    ) -> Result<&mut Self, LastschriftError> {
        self.text_element_with_attrs(name, &format_decimal(amount), &[("Ccy", currency)])
    }

    pub fn bool_element(&mut self, name: &str, value: bool) -> Result<&mut Self, LastschriftError> {
        self.text_element(name, if value { "true" } else { "false" })
    }
}

/// XML 1.0 `Char` production. Escaping cannot help with anything outside it.
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\u{9}'
            | '\u{A}'
            | '\u{D}'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

fn check_chars(element: &str, text: &str) -> Result<(), LastschriftError> {
    match text.chars().find(|c| !is_xml_char(*c)) {
        Some(c) => Err(LastschriftError::Xml(format!(
            "character U+{:04X} cannot appear in <{element}>",
            c as u32
        ))),
        None => Ok(()),
    }
}

/// Amount text: trailing zeros dropped, but never fewer than 2 decimals.
pub fn format_decimal(d: Decimal) -> String {
    let mut value = d.normalize();
    if value.scale() < 2 {
        value.rescale(2);
    }
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn format_decimal_cases() {
        assert_eq!(format_decimal(dec!(100)), "100.00");
        assert_eq!(format_decimal(dec!(20.000)), "20.00");
        assert_eq!(format_decimal(dec!(49.90)), "49.90");
        assert_eq!(format_decimal(dec!(12.345)), "12.345");
        assert_eq!(format_decimal(dec!(0)), "0.00");
        assert_eq!(format_decimal(dec!(-3.5)), "-3.50");
    }

    #[test]
    fn text_is_escaped() {
        let mut w = XmlWriter::new(Vec::new(), 0).unwrap();
        w.text_element("Nm", "Fa. Schmidt & Söhne <GmbH>").unwrap();
        let xml = String::from_utf8(w.into_inner()).unwrap();
        assert!(xml.contains("<Nm>Fa. Schmidt &amp; Söhne &lt;GmbH&gt;</Nm>"));
    }

    #[test]
    fn control_characters_are_rejected() {
        let mut w = XmlWriter::new(Vec::new(), 0).unwrap();
        match w.text_element("Nm", "Max\u{0}Mustermann") {
            Err(LastschriftError::Xml(msg)) => {
                assert_eq!(msg, "character U+0000 cannot appear in <Nm>")
            }
            other => panic!("expected XML error, got {:?}", other.map(|_| ())),
        }
        assert!(w.text_element("Ustrd", "Beitrag\u{1B}").is_err());
        assert!(w.text_element("Ustrd", "\u{FFFE}").is_err());
        assert!(
            w.text_element_with_attrs("InstdAmt", "1.00", &[("Ccy", "EU\u{8}R")])
                .is_err()
        );
        assert!(w.text_element("Ustrd", "Zeile 1\n\tZeile 2\r").is_ok());
        assert!(w.text_element("Ustrd", "Grüße \u{1F600} \u{E000}").is_ok());
    }

    #[test]
    fn empty_and_optional_elements() {
        let mut w = XmlWriter::new(Vec::new(), 0).unwrap();
        w.start_element("UltmtDbtr").unwrap();
        w.optional_text_element("Nm", None).unwrap();
        w.end_element("UltmtDbtr").unwrap();
        w.empty_element("RmtInf").unwrap();
        let xml = String::from_utf8(w.into_inner()).unwrap();
        assert!(xml.ends_with("<UltmtDbtr></UltmtDbtr><RmtInf/>"));
    }
}
