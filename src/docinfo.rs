//! Invoice metadata stamping.
//!
//! File names follow the invoice convention `"NUMBER CLIENT PROJECT.pdf"`,
//! e.g. `3001694 MING RONG YUAN 215079C001-F25-20700A-MRY.pdf`. The parsed
//! fields are written into the document's Info dictionary before the file
//! is protected. Stamping is best-effort: an unparseable name never fails
//! the file.

use std::path::Path;

use lopdf::{Dictionary, Document, Object};

/// Invoice fields recovered from a file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillInfo {
    pub bill: String,
    pub customer: String,
    pub project: String,
}

/// Parses an invoice-style file name.
///
/// The first token is the bill number. Customer tokens run until the first
/// token that contains a hyphen or, past the second position, starts with a
/// digit; everything from there on is the project. Returns `None` when the
/// name has fewer than two tokens.
pub fn parse_file_name(file_name: &str) -> Option<BillInfo> {
    let stem = Path::new(file_name).file_stem()?.to_str()?;
    let parts: Vec<&str> = stem.split_whitespace().collect();
    if parts.len() < 2 {
        return None;
    }

    let bill = parts[0].to_string();
    let mut customer_parts: Vec<&str> = Vec::new();
    let mut project_parts: Vec<&str> = Vec::new();

    for (i, part) in parts.iter().copied().enumerate().skip(1) {
        let starts_with_digit = part.chars().next().is_some_and(|c| c.is_ascii_digit());
        if part.contains('-') || (starts_with_digit && i > 1) {
            project_parts = parts[i..].to_vec();
            break;
        }
        customer_parts.push(part);
    }

    // No project marker found: with three or more tokens the last one is the
    // project, otherwise everything after the bill number is the customer.
    if project_parts.is_empty() && parts.len() > 2 {
        project_parts = vec![parts[parts.len() - 1]];
        customer_parts = parts[1..parts.len() - 1].to_vec();
    } else if project_parts.is_empty() {
        customer_parts = parts[1..].to_vec();
    }

    Some(BillInfo {
        bill,
        customer: customer_parts.join(" "),
        project: project_parts.join(" "),
    })
}

/// Writes the parsed fields into the document's Info dictionary, creating
/// the dictionary when the document has none.
pub fn stamp(doc: &mut Document, info: &BillInfo) {
    let title = format!("Bill {}", info.bill);
    let subject = format!("Client: {} for project: {}", info.customer, info.project);

    let Some(dict) = info_dict_mut(doc) else {
        return;
    };
    dict.set("Title", Object::string_literal(title));
    dict.set("Subject", Object::string_literal(subject));
    dict.set("Bill", Object::string_literal(info.bill.clone()));
    dict.set("Customer", Object::string_literal(info.customer.clone()));
    dict.set("Project", Object::string_literal(info.project.clone()));
}

fn info_dict_mut(doc: &mut Document) -> Option<&mut Dictionary> {
    let info_id = match doc.trailer.get(b"Info").and_then(Object::as_reference) {
        Ok(id) => id,
        Err(_) => {
            let id = doc.add_object(Object::Dictionary(Dictionary::new()));
            doc.trailer.set("Info", Object::Reference(id));
            id
        }
    };
    doc.get_object_mut(info_id).ok()?.as_dict_mut().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hyphenated_project() {
        let info = parse_file_name("3001694 MING RONG YUAN 215079C001-F25-20700A-MRY.pdf").unwrap();
        assert_eq!(info.bill, "3001694");
        assert_eq!(info.customer, "MING RONG YUAN");
        assert_eq!(info.project, "215079C001-F25-20700A-MRY");
    }

    #[test]
    fn digit_leading_token_starts_the_project() {
        let info = parse_file_name("123 ACME 456.pdf").unwrap();
        assert_eq!(info.bill, "123");
        assert_eq!(info.customer, "ACME");
        assert_eq!(info.project, "456");
    }

    #[test]
    fn last_token_is_project_when_no_marker_matches() {
        let info = parse_file_name("100 ALPHA BETA.pdf").unwrap();
        assert_eq!(info.customer, "ALPHA");
        assert_eq!(info.project, "BETA");
    }

    #[test]
    fn two_tokens_leave_the_project_empty() {
        let info = parse_file_name("100 ACME.pdf").unwrap();
        assert_eq!(info.customer, "ACME");
        assert_eq!(info.project, "");
    }

    #[test]
    fn single_token_is_unparseable() {
        assert!(parse_file_name("invoice.pdf").is_none());
    }

    #[test]
    fn stamp_fills_the_info_dictionary() {
        let mut doc = Document::with_version("1.5");
        let info = BillInfo {
            bill: "3001694".into(),
            customer: "MING RONG YUAN".into(),
            project: "215079C001".into(),
        };
        stamp(&mut doc, &info);

        let info_id = doc
            .trailer
            .get(b"Info")
            .and_then(Object::as_reference)
            .unwrap();
        let dict = doc.get_object(info_id).unwrap().as_dict().unwrap();
        match dict.get(b"Title").unwrap() {
            Object::String(bytes, _) => assert_eq!(bytes, b"Bill 3001694"),
            other => panic!("unexpected Title object: {other:?}"),
        }
        match dict.get(b"Customer").unwrap() {
            Object::String(bytes, _) => assert_eq!(bytes, b"MING RONG YUAN"),
            other => panic!("unexpected Customer object: {other:?}"),
        }
    }
}
