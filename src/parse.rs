//! MIME parsing into an assertable structure

use crate::error::{Error, Result};
use crate::message::{ParsedAttachment, ParsedMessage, RawMessage};
use chrono::DateTime;
use mailparse::{DispositionType, MailHeaderMap, ParsedMail};

/// Decode raw RFC 2822 bytes into a [`ParsedMessage`].
///
/// Pure and synchronous; parsing the same bytes twice yields equal
/// results. Encoded-word headers are decoded, bodies are transfer-
/// and charset-decoded, and attachments come out in document order.
///
/// # Errors
///
/// Returns an error if the message structure or a part's transfer
/// encoding cannot be decoded.
pub fn parse_message(raw: &RawMessage) -> Result<ParsedMessage> {
    let mail = mailparse::parse_mail(&raw.body).map_err(|e| Error::Parse(e.to_string()))?;

    let mut parsed = ParsedMessage {
        subject: mail.headers.get_first_value("Subject").unwrap_or_default(),
        from: mail.headers.get_first_value("From"),
        to: recipient_addresses(&mail)?,
        date: mail
            .headers
            .get_first_value("Date")
            .and_then(|d| mailparse::dateparse(&d).ok())
            .and_then(|secs| DateTime::from_timestamp(secs, 0)),
        text: None,
        html: None,
        attachments: Vec::new(),
    };

    collect_parts(&mail, &mut parsed)?;
    Ok(parsed)
}

fn recipient_addresses(mail: &ParsedMail<'_>) -> Result<Vec<String>> {
    let Some(header) = mail.headers.get_first_header("To") else {
        return Ok(Vec::new());
    };

    let addrs = mailparse::addrparse_header(header).map_err(|e| Error::Parse(e.to_string()))?;
    Ok(addrs
        .iter()
        .flat_map(|addr| match addr {
            mailparse::MailAddr::Single(single) => vec![single.addr.clone()],
            mailparse::MailAddr::Group(group) => {
                group.addrs.iter().map(|s| s.addr.clone()).collect()
            }
        })
        .collect())
}

/// Depth-first walk over the part tree. Containers recurse; leaves
/// land in `out` via [`classify_leaf`].
fn collect_parts(part: &ParsedMail<'_>, out: &mut ParsedMessage) -> Result<()> {
    if part.subparts.is_empty() {
        classify_leaf(part, out)
    } else {
        for sub in &part.subparts {
            collect_parts(sub, out)?;
        }
        Ok(())
    }
}

fn classify_leaf(part: &ParsedMail<'_>, out: &mut ParsedMessage) -> Result<()> {
    let disposition = part.get_content_disposition();
    let filename = disposition.params.get("filename").cloned();
    let is_attachment = disposition.disposition == DispositionType::Attachment
        || (disposition.disposition == DispositionType::Inline && filename.is_some());

    if is_attachment {
        let content = part
            .get_body_raw()
            .map_err(|e| Error::Parse(e.to_string()))?;
        let filename = filename
            .or_else(|| part.ctype.params.get("name").cloned())
            .unwrap_or_else(|| format!("attachment-{}", out.attachments.len()));

        out.attachments.push(ParsedAttachment {
            filename,
            content_type: part.ctype.mimetype.clone(),
            content,
        });
        return Ok(());
    }

    match part.ctype.mimetype.as_str() {
        "text/html" if out.html.is_none() => {
            out.html = Some(part.get_body().map_err(|e| Error::Parse(e.to_string()))?);
        }
        "text/plain" if out.text.is_none() => {
            out.text = Some(part.get_body().map_err(|e| Error::Parse(e.to_string()))?);
        }
        _ => {}
    }
    Ok(())
}
