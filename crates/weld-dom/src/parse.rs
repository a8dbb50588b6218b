//! Permissive HTML fragment parser.
//!
//! Accepts the markup this editor reads and writes: lowercase-or-not tags,
//! void elements, bare and single-quoted attributes, comments, doctypes and
//! raw-text elements. Text and entities pass through verbatim so that a
//! parse/serialize round trip does not rewrite untouched content.
//!
//! Recovery rules: a stray closing tag is dropped, unclosed elements are
//! implicitly closed at end of input, and a lone `<` that does not start a
//! tag construct is literal text. Only unterminated constructs (an open tag
//! or comment cut off by end of input) are hard errors.

use crate::DomError;
use crate::document::Document;
use crate::node::{ElementData, NodeData, is_raw_text, is_void};
use crate::NodeId;

/// Parse markup into detached nodes in `doc`'s arena, returning the
/// top-level ids in document order.
pub(crate) fn parse_into(doc: &mut Document, input: &str) -> Result<Vec<NodeId>, DomError> {
    Parser {
        doc,
        input,
        pos: 0,
        roots: Vec::new(),
        stack: Vec::new(),
    }
    .run()
}

struct Parser<'d, 'i> {
    doc: &'d mut Document,
    input: &'i str,
    pos: usize,
    roots: Vec<NodeId>,
    stack: Vec<NodeId>,
}

impl Parser<'_, '_> {
    fn run(mut self) -> Result<Vec<NodeId>, DomError> {
        while self.pos < self.input.len() {
            let rest = &self.input[self.pos..];
            if let Some(comment) = rest.strip_prefix("<!--") {
                self.comment(comment)?;
            } else if rest.starts_with("<!") {
                self.doctype()?;
            } else if rest.starts_with("</") {
                self.close_tag()?;
            } else if rest.starts_with('<') && rest[1..].starts_with(|c: char| c.is_ascii_alphabetic())
            {
                self.open_tag()?;
            } else {
                self.text();
            }
        }
        // Unclosed elements are implicitly closed at end of input.
        Ok(self.roots)
    }

    fn attach(&mut self, id: NodeId) {
        match self.stack.last().copied() {
            Some(parent) => {
                self.doc.node_mut(id).parent = Some(parent);
                self.doc
                    .element_mut(parent)
                    .expect("open-element stack holds elements only")
                    .children
                    .push(id);
            }
            None => self.roots.push(id),
        }
    }

    fn comment(&mut self, after_open: &str) -> Result<(), DomError> {
        let Some(end) = after_open.find("-->") else {
            return Err(DomError::Parse("unterminated comment".to_owned()));
        };
        let body = after_open[..end].to_owned();
        self.pos += 4 + end + 3;
        let id = self.doc.alloc(NodeData::Comment(body));
        self.attach(id);
        Ok(())
    }

    fn doctype(&mut self) -> Result<(), DomError> {
        let rest = &self.input[self.pos..];
        let Some(end) = rest.find('>') else {
            return Err(DomError::Parse("unterminated declaration".to_owned()));
        };
        let body = rest[2..end].to_owned();
        self.pos += end + 1;
        let id = self.doc.alloc(NodeData::Doctype(body));
        self.attach(id);
        Ok(())
    }

    fn close_tag(&mut self) -> Result<(), DomError> {
        let rest = &self.input[self.pos..];
        let Some(end) = rest.find('>') else {
            return Err(DomError::Parse("unterminated closing tag".to_owned()));
        };
        let name = rest[2..end].trim().to_ascii_lowercase();
        self.pos += end + 1;

        // Pop through implicitly-closed elements to the matching open tag.
        // A closing tag with no open counterpart is dropped.
        let open_slot = self
            .stack
            .iter()
            .rposition(|&id| self.doc.tag(id) == Some(name.as_str()));
        match open_slot {
            Some(slot) => self.stack.truncate(slot),
            None => tracing::debug!(tag = %name, "dropping stray closing tag"),
        }
        Ok(())
    }

    fn open_tag(&mut self) -> Result<(), DomError> {
        let start = self.pos;
        self.pos += 1; // consume '<'
        let tag = self.tag_name();
        let mut attrs = Vec::new();
        let mut self_closing = false;

        loop {
            self.skip_whitespace();
            let Some(ch) = self.peek() else {
                return Err(DomError::Parse(format!(
                    "unterminated tag: {:?}",
                    truncated(&self.input[start..])
                )));
            };
            match ch {
                '>' => {
                    self.pos += 1;
                    break;
                }
                '/' => {
                    self.pos += 1;
                    if self.peek() == Some('>') {
                        self.pos += 1;
                        self_closing = true;
                        break;
                    }
                    // Lone slash inside a tag, skip it.
                }
                _ => attrs.push(self.attribute()?),
            }
        }

        let id = self.doc.alloc(NodeData::Element(ElementData {
            tag: tag.clone(),
            attrs,
            children: Vec::new(),
        }));
        self.attach(id);

        if self_closing || is_void(&tag) {
            return Ok(());
        }
        if is_raw_text(&tag) {
            return self.raw_text(id, &tag);
        }
        self.stack.push(id);
        Ok(())
    }

    /// Content of `<script>`/`<style>` up to the matching close tag,
    /// stored as a single text child without markup interpretation.
    fn raw_text(&mut self, element: NodeId, tag: &str) -> Result<(), DomError> {
        let rest = &self.input[self.pos..];
        let close = format!("</{tag}");
        let lower = rest.to_ascii_lowercase();
        let Some(end) = lower.find(&close) else {
            return Err(DomError::Parse(format!("unterminated <{tag}> element")));
        };
        if end > 0 {
            let text = rest[..end].to_owned();
            let text_id = self.doc.alloc(NodeData::Text(text));
            self.doc.node_mut(text_id).parent = Some(element);
            self.doc
                .element_mut(element)
                .expect("raw text parent is an element")
                .children
                .push(text_id);
        }
        let after = &rest[end..];
        let close_end = after
            .find('>')
            .ok_or_else(|| DomError::Parse(format!("unterminated </{tag}> tag")))?;
        self.pos += end + close_end + 1;
        Ok(())
    }

    fn text(&mut self) {
        let rest = &self.input[self.pos..];
        let mut end = rest.len();
        let mut search = 0;
        while let Some(offset) = rest[search..].find('<') {
            let at = search + offset;
            let after = &rest[at + 1..];
            if after.starts_with(|c: char| c.is_ascii_alphabetic())
                || after.starts_with('/')
                || after.starts_with('!')
            {
                end = at;
                break;
            }
            search = at + 1;
        }
        if end > 0 {
            let text = rest[..end].to_owned();
            let id = self.doc.alloc(NodeData::Text(text));
            self.attach(id);
        }
        self.pos += end.max(1).min(rest.len());
    }

    fn attribute(&mut self) -> Result<(String, String), DomError> {
        let name_start = self.pos;
        while self
            .peek()
            .is_some_and(|c| !c.is_ascii_whitespace() && c != '=' && c != '>' && c != '/')
        {
            self.pos += 1;
        }
        let name = self.input[name_start..self.pos].to_ascii_lowercase();
        self.skip_whitespace();

        if self.peek() != Some('=') {
            // Bare attribute (`disabled`, `checked`).
            return Ok((name, String::new()));
        }
        self.pos += 1;
        self.skip_whitespace();

        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                let start = self.pos;
                let Some(end) = self.input[start..].find(quote) else {
                    return Err(DomError::Parse(format!(
                        "unterminated attribute value for {name:?}"
                    )));
                };
                self.pos = start + end + 1;
                self.input[start..start + end].to_owned()
            }
            Some(_) => {
                let start = self.pos;
                while self
                    .peek()
                    .is_some_and(|c| !c.is_ascii_whitespace() && c != '>')
                {
                    self.pos += 1;
                }
                self.input[start..self.pos].to_owned()
            }
            None => {
                return Err(DomError::Parse(format!(
                    "unterminated attribute value for {name:?}"
                )));
            }
        };
        Ok((name, value))
    }

    fn tag_name(&mut self) -> String {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            self.pos += 1;
        }
        self.input[start..self.pos].to_ascii_lowercase()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }
}

fn truncated(s: &str) -> String {
    let mut end = s.len().min(40);
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    s[..end].to_owned()
}
