//! Drive a [`Model`] the way a user would, without a browser.
//!
//! Elements are found the way DOM testing-library finds them: by ARIA role, by
//! the text of their label, or by their own text. Clicks and typing call the
//! handlers attached in the view, so the messages that reach `update` are the
//! ones a real page would send.
//!
//! ```
//! use cardboard::testing::{By, Harness};
//! use cardboard::widgets::Counter;
//!
//! let mut h = Harness::new(Counter::new());
//! h.click(By::Role("button")).unwrap();
//! assert_eq!(h.get_by_role("button").unwrap().text_content(), "1");
//! ```

use std::fmt;

use thiserror::Error;

use crate::html::Tag;
use crate::{Element, Html, Model, Program};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HarnessError {
    #[error("unable to find an element by {0}")]
    NotFound(String),
    #[error("found {count} elements by {by}, expected exactly one")]
    Ambiguous { by: String, count: usize },
    #[error("element found by {by} has no {event} handler")]
    NoHandler { by: String, event: &'static str },
}

pub type Result<T> = std::result::Result<T, HarnessError>;

/// How to find an element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum By<'a> {
    Role(&'a str),
    LabelText(&'a str),
    Text(&'a str),
}

impl<'a> fmt::Display for By<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            By::Role(role) => write!(f, "role {:?}", role),
            By::LabelText(label) => write!(f, "label text {:?}", label),
            By::Text(text) => write!(f, "text {:?}", text),
        }
    }
}

/// Collapse runs of whitespace and trim, as text matchers do by default
fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl<M: Model> Element<M> {
    /// Explicit `role` attribute, otherwise the implicit ARIA role of the tag
    pub fn role(&self) -> Option<&str> {
        if let Some(role) = self.attr("role") {
            return Some(role);
        }
        match self.tag {
            Tag::Button => Some("button"),
            Tag::Ul => Some("list"),
            Tag::Li => Some("listitem"),
            Tag::P => Some("paragraph"),
            Tag::Img => match self.attr("alt") {
                Some("") => Some("presentation"),
                _ => Some("img"),
            },
            Tag::Input => match self.attr("type").unwrap_or("text") {
                "text" | "url" | "email" | "search" => Some("textbox"),
                "checkbox" => Some("checkbox"),
                "button" | "submit" => Some("button"),
                _ => None,
            },
            Tag::Div | Tag::Span | Tag::Label => None,
        }
    }

    /// Depth-first, document order, not including `self`
    fn descendants(&self) -> Vec<&Element<M>> {
        let mut out = Vec::new();
        self.gather_descendants(&mut out);
        out
    }

    fn gather_descendants<'a>(&'a self, out: &mut Vec<&'a Element<M>>) {
        for child in &self.children {
            if let Html::Element(elem) = child {
                out.push(elem);
                elem.gather_descendants(out);
            }
        }
    }

    /// All matches inside this element (not including itself)
    pub fn query_all(&self, by: By) -> Vec<&Element<M>> {
        match by {
            By::Role(role) => self
                .descendants()
                .into_iter()
                .filter(|el| el.role() == Some(role))
                .collect(),
            By::Text(text) => {
                let wanted = normalize(text);
                self.descendants()
                    .into_iter()
                    .filter(|el| normalize(&el.own_text()) == wanted)
                    .collect()
            }
            By::LabelText(label) => self.query_all_by_label_text(label),
        }
    }

    fn query_all_by_label_text(&self, label: &str) -> Vec<&Element<M>> {
        let wanted = normalize(label);
        let all = self.descendants();
        let mut found = Vec::new();
        for el in &all {
            if el.attr("aria-label").map(normalize).as_deref() == Some(wanted.as_str()) {
                found.push(*el);
                continue;
            }
            if el.tag != Tag::Label || normalize(&el.text_content()) != wanted {
                continue;
            }
            let target = match el.attr("for") {
                Some(for_id) => all.iter().copied().find(|c| c.attr("id") == Some(for_id)),
                // a label wrapping its control
                None => el
                    .descendants()
                    .into_iter()
                    .find(|c| c.tag == Tag::Input),
            };
            found.extend(target);
        }
        found
    }

    /// The single match inside this element
    pub fn get(&self, by: By) -> Result<&Element<M>> {
        let mut all = self.query_all(by);
        match all.len() {
            0 => Err(HarnessError::NotFound(by.to_string())),
            1 => Ok(all.remove(0)),
            count => Err(HarnessError::Ambiguous {
                by: by.to_string(),
                count,
            }),
        }
    }

    pub fn query_all_by_role(&self, role: &str) -> Vec<&Element<M>> {
        self.query_all(By::Role(role))
    }

    pub fn query_by_role(&self, role: &str) -> Option<&Element<M>> {
        self.get(By::Role(role)).ok()
    }

    pub fn query_by_text(&self, text: &str) -> Option<&Element<M>> {
        self.get(By::Text(text)).ok()
    }
}

/// A [`Program`] plus user-level actions on its current view
#[derive(Debug)]
pub struct Harness<M: Model> {
    program: Program<M>,
}

impl<M: Model> Harness<M> {
    pub fn new(model: M) -> Harness<M> {
        Harness {
            program: Program::new(model),
        }
    }

    pub fn model(&self) -> &M {
        self.program.model()
    }

    pub fn view(&self) -> &Html<M> {
        self.program.view()
    }

    /// Views are wrapped in a virtual document node, so the root element itself
    /// can be found too
    fn document(&self) -> Vec<&Element<M>> {
        match self.program.view() {
            Html::Element(root) => {
                let mut all = vec![root];
                all.extend(root.descendants());
                all
            }
            Html::Text(_) => Vec::new(),
        }
    }

    pub fn query_all(&self, by: By) -> Vec<&Element<M>> {
        let doc = self.document();
        match doc.first() {
            None => Vec::new(),
            Some(root) => {
                let mut found = root.query_all(by);
                // the root is not its own descendant
                let root_matches = match by {
                    By::Role(role) => root.role() == Some(role),
                    By::Text(text) => normalize(&root.own_text()) == normalize(text),
                    By::LabelText(_) => false,
                };
                if root_matches {
                    found.insert(0, *root);
                }
                found
            }
        }
    }

    pub fn get(&self, by: By) -> Result<&Element<M>> {
        let mut all = self.query_all(by);
        match all.len() {
            0 => Err(HarnessError::NotFound(by.to_string())),
            1 => Ok(all.remove(0)),
            count => Err(HarnessError::Ambiguous {
                by: by.to_string(),
                count,
            }),
        }
    }

    pub fn get_by_role(&self, role: &str) -> Result<&Element<M>> {
        self.get(By::Role(role))
    }

    pub fn query_all_by_role(&self, role: &str) -> Vec<&Element<M>> {
        self.query_all(By::Role(role))
    }

    pub fn get_by_label_text(&self, label: &str) -> Result<&Element<M>> {
        self.get(By::LabelText(label))
    }

    pub fn query_by_text(&self, text: &str) -> Option<&Element<M>> {
        self.get(By::Text(text)).ok()
    }

    /// Current value of a text field
    pub fn value_of(&self, by: By) -> Result<String> {
        Ok(self.get(by)?.attr("value").unwrap_or_default().to_string())
    }

    /// Send the click message of the element found by `by`
    pub fn click(&mut self, by: By) -> Result<()> {
        let handler = self
            .get(by)?
            .click_handler()
            .cloned()
            .ok_or_else(|| HarnessError::NoHandler {
                by: by.to_string(),
                event: "click",
            })?;
        self.program.dispatch(handler());
        Ok(())
    }

    /// Type `text` at the end of the field, one input event per character
    pub fn type_text(&mut self, by: By, text: &str) -> Result<()> {
        let mut value = self.value_of(by)?;
        for ch in text.chars() {
            value.push(ch);
            self.input(by, value.clone())?;
        }
        Ok(())
    }

    /// Empty the field with a single input event
    pub fn clear(&mut self, by: By) -> Result<()> {
        self.input(by, String::new())
    }

    fn input(&mut self, by: By, value: String) -> Result<()> {
        let handler = self
            .get(by)?
            .input_handler()
            .cloned()
            .ok_or_else(|| HarnessError::NoHandler {
                by: by.to_string(),
                event: "input",
            })?;
        self.program.dispatch(handler(value));
        Ok(())
    }
}
