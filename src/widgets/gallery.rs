//! A form which appends photo cards to a list.
//!
//! Typing updates [`FormInputs`]; pressing "Add Photo" either appends a
//! [`PhotoEntry`] and clears the form, or (if the URL is rejected) leaves
//! everything as it was.

use std::mem;

use crate::html::{alt, for_, id, src, type_, value};
use crate::{on_click, on_input, Cmd, Html, Model};

const URL_INPUT_ID: &str = "photo-url";
const CAPTION_INPUT_ID: &str = "photo-caption";

/// Decides which URLs are accepted
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum UrlPolicy {
    /// Anything but the empty string, whitespace included
    #[default]
    NonEmpty,
    /// At least one non-whitespace character
    NonBlank,
}

impl UrlPolicy {
    pub fn accepts(self, url: &str) -> bool {
        match self {
            UrlPolicy::NonEmpty => !url.is_empty(),
            UrlPolicy::NonBlank => !url.trim().is_empty(),
        }
    }
}

/// One card in the gallery. The url is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhotoEntry {
    url: String,
    caption: String,
}

impl PhotoEntry {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    /// The list item for this card. Both values are used verbatim.
    pub fn view(&self) -> Html<Gallery> {
        // an empty alt would mark the image as decorative
        let alt_text = if self.caption.is_empty() {
            None
        } else {
            Some(alt(self.caption.clone()))
        };
        li!(
            img!(src(self.url.clone()), alt_text),
            p!(self.caption.clone())
        )
    }
}

/// What the user has typed so far
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FormInputs {
    url: String,
    caption: String,
}

impl FormInputs {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }
}

/// Outcome of pressing "Add Photo"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// The entry was stored at this index
    Accepted(usize),
    Rejected,
}

#[derive(Debug, Default)]
pub struct Gallery {
    photos: Vec<PhotoEntry>,
    form: FormInputs,
    policy: UrlPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryMsg {
    UrlChanged(String),
    CaptionChanged(String),
    AddClicked,
}

impl Gallery {
    pub fn new() -> Gallery {
        Gallery::default()
    }

    pub fn with_policy(policy: UrlPolicy) -> Gallery {
        Gallery {
            policy,
            ..Gallery::default()
        }
    }

    pub fn photos(&self) -> &[PhotoEntry] {
        &self.photos
    }

    pub fn form(&self) -> &FormInputs {
        &self.form
    }

    pub fn handle_add_click(&mut self) -> Submission {
        if !self.policy.accepts(&self.form.url) {
            debug!("Rejected photo with url {:?}", self.form.url);
            return Submission::Rejected;
        }
        let entry = PhotoEntry {
            url: mem::take(&mut self.form.url),
            caption: mem::take(&mut self.form.caption),
        };
        debug!("Added photo {:?}", entry);
        self.photos.push(entry);
        Submission::Accepted(self.photos.len() - 1)
    }
}

impl Model for Gallery {
    type Msg = GalleryMsg;

    fn view(&self) -> Html<Self> {
        let cards: Vec<_> = self.photos.iter().map(PhotoEntry::view).collect();
        div![
            div!(
                label!(for_(URL_INPUT_ID), "Photo URL"),
                input!(
                    id(URL_INPUT_ID),
                    type_("text"),
                    value(self.form.url.clone()),
                    on_input::<Gallery, _>((), |_, s| GalleryMsg::UrlChanged(s))
                )
            ),
            div!(
                label!(for_(CAPTION_INPUT_ID), "Caption"),
                input!(
                    id(CAPTION_INPUT_ID),
                    type_("text"),
                    value(self.form.caption.clone()),
                    on_input::<Gallery, _>((), |_, s| GalleryMsg::CaptionChanged(s))
                )
            ),
            button!(
                "Add Photo",
                on_click::<Gallery, _>((), |_| GalleryMsg::AddClicked)
            ),
            ul!(cards)
        ]
    }

    fn update(&mut self, msg: GalleryMsg) -> Cmd<GalleryMsg> {
        match msg {
            GalleryMsg::UrlChanged(url) => self.form.url = url,
            GalleryMsg::CaptionChanged(caption) => self.form.caption = caption,
            GalleryMsg::AddClicked => {
                self.handle_add_click();
            }
        }
        Cmd::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn typed(url: &str, caption: &str) -> Gallery {
        let mut gallery = Gallery::new();
        gallery.update(GalleryMsg::UrlChanged(url.into()));
        gallery.update(GalleryMsg::CaptionChanged(caption.into()));
        gallery
    }

    #[test]
    fn accepted_submission_appends_and_clears() {
        let mut gallery = typed("https://example.com/pie.jpg", "Tasty pie");
        assert_eq!(gallery.handle_add_click(), Submission::Accepted(0));
        assert_eq!(gallery.photos().len(), 1);
        assert_eq!(gallery.photos()[0].url(), "https://example.com/pie.jpg");
        assert_eq!(gallery.photos()[0].caption(), "Tasty pie");
        assert_eq!(gallery.form(), &FormInputs::default());
    }

    #[test]
    fn empty_caption_is_accepted() {
        let mut gallery = typed("a.jpg", "");
        assert_eq!(gallery.handle_add_click(), Submission::Accepted(0));
        assert_eq!(gallery.photos()[0].caption(), "");
    }

    #[test]
    fn empty_url_keeps_the_form() {
        let mut gallery = typed("", "Tasty pie");
        assert_eq!(gallery.handle_add_click(), Submission::Rejected);
        assert!(gallery.photos().is_empty());
        assert_eq!(gallery.form().caption(), "Tasty pie");
        assert_eq!(gallery.form().url(), "");
    }

    #[test]
    fn whitespace_url_depends_on_policy() {
        let mut lenient = typed("  ", "blank");
        assert_eq!(lenient.handle_add_click(), Submission::Accepted(0));
        assert_eq!(lenient.photos()[0].url(), "  ");

        let mut strict = Gallery::with_policy(UrlPolicy::NonBlank);
        strict.update(GalleryMsg::UrlChanged("  ".into()));
        assert_eq!(strict.handle_add_click(), Submission::Rejected);
        assert_eq!(strict.form().url(), "  ");
    }

    #[test]
    fn card_markup() {
        let entry = PhotoEntry {
            url: "https://example.com/a.jpg?w=1&h=2".into(),
            caption: "Pie".into(),
        };
        assert_eq!(
            entry.view().to_string(),
            "<li><img src=\"https://example.com/a.jpg?w=1&h=2\" alt=\"Pie\"><p>Pie</p></li>"
        );
        let bare = PhotoEntry {
            url: "b.jpg".into(),
            caption: String::new(),
        };
        assert_eq!(bare.view().to_string(), "<li><img src=\"b.jpg\"><p></p></li>");
    }

    #[test]
    fn cards_follow_submission_order() {
        let mut gallery = Gallery::new();
        for (url, caption) in [("a.jpg", "A"), ("b.jpg", "B")] {
            gallery.update(GalleryMsg::UrlChanged(url.into()));
            gallery.update(GalleryMsg::CaptionChanged(caption.into()));
            gallery.update(GalleryMsg::AddClicked);
        }
        let captions: Vec<_> = gallery.photos().iter().map(PhotoEntry::caption).collect();
        assert_eq!(captions, vec!["A", "B"]);
    }
}
