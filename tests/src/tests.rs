//! Behavioural tests for the widgets, written against what a user can see.

#![cfg(test)]

use cardboard::testing::{By, Harness};
use cardboard::widgets::{Counter, Gallery, UrlPolicy};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const PIE_URL: &str = "https://hips.hearstapps.com/hmg-prod/images/apple-pie-index-6425bd0363f16.jpg?crop=0.8888888888888888xw:1xh;center,top&resize=1200:*";

const URL: By<'static> = By::LabelText("Photo URL");
const CAPTION: By<'static> = By::LabelText("Caption");

#[test]
fn counter_increments_when_clicked() {
    let mut h = Harness::new(Counter::new());
    let counter = h.get_by_role("button").unwrap();
    assert_eq!(counter.text_content(), "0");

    h.click(By::Role("button")).unwrap();
    assert_eq!(h.get_by_role("button").unwrap().text_content(), "1");
}

#[test]
fn photo_card_is_added_with_appropriate_inputs() {
    let mut h = Harness::new(Gallery::new());
    h.type_text(URL, PIE_URL).unwrap();
    h.type_text(CAPTION, "That's a tasty apple pie!").unwrap();
    h.click(By::Role("button")).unwrap();

    let list = h.get_by_role("list").unwrap();
    assert!(!list.children().is_empty());

    let cards = list.query_all_by_role("listitem");
    assert_eq!(cards.len(), 1);
    let img = cards[0].query_by_role("img").expect("card has an image");
    assert_eq!(img.attr("src"), Some(PIE_URL));
    assert!(cards[0].query_by_text("That's a tasty apple pie!").is_some());
}

#[test]
fn form_is_cleared_after_a_card_is_added() {
    let mut h = Harness::new(Gallery::new());
    h.type_text(URL, "https://example.com/pie.jpg").unwrap();
    h.type_text(CAPTION, "Tasty pie").unwrap();
    h.click(By::Role("button")).unwrap();

    let cards = h.get_by_role("list").unwrap().query_all_by_role("listitem");
    assert_eq!(cards.len(), 1);
    assert_eq!(
        cards[0].query_by_role("img").unwrap().attr("src"),
        Some("https://example.com/pie.jpg")
    );
    assert!(cards[0].text_content().contains("Tasty pie"));

    assert_eq!(h.value_of(URL).unwrap(), "");
    assert_eq!(h.value_of(CAPTION).unwrap(), "");
}

#[test]
fn missing_url_keeps_caption_and_adds_nothing() {
    let mut h = Harness::new(Gallery::new());
    h.type_text(CAPTION, "No picture here").unwrap();
    h.click(By::Role("button")).unwrap();

    assert!(h.get_by_role("list").unwrap().children().is_empty());
    assert_eq!(h.value_of(CAPTION).unwrap(), "No picture here");
    assert_eq!(h.value_of(URL).unwrap(), "");
}

#[test]
fn empty_caption_still_adds_a_card() {
    let mut h = Harness::new(Gallery::new());
    h.type_text(URL, "https://example.com/plain.jpg").unwrap();
    h.click(By::Role("button")).unwrap();

    let cards = h.get_by_role("list").unwrap().query_all_by_role("listitem");
    assert_eq!(cards.len(), 1);
    // the alt attribute is left off rather than emptied
    let img = cards[0].query_by_role("img").unwrap();
    assert_eq!(img.attr("alt"), None);
    assert_eq!(img.attr("src"), Some("https://example.com/plain.jpg"));
}

#[test]
fn blank_url_with_strict_policy_is_rejected() {
    let mut h = Harness::new(Gallery::with_policy(UrlPolicy::NonBlank));
    h.type_text(URL, "   ").unwrap();
    h.type_text(CAPTION, "spaces").unwrap();
    h.click(By::Role("button")).unwrap();

    assert!(h.query_all_by_role("listitem").is_empty());
    assert_eq!(h.value_of(URL).unwrap(), "   ");
    assert_eq!(h.value_of(CAPTION).unwrap(), "spaces");
}

#[test]
fn cards_accumulate_in_order() {
    let mut h = Harness::new(Gallery::new());
    for (url, caption) in [("https://example.com/a.jpg", "A"), ("https://example.com/b.jpg", "B")] {
        h.type_text(URL, url).unwrap();
        h.type_text(CAPTION, caption).unwrap();
        h.click(By::Role("button")).unwrap();
    }

    let srcs: Vec<_> = h
        .query_all_by_role("listitem")
        .iter()
        .map(|card| card.query_by_role("img").unwrap().attr("src").unwrap().to_string())
        .collect();
    assert_eq!(srcs, vec!["https://example.com/a.jpg", "https://example.com/b.jpg"]);
}

#[test]
fn rejected_click_after_accepted_ones_keeps_cards_and_inputs() {
    let mut h = Harness::new(Gallery::new());
    for (url, caption) in [("https://example.com/a.jpg", "A"), ("https://example.com/b.jpg", "B")] {
        h.type_text(URL, url).unwrap();
        h.type_text(CAPTION, caption).unwrap();
        h.click(By::Role("button")).unwrap();
    }
    h.type_text(CAPTION, "no url yet").unwrap();
    h.click(By::Role("button")).unwrap();

    let cards = h.query_all_by_role("listitem");
    assert_eq!(cards.len(), 2);
    assert!(cards[0].query_by_text("A").is_some());
    assert!(cards[1].query_by_text("B").is_some());
    assert_eq!(h.value_of(URL).unwrap(), "");
    assert_eq!(h.value_of(CAPTION).unwrap(), "no url yet");

    h.type_text(URL, "https://example.com/c.jpg").unwrap();
    h.click(By::Role("button")).unwrap();
    let cards = h.query_all_by_role("listitem");
    assert_eq!(cards.len(), 3);
    assert!(cards[2].query_by_text("no url yet").is_some());
}

#[test]
fn widgets_are_independent() {
    let mut first = Harness::new(Counter::new());
    let second = Harness::new(Counter::new());
    first.click(By::Role("button")).unwrap();
    assert_eq!(first.model().count(), 1);
    assert_eq!(second.model().count(), 0);
}

proptest! {
    #[test]
    fn counter_shows_number_of_clicks(n in 0usize..50) {
        let mut h = Harness::new(Counter::new());
        for _ in 0..n {
            h.click(By::Role("button")).unwrap();
        }
        prop_assert_eq!(h.get_by_role("button").unwrap().text_content(), n.to_string());
    }

    #[test]
    fn accepted_url_is_stored_verbatim(
        url in "[a-zA-Z0-9:/?&=;,*. %-]{1,40}",
        caption in "[a-zA-Z !']{0,20}",
    ) {
        let mut h = Harness::new(Gallery::new());
        h.type_text(URL, &url).unwrap();
        h.type_text(CAPTION, &caption).unwrap();
        h.click(By::Role("button")).unwrap();

        let photos = h.model().photos();
        prop_assert_eq!(photos.len(), 1);
        prop_assert_eq!(photos[0].url(), url.as_str());
        prop_assert_eq!(photos[0].caption(), caption.as_str());
        let card = h.get_by_role("listitem").unwrap();
        prop_assert_eq!(card.children()[0].as_element().unwrap().attr("src"), Some(url.as_str()));
        prop_assert_eq!(h.value_of(URL).unwrap(), "");
        prop_assert_eq!(h.value_of(CAPTION).unwrap(), "");
    }

    #[test]
    fn rejected_submission_changes_nothing(caption in "[a-zA-Z !']{0,20}", clicks in 1usize..4) {
        let mut h = Harness::new(Gallery::new());
        h.type_text(CAPTION, &caption).unwrap();
        for _ in 0..clicks {
            h.click(By::Role("button")).unwrap();
        }
        prop_assert!(h.model().photos().is_empty());
        prop_assert!(h.query_all_by_role("listitem").is_empty());
        prop_assert_eq!(h.value_of(CAPTION).unwrap(), caption);
    }
}
