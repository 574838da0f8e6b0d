//! Integration tests for HTML extraction, normalization and validation
//!
//! These tests verify the pure building blocks used by the scrape-based
//! providers, including behaviour on hostile or malformed markup.

use core_metadata::html::{extract_fragment, extract_text, find_element, ExtractionRules, MAX_DEPTH};
use core_metadata::matcher::{evaluate, is_match, MatchDecision};
use core_metadata::normalize::{azlyrics_slug, genius_slug, search_terms};
use core_metadata::{ClaimedIdentity, SongQuery};
use scraper::Html;

fn lyric_rules() -> ExtractionRules {
    ExtractionRules::new(&["b", "i", "em", "strong", "a", "span"], "br")
}

#[test]
fn test_bold_then_break() {
    assert_eq!(extract_fragment("<b>Hello</b><br/>World", &lyric_rules()), "Hello\nWorld");
}

#[test]
fn test_script_text_never_leaks() {
    let markup = "Line one<br><script>var secret = 'do not show';</script>\
                  <style>.x{}</style><iframe>frame</iframe>Line two";
    let text = extract_fragment(markup, &lyric_rules());

    assert!(!text.contains("secret"));
    assert!(!text.contains("frame"));
    assert_eq!(text, "Line one\nLine two");
}

#[test]
fn test_unlisted_tag_inside_allowed_tag() {
    let text = extract_fragment("<span>keep<div>drop</div></span>", &lyric_rules());
    assert_eq!(text, "keep");
}

#[test]
fn test_pathological_nesting_is_bounded() {
    let depth = 5_000;
    let markup = format!("{}bottom{}", "<span>".repeat(depth), "</span>".repeat(depth));
    let text = extract_fragment(&markup, &lyric_rules().with_max_depth(MAX_DEPTH));
    assert_eq!(text, "");

    let shallow = format!("{}bottom{}", "<span>".repeat(8), "</span>".repeat(8));
    assert_eq!(extract_fragment(&shallow, &lyric_rules()), "bottom");
}

#[test]
fn test_extract_from_selected_node() {
    let document = Html::parse_document(
        "<html><body><nav>Home</nav><div id=\"lyrics\">a<br>b</div></body></html>",
    );
    let node = find_element(&document, |el| el.value().id() == Some("lyrics")).unwrap();
    assert_eq!(extract_text(node, &lyric_rules()), "a\nb");
}

#[test]
fn test_slug_idempotence() {
    for input in ["John Lennon Imagine", "Guns N' Roses - Sweet Child O' Mine", "Beyoncé & Jay-Z"] {
        let once = genius_slug(input);
        assert_eq!(genius_slug(&once), once);

        let once = azlyrics_slug(input);
        assert_eq!(azlyrics_slug(&once), once);
    }
}

#[test]
fn test_search_terms_keeps_casing() {
    assert_eq!(search_terms("Hall & Oates Rich Girl"), "Hall and Oates Rich Girl");
    assert_eq!(search_terms("  Hall &  Oates "), "  Hall and  Oates ");
}

#[test]
fn test_match_validator_examples() {
    assert!(is_match("the beatles", "hey jude", "The Beatles", "Hey Jude"));
    assert!(is_match("the-beatles", "hey-jude", "The Beatles", "Hey Jude"));
    assert!(!is_match("The Beatles", "Let It Be", "The Beatles", "Hey Jude"));
}

#[test]
fn test_evaluate_with_multiple_performers() {
    let query = SongQuery::new("The Boxer", ["Paul Simon", "Art Garfunkel"]);
    let claimed = ClaimedIdentity::new("Paul Simon & Art Garfunkel", "The Boxer");
    assert_eq!(evaluate(Some(&claimed), &query), MatchDecision::Accepted);
}
