//! Integration tests for the provider adapters against a mocked transport
//!
//! These tests verify:
//! - Request shape per provider (method, URL, headers, body)
//! - Payload decoding and claimed identities
//! - Contained failures (non-success status, transport errors, bad payloads)
//! - Blank queries never reach the network

use async_trait::async_trait;
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::http::{HttpMethod, HttpRequest, HttpResponse};
use bridge_traits::{BridgeError, HttpClient};
use core_async::CancellationToken;
use core_metadata::providers::{
    AzLyricsProvider, ChartLyricsProvider, GeniusProvider, HappiProvider, LyricsOvhProvider,
    WorksRegistryProvider,
};
use core_metadata::{MetadataError, MetadataProvider, ProviderOutcome, SongQuery};
use mockall::mock;
use std::sync::Arc;

mock! {
    HttpClient {}

    #[async_trait]
    impl HttpClient for HttpClient {
        async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
    }
}

fn respond(status: u16, body: &'static str) -> impl Fn(HttpRequest) -> BridgeResult<HttpResponse> {
    move |_| Ok(HttpResponse::new(status, body))
}

fn found_text(outcome: ProviderOutcome) -> String {
    match outcome {
        ProviderOutcome::Found(result) => result.content,
        other => panic!("expected Found, got {:?}", other),
    }
}

// =============================================================================
// ChartLyrics
// =============================================================================

#[tokio::test]
async fn test_chartlyrics_soap_request_and_claimed_identity() {
    let mut http = MockHttpClient::new();
    http.expect_execute()
        .withf(|req| {
            req.method == HttpMethod::Post
                && req.url == "http://api.chartlyrics.com/apiv1.asmx"
                && req.headers.get("SOAPAction").map(String::as_str)
                    == Some("\"http://api.chartlyrics.com/SearchLyricDirect\"")
                && req.body.as_ref().is_some_and(|body| {
                    String::from_utf8_lossy(body)
                        .contains("<artist>Simon &amp; Garfunkel</artist><song>The Boxer</song>")
                })
        })
        .times(1)
        .returning(respond(
            200,
            r#"<?xml version="1.0" encoding="utf-8"?>
<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"><soap:Body>
<SearchLyricDirectResponse xmlns="http://api.chartlyrics.com/"><SearchLyricDirectResult>
<LyricSong>The Boxer</LyricSong><LyricArtist>Simon &amp; Garfunkel</LyricArtist>
<Lyric>I am just a poor boy</Lyric>
</SearchLyricDirectResult></SearchLyricDirectResponse></soap:Body></soap:Envelope>"#,
        ));

    let provider = ChartLyricsProvider::new(Arc::new(http), "http://api.chartlyrics.com");
    let query = SongQuery::new("The Boxer", ["Simon & Garfunkel"]);
    let outcome = provider.fetch(&query, &CancellationToken::new()).await.unwrap();

    match outcome {
        ProviderOutcome::Found(result) => {
            assert_eq!(result.content, "I am just a poor boy");
            let claimed = result.claimed.unwrap();
            assert_eq!(claimed.artist, "Simon & Garfunkel");
            assert_eq!(claimed.title, "The Boxer");
        }
        other => panic!("expected Found, got {:?}", other),
    }
}

#[tokio::test]
async fn test_chartlyrics_server_error_is_contained() {
    let mut http = MockHttpClient::new();
    http.expect_execute().times(1).returning(respond(500, "oops"));

    let provider = ChartLyricsProvider::new(Arc::new(http), "http://api.chartlyrics.com");
    let outcome = provider
        .fetch(&SongQuery::new("Hey Jude", ["The Beatles"]), &CancellationToken::new())
        .await
        .unwrap();

    match outcome {
        ProviderOutcome::Failed(MetadataError::Transport(message)) => {
            assert!(message.starts_with("HTTP 500 (server error)"), "{}", message);
        }
        other => panic!("expected Failed(Transport), got {:?}", other),
    }
}

#[tokio::test]
async fn test_forbidden_is_failed_not_missing() {
    let mut http = MockHttpClient::new();
    http.expect_execute().times(1).returning(respond(403, "denied"));

    let provider = LyricsOvhProvider::new(Arc::new(http), "https://api.lyrics.ovh");
    let outcome = provider
        .fetch(&SongQuery::new("Yellow", ["Coldplay"]), &CancellationToken::new())
        .await
        .unwrap();

    match outcome {
        ProviderOutcome::Failed(MetadataError::Transport(message)) => {
            assert!(message.contains("(client error)"), "{}", message);
        }
        other => panic!("expected Failed(Transport), got {:?}", other),
    }
}

// =============================================================================
// Happi
// =============================================================================

#[tokio::test]
async fn test_happi_inline_lyrics() {
    let mut http = MockHttpClient::new();
    http.expect_execute()
        .withf(|req| {
            req.url.starts_with("https://api.happi.dev/v1/music?q=The%20Beatles%20Hey%20Jude")
                && req.headers.get("x-happi-key").map(String::as_str) == Some("secret")
        })
        .times(1)
        .returning(respond(
            200,
            r#"{"success":true,"length":1,"result":[
                {"track":"Hey Jude","artist":"The Beatles","haslyrics":true,"lyrics":"Hey Jude, don't make it bad"}
            ]}"#,
        ));

    let provider = HappiProvider::new(Arc::new(http), "https://api.happi.dev", "secret").unwrap();
    let outcome = provider
        .fetch(&SongQuery::new("Hey Jude", ["The Beatles"]), &CancellationToken::new())
        .await
        .unwrap();

    match outcome {
        ProviderOutcome::Found(result) => {
            assert_eq!(result.content, "Hey Jude, don't make it bad");
            assert_eq!(result.claimed.unwrap().title, "Hey Jude");
        }
        other => panic!("expected Found, got {:?}", other),
    }
}

#[tokio::test]
async fn test_happi_follows_lyrics_link() {
    let mut http = MockHttpClient::new();
    let mut sequence = mockall::Sequence::new();
    http.expect_execute()
        .withf(|req| req.url.contains("/v1/music?q="))
        .times(1)
        .in_sequence(&mut sequence)
        .returning(respond(
            200,
            r#"{"success":true,"result":[{"track":"Imagine","artist":"John Lennon","haslyrics":true,
                "api_lyrics":"https://api.happi.dev/v1/music/artists/1/albums/2/tracks/3/lyrics"}]}"#,
        ));
    http.expect_execute()
        .withf(|req| req.url.ends_with("/tracks/3/lyrics") && req.headers.contains_key("x-happi-key"))
        .times(1)
        .in_sequence(&mut sequence)
        .returning(respond(
            200,
            r#"{"success":true,"result":{"lyrics":"Imagine there's no heaven"}}"#,
        ));

    let provider = HappiProvider::new(Arc::new(http), "https://api.happi.dev", "secret").unwrap();
    let outcome = provider
        .fetch(&SongQuery::new("Imagine", ["John Lennon"]), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(found_text(outcome), "Imagine there's no heaven");
}

#[tokio::test]
async fn test_happi_success_envelope_without_tracks() {
    let mut http = MockHttpClient::new();
    http.expect_execute()
        .times(1)
        .returning(respond(200, r#"{"success":true,"length":0,"result":[]}"#));

    let provider = HappiProvider::new(Arc::new(http), "https://api.happi.dev", "secret").unwrap();
    let outcome = provider
        .fetch(&SongQuery::new("Unknown", ["Nobody"]), &CancellationToken::new())
        .await
        .unwrap();

    assert!(matches!(outcome, ProviderOutcome::NotFound));
}

#[tokio::test]
async fn test_happi_malformed_json_is_contained() {
    let mut http = MockHttpClient::new();
    http.expect_execute().times(1).returning(respond(200, "<html>"));

    let provider = HappiProvider::new(Arc::new(http), "https://api.happi.dev", "secret").unwrap();
    let outcome = provider
        .fetch(&SongQuery::new("Hey Jude", ["The Beatles"]), &CancellationToken::new())
        .await
        .unwrap();

    assert!(matches!(outcome, ProviderOutcome::Failed(MetadataError::Parse(_))));
}

// =============================================================================
// lyrics.ovh
// =============================================================================

#[tokio::test]
async fn test_lyricsovh_found() {
    let mut http = MockHttpClient::new();
    http.expect_execute()
        .withf(|req| req.url == "https://api.lyrics.ovh/v1/Coldplay/Yellow")
        .times(1)
        .returning(respond(200, r#"{"lyrics":"Look at the stars\n"}"#));

    let provider = LyricsOvhProvider::new(Arc::new(http), "https://api.lyrics.ovh");
    let outcome = provider
        .fetch(&SongQuery::new("Yellow", ["Coldplay"]), &CancellationToken::new())
        .await
        .unwrap();

    match outcome {
        ProviderOutcome::Found(result) => {
            assert_eq!(result.content, "Look at the stars");
            assert!(result.claimed.is_none());
        }
        other => panic!("expected Found, got {:?}", other),
    }
}

#[tokio::test]
async fn test_lyricsovh_404_is_not_found() {
    let mut http = MockHttpClient::new();
    http.expect_execute()
        .times(1)
        .returning(respond(404, r#"{"error":"No lyrics found"}"#));

    let provider = LyricsOvhProvider::new(Arc::new(http), "https://api.lyrics.ovh");
    let outcome = provider
        .fetch(&SongQuery::new("Yellow", ["Coldplay"]), &CancellationToken::new())
        .await
        .unwrap();

    assert!(matches!(outcome, ProviderOutcome::NotFound));
}

#[tokio::test]
async fn test_transport_error_is_contained() {
    let mut http = MockHttpClient::new();
    http.expect_execute()
        .times(1)
        .returning(|_| Err(BridgeError::Timeout(std::time::Duration::from_secs(10))));

    let provider = LyricsOvhProvider::new(Arc::new(http), "https://api.lyrics.ovh");
    let outcome = provider
        .fetch(&SongQuery::new("Yellow", ["Coldplay"]), &CancellationToken::new())
        .await
        .unwrap();

    assert!(matches!(outcome, ProviderOutcome::Failed(MetadataError::Bridge(_))));
}

// =============================================================================
// AZLyrics
// =============================================================================

#[tokio::test]
async fn test_azlyrics_page_extraction() {
    let mut http = MockHttpClient::new();
    http.expect_execute()
        .withf(|req| req.url == "https://www.azlyrics.com/lyrics/simonampgarfunkel/theboxer.html")
        .times(1)
        .returning(respond(
            200,
            r#"<html><body><div class="main-page"><div class="ringtone"></div>
<b>"The Boxer"</b><br>
<div>
<!-- Usage of azlyrics.com content by any third-party lyrics provider is prohibited. -->
I am just a poor boy<br>
Though my story's seldom told<br>
</div></div></body></html>"#,
        ));

    let provider = AzLyricsProvider::new(Arc::new(http), "https://www.azlyrics.com");
    let outcome = provider
        .fetch(
            &SongQuery::new("The Boxer", ["Simon & Garfunkel"]),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(found_text(outcome), "I am just a poor boy\nThough my story's seldom told");
}

#[tokio::test]
async fn test_azlyrics_missing_marker_is_not_found() {
    let mut http = MockHttpClient::new();
    http.expect_execute().times(1).returning(respond(
        200,
        "<html><body><h1>Welcome to AZLyrics!</h1><div>search results</div></body></html>",
    ));

    let provider = AzLyricsProvider::new(Arc::new(http), "https://www.azlyrics.com");
    let outcome = provider
        .fetch(&SongQuery::new("Imagine", ["John Lennon"]), &CancellationToken::new())
        .await
        .unwrap();

    assert!(matches!(outcome, ProviderOutcome::NotFound));
}

// =============================================================================
// Genius
// =============================================================================

#[tokio::test]
async fn test_genius_page_extraction() {
    let mut http = MockHttpClient::new();
    http.expect_execute()
        .withf(|req| req.url == "https://genius.com/Simon-and-garfunkel-the-boxer-lyrics")
        .times(1)
        .returning(respond(
            200,
            r#"<html><body><div class="Lyrics__Container-sc-1 x">[Verse 1]<br><i>I am just a poor boy</i><script>x()</script></div></body></html>"#,
        ));

    let provider = GeniusProvider::new(Arc::new(http), "https://genius.com");
    let outcome = provider
        .fetch(
            &SongQuery::new("The Boxer", ["Simon & Garfunkel"]),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(found_text(outcome), "[Verse 1]\nI am just a poor boy");
}

// =============================================================================
// Works registry
// =============================================================================

#[tokio::test]
async fn test_works_registry_writers() {
    let mut http = MockHttpClient::new();
    http.expect_execute()
        .withf(|req| {
            req.url
                == "https://works.example.org/works?works=true&title=Yesterday&writer=&performer=The%20Beatles"
        })
        .times(1)
        .returning(respond(
            200,
            r#"{"works":[{"title":"Yesterday","writers":[{"name":"John Lennon"},{"name":"Paul McCartney"}],
                "performers":[{"name":"The Beatles"}]}]}"#,
        ));

    let provider = WorksRegistryProvider::new(Arc::new(http), "https://works.example.org/");
    let outcome = provider
        .fetch(&SongQuery::new("Yesterday", ["The Beatles"]), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(found_text(outcome), "John Lennon, Paul McCartney");
}

// =============================================================================
// Cross-provider properties
// =============================================================================

fn all_providers(http: Arc<MockHttpClient>) -> Vec<Arc<dyn MetadataProvider>> {
    vec![
        Arc::new(ChartLyricsProvider::new(http.clone(), "http://api.chartlyrics.com")),
        Arc::new(HappiProvider::new(http.clone(), "https://api.happi.dev", "key").unwrap()),
        Arc::new(LyricsOvhProvider::new(http.clone(), "https://api.lyrics.ovh")),
        Arc::new(AzLyricsProvider::new(http.clone(), "https://www.azlyrics.com")),
        Arc::new(GeniusProvider::new(http.clone(), "https://genius.com")),
        Arc::new(WorksRegistryProvider::new(http, "https://works.example.org")),
    ]
}

#[tokio::test]
async fn test_blank_title_never_hits_network() {
    let mut http = MockHttpClient::new();
    http.expect_execute().never();
    let http = Arc::new(http);

    for query in [
        SongQuery::new("", ["The Beatles"]),
        SongQuery::new("  \t", ["The Beatles"]),
        SongQuery::new("Hey Jude", ["   "]),
    ] {
        for provider in all_providers(http.clone()) {
            let outcome = provider.fetch(&query, &CancellationToken::new()).await.unwrap();
            assert!(
                matches!(outcome, ProviderOutcome::NotFound),
                "{} sent a request for {:?}",
                provider.id(),
                query
            );
        }
    }
}

#[tokio::test]
async fn test_cancelled_token_skips_request() {
    let mut http = MockHttpClient::new();
    http.expect_execute().never();
    let http = Arc::new(http);

    let token = CancellationToken::new();
    token.cancel();
    let query = SongQuery::new("Hey Jude", ["The Beatles"]);

    for provider in all_providers(http.clone()) {
        let result = provider.fetch(&query, &token).await;
        assert!(matches!(result, Err(MetadataError::Cancelled)));
    }
}

#[tokio::test]
async fn test_imagine_without_marker_resolves_to_none() {
    let mut http = MockHttpClient::new();
    http.expect_execute()
        .times(1)
        .returning(respond(200, "<html><body><p>Sorry, page not found</p></body></html>"));

    let provider: Arc<dyn MetadataProvider> =
        Arc::new(AzLyricsProvider::new(Arc::new(http), "https://www.azlyrics.com"));
    let resolver = core_metadata::Resolver::new(vec![provider]);
    let result = resolver
        .resolve(
            &SongQuery::new("Imagine", ["John Lennon"]),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert!(result.is_none());
}
