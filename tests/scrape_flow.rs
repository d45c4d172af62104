//! End-to-end scrape runs against an in-memory listing feed.

mod support;

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use placescout::browser::EngineError;
use placescout::models::{Availability, Place, NO_INTRODUCTION};
use placescout::scraper::{selectors, FieldExtractor, ScrapeError};

use support::{broken, detail, named, orchestrator, MockSite};

fn names(places: &[Place]) -> Vec<&str> {
    places.iter().map(|p| p.name.as_str()).collect()
}

#[tokio::test]
async fn failed_listing_is_skipped() {
    let site = MockSite::new(vec![
        named("Place 1"),
        broken(),
        named("Place 3"),
        named("Place 4"),
        named("Place 5"),
    ]);

    let report = orchestrator(&site, 5).run("turkish stores", 3).await.unwrap();

    assert_eq!(names(&report.places), ["Place 1", "Place 3", "Place 4"]);
    assert!(report.is_complete());
    assert_eq!(site.clicked(), [0, 1, 2, 3]);
    assert!(site.closed());
}

#[tokio::test]
async fn navigates_to_encoded_search_url() {
    let site = MockSite::new(vec![named("Place 1")]);

    orchestrator(&site, 5).run("turkish stores in toronto", 1).await.unwrap();

    assert_eq!(
        site.visited(),
        ["https://www.google.com/maps/search/turkish+stores+in+toronto"]
    );
}

#[tokio::test]
async fn duplicates_and_unnamed_listings_are_dropped() {
    let site = MockSite::new(vec![
        named("Efes Market"),
        named(""),
        named("Efes Market"),
        named("Galata Bakery"),
        named("Efes Market"),
        named("Kervan Grill"),
    ]);

    let report = orchestrator(&site, 5).run("turkish stores", 3).await.unwrap();

    assert_eq!(names(&report.places), ["Efes Market", "Galata Bakery", "Kervan Grill"]);
    let unique: HashSet<&str> = names(&report.places).into_iter().collect();
    assert_eq!(unique.len(), report.places.len());
    assert!(report.places.iter().all(|p| !p.name.is_empty()));
}

#[tokio::test]
async fn scrolls_until_enough_listings_load() {
    let site = MockSite::new((1..=6).map(|i| named(&format!("Place {i}"))).collect()).lazy(2, 2);

    let report = orchestrator(&site, 5).run("turkish stores", 5).await.unwrap();

    assert_eq!(report.places.len(), 5);
    assert_eq!(report.places[4].name, "Place 5");
    assert!(site.scrolls() >= 2);
}

#[tokio::test]
async fn discovery_scrolls_from_last_rendered_listing() {
    let site = MockSite::new((1..=6).map(|i| named(&format!("Place {i}"))).collect()).lazy(2, 2);

    orchestrator(&site, 5).run("turkish stores", 5).await.unwrap();

    // The pointer is over the feed before each discovery scroll.
    assert_eq!(site.hovered(), [1, 5]);
}

#[tokio::test]
async fn stall_budget_counts_consecutive_cycles_only() {
    // One listing loads on every fourth scroll, so each load is preceded
    // by a single stalled cycle.
    let site = MockSite::new((1..=8).map(|i| named(&format!("Place {i}"))).collect())
        .lazy(1, 1)
        .dry_scrolls(3);

    let report = orchestrator(&site, 2).run("turkish stores", 4).await.unwrap();

    assert!(report.is_complete());
    assert_eq!(
        names(&report.places),
        ["Place 1", "Place 2", "Place 3", "Place 4"]
    );
}

#[tokio::test]
async fn zero_stall_budget_waits_out_long_stalls() {
    let slow_feed = || {
        MockSite::new((1..=3).map(|i| named(&format!("Place {i}"))).collect())
            .lazy(1, 1)
            .dry_scrolls(7)
    };

    let unbounded = orchestrator(&slow_feed(), 0)
        .run("turkish stores", 3)
        .await
        .unwrap();
    assert!(unbounded.is_complete());
    assert_eq!(unbounded.places.len(), 3);

    // Three stalled cycles in a row exhaust a budget of three.
    let bounded = orchestrator(&slow_feed(), 3)
        .run("turkish stores", 3)
        .await
        .unwrap();
    assert_eq!(names(&bounded.places), ["Place 1"]);
    assert_eq!(bounded.shortfall(), 2);
}

#[tokio::test]
async fn stalled_feed_ends_with_shortfall() {
    let site = MockSite::new(vec![named("Only Place")]);

    let report = orchestrator(&site, 3).run("turkish stores", 5).await.unwrap();

    assert_eq!(names(&report.places), ["Only Place"]);
    assert_eq!(report.shortfall(), 4);
    assert!(!report.is_complete());
    // Each listing is opened once, however many cycles stall.
    assert_eq!(site.clicked(), [0]);
    assert!(site.closed());
}

#[tokio::test]
async fn missing_first_listing_is_fatal() {
    let site = MockSite::new(Vec::new());

    let err = orchestrator(&site, 5).run("nowhere", 3).await.unwrap_err();

    assert!(matches!(
        err,
        ScrapeError::NoListings(EngineError::Timeout { .. })
    ));
    assert!(site.closed());
}

#[tokio::test]
async fn navigation_failure_is_fatal() {
    let site = MockSite::new(vec![named("Place 1")]).failing_navigation();

    let err = orchestrator(&site, 5).run("turkish stores", 1).await.unwrap_err();

    assert!(matches!(err, ScrapeError::Navigation { .. }));
    assert!(site.closed());
}

#[tokio::test]
async fn launch_failure_is_fatal() {
    let site = MockSite::new(vec![named("Place 1")]).failing_launch();

    let err = orchestrator(&site, 5).run("turkish stores", 1).await.unwrap_err();

    assert!(matches!(err, ScrapeError::Launch(_)));
    assert!(!site.closed());
}

#[tokio::test]
async fn consent_dialog_is_dismissed() {
    let site = MockSite::new(vec![named("Place 1")]).with_consent();

    let report = orchestrator(&site, 5).run("turkish stores", 1).await.unwrap();

    assert!(site.consent_clicked());
    assert_eq!(report.places.len(), 1);
}

#[tokio::test]
async fn consent_lookup_failure_is_ignored() {
    let site = MockSite::new(vec![named("Place 1")]).failing_selector(selectors::CONSENT_BUTTON);

    let report = orchestrator(&site, 5).run("turkish stores", 1).await.unwrap();

    assert_eq!(report.places.len(), 1);
}

#[tokio::test]
async fn progress_reports_each_acceptance() {
    let site = MockSite::new(vec![named("A"), named("A"), named("B")]);
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::new(Mutex::new(Vec::new()));

    let (calls_cb, seen_cb) = (calls.clone(), seen.clone());
    let report = orchestrator(&site, 5)
        .with_progress(Box::new(move |accepted: usize, target: usize, place: &Place| {
            calls_cb.fetch_add(1, Ordering::SeqCst);
            seen_cb
                .lock()
                .unwrap()
                .push((accepted, target, place.name.clone()));
        }))
        .run("turkish stores", 2)
        .await
        .unwrap();

    assert_eq!(report.places.len(), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(
        *seen.lock().unwrap(),
        [(1, 2, "A".to_string()), (2, 2, "B".to_string())]
    );
}

#[tokio::test]
async fn extracts_every_field() {
    let site = MockSite::new(vec![Some(detail(&[
        (selectors::PLACE_NAME, "Anatolia Market"),
        (selectors::ADDRESS, "1 Queen St W, Toronto"),
        (selectors::WEBSITE, "anatolia.ca"),
        (selectors::PHONE_NUMBER, "+1 416-555-0101"),
        (selectors::WHATSAPP, "+1 416-555-0102"),
        (selectors::REVIEWS_COUNT, "(1,234)"),
        (selectors::REVIEWS_AVERAGE, "4,5"),
        (selectors::INFO_FRAGMENTS[0], "Grocery \u{b7} In-store shopping"),
        (selectors::INFO_FRAGMENTS[2], "Grocery \u{b7} Delivery"),
        (selectors::OPENS_AT, "Monday\u{22c5}9\u{202f}AM\u{2013}5\u{202f}PM"),
        (selectors::PLACE_TYPE, "Grocery store"),
    ]))]);
    site.show(0);

    let place = FieldExtractor::new().extract(&site.page()).await;

    assert_eq!(place.name, "Anatolia Market");
    assert_eq!(place.address, "1 Queen St W, Toronto");
    assert_eq!(place.website, "anatolia.ca");
    assert_eq!(place.phone_number, "+1 416-555-0101");
    assert_eq!(place.whatsapp, "+1 416-555-0102");
    assert_eq!(place.reviews_count, Some(1234));
    assert_eq!(place.reviews_average, Some(4.5));
    assert_eq!(place.store_shopping, Availability::Yes);
    assert_eq!(place.in_store_pickup, Availability::No);
    assert_eq!(place.store_delivery, Availability::Yes);
    assert_eq!(place.opens_at, "9AM\u{2013}5PM");
    assert_eq!(place.place_type, "Grocery store");
    assert_eq!(place.introduction, NO_INTRODUCTION);
}

#[tokio::test]
async fn failing_field_does_not_affect_others() {
    let site = MockSite::new(vec![Some(detail(&[
        (selectors::PLACE_NAME, "Bosphorus Deli"),
        (selectors::ADDRESS, "9 King St"),
        (selectors::PHONE_NUMBER, "+1 416-555-0199"),
        (selectors::REVIEWS_COUNT, "not a number"),
        (selectors::INTRODUCTION, "Family-run deli."),
    ]))])
    .failing_selector(selectors::ADDRESS);
    site.show(0);

    let place = FieldExtractor::new().extract(&site.page()).await;

    assert_eq!(place.name, "Bosphorus Deli");
    assert_eq!(place.address, "");
    assert_eq!(place.phone_number, "+1 416-555-0199");
    assert_eq!(place.reviews_count, None);
    assert_eq!(place.introduction, "Family-run deli.");
}
