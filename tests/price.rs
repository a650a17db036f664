//! Price extraction cascade tests against scripted product pages.

mod common;

use budget_sync::{parse_price, Item, PriceScraper, RunConfig, Section};
use common::ScriptedDriver;

fn fast_config() -> RunConfig {
    RunConfig::new().settle_ms(0)
}

fn linked_item(name: &str, link: &str) -> Item {
    Item {
        name: name.into(),
        description: String::new(),
        quantity: 1,
        unit_cost: 10.0,
        link: link.into(),
        row: 3,
    }
}

#[test]
fn test_widget_selector_beats_generic_fallback() {
    let driver = ScriptedDriver::new();
    driver.set_texts("#priceblock_ourprice", &["$19.99"]);
    driver.set_texts("[class*=\"price\"]", &["$99.99"]);
    let config = fast_config();

    let raw = PriceScraper::new(&driver, &config).extract();
    assert_eq!(raw.as_deref(), Some("$19.99"));
}

#[test]
fn test_widget_priority_order() {
    let driver = ScriptedDriver::new();
    driver.set_texts("#corePriceDisplay_desktop_feature_div .a-offscreen", &["$5.00"]);
    driver.set_texts("#priceblock_ourprice", &["$7.00"]);
    let config = fast_config();

    let raw = PriceScraper::new(&driver, &config).extract();
    assert_eq!(raw.as_deref(), Some("$5.00"));
}

#[test]
fn test_non_numeric_widget_text_is_skipped() {
    let driver = ScriptedDriver::new();
    driver.set_texts("#priceblock_ourprice", &["See options"]);
    driver.set_texts("[data-price]", &["12.34"]);
    let config = fast_config();

    let raw = PriceScraper::new(&driver, &config).extract();
    assert_eq!(raw.as_deref(), Some("12.34"));
}

#[test]
fn test_whole_fraction_composition() {
    let driver = ScriptedDriver::new();
    driver.set_texts(".a-price-whole", &["1,299"]);
    driver.set_texts(".a-price-fraction", &["99"]);
    let config = fast_config();

    let raw = PriceScraper::new(&driver, &config).extract();
    assert_eq!(raw.as_deref(), Some("1299.99"));
    assert_eq!(raw.as_deref().and_then(parse_price), Some(1299.99));
}

#[test]
fn test_whole_fraction_requires_digit_parts() {
    let driver = ScriptedDriver::new();
    driver.set_texts(".a-price-whole", &["n/a"]);
    driver.set_texts(".a-price-fraction", &["99"]);
    let config = fast_config();

    // The composition rejects non-digit parts and nothing else matches
    assert_eq!(PriceScraper::new(&driver, &config).extract(), None);
}

#[test]
fn test_page_scan_is_the_last_resort() {
    let driver = ScriptedDriver::new();
    driver.state.borrow_mut().page_html =
        "<html><body><span>only $ 1,299.99 today</span></body></html>".into();
    let config = fast_config();

    let raw = PriceScraper::new(&driver, &config).extract().unwrap();
    assert!(raw.contains("1,299.99"));
    assert_eq!(parse_price(&raw), Some(1299.99));
}

#[test]
fn test_extract_without_any_signal() {
    let driver = ScriptedDriver::new();
    let config = fast_config();

    assert_eq!(PriceScraper::new(&driver, &config).extract(), None);
}

#[test]
fn test_enrich_updates_cost_and_screenshots() {
    let driver = ScriptedDriver::new();
    driver.set_texts("#priceblock_ourprice", &["$129.99"]);
    let config = fast_config().screenshots_dir("shots");

    let mut sections = vec![Section {
        name: "Electronics".into(),
        items: vec![
            linked_item("Camera", "https://shop.example/camera"),
            linked_item("No Link", ""),
        ],
    }];

    let updates = PriceScraper::new(&driver, &config).enrich(&mut sections);

    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].row, 3);
    assert_eq!(updates[0].cost, 129.99);
    assert_eq!(sections[0].items[0].unit_cost, 129.99);
    // The unlinked item was never visited
    assert_eq!(sections[0].items[1].unit_cost, 10.0);

    let state = driver.state.borrow();
    assert_eq!(state.navigations, vec!["https://shop.example/camera"]);
    assert_eq!(state.screenshots.len(), 1);
    assert!(state.screenshots[0].ends_with("Camera.png"));
}

#[test]
fn test_enrich_treats_zero_as_no_price() {
    let driver = ScriptedDriver::new();
    driver.set_texts("#priceblock_ourprice", &["$0.00"]);
    let config = fast_config();

    let mut sections = vec![Section {
        name: "Electronics".into(),
        items: vec![linked_item("Camera", "https://shop.example/camera")],
    }];

    let updates = PriceScraper::new(&driver, &config).enrich(&mut sections);

    assert!(updates.is_empty());
    assert_eq!(sections[0].items[0].unit_cost, 10.0);
    // The screenshot is still taken even though no price was found
    assert_eq!(driver.state.borrow().screenshots.len(), 1);
}

#[test]
fn test_enrich_survives_screenshot_failure() {
    let driver = ScriptedDriver::new();
    driver.set_texts("#priceblock_ourprice", &["$42.00"]);
    driver.state.borrow_mut().screenshot_fails = true;
    let config = fast_config();

    let mut sections = vec![Section {
        name: "Electronics".into(),
        items: vec![linked_item("Camera", "https://shop.example/camera")],
    }];

    let updates = PriceScraper::new(&driver, &config).enrich(&mut sections);

    // Capture failure does not block price normalization
    assert_eq!(updates.len(), 1);
    assert_eq!(sections[0].items[0].unit_cost, 42.0);
}
