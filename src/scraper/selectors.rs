//! XPath locators for the map search page.
//!
//! These track the live page's markup and are the first thing to check when a
//! field starts coming back empty.

/// A result entry in the left-hand listing feed.
pub const LISTING: &str = r#"//a[contains(@href, "/maps/place/")]"#;

/// Cookie consent interstitial.
pub const CONSENT_BUTTON: &str = r#"//button[contains(., "Accept all")]"#;

/// Heading of an opened detail view. Its presence means the view rendered.
pub const PLACE_NAME: &str = r#"//h1[contains(@class, "DUwDvf")]"#;

pub const ADDRESS: &str =
    r#"//button[@data-item-id="address"]//div[contains(@class, "fontBodyMedium")]"#;

pub const WEBSITE: &str =
    r#"//a[@data-item-id="authority"]//div[contains(@class, "fontBodyMedium")]"#;

pub const PHONE_NUMBER: &str =
    r#"//button[contains(@data-item-id, "phone:tel:")]//div[contains(@class, "fontBodyMedium")]"#;

pub const WHATSAPP: &str = r#"//button[contains(@data-item-id, "phone:whatsapp:")]//div[contains(@class, "fontBodyMedium")]"#;

pub const REVIEWS_COUNT: &str = r#"//div[@class="TIHn2 "]//div[@class="fontBodyMedium dmRWX"]//div//span//span//span[@aria-label]"#;

pub const REVIEWS_AVERAGE: &str =
    r#"//div[@class="TIHn2 "]//div[@class="fontBodyMedium dmRWX"]//div//span[@aria-hidden]"#;

/// Amenity fragments such as "Electronics · In-store shopping".
pub const INFO_FRAGMENTS: [&str; 3] = [
    r#"//div[@class="LTs0Rc"][1]"#,
    r#"//div[@class="LTs0Rc"][2]"#,
    r#"//div[@class="LTs0Rc"][3]"#,
];

pub const OPENS_AT: &str =
    r#"//button[contains(@data-item-id, "oh")]//div[contains(@class, "fontBodyMedium")]"#;

pub const PLACE_TYPE: &str = r#"//div[@class="LBgpqf"]//button[@class="DkEaL "]"#;

pub const INTRODUCTION: &str = r#"//div[@class="WeS02d fontBodyMedium"]//div[@class="PYvSYb "]"#;
