use park_booking_page::{
    BrowserTab, FixedClock, KeyValueStore, LocationNavigationKind, MemoryStorage, ScrollRequest,
    StorageHandle,
};

const BOOKING_HTML: &str = r#"
<a id="backToProfile" href="/profile">Back to profile</a>
<form id="bookingForm" action="/booking/confirm" method="post">
  <select id="parkSelect" name="park_id">
    <option value="">Choose a park</option>
    <option value="1">Yosemite</option>
    <option value="2">Zion</option>
    <option value="3">Acadia</option>
  </select>
  <input id="visitDate" name="date" type="date">
  <input id="numTickets" name="num_tickets" type="number" value="1">
  <input id="health_safety" name="health_safety" type="checkbox">
  <label for="health_safety">I have read the health &amp; safety guidelines</label>
  <a id="health-link" href="/health-safety">Health &amp; Safety Guidelines</a>
  <button id="submitBooking" type="submit">Book now</button>
</form>
"#;

const GUIDELINES_HTML: &str = r#"
<h1>Health &amp; Safety Guidelines</h1>
<ol>
  <li>Carry enough water.
  <li>Stay on marked trails.
</ol>
<a id="returnToBooking" href="/booking/new?health_safety_read=true">I have read these guidelines</a>
"#;

const CONFIRM_HTML: &str = r#"<main><h1>Booking confirmed</h1></main>"#;

const PROFILE_HTML: &str = r#"<main><h1>Your profile</h1></main>"#;

fn tab() -> BrowserTab {
    BrowserTab::new().clock(FixedClock::ymd(2026, 3, 14).expect("valid date"))
}

#[test]
fn draft_survives_the_guidelines_detour_and_submit_clears_it() -> park_booking_page::Result<()>
{
    let mut tab = tab();
    tab.navigate("https://parks.example/booking/new", BOOKING_HTML)?;
    tab.assert_value("#visitDate", "2026-03-14")?;
    tab.assert_disabled("#health_safety", true)?;

    tab.select_option("#parkSelect", "2")?;
    tab.type_text("#visitDate", "2026-04-02")?;
    tab.type_text("#numTickets", "3")?;

    // The checkbox is locked until the guidelines have been opened.
    tab.click("#health_safety")?;
    tab.assert_checked("#health_safety", false)?;

    tab.click("#health-link")?;
    assert_eq!(
        tab.session_storage().get_item("bookingFormData").as_deref(),
        Some(r#"{"park_id":"2","date":"2026-04-02","num_tickets":"3"}"#)
    );

    let guidelines = tab.follow_navigation(GUIDELINES_HTML)?;
    assert_eq!(guidelines.url(), "https://parks.example/health-safety");
    assert_eq!(
        tab.local_storage().get_item("healthSafetyRead").as_deref(),
        Some("true")
    );

    tab.click("#returnToBooking")?;
    let booking = tab.follow_navigation(BOOKING_HTML)?;
    assert_eq!(booking.url(), "https://parks.example/booking/new");
    assert_eq!(booking.location().len(), 1);
    booking.assert_value("#parkSelect", "2")?;
    booking.assert_value("#visitDate", "2026-04-02")?;
    booking.assert_value("#numTickets", "3")?;
    booking.assert_checked("#health_safety", true)?;
    booking.assert_disabled("#health_safety", false)?;

    tab.click("#submitBooking")?;
    let page = tab.page_mut()?;
    assert!(page.take_alert_messages().is_empty());
    let submissions = page.take_submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].field("park_id"), Some("2"));
    assert_eq!(submissions[0].field("date"), Some("2026-04-02"));
    assert_eq!(submissions[0].field("num_tickets"), Some("3"));
    assert_eq!(tab.session_storage().get_item("bookingFormData"), None);

    let confirmation = tab.follow_navigation(CONFIRM_HTML)?;
    assert_eq!(confirmation.url(), "https://parks.example/booking/confirm");
    assert_eq!(
        tab.visited(),
        [
            "https://parks.example/booking/new",
            "https://parks.example/health-safety",
            "https://parks.example/booking/new",
            "https://parks.example/booking/confirm",
        ]
    );
    Ok(())
}

#[test]
fn submitting_before_acknowledging_points_at_the_guidelines() -> park_booking_page::Result<()> {
    let mut tab = tab();
    tab.navigate("https://parks.example/booking/new", BOOKING_HTML)?;
    tab.select_option("#parkSelect", "1")?;
    tab.click("#submitBooking")?;

    let page = tab.page_mut()?;
    assert_eq!(
        page.take_alert_messages(),
        ["You must acknowledge and agree to the health & safety guidelines."]
    );
    assert_eq!(
        page.take_scroll_requests(),
        [ScrollRequest {
            target: "#health-link".into(),
            smooth: true,
        }]
    );
    assert!(page.take_submissions().is_empty());
    assert!(page.take_navigations().is_empty());
    Ok(())
}

#[test]
fn reloading_without_the_flag_locks_the_checkbox_again() -> park_booking_page::Result<()> {
    let mut tab = tab();
    tab.navigate(
        "https://parks.example/booking/new?health_safety_read=true",
        BOOKING_HTML,
    )?;
    tab.assert_checked("#health_safety", true)?;
    assert_eq!(tab.current_url()?, "https://parks.example/booking/new");

    let reload = tab.current_url()?.to_string();
    tab.navigate(&reload, BOOKING_HTML)?;
    tab.assert_checked("#health_safety", false)?;
    tab.assert_disabled("#health_safety", true)?;
    Ok(())
}

#[test]
fn back_to_profile_abandons_the_draft() -> park_booking_page::Result<()> {
    let mut tab = tab();
    tab.navigate("https://parks.example/booking/new", BOOKING_HTML)?;
    tab.select_option("#parkSelect", "3")?;
    tab.click("#health-link")?;
    tab.follow_navigation(GUIDELINES_HTML)?;
    tab.click("#returnToBooking")?;
    tab.follow_navigation(BOOKING_HTML)?;
    tab.assert_value("#parkSelect", "3")?;

    tab.click("#backToProfile")?;
    assert!(tab.session_storage().is_empty());

    let profile = tab.follow_navigation(PROFILE_HTML)?;
    assert_eq!(profile.url(), "https://parks.example/profile");
    assert!(profile.script_names().is_empty());
    Ok(())
}

#[test]
fn full_session_storage_does_not_block_the_detour() -> park_booking_page::Result<()> {
    let mut tab = tab().session_storage_handle(StorageHandle::new(MemoryStorage::with_quota(8)));
    tab.navigate("https://parks.example/booking/new", BOOKING_HTML)?;
    tab.select_option("#parkSelect", "2")?;
    tab.click("#health-link")?;

    let page = tab.page_mut()?;
    let navigations = page.take_navigations();
    assert_eq!(navigations.len(), 1);
    assert_eq!(navigations[0].kind, LocationNavigationKind::Link);
    assert_eq!(navigations[0].to, "https://parks.example/health-safety");
    assert!(tab.session_storage().is_empty());
    Ok(())
}
