use super::*;

const SAVED_DRAFT: &str = r#"{"park_id":"1","date":"2026-05-01","num_tickets":"2"}"#;

#[test]
fn unchecked_submit_is_blocked_with_alert_and_scroll() -> Result<()> {
    let mut page = booking_page_in(BOOKING_URL, BOOKING_HTML, session_with_draft(SAVED_DRAFT)?)?;
    page.click("#submitBooking")?;

    assert_eq!(
        page.take_alert_messages(),
        vec!["You must acknowledge and agree to the health & safety guidelines.".to_string()]
    );
    assert_eq!(
        page.take_scroll_requests(),
        vec![ScrollRequest {
            target: "#health-link".into(),
            smooth: true,
        }]
    );
    assert!(page.take_submissions().is_empty());
    assert!(page.take_navigations().is_empty());
    assert_eq!(
        page.session_storage().get_item("bookingFormData").as_deref(),
        Some(SAVED_DRAFT)
    );
    Ok(())
}

#[test]
fn checked_submit_proceeds_and_drops_the_draft() -> Result<()> {
    let mut page = booking_page_in(
        &format!("{BOOKING_URL}?health_safety_read=true"),
        BOOKING_HTML,
        session_with_draft(SAVED_DRAFT)?,
    )?;
    page.click("#submitBooking")?;

    assert!(page.take_alert_messages().is_empty());
    let submissions = page.take_submissions();
    assert_eq!(submissions.len(), 1);
    let submission = &submissions[0];
    assert_eq!(submission.form_id.as_deref(), Some("bookingForm"));
    assert_eq!(submission.method, "post");
    assert_eq!(submission.action, "https://parks.example/booking/confirm");
    assert_eq!(submission.field("park_id"), Some("1"));
    assert_eq!(submission.field("date"), Some("2026-05-01"));
    assert_eq!(submission.field("num_tickets"), Some("2"));
    assert_eq!(submission.field("health_safety"), Some("on"));

    assert_eq!(page.session_storage().get_item("bookingFormData"), None);
    let navigations = page.take_navigations();
    assert_eq!(navigations.len(), 1);
    assert_eq!(navigations[0].kind, LocationNavigationKind::FormSubmit);
    Ok(())
}

#[test]
fn unchecking_after_the_gate_blocks_submission_again() -> Result<()> {
    let mut page = booking_page_in(
        &format!("{BOOKING_URL}?health_safety_read=true"),
        BOOKING_HTML,
        session_with_draft(SAVED_DRAFT)?,
    )?;
    page.set_checked("#health_safety", false)?;
    page.submit("#bookingForm")?;

    assert_eq!(page.take_alert_messages().len(), 1);
    assert!(page.take_submissions().is_empty());
    assert!(page.session_storage().get_item("bookingFormData").is_some());

    page.set_checked("#health_safety", true)?;
    page.submit("#bookingForm")?;
    assert_eq!(page.take_submissions().len(), 1);
    assert_eq!(page.session_storage().get_item("bookingFormData"), None);
    Ok(())
}

#[test]
fn form_without_a_checkbox_submits_and_drops_the_draft() -> Result<()> {
    let html = r#"
        <form id="bookingForm" action="/booking/confirm" method="post">
          <input id="numTickets" name="num_tickets" type="number" value="2">
          <button type="submit" id="go">Book</button>
        </form>
    "#;
    let mut page = booking_page_in(BOOKING_URL, html, session_with_draft(SAVED_DRAFT)?)?;
    page.click("#go")?;

    assert!(page.take_alert_messages().is_empty());
    assert_eq!(page.take_submissions().len(), 1);
    assert_eq!(page.session_storage().get_item("bookingFormData"), None);
    Ok(())
}

#[test]
fn blocked_submit_without_guidelines_link_only_alerts() -> Result<()> {
    let html = r#"
        <form id="bookingForm">
          <input id="health_safety" type="checkbox">
          <button type="submit" id="go">Book</button>
        </form>
    "#;
    let mut page = booking_page_in(BOOKING_URL, html, StorageHandle::in_memory())?;
    page.click("#go")?;

    assert_eq!(page.take_alert_messages().len(), 1);
    assert!(page.take_scroll_requests().is_empty());
    Ok(())
}

#[test]
fn back_link_discards_the_draft() -> Result<()> {
    let mut page = booking_page_in(BOOKING_URL, BOOKING_HTML, session_with_draft(SAVED_DRAFT)?)?;
    page.click("#backToProfile")?;

    assert_eq!(page.session_storage().get_item("bookingFormData"), None);
    let navigations = page.take_navigations();
    assert_eq!(navigations.len(), 1);
    assert_eq!(navigations[0].to, "https://parks.example/profile");
    Ok(())
}

#[test]
fn back_link_without_a_draft_is_harmless() -> Result<()> {
    let mut page = booking_page(BOOKING_URL)?;
    page.click("#backToProfile")?;
    assert_eq!(page.session_storage().get_item("bookingFormData"), None);
    assert!(page.session_storage().is_empty());
    Ok(())
}

#[test]
fn back_link_discards_even_a_malformed_draft() -> Result<()> {
    let mut config = PageConfig::default();
    config.booking.clear_corrupt_draft = false;
    let mut page = Page::builder(BOOKING_URL, BOOKING_HTML)
        .config(config)
        .clock(FixedClock(today()))
        .session_storage(session_with_draft("[broken")?)
        .site_scripts()
        .load()?;
    assert!(page.session_storage().get_item("bookingFormData").is_some());

    page.click("#backToProfile")?;
    assert_eq!(page.session_storage().get_item("bookingFormData"), None);
    Ok(())
}
