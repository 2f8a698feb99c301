use super::*;

const HOME_HTML: &str = r#"
    <header><a href="/">Parks</a></header>
    <section id="parks"><h2>Parks</h2></section>
    <section id="contact"><h2>Contact</h2></section>
"#;

const GUIDELINES_HTML: &str = r#"
    <h1>Health &amp; Safety Guidelines</h1>
    <p>Carry water. Stay on marked trails.</p>
    <a id="returnToBooking" href="/booking/new?health_safety_read=true">Return to booking</a>
"#;

#[test]
fn contact_anchor_scrolls_after_the_delay() -> Result<()> {
    let mut page = Page::builder("https://parks.example/#contact", HOME_HTML)
        .site_scripts()
        .load()?;
    assert_eq!(page.script_names(), vec!["navigation"]);
    assert!(page.take_scroll_requests().is_empty());

    page.advance_time(99)?;
    assert!(page.take_scroll_requests().is_empty());

    page.advance_time(1)?;
    assert_eq!(
        page.take_scroll_requests(),
        vec![ScrollRequest {
            target: "#contact".into(),
            smooth: true,
        }]
    );
    assert_eq!(page.now_ms(), 100);
    Ok(())
}

#[test]
fn other_fragments_do_not_scroll() -> Result<()> {
    for url in ["https://parks.example/#parks", "https://parks.example/", "https://parks.example/#"] {
        let mut page = Page::builder(url, HOME_HTML).site_scripts().load()?;
        assert!(page.pending_timers().is_empty(), "{url}");
        page.advance_time(1_000)?;
        assert!(page.take_scroll_requests().is_empty(), "{url}");
    }
    Ok(())
}

#[test]
fn anchor_without_a_contact_section_is_harmless() -> Result<()> {
    let mut page = Page::builder("https://parks.example/#contact", "<main></main>")
        .site_scripts()
        .load()?;
    page.advance_time(100)?;
    assert!(page.take_scroll_requests().is_empty());
    Ok(())
}

#[test]
fn configured_anchor_and_delay_are_used() -> Result<()> {
    let mut config = PageConfig::default();
    config.navigation.contact_anchor = "parks".into();
    config.navigation.scroll_delay_ms = 250;
    let mut page = Page::builder("https://parks.example/#parks", HOME_HTML)
        .config(config)
        .site_scripts()
        .load()?;
    page.advance_time(249)?;
    assert!(page.take_scroll_requests().is_empty());
    page.run_due_timers()?;
    page.advance_time(1)?;
    assert_eq!(page.take_scroll_requests()[0].target, "#parks");
    Ok(())
}

#[test]
fn guidelines_page_remembers_it_was_shown() -> Result<()> {
    let page = Page::builder("https://parks.example/health-safety", GUIDELINES_HTML)
        .site_scripts()
        .load()?;
    assert_eq!(page.script_names(), vec!["booking"]);
    assert_eq!(
        page.local_storage().get_item("healthSafetyRead").as_deref(),
        Some("true")
    );
    assert!(page.session_storage().is_empty());
    Ok(())
}

#[test]
fn guidelines_flag_failure_does_not_break_the_page() -> Result<()> {
    let (page, logs) = capture_logs(|| {
        Page::builder("https://parks.example/health-safety", GUIDELINES_HTML)
            .local_storage(StorageHandle::new(MemoryStorage::with_quota(4)))
            .site_scripts()
            .load()
    });
    let page = page?;
    assert_eq!(page.local_storage().get_item("healthSafetyRead"), None);
    assert!(logs.contains("WARN"), "{logs}");
    assert!(logs.contains("guidelines flag not saved"), "{logs}");
    Ok(())
}

#[test]
fn return_link_leads_back_to_the_gated_booking_url() -> Result<()> {
    let mut page = Page::builder("https://parks.example/health-safety", GUIDELINES_HTML)
        .site_scripts()
        .load()?;
    page.click("#returnToBooking")?;
    let navigations = page.take_navigations();
    assert_eq!(navigations.len(), 1);
    assert_eq!(navigations[0].kind, LocationNavigationKind::Link);
    assert_eq!(
        navigations[0].to,
        "https://parks.example/booking/new?health_safety_read=true"
    );
    Ok(())
}
