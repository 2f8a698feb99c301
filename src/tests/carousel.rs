use super::*;

const CAROUSEL_HTML: &str = r#"
    <div class="carousel-wrapper">
      <button type="button" class="carousel-arrow-left">&larr;</button>
      <div class="parks-carousel">
        <article class="park-card">Yosemite</article>
        <article class="park-card">Zion</article>
        <article class="park-card">Acadia</article>
        <article class="park-card">Denali</article>
        <article class="park-card">Olympic</article>
      </div>
      <button type="button" class="carousel-arrow-right">&rarr;</button>
    </div>
"#;

fn carousel_page() -> Result<Page> {
    let mut page = Page::builder("https://parks.example/", CAROUSEL_HTML)
        .site_scripts()
        .load()?;
    page.set_layout(".parks-carousel", 600, 1500)?;
    Ok(page)
}

fn track_left(page: &Page) -> Result<i64> {
    Ok(page.dom().scroll_left(page.select_one(".parks-carousel")?))
}

#[test]
fn previous_arrow_starts_disabled_and_settle_timers_are_queued() -> Result<()> {
    let page = carousel_page()?;
    assert_eq!(page.script_names(), vec!["carousel"]);
    page.assert_disabled(".carousel-arrow-left", true)?;

    let due = page
        .pending_timers()
        .iter()
        .map(|timer| timer.due_at)
        .collect::<Vec<_>>();
    assert_eq!(due, vec![100, 500]);
    Ok(())
}

#[test]
fn settle_timers_re_evaluate_after_layout_arrives() -> Result<()> {
    let mut page = carousel_page()?;
    // Load ran before layout was known, so the track looked empty.
    page.assert_disabled(".carousel-arrow-right", true)?;

    page.advance_time(100)?;
    page.assert_disabled(".carousel-arrow-left", true)?;
    page.assert_disabled(".carousel-arrow-right", false)?;
    assert_eq!(page.pending_timers().len(), 1);

    page.advance_time(400)?;
    assert!(page.pending_timers().is_empty());
    Ok(())
}

#[test]
fn arrows_scroll_by_one_step_and_disable_at_the_ends() -> Result<()> {
    let mut page = carousel_page()?;
    page.advance_time(500)?;

    page.click(".carousel-arrow-right")?;
    assert_eq!(track_left(&page)?, 300);
    page.assert_disabled(".carousel-arrow-left", false)?;
    page.assert_disabled(".carousel-arrow-right", false)?;

    page.click(".carousel-arrow-right")?;
    page.click(".carousel-arrow-right")?;
    assert_eq!(track_left(&page)?, 900);
    page.assert_disabled(".carousel-arrow-right", true)?;

    page.click(".carousel-arrow-right")?;
    assert_eq!(track_left(&page)?, 900);

    page.click(".carousel-arrow-left")?;
    assert_eq!(track_left(&page)?, 600);
    page.assert_disabled(".carousel-arrow-right", false)?;
    Ok(())
}

#[test]
fn edges_have_a_small_tolerance() -> Result<()> {
    let mut page = carousel_page()?;
    page.advance_time(500)?;

    page.scroll_to(".parks-carousel", 8)?;
    page.assert_disabled(".carousel-arrow-left", true)?;

    page.scroll_to(".parks-carousel", 11)?;
    page.assert_disabled(".carousel-arrow-left", false)?;

    page.scroll_to(".parks-carousel", 891)?;
    page.assert_disabled(".carousel-arrow-right", true)?;
    Ok(())
}

#[test]
fn resize_re_evaluates_the_buttons() -> Result<()> {
    let mut page = carousel_page()?;
    page.advance_time(500)?;
    page.assert_disabled(".carousel-arrow-right", false)?;

    page.set_layout(".parks-carousel", 1500, 1500)?;
    page.resize()?;
    page.assert_disabled(".carousel-arrow-right", true)?;
    Ok(())
}

#[test]
fn custom_step_is_used() -> Result<()> {
    let mut config = PageConfig::default();
    config.carousel.scroll_step = 250;
    let mut page = Page::builder("https://parks.example/", CAROUSEL_HTML)
        .config(config)
        .site_scripts()
        .load()?;
    page.set_layout(".parks-carousel", 600, 1500)?;
    page.resize()?;
    page.click(".carousel-arrow-right")?;
    assert_eq!(track_left(&page)?, 250);
    Ok(())
}

#[test]
fn carousel_needs_both_arrows() -> Result<()> {
    let html = r#"
        <button type="button" class="carousel-arrow-left">&larr;</button>
        <div class="parks-carousel"></div>
    "#;
    let page = Page::builder("https://parks.example/", html)
        .site_scripts()
        .load()?;
    assert!(page.script_names().is_empty());
    page.assert_disabled(".carousel-arrow-left", false)?;
    assert!(page.pending_timers().is_empty());
    Ok(())
}
