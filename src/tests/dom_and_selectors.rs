use super::*;

fn dom(html: &str) -> Result<Dom> {
    html::parse_html(html)
}

fn one(dom: &Dom, selector: &str) -> Result<NodeId> {
    dom.query_selector(selector)?
        .ok_or_else(|| Error::SelectorNotFound(selector.to_string()))
}

#[test]
fn compound_and_combinator_selectors_match() -> Result<()> {
    let dom = dom(r#"
        <div id="wrap" class="card featured">
          <ul>
            <li class="park">Zion</li>
            <li class="park closed" data-state="winter">Denali</li>
          </ul>
          <p><span class="park">Acadia</span></p>
        </div>
    "#)?;

    assert_eq!(dom.query_selector_all(".park")?.len(), 3);
    assert_eq!(dom.query_selector_all("ul > .park")?.len(), 2);
    assert_eq!(dom.query_selector_all("#wrap .park")?.len(), 3);
    assert_eq!(dom.query_selector_all("div > .park")?.len(), 0);
    assert_eq!(dom.query_selector_all("li.park.closed")?.len(), 1);
    assert_eq!(dom.query_selector_all(r#"[data-state="winter"]"#)?.len(), 1);
    assert_eq!(dom.query_selector_all("[data-state^=win]")?.len(), 1);
    assert_eq!(dom.query_selector_all(r#"[class~="featured"]"#)?.len(), 1);
    assert_eq!(dom.query_selector_all("li:first-child")?.len(), 1);
    assert_eq!(dom.query_selector_all("li, span")?.len(), 3);

    let first = one(&dom, "li:first-child")?;
    assert_eq!(dom.text_content(first), "Zion");
    Ok(())
}

#[test]
fn state_pseudo_classes_follow_control_state() -> Result<()> {
    let mut dom = dom(r#"
        <form>
          <input id="a" type="checkbox" checked>
          <input id="b" type="checkbox">
          <fieldset disabled><input id="c" type="text"></fieldset>
          <button id="d">Go</button>
        </form>
    "#)?;

    assert_eq!(dom.query_selector_all("input:checked")?, vec![one(&dom, "#a")?]);
    assert_eq!(dom.query_selector_all("input:disabled")?, vec![one(&dom, "#c")?]);
    assert_eq!(dom.query_selector_all(":disabled")?.len(), 2);
    assert_eq!(dom.query_selector_all("input:enabled")?.len(), 2);

    let b = one(&dom, "#b")?;
    dom.set_checked(b, true)?;
    assert_eq!(dom.query_selector_all("input:checked")?.len(), 2);
    Ok(())
}

#[test]
fn unsupported_selectors_are_reported() -> Result<()> {
    let dom = dom("<div></div>")?;
    for selector in ["a:hover", "div >", "> div", "", "div + p", "[data-x", "a::before"] {
        let err = dom.query_selector(selector).expect_err(selector);
        assert!(matches!(err, Error::UnsupportedSelector(_)), "{selector}: {err:?}");
    }
    Ok(())
}

#[test]
fn closest_and_matches_walk_inclusive_ancestors() -> Result<()> {
    let dom = dom(r#"<section class="box"><div class="thumb-item"><img id="pic"></div></section>"#)?;
    let pic = one(&dom, "#pic")?;
    let thumb = one(&dom, ".thumb-item")?;

    assert_eq!(dom.closest(pic, ".thumb-item")?, Some(thumb));
    assert_eq!(dom.closest(thumb, ".thumb-item")?, Some(thumb));
    assert_eq!(dom.closest(pic, "form")?, None);
    assert!(dom.matches_selector(pic, "section img")?);
    assert!(!dom.matches_selector(pic, "div > section img")?);
    assert!(dom.is_descendant_of(pic, thumb));
    Ok(())
}

#[test]
fn form_data_follows_successful_controls() -> Result<()> {
    let dom = dom(r#"
        <form id="f">
          <input name="park" value="3">
          <input name="pets" type="checkbox">
          <input name="guide" type="checkbox" checked>
          <input name="plan" type="radio" value="day">
          <input name="plan" type="radio" value="camp" checked>
          <input name="frozen" value="x" disabled>
          <input value="nameless">
          <input name="go" type="submit" value="Send">
          <select name="size"><option>Small</option><option selected value="L">Large</option></select>
          <textarea name="note">hi &amp; bye</textarea>
        </form>
        <input name="outside" form="f" value="yes">
    "#)?;
    let form = one(&dom, "#f")?;
    let fields = dom.form_data(form)?;
    let expected = [
        ("park", "3"),
        ("guide", "on"),
        ("plan", "camp"),
        ("size", "L"),
        ("note", "hi & bye"),
        ("outside", "yes"),
    ]
    .map(|(name, value)| (name.to_string(), value.to_string()));
    assert_eq!(fields, expected.to_vec());
    Ok(())
}

#[test]
fn select_value_tracks_selected_option() -> Result<()> {
    let mut dom = dom(r#"
        <select id="s"><option value="">Pick</option><option value="1">One</option><option>Two</option></select>
    "#)?;
    let select = one(&dom, "#s")?;
    assert_eq!(dom.value(select)?, "");

    dom.set_value(select, "Two")?;
    assert_eq!(dom.value(select)?, "Two");

    dom.set_value(select, "99")?;
    assert_eq!(dom.value(select)?, "");
    assert!(dom.query_selector("option[selected]")?.is_none());
    Ok(())
}

#[test]
fn typed_inputs_sanitize_their_values() -> Result<()> {
    let mut dom = dom(r#"
        <input id="n" type="number">
        <input id="d" type="date">
        <input id="t" type="text">
    "#)?;
    let (n, d, t) = (one(&dom, "#n")?, one(&dom, "#d")?, one(&dom, "#t")?);

    dom.set_value(n, "2")?;
    assert_eq!(dom.value(n)?, "2");
    dom.set_value(n, "-1.5e3")?;
    assert_eq!(dom.value(n)?, "-1.5e3");
    dom.set_value(n, "two")?;
    assert_eq!(dom.value(n)?, "");

    dom.set_value(d, "2026-02-28")?;
    assert_eq!(dom.value(d)?, "2026-02-28");
    dom.set_value(d, "2026-02-30")?;
    assert_eq!(dom.value(d)?, "");
    dom.set_value(d, "2026-2-3")?;
    assert_eq!(dom.value(d)?, "");

    dom.set_value(t, "line\none")?;
    assert_eq!(dom.value(t)?, "lineone");
    Ok(())
}

#[test]
fn classes_and_dataset_round_through_attributes() -> Result<()> {
    let mut dom = dom(r#"<div id="x" class="a  b"></div>"#)?;
    let x = one(&dom, "#x")?;

    dom.class_add(x, "c")?;
    dom.class_add(x, "a")?;
    assert_eq!(dom.attr(x, "class").as_deref(), Some("a b c"));
    dom.class_remove(x, "b")?;
    assert!(!dom.class_contains(x, "b")?);
    dom.class_remove(x, "a")?;
    dom.class_remove(x, "c")?;
    assert_eq!(dom.attr(x, "class"), None);

    dom.set_dataset(x, "originalText", "Send")?;
    assert_eq!(dom.attr(x, "data-original-text").as_deref(), Some("Send"));
    assert_eq!(dom.dataset(x, "originalText").as_deref(), Some("Send"));
    Ok(())
}

#[test]
fn insertion_and_removal_keep_the_id_index_current() -> Result<()> {
    let mut dom = dom(r#"<form id="f"><input id="name"><button id="b">Go</button></form>"#)?;
    let name = one(&dom, "#name")?;
    let form = one(&dom, "#f")?;

    let note = dom.create_detached_element("div");
    dom.set_attr(note, "id", "note")?;
    assert_eq!(dom.by_id("note"), None);

    dom.insert_after(name, note)?;
    assert_eq!(dom.by_id("note"), Some(note));
    assert_eq!(dom.next_sibling(name), Some(note));

    let banner = dom.create_detached_element("p");
    let first = dom.first_child(form);
    dom.insert_before(form, banner, first)?;
    assert_eq!(dom.first_child(form), Some(banner));

    dom.remove_node(note)?;
    assert_eq!(dom.by_id("note"), None);
    assert!(!dom.is_connected(note));
    assert!(dom.query_selector("#note")?.is_none());
    Ok(())
}

#[test]
fn disabled_reflects_to_the_attribute() -> Result<()> {
    let mut dom = dom(r#"<button id="b">Go</button>"#)?;
    let button = one(&dom, "#b")?;
    dom.set_disabled(button, true)?;
    assert!(dom.disabled(button));
    assert_eq!(dom.attr(button, "disabled").as_deref(), Some(""));
    dom.set_disabled(button, false)?;
    assert!(!dom.has_attr(button, "disabled"));
    Ok(())
}

#[test]
fn dump_node_serializes_sorted_attributes() -> Result<()> {
    let mut dom = dom(r#"<p id="x" class="lead">Tom &amp; Jerry<br></p>"#)?;
    let p = one(&dom, "#x")?;
    assert_eq!(
        dom.dump_node(p),
        r#"<p class="lead" id="x">Tom &amp; Jerry<br></p>"#
    );

    dom.set_text_content(p, "<b>")?;
    assert_eq!(dom.dump_node(p), r#"<p class="lead" id="x">&lt;b&gt;</p>"#);
    Ok(())
}
