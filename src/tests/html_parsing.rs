use super::*;

#[test]
fn comments_doctype_and_entities_are_handled() -> Result<()> {
    let dom = html::parse_html(
        r#"<!DOCTYPE html><!-- header --><h1 id="t">Parks &amp; Trails &#8212; &#x41;&rarr; &bogus;</h1>"#,
    )?;
    let title = dom.by_id("t").expect("heading");
    assert_eq!(dom.text_content(title), "Parks & Trails \u{2014} A\u{2192} &bogus;");
    assert_eq!(dom.children(dom.root()).len(), 1);
    Ok(())
}

#[test]
fn unclosed_comment_is_a_parse_error() {
    let err = html::parse_html("<p>ok</p><!-- never closed").expect_err("unclosed comment");
    assert_eq!(err, Error::HtmlParse("unclosed HTML comment".into()));
}

#[test]
fn unclosed_start_tag_is_a_parse_error() {
    let err = html::parse_html(r#"<input id="x""#).expect_err("unclosed tag");
    assert!(matches!(err, Error::HtmlParse(_)), "{err:?}");
}

#[test]
fn void_and_self_closing_tags_do_not_nest() -> Result<()> {
    let dom = html::parse_html(r#"<div id="d"><img src="a.jpg"><br><input id="i"/><span id="s">x</span></div>"#)?;
    let div = dom.by_id("d").expect("div");
    assert_eq!(dom.children(div).len(), 4);
    let span = dom.by_id("s").expect("span");
    assert_eq!(dom.parent(span), Some(div));
    Ok(())
}

#[test]
fn script_bodies_stay_raw_text() -> Result<()> {
    let dom = html::parse_html(
        r#"<script id="js">if (a < b && c) { document.write("<p>") }</script><p id="after">after</p>"#,
    )?;
    let script = dom.by_id("js").expect("script");
    assert_eq!(
        dom.text_content(script),
        r#"if (a < b && c) { document.write("<p>") }"#
    );
    assert!(dom.by_id("after").is_some());
    assert_eq!(dom.query_selector_all("p")?.len(), 1);
    Ok(())
}

#[test]
fn attributes_parse_bare_unquoted_and_duplicate_forms() -> Result<()> {
    let dom = html::parse_html(
        r#"<input id=box type=checkbox checked data-note='a "quoted" note' ID="ignored" title="x &amp; y">"#,
    )?;
    let input = dom.by_id("box").expect("input");
    assert_eq!(dom.attr(input, "checked").as_deref(), Some(""));
    assert!(dom.checked(input)?);
    assert_eq!(dom.attr(input, "data-note").as_deref(), Some(r#"a "quoted" note"#));
    assert_eq!(dom.attr(input, "title").as_deref(), Some("x & y"));
    assert_eq!(dom.by_id("ignored"), None);
    Ok(())
}

#[test]
fn paragraphs_close_implicitly() -> Result<()> {
    let dom = html::parse_html(r#"<p id="one">first<p id="two">second<div id="block"></div>"#)?;
    let root = dom.root();
    let one = dom.by_id("one").expect("p");
    let two = dom.by_id("two").expect("p");
    let block = dom.by_id("block").expect("div");
    assert_eq!(dom.parent(one), Some(root));
    assert_eq!(dom.parent(two), Some(root));
    assert_eq!(dom.parent(block), Some(root));
    Ok(())
}

#[test]
fn stray_end_tags_are_ignored() -> Result<()> {
    let dom = html::parse_html(r#"<div id="a"></span><em id="b">x</em></div>"#)?;
    let a = dom.by_id("a").expect("div");
    let b = dom.by_id("b").expect("em");
    assert_eq!(dom.parent(b), Some(a));
    Ok(())
}

#[test]
fn textarea_and_inputs_take_their_initial_values() -> Result<()> {
    let dom = html::parse_html(
        r#"
        <textarea id="m">Tom &amp; <b>Jerry</b></textarea>
        <input id="n" type="number" value="abc">
        <input id="d" type="date" value="2026-07-04">
        "#,
    )?;
    let message = dom.by_id("m").expect("textarea");
    assert_eq!(dom.value(message)?, "Tom & <b>Jerry</b>");
    assert_eq!(dom.value(dom.by_id("n").expect("number"))?, "");
    assert_eq!(dom.value(dom.by_id("d").expect("date"))?, "2026-07-04");
    Ok(())
}

#[test]
fn uppercase_markup_is_lowercased() -> Result<()> {
    let dom = html::parse_html(r#"<DIV ID="x" CLASS="Park"></DIV>"#)?;
    let x = dom.by_id("x").expect("div");
    assert_eq!(dom.tag_name(x), Some("div"));
    assert!(dom.class_contains(x, "Park")?);
    assert_eq!(dom.query_selector_all("DIV")?, vec![x]);
    Ok(())
}
