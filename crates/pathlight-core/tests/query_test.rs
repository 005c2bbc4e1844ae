use pathlight_core::{Document, ElementRef, query_all, query_one};

fn ids(elements: &[ElementRef<'_>]) -> Vec<String> {
    elements
        .iter()
        .map(|el| el.value().id().unwrap_or("-").to_string())
        .collect()
}

#[test]
fn test_plain_selector_is_native() {
    let doc = Document::parse(r#"<ul><li id="a">A</li><li id="b">B</li><li id="c">C</li></ul>"#);
    let result = query_all(&doc, "li");
    assert_eq!(ids(&result.elements), vec!["a", "b", "c"]);
    assert!(!result.used_fallback);
    assert_eq!(result.effective_selector, None);
    assert_eq!(result.original_selector, "li");
}

#[test]
fn test_not_found_is_not_a_fallback() {
    let doc = Document::parse("<button>Save</button>");
    let result = query_all(&doc, "button.missing");
    assert!(result.is_empty());
    assert!(!result.used_fallback);
    assert_eq!(result.effective_selector, None);
}

#[test]
fn test_nth_match_is_global_across_parents() {
    let doc = Document::parse(
        r#"
        <section><div data-testid="uplot-main-div" id="first"></div></section>
        <section>
          <article><div data-testid="uplot-main-div" id="second"></div></article>
        </section>
        <div><div data-testid="uplot-main-div" id="third"></div></div>
        "#,
    );

    let result = query_all(&doc, r#"div[data-testid="uplot-main-div"]:nth-match(3)"#);
    assert_eq!(ids(&result.elements), vec!["third"]);
    assert!(result.used_fallback);

    let first = query_all(&doc, r#"div[data-testid="uplot-main-div"]:nth-match(1)"#);
    assert_eq!(ids(&first.elements), vec!["first"]);
}

#[test]
fn test_nth_match_shortfall_reports_counts() {
    let doc = Document::parse(r#"<p>a</p><p>b</p><p>c</p>"#);
    let result = query_all(&doc, "p:nth-match(5)");
    assert!(result.is_empty());
    assert!(result.used_fallback);
    let diagnostic = result.effective_selector.unwrap();
    assert!(diagnostic.contains("wanted 5"), "{diagnostic}");
    assert!(diagnostic.contains("found 3"), "{diagnostic}");
}

#[test]
fn test_has_contains_nth_match_with_tail() {
    let doc = Document::parse(
        r#"
        <div data-x="1" id="container-a">
          <p>other-service</p>
          <button id="a1">1</button><button id="a2">2</button>
          <button id="a3">3</button><button id="a4">4</button>
        </div>
        <div data-x="2" id="container-b">
          <p>adaptive-logs-api</p>
          <button id="b1">1</button><button id="b2">2</button>
          <button id="b3">3</button><button id="b4">4</button>
        </div>
        "#,
    );

    let result = query_all(
        &doc,
        r#"div[data-x]:has(p:contains("adaptive-logs-api")):nth-match(1) button:nth-of-type(4)"#,
    );
    assert_eq!(ids(&result.elements), vec!["b4"]);
    assert!(result.used_fallback);
}

#[test]
fn test_has_with_nested_contains_keeps_only_qualifying_containers() {
    let doc = Document::parse(
        r#"
        <div class="item" id="one"><p>frontend</p></div>
        <div class="item" id="two"><span><p>checkoutservice</p></span></div>
        <div class="item" id="three"><p>checkout</p></div>
        <div class="item" id="four"><p>CheckoutService v2</p></div>
        "#,
    );

    let result = query_all(&doc, r#"div.item:has(p:contains("checkoutservice"))"#);
    assert_eq!(ids(&result.elements), vec!["two", "four"]);
}

#[test]
fn test_chained_has_is_an_intersection() {
    let doc = Document::parse(
        r#"
        <div class="card" id="only-a"><span class="a"></span></div>
        <div class="card" id="only-b"><span class="b"></span></div>
        <div class="card" id="both"><span class="a"></span><em><span class="b"></span></em></div>
        "#,
    );

    let result = query_all(&doc, "div.card:has(span.a):has(span.b)");
    assert_eq!(ids(&result.elements), vec!["both"]);
}

#[test]
fn test_has_with_trailing_descendant() {
    let doc = Document::parse(
        r#"
        <div class="row"><input id="i1"><label id="l1">Name</label></div>
        <div class="row"><label id="l2">Static</label></div>
        <div class="row"><input id="i3"><label id="l3">Email</label></div>
        "#,
    );

    let result = query_all(&doc, "div.row:has(input) label");
    assert_eq!(ids(&result.elements), vec!["l1", "l3"]);
}

#[test]
fn test_contains_vs_text() {
    let doc = Document::parse(r#"<div id="outer">Hello <span id="inner">World</span></div>"#);

    let contains = query_all(&doc, r#"div:contains("hello world")"#);
    assert_eq!(ids(&contains.elements), vec!["outer"]);

    assert!(query_all(&doc, r#"div:text("World")"#).is_empty());
    let text = query_all(&doc, r#"span:text("World")"#);
    assert_eq!(ids(&text.elements), vec!["inner"]);
    let outer = query_all(&doc, r#"div:text("Hello")"#);
    assert_eq!(ids(&outer.elements), vec!["outer"]);
}

#[test]
fn test_text_joins_split_text_nodes() {
    let doc = Document::parse(r#"<p id="p">foo<b>x</b>bar</p>"#);
    let result = query_all(&doc, r#"p:text("foobar")"#);
    assert_eq!(ids(&result.elements), vec!["p"]);
    assert!(query_all(&doc, r#"p:text("foo bar")"#).is_empty());
}

#[test]
fn test_contains_argument_quoting() {
    let doc = Document::parse(
        r#"<button id="st">Save &amp; Test</button><button id="s">Save</button><button id="c">Cancel</button>"#,
    );

    let single = query_all(&doc, "button:contains('Save & Test')");
    assert_eq!(ids(&single.elements), vec!["st"]);
    let unquoted = query_all(&doc, "button:contains(Save)");
    assert_eq!(ids(&unquoted.elements), vec!["st", "s"]);
    let double = query_all(&doc, r#"button:contains("cancel")"#);
    assert_eq!(ids(&double.elements), vec!["c"]);
}

#[test]
fn test_union_is_in_document_order() {
    let doc = Document::parse(r#"<p id="p">body text</p><h1 id="h">Title</h1>"#);
    let result = query_all(&doc, r#"h1:contains("Title"), p:contains("body")"#);
    assert_eq!(ids(&result.elements), vec!["p", "h"]);
}

#[test]
fn test_test_id_child_combinator_tolerates_wrappers() {
    let doc = Document::parse(
        r#"<div data-testid="panel"><div class="wrap"><button id="go">Go</button></div></div>"#,
    );

    let result = query_all(&doc, r#"[data-testid="panel"] > button"#);
    assert_eq!(ids(&result.elements), vec!["go"]);
    assert!(result.used_fallback);
    let effective = result.effective_selector.unwrap();
    assert!(!effective.contains('>'), "{effective}");

    let direct = query_all(&doc, r#"[data-testid="panel"] > div"#);
    assert_eq!(direct.elements.len(), 1);
    assert!(!direct.used_fallback);
}

#[test]
fn test_test_id_hierarchy_not_found() {
    let doc = Document::parse(r#"<div data-testid="panel"><span>x</span></div>"#);
    let result = query_all(&doc, r#"[data-testid="other"] > button"#);
    assert!(result.is_empty());
    assert!(result.used_fallback);
    assert_eq!(result.effective_selector.as_deref(), Some("TESTID_NOT_FOUND"));
}

#[test]
fn test_missing_test_id_without_hierarchy_is_native() {
    let doc = Document::parse(r#"<div data-testid="panel"><button>Save</button></div>"#);
    for selector in [
        r#"button[data-testid="Save button"]"#,
        r#"[data-testid="Save button"], [aria-label="Save button"]"#,
    ] {
        let result = query_all(&doc, selector);
        assert!(result.is_empty(), "{selector}");
        assert!(!result.used_fallback, "{selector}");
        assert_eq!(result.effective_selector, None, "{selector}");
    }
}

#[test]
fn test_malformed_selectors_degrade_to_markers() {
    let doc = Document::parse("<div><p>x</p></div><ul><li>1</li></ul>");
    for (selector, marker) in [
        ("p:contains(", "INVALID_CONTAINS_SYNTAX"),
        ("div:has(p:contains(x)", "INVALID_HAS_SYNTAX"),
        ("li:nth-match(0)", "INVALID_NTH_MATCH_INDEX"),
        ("li:nth-match(abc)", "INVALID_NTH_MATCH_SYNTAX"),
        ("p:no-such-pseudo", "UNSUPPORTED"),
    ] {
        let result = query_all(&doc, selector);
        assert!(result.is_empty(), "{selector}");
        assert!(result.used_fallback, "{selector}");
        assert_eq!(result.effective_selector.as_deref(), Some(marker), "{selector}");
    }
}

#[test]
fn test_query_one_returns_first_in_document_order() {
    let doc = Document::parse(r#"<a id="x" href="/a">Docs</a><a id="y" href="/b">Docs</a>"#);
    let first = query_one(&doc, r#"a:contains("Docs")"#).unwrap();
    assert_eq!(first.value().id(), Some("x"));
    assert!(query_one(&doc, r#"a:contains("Blog")"#).is_none());
}

#[test]
fn test_resolution_is_repeatable() {
    let doc = Document::parse(r#"<div class="c"><p>a</p></div><div class="c"><p>b</p></div>"#);
    let selector = r#"div.c:has(p:contains("b"))"#;
    let first = ids(&query_all(&doc, selector).elements);
    let second = ids(&query_all(&doc, selector).elements);
    assert_eq!(first, second);
}
