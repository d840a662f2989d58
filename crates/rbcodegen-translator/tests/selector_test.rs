use rbcodegen_translator::selector::{AttributeKind, Locator, is_internal_reference, normalize};

#[test]
fn test_empty_selector() {
    assert_eq!(normalize(None, None), Locator::Empty);
    assert_eq!(normalize(Some("   "), None), Locator::Empty);
    assert_eq!(normalize(None, None).expression(), r#"page.locator("")"#);
    assert_eq!(normalize(None, None).selector(), "");
}

#[test]
fn test_attribute_prefixes_map_to_locator_calls() {
    let cases = [
        ("role", "get_by_role"),
        ("text", "get_by_text"),
        ("label", "get_by_label"),
        ("placeholder", "get_by_placeholder"),
        ("title", "get_by_title"),
        ("data-testid", "get_by_test_id"),
    ];
    for (prefix, method) in cases {
        let selector = format!(r#"{}=Say "hi""#, prefix);
        let locator = normalize(Some(&selector), None);
        assert_eq!(
            locator.expression(),
            format!(r#"page.{}("Say \"hi\"")"#, method),
            "prefix {}",
            prefix
        );
        assert_eq!(locator.selector(), selector);
    }
}

#[test]
fn test_attribute_kind_lookup() {
    assert_eq!(AttributeKind::from_prefix("data-testid"), Some(AttributeKind::TestId));
    assert_eq!(AttributeKind::from_method("get_by_label"), Some(AttributeKind::Label));
    assert_eq!(AttributeKind::from_prefix("css"), None);
}

#[test]
fn test_structured_accessor_with_options() {
    let locator = normalize(Some("getByRole('button', { name: 'Submit' })"), None);
    assert_eq!(locator.expression(), r#"page.get_by_role("button", name: "Submit")"#);
}

#[test]
fn test_options_preserve_key_order_and_names() {
    let locator = normalize(
        Some("getByRole('checkbox', { name: 'Agree, then continue', exact: true, checked: false })"),
        None,
    );
    assert_eq!(
        locator.expression(),
        r#"page.get_by_role("checkbox", name: "Agree, then continue", exact: true, checked: false)"#
    );

    let locator = normalize(Some("locator('div', { hasText: 'Total' })"), None);
    assert_eq!(locator.expression(), r#"page.locator("div", hasText: "Total")"#);
}

#[test]
fn test_simple_accessor_collapses_to_attribute() {
    let locator = normalize(Some(r#"getByTestId("login")"#), None);
    assert_eq!(
        locator,
        Locator::Attribute {
            kind: AttributeKind::TestId,
            value: "login".into()
        }
    );
    assert_eq!(locator.expression(), r#"page.get_by_test_id("login")"#);
    assert_eq!(locator.selector(), "data-testid=login");
}

#[test]
fn test_accessor_chains() {
    let locator = normalize(
        Some("getByRole('row', { name: 'Alice' }).getByRole('button').first()"),
        None,
    );
    assert_eq!(
        locator.expression(),
        r#"page.get_by_role("row", name: "Alice").get_by_role("button").first"#
    );

    let locator = normalize(Some("locator('#main').getByText('Save').nth(1)"), None);
    assert_eq!(
        locator.expression(),
        r##"page.locator("#main").get_by_text("Save").nth(1)"##
    );
}

#[test]
fn test_accessor_literal_arguments() {
    let locator = normalize(Some("getByText(/welcome/i)"), None);
    assert_eq!(locator.expression(), "page.get_by_text(/welcome/i)");

    let locator = normalize(Some(r#"getByText('It\'s "here"')"#), None);
    assert_eq!(locator.expression(), r#"page.get_by_text("It's \"here\"")"#);
}

#[test]
fn test_resolved_accessor_preferred() {
    let locator = normalize(
        Some("aria-ref=e7"),
        Some("getByRole('textbox', { name: 'Email' })"),
    );
    assert_eq!(
        locator.expression(),
        r#"page.get_by_role("textbox", name: "Email")"#
    );
    // The positional API cannot express options, so it keeps the raw token.
    assert_eq!(locator.selector(), "aria-ref=e7");
}

#[test]
fn test_resolved_simple_accessor_reduces_to_attribute_token() {
    let locator = normalize(Some("aria-ref=e4"), Some("getByLabel('Name')"));
    assert_eq!(locator.selector(), "label=Name");
    assert_eq!(locator.expression(), r#"page.get_by_label("Name")"#);
}

#[test]
fn test_unparseable_resolution_falls_back_to_raw() {
    let locator = normalize(Some("#submit"), Some("not a locator"));
    assert_eq!(locator, Locator::Raw("#submit".into()));
}

#[test]
fn test_unresolved_reference_passes_through() {
    let locator = normalize(Some("aria-ref=e7"), None);
    assert!(locator.is_reference());
    assert_eq!(locator.expression(), r#"page.locator("aria-ref=e7")"#);
    assert!(is_internal_reference("aria-ref=e7"));
    assert!(!is_internal_reference("#e7"));
}

#[test]
fn test_raw_selectors_are_escaped() {
    let locator = normalize(Some(r#"input[name="q"]"#), None);
    assert_eq!(locator, Locator::Raw(r#"input[name="q"]"#.into()));
    assert_eq!(locator.expression(), r#"page.locator("input[name=\"q\"]")"#);

    let locator = normalize(Some("li:nth-child(2) > a"), None);
    assert_eq!(locator.expression(), r#"page.locator("li:nth-child(2) > a")"#);
}

#[test]
fn test_malformed_accessor_is_raw() {
    let locator = normalize(Some("getByRole('button'"), None);
    assert_eq!(locator, Locator::Raw("getByRole('button'".into()));
}

#[test]
fn test_code_like_arguments_fall_back_to_raw() {
    for selector in [r#"getByText(system("id"))"#, "getByText(foo bar)", r#"locator(a + '"')"#] {
        let locator = normalize(Some(selector), None);
        assert_eq!(locator, Locator::Raw(selector.to_string()), "{}", selector);
    }
    assert_eq!(
        normalize(Some(r#"getByText(system("id"))"#), None).expression(),
        r#"page.locator("getByText(system(\"id\"))")"#
    );
}

#[test]
fn test_code_like_resolution_is_not_trusted() {
    let locator = normalize(Some("aria-ref=e2"), Some("getByRole(`x${y}`.trim())"));
    assert_eq!(locator, Locator::Reference("aria-ref=e2".into()));

    let locator = normalize(Some("aria-ref=e2"), Some("getByRole('button', { name: evil() })"));
    assert_eq!(locator.expression(), r#"page.locator("aria-ref=e2")"#);
}

#[test]
fn test_escaped_code_points_in_arguments() {
    let locator = normalize(Some(r"getByText('Café \x41')"), None);
    assert_eq!(locator.expression(), r#"page.get_by_text("Café A")"#);
}

#[test]
fn test_resolution_without_raw_selector_is_kept() {
    assert_eq!(normalize(None, Some("#submit")), Locator::Raw("#submit".into()));
    assert_eq!(
        normalize(Some(""), Some("aria-ref=e5")),
        Locator::Reference("aria-ref=e5".into())
    );
}
