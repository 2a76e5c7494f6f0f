use readify_lib::dom::dom_tree::Document;
use readify_lib::parser::{html::create_dom_tree, serialize::to_html};
use readify_lib::reconcile::{Bucket, Defaults, OutcomeKind, Reconciler, ResultSet, RuleTable};
use readify_lib::DocumentQuery;
use serde_json::json;

fn rules(json: &str) -> RuleTable {
    RuleTable::from_json_str(json).unwrap()
}

fn attribute(document: &Document, selector: &str, name: &str) -> Option<String> {
    let element = document.query_selector(selector).unwrap()?;
    document.get_attribute(&element, name)
}

fn run(document: &mut Document, overrides: &RuleTable) -> ResultSet {
    Reconciler::new(&Defaults::default(), Some(overrides)).reconcile(document)
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin_landmark_role() {
        let mut document = create_dom_tree(r#"<nav id="primary"><a href="/">Home</a></nav>"#);
        let result = readify_lib::reconcile(&mut document, &Defaults::default(), None);

        assert_eq!(attribute(&document, "#primary", "role").as_deref(), Some("navigation"));
        let nav: Vec<_> = result.for_selector("nav").collect();
        assert_eq!(nav.len(), 1);
        assert_eq!(nav[0].kind.bucket(), Bucket::Ok);
        assert_eq!(nav[0].attribute.as_deref(), Some("role"));
        assert_eq!(nav[0].value, Some(json!("navigation")));
    }

    #[test]
    fn test_absent_selector_is_a_warning() {
        let mut document = create_dom_tree("<p>No live regions here</p>");
        let result = readify_lib::reconcile(&mut document, &Defaults::default(), None);

        let output: Vec<_> = result.for_selector("output").collect();
        assert_eq!(output.len(), 1);
        assert_eq!(output[0].kind, OutcomeKind::NotFound);
        assert_eq!(output[0].message, "Not found");
        assert!(result.fail.is_empty());
        assert!(result.ok.is_empty());
    }

    #[test]
    fn test_disallowed_attribute_leaves_dom_untouched() {
        let source = "<html><head></head><body><button>Go</button></body></html>";
        let mut document = create_dom_tree(source);
        let overrides = rules(r#"{ "_CONFIG_": { "ignore_defaults": true }, "button": { "onclick": "alert(1)" } }"#);
        let result = run(&mut document, &overrides);

        assert_eq!(result.fail.len(), 1);
        assert_eq!(result.fail[0].message, "Attribute not allowed");
        assert_eq!(result.fail[0].attribute.as_deref(), Some("onclick"));
        assert_eq!(to_html(&document).unwrap(), source);
    }

    #[test]
    fn test_reference_target_gets_generated_id() {
        let mut document = create_dom_tree(
            r#"<a class="more" href="/more">More</a><div class="details">Full details</div>"#,
        );
        let overrides = rules(r#"{ "a.more": { "aria-describedby": ".details" } }"#);
        let result = run(&mut document, &overrides);

        let id = attribute(&document, "div.details", "id").unwrap();
        assert!(id.starts_with("acfy-id-"));
        assert_eq!(attribute(&document, "a.more", "aria-describedby"), Some(id.clone()));

        let more: Vec<_> = result.for_selector("a.more").collect();
        assert_eq!(more.len(), 1);
        assert_eq!(more[0].kind, OutcomeKind::Added);
        assert_eq!(more[0].value, Some(json!(id)));
    }

    #[test]
    fn test_existing_target_id_is_reused() {
        let mut document = create_dom_tree(
            r#"<label id="email-label">Email</label><input type="email" name="email">"#,
        );
        let overrides = rules(r##"{ "input[name=email]": { "aria-labelledby": "#email-label" } }"##);
        run(&mut document, &overrides);

        assert_eq!(
            attribute(&document, "input", "aria-labelledby").as_deref(),
            Some("email-label")
        );
        assert!(!to_html(&document).unwrap().contains("acfy-id-"));
    }

    #[test]
    fn test_second_pass_is_idempotent() {
        let mut document = create_dom_tree(
            r#"<header></header><nav></nav><main></main><form><input required></form>"#,
        );
        let defaults = Defaults {
            header: Some("header".into()),
            ..Defaults::default()
        };
        let mut reconciler = Reconciler::new(&defaults, None);

        let first = reconciler.reconcile(&mut document);
        let added = first.ok.len();
        assert_eq!(added, 4);
        let after_first = to_html(&document).unwrap();

        let second = reconciler.reconcile(&mut document);
        assert!(second.ok.is_empty());
        let skipped: Vec<_> = second
            .warn
            .iter()
            .filter(|o| o.kind == OutcomeKind::AlreadyPresent)
            .collect();
        assert_eq!(skipped.len(), added);
        assert!(skipped.iter().all(|o| o.message == "Already present, skipped"));
        assert_eq!(to_html(&document).unwrap(), after_first);
    }

    #[test]
    fn test_one_outcome_per_element_attribute_pair() {
        let mut document = create_dom_tree(
            r#"<section><p class="a"></p><p class="a" title="set"></p><p class="a"></p></section>"#,
        );
        let overrides = rules(
            r#"{ "_CONFIG_": { "ignore_defaults": true },
                 "p.a": { "_note": "paragraphs", "title": "Para", "tabindex": 0, "onload": "x" } }"#,
        );
        let result = run(&mut document, &overrides);

        // three elements, three non-note attributes
        assert_eq!(result.len(), 9);
        assert_eq!(result.ok.len(), 5);
        assert_eq!(result.warn.len(), 1);
        assert_eq!(result.fail.len(), 3);
    }

    #[test]
    fn test_invalid_selector_does_not_stop_the_pass() {
        let mut document = create_dom_tree("<aside></aside>");
        let overrides = rules(r#"{ "div[": { "role": "note" }, "a:has(b)": { "title": "x" } }"#);
        let result = run(&mut document, &overrides);

        let invalid: Vec<&str> = result
            .fail
            .iter()
            .filter(|o| o.kind == OutcomeKind::InvalidSelector)
            .map(|o| o.selector.as_str())
            .collect();
        assert_eq!(invalid, vec!["div[", "a:has(b)"]);
        assert_eq!(attribute(&document, "aside", "role").as_deref(), Some("complementary"));
    }

    #[test]
    fn test_pseudo_class_selectors_match() {
        let mut document = create_dom_tree(
            r#"<ul><li id="a"></li><li id="b"></li></ul><input type="hidden"><input id="q">"#,
        );
        let overrides = rules(
            r#"{ "_CONFIG_": { "ignore_defaults": true },
                 "li:first-child": { "aria-current": "page" },
                 "input:not([type=hidden])": { "aria-label": "Search" },
                 "a:hover": { "title": "x" } }"#,
        );
        let result = run(&mut document, &overrides);

        assert_eq!(attribute(&document, "#a", "aria-current").as_deref(), Some("page"));
        assert_eq!(attribute(&document, "#b", "aria-current"), None);
        assert_eq!(attribute(&document, "#q", "aria-label").as_deref(), Some("Search"));
        let first: Vec<_> = result.for_selector("li:first-child").collect();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].kind, OutcomeKind::Added);
        let hover: Vec<_> = result.for_selector("a:hover").collect();
        assert_eq!(hover[0].kind, OutcomeKind::NotFound);
        assert!(result.fail.is_empty());
    }

    #[test]
    fn test_semicolon_inside_attribute_value() {
        let mut document = create_dom_tree(r#"<div data-x="a;b"></div>"#);
        let overrides = rules(
            r#"{ "_CONFIG_": { "ignore_defaults": true }, "[data-x=\"a;b\"]": { "role": "note" } }"#,
        );
        let result = run(&mut document, &overrides);

        assert!(result.fail.is_empty());
        assert_eq!(attribute(&document, "div", "role").as_deref(), Some("note"));
    }

    #[test]
    fn test_template_contents_are_left_alone() {
        let source = "<html><head></head><body><template><nav></nav></template></body></html>";
        let mut document = create_dom_tree(source);
        let overrides = rules(r#"{ "_CONFIG_": { "ignore_defaults": true }, "nav": { "role": "navigation" } }"#);
        let result = run(&mut document, &overrides);

        let nav: Vec<_> = result.for_selector("nav").collect();
        assert_eq!(nav.len(), 1);
        assert_eq!(nav[0].kind, OutcomeKind::NotFound);
        assert_eq!(to_html(&document).unwrap(), source);
    }

    #[test]
    fn test_result_carries_effective_table() {
        let mut document = create_dom_tree("<p></p>");
        let defaults = Defaults {
            main: Some("#content".into()),
            ..Defaults::default()
        };
        let overrides = rules(r#"{ "p": { "lang": "en" } }"#);
        let result = Reconciler::new(&defaults, Some(&overrides)).reconcile(&mut document);

        let keys: Vec<&str> = result.input.keys().collect();
        assert_eq!(
            keys,
            vec!["article", "aside", "nav", "main", "section", "output", "[required]", "#content", "p"]
        );
        assert_eq!(result.input.get("main"), Some(&Vec::new()));
        assert_eq!(attribute(&document, "p", "lang").as_deref(), Some("en"));
    }

    #[test]
    fn test_boolean_and_number_values_are_stringified() {
        let mut document = create_dom_tree(r#"<div class="w"></div>"#);
        let overrides = rules(r#"{ "_CONFIG_": { "ignore_defaults": true }, ".w": { "aria-hidden": true, "tabindex": -1 } }"#);
        run(&mut document, &overrides);

        assert_eq!(attribute(&document, ".w", "aria-hidden").as_deref(), Some("true"));
        assert_eq!(attribute(&document, ".w", "tabindex").as_deref(), Some("-1"));
    }
}
