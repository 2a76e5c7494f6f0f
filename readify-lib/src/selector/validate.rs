use crate::selector::SelectorError;
use lightningcss::rules::CssRule;
use lightningcss::stylesheet::{ParserOptions, StyleSheet};

/// Checks a selector list for CSS syntax errors.
///
/// The selector is parsed by LightningCSS as the prelude of an empty style
/// rule, so anything a browser's `querySelectorAll` would reject as a syntax
/// error is rejected here too. Which of the valid selectors this crate can
/// actually match is decided later by `css_matcher`.
pub fn validate_selector(selector: &str) -> Result<(), SelectorError> {
    let trimmed = selector.trim();
    if trimmed.is_empty() {
        return Err(SelectorError::Syntax {
            selector: selector.to_string(),
            reason: "empty selector".to_string(),
        });
    }
    let css = format!("{} {{}}", trimmed);
    let sheet = StyleSheet::parse(&css, ParserOptions::default()).map_err(|e| {
        SelectorError::Syntax {
            selector: selector.to_string(),
            reason: e.to_string(),
        }
    })?;

    // Text that closes the rule and opens another one parses into more than
    // one rule.
    match sheet.rules.0.as_slice() {
        [CssRule::Style(_)] => Ok(()),
        _ => Err(SelectorError::Syntax {
            selector: selector.to_string(),
            reason: "not a style rule selector".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_selectors() {
        for selector in [
            "nav",
            "[required]",
            "a.more",
            "#details",
            "header > nav ul li + li",
            "input[type=\"email\" i], textarea",
            "a:hover",
            "[data-x=\"a;b\"]",
            "[title='{x}']",
        ] {
            assert!(validate_selector(selector).is_ok(), "{selector}");
        }
    }

    #[test]
    fn rejects_broken_syntax() {
        for selector in [
            "",
            "   ",
            "a[",
            "nav >",
            "##x",
            "a,,b",
            "a {} b",
            "a { color: red } b",
            "@media print",
        ] {
            assert!(validate_selector(selector).is_err(), "{selector}");
        }
    }
}
