//! Name rules applied to rule-table keys and attribute names.

use regex::Regex;
use std::sync::LazyLock;

/// Attributes a rule may write. Everything else (event handlers, `href`,
/// `src`, ...) is refused so a rule table cannot inject script.
static ALLOWED_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:aria-[a-z]+|role|tabindex|title|alt|data-[\w-]+|lang|style|maxlength|placeholder|pattern|required|type|target|accesskey|longdesc)$",
    )
    .expect("valid regex")
});

/// Inline documentation inside an attribute object, e.g. `"_note": "why"`.
static NOTE_ATTRIBUTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^_?note").expect("valid regex"));

/// Keys such as `_CONFIG_` configure the table instead of naming a selector.
static DIRECTIVE_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^_[A-Z]+_").expect("valid regex"));

static REFERENCE_ATTRIBUTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(describ|label)l?edby").expect("valid regex"));

/// Spelled-out text of the allow-list, for failure details.
pub const ALLOWED_ATTRIBUTES_HINT: &str = "aria-*, role, tabindex, title, alt, data-*, lang, style, \
     maxlength, placeholder, pattern, required, type, target, accesskey, longdesc";

pub fn is_allowed_attribute(name: &str) -> bool {
    ALLOWED_ATTRIBUTE.is_match(name)
}

pub fn is_note(name: &str) -> bool {
    NOTE_ATTRIBUTE.is_match(name)
}

pub fn is_directive(key: &str) -> bool {
    DIRECTIVE_KEY.is_match(key)
}

/// Which id reference an attribute name asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    LabelledBy,
    DescribedBy,
}

impl ReferenceKind {
    /// Recognises the `aria-labelledby`/`aria-labeledby`/`aria-describedby`
    /// spellings. Unprefixed names are rejected by the allow-list first.
    pub fn from_attribute(name: &str) -> Option<Self> {
        let captures = REFERENCE_ATTRIBUTE.captures(name)?;
        if captures[1].eq_ignore_ascii_case("label") {
            Some(ReferenceKind::LabelledBy)
        } else {
            Some(ReferenceKind::DescribedBy)
        }
    }

    pub fn canonical_attribute(self) -> &'static str {
        match self {
            ReferenceKind::LabelledBy => "aria-labelledby",
            ReferenceKind::DescribedBy => "aria-describedby",
        }
    }
}
