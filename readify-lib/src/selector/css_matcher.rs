use crate::dom::dom_tree::{self, ElementNode, NodeData, NodeRef};
use crate::selector::SelectorError;
use std::rc::Rc;

/// ------------------------------
/// 1. Selector model
/// ------------------------------

/// Supported attribute selector operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeOperator {
    /// [attr="value"]
    Exact,
    /// [attr~="value"]
    Includes,
    /// [attr|="value"]
    DashMatch,
    /// [attr^="value"]
    Prefix,
    /// [attr$="value"]
    Suffix,
    /// [attr*="value"]
    Substring,
}

/// One attribute condition. `operator == None` is a presence check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSelector {
    pub name: String,
    pub operator: Option<AttributeOperator>,
    pub value: Option<String>,
    pub case_insensitive: bool,
}

/// `an+b` argument of the `:nth-*` pseudo-classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nth {
    pub a: i32,
    pub b: i32,
}

impl Nth {
    /// Whether the 1-based `index` equals `a*n + b` for some `n >= 0`.
    pub fn matches(self, index: i32) -> bool {
        if self.a == 0 {
            return index == self.b;
        }
        let diff = index - self.b;
        diff % self.a == 0 && diff / self.a >= 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PseudoClass {
    Root,
    Empty,
    FirstChild,
    LastChild,
    OnlyChild,
    FirstOfType,
    LastOfType,
    OnlyOfType,
    NthChild(Nth),
    NthLastChild(Nth),
    NthOfType(Nth),
    NthLastOfType(Nth),
    Not(Vec<ComplexSelector>),
    /// `:is()` and `:where()`; specificity plays no part in matching.
    Is(Vec<ComplexSelector>),
    /// Lowercased language range of `:lang()`.
    Lang(String),
    Link,
    Checked,
    Disabled,
    Enabled,
    Required,
    Optional,
    /// `:hover`, `:focus` and the other interaction states. A page that is
    /// not being displayed is in none of them.
    Dynamic,
}

/// Optional type selector plus any number of id, class, attribute and
/// pseudo-class conditions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompoundSelector {
    pub tag: Option<String>,
    pub ids: Vec<String>,
    pub classes: Vec<String>,
    pub attributes: Vec<AttributeSelector>,
    pub pseudo_classes: Vec<PseudoClass>,
    /// A pseudo-element never matches an element of the tree.
    pub pseudo_element: Option<String>,
}

/// A complex selector: the key (rightmost) compound and the compounds to its left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    pub key: CompoundSelector,
    /// Ancestors with their combinators, in right-to-left order.
    pub ancestors: Vec<(Combinator, CompoundSelector)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Descendant combinator (whitespace).
    Descendant,
    /// Child combinator (`>`).
    Child,
    /// Adjacent sibling combinator (`+`).
    AdjacentSibling,
    /// General sibling combinator (`~`).
    GeneralSibling,
}

/// Pseudo-elements that may also be written with a single colon.
const LEGACY_PSEUDO_ELEMENTS: &[&str] = &["before", "after", "first-line", "first-letter"];

/// Elements that can be disabled.
const FORM_CONTROLS: &[&str] = &[
    "button", "input", "select", "textarea", "optgroup", "option", "fieldset",
];

/// Elements that take the `required` attribute.
const REQUIRABLE: &[&str] = &["input", "select", "textarea"];

/// ------------------------------
/// 2. Parsing
/// ------------------------------

/// Parses a comma-separated selector list.
pub fn parse_selector_list(selector: &str) -> Result<Vec<ComplexSelector>, SelectorError> {
    SelectorParser::new(selector).parse_list_until(None)
}

struct SelectorParser<'a> {
    source: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> SelectorParser<'a> {
    fn new(source: &'a str) -> Self {
        SelectorParser {
            source,
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    /// Skips whitespace, returning whether any was present.
    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn syntax(&self, reason: impl Into<String>) -> SelectorError {
        SelectorError::Syntax {
            selector: self.source.to_string(),
            reason: format!("{} at offset {}", reason.into(), self.pos),
        }
    }

    fn unsupported(&self, feature: &str) -> SelectorError {
        SelectorError::Unsupported {
            selector: self.source.to_string(),
            feature: feature.to_string(),
        }
    }

    /// Comma-separated complex selectors up to `end` (consumed), or up to the
    /// end of input when `end` is `None`.
    fn parse_list_until(&mut self, end: Option<char>) -> Result<Vec<ComplexSelector>, SelectorError> {
        let mut list = Vec::new();
        loop {
            self.skip_whitespace();
            list.push(self.parse_complex()?);
            self.skip_whitespace();
            match self.bump() {
                Some(',') => continue,
                ch if ch == end => return Ok(list),
                None => return Err(self.syntax("unterminated argument list")),
                Some(ch) => return Err(self.syntax(format!("unexpected `{}`", ch))),
            }
        }
    }

    fn parse_complex(&mut self) -> Result<ComplexSelector, SelectorError> {
        let mut compounds = vec![self.parse_compound()?];
        let mut combinators = Vec::new();

        loop {
            let had_whitespace = self.skip_whitespace();
            let combinator = match self.peek() {
                None | Some(',') | Some(')') => break,
                Some('>') => Combinator::Child,
                Some('+') => Combinator::AdjacentSibling,
                Some('~') => Combinator::GeneralSibling,
                Some(_) if had_whitespace => Combinator::Descendant,
                Some(ch) => return Err(self.syntax(format!("unexpected `{}`", ch))),
            };
            if combinator != Combinator::Descendant {
                self.bump();
                self.skip_whitespace();
            }
            combinators.push(combinator);
            compounds.push(self.parse_compound()?);
        }

        let key = compounds
            .pop()
            .ok_or_else(|| self.syntax("expected a selector"))?;
        let ancestors = combinators
            .into_iter()
            .rev()
            .zip(compounds.into_iter().rev())
            .collect();
        Ok(ComplexSelector { key, ancestors })
    }

    fn parse_compound(&mut self) -> Result<CompoundSelector, SelectorError> {
        let mut compound = CompoundSelector::default();
        let mut empty = true;

        match self.peek() {
            Some('*') => {
                self.bump();
                empty = false;
            }
            Some(ch) if is_ident_start(ch) => {
                compound.tag = Some(self.parse_ident()?.to_ascii_lowercase());
                empty = false;
            }
            _ => {}
        }
        if self.peek() == Some('|') {
            return Err(self.unsupported("namespace prefix"));
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.bump();
                    let id = self.parse_ident()?;
                    compound.ids.push(id);
                }
                Some('.') => {
                    self.bump();
                    let class = self.parse_ident()?;
                    compound.classes.push(class);
                }
                Some('[') => {
                    self.bump();
                    let attribute = self.parse_attribute()?;
                    compound.attributes.push(attribute);
                }
                Some(':') => {
                    self.bump();
                    if self.peek() == Some(':') {
                        self.bump();
                        compound.pseudo_element = Some(self.parse_ident()?.to_ascii_lowercase());
                    } else {
                        let name = self.parse_ident()?.to_ascii_lowercase();
                        if self.peek() == Some('(') {
                            self.bump();
                            let pseudo = self.parse_functional_pseudo(&name)?;
                            compound.pseudo_classes.push(pseudo);
                        } else if LEGACY_PSEUDO_ELEMENTS.contains(&name.as_str()) {
                            compound.pseudo_element = Some(name);
                        } else {
                            let pseudo = self.simple_pseudo(&name)?;
                            compound.pseudo_classes.push(pseudo);
                        }
                    }
                }
                _ => break,
            }
            empty = false;
        }

        if empty {
            return Err(self.syntax("expected a selector"));
        }
        Ok(compound)
    }

    fn simple_pseudo(&self, name: &str) -> Result<PseudoClass, SelectorError> {
        let pseudo = match name {
            "root" => PseudoClass::Root,
            "empty" => PseudoClass::Empty,
            "first-child" => PseudoClass::FirstChild,
            "last-child" => PseudoClass::LastChild,
            "only-child" => PseudoClass::OnlyChild,
            "first-of-type" => PseudoClass::FirstOfType,
            "last-of-type" => PseudoClass::LastOfType,
            "only-of-type" => PseudoClass::OnlyOfType,
            "link" | "any-link" => PseudoClass::Link,
            "checked" => PseudoClass::Checked,
            "disabled" => PseudoClass::Disabled,
            "enabled" => PseudoClass::Enabled,
            "required" => PseudoClass::Required,
            "optional" => PseudoClass::Optional,
            "hover" | "active" | "focus" | "focus-visible" | "focus-within" | "visited"
            | "target" => PseudoClass::Dynamic,
            other => return Err(self.unsupported(&format!("`:{}`", other))),
        };
        Ok(pseudo)
    }

    /// Parses the argument of `:name(`; the opening parenthesis is already consumed.
    fn parse_functional_pseudo(&mut self, name: &str) -> Result<PseudoClass, SelectorError> {
        let pseudo = match name {
            "not" => PseudoClass::Not(self.parse_list_until(Some(')'))?),
            "is" | "where" => PseudoClass::Is(self.parse_list_until(Some(')'))?),
            "nth-child" => PseudoClass::NthChild(self.parse_nth()?),
            "nth-last-child" => PseudoClass::NthLastChild(self.parse_nth()?),
            "nth-of-type" => PseudoClass::NthOfType(self.parse_nth()?),
            "nth-last-of-type" => PseudoClass::NthLastOfType(self.parse_nth()?),
            "lang" => {
                self.skip_whitespace();
                let range = match self.peek() {
                    Some(quote @ ('"' | '\'')) => {
                        self.bump();
                        self.parse_string(quote)?
                    }
                    _ => self.parse_ident()?,
                };
                self.skip_whitespace();
                if self.bump() != Some(')') {
                    return Err(self.syntax("expected `)`"));
                }
                PseudoClass::Lang(range.to_ascii_lowercase())
            }
            other => return Err(self.unsupported(&format!("`:{}()`", other))),
        };
        Ok(pseudo)
    }

    fn parse_nth(&mut self) -> Result<Nth, SelectorError> {
        let mut text = String::new();
        loop {
            match self.bump() {
                None => return Err(self.syntax("unterminated `:nth-*()`")),
                Some(')') => break,
                Some(ch) => text.push(ch),
            }
        }
        if text.split_whitespace().any(|word| word.eq_ignore_ascii_case("of")) {
            return Err(self.unsupported("`of S` in `:nth-*()`"));
        }
        parse_nth_expression(&text)
            .ok_or_else(|| self.syntax(format!("invalid an+b expression `{}`", text.trim())))
    }

    /// Parses the inside of `[...]`; the opening bracket is already consumed.
    fn parse_attribute(&mut self) -> Result<AttributeSelector, SelectorError> {
        self.skip_whitespace();
        let name = self.parse_ident()?.to_ascii_lowercase();
        if self.peek() == Some('|') && self.chars.get(self.pos + 1) != Some(&'=') {
            return Err(self.unsupported("namespace prefix"));
        }
        self.skip_whitespace();

        let operator = match self.bump() {
            Some(']') => {
                return Ok(AttributeSelector {
                    name,
                    operator: None,
                    value: None,
                    case_insensitive: false,
                })
            }
            Some('=') => AttributeOperator::Exact,
            Some(ch @ ('~' | '|' | '^' | '$' | '*')) => {
                if self.bump() != Some('=') {
                    return Err(self.syntax(format!("expected `=` after `{}`", ch)));
                }
                match ch {
                    '~' => AttributeOperator::Includes,
                    '|' => AttributeOperator::DashMatch,
                    '^' => AttributeOperator::Prefix,
                    '$' => AttributeOperator::Suffix,
                    _ => AttributeOperator::Substring,
                }
            }
            _ => return Err(self.syntax("malformed attribute selector")),
        };

        self.skip_whitespace();
        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.bump();
                self.parse_string(quote)?
            }
            _ => self.parse_ident()?,
        };
        self.skip_whitespace();

        let case_insensitive = match self.peek() {
            Some('i' | 'I') => {
                self.bump();
                self.skip_whitespace();
                true
            }
            Some('s' | 'S') => {
                self.bump();
                self.skip_whitespace();
                false
            }
            _ => false,
        };

        if self.bump() != Some(']') {
            return Err(self.syntax("expected `]`"));
        }
        Ok(AttributeSelector {
            name,
            operator: Some(operator),
            value: Some(value),
            case_insensitive,
        })
    }

    fn parse_ident(&mut self) -> Result<String, SelectorError> {
        let mut out = String::new();
        while let Some(ch) = self.peek() {
            if ch == '\\' {
                self.bump();
                self.parse_escape(&mut out)?;
            } else if is_ident_char(ch) {
                out.push(ch);
                self.bump();
            } else {
                break;
            }
        }
        if out.is_empty() {
            return Err(self.syntax("expected an identifier"));
        }
        Ok(out)
    }

    /// Parses a quoted string; the opening quote is already consumed.
    fn parse_string(&mut self, quote: char) -> Result<String, SelectorError> {
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(self.syntax("unterminated string")),
                Some(ch) if ch == quote => return Ok(out),
                Some('\\') => {
                    if self.peek() == Some('\n') {
                        self.bump();
                    } else {
                        self.parse_escape(&mut out)?;
                    }
                }
                Some(ch) => out.push(ch),
            }
        }
    }

    /// CSS escape after a backslash: up to six hex digits, or one literal character.
    fn parse_escape(&mut self, out: &mut String) -> Result<(), SelectorError> {
        let mut hex = String::new();
        while hex.len() < 6 && self.peek().is_some_and(|ch| ch.is_ascii_hexdigit()) {
            hex.extend(self.bump());
        }
        if hex.is_empty() {
            let ch = self.bump().ok_or_else(|| self.syntax("dangling escape"))?;
            out.push(ch);
            return Ok(());
        }
        if self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
        let code = u32::from_str_radix(&hex, 16).unwrap_or(0);
        out.push(
            char::from_u32(code)
                .filter(|ch| *ch != '\0')
                .unwrap_or('\u{FFFD}'),
        );
        Ok(())
    }
}

/// `odd`, `even`, `b`, `an`, `an+b` and `an-b`, whitespace ignored.
fn parse_nth_expression(text: &str) -> Option<Nth> {
    let expr: String = text
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();
    match expr.as_str() {
        "odd" => return Some(Nth { a: 2, b: 1 }),
        "even" => return Some(Nth { a: 2, b: 0 }),
        _ => {}
    }
    let Some((a, b)) = expr.split_once('n') else {
        return Some(Nth {
            a: 0,
            b: expr.parse().ok()?,
        });
    };
    let a: i32 = match a {
        "" | "+" => 1,
        "-" => -1,
        digits => digits.parse().ok()?,
    };
    let b: i32 = if b.is_empty() {
        0
    } else if b.starts_with(['+', '-']) {
        b.parse().ok()?
    } else {
        return None;
    };
    Some(Nth { a, b })
}

fn is_ident_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_' || ch == '-' || ch == '\\' || !ch.is_ascii()
}

fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '-' || !ch.is_ascii()
}

/// ------------------------------
/// 3. Selector matching
/// ------------------------------

/// Returns true if the node is an element satisfying every condition of the
/// compound selector.
pub fn matches_compound(node: &NodeRef, compound: &CompoundSelector) -> bool {
    if compound.pseudo_element.is_some() {
        return false;
    }
    let simple = with_element(node, |elem| matches_simple(elem, compound));
    simple
        && compound
            .pseudo_classes
            .iter()
            .all(|pseudo| matches_pseudo_class(node, pseudo))
}

fn with_element(node: &NodeRef, test: impl FnOnce(&ElementNode) -> bool) -> bool {
    let node_ref = node.borrow();
    node_ref.as_element().is_some_and(test)
}

fn matches_simple(elem: &ElementNode, compound: &CompoundSelector) -> bool {
    if let Some(ref tag) = compound.tag {
        if !elem.tag.eq_ignore_ascii_case(tag) {
            return false;
        }
    }
    if !compound.ids.is_empty() {
        match elem.get_attribute("id") {
            Some(elem_id) if compound.ids.iter().all(|id| id == elem_id) => {}
            _ => return false,
        }
    }
    if !compound
        .classes
        .iter()
        .all(|class| elem.classes().any(|c| c == class))
    {
        return false;
    }
    compound
        .attributes
        .iter()
        .all(|attr_sel| matches_attribute(elem, attr_sel))
}

fn matches_attribute(elem: &ElementNode, attr_sel: &AttributeSelector) -> bool {
    let Some(actual) = elem.get_attribute(&attr_sel.name) else {
        return false;
    };
    let (Some(operator), Some(expected)) = (attr_sel.operator, attr_sel.value.as_deref()) else {
        return true;
    };
    let (actual, expected) = if attr_sel.case_insensitive {
        (actual.to_lowercase(), expected.to_lowercase())
    } else {
        (actual.to_string(), expected.to_string())
    };

    match operator {
        AttributeOperator::Exact => actual == expected,
        AttributeOperator::Includes => {
            !expected.is_empty()
                && !expected.contains(char::is_whitespace)
                && actual.split_ascii_whitespace().any(|word| word == expected)
        }
        AttributeOperator::DashMatch => {
            actual == expected || actual.starts_with(&format!("{}-", expected))
        }
        AttributeOperator::Prefix => !expected.is_empty() && actual.starts_with(&expected),
        AttributeOperator::Suffix => !expected.is_empty() && actual.ends_with(&expected),
        AttributeOperator::Substring => !expected.is_empty() && actual.contains(&expected),
    }
}

fn matches_pseudo_class(node: &NodeRef, pseudo: &PseudoClass) -> bool {
    match pseudo {
        PseudoClass::Root => dom_tree::parent_node(node).is_some_and(|parent| is_document_root(&parent)),
        PseudoClass::Empty => is_empty(node),
        PseudoClass::FirstChild => nth_matches(node, false, false, Nth { a: 0, b: 1 }),
        PseudoClass::LastChild => nth_matches(node, false, true, Nth { a: 0, b: 1 }),
        PseudoClass::OnlyChild => sibling_position(node, false).is_some_and(|(_, count)| count == 1),
        PseudoClass::FirstOfType => nth_matches(node, true, false, Nth { a: 0, b: 1 }),
        PseudoClass::LastOfType => nth_matches(node, true, true, Nth { a: 0, b: 1 }),
        PseudoClass::OnlyOfType => sibling_position(node, true).is_some_and(|(_, count)| count == 1),
        PseudoClass::NthChild(nth) => nth_matches(node, false, false, *nth),
        PseudoClass::NthLastChild(nth) => nth_matches(node, false, true, *nth),
        PseudoClass::NthOfType(nth) => nth_matches(node, true, false, *nth),
        PseudoClass::NthLastOfType(nth) => nth_matches(node, true, true, *nth),
        PseudoClass::Not(list) => !list.iter().any(|complex| matches_complex_selector(node, complex)),
        PseudoClass::Is(list) => list.iter().any(|complex| matches_complex_selector(node, complex)),
        PseudoClass::Lang(range) => inherited_lang(node).is_some_and(|lang| {
            let lang = lang.to_ascii_lowercase();
            lang == *range || lang.starts_with(&format!("{}-", range))
        }),
        PseudoClass::Link => with_element(node, |elem| {
            ["a", "area", "link"].contains(&elem.tag.as_str()) && elem.has_attribute("href")
        }),
        PseudoClass::Checked => with_element(node, |elem| match elem.tag.as_str() {
            "input" => elem.has_attribute("checked"),
            "option" => elem.has_attribute("selected"),
            _ => false,
        }),
        PseudoClass::Disabled => with_element(node, |elem| {
            FORM_CONTROLS.contains(&elem.tag.as_str()) && elem.has_attribute("disabled")
        }),
        PseudoClass::Enabled => with_element(node, |elem| {
            FORM_CONTROLS.contains(&elem.tag.as_str()) && !elem.has_attribute("disabled")
        }),
        PseudoClass::Required => with_element(node, |elem| {
            REQUIRABLE.contains(&elem.tag.as_str()) && elem.has_attribute("required")
        }),
        PseudoClass::Optional => with_element(node, |elem| {
            REQUIRABLE.contains(&elem.tag.as_str()) && !elem.has_attribute("required")
        }),
        PseudoClass::Dynamic => false,
    }
}

fn is_document_root(node: &NodeRef) -> bool {
    matches!(node.borrow().data, NodeData::DocumentRoot)
}

/// No element or text children; comments do not count.
fn is_empty(node: &NodeRef) -> bool {
    let node_ref = node.borrow();
    node_ref.children.iter().all(|child| {
        matches!(
            child.borrow().data,
            NodeData::Comment(_) | NodeData::ProcessingInstruction { .. }
        )
    })
}

fn element_tag(node: &NodeRef) -> Option<String> {
    node.borrow().as_element().map(|elem| elem.tag.clone())
}

/// 1-based position of `node` among the element children of its parent, and
/// the number of those children. With `of_type`, only siblings with the same
/// tag are counted.
fn sibling_position(node: &NodeRef, of_type: bool) -> Option<(i32, i32)> {
    let parent = dom_tree::parent_node(node)?;
    let tag = element_tag(node)?;
    let parent_ref = parent.borrow();
    let mut index = None;
    let mut count = 0;
    for child in &parent_ref.children {
        let Some(child_tag) = element_tag(child) else {
            continue;
        };
        if of_type && child_tag != tag {
            continue;
        }
        count += 1;
        if Rc::ptr_eq(child, node) {
            index = Some(count);
        }
    }
    index.map(|index| (index, count))
}

fn nth_matches(node: &NodeRef, of_type: bool, from_end: bool, nth: Nth) -> bool {
    sibling_position(node, of_type).is_some_and(|(index, count)| {
        let index = if from_end { count - index + 1 } else { index };
        nth.matches(index)
    })
}

/// The `lang` attribute of the element or its nearest ancestor carrying one.
fn inherited_lang(node: &NodeRef) -> Option<String> {
    let mut current = Some(Rc::clone(node));
    while let Some(element) = current {
        let lang = element
            .borrow()
            .as_element()
            .and_then(|elem| elem.get_attribute("lang").map(String::from));
        if lang.is_some() {
            return lang;
        }
        current = dom_tree::parent_element(&element);
    }
    None
}

/// Matches a complex selector against a candidate element, right to left,
/// backtracking over ancestors and siblings when a combinator has several
/// possible anchors.
pub fn matches_complex_selector(candidate: &NodeRef, complex: &ComplexSelector) -> bool {
    matches_compound(candidate, &complex.key) && matches_ancestors(candidate, &complex.ancestors)
}

fn matches_ancestors(node: &NodeRef, ancestors: &[(Combinator, CompoundSelector)]) -> bool {
    let Some(((combinator, compound), rest)) = ancestors.split_first() else {
        return true;
    };
    match combinator {
        Combinator::Child => dom_tree::parent_element(node).is_some_and(|parent| {
            matches_compound(&parent, compound) && matches_ancestors(&parent, rest)
        }),
        Combinator::Descendant => {
            let mut ancestor = dom_tree::parent_element(node);
            while let Some(current) = ancestor {
                if matches_compound(&current, compound) && matches_ancestors(&current, rest) {
                    return true;
                }
                ancestor = dom_tree::parent_element(&current);
            }
            false
        }
        Combinator::AdjacentSibling => dom_tree::previous_element_siblings(node)
            .first()
            .is_some_and(|sibling| {
                matches_compound(sibling, compound) && matches_ancestors(sibling, rest)
            }),
        Combinator::GeneralSibling => dom_tree::previous_element_siblings(node)
            .iter()
            .any(|sibling| matches_compound(sibling, compound) && matches_ancestors(sibling, rest)),
    }
}
