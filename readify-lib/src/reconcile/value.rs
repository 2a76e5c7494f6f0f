use serde::Serialize;
use serde_json::{Number, Value};
use std::fmt;

/// An attribute value a rule may write: text, number or boolean.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    Text(String),
    Number(Number),
    Bool(bool),
}

/// A rule value of a type that cannot become an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisallowedValue {
    pub kind: &'static str,
}

impl fmt::Display for DisallowedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} values cannot be written to attributes", self.kind)
    }
}

impl TryFrom<&Value> for AttrValue {
    type Error = DisallowedValue;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(text) => Ok(AttrValue::Text(text.clone())),
            Value::Number(number) => Ok(AttrValue::Number(number.clone())),
            Value::Bool(flag) => Ok(AttrValue::Bool(*flag)),
            Value::Null => Err(DisallowedValue { kind: "null" }),
            Value::Array(_) => Err(DisallowedValue { kind: "array" }),
            Value::Object(_) => Err(DisallowedValue { kind: "object" }),
        }
    }
}

/// The string the DOM stores: text verbatim, `true`/`false`, numbers in JSON form.
impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Text(text) => f.write_str(text),
            AttrValue::Number(number) => write!(f, "{}", number),
            AttrValue::Bool(flag) => write!(f, "{}", flag),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_scalars_as_attribute_text() {
        let cases = [
            (json!("polite"), "polite"),
            (json!(0), "0"),
            (json!(-1), "-1"),
            (json!(1.5), "1.5"),
            (json!(true), "true"),
        ];
        for (raw, expected) in cases {
            let value = AttrValue::try_from(&raw).unwrap();
            assert_eq!(value.to_string(), expected);
        }
    }

    #[test]
    fn rejects_structured_values() {
        assert_eq!(
            AttrValue::try_from(&json!(null)),
            Err(DisallowedValue { kind: "null" })
        );
        assert_eq!(
            AttrValue::try_from(&json!(["a"])),
            Err(DisallowedValue { kind: "array" })
        );
        assert_eq!(
            AttrValue::try_from(&json!({"a": 1})),
            Err(DisallowedValue { kind: "object" })
        );
    }
}
