use std::{collections::HashMap, fmt};

/// A single value returned in a query result column
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NA"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    n.as_f64().map(Value::Float).unwrap_or(Value::Null)
                }
            }
            serde_json::Value::String(s) => Value::Str(s),
            // Lists, maps and nodes are not used by the analyses, so keep their JSON text
            v => Value::Str(v.to_string()),
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

/// One result row: column name -> value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: HashMap<String, Value>,
}

impl Record {
    pub fn get(&self, col: &str) -> Option<&Value> {
        self.fields.get(col)
    }

    /// String value of a column.  Null, missing and non string columns give None
    pub fn str(&self, col: &str) -> Option<&str> {
        match self.fields.get(col) {
            Some(Value::Str(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Non-negative integer column (i.e., the result of count())
    pub fn count(&self, col: &str) -> anyhow::Result<u64> {
        match self.fields.get(col) {
            Some(Value::Int(i)) => u64::try_from(*i)
                .map_err(|_| anyhow!("Negative count {} in column {}", i, col)),
            Some(v) => Err(anyhow!("Expected a count in column {}, found {}", col, v)),
            None => Err(anyhow!("Missing column {}", col)),
        }
    }

    /// Numeric column; Null gives Ok(None)
    pub fn number(&self, col: &str) -> anyhow::Result<Option<f64>> {
        match self.fields.get(col) {
            Some(Value::Int(i)) => Ok(Some(*i as f64)),
            Some(Value::Float(x)) => Ok(Some(*x)),
            Some(Value::Null) => Ok(None),
            Some(v) => Err(anyhow!("Expected a number in column {}, found {}", col, v)),
            None => Err(anyhow!("Missing column {}", col)),
        }
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_conversion() {
        assert_eq!(Value::from(json!(null)), Value::Null);
        assert_eq!(Value::from(json!(42)), Value::Int(42));
        assert_eq!(Value::from(json!(2.5)), Value::Float(2.5));
        assert_eq!(Value::from(json!("TP53")), Value::Str("TP53".to_owned()));
        assert_eq!(Value::from(json!(true)), Value::Bool(true));
        assert_eq!(Value::from(json!([1, 2])), Value::Str("[1,2]".to_owned()));
    }

    #[test]
    fn typed_access() {
        let r: Record = [
            ("name".to_owned(), Value::from("asthma")),
            ("count".to_owned(), Value::Int(7)),
            ("neg".to_owned(), Value::Int(-1)),
            ("avg".to_owned(), Value::Float(1.5)),
            ("min".to_owned(), Value::Null),
        ]
        .into_iter()
        .collect();

        assert_eq!(r.str("name"), Some("asthma"));
        assert_eq!(r.str("count"), None);
        assert_eq!(r.str("missing"), None);
        assert_eq!(r.count("count").unwrap(), 7);
        assert!(r.count("neg").is_err());
        assert!(r.count("name").is_err());
        assert!(r.count("missing").is_err());
        assert_eq!(r.number("avg").unwrap(), Some(1.5));
        assert_eq!(r.number("count").unwrap(), Some(7.0));
        assert_eq!(r.number("min").unwrap(), None);
        assert!(r.number("name").is_err());
        assert_eq!(
            r.count("avg").unwrap_err().to_string(),
            "Expected a count in column avg, found 1.5"
        );
    }
}
