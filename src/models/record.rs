//! Dataset record model
//!
//! One instruction/input/output unit. The record keeps the JSON object it
//! was read from, key order included, so a file round-trips unchanged apart
//! from `output`. `output` is updated in place, or appended as the last key
//! when the record had none.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

const INSTRUCTION: &str = "instruction";
const INPUT: &str = "input";
const OUTPUT: &str = "output";

/// A single dataset record
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    /// Create a record with only an instruction
    pub fn new(instruction: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert(INSTRUCTION.to_string(), Value::String(instruction.into()));
        Self { fields }
    }

    /// Builder-style input setter
    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.fields.insert(INPUT.to_string(), Value::String(input.into()));
        self
    }

    /// Builder-style output setter
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.set_output(output);
        self
    }

    pub fn instruction(&self) -> &str {
        self.text(INSTRUCTION).unwrap_or_default()
    }

    /// Task input; `None` when absent or `null`
    pub fn input(&self) -> Option<&str> {
        self.text(INPUT)
    }

    /// Input text, empty when absent
    pub fn input_text(&self) -> &str {
        self.input().unwrap_or("")
    }

    /// Model completion; `None` when absent or `null`
    pub fn output(&self) -> Option<&str> {
        self.text(OUTPUT)
    }

    /// Store a completion, keeping the key's position if it already exists
    pub fn set_output(&mut self, output: impl Into<String>) {
        self.fields.insert(OUTPUT.to_string(), Value::String(output.into()));
    }

    /// Any field by key, including ones the tool does not interpret
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Field names in file order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Whether the record already carries a non-empty output
    pub fn is_complete(&self) -> bool {
        self.output().is_some_and(|o| !o.is_empty())
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}

impl TryFrom<Map<String, Value>> for Record {
    type Error = String;

    fn try_from(fields: Map<String, Value>) -> Result<Self, Self::Error> {
        match fields.get(INSTRUCTION) {
            Some(Value::String(_)) => {}
            Some(_) => return Err("`instruction` must be a string".to_string()),
            None => return Err("missing field `instruction`".to_string()),
        }

        for key in [INPUT, OUTPUT] {
            match fields.get(key) {
                None | Some(Value::Null) | Some(Value::String(_)) => {}
                Some(_) => return Err(format!("`{}` must be a string or null", key)),
            }
        }

        Ok(Self { fields })
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Record {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_deserialize_minimal() {
        let record = parse(r#"{"instruction": "Q1"}"#);
        assert_eq!(record.instruction(), "Q1");
        assert_eq!(record.input_text(), "");
        assert!(!record.is_complete());
    }

    #[test]
    fn test_missing_instruction_rejected() {
        assert!(serde_json::from_str::<Record>(r#"{"input": "x"}"#).is_err());
        assert!(serde_json::from_str::<Record>(r#"{"instruction": 3}"#).is_err());
        assert!(serde_json::from_str::<Record>(r#"{"instruction": "Q", "output": []}"#).is_err());
    }

    #[test]
    fn test_empty_output_is_not_complete() {
        let record = Record::new("Q1").with_output("");
        assert!(!record.is_complete());
        assert!(Record::new("Q1").with_output("A").is_complete());
    }

    #[test]
    fn test_extra_keys_preserved() {
        let json = r#"{"instruction":"Q1","input":"","category":"math","id":7}"#;
        let record = parse(json);
        assert_eq!(record.get("category"), Some(&Value::from("math")));
        assert_eq!(record.get("id"), Some(&Value::from(7)));

        let back = serde_json::to_string(&record).unwrap();
        assert_eq!(back, json);
    }

    #[test]
    fn test_new_output_appended_last() {
        let mut record = parse(r#"{"id":7,"instruction":"Q1","category":"x"}"#);
        record.set_output("A1");

        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(keys, vec!["id", "instruction", "category", "output"]);
    }

    #[test]
    fn test_existing_output_updated_in_place() {
        let mut record = parse(r#"{"instruction":"Q1","output":null,"input":null,"tag":"t"}"#);
        assert_eq!(record.output(), None);
        assert_eq!(record.input(), None);

        record.set_output("A1");
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"instruction":"Q1","output":"A1","input":null,"tag":"t"}"#
        );
    }
}
