use adoc_python::{BridgeError, ForeignObject, ForeignValue, FromForeign};
use std::path::Path;

const REQUIRED_MEMBERS: [&str; 3] = ["options", "attributes", "execute"];

/// An instance of the toolkit's API class.
///
/// Holds the instance plus its `options` and `attributes` members, which are
/// looked up once when the instance is adapted.
#[derive(Debug)]
pub struct AsciiDocToolkit {
    object: ForeignObject,
    options: ForeignObject,
    attributes: ForeignObject,
}

impl FromForeign for AsciiDocToolkit {
    fn from_foreign(object: ForeignObject) -> Result<Self, BridgeError> {
        for member in REQUIRED_MEMBERS {
            if !object.hasattr(member)? {
                return Err(BridgeError::Conversion {
                    target: object.label().to_string(),
                    expected: "an AsciiDoc API instance",
                    message: format!("missing member '{}'", member),
                });
            }
        }
        let options = object.getattr("options")?;
        let attributes = object.getattr("attributes")?;
        Ok(Self {
            object,
            options,
            attributes,
        })
    }
}

impl AsciiDocToolkit {
    /// `options.append(name)` or `options.append(name, value)`
    pub fn append_option(&self, name: &str, value: Option<&str>) -> Result<(), BridgeError> {
        let mut args = vec![ForeignValue::from(name)];
        if let Some(value) = value {
            args.push(value.into());
        }
        self.options.call_method("append", &args)?;
        Ok(())
    }

    /// `attributes[name] = value`
    pub fn set_attribute(&self, name: &str, value: &str) -> Result<(), BridgeError> {
        self.attributes.set_item(name, &value.into())
    }

    pub fn attribute(&self, name: &str) -> Result<ForeignValue, BridgeError> {
        self.attributes.get_item(name)
    }

    /// The option pairs appended so far, as the toolkit records them
    pub fn option_values(&self) -> Result<ForeignValue, BridgeError> {
        self.options.get("values")
    }

    /// Run the conversion of `source`. Blocks until the toolkit returns.
    pub fn execute(&self, source: &Path) -> Result<(), BridgeError> {
        self.object.call_method("execute", &[source.into()])?;
        Ok(())
    }

    /// Warnings the toolkit collected during `execute`; empty when it keeps none
    pub fn messages(&self) -> Result<Vec<String>, BridgeError> {
        if !self.object.hasattr("messages")? {
            return Ok(Vec::new());
        }
        let messages = match self.object.get("messages")? {
            ForeignValue::List(items) => items
                .into_iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
            ForeignValue::Str(message) => vec![message],
            _ => Vec::new(),
        };
        Ok(messages)
    }

    pub fn object(&self) -> &ForeignObject {
        &self.object
    }
}
