//! Handles to objects living in the foreign runtime

use crate::errors::{describe_py_err, BridgeError};
use crate::value::ForeignValue;
use pyo3::prelude::*;
use pyo3::types::PyTuple;

/// An object created or reached through the bridge.
///
/// `label` names the object in error messages, e.g.
/// `asciidocapi.AsciiDocAPI().options`.
#[derive(Debug)]
pub struct ForeignObject {
    inner: Py<PyAny>,
    label: String,
}

impl ForeignObject {
    pub fn new(inner: Py<PyAny>, label: impl Into<String>) -> Self {
        Self {
            inner,
            label: label.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn clone_ref(&self) -> Self {
        Python::attach(|py| Self {
            inner: self.inner.clone_ref(py),
            label: self.label.clone(),
        })
    }

    pub fn hasattr(&self, name: &str) -> Result<bool, BridgeError> {
        Python::attach(|py| Ok(self.inner.bind(py).hasattr(name)?))
    }

    pub fn getattr(&self, name: &str) -> Result<ForeignObject, BridgeError> {
        Python::attach(|py| {
            let attribute = self.inner.bind(py).getattr(name).map_err(|e| {
                BridgeError::AttributeNotFound {
                    owner: self.label.clone(),
                    attribute: name.to_string(),
                    message: describe_py_err(py, &e),
                }
            })?;
            Ok(ForeignObject::new(
                attribute.unbind(),
                format!("{}.{}", self.label, name),
            ))
        })
    }

    pub fn setattr(&self, name: &str, value: &ForeignValue) -> Result<(), BridgeError> {
        Python::attach(|py| {
            let value = value.to_python(py)?;
            self.inner
                .bind(py)
                .setattr(name, value)
                .map_err(|e| self.invocation_error(py, &format!("{} = ...", name), &e))
        })
    }

    /// Read an attribute as a host value
    pub fn get(&self, name: &str) -> Result<ForeignValue, BridgeError> {
        self.getattr(name)?.to_value()
    }

    pub fn to_value(&self) -> Result<ForeignValue, BridgeError> {
        Python::attach(|py| ForeignValue::from_python(self.inner.bind(py)))
    }

    /// Call `name` with positional arguments and return the result
    pub fn call_method(
        &self,
        name: &str,
        args: &[ForeignValue],
    ) -> Result<ForeignObject, BridgeError> {
        Python::attach(|py| {
            let converted = args
                .iter()
                .map(|arg| arg.to_python(py))
                .collect::<PyResult<Vec<_>>>()?;
            let args = PyTuple::new(py, converted)?;
            let result = self
                .inner
                .bind(py)
                .call_method1(name, args)
                .map_err(|e| self.invocation_error(py, name, &e))?;
            Ok(ForeignObject::new(
                result.unbind(),
                format!("{}.{}()", self.label, name),
            ))
        })
    }

    /// `self[key] = value`
    pub fn set_item(&self, key: &str, value: &ForeignValue) -> Result<(), BridgeError> {
        Python::attach(|py| {
            let value = value.to_python(py)?;
            self.inner
                .bind(py)
                .set_item(key, value)
                .map_err(|e| self.invocation_error(py, &format!("[{:?}]", key), &e))
        })
    }

    /// `self[key]` as a host value
    pub fn get_item(&self, key: &str) -> Result<ForeignValue, BridgeError> {
        Python::attach(|py| {
            let item = self
                .inner
                .bind(py)
                .get_item(key)
                .map_err(|e| self.invocation_error(py, &format!("[{:?}]", key), &e))?;
            ForeignValue::from_python(&item)
        })
    }

    fn invocation_error(&self, py: Python<'_>, member: &str, err: &PyErr) -> BridgeError {
        BridgeError::Invocation {
            target: format!("{}.{}", self.label, member),
            message: describe_py_err(py, err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyo3::types::PyDict;

    fn dict_object() -> Result<ForeignObject, BridgeError> {
        Python::attach(|py| {
            let dict = PyDict::new(py);
            dict.set_item("lang", "en")?;
            Ok(ForeignObject::new(dict.into_any().unbind(), "attributes"))
        })
    }

    #[test]
    fn test_item_access() -> Result<(), BridgeError> {
        let attributes = dict_object()?;
        assert_eq!(attributes.get_item("lang")?, ForeignValue::from("en"));

        attributes.set_item("lang", &"de".into())?;
        attributes.set_item("toc", &ForeignValue::from(""))?;
        assert_eq!(attributes.get_item("lang")?, ForeignValue::from("de"));
        assert_eq!(attributes.get_item("toc")?, ForeignValue::from(""));
        Ok(())
    }

    #[test]
    fn test_missing_key_is_invocation_error() -> Result<(), BridgeError> {
        let attributes = dict_object()?;
        let err = attributes.get_item("icons");
        assert!(matches!(err, Err(BridgeError::Invocation { ref target, .. }) if target.contains("icons")));
        Ok(())
    }

    #[test]
    fn test_call_method_marshals_arguments() -> Result<(), BridgeError> {
        let list = Python::attach(|py| {
            let list = pyo3::types::PyList::empty(py);
            Ok::<_, BridgeError>(ForeignObject::new(list.into_any().unbind(), "options"))
        })?;
        list.call_method("append", &["--backend".into()])?;
        list.call_method("append", &["docbook".into()])?;
        assert_eq!(
            list.to_value()?,
            ForeignValue::List(vec!["--backend".into(), "docbook".into()])
        );

        let err = list.call_method("append", &[]);
        assert!(matches!(err, Err(BridgeError::Invocation { .. })));
        Ok(())
    }

    #[test]
    fn test_missing_attribute() -> Result<(), BridgeError> {
        let attributes = dict_object()?;
        assert!(!attributes.hasattr("execute")?);
        let err = attributes.getattr("execute");
        assert!(matches!(err, Err(BridgeError::AttributeNotFound { .. })));
        Ok(())
    }
}
