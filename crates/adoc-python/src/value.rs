//! Host values crossing the bridge

use crate::errors::BridgeError;
use pyo3::prelude::*;
use pyo3::types::{PyBool, PyFloat, PyInt, PyList, PyString, PyTuple};
use std::path::Path;

/// A value marshalled to or from the foreign runtime
#[derive(Debug, Clone, PartialEq)]
pub enum ForeignValue {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<ForeignValue>),
}

impl ForeignValue {
    /// Build the native Python object for this value
    pub fn to_python<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyAny>> {
        let object = match self {
            ForeignValue::None => py.None().into_bound(py),
            ForeignValue::Bool(b) => PyBool::new(py, *b).to_owned().into_any(),
            ForeignValue::Int(i) => i.into_pyobject(py)?.into_any(),
            ForeignValue::Float(f) => PyFloat::new(py, *f).into_any(),
            ForeignValue::Str(s) => PyString::new(py, s).into_any(),
            ForeignValue::List(items) => {
                let converted = items
                    .iter()
                    .map(|item| item.to_python(py))
                    .collect::<PyResult<Vec<_>>>()?;
                PyList::new(py, converted)?.into_any()
            }
        };
        Ok(object)
    }

    /// Read a Python object back as a host value
    pub fn from_python(object: &Bound<'_, PyAny>) -> Result<Self, BridgeError> {
        if object.is_none() {
            return Ok(ForeignValue::None);
        }
        // bool before int: Python booleans are ints
        if object.cast::<PyBool>().is_ok() {
            return Ok(ForeignValue::Bool(object.extract::<bool>()?));
        }
        if object.cast::<PyInt>().is_ok() {
            return object
                .extract::<i64>()
                .map(ForeignValue::Int)
                .map_err(|e| unsupported(object, e.to_string()));
        }
        if object.cast::<PyFloat>().is_ok() {
            return Ok(ForeignValue::Float(object.extract::<f64>()?));
        }
        if object.cast::<PyString>().is_ok() {
            return Ok(ForeignValue::Str(object.extract::<String>()?));
        }
        if let Ok(list) = object.cast::<PyList>() {
            return list
                .iter()
                .map(|item| ForeignValue::from_python(&item))
                .collect::<Result<Vec<_>, _>>()
                .map(ForeignValue::List);
        }
        if let Ok(tuple) = object.cast::<PyTuple>() {
            return tuple
                .iter()
                .map(|item| ForeignValue::from_python(&item))
                .collect::<Result<Vec<_>, _>>()
                .map(ForeignValue::List);
        }
        Err(unsupported(object, "no host representation".to_string()))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ForeignValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, ForeignValue::None)
    }
}

fn unsupported(object: &Bound<'_, PyAny>, message: String) -> BridgeError {
    BridgeError::Conversion {
        target: format!("{}", object.get_type()),
        expected: "a host value",
        message,
    }
}

impl From<&str> for ForeignValue {
    fn from(value: &str) -> Self {
        ForeignValue::Str(value.to_string())
    }
}

impl From<String> for ForeignValue {
    fn from(value: String) -> Self {
        ForeignValue::Str(value)
    }
}

impl From<&Path> for ForeignValue {
    fn from(value: &Path) -> Self {
        ForeignValue::Str(value.to_string_lossy().into_owned())
    }
}

impl From<bool> for ForeignValue {
    fn from(value: bool) -> Self {
        ForeignValue::Bool(value)
    }
}

impl From<i64> for ForeignValue {
    fn from(value: i64) -> Self {
        ForeignValue::Int(value)
    }
}

impl From<f64> for ForeignValue {
    fn from(value: f64) -> Self {
        ForeignValue::Float(value)
    }
}

impl<T: Into<ForeignValue>> From<Vec<T>> for ForeignValue {
    fn from(values: Vec<T>) -> Self {
        ForeignValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ForeignValue>> From<Option<T>> for ForeignValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ForeignValue::None, Into::into)
    }
}
