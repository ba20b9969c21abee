//! Generic factory for objects defined in a Python module

use crate::errors::{describe_py_err, BridgeError};
use crate::object::ForeignObject;
use crate::runtime::RuntimeState;
use crate::value::ForeignValue;
use adoc_logger as logger;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyModule, PyTuple};
use std::marker::PhantomData;

/// Capability a freshly created foreign object is adapted to.
///
/// Implementations check that the object offers what the caller needs and
/// return `BridgeError::Conversion` otherwise.
pub trait FromForeign: Sized {
    fn from_foreign(object: ForeignObject) -> Result<Self, BridgeError>;
}

impl FromForeign for ForeignObject {
    fn from_foreign(object: ForeignObject) -> Result<Self, BridgeError> {
        Ok(object)
    }
}

impl FromForeign for ForeignValue {
    fn from_foreign(object: ForeignObject) -> Result<Self, BridgeError> {
        object.to_value().map_err(|e| BridgeError::Conversion {
            target: object.label().to_string(),
            expected: "a host value",
            message: e.to_string(),
        })
    }
}

/// Imports `module` once and creates instances of one of its attributes.
///
/// The module and class handles belong to this factory. Nothing is cached
/// besides them: every `create_object` call constructs a new foreign object.
pub struct ObjectFactory<T> {
    module_name: String,
    attribute_name: String,
    module: Py<PyModule>,
    class: Py<PyAny>,
    _capability: PhantomData<fn() -> T>,
}

impl<T: FromForeign> ObjectFactory<T> {
    /// Import `module_name` and resolve `attribute_name` inside it.
    ///
    /// Without a `state` a new handle is created. It still shares the process
    /// interpreter, its `sys.path` and its `sys.modules` with every other state.
    pub fn open(
        state: Option<&RuntimeState>,
        module_name: &str,
        attribute_name: &str,
    ) -> Result<Self, BridgeError> {
        let fresh;
        let _state = match state {
            Some(state) => state,
            None => {
                fresh = RuntimeState::new()?;
                &fresh
            }
        };

        Python::attach(|py| {
            logger::debug(&format!("Importing module: {}", module_name));
            let module = PyModule::import(py, module_name).map_err(|e| {
                BridgeError::Import(module_name.to_string(), describe_py_err(py, &e))
            })?;
            let class = module
                .getattr(attribute_name)
                .map_err(|e| BridgeError::AttributeNotFound {
                    owner: module_name.to_string(),
                    attribute: attribute_name.to_string(),
                    message: describe_py_err(py, &e),
                })?;
            logger::debug(&format!("module={}, class={}", module, class));

            Ok(Self {
                module_name: module_name.to_string(),
                attribute_name: attribute_name.to_string(),
                module: module.unbind(),
                class: class.unbind(),
                _capability: PhantomData,
            })
        })
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    pub fn attribute_name(&self) -> &str {
        &self.attribute_name
    }

    /// The imported module itself
    pub fn module(&self) -> ForeignObject {
        Python::attach(|py| {
            ForeignObject::new(
                self.module.clone_ref(py).into_any(),
                self.module_name.clone(),
            )
        })
    }

    /// Call the resolved attribute with positional arguments
    pub fn create_object(&self, args: &[ForeignValue]) -> Result<T, BridgeError> {
        self.create_object_with_keywords(args, &[])
    }

    /// Call the resolved attribute with `args`, the last `keywords.len()` of
    /// which are passed by name.
    pub fn create_object_with_keywords(
        &self,
        args: &[ForeignValue],
        keywords: &[&str],
    ) -> Result<T, BridgeError> {
        let target = self.target();
        if keywords.len() > args.len() {
            return Err(BridgeError::InvalidArguments {
                target,
                message: format!(
                    "{} keyword names for {} argument values",
                    keywords.len(),
                    args.len()
                ),
            });
        }
        let split = args.len() - keywords.len();

        let object = Python::attach(|py| {
            let positional = args[..split]
                .iter()
                .map(|arg| arg.to_python(py))
                .collect::<PyResult<Vec<_>>>()?;
            let positional = PyTuple::new(py, positional)?;

            let kwargs = if keywords.is_empty() {
                None
            } else {
                let kwargs = PyDict::new(py);
                for (name, value) in keywords.iter().zip(&args[split..]) {
                    kwargs.set_item(*name, value.to_python(py)?)?;
                }
                Some(kwargs)
            };

            let instance = self
                .class
                .bind(py)
                .call(positional, kwargs.as_ref())
                .map_err(|e| BridgeError::Invocation {
                    target: target.clone(),
                    message: describe_py_err(py, &e),
                })?;
            Ok::<_, BridgeError>(instance.unbind())
        })?;

        T::from_foreign(ForeignObject::new(object, format!("{}()", target)))
    }

    fn target(&self) -> String {
        format!("{}.{}", self.module_name, self.attribute_name)
    }
}

impl<T> std::fmt::Debug for ObjectFactory<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectFactory")
            .field("module", &self.module_name)
            .field("attribute", &self.attribute_name)
            .finish()
    }
}
