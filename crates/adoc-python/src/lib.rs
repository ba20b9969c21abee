//! Python-Rust bridge for driving the bundled toolkit
//!
//! The toolkit is plain Python with no compiled bindings. This crate offers a
//! minimal dynamic interface to it:
//! 1. [`RuntimeState`]: the embedded interpreter and its module search path
//! 2. [`ObjectFactory`]: import a module, resolve a class, construct instances
//! 3. [`ForeignObject`] / [`ForeignValue`]: call methods, read and write
//!    attributes and items with marshalled host values

pub mod errors;
mod factory;
mod object;
mod runtime;
mod value;

pub use errors::BridgeError;
pub use factory::{FromForeign, ObjectFactory};
pub use object::ForeignObject;
pub use runtime::RuntimeState;
pub use value::ForeignValue;
