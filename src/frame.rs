//! Call-site introspection

use std::panic::Location;
use std::path::PathBuf;

/// Flattened description of a call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSimple {
    /// Enclosing function, when captured through [`frame!`](crate::frame!).
    pub function: Option<String>,
    /// Module path, e.g. `huti::chain`.
    pub module: Option<String>,
    /// First segment of the module path.
    pub package: Option<String>,
    pub path: PathBuf,
    pub line: u32,
    pub column: u32,
}

impl FrameSimple {
    /// The location that called the function this is invoked from.
    ///
    /// Functions wanting their own caller must be `#[track_caller]` too.
    #[track_caller]
    pub fn caller() -> Self {
        Self::from_location(Location::caller())
    }

    pub fn from_location(location: &Location<'_>) -> Self {
        Self {
            function: None,
            module: None,
            package: None,
            path: PathBuf::from(location.file()),
            line: location.line(),
            column: location.column(),
        }
    }

    /// Used by [`frame!`](crate::frame!).
    #[doc(hidden)]
    pub fn from_parts(function: &str, module: &str, file: &str, line: u32, column: u32) -> Self {
        let function = function.strip_suffix("::__huti_frame").unwrap_or(function);
        // Closures show up as `{{closure}}` segments.
        let function = function.trim_end_matches("::{{closure}}");
        let name = function.rsplit("::").next().unwrap_or(function);
        Self {
            function: Some(name.to_string()),
            module: Some(module.to_string()),
            package: module.split("::").next().map(str::to_string),
            path: PathBuf::from(file),
            line,
            column,
        }
    }

    /// `module::function` when both are known.
    pub fn qualified_name(&self) -> Option<String> {
        match (&self.module, &self.function) {
            (Some(module), Some(function)) => Some(format!("{module}::{function}")),
            _ => None,
        }
    }
}

/// Capture the current function, module, file and line as a [`FrameSimple`].
#[macro_export]
macro_rules! frame {
    () => {{
        fn __huti_frame() {}
        fn __type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        $crate::frame::FrameSimple::from_parts(
            __type_name_of(__huti_frame),
            module_path!(),
            file!(),
            line!(),
            column!(),
        )
    }};
}
