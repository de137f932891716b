//! Template rendering.
//!
//! Two facilities live here:
//!
//! - **Engine**: the block-structured template language used by the fixed
//!   manifest and tracking-document templates. Templates are parsed once
//!   and executed against a `serde_json::Value` scope.
//! - **Inline**: generic `{{ name }}` / `[[ name ]]` substitution of string
//!   values, for ad-hoc text outside the manifest schema.
//!
//! # Engine syntax
//!
//! ```text
//! name: {{ .Name }}
//! params:{{ range .Params }}
//! - name: {{ .Key }}
//!   value: {{ .Value }}{{ end }}
//! {{ if .Labels }}labels: ...{{ end }}
//! ```
//!
//! - `{{ .Field }}` / `{{ .Field.Nested }}` - Field of the current scope
//! - `{{ . }}` - The current scope itself
//! - `{{ range .Field }}...{{ end }}` - Repeat for each list element, or each
//!   `{Key, Value}` entry of a map in key order
//! - `{{ if .Field }}...{{ end }}` - Render when the field is non-empty

mod engine;
mod inline;

pub use engine::{Template, TemplateError};
pub use inline::{DelimiterStyle, render_inline, render_inline_named};
