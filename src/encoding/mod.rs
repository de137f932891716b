//! Decoding of the compact, delimiter-encoded invocation fields.
//!
//! Each pipeline invocation in a revision-run request carries three strings:
//!
//! - **params**: `key=value,key=value`
//! - **listparams**: `key=v1;v2;v3,other=v`
//! - **workspaces**: `name=kind;short-name;reference,...`
//!
//! `,` separates entries, the first `=` splits an entry's key from its
//! remainder, and `;` separates values inside a remainder. An empty (or
//! all-whitespace) string decodes to zero entries. Any entry that does not
//! match its shape is a `MalformedEncoding` error; nothing is defaulted.

mod parser;
mod types;


pub use parser::{parse_list_params, parse_scalar_params, parse_workspaces};
pub use types::{ParsedListParams, ParsedParams, WorkspaceBinding};
