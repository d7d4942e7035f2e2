//! Template directives resolved when reading configuration files
//!
//! Configuration files may embed `{{ ... }}` actions that are evaluated
//! before the file is decoded:
//!
//! - `{{ include "path" }}` inserts the raw text of another file
//! - `{{ env "NAME" }}` inserts an environment variable
//! - pipes such as `{{ include "body.js" | nindent 2 }}` post-process a value
//! - `{{ zbase32 "x" }}` and `{{ apiID "svc" "GET" "/users" }}` derive ids
//!
//! Environment lookups and the working directory are supplied explicitly
//! through [`Renderer`], so rendering never touches process-wide state
//! unless the caller opts into [`ProcessEnvironment`].

pub mod env;
pub mod error;
mod functions;
mod parser;
pub mod renderer;

pub use env::{Environment, ProcessEnvironment};
pub use error::{Error, Result};
pub use functions::{api_id, block_scalar, zbase32};
pub use renderer::{Renderer, escape_actions};
