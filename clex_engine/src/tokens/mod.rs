//! Token types for C and C++ source
//!
//! - **[`TokenKind`]** - raw and classified token categories, with theme scopes
//! - **[`Token`]** - a kind plus start/end positions and the exact source slice
//! - **[`TokenStream`]** - every token of one lexing pass, with a filtered
//!   view of the significant ones
//!
//! Tokens borrow from the source text, so concatenating their `text` fields
//! in order reproduces the input byte for byte.

pub mod token;
pub mod token_stream;

pub use token::{CommentKind, Token, TokenKind};
pub use token_stream::{TokenStream, TokenStreamError};
