//! Discussion subdomain: the reply protocol and the state one debate mutates.
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`protocol`] | Marker literals shared by prompts and the parser |
//! | [`parsing`] | [`parse_reply`](parsing::parse_reply) |
//! | [`notepad`] | The shared document and its last writer |
//! | [`transcript`] | Append-only turn records |
//! | [`consensus`] | Two-persona stop agreement |
//! | [`mode`] | Discussion mode and turn budget |
//! | [`run`] | Per-run state machine |

pub mod consensus;
pub mod mode;
pub mod notepad;
pub mod parsing;
pub mod protocol;
pub mod run;
pub mod transcript;
