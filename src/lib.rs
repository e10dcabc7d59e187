//! # enum-mirror
//!
//! Keeps the Java SDK's hand-maintained enum classes in step with the enums of
//! the upstream protobuf schema.
//!
//! ## Overview
//!
//! The SDK wraps several schema enums (`HederaFunctionality`,
//! `ResponseCodeEnum`, `SubType`, `FreezeType`) in Java enums of its own.
//! Whenever the schema gains a member, the Java side needs a new constant, a
//! new `switch` arm and sometimes a new `toString()` arm. This crate scans the
//! `.proto` text and regenerates those regions, leaving the hand-written parts
//! of each class in premade fragment files.
//!
//! ## Modules
//!
//! - **[`generator`]** - enum scanning, naming, slot assembly and file synthesis
//! - **[`config`]** - `enum-mirror.toml` loading and built-in defaults
//! - **[`upstream`]** - git checkout of the upstream schema
//! - **[`protos`]** - copies of the `.proto` files rewritten for the SDK
//! - **[`logging`]** - `tracing` subscriber setup
//! - **[`cli`]** - the `enum-mirror-gen` command line
//!
//! ## Flow
//!
//! ```text
//! git checkout → scan enum bodies → assemble slots → premade + slots → .java
//!             └→ clear proto dir → copy rewritten .proto files
//! ```

pub mod cli;
pub mod config;
pub mod generator;
pub mod logging;
pub mod protos;
pub mod upstream;
