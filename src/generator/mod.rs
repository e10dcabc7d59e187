//! # Generator Module
//!
//! Mirrors enums declared in the upstream `.proto` schema into hand-maintained
//! Java enum classes of the SDK.
//!
//! ## Overview
//!
//! A Java enum such as `RequestType` is mostly hand-written (constructors,
//! accessors, lookup tables). Only three regions track the schema:
//!
//! - **Declarations** - one constant per schema member, with its Javadoc
//! - **Forward mapping** - `switch` arms from the proto constant to the Java one
//! - **Reverse mapping** - optional `toString()` arms
//!
//! The hand-written parts live in `premade/<Name>-<n>.txt` and are stitched
//! together with the generated regions.
//!
//! ## Architecture
//!
//! ```text
//! .proto text → Lexer → EnumScanner → Member → TargetEnumSpec → Synthesizer → .java
//!                           │
//!                IdentifierNormalizer + CommentAccumulator
//! ```
//!
//! 1. **Scanner** - locates `enum <Name> {` and tokenizes the body in one
//!    forward pass, yielding a [`Member`] per constant
//! 2. **Naming** - converts `CamelCase` to `CONSTANT_CASE` and applies overrides
//! 3. **Assembler** - appends one formatted fragment per member to each slot
//! 4. **Synthesizer** - interleaves premade fragments and slots, writes the file
//!
//! ## Usage
//!
//! ```rust,ignore
//! use enum_mirror::config::GeneratorConfig;
//! use enum_mirror::generator::generate_enums;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = GeneratorConfig::default();
//! for report in generate_enums(&config, std::path::Path::new("."))? {
//!     println!("{}: {} members", report.name, report.members);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Templates
//!
//! Slot fragments are small inline Askama templates. The contract parameter
//! methods use file templates under `templates/contract_params/`.

mod assembler;
mod comments;
mod contract_params;
mod naming;
mod pipeline;
mod scanner;
mod synthesizer;

pub use assembler::*;
pub use comments::*;
pub use contract_params::*;
pub use naming::*;
pub use pipeline::*;
pub use scanner::*;
pub use synthesizer::*;
