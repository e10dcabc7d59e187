//! Fixed-width integer methods for `ContractFunctionParameters`.
//!
//! Java has no 24-bit or 136-bit integer types, so the SDK exposes one
//! `addIntN`/`addUintN` method (plus array forms) per Solidity width. The
//! methods differ only in the Java parameter type, which depends on the width.
//! 8-bit widths are written by hand in the SDK and are not generated.

use std::fmt::Write as _;
use std::ops::RangeInclusive;

use askama::Template;

/// Solidity widths that get generated methods.
pub const BIT_WIDTHS: RangeInclusive<u16> = 16..=256;
const WIDTH_STEP: usize = 8;

const THROWS_NOTE: &str = "* @throws IllegalArgumentException if {@code bigInt.signum() < 0}.\n";

/// Java representation chosen for a width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JavaIntType {
    pub param_type: &'static str,
    /// Stream method turning the array elements into `ByteString`s
    pub map_method: &'static str,
    /// Javadoc line added to the unsigned forms
    pub throws_note: &'static str,
}

impl JavaIntType {
    pub fn for_width(width: u16) -> Self {
        match width {
            0..=32 => Self {
                param_type: "int",
                map_method: "mapToObj",
                throws_note: "",
            },
            33..=64 => Self {
                param_type: "long",
                map_method: "mapToObj",
                throws_note: "",
            },
            _ => Self {
                param_type: "BigInteger",
                map_method: "map",
                throws_note: THROWS_NOTE,
            },
        }
    }
}

#[derive(Template)]
#[template(path = "contract_params/int.java.txt", escape = "none")]
struct IntMethod<'a> {
    width: u16,
    param_type: &'a str,
}

#[derive(Template)]
#[template(path = "contract_params/uint.java.txt", escape = "none")]
struct UintMethod<'a> {
    width: u16,
    param_type: &'a str,
    throws_note: &'a str,
}

#[derive(Template)]
#[template(path = "contract_params/int_array.java.txt", escape = "none")]
struct IntArrayMethod<'a> {
    width: u16,
    param_type: &'a str,
    map_method: &'a str,
}

#[derive(Template)]
#[template(path = "contract_params/uint_array.java.txt", escape = "none")]
struct UintArrayMethod<'a> {
    width: u16,
    param_type: &'a str,
    map_method: &'a str,
    throws_note: &'a str,
}

/// The four method families, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodGroup {
    Int,
    Uint,
    IntArray,
    UintArray,
}

impl MethodGroup {
    pub const ALL: [MethodGroup; 4] = [
        MethodGroup::Int,
        MethodGroup::Uint,
        MethodGroup::IntArray,
        MethodGroup::UintArray,
    ];

    pub fn banner(self) -> String {
        let title = match self {
            MethodGroup::Int => "INT",
            MethodGroup::Uint => "UINT",
            MethodGroup::IntArray => "INT ARRAY",
            MethodGroup::UintArray => "UINT ARRAY",
        };
        format!("// XXXXXXXXXXXXXXXXXXXX {title} VERSIONS XXXXXXXXXXXXXXXXXXXX\n\n")
    }

    /// Render the method of this group for one width, newline-terminated.
    pub fn render(self, width: u16) -> anyhow::Result<String> {
        let ty = JavaIntType::for_width(width);
        let mut text = match self {
            MethodGroup::Int => IntMethod {
                width,
                param_type: ty.param_type,
            }
            .render()?,
            MethodGroup::Uint => UintMethod {
                width,
                param_type: ty.param_type,
                throws_note: ty.throws_note,
            }
            .render()?,
            MethodGroup::IntArray => IntArrayMethod {
                width,
                param_type: ty.param_type,
                map_method: ty.map_method,
            }
            .render()?,
            MethodGroup::UintArray => UintArrayMethod {
                width,
                param_type: ty.param_type,
                map_method: ty.map_method,
                throws_note: ty.throws_note,
            }
            .render()?,
        };
        if !text.ends_with('\n') {
            text.push('\n');
        }
        Ok(text)
    }
}

pub fn widths() -> impl Iterator<Item = u16> {
    BIT_WIDTHS.step_by(WIDTH_STEP)
}

/// Every generated method, grouped under banners.
///
/// Each method is followed by a blank line.
pub fn generate_contract_params() -> anyhow::Result<String> {
    let mut out = String::new();
    for group in MethodGroup::ALL {
        out.push_str(&group.banner());
        for width in widths() {
            let method = group.render(width)?;
            writeln!(out, "{method}")?;
        }
    }
    Ok(out)
}
