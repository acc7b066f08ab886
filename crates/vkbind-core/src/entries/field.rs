//! Structure field declarations and their declarator shape.

use std::fmt;

use crate::CanonicalName;

/// Length of one array dimension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArrayLen {
    /// `[4]`
    Literal(usize),
    /// `[VK_UUID_SIZE]`, resolved by the emitter.
    Constant(String),
}

impl fmt::Display for ArrayLen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayLen::Literal(n) => write!(f, "{n}"),
            ArrayLen::Constant(c) => f.write_str(c),
        }
    }
}

/// How a field is declared around its type name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldShape {
    /// `T name`
    Value,
    /// `const T* name`, `T** name`
    Pointer { depth: u8, is_const: bool },
    /// `T name[N]`, `T name[N][M]`
    Array { dims: Vec<ArrayLen> },
}

impl FieldShape {
    /// Detect the shape from the member's declaration text.
    ///
    /// The text is the concatenated character data of the member element (type and
    /// name included, comments excluded), e.g. `"const void* pNext"` or
    /// `"float color[4]"`.
    pub fn parse(declaration: &str) -> Self {
        if let Some(open) = declaration.find('[') {
            let dims = declaration[open..]
                .split('[')
                .filter_map(|segment| segment.split_once(']'))
                .map(|(len, _)| {
                    let len = len.trim();
                    match len.parse::<usize>() {
                        Ok(n) => ArrayLen::Literal(n),
                        Err(_) => ArrayLen::Constant(len.to_string()),
                    }
                })
                .collect();
            return FieldShape::Array { dims };
        }

        let depth = declaration.chars().filter(|&c| c == '*').count();
        if depth > 0 {
            return FieldShape::Pointer {
                depth: u8::try_from(depth).unwrap_or(u8::MAX),
                is_const: declaration.trim_start().starts_with("const"),
            };
        }

        FieldShape::Value
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, FieldShape::Pointer { .. })
    }

    pub fn is_array(&self) -> bool {
        matches!(self, FieldShape::Array { .. })
    }

    /// Plain by-value field, the only shape whose type matters for classification.
    pub fn is_value(&self) -> bool {
        matches!(self, FieldShape::Value)
    }
}

/// One member of a structure or union, in layout order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: String,
    /// Type spelling as declared, e.g. `uint32_t`.
    pub raw_type: String,
    /// Canonicalized type.
    pub type_name: CanonicalName,
    pub shape: FieldShape,
}
