//! Label allocation for generated code.

use zp_core::{is_keyword, is_word};

use crate::error::CodegenError;

/// Hands out `prefix` + `a`, `b`, ..., `z`, `aa`, `ab`, ...
///
/// Distinct prefixes let several generated blocks share one program. Names that
/// would read back as `give` or `take` are skipped.
#[derive(Debug, Clone)]
pub struct LabelMaker {
    prefix: String,
    next: String,
}

impl LabelMaker {
    pub fn new(prefix: &str) -> Result<Self, CodegenError> {
        validate_prefix(prefix)?;
        Ok(Self {
            prefix: prefix.to_string(),
            next: "a".to_string(),
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn next_label(&mut self) -> String {
        loop {
            let label = format!("{}{}", self.prefix, self.next);
            self.next = successor(&self.next);
            if !is_keyword(&label) {
                return label;
            }
        }
    }
}

/// Empty is fine; otherwise word characters only.
pub fn validate_prefix(prefix: &str) -> Result<(), CodegenError> {
    if prefix.is_empty() || is_word(prefix) {
        Ok(())
    } else {
        Err(CodegenError::InvalidLabelPrefix(prefix.to_string()))
    }
}

/// Next lowercase name: `a` -> `b`, `z` -> `aa`, `az` -> `ba`, `zz` -> `aaa`.
fn successor(name: &str) -> String {
    let mut bytes = name.as_bytes().to_vec();
    let mut carry = true;
    for b in bytes.iter_mut().rev() {
        if *b == b'z' {
            *b = b'a';
        } else {
            *b += 1;
            carry = false;
            break;
        }
    }
    if carry {
        bytes.insert(0, b'a');
    }
    bytes.into_iter().map(char::from).collect()
}
