//! Assembly program model and textual rendering.
//!
//! The output is NASM-flavored x86_64 text in two sections: an
//! optional `.data` section holding interned string literals as
//! decimal byte tables, and a `.text` section with a fixed `_start`
//! entry point followed by the lowered instructions. Rendering is
//! purely textual; no validation or label resolution happens here.

use std::collections::HashMap;
use std::fmt;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum AsmOp {
    Mov,
    Ret,
    Push,
    Pop,
    Syscall,
    Add,
    Sub,
    Lea,
    Invalid,
}

/// One emitted operation with up to two textual operands. Unused
/// operands are empty strings.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Instruction {
    pub op: AsmOp,
    pub operand1: String,
    pub operand2: String,
}

impl Instruction {
    pub fn new(op: AsmOp, operand1: impl Into<String>, operand2: impl Into<String>) -> Self {
        Instruction {
            op,
            operand1: operand1.into(),
            operand2: operand2.into(),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use AsmOp::*;
        match self.op {
            Mov => write!(f, "    mov {}, {}", self.operand1, self.operand2),
            Add => write!(f, "    add {}, {}", self.operand1, self.operand2),
            Sub => write!(f, "    sub {}, {}", self.operand1, self.operand2),
            Lea => write!(f, "    lea {}, {}", self.operand1, self.operand2),
            Push => write!(f, "    push {}", self.operand1),
            Pop => write!(f, "    pop {}", self.operand1),
            Ret => write!(f, "    ret"),
            Syscall => write!(f, "    syscall"),
            Invalid => write!(f, "; invalid instruction"),
        }
    }
}

/// An interned string literal: a stable label, the decoded bytes, and
/// their count.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct StringLiteral {
    pub label: String,
    pub value: String,
    pub length: usize,
}

/// Deduplicating store for string-literal content. Identical content
/// interns to one entry no matter how often it appears; labels are
/// `str_0`, `str_1`, ... in first-occurrence order.
#[derive(Default, Debug)]
pub struct StringPool {
    indices: HashMap<String, usize>,
    entries: Vec<StringLiteral>,
}

impl StringPool {
    pub fn new() -> Self {
        StringPool::default()
    }

    /// Return the index for `value`, interning it first if it has not
    /// been seen before.
    pub fn intern(&mut self, value: &str) -> usize {
        if let Some(&index) = self.indices.get(value) {
            return index;
        }
        let index = self.entries.len();
        self.entries.push(StringLiteral {
            label: format!("str_{}", index),
            value: value.to_string(),
            length: value.len(),
        });
        self.indices.insert(value.to_string(), index);
        index
    }

    pub fn get(&self, index: usize) -> &StringLiteral {
        &self.entries[index]
    }

    /// Entries in first-occurrence order.
    pub fn iter(&self) -> impl Iterator<Item = &StringLiteral> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The lowered program: the instruction list and the string table it
/// references, packaged as siblings so the renderer can always find
/// both.
#[derive(Default, Debug)]
pub struct Program {
    pub instructions: Vec<Instruction>,
    pub strings: StringPool,
}

impl Program {
    /// Render the two-section assembly text, consuming the program.
    pub fn render(self) -> String {
        let mut out = String::new();

        if !self.strings.is_empty() {
            out.push_str("section .data\n");
            for literal in self.strings.iter() {
                out.push_str(&literal.label);
                out.push_str(": db ");
                let bytes: Vec<String> = literal
                    .value
                    .bytes()
                    .map(|b| b.to_string())
                    .collect();
                out.push_str(&bytes.join(", "));
                out.push('\n');
            }
        }

        out.push_str("\nsection .text\n");
        out.push_str("global _start\n");
        out.push_str("_start:\n");

        for instruction in &self.instructions {
            out.push_str(&instruction.to_string());
            out.push('\n');
        }

        out
    }
}
