//! The lowering pass walks the token stream and emits instructions
//! for the one statement shape the language supports today:
//! `return` followed by an integer or string literal. Every other
//! token is passed over without effect.

use super::asm::{AsmOp, Instruction, Program, StringPool};
use super::diag::{DiagKind, DiagSink, Diagnostic};
use super::token::{Token, TokenKind};

/// Linux x86_64 syscall selectors.
const SYS_WRITE: &str = "1";
const SYS_EXIT: &str = "60";
const STDOUT_FD: &str = "1";

/// Lower the token sequence into a program, consuming the tokens.
/// Malformed return statements report through `sink` and emit
/// nothing; the pass always runs to the end of the stream.
pub fn lower(tokens: Vec<Token>, sink: &mut dyn DiagSink) -> Program {
    let mut instructions: Vec<Instruction> = Vec::new();
    let mut strings = StringPool::new();

    let mut iter = tokens.into_iter().peekable();
    while let Some(token) = iter.next() {
        if token.kind() != TokenKind::Return {
            continue;
        }

        match iter.peek().map(Token::kind) {
            Some(TokenKind::IntLiteral) => {
                if let Some(literal) = iter.next() {
                    emit_exit(&mut instructions, literal.value());
                }
            }
            Some(TokenKind::StringLiteral) => {
                if let Some(literal) = iter.next() {
                    emit_write(&mut instructions, &mut strings, literal.value());
                    emit_exit(&mut instructions, "0");
                }
            }
            Some(_) => {
                // The offending token stays in the stream; a later
                // `return` may still start a valid statement.
                if let Some(next) = iter.peek() {
                    sink.report(Diagnostic::new(
                        DiagKind::InvalidReturnOperand,
                        next.position(),
                        format!("invalid return value `{}`", next.value()),
                    ));
                }
            }
            // The scanner guarantees a trailing EndOfFile token, so a
            // bare `return` at the very end still lands in Some(_).
            None => {}
        }
    }

    Program {
        instructions,
        strings,
    }
}

/// Exit syscall: selector into rax, exit code into rdi.
fn emit_exit(instructions: &mut Vec<Instruction>, code: &str) {
    instructions.push(Instruction::new(AsmOp::Mov, "rax", SYS_EXIT));
    instructions.push(Instruction::new(AsmOp::Mov, "rdi", code));
    instructions.push(Instruction::new(AsmOp::Syscall, "", ""));
}

/// Write syscall for an interned string: selector, stdout fd, buffer
/// address by label, byte length.
fn emit_write(instructions: &mut Vec<Instruction>, strings: &mut StringPool, value: &str) {
    let index = strings.intern(value);
    let literal = strings.get(index);
    instructions.push(Instruction::new(AsmOp::Mov, "rax", SYS_WRITE));
    instructions.push(Instruction::new(AsmOp::Mov, "rdi", STDOUT_FD));
    instructions.push(Instruction::new(AsmOp::Lea, "rsi", format!("[{}]", literal.label)));
    instructions.push(Instruction::new(AsmOp::Mov, "rdx", literal.length.to_string()));
    instructions.push(Instruction::new(AsmOp::Syscall, "", ""));
}
