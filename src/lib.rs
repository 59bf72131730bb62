//! Evalbuf - Growable Text Buffer and Result Handoff for VM Hosts
//!
//! A small interop layer for virtual-machine evaluators that render their
//! output as text and hand it to a foreign host as a plain null-terminated
//! string. Two pieces:
//!
//! - **[`TextBuffer`]**: one contiguous heap allocation that accumulates
//!   characters, strings, and formatted numbers with a reserve-before-write
//!   discipline, then converts to a `CString` with a single destructive
//!   `consume`.
//! - **[`EvalResult`] / [`RawEvalResult`]**: the evaluation-result record
//!   (metrics plus output and optional memory dump) and its `#[repr(C)]`
//!   boundary layout, which ships a release capability so the receiving
//!   side can free memory it did not allocate: exactly once, never field
//!   by field.
//!
//! # Data Flow
//!
//! ```text
//! Evaluator
//!     │  write_str / write_u32 / write_f64 ...
//!     ▼
//! TextBuffer ──consume──▶ CString ──┐
//!                                   ▼
//!                     EvalResult ──into_raw──▶ *mut RawEvalResult
//!                                                     │
//!                                          foreign host reads, then
//!                                          invokes the embedded release
//! ```
//!
//! # Example
//!
//! ```rust
//! use evalbuf::{EvalResult, TextBuffer};
//!
//! let mut buf = TextBuffer::new();
//! buf.write_str("itrs=").unwrap();
//! buf.write_u64(1024).unwrap();
//! buf.write_byte(b' ').unwrap();
//! buf.write_u32_hex(255).unwrap();
//!
//! let output = buf.consume().unwrap();
//! assert_eq!(output.to_str().unwrap(), "itrs=1024 xff");
//!
//! let raw = EvalResult::new(1024, 0.002).with_output(output).into_raw();
//! // The host reads the record, then releases it exactly once.
//! unsafe { ((*raw).release)(raw) };
//! ```
//!
//! The buffer is single-owner and not thread-safe; concurrent producers
//! must each own a private buffer and merge after consuming.

pub mod buffer;
pub mod ffi;
pub mod result;

pub use buffer::{BufferError, BufferResult, TextBuffer};
pub use ffi::{consume_raw, release_eval_result, RawEvalResult};
pub use result::EvalResult;
