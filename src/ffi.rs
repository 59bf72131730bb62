//! C ABI boundary for evaluation results
//!
//! The handoff protocol between the evaluator and a foreign host:
//!
//! ```text
//! EvalResult (owned)
//!       │ into_raw
//!       ▼
//! *mut RawEvalResult ──────────────▶ foreign host reads fields
//!       ▲                                   │
//!       │ consume_raw (test harness)        ▼
//!       └────────────────── (record.release)(record)  exactly once
//! ```
//!
//! Ownership of both payloads and the record itself crosses the boundary at
//! `into_raw`; the receiver gets them back to the allocator by invoking the
//! embedded release capability, never by freeing fields individually.

use std::ffi::{c_char, CStr, CString};
use std::ptr;

use crate::result::EvalResult;

/// Evaluation result in its boundary layout.
///
/// Field order is fixed; the foreign receiver reads this struct by offset.
/// Payload pointers are null when the payload is absent.
#[repr(C)]
pub struct RawEvalResult {
    pub iterations: u64,
    pub elapsed_secs: f64,
    pub output: *mut c_char,
    pub mem_dump: *mut c_char,
    /// Release capability: frees both payloads and the record itself.
    pub release: unsafe extern "C" fn(*mut RawEvalResult),
}

impl EvalResult {
    /// Box the record into its C layout and transfer ownership to the
    /// caller. The returned pointer must eventually be passed to the
    /// embedded `release` capability, exactly once.
    pub fn into_raw(self) -> *mut RawEvalResult {
        Box::into_raw(Box::new(RawEvalResult {
            iterations: self.iterations,
            elapsed_secs: self.elapsed_secs,
            output: payload_into_raw(self.output),
            mem_dump: payload_into_raw(self.mem_dump),
            release: release_eval_result,
        }))
    }
}

fn payload_into_raw(payload: Option<CString>) -> *mut c_char {
    match payload {
        Some(text) => text.into_raw(),
        None => ptr::null_mut(),
    }
}

/// Release capability embedded in every [`RawEvalResult`].
///
/// Frees the primary payload if present, then the secondary payload if
/// present, then the record's own storage. A null record pointer is a no-op.
///
/// # Safety
///
/// `raw` must have come from [`EvalResult::into_raw`] and must not be
/// touched after the call; invoking the capability twice on the same record
/// is a double free.
pub unsafe extern "C" fn release_eval_result(raw: *mut RawEvalResult) {
    if raw.is_null() {
        return;
    }
    let record = Box::from_raw(raw);
    if !record.output.is_null() {
        drop(CString::from_raw(record.output));
    }
    if !record.mem_dump.is_null() {
        drop(CString::from_raw(record.mem_dump));
    }
}

/// Receiving side of the handoff: copies every field out of the raw record,
/// then invokes the embedded release capability exactly once.
///
/// # Safety
///
/// `raw` must be a valid, unreleased record produced by
/// [`EvalResult::into_raw`] (or a foreign producer using the same layout).
/// The pointer is dangling when this returns.
pub unsafe fn consume_raw(raw: *mut RawEvalResult) -> EvalResult {
    let iterations = (*raw).iterations;
    let elapsed_secs = (*raw).elapsed_secs;
    let output = copy_payload((*raw).output);
    let mem_dump = copy_payload((*raw).mem_dump);
    let release = (*raw).release;
    release(raw);
    EvalResult {
        iterations,
        elapsed_secs,
        output,
        mem_dump,
    }
}

unsafe fn copy_payload(payload: *const c_char) -> Option<CString> {
    if payload.is_null() {
        None
    } else {
        Some(CStr::from_ptr(payload).to_owned())
    }
}

/// Free a bare string that crossed the boundary outside a result record,
/// e.g. an error message. Null is a no-op.
///
/// # Safety
///
/// `text` must have come from `CString::into_raw` on this side of the
/// boundary and must not be used after the call.
#[no_mangle]
pub unsafe extern "C" fn evalbuf_string_free(text: *mut c_char) {
    if text.is_null() {
        return;
    }
    drop(CString::from_raw(text));
}
