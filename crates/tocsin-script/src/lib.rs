//! Embedded Lua execution for alert conditions.
//!
//! A Lua interpreter is not safe to share between threads, so instead of
//! locking one interpreter the pool runs a fixed number of single-owner
//! VMs, each on its own OS thread, all pulling from one shared command
//! queue. Callers await a oneshot reply; a script blocking one VM never
//! stalls the rest of the daemon.
//!
//! Values cross the host/script boundary as `serde_json::Value`:
//! mappings become tables, sequences become 1-based tables, and table
//! returns are folded back into sequences or string-keyed mappings.
//! Compiled chunks are cached per VM, keyed by the SHA-1 of the script
//! path or inline source.

pub mod error;
pub mod pool;
pub mod source;
pub mod value;
pub mod vm;

#[cfg(test)]
mod tests;

pub use error::ScriptError;
pub use pool::ScriptPool;
pub use source::ScriptRef;
pub use vm::Vm;
