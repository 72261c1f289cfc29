use std::path::PathBuf;

/// Errors from script loading and execution.
///
/// Callers going through the pool only ever observe [`ScriptError::Failed`];
/// the precise cause is logged by the VM that hit it, alongside its VM id.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// The script could not be loaded or did not run to completion.
    #[error("script failed")]
    Failed,

    /// A script reference with both `lua_file` and `lua_inline` set.
    #[error("script source has both lua_file and lua_inline")]
    AmbiguousSource,

    /// A script reference with neither source populated was executed.
    #[error("script source is empty")]
    NoSource,

    /// Reading a `lua_file` source from disk failed.
    #[error("reading lua file {path}: {err}")]
    ReadSource {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },

    /// The interpreter rejected or aborted the chunk.
    #[error("lua: {0}")]
    Lua(#[from] mlua::Error),

    /// A script returned a value outside the {nil, bool, number, string,
    /// table} domain.
    #[error("cannot extract lua value of type {0}")]
    Extract(&'static str),
}
