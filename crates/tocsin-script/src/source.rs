use crate::error::ScriptError;
use serde::Deserialize;
use sha1::{Digest, Sha1};
use std::path::{Path, PathBuf};

/// Reference to a piece of Lua code, either a file on disk or an inline
/// snippet. At most one of the two may be set; neither set means "no
/// script" (a condition-less alert always fires).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScriptRef {
    #[serde(default)]
    pub lua_file: Option<PathBuf>,
    #[serde(default)]
    pub lua_inline: Option<String>,
}

impl ScriptRef {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            lua_file: Some(path.into()),
            lua_inline: None,
        }
    }

    pub fn inline(code: impl Into<String>) -> Self {
        Self {
            lua_file: None,
            lua_inline: Some(code.into()),
        }
    }

    /// True when neither source is populated. Empty strings count as
    /// unset, matching how alert files tend to stub out conditions.
    pub fn is_empty(&self) -> bool {
        !self.lua_file.as_deref().is_some_and(|p| !p.as_os_str().is_empty())
            && !self.lua_inline.as_deref().is_some_and(|s| !s.is_empty())
    }

    pub fn validate(&self) -> Result<(), ScriptError> {
        if self.lua_file.is_some() && self.lua_inline.is_some() {
            return Err(ScriptError::AmbiguousSource);
        }
        Ok(())
    }
}

/// Chunk identity for the per-VM cache: SHA-1 of the file *path* for file
/// scripts, SHA-1 of the source text for inline scripts. File contents are
/// therefore read once per VM and never re-checked.
pub fn chunk_key(s: &str) -> String {
    hex::encode(Sha1::digest(s.as_bytes()))
}

pub(crate) fn file_key(path: &Path) -> String {
    chunk_key(&path.to_string_lossy())
}

/// Short form of an inline script for log lines.
pub(crate) fn preview(code: &str) -> String {
    match code.char_indices().nth(20) {
        Some((idx, _)) => format!("{} ...", &code[..idx]),
        None => code.to_string(),
    }
}
