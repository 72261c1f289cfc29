use crate::error::ScriptError;
use crate::source::{chunk_key, file_key, preview};
use crate::value;
use crate::ScriptRef;
use mlua::{Function, Lua};
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;

/// A single-owner Lua interpreter with its chunk cache.
///
/// Exactly one pool worker thread ever touches a `Vm`. A chunk is compiled
/// at most once per VM: the compiled function is bound to a global named by
/// the chunk key, and later executions only look the global up again.
pub struct Vm {
    id: usize,
    lua: Lua,
    loaded: HashSet<String>,
    loads: u64,
}

impl Vm {
    /// Creates the interpreter and, when configured, runs the init script
    /// once before any command is serviced.
    pub fn new(id: usize, init_script: Option<&Path>) -> Result<Self, ScriptError> {
        let mut vm = Self {
            id,
            lua: Lua::new(),
            loaded: HashSet::new(),
            loads: 0,
        };
        tracing::info!(vm = id, "initializing lua vm");

        if let Some(path) = init_script {
            let key = vm.load_file(path)?;
            let func: Function = vm.lua.globals().get(key.as_str())?;
            func.call::<()>(())?;
        }
        Ok(vm)
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// How many chunks this VM has compiled. Re-executions of a cached
    /// chunk do not count.
    pub fn loads(&self) -> u64 {
        self.loads
    }

    /// Runs one script against the given context value and extracts its
    /// return value.
    pub fn eval(&mut self, ctx: &Value, source: &ScriptRef) -> Result<Value, ScriptError> {
        let key = if let Some(path) = source.lua_file.as_deref().filter(|p| !p.as_os_str().is_empty()) {
            tracing::debug!(vm = self.id, file = %path.display(), "executing lua");
            self.load_file(path)?
        } else if let Some(code) = source.lua_inline.as_deref().filter(|s| !s.is_empty()) {
            tracing::debug!(vm = self.id, inline = %preview(code), "executing lua");
            self.load_inline(code)?
        } else {
            return Err(ScriptError::NoSource);
        };

        let globals = self.lua.globals();
        globals.set("ctx", value::push(&self.lua, ctx)?)?;
        let func: Function = globals.get(key.as_str())?;
        let ret: mlua::Value = func.call(())?;
        value::pull(&ret)
    }

    fn load_file(&mut self, path: &Path) -> Result<String, ScriptError> {
        let key = file_key(path);
        if self.loaded.contains(&key) {
            return Ok(key);
        }

        tracing::info!(vm = self.id, file = %path.display(), chunk = %key, "loading lua file");
        let code = std::fs::read_to_string(path).map_err(|err| ScriptError::ReadSource {
            path: path.to_path_buf(),
            err,
        })?;
        self.bind(&key, &code, &path.to_string_lossy())?;
        Ok(key)
    }

    fn load_inline(&mut self, code: &str) -> Result<String, ScriptError> {
        let key = chunk_key(code);
        if self.loaded.contains(&key) {
            return Ok(key);
        }

        tracing::info!(vm = self.id, inline = %preview(code), chunk = %key, "loading lua inline");
        self.bind(&key, code, &key)?;
        Ok(key)
    }

    fn bind(&mut self, key: &str, code: &str, chunk_name: &str) -> Result<(), ScriptError> {
        let func = self.lua.load(code).set_name(chunk_name).into_function()?;
        self.lua.globals().set(key, func)?;
        self.loaded.insert(key.to_string());
        self.loads += 1;
        Ok(())
    }
}
