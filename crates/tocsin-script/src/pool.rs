use crate::error::ScriptError;
use crate::vm::Vm;
use crate::ScriptRef;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};

struct Command {
    ctx: Value,
    source: ScriptRef,
    reply: oneshot::Sender<Value>,
}

/// A fixed set of Lua VMs behind one shared command queue.
///
/// Whichever VM is free picks up the next command; there is no affinity
/// between callers and VMs. Scripts cannot be interrupted once started, so
/// a misbehaving script occupies its VM until it returns; operators
/// mitigate that by raising the VM count.
pub struct ScriptPool {
    tx: mpsc::UnboundedSender<Command>,
}

impl ScriptPool {
    /// Spawns `vms` worker threads (at least one), each owning a fresh VM.
    /// When `init_script` is set it runs once per VM before any command is
    /// serviced; an init failure aborts construction.
    pub fn spawn(vms: usize, init_script: Option<PathBuf>) -> Result<Self, ScriptError> {
        let (tx, rx) = mpsc::unbounded_channel::<Command>();
        let rx = Arc::new(Mutex::new(rx));

        let vms = vms.max(1);
        let (ready_tx, ready_rx) = std::sync::mpsc::channel();
        for id in 0..vms {
            let rx = rx.clone();
            let init_script = init_script.clone();
            let ready_tx = ready_tx.clone();
            std::thread::Builder::new()
                .name(format!("lua-vm-{id}"))
                .spawn(move || {
                    let mut vm = match Vm::new(id, init_script.as_deref()) {
                        Ok(vm) => {
                            let _ = ready_tx.send(Ok(()));
                            vm
                        }
                        Err(e) => {
                            let _ = ready_tx.send(Err(e));
                            return;
                        }
                    };
                    drop(ready_tx);

                    loop {
                        // contend for the next command; holding the lock
                        // only while waiting, never while executing
                        let cmd = rx.lock().expect("queue lock poisoned").blocking_recv();
                        let Some(cmd) = cmd else { return };
                        serve(&mut vm, cmd);
                    }
                })
                .expect("spawning lua vm thread");
        }
        drop(ready_tx);

        for _ in 0..vms {
            ready_rx
                .recv()
                .expect("lua vm thread exited before reporting readiness")?;
        }

        Ok(Self { tx })
    }

    /// Runs a script on whichever VM frees up first and returns its
    /// extracted value. Any load or execution failure collapses into
    /// [`ScriptError::Failed`]; the owning VM logs the cause.
    pub async fn eval(&self, ctx: Value, source: &ScriptRef) -> Result<Value, ScriptError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let cmd = Command {
            ctx,
            source: source.clone(),
            reply: reply_tx,
        };
        self.tx.send(cmd).map_err(|_| ScriptError::Failed)?;
        reply_rx.await.map_err(|_| ScriptError::Failed)
    }
}

fn serve(vm: &mut Vm, cmd: Command) {
    match vm.eval(&cmd.ctx, &cmd.source) {
        Ok(value) => {
            // a rejected send just means the caller went away
            let _ = cmd.reply.send(value);
        }
        Err(e) => {
            // dropping the reply sender is the failure signal to the caller
            tracing::error!(vm = vm.id(), error = %e, "script execution failed");
        }
    }
}
