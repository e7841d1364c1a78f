use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::console;
use crate::error::DipiError;
use crate::parser::{self, strip_quotes, Instruction};
use crate::resolver;
use crate::shell::ShellExecutor;
use crate::sshclient::{RemoteSession, SessionProvider};
use crate::target::Destination;
use crate::transfer;

/// The script execution context
///
/// contains :
/// - the variable scope, shared across the whole run including nested
///   `do` sub-scripts,
/// - the open remote sessions, cached per destination string,
/// - the session provider and local shell executor collaborators
///
/// One instance per top-level run; every handler receives it by
/// mutable reference.
pub struct ScriptContext {
    pub(crate) vars: HashMap<String, String>,
    conns: HashMap<String, Box<dyn RemoteSession>>,
    provider: Box<dyn SessionProvider>,
    pub(crate) shell: Box<dyn ShellExecutor>,
}

impl ScriptContext {

    /// build a new script context with the initial variable bindings:
    /// `dst` (the raw destination), `here` (the instruction file's
    /// directory), `name` (its base name), `pwd` and `tmp`
    pub fn new(
        destination: String,
        file: &Path,
        provider: Box<dyn SessionProvider>,
        shell: Box<dyn ShellExecutor>,
    ) -> Result<Self, DipiError> {
        let file = std::path::absolute(file)?;

        let mut vars = HashMap::new();
        vars.insert("dst".to_string(), destination);
        vars.insert(
            "here".to_string(),
            file.parent().map(|p| p.display().to_string()).unwrap_or_default(),
        );
        vars.insert(
            "name".to_string(),
            file.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        );
        vars.insert(
            "pwd".to_string(),
            std::env::current_dir()?.display().to_string(),
        );
        vars.insert(
            "tmp".to_string(),
            std::env::temp_dir().display().to_string(),
        );

        for (name, value) in &vars {
            console::log(format!("setting {} = {}", name, value).as_str());
        }

        Ok(Self {
            vars,
            conns: HashMap::new(),
            provider,
            shell,
        })
    }

    pub fn var(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// load an instruction file and execute its lines in order,
    /// stopping at the first failure
    pub fn run_file(&mut self, path: &Path) -> Result<(), DipiError> {
        let instructions = parser::load(path)?;
        for instruction in &instructions {
            self.dispatch(instruction)?;
        }
        Ok(())
    }

    fn dispatch(&mut self, instruction: &Instruction) -> Result<(), DipiError> {
        // resolve tokens against the current scope before any handler runs
        let inst = resolver::resolve(&self.vars, &instruction.args)?;
        log::debug!("{} {}", instruction.word, inst);

        match instruction.word.as_str() {
            "let" => self.bind_var(&instruction.args, &inst),
            "do" => self.do_subfile(&inst),
            "tellme" => {
                console::say(strip_quotes(&inst));
                Ok(())
            }
            "copy" => transfer::copy(self, &inst, &instruction.args),
            "run" => transfer::run(self, &inst, &instruction.args),
            word => Err(DipiError::UnrecognizedCommand(word.to_string())),
        }
    }

    fn bind_var(&mut self, args: &str, inst: &str) -> Result<(), DipiError> {
        console::log(format!("setting {}", args).as_str());
        let parts: Vec<&str> = inst.split('=').collect();
        if parts.len() != 2 {
            return Err(DipiError::InvalidAssignment(args.to_string()));
        }
        self.vars
            .insert(parts[0].trim().to_string(), parts[1].trim().to_string());
        Ok(())
    }

    /// run a sub-script against this same context, with `here` rebound
    /// to the sub-file's directory for the duration of the nested run
    fn do_subfile(&mut self, inst: &str) -> Result<(), DipiError> {
        let sub = strip_quotes(inst);
        let here = self.vars.get("here").cloned().unwrap_or_default();

        let path = if Path::new(sub).is_absolute() {
            PathBuf::from(sub)
        } else {
            Path::new(&here).join(sub)
        };
        let sub_here = path
            .parent()
            .map(|p| p.display().to_string())
            .unwrap_or_default();

        self.vars.insert("here".to_string(), sub_here);
        let result = self.run_file(&path);
        // restore the caller's `here` on both exit paths
        self.vars.insert("here".to_string(), here);
        result
    }

    /// return the session cached for this destination string, opening
    /// and caching a new one on first use
    pub fn session(&mut self, target: &str) -> Result<&mut dyn RemoteSession, DipiError> {
        let session = match self.conns.entry(target.to_string()) {
            Entry::Occupied(entry) => {
                log::debug!("reusing session for {}", target);
                entry.into_mut()
            }
            Entry::Vacant(entry) => {
                let dest = Destination::parse(target)?;
                entry.insert(self.provider.connect(&dest)?)
            }
        };
        Ok(session.as_mut())
    }

    /// close every cached session; runs exactly once at the end of the
    /// top-level run, whether it succeeded or failed
    pub fn close_all(&mut self) {
        for session in self.conns.values_mut() {
            session.close();
        }
        self.conns.clear();
    }
}
