use std::io::prelude::*;
use std::net::TcpStream;
use std::path::{Path, PathBuf};

use ssh2::Session;

use crate::console;
use crate::error::DipiError;
use crate::shell::ExecOutcome;
use crate::target::Destination;

/// An open remote session: a secure-shell connection plus its
/// file-transfer sub-channel. Cached per destination string for the
/// lifetime of a run.
pub trait RemoteSession {
    fn exec(&mut self, command: &str) -> Result<ExecOutcome, DipiError>;
    fn upload(&mut self, local: &Path, remote: &str) -> Result<(), DipiError>;
    fn close(&mut self);
}

/// Opens remote sessions. The production implementation speaks ssh2;
/// tests substitute a recorder.
pub trait SessionProvider {
    fn connect(&self, dest: &Destination) -> Result<Box<dyn RemoteSession>, DipiError>;
}

pub struct SshProvider;

impl SessionProvider for SshProvider {
    fn connect(&self, dest: &Destination) -> Result<Box<dyn RemoteSession>, DipiError> {
        console::log(
            format!(
                "connecting to {}@{}:{}",
                dest.username, dest.host, dest.port
            )
            .as_str(),
        );

        let target = format!("{}@{}:{}", dest.username, dest.host, dest.port);
        let refused = |err: &dyn std::fmt::Display| DipiError::RemoteConnection {
            target: target.clone(),
            reason: err.to_string(),
        };

        let tcp = TcpStream::connect((dest.host.as_str(), dest.port)).map_err(|e| refused(&e))?;
        let mut session = Session::new().map_err(|e| refused(&e))?;
        session.set_tcp_stream(tcp);
        session.handshake().map_err(|e| refused(&e))?;

        // authenticate with the private key at its well-known location
        let key = private_key_path().ok_or_else(|| refused(&"HOME is not set"))?;
        session
            .userauth_pubkey_file(dest.username.as_str(), None, &key, None)
            .map_err(|e| refused(&e))?;

        let sftp = session.sftp().map_err(|e| refused(&e))?;

        Ok(Box::new(SshSession { session, sftp }))
    }
}

fn private_key_path() -> Option<PathBuf> {
    let home = std::env::var_os("HOME")?;
    Some(PathBuf::from(home).join(".ssh").join("id_rsa"))
}

pub struct SshSession {
    session: Session,
    sftp: ssh2::Sftp,
}

impl RemoteSession for SshSession {
    fn exec(&mut self, command: &str) -> Result<ExecOutcome, DipiError> {
        log::debug!("remote exec: {}", command);
        let mut channel = self.session.channel_session()?;
        channel.exec(command)?;

        // drain both streams to completion before reading the exit state
        let mut stdout = String::new();
        channel.read_to_string(&mut stdout)?;
        let mut stderr = String::new();
        channel.stderr().read_to_string(&mut stderr)?;
        channel.wait_close()?;

        for line in stdout.lines() {
            console::output(line);
        }
        for line in stderr.lines() {
            console::output_err(line);
        }

        let code = channel.exit_status()?;
        let signal = channel.exit_signal()?.exit_signal;

        Ok(ExecOutcome {
            code: Some(code),
            signal,
            stdout,
            stderr,
        })
    }

    fn upload(&mut self, local: &Path, remote: &str) -> Result<(), DipiError> {
        log::debug!("uploading {} to {}", local.display(), remote);
        let mut src = std::fs::File::open(local)?;
        let mut dst = self.sftp.create(Path::new(remote))?;
        std::io::copy(&mut src, &mut dst)?;
        dst.close()?;
        Ok(())
    }

    fn close(&mut self) {
        let _ = self.session.disconnect(None, "done", None);
    }
}
