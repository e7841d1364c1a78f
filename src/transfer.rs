use std::path::{Path, PathBuf};

use crate::console;
use crate::error::DipiError;
use crate::parser::strip_quotes;
use crate::script::ScriptContext;
use crate::shell::ExecOutcome;
use crate::target::{is_remote, Destination};

/// copy a file or directory to a local or remote destination
///
/// Instruction form: `<src> to <dst>`. The source is always absolutized
/// on the local side; the destination only when it is a local path, so
/// remote addresses pass through untouched.
pub(crate) fn copy(ctx: &mut ScriptContext, inst: &str, args: &str) -> Result<(), DipiError> {
    let parts: Vec<&str> = inst.split(" to ").collect();
    if parts.len() != 2 {
        return Err(DipiError::InvalidCopySyntax(args.to_string()));
    }
    let src = std::path::absolute(strip_quotes(parts[0]))?;
    let dst = strip_quotes(parts[1]).to_string();

    console::log(format!("copying {}", args).as_str());

    if src.is_dir() {
        return copy_dir(ctx, &src, &dst);
    }

    if is_remote(&dst) {
        copy_file_remote(ctx, &src, &dst)
    } else {
        copy_file_local(&src, &std::path::absolute(&dst)?)
    }
}

fn copy_file_local(src: &Path, dst: &Path) -> Result<(), DipiError> {
    if let Some(parent) = dst.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::copy(src, dst)?;
    Ok(())
}

fn copy_file_remote(ctx: &mut ScriptContext, src: &Path, dst: &str) -> Result<(), DipiError> {
    let dest = Destination::parse(dst)?;
    let dstdir = dirname(&dest.path);

    let session = ctx.session(dst)?;
    ensure_remote(session.exec(format!("mkdir -p {}", dstdir).as_str())?)?;
    session.upload(src, &dest.path)?;
    Ok(())
}

/// copy a whole directory by packaging it into a tar archive in the
/// scratch directory, then extracting it into the destination's parent.
/// Remote destinations additionally gzip the archive, upload it over
/// the file-transfer sub-channel, and decompress-and-extract in place.
fn copy_dir(ctx: &mut ScriptContext, src: &Path, dst: &str) -> Result<(), DipiError> {
    let tmp = ctx.var("tmp").unwrap_or_default().to_string();
    let name = src
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let srcdir = src
        .parent()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    let tar = PathBuf::from(&tmp).join(format!("{}.tar", name));
    let tgz = PathBuf::from(&tmp).join(format!("{}.tar.gz", name));

    // a stale archive would be appended into, not replaced
    if tar.exists() {
        std::fs::remove_file(&tar)?;
    }
    if tgz.exists() {
        std::fs::remove_file(&tgz)?;
    }

    if is_remote(dst) {
        let dest = Destination::parse(dst)?;
        let dstdir = dirname(&dest.path);

        ensure_local(ctx.shell.execute(
            format!(
                "cd {} && tar -cf {} {} && gzip -9 {}",
                srcdir,
                tar.display(),
                name,
                tar.display()
            )
            .as_str(),
        )?)?;

        let remote_tgz = format!("{}/{}.tar.gz", dstdir, name);
        let session = ctx.session(dst)?;
        ensure_remote(session.exec(format!("mkdir -p {}", dstdir).as_str())?)?;
        session.upload(&tgz, &remote_tgz)?;
        ensure_remote(session.exec(
            format!(
                "cd {} && tar -xf {}.tar.gz && rm {}.tar.gz",
                dstdir, name, name
            )
            .as_str(),
        )?)?;
    } else {
        let dst = std::path::absolute(dst)?;
        let dstdir = dirname(dst.display().to_string().as_str());

        ensure_local(ctx.shell.execute(format!("mkdir -p {}", dstdir).as_str())?)?;
        ensure_local(ctx.shell.execute(
            format!("cd {} && tar -cf {} {}", srcdir, tar.display(), name).as_str(),
        )?)?;
        ensure_local(ctx.shell.execute(
            format!("cd {} && tar -xf {}", dstdir, tar.display()).as_str(),
        )?)?;
    }

    Ok(())
}

/// run a shell command in a local or remote working directory
///
/// Instruction form: `"<command>" in <location>`. A trailing `|| true`
/// inside the quoted command downgrades a failure to success for this
/// one invocation.
pub(crate) fn run(ctx: &mut ScriptContext, inst: &str, args: &str) -> Result<(), DipiError> {
    let parts: Vec<&str> = inst.split(" in ").collect();
    if parts.len() != 2 {
        return Err(DipiError::InvalidRunSyntax(args.to_string()));
    }

    let mut exe = strip_quotes(parts[0].trim()).to_string();
    let mut ignore_errors = false;
    if let Some(stripped) = exe.strip_suffix("|| true") {
        ignore_errors = true;
        exe = stripped.trim_end().to_string();
    }
    let loc = strip_quotes(parts[1].trim());

    console::log(format!("running {}", args).as_str());

    if is_remote(loc) {
        let dest = Destination::parse(loc)?;
        let composed = format!("cd {} && {}", dest.path, exe);
        let session = ctx.session(loc)?;
        let outcome = session.exec(&composed)?;
        if !outcome.success() && !ignore_errors {
            return Err(DipiError::RemoteCommand {
                code: outcome.code,
                signal: outcome.signal,
                stderr: outcome.stderr,
            });
        }
    } else {
        let composed = format!("cd {} && {}", loc, exe);
        let outcome = ctx.shell.execute(&composed)?;
        for line in outcome.stdout.lines() {
            console::output(line);
        }
        if !outcome.success() && !ignore_errors {
            return Err(DipiError::LocalCommand {
                stderr: outcome.stderr,
            });
        }
    }

    Ok(())
}

fn dirname(path: &str) -> String {
    Path::new(path)
        .parent()
        .map(|p| p.display().to_string())
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| ".".to_string())
}

fn ensure_remote(outcome: ExecOutcome) -> Result<(), DipiError> {
    if outcome.success() {
        Ok(())
    } else {
        Err(DipiError::RemoteCommand {
            code: outcome.code,
            signal: outcome.signal,
            stderr: outcome.stderr,
        })
    }
}

fn ensure_local(outcome: ExecOutcome) -> Result<(), DipiError> {
    if outcome.success() {
        Ok(())
    } else {
        Err(DipiError::LocalCommand {
            stderr: outcome.stderr,
        })
    }
}
