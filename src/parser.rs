use std::path::Path;

use crate::error::DipiError;

/// One instruction line: the command word plus the untouched remainder
/// of the line. Token resolution happens later, at dispatch time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub word: String,
    pub args: String,
}

/// load an instruction file as an ordered sequence of instructions
///
/// Blank lines and lines whose first non-whitespace character is `#`
/// are dropped. Each remaining line is split on the first whitespace
/// run into the command word and its raw argument text.
pub fn load(path: &Path) -> Result<Vec<Instruction>, DipiError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|err| DipiError::InstructionFileRead(path.display().to_string(), err))?;

    let instructions: Vec<Instruction> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| match line.split_once(char::is_whitespace) {
            Some((word, rest)) => Instruction {
                word: word.to_string(),
                args: rest.trim_start().to_string(),
            },
            None => Instruction {
                word: line.to_string(),
                args: String::new(),
            },
        })
        .collect();

    if instructions.is_empty() {
        return Err(DipiError::EmptyInstructionFile(path.display().to_string()));
    }

    Ok(instructions)
}

/// strip one layer of surrounding double quotes, if present
pub fn strip_quotes(s: &str) -> &str {
    let s = s.trim();
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        s[1..s.len() - 1].trim()
    } else {
        s
    }
}
