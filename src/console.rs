use colored::Colorize;

/// log a progress message to the console, with a green color and a 🚚 emoji
/// to indicate that it is a standard status message, either from the
/// instructions or from the system.
pub fn log(msg: &str) {
    println!("🚚 {}", msg.green());
}

pub fn error(msg: &str) {
    println!("🚨 {}", msg.red());
}

/// emit a `tellme` status line
pub fn say(msg: &str) {
    println!("===> {}", msg.cyan());
}

pub fn output(line: &str) {
    println!("   | {}", line.yellow());
}

pub fn output_err(line: &str) {
    println!("   | {}", line.red());
}
