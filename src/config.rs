// ABOUTME: Constants for the interpreter shell

pub const PROMPT: &str = "user> ";
pub const HISTORY_FILE: &str = ".jk_history";
