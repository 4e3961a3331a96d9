// src/exec/command.rs

//! Command normalization.
//!
//! Commands arrive either as a single pre-built shell string or as an argv
//! list. The list form is joined into one shell-safe string: every token is
//! quoted, except tokens that begin with a shell metacharacter (or are a
//! numbered redirection like `1>`), which pass through verbatim so callers
//! can still compose pipes and redirections:
//!
//! ```
//! use fleetrun::exec::command::normalize;
//!
//! let cmd = normalize(&["echo", "a b", "|", "cat"]);
//! assert_eq!(cmd, "echo 'a b' | cat");
//! ```

/// Tokens starting with one of these are shell syntax, not arguments.
const PASSTHROUGH_PREFIXES: [char; 7] = ['"', '\'', '<', '|', '>', '&', ';'];

/// Join an argv list into a single shell-safe command string.
pub fn normalize<S: AsRef<str>>(args: &[S]) -> String {
    let mut parts = Vec::with_capacity(args.len());
    for arg in args {
        let token = arg.as_ref();
        if passes_through(token) {
            parts.push(token.to_string());
        } else {
            parts.push(shell_words::quote(token).into_owned());
        }
    }
    parts.join(" ")
}

/// The command string for a CLI invocation: a single argument is taken
/// verbatim, multiple arguments are normalized.
pub fn command_from_args(args: &[String]) -> String {
    match args {
        [single] => single.clone(),
        _ => normalize(args),
    }
}

/// Whether a token is passed to the shell unquoted.
fn passes_through(token: &str) -> bool {
    let Some(first) = token.chars().next() else {
        return false;
    };
    if PASSTHROUGH_PREFIXES.contains(&first) {
        return true;
    }
    // Numbered redirections: 1>, 2>, 2>&1, ...
    matches!(first, '1' | '2') && token[1..].starts_with('>')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_tokens_join_unchanged() {
        assert_eq!(normalize(&["ls", "-la", "/tmp"]), "ls -la /tmp");
    }

    #[test]
    fn tokens_with_spaces_are_quoted() {
        assert_eq!(normalize(&["echo", "a b"]), "echo 'a b'");
    }

    #[test]
    fn metacharacter_tokens_pass_through() {
        assert_eq!(normalize(&["echo", "hi", "|", "cat"]), "echo hi | cat");
        assert_eq!(normalize(&["cat", "\"~\""]), "cat \"~\"");
        assert_eq!(normalize(&["true", "&&", "echo", "ok"]), "true && echo ok");
    }

    #[test]
    fn numbered_redirections_pass_through() {
        assert_eq!(
            normalize(&["echo", "hi", "1>", "/dev/null"]),
            "echo hi 1> /dev/null"
        );
        assert_eq!(normalize(&["cmd", "2>&1"]), "cmd 2>&1");
        // A plain numeric argument is still an argument.
        assert_eq!(normalize(&["sleep", "2"]), "sleep 2");
    }

    #[test]
    fn empty_token_is_quoted() {
        assert_eq!(normalize(&["printf", ""]), "printf ''");
    }

    #[test]
    fn single_cli_arg_is_verbatim() {
        let args = vec!["echo 'a b'".to_string()];
        assert_eq!(command_from_args(&args), "echo 'a b'");
    }

    #[test]
    fn multiple_cli_args_are_normalized() {
        let args = vec!["echo".to_string(), "a b".to_string()];
        assert_eq!(command_from_args(&args), "echo 'a b'");
    }
}
