//! Command execution: built-in introspection commands plus a shell
//! fallback.
//!
//! The result payload is opaque to the coordinator; it stores and returns
//! whatever this module produces. Built-ins answer with a scalar or a
//! mapping, shell commands with `{stdout, stderr, exit_code}`.

use serde_json::{json, Value};
use tokio::process::Command;

/// Execute a command string and produce its result payload.
///
/// `whoami`, `hostname`, and `sysinfo` are answered in-process; anything
/// else runs under `/bin/sh -c`. Spawn failures yield `{error: message}`.
pub async fn execute(command: &str) -> Value {
    match command.trim().to_ascii_lowercase().as_str() {
        "whoami" => json!(login_name()),
        "hostname" => json!(hostname().await),
        "sysinfo" => sysinfo().await,
        _ => run_shell(command).await,
    }
}

fn login_name() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("LOGNAME"))
        .unwrap_or_else(|_| "unknown".into())
}

async fn hostname() -> String {
    match Command::new("hostname").output().await {
        Ok(output) if output.status.success() => {
            String::from_utf8_lossy(&output.stdout).trim().to_string()
        }
        _ => "unknown".into(),
    }
}

async fn kernel_release() -> String {
    match Command::new("uname").arg("-r").output().await {
        Ok(output) if output.status.success() => {
            String::from_utf8_lossy(&output.stdout).trim().to_string()
        }
        _ => "unknown".into(),
    }
}

async fn sysinfo() -> Value {
    json!({
        "hostname": hostname().await,
        "system": std::env::consts::OS,
        "release": kernel_release().await,
        "architecture": std::env::consts::ARCH,
        "family": std::env::consts::FAMILY,
    })
}

async fn run_shell(command: &str) -> Value {
    let output = match Command::new("/bin/sh").arg("-c").arg(command).output().await {
        Ok(output) => output,
        Err(e) => return json!({ "error": format!("failed to spawn shell: {e}") }),
    };

    json!({
        "stdout": String::from_utf8_lossy(&output.stdout),
        "stderr": String::from_utf8_lossy(&output.stderr),
        // None means the process died to a signal.
        "exit_code": output.status.code().unwrap_or(-1),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn shell_captures_stdout_and_exit_code() {
        let result = execute("echo hello").await;
        assert_eq!(result["stdout"], "hello\n");
        assert_eq!(result["stderr"], "");
        assert_eq!(result["exit_code"], 0);
    }

    #[tokio::test]
    async fn shell_captures_stderr_and_failure() {
        let result = execute("echo oops >&2; exit 3").await;
        assert_eq!(result["stdout"], "");
        assert_eq!(result["stderr"], "oops\n");
        assert_eq!(result["exit_code"], 3);
    }

    #[tokio::test]
    async fn missing_binary_reports_shell_exit_code() {
        let result = execute("definitely-not-a-real-binary-xyz").await;
        // /bin/sh reports command-not-found as exit code 127.
        assert_eq!(result["exit_code"], 127);
    }

    #[tokio::test]
    async fn embedded_quotes_and_newlines_survive_the_shell() {
        let result = execute("printf 'line1\\nline2'").await;
        assert_eq!(result["stdout"], "line1\nline2");
    }

    #[tokio::test]
    async fn whoami_builtin_is_a_scalar() {
        let result = execute("whoami").await;
        assert!(result.is_string());
        assert!(!result.as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn builtins_are_case_insensitive() {
        let result = execute("  SysInfo ").await;
        let obj = result.as_object().expect("sysinfo returns a mapping");
        assert!(obj.contains_key("hostname"));
        assert!(obj.contains_key("system"));
        assert!(obj.contains_key("architecture"));
    }
}
