use std::io::{BufRead, Write};

/// Read one secret line (password or PIN) from `input`.
///
/// The prompt, if any, goes to stderr so stdout stays machine-readable.
pub fn read_secret<R: BufRead>(input: &mut R, prompt: Option<&str>) -> anyhow::Result<String> {
    if let Some(prompt) = prompt {
        let mut stderr = std::io::stderr();
        write!(stderr, "{prompt}: ")?;
        stderr.flush()?;
    }

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        anyhow::bail!("stdin closed before a {} was entered", prompt.unwrap_or("secret"));
    }
    let secret = line.trim_end_matches(['\r', '\n']).to_string();
    if secret.is_empty() {
        anyhow::bail!("empty {} on stdin", prompt.unwrap_or("secret"));
    }
    Ok(secret)
}
