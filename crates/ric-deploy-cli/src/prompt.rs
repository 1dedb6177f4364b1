//! Line-oriented prompting over any reader/writer pair.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use colored::Colorize;
use ric_deploy_core::{validate_directory, DeployError};

const RULE: &str = "============================================================";

/// Prompts on `output`, reads answers from `input`.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn writer(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_writer(self) -> W {
        self.output
    }

    fn read_line(&mut self) -> Result<String> {
        self.output.flush()?;
        let mut line = String::new();
        let n = self
            .input
            .read_line(&mut line)
            .context("failed to read input")?;
        if n == 0 {
            bail!("input closed");
        }
        Ok(line.trim().to_string())
    }

    pub fn header(&mut self, title: &str) -> Result<()> {
        let title = format!("{:^60}", title);
        writeln!(self.output)?;
        writeln!(self.output, "{}", RULE.bright_magenta())?;
        writeln!(self.output, "{}", title.bright_magenta())?;
        writeln!(self.output, "{}", RULE.bright_magenta())?;
        writeln!(self.output)?;
        Ok(())
    }

    pub fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{}", message)?;
        Ok(())
    }

    pub fn success(&mut self, message: &str) -> Result<()> {
        let line = format!("✅ {}", message);
        self.say(&line.bright_green().to_string())
    }

    pub fn error(&mut self, message: &str) -> Result<()> {
        let line = format!("❌ {}", message);
        self.say(&line.bright_red().to_string())
    }

    pub fn warning(&mut self, message: &str) -> Result<()> {
        let line = format!("⚠️  {}", message);
        self.say(&line.bright_yellow().to_string())
    }

    pub fn info(&mut self, message: &str) -> Result<()> {
        let line = format!("ℹ️  {}", message);
        self.say(&line.bright_blue().to_string())
    }

    /// Ask once; an empty answer takes `default`.
    pub fn ask(&mut self, prompt: &str, default: Option<&str>) -> Result<String> {
        match default {
            Some(d) if !d.is_empty() => write!(self.output, "{} [{}]: ", prompt, d)?,
            _ => write!(self.output, "{}: ", prompt)?,
        }
        let answer = self.read_line()?;
        Ok(match default {
            Some(d) if answer.is_empty() => d.to_string(),
            _ => answer,
        })
    }

    /// Yes/no question; only `y` (any case) means yes.
    pub fn confirm(&mut self, prompt: &str) -> Result<bool> {
        write!(self.output, "{} (y/n): ", prompt)?;
        Ok(self.read_line()?.eq_ignore_ascii_case("y"))
    }

    /// Ask until `accept` takes the answer. Validation errors re-ask; any
    /// other error is returned.
    pub fn ask_until<T>(
        &mut self,
        prompt: &str,
        default: Option<&str>,
        mut accept: impl FnMut(&str) -> ric_deploy_core::Result<T>,
    ) -> Result<T> {
        loop {
            let answer = self.ask(prompt, default)?;
            match accept(&answer) {
                Ok(value) => return Ok(value),
                Err(DeployError::Validation { .. }) => {
                    self.error("Invalid input. Please try again.")?
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Ask for a directory; a missing one is created after confirmation.
    pub fn ask_directory(&mut self, prompt: &str, default: &Path) -> Result<PathBuf> {
        let default = default.display().to_string();
        loop {
            let path = expand_home(&self.ask(prompt, Some(&default))?);
            let ready = validate_directory(&path, |p| {
                let question = format!("Directory {} doesn't exist. Create it?", p.display());
                self.confirm(&question).unwrap_or(false)
            });
            if ready {
                return Ok(path);
            }
            self.error("Invalid input. Please try again.")?;
        }
    }
}

/// Expand a leading `~` using `$HOME`.
pub fn expand_home(raw: &str) -> PathBuf {
    let home = std::env::var_os("HOME").map(PathBuf::from);
    match (raw, home) {
        ("~", Some(home)) => home,
        (r, Some(home)) if r.starts_with("~/") => home.join(&r[2..]),
        (r, _) => PathBuf::from(r),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output(p: Prompter<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(p.into_writer()).unwrap()
    }

    #[test]
    fn test_ask_uses_default_on_empty() {
        let mut p = prompter("\n10.0.0.1\n");
        assert_eq!(p.ask("RIC IP Address", Some("127.0.0.1")).unwrap(), "127.0.0.1");
        assert_eq!(p.ask("RIC IP Address", Some("127.0.0.1")).unwrap(), "10.0.0.1");
        assert!(output(p).contains("RIC IP Address [127.0.0.1]: "));
    }

    #[test]
    fn test_confirm_only_accepts_y() {
        let mut p = prompter("y\nY\nyes\n\n");
        assert!(p.confirm("Proceed?").unwrap());
        assert!(p.confirm("Proceed?").unwrap());
        assert!(!p.confirm("Proceed?").unwrap());
        assert!(!p.confirm("Proceed?").unwrap());
    }

    #[test]
    fn test_closed_input_is_error() {
        let mut p = prompter("");
        assert!(p.ask("anything", None).is_err());
    }

    #[test]
    fn test_ask_until_reasks_on_validation_error() {
        let mut p = prompter("99999\n8080\n");
        let port = p
            .ask_until("RIC E2 Port", Some("36421"), |s| {
                if ric_deploy_core::validate_port(s) {
                    Ok(s.to_string())
                } else {
                    Err(DeployError::Validation {
                        field: "ric_port",
                        value: s.to_string(),
                    })
                }
            })
            .unwrap();
        assert_eq!(port, "8080");
        assert!(output(p).contains("Invalid input. Please try again."));
    }

    #[test]
    fn test_ask_directory_creates_on_confirm() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("ric");
        let mut p = prompter(&format!("{}\ny\n", target.display()));
        let path = p
            .ask_directory("Installation Directory", dir.path())
            .unwrap();
        assert_eq!(path, target);
        assert!(target.is_dir());
    }

    #[test]
    fn test_ask_directory_reasks_when_declined() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("ric");
        let mut p = prompter(&format!("{}\nn\n\n", target.display()));
        let path = p
            .ask_directory("Installation Directory", dir.path())
            .unwrap();
        assert_eq!(path, dir.path());
        assert!(!target.exists());
    }

    #[test]
    fn test_status_lines_are_colored() {
        colored::control::set_override(true);
        let mut p = prompter("");
        p.success("Configuration saved").unwrap();
        p.error("Deployment failed").unwrap();
        colored::control::unset_override();

        let out = output(p);
        assert!(out.contains("\u{1b}[92m✅ Configuration saved"));
        assert!(out.contains("\u{1b}[91m❌ Deployment failed"));
    }

    #[test]
    fn test_expand_home_plain_path() {
        assert_eq!(expand_home("/opt/ric"), PathBuf::from("/opt/ric"));
    }
}
