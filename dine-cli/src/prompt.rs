//! Line-based terminal input

use std::io::Write;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

pub struct Prompt {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompt {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Ask for one line; `None` on end of input
    pub async fn ask(&mut self, label: &str) -> Result<Option<String>> {
        print!("{label}");
        std::io::stdout().flush()?;
        Ok(self.lines.next_line().await?.map(|l| l.trim().to_string()))
    }

    /// Yes/no question, defaulting to no
    pub async fn confirm(&mut self, label: &str) -> Result<bool> {
        let answer = self.ask(&format!("{label} [y/N] ")).await?;
        Ok(matches!(answer.as_deref(), Some("y" | "Y" | "yes")))
    }
}
