use anyhow::{Result, bail};
use kisan_ai::ChatSession;

use super::stream_answer;

pub async fn run(mut session: ChatSession, question: &str) -> Result<()> {
    if question.trim().is_empty() {
        bail!("Question must not be empty");
    }
    stream_answer(&mut session, question).await?;
    Ok(())
}
