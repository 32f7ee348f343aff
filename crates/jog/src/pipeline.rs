//! Pipeline driver: input chunks → lines → classify → render → emit.
//!
//! Single-pass, single task. Each chunk is fully processed before the next
//! read, so the splitter's pending buffer and the emitter's flushed flag
//! are never shared.

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tracing::debug;

use crate::cli::Config;
use crate::emit::{EmitError, Emitter};
use crate::record::classify;
use crate::render::{render, RenderError};
use crate::split::LineSplitter;

const CHUNK_SIZE: usize = 8 * 1024;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("reading input failed: {0}")]
    Read(#[source] std::io::Error),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Emit(#[from] EmitError),
}

impl PipelineError {
    /// Broken-pipe termination is benign: the reader went away.
    pub fn is_broken_pipe(&self) -> bool {
        matches!(self, PipelineError::Emit(EmitError::BrokenPipe))
    }
}

/// Run the full transducer from `reader` to `writer`.
///
/// At end of input the splitter's unterminated remainder, if any, goes
/// through the same classify→render→emit path exactly once.
pub async fn run<R, W>(mut reader: R, writer: W, config: &Config) -> Result<(), PipelineError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut splitter = LineSplitter::new();
    let mut emitter = Emitter::new(writer);
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut lines_seen: u64 = 0;

    debug!(mode = config.mode.as_str(), "pipeline start");

    loop {
        let n = reader.read(&mut buf).await.map_err(PipelineError::Read)?;
        if n == 0 {
            break;
        }
        for line in splitter.feed(&buf[..n]) {
            lines_seen += 1;
            process_line(&line, &mut emitter, config).await?;
        }
    }

    if let Some(line) = splitter.finish() {
        lines_seen += 1;
        process_line(&line, &mut emitter, config).await?;
    }

    debug!(
        lines = lines_seen,
        flushed = emitter.last_write_flushed(),
        "input drained"
    );
    Ok(())
}

async fn process_line<W: AsyncWrite + Unpin>(
    line: &[u8],
    emitter: &mut Emitter<W>,
    config: &Config,
) -> Result<(), PipelineError> {
    let classified = classify(line);
    let rendered = render(&classified, config.mode, config.json_indent)?;
    emitter.emit(&rendered).await?;
    Ok(())
}

/// Wire standard input and output for `main`.
pub async fn run_stdio(config: &Config) -> Result<(), PipelineError> {
    run(tokio::io::stdin(), tokio::io::stdout(), config).await
}
