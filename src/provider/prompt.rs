use crate::error::{AppError, CycleError};
use crate::intersection::Road;
use crate::provider::{RawReading, ReadingProvider};
use std::io::{self, BufRead, Write};

/// Asks an operator for each road's vehicle count and emergency status.
pub struct PromptProvider<R, W> {
    input: R,
    output: W,
}

impl PromptProvider<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> PromptProvider<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, prompt: &str) -> Result<String, AppError> {
        write!(self.output, "{prompt}").map_err(provider_io)?;
        self.output.flush().map_err(provider_io)?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line).map_err(provider_io)?;
        if read == 0 {
            return Err(AppError::Provider("input closed".to_string()));
        }
        Ok(line.trim().to_string())
    }
}

impl<R: BufRead, W: Write> ReadingProvider for PromptProvider<R, W> {
    fn read(&mut self, road: &Road) -> Result<RawReading, AppError> {
        let count = self.ask(&format!("Enter number of vehicles on {road}: "))?;
        let vehicle_count = count
            .parse::<i64>()
            .map_err(|_| CycleError::InvalidReading {
                road: road.to_string(),
                reason: format!("vehicle count is not an integer: {count:?}"),
            })?;
        let emergency = self.ask(&format!(
            "Is there an emergency vehicle on {road}? (yes/no): "
        ))?;
        Ok(RawReading {
            vehicle_count,
            emergency,
        })
    }
}

fn provider_io(err: io::Error) -> AppError {
    AppError::Provider(format!("stdin/stdout error: {err}"))
}
