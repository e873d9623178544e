//! Structurers backed by an external program or a saved response

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;

use tracing::{debug, info};

use crate::models::STANDARD_CATEGORIES;

use super::structurer::{
    build_prompt, parse_response, ReceiptStructurer, StructuredReceipt, StructuringError,
    StructuringRequest,
};

/// Exit status a structuring command uses to report a connectivity failure
pub const EXIT_NETWORK_FAILURE: i32 = 2;

/// Pipes the structuring prompt to an external command
///
/// The command receives the prompt on stdin and must print the JSON answer
/// on stdout. This keeps API keys and HTTP client setup outside the crate:
/// any script calling a hosted model will do. The user id, when known, is
/// exported as `POCKET_USER_ID`.
#[derive(Debug, Clone)]
pub struct CommandStructurer {
    program: String,
    args: Vec<String>,
}

impl CommandStructurer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Build from a `[program, args...]` list as stored in settings
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self::new(program.clone(), args.to_vec()))
    }
}

impl ReceiptStructurer for CommandStructurer {
    fn structure(&self, request: &StructuringRequest) -> Result<StructuredReceipt, StructuringError> {
        let prompt = build_prompt(&request.text, STANDARD_CATEGORIES);

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(user_id) = request.user_id {
            command.env("POCKET_USER_ID", user_id.as_uuid().to_string());
        }

        info!(program = %self.program, "calling structuring command");
        let mut child = command
            .spawn()
            .map_err(|e| StructuringError::Network(format!("failed to start {}: {}", self.program, e)))?;

        // Feed stdin from its own thread so a large answer cannot block the write
        let writer = child.stdin.take().map(|mut stdin| {
            thread::spawn(move || match stdin.write_all(prompt.as_bytes()) {
                // The command answered without reading the whole prompt
                Err(e) if e.kind() == ErrorKind::BrokenPipe => Ok(()),
                other => other,
            })
        });

        let output = child
            .wait_with_output()
            .map_err(|e| StructuringError::Network(format!("failed to read response: {}", e)))?;

        if let Some(writer) = writer {
            writer
                .join()
                .map_err(|_| StructuringError::Network("prompt writer panicked".into()))?
                .map_err(|e| StructuringError::Network(format!("failed to send prompt: {}", e)))?;
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(match output.status.code() {
                Some(EXIT_NETWORK_FAILURE) => StructuringError::Network(stderr),
                _ => StructuringError::Service(format!("{} ({})", stderr, output.status)),
            });
        }

        let body = String::from_utf8(output.stdout)
            .map_err(|e| StructuringError::InvalidResponse(e.to_string()))?;
        debug!(bytes = body.len(), "structuring response received");
        parse_response(&body)
    }
}

/// Replays a JSON response saved earlier
#[derive(Debug, Clone)]
pub struct ResponseFileStructurer {
    path: PathBuf,
}

impl ResponseFileStructurer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ReceiptStructurer for ResponseFileStructurer {
    fn structure(&self, _request: &StructuringRequest) -> Result<StructuredReceipt, StructuringError> {
        let body = fs::read_to_string(&self.path).map_err(|e| {
            StructuringError::Service(format!("failed to read {}: {}", self.path.display(), e))
        })?;
        parse_response(&body)
    }
}
