//! Screen frame source
//!
//! Grabs the primary display by spawning the platform screenshot tool and
//! reading PNG bytes back. Each source instance owns its own scratch file,
//! so concurrent streams and recordings never touch each other's grabs.

use bytes::Bytes;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::{AtomicU64, Ordering};

use super::error::CaptureError;
use super::source::{EncodedFrame, FrameSource, ImageFormat};

/// Where a capture tool delivers the image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ToolOutput {
    /// Image bytes on stdout
    Stdout,
    /// Image written to the source's scratch file, passed as the tool's
    /// last argument
    PathArg,
    /// Image written to the source's scratch file by a generated script,
    /// appended as the tool's last argument
    ScriptPath,
}

/// A candidate capture command
struct CaptureTool {
    program: &'static str,
    args: &'static [&'static str],
    output: ToolOutput,
}

static SCRATCH_SEQ: AtomicU64 = AtomicU64::new(0);

/// Scratch file for tools that cannot write to stdout; unique per source
/// instance so concurrent jobs cannot read or delete each other's grabs
fn scratch_path() -> PathBuf {
    let seq = SCRATCH_SEQ.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!(
        "pc-remote-grab-{}-{}.png",
        std::process::id(),
        seq
    ))
}

/// PowerShell body for [`ToolOutput::ScriptPath`] tools; `{path}` is
/// replaced with the scratch file
const SCRIPT_TEMPLATE: &str = "Add-Type -AssemblyName System.Windows.Forms,System.Drawing; \
     $b = [System.Windows.Forms.Screen]::PrimaryScreen.Bounds; \
     $bmp = New-Object System.Drawing.Bitmap $b.Width, $b.Height; \
     $g = [System.Drawing.Graphics]::FromImage($bmp); \
     $g.CopyFromScreen($b.Location, [System.Drawing.Point]::Empty, $b.Size); \
     $bmp.Save('{path}', [System.Drawing.Imaging.ImageFormat]::Png)";

fn grab_script(path: &Path) -> String {
    SCRIPT_TEMPLATE.replace("{path}", &path.display().to_string())
}

#[cfg(target_os = "linux")]
const CAPTURE_TOOLS: &[CaptureTool] = &[
    // Wayland compositors
    CaptureTool {
        program: "grim",
        args: &["-t", "png", "-"],
        output: ToolOutput::Stdout,
    },
    // X11 via ImageMagick
    CaptureTool {
        program: "import",
        args: &["-window", "root", "png:-"],
        output: ToolOutput::Stdout,
    },
];

#[cfg(target_os = "macos")]
const CAPTURE_TOOLS: &[CaptureTool] = &[CaptureTool {
    program: "screencapture",
    args: &["-x", "-t", "png"],
    output: ToolOutput::PathArg,
}];

#[cfg(target_os = "windows")]
const CAPTURE_TOOLS: &[CaptureTool] = &[CaptureTool {
    program: "powershell",
    args: &["-NoProfile", "-Command"],
    output: ToolOutput::ScriptPath,
}];

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
const CAPTURE_TOOLS: &[CaptureTool] = &[];

/// Screen capture source producing PNG frames
#[derive(Debug)]
pub struct ScreenSource {
    /// Index of the last tool that worked, to skip dead candidates
    preferred_tool: Option<usize>,
    /// This instance's scratch file for non-stdout tools
    scratch: PathBuf,
}

impl ScreenSource {
    /// Create a new screen source for the primary display
    pub fn new() -> Self {
        Self {
            preferred_tool: None,
            scratch: scratch_path(),
        }
    }

    fn run_tool(&self, tool: &CaptureTool) -> Result<Bytes, CaptureError> {
        let mut command = Command::new(tool.program);
        command.args(tool.args);
        match tool.output {
            ToolOutput::Stdout => {}
            ToolOutput::PathArg => {
                command.arg(&self.scratch);
            }
            ToolOutput::ScriptPath => {
                command.arg(grab_script(&self.scratch));
            }
        }

        let output = command.output()?;
        if !output.status.success() {
            return Err(CaptureError::SourceUnavailable(format!(
                "{} exited with {}",
                tool.program, output.status
            )));
        }

        let data = match tool.output {
            ToolOutput::Stdout => Bytes::from(output.stdout),
            ToolOutput::PathArg | ToolOutput::ScriptPath => {
                let bytes = std::fs::read(&self.scratch)?;
                let _ = std::fs::remove_file(&self.scratch);
                Bytes::from(bytes)
            }
        };

        if data.is_empty() {
            return Err(CaptureError::SourceUnavailable(format!(
                "{} produced no image data",
                tool.program
            )));
        }
        Ok(data)
    }
}

impl Default for ScreenSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSource for ScreenSource {
    fn format(&self) -> ImageFormat {
        ImageFormat::Png
    }

    fn capture(&mut self) -> Result<EncodedFrame, CaptureError> {
        if CAPTURE_TOOLS.is_empty() {
            return Err(CaptureError::SourceUnavailable(
                "no screen capture tool for this platform".into(),
            ));
        }

        let start = self.preferred_tool.unwrap_or(0);
        let mut last_err = None;

        for offset in 0..CAPTURE_TOOLS.len() {
            let idx = (start + offset) % CAPTURE_TOOLS.len();
            let tool = &CAPTURE_TOOLS[idx];
            match self.run_tool(tool) {
                Ok(data) => {
                    self.preferred_tool = Some(idx);
                    return Ok(EncodedFrame {
                        format: ImageFormat::Png,
                        data,
                    });
                }
                Err(e) => {
                    tracing::debug!(tool = tool.program, error = %e, "Screen capture tool failed");
                    last_err = Some(e);
                }
            }
        }

        Err(match last_err {
            Some(CaptureError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                CaptureError::SourceUnavailable("no screen capture tool installed".into())
            }
            Some(e) => e,
            None => CaptureError::SourceUnavailable("no capture tool available".into()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sources_use_distinct_scratch_files() {
        // Concurrent screen jobs must not read or delete each other's grabs
        let a = ScreenSource::new();
        let b = ScreenSource::new();
        assert_ne!(a.scratch, b.scratch);
    }

    #[test]
    fn test_scratch_name_is_process_scoped() {
        let path = scratch_path();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();

        assert!(name.starts_with("pc-remote-grab-"));
        assert!(name.contains(&std::process::id().to_string()));
        assert!(name.ends_with(".png"));
    }

    #[test]
    fn test_grab_script_embeds_scratch_path() {
        let script = grab_script(Path::new("/tmp/shot-7.png"));

        assert!(script.contains("'/tmp/shot-7.png'"));
        assert!(!script.contains("{path}"));
    }
}
