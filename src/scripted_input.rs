use crate::input::{FrameInput, MouseButton};
use glam::Vec2;
use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Deserialize)]
struct ScriptedInputFile {
    steps: Vec<ScriptedStep>,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct ScriptedStep {
    /// Number of frames this step is held for.
    frames: u32,
    #[serde(default)]
    mouse_x: f32,
    #[serde(default)]
    mouse_y: f32,
    #[serde(default)]
    buttons: Vec<MouseButton>,
    /// Window resize applied on the first frame of the step.
    #[serde(default)]
    resize: Option<[u32; 2]>,
}

/// Replays a JSON mouse script one frame at a time.
pub struct ScriptedInputPlayer {
    steps: Vec<ScriptedStep>,
    index: usize,
    frame_in_step: u32,
}

impl ScriptedInputPlayer {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> anyhow::Result<Self> {
        let file: ScriptedInputFile = serde_json::from_str(contents)?;
        if file.steps.is_empty() {
            anyhow::bail!("scripted input file contains no steps");
        }
        if file.steps.iter().any(|step| step.frames == 0) {
            anyhow::bail!("scripted input steps must last at least one frame");
        }
        Ok(Self {
            steps: file.steps,
            index: 0,
            frame_in_step: 0,
        })
    }

    /// Total frames covered by the script.
    pub fn total_frames(&self) -> u64 {
        self.steps.iter().map(|step| u64::from(step.frames)).sum()
    }

    /// Input for the next frame, or `None` once every step has played.
    pub fn next_frame(&mut self) -> Option<FrameInput> {
        let step = self.steps.get(self.index)?;
        let first_frame = self.frame_in_step == 0;

        let input = FrameInput {
            mouse_pos: Vec2::new(step.mouse_x, step.mouse_y),
            buttons: step.buttons.clone(),
            resized: if first_frame {
                step.resize.map(|[w, h]| (w, h))
            } else {
                None
            },
        };

        self.frame_in_step += 1;
        if self.frame_in_step >= step.frames {
            self.index += 1;
            self.frame_in_step = 0;
        }

        Some(input)
    }
}
