use std::{collections::BTreeMap, fs, path::Path};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use snake_duel_system_controls::{FrameInput, Key};

/// Scripted key presses replayed by the headless loop.
///
/// ```toml
/// [[press]]
/// frame = 0
/// keys = ["d", "left"]
///
/// [[press]]
/// frame = 40
/// keys = ["enter"]
/// ```
///
/// Keys are held for the listed frame only. Frames without an entry are idle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct InputScript {
    frames: BTreeMap<u64, Vec<Key>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScriptFile {
    #[serde(default)]
    press: Vec<PressEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PressEntry {
    frame: u64,
    keys: Vec<String>,
}

impl InputScript {
    /// Reads and parses the script at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read input script at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid input script at {}", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        let file: ScriptFile =
            toml::from_str(contents).context("failed to parse input script toml contents")?;

        let mut frames: BTreeMap<u64, Vec<Key>> = BTreeMap::new();
        for entry in file.press {
            let held = frames.entry(entry.frame).or_default();
            for name in entry.keys {
                let Some(key) = Key::from_name(&name) else {
                    bail!("unknown key `{name}` on frame {}", entry.frame);
                };
                held.push(key);
            }
        }
        Ok(Self { frames })
    }

    /// Input held during `frame`.
    pub(crate) fn frame(&self, frame: u64) -> FrameInput {
        self.frames
            .get(&frame)
            .map(|keys| FrameInput::from_keys(keys))
            .unwrap_or_default()
    }

    /// Last frame with scripted input, if any.
    pub(crate) fn last_frame(&self) -> Option<u64> {
        self.frames.keys().next_back().copied()
    }
}
